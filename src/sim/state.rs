//! Session state: phase machine, score and difficulty
//!
//! One `Session` lives for the whole process. Runs start and end through it;
//! nothing here touches the world.

use glam::Vec2;

use crate::consts::REAP_BUFFER;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Waiting for the first start input
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended by a collision, waiting for restart
    GameOver,
}

impl GamePhase {
    pub fn is_playing(self) -> bool {
        self == GamePhase::Playing
    }

    /// Whether a start input begins a new run from this phase.
    pub fn accepts_start(self) -> bool {
        matches!(self, GamePhase::Menu | GamePhase::GameOver)
    }
}

/// Mutable session state
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub phase: GamePhase,
    /// Integer score, never decreases during a run
    pub score: u32,
    /// Survival time of the current run (seconds)
    pub game_time: f32,
    /// Fractional score carried between ticks
    score_accumulator: f32,
    pub score_per_second: f32,
    /// Current spawn interval, ratcheted down as obstacles spawn
    pub spawn_interval: f32,
    base_spawn_interval: f32,
    /// Playfield size
    pub screen: Vec2,
    /// How far outside the playfield an obstacle must be before it is
    /// reaped. Never less than the spawn offset.
    pub reap_margin: f32,
    /// Highest score reached by any run of this process
    pub best_score: u32,
    /// Number of runs started
    pub runs: u32,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        let game = &settings.game_settings;
        Self {
            phase: GamePhase::Menu,
            score: 0,
            game_time: 0.0,
            score_accumulator: 0.0,
            score_per_second: game.score_per_second,
            spawn_interval: game.spawn_interval,
            base_spawn_interval: game.spawn_interval,
            screen: settings.screen_size(),
            reap_margin: REAP_BUFFER.max(game.spawning.offscreen_offset),
            best_score: 0,
            runs: 0,
        }
    }

    /// Back to the menu with a clean score.
    pub fn reset(&mut self) {
        self.clear_run();
        self.phase = GamePhase::Menu;
    }

    /// Begin a new run.
    pub fn start_game(&mut self) {
        self.clear_run();
        self.spawn_interval = self.base_spawn_interval;
        self.runs += 1;
        self.phase = GamePhase::Playing;
        log::info!("Run {} started", self.runs);
    }

    /// End the current run. Score and time are kept for display.
    pub fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over after {:.1}s, score {} (best {})",
            self.game_time,
            self.score,
            self.best_score
        );
    }

    /// Advance survival time and score. No-op outside `Playing`.
    pub fn update_game_time(&mut self, dt: f32) {
        if !self.phase.is_playing() {
            return;
        }
        self.game_time += dt;
        self.score_accumulator += self.score_per_second * dt;

        let whole = self.score_accumulator.floor();
        if whole >= 1.0 {
            self.score = self.score.saturating_add(whole as u32);
            self.score_accumulator -= whole;
        }
        self.best_score = self.best_score.max(self.score);
    }

    pub fn base_spawn_interval(&self) -> f32 {
        self.base_spawn_interval
    }

    fn clear_run(&mut self) {
        self.score = 0;
        self.game_time = 0.0;
        self.score_accumulator = 0.0;
    }
}
