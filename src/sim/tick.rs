//! Per-tick orchestration
//!
//! Fixed system order for one tick:
//!
//! 1. Input (always): start/restart, player steering while playing
//! 2. While playing: movement, animation, score/time, spawning, collision
//! 3. Music director (always), so music also stops on entering game over
//! 4. Bounds (always clamps the player, reaps obstacles while playing)
//! 5. HUD refresh and render (always)

use super::animation::tick_animations;
use super::boundary::enforce_bounds;
use super::collision::{Hit, resolve_collisions};
use super::factory::{spawn_hud_element, spawn_player};
use super::input::apply_input;
use super::movement::integrate;
use super::spawn::Spawner;
use super::state::{GamePhase, Session};
use crate::audio::{AudioSink, MusicDirector};
use crate::components::HudElement;
use crate::ecs::{EntityId, World};
use crate::platform::{Clock, Control, InputSource};
use crate::render::{Presenter, refresh_hud, render_frame};
use crate::settings::Settings;

/// Whether the frame loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// A run started this tick
    pub started: bool,
    pub spawned: Option<EntityId>,
    pub hit: Option<Hit>,
    /// Obstacles removed for leaving the playfield
    pub reaped: usize,
}

/// The game: world, session and the stateful systems
pub struct Game {
    world: World,
    session: Session,
    settings: Settings,
    player: EntityId,
    spawner: Spawner,
    music: MusicDirector,
    despawn_buffer: Vec<EntityId>,
}

impl Game {
    /// Build the initial world: the player and the HUD elements.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut world = World::new();
        let player = spawn_player(&mut world, &settings);
        for element in HudElement::ALL {
            spawn_hud_element(&mut world, &settings, element);
        }
        let session = Session::new(&settings);
        log::info!(
            "Game ready: {}x{} playfield, {} mob kinds, seed {}",
            session.screen.x,
            session.screen.y,
            settings.obstacles.len(),
            seed
        );

        Self {
            world,
            session,
            settings,
            player,
            spawner: Spawner::new(seed),
            music: MusicDirector::new(),
            despawn_buffer: Vec::with_capacity(16),
        }
    }

    /// Advance the game by `dt` seconds and emit one frame.
    pub fn tick(
        &mut self,
        dt: f32,
        fps: f32,
        input: &dyn InputSource,
        presenter: &mut dyn Presenter,
        audio: &mut dyn AudioSink,
    ) -> TickReport {
        let mut report = TickReport::default();

        report.started = apply_input(&mut self.world, &mut self.session, &self.settings, input);
        if report.started {
            self.spawner.reset();
        }

        if self.session.phase.is_playing() {
            integrate(&mut self.world, dt);
            tick_animations(&mut self.world, dt);
            self.session.update_game_time(dt);
            report.spawned =
                self.spawner
                    .update(&mut self.world, &mut self.session, &self.settings, dt);
            report.hit = resolve_collisions(&mut self.world, &mut self.session, audio);
        }

        self.music.update(self.session.phase, audio);
        report.reaped = enforce_bounds(&mut self.world, &self.session, &mut self.despawn_buffer);

        refresh_hud(&mut self.world, &self.session, fps);
        render_frame(&mut self.world, &self.settings, presenter);
        report
    }

    /// One frame against a clock. Quit is checked before anything runs.
    pub fn frame(
        &mut self,
        clock: &mut dyn Clock,
        input: &dyn InputSource,
        presenter: &mut dyn Presenter,
        audio: &mut dyn AudioSink,
    ) -> Flow {
        if input.is_held(Control::Quit) {
            return Flow::Stop;
        }
        let dt = clock.tick();
        self.tick(dt, clock.fps(), input, presenter, audio);
        clock.pace();
        Flow::Continue
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }
}

/// Run frames until the polled input asks to quit. Returns the number of
/// frames that ran.
pub fn run<I, F>(
    game: &mut Game,
    clock: &mut dyn Clock,
    mut poll: F,
    presenter: &mut dyn Presenter,
    audio: &mut dyn AudioSink,
) -> u64
where
    I: InputSource,
    F: FnMut(&Game) -> I,
{
    let mut frames = 0;
    loop {
        let input = poll(game);
        if game.frame(clock, &input, presenter, audio) == Flow::Stop {
            break;
        }
        frames += 1;
    }
    log::info!("Stopped after {} frames", frames);
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioRequest, Cue, LogAudio, Music, configure};
    use crate::components::{Facing, Transform, Velocity};
    use crate::platform::{FixedClock, HeldControls};
    use crate::render::{GAME_OVER_MESSAGE, LogPresenter};
    use crate::sim::factory::{Placement, spawn_obstacle};
    use glam::Vec2;

    struct Harness {
        game: Game,
        presenter: LogPresenter,
        audio: LogAudio,
    }

    impl Harness {
        fn new(seed: u64) -> Self {
            let settings = Settings::builtin().unwrap();
            let mut audio = LogAudio::new();
            configure(&mut audio, &settings.audio);
            Self {
                game: Game::new(settings, seed),
                presenter: LogPresenter::new(),
                audio,
            }
        }

        fn step(&mut self, dt: f32, controls: &[Control]) -> TickReport {
            let input: HeldControls = controls.iter().copied().collect();
            self.game
                .tick(dt, 60.0, &input, &mut self.presenter, &mut self.audio)
        }

        fn start(&mut self) {
            let report = self.step(0.0, &[Control::Start]);
            assert!(report.started);
        }

        fn obstacle_count(&self) -> usize {
            self.game.world().obstacle_tags.len()
        }

        /// Put an obstacle right on top of the player.
        fn drop_obstacle_on_player(&mut self) -> EntityId {
            let position = self
                .game
                .world()
                .transforms
                .get(self.game.player())
                .unwrap()
                .position;
            let settings = self.game.settings().clone();
            let kind = settings.obstacle_kind("walking").unwrap();
            spawn_obstacle(
                self.game.world_mut(),
                &settings,
                kind,
                Placement {
                    position,
                    direction: Vec2::X,
                    facing: Facing::Horizontal,
                    speed: 0.0,
                },
            )
            .unwrap()
        }
    }

    #[test]
    fn test_menu_is_idle() {
        let mut h = Harness::new(1);
        for _ in 0..10 {
            let report = h.step(0.1, &[Control::Right]);
            assert_eq!(report, TickReport::default());
        }
        assert_eq!(h.game.phase(), GamePhase::Menu);
        assert_eq!(h.obstacle_count(), 0);
        assert_eq!(h.game.score(), 0);
        assert_eq!(h.presenter.frames(), 10);
        assert_eq!(
            h.presenter.last_texts(),
            &["Score: 0", "FPS: 60", "Dodge the Creeps! Press SPACE to start"]
        );
        assert!(h.audio.requests().is_empty());
    }

    #[test]
    fn test_start_plays_music_and_hides_message() {
        let mut h = Harness::new(1);
        h.start();
        assert_eq!(h.game.phase(), GamePhase::Playing);
        assert_eq!(h.audio.playing(), Some(Music::Background));
        assert_eq!(h.presenter.last_texts(), &["Score: 0", "FPS: 60"]);
    }

    #[test]
    fn test_first_spawn_after_one_interval() {
        let mut h = Harness::new(3);
        h.start();

        let mut spawn_steps = Vec::new();
        for step in 1..=9 {
            if h.step(0.1, &[]).spawned.is_some() {
                spawn_steps.push(step);
            }
        }
        assert_eq!(spawn_steps, vec![5]);
        assert_eq!(h.obstacle_count(), 1);
        assert_eq!(h.game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_long_tick_spawns_once() {
        let mut h = Harness::new(3);
        h.start();
        let report = h.step(1.25, &[]);
        assert!(report.spawned.is_some());
        assert_eq!(h.obstacle_count(), 1);
    }

    #[test]
    fn test_score_accumulates_fractional_ticks() {
        let mut h = Harness::new(5);
        h.start();
        let mut previous = 0;
        for step in 1..=20u32 {
            h.step(0.05, &[]);
            let score = h.game.score();
            assert!(score >= previous);
            assert_eq!(score, step / 2);
            previous = score;
        }
        assert_eq!(h.game.score(), 10);
        assert!((h.game.session().game_time - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_player_moves_and_stays_inside() {
        let mut h = Harness::new(1);
        h.start();
        h.step(0.1, &[Control::Right]);
        let x = h.game.world().transforms.get(h.game.player()).unwrap().position.x;
        assert!((x - 280.0).abs() < 1e-3);

        // Far too long to the left: clamped to half the sprite width
        h.step(5.0, &[Control::Left]);
        let p = h.game.world().transforms.get(h.game.player()).unwrap().position;
        assert_eq!(p.x, 27.0);
    }

    #[test]
    fn test_collision_ends_run() {
        let mut h = Harness::new(1);
        h.start();
        let mob = h.drop_obstacle_on_player();

        let report = h.step(0.01, &[]);
        assert_eq!(
            report.hit,
            Some(Hit {
                player: h.game.player(),
                obstacle: mob
            })
        );
        assert_eq!(h.game.phase(), GamePhase::GameOver);
        assert!(!h.game.world().is_alive(mob));
        assert_eq!(h.audio.cues(), vec![Cue::GameOver]);
        assert_eq!(h.audio.requests().last(), Some(&AudioRequest::StopMusic));
        assert_eq!(h.audio.playing(), None);
        assert!(h.presenter.last_texts().iter().any(|t| t == GAME_OVER_MESSAGE));

        // Frozen: nothing moves, no score
        let score = h.game.score();
        h.step(1.0, &[Control::Left]);
        assert_eq!(h.game.score(), score);
        assert_eq!(h.audio.cues().len(), 1);
    }

    #[test]
    fn test_restart_purges_and_resets() {
        let mut h = Harness::new(9);
        h.start();
        for _ in 0..8 {
            h.step(0.1, &[]);
        }
        let settings = h.game.settings().clone();
        let kind = settings.obstacle_kind("swimming").unwrap();
        for x in [60.0, 120.0, 420.0] {
            spawn_obstacle(
                h.game.world_mut(),
                &settings,
                kind,
                Placement {
                    position: Vec2::new(x, 100.0),
                    direction: Vec2::X,
                    facing: Facing::Horizontal,
                    speed: 0.0,
                },
            );
        }
        h.drop_obstacle_on_player();
        h.step(0.0, &[]);
        assert_eq!(h.game.phase(), GamePhase::GameOver);
        assert!(h.obstacle_count() >= 3);
        assert!(h.game.session().spawn_interval < 0.5);
        let best = h.game.session().best_score;
        assert_eq!(best, 8);

        h.start();
        assert_eq!(h.obstacle_count(), 0);
        assert_eq!(h.game.score(), 0);
        assert_eq!(h.game.session().game_time, 0.0);
        assert_eq!(h.game.phase(), GamePhase::Playing);
        assert_eq!(h.game.session().spawn_interval, 0.5);
        assert_eq!(h.game.session().best_score, best);
        assert_eq!(h.game.session().runs, 2);
        assert_eq!(
            h.game.world().transforms.get(h.game.player()).unwrap().position,
            Vec2::new(240.0, 450.0)
        );
        assert_eq!(h.audio.playing(), Some(Music::Background));
    }

    #[test]
    fn test_obstacles_crossing_the_field_are_reaped() {
        let mut h = Harness::new(11);
        h.start();
        let settings = h.game.settings().clone();
        let kind = settings.obstacle_kind("flying").unwrap();
        // Heading down a column the player is not in
        let mob = spawn_obstacle(
            h.game.world_mut(),
            &settings,
            kind,
            Placement {
                position: Vec2::new(60.0, -50.0),
                direction: Vec2::Y,
                facing: Facing::Vertical,
                speed: 1000.0,
            },
        )
        .unwrap();

        let player = h.game.player();
        let mut reaped = 0;
        for _ in 0..10 {
            h.game.world_mut().velocities.insert(player, Velocity(Vec2::ZERO));
            reaped += h.step(0.1, &[]).reaped;
            if !h.game.world().is_alive(mob) {
                break;
            }
        }
        assert!(!h.game.world().is_alive(mob));
        assert!(reaped >= 1);
    }

    #[test]
    fn test_far_spawn_offset_keeps_fresh_spawns() {
        let mut settings = Settings::builtin().unwrap();
        settings.game_settings.spawning.offscreen_offset = 100.0;
        let mut h = Harness::new(5);
        h.game = Game::new(settings, 5);
        h.start();

        let mut spawned = 0;
        for _ in 0..20 {
            let report = h.step(0.5, &[]);
            if let Some(mob) = report.spawned {
                assert!(h.game.world().is_alive(mob));
                spawned += 1;
            }
            if h.game.phase() != GamePhase::Playing {
                break;
            }
        }
        assert!(spawned >= 1);
        assert!(h.obstacle_count() >= 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let play = |seed| {
            let mut h = Harness::new(seed);
            h.start();
            for i in 0..40 {
                let controls: &[Control] = if i % 10 < 5 { &[Control::Up] } else { &[Control::Down] };
                h.step(0.05, controls);
            }
            let world = h.game.world();
            world
                .obstacle_tags
                .ids()
                .into_iter()
                .map(|id| world.transforms.get(id).copied())
                .collect::<Vec<Option<Transform>>>()
        };
        assert_eq!(play(77), play(77));
    }

    #[test]
    fn test_frame_stops_on_quit_before_ticking() {
        let mut h = Harness::new(1);
        let mut clock = FixedClock::new(0.1);
        let quit: HeldControls = [Control::Quit, Control::Start].into_iter().collect();
        let flow = h
            .game
            .frame(&mut clock, &quit, &mut h.presenter, &mut h.audio);
        assert_eq!(flow, Flow::Stop);
        assert_eq!(h.game.phase(), GamePhase::Menu);
        assert_eq!(h.presenter.frames(), 0);
    }

    #[test]
    fn test_run_until_quit() {
        let mut h = Harness::new(1);
        let mut clock = FixedClock::new(1.0 / 60.0);
        let mut polls = 0;
        let frames = run(
            &mut h.game,
            &mut clock,
            |game| {
                polls += 1;
                let mut held = HeldControls::new();
                if game.phase() == GamePhase::Menu {
                    held.press(Control::Start);
                }
                if polls > 30 {
                    held.press(Control::Quit);
                }
                held
            },
            &mut h.presenter,
            &mut h.audio,
        );
        assert_eq!(frames, 30);
        assert_eq!(h.presenter.frames(), 30);
        assert_eq!(h.game.phase(), GamePhase::Playing);
        assert!(h.game.score() > 0);
    }
}
