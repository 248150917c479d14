//! Dodge the Creeps - headless entry point
//!
//! Runs the game with an autopilot at the controls, a logging presenter and a
//! logging audio sink. Use `RUST_LOG=debug` to watch spawns and reaps.
//!
//! ```text
//! dodge-creeps [config.json] [--frames N] [--seed S] [--fixed]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use glam::Vec2;

use dodge_creeps::audio::{self, LogAudio};
use dodge_creeps::platform::{Clock, Control, FixedClock, FrameClock, HeldControls};
use dodge_creeps::render::LogPresenter;
use dodge_creeps::{Game, GamePhase, Settings, sim};

const DEFAULT_FRAMES: u64 = 600;
/// Obstacles closer than this make the autopilot dodge
const DANGER_RADIUS: f32 = 160.0;
/// Frames the autopilot waits on the game-over screen before restarting
const RESTART_DELAY: u32 = 90;

#[derive(Parser, Debug)]
#[command(name = "dodge-creeps")]
#[command(about = "Dodge the Creeps, played headless by an autopilot")]
struct Cli {
    /// Configuration file (defaults to the built-in entities.json)
    config: Option<PathBuf>,
    /// Stop after this many frames
    #[arg(long, default_value_t = DEFAULT_FRAMES)]
    frames: u64,
    /// Spawn RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Step a fixed 1/targetFps per frame instead of pacing on the wall clock
    #[arg(long)]
    fixed: bool,
}

impl Cli {
    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}

/// Simple demo player: starts runs and steps away from the nearest mob.
#[derive(Debug, Default)]
struct Autopilot {
    frames: u64,
    limit: u64,
    game_over_frames: u32,
}

impl Autopilot {
    fn new(limit: u64) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    fn poll(&mut self, game: &Game) -> HeldControls {
        let mut held = HeldControls::new();
        self.frames += 1;
        if self.frames > self.limit {
            held.press(Control::Quit);
            return held;
        }

        match game.phase() {
            GamePhase::Menu => held.press(Control::Start),
            GamePhase::GameOver => {
                self.game_over_frames += 1;
                if self.game_over_frames >= RESTART_DELAY {
                    self.game_over_frames = 0;
                    held.press(Control::Start);
                }
            }
            GamePhase::Playing => {
                let world = game.world();
                let Some(player) = world.transforms.get(game.player()) else {
                    return held;
                };
                let home = Vec2::from(game.settings().player.start_position);

                let threat = world
                    .obstacle_tags
                    .iter()
                    .filter_map(|(id, _)| world.transforms.get(id))
                    .map(|t| t.position - player.position)
                    .filter(|offset| offset.length() < DANGER_RADIUS)
                    .min_by(|a, b| a.length().total_cmp(&b.length()));

                let wish = match threat {
                    Some(offset) => -offset,
                    None if player.position.distance(home) > 40.0 => home - player.position,
                    None => Vec2::ZERO,
                };
                press_toward(&mut held, wish);
            }
        }
        held
    }
}

fn press_toward(held: &mut HeldControls, wish: Vec2) {
    const DEAD_ZONE: f32 = 8.0;
    if wish.x < -DEAD_ZONE {
        held.press(Control::Left);
    } else if wish.x > DEAD_ZONE {
        held.press(Control::Right);
    }
    if wish.y < -DEAD_ZONE {
        held.press(Control::Up);
    } else if wish.y > DEAD_ZONE {
        held.press(Control::Down);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::init();
    log::info!("Dodge the Creeps (headless) starting...");

    let loaded = match &cli.config {
        Some(path) => Settings::load(path),
        None => Settings::builtin(),
    };
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut audio = LogAudio::new();
    let missing = audio::configure(&mut audio, &settings.audio);
    if missing > 0 {
        log::warn!("{missing} audio assets unavailable");
    }
    let mut presenter = LogPresenter::new();

    let target_fps = settings.game_settings.target_fps;
    let mut clock: Box<dyn Clock> = if cli.fixed {
        Box::new(FixedClock::new(1.0 / target_fps as f32))
    } else {
        Box::new(FrameClock::new(target_fps))
    };

    let mut game = Game::new(settings, cli.seed());
    let mut pilot = Autopilot::new(cli.frames);
    let frames = sim::run(
        &mut game,
        clock.as_mut(),
        |game| pilot.poll(game),
        &mut presenter,
        &mut audio,
    );

    let session = game.session();
    log::info!(
        "Done after {} frames: phase {:?}, score {}, best {}, runs {}",
        frames,
        session.phase,
        session.score,
        session.best_score,
        session.runs
    );
    ExitCode::SUCCESS
}
