//! Dodge the Creeps - a small arcade game on a minimal entity-component core
//!
//! Core modules:
//! - `ecs`: Entity allocator, typed component storages, `World`
//! - `components`: Plain-data component records
//! - `sim`: Deterministic simulation (systems, game state, per-tick orchestration)
//! - `settings`: Parsed `entities.json` configuration
//! - `audio`: Audio sink contract and the music director
//! - `render`: Presentation sink contract, HUD refresh, render pass
//! - `platform`: Logical controls and the frame clock

pub mod audio;
pub mod components;
pub mod ecs;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use ecs::{EntityId, World};
pub use settings::{Settings, SettingsError};
pub use sim::{Flow, Game, GamePhase};

/// Game configuration constants
pub mod consts {
    /// Spawn interval floor (seconds)
    pub const MIN_SPAWN_INTERVAL: f32 = 0.2;
    /// Interval decrement after each spawn
    pub const SPAWN_INTERVAL_STEP: f32 = 0.01;
    /// Spawn coordinates stay this far from the playfield corners
    pub const SPAWN_EDGE_MARGIN: f32 = 50.0;
    /// Obstacles appear this far outside the edge they enter from
    pub const SPAWN_OFFSCREEN_OFFSET: f32 = 50.0;

    /// Minimum distance past the playfield edge before an obstacle is reaped
    pub const REAP_BUFFER: f32 = 50.0;

    /// Per-axis scale for diagonal input (1/√2)
    pub const DIAGONAL_SCALE: f32 = std::f32::consts::FRAC_1_SQRT_2;

    pub const DEFAULT_TARGET_FPS: u32 = 60;
    /// Seconds per animation frame when the sprite does not say
    pub const DEFAULT_FRAME_TIME: f32 = 0.1;

    /// Mixer volume ceiling
    pub const MAX_VOLUME: u8 = 128;
}
