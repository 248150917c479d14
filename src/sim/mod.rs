//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same settings, seed, delta times
//! and inputs, a run plays out identically:
//! - Seeded RNG only (spawning)
//! - Stable iteration order (by entity ID)
//! - Rendering and audio only through the sink traits

pub mod animation;
pub mod boundary;
pub mod collision;
pub mod factory;
pub mod input;
pub mod movement;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Hit};
pub use factory::Placement;
pub use spawn::{SpawnEdge, Spawner};
pub use state::{GamePhase, Session};
pub use tick::{Flow, Game, TickReport, run};
