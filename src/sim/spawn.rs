//! Obstacle spawning
//!
//! Timer driven. When the accumulated time reaches the session's spawn
//! interval one obstacle is spawned and the timer resets to zero; overshoot is
//! discarded, never caught up. Each spawn ratchets the interval down toward
//! the configured floor.
//!
//! Every random draw comes from one seeded `Pcg32`, in a fixed order per
//! spawn: kind, edge, edge offset, speed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::factory::{Placement, spawn_obstacle};
use super::state::Session;
use crate::components::{Facing, ObstacleKind};
use crate::ecs::{EntityId, World};
use crate::settings::{Settings, SpawnTuning};

/// Playfield edge an obstacle enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Right,
    Left,
    Top,
    Bottom,
}

impl SpawnEdge {
    pub const ALL: [SpawnEdge; 4] = [
        SpawnEdge::Right,
        SpawnEdge::Left,
        SpawnEdge::Top,
        SpawnEdge::Bottom,
    ];

    /// Inward unit direction.
    pub fn direction(self) -> Vec2 {
        match self {
            SpawnEdge::Right => Vec2::NEG_X,
            SpawnEdge::Left => Vec2::X,
            SpawnEdge::Top => Vec2::Y,
            SpawnEdge::Bottom => Vec2::NEG_Y,
        }
    }

    pub fn facing(self) -> Facing {
        match self {
            SpawnEdge::Right | SpawnEdge::Left => Facing::Horizontal,
            SpawnEdge::Top | SpawnEdge::Bottom => Facing::Vertical,
        }
    }

    /// Spawn point just outside this edge. `t` in [0, 1) picks the coordinate
    /// along the edge, kept `edge_margin` away from both corners.
    pub fn position(self, t: f32, screen: Vec2, tuning: &SpawnTuning) -> Vec2 {
        let margin = tuning.edge_margin;
        let offset = tuning.offscreen_offset;
        let along_x = t * (screen.x - 2.0 * margin) + margin;
        let along_y = t * (screen.y - 2.0 * margin) + margin;
        match self {
            SpawnEdge::Right => Vec2::new(screen.x + offset, along_y),
            SpawnEdge::Left => Vec2::new(-offset, along_y),
            SpawnEdge::Top => Vec2::new(along_x, -offset),
            SpawnEdge::Bottom => Vec2::new(along_x, screen.y + offset),
        }
    }
}

/// Spawn timer and random source
#[derive(Debug, Clone)]
pub struct Spawner {
    time_since_spawn: f32,
    rng: Pcg32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            time_since_spawn: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Clear the timer for a new run. The random stream continues.
    pub fn reset(&mut self) {
        self.time_since_spawn = 0.0;
    }

    pub fn time_since_spawn(&self) -> f32 {
        self.time_since_spawn
    }

    /// Advance the timer and spawn at most one obstacle. No-op outside
    /// `Playing`.
    pub fn update(
        &mut self,
        world: &mut World,
        session: &mut Session,
        settings: &Settings,
        dt: f32,
    ) -> Option<EntityId> {
        if !session.phase.is_playing() {
            return None;
        }

        self.time_since_spawn += dt;
        if self.time_since_spawn < session.spawn_interval {
            return None;
        }

        let spawned = self.spawn(world, settings);
        self.time_since_spawn = 0.0;

        let tuning = &settings.game_settings.spawning;
        if spawned.is_some() && session.spawn_interval > tuning.min_interval {
            session.spawn_interval =
                (session.spawn_interval - tuning.interval_step).max(tuning.min_interval);
        }
        spawned
    }

    /// Spawn one obstacle of a random kind at a random edge.
    pub fn spawn(&mut self, world: &mut World, settings: &Settings) -> Option<EntityId> {
        let kind_count = settings.obstacles.len();
        if kind_count == 0 {
            log::warn!("No mob kinds configured, nothing to spawn");
            return None;
        }

        let kind = ObstacleKind(u16::try_from(self.rng.random_range(0..kind_count)).ok()?);
        let edge = SpawnEdge::ALL[self.rng.random_range(0..SpawnEdge::ALL.len())];
        let t: f32 = self.rng.random();
        let speed_t: f32 = self.rng.random();

        let def = settings.obstacle(kind)?;
        let range = def.speed_range;
        let placement = Placement {
            position: edge.position(t, settings.screen_size(), &settings.game_settings.spawning),
            direction: edge.direction(),
            facing: edge.facing(),
            speed: range.min + speed_t * (range.max - range.min),
        };

        let id = spawn_obstacle(world, settings, kind, placement)?;
        log::debug!(
            "Spawned {} {} at ({:.0}, {:.0}) from {:?} with speed {:.0}",
            settings.obstacle_name(kind).unwrap_or("?"),
            id,
            placement.position.x,
            placement.position.y,
            edge,
            placement.speed
        );
        Some(id)
    }
}
