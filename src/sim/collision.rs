//! Player vs obstacle collision
//!
//! Axis-aligned boxes centered on each entity's position, sized by its
//! `Collider`. Touching edges count as overlap.

use glam::Vec2;

use super::state::Session;
use crate::audio::{AudioSink, Cue};
use crate::components::{Collider, Transform};
use crate::ecs::{EntityId, World};

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn of(transform: &Transform, collider: &Collider) -> Self {
        Self::from_center(transform.position, collider.half_extents())
    }

    /// Overlap test with inclusive bounds.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.min.x > other.max.x
            || self.max.x < other.min.x
            || self.min.y > other.max.y
            || self.max.y < other.min.y)
    }
}

/// A detected player/obstacle contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub player: EntityId,
    pub obstacle: EntityId,
}

/// First overlapping (player, obstacle) pair in entity order.
pub fn detect_player_hit(world: &World) -> Option<Hit> {
    for (player, _) in world.player_tags.iter() {
        let (Some(transform), Some(collider)) =
            (world.transforms.get(player), world.colliders.get(player))
        else {
            continue;
        };
        let player_box = Aabb::of(transform, collider);

        for (obstacle, _) in world.obstacle_tags.iter() {
            let (Some(transform), Some(collider)) =
                (world.transforms.get(obstacle), world.colliders.get(obstacle))
            else {
                continue;
            };
            if player_box.overlaps(&Aabb::of(transform, collider)) {
                return Some(Hit { player, obstacle });
            }
        }
    }
    None
}

/// End the run on the first hit: game over, play the cue, remove the obstacle.
/// At most one collision is resolved per tick. No-op outside `Playing`.
pub fn resolve_collisions(
    world: &mut World,
    session: &mut Session,
    audio: &mut dyn AudioSink,
) -> Option<Hit> {
    if !session.phase.is_playing() {
        return None;
    }

    let hit = detect_player_hit(world)?;
    log::info!("Player {} hit by mob {}", hit.player, hit.obstacle);
    audio.play_cue(Cue::GameOver);
    session.game_over();
    world.remove_entity(hit.obstacle);
    Some(hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogAudio;
    use crate::components::{ObstacleTag, PlayerTag};
    use crate::settings::Settings;
    use crate::sim::state::GamePhase;
    use proptest::prelude::*;

    fn boxed(world: &mut World, center: Vec2, size: Vec2) -> EntityId {
        let e = world.create_entity();
        world.add_component(e, Transform::at(center));
        world.add_component(
            e,
            Collider {
                width: size.x,
                height: size.y,
                is_trigger: false,
            },
        );
        e
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = Aabb::from_center(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        // Left edge of b at x = 10, right edge of a at x = 10
        let b = Aabb::from_center(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&b));

        let c = Aabb::from_center(Vec2::new(20.5, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_separated_on_one_axis_misses() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(5.0));
        let b = Aabb::from_center(Vec2::new(2.0, 30.0), Vec2::splat(5.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_hit_ends_run_and_removes_obstacle() {
        let settings = Settings::builtin().unwrap();
        let mut session = Session::new(&settings);
        session.start_game();
        let mut world = World::new();
        let mut audio = LogAudio::default();

        let player = boxed(&mut world, Vec2::new(100.0, 100.0), Vec2::new(40.0, 50.0));
        world.add_component(player, PlayerTag);
        let far = boxed(&mut world, Vec2::new(400.0, 100.0), Vec2::new(50.0, 40.0));
        world.add_component(far, ObstacleTag);
        let near = boxed(&mut world, Vec2::new(145.0, 100.0), Vec2::new(50.0, 40.0));
        world.add_component(near, ObstacleTag);

        let hit = resolve_collisions(&mut world, &mut session, &mut audio).unwrap();
        assert_eq!(hit, Hit { player, obstacle: near });
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(!world.is_alive(near));
        assert!(world.is_alive(far));
        assert!(world.is_alive(player));
        assert_eq!(audio.cues(), &[Cue::GameOver]);
    }

    #[test]
    fn test_one_hit_per_tick() {
        let settings = Settings::builtin().unwrap();
        let mut session = Session::new(&settings);
        session.start_game();
        let mut world = World::new();
        let mut audio = LogAudio::default();

        let player = boxed(&mut world, Vec2::new(100.0, 100.0), Vec2::splat(40.0));
        world.add_component(player, PlayerTag);
        for _ in 0..3 {
            let e = boxed(&mut world, Vec2::new(100.0, 100.0), Vec2::splat(40.0));
            world.add_component(e, ObstacleTag);
        }

        assert!(resolve_collisions(&mut world, &mut session, &mut audio).is_some());
        assert_eq!(world.obstacle_tags.len(), 2);
        // Game over: further calls do nothing
        assert!(resolve_collisions(&mut world, &mut session, &mut audio).is_none());
        assert_eq!(world.obstacle_tags.len(), 2);
        assert_eq!(audio.cues().len(), 1);
    }

    #[test]
    fn test_obstacle_without_collider_is_skipped() {
        let mut world = World::new();
        let player = boxed(&mut world, Vec2::ZERO, Vec2::splat(40.0));
        world.add_component(player, PlayerTag);
        let ghost = world.create_entity();
        world.add_component(ghost, Transform::at(Vec2::ZERO));
        world.add_component(ghost, ObstacleTag);

        assert!(detect_player_hit(&world).is_none());
    }

    proptest! {
        #[test]
        fn test_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = Aabb::from_center(Vec2::new(ax, ay), Vec2::new(aw, ah) / 2.0);
            let b = Aabb::from_center(Vec2::new(bx, by), Vec2::new(bw, bh) / 2.0);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn test_box_overlaps_itself(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 0.0f32..200.0, h in 0.0f32..200.0,
        ) {
            let a = Aabb::from_center(Vec2::new(x, y), Vec2::new(w, h) / 2.0);
            prop_assert!(a.overlaps(&a));
        }
    }
}
