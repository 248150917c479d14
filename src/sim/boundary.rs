//! Playfield bounds: player clamp and obstacle reaping

use glam::Vec2;

use super::state::Session;
use crate::ecs::{EntityId, World};

/// Keep every player's sprite box inside `[0, screen]`.
///
/// Uses half the sprite size, not the collider, so the whole image stays
/// visible.
pub fn clamp_players(world: &mut World, screen: Vec2) {
    for (id, _) in world.player_tags.iter() {
        let (Some(transform), Some(sprite)) = (world.transforms.get_mut(id), world.sprites.get(id))
        else {
            continue;
        };
        let half = sprite.half_extents();
        let p = &mut transform.position;

        if p.x - half.x < 0.0 {
            p.x = half.x;
        } else if p.x + half.x > screen.x {
            p.x = screen.x - half.x;
        }

        if p.y - half.y < 0.0 {
            p.y = half.y;
        } else if p.y + half.y > screen.y {
            p.y = screen.y - half.y;
        }
    }
}

/// Whether a sprite box centered at `center` lies more than `margin` outside
/// the playfield on any side.
pub fn is_beyond_playfield(center: Vec2, half: Vec2, screen: Vec2, margin: f32) -> bool {
    center.x + half.x < -margin
        || center.x - half.x > screen.x + margin
        || center.y + half.y < -margin
        || center.y - half.y > screen.y + margin
}

/// Remove obstacles that have left the playfield. Victims are collected into
/// `despawn_buffer` first and removed after the scan. Returns how many were
/// removed.
pub fn reap_obstacles(
    world: &mut World,
    screen: Vec2,
    margin: f32,
    despawn_buffer: &mut Vec<EntityId>,
) -> usize {
    despawn_buffer.clear();

    for (id, _) in world.obstacle_tags.iter() {
        let (Some(transform), Some(sprite)) = (world.transforms.get(id), world.sprites.get(id)) else {
            continue;
        };
        if is_beyond_playfield(transform.position, sprite.half_extents(), screen, margin) {
            despawn_buffer.push(id);
        }
    }

    let mut removed = 0;
    for id in despawn_buffer.drain(..) {
        if world.remove_entity(id) {
            log::debug!("Removed off-screen mob {}", id);
            removed += 1;
        }
    }
    removed
}

/// Clamp players always; reap obstacles only while playing.
pub fn enforce_bounds(world: &mut World, session: &Session, despawn_buffer: &mut Vec<EntityId>) -> usize {
    clamp_players(world, session.screen);
    if session.phase.is_playing() {
        reap_obstacles(world, session.screen, session.reap_margin, despawn_buffer)
    } else {
        0
    }
}
