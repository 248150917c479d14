//! Input to intent: start/restart and player steering

use glam::Vec2;

use super::factory::reset_player;
use super::state::Session;
use crate::components::Facing;
use crate::consts::DIAGONAL_SCALE;
use crate::ecs::{EntityId, World};
use crate::platform::{Control, InputSource};
use crate::settings::Settings;

/// Apply one tick of input. Returns true if a new run was started.
pub fn apply_input(
    world: &mut World,
    session: &mut Session,
    settings: &Settings,
    input: &dyn InputSource,
) -> bool {
    let mut started = false;
    if input.is_held(Control::Start) && session.phase.accepts_start() {
        let purged = purge_obstacles(world);
        if purged > 0 {
            log::debug!("Purged {} mobs", purged);
        }
        for player in world.player_tags.ids() {
            reset_player(world, settings, player);
        }
        session.start_game();
        started = true;
    }

    if session.phase.is_playing() {
        steer_players(world, input);
    }
    started
}

/// Remove every obstacle-tagged entity. Returns how many were removed.
pub fn purge_obstacles(world: &mut World) -> usize {
    let obstacles: Vec<EntityId> = world.obstacle_tags.ids();
    world.remove_entities(obstacles)
}

/// Unit direction from the four directional controls. Opposing pairs cancel.
pub fn input_direction(input: &dyn InputSource) -> Vec2 {
    let axis = |negative, positive| {
        let mut value = 0.0;
        if input.is_held(negative) {
            value -= 1.0;
        }
        if input.is_held(positive) {
            value += 1.0;
        }
        value
    };
    let direction = Vec2::new(axis(Control::Left, Control::Right), axis(Control::Up, Control::Down));

    if direction.x != 0.0 && direction.y != 0.0 {
        direction * DIAGONAL_SCALE
    } else {
        direction
    }
}

/// Facing implied by a direction. `None` when there is no movement.
pub fn facing_for(direction: Vec2) -> Option<Facing> {
    match (direction.x != 0.0, direction.y != 0.0) {
        (true, _) => Some(Facing::Horizontal),
        (false, true) => Some(Facing::Vertical),
        (false, false) => None,
    }
}

fn steer_players(world: &mut World, input: &dyn InputSource) {
    let direction = input_direction(input);
    let facing = facing_for(direction);

    for (id, _) in world.player_tags.iter() {
        let Some(velocity) = world.velocities.get_mut(id) else {
            continue;
        };
        velocity.0 = direction;
        if let (Some(facing), Some(current)) = (facing, world.facings.get_mut(id)) {
            *current = facing;
        }
    }
}
