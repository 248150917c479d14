//! Entity construction from configuration
//!
//! The only place component bundles are assembled. Unknown kinds or missing
//! HUD definitions abandon the creation and return `None`.

use glam::Vec2;

use crate::components::*;
use crate::ecs::{EntityId, World};
use crate::settings::Settings;

/// Where and how a new obstacle moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    /// Unit direction of travel
    pub direction: Vec2,
    pub facing: Facing,
    pub speed: f32,
}

/// Create the player at its start position.
pub fn spawn_player(world: &mut World, settings: &Settings) -> EntityId {
    let def = &settings.player;
    let id = world.create_entity();
    world.add_component(id, Transform::at(def.start_position.into()));
    world.add_component(id, Velocity::default());
    world.add_component(id, Facing::Horizontal);
    world.add_component(id, Sprite::from(&def.sprites.horizontal));
    world.add_component(id, Collider::from(&def.collider));
    world.add_component(id, Speed(def.speed));
    world.add_component(id, Animation::default());
    world.add_component(id, PlayerTag);
    world.add_component(id, EntityKind::Player);
    log::debug!("Spawned player {}", id);
    id
}

/// Put the player back where a run starts.
pub fn reset_player(world: &mut World, settings: &Settings, player: EntityId) {
    if let Some(transform) = world.transforms.get_mut(player) {
        *transform = Transform::at(settings.player.start_position.into());
    }
    if let Some(velocity) = world.velocities.get_mut(player) {
        *velocity = Velocity::default();
    }
    if let Some(facing) = world.facings.get_mut(player) {
        *facing = Facing::Horizontal;
    }
    if let Some(animation) = world.animations.get_mut(player) {
        *animation = Animation::default();
    }
}

/// Create an obstacle of `kind`. Returns `None` if the kind is not configured.
pub fn spawn_obstacle(
    world: &mut World,
    settings: &Settings,
    kind: ObstacleKind,
    placement: Placement,
) -> Option<EntityId> {
    let Some(def) = settings.obstacle(kind) else {
        log::warn!("Mob kind {:?} not found in settings", kind);
        return None;
    };

    let id = world.create_entity();
    world.add_component(id, Transform::at(placement.position));
    world.add_component(id, placement.facing);
    world.add_component(id, Velocity(placement.direction));
    world.add_component(id, Speed(placement.speed));
    let sprite = Sprite::from(&def.sprite);
    if sprite.animated {
        world.add_component(id, Animation::default());
    }
    world.add_component(id, sprite);
    world.add_component(id, Collider::from(&def.collider));
    world.add_component(id, EntityKind::Obstacle(kind));
    world.add_component(id, ObstacleTag);
    Some(id)
}

/// Create an obstacle by configured name.
pub fn spawn_obstacle_named(
    world: &mut World,
    settings: &Settings,
    name: &str,
    placement: Placement,
) -> Option<EntityId> {
    let Some(kind) = settings.obstacle_kind(name) else {
        log::warn!("Mob kind '{}' not found in settings", name);
        return None;
    };
    spawn_obstacle(world, settings, kind, placement)
}

/// Create a HUD text entity. Returns `None` if the element is not configured.
pub fn spawn_hud_element(
    world: &mut World,
    settings: &Settings,
    element: HudElement,
) -> Option<EntityId> {
    let Some(def) = settings.ui.get(element) else {
        log::warn!("UI element '{}' not found in settings", element.as_str());
        return None;
    };

    let id = world.create_entity();
    world.add_component(id, UiPosition(def.position.into()));
    world.add_component(
        id,
        UiText {
            content: def.text.clone(),
            font_path: def.font.clone(),
            font_size: def.font_size,
            color: def.color,
            visible: true,
        },
    );
    world.add_component(id, EntityKind::Hud(element));
    Some(id)
}
