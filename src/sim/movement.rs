//! Kinematic integration

use crate::ecs::World;

/// `position += velocity * speed * dt` for every entity that has all three.
pub fn integrate(world: &mut World, dt: f32) {
    for (id, transform) in world.transforms.iter_mut() {
        let (Some(velocity), Some(speed)) = (world.velocities.get(id), world.speeds.get(id)) else {
            continue;
        };
        transform.position += velocity.0 * speed.0 * dt;
    }
}
