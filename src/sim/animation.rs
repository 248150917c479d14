//! Sprite frame animation

use crate::ecs::World;

/// Advance frame counters. Overshoot past a frame boundary is discarded.
pub fn tick_animations(world: &mut World, dt: f32) {
    for (id, animation) in world.animations.iter_mut() {
        let Some(sprite) = world.sprites.get(id) else {
            continue;
        };
        if !sprite.is_animating() {
            continue;
        }

        animation.timer += dt;
        if animation.timer >= sprite.frame_time {
            animation.current_frame = (animation.current_frame + 1) % sprite.frame_count;
            animation.timer = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Animation, Sprite};

    fn sprite(frame_count: u32, animated: bool) -> Sprite {
        Sprite {
            width: 10.0,
            height: 10.0,
            frame_count,
            frame_time: 0.2,
            animated,
            ..Default::default()
        }
    }

    #[test]
    fn test_advances_and_wraps() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, sprite(2, true));
        world.add_component(e, Animation::default());

        tick_animations(&mut world, 0.1);
        assert_eq!(world.animations.get(e).unwrap().current_frame, 0);
        tick_animations(&mut world, 0.1);
        assert_eq!(world.animations.get(e).unwrap().current_frame, 1);
        assert_eq!(world.animations.get(e).unwrap().timer, 0.0);
        tick_animations(&mut world, 0.25);
        assert_eq!(world.animations.get(e).unwrap().current_frame, 0);
    }

    #[test]
    fn test_overshoot_advances_one_frame() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, sprite(4, true));
        world.add_component(e, Animation::default());

        tick_animations(&mut world, 1.0);
        let animation = world.animations.get(e).unwrap();
        assert_eq!(animation.current_frame, 1);
        assert_eq!(animation.timer, 0.0);
    }

    #[test]
    fn test_static_sprites_hold_still() {
        let mut world = World::new();
        let single = world.create_entity();
        world.add_component(single, sprite(1, true));
        world.add_component(single, Animation::default());
        let off = world.create_entity();
        world.add_component(off, sprite(3, false));
        world.add_component(off, Animation::default());
        let bare = world.create_entity();
        world.add_component(bare, Animation::default());

        tick_animations(&mut world, 1.0);
        for e in [single, off, bare] {
            assert_eq!(world.animations.get(e), Some(&Animation::default()));
        }
    }
}
