//! World: the aggregate of all component storages
//!
//! Storages are typed fields rather than a `HashMap<TypeId, Box<dyn Any>>`.
//! Systems borrow disjoint fields directly (`world.transforms` mutably while
//! reading `world.velocities`), and the [`Component`] trait gives generic
//! access where a caller only knows the type.
//!
//! Structural rule: never remove entities from a storage while iterating that
//! same storage. Collect the victims, finish the pass, then call
//! [`World::remove_entities`]. The borrow checker enforces this for the typed
//! fields.

use super::entity::{EntityAllocator, EntityId};
use super::storage::ComponentStorage;
use crate::components::*;

/// A component kind stored in the [`World`].
pub trait Component: Sized + 'static {
    fn storage(world: &World) -> &ComponentStorage<Self>;
    fn storage_mut(world: &mut World) -> &mut ComponentStorage<Self>;
}

macro_rules! world_storages {
    ($($(#[$doc:meta])* $field:ident: $ty:ty),* $(,)?) => {
        /// All entities and their components.
        #[derive(Debug, Default)]
        pub struct World {
            entities: EntityAllocator,
            $($(#[$doc])* pub $field: ComponentStorage<$ty>,)*
        }

        impl World {
            /// Remove every component of `entity`, across every storage.
            /// Idempotent: returns false if the entity was already gone.
            pub fn remove_entity(&mut self, entity: EntityId) -> bool {
                let was_alive = self.entities.free(entity);
                $(self.$field.remove(entity);)*
                was_alive
            }
        }

        $(impl Component for $ty {
            fn storage(world: &World) -> &ComponentStorage<Self> {
                &world.$field
            }

            fn storage_mut(world: &mut World) -> &mut ComponentStorage<Self> {
                &mut world.$field
            }
        })*
    };
}

world_storages! {
    transforms: Transform,
    velocities: Velocity,
    speeds: Speed,
    colliders: Collider,
    sprites: Sprite,
    animations: Animation,
    facings: Facing,
    /// Presentation dispatch label
    kinds: EntityKind,
    player_tags: PlayerTag,
    obstacle_tags: ObstacleTag,
    ui_positions: UiPosition,
    ui_texts: UiText,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new entity id. The entity starts with no components.
    pub fn create_entity(&mut self) -> EntityId {
        self.entities.allocate()
    }

    /// Attach (or overwrite) a component. Ignored for ids that were already
    /// removed, so a late write can never resurrect an orphaned component.
    pub fn add_component<T: Component>(&mut self, entity: EntityId, component: T) {
        if !self.entities.is_alive(entity) {
            log::warn!("Ignoring component write to removed entity {}", entity);
            return;
        }
        T::storage_mut(self).insert(entity, component);
    }

    pub fn get_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        T::storage(self).get(entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        T::storage_mut(self).get_mut(entity)
    }

    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        T::storage(self).contains(entity)
    }

    /// Live view of every component of type `T`.
    pub fn all_of<T: Component>(&self) -> &ComponentStorage<T> {
        T::storage(self)
    }

    /// Mutable live view of every component of type `T`.
    pub fn all_of_mut<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        T::storage_mut(self)
    }

    /// Remove a batch of entities collected during an earlier pass.
    /// Returns how many were actually alive.
    pub fn remove_entities<I>(&mut self, entities: I) -> usize
    where
        I: IntoIterator<Item = EntityId>,
    {
        entities
            .into_iter()
            .filter(|&entity| self.remove_entity(entity))
            .count()
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_get_missing_component_is_none() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Speed(3.0));

        assert!(world.get_component::<Velocity>(e).is_none());
        assert_eq!(world.get_component::<Speed>(e), Some(&Speed(3.0)));
    }

    #[test]
    fn test_add_component_upserts() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Speed(1.0));
        world.add_component(e, Speed(2.0));

        assert_eq!(world.all_of::<Speed>().len(), 1);
        assert_eq!(world.speeds.get(e), Some(&Speed(2.0)));
    }

    #[test]
    fn test_remove_entity_clears_every_storage() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Transform::at(Vec2::new(1.0, 2.0)));
        world.add_component(e, Velocity(Vec2::X));
        world.add_component(e, Speed(10.0));
        world.add_component(e, ObstacleTag);
        world.add_component(e, Facing::Vertical);

        let other = world.create_entity();
        world.add_component(other, Speed(5.0));

        assert!(world.remove_entity(e));
        assert!(!world.transforms.contains(e));
        assert!(!world.velocities.contains(e));
        assert!(!world.speeds.contains(e));
        assert!(!world.obstacle_tags.contains(e));
        assert!(!world.facings.contains(e));
        assert!(world.speeds.contains(other));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_remove_entity_twice_is_noop() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, PlayerTag);

        assert!(world.remove_entity(e));
        assert!(!world.remove_entity(e));
        assert!(world.player_tags.is_empty());
    }

    #[test]
    fn test_write_after_remove_is_ignored() {
        let mut world = World::new();
        let e = world.create_entity();
        world.remove_entity(e);
        world.add_component(e, Speed(1.0));

        assert!(world.speeds.is_empty());
    }

    #[test]
    fn test_collect_then_remove_during_scan() {
        let mut world = World::new();
        for i in 0..6 {
            let e = world.create_entity();
            world.add_component(e, ObstacleTag);
            world.add_component(e, Speed(i as f32));
        }

        // Scan one storage, remove from all of them afterwards
        let victims: Vec<_> = world
            .speeds
            .iter()
            .filter(|(_, s)| s.0 >= 3.0)
            .map(|(id, _)| id)
            .collect();
        let removed = world.remove_entities(victims);

        assert_eq!(removed, 3);
        assert_eq!(world.obstacle_tags.len(), 3);
        assert!(world.speeds.iter().all(|(_, s)| s.0 < 3.0));
    }
}
