//! Sparse per-type component storage
//!
//! One `ComponentStorage<T>` per component kind. Backed by a `BTreeMap` so
//! iteration is always in ascending entity id order, which keeps every system
//! pass deterministic.

use std::collections::BTreeMap;

use super::entity::EntityId;

/// Mapping from entity id to a component value. Absence of a key means the
/// entity does not have this component.
#[derive(Debug, Clone)]
pub struct ComponentStorage<T> {
    data: BTreeMap<EntityId, T>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    /// Insert or overwrite. Returns the previous value, if any.
    pub fn insert(&mut self, entity: EntityId, component: T) -> Option<T> {
        self.data.insert(entity, component)
    }

    /// Remove an entity's component. Removing a missing entry is a no-op.
    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        self.data.remove(&entity)
    }

    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.data.get(&entity)
    }

    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.data.get_mut(&entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.data.contains_key(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.data.iter().map(|(id, c)| (*id, c))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.data.iter_mut().map(|(id, c)| (*id, c))
    }

    /// Snapshot of the ids currently present.
    ///
    /// Use this when a pass needs to remove entities from the same storage it
    /// scans: collect first, then remove after the scan.
    pub fn ids(&self) -> Vec<EntityId> {
        self.data.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
