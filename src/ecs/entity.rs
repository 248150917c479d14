//! Entity identifiers
//!
//! Ids are issued monotonically and never reused for the lifetime of the
//! process, so a stale id can never alias a newer entity.

use std::collections::BTreeSet;
use std::fmt;

/// Opaque entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    /// Raw numeric value (for logging and draw requests).
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues entity ids and tracks which ones are alive.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
    alive: BTreeSet<EntityId>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            alive: BTreeSet::new(),
        }
    }

    /// Allocate a fresh id.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.alive.insert(id);
        id
    }

    /// Mark an id as dead. Returns false if it was not alive (already freed
    /// or never issued).
    pub fn free(&mut self, id: EntityId) -> bool {
        self.alive.remove(&id)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.alive.contains(&id)
    }

    /// Number of currently alive entities.
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    /// Alive ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive.iter().copied()
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
