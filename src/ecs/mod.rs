//! Minimal entity-component store
//!
//! Entities are opaque ids, components are plain data, and every component
//! kind lives in its own typed sparse map inside [`World`]. The component set
//! is closed and known at compile time, so there is no runtime type registry.

pub mod entity;
pub mod storage;
pub mod world;

pub use entity::{EntityAllocator, EntityId};
pub use storage::ComponentStorage;
pub use world::{Component, World};
