pub mod component;
pub mod entity;
pub mod error;
pub mod group;
pub mod query;
mod registry;
pub mod system;
pub mod world;

// Re-export commonly used types
pub use component::{AnyStorage, Component, ComponentKind, ComponentStorage, SparseComponentStorage};
pub use entity::Entity;
pub use error::EcsError;
pub use group::{ComponentTuple, EntityGroup, GroupIter};
pub use query::Query;
pub use system::{System, SystemId};
pub use world::{World, WorldConfig};
