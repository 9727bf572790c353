use crate::entity::EntityAllocator;
use crate::registry::ComponentRegistry;

mod components;
mod entities;
mod scheduler;

use scheduler::Schedule;

/// Tuning knobs for a [`World`].
///
/// # Example
/// ```
/// use orrery_ecs::{World, WorldConfig};
///
/// let world = World::with_config(WorldConfig::new().chunk_size(256));
/// assert_eq!(world.config().chunk_size, Some(256));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldConfig {
    /// When set, groups larger than this are split and each system's `run`
    /// is invoked once per chunk. `Some(0)` behaves like `None`.
    pub chunk_size: Option<usize>,
}

impl WorldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }
}

/// The central container that owns entities, their components and the
/// active systems.
///
/// # Example
/// ```
/// use orrery_ecs::{World, Component};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct LocalPosition { x: f64, y: f64, z: f64 }
/// impl Component for LocalPosition {}
///
/// let mut world = World::new();
/// let entity = world.create_entity();
///
/// world.attach(entity, LocalPosition { x: 10.0, y: 20.0, z: 0.0 }).unwrap();
/// assert!(world.has::<LocalPosition>(entity));
///
/// world.destroy_entity(entity).unwrap();
/// assert!(!world.has::<LocalPosition>(entity));
/// ```
pub struct World {
    allocator: EntityAllocator,
    registry: ComponentRegistry,
    schedule: Schedule,
    config: WorldConfig,
}

impl World {
    /// Creates a new empty World with the default configuration.
    ///
    /// # Example
    /// ```
    /// use orrery_ecs::World;
    ///
    /// let world = World::new();
    /// assert_eq!(world.entity_count(), 0);
    /// assert_eq!(world.system_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            allocator: EntityAllocator::new(),
            registry: ComponentRegistry::new(),
            schedule: Schedule::new(),
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
