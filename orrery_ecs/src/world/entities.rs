use crate::{EcsError, Entity};

use super::World;

impl World {
    /// Creates a new entity with no components.
    ///
    /// # Example
    /// ```
    /// use orrery_ecs::World;
    ///
    /// let mut world = World::new();
    /// let sun = world.create_entity();
    ///
    /// assert!(world.is_alive(sun));
    /// assert_eq!(world.entity_count(), 1);
    /// ```
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        log::trace!("created entity {}", entity);
        entity
    }

    /// Destroys an entity and drops every component attached to it.
    ///
    /// The entity disappears from every group evaluated afterwards. Its slot
    /// may be reused by a later [`create_entity`](World::create_entity), but
    /// under a new generation, so the old handle stays invalid.
    ///
    /// # Errors
    /// [`EcsError::EntityNotFound`] if the entity is unknown or was already
    /// destroyed.
    ///
    /// # Example
    /// ```
    /// use orrery_ecs::{EcsError, World};
    ///
    /// let mut world = World::new();
    /// let comet = world.create_entity();
    ///
    /// assert!(world.destroy_entity(comet).is_ok());
    /// assert_eq!(world.destroy_entity(comet), Err(EcsError::EntityNotFound(comet)));
    /// ```
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        if !self.allocator.is_alive(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }

        // clear the slot before it can be handed out again
        let dropped = self.registry.remove_entity(entity);
        self.allocator.deallocate(entity);
        log::debug!("destroyed entity {} ({} components)", entity, dropped);
        Ok(())
    }

    /// Returns `true` if the entity was created by this world and not yet
    /// destroyed.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Iterates over live entities in ascending index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.allocator.iter()
    }

    pub fn entity_count(&self) -> usize {
        self.allocator.len()
    }

    pub(crate) fn entity_at(&self, index: u32) -> Option<Entity> {
        self.allocator.entity_at(index)
    }
}
