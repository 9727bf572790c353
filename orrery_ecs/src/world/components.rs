use crate::registry::ComponentRegistry;
use crate::{Component, ComponentKind, ComponentStorage, EcsError, Entity, EntityGroup, Query};

use super::World;

impl World {
    /// Registers a component type and returns its kind tag.
    ///
    /// Registration happens implicitly on the first [`attach`](World::attach)
    /// of a type; calling this up front only fixes the tag order.
    ///
    /// # Example
    /// ```
    /// use orrery_ecs::{Component, World};
    ///
    /// struct Name(String);
    /// impl Component for Name {}
    ///
    /// let mut world = World::new();
    /// let kind = world.register::<Name>();
    ///
    /// assert_eq!(world.register::<Name>(), kind);
    /// assert_eq!(world.kind_of::<Name>(), Some(kind));
    /// ```
    pub fn register<T: Component>(&mut self) -> ComponentKind {
        self.registry.register::<T>()
    }

    /// Returns the kind tag of `T` if the world has seen it.
    pub fn kind_of<T: Component>(&self) -> Option<ComponentKind> {
        self.registry.kind_of::<T>()
    }

    /// Returns the type name registered under `kind`.
    pub fn component_name(&self, kind: ComponentKind) -> Option<&'static str> {
        self.registry.name(kind)
    }

    /// Number of registered component kinds.
    pub fn component_kind_count(&self) -> usize {
        self.registry.len()
    }

    /// Attaches a component to an entity, replacing and returning any
    /// component of the same kind it already held.
    ///
    /// # Errors
    /// [`EcsError::EntityNotFound`] if the entity is not alive.
    ///
    /// # Example
    /// ```
    /// use orrery_ecs::{Component, World};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Name(String);
    /// impl Component for Name {}
    ///
    /// let mut world = World::new();
    /// let planet = world.create_entity();
    ///
    /// assert_eq!(world.attach(planet, Name("Vulcan".into())), Ok(None));
    /// assert_eq!(
    ///     world.attach(planet, Name("Mercury".into())),
    ///     Ok(Some(Name("Vulcan".into())))
    /// );
    /// ```
    pub fn attach<T: Component>(&mut self, entity: Entity, component: T) -> Result<Option<T>, EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }

        match self.registry.storage_mut::<T>() {
            Some(storage) => Ok(storage.insert(entity, component)),
            // the table is lent out only inside an update, which never
            // hands the world to user code
            None => unreachable!("component table lent out during attach"),
        }
    }

    /// Detaches the `T` component of an entity, returning it if present.
    ///
    /// # Errors
    /// [`EcsError::EntityNotFound`] if the entity is not alive.
    pub fn detach<T: Component>(&mut self, entity: Entity) -> Result<Option<T>, EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }

        Ok(self
            .registry
            .existing_storage_mut::<T>()
            .and_then(|storage| storage.remove(entity)))
    }

    /// Gets the `T` component of an entity.
    ///
    /// Returns `None` if the entity is not alive or holds no `T`.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.is_alive(entity) {
            return None;
        }

        self.registry.storage::<T>()?.get(entity)
    }

    /// Gets the `T` component of an entity mutably.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }

        self.registry.existing_storage_mut::<T>()?.get_mut(entity)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Evaluates a query against the current state of the world.
    pub fn query(&self, query: &Query) -> EntityGroup {
        EntityGroup::new(query.matching_entities(self))
    }

    pub(crate) fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }
}
