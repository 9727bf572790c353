use std::any::Any;
use std::fmt;

use crate::Entity;

/// A marker trait for component types in the ECS system.
///
/// Components are plain data records that describe one aspect of an entity,
/// such as its name, its orbit or its position.
///
/// # Examples
///
/// ```
/// use orrery_ecs::Component;
///
/// #[derive(Debug, Clone)]
/// struct Orbit {
///     radius: f64,
///     period: f64,
/// }
///
/// impl Component for Orbit {}
/// ```
pub trait Component: 'static {}

/// The stable tag a world assigns to a component type.
///
/// Tags are handed out in registration order, starting at zero, and are the
/// key of the per-kind storage tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKind(pub(crate) u32);

impl ComponentKind {
    /// Returns the raw tag value.
    pub fn id(self) -> u32 {
        self.0
    }

    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A storage table for components of a single kind.
///
/// # Examples
///
/// ```
/// use orrery_ecs::{Component, ComponentStorage, SparseComponentStorage, World};
///
/// #[derive(Debug, PartialEq, Clone)]
/// struct Name(String);
/// impl Component for Name {}
///
/// let mut world = World::new();
/// let sun = world.create_entity();
///
/// let mut storage = SparseComponentStorage::<Name>::new();
/// assert_eq!(storage.insert(sun, Name("Sun".into())), None);
/// assert_eq!(storage.get(sun), Some(&Name("Sun".into())));
/// ```
pub trait ComponentStorage<T: Component> {
    /// Inserts a component for an entity, returning the one it replaced.
    fn insert(&mut self, entity: Entity, component: T) -> Option<T>;

    /// Removes a component for an entity, returning it if it existed.
    fn remove(&mut self, entity: Entity) -> Option<T>;

    /// Gets a reference to the component of an entity.
    fn get(&self, entity: Entity) -> Option<&T>;

    /// Gets a mutable reference to the component of an entity.
    fn get_mut(&mut self, entity: Entity) -> Option<&mut T>;
}

/// A sparse table of components indexed by entity slot.
///
/// Slot `i` holds the component of the live entity whose index is `i`, if
/// any. The world guarantees a slot is emptied before its index is reused,
/// so the table itself does not track generations.
pub struct SparseComponentStorage<T: Component> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T: Component> SparseComponentStorage<T> {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    /// Iterates over the stored components in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, component)| component.as_ref().map(|c| (slot as u32, c)))
    }
}

impl<T: Component> Default for SparseComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage<T> for SparseComponentStorage<T> {
    fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        let slot = entity.index() as usize;
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }

        let previous = self.slots[slot].replace(component);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        let removed = self
            .slots
            .get_mut(entity.index() as usize)
            .and_then(Option::take);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        self.slots
            .get(entity.index() as usize)
            .and_then(Option::as_ref)
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots
            .get_mut(entity.index() as usize)
            .and_then(Option::as_mut)
    }
}

/// Type-erased view over a component table, used by the registry to hold
/// tables of every kind side by side.
pub trait AnyStorage {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Drops the component stored for `entity`, if any.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn contains(&self, entity: Entity) -> bool;

    /// Number of entities holding this kind.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot indices holding this kind, ascending.
    fn slots(&self) -> Vec<u32>;

    fn component_type_name(&self) -> &'static str;
}

impl<T: Component> AnyStorage for SparseComponentStorage<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn slots(&self) -> Vec<u32> {
        self.iter().map(|(slot, _)| slot).collect()
    }

    fn component_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
