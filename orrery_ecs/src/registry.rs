use std::any::TypeId;
use std::collections::HashMap;

use crate::{AnyStorage, Component, ComponentKind, Entity, SparseComponentStorage};

/// Maps component types to their kind tag and their storage table.
///
/// The registry is the only place that looks at `TypeId`: once a type has a
/// [`ComponentKind`], every table lookup goes through the tag.
pub(crate) struct ComponentRegistry {
    kinds: HashMap<TypeId, ComponentKind>,
    names: Vec<&'static str>,
    // `None` while a table is lent out to an `update`
    storages: Vec<Option<Box<dyn AnyStorage>>>,
}

impl ComponentRegistry {
    pub(crate) fn new() -> Self {
        Self {
            kinds: HashMap::new(),
            names: Vec::new(),
            storages: Vec::new(),
        }
    }

    pub(crate) fn register<T: Component>(&mut self) -> ComponentKind {
        if let Some(kind) = self.kinds.get(&TypeId::of::<T>()) {
            return *kind;
        }

        let kind = ComponentKind(self.storages.len() as u32);
        let name = std::any::type_name::<T>();
        self.kinds.insert(TypeId::of::<T>(), kind);
        self.names.push(name);
        self.storages
            .push(Some(Box::new(SparseComponentStorage::<T>::new())));
        log::trace!("registered component {} as kind {}", name, kind);
        kind
    }

    pub(crate) fn kind_of<T: Component>(&self) -> Option<ComponentKind> {
        self.kind_of_type_id(TypeId::of::<T>())
    }

    pub(crate) fn kind_of_type_id(&self, type_id: TypeId) -> Option<ComponentKind> {
        self.kinds.get(&type_id).copied()
    }

    pub(crate) fn name(&self, kind: ComponentKind) -> Option<&'static str> {
        self.names.get(kind.slot()).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.storages.len()
    }

    pub(crate) fn erased(&self, kind: ComponentKind) -> Option<&dyn AnyStorage> {
        self.storages.get(kind.slot())?.as_deref()
    }

    pub(crate) fn storage<T: Component>(&self) -> Option<&SparseComponentStorage<T>> {
        let kind = self.kind_of::<T>()?;
        self.erased(kind)?
            .as_any()
            .downcast_ref::<SparseComponentStorage<T>>()
    }

    /// Returns the table for `T`, registering the kind if needed.
    ///
    /// Returns `None` only while the table is lent out.
    pub(crate) fn storage_mut<T: Component>(&mut self) -> Option<&mut SparseComponentStorage<T>> {
        let kind = self.register::<T>();
        self.storages[kind.slot()]
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<SparseComponentStorage<T>>()
    }

    /// Like [`storage_mut`](Self::storage_mut) but never registers `T`.
    pub(crate) fn existing_storage_mut<T: Component>(
        &mut self,
    ) -> Option<&mut SparseComponentStorage<T>> {
        let kind = self.kind_of::<T>()?;
        self.storages[kind.slot()]
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<SparseComponentStorage<T>>()
    }

    /// Takes the table for `T` out of the registry so it can be mutated while
    /// the other tables are read.
    pub(crate) fn lend<T: Component>(&mut self) -> Option<(ComponentKind, Box<dyn AnyStorage>)> {
        let kind = self.kind_of::<T>()?;
        let storage = self.storages[kind.slot()].take()?;
        Some((kind, storage))
    }

    pub(crate) fn give_back(&mut self, kind: ComponentKind, storage: Box<dyn AnyStorage>) {
        self.storages[kind.slot()] = Some(storage);
    }

    /// Drops every component held by `entity`. Returns how many were dropped.
    pub(crate) fn remove_entity(&mut self, entity: Entity) -> usize {
        self.storages
            .iter_mut()
            .flatten()
            .filter_map(|storage| storage.remove_entity(entity).then_some(()))
            .count()
    }
}
