use std::any::{type_name, TypeId};
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use crate::{Component, ComponentStorage, EcsError, Entity, SparseComponentStorage, World};

/// The entities that matched a [`Query`](crate::Query) when it was evaluated.
///
/// A group lists entity ids only. Component data is always read from the
/// world at access time, so accessors observe every change made by earlier
/// systems. Entities destroyed after the group was evaluated are skipped by
/// every accessor; entities created afterwards are not part of the group.
///
/// # Example
/// ```
/// use orrery_ecs::{Component, Query, World};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Orbit { radius: f64, angle: f64 }
/// impl Component for Orbit {}
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct LocalPosition { x: f64, y: f64, z: f64 }
/// impl Component for LocalPosition {}
///
/// let mut world = World::new();
/// let earth = world.create_entity();
/// world.attach(earth, Orbit { radius: 2.0, angle: 0.0 }).unwrap();
/// world.attach(earth, LocalPosition { x: 0.0, y: 0.0, z: 1.0 }).unwrap();
///
/// let group = world.query(&Query::new().all::<Orbit>().all::<LocalPosition>());
/// group
///     .with::<(Orbit,)>()
///     .update(&mut world, |position: &mut LocalPosition, _entity, (orbit,)| {
///         position.x = orbit.radius * orbit.angle.cos();
///         position.y = orbit.radius * orbit.angle.sin();
///     })
///     .unwrap();
///
/// assert_eq!(world.get::<LocalPosition>(earth).unwrap().x, 2.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityGroup {
    entities: Vec<Entity>,
}

impl EntityGroup {
    pub(crate) fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// The member entities, in ascending index order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.binary_search(&entity).is_ok()
    }

    /// Declares the read-only input components of an accessor.
    ///
    /// `I` is a tuple of zero to four component types. The callbacks of the
    /// returned [`GroupIter`] receive one reference per declared type, in the
    /// same order.
    pub fn with<I: ComponentTuple>(&self) -> GroupIter<'_, I> {
        GroupIter {
            group: self,
            _inputs: PhantomData,
        }
    }

    /// Updates the `O` component of every member, without inputs.
    pub fn update<O, F>(&self, world: &mut World, mut f: F) -> Result<(), EcsError>
    where
        O: Component,
        F: FnMut(&mut O, Entity),
    {
        self.with::<()>()
            .update(world, |output: &mut O, entity, ()| f(output, entity))
    }

    /// Detaches `K` from every member. Returns how many components were
    /// removed.
    pub fn remove<K: Component>(&self, world: &mut World) -> usize {
        let removed = self
            .live(world)
            .into_iter()
            .filter(|&entity| matches!(world.detach::<K>(entity), Ok(Some(_))))
            .count();
        log::trace!("removed {} `{}` components", removed, type_name::<K>());
        removed
    }

    /// Members that are still alive.
    fn live(&self, world: &World) -> Vec<Entity> {
        self.iter().filter(|&entity| world.is_alive(entity)).collect()
    }

    /// Splits the group into `size`-entity chunks, or returns it whole when
    /// no chunk size is given.
    pub(crate) fn chunks(&self, size: Option<usize>) -> Vec<EntityGroup> {
        match size {
            Some(size) if size > 0 && self.len() > size => self
                .entities
                .chunks(size)
                .map(|chunk| EntityGroup::new(chunk.to_vec()))
                .collect(),
            _ => vec![self.clone()],
        }
    }
}

/// A tuple of component types read by a [`GroupIter`].
///
/// Implemented for `()` and tuples of up to four [`Component`] types.
pub trait ComponentTuple {
    /// Type ids and names of the tuple members, in order.
    fn members() -> Vec<(TypeId, &'static str)>;
}

/// A group accessor bound to a set of read-only input components `I`.
///
/// Created by [`EntityGroup::with`].
pub struct GroupIter<'g, I> {
    group: &'g EntityGroup,
    _inputs: PhantomData<fn() -> I>,
}

impl<I: ComponentTuple> GroupIter<'_, I> {
    fn check_aliasing<O: Component>() -> Result<(), EcsError> {
        let output = TypeId::of::<O>();
        if I::members().iter().any(|(input, _)| *input == output) {
            return Err(EcsError::AliasedAccess {
                component: type_name::<O>(),
            });
        }
        Ok(())
    }
}

fn missing<T: Component>(entity: Entity) -> EcsError {
    EcsError::MissingComponent {
        entity,
        component: type_name::<T>(),
    }
}

macro_rules! impl_group_access {
    ($($name:ident),*) => {
        impl<$($name: Component),*> ComponentTuple for ($($name,)*) {
            fn members() -> Vec<(TypeId, &'static str)> {
                vec![$((TypeId::of::<$name>(), type_name::<$name>())),*]
            }
        }

        impl<'g, $($name: Component),*> GroupIter<'g, ($($name,)*)> {
            /// Calls `f` once per member with its `O` component and the
            /// declared inputs. `f` may mutate the output in place.
            ///
            /// Fails before calling `f` at all if a member lacks `O` or an
            /// input, or if `O` is also one of the inputs.
            #[allow(non_snake_case, unreachable_patterns, unused_variables)]
            pub fn update<O, F>(&self, world: &mut World, mut f: F) -> Result<(), EcsError>
            where
                O: Component,
                F: FnMut(&mut O, Entity, ($(&$name,)*)),
            {
                Self::check_aliasing::<O>()?;

                let members = self.group.live(world);
                for &entity in &members {
                    if !world.has::<O>(entity) {
                        return Err(missing::<O>(entity));
                    }
                    $(
                        if !world.has::<$name>(entity) {
                            return Err(missing::<$name>(entity));
                        }
                    )*
                }

                let Some((kind, mut table)) = world.registry_mut().lend::<O>() else {
                    // O was never registered, so `members` is empty
                    return Ok(());
                };

                // the table goes back even if `f` panics
                let view: &World = world;
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    let Some(outputs) = table
                        .as_any_mut()
                        .downcast_mut::<SparseComponentStorage<O>>()
                    else {
                        return;
                    };
                    for &entity in &members {
                        let Some(output) = outputs.get_mut(entity) else {
                            continue;
                        };
                        let inputs = match ($(view.get::<$name>(entity),)*) {
                            ($(Some($name),)*) => ($($name,)*),
                            _ => continue,
                        };
                        f(output, entity, inputs);
                    }
                }));

                world.registry_mut().give_back(kind, table);
                if let Err(payload) = outcome {
                    panic::resume_unwind(payload);
                }
                log::trace!("updated `{}` on {} entities", type_name::<O>(), members.len());
                Ok(())
            }

            /// Attaches a new `N` computed by `f` to every member that does
            /// not hold one yet. Returns how many components were added.
            #[allow(non_snake_case, unreachable_patterns, unused_variables)]
            pub fn add<N, F>(&self, world: &mut World, mut f: F) -> Result<usize, EcsError>
            where
                N: Component,
                F: FnMut(Entity, ($(&$name,)*)) -> N,
            {
                let targets: Vec<Entity> = self
                    .group
                    .live(world)
                    .into_iter()
                    .filter(|&entity| !world.has::<N>(entity))
                    .collect();

                for &entity in &targets {
                    $(
                        if !world.has::<$name>(entity) {
                            return Err(missing::<$name>(entity));
                        }
                    )*
                }

                let mut created = Vec::with_capacity(targets.len());
                for &entity in &targets {
                    let inputs = match ($(world.get::<$name>(entity),)*) {
                        ($(Some($name),)*) => ($($name,)*),
                        _ => continue,
                    };
                    created.push((entity, f(entity, inputs)));
                }

                let added = created.len();
                for (entity, component) in created {
                    world.attach(entity, component)?;
                }
                log::trace!("added `{}` to {} entities", type_name::<N>(), added);
                Ok(added)
            }
        }
    };
}

impl_group_access!();
impl_group_access!(A);
impl_group_access!(A, B);
impl_group_access!(A, B, C);
impl_group_access!(A, B, C, D);
