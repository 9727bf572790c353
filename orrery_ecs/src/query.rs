use std::any::TypeId;

use crate::{AnyStorage, Component, Entity, World};

/// A filter over component kinds.
///
/// An entity matches a query when it holds every kind listed with
/// [`all`](Query::all), none of the kinds listed with [`none`](Query::none),
/// and, if any kinds were listed with [`any`](Query::any), at least one of
/// those.
///
/// # Example
/// ```
/// use orrery_ecs::{Component, Query, World};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Name(String);
/// impl Component for Name {}
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct CanvasLabel(String);
/// impl Component for CanvasLabel {}
///
/// let mut world = World::new();
/// let sun = world.create_entity();
/// world.attach(sun, Name("Sun".into())).unwrap();
///
/// let unlabeled = Query::new().all::<Name>().none::<CanvasLabel>();
/// assert_eq!(world.query(&unlabeled).entities(), &[sun]);
///
/// world.attach(sun, CanvasLabel("Sun".into())).unwrap();
/// assert!(world.query(&unlabeled).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    all: Vec<Term>,
    any: Vec<Term>,
    none: Vec<Term>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Term {
    type_id: TypeId,
    name: &'static str,
}

impl Term {
    fn of<T: Component>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

fn push_unique(terms: &mut Vec<Term>, term: Term) {
    if !terms.contains(&term) {
        terms.push(term);
    }
}

impl Query {
    /// Creates a query that matches every live entity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires matching entities to hold a `T`.
    pub fn all<T: Component>(mut self) -> Self {
        push_unique(&mut self.all, Term::of::<T>());
        self
    }

    /// Requires matching entities to hold at least one of the kinds passed to
    /// `any`.
    pub fn any<T: Component>(mut self) -> Self {
        push_unique(&mut self.any, Term::of::<T>());
        self
    }

    /// Excludes entities holding a `T`.
    pub fn none<T: Component>(mut self) -> Self {
        push_unique(&mut self.none, Term::of::<T>());
        self
    }

    /// Type names of the `all` kinds, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.all.iter().map(|term| term.name)
    }

    /// Type names of the `none` kinds, in declaration order.
    pub fn excluded(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.none.iter().map(|term| term.name)
    }

    /// Checks a single entity against the query.
    pub fn matches(&self, world: &World, entity: Entity) -> bool {
        world.is_alive(entity) && self.resolve(world).is_some_and(|r| r.accepts(entity))
    }

    /// Returns the live entities matching the query, in ascending index
    /// order.
    pub(crate) fn matching_entities(&self, world: &World) -> Vec<Entity> {
        let Some(resolved) = self.resolve(world) else {
            return Vec::new();
        };

        // Component-first: walk the smallest required table instead of every
        // live entity.
        match resolved.all.iter().min_by_key(|storage| storage.len()) {
            Some(smallest) => smallest
                .slots()
                .into_iter()
                .filter_map(|slot| world.entity_at(slot))
                .filter(|&entity| resolved.accepts(entity))
                .collect(),
            None => world
                .entities()
                .filter(|&entity| resolved.accepts(entity))
                .collect(),
        }
    }

    /// Looks up the tables of every term. Returns `None` when the query can
    /// never match, i.e. an `all` kind or every `any` kind is unknown to the
    /// world.
    fn resolve<'w>(&self, world: &'w World) -> Option<Resolved<'w>> {
        let registry = world.registry();
        let lookup = |term: &Term| {
            registry
                .kind_of_type_id(term.type_id)
                .and_then(|kind| registry.erased(kind))
        };

        let all = self.all.iter().map(lookup).collect::<Option<Vec<_>>>()?;
        let any: Vec<_> = self.any.iter().filter_map(lookup).collect();
        if !self.any.is_empty() && any.is_empty() {
            return None;
        }
        let none = self.none.iter().filter_map(lookup).collect();

        Some(Resolved { all, any, none })
    }
}

struct Resolved<'w> {
    all: Vec<&'w dyn AnyStorage>,
    any: Vec<&'w dyn AnyStorage>,
    none: Vec<&'w dyn AnyStorage>,
}

impl Resolved<'_> {
    fn accepts(&self, entity: Entity) -> bool {
        self.all.iter().all(|storage| storage.contains(entity))
            && (self.any.is_empty() || self.any.iter().any(|storage| storage.contains(entity)))
            && !self.none.iter().any(|storage| storage.contains(entity))
    }
}
