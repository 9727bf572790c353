use std::fmt;

use crate::{EcsError, EntityGroup, Query, World};

/// Identifies a system registered in a [`World`].
///
/// Returned by [`World::add_system`] and used to remove the system later,
/// including from its own [`System::after_all`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub(crate) u64);

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit of behavior run by the [`World`] on every tick.
///
/// Each tick the world evaluates the system's [`queries`](System::queries)
/// and hands the resulting groups to [`run`](System::run), in the order the
/// queries were declared. Once every system of the tick has run, the world
/// calls [`after_all`](System::after_all) on each of them.
///
/// `run` may be invoked several times in one tick when the world is
/// configured with a chunk size; each call then receives one chunk of every
/// group.
///
/// # Example
/// ```
/// use orrery_ecs::{Component, EcsError, EntityGroup, Query, System, World};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Name(String);
/// impl Component for Name {}
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct CanvasLabel { text: String }
/// impl Component for CanvasLabel {}
///
/// struct CanvasLabelAdder;
///
/// impl System for CanvasLabelAdder {
///     fn queries(&self) -> Vec<Query> {
///         vec![Query::new().all::<Name>().none::<CanvasLabel>()]
///     }
///
///     fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
///         groups[0]
///             .with::<(Name,)>()
///             .add(world, |_, (name,)| CanvasLabel { text: name.0.clone() })?;
///         Ok(())
///     }
/// }
///
/// let mut world = World::new();
/// let sun = world.create_entity();
/// world.attach(sun, Name("Sun".into())).unwrap();
///
/// world.add_system(CanvasLabelAdder);
/// world.tick().unwrap();
///
/// assert_eq!(world.get::<CanvasLabel>(sun).unwrap().text, "Sun");
/// ```
pub trait System: 'static {
    /// The queries whose groups are handed to [`run`](System::run).
    fn queries(&self) -> Vec<Query>;

    /// Main system logic with mutable world access.
    ///
    /// `groups` holds one group per query, in declaration order.
    fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError>;

    /// Called once per tick after every system has run.
    ///
    /// `id` is this system's own id, so a system can unregister itself with
    /// `world.remove_system(id)`.
    fn after_all(&mut self, _world: &mut World, _id: SystemId) -> Result<(), EcsError> {
        Ok(())
    }

    /// Name used in log lines.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
