use thiserror::Error;

use crate::{Entity, SystemId};

/// Errors that can occur during world, group and scheduler operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The entity was never created in this world, or has been destroyed.
    #[error("entity {0} not found")]
    EntityNotFound(Entity),

    /// An entity in a group lacks a component the accessor requires.
    ///
    /// This indicates a query that does not list the component in `all`.
    #[error("entity {entity} has no `{component}` component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    /// The output component of an `update` was also declared as an input.
    #[error("`{component}` is declared both as input and output")]
    AliasedAccess { component: &'static str },

    /// No system with this id is registered in the world.
    #[error("system {0} not found")]
    SystemNotFound(SystemId),

    /// `tick` was called from inside a running tick.
    #[error("a tick is already in progress")]
    TickInProgress,
}
