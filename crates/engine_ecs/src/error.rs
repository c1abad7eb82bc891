//! ECS error types.

use crate::entity::Entity;

/// Errors returned by [`World`](crate::World) and the tables it owns.
///
/// Every variant signals a mistake in the calling code. The world never
/// retries and never leaves a partial update behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// No table exists for the requested component type.
    #[error("component type `{0}` is not registered")]
    ComponentTypeNotRegistered(&'static str),

    /// A type-erased table received a value of the wrong dynamic type.
    #[error("type mismatch at erased table boundary: expected `{expected}`")]
    TypeMismatch {
        /// The type the table stores.
        expected: &'static str,
    },

    /// The entity has no value in the table of the requested type.
    #[error("{entity} has no `{component}` component")]
    ComponentNotFound {
        /// The entity that was looked up.
        entity: Entity,
        /// The requested component type.
        component: &'static str,
    },

    /// The entity was never created by this world or has been destroyed.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// A view listed the same component type more than once.
    #[error("component type `{0}` appears more than once in a view")]
    DuplicateViewComponent(&'static str),
}
