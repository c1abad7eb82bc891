//! World configuration.

use serde::Deserialize;

/// How a [`World`](crate::World) reacts to a component type it has no table
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationPolicy {
    /// Every component type must be registered with
    /// [`World::register_component`](crate::World::register_component)
    /// before use. Adding an unregistered type fails.
    #[default]
    Strict,
    /// Adding a component creates its table on first use. Reads, removals
    /// and views on a type that was never added still fail.
    Lazy,
}

/// Configuration for a [`World`](crate::World).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Table creation policy, fixed for the lifetime of the world.
    pub registration: RegistrationPolicy,
}

impl WorldConfig {
    /// A world that requires explicit registration.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            registration: RegistrationPolicy::Strict,
        }
    }

    /// A world that creates tables on first insertion.
    #[must_use]
    pub fn lazy() -> Self {
        Self {
            registration: RegistrationPolicy::Lazy,
        }
    }
}
