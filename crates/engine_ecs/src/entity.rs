//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data.
//! Each [`World`](crate::World) owns its own [`EntityAllocator`], so ids are
//! unique within that world and independent worlds never share counter
//! state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A unique entity identifier.
///
/// Entities are pure identifiers: they carry no data of their own. Components
/// are attached to entities to give them meaning.
///
/// Equality and hashing use only the numeric id. A debug label, when one was
/// given at creation, lives in the allocator and never affects identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / invalid entity sentinel. Never issued by an allocator.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity IDs and tracks which of them
/// are alive.
///
/// Freed ids are never recycled, not even after [`EntityAllocator::clear`]:
/// a stale handle to a destroyed entity can never alias a newer one.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
    /// Live entities, each with its optional debug label.
    live: HashMap<Entity, Option<String>>,
}

impl EntityAllocator {
    /// Creates a new allocator. IDs start at 1 (0 is reserved for [`Entity::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            live: HashMap::new(),
        }
    }

    /// Allocates a fresh entity ID and marks it live.
    pub fn create(&mut self) -> Entity {
        self.insert(None)
    }

    /// Allocates a fresh entity ID carrying a human-readable debug label.
    pub fn create_named(&mut self, label: impl Into<String>) -> Entity {
        self.insert(Some(label.into()))
    }

    fn insert(&mut self, label: Option<String>) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        self.live.insert(entity, label);
        entity
    }

    /// Removes `entity` from the live set.
    ///
    /// Destroying an entity that is not alive is a no-op. Returns `true` if
    /// the entity was alive.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        self.live.remove(&entity).is_some()
    }

    /// Returns `true` if `entity` was issued by this allocator and has not
    /// been destroyed since.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.live.contains_key(&entity)
    }

    /// Returns the debug label given to `entity` at creation, if any.
    #[must_use]
    pub fn label(&self, entity: Entity) -> Option<&str> {
        self.live.get(&entity)?.as_deref()
    }

    /// Returns the number of currently live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns `true` if no entity is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Returns the number of ids issued so far, live or not.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next_id - 1
    }

    /// Returns all live entities in ascending id order.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        let mut all: Vec<Entity> = self.live.keys().copied().collect();
        all.sort();
        all
    }

    /// Drops every live entity. The id counter is left untouched.
    pub fn clear(&mut self) {
        self.live.clear();
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
