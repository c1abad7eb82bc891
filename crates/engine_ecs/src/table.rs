//! Per-component-type storage.
//!
//! A [`ComponentTable<T>`] maps each [`Entity`] to at most one `T`. The world
//! keeps one table per component type behind the non-generic
//! [`ErasedTable`] interface, and recovers the typed table by downcasting
//! when a caller names `T`.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;

use crate::component::{Component, ComponentMeta};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;

/// Storage for every value of one component type, keyed by entity.
///
/// Iteration order is the hash map's order and is unspecified.
///
/// Values only enter a table through the [`World`](crate::World), which
/// checks that the entity is alive. Callers holding the table can read,
/// modify and remove values but cannot insert:
///
/// ```compile_fail
/// use engine_ecs::World;
///
/// #[derive(Debug)]
/// struct Score(u32);
///
/// let mut world = World::new();
/// world.register_component::<Score>();
/// let e = world.create_entity();
/// world.destroy_entity(e);
/// world.table_mut::<Score>().unwrap().add(e, Score(1));
/// ```
#[derive(Debug)]
pub struct ComponentTable<T> {
    rows: HashMap<Entity, T>,
}

impl<T: Component> ComponentTable<T> {
    /// Create a new, empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    /// Inserts or overwrites the value for `entity`, returning the previous
    /// value if there was one.
    pub(crate) fn add(&mut self, entity: Entity, value: T) -> Option<T> {
        self.rows.insert(entity, value)
    }

    /// Returns `true` if `entity` has a value in this table.
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.rows.contains_key(&entity)
    }

    /// Returns the value stored for `entity`, or `None` if it has none.
    /// Absent entries are never default-constructed.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.rows.get(&entity)
    }

    /// Mutable counterpart of [`ComponentTable::get`].
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.rows.get_mut(&entity)
    }

    /// Removes and returns the value for `entity`. Absent entries are a
    /// no-op.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.rows.remove(&entity)
    }

    /// Snapshot of every entity present in the table, in no particular
    /// order.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.rows.keys().copied().collect()
    }

    /// Applies `f` to every `(entity, value)` pair.
    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(Entity, &mut T),
    {
        for (&entity, value) in &mut self.rows {
            f(entity, value);
        }
    }

    /// Iterates over `(entity, &value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.rows.iter().map(|(&entity, value)| (entity, value))
    }

    /// Iterates over `(entity, &mut value)` pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.rows.iter_mut().map(|(&entity, value)| (entity, value))
    }

    /// Returns the number of entities with a value in this table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drops every value.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

impl<T: Component> Default for ComponentTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The type-erased face of a [`ComponentTable`], used by the world to store
/// tables of different component types side by side.
pub trait ErasedTable: Any {
    /// Metadata of the stored component type.
    fn meta(&self) -> ComponentMeta;

    /// Inserts a dynamically typed value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TypeMismatch`] if `value` is not of the table's
    /// component type. The table is left unchanged.
    fn insert_any(&mut self, entity: Entity, value: Box<dyn Any>) -> Result<(), EcsError>;

    /// Returns `true` if `entity` has a value in this table.
    fn contains(&self, entity: Entity) -> bool;

    /// Drops the value for `entity`, if any. Returns `true` if one was
    /// present.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Number of stored values.
    fn len(&self) -> usize;

    /// Drops every stored value.
    fn clear(&mut self);

    /// Writes one line per stored value, sorted by entity.
    ///
    /// # Errors
    ///
    /// Propagates formatter errors.
    fn fmt_entries(&self, f: &mut fmt::Formatter<'_>, entities: &EntityAllocator) -> fmt::Result;

    /// Upcast for downcasting to the concrete table.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete table.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedTable for ComponentTable<T> {
    fn meta(&self) -> ComponentMeta {
        ComponentMeta::of::<T>()
    }

    fn insert_any(&mut self, entity: Entity, value: Box<dyn Any>) -> Result<(), EcsError> {
        let value = value.downcast::<T>().map_err(|_| EcsError::TypeMismatch {
            expected: type_name::<T>(),
        })?;
        self.add(entity, *value);
        Ok(())
    }

    fn contains(&self, entity: Entity) -> bool {
        self.has(entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn clear(&mut self) {
        self.rows.clear();
    }

    fn fmt_entries(&self, f: &mut fmt::Formatter<'_>, entities: &EntityAllocator) -> fmt::Result {
        let mut rows: Vec<(Entity, &T)> = self.iter().collect();
        rows.sort_by_key(|(entity, _)| *entity);
        for (entity, value) in rows {
            match entities.label(entity) {
                Some(label) => writeln!(f, "    {entity} {label:?}: {value:?}")?,
                None => writeln!(f, "    {entity}: {value:?}")?,
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for dyn ErasedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedTable")
            .field("component", &self.meta().name)
            .field("len", &self.len())
            .finish()
    }
}

/// Recovers the typed table behind an erased one.
///
/// # Errors
///
/// Returns [`EcsError::TypeMismatch`] if `table` does not store `T`.
pub(crate) fn downcast_ref<T: Component>(
    table: &dyn ErasedTable,
) -> Result<&ComponentTable<T>, EcsError> {
    table
        .as_any()
        .downcast_ref::<ComponentTable<T>>()
        .ok_or(EcsError::TypeMismatch {
            expected: type_name::<T>(),
        })
}

/// Mutable counterpart of [`downcast_ref`].
///
/// # Errors
///
/// Returns [`EcsError::TypeMismatch`] if `table` does not store `T`.
pub(crate) fn downcast_mut<T: Component>(
    table: &mut dyn ErasedTable,
) -> Result<&mut ComponentTable<T>, EcsError> {
    table
        .as_any_mut()
        .downcast_mut::<ComponentTable<T>>()
        .ok_or(EcsError::TypeMismatch {
            expected: type_name::<T>(),
        })
}
