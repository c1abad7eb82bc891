//! World: the owner of every component table and of the entity allocator.
//!
//! The [`World`] routes typed add/get/remove calls to the table of the
//! component type named by the caller, and removes an entity's data from
//! every table when the entity is destroyed.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::bundle::ComponentBundle;
use crate::component::{Component, ComponentMeta, ComponentTypeId};
use crate::config::{RegistrationPolicy, WorldConfig};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;
use crate::table::{self, ComponentTable, ErasedTable};
use crate::view::{View, ViewQuery};

/// The registry of entities and their components.
///
/// A world is single-threaded: it holds no locks and every operation runs
/// to completion on the caller's thread.
#[derive(Debug)]
pub struct World {
    /// Behaviour fixed at construction.
    config: WorldConfig,
    /// Entity ID allocator and live set.
    entities: EntityAllocator,
    /// One table per registered component type.
    pub(crate) tables: HashMap<ComponentTypeId, Box<dyn ErasedTable>>,
}

impl World {
    /// Create a new empty world with strict registration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Create a new empty world with the given configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            entities: EntityAllocator::new(),
            tables: HashMap::new(),
        }
    }

    /// Returns the world's configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // -- Entity lifecycle --

    /// Allocate a new entity without any components.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.create();
        trace!(entity = entity.id(), "entity created");
        entity
    }

    /// Allocate a new entity with a debug label.
    pub fn create_entity_named(&mut self, label: impl Into<String>) -> Entity {
        let entity = self.entities.create_named(label);
        trace!(entity = entity.id(), "entity created");
        entity
    }

    /// Destroy an entity, dropping its value from every registered table.
    ///
    /// Every table is visited regardless of which components the entity
    /// holds. Destroying an entity that is not alive is a no-op apart from
    /// that sweep. Returns `true` if the entity was alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let mut removed = 0usize;
        for table in self.tables.values_mut() {
            if table.remove_entity(entity) {
                removed += 1;
            }
        }
        let was_alive = self.entities.destroy(entity);
        debug!(
            entity = entity.id(),
            was_alive,
            components = removed,
            "entity destroyed"
        );
        was_alive
    }

    /// Returns `true` if `entity` was created by this world and not yet
    /// destroyed.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the debug label `entity` was created with, if any.
    #[must_use]
    pub fn entity_label(&self, entity: Entity) -> Option<&str> {
        self.entities.label(entity)
    }

    /// Returns the count of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns all live entities in ascending id order.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.entities.entities()
    }

    /// Destroy every entity and drop every component value.
    ///
    /// Registered tables stay registered, and the id counter keeps counting
    /// up, so ids issued before the clear are never issued again.
    pub fn clear(&mut self) {
        for table in self.tables.values_mut() {
            table.clear();
        }
        self.entities.clear();
        debug!("world cleared");
    }

    // -- Registration --

    /// Create the empty table for `T`.
    ///
    /// Registering a type twice keeps the existing table and its data, and
    /// logs a warning. Returns `self` so registrations can be chained.
    pub fn register_component<T: Component>(&mut self) -> &mut Self {
        let meta = ComponentMeta::of::<T>();
        if self.tables.contains_key(&meta.type_id) {
            warn!(
                component = meta.name,
                "component type already registered; keeping existing table"
            );
        } else {
            self.insert_table::<T>();
        }
        self
    }

    /// Returns `true` if a table exists for `T`.
    #[must_use]
    pub fn is_registered<T: Component>(&self) -> bool {
        self.tables.contains_key(&ComponentTypeId::of::<T>())
    }

    /// Returns the names of all registered component types, sorted.
    #[must_use]
    pub fn component_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.tables.values().map(|t| t.meta().name).collect();
        names.sort_unstable();
        names
    }

    fn insert_table<T: Component>(&mut self) {
        let meta = ComponentMeta::of::<T>();
        self.tables
            .insert(meta.type_id, Box::new(ComponentTable::<T>::new()));
        debug!(component = meta.name, "component table created");
    }

    /// Resolve the table a new `T` value goes into, creating it under the
    /// lazy policy.
    pub(crate) fn table_for_insert<T: Component>(
        &mut self,
    ) -> Result<&mut ComponentTable<T>, EcsError> {
        if !self.is_registered::<T>() {
            match self.config.registration {
                RegistrationPolicy::Strict => {
                    return Err(EcsError::ComponentTypeNotRegistered(type_name::<T>()));
                }
                RegistrationPolicy::Lazy => self.insert_table::<T>(),
            }
        }
        self.table_mut::<T>()
    }

    fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        if self.entities.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::EntityNotAlive(entity))
        }
    }

    // -- Component operations --

    /// Attach `value` to `entity`, overwriting any previous `T` it held.
    /// Returns the previous value.
    ///
    /// # Errors
    ///
    /// - [`EcsError::EntityNotAlive`] if the entity is not alive.
    /// - [`EcsError::ComponentTypeNotRegistered`] under the strict policy
    ///   when `T` has no table.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        value: T,
    ) -> Result<Option<T>, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.table_for_insert::<T>()?.add(entity, value))
    }

    /// Attach several components at once, e.g. `(Position, Velocity)`.
    ///
    /// Either every value is written or none is.
    ///
    /// # Errors
    ///
    /// Same as [`World::add_component`], checked for every type in the
    /// bundle before anything is written.
    pub fn add_components<B: ComponentBundle>(
        &mut self,
        entity: Entity,
        bundle: B,
    ) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        bundle.insert_into(self, entity)
    }

    /// Attach a dynamically typed value through the erased table interface.
    ///
    /// `meta` names the table; `value` must hold exactly that type.
    ///
    /// # Errors
    ///
    /// - [`EcsError::EntityNotAlive`] if the entity is not alive.
    /// - [`EcsError::ComponentTypeNotRegistered`] if no table exists for
    ///   `meta` (a table cannot be created from a type id alone).
    /// - [`EcsError::TypeMismatch`] if `value` is of another type.
    pub fn add_boxed_component(
        &mut self,
        entity: Entity,
        meta: ComponentMeta,
        value: Box<dyn Any>,
    ) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        let table = self
            .tables
            .get_mut(&meta.type_id)
            .ok_or(EcsError::ComponentTypeNotRegistered(meta.name))?;
        table.insert_any(entity, value)
    }

    /// Get a component value from an entity.
    ///
    /// # Errors
    ///
    /// - [`EcsError::ComponentTypeNotRegistered`] if `T` has no table.
    /// - [`EcsError::ComponentNotFound`] if the entity holds no `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.table::<T>()?
            .get(entity)
            .ok_or(EcsError::ComponentNotFound {
                entity,
                component: type_name::<T>(),
            })
    }

    /// Mutable counterpart of [`World::get_component`].
    ///
    /// # Errors
    ///
    /// Same as [`World::get_component`].
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.table_mut::<T>()?
            .get_mut(entity)
            .ok_or(EcsError::ComponentNotFound {
                entity,
                component: type_name::<T>(),
            })
    }

    /// Check if an entity has a specific component. Unregistered types
    /// report `false`.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.table::<T>().is_ok_and(|table| table.has(entity))
    }

    /// Remove a component from an entity, returning it if it was present.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentTypeNotRegistered`] if `T` has no table.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<Option<T>, EcsError> {
        Ok(self.table_mut::<T>()?.remove(entity))
    }

    /// Typed access to the table of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentTypeNotRegistered`] if `T` has no table.
    pub fn table<T: Component>(&self) -> Result<&ComponentTable<T>, EcsError> {
        let table = self
            .tables
            .get(&ComponentTypeId::of::<T>())
            .ok_or(EcsError::ComponentTypeNotRegistered(type_name::<T>()))?;
        table::downcast_ref::<T>(&**table)
    }

    /// Mutable counterpart of [`World::table`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentTypeNotRegistered`] if `T` has no table.
    pub fn table_mut<T: Component>(&mut self) -> Result<&mut ComponentTable<T>, EcsError> {
        let table = self
            .tables
            .get_mut(&ComponentTypeId::of::<T>())
            .ok_or(EcsError::ComponentTypeNotRegistered(type_name::<T>()))?;
        table::downcast_mut::<T>(&mut **table)
    }

    // -- Query --

    /// Build a [`View`] over the tables of every type in `Q`, a tuple such
    /// as `(Position, Velocity)`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::ComponentTypeNotRegistered`] if any type has no table.
    /// - [`EcsError::DuplicateViewComponent`] if a type is listed twice.
    pub fn view<Q: ViewQuery>(&mut self) -> Result<View<'_, Q>, EcsError> {
        Q::fetch(&mut self.tables).map(View::new)
    }

    // -- Diagnostics --

    /// A human-readable listing of every table and its contents.
    ///
    /// The format is meant for people reading logs and may change at any
    /// time.
    #[must_use]
    pub fn dump(&self) -> WorldDump<'_> {
        WorldDump { world: self }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Display`](fmt::Display) adapter returned by [`World::dump`].
#[derive(Debug)]
pub struct WorldDump<'w> {
    world: &'w World,
}

impl fmt::Display for WorldDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tables: Vec<&dyn ErasedTable> =
            self.world.tables.values().map(|t| &**t).collect();
        tables.sort_by_key(|t| t.meta().name);

        writeln!(f, "{{")?;
        for table in tables {
            writeln!(f, "  {} table ({}) {{", table.meta().short_name(), table.len())?;
            table.fmt_entries(f, &self.world.entities)?;
            writeln!(f, "  }}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(u32);

    fn world_with_motion() -> World {
        let mut world = World::new();
        world
            .register_component::<Position>()
            .register_component::<Velocity>();
        world
    }

    #[test]
    fn test_add_get_roundtrip() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        world.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(
            world.get_component::<Position>(e),
            Ok(&Position { x: 1.0, y: 2.0 })
        );
        assert!(world.has_component::<Position>(e));
        assert!(!world.has_component::<Velocity>(e));
    }

    #[test]
    fn test_add_overwrites_and_returns_previous() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        assert_eq!(world.add_component(e, Position { x: 1.0, y: 1.0 }), Ok(None));
        assert_eq!(
            world.add_component(e, Position { x: 2.0, y: 2.0 }),
            Ok(Some(Position { x: 1.0, y: 1.0 }))
        );
        assert_eq!(world.table::<Position>().unwrap().len(), 1);
    }

    #[test]
    fn test_get_unregistered_component_fails() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        assert_eq!(
            world.get_component::<Health>(e),
            Err(EcsError::ComponentTypeNotRegistered(type_name::<Health>()))
        );
    }

    #[test]
    fn test_strict_add_unregistered_fails_without_side_effects() {
        let mut world = World::new();
        let e = world.create_entity();
        assert_eq!(
            world.add_component(e, Health(10)),
            Err(EcsError::ComponentTypeNotRegistered(type_name::<Health>()))
        );
        assert!(!world.is_registered::<Health>());
    }

    #[test]
    fn test_remove_unregistered_fails() {
        let mut world = World::new();
        let e = world.create_entity();
        assert!(matches!(
            world.remove_component::<Health>(e),
            Err(EcsError::ComponentTypeNotRegistered(_))
        ));
    }

    #[test]
    fn test_lazy_add_creates_table() {
        let mut world = World::with_config(WorldConfig::lazy());
        let e = world.create_entity();
        assert!(!world.is_registered::<Health>());
        world.add_component(e, Health(10)).unwrap();
        assert!(world.is_registered::<Health>());
        assert_eq!(world.get_component::<Health>(e), Ok(&Health(10)));
    }

    #[test]
    fn test_lazy_get_before_first_add_fails() {
        let mut world = World::with_config(WorldConfig::lazy());
        let e = world.create_entity();
        assert!(matches!(
            world.get_component::<Health>(e),
            Err(EcsError::ComponentTypeNotRegistered(_))
        ));
    }

    #[test]
    fn test_get_missing_component_fails() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        assert_eq!(
            world.get_component::<Position>(e),
            Err(EcsError::ComponentNotFound {
                entity: e,
                component: type_name::<Position>(),
            })
        );
        // The failed lookup must not have inserted anything.
        assert!(world.table::<Position>().unwrap().is_empty());
    }

    #[test]
    fn test_get_component_mut() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        world.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        world.get_component_mut::<Position>(e).unwrap().y = 9.0;
        assert_eq!(world.get_component::<Position>(e).unwrap().y, 9.0);
    }

    #[test]
    fn test_remove_component_is_idempotent() {
        let mut world = world_with_motion();
        let a = world.create_entity();
        let b = world.create_entity();
        world.add_component(a, Position { x: 1.0, y: 1.0 }).unwrap();

        assert_eq!(world.remove_component::<Position>(b), Ok(None));
        assert_eq!(world.table::<Position>().unwrap().entities(), vec![a]);

        assert_eq!(
            world.remove_component::<Position>(a),
            Ok(Some(Position { x: 1.0, y: 1.0 }))
        );
        assert_eq!(world.remove_component::<Position>(a), Ok(None));
    }

    #[test]
    fn test_add_to_dead_entity_fails() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        world.destroy_entity(e);
        assert_eq!(
            world.add_component(e, Position { x: 0.0, y: 0.0 }),
            Err(EcsError::EntityNotAlive(e))
        );
        assert_eq!(
            world.add_component(Entity::from_raw(77), Position { x: 0.0, y: 0.0 }),
            Err(EcsError::EntityNotAlive(Entity::from_raw(77)))
        );
    }

    #[test]
    fn test_destroyed_entity_stays_out_of_tables() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        world.add_component(e, Position { x: 1.0, y: 1.0 }).unwrap();
        world.destroy_entity(e);

        assert!(world.add_component(e, Position { x: 2.0, y: 2.0 }).is_err());
        assert!(world.add_components(e, (Position { x: 2.0, y: 2.0 },)).is_err());
        assert!(world.table_mut::<Position>().unwrap().is_empty());
        assert!(world.view::<(Position,)>().unwrap().entities().is_empty());
    }

    #[test]
    fn test_destroy_cascades_to_every_table() {
        let mut world = world_with_motion();
        world.register_component::<Health>();
        let e = world.create_entity();
        let other = world.create_entity();
        world.add_component(e, Position { x: 1.0, y: 1.0 }).unwrap();
        world.add_component(e, Velocity { x: 1.0, y: 1.0 }).unwrap();
        world.add_component(e, Health(3)).unwrap();
        world.add_component(other, Health(5)).unwrap();

        assert!(world.destroy_entity(e));

        assert!(!world.has_component::<Position>(e));
        assert!(!world.has_component::<Velocity>(e));
        assert!(!world.has_component::<Health>(e));
        assert!(!world.is_alive(e));
        assert_eq!(world.get_component::<Health>(other), Ok(&Health(5)));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_destroy_twice_is_noop() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        assert!(world.destroy_entity(e));
        assert!(!world.destroy_entity(e));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_new_entity_never_reuses_destroyed_id() {
        let mut world = world_with_motion();
        let issued: Vec<Entity> = (0..3).map(|_| world.create_entity()).collect();
        world.destroy_entity(issued[1]);
        world.clear();
        let fresh = world.create_entity();
        assert!(!issued.contains(&fresh));
        assert!(fresh > issued[2]);
    }

    #[test]
    fn test_register_twice_keeps_data() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        world.add_component(e, Position { x: 4.0, y: 2.0 }).unwrap();
        world.register_component::<Position>();
        assert_eq!(
            world.get_component::<Position>(e),
            Ok(&Position { x: 4.0, y: 2.0 })
        );
        assert_eq!(world.component_names().len(), 2);
    }

    #[test]
    fn test_clear_keeps_registrations() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        world.add_component(e, Position { x: 1.0, y: 1.0 }).unwrap();
        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert!(world.is_registered::<Position>());
        assert!(world.table::<Position>().unwrap().is_empty());
    }

    #[test]
    fn test_add_components_bundle() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        world
            .add_components(e, (Position { x: 1.0, y: 0.0 }, Velocity { x: 0.0, y: 1.0 }))
            .unwrap();
        assert_eq!(world.get_component::<Position>(e).unwrap().x, 1.0);
        assert_eq!(world.get_component::<Velocity>(e).unwrap().y, 1.0);
    }

    #[test]
    fn test_add_components_bundle_is_atomic() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        let result = world.add_components(e, (Position { x: 1.0, y: 0.0 }, Health(1)));
        assert_eq!(
            result,
            Err(EcsError::ComponentTypeNotRegistered(type_name::<Health>()))
        );
        assert!(!world.has_component::<Position>(e));
    }

    #[test]
    fn test_add_boxed_component() {
        let mut world = world_with_motion();
        let e = world.create_entity();
        world
            .add_boxed_component(
                e,
                ComponentMeta::of::<Position>(),
                Box::new(Position { x: 3.0, y: 3.0 }),
            )
            .unwrap();
        assert_eq!(
            world.get_component::<Position>(e),
            Ok(&Position { x: 3.0, y: 3.0 })
        );

        let err = world
            .add_boxed_component(
                e,
                ComponentMeta::of::<Velocity>(),
                Box::new(Position { x: 0.0, y: 0.0 }),
            )
            .unwrap_err();
        assert_eq!(
            err,
            EcsError::TypeMismatch {
                expected: type_name::<Velocity>()
            }
        );
        assert!(!world.has_component::<Velocity>(e));

        let err = world
            .add_boxed_component(e, ComponentMeta::of::<Health>(), Box::new(Health(1)))
            .unwrap_err();
        assert!(matches!(err, EcsError::ComponentTypeNotRegistered(_)));
    }

    #[test]
    fn test_entity_labels() {
        let mut world = World::new();
        let named = world.create_entity_named("player");
        let plain = world.create_entity();
        assert_eq!(world.entity_label(named), Some("player"));
        assert_eq!(world.entity_label(plain), None);
        assert_eq!(world.entities(), vec![named, plain]);
    }

    #[test]
    fn test_dump_lists_tables_and_entries() {
        let mut world = world_with_motion();
        let e = world.create_entity_named("ball");
        world.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();

        let dump = world.dump().to_string();
        assert!(dump.starts_with('{'));
        assert!(dump.ends_with('}'));
        assert!(dump.contains("Position table (1)"));
        assert!(dump.contains("Velocity table (0)"));
        assert!(dump.contains("Entity(1) \"ball\""));
    }
}
