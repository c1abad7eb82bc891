//! # engine_ecs
//!
//! Entity/component storage and query core.
//!
//! This crate provides:
//!
//! - [`Entity`]: lightweight `u64` entity identifiers.
//! - [`EntityAllocator`]: monotonically increasing ID allocator with a live set.
//! - [`Component`]: marker trait for any `Debug + 'static` value type.
//! - [`ComponentTable`]: per-type `Entity -> T` storage, erased as [`ErasedTable`].
//! - [`World`]: owns the tables and the allocator, routes typed access.
//! - [`View`]: iteration over the entities holding every component of a tuple.
//!
//! Systems are plain caller code that asks the world for views:
//!
//! ```rust
//! use engine_ecs::World;
//!
//! #[derive(Debug)]
//! struct Position { x: f32, y: f32 }
//! #[derive(Debug)]
//! struct Velocity { x: f32, y: f32 }
//!
//! let mut world = World::new();
//! world
//!     .register_component::<Position>()
//!     .register_component::<Velocity>();
//!
//! let e = world.create_entity();
//! world.add_components(e, (Position { x: 0.0, y: 0.0 }, Velocity { x: 1.0, y: 0.0 }))?;
//!
//! let dt = 2.0;
//! world.view::<(Position, Velocity)>()?.each(|_, pos, vel| {
//!     pos.x += vel.x * dt;
//!     pos.y += vel.y * dt;
//! });
//!
//! assert_eq!(world.get_component::<Position>(e)?.x, 2.0);
//! # Ok::<(), engine_ecs::EcsError>(())
//! ```

pub mod bundle;
pub mod component;
pub mod config;
pub mod entity;
pub mod error;
pub mod table;
pub mod view;
pub mod world;

pub use bundle::ComponentBundle;
pub use component::{Component, ComponentMeta, ComponentTypeId};
pub use config::{RegistrationPolicy, WorldConfig};
pub use entity::{Entity, EntityAllocator};
pub use error::EcsError;
pub use table::{ComponentTable, ErasedTable};
pub use view::{View, ViewQuery};
pub use world::{World, WorldDump};
