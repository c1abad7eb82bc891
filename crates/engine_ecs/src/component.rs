//! Core [`Component`] trait and associated metadata.
//!
//! Any `Debug + 'static` value type is a component: the trait is blanket
//! implemented, so plain structs need nothing beyond `#[derive(Debug)]`.
//!
//! ## Type Identity
//!
//! Tables are keyed by [`ComponentTypeId`], a wrapper around
//! [`std::any::TypeId`]. It is stable for the lifetime of the process and
//! collision free, which is all an in-process registry needs.

use std::any::TypeId;
use std::fmt;

/// A unique identifier for a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(TypeId);

impl ComponentTypeId {
    /// Returns the [`ComponentTypeId`] for component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self(TypeId::of::<T>())
    }

    /// Returns the underlying [`TypeId`].
    #[must_use]
    pub fn type_id(self) -> TypeId {
        self.0
    }
}

/// Metadata about a component type, kept next to its type-erased table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentMeta {
    /// The unique type identifier.
    pub type_id: ComponentTypeId,
    /// The fully qualified Rust type name, for diagnostics only.
    pub name: &'static str,
}

impl ComponentMeta {
    /// Builds the metadata for `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            type_id: ComponentTypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The type name with every module path stripped (`"Position"` rather
    /// than `"game::components::Position"`, `"(Position, Vec<Velocity>)"`
    /// for tuples and generics).
    #[must_use]
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut start = 0;
        for (i, c) in self.name.char_indices() {
            if c.is_alphanumeric() || c == '_' || c == ':' {
                continue;
            }
            out.push_str(strip_path(&self.name[start..i]));
            out.push(c);
            start = i + c.len_utf8();
        }
        out.push_str(strip_path(&self.name[start..]));
        out
    }
}

fn strip_path(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// The core component trait.
///
/// Components are plain values; each entity holds at most one value per
/// component type. `Debug` is required so a world can be dumped for
/// inspection.
///
/// # Examples
///
/// ```rust
/// use engine_ecs::{Component, ComponentMeta};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// fn assert_component<T: Component>() {}
/// assert_component::<Health>();
/// assert_eq!(ComponentMeta::of::<Health>().short_name(), "Health");
/// ```
pub trait Component: fmt::Debug + 'static {}

impl<T: fmt::Debug + 'static> Component for T {}
