//! Multi-component views.
//!
//! A [`View`] borrows the tables of every component type in a tuple such as
//! `(Position, Velocity)` and visits the entities that hold all of them.
//!
//! ## Driver table
//!
//! Iteration is driven by the table of the **first** type in the tuple.
//! For each entity in that table the other tables are probed, and the
//! callback runs only when every probe succeeds. The visited set is the
//! intersection regardless of order, but the cost scales with the size of
//! the first table and the visit order follows that table's order. Put the
//! rarest component first when it matters.
//!
//! A view holds `&mut` borrows of its tables, so the world cannot be
//! mutated while the view is alive.

use std::collections::HashMap;
use std::fmt;

use crate::component::{Component, ComponentMeta, ComponentTypeId};
use crate::entity::Entity;
use crate::error::EcsError;
use crate::table::{self, ComponentTable, ErasedTable};

mod sealed {
    pub trait Sealed {}
}

/// A tuple of component types that a [`View`] can be built over.
///
/// Implemented for tuples of one to eight distinct [`Component`] types.
pub trait ViewQuery: sealed::Sealed + Sized + 'static {
    /// The borrowed tables, one `&mut ComponentTable<T>` per tuple element.
    type Tables<'w>;

    /// Metadata of every component type, in tuple order.
    fn metas() -> Vec<ComponentMeta>;

    #[doc(hidden)]
    fn fetch(
        tables: &mut HashMap<ComponentTypeId, Box<dyn ErasedTable>>,
    ) -> Result<Self::Tables<'_>, EcsError>;
}

/// An ephemeral handle over the tables of the component types in `Q`.
///
/// Built by [`World::view`](crate::World::view). The view owns no data and
/// keeps no cursor, so [`View::each`] can be called any number of times.
pub struct View<'w, Q: ViewQuery> {
    tables: Q::Tables<'w>,
}

impl<'w, Q: ViewQuery> View<'w, Q> {
    pub(crate) fn new(tables: Q::Tables<'w>) -> Self {
        Self { tables }
    }
}

impl<Q: ViewQuery> fmt::Debug for View<'_, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = Q::metas().iter().map(ComponentMeta::short_name).collect();
        f.debug_struct("View").field("components", &names).finish()
    }
}

fn ensure_distinct(metas: &[ComponentMeta]) -> Result<(), EcsError> {
    for (i, meta) in metas.iter().enumerate() {
        if metas[i + 1..].iter().any(|other| other.type_id == meta.type_id) {
            return Err(EcsError::DuplicateViewComponent(meta.name));
        }
    }
    Ok(())
}

fn resolve<T: Component>(
    slot: Option<&mut Box<dyn ErasedTable>>,
) -> Result<&mut ComponentTable<T>, EcsError> {
    let table = slot.ok_or(EcsError::ComponentTypeNotRegistered(
        std::any::type_name::<T>(),
    ))?;
    table::downcast_mut::<T>(&mut **table)
}

macro_rules! impl_view {
    ($head:ident $head_table:ident $head_value:ident $(, $tail:ident $tail_table:ident $tail_value:ident)*) => {
        impl<$head: Component $(, $tail: Component)*> sealed::Sealed for ($head, $($tail,)*) {}

        impl<$head: Component $(, $tail: Component)*> ViewQuery for ($head, $($tail,)*) {
            type Tables<'w> = (&'w mut ComponentTable<$head>, $(&'w mut ComponentTable<$tail>,)*);

            fn metas() -> Vec<ComponentMeta> {
                vec![ComponentMeta::of::<$head>() $(, ComponentMeta::of::<$tail>())*]
            }

            fn fetch(
                tables: &mut HashMap<ComponentTypeId, Box<dyn ErasedTable>>,
            ) -> Result<Self::Tables<'_>, EcsError> {
                let metas = [ComponentMeta::of::<$head>() $(, ComponentMeta::of::<$tail>())*];
                ensure_distinct(&metas)?;
                let ids = metas.map(|meta| meta.type_id);
                let [$head_table $(, $tail_table)*] = tables.get_disjoint_mut(ids.each_ref());
                Ok((resolve::<$head>($head_table)?, $(resolve::<$tail>($tail_table)?,)*))
            }
        }

        impl<$head: Component $(, $tail: Component)*> View<'_, ($head, $($tail,)*)> {
            /// Calls `f` with mutable references to every requested
            /// component of each entity that holds all of them.
            ///
            /// Entities come from the first table; see the module docs.
            pub fn each<F>(&mut self, mut f: F)
            where
                F: FnMut(Entity, &mut $head $(, &mut $tail)*),
            {
                let ($head_table, $($tail_table,)*) = &mut self.tables;
                for (entity, $head_value) in $head_table.iter_mut() {
                    $(
                        let Some($tail_value) = $tail_table.get_mut(entity) else {
                            continue;
                        };
                    )*
                    f(entity, $head_value $(, $tail_value)*);
                }
            }

            /// The entities [`View::each`] would visit, in visit order.
            #[must_use]
            pub fn entities(&self) -> Vec<Entity> {
                let ($head_table, $($tail_table,)*) = &self.tables;
                $head_table
                    .iter()
                    .map(|(entity, _)| entity)
                    .filter(|&_entity| true $(&& $tail_table.has(_entity))*)
                    .collect()
            }

            /// Number of entities holding every requested component.
            #[must_use]
            pub fn count(&self) -> usize {
                self.entities().len()
            }
        }
    };
}

impl_view!(A ta a);
impl_view!(A ta a, B tb b);
impl_view!(A ta a, B tb b, C tc c);
impl_view!(A ta a, B tb b, C tc c, D td d);
impl_view!(A ta a, B tb b, C tc c, D td d, E te e);
impl_view!(A ta a, B tb b, C tc c, D td d, E te e, F2 tf f2);
impl_view!(A ta a, B tb b, C tc c, D td d, E te e, F2 tf f2, G tg g);
impl_view!(A ta a, B tb b, C tc c, D td d, E te e, F2 tf f2, G tg g, H th h);
