//! Component bundles: tuples of components attached in a single call.

use crate::component::{Component, ComponentMeta};
use crate::entity::Entity;
use crate::error::EcsError;
use crate::world::World;

/// A tuple of components that [`World::add_components`] attaches together.
///
/// Implemented for tuples of one to eight [`Component`] types.
pub trait ComponentBundle: 'static {
    /// Metadata of every component type, in tuple order.
    fn metas() -> Vec<ComponentMeta>;

    #[doc(hidden)]
    fn insert_into(self, world: &mut World, entity: Entity) -> Result<(), EcsError>;
}

macro_rules! impl_bundle {
    ($($name:ident $value:ident),+) => {
        impl<$($name: Component),+> ComponentBundle for ($($name,)+) {
            fn metas() -> Vec<ComponentMeta> {
                vec![$(ComponentMeta::of::<$name>()),+]
            }

            fn insert_into(self, world: &mut World, entity: Entity) -> Result<(), EcsError> {
                // Resolve every table first so a failure writes nothing.
                $(world.table_for_insert::<$name>()?;)+
                let ($($value,)+) = self;
                $(world.table_for_insert::<$name>()?.add(entity, $value);)+
                Ok(())
            }
        }
    };
}

impl_bundle!(A a);
impl_bundle!(A a, B b);
impl_bundle!(A a, B b, C c);
impl_bundle!(A a, B b, C c, D d);
impl_bundle!(A a, B b, C c, D d, E e);
impl_bundle!(A a, B b, C c, D d, E e, F f);
impl_bundle!(A a, B b, C c, D d, E e, F f, G g);
impl_bundle!(A a, B b, C c, D d, E e, F f, G g, H h);
