//! Typed query descriptions.
//!
//! A query is a set of required component types. [`ComponentQuery`] lets a
//! tuple of component types stand for that set:
//!
//! ```
//! use tessera_ecs::{ArchetypeStorage, Component};
//!
//! #[derive(Debug, Clone)]
//! struct Position(f64, f64);
//! impl Component for Position {}
//!
//! #[derive(Debug, Clone)]
//! struct Velocity(f64, f64);
//! impl Component for Velocity {}
//!
//! let mut storage = ArchetypeStorage::new();
//! let e = storage.spawn();
//! storage.attach(e, Position(0.0, 0.0));
//! storage.attach(e, Velocity(1.0, 1.0));
//!
//! assert!(storage.query::<(Position, Velocity)>().contains(&e));
//! ```

use crate::{
    component::{Component, ComponentRegistry},
    signature::ComponentSet,
};

/// A compile-time list of required component types.
pub trait ComponentQuery {
    /// Resolve to the required type set.
    ///
    /// Returns `None` if any type was never registered; no entity can match
    /// such a query.
    fn component_set(registry: &ComponentRegistry) -> Option<ComponentSet>;
}

macro_rules! impl_component_query {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentQuery for ($($name,)+) {
            fn component_set(registry: &ComponentRegistry) -> Option<ComponentSet> {
                Some([$(registry.id_of::<$name>()?),+].into_iter().collect())
            }
        }
    };
}

impl_component_query!(A);
impl_component_query!(A, B);
impl_component_query!(A, B, C);
impl_component_query!(A, B, C, D);
impl_component_query!(A, B, C, D, E);
impl_component_query!(A, B, C, D, E, F);
impl_component_query!(A, B, C, D, E, F, G);
impl_component_query!(A, B, C, D, E, F, G, H);
