#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]

//! Tessera ECS - in-memory archetype storage for simulation state.
//!
//! Entities acquire and lose typed components at runtime. Entities sharing
//! an identical set of component types are grouped into one archetype, so a
//! query only has to look at archetype signatures, never at every entity.
//!
//! # Key Concepts
//!
//! - **Entity**: An opaque identifier with no data of its own
//! - **Component**: A typed value attached to an entity (e.g., Position)
//! - **Archetype**: The entities sharing one exact set of component types,
//!   plus the storage for their values
//! - **Signature**: That exact set of component types
//! - **Query**: All entities whose signature contains a required type set
//! - **System**: Behavior run once per tick against the storage
//!
//! # Access Pattern
//!
//! Components are value objects. Read a copy, modify it, write it back:
//!
//! ```
//! use tessera_ecs::{ArchetypeStorage, Component};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Health(u32);
//! impl Component for Health {}
//!
//! let mut storage = ArchetypeStorage::new();
//! let player = storage.spawn_with(Health(20));
//!
//! let mut health = storage.get::<Health>(player).unwrap();
//! health.0 -= 5;
//! storage.attach(player, health);
//!
//! assert_eq!(storage.get::<Health>(player), Some(Health(15)));
//! ```

mod archetype;
mod cache;
mod component;
mod config;
mod engine;
mod entity;
mod error;
mod query;
mod signature;
mod storage;

pub use archetype::{Archetype, ArchetypeId, Column};
pub use cache::{CacheStats, EntitySet, QueryCache};
pub use component::{Component, ComponentBox, ComponentId, ComponentInfo, ComponentRegistry};
pub use config::{RemovalPolicy, StorageConfig, parse_flag};
pub use engine::{Engine, System};
pub use entity::{Entity, EntityAllocator, EntityId};
pub use error::{EcsError, EcsResult};
pub use query::ComponentQuery;
pub use signature::ComponentSet;
pub use storage::{ArchetypeStorage, StorageDisplay};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ArchetypeStorage, Component, ComponentSet, Engine, Entity, EntitySet, RemovalPolicy,
        StorageConfig, System,
    };
}
