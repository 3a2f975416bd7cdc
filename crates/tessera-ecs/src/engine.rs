//! Tick loop: an ordered list of systems run against one storage.
//!
//! There is no scheduler. Each tick calls every system once, in the order
//! they were added, handing each the storage it operates on.

use std::fmt;

use tracing::{debug_span, trace};

use crate::{
    component::Component,
    entity::Entity,
    storage::ArchetypeStorage,
};

/// A unit of behavior run once per tick.
pub trait System {
    /// Advance this system by `delta_time` seconds.
    fn update(&mut self, storage: &mut ArchetypeStorage, delta_time: f64);

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> System for F
where
    F: FnMut(&mut ArchetypeStorage, f64),
{
    fn update(&mut self, storage: &mut ArchetypeStorage, delta_time: f64) {
        self(storage, delta_time);
    }
}

/// Owns a storage and the systems that run against it.
#[derive(Default)]
pub struct Engine {
    storage: ArchetypeStorage,
    systems: Vec<Box<dyn System>>,
    ticks: u64,
}

impl Engine {
    /// Create an engine with empty default storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine around existing storage.
    #[must_use]
    pub fn with_storage(storage: ArchetypeStorage) -> Self {
        Self {
            storage,
            systems: Vec::new(),
            ticks: 0,
        }
    }

    /// Append a system; it runs after every system added before it.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> &mut Self {
        self.systems.push(Box::new(system));
        self
    }

    /// Run every system once, in registration order.
    pub fn update(&mut self, delta_time: f64) {
        let _span = debug_span!("tick", tick = self.ticks, delta_time).entered();

        for system in &mut self.systems {
            trace!(system = system.name(), "running system");
            system.update(&mut self.storage, delta_time);
        }
        self.ticks += 1;
    }

    /// Number of registered systems.
    #[must_use]
    pub fn systems_len(&self) -> usize {
        self.systems.len()
    }

    /// Names of registered systems, in run order.
    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|system| system.name())
    }

    /// Number of completed ticks.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// The storage systems run against.
    #[must_use]
    pub const fn storage(&self) -> &ArchetypeStorage {
        &self.storage
    }

    /// Mutable access to the storage.
    pub fn storage_mut(&mut self) -> &mut ArchetypeStorage {
        &mut self.storage
    }

    /// Number of known entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.storage.entity_count()
    }

    /// Remove an entity outright.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        self.storage.remove_entity(entity)
    }

    /// Detach a component from an entity.
    pub fn detach<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage.detach::<T>(entity)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("storage", &self.storage)
            .field("systems", &self.systems.len())
            .field("ticks", &self.ticks)
            .finish()
    }
}
