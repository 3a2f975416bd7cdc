//! Archetype storage - the engine tying archetypes, indexes and the query
//! cache together.
//!
//! Every entity lives in exactly one archetype. Attaching a component type
//! the entity's archetype lacks moves the entity, with all its values, to the
//! archetype for the widened signature. Archetypes are created on first use
//! and destroyed as soon as their last entity leaves.
//!
//! ```text
//! attach(e, Velocity)          {Position}  ──migrate──▶  {Position, Velocity}
//! find_entities({Velocity})    scan signatures ⊇ {Velocity}, cache result
//! ```

use std::{collections::BTreeMap, fmt};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{
    archetype::{Archetype, ArchetypeId},
    cache::{CacheStats, EntitySet, QueryCache},
    component::{Component, ComponentBox, ComponentId, ComponentRegistry},
    config::{RemovalPolicy, StorageConfig},
    entity::{Entity, EntityAllocator},
    query::ComponentQuery,
    signature::ComponentSet,
};

/// The archetype storage engine.
pub struct ArchetypeStorage {
    config: StorageConfig,
    registry: ComponentRegistry,
    entity_ids: EntityAllocator,
    next_archetype_id: u32,
    /// Live archetypes in creation order.
    archetypes: BTreeMap<ArchetypeId, Archetype>,
    /// At most one archetype per signature.
    signature_index: FxHashMap<ComponentSet, ArchetypeId>,
    /// Only entities holding at least one component have an entry.
    entity_index: FxHashMap<Entity, ArchetypeId>,
    cache: QueryCache,
}

impl Default for ArchetypeStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchetypeStorage {
    /// Create empty storage with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorageConfig::default())
    }

    /// Create empty storage with the given configuration.
    #[must_use]
    pub fn with_config(config: StorageConfig) -> Self {
        Self {
            config,
            registry: ComponentRegistry::new(),
            entity_ids: EntityAllocator::new(),
            next_archetype_id: 1,
            archetypes: BTreeMap::new(),
            signature_index: FxHashMap::default(),
            entity_index: FxHashMap::default(),
            cache: QueryCache::new(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }

    // ==================== Entities ====================

    /// Allocate a fresh entity id.
    ///
    /// The entity is not known to storage until a component is attached.
    pub fn spawn(&mut self) -> Entity {
        self.entity_ids.allocate()
    }

    /// Allocate an entity and attach its first component.
    pub fn spawn_with<T: Component>(&mut self, component: T) -> Entity {
        let entity = self.spawn();
        self.attach(entity, component);
        entity
    }

    /// Check if an entity currently holds any component.
    #[must_use]
    pub fn contains_entity(&self, entity: Entity) -> bool {
        self.entity_index.contains_key(&entity)
    }

    /// Number of known entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entity_index.len()
    }

    /// All known entities.
    #[must_use]
    pub fn entities(&self) -> EntitySet {
        self.entity_index.keys().copied().collect()
    }

    /// Remove an entity and all its components.
    ///
    /// Returns `false` if the entity was not known.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        let Some(arch_id) = self.entity_index.remove(&entity) else {
            return false;
        };

        if let Some(archetype) = self.archetypes.get_mut(&arch_id) {
            archetype.remove_entity(entity);
            let signature = archetype.signature().clone();
            self.cache.invalidate(&signature);
        }
        self.remove_empty_archetypes();

        trace!(%entity, archetype = %arch_id, "removed entity");
        true
    }

    // ==================== Components ====================

    /// Register a component type without attaching anything.
    pub fn register<T: Component>(&mut self) -> ComponentId {
        self.registry.register::<T>()
    }

    /// Get the component ID for a type, if registered.
    #[must_use]
    pub fn component_id<T: Component>(&self) -> Option<ComponentId> {
        self.registry.id_of::<T>()
    }

    /// The component type registry.
    #[must_use]
    pub const fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Attach a component to an entity, replacing any value of the same
    /// type.
    ///
    /// The entity becomes known on its first attach. Attaching a type the
    /// entity's archetype lacks migrates the entity to the archetype for the
    /// widened signature.
    pub fn attach<T: Component>(&mut self, entity: Entity, component: T) {
        let component_id = self.registry.register::<T>();
        self.attach_by_id(entity, component_id, ComponentBox::new(component));
    }

    fn attach_by_id(&mut self, entity: Entity, component_id: ComponentId, value: ComponentBox) {
        let touched = ComponentSet::single(component_id);

        let Some(&current) = self.entity_index.get(&entity) else {
            let arch_id = self.get_or_create(&touched);
            if let Some(archetype) = self.archetypes.get_mut(&arch_id) {
                archetype.add_entity(entity);
                archetype.set_component(component_id, entity, value);
            }
            self.entity_index.insert(entity, arch_id);
            self.cache.invalidate(&touched);
            return;
        };

        let Some(archetype) = self.archetypes.get_mut(&current) else {
            return;
        };

        if archetype.contains(component_id) {
            archetype.set_component(component_id, entity, value);
            self.cache.invalidate(&touched);
            return;
        }

        let old_signature = archetype.signature().clone();
        let new_signature = old_signature.with(component_id);
        let target = self.get_or_create(&new_signature);

        self.migrate(entity, current, target);
        if let Some(archetype) = self.archetypes.get_mut(&target) {
            archetype.set_component(component_id, entity, value);
        }
        self.cache.invalidate(&old_signature.union(&new_signature));
    }

    /// Detach a component from an entity, returning its value.
    ///
    /// Returns `None` if the entity or the component is absent.
    pub fn detach<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let component_id = self.registry.id_of::<T>()?;
        self.detach_id(entity, component_id)?.downcast::<T>()
    }

    /// Detach a component by type ID.
    ///
    /// If the entity is left without components it is removed from storage.
    /// Otherwise the [`RemovalPolicy`] decides whether it stays in its
    /// archetype or moves to the one matching the types it still holds.
    pub fn detach_id(&mut self, entity: Entity, component_id: ComponentId) -> Option<ComponentBox> {
        let &arch_id = self.entity_index.get(&entity)?;
        let archetype = self.archetypes.get_mut(&arch_id)?;

        let signature = archetype.signature().clone();
        let removed = archetype.remove_component(component_id, entity);
        let mut touched = ComponentSet::single(component_id);

        if !archetype.holds_any(entity) {
            archetype.remove_entity(entity);
            self.entity_index.remove(&entity);
            touched = touched.union(&signature);
            self.remove_empty_archetypes();
            trace!(%entity, archetype = %arch_id, "entity lost its last component");
        } else if self.config.removal == RemovalPolicy::Migrate {
            let held = archetype.held_types(entity);
            if held != signature {
                let target = self.get_or_create(&held);
                self.migrate(entity, arch_id, target);
                touched = touched.union(&signature);
            }
        }

        self.cache.invalidate(&touched);
        removed
    }

    /// Get an owned copy of an entity's component.
    #[must_use]
    pub fn get<T: Component + Clone>(&self, entity: Entity) -> Option<T> {
        self.get_ref::<T>(entity).cloned()
    }

    /// Borrow an entity's component.
    #[must_use]
    pub fn get_ref<T: Component>(&self, entity: Entity) -> Option<&T> {
        let component_id = self.registry.id_of::<T>()?;
        self.archetype_of(entity)?.get::<T>(component_id, entity)
    }

    /// Borrow an entity's component by type ID.
    #[must_use]
    pub fn get_by_id(&self, entity: Entity, component_id: ComponentId) -> Option<&ComponentBox> {
        self.archetype_of(entity)?.get_component(component_id, entity)
    }

    /// Check if an entity holds a value of type `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get_ref::<T>(entity).is_some()
    }

    /// Every value an entity holds, in signature order.
    #[must_use]
    pub fn components_of(&self, entity: Entity) -> Vec<&ComponentBox> {
        self.archetype_of(entity)
            .map(|archetype| archetype.all_components(entity))
            .unwrap_or_default()
    }

    // ==================== Queries ====================

    /// Entities whose archetype signature contains every required type.
    ///
    /// An empty request returns every known entity. Results are cached under
    /// the exact requested set until a mutation touching one of its types.
    pub fn find_entities(&mut self, required: &ComponentSet) -> EntitySet {
        if required.is_empty() {
            return self.entities();
        }

        if self.config.query_cache {
            if let Some(hit) = self.cache.get(required) {
                return hit.clone();
            }
        }

        let result = self.find_entities_uncached(required);
        if self.config.query_cache {
            self.cache.insert(required.clone(), result.clone());
        }
        result
    }

    /// Same as [`Self::find_entities`] but always scans and never touches the
    /// cache.
    #[must_use]
    pub fn find_entities_uncached(&self, required: &ComponentSet) -> EntitySet {
        if required.is_empty() {
            return self.entities();
        }

        self.archetypes
            .values()
            .filter(|archetype| archetype.signature().is_superset(required))
            .flat_map(|archetype| archetype.entities().iter().copied())
            .collect()
    }

    /// Typed form of [`Self::find_entities`].
    ///
    /// A query naming a type that was never registered matches nothing.
    pub fn query<Q: ComponentQuery>(&mut self) -> EntitySet {
        match Q::component_set(&self.registry) {
            Some(required) => self.find_entities(&required),
            None => EntitySet::new(),
        }
    }

    /// Query cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached query result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    // ==================== Archetypes ====================

    /// Live archetypes in creation order.
    pub fn archetypes(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.values()
    }

    /// Number of live archetypes.
    #[must_use]
    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    /// Number of entries in the signature index.
    #[must_use]
    pub fn signature_count(&self) -> usize {
        self.signature_index.len()
    }

    /// Get an archetype by ID.
    #[must_use]
    pub fn archetype(&self, id: ArchetypeId) -> Option<&Archetype> {
        self.archetypes.get(&id)
    }

    /// The archetype an entity currently belongs to.
    #[must_use]
    pub fn archetype_of(&self, entity: Entity) -> Option<&Archetype> {
        let arch_id = self.entity_index.get(&entity)?;
        self.archetypes.get(arch_id)
    }

    /// The live archetype with exactly this signature.
    #[must_use]
    pub fn archetype_for(&self, signature: &ComponentSet) -> Option<&Archetype> {
        let arch_id = self.signature_index.get(signature)?;
        self.archetypes.get(arch_id)
    }

    /// Signature of the archetype an entity belongs to.
    #[must_use]
    pub fn signature_of(&self, entity: Entity) -> Option<&ComponentSet> {
        self.archetype_of(entity).map(Archetype::signature)
    }

    /// Human-readable dump of every archetype and its values.
    #[must_use]
    pub fn display(&self) -> StorageDisplay<'_> {
        StorageDisplay { storage: self }
    }

    fn get_or_create(&mut self, signature: &ComponentSet) -> ArchetypeId {
        if let Some(&id) = self.signature_index.get(signature) {
            return id;
        }

        let id = ArchetypeId::from_raw(self.next_archetype_id);
        self.next_archetype_id += 1;

        self.archetypes
            .insert(id, Archetype::new(id, signature.clone()));
        self.signature_index.insert(signature.clone(), id);

        debug!(archetype = %id, %signature, "created archetype");
        id
    }

    /// Move an entity and every value it holds from one archetype to
    /// another, destroying the source if it ends up empty.
    fn migrate(&mut self, entity: Entity, from: ArchetypeId, to: ArchetypeId) {
        let values = self
            .archetypes
            .get_mut(&from)
            .map(|archetype| archetype.take_components(entity))
            .unwrap_or_default();
        let moved = values.len();

        if let Some(target) = self.archetypes.get_mut(&to) {
            target.add_entity(entity);
            for (component_id, value) in values {
                target.set_component(component_id, entity, value);
            }
        }
        self.entity_index.insert(entity, to);

        if let Some(source) = self.archetypes.get_mut(&from) {
            source.remove_entity(entity);
            if source.is_empty() {
                self.destroy_archetype(from);
            }
        }

        trace!(%entity, %from, %to, moved, "migrated entity");
    }

    fn remove_empty_archetypes(&mut self) {
        let empty: Vec<ArchetypeId> = self
            .archetypes
            .values()
            .filter(|archetype| archetype.is_empty())
            .map(Archetype::id)
            .collect();

        for id in empty {
            self.destroy_archetype(id);
        }
    }

    fn destroy_archetype(&mut self, id: ArchetypeId) {
        if let Some(archetype) = self.archetypes.remove(&id) {
            self.signature_index.remove(archetype.signature());
            debug!(archetype = %id, signature = %archetype.signature(), "destroyed archetype");
        }
    }
}

impl fmt::Debug for ArchetypeStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchetypeStorage")
            .field("entity_count", &self.entity_index.len())
            .field("component_types", &self.registry.len())
            .field("archetype_count", &self.archetypes.len())
            .field("cached_queries", &self.cache.len())
            .finish()
    }
}

/// Dump of a storage's archetypes, created by [`ArchetypeStorage::display`].
///
/// ```text
/// Archetype_2 {Position, Velocity}
///     Position
///         0: Position { x: 0.0, y: 0.0 }
///     Velocity
///         0: Velocity { dx: 2.0, dy: 3.0 }
/// ```
pub struct StorageDisplay<'s> {
    storage: &'s ArchetypeStorage,
}

impl fmt::Display for StorageDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = &self.storage.registry;

        for archetype in self.storage.archetypes() {
            let names: Vec<&str> = archetype
                .signature()
                .iter()
                .map(|id| registry.name(id))
                .collect();
            writeln!(f, "{} {{{}}}", archetype.id(), names.join(", "))?;

            for component_id in archetype.signature().iter() {
                writeln!(f, "    {}", registry.name(component_id))?;
                for (entity, value) in archetype.column_entries(component_id) {
                    writeln!(f, "        {entity}: {value:?}")?;
                }
            }
        }
        Ok(())
    }
}
