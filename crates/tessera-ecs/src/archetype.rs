//! Archetypes - buckets of entities sharing one exact component type set.
//!
//! An archetype owns the component values of every entity currently assigned
//! to it. Its signature never changes; the storage engine moves entities
//! between archetypes instead.

use std::fmt;

use hashbrown::HashSet;
use rustc_hash::FxHashMap;

use crate::{
    component::{Component, ComponentBox, ComponentId},
    entity::Entity,
    signature::ComponentSet,
};

/// Unique identifier for an archetype, assigned in creation order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchetypeId(u32);

impl ArchetypeId {
    /// Create an archetype ID from a raw value.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArchetypeId({})", self.0)
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Archetype_{}", self.0)
    }
}

/// Per-type map of entity to component value.
pub type Column = FxHashMap<Entity, ComponentBox>;

/// An archetype - the entities with one exact signature plus their values.
pub struct Archetype {
    id: ArchetypeId,
    signature: ComponentSet,
    entities: HashSet<Entity>,
    /// Only holds columns with at least one value.
    components: FxHashMap<ComponentId, Column>,
}

impl Archetype {
    /// Create an empty archetype for the given signature.
    #[must_use]
    pub fn new(id: ArchetypeId, signature: ComponentSet) -> Self {
        Self {
            id,
            signature,
            entities: HashSet::new(),
            components: FxHashMap::default(),
        }
    }

    /// Get the archetype ID.
    #[must_use]
    pub const fn id(&self) -> ArchetypeId {
        self.id
    }

    /// The component types defining this archetype.
    #[must_use]
    pub const fn signature(&self) -> &ComponentSet {
        &self.signature
    }

    /// Check if this archetype's signature has a component type.
    #[must_use]
    pub fn contains(&self, component_id: ComponentId) -> bool {
        self.signature.contains(component_id)
    }

    /// Entities currently assigned to this archetype.
    #[must_use]
    pub const fn entities(&self) -> &HashSet<Entity> {
        &self.entities
    }

    /// Check if an entity is a member.
    #[must_use]
    pub fn contains_entity(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Number of member entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the archetype has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Add an entity without populating any component value.
    ///
    /// Returns `false` if the entity was already a member.
    pub fn add_entity(&mut self, entity: Entity) -> bool {
        self.entities.insert(entity)
    }

    /// Set a component value, replacing any previous one.
    ///
    /// The entity becomes a member if it was not already.
    pub fn set_component(
        &mut self,
        component_id: ComponentId,
        entity: Entity,
        value: ComponentBox,
    ) -> Option<ComponentBox> {
        debug_assert!(
            self.contains(component_id),
            "{component_id:?} is not part of {} {:?}",
            self.id,
            self.signature
        );

        self.entities.insert(entity);
        self.components
            .entry(component_id)
            .or_default()
            .insert(entity, value)
    }

    /// Get a component value.
    #[must_use]
    pub fn get_component(&self, component_id: ComponentId, entity: Entity) -> Option<&ComponentBox> {
        self.components.get(&component_id)?.get(&entity)
    }

    /// Get a mutable component value.
    pub fn get_component_mut(
        &mut self,
        component_id: ComponentId,
        entity: Entity,
    ) -> Option<&mut ComponentBox> {
        self.components.get_mut(&component_id)?.get_mut(&entity)
    }

    /// Get a component value as a concrete type.
    #[must_use]
    pub fn get<T: Component>(&self, component_id: ComponentId, entity: Entity) -> Option<&T> {
        self.get_component(component_id, entity)?.downcast_ref::<T>()
    }

    /// Remove an entity and every value it holds here.
    ///
    /// Returns `false` if the entity was not a member.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        drop(self.take_components(entity));
        self.entities.remove(&entity)
    }

    /// Drain every value an entity holds, in signature order.
    ///
    /// Membership is left untouched; this is the first half of a migration.
    pub fn take_components(&mut self, entity: Entity) -> Vec<(ComponentId, ComponentBox)> {
        let mut taken = Vec::new();

        for component_id in self.signature.iter() {
            let Some(column) = self.components.get_mut(&component_id) else {
                continue;
            };
            if let Some(value) = column.remove(&entity) {
                taken.push((component_id, value));
            }
            if column.is_empty() {
                self.components.remove(&component_id);
            }
        }

        taken
    }

    /// Remove one component value for an entity.
    ///
    /// The column is pruned once empty. If the entity is left holding no
    /// value at all, it stops being a member.
    pub fn remove_component(
        &mut self,
        component_id: ComponentId,
        entity: Entity,
    ) -> Option<ComponentBox> {
        let removed = match self.components.get_mut(&component_id) {
            Some(column) => {
                let removed = column.remove(&entity);
                if column.is_empty() {
                    self.components.remove(&component_id);
                }
                removed
            }
            None => None,
        };

        if !self.holds_any(entity) {
            self.entities.remove(&entity);
        }

        removed
    }

    /// Every value an entity holds, in signature order.
    #[must_use]
    pub fn all_components(&self, entity: Entity) -> Vec<&ComponentBox> {
        self.signature
            .iter()
            .filter_map(|component_id| self.get_component(component_id, entity))
            .collect()
    }

    /// The component types an entity actually holds values for.
    ///
    /// Can be narrower than the signature after an in-place removal.
    #[must_use]
    pub fn held_types(&self, entity: Entity) -> ComponentSet {
        self.signature
            .iter()
            .filter(|component_id| {
                self.components
                    .get(component_id)
                    .is_some_and(|column| column.contains_key(&entity))
            })
            .collect()
    }

    /// Check if an entity holds at least one value.
    #[must_use]
    pub fn holds_any(&self, entity: Entity) -> bool {
        self.components
            .values()
            .any(|column| column.contains_key(&entity))
    }

    /// The values stored for one component type, sorted by entity.
    #[must_use]
    pub fn column_entries(&self, component_id: ComponentId) -> Vec<(Entity, &ComponentBox)> {
        let mut entries: Vec<(Entity, &ComponentBox)> = self
            .components
            .get(&component_id)
            .map(|column| column.iter().map(|(&entity, value)| (entity, value)).collect())
            .unwrap_or_default();
        entries.sort_unstable_by_key(|(entity, _)| *entity);
        entries
    }

    /// Number of non-empty columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.components.len()
    }
}

impl PartialEq for Archetype {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Archetype {}

impl fmt::Debug for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archetype")
            .field("id", &self.id)
            .field("signature", &self.signature)
            .field("entity_count", &self.entities.len())
            .finish()
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        for component_id in self.signature.iter() {
            writeln!(f, "    {component_id:?}")?;
            for (entity, value) in self.column_entries(component_id) {
                writeln!(f, "        {entity}: {value:?}")?;
            }
        }
        Ok(())
    }
}
