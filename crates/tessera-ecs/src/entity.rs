//! Entity identifiers.
//!
//! An entity is a plain key: it carries no data and has no ownership
//! semantics. Storage only "knows" an entity while it holds at least one
//! component.

use std::fmt;

/// Raw entity identifier.
pub type EntityId = u64;

/// A unique identifier for an entity.
///
/// Equality, ordering and hashing are by identifier only.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(EntityId);

impl Entity {
    /// Create an entity from a raw identifier.
    ///
    /// Mixing raw identifiers with ids handed out by an [`EntityAllocator`]
    /// can produce collisions; prefer [`crate::ArchetypeStorage::spawn`].
    #[must_use]
    pub const fn from_raw(id: EntityId) -> Self {
        Self(id)
    }

    /// Get the raw identifier.
    #[must_use]
    pub const fn id(self) -> EntityId {
        self.0
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic allocator for entity ids.
///
/// Ids are never recycled, so a removed entity's id stays dead.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next: EntityId,
}

impl EntityAllocator {
    /// Create a new allocator starting at id 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocate a fresh entity id.
    pub fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        entity
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.next
    }
}
