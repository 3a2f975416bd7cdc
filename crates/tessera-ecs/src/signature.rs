//! Canonical component type sets.
//!
//! A [`ComponentSet`] is kept sorted and deduplicated, so two sets with the
//! same members always compare and hash equal regardless of the order they
//! were built in. It serves as archetype signature, query and cache key.

use std::fmt;

use smallvec::SmallVec;

use crate::component::ComponentId;

/// Sorted, deduplicated set of component IDs.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentSet {
    ids: SmallVec<[ComponentId; 8]>,
}

impl ComponentSet {
    /// The empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set with exactly one member.
    #[must_use]
    pub fn single(id: ComponentId) -> Self {
        let mut ids = SmallVec::new();
        ids.push(id);
        Self { ids }
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// A copy of this set with `id` added.
    #[must_use]
    pub fn with(&self, id: ComponentId) -> Self {
        let mut ids = self.ids.clone();
        if let Err(pos) = ids.binary_search(&id) {
            ids.insert(pos, id);
        }
        Self { ids }
    }

    /// A copy of this set with `id` removed.
    #[must_use]
    pub fn without(&self, id: ComponentId) -> Self {
        Self {
            ids: self.ids.iter().copied().filter(|&other| other != id).collect(),
        }
    }

    /// Union of two sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.iter().chain(other.iter()).collect()
    }

    /// Check whether every member of `other` is also in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.ids.len() <= self.ids.len() && other.ids.iter().all(|&id| self.contains(id))
    }

    /// Check whether the sets share no member.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (small, large) = if self.ids.len() <= other.ids.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.ids.iter().all(|&id| !large.contains(id))
    }

    /// Iterate over members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.ids.iter().copied()
    }

    /// Members as a sorted slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ComponentId] {
        &self.ids
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<ComponentId> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        let mut ids: SmallVec<[ComponentId; 8]> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }
}

impl From<&[ComponentId]> for ComponentSet {
    fn from(ids: &[ComponentId]) -> Self {
        ids.iter().copied().collect()
    }
}

impl fmt::Debug for ComponentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ids.iter()).finish()
    }
}

impl fmt::Display for ComponentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", id.as_raw())?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(raw: &[u32]) -> ComponentSet {
        raw.iter().copied().map(ComponentId::from_raw).collect()
    }

    #[test]
    fn test_canonical_order() {
        assert_eq!(set(&[3, 1, 2]), set(&[1, 2, 3]));
        assert_eq!(set(&[2, 2, 1]), set(&[1, 2]));
        assert_eq!(set(&[2, 2, 1]).len(), 2);
    }

    #[test]
    fn test_with_and_without() {
        let base = set(&[1, 3]);

        assert_eq!(base.with(ComponentId::from_raw(2)), set(&[1, 2, 3]));
        assert_eq!(base.with(ComponentId::from_raw(3)), base);
        assert_eq!(base.without(ComponentId::from_raw(1)), set(&[3]));
        assert_eq!(base.without(ComponentId::from_raw(9)), base);
    }

    #[test]
    fn test_union() {
        assert_eq!(set(&[1, 4]).union(&set(&[2, 4, 5])), set(&[1, 2, 4, 5]));
        assert_eq!(set(&[]).union(&set(&[7])), set(&[7]));
    }

    #[test]
    fn test_superset_and_disjoint() {
        let big = set(&[1, 2, 3]);

        assert!(big.is_superset(&set(&[1, 3])));
        assert!(big.is_superset(&set(&[])));
        assert!(big.is_superset(&big));
        assert!(!set(&[1]).is_superset(&big));

        assert!(big.is_disjoint(&set(&[4, 5])));
        assert!(!big.is_disjoint(&set(&[5, 3])));
        assert!(set(&[]).is_disjoint(&big));
    }

    #[test]
    fn test_display() {
        assert_eq!(set(&[2, 0]).to_string(), "{0, 2}");
        assert_eq!(ComponentSet::new().to_string(), "{}");
    }
}
