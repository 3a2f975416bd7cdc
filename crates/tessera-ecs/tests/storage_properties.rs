//! Invariants of the archetype storage checked against brute force, across
//! long sequences of mixed mutations and queries.

use std::collections::BTreeSet;

use tessera_ecs::{
    ArchetypeStorage, Component, ComponentId, ComponentSet, Entity, EntitySet, RemovalPolicy,
    StorageConfig,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct A(u32);
impl Component for A {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct B(u32);
impl Component for B {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct C(u32);
impl Component for C {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct D(u32);
impl Component for D {}

/// Small deterministic generator so runs are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn all_ids(storage: &mut ArchetypeStorage) -> [ComponentId; 4] {
    [
        storage.register::<A>(),
        storage.register::<B>(),
        storage.register::<C>(),
        storage.register::<D>(),
    ]
}

fn brute_force(storage: &ArchetypeStorage, required: &ComponentSet) -> EntitySet {
    storage
        .entities()
        .into_iter()
        .filter(|&entity| {
            storage
                .signature_of(entity)
                .is_some_and(|signature| signature.is_superset(required))
        })
        .collect()
}

/// Every subset of the four registered types, including the empty one.
fn all_queries(ids: &[ComponentId; 4]) -> Vec<ComponentSet> {
    (0u32..16)
        .map(|mask| {
            ids.iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, &id)| id)
                .collect()
        })
        .collect()
}

fn check_invariants(storage: &mut ArchetypeStorage, ids: &[ComponentId; 4]) {
    // Uniqueness: one live archetype per signature, and the index agrees.
    let signatures: BTreeSet<ComponentSet> = storage
        .archetypes()
        .map(|archetype| archetype.signature().clone())
        .collect();
    assert_eq!(signatures.len(), storage.archetype_count());
    assert_eq!(storage.signature_count(), storage.archetype_count());
    for archetype in storage.archetypes() {
        let indexed = storage.archetype_for(archetype.signature()).unwrap();
        assert_eq!(indexed.id(), archetype.id());
        // Garbage collection: no empty archetype survives.
        assert!(!archetype.is_empty(), "{} is empty", archetype.id());
    }

    // Every known entity sits in exactly one archetype and holds something.
    let mut seen = 0;
    for archetype in storage.archetypes() {
        for &entity in archetype.entities() {
            assert_eq!(storage.archetype_of(entity).unwrap().id(), archetype.id());
            assert!(archetype.holds_any(entity));
            seen += 1;
        }
    }
    assert_eq!(seen, storage.entity_count());

    // Query correctness, cold and warm.
    for query in all_queries(ids) {
        let expected = brute_force(storage, &query);
        assert_eq!(storage.find_entities_uncached(&query), expected);
        assert_eq!(storage.find_entities(&query), expected, "cold {query:?}");
        assert_eq!(storage.find_entities(&query), expected, "warm {query:?}");
    }
}

fn run_random_ops(config: StorageConfig, seed: u64) {
    let mut storage = ArchetypeStorage::with_config(config);
    let ids = all_ids(&mut storage);
    let queries = all_queries(&ids);
    let mut rng = Lcg(seed);
    let entities: Vec<Entity> = (0..24).map(|_| storage.spawn()).collect();

    for step in 0..600 {
        let entity = entities[rng.below(entities.len() as u64) as usize];
        let value = step as u32;

        match rng.below(10) {
            0 => {
                storage.attach(entity, A(value));
            }
            1 => {
                storage.attach(entity, B(value));
            }
            2 => {
                storage.attach(entity, C(value));
            }
            3 => {
                storage.attach(entity, D(value));
            }
            4 => {
                storage.detach::<A>(entity);
            }
            5 => {
                storage.detach::<B>(entity);
            }
            6 => {
                storage.detach::<C>(entity);
            }
            7 => {
                storage.remove_entity(entity);
            }
            _ => {
                // Warm a random cache entry so later mutations must invalidate it.
                let query = &queries[rng.below(16) as usize];
                assert_eq!(storage.find_entities(query), brute_force(&storage, query));
            }
        }

        if step % 25 == 0 {
            check_invariants(&mut storage, &ids);
        }
    }

    check_invariants(&mut storage, &ids);
}

#[test]
fn test_random_ops_in_place_removal() {
    for seed in [1, 7, 42, 1234] {
        run_random_ops(StorageConfig::default(), seed);
    }
}

#[test]
fn test_random_ops_migrating_removal() {
    for seed in [3, 11, 99] {
        run_random_ops(
            StorageConfig::default().with_removal(RemovalPolicy::Migrate),
            seed,
        );
    }
}

#[test]
fn test_random_ops_without_cache() {
    run_random_ops(StorageConfig::default().with_query_cache(false), 5);
}

#[test]
fn test_migrating_removal_keeps_exact_signatures() {
    let mut storage =
        ArchetypeStorage::with_config(StorageConfig::default().with_removal(RemovalPolicy::Migrate));
    all_ids(&mut storage);
    let mut rng = Lcg(17);
    let entities: Vec<Entity> = (0..16).map(|_| storage.spawn()).collect();

    for step in 0..400 {
        let entity = entities[rng.below(entities.len() as u64) as usize];
        match rng.below(6) {
            0 => storage.attach(entity, A(step)),
            1 => storage.attach(entity, B(step)),
            2 => storage.attach(entity, C(step)),
            3 => drop(storage.detach::<A>(entity)),
            4 => drop(storage.detach::<B>(entity)),
            _ => drop(storage.detach::<C>(entity)),
        }

        for archetype in storage.archetypes() {
            for &member in archetype.entities() {
                assert_eq!(&archetype.held_types(member), archetype.signature());
            }
        }
    }
}

#[test]
fn test_in_place_removal_leaves_superset_signature() {
    let mut storage = ArchetypeStorage::new();
    let [a, b, ..] = all_ids(&mut storage);
    let e = storage.spawn_with(A(1));
    storage.attach(e, B(2));

    storage.detach::<B>(e);

    let archetype = storage.archetype_of(e).unwrap();
    assert_eq!(archetype.signature(), &ComponentSet::from(&[a, b][..]));
    assert_eq!(archetype.held_types(e), ComponentSet::single(a));

    // Re-attaching the detached type overwrites in place, no migration.
    let id = archetype.id();
    storage.attach(e, B(3));
    assert_eq!(storage.archetype_of(e).unwrap().id(), id);
    assert_eq!(storage.get::<B>(e), Some(B(3)));
}

#[test]
fn test_migration_preserves_every_value() {
    let mut storage = ArchetypeStorage::new();
    all_ids(&mut storage);
    let e = storage.spawn_with(A(1));
    storage.attach(e, B(2));
    storage.attach(e, C(3));
    storage.attach(e, D(4));

    assert_eq!(storage.get::<A>(e), Some(A(1)));
    assert_eq!(storage.get::<B>(e), Some(B(2)));
    assert_eq!(storage.get::<C>(e), Some(C(3)));
    assert_eq!(storage.get::<D>(e), Some(D(4)));
    assert_eq!(storage.archetype_count(), 1);
    assert_eq!(storage.components_of(e).len(), 4);
}

#[test]
fn test_idempotent_attach() {
    let mut storage = ArchetypeStorage::new();
    let e = storage.spawn_with(A(1));
    storage.attach(e, B(1));
    let id = storage.archetype_of(e).unwrap().id();
    let archetypes = storage.archetype_count();

    storage.attach(e, B(1));
    storage.attach(e, B(1));

    assert_eq!(storage.archetype_of(e).unwrap().id(), id);
    assert_eq!(storage.archetype_count(), archetypes);
    assert_eq!(storage.get::<B>(e), Some(B(1)));
    assert_eq!(storage.entity_count(), 1);
}

#[test]
fn test_overwrite_invalidates_only_touched_keys() {
    let mut storage = ArchetypeStorage::new();
    let [a, b, ..] = all_ids(&mut storage);
    let e = storage.spawn_with(A(1));
    storage.spawn_with(B(1));

    storage.find_entities(&ComponentSet::single(a));
    storage.find_entities(&ComponentSet::single(b));
    assert_eq!(storage.cache_stats().entries, 2);

    storage.attach(e, A(2));

    let stats = storage.cache_stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.invalidations, 1);
}

#[test]
fn test_detaching_last_component_invalidates_whole_signature() {
    let mut storage = ArchetypeStorage::new();
    let [a, b, ..] = all_ids(&mut storage);
    let e = storage.spawn_with(A(1));
    storage.attach(e, B(1));

    storage.detach::<B>(e);
    // Cached while the entity still carries the {A, B} signature.
    assert!(storage.find_entities(&ComponentSet::single(b)).contains(&e));

    storage.detach::<A>(e);

    assert!(!storage.contains_entity(e));
    assert!(storage.find_entities(&ComponentSet::single(b)).is_empty());
    assert!(storage.find_entities(&ComponentSet::single(a)).is_empty());
    assert_eq!(storage.archetype_count(), 0);
}
