//! Initial population for a run.

use tessera_ecs::{ArchetypeStorage, Entity};

use crate::components::{Position, Velocity};

/// Spawn `count` entities laid out along the x axis.
///
/// Every third entity is stationary (no [`Velocity`]); the rest move with a
/// velocity derived from their index, so a run exercises both archetypes.
pub fn populate(storage: &mut ArchetypeStorage, count: usize) -> Vec<Entity> {
    (0..count)
        .map(|i| {
            let entity = storage.spawn_with(Position::new(i as f64, 0.0));
            if i % 3 != 0 {
                storage.attach(entity, Velocity::new(1.0, i as f64 * 0.5));
            }
            entity
        })
        .collect()
}
