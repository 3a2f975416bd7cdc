use tessera_ecs::{ArchetypeStorage, System};
use tracing::trace;

use crate::components::{Position, Velocity};

/// Integrates [`Velocity`] into [`Position`] for every entity that has both.
///
/// Positions are written back only when they change, so a stationary entity
/// never invalidates cached `Position` queries.
#[derive(Debug, Default)]
pub struct MovementSystem {
    moved_total: u64,
}

impl MovementSystem {
    /// Number of position writes made so far.
    #[must_use]
    pub const fn moved_total(&self) -> u64 {
        self.moved_total
    }
}

impl System for MovementSystem {
    fn update(&mut self, storage: &mut ArchetypeStorage, delta_time: f64) {
        let mut moved = 0u64;

        for entity in storage.query::<(Position, Velocity)>() {
            // An in-place detach can leave the signature claiming a type the
            // entity no longer holds.
            let (Some(position), Some(velocity)) = (
                storage.get::<Position>(entity),
                storage.get::<Velocity>(entity),
            ) else {
                continue;
            };

            let next = position.advanced(velocity, delta_time);
            if next != position {
                storage.attach(entity, next);
                moved += 1;
            }
        }

        self.moved_total += moved;
        trace!(moved, delta_time, "movement");
    }

    fn name(&self) -> &str {
        "movement"
    }
}
