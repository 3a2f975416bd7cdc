//! Simulation systems.
//!
//! There is no scheduler: [`install`] adds every system to the engine in the
//! order they must run each tick.

mod movement;

pub use movement::MovementSystem;
use tessera_ecs::Engine;

/// Register all simulation systems, in run order.
pub fn install(engine: &mut Engine) {
    engine.add_system(MovementSystem::default());
}
