//! Movement simulation built on `tessera-ecs`.
//!
//! Entities carry a [`Position`] and optionally a [`Velocity`]; the movement
//! system integrates one into the other every tick.

pub mod components;
pub mod config;
pub mod systems;
pub mod world_gen;

pub use components::{Position, Velocity};
pub use config::RunConfig;
pub use systems::MovementSystem;
