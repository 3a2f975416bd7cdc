//! Movement simulation runner
//!
//! This binary:
//! 1. Reads its configuration from `TESSERA_*` environment variables
//! 2. Spawns a population of moving and stationary entities
//! 3. Runs the tick loop for a fixed number of ticks
//! 4. Logs the final archetype dump

use tessera_ecs::{ArchetypeStorage, Engine};
use tessera_sim::{RunConfig, systems, world_gen};
use tracing::{debug, info};

fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tessera_sim=info".parse()?)
                .add_directive("tessera_ecs=info".parse()?),
        )
        .init();

    let config = RunConfig::from_env()?;
    info!(
        removal = %config.storage.removal,
        query_cache = config.storage.query_cache,
        ticks = config.ticks,
        delta_time = config.delta_time,
        entities = config.entities,
        "Starting simulation"
    );

    let mut engine = Engine::with_storage(ArchetypeStorage::with_config(config.storage));
    systems::install(&mut engine);

    let entities = world_gen::populate(engine.storage_mut(), config.entities);
    info!(
        "Spawned {} entities in {} archetypes",
        entities.len(),
        engine.storage().archetype_count()
    );

    for _ in 0..config.ticks {
        engine.update(config.delta_time);
        debug!(tick = engine.tick_count(), "tick complete");
    }

    let stats = engine.storage().cache_stats();
    info!(
        ticks = engine.tick_count(),
        hits = stats.hits,
        misses = stats.misses,
        invalidations = stats.invalidations,
        "Simulation finished"
    );
    info!("Final state:\n{}", engine.storage().display());

    Ok(())
}
