//! Runner configuration from environment variables.

use eyre::WrapErr;
use tessera_ecs::{RemovalPolicy, StorageConfig, parse_flag};

pub const REMOVAL_POLICY_VAR: &str = "TESSERA_REMOVAL_POLICY";
pub const QUERY_CACHE_VAR: &str = "TESSERA_QUERY_CACHE";
pub const TICKS_VAR: &str = "TESSERA_TICKS";
pub const DELTA_VAR: &str = "TESSERA_DELTA";
pub const ENTITIES_VAR: &str = "TESSERA_ENTITIES";

/// Settings for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub storage: StorageConfig,
    /// Number of ticks to run.
    pub ticks: u64,
    /// Seconds per tick.
    pub delta_time: f64,
    /// Number of entities to spawn.
    pub entities: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            ticks: 20,
            delta_time: 0.05,
            entities: 8,
        }
    }
}

impl RunConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults for
    /// unset variables.
    ///
    /// Unparseable numbers fall back to their defaults; an unknown removal
    /// policy or cache flag is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let defaults = Self::default();

        let removal = match lookup(REMOVAL_POLICY_VAR) {
            Some(value) => value
                .parse::<RemovalPolicy>()
                .wrap_err_with(|| format!("failed to read {REMOVAL_POLICY_VAR}"))?,
            None => defaults.storage.removal,
        };

        let query_cache = match lookup(QUERY_CACHE_VAR) {
            Some(value) => parse_flag(QUERY_CACHE_VAR, &value)?,
            None => defaults.storage.query_cache,
        };

        let ticks = lookup(TICKS_VAR)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.ticks);

        let delta_time = lookup(DELTA_VAR)
            .and_then(|v| v.parse().ok())
            .filter(|dt: &f64| dt.is_finite() && *dt >= 0.0)
            .unwrap_or(defaults.delta_time);

        let entities = lookup(ENTITIES_VAR)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.entities);

        Ok(Self {
            storage: StorageConfig::default()
                .with_removal(removal)
                .with_query_cache(query_cache),
            ticks,
            delta_time,
            entities,
        })
    }
}
