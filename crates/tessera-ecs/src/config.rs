//! Storage configuration.

use std::{fmt, str::FromStr};

use crate::error::{EcsError, EcsResult};

/// What happens to an entity's archetype when one of several components is
/// detached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// The value is dropped but the entity stays in its archetype, whose
    /// signature may now list a type the entity no longer holds. Queries
    /// match on signatures, so the entity keeps matching that type until it
    /// is removed or migrates by gaining another type.
    #[default]
    InPlace,
    /// The entity moves to the archetype whose signature is exactly the set
    /// of types it still holds.
    Migrate,
}

impl RemovalPolicy {
    /// Name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InPlace => "in-place",
            Self::Migrate => "migrate",
        }
    }
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemovalPolicy {
    type Err = EcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-place" | "inplace" | "in_place" => Ok(Self::InPlace),
            "migrate" => Ok(Self::Migrate),
            _ => Err(EcsError::UnknownRemovalPolicy(s.to_owned())),
        }
    }
}

/// Settings for [`crate::ArchetypeStorage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Behavior of single-component detach.
    pub removal: RemovalPolicy,
    /// Memoize query results. When off, every query is computed.
    pub query_cache: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            removal: RemovalPolicy::InPlace,
            query_cache: true,
        }
    }
}

impl StorageConfig {
    /// Set the removal policy.
    #[must_use]
    pub const fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    /// Enable or disable the query cache.
    #[must_use]
    pub const fn with_query_cache(mut self, enabled: bool) -> Self {
        self.query_cache = enabled;
        self
    }
}

/// Parse a boolean setting such as `1`, `true`, `off`.
pub fn parse_flag(key: &'static str, value: &str) -> EcsResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EcsError::InvalidFlag {
            key,
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorageConfig::default();
        assert_eq!(config.removal, RemovalPolicy::InPlace);
        assert!(config.query_cache);
    }

    #[test]
    fn test_builder() {
        let config = StorageConfig::default()
            .with_removal(RemovalPolicy::Migrate)
            .with_query_cache(false);
        assert_eq!(config.removal, RemovalPolicy::Migrate);
        assert!(!config.query_cache);
    }

    #[test]
    fn test_parse_removal_policy() {
        assert_eq!("migrate".parse(), Ok(RemovalPolicy::Migrate));
        assert_eq!(" In-Place ".parse(), Ok(RemovalPolicy::InPlace));
        assert_eq!(
            "shrink".parse::<RemovalPolicy>(),
            Err(EcsError::UnknownRemovalPolicy("shrink".to_owned()))
        );
        assert_eq!(RemovalPolicy::Migrate.to_string(), "migrate");
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("cache", "on"), Ok(true));
        assert_eq!(parse_flag("cache", "0"), Ok(false));

        let err = parse_flag("cache", "maybe").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for cache: \"maybe\" (expected true/false)"
        );
    }
}
