//! Error types.
//!
//! Storage operations never fail: absence is reported as `None` or an empty
//! result. Errors only arise when building a configuration from text.

use thiserror::Error;

/// Error type for the fallible configuration surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EcsError {
    /// A removal policy name that is neither `in-place` nor `migrate`.
    #[error("unknown removal policy: {0:?} (expected \"in-place\" or \"migrate\")")]
    UnknownRemovalPolicy(String),

    /// A boolean flag that could not be parsed.
    #[error("invalid value for {key}: {value:?} (expected true/false)")]
    InvalidFlag {
        /// Name of the setting.
        key: &'static str,
        /// The rejected text.
        value: String,
    },
}

/// Result type for configuration parsing.
pub type EcsResult<T> = Result<T, EcsError>;
