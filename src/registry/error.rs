//! Registration error types.

use thiserror::Error;

/// Reasons an option registration is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("The configuration key must be a non-empty string")]
    EmptyKey,

    #[error("Option '{key}': you must provide either a short or a long flag - both cannot be empty")]
    NoFlags { key: String },

    #[error("Option '{key}': invalid short flag '{flag}' (expected a single character)")]
    InvalidShortFlag { key: String, flag: String },

    #[error("Option '{key}': invalid long flag '{flag}'")]
    InvalidLongFlag { key: String, flag: String },

    #[error("Option '{key}': flag '{flag}' is reserved for usage help")]
    ReservedFlag { key: String, flag: String },

    #[error("Option key '{0}' is reserved")]
    ReservedKey(String),

    #[error("Option '{key}': flag {flags} is already used by option '{existing}'")]
    FlagCollision { key: String, flags: String, existing: String },
}
