//! Error types for the wheelchair profile
//!
//! Classification itself is total and never fails; only loading and
//! validating a profile configuration can.

use std::path::PathBuf;

/// Main error type for butterfly-wheelchair operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML or does not match the schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but its values are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for butterfly-wheelchair operations
pub type Result<T> = std::result::Result<T, Error>;
