//! View error types

use std::path::PathBuf;

use cardswipe_animation::CurveError;
use thiserror::Error;

/// Errors raised while loading or validating a view configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write a config file
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML could not be parsed into a config
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The ease curve is malformed
    #[error("invalid ease curve: {0}")]
    Curve(#[from] CurveError),

    /// A value is outside its allowed range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;
