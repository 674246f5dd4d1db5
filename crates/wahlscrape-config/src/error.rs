//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `${VAR}` referenced in the file but missing from the environment.
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
