use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Lookup of a network name that is not configured.
    #[error("network `{name}` is not configured")]
    NotFound { name: String },

    /// The configuration is malformed. Nothing is loaded.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::InvalidConfig(msg.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        ConfigError::NotFound { name: name.into() }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::InvalidConfig(e.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::InvalidConfig(e.to_string())
    }
}
