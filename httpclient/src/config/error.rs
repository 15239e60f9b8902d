//! Configuration errors.

use thiserror::Error;

/// Raised while building a [`Config`](super::Config), before any request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `host` is empty or whitespace.
    #[error("host attribute is needed")]
    MissingHost,

    /// `integration` is empty or whitespace.
    #[error("integration attribute is needed")]
    MissingIntegration,

    /// The JSON descriptor could not be deserialized.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The YAML descriptor could not be deserialized.
    #[cfg(feature = "yaml")]
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
