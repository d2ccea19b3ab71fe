use thiserror::Error;

/// Errors that can occur while looking up or persisting recipes
#[derive(Error, Debug)]
pub enum PantryError {
    /// Failed to reach TheMealDB or read its response
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Network error: {0}")]
    StatusError(u16),

    /// Response body was not the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Preferences store could not be read or written
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Client builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
