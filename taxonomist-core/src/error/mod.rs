//! Core error types for Taxonomist

use thiserror::Error;

/// Main error type for Taxonomist operations that are not specific to the
/// remote API or the taxonomy services
#[derive(Error, Debug)]
pub enum TaxonomistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for Taxonomist operations
pub type TaxonomistResult<T> = Result<T, TaxonomistError>;

impl From<serde_json::Error> for TaxonomistError {
    fn from(err: serde_json::Error) -> Self {
        TaxonomistError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for TaxonomistError {
    fn from(err: toml::de::Error) -> Self {
        TaxonomistError::Configuration(format!("Failed to parse config: {}", err))
    }
}

impl From<toml::ser::Error> for TaxonomistError {
    fn from(err: toml::ser::Error) -> Self {
        TaxonomistError::Configuration(format!("Failed to serialize config: {}", err))
    }
}

impl From<anyhow::Error> for TaxonomistError {
    fn from(err: anyhow::Error) -> Self {
        TaxonomistError::Other(err.to_string())
    }
}
