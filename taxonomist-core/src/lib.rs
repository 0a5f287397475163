//! Core types and utilities shared across all Taxonomist crates

pub mod config;
pub mod error;
pub mod system;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, load_or_default, save_config, Config};
pub use error::{TaxonomistError, TaxonomistResult};

pub use types::{
    ChangeEntry, ContentId, FieldValue, Taxon, TaxonDraft, TaxonField, TaxonSummary, VersionRecord,
    TRACKED_FIELDS,
};

pub use system::{taxonomist_config_path, taxonomist_home, taxonomist_versions_db};

/// Version information for the Taxonomist project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
