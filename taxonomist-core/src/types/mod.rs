//! Shared value types

pub mod change;
pub mod content_id;
pub mod taxon;
pub mod version;

pub use change::{ChangeEntry, FieldValue};
pub use content_id::ContentId;
pub use taxon::{Taxon, TaxonDraft, TaxonField, TaxonSummary, TRACKED_FIELDS};
pub use version::VersionRecord;
