/// Version log records
use crate::types::change::ChangeEntry;
use crate::types::content_id::ContentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable audit entry for a single taxon change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub content_id: ContentId,
    /// 1-based, monotonic per content id
    pub number: u32,
    pub object_changes: Vec<ChangeEntry>,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl VersionRecord {
    pub fn is_first(&self) -> bool {
        self.number == 1
    }

    /// A version with a note but no field changes (e.g. a restore)
    pub fn is_note_only(&self) -> bool {
        self.object_changes.is_empty()
    }
}
