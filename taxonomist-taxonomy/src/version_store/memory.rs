use super::VersionStore;
use crate::error::TaxonomyResult;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use taxonomist_core::{ChangeEntry, ContentId, VersionRecord};

/// Version log held in process memory
#[derive(Default)]
pub struct InMemoryVersionStore {
    records: Mutex<HashMap<ContentId, Vec<VersionRecord>>>,
}

impl InMemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VersionStore for InMemoryVersionStore {
    async fn append(
        &self,
        content_id: &ContentId,
        changes: Vec<ChangeEntry>,
        note: &str,
    ) -> TaxonomyResult<VersionRecord> {
        let mut records = self.records.lock();
        let history = records.entry(content_id.clone()).or_default();

        let record = VersionRecord {
            content_id: content_id.clone(),
            number: history.len() as u32 + 1,
            object_changes: changes,
            note: note.to_string(),
            created_at: Utc::now(),
        };
        history.push(record.clone());
        Ok(record)
    }

    async fn versions(&self, content_id: &ContentId) -> TaxonomyResult<Vec<VersionRecord>> {
        Ok(self
            .records
            .lock()
            .get(content_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn version(
        &self,
        content_id: &ContentId,
        number: u32,
    ) -> TaxonomyResult<Option<VersionRecord>> {
        Ok(self
            .records
            .lock()
            .get(content_id)
            .and_then(|history| history.iter().find(|r| r.number == number).cloned()))
    }

    async fn count(&self) -> TaxonomyResult<usize> {
        Ok(self.records.lock().values().map(Vec::len).sum())
    }
}
