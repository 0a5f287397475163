//! Append-only version log
//!
//! Each taxon has its own sequence of [`VersionRecord`]s numbered from 1.
//! Records are never updated or deleted once appended.

mod memory;
mod sqlite;

pub use memory::InMemoryVersionStore;
pub use sqlite::SqliteVersionStore;

use crate::error::TaxonomyResult;
use async_trait::async_trait;
use taxonomist_core::{ChangeEntry, ContentId, VersionRecord};

#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Append a record, assigning the next number for `content_id`
    async fn append(
        &self,
        content_id: &ContentId,
        changes: Vec<ChangeEntry>,
        note: &str,
    ) -> TaxonomyResult<VersionRecord>;

    /// All records for `content_id`, ascending by number
    async fn versions(&self, content_id: &ContentId) -> TaxonomyResult<Vec<VersionRecord>>;

    async fn version(
        &self,
        content_id: &ContentId,
        number: u32,
    ) -> TaxonomyResult<Option<VersionRecord>>;

    /// Total number of records across all taxons
    async fn count(&self) -> TaxonomyResult<usize>;

    async fn latest(&self, content_id: &ContentId) -> TaxonomyResult<Option<VersionRecord>> {
        Ok(self.versions(content_id).await?.pop())
    }
}
