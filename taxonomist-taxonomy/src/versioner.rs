//! Recording taxon changes in the version log

use crate::builder::TaxonBuilder;
use crate::diff::TaxonDiffEngine;
use crate::error::{TaxonomyError, TaxonomyResult};
use crate::version_store::VersionStore;
use std::sync::Arc;
use taxonomist_core::{ChangeEntry, Taxon, VersionRecord};
use tracing::{debug, info};

/// Diffs a taxon against its previous state and appends a version record
#[derive(Clone)]
pub struct TaxonVersioner {
    builder: TaxonBuilder,
    store: Arc<dyn VersionStore>,
    diff: TaxonDiffEngine,
}

impl TaxonVersioner {
    pub fn new(builder: TaxonBuilder, store: Arc<dyn VersionStore>) -> Self {
        Self {
            builder,
            store,
            diff: TaxonDiffEngine::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn VersionStore> {
        &self.store
    }

    /// Save a version of `taxon`.
    ///
    /// When `previous` is not given, the remote state of the taxon is used;
    /// a taxon that does not exist remotely yet gets its first version.
    /// Returns `None` when the note is blank and nothing changed.
    pub async fn save(
        &self,
        taxon: &Taxon,
        note: &str,
        previous: Option<&Taxon>,
    ) -> TaxonomyResult<Option<VersionRecord>> {
        match previous {
            Some(previous) => self.save_against(taxon, note, Some(previous)).await,
            None => {
                let remote = self.resolve_previous(taxon).await?;
                self.save_against(taxon, note, remote.as_ref()).await
            }
        }
    }

    /// Save a version of `taxon` against an explicit previous snapshot
    pub async fn save_against(
        &self,
        taxon: &Taxon,
        note: &str,
        previous: Option<&Taxon>,
    ) -> TaxonomyResult<Option<VersionRecord>> {
        let changes = self.diff.diff(previous, taxon);
        self.record(taxon, changes, note).await
    }

    /// Record the deletion of `previous`
    pub async fn save_removal(
        &self,
        previous: &Taxon,
        note: &str,
    ) -> TaxonomyResult<Option<VersionRecord>> {
        let changes = self.diff.removal(previous);
        self.record(previous, changes, note).await
    }

    /// Remote state of `taxon`, or `None` when it has never been published
    pub async fn resolve_previous(&self, taxon: &Taxon) -> TaxonomyResult<Option<Taxon>> {
        match self.builder.build(&taxon.content_id).await {
            Ok(previous) => Ok(Some(previous)),
            Err(TaxonomyError::TaxonNotFound(_)) => {
                debug!("No previous state for {}", taxon.content_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn record(
        &self,
        taxon: &Taxon,
        changes: Vec<ChangeEntry>,
        note: &str,
    ) -> TaxonomyResult<Option<VersionRecord>> {
        if note.trim().is_empty() && changes.is_empty() {
            debug!("Nothing to record for {}", taxon.content_id);
            return Ok(None);
        }

        let record = self.store.append(&taxon.content_id, changes, note).await?;
        info!(
            "Saved version {} of {} ({} changes)",
            record.number,
            taxon.content_id,
            record.object_changes.len()
        );
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version_store::InMemoryVersionStore;
    use taxonomist_test::{taxon, FakePublishingApi, InjectedFailure, Operation};

    fn versioner(api: Arc<FakePublishingApi>) -> (TaxonVersioner, Arc<InMemoryVersionStore>) {
        let store = Arc::new(InMemoryVersionStore::new());
        (TaxonVersioner::new(TaxonBuilder::new(api), store.clone()), store)
    }

    #[tokio::test]
    async fn test_explicit_previous_skips_remote() {
        let api = Arc::new(FakePublishingApi::new());
        let (versioner, store) = versioner(api.clone());

        let previous = taxon("t", "Tourism", "/tourism");
        let mut current = previous.clone();
        current.title = "Travel".into();

        let record = versioner.save(&current, "", Some(&previous)).await.unwrap().unwrap();
        assert_eq!(record.object_changes.len(), 1);
        assert_eq!(api.calls_to(Operation::GetContent), 0);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_propagates() {
        let api = Arc::new(FakePublishingApi::new());
        api.fail_on(Operation::GetContent, InjectedFailure::Server(502));
        let (versioner, store) = versioner(api);

        let result = versioner.save(&taxon("t", "Tourism", "/tourism"), "note", None).await;
        assert!(matches!(result, Err(TaxonomyError::Api(_))));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_removal_is_recorded_with_blank_note() {
        let api = Arc::new(FakePublishingApi::new());
        let (versioner, _store) = versioner(api);

        let record = versioner
            .save_removal(&taxon("t", "Tourism", "/tourism"), "")
            .await
            .unwrap()
            .unwrap();
        assert!(record.object_changes.iter().all(|c| c.op() == ChangeEntry::REMOVED));
    }
}
