//! Asynchronous publication of tag migrations

use super::migration::{MappingState, MigrationState, TagMapping, TagMigration};
use crate::error::{TaxonomyError, TaxonomyResult};
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;
use taxonomist_core::ContentId;
use taxonomist_publishing::{LinkSet, LinksPatch, PublishingApi, PublishingApiError, TAXONS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Somewhere tag migrations can be handed off for publication
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MigrationQueue: Send + Sync {
    /// Accept a migration; returns once it is queued, not once it is published
    async fn enqueue(&self, migration: TagMigration, user: &str) -> TaxonomyResult<Uuid>;
}

type MigrationTable = Arc<Mutex<IndexMap<Uuid, TagMigration>>>;

/// In-process queue drained by a single background worker
pub struct PublishingQueue {
    sender: Mutex<Option<mpsc::UnboundedSender<Uuid>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    migrations: MigrationTable,
}

impl PublishingQueue {
    /// Spawn the worker on the current tokio runtime
    pub fn start(api: Arc<dyn PublishingApi>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let migrations: MigrationTable = Arc::new(Mutex::new(IndexMap::new()));
        let worker = tokio::spawn(run_worker(api, receiver, migrations.clone()));

        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            migrations,
        }
    }

    /// Snapshot of a migration's current state
    pub fn status(&self, id: &Uuid) -> Option<TagMigration> {
        self.migrations.lock().get(id).cloned()
    }

    pub fn migrations(&self) -> Vec<TagMigration> {
        self.migrations.lock().values().cloned().collect()
    }

    /// Stop accepting work, let the worker drain the queue and wait for it
    pub async fn shutdown(&self) -> TaxonomyResult<()> {
        self.sender.lock().take();
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            worker
                .await
                .map_err(|e| TaxonomyError::Queue(format!("worker failed: {}", e)))?;
        }
        Ok(())
    }
}

#[async_trait]
impl MigrationQueue for PublishingQueue {
    async fn enqueue(&self, mut migration: TagMigration, user: &str) -> TaxonomyResult<Uuid> {
        let id = migration.id;
        let now = Utc::now();
        migration.state = MigrationState::Queued;
        migration.requested_by = Some(user.to_string());
        for mapping in &mut migration.mappings {
            mapping.mark_requested(now);
        }
        let mapping_count = migration.mappings.len();
        self.migrations.lock().insert(id, migration);

        let sent = match self.sender.lock().as_ref() {
            Some(sender) => sender.send(id).is_ok(),
            None => false,
        };
        if !sent {
            self.migrations.lock().shift_remove(&id);
            return Err(TaxonomyError::Queue("publishing queue is shut down".to_string()));
        }

        info!("Queued tag migration {} ({} mappings) for {}", id, mapping_count, user);
        Ok(id)
    }
}

async fn run_worker(
    api: Arc<dyn PublishingApi>,
    mut receiver: mpsc::UnboundedReceiver<Uuid>,
    migrations: MigrationTable,
) {
    while let Some(id) = receiver.recv().await {
        let migration = migrations.lock().get(&id).cloned();
        let Some(mut migration) = migration else {
            warn!("Tag migration {} vanished before publication", id);
            continue;
        };

        publish_migration(api.as_ref(), &mut migration).await;
        info!(
            "Published tag migration {}: {} tagged, {} errored",
            id,
            migration.count_in(MappingState::Tagged),
            migration.count_in(MappingState::Errored)
        );
        migrations.lock().insert(id, migration);
    }
    debug!("Publishing queue drained");
}

async fn publish_migration(api: &dyn PublishingApi, migration: &mut TagMigration) {
    let base_paths: Vec<String> = migration
        .content_base_paths()
        .into_iter()
        .map(str::to_string)
        .collect();

    for base_path in base_paths {
        let mut targets: IndexMap<String, Vec<ContentId>> = IndexMap::new();
        for mapping in migration
            .mappings
            .iter()
            .filter(|m| m.content_base_path == base_path && !m.is_settled())
        {
            targets
                .entry(mapping.link_type.clone())
                .or_default()
                .push(mapping.link_content_id.clone());
        }
        if targets.is_empty() {
            continue;
        }

        let result = retag(api, &base_path, migration.source_content_id.as_ref(), &targets).await;
        let completed_at = Utc::now();
        for mapping in migration
            .mappings
            .iter_mut()
            .filter(|m| m.content_base_path == base_path)
        {
            settle(mapping, &result, completed_at);
        }
    }

    migration.state = MigrationState::Completed;
}

fn settle(
    mapping: &mut TagMapping,
    result: &Result<ContentId, String>,
    at: chrono::DateTime<Utc>,
) {
    match result {
        Ok(content_id) => mapping.mark_tagged(content_id.clone(), at),
        Err(message) => mapping.mark_errored(message.clone()),
    }
}

/// Add `targets` to one content item's links, keyed by link type
///
/// When `source` is set its `taxons` link is replaced by the new taxons.
async fn retag(
    api: &dyn PublishingApi,
    base_path: &str,
    source: Option<&ContentId>,
    targets: &IndexMap<String, Vec<ContentId>>,
) -> Result<ContentId, String> {
    let content_id = api
        .lookup_content_id(base_path)
        .await
        .map_err(|e| format!("Lookup failed: {}", e))?
        .ok_or_else(|| format!("No content found at {}", base_path))?;

    let links = match api.get_links(&content_id).await {
        Ok(links) => links,
        Err(PublishingApiError::NotFound(_)) => LinkSet::default(),
        Err(e) => return Err(format!("Could not read links: {}", e)),
    };

    let mut patch = LinksPatch::new().with_previous_version(links.version);
    for (link_type, new_links) in targets {
        let current = links.links_of(link_type).cloned().unwrap_or_default();
        let updated = match source {
            Some(source) if link_type == TAXONS => replace_taxon(&current, source, new_links),
            _ => append_links(&current, new_links),
        };
        patch = patch.with_links(link_type.as_str(), updated);
    }

    api.patch_links(&content_id, &patch).await.map_err(|e| {
        warn!("Retagging {} failed: {}", base_path, e);
        format!("Publishing failed: {}", e)
    })?;

    debug!("Retagged {} ({})", base_path, content_id);
    Ok(content_id)
}

fn append_links(current: &[ContentId], additions: &[ContentId]) -> Vec<ContentId> {
    let mut links = current.to_vec();
    for id in additions {
        if !links.contains(id) {
            links.push(id.clone());
        }
    }
    links
}

/// `current` with `source` swapped for `targets` in place, without duplicates
pub fn replace_taxon(current: &[ContentId], source: &ContentId, targets: &[ContentId]) -> Vec<ContentId> {
    let mut replaced: Vec<ContentId> = Vec::with_capacity(current.len() + targets.len());
    let push = |id: &ContentId, out: &mut Vec<ContentId>| {
        if !out.contains(id) {
            out.push(id.clone());
        }
    };

    let mut swapped = false;
    for id in current {
        if id == source {
            targets.iter().for_each(|t| push(t, &mut replaced));
            swapped = true;
        } else {
            push(id, &mut replaced);
        }
    }
    if !swapped {
        targets.iter().for_each(|t| push(t, &mut replaced));
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk_tagging::BuildTagMigration;
    use taxonomist_test::{FakePublishingApi, InjectedFailure, Operation};

    fn ids(values: &[&str]) -> Vec<ContentId> {
        values.iter().map(|v| ContentId::from(*v)).collect()
    }

    #[test]
    fn test_replace_taxon_keeps_position() {
        assert_eq!(
            replace_taxon(&ids(&["a", "src", "b"]), &ContentId::from("src"), &ids(&["p"])),
            ids(&["a", "p", "b"])
        );
        assert_eq!(
            replace_taxon(&ids(&["p", "src"]), &ContentId::from("src"), &ids(&["p"])),
            ids(&["p"])
        );
        assert_eq!(
            replace_taxon(&ids(&["a"]), &ContentId::from("src"), &ids(&["p"])),
            ids(&["a", "p"])
        );
    }

    #[tokio::test]
    async fn test_worker_retags_and_records_outcomes() {
        let api = Arc::new(FakePublishingApi::new());
        api.add_tagged_content("guide", "/guide", &["other", "src"]);
        let queue = PublishingQueue::start(api.clone());

        let migration = BuildTagMigration::call(
            &ContentId::from("src"),
            &ids(&["parent"]),
            &["/guide".to_string(), "/missing".to_string()],
        )
        .unwrap();
        let id = queue.enqueue(migration, "editor").await.unwrap();
        queue.shutdown().await.unwrap();

        let done = queue.status(&id).unwrap();
        assert!(done.is_complete());
        assert_eq!(done.requested_by.as_deref(), Some("editor"));
        assert_eq!(done.count_in(MappingState::Tagged), 1);
        assert_eq!(done.count_in(MappingState::Errored), 1);
        assert!(done.mappings[0].publish_confirmed());
        assert_eq!(api.links("guide").links_of(TAXONS).unwrap(), &ids(&["other", "parent"]));
    }

    #[tokio::test]
    async fn test_patch_failure_marks_mapping_errored() {
        let api = Arc::new(FakePublishingApi::new());
        api.add_tagged_content("guide", "/guide", &["src"])
            .fail_on(Operation::PatchLinks, InjectedFailure::Server(500));
        let queue = PublishingQueue::start(api);

        let migration =
            BuildTagMigration::call(&ContentId::from("src"), &ids(&["p"]), &["/guide".to_string()])
                .unwrap();
        let id = queue.enqueue(migration, "editor").await.unwrap();
        queue.shutdown().await.unwrap();

        let done = queue.status(&id).unwrap();
        assert_eq!(done.mappings[0].state, MappingState::Errored);
        assert!(done.mappings[0].messages[0].starts_with("Publishing failed"));
    }

    #[tokio::test]
    async fn test_imported_mappings_add_links_by_type() {
        let api = Arc::new(FakePublishingApi::new());
        api.add_tagged_content("guide", "/guide", &["existing"])
            .set_links("guide", "organisations", &["hmrc"]);
        let queue = PublishingQueue::start(api.clone());

        let migration = BuildTagMigration::from_import(vec![
            TagMapping::new("/guide", ContentId::from("tourism")),
            TagMapping::new("/guide", ContentId::from("existing")),
            TagMapping::new("/guide", ContentId::from("dvla")).with_link_type("organisations"),
        ])
        .unwrap();
        let id = queue.enqueue(migration, "importer").await.unwrap();
        queue.shutdown().await.unwrap();

        let done = queue.status(&id).unwrap();
        assert_eq!(done.count_in(MappingState::Tagged), 3);
        assert_eq!(api.patches().len(), 1);
        let links = api.links("guide");
        assert_eq!(links.links_of(TAXONS).unwrap(), &ids(&["existing", "tourism"]));
        assert_eq!(links.links_of("organisations").unwrap(), &ids(&["hmrc", "dvla"]));
    }

    #[tokio::test]
    async fn test_enqueue_after_shutdown_fails() {
        let queue = PublishingQueue::start(Arc::new(FakePublishingApi::new()));
        queue.shutdown().await.unwrap();

        let migration =
            BuildTagMigration::call(&ContentId::from("src"), &ids(&["p"]), &["/a".to_string()])
                .unwrap();
        let err = queue.enqueue(migration, "editor").await.unwrap_err();
        assert!(matches!(err, TaxonomyError::Queue(_)));
        assert!(queue.migrations().is_empty());
    }
}
