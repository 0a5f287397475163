//! Unpublishing taxons
//!
//! Unpublishing a taxon first (optionally) moves the content tagged to it onto
//! its parent, then redirects the taxon to another one. The redirect is issued
//! whether or not the retag could be queued.

use crate::bulk_tagging::{BuildTagMigration, MigrationQueue};
use crate::error::{TaxonomyError, TaxonomyResult};
use crate::query::TaxonomyQuery;
use std::sync::Arc;
use taxonomist_core::ContentId;
use taxonomist_publishing::{PublishingApi, UnpublishRequest};
use tracing::{info, warn};
use uuid::Uuid;

/// What happened to the content tagged to an unpublished taxon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetagOutcome {
    /// Retagging was not requested
    Skipped,
    /// The taxon has no parent to retag to
    NoParent,
    Queued {
        migration_id: Uuid,
        parent: ContentId,
        content_count: usize,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpublishOutcome {
    pub retag: RetagOutcome,
    pub redirect_path: String,
    pub status: u16,
}

#[derive(Clone)]
pub struct TaxonUnpublisher {
    api: Arc<dyn PublishingApi>,
    query: TaxonomyQuery,
    queue: Arc<dyn MigrationQueue>,
}

impl TaxonUnpublisher {
    pub fn new(api: Arc<dyn PublishingApi>, queue: Arc<dyn MigrationQueue>) -> Self {
        Self {
            query: TaxonomyQuery::new(api.clone()),
            api,
            queue,
        }
    }

    /// Unpublish `taxon_id`, redirecting it to the base path of `redirect_to_id`
    pub async fn unpublish(
        &self,
        taxon_id: &ContentId,
        redirect_to_id: &ContentId,
        user: &str,
        retag: bool,
    ) -> TaxonomyResult<UnpublishOutcome> {
        let retag = if retag {
            match self.tag_to_parent(taxon_id, user).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Could not retag content of {}: {}", taxon_id, e);
                    RetagOutcome::Failed(e.to_string())
                }
            }
        } else {
            RetagOutcome::Skipped
        };

        let redirect_to = self
            .api
            .get_content(redirect_to_id)
            .await
            .map_err(|e| TaxonomyError::from_lookup(redirect_to_id, e))?;
        let status = self
            .api
            .unpublish(taxon_id, &UnpublishRequest::redirect(redirect_to.base_path.clone()))
            .await?;

        info!("Unpublished {} with redirect to {}", taxon_id, redirect_to.base_path);
        Ok(UnpublishOutcome {
            retag,
            redirect_path: redirect_to.base_path,
            status,
        })
    }

    /// Unpublish `taxon_id` as gone, without a redirect
    pub async fn unpublish_gone(&self, taxon_id: &ContentId) -> TaxonomyResult<u16> {
        let status = self.api.unpublish(taxon_id, &UnpublishRequest::gone()).await?;
        info!("Unpublished {} as gone ({})", taxon_id, status);
        Ok(status)
    }

    async fn tag_to_parent(&self, taxon_id: &ContentId, user: &str) -> TaxonomyResult<RetagOutcome> {
        let Some(parent) = self.query.parent(taxon_id).await? else {
            info!("{} has no parent; skipping retag", taxon_id);
            return Ok(RetagOutcome::NoParent);
        };

        let base_paths: Vec<String> = self
            .query
            .tagged_content(taxon_id, &["base_path"])
            .await?
            .into_iter()
            .filter_map(|item| item.base_path)
            .collect();

        let migration = BuildTagMigration::call(
            taxon_id,
            std::slice::from_ref(&parent.content_id),
            &base_paths,
        )?;
        let content_count = migration.content_base_paths().len();
        let migration_id = self.queue.enqueue(migration, user).await?;

        Ok(RetagOutcome::Queued {
            migration_id,
            parent: parent.content_id,
            content_count,
        })
    }
}
