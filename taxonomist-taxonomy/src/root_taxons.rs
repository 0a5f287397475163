//! The taxonomy's top-level taxons, held as `root_taxons` links on the homepage

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::query::child_summary;
use indexmap::IndexSet;
use std::sync::Arc;
use taxonomist_core::{ContentId, TaxonSummary};
use taxonomist_publishing::{LinkedItem, LinksPatch, PublishingApi, PublishingApiError, ROOT_TAXONS};
use tracing::info;

#[derive(Clone)]
pub struct RootTaxons {
    api: Arc<dyn PublishingApi>,
    homepage: ContentId,
}

impl RootTaxons {
    pub fn new(api: Arc<dyn PublishingApi>, homepage: ContentId) -> Self {
        Self { api, homepage }
    }

    /// Current root taxons in link order; empty if the homepage has no links yet
    pub async fn list(&self) -> TaxonomyResult<Vec<TaxonSummary>> {
        let expanded = match self.api.get_expanded_links(&self.homepage).await {
            Ok(expanded) => expanded,
            Err(PublishingApiError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let Some(values) = expanded.expanded_links.get(ROOT_TAXONS) else {
            return Ok(Vec::new());
        };
        values
            .iter()
            .map(|value| {
                let item: LinkedItem = serde_json::from_value(value.clone()).map_err(|e| {
                    PublishingApiError::Decode(format!("root taxons of {}: {}", self.homepage, e))
                })?;
                child_summary(&self.homepage, item)
            })
            .collect()
    }

    /// Replace the root taxons. Every id must name an existing content item.
    pub async fn set(&self, content_ids: &[ContentId]) -> TaxonomyResult<Vec<ContentId>> {
        let roots: IndexSet<ContentId> = content_ids
            .iter()
            .filter(|id| !id.is_blank())
            .cloned()
            .collect();

        for id in &roots {
            self.api
                .get_content(id)
                .await
                .map_err(|e| TaxonomyError::from_lookup(id, e))?;
        }

        let roots: Vec<ContentId> = roots.into_iter().collect();
        let patch = LinksPatch::new().with_links(ROOT_TAXONS, roots.clone());
        self.api.patch_links(&self.homepage, &patch).await?;

        info!("Set {} root taxons on {}", roots.len(), self.homepage);
        Ok(roots)
    }
}
