//! Relationship lookups against the remote link graph

use crate::builder::TaxonBuilder;
use crate::error::{TaxonomyError, TaxonomyResult};
use std::collections::HashSet;
use std::sync::Arc;
use taxonomist_core::{ContentId, Taxon, TaxonSummary};
use taxonomist_publishing::{
    LinkSet, LinkedItem, PublishingApi, PublishingApiError, PARENT_TAXONS, TAXONS,
};
use tracing::debug;

/// Fields requested for child taxons
pub const CHILD_FIELDS: [&str; 3] = ["content_id", "title", "base_path"];

/// Parent, ancestor, child and tagged-content lookups.
///
/// Every call reads the remote state afresh; nothing is cached.
#[derive(Clone)]
pub struct TaxonomyQuery {
    api: Arc<dyn PublishingApi>,
    builder: TaxonBuilder,
}

impl TaxonomyQuery {
    pub fn new(api: Arc<dyn PublishingApi>) -> Self {
        let builder = TaxonBuilder::new(api.clone());
        Self { api, builder }
    }

    async fn links(&self, content_id: &ContentId) -> TaxonomyResult<LinkSet> {
        match self.api.get_links(content_id).await {
            Ok(links) => Ok(links),
            Err(PublishingApiError::NotFound(_)) => Ok(LinkSet::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// First entry of the taxon's `parent_taxons` link, if any
    pub async fn parent_id(&self, content_id: &ContentId) -> TaxonomyResult<Option<ContentId>> {
        Ok(self.links(content_id).await?.parent_taxons().first().cloned())
    }

    pub async fn parent(&self, content_id: &ContentId) -> TaxonomyResult<Option<Taxon>> {
        match self.parent_id(content_id).await? {
            Some(parent_id) => Ok(Some(self.builder.build(&parent_id).await?)),
            None => Ok(None),
        }
    }

    /// Ancestors of the taxon, top-level taxon first
    pub async fn ancestors(&self, content_id: &ContentId) -> TaxonomyResult<Vec<Taxon>> {
        let mut visited = HashSet::from([content_id.clone()]);
        let mut ancestors = Vec::new();
        let mut current = content_id.clone();

        while let Some(parent_id) = self.parent_id(&current).await? {
            if !visited.insert(parent_id.clone()) {
                return Err(TaxonomyError::MalformedTaxonomy {
                    content_id: parent_id,
                    reason: format!("parent chain of {} loops", content_id),
                });
            }
            ancestors.push(self.builder.build(&parent_id).await?);
            current = parent_id;
        }

        debug!("{} has {} ancestors", content_id, ancestors.len());
        ancestors.reverse();
        Ok(ancestors)
    }

    /// Direct children of the taxon, in remote order
    pub async fn children(&self, content_id: &ContentId) -> TaxonomyResult<Vec<TaxonSummary>> {
        let items = self
            .api
            .get_linked_items(content_id, PARENT_TAXONS, &CHILD_FIELDS)
            .await?;
        items
            .into_iter()
            .map(|item| child_summary(content_id, item))
            .collect()
    }

    /// Content tagged to the taxon
    pub async fn tagged_content(
        &self,
        content_id: &ContentId,
        fields: &[&str],
    ) -> TaxonomyResult<Vec<LinkedItem>> {
        Ok(self.api.get_linked_items(content_id, TAXONS, fields).await?)
    }
}

/// Convert a linked item into a tree node payload
pub(crate) fn child_summary(parent: &ContentId, item: LinkedItem) -> TaxonomyResult<TaxonSummary> {
    let content_id = item.content_id.ok_or_else(|| TaxonomyError::MalformedTaxonomy {
        content_id: parent.clone(),
        reason: "child link without a content_id".to_string(),
    })?;
    Ok(TaxonSummary {
        content_id,
        title: item.title.unwrap_or_default(),
        base_path: item.base_path.unwrap_or_default(),
    })
}
