//! Listing taxons held by the publishing API

use crate::error::TaxonomyResult;
use std::sync::Arc;
use taxonomist_core::{Taxon, TaxonSummary};
use taxonomist_publishing::{ContentItemsQuery, PublishingApi};
use tracing::debug;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 50;

/// One page of taxons, most recently updated first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonSearchResults {
    pub taxons: Vec<TaxonSummary>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

#[derive(Clone)]
pub struct RemoteTaxons {
    api: Arc<dyn PublishingApi>,
}

impl RemoteTaxons {
    pub fn new(api: Arc<dyn PublishingApi>) -> Self {
        Self { api }
    }

    pub async fn search(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
        q: Option<&str>,
    ) -> TaxonomyResult<TaxonSearchResults> {
        let query = ContentItemsQuery {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).max(1),
            q: q.map(str::to_string),
            ..ContentItemsQuery::default()
        };
        let page = self.api.get_content_items(&query).await?;

        Ok(TaxonSearchResults {
            taxons: page
                .results
                .into_iter()
                .map(|item| TaxonSummary::new(item.content_id, item.title, item.base_path))
                .collect(),
            total: page.total,
            pages: page.pages,
            current_page: page.current_page,
        })
    }

    /// Every taxon, walking all pages
    pub async fn all(&self) -> TaxonomyResult<Vec<TaxonSummary>> {
        let mut taxons = Vec::new();
        let mut page = DEFAULT_PAGE;
        loop {
            let results = self.search(Some(page), Some(DEFAULT_PER_PAGE), None).await?;
            let fetched = results.taxons.len();
            taxons.extend(results.taxons);
            if fetched == 0 || u64::from(page) >= results.pages {
                break;
            }
            page += 1;
        }
        debug!("Fetched {} taxons", taxons.len());
        Ok(taxons)
    }

    /// Listed taxons that are the parent of `child`
    pub async fn parents_for_taxon(&self, child: &Taxon) -> TaxonomyResult<Vec<TaxonSummary>> {
        let Some(parent_id) = child.parent_content_id.as_ref() else {
            return Ok(Vec::new());
        };
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|taxon| &taxon.content_id == parent_id)
            .collect())
    }
}
