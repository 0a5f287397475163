//! Publishing new and updated taxons

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::presenter::TaxonPresenter;
use crate::versioner::TaxonVersioner;
use std::sync::Arc;
use taxonomist_core::config::PublishingConfig;
use taxonomist_core::{Taxon, VersionRecord};
use taxonomist_publishing::{
    LinksPatch, PublishingApi, PublishingApiError, ASSOCIATED_TAXONS, PARENT_TAXONS,
};
use tracing::{error, info};

pub const SLUG_TAKEN: &str = "A taxon with this slug already exists";
pub const GENERIC_PROBLEM: &str = "There was a problem with your request";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Whether the taxon existed remotely before this publish
    pub created: bool,
    pub version: Option<VersionRecord>,
}

/// Sends a taxon's content and links to the publishing API and records the change
#[derive(Clone)]
pub struct TaxonPublisher {
    api: Arc<dyn PublishingApi>,
    versioner: TaxonVersioner,
    publishing: PublishingConfig,
}

impl TaxonPublisher {
    pub fn new(
        api: Arc<dyn PublishingApi>,
        versioner: TaxonVersioner,
        publishing: PublishingConfig,
    ) -> Self {
        Self {
            api,
            versioner,
            publishing,
        }
    }

    pub async fn publish(&self, taxon: &Taxon, note: &str) -> TaxonomyResult<PublishOutcome> {
        taxon.validate()?;

        let previous = self.versioner.resolve_previous(taxon).await?;

        let payload = TaxonPresenter::new(taxon, &self.publishing).payload();
        if let Err(e) = self.api.put_content(&taxon.content_id, &payload).await {
            return Err(self.classify_put_failure(taxon, e).await);
        }

        self.api
            .patch_links(&taxon.content_id, &links_for(taxon))
            .await?;

        let version = self
            .versioner
            .save_against(taxon, note, previous.as_ref())
            .await?;

        info!("Published taxon {} at {}", taxon.content_id, taxon.base_path);
        Ok(PublishOutcome {
            created: previous.is_none(),
            version,
        })
    }

    async fn classify_put_failure(&self, taxon: &Taxon, err: PublishingApiError) -> TaxonomyError {
        if !err.is_unprocessable() {
            return err.into();
        }

        match self.api.lookup_content_id(&taxon.base_path).await {
            Ok(Some(_)) => TaxonomyError::InvalidTaxon(SLUG_TAKEN.to_string()),
            _ => {
                error!("Publishing {} was rejected: {}", taxon.content_id, err);
                TaxonomyError::InvalidTaxon(GENERIC_PROBLEM.to_string())
            }
        }
    }
}

/// Links patch carrying the taxon's parent and associated taxons
pub fn links_for(taxon: &Taxon) -> LinksPatch {
    let parents = taxon.parent_content_id.iter().cloned().collect();
    let mut patch = LinksPatch::new().with_links(PARENT_TAXONS, parents);
    if let Some(associated) = &taxon.associated_taxons {
        patch = patch.with_links(ASSOCIATED_TAXONS, associated.iter().cloned().collect());
    }
    patch
}
