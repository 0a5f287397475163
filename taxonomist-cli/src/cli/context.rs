//! Wiring shared by the commands: configuration, the remote API and the version log

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use taxonomist_core::{load_or_default, Config, ContentId};
use taxonomist_publishing::{HttpPublishingApi, PublishingApi};
use taxonomist_taxonomy::{
    RootTaxons, SqliteVersionStore, TaxonBuilder, TaxonVersioner, TaxonomyQuery,
    TaxonomyTreeExpander, VersionStore,
};
use tracing::debug;

pub struct AppContext {
    pub config: Config,
    pub api: Arc<dyn PublishingApi>,
}

impl AppContext {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = load_or_default(config_path)?;
        debug!("Using publishing API at {}", config.publishing_api.url);
        let api: Arc<dyn PublishingApi> = Arc::new(HttpPublishingApi::new(&config.publishing_api)?);
        Ok(Self { config, api })
    }

    pub fn builder(&self) -> TaxonBuilder {
        TaxonBuilder::new(self.api.clone())
    }

    pub fn query(&self) -> TaxonomyQuery {
        TaxonomyQuery::new(self.api.clone())
    }

    pub fn expander(&self) -> TaxonomyTreeExpander {
        TaxonomyTreeExpander::with_concurrency(self.api.clone(), self.config.expansion.concurrency)
    }

    pub fn root_taxons(&self) -> RootTaxons {
        let homepage = ContentId::new(self.config.publishing.homepage_content_id.clone());
        RootTaxons::new(self.api.clone(), homepage)
    }

    pub async fn versioner(&self) -> Result<TaxonVersioner> {
        Ok(TaxonVersioner::new(self.builder(), open_versions(&self.config).await?))
    }
}

/// Open the version log without touching the publishing API
pub async fn open_versions(config: &Config) -> Result<Arc<dyn VersionStore>> {
    let path = config.versions_database_path();
    debug!("Opening version log at {}", path.display());
    Ok(Arc::new(SqliteVersionStore::open(&path).await?))
}
