//! Assembling a [`Taxon`] from remote state

use crate::error::{TaxonomyError, TaxonomyResult};
use indexmap::IndexSet;
use std::sync::Arc;
use taxonomist_core::{ContentId, Taxon};
use taxonomist_publishing::{ContentItem, LinkSet, PublishingApi, PublishingApiError};
use tracing::debug;

/// Builds a taxon from its content item and link set
#[derive(Clone)]
pub struct TaxonBuilder {
    api: Arc<dyn PublishingApi>,
}

impl TaxonBuilder {
    pub fn new(api: Arc<dyn PublishingApi>) -> Self {
        Self { api }
    }

    /// Fetch content and links concurrently and combine them.
    ///
    /// A missing content item is `TaxonNotFound`; a missing link set is
    /// treated as empty.
    pub async fn build(&self, content_id: &ContentId) -> TaxonomyResult<Taxon> {
        debug!("Building taxon {}", content_id);

        let (content, links) = tokio::try_join!(
            async {
                self.api
                    .get_content(content_id)
                    .await
                    .map_err(|e| TaxonomyError::from_lookup(content_id, e))
            },
            async {
                match self.api.get_links(content_id).await {
                    Ok(links) => Ok(links),
                    Err(PublishingApiError::NotFound(_)) => Ok(LinkSet::default()),
                    Err(e) => Err(TaxonomyError::Api(e)),
                }
            }
        )?;

        Ok(Self::assemble(content, &links))
    }

    /// Combine an already fetched content item and link set
    pub fn assemble(content: ContentItem, links: &LinkSet) -> Taxon {
        let mut taxon = Taxon::with_content_id(content.content_id, content.title, content.base_path);

        taxon.description = content.description.unwrap_or_default();
        taxon.internal_name = content.details.internal_name.unwrap_or_default();
        taxon.notes_for_editors = content.details.notes_for_editors.unwrap_or_default();
        if let Some(phase) = content.phase.filter(|p| !p.is_empty()) {
            taxon.phase = phase;
        }
        taxon.publication_state = content.publication_state;
        taxon.parent_content_id = links.parent_taxons().first().cloned();
        taxon.associated_taxons = links
            .associated_taxons()
            .map(|ids| ids.iter().cloned().collect::<IndexSet<_>>());

        taxon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use taxonomist_publishing::{ASSOCIATED_TAXONS, PARENT_TAXONS};
    use taxonomist_test::{taxon_item, FakePublishingApi, InjectedFailure, Operation};

    #[tokio::test]
    async fn test_build_maps_content_and_links() {
        let api = Arc::new(FakePublishingApi::new());
        api.add_content(taxon_item("t", "Tourism", "/business/tourism"))
            .set_links("t", PARENT_TAXONS, &["p1", "p2"])
            .set_links("t", ASSOCIATED_TAXONS, &["m", "n"]);

        let taxon = TaxonBuilder::new(api.clone()).build(&ContentId::from("t")).await.unwrap();

        assert_eq!(taxon.title, "Tourism");
        assert_eq!(taxon.base_path, "/business/tourism");
        assert_eq!(taxon.description, "Tourism description");
        assert_eq!(taxon.internal_name, "Tourism [internal]");
        assert_eq!(taxon.notes_for_editors, "");
        assert_eq!(taxon.parent_content_id, Some(ContentId::from("p1")));
        let associated: Vec<_> = taxon.associated_taxons.unwrap().into_iter().collect();
        assert_eq!(associated, vec![ContentId::from("m"), ContentId::from("n")]);
        assert_eq!(api.calls_to(Operation::GetContent), 1);
        assert_eq!(api.calls_to(Operation::GetLinks), 1);
    }

    #[tokio::test]
    async fn test_build_without_links() {
        let api = Arc::new(FakePublishingApi::new());
        api.add_content(taxon_item("t", "Tourism", "/tourism"));

        let taxon = TaxonBuilder::new(api).build(&ContentId::from("t")).await.unwrap();
        assert!(taxon.is_root());
        assert!(taxon.associated_taxons.is_none());
    }

    #[tokio::test]
    async fn test_missing_content_is_taxon_not_found() {
        let api = Arc::new(FakePublishingApi::new());
        let err = TaxonBuilder::new(api).build(&ContentId::from("nope")).await.unwrap_err();
        assert!(matches!(err, TaxonomyError::TaxonNotFound(id) if id.as_str() == "nope"));
    }

    #[tokio::test]
    async fn test_missing_links_treated_as_empty() {
        let api = Arc::new(FakePublishingApi::new());
        api.add_content(taxon_item("t", "Tourism", "/tourism"))
            .fail_on(Operation::GetLinks, InjectedFailure::NotFound);

        let taxon = TaxonBuilder::new(api).build(&ContentId::from("t")).await.unwrap();
        assert!(taxon.parent_content_id.is_none());
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let api = Arc::new(FakePublishingApi::new());
        api.add_content(taxon_item("t", "Tourism", "/tourism"))
            .fail_on(Operation::GetLinks, InjectedFailure::Timeout);

        let err = TaxonBuilder::new(api).build(&ContentId::from("t")).await.unwrap_err();
        assert!(matches!(err, TaxonomyError::Api(PublishingApiError::Transport(_))));
    }

    #[test]
    fn test_missing_phase_defaults_to_live() {
        let mut item = taxon_item("t", "Tourism", "/tourism");
        item.phase = None;
        let taxon = TaxonBuilder::assemble(item, &LinkSet::default());
        assert_eq!(taxon.phase, "live");
    }
}
