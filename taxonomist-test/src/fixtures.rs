//! Shared fixtures: well-known content ids and a sample taxonomy

use crate::mock::FakePublishingApi;
use serde_json::json;
use std::sync::Arc;
use taxonomist_core::{ContentId, Taxon};
use taxonomist_publishing::{ContentDetails, ContentItem, PublishingApi};

/// Taxon content item as the publishing API would return it
pub fn taxon_item(content_id: &str, title: &str, base_path: &str) -> ContentItem {
    ContentItem {
        content_id: ContentId::from(content_id),
        title: title.to_string(),
        base_path: base_path.to_string(),
        description: Some(format!("{} description", title)),
        document_type: Some("taxon".to_string()),
        schema_name: Some("taxon".to_string()),
        publication_state: Some("published".to_string()),
        phase: Some("live".to_string()),
        details: ContentDetails {
            internal_name: Some(format!("{} [internal]", title)),
            notes_for_editors: Some(String::new()),
            other: json!({ "visible_to_departmental_editors": false })
                .as_object()
                .cloned()
                .unwrap_or_default(),
        },
    }
}

/// Taxon value matching what the builder produces for [`taxon_item`]
pub fn taxon(content_id: &str, title: &str, base_path: &str) -> Taxon {
    let mut taxon = Taxon::with_content_id(ContentId::from(content_id), title, base_path);
    taxon.description = format!("{} description", title);
    taxon.internal_name = format!("{} [internal]", title);
    taxon.publication_state = Some("published".to_string());
    taxon
}

/// Four-taxon sample tree loaded into a [`FakePublishingApi`]
///
/// ```text
/// education (A)
/// ├── schools (B)
/// │   └── admissions (D)
/// └── universities (C)
/// ```
///
/// Two guides are tagged to `schools`.
pub struct TaxonomyFixture {
    pub api: Arc<FakePublishingApi>,
}

impl TaxonomyFixture {
    pub const ROOT: &'static str = "aaaaaaaa-0000-0000-0000-000000000001";
    pub const SCHOOLS: &'static str = "bbbbbbbb-0000-0000-0000-000000000002";
    pub const UNIVERSITIES: &'static str = "cccccccc-0000-0000-0000-000000000003";
    pub const ADMISSIONS: &'static str = "dddddddd-0000-0000-0000-000000000004";

    pub const GUIDE_ONE: &'static str = "eeeeeeee-0000-0000-0000-000000000005";
    pub const GUIDE_TWO: &'static str = "ffffffff-0000-0000-0000-000000000006";

    pub fn new() -> Self {
        let api = Arc::new(FakePublishingApi::new());
        api.add_taxon(Self::ROOT, "Education", "/education", None)
            .add_taxon(Self::SCHOOLS, "Schools", "/education/schools", Some(Self::ROOT))
            .add_taxon(
                Self::UNIVERSITIES,
                "Universities",
                "/education/universities",
                Some(Self::ROOT),
            )
            .add_taxon(
                Self::ADMISSIONS,
                "Admissions",
                "/education/schools/admissions",
                Some(Self::SCHOOLS),
            )
            .add_tagged_content(Self::GUIDE_ONE, "/school-term-dates", &[Self::SCHOOLS])
            .add_tagged_content(Self::GUIDE_TWO, "/school-uniform", &[Self::SCHOOLS]);
        Self { api }
    }

    pub fn id(value: &str) -> ContentId {
        ContentId::from(value)
    }

    /// The fake as the trait object the services take
    pub fn client(&self) -> Arc<dyn PublishingApi> {
        self.api.clone()
    }
}

impl Default for TaxonomyFixture {
    fn default() -> Self {
        Self::new()
    }
}
