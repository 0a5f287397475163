//! Request and response shapes of the publishing API

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use taxonomist_core::ContentId;

/// Link type pointing from a taxon to its parent
pub const PARENT_TAXONS: &str = "parent_taxons";
/// Link type for taxons related to, but not beneath, a taxon
pub const ASSOCIATED_TAXONS: &str = "associated_taxons";
/// Link type from tagged content to its taxons
pub const TAXONS: &str = "taxons";
/// Link type from the homepage to the top-level taxons
pub const ROOT_TAXONS: &str = "root_taxons";

/// A content item as returned by `GET /v2/content/:content_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub content_id: ContentId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub base_path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub schema_name: Option<String>,
    #[serde(default)]
    pub publication_state: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub details: ContentDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_for_editors: Option<String>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// Link set as returned by `GET /v2/links/:content_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkSet {
    #[serde(default)]
    pub links: IndexMap<String, Vec<ContentId>>,
    #[serde(default)]
    pub version: Option<u64>,
}

impl LinkSet {
    pub fn links_of(&self, link_type: &str) -> Option<&Vec<ContentId>> {
        self.links.get(link_type)
    }

    pub fn parent_taxons(&self) -> &[ContentId] {
        self.links_of(PARENT_TAXONS)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// `None` when the key is absent, as opposed to present and empty
    pub fn associated_taxons(&self) -> Option<&Vec<ContentId>> {
        self.links_of(ASSOCIATED_TAXONS)
    }
}

/// Body of `PATCH /v2/links/:content_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinksPatch {
    pub links: IndexMap<String, Vec<ContentId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<u64>,
}

impl LinksPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_links(mut self, link_type: impl Into<String>, ids: Vec<ContentId>) -> Self {
        self.links.insert(link_type.into(), ids);
        self
    }

    pub fn with_previous_version(mut self, version: Option<u64>) -> Self {
        self.previous_version = version;
        self
    }
}

/// Response of `GET /v2/expanded-links/:content_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandedLinks {
    #[serde(default)]
    pub expanded_links: IndexMap<String, Vec<serde_json::Value>>,
    #[serde(default)]
    pub version: u64,
}

/// Summary of an item returned by `GET /v2/linked/:content_id`.
/// Only the requested fields are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<ContentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
}

/// Query for `GET /v2/content`
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItemsQuery {
    pub document_type: String,
    pub page: u32,
    pub per_page: u32,
    pub order: String,
    pub q: Option<String>,
}

impl Default for ContentItemsQuery {
    fn default() -> Self {
        Self {
            document_type: "taxon".to_string(),
            page: 1,
            per_page: 50,
            order: "-public_updated_at".to_string(),
            q: None,
        }
    }
}

impl ContentItemsQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("document_type", self.document_type.clone()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("order", self.order.clone()),
        ];
        if let Some(q) = self.q.as_ref().filter(|q| !q.trim().is_empty()) {
            pairs.push(("q", q.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItemsPage {
    #[serde(default)]
    pub results: Vec<ContentItem>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u64,
    #[serde(default)]
    pub current_page: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnpublishType {
    Redirect,
    Gone,
}

/// Body of `POST /v2/content/:content_id/unpublish`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnpublishRequest {
    #[serde(rename = "type")]
    pub unpublish_type: UnpublishType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl UnpublishRequest {
    pub fn redirect(alternative_path: impl Into<String>) -> Self {
        Self {
            unpublish_type: UnpublishType::Redirect,
            alternative_path: Some(alternative_path.into()),
            explanation: None,
        }
    }

    pub fn gone() -> Self {
        Self {
            unpublish_type: UnpublishType::Gone,
            alternative_path: None,
            explanation: None,
        }
    }
}
