//! Expanded links of a content item, grouped by tag type

use crate::error::{TaxonomyError, TaxonomyResult};
use indexmap::IndexMap;
use taxonomist_core::ContentId;
use taxonomist_publishing::{LinkedItem, PublishingApi, PublishingApiError};

/// Link types an editor can tag content with
pub const TAG_TYPES: [&str; 7] = [
    "taxons",
    "ordered_related_items",
    "mainstream_browse_pages",
    "parent",
    "topics",
    "organisations",
    "meets_user_needs",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ContentItemExpandedLinks {
    pub content_id: ContentId,
    /// Link set version, for optimistic locking on the next patch
    pub previous_version: u64,
    tags: IndexMap<&'static str, Vec<LinkedItem>>,
}

impl ContentItemExpandedLinks {
    pub async fn find(api: &dyn PublishingApi, content_id: &ContentId) -> TaxonomyResult<Self> {
        let expanded = api
            .get_expanded_links(content_id)
            .await
            .map_err(|e| TaxonomyError::from_lookup(content_id, e))?;

        let mut tags = IndexMap::with_capacity(TAG_TYPES.len());
        for tag_type in TAG_TYPES {
            let items = match expanded.expanded_links.get(tag_type) {
                Some(values) => values
                    .iter()
                    .map(|value| serde_json::from_value(value.clone()))
                    .collect::<Result<Vec<LinkedItem>, _>>()
                    .map_err(|e| {
                        TaxonomyError::Api(PublishingApiError::Decode(format!(
                            "{} links of {}: {}",
                            tag_type, content_id, e
                        )))
                    })?,
                None => Vec::new(),
            };
            tags.insert(tag_type, items);
        }

        Ok(Self {
            content_id: content_id.clone(),
            previous_version: expanded.version,
            tags,
        })
    }

    /// Links of one tag type; empty for types that are not tracked
    pub fn tags(&self, tag_type: &str) -> &[LinkedItem] {
        self.tags.get(tag_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn taxons(&self) -> &[LinkedItem] {
        self.tags("taxons")
    }

    /// Tag types in display order with their links
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[LinkedItem])> {
        self.tags.iter().map(|(tag_type, items)| (*tag_type, items.as_slice()))
    }
}
