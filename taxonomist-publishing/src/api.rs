/// The remote content store as seen by the taxonomy services
use async_trait::async_trait;
use taxonomist_core::ContentId;

use crate::error::ApiResult;
use crate::types::{
    ContentItem, ContentItemsPage, ContentItemsQuery, ExpandedLinks, LinkSet, LinkedItem,
    LinksPatch, UnpublishRequest,
};

/// Operations the taxonomy services need from the publishing API.
///
/// Implementations hold no taxonomy state of their own: every call reflects
/// the remote store at the time it is made.
#[async_trait]
pub trait PublishingApi: Send + Sync {
    /// Fetch a content item; `NotFound` when it does not exist
    async fn get_content(&self, content_id: &ContentId) -> ApiResult<ContentItem>;

    /// Fetch the link set of a content item
    async fn get_links(&self, content_id: &ContentId) -> ApiResult<LinkSet>;

    /// Fetch the expanded links of a content item
    async fn get_expanded_links(&self, content_id: &ContentId) -> ApiResult<ExpandedLinks>;

    /// Items whose `link_type` links point at `content_id`, in remote order
    async fn get_linked_items(
        &self,
        content_id: &ContentId,
        link_type: &str,
        fields: &[&str],
    ) -> ApiResult<Vec<LinkedItem>>;

    /// One page of content items of a document type
    async fn get_content_items(&self, query: &ContentItemsQuery) -> ApiResult<ContentItemsPage>;

    async fn patch_links(&self, content_id: &ContentId, patch: &LinksPatch) -> ApiResult<()>;

    async fn put_content(&self, content_id: &ContentId, payload: &serde_json::Value)
        -> ApiResult<()>;

    /// Unpublish a content item, returning the HTTP status code
    async fn unpublish(&self, content_id: &ContentId, request: &UnpublishRequest)
        -> ApiResult<u16>;

    /// Resolve the content id currently registered at a base path
    async fn lookup_content_id(&self, base_path: &str) -> ApiResult<Option<ContentId>>;
}
