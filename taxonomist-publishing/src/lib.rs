//! Publishing API boundary
//!
//! Everything the taxonomy services know about the remote content store goes
//! through the [`PublishingApi`] trait. [`HttpPublishingApi`] talks to the real
//! service over HTTP; tests substitute an in-memory double.

pub mod api;
pub mod error;
pub mod http;
pub mod types;

pub use api::PublishingApi;
pub use error::{ApiResult, PublishingApiError};
pub use http::HttpPublishingApi;
pub use types::{
    ContentDetails, ContentItem, ContentItemsPage, ContentItemsQuery, ExpandedLinks, LinkSet,
    LinkedItem, LinksPatch, UnpublishRequest, UnpublishType, PARENT_TAXONS, ASSOCIATED_TAXONS,
    ROOT_TAXONS, TAXONS,
};
