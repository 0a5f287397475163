//! In-memory publishing API
//!
//! Holds content items and link sets in insertion order so that reverse link
//! lookups come back in a stable "remote" order.

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use taxonomist_core::ContentId;
use taxonomist_publishing::{
    ApiResult, ContentDetails, ContentItem, ContentItemsPage, ContentItemsQuery, ExpandedLinks,
    LinkSet, LinkedItem, LinksPatch, PublishingApi, PublishingApiError, UnpublishRequest,
    PARENT_TAXONS, TAXONS,
};

/// API operations, used for call counting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetContent,
    GetLinks,
    GetExpandedLinks,
    GetLinkedItems,
    GetContentItems,
    PatchLinks,
    PutContent,
    Unpublish,
    LookupContentId,
}

/// Failure returned by an operation instead of its normal result
#[derive(Debug, Clone, PartialEq)]
pub enum InjectedFailure {
    NotFound,
    Unprocessable(String),
    Server(u16),
    Timeout,
}

impl InjectedFailure {
    fn to_error(&self, resource: &str) -> PublishingApiError {
        match self {
            InjectedFailure::NotFound => PublishingApiError::NotFound(resource.to_string()),
            InjectedFailure::Unprocessable(message) => PublishingApiError::UnprocessableEntity {
                message: message.clone(),
            },
            InjectedFailure::Server(status) => PublishingApiError::Http {
                status: *status,
                body: "injected failure".to_string(),
            },
            InjectedFailure::Timeout => {
                PublishingApiError::Transport("operation timed out".to_string())
            }
        }
    }
}

#[derive(Default)]
struct FakeState {
    content: IndexMap<ContentId, ContentItem>,
    links: HashMap<ContentId, LinkSet>,
    failures: HashMap<Operation, InjectedFailure>,
    calls: Vec<(Operation, String)>,
    patches: Vec<(ContentId, LinksPatch)>,
    puts: Vec<(ContentId, serde_json::Value)>,
    unpublishes: Vec<(ContentId, UnpublishRequest)>,
}

/// Publishing API double backed by an in-memory link graph
#[derive(Default)]
pub struct FakePublishingApi {
    state: Mutex<FakeState>,
}

impl FakePublishingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a content item, replacing any item with the same id
    pub fn add_content(&self, item: ContentItem) -> &Self {
        let mut state = self.state.lock();
        state.content.insert(item.content_id.clone(), item);
        self
    }

    /// Store a taxon content item, linked to `parent` when given
    pub fn add_taxon(&self, content_id: &str, title: &str, base_path: &str, parent: Option<&str>)
        -> &Self
    {
        self.add_content(crate::fixtures::taxon_item(content_id, title, base_path));
        if let Some(parent) = parent {
            self.set_links(content_id, PARENT_TAXONS, &[parent]);
        }
        self
    }

    /// Store a non-taxon content item tagged to the given taxons
    pub fn add_tagged_content(&self, content_id: &str, base_path: &str, taxons: &[&str]) -> &Self {
        self.add_content(ContentItem {
            content_id: ContentId::from(content_id),
            title: format!("Guide at {}", base_path),
            base_path: base_path.to_string(),
            description: None,
            document_type: Some("guide".to_string()),
            schema_name: Some("guide".to_string()),
            publication_state: Some("published".to_string()),
            phase: None,
            details: ContentDetails::default(),
        });
        self.set_links(content_id, TAXONS, taxons);
        self
    }

    /// Replace one link type of a content item's link set
    pub fn set_links(&self, content_id: &str, link_type: &str, targets: &[&str]) -> &Self {
        let mut state = self.state.lock();
        let link_set = state.links.entry(ContentId::from(content_id)).or_default();
        link_set.links.insert(
            link_type.to_string(),
            targets.iter().map(|id| ContentId::from(*id)).collect(),
        );
        link_set.version = Some(link_set.version.unwrap_or(0) + 1);
        self
    }

    /// Make every call to `operation` fail
    pub fn fail_on(&self, operation: Operation, failure: InjectedFailure) -> &Self {
        self.state.lock().failures.insert(operation, failure);
        self
    }

    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    pub fn calls_to(&self, operation: Operation) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|(op, _)| *op == operation)
            .count()
    }

    /// Calls in the order they were made, as (operation, argument) pairs
    pub fn calls(&self) -> Vec<(Operation, String)> {
        self.state.lock().calls.clone()
    }

    pub fn patches(&self) -> Vec<(ContentId, LinksPatch)> {
        self.state.lock().patches.clone()
    }

    pub fn puts(&self) -> Vec<(ContentId, serde_json::Value)> {
        self.state.lock().puts.clone()
    }

    pub fn unpublishes(&self) -> Vec<(ContentId, UnpublishRequest)> {
        self.state.lock().unpublishes.clone()
    }

    pub fn content(&self, content_id: &str) -> Option<ContentItem> {
        self.state.lock().content.get(&ContentId::from(content_id)).cloned()
    }

    pub fn links(&self, content_id: &str) -> LinkSet {
        self.state
            .lock()
            .links
            .get(&ContentId::from(content_id))
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, operation: Operation, argument: &str) -> Result<(), PublishingApiError> {
        let mut state = self.state.lock();
        state.calls.push((operation, argument.to_string()));
        match state.failures.get(&operation) {
            Some(failure) => Err(failure.to_error(argument)),
            None => Ok(()),
        }
    }
}

fn linked_item(item: &ContentItem, fields: &[&str]) -> LinkedItem {
    let wants = |field: &str| fields.is_empty() || fields.contains(&field);
    LinkedItem {
        content_id: wants("content_id").then(|| item.content_id.clone()),
        title: wants("title").then(|| item.title.clone()),
        base_path: wants("base_path").then(|| item.base_path.clone()),
        document_type: if wants("document_type") {
            item.document_type.clone()
        } else {
            None
        },
    }
}

fn text_field(payload: &serde_json::Value, key: &str) -> Option<String> {
    payload.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

#[async_trait]
impl PublishingApi for FakePublishingApi {
    async fn get_content(&self, content_id: &ContentId) -> ApiResult<ContentItem> {
        self.record(Operation::GetContent, content_id.as_str())?;
        self.state
            .lock()
            .content
            .get(content_id)
            .cloned()
            .ok_or_else(|| PublishingApiError::NotFound(format!("content {}", content_id)))
    }

    async fn get_links(&self, content_id: &ContentId) -> ApiResult<LinkSet> {
        self.record(Operation::GetLinks, content_id.as_str())?;
        Ok(self
            .state
            .lock()
            .links
            .get(content_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_expanded_links(&self, content_id: &ContentId) -> ApiResult<ExpandedLinks> {
        self.record(Operation::GetExpandedLinks, content_id.as_str())?;
        let state = self.state.lock();
        let link_set = state.links.get(content_id).cloned().unwrap_or_default();

        let mut expanded_links = IndexMap::new();
        for (link_type, targets) in &link_set.links {
            let expanded = targets
                .iter()
                .filter_map(|target| state.content.get(target))
                .map(|item| {
                    serde_json::json!({
                        "content_id": item.content_id,
                        "title": item.title,
                        "base_path": item.base_path,
                    })
                })
                .collect();
            expanded_links.insert(link_type.clone(), expanded);
        }

        Ok(ExpandedLinks {
            expanded_links,
            version: link_set.version.unwrap_or(0),
        })
    }

    async fn get_linked_items(
        &self,
        content_id: &ContentId,
        link_type: &str,
        fields: &[&str],
    ) -> ApiResult<Vec<LinkedItem>> {
        self.record(Operation::GetLinkedItems, content_id.as_str())?;
        let state = self.state.lock();

        Ok(state
            .content
            .values()
            .filter(|item| {
                state
                    .links
                    .get(&item.content_id)
                    .and_then(|links| links.links_of(link_type))
                    .map(|targets| targets.contains(content_id))
                    .unwrap_or(false)
            })
            .map(|item| linked_item(item, fields))
            .collect())
    }

    async fn get_content_items(&self, query: &ContentItemsQuery) -> ApiResult<ContentItemsPage> {
        self.record(Operation::GetContentItems, &query.document_type)?;
        let state = self.state.lock();

        let matching: Vec<ContentItem> = state
            .content
            .values()
            .filter(|item| item.document_type.as_deref() == Some(query.document_type.as_str()))
            .filter(|item| match &query.q {
                Some(q) => item.title.to_lowercase().contains(&q.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();

        let per_page = query.per_page.max(1) as usize;
        let total = matching.len();
        let pages = (total + per_page - 1) / per_page;
        let start = (query.page.max(1) as usize - 1) * per_page;

        Ok(ContentItemsPage {
            results: matching.into_iter().skip(start).take(per_page).collect(),
            total: total as u64,
            pages: pages as u64,
            current_page: query.page as u64,
        })
    }

    async fn patch_links(&self, content_id: &ContentId, patch: &LinksPatch) -> ApiResult<()> {
        self.record(Operation::PatchLinks, content_id.as_str())?;
        let mut state = self.state.lock();

        let link_set = state.links.entry(content_id.clone()).or_default();
        if let (Some(expected), Some(current)) = (patch.previous_version, link_set.version) {
            if expected != current {
                return Err(PublishingApiError::Http {
                    status: 409,
                    body: format!("version conflict: expected {}, at {}", expected, current),
                });
            }
        }
        for (link_type, targets) in &patch.links {
            link_set.links.insert(link_type.clone(), targets.clone());
        }
        link_set.version = Some(link_set.version.unwrap_or(0) + 1);

        state.patches.push((content_id.clone(), patch.clone()));
        Ok(())
    }

    async fn put_content(
        &self,
        content_id: &ContentId,
        payload: &serde_json::Value,
    ) -> ApiResult<()> {
        self.record(Operation::PutContent, content_id.as_str())?;
        let mut state = self.state.lock();

        let details: ContentDetails = payload
            .get("details")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| PublishingApiError::UnprocessableEntity {
                message: e.to_string(),
            })?
            .unwrap_or_default();

        let item = ContentItem {
            content_id: content_id.clone(),
            title: text_field(payload, "title").unwrap_or_default(),
            base_path: text_field(payload, "base_path").unwrap_or_default(),
            description: text_field(payload, "description"),
            document_type: text_field(payload, "document_type"),
            schema_name: text_field(payload, "schema_name"),
            publication_state: Some("draft".to_string()),
            phase: text_field(payload, "phase"),
            details,
        };
        state.content.insert(content_id.clone(), item);
        state.puts.push((content_id.clone(), payload.clone()));
        Ok(())
    }

    async fn unpublish(
        &self,
        content_id: &ContentId,
        request: &UnpublishRequest,
    ) -> ApiResult<u16> {
        self.record(Operation::Unpublish, content_id.as_str())?;
        let mut state = self.state.lock();

        match state.content.get_mut(content_id) {
            Some(item) => item.publication_state = Some("unpublished".to_string()),
            None => {
                return Err(PublishingApiError::NotFound(format!("content {}", content_id)))
            }
        }
        state.unpublishes.push((content_id.clone(), request.clone()));
        Ok(200)
    }

    async fn lookup_content_id(&self, base_path: &str) -> ApiResult<Option<ContentId>> {
        self.record(Operation::LookupContentId, base_path)?;
        Ok(self
            .state
            .lock()
            .content
            .values()
            .find(|item| item.base_path == base_path)
            .map(|item| item.content_id.clone()))
    }
}
