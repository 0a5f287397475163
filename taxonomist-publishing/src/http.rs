/// HTTP client for the publishing API (v2 endpoints)
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use taxonomist_core::config::PublishingApiConfig;
use taxonomist_core::ContentId;
use url::Url;

use crate::api::PublishingApi;
use crate::error::{ApiResult, PublishingApiError};
use crate::types::{
    ContentItem, ContentItemsPage, ContentItemsQuery, ExpandedLinks, LinkSet, LinkedItem,
    LinksPatch, UnpublishRequest,
};

/// Client for a publishing API instance.
///
/// Requests are not retried here; timeouts and failures surface to the caller.
pub struct HttpPublishingApi {
    base_url: Url,
    bearer_token: String,
    client: Client,
}

impl HttpPublishingApi {
    /// Create a client from configuration
    pub fn new(config: &PublishingApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            base_url: normalize_base_url(&config.url)?,
            bearer_token: config.bearer_token.clone(),
            client,
        })
    }

    /// Create a client for an explicit URL and token with default timeouts
    pub fn with_base_url(url: &str, bearer_token: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: normalize_base_url(url)?,
            bearer_token: bearer_token.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.bearer_token)
    }

    async fn send(&self, request: RequestBuilder, resource: &str) -> ApiResult<Response> {
        let response = self.authorized(request).send().await?;
        check_status(response, resource).await
    }
}

fn normalize_base_url(url: &str) -> ApiResult<Url> {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{}/", trimmed))?)
    }
}

/// Map non-success statuses onto error variants
async fn check_status(response: Response, resource: &str) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => Err(PublishingApiError::NotFound(resource.to_string())),
        StatusCode::UNPROCESSABLE_ENTITY => Err(PublishingApiError::UnprocessableEntity {
            message: error_message(&body),
        }),
        _ => Err(PublishingApiError::Http {
            status: status.as_u16(),
            body,
        }),
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl PublishingApi for HttpPublishingApi {
    async fn get_content(&self, content_id: &ContentId) -> ApiResult<ContentItem> {
        let url = self.endpoint(&format!("v2/content/{}", content_id))?;
        tracing::debug!("GET {}", url);

        let response = self
            .send(self.client.get(url), &format!("content {}", content_id))
            .await?;
        Ok(response.json().await?)
    }

    async fn get_links(&self, content_id: &ContentId) -> ApiResult<LinkSet> {
        let url = self.endpoint(&format!("v2/links/{}", content_id))?;
        tracing::debug!("GET {}", url);

        let response = self
            .send(self.client.get(url), &format!("links {}", content_id))
            .await?;
        Ok(response.json().await?)
    }

    async fn get_expanded_links(&self, content_id: &ContentId) -> ApiResult<ExpandedLinks> {
        let url = self.endpoint(&format!("v2/expanded-links/{}", content_id))?;
        tracing::debug!("GET {}", url);

        let response = self
            .send(self.client.get(url), &format!("expanded links {}", content_id))
            .await?;
        Ok(response.json().await?)
    }

    async fn get_linked_items(
        &self,
        content_id: &ContentId,
        link_type: &str,
        fields: &[&str],
    ) -> ApiResult<Vec<LinkedItem>> {
        let url = self.endpoint(&format!("v2/linked/{}", content_id))?;
        tracing::debug!("GET {} link_type={}", url, link_type);

        let mut query: Vec<(&str, &str)> = vec![("link_type", link_type)];
        query.extend(fields.iter().map(|field| ("fields[]", *field)));

        let response = self
            .send(
                self.client.get(url).query(&query),
                &format!("linked items {}", content_id),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn get_content_items(&self, query: &ContentItemsQuery) -> ApiResult<ContentItemsPage> {
        let url = self.endpoint("v2/content")?;
        tracing::debug!("GET {} page={}", url, query.page);

        let response = self
            .send(
                self.client.get(url).query(&query.to_pairs()),
                "content items",
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn patch_links(&self, content_id: &ContentId, patch: &LinksPatch) -> ApiResult<()> {
        let url = self.endpoint(&format!("v2/links/{}", content_id))?;
        tracing::debug!("PATCH {}", url);

        self.send(
            self.client.patch(url).json(patch),
            &format!("links {}", content_id),
        )
        .await?;
        Ok(())
    }

    async fn put_content(
        &self,
        content_id: &ContentId,
        payload: &serde_json::Value,
    ) -> ApiResult<()> {
        let url = self.endpoint(&format!("v2/content/{}", content_id))?;
        tracing::debug!("PUT {}", url);

        self.send(
            self.client.put(url).json(payload),
            &format!("content {}", content_id),
        )
        .await?;
        Ok(())
    }

    async fn unpublish(
        &self,
        content_id: &ContentId,
        request: &UnpublishRequest,
    ) -> ApiResult<u16> {
        let url = self.endpoint(&format!("v2/content/{}/unpublish", content_id))?;
        tracing::debug!("POST {} type={:?}", url, request.unpublish_type);

        let response = self
            .send(
                self.client.post(url).json(request),
                &format!("content {}", content_id),
            )
            .await?;
        Ok(response.status().as_u16())
    }

    async fn lookup_content_id(&self, base_path: &str) -> ApiResult<Option<ContentId>> {
        let url = self.endpoint("lookup-by-base-path")?;
        tracing::debug!("POST {} base_path={}", url, base_path);

        let body = serde_json::json!({ "base_paths": [base_path] });
        let response = self
            .send(self.client.post(url).json(&body), "lookup-by-base-path")
            .await?;
        let found: HashMap<String, ContentId> = response.json().await?;
        Ok(found.get(base_path).cloned())
    }
}
