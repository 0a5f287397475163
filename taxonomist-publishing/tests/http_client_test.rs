/// HTTP contract tests for the publishing API client
use pretty_assertions::assert_eq;
use serde_json::json;
use taxonomist_core::ContentId;
use taxonomist_publishing::{
    ContentItemsQuery, HttpPublishingApi, LinksPatch, PublishingApi, PublishingApiError,
    UnpublishRequest, PARENT_TAXONS,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTENT_ID: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";

async fn client_for(server: &MockServer) -> HttpPublishingApi {
    HttpPublishingApi::with_base_url(&server.uri(), "test-token").unwrap()
}

#[tokio::test]
async fn test_get_content_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/content/{}", CONTENT_ID)))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content_id": CONTENT_ID,
            "title": "Tourism",
            "base_path": "/tourism",
            "details": {"internal_name": "Tourism [internal]"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let item = api.get_content(&ContentId::from(CONTENT_ID)).await.unwrap();

    assert_eq!(item.title, "Tourism");
    assert_eq!(item.base_path, "/tourism");
    assert_eq!(item.details.internal_name.as_deref(), Some("Tourism [internal]"));
}

#[tokio::test]
async fn test_missing_content_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/content/{}", CONTENT_ID)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let err = api.get_content(&ContentId::from(CONTENT_ID)).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/links/{}", CONTENT_ID)))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let err = api.get_links(&ContentId::from(CONTENT_ID)).await.unwrap_err();

    match err {
        PublishingApiError::Http { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "unavailable");
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_linked_items_passes_link_type_and_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/linked/{}", CONTENT_ID)))
        .and(query_param("link_type", "taxons"))
        .and(query_param("fields[]", "base_path"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"base_path": "/visit-the-seaside"},
            {"base_path": "/pier-safety"}
        ])))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let items = api
        .get_linked_items(&ContentId::from(CONTENT_ID), "taxons", &["base_path"])
        .await
        .unwrap();

    let paths: Vec<_> = items.iter().filter_map(|i| i.base_path.as_deref()).collect();
    assert_eq!(paths, vec!["/visit-the-seaside", "/pier-safety"]);
}

#[tokio::test]
async fn test_patch_links_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("/v2/links/{}", CONTENT_ID)))
        .and(body_json(json!({"links": {"parent_taxons": []}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let patch = LinksPatch::new().with_links(PARENT_TAXONS, vec![]);
    api.patch_links(&ContentId::from(CONTENT_ID), &patch).await.unwrap();
}

#[tokio::test]
async fn test_put_content_unprocessable_entity_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/v2/content/{}", CONTENT_ID)))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {"code": 422, "message": "base path=/business conflicts with content_id=x"}
        })))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let err = api
        .put_content(&ContentId::from(CONTENT_ID), &json!({"title": "Business"}))
        .await
        .unwrap_err();

    match err {
        PublishingApiError::UnprocessableEntity { message } => {
            assert!(message.contains("conflicts"));
        }
        other => panic!("Expected UnprocessableEntity, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unpublish_redirect_returns_status_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v2/content/{}/unpublish", CONTENT_ID)))
        .and(body_json(json!({"type": "redirect", "alternative_path": "/business"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let code = api
        .unpublish(&ContentId::from(CONTENT_ID), &UnpublishRequest::redirect("/business"))
        .await
        .unwrap();

    assert_eq!(code, 200);
}

#[tokio::test]
async fn test_lookup_content_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/lookup-by-base-path"))
        .and(body_json(json!({"base_paths": ["/business"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"/business": CONTENT_ID})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/lookup-by-base-path"))
        .and(body_json(json!({"base_paths": ["/nowhere"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    assert_eq!(
        api.lookup_content_id("/business").await.unwrap(),
        Some(ContentId::from(CONTENT_ID))
    );
    assert_eq!(api.lookup_content_id("/nowhere").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_content_items_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/content"))
        .and(query_param("document_type", "taxon"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"content_id": CONTENT_ID, "title": "Business", "base_path": "/business"}],
            "total": 11,
            "pages": 2,
            "current_page": 2
        })))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let query = ContentItemsQuery {
        page: 2,
        per_page: 10,
        ..ContentItemsQuery::default()
    };
    let page = api.get_content_items(&query).await.unwrap();

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.total, 11);
    assert_eq!(page.current_page, 2);
}
