/// Version log scenarios against a stubbed publishing API
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use taxonomist_core::{ContentId, FieldValue, Taxon, TaxonDraft};
use taxonomist_publishing::HttpPublishingApi;
use taxonomist_taxonomy::{SqliteVersionStore, TaxonBuilder, TaxonVersioner, VersionStore};
use taxonomist_test::{init_test_logging, TestEnvironment};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTENT_ID: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
const PARENT_ID: &str = "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz";
const ASSOCIATED_ID: &str = "mmmmmmmm-mmmm-mmmm-mmmm-mmmmmmmmmmmm";

struct Harness {
    _env: TestEnvironment,
    server: MockServer,
    versioner: TaxonVersioner,
    store: Arc<SqliteVersionStore>,
}

async fn harness() -> Harness {
    init_test_logging();
    let env = TestEnvironment::new().unwrap();
    let server = MockServer::start().await;
    let api = Arc::new(HttpPublishingApi::with_base_url(&server.uri(), "test-token").unwrap());
    let store = Arc::new(SqliteVersionStore::open(env.versions_db_path()).await.unwrap());
    let versioner = TaxonVersioner::new(TaxonBuilder::new(api), store.clone());
    Harness {
        _env: env,
        server,
        versioner,
        store,
    }
}

impl Harness {
    async fn stub_previous(&self, content: serde_json::Value, links: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/v2/content/{}", CONTENT_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(content))
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v2/links/{}", CONTENT_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(links))
            .mount(&self.server)
            .await;
    }

    async fn stub_missing(&self, content_id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/v2/content/{}", content_id)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v2/links/{}", content_id)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&self.server)
            .await;
    }
}

fn draft(value: serde_json::Value) -> Taxon {
    serde_json::from_value::<TaxonDraft>(value).unwrap().into_taxon()
}

fn entries(changes: &[taxonomist_core::ChangeEntry]) -> serde_json::Value {
    serde_json::to_value(changes).unwrap()
}

#[tokio::test]
async fn test_saves_first_version_of_new_taxon() {
    let h = harness().await;
    let taxon = draft(json!({
        "path_slug": "business",
        "title": "Business",
        "internal_name": "Business [internal]",
        "description": "Business as usual",
        "phase": "beta"
    }));
    h.stub_missing(taxon.content_id.as_str()).await;

    let record = h.versioner.save(&taxon, "A new taxon", None).await.unwrap().unwrap();

    assert_eq!(h.store.count().await.unwrap(), 1);
    assert_eq!(record.number, 1);
    assert_eq!(record.note, "A new taxon");
    assert_eq!(
        entries(&record.object_changes),
        json!([
            ["+", "base_path", "/business"],
            ["+", "description", "Business as usual"],
            ["+", "internal_name", "Business [internal]"],
            ["+", "notes_for_editors", ""],
            ["+", "phase", "beta"],
            ["+", "title", "Business"]
        ])
    );
}

#[tokio::test]
async fn test_saves_change_between_remote_and_draft() {
    let h = harness().await;
    h.stub_previous(
        json!({
            "content_id": CONTENT_ID,
            "title": "Tourism",
            "description": "Send me a postcard",
            "base_path": "/tourism",
            "publication_state": "draft",
            "document_type": "taxon",
            "details": {
                "internal_name": "Tourism [internal]",
                "notes_for_editors": ""
            }
        }),
        json!({ "links": { "associated_taxons": [ASSOCIATED_ID] } }),
    )
    .await;

    let current = draft(json!({
        "content_id": CONTENT_ID,
        "path_prefix": "business",
        "path_slug": "tourism",
        "title": "Tourism",
        "internal_name": "Tourism [internal]",
        "description": "Send me a postcard",
        "parent_content_id": PARENT_ID
    }));

    h.versioner.save(&current, "An update note", None).await.unwrap();

    let versions = h.store.versions(&ContentId::from(CONTENT_ID)).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].note, "An update note");
    assert_eq!(
        entries(&versions[0].object_changes),
        json!([
            ["~", "associated_taxons", [ASSOCIATED_ID], null],
            ["~", "base_path", "/tourism", "/business/tourism"],
            ["~", "parent_content_id", null, PARENT_ID]
        ])
    );
}

#[tokio::test]
async fn test_unchanged_taxon_with_blank_note_is_not_saved() {
    let h = harness().await;
    h.stub_previous(
        json!({
            "content_id": CONTENT_ID,
            "title": "Business Tourism",
            "description": "Send me a postcard",
            "base_path": "/business/tourism",
            "publication_state": "draft",
            "document_type": "taxon",
            "details": {
                "internal_name": "Business Tourism [internal]",
                "notes_for_editors": ""
            }
        }),
        json!({}),
    )
    .await;

    let current = draft(json!({
        "content_id": CONTENT_ID,
        "path_prefix": "business",
        "path_slug": "tourism",
        "title": "Business Tourism",
        "internal_name": "Business Tourism [internal]",
        "description": "Send me a postcard"
    }));

    let saved = h.versioner.save(&current, "  ", None).await.unwrap();

    assert!(saved.is_none());
    assert_eq!(h.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_restore_saves_note_only_version() {
    let h = harness().await;
    h.stub_previous(
        json!({
            "content_id": CONTENT_ID,
            "title": "Business",
            "description": "Business as usual",
            "base_path": "/business",
            "publication_state": "unpublished",
            "document_type": "taxon",
            "details": {
                "internal_name": "Business [internal]",
                "notes_for_editors": ""
            }
        }),
        json!({}),
    )
    .await;

    let current = draft(json!({
        "content_id": CONTENT_ID,
        "path_slug": "business",
        "title": "Business",
        "internal_name": "Business [internal]",
        "description": "Business as usual"
    }));

    let record = h
        .versioner
        .save(&current, "Restoring a taxon", None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(h.store.count().await.unwrap(), 1);
    assert_eq!(record.note, "Restoring a taxon");
    assert!(record.object_changes.is_empty());
}

#[tokio::test]
async fn test_numbers_increase_per_taxon() {
    let h = harness().await;
    let mut taxon = Taxon::with_content_id(ContentId::from(CONTENT_ID), "Business", "/business");

    h.versioner.save_against(&taxon, "Created", None).await.unwrap();
    let previous = taxon.clone();
    taxon.title = "Business and trade".into();
    let second = h
        .versioner
        .save_against(&taxon, "", Some(&previous))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(second.number, 2);
    assert_eq!(
        second.object_changes[0].new_value(),
        Some(&FieldValue::text("Business and trade"))
    );
    let latest = h.store.latest(&ContentId::from(CONTENT_ID)).await.unwrap().unwrap();
    assert_eq!(latest.number, 2);
    assert_eq!(latest.object_changes, second.object_changes);
}
