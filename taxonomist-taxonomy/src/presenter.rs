//! Publishing API payload for a taxon

use chrono::Utc;
use serde_json::{json, Value};
use taxonomist_core::config::PublishingConfig;
use taxonomist_core::Taxon;

pub const DOCUMENT_TYPE: &str = "taxon";
pub const LOCALE: &str = "en";
pub const UPDATE_TYPE: &str = "major";

pub struct TaxonPresenter<'a> {
    taxon: &'a Taxon,
    publishing: &'a PublishingConfig,
}

impl<'a> TaxonPresenter<'a> {
    pub fn new(taxon: &'a Taxon, publishing: &'a PublishingConfig) -> Self {
        Self { taxon, publishing }
    }

    pub fn payload(&self) -> Value {
        let taxon = self.taxon;
        json!({
            "base_path": taxon.base_path,
            "document_type": DOCUMENT_TYPE,
            "schema_name": DOCUMENT_TYPE,
            "title": taxon.title,
            "description": taxon.description,
            "publishing_app": self.publishing.publishing_app,
            "rendering_app": self.publishing.rendering_app,
            "public_updated_at": Utc::now().to_rfc3339(),
            "locale": LOCALE,
            "phase": taxon.phase,
            "details": {
                "internal_name": taxon.internal_name,
                "notes_for_editors": taxon.notes_for_editors,
                "visible_to_departmental_editors": false,
            },
            "routes": [
                { "path": taxon.base_path, "type": "exact" }
            ],
            "update_type": UPDATE_TYPE,
        })
    }
}
