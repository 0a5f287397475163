//! Taxon value objects

use crate::error::{TaxonomistError, TaxonomistResult};
use crate::types::change::FieldValue;
use crate::types::content_id::ContentId;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Phase assigned to taxons that do not say otherwise
pub const DEFAULT_PHASE: &str = "live";

/// A node of the classification hierarchy as held by the publishing API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxon {
    pub content_id: ContentId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub base_path: String,
    #[serde(default)]
    pub parent_content_id: Option<ContentId>,
    /// `None` when the link set carries no `associated_taxons` key at all
    #[serde(default)]
    pub associated_taxons: Option<IndexSet<ContentId>>,
    #[serde(default)]
    pub internal_name: String,
    #[serde(default)]
    pub notes_for_editors: String,
    #[serde(default = "default_phase")]
    pub phase: String,
    #[serde(default)]
    pub publication_state: Option<String>,
}

fn default_phase() -> String {
    DEFAULT_PHASE.to_string()
}

impl Taxon {
    /// Create a taxon with a fresh content id and default optional fields
    pub fn new(title: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self::with_content_id(ContentId::generate(), title, base_path)
    }

    pub fn with_content_id(
        content_id: ContentId,
        title: impl Into<String>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            content_id,
            title: title.into(),
            description: String::new(),
            base_path: base_path.into(),
            parent_content_id: None,
            associated_taxons: None,
            internal_name: String::new(),
            notes_for_editors: String::new(),
            phase: default_phase(),
            publication_state: None,
        }
    }

    /// Compose a base path from an optional prefix and a slug.
    ///
    /// Surrounding slashes and whitespace in either part are ignored:
    /// `("/education", "/slug")` and `("education", "slug")` both give
    /// `/education/slug`.
    pub fn base_path_for(path_prefix: Option<&str>, path_slug: &str) -> String {
        let slug = path_slug.trim().trim_matches('/');
        match path_prefix
            .map(|prefix| prefix.trim().trim_matches('/'))
            .filter(|prefix| !prefix.is_empty())
        {
            Some(prefix) => format!("/{}/{}", prefix, slug),
            None => format!("/{}", slug),
        }
    }

    /// Everything between the leading slash and the last segment
    pub fn path_prefix(&self) -> Option<&str> {
        self.base_path
            .trim_matches('/')
            .rsplit_once('/')
            .map(|(prefix, _)| prefix)
    }

    /// Last segment of the base path
    pub fn path_slug(&self) -> &str {
        let trimmed = self.base_path.trim_matches('/');
        match trimmed.rsplit_once('/') {
            Some((_, slug)) => slug,
            None => trimmed,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_content_id.is_none()
    }

    /// Value of a tracked field as recorded in the version log
    pub fn field_value(&self, field: TaxonField) -> FieldValue {
        match field {
            TaxonField::AssociatedTaxons => match &self.associated_taxons {
                Some(ids) => FieldValue::list(ids.iter().map(|id| id.as_str())),
                None => FieldValue::Null,
            },
            TaxonField::BasePath => FieldValue::text(&self.base_path),
            TaxonField::Description => FieldValue::text(&self.description),
            TaxonField::InternalName => FieldValue::text(&self.internal_name),
            TaxonField::NotesForEditors => FieldValue::text(&self.notes_for_editors),
            TaxonField::ParentContentId => match &self.parent_content_id {
                Some(id) => FieldValue::text(id.as_str()),
                None => FieldValue::Null,
            },
            TaxonField::Phase => FieldValue::text(&self.phase),
            TaxonField::Title => FieldValue::text(&self.title),
        }
    }

    /// Messages describing why the taxon cannot be published
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.content_id.is_blank() {
            errors.push("Content id can't be blank".to_string());
        }
        if self.title.trim().is_empty() {
            errors.push("Title can't be blank".to_string());
        }
        if !self.base_path.starts_with('/') {
            errors.push("Base path must start with '/'".to_string());
        }
        if self.path_slug().is_empty() {
            errors.push("Path slug can't be blank".to_string());
        }
        if self.parent_content_id.as_ref() == Some(&self.content_id) {
            errors.push("Parent can't be the taxon itself".to_string());
        }
        errors
    }

    pub fn validate(&self) -> TaxonomistResult<()> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TaxonomistError::InvalidInput(errors.join("; ")))
        }
    }

    pub fn summary(&self) -> TaxonSummary {
        TaxonSummary {
            content_id: self.content_id.clone(),
            title: self.title.clone(),
            base_path: self.base_path.clone(),
        }
    }
}

/// Fields compared between taxon snapshots, in alphabetical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaxonField {
    AssociatedTaxons,
    BasePath,
    Description,
    InternalName,
    NotesForEditors,
    ParentContentId,
    Phase,
    Title,
}

/// Tracked fields in the order diffs are emitted
pub const TRACKED_FIELDS: [TaxonField; 8] = [
    TaxonField::AssociatedTaxons,
    TaxonField::BasePath,
    TaxonField::Description,
    TaxonField::InternalName,
    TaxonField::NotesForEditors,
    TaxonField::ParentContentId,
    TaxonField::Phase,
    TaxonField::Title,
];

impl TaxonField {
    pub fn name(&self) -> &'static str {
        match self {
            TaxonField::AssociatedTaxons => "associated_taxons",
            TaxonField::BasePath => "base_path",
            TaxonField::Description => "description",
            TaxonField::InternalName => "internal_name",
            TaxonField::NotesForEditors => "notes_for_editors",
            TaxonField::ParentContentId => "parent_content_id",
            TaxonField::Phase => "phase",
            TaxonField::Title => "title",
        }
    }
}

/// Identity fields carried by a tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonSummary {
    pub content_id: ContentId,
    pub title: String,
    pub base_path: String,
}

impl TaxonSummary {
    pub fn new(
        content_id: impl Into<ContentId>,
        title: impl Into<String>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            title: title.into(),
            base_path: base_path.into(),
        }
    }
}

impl From<&Taxon> for TaxonSummary {
    fn from(taxon: &Taxon) -> Self {
        taxon.summary()
    }
}

/// Editor-supplied description of a taxon, before the base path is composed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonDraft {
    #[serde(default)]
    pub content_id: Option<ContentId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub path_prefix: Option<String>,
    #[serde(default)]
    pub path_slug: String,
    #[serde(default)]
    pub parent_content_id: Option<ContentId>,
    #[serde(default)]
    pub associated_taxons: Option<Vec<ContentId>>,
    #[serde(default)]
    pub internal_name: String,
    #[serde(default)]
    pub notes_for_editors: String,
    #[serde(default)]
    pub phase: Option<String>,
}

impl TaxonDraft {
    pub fn into_taxon(self) -> Taxon {
        let base_path = Taxon::base_path_for(self.path_prefix.as_deref(), &self.path_slug);
        Taxon {
            content_id: self.content_id.unwrap_or_else(ContentId::generate),
            title: self.title,
            description: self.description,
            base_path,
            parent_content_id: self.parent_content_id.filter(|id| !id.is_blank()),
            associated_taxons: self
                .associated_taxons
                .map(|ids| ids.into_iter().collect::<IndexSet<_>>()),
            internal_name: self.internal_name,
            notes_for_editors: self.notes_for_editors,
            phase: self.phase.unwrap_or_else(default_phase),
            publication_state: None,
        }
    }
}
