/// Errors raised by the taxonomy services
use taxonomist_core::{ContentId, TaxonomistError};
use taxonomist_publishing::PublishingApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Taxon not found: {0}")]
    TaxonNotFound(ContentId),

    #[error("Malformed taxonomy at {content_id}: {reason}")]
    MalformedTaxonomy { content_id: ContentId, reason: String },

    #[error("Invalid taxon: {0}")]
    InvalidTaxon(String),

    #[error("Nothing to migrate: no content is tagged to {0}")]
    EmptyMigration(ContentId),

    #[error("Tag import failed: {0}")]
    Import(String),

    #[error("Migration queue error: {0}")]
    Queue(String),

    #[error("Version store error: {0}")]
    Storage(String),

    #[error(transparent)]
    Api(#[from] PublishingApiError),
}

pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

impl TaxonomyError {
    pub fn is_not_found(&self) -> bool {
        match self {
            TaxonomyError::TaxonNotFound(_) => true,
            TaxonomyError::Api(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Map a remote not-found for `content_id` onto `TaxonNotFound`
    pub(crate) fn from_lookup(content_id: &ContentId, err: PublishingApiError) -> Self {
        if err.is_not_found() {
            TaxonomyError::TaxonNotFound(content_id.clone())
        } else {
            TaxonomyError::Api(err)
        }
    }
}

impl From<rusqlite::Error> for TaxonomyError {
    fn from(err: rusqlite::Error) -> Self {
        TaxonomyError::Storage(err.to_string())
    }
}

impl From<tokio::task::JoinError> for TaxonomyError {
    fn from(err: tokio::task::JoinError) -> Self {
        TaxonomyError::Storage(format!("blocking task failed: {}", err))
    }
}

impl From<serde_json::Error> for TaxonomyError {
    fn from(err: serde_json::Error) -> Self {
        TaxonomyError::Storage(format!("corrupt change log: {}", err))
    }
}

impl From<TaxonomistError> for TaxonomyError {
    fn from(err: TaxonomistError) -> Self {
        match err {
            TaxonomistError::InvalidInput(msg) => TaxonomyError::InvalidTaxon(msg),
            other => TaxonomyError::Storage(other.to_string()),
        }
    }
}
