/// Errors surfaced by the publishing API boundary
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishingApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unprocessable entity: {message}")]
    UnprocessableEntity { message: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, PublishingApiError>;

impl PublishingApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PublishingApiError::NotFound(_))
    }

    pub fn is_unprocessable(&self) -> bool {
        matches!(self, PublishingApiError::UnprocessableEntity { .. })
    }
}

impl From<reqwest::Error> for PublishingApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PublishingApiError::Decode(err.to_string())
        } else {
            PublishingApiError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for PublishingApiError {
    fn from(err: url::ParseError) -> Self {
        PublishingApiError::Transport(format!("invalid URL: {}", err))
    }
}

impl From<serde_json::Error> for PublishingApiError {
    fn from(err: serde_json::Error) -> Self {
        PublishingApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_helpers() {
        assert!(PublishingApiError::NotFound("content abc".into()).is_not_found());
        assert!(PublishingApiError::UnprocessableEntity {
            message: "base path conflict".into()
        }
        .is_unprocessable());
        assert!(!PublishingApiError::Transport("timeout".into()).is_not_found());
    }

    #[test]
    fn test_display() {
        let err = PublishingApiError::Http {
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }
}
