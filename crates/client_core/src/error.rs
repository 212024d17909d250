use reqwest::StatusCode;
use shared::error::ServiceRejection;
use thiserror::Error;

/// Failure of a request to the document service.
///
/// Every variant is surfaced to the user the same way ("upload failed" or the
/// apology turn); the distinction exists for logs and tests.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid service base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed service response: {0}")]
    Malformed(String),
    #[error(transparent)]
    Rejected(#[from] ServiceRejection),
}

impl ServiceError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}
