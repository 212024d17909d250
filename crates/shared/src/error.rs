use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure envelope the document service returns in place of a normal payload.
///
/// The service reports some failures (unsupported file, embedding or LLM
/// errors) with a success status and this body, so it has to be recognised
/// before the expected payload is decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceErrorBody {
    /// Attempts to read an error envelope out of a raw response body.
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Self>(body).ok()
    }
}

#[derive(Debug, Error)]
#[error("service rejected request: {message}")]
pub struct ServiceRejection {
    pub message: String,
}

impl From<ServiceErrorBody> for ServiceRejection {
    fn from(value: ServiceErrorBody) -> Self {
        let message = match value.details {
            Some(details) => format!("{} ({details})", value.error),
            None => value.error,
        };
        Self { message }
    }
}
