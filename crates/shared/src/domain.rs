use serde::{Deserialize, Serialize};

/// Declared media type a document candidate must carry to be accepted for ingest.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Apology shown in place of an answer when the answer request fails.
pub const ANSWER_FAILURE_TEXT: &str =
    "Sorry, I encountered an error processing your question. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub is_error: bool,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
            is_error: false,
        }
    }

    pub fn answer(content: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources: Some(sources),
            is_error: false,
        }
    }

    /// Error turn appended when an answer request does not settle successfully.
    pub fn failure() -> Self {
        Self {
            role: Role::Assistant,
            content: ANSWER_FAILURE_TEXT.to_string(),
            sources: None,
            is_error: true,
        }
    }
}

/// Processing statistics reported by the service after a successful ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub pages_processed: u32,
    pub chunks_processed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub response: String,
    pub sources: Vec<String>,
}

pub fn is_pdf_media_type(media_type: &str) -> bool {
    media_type == PDF_MEDIA_TYPE
}
