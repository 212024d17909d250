use serde::{Deserialize, Serialize};

use crate::domain::{Answer, IngestStats};

/// Multipart field the ingest endpoint expects the document under.
pub const INGEST_FILE_FIELD: &str = "file";
pub const INGEST_PATH: &str = "upload/";
pub const ANSWER_PATH: &str = "chat/";

/// Optional chunking parameters carried as query parameters on the ingest request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub pages_processed: u32,
    pub chunks_processed: u32,
}

impl From<IngestResponse> for IngestStats {
    fn from(value: IngestResponse) -> Self {
        Self {
            pages_processed: value.pages_processed,
            chunks_processed: value.chunks_processed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub response: String,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

impl From<AnswerResponse> for Answer {
    fn from(value: AnswerResponse) -> Self {
        Self {
            response: value.response,
            sources: value.sources.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_response_tolerates_missing_and_null_sources() {
        let missing: AnswerResponse =
            serde_json::from_str(r#"{"response":"ok"}"#).expect("decode");
        assert_eq!(Answer::from(missing).sources, Vec::<String>::new());

        let null: AnswerResponse =
            serde_json::from_str(r#"{"response":"ok","sources":null}"#).expect("decode");
        assert!(Answer::from(null).sources.is_empty());
    }

    #[test]
    fn ingest_response_ignores_message_field() {
        let response: IngestResponse = serde_json::from_str(
            r#"{"message":"PDF uploaded and processed successfully","pages_processed":5,"chunks_processed":42}"#,
        )
        .expect("decode");
        assert_eq!(
            IngestStats::from(response),
            IngestStats {
                pages_processed: 5,
                chunks_processed: 42
            }
        );
    }

    #[test]
    fn ingest_params_omit_unset_fields() {
        let encoded = serde_json::to_value(IngestParams {
            chunk_size: Some(800),
            overlap: None,
        })
        .expect("encode");
        assert_eq!(encoded, serde_json::json!({ "chunk_size": 800 }));
    }

    #[test]
    fn error_envelope_is_not_a_valid_ingest_payload() {
        let body = br#"{"error":"Only PDF files are supported."}"#;
        assert!(serde_json::from_slice::<IngestResponse>(body).is_err());
        let envelope = crate::error::ServiceErrorBody::parse(body).expect("envelope");
        assert_eq!(envelope.error, "Only PDF files are supported.");
    }
}
