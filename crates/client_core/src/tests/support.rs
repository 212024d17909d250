use std::collections::VecDeque;

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::domain::{Answer, IngestStats, PDF_MEDIA_TYPE};
use tokio::sync::Mutex;

use crate::{DocumentCandidate, DocumentService, DocumentUpload, ServiceError};

pub(crate) fn pdf(name: &str) -> DocumentCandidate {
    DocumentCandidate::new(name, PDF_MEDIA_TYPE, format!("%PDF-1.7 {name}").into_bytes())
}

pub(crate) fn non_pdf(name: &str, media_type: &str) -> DocumentCandidate {
    DocumentCandidate::new(name, media_type, b"not a pdf".to_vec())
}

pub(crate) fn server_error() -> ServiceError {
    ServiceError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "boom".to_string(),
    }
}

pub(crate) fn stats(pages_processed: u32, chunks_processed: u32) -> IngestStats {
    IngestStats {
        pages_processed,
        chunks_processed,
    }
}

pub(crate) fn answer(response: &str, sources: &[&str]) -> Answer {
    Answer {
        response: response.to_string(),
        sources: sources.iter().map(|source| source.to_string()).collect(),
    }
}

/// In-memory service replaying queued outcomes in order. `None` entries fail
/// with a server error; an exhausted queue fails as a malformed response.
#[derive(Default)]
pub(crate) struct ScriptedService {
    ingests: Mutex<VecDeque<Option<IngestStats>>>,
    answers: Mutex<VecDeque<Option<Answer>>>,
    pub(crate) uploads: Mutex<Vec<DocumentUpload>>,
    pub(crate) queries: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ingesting(mut self, pages_processed: u32, chunks_processed: u32) -> Self {
        self.ingests
            .get_mut()
            .push_back(Some(stats(pages_processed, chunks_processed)));
        self
    }

    pub(crate) fn failing_ingest(mut self) -> Self {
        self.ingests.get_mut().push_back(None);
        self
    }

    pub(crate) fn answering(mut self, response: &str, sources: &[&str]) -> Self {
        self.answers
            .get_mut()
            .push_back(Some(answer(response, sources)));
        self
    }

    pub(crate) fn failing_answer(mut self) -> Self {
        self.answers.get_mut().push_back(None);
        self
    }
}

#[async_trait]
impl DocumentService for ScriptedService {
    async fn ingest_document(&self, upload: DocumentUpload) -> Result<IngestStats, ServiceError> {
        self.uploads.lock().await.push(upload);
        match self.ingests.lock().await.pop_front() {
            Some(Some(stats)) => Ok(stats),
            Some(None) => Err(server_error()),
            None => Err(ServiceError::Malformed("no scripted ingest".to_string())),
        }
    }

    async fn answer_query(&self, query: &str) -> Result<Answer, ServiceError> {
        self.queries.lock().await.push(query.to_string());
        match self.answers.lock().await.pop_front() {
            Some(Some(answer)) => Ok(answer),
            Some(None) => Err(server_error()),
            None => Err(ServiceError::Malformed("no scripted answer".to_string())),
        }
    }
}
