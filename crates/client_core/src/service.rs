use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Answer, IngestStats, PDF_MEDIA_TYPE},
    error::{ServiceErrorBody, ServiceRejection},
    protocol::{
        AnswerQuery, AnswerResponse, IngestParams, IngestResponse, ANSWER_PATH, INGEST_FILE_FIELD,
        INGEST_PATH,
    },
};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ServiceError;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_ERROR_BODY_CHARS: usize = 512;

/// A PDF document ready to be sent to the ingest endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Request/response contract of the remote document service.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn ingest_document(&self, upload: DocumentUpload) -> Result<IngestStats, ServiceError>;
    async fn answer_query(&self, query: &str) -> Result<Answer, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct HttpServiceOptions {
    pub request_timeout: Duration,
    pub ingest: IngestParams,
    pub top_k: Option<u32>,
}

impl Default for HttpServiceOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            ingest: IngestParams::default(),
            top_k: None,
        }
    }
}

/// [`DocumentService`] speaking HTTP to the upload and chat endpoints.
pub struct HttpDocumentService {
    http: Client,
    ingest_url: Url,
    answer_url: Url,
    options: HttpServiceOptions,
}

impl HttpDocumentService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_options(base_url, HttpServiceOptions::default())
    }

    pub fn with_options(base_url: &str, options: HttpServiceOptions) -> Result<Self, ServiceError> {
        let http = Client::builder().timeout(options.request_timeout).build()?;
        let base = normalize_base_url(base_url)?;
        let ingest_url = join_endpoint(&base, INGEST_PATH)?;
        let answer_url = join_endpoint(&base, ANSWER_PATH)?;
        Ok(Self {
            http,
            ingest_url,
            answer_url,
            options,
        })
    }

    pub fn ingest_url(&self) -> &Url {
        &self.ingest_url
    }

    pub fn answer_url(&self) -> &Url {
        &self.answer_url
    }
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn ingest_document(&self, upload: DocumentUpload) -> Result<IngestStats, ServiceError> {
        let size = upload.contents.len();
        let form = Form::new().part(
            INGEST_FILE_FIELD,
            Part::bytes(upload.contents)
                .file_name(upload.file_name.clone())
                .mime_str(PDF_MEDIA_TYPE)?,
        );

        debug!(url = %self.ingest_url, file = %upload.file_name, size, "sending document to ingest endpoint");
        let response = self
            .http
            .post(self.ingest_url.clone())
            .query(&self.options.ingest)
            .multipart(form)
            .send()
            .await?;

        let body: IngestResponse = decode_response(response).await?;
        if let Some(message) = &body.message {
            info!(file = %upload.file_name, message = %message, "ingest acknowledged");
        }
        Ok(body.into())
    }

    async fn answer_query(&self, query: &str) -> Result<Answer, ServiceError> {
        debug!(url = %self.answer_url, "sending query to answer endpoint");
        let response = self
            .http
            .get(self.answer_url.clone())
            .query(&AnswerQuery {
                query: query.to_string(),
                top_k: self.options.top_k,
            })
            .send()
            .await?;

        let body: AnswerResponse = decode_response(response).await?;
        Ok(body.into())
    }
}

/// Decodes a service payload, treating non-success statuses, error envelopes
/// and undecodable bodies as failures.
async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let body: String = String::from_utf8_lossy(&body)
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect();
        warn!(%status, "document service returned an error status");
        return Err(ServiceError::Status { status, body });
    }

    match serde_json::from_slice::<T>(&body) {
        Ok(payload) => Ok(payload),
        Err(decode_err) => match ServiceErrorBody::parse(&body) {
            Some(envelope) => Err(ServiceRejection::from(envelope).into()),
            None => Err(ServiceError::Malformed(decode_err.to_string())),
        },
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, ServiceError> {
    let mut base = Url::parse(raw.trim()).map_err(|source| ServiceError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn join_endpoint(base: &Url, path: &str) -> Result<Url, ServiceError> {
    base.join(path).map_err(|source| ServiceError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
