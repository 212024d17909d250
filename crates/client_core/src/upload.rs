use shared::domain::{is_pdf_media_type, IngestStats};
use tracing::{debug, info, warn};

use crate::{driver::RequestTicket, error::ServiceError, service::DocumentUpload};

pub const INVALID_FILE_TYPE_MESSAGE: &str = "Please select a valid PDF file";
pub const UPLOAD_FAILED_MESSAGE: &str = "Error uploading the file. Please try again.";

/// A file picked or dropped by the user, with the media type it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCandidate {
    pub name: String,
    pub media_type: String,
    pub contents: Vec<u8>,
}

impl DocumentCandidate {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            contents: contents.into(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        is_pdf_media_type(&self.media_type)
    }
}

#[derive(Debug)]
pub struct PendingIngest {
    pub ticket: RequestTicket,
    pub upload: DocumentUpload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Empty,
    Ready,
    Uploading,
}

/// File selection and ingest state for the upload view.
#[derive(Debug, Default)]
pub struct UploadController {
    selected: Option<DocumentCandidate>,
    in_flight: Option<RequestTicket>,
    last_result: Option<IngestStats>,
    error_message: Option<String>,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_candidate(&mut self, candidate: DocumentCandidate) {
        if candidate.is_pdf() {
            debug!(file = %candidate.name, "accepted document candidate");
            self.selected = Some(candidate);
            self.error_message = None;
        } else {
            debug!(
                file = %candidate.name,
                media_type = %candidate.media_type,
                "rejected non-pdf candidate"
            );
            self.selected = None;
            self.error_message = Some(INVALID_FILE_TYPE_MESSAGE.to_string());
        }
    }

    /// Starts an upload of the selected file.
    ///
    /// Returns `None` without touching state when no file is selected or an
    /// upload is already in flight.
    pub fn trigger_upload(&mut self) -> Option<PendingIngest> {
        if let Some(ticket) = self.in_flight {
            debug!(%ticket, "upload already in flight; ignoring trigger");
            return None;
        }
        let Some(selected) = self.selected.as_ref() else {
            debug!("no document selected; ignoring trigger");
            return None;
        };

        let ticket = RequestTicket::issue();
        let upload = DocumentUpload {
            file_name: selected.name.clone(),
            contents: selected.contents.clone(),
        };
        self.in_flight = Some(ticket);
        self.error_message = None;
        info!(%ticket, file = %upload.file_name, "upload started");
        Some(PendingIngest { ticket, upload })
    }

    /// Applies the outcome of the in-flight upload. Outcomes for any other
    /// ticket are ignored and `false` is returned.
    pub fn settle(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<IngestStats, ServiceError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            warn!(%ticket, "ignoring settlement for an upload that is not in flight");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(stats) => {
                info!(
                    %ticket,
                    pages = stats.pages_processed,
                    chunks = stats.chunks_processed,
                    "upload processed"
                );
                self.last_result = Some(stats);
                self.error_message = None;
            }
            Err(err) => {
                warn!(%ticket, error = %err, "upload failed");
                self.error_message = Some(UPLOAD_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    pub fn phase(&self) -> UploadPhase {
        if self.in_flight.is_some() {
            UploadPhase::Uploading
        } else if self.selected.is_some() {
            UploadPhase::Ready
        } else {
            UploadPhase::Empty
        }
    }

    pub fn selected_file(&self) -> Option<&DocumentCandidate> {
        self.selected.as_ref()
    }

    pub fn file_label(&self) -> &str {
        self.selected
            .as_ref()
            .map(|candidate| candidate.name.as_str())
            .unwrap_or_default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestTicket> {
        self.in_flight
    }

    pub fn last_result(&self) -> Option<IngestStats> {
        self.last_result
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
