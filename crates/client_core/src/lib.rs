//! Client-side protocol driver for the PDF question-answering service.
//!
//! Two independent controllers hold all client state: [`UploadController`] for
//! document ingest and [`ConversationController`] for the chat transcript. Both
//! expose synchronous guarded transitions; the network step runs through a
//! [`DocumentService`] and is fed back as a [`Settlement`].

pub mod conversation;
pub mod driver;
pub mod error;
pub mod service;
pub mod session;
pub mod upload;

pub use conversation::{ConversationController, ConversationPhase, PendingQuery};
pub use driver::{
    resolve_answer, resolve_ingest, spawn_answer, spawn_ingest, RequestTicket, Settlement,
};
pub use error::ServiceError;
pub use service::{DocumentService, DocumentUpload, HttpDocumentService, HttpServiceOptions};
pub use session::{ClientSession, View};
pub use upload::{
    DocumentCandidate, PendingIngest, UploadController, UploadPhase, INVALID_FILE_TYPE_MESSAGE,
    UPLOAD_FAILED_MESSAGE,
};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
