//! Settlement path between the controllers and the document service.
//!
//! Controllers never await. A guarded transition hands back a pending request,
//! the request runs on the runtime, and its outcome comes back as a
//! [`Settlement`] that the owning event loop feeds into `settle`.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use shared::domain::{Answer, IngestStats};
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{debug, info};

use crate::{
    conversation::PendingQuery, error::ServiceError, service::DocumentService,
    upload::PendingIngest,
};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one outbound request. Unique for the lifetime of the process, so a
/// settlement can never be mistaken for another controller's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub(crate) fn issue() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub enum Settlement {
    Ingest {
        ticket: RequestTicket,
        outcome: Result<IngestStats, ServiceError>,
    },
    Answer {
        ticket: RequestTicket,
        outcome: Result<Answer, ServiceError>,
    },
}

impl Settlement {
    pub fn ticket(&self) -> RequestTicket {
        match self {
            Self::Ingest { ticket, .. } | Self::Answer { ticket, .. } => *ticket,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::Ingest { outcome, .. } => outcome.is_ok(),
            Self::Answer { outcome, .. } => outcome.is_ok(),
        }
    }
}

pub async fn resolve_ingest(service: &dyn DocumentService, pending: PendingIngest) -> Settlement {
    let PendingIngest { ticket, upload } = pending;
    info!(%ticket, file = %upload.file_name, "issuing ingest request");
    let outcome = service.ingest_document(upload).await;
    if let Err(err) = &outcome {
        debug!(%ticket, error = %err, "ingest request failed");
    }
    Settlement::Ingest { ticket, outcome }
}

pub async fn resolve_answer(service: &dyn DocumentService, pending: PendingQuery) -> Settlement {
    let PendingQuery { ticket, query } = pending;
    info!(%ticket, "issuing answer request");
    let outcome = service.answer_query(&query).await;
    if let Err(err) = &outcome {
        debug!(%ticket, error = %err, "answer request failed");
    }
    Settlement::Answer { ticket, outcome }
}

pub fn spawn_ingest(
    service: Arc<dyn DocumentService>,
    pending: PendingIngest,
    settlements: UnboundedSender<Settlement>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let settlement = resolve_ingest(service.as_ref(), pending).await;
        deliver(&settlements, settlement);
    })
}

pub fn spawn_answer(
    service: Arc<dyn DocumentService>,
    pending: PendingQuery,
    settlements: UnboundedSender<Settlement>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let settlement = resolve_answer(service.as_ref(), pending).await;
        deliver(&settlements, settlement);
    })
}

fn deliver(settlements: &UnboundedSender<Settlement>, settlement: Settlement) {
    let ticket = settlement.ticket();
    if settlements.send(settlement).is_err() {
        debug!(%ticket, "settlement receiver dropped; discarding outcome");
    }
}
