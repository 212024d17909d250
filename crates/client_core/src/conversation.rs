use shared::domain::{Answer, Turn};
use tracing::{debug, info, warn};

use crate::{driver::RequestTicket, error::ServiceError};

#[derive(Debug)]
pub struct PendingQuery {
    pub ticket: RequestTicket,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    Idle,
    AwaitingAnswer,
}

/// Transcript and draft state for the chat view.
///
/// The transcript is append-only. At most one query is in flight, so every
/// assistant turn lands directly after the user turn that produced it.
#[derive(Debug, Default)]
pub struct ConversationController {
    transcript: Vec<Turn>,
    draft: String,
    in_flight: Option<RequestTicket>,
}

impl ConversationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Submits the current draft.
    ///
    /// The user turn is appended and the draft cleared before the request is
    /// handed back. Returns `None` for a blank draft or while an answer is
    /// still pending.
    pub fn submit_query(&mut self) -> Option<PendingQuery> {
        if let Some(ticket) = self.in_flight {
            debug!(%ticket, "answer still pending; rejecting submission");
            return None;
        }
        let query = self.draft.trim();
        if query.is_empty() {
            debug!("blank draft; ignoring submission");
            return None;
        }

        let query = query.to_string();
        let ticket = RequestTicket::issue();
        self.transcript.push(Turn::user(query.clone()));
        self.draft.clear();
        self.in_flight = Some(ticket);
        info!(%ticket, turns = self.transcript.len(), "query submitted");
        Some(PendingQuery { ticket, query })
    }

    /// Appends the assistant turn for the in-flight query. Outcomes for any
    /// other ticket are ignored and `false` is returned.
    pub fn settle(&mut self, ticket: RequestTicket, outcome: Result<Answer, ServiceError>) -> bool {
        if self.in_flight != Some(ticket) {
            warn!(%ticket, "ignoring settlement for a query that is not in flight");
            return false;
        }
        self.in_flight = None;

        let turn = match outcome {
            Ok(answer) => {
                info!(%ticket, sources = answer.sources.len(), "answer received");
                Turn::answer(answer.response, answer.sources)
            }
            Err(err) => {
                warn!(%ticket, error = %err, "query failed");
                Turn::failure()
            }
        };
        self.transcript.push(turn);
        true
    }

    pub fn phase(&self) -> ConversationPhase {
        if self.in_flight.is_some() {
            ConversationPhase::AwaitingAnswer
        } else {
            ConversationPhase::Idle
        }
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestTicket> {
        self.in_flight
    }
}

#[cfg(test)]
#[path = "tests/conversation_tests.rs"]
mod tests;
