use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::{
    conversation::ConversationController,
    driver::{spawn_answer, spawn_ingest, Settlement},
    service::DocumentService,
    upload::{DocumentCandidate, UploadController},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Upload,
    Chat,
}

#[derive(Debug)]
enum ActiveView {
    Upload(UploadController),
    Chat(ConversationController),
}

impl ActiveView {
    fn fresh(view: View) -> Self {
        match view {
            View::Upload => Self::Upload(UploadController::new()),
            View::Chat => Self::Chat(ConversationController::new()),
        }
    }

    fn view(&self) -> View {
        match self {
            Self::Upload(_) => View::Upload,
            Self::Chat(_) => View::Chat,
        }
    }
}

/// Navigation context owning the controller of the active view.
///
/// Controller state lives only as long as its view: navigating away drops it,
/// and settlements for requests issued from a dropped view are discarded.
pub struct ClientSession {
    service: Arc<dyn DocumentService>,
    active: ActiveView,
    settlements: UnboundedSender<Settlement>,
}

impl ClientSession {
    /// Creates a session on the upload view together with the receiver its
    /// settlements are delivered on. Must be used from within a tokio runtime.
    pub fn new(service: Arc<dyn DocumentService>) -> (Self, UnboundedReceiver<Settlement>) {
        Self::starting_at(service, View::Upload)
    }

    pub fn starting_at(
        service: Arc<dyn DocumentService>,
        view: View,
    ) -> (Self, UnboundedReceiver<Settlement>) {
        let (settlements, rx) = unbounded_channel();
        let session = Self {
            service,
            active: ActiveView::fresh(view),
            settlements,
        };
        (session, rx)
    }

    pub fn view(&self) -> View {
        self.active.view()
    }

    pub fn navigate(&mut self, view: View) {
        if self.view() == view {
            return;
        }
        info!(from = ?self.view(), to = ?view, "navigating");
        self.active = ActiveView::fresh(view);
    }

    pub fn upload(&self) -> Option<&UploadController> {
        match &self.active {
            ActiveView::Upload(controller) => Some(controller),
            ActiveView::Chat(_) => None,
        }
    }

    pub fn upload_mut(&mut self) -> Option<&mut UploadController> {
        match &mut self.active {
            ActiveView::Upload(controller) => Some(controller),
            ActiveView::Chat(_) => None,
        }
    }

    pub fn conversation(&self) -> Option<&ConversationController> {
        match &self.active {
            ActiveView::Chat(controller) => Some(controller),
            ActiveView::Upload(_) => None,
        }
    }

    pub fn conversation_mut(&mut self) -> Option<&mut ConversationController> {
        match &mut self.active {
            ActiveView::Chat(controller) => Some(controller),
            ActiveView::Upload(_) => None,
        }
    }

    /// Selects a candidate on the upload view. Returns `false` off that view.
    pub fn select_candidate(&mut self, candidate: DocumentCandidate) -> bool {
        match self.upload_mut() {
            Some(upload) => {
                upload.select_candidate(candidate);
                true
            }
            None => false,
        }
    }

    /// Triggers an upload and issues its request. Returns whether a request
    /// was issued.
    pub fn trigger_upload(&mut self) -> bool {
        let Some(pending) = self.upload_mut().and_then(UploadController::trigger_upload) else {
            return false;
        };
        spawn_ingest(self.service.clone(), pending, self.settlements.clone());
        true
    }

    pub fn update_draft(&mut self, text: impl Into<String>) -> bool {
        match self.conversation_mut() {
            Some(conversation) => {
                conversation.update_draft(text);
                true
            }
            None => false,
        }
    }

    /// Submits the draft and issues its request. Returns whether a request was
    /// issued.
    pub fn submit_query(&mut self) -> bool {
        let Some(pending) = self
            .conversation_mut()
            .and_then(ConversationController::submit_query)
        else {
            return false;
        };
        spawn_answer(self.service.clone(), pending, self.settlements.clone());
        true
    }

    /// Routes a settlement to the controller that issued it.
    pub fn apply(&mut self, settlement: Settlement) -> bool {
        let view = self.view();
        match (&mut self.active, settlement) {
            (ActiveView::Upload(upload), Settlement::Ingest { ticket, outcome }) => {
                upload.settle(ticket, outcome)
            }
            (ActiveView::Chat(conversation), Settlement::Answer { ticket, outcome }) => {
                conversation.settle(ticket, outcome)
            }
            (_, settlement) => {
                debug!(
                    ticket = %settlement.ticket(),
                    ?view,
                    "dropping settlement for an inactive view"
                );
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
