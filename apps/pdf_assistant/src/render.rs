//! Plain-text rendering of controller state for the terminal.

use client_core::{UploadController, UploadPhase};
use shared::domain::{Role, Turn};

pub fn render_turn(turn: &Turn) -> String {
    let mut out = match (turn.role, turn.is_error) {
        (Role::User, _) => format!("you> {}", turn.content),
        (Role::Assistant, false) => format!("assistant> {}", turn.content),
        (Role::Assistant, true) => format!("! assistant> {}", turn.content),
    };
    if let Some(sources) = &turn.sources {
        out.push_str("\n  Sources:");
        for source in sources {
            out.push_str("\n  - ");
            out.push_str(source);
        }
    }
    out
}

pub fn render_upload(upload: &UploadController) -> String {
    let mut lines = Vec::new();
    match upload.phase() {
        UploadPhase::Empty => lines.push("No PDF selected".to_string()),
        UploadPhase::Ready => lines.push(format!("Selected: {}", upload.file_label())),
        UploadPhase::Uploading => lines.push(format!("Processing {}...", upload.file_label())),
    }
    if let Some(error) = upload.error_message() {
        lines.push(format!("error: {error}"));
    }
    if let Some(stats) = upload.last_result() {
        lines.push("PDF Processed Successfully!".to_string());
        lines.push(format!("Pages processed: {}", stats.pages_processed));
        lines.push(format!("Chunks processed: {}", stats.chunks_processed));
    }
    lines.join("\n")
}
