use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ClientSession, DocumentCandidate, DocumentService, HttpDocumentService, Settlement, View,
};
use tokio::{io::BufReader, sync::mpsc::UnboundedReceiver};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod chat;
mod config;
mod render;

use chat::run_chat;
use config::load_settings;
use render::{render_turn, render_upload};

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Parser, Debug)]
#[command(name = "pdf-assistant", about = "Upload a PDF and ask questions about its content")]
struct Args {
    /// Base URL of the document service.
    #[arg(long, global = true)]
    service_url: Option<String>,
    /// Settings file; defaults to ./pdf-assistant.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload and process a PDF.
    Upload {
        path: PathBuf,
        /// Continue into an interactive chat after a successful upload.
        #[arg(long)]
        chat: bool,
    },
    /// Ask questions interactively.
    Chat,
    /// Ask a single question and print the answer.
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
}

pub(crate) type Settlements = UnboundedReceiver<Settlement>;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(service_url) = args.service_url {
        settings.service_url = service_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let service: Arc<dyn DocumentService> = Arc::new(
        HttpDocumentService::with_options(&settings.service_url, settings.service_options())
            .context("failed to configure document service")?,
    );
    info!(service_url = %settings.service_url, "document service configured");
    let (mut session, mut settlements) = ClientSession::new(service);

    match args.command {
        Command::Upload { path, chat } => {
            if !run_upload(&mut session, &mut settlements, &path).await? {
                return Ok(ExitCode::FAILURE);
            }
            if chat {
                chat_on_stdin(&mut session, &mut settlements).await?;
            }
        }
        Command::Chat => chat_on_stdin(&mut session, &mut settlements).await?,
        Command::Ask { question } => {
            run_ask(&mut session, &mut settlements, &question.join(" ")).await?
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn chat_on_stdin(session: &mut ClientSession, settlements: &mut Settlements) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    run_chat(session, settlements, input, &mut std::io::stdout()).await
}

async fn read_candidate(path: &Path) -> Result<DocumentCandidate> {
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MEDIA_TYPE);
    Ok(DocumentCandidate::new(name, media_type, contents))
}

pub(crate) async fn next_settlement(settlements: &mut Settlements) -> Result<Settlement> {
    settlements
        .recv()
        .await
        .context("settlement channel closed unexpectedly")
}

/// Returns whether the document was processed.
async fn run_upload(
    session: &mut ClientSession,
    settlements: &mut Settlements,
    path: &Path,
) -> Result<bool> {
    session.navigate(View::Upload);
    session.select_candidate(read_candidate(path).await?);

    if !session.trigger_upload() {
        if let Some(upload) = session.upload() {
            println!("{}", render_upload(upload));
        }
        return Ok(false);
    }
    if let Some(upload) = session.upload() {
        println!("{}", render_upload(upload));
    }

    let settlement = next_settlement(settlements).await?;
    session.apply(settlement);

    let upload = session.upload().context("upload view is no longer active")?;
    println!("{}", render_upload(upload));
    Ok(upload.error_message().is_none() && upload.last_result().is_some())
}

async fn run_ask(
    session: &mut ClientSession,
    settlements: &mut Settlements,
    question: &str,
) -> Result<()> {
    session.navigate(View::Chat);
    session.update_draft(question);
    if !session.submit_query() {
        bail!("question must not be blank");
    }

    let settlement = next_settlement(settlements).await?;
    session.apply(settlement);
    if let Some(conversation) = session.conversation() {
        for turn in conversation.transcript() {
            println!("{}", render_turn(turn));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/upload_flow_tests.rs"]
mod tests;
