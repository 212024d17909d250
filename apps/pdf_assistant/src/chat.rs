//! Interactive question loop.

use std::io::Write;

use anyhow::{Context, Result};
use client_core::{ClientSession, View};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{next_settlement, render::render_turn, Settlements};

pub const QUIT_COMMAND: &str = "/quit";
pub const BUSY_NOTICE: &str = "(still waiting for the previous answer)";

/// Reads questions line by line from `input` and writes the conversation to
/// `out` until `/quit` or end of input. At end of input an outstanding answer
/// is still awaited and written.
pub async fn run_chat<R, W>(
    session: &mut ClientSession,
    settlements: &mut Settlements,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    session.navigate(View::Chat);
    writeln!(out, "Ask a question about your PDF content ({QUIT_COMMAND} to exit)")?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read question input")? else {
                    break;
                };
                if line.trim() == QUIT_COMMAND {
                    return Ok(());
                }
                session.update_draft(line);
                if session.submit_query() {
                    write_last_turn(session, out)?;
                } else if session.conversation().is_some_and(|c| c.is_busy()) {
                    writeln!(out, "{BUSY_NOTICE}")?;
                }
            }
            Some(settlement) = settlements.recv() => {
                if session.apply(settlement) {
                    write_last_turn(session, out)?;
                }
            }
        }
    }

    while session.conversation().is_some_and(|c| c.is_busy()) {
        let settlement = next_settlement(settlements).await?;
        if session.apply(settlement) {
            write_last_turn(session, out)?;
        }
    }
    Ok(())
}

fn write_last_turn<W: Write>(session: &ClientSession, out: &mut W) -> Result<()> {
    if let Some(turn) = session
        .conversation()
        .and_then(|conversation| conversation.transcript().last())
    {
        writeln!(out, "{}", render_turn(turn))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/chat_tests.rs"]
mod tests;
