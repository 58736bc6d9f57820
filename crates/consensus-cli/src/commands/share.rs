use super::ready_session;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use consensus_session::{Clipboard, ClipboardError};
use std::io::{self, IsTerminal, Write};

/// Writes to the terminal's clipboard with an OSC 52 escape sequence.
struct TerminalClipboard;

impl Clipboard for TerminalClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut stdout = io::stdout();
        if !stdout.is_terminal() {
            return Err(ClipboardError("stdout is not a terminal".to_string()));
        }
        write!(stdout, "\x1b]52;c;{}\x07", STANDARD.encode(text))
            .and_then(|()| stdout.flush())
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

pub fn run(copy: bool, json: bool) -> Result<()> {
    let session = ready_session()?;
    let link = session.share_link().context("no decision is open")?;

    let copied = if copy {
        session.copy_share_link(&mut TerminalClipboard).is_some()
    } else {
        false
    };

    if json {
        let value = serde_json::json!({
            "share_link": link,
            "copied": copied,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", link);
    if copied {
        println!("Link copied to clipboard.");
    }
    Ok(())
}
