//! System clipboard adapter backed by `arboard`.
//!
//! `arboard` talks to the platform clipboard synchronously, so every write runs
//! on the blocking pool.

use animicon_core::effects::{ClipboardError, ClipboardWriter};
use async_trait::async_trait;

/// [`ClipboardWriter`] for the desktop clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

/// Where an `arboard` call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Open,
    Write,
}

fn map_error(stage: Stage, err: arboard::Error) -> ClipboardError {
    match (stage, err) {
        (Stage::Open, err)
        | (_, err @ arboard::Error::ClipboardNotSupported)
        | (_, err @ arboard::Error::ClipboardOccupied) => {
            ClipboardError::Unavailable(err.to_string())
        }
        (Stage::Write, err) => ClipboardError::Rejected(err.to_string()),
    }
}

fn write_text(text: String) -> Result<(), ClipboardError> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| map_error(Stage::Open, e))?;
    clipboard
        .set_text(text)
        .map_err(|e| map_error(Stage::Write, e))
}

#[async_trait]
impl ClipboardWriter for SystemClipboard {
    async fn copy_to_clipboard(&self, text: &str) -> Result<(), ClipboardError> {
        let owned = text.to_string();
        tokio::task::spawn_blocking(move || write_text(owned))
            .await
            .map_err(|e| ClipboardError::Rejected(format!("clipboard task failed: {e}")))??;

        tracing::debug!("[clipboard] Copied {} bytes", text.len());
        Ok(())
    }
}
