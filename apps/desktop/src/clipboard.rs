use anyhow::{Context, Result};
use arboard::Clipboard;
use client_core::ClipboardSink;

/// Writes to the OS clipboard. A fresh handle per write keeps the sink
/// `Send + Sync` without holding platform state across awaits.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("clipboard unavailable")?;
        clipboard
            .set_text(text.to_owned())
            .context("failed to write clipboard text")
    }
}
