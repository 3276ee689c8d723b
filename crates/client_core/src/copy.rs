//! Transient "copied" marker for generated documents.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use shared::domain::DocumentSlot;
use tokio::{sync::Mutex, time::Instant};

pub const COPY_MARKER_WINDOW: Duration = Duration::from_secs(3);

/// Process-wide clipboard. Implementations acquire the clipboard, write and
/// release it within one call.
pub trait ClipboardSink: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
struct CopyMarker {
    slot: DocumentSlot,
    copied_at: Instant,
}

pub struct CopyIndicator {
    clipboard: Arc<dyn ClipboardSink>,
    window: Duration,
    marker: Mutex<Option<CopyMarker>>,
}

impl CopyIndicator {
    pub fn new(clipboard: Arc<dyn ClipboardSink>) -> Self {
        Self::with_window(clipboard, COPY_MARKER_WINDOW)
    }

    pub fn with_window(clipboard: Arc<dyn ClipboardSink>, window: Duration) -> Self {
        Self {
            clipboard,
            window,
            marker: Mutex::new(None),
        }
    }

    /// Writes `text` to the clipboard and points the marker at `slot`,
    /// replacing whatever document was marked before. A failed write leaves
    /// the marker untouched.
    pub async fn copy(&self, slot: DocumentSlot, text: &str) -> Result<()> {
        let mut marker = self.marker.lock().await;
        self.clipboard.write_text(text)?;
        *marker = Some(CopyMarker {
            slot,
            copied_at: Instant::now(),
        });
        Ok(())
    }

    /// The marked document, or `None` once the window has elapsed.
    pub async fn current(&self) -> Option<DocumentSlot> {
        let mut marker = self.marker.lock().await;
        match *marker {
            Some(active) if active.copied_at.elapsed() < self.window => Some(active.slot),
            Some(_) => {
                *marker = None;
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/copy_tests.rs"]
mod tests;
