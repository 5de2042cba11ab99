use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Open(String),

    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Write-only text clipboard.
///
/// The `arboard` handle is opened on first use and kept for the life of the
/// writer: on X11 and Wayland the copied text is served by this process and
/// disappears once the handle is dropped.
#[derive(Default)]
pub struct ClipboardWriter {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(|error| {
                tracing::warn!(%error, "clipboard unavailable");
                ClipboardError::Open(error.to_string())
            })?,
        };

        match clipboard.set_text(text.to_string()) {
            Ok(()) => {
                tracing::debug!(chars = text.chars().count(), "copied to clipboard");
                self.inner = Some(clipboard);
                Ok(())
            }
            Err(error) => {
                // Dropped here; a fresh handle is opened on the next write.
                tracing::warn!(%error, "clipboard write failed");
                Err(ClipboardError::Write(error.to_string()))
            }
        }
    }
}
