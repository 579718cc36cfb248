//! Clipboard functionality for copying calculator results.
//!
//! On Linux the copied text is served by whoever owns the clipboard, so it
//! disappears once the owning `Clipboard` is dropped (unless a clipboard
//! manager takes it over).

use arboard::Clipboard;

/// A clipboard connection held open for a whole session, so copied text
/// stays available while the session runs.
#[derive(Default)]
pub struct ClipboardHandle {
    clipboard: Option<Clipboard>,
}

impl ClipboardHandle {
    /// Connects lazily on the first copy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a connection has been opened.
    pub fn is_connected(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Copy text to the system clipboard.
    pub fn copy(&mut self, text: &str) -> crate::Result<()> {
        if self.clipboard.is_none() {
            self.clipboard = Some(Clipboard::new()?);
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            clipboard.set_text(text.to_string())?;
        }
        tracing::debug!(%text, "Copied to clipboard");
        Ok(())
    }
}

/// Copy text from a short-lived process.
///
/// On Linux this blocks until another application replaces the clipboard
/// contents, so the text can still be pasted after we would have exited.
pub fn copy_and_wait(text: &str) -> crate::Result<()> {
    let mut clipboard = Clipboard::new()?;

    #[cfg(target_os = "linux")]
    {
        use arboard::SetExtLinux;
        clipboard.set().wait().text(text.to_string())?;
    }
    #[cfg(not(target_os = "linux"))]
    clipboard.set_text(text.to_string())?;

    tracing::debug!(%text, "Clipboard handed over");
    Ok(())
}
