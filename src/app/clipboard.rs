use crate::error::{GenerateError, Result};

/// Write-only clipboard seam. Failures are logged by the caller, never
/// stored into UI state.
pub trait Clipboard: Send {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new()
            .map_err(|e| GenerateError::ClipboardError(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| GenerateError::ClipboardError(e.to_string()))
    }
}

/// Fallback for sessions without a system clipboard: prints the text so the
/// user can copy it by hand.
pub struct EchoClipboard;

impl Clipboard for EchoClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}
