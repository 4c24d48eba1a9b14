use anyhow::Context;
use arboard::Clipboard;
use banner_core::ClipboardSink;

/// The desktop clipboard. A fresh handle is opened per write since some
/// platforms drop ownership when the handle goes away.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> anyhow::Result<()> {
        let mut clipboard = Clipboard::new().context("system clipboard unavailable")?;
        clipboard
            .set_text(text.to_owned())
            .context("failed to write to system clipboard")?;
        Ok(())
    }
}
