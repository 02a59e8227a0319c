//! Cross-platform clipboard helpers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard error: {0}")]
    Clip(String),
}

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.set_contents(text.to_string())
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

#[cfg(test)]
pub fn get_clipboard_contents() -> Result<String, ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.get_contents()
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "needs a desktop session with a system clipboard"]
    fn clipboard_round_trip() {
        let text = "clipboard round trip";
        copy_to_clipboard(text).unwrap();
        assert_eq!(get_clipboard_contents().unwrap(), text);
    }

    #[test]
    #[ignore = "needs a desktop session with a system clipboard"]
    fn clipboard_handles_unicode() {
        let text = "unicode ✨ contents";
        copy_to_clipboard(text).unwrap();
        assert_eq!(get_clipboard_contents().unwrap(), text);
    }
}
