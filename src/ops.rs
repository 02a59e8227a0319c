//! Stateless leaf operations: display, base64 decode, edit round trip.
//!
//! Each operation takes the selected leaf's value and produces either a
//! preview string or a replacement `Value` for the store; nothing here
//! mutates the document directly.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use thiserror::Error;

const HEXDUMP_WIDTH: usize = 16;
const HEXDUMP_LIMIT: usize = 8192;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("leaf value is not a string")]
    NotAString,
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Read-only rendering: containers pretty-printed, primitives shown directly.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

/// Outcome of a strict base64 decode of a string leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedLeaf {
    /// Payload was valid UTF-8.
    Text(String),
    /// Arbitrary bytes; previewed as a hex dump.
    Binary(Vec<u8>),
}

impl DecodedLeaf {
    /// Preview shown before the user confirms a replacement.
    pub fn preview(&self) -> String {
        match self {
            DecodedLeaf::Text(s) => s.clone(),
            DecodedLeaf::Binary(b) => hexdump(b),
        }
    }

    /// Value written back on an explicit "replace": the decoded text, or a
    /// best-effort one-byte-per-codepoint string for binary payloads.
    pub fn replacement(&self) -> Value {
        match self {
            DecodedLeaf::Text(s) => Value::String(s.clone()),
            DecodedLeaf::Binary(b) => Value::String(b.iter().map(|&c| c as char).collect()),
        }
    }
}

/// Strict-alphabet, strict-padding base64 decode of a string leaf.
pub fn decode_base64_leaf(value: &Value) -> Result<DecodedLeaf, DecodeError> {
    let Value::String(src) = value else {
        return Err(DecodeError::NotAString);
    };
    let raw = STANDARD.decode(src)?;
    Ok(match String::from_utf8(raw) {
        Ok(text) => DecodedLeaf::Text(text),
        Err(e) => DecodedLeaf::Binary(e.into_bytes()),
    })
}

/// Classic offset/hex/ascii dump, capped so a huge blob cannot flood the
/// viewer.
pub fn hexdump(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(HEXDUMP_LIMIT)];
    let mut lines = Vec::with_capacity(shown.len() / HEXDUMP_WIDTH + 2);
    for (row, chunk) in shown.chunks(HEXDUMP_WIDTH).enumerate() {
        let hexs = chunk
            .iter()
            .map(|c| format!("{c:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        let text: String = chunk
            .iter()
            .map(|&c| if (0x20..0x7f).contains(&c) { c as char } else { '.' })
            .collect();
        lines.push(format!(
            "{:08x}  {:<width$}  {}",
            row * HEXDUMP_WIDTH,
            hexs,
            text,
            width = HEXDUMP_WIDTH * 3
        ));
    }
    if bytes.len() > HEXDUMP_LIMIT {
        lines.push("... (truncated)".to_string());
    }
    lines.join("\n")
}

/// Text placed in the external editor: strings raw, everything else as
/// pretty-printed JSON.
pub fn edit_buffer(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Value stored after the editor returns. A string leaf takes the edited
/// text verbatim. For any other leaf the text is parsed as JSON; when the
/// parse fails the raw text is stored as a string rather than rejecting the
/// edit.
pub fn edited_replacement(old: &Value, edited: &str) -> Value {
    if old.is_string() {
        Value::String(edited.to_string())
    } else {
        serde_json::from_str(edited).unwrap_or_else(|_| Value::String(edited.to_string()))
    }
}
