//! External editor bridge: edit a text buffer through `$EDITOR`.
//!
//! The buffer goes out through a named temp file, the editor runs to
//! completion, and the file is read back. The temp file is removed on every
//! exit path, including editor failure.

use std::env;
use std::io::Write;
use std::process::Command;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("failed to launch editor '{command}': {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },
    #[error("editor buffer error: {0}")]
    Buffer(#[from] std::io::Error),
}

/// Editor selection, resolved once at startup and passed in explicitly.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub command: String,
}

impl EditorConfig {
    /// `$EDITOR`, then `$VISUAL`, then a platform default.
    pub fn from_env() -> Self {
        let command = env::var("EDITOR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| env::var("VISUAL").ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| default_editor().to_string());
        Self { command }
    }
}

fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "nano"
    }
}

/// Run the configured editor over `initial`. Returns `Ok(None)` when the
/// editor exits nonzero (the edit is aborted and the caller keeps the
/// original value).
pub fn edit_text(cfg: &EditorConfig, initial: &str) -> Result<Option<String>, EditorError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("json_leaf_")
        .suffix(".txt")
        .tempfile()?;
    tmp.write_all(initial.as_bytes())?;
    tmp.flush()?;

    let mut parts = cfg.command.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(EditorError::Launch {
            command: cfg.command.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "empty editor command"),
        });
    };

    let status = Command::new(program)
        .args(parts)
        .arg(tmp.path())
        .status()
        .map_err(|source| EditorError::Launch {
            command: cfg.command.clone(),
            source,
        })?;

    if !status.success() {
        tracing::warn!("editor exited with {status}, edit aborted");
        return Ok(None);
    }

    let edited = std::fs::read_to_string(tmp.path())?;
    Ok(Some(edited))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_always_yields_a_command() {
        let cfg = EditorConfig::from_env();
        assert!(!cfg.command.trim().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn noop_editor_returns_buffer_unchanged() {
        let cfg = EditorConfig {
            command: "true".into(),
        };
        let out = edit_text(&cfg, "hello\nworld").unwrap();
        assert_eq!(out.as_deref(), Some("hello\nworld"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_editor_aborts_the_edit() {
        let cfg = EditorConfig {
            command: "false".into(),
        };
        assert_eq!(edit_text(&cfg, "unchanged").unwrap(), None);
    }

    #[test]
    fn missing_editor_is_a_launch_error() {
        let cfg = EditorConfig {
            command: "definitely-not-an-editor-7f3a".into(),
        };
        assert!(matches!(
            edit_text(&cfg, ""),
            Err(EditorError::Launch { .. })
        ));
    }

    #[test]
    fn empty_command_is_a_launch_error() {
        let cfg = EditorConfig { command: "  ".into() };
        assert!(matches!(
            edit_text(&cfg, ""),
            Err(EditorError::Launch { .. })
        ));
    }
}
