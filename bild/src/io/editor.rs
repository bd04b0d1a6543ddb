//! Interactive editor round-trip.
//!
//! The [`Editor`] trait decouples edit commands from the actual editor
//! process. Tests use scripted editors that return canned text.

use std::env;
use std::fs;
use std::io::Write;
use std::process::Command;

use tracing::{debug, info, instrument, warn};

use crate::error::BildError;

/// Editor used when `$EDITOR` is unset or blank.
pub const DEFAULT_EDITOR: &str = "vi";

/// Hands text to a user for editing and returns the result.
pub trait Editor {
    fn edit(&self, initial: &str) -> Result<String, BildError>;
}

/// Editor that spawns an external program on a temporary Markdown file.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    /// `command` may carry arguments (`code --wait`); the file path is
    /// appended as the last argument.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Editor from `$EDITOR`, falling back to [`DEFAULT_EDITOR`].
    pub fn from_env() -> Self {
        let command = env::var("EDITOR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());
        Self::new(command)
    }
}

impl Editor for ExternalEditor {
    #[instrument(skip_all, fields(editor = %self.command))]
    fn edit(&self, initial: &str) -> Result<String, BildError> {
        let mut file = tempfile::Builder::new()
            .prefix("bild_edit_")
            .suffix(".md")
            .tempfile()
            .map_err(BildError::EditorIo)?;
        file.write_all(initial.as_bytes())
            .and_then(|()| file.flush())
            .map_err(BildError::EditorIo)?;

        let mut parts = self.command.split_whitespace();
        let program = parts.next().unwrap_or(DEFAULT_EDITOR);
        info!(path = %file.path().display(), "opening editor");
        let status = Command::new(program)
            .args(parts)
            .arg(file.path())
            .status()
            .map_err(|source| BildError::EditorLaunch {
                editor: self.command.clone(),
                source,
            })?;
        if !status.success() {
            // Whatever the user left in the file is still taken.
            warn!(exit_code = ?status.code(), "editor exited unsuccessfully");
        }

        let edited = fs::read_to_string(file.path()).map_err(BildError::EditorIo)?;
        debug!(bytes = edited.len(), "editor session finished");
        Ok(edited)
    }
}
