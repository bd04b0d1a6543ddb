//! Typed failures for bild operations.
//!
//! Every fatal condition is a [`BildError`] value propagated to the binary's
//! `main`, which is the only place that decides the exit status.

use std::path::PathBuf;

use thiserror::Error;

/// Broad classification used to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration file unreadable, unwritable or undecodable.
    Config,
    /// Project or phase could not be determined.
    Resolution,
    /// External editor could not be used.
    Editor,
    /// A phase script failed or could not start.
    Execution,
}

#[derive(Debug, Error)]
pub enum BildError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config {path}: {source}")]
    ConfigEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {path}: {}", .messages.join("; "))]
    ConfigInvalid { path: PathBuf, messages: Vec<String> },

    #[error("project name required when no local config exists")]
    ProjectRequired,

    #[error("project {project} not found")]
    ProjectNotFound { project: String },

    #[error("phase name must not be empty")]
    PhaseNameRequired,

    #[error("phase {phase} not found in project {project}")]
    PhaseNotFound { project: String, phase: String },

    #[error("not inside a git repository")]
    NotInRepository,

    #[error("cannot use repository root {path} as working directory: {source}")]
    WorkdirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch editor '{editor}': {source}")]
    EditorLaunch {
        editor: String,
        #[source]
        source: std::io::Error,
    },

    #[error("editor session file error: {0}")]
    EditorIo(#[source] std::io::Error),

    #[error("phase {phase} could not be started: {source}")]
    PhaseSpawn {
        phase: String,
        #[source]
        source: std::io::Error,
    },

    #[error("phase {phase} failed: {}", describe_exit(.code))]
    PhaseFailed { phase: String, code: Option<i32> },
}

impl BildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigRead { .. }
            | Self::ConfigWrite { .. }
            | Self::ConfigDecode { .. }
            | Self::ConfigEncode { .. }
            | Self::ConfigInvalid { .. } => ErrorKind::Config,
            Self::ProjectRequired
            | Self::ProjectNotFound { .. }
            | Self::PhaseNameRequired
            | Self::PhaseNotFound { .. }
            | Self::NotInRepository
            | Self::WorkdirUnavailable { .. } => ErrorKind::Resolution,
            Self::EditorLaunch { .. } | Self::EditorIo(_) => ErrorKind::Editor,
            Self::PhaseSpawn { .. } | Self::PhaseFailed { .. } => ErrorKind::Execution,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}
