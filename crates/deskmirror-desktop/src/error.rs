//! Error and warning types for desktop operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use deskmirror_core::FsError;

/// Errors returned to collaborators calling into the desktop.
#[derive(Debug, Clone, Error)]
pub enum DesktopError {
    /// A filesystem operation failed, fully or for part of a tree.
    #[error(transparent)]
    Fs(#[from] FsError),

    /// Paste was attempted with nothing copied or cut.
    #[error("Clipboard is empty. Use copy or cut first")]
    ClipboardEmpty,

    /// No tile is shown for the given path.
    #[error("No desktop tile for {}", path.display())]
    UnknownTile { path: PathBuf },

    /// None of the desktop directory candidates exist.
    #[error("Desktop folder not found")]
    DesktopNotFound,

    /// A directory was expected.
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// The desktop service task is no longer running.
    #[error("Desktop service has stopped")]
    ServiceStopped,
}

impl DesktopError {
    /// The filesystem error behind this error, if any.
    pub fn fs(&self) -> Option<&FsError> {
        match self {
            Self::Fs(e) => Some(e),
            _ => None,
        }
    }
}

/// Kind of state file warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Wrong field count, unparsable coordinates or an empty path.
    MalformedRecord,
    /// The recorded file is gone or no longer on the desktop.
    StaleEntry,
}

/// A state file record that was skipped during load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateWarning {
    /// 1-based line number in the state file.
    pub line: usize,
    /// Path named by the record, when it could be read.
    pub path: Option<PathBuf>,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl StateWarning {
    /// Create a malformed record warning.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            path: None,
            message: message.into(),
            kind: WarningKind::MalformedRecord,
        }
    }

    /// Create a stale entry warning.
    pub fn stale(line: usize, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            line,
            path: Some(path.into()),
            message: message.into(),
            kind: WarningKind::StaleEntry,
        }
    }
}

impl std::fmt::Display for StateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "line {}: {}: {}", self.line, path.display(), self.message),
            None => write!(f, "line {}: {}", self.line, self.message),
        }
    }
}
