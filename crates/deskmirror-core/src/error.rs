//! Error types for filesystem operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A single filesystem entry that could not be moved, copied, created or
/// deleted.
#[derive(Debug, Clone, Error)]
#[error("{}: {message}", path.display())]
pub struct IoFailure {
    /// The path that caused the failure.
    pub path: PathBuf,
    /// Kind of the underlying I/O error.
    pub kind: io::ErrorKind,
    /// A human-readable error message.
    pub message: String,
}

impl IoFailure {
    /// Create a failure from an I/O error with path context.
    pub fn new(path: impl Into<PathBuf>, error: &io::Error) -> Self {
        Self {
            path: path.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// Create a failure with a custom message.
    pub fn with_message(
        path: impl Into<PathBuf>,
        kind: io::ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Errors returned by filesystem operations.
#[derive(Debug, Clone, Error)]
pub enum FsError {
    /// A single-entry operation failed; nothing past that entry was attempted.
    #[error(transparent)]
    Io(#[from] IoFailure),

    /// Some entries of a recursive copy or delete failed. The remaining
    /// entries were still processed.
    #[error("{} entries failed during tree operation", .0.len())]
    PartialTree(Vec<IoFailure>),
}

impl FsError {
    /// Create a single-entry I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(IoFailure::new(path, &error))
    }

    /// Turn a list of collected failures into a result.
    pub fn from_failures(failures: Vec<IoFailure>) -> Result<(), Self> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Self::PartialTree(failures))
        }
    }

    /// All individual failures carried by this error.
    pub fn failures(&self) -> &[IoFailure] {
        match self {
            Self::Io(failure) => std::slice::from_ref(failure),
            Self::PartialTree(failures) => failures,
        }
    }

    /// Check if this is a partial tree failure.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::PartialTree(_))
    }
}
