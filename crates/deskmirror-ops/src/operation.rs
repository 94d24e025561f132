//! File operation types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use deskmirror_core::FsError;

use crate::copy::{CopyStats, recursive_copy};
use crate::create::{create_directory, create_file};
use crate::delete::{DeleteStats, recursive_delete};
use crate::move_op::{MoveMethod, move_or_fallback};

/// A file operation to be executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileOperation {
    /// Copy a file or directory tree to an exact destination path.
    Copy { source: PathBuf, destination: PathBuf },
    /// Move a file or directory to an exact destination path.
    Move { source: PathBuf, destination: PathBuf },
    /// Delete a file or directory tree.
    Delete { target: PathBuf },
    /// Create a new empty file.
    CreateFile { path: PathBuf },
    /// Create a new directory.
    CreateDirectory { path: PathBuf },
}

impl FileOperation {
    /// Create a copy operation.
    pub fn copy(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::Copy {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Create a move operation.
    pub fn move_to(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::Move {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Create a delete operation.
    pub fn delete(target: impl Into<PathBuf>) -> Self {
        Self::Delete {
            target: target.into(),
        }
    }

    /// Create a file creation operation.
    pub fn create_file(path: impl Into<PathBuf>) -> Self {
        Self::CreateFile { path: path.into() }
    }

    /// Create a directory creation operation.
    pub fn create_directory(path: impl Into<PathBuf>) -> Self {
        Self::CreateDirectory { path: path.into() }
    }

    /// The type of this operation.
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::Copy { .. } => OperationType::Copy,
            Self::Move { .. } => OperationType::Move,
            Self::Delete { .. } => OperationType::Delete,
            Self::CreateFile { .. } => OperationType::CreateFile,
            Self::CreateDirectory { .. } => OperationType::CreateDirectory,
        }
    }

    /// The path the operation acts on first.
    pub fn primary_path(&self) -> &Path {
        match self {
            Self::Copy { source, .. } | Self::Move { source, .. } => source,
            Self::Delete { target } => target,
            Self::CreateFile { path } | Self::CreateDirectory { path } => path,
        }
    }

    /// Run the operation on the current thread.
    pub fn run(self) -> Result<OperationOutcome, FsError> {
        match self {
            Self::Copy {
                source,
                destination,
            } => recursive_copy(&source, &destination).map(OperationOutcome::Copied),
            Self::Move {
                source,
                destination,
            } => move_or_fallback(&source, &destination).map(OperationOutcome::Moved),
            Self::Delete { target } => recursive_delete(&target).map(OperationOutcome::Deleted),
            Self::CreateFile { path } => create_file(&path).map(|()| OperationOutcome::Created),
            Self::CreateDirectory { path } => {
                create_directory(&path).map(|()| OperationOutcome::Created)
            }
        }
    }
}

/// The type of operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Copy,
    Move,
    Delete,
    CreateFile,
    CreateDirectory,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "Copy"),
            Self::Move => write!(f, "Move"),
            Self::Delete => write!(f, "Delete"),
            Self::CreateFile => write!(f, "Create file"),
            Self::CreateDirectory => write!(f, "Create directory"),
        }
    }
}

/// Result of a successful operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Copied(CopyStats),
    Moved(MoveMethod),
    Deleted(DeleteStats),
    Created,
}
