//! Async executor running file operations on the blocking pool.

use std::io;
use std::path::{Path, PathBuf};

use deskmirror_core::{FsError, IoFailure};

use crate::copy::{CopyStats, recursive_copy};
use crate::delete::{DeleteStats, recursive_delete};
use crate::move_op::{MoveMethod, move_or_fallback};
use crate::operation::{FileOperation, OperationOutcome};

/// Executor for file operations.
///
/// Every call runs to completion or failure on tokio's blocking pool; there
/// is no cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationExecutor;

impl OperationExecutor {
    /// Create a new executor.
    pub fn new() -> Self {
        Self
    }

    /// Execute an arbitrary operation.
    pub async fn execute(&self, operation: FileOperation) -> Result<OperationOutcome, FsError> {
        let path = operation.primary_path().to_path_buf();
        let operation_type = operation.operation_type();
        tracing::debug!(%operation_type, path = %path.display(), "executing");
        run_blocking(path, move || operation.run()).await
    }

    /// Copy `source` to the exact path `destination`.
    pub async fn copy(&self, source: &Path, destination: &Path) -> Result<CopyStats, FsError> {
        let (source, destination) = (source.to_path_buf(), destination.to_path_buf());
        run_blocking(source.clone(), move || recursive_copy(&source, &destination)).await
    }

    /// Move `source` to the exact path `destination`.
    pub async fn move_to(&self, source: &Path, destination: &Path) -> Result<MoveMethod, FsError> {
        let (source, destination) = (source.to_path_buf(), destination.to_path_buf());
        run_blocking(source.clone(), move || move_or_fallback(&source, &destination)).await
    }

    /// Delete a file or directory tree.
    pub async fn delete(&self, target: &Path) -> Result<DeleteStats, FsError> {
        let target = target.to_path_buf();
        run_blocking(target.clone(), move || recursive_delete(&target)).await
    }
}

async fn run_blocking<T, F>(path: PathBuf, f: F) -> Result<T, FsError>
where
    F: FnOnce() -> Result<T, FsError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        FsError::from(IoFailure::with_message(
            path,
            io::ErrorKind::Other,
            format!("Task failed: {}", e),
        ))
    })?
}
