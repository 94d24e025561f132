//! File operations engine for deskmirror.
//!
//! This crate provides the filesystem primitives the desktop relies on:
//! collision-free naming, recursive copy, recursive delete, move with a
//! copy-and-delete fallback, and file/directory creation. The functions are
//! blocking; [`OperationExecutor`] runs them on tokio's blocking pool.
//!
//! Tree operations are best-effort: a failing entry is recorded and the walk
//! continues, and the collected failures are returned as
//! [`FsError::PartialTree`].

mod conflict;
mod copy;
mod create;
mod delete;
mod executor;
mod move_op;
mod operation;
mod tree;

pub use conflict::{path_exists, unique_name};
pub use copy::{CopyStats, recursive_copy};
pub use create::{create_directory, create_file, validate_filename};
pub use delete::{DeleteStats, recursive_delete};
pub use executor::OperationExecutor;
pub use move_op::{MoveMethod, move_or_fallback};
pub use operation::{FileOperation, OperationOutcome, OperationType};

pub use deskmirror_core::{FsError, IoFailure};
