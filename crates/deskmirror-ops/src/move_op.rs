//! Move with a copy-and-delete fallback.

use std::fs;
use std::io;
use std::path::Path;

use deskmirror_core::{FsError, IoFailure};

use crate::copy::recursive_copy;
use crate::delete::recursive_delete;
use crate::tree::is_within;

/// How a move was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMethod {
    /// Atomic rename on the same filesystem.
    Renamed,
    /// Recursive copy followed by recursive delete of the source.
    CopiedAndDeleted,
}

/// Move `source` to `dest`.
///
/// Tries an atomic rename first. If that fails (cross-device, sharing
/// violation, ...) the source is copied to `dest` and then deleted.
///
/// When the copy reports any failure the source is left untouched and the
/// copy error is returned, so a partial destination never costs the only
/// complete version of the data.
pub fn move_or_fallback(source: &Path, dest: &Path) -> Result<MoveMethod, FsError> {
    let metadata = fs::symlink_metadata(source).map_err(|e| FsError::io(source, e))?;

    if metadata.is_dir() && is_within(dest, source) {
        return Err(IoFailure::with_message(
            dest,
            io::ErrorKind::InvalidInput,
            "Cannot move a directory into itself",
        )
        .into());
    }

    // Fast path for same filesystem
    match fs::rename(source, dest) {
        Ok(()) => return Ok(MoveMethod::Renamed),
        Err(e) => {
            tracing::debug!(
                source = %source.display(),
                dest = %dest.display(),
                error = %e,
                "rename failed, falling back to copy and delete"
            );
        }
    }

    recursive_copy(source, dest)?;
    recursive_delete(source)?;
    Ok(MoveMethod::CopiedAndDeleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_file() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        fs::write(&src, "data").unwrap();
        let dest = temp.path().join("b.txt");

        assert_eq!(move_or_fallback(&src, &dest).unwrap(), MoveMethod::Renamed);
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "data");
    }

    #[test]
    fn test_move_directory() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("dir");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("nested/f.txt"), "x").unwrap();

        let dest = temp.path().join("other/dir");
        fs::create_dir(temp.path().join("other")).unwrap();

        move_or_fallback(&src, &dest).unwrap();
        assert!(!src.exists());
        assert!(dest.join("nested/f.txt").exists());
    }

    #[test]
    fn test_move_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = move_or_fallback(&temp.path().join("gone"), &temp.path().join("x")).unwrap_err();
        assert!(matches!(err, FsError::Io(ref f) if f.kind == io::ErrorKind::NotFound));
    }

    #[test]
    fn test_move_into_itself() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("dir");
        fs::create_dir(&src).unwrap();

        let err = move_or_fallback(&src, &src.join("dir")).unwrap_err();
        assert!(matches!(err, FsError::Io(ref f) if f.kind == io::ErrorKind::InvalidInput));
        assert!(src.is_dir());
    }

    #[test]
    fn test_failed_fallback_keeps_source() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        fs::write(&src, "data").unwrap();

        // Parent of the destination does not exist: rename and copy both fail.
        let dest = temp.path().join("missing/b.txt");
        assert!(move_or_fallback(&src, &dest).is_err());
        assert!(src.exists());
    }
}
