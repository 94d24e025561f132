//! Recursive delete.

use std::fs;
use std::path::Path;

use deskmirror_core::{FsError, IoFailure};

use crate::tree::walk_tree;

/// Counts of what a delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteStats {
    /// Files (and symlinks) removed.
    pub files: usize,
    /// Directories removed.
    pub directories: usize,
}

/// Delete a file, or a directory tree bottom-up.
///
/// Children are removed before their parent, so the root directory is only
/// removed once it is empty. A failing entry does not stop the walk; all
/// failures are returned together as [`FsError::PartialTree`].
pub fn recursive_delete(path: &Path) -> Result<DeleteStats, FsError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| FsError::io(path, e))?;

    if !metadata.is_dir() {
        fs::remove_file(path).map_err(|e| FsError::io(path, e))?;
        return Ok(DeleteStats {
            files: 1,
            directories: 0,
        });
    }

    let (entries, mut failures) = walk_tree(path);
    let mut stats = DeleteStats::default();

    for entry in entries.into_iter().rev() {
        let result = if entry.is_dir {
            fs::remove_dir(&entry.path)
        } else {
            fs::remove_file(&entry.path)
        };

        match result {
            Ok(()) if entry.is_dir => stats.directories += 1,
            Ok(()) => stats.files += 1,
            Err(e) => failures.push(IoFailure::new(&entry.path, &e)),
        }
    }

    if !failures.is_empty() {
        tracing::warn!(
            path = %path.display(),
            failed = failures.len(),
            "delete finished with failures"
        );
    }
    FsError::from_failures(failures)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn test_delete_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        let stats = recursive_delete(&file).unwrap();
        assert_eq!(stats.files, 1);
        assert!(!file.exists());
    }

    #[test]
    fn test_delete_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::write(root.join("a/one.txt"), "1").unwrap();
        fs::write(root.join("a/b/c/.two"), "2").unwrap();

        let stats = recursive_delete(&root).unwrap();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.directories, 4);
        assert!(!root.exists());
        assert!(temp.path().exists());
    }

    #[test]
    fn test_delete_missing() {
        let temp = TempDir::new().unwrap();
        let err = recursive_delete(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, FsError::Io(ref f) if f.kind == io::ErrorKind::NotFound));
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_does_not_follow_symlinks() {
        let temp = TempDir::new().unwrap();
        let outside = temp.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("keep.txt"), "keep").unwrap();

        let root = temp.path().join("root");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        recursive_delete(&root).unwrap();
        assert!(!root.exists());
        assert!(outside.join("keep.txt").exists());
    }
}
