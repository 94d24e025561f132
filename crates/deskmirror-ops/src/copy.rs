//! Recursive copy.

use std::fs;
use std::io;
use std::path::Path;

use deskmirror_core::{FsError, IoFailure};

use crate::conflict::path_exists;
use crate::tree::{is_within, walk_tree};

/// Counts of what a copy produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Files copied.
    pub files: usize,
    /// Symlinks recreated.
    pub symlinks: usize,
    /// Directories created.
    pub directories: usize,
    /// Bytes copied.
    pub bytes: u64,
}

/// Copy a file or directory tree from `source` to `dest`.
///
/// A file is copied directly; its failure is returned as [`FsError::Io`].
/// A directory is walked and its relative structure recreated under `dest`,
/// overwriting existing files. Failing entries are collected and returned as
/// [`FsError::PartialTree`] once the whole tree has been attempted.
///
/// Symlinks are recreated with the same target, never followed.
pub fn recursive_copy(source: &Path, dest: &Path) -> Result<CopyStats, FsError> {
    let metadata = fs::symlink_metadata(source).map_err(|e| FsError::io(source, e))?;

    if metadata.file_type().is_symlink() {
        copy_symlink(source, dest).map_err(|e| FsError::io(source, e))?;
        return Ok(CopyStats {
            symlinks: 1,
            ..CopyStats::default()
        });
    }

    if !metadata.is_dir() {
        let bytes = fs::copy(source, dest).map_err(|e| FsError::io(source, e))?;
        return Ok(CopyStats {
            files: 1,
            bytes,
            ..CopyStats::default()
        });
    }

    if is_within(dest, source) {
        return Err(IoFailure::with_message(
            dest,
            io::ErrorKind::InvalidInput,
            "Cannot copy a directory into itself",
        )
        .into());
    }

    let (entries, mut failures) = walk_tree(source);
    let mut stats = CopyStats::default();

    for entry in entries {
        let Ok(relative) = entry.path.strip_prefix(source) else {
            continue;
        };
        let target = if relative.as_os_str().is_empty() {
            dest.to_path_buf()
        } else {
            dest.join(relative)
        };

        if entry.is_dir {
            match fs::create_dir_all(&target) {
                Ok(()) => stats.directories += 1,
                Err(e) => failures.push(IoFailure::new(&target, &e)),
            }
        } else if entry.is_symlink {
            match copy_symlink(&entry.path, &target) {
                Ok(()) => stats.symlinks += 1,
                Err(e) => failures.push(IoFailure::new(&entry.path, &e)),
            }
        } else {
            match fs::copy(&entry.path, &target) {
                Ok(bytes) => {
                    stats.files += 1;
                    stats.bytes += bytes;
                }
                Err(e) => failures.push(IoFailure::new(&entry.path, &e)),
            }
        }
    }

    if !failures.is_empty() {
        tracing::warn!(
            source = %source.display(),
            failed = failures.len(),
            "copy finished with failures"
        );
    }
    FsError::from_failures(failures)?;
    Ok(stats)
}

/// Recreate the symlink `link` at `target`, replacing whatever non-directory
/// entry is already there.
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    let points_to = fs::read_link(link)?;
    if path_exists(target) {
        fs::remove_file(target)?;
    }

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&points_to, target)
    }
    #[cfg(windows)]
    {
        if fs::metadata(link).map(|m| m.is_dir()).unwrap_or(false) {
            std::os::windows::fs::symlink_dir(&points_to, target)
        } else {
            std::os::windows::fs::symlink_file(&points_to, target)
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = points_to;
        Err(io::Error::new(io::ErrorKind::Unsupported, "symlinks are not supported"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_tree(root: &Path) {
        fs::create_dir_all(root.join("dir1/subdir")).unwrap();
        fs::create_dir(root.join("empty")).unwrap();
        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world").unwrap();
        fs::write(root.join("dir1/subdir/.file3"), "test").unwrap();
    }

    #[test]
    fn test_copy_file() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        fs::write(&src, "content").unwrap();

        let stats = recursive_copy(&src, &temp.path().join("b.txt")).unwrap();
        assert_eq!(stats.files, 1);
        assert_eq!(stats.bytes, 7);
        assert_eq!(fs::read_to_string(temp.path().join("b.txt")).unwrap(), "content");
        assert!(src.exists());
    }

    #[test]
    fn test_copy_tree() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        create_test_tree(&src);

        let dest = temp.path().join("dest");
        let stats = recursive_copy(&src, &dest).unwrap();

        assert_eq!(stats.files, 3);
        assert_eq!(stats.directories, 4);
        assert_eq!(fs::read_to_string(dest.join("file1.txt")).unwrap(), "hello");
        assert_eq!(fs::read_to_string(dest.join("dir1/subdir/.file3")).unwrap(), "test");
        assert!(dest.join("empty").is_dir());
    }

    #[test]
    fn test_copy_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        create_test_tree(&src);

        let dest = temp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("file1.txt"), "stale").unwrap();

        recursive_copy(&src, &dest).unwrap();
        assert_eq!(fs::read_to_string(dest.join("file1.txt")).unwrap(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_recreates_directory_symlinks() {
        let temp = TempDir::new().unwrap();
        let venv = temp.path().join("venv");
        fs::create_dir_all(venv.join("lib")).unwrap();
        fs::write(venv.join("lib/x.py"), "print()").unwrap();
        std::os::unix::fs::symlink("lib", venv.join("lib64")).unwrap();

        let out = temp.path().join("out");
        let stats = recursive_copy(&venv, &out).unwrap();

        assert_eq!(stats.files, 1);
        assert_eq!(stats.symlinks, 1);
        let link = out.join("lib64");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), Path::new("lib"));
        assert_eq!(fs::read_to_string(link.join("x.py")).unwrap(), "print()");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_symlink_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("link");
        std::os::unix::fs::symlink("missing-target", &src).unwrap();

        let dest = temp.path().join("dest");
        fs::write(&dest, "stale").unwrap();

        let stats = recursive_copy(&src, &dest).unwrap();
        assert_eq!(stats.symlinks, 1);
        assert_eq!(fs::read_link(&dest).unwrap(), Path::new("missing-target"));
    }

    #[test]
    fn test_copy_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = recursive_copy(&temp.path().join("nope"), &temp.path().join("dest")).unwrap_err();
        assert!(matches!(err, FsError::Io(ref f) if f.kind == io::ErrorKind::NotFound));
    }

    #[test]
    fn test_copy_into_itself() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        create_test_tree(&src);

        let err = recursive_copy(&src, &src.join("inner")).unwrap_err();
        assert!(matches!(err, FsError::Io(ref f) if f.kind == io::ErrorKind::InvalidInput));
        assert!(!src.join("inner").exists());
    }

    #[test]
    fn test_copy_collects_entry_failures() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        create_test_tree(&src);

        // A file where a directory must go makes the subtree fail.
        let dest = temp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("dir1"), "blocker").unwrap();

        let err = recursive_copy(&src, &dest).unwrap_err();
        assert!(err.is_partial());
        assert!(err.failures().len() >= 2);

        // The rest of the tree still made it.
        assert_eq!(fs::read_to_string(dest.join("file1.txt")).unwrap(), "hello");
        assert!(dest.join("empty").is_dir());
    }
}
