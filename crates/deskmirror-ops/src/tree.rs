//! Tree traversal shared by the recursive operations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use deskmirror_core::IoFailure;

/// One entry of a walked tree.
#[derive(Debug, Clone)]
pub(crate) struct TreeEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Walk `root` depth-first, parents before their children.
///
/// The root itself is the first entry. Symlinks are reported as entries but
/// never followed. Entries that cannot be read are returned as failures
/// rather than aborting the walk.
pub(crate) fn walk_tree(root: &Path) -> (Vec<TreeEntry>, Vec<IoFailure>) {
    let walker = WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false)
        .min_depth(0);

    let mut entries = Vec::new();
    let mut failures = Vec::new();

    for entry_result in walker {
        match entry_result {
            Ok(entry) => entries.push(TreeEntry {
                path: entry.path(),
                is_dir: entry.file_type().is_dir(),
                is_symlink: entry.file_type().is_symlink(),
            }),
            Err(err) => {
                let path = err.path().map(|p| p.to_path_buf()).unwrap_or_else(|| root.to_path_buf());
                let kind = err.io_error().map(|e| e.kind()).unwrap_or(io::ErrorKind::Other);
                failures.push(IoFailure::with_message(path, kind, err.to_string()));
            }
        }
    }

    (entries, failures)
}

/// Check whether `dest` lies at or below `source`.
///
/// Both sides are canonicalized where possible; `dest` usually does not exist
/// yet, so its parent is canonicalized instead.
pub(crate) fn is_within(dest: &Path, source: &Path) -> bool {
    let source = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
    let dest = match (dest.parent(), dest.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent)
            .map(|p| p.join(name))
            .unwrap_or_else(|_| dest.to_path_buf()),
        _ => dest.to_path_buf(),
    };
    dest.starts_with(&source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_walk_parents_first() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/.hidden"), "x").unwrap();

        let (entries, failures) = walk_tree(&root);
        assert!(failures.is_empty());

        let paths: Vec<_> = entries.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                root.clone(),
                root.join("a"),
                root.join("a/b"),
                root.join("a/b/.hidden")
            ]
        );
        assert!(entries[0].is_dir);
        assert!(!entries[3].is_dir);
    }

    #[test]
    fn test_is_within() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        fs::create_dir(&source).unwrap();

        assert!(is_within(&source.join("nested"), &source));
        assert!(is_within(&source, &source));
        assert!(!is_within(&temp.path().join("src2"), &source));
    }
}
