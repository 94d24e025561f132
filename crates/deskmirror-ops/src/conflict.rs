//! Collision-free destination naming.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Check whether anything (including a dangling symlink) occupies `path`.
pub fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Generate a destination path that does not currently exist.
///
/// Returns `desired` unchanged when it is free. Otherwise, for "file.txt",
/// tries "file - Copy.txt", "file - Copy (2).txt", "file - Copy (3).txt", ...
/// and returns the first free candidate.
///
/// The result is only free at the moment it is checked. Callers must still
/// handle the subsequent write failing because something raced them to it.
pub fn unique_name(desired: &Path) -> PathBuf {
    if !path_exists(desired) {
        return desired.to_path_buf();
    }

    let Some(file_name) = desired.file_name() else {
        return desired.to_path_buf();
    };
    let parent = desired.parent().unwrap_or(Path::new(""));
    let stem = desired.file_stem().unwrap_or(file_name);
    let extension = desired.extension();

    let mut n: u64 = 1;
    loop {
        let mut name = OsString::from(stem);
        name.push(" - Copy");
        if n > 1 {
            name.push(format!(" ({n})"));
        }
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }

        let candidate = parent.join(name);
        if !path_exists(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
