//! File and directory creation.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use deskmirror_core::{FsError, IoFailure};

/// Create a new empty file. Fails if anything already exists at `path`.
pub fn create_file(path: &Path) -> Result<(), FsError> {
    validate_path_name(path)?;

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| FsError::io(path, e))
}

/// Create a new directory. Fails if anything already exists at `path`.
pub fn create_directory(path: &Path) -> Result<(), FsError> {
    validate_path_name(path)?;
    fs::create_dir(path).map_err(|e| FsError::io(path, e))
}

fn validate_path_name(path: &Path) -> Result<(), FsError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    validate_filename(&name)
        .map_err(|message| IoFailure::with_message(path, io::ErrorKind::InvalidInput, message).into())
}

/// Validate a filename for cross-platform compatibility.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.len() > 255 {
        return Err("Name is too long (max 255 characters)".into());
    }

    for c in ['/', '\0'] {
        if name.contains(c) {
            return Err(format!("Name cannot contain '{}'", c));
        }
    }

    #[cfg(target_os = "windows")]
    {
        for c in ['\\', ':', '*', '?', '"', '<', '>', '|'] {
            if name.contains(c) {
                return Err(format!("Name cannot contain '{}'", c));
            }
        }

        let reserved = [
            "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
            "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
        ];
        let upper_name = name.to_uppercase();
        let base_name = upper_name.split('.').next().unwrap_or("");
        if reserved.contains(&base_name) {
            return Err("Reserved filename".into());
        }
    }

    if name.starts_with(' ') || name.ends_with(' ') {
        return Err("Name cannot start or end with spaces".into());
    }

    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }

    if name.ends_with('.') {
        return Err("Name cannot end with a dot".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("notes.txt").is_ok());
        assert!(validate_filename(".hidden").is_ok());
        assert!(validate_filename("file with spaces").is_ok());

        assert!(validate_filename("").is_err());
        assert!(validate_filename("a/b").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename(" lead").is_err());
        assert!(validate_filename("trail.").is_err());
    }

    #[test]
    fn test_create_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("NewFile.txt");

        create_file(&path).unwrap();
        assert!(path.is_file());

        let err = create_file(&path).unwrap_err();
        assert!(matches!(err, FsError::Io(ref f) if f.kind == io::ErrorKind::AlreadyExists));
    }

    #[test]
    fn test_create_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Folder");

        create_directory(&path).unwrap();
        assert!(path.is_dir());
        assert!(create_directory(&path).is_err());
    }

    #[test]
    fn test_create_invalid_name() {
        let temp = TempDir::new().unwrap();
        let err = create_file(&temp.path().join("bad.")).unwrap_err();
        assert!(matches!(err, FsError::Io(ref f) if f.kind == io::ErrorKind::InvalidInput));
    }
}
