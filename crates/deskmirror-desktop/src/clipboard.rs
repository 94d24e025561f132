//! Cut/copy/paste clipboard.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::Display;

use deskmirror_core::IoFailure;
use deskmirror_ops::{FileOperation, unique_name};

use crate::error::DesktopError;

/// Whether a paste copies or moves the held item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ClipboardMode {
    Copy,
    Cut,
}

/// What the clipboard currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipboardState {
    #[default]
    Empty,
    Holding { path: PathBuf, mode: ClipboardMode },
}

/// A paste resolved against the current clipboard and the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastePlan {
    /// The held item.
    pub source: PathBuf,
    /// Collision-free destination under the target directory.
    pub destination: PathBuf,
    /// Copy or move.
    pub mode: ClipboardMode,
}

impl PastePlan {
    /// The file operation carrying out this paste.
    pub fn operation(&self) -> FileOperation {
        match self.mode {
            ClipboardMode::Copy => FileOperation::copy(&self.source, &self.destination),
            ClipboardMode::Cut => FileOperation::move_to(&self.source, &self.destination),
        }
    }
}

/// Clipboard state machine.
///
/// Copy and cut replace whatever is held. A copy stays held after pasting so
/// it can be pasted again; a cut is cleared by its successful paste.
#[derive(Debug, Default)]
pub struct ClipboardController {
    state: ClipboardState,
}

impl ClipboardController {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `path` for copying.
    pub fn copy(&mut self, path: impl Into<PathBuf>) {
        self.state = ClipboardState::Holding {
            path: path.into(),
            mode: ClipboardMode::Copy,
        };
    }

    /// Hold `path` for moving.
    pub fn cut(&mut self, path: impl Into<PathBuf>) {
        self.state = ClipboardState::Holding {
            path: path.into(),
            mode: ClipboardMode::Cut,
        };
    }

    /// Clear the clipboard.
    pub fn clear(&mut self) {
        self.state = ClipboardState::Empty;
    }

    /// The current state.
    pub fn state(&self) -> &ClipboardState {
        &self.state
    }

    /// Check if the clipboard is empty.
    pub fn is_empty(&self) -> bool {
        self.state == ClipboardState::Empty
    }

    /// Resolve a paste into `target_dir` without touching the filesystem
    /// beyond probing for a free name.
    pub fn plan_paste(&self, target_dir: &Path) -> Result<PastePlan, DesktopError> {
        let ClipboardState::Holding { path, mode } = &self.state else {
            return Err(DesktopError::ClipboardEmpty);
        };

        if !target_dir.is_dir() {
            return Err(DesktopError::NotADirectory {
                path: target_dir.to_path_buf(),
            });
        }

        let Some(name) = path.file_name() else {
            return Err(DesktopError::Fs(
                IoFailure::with_message(path, io::ErrorKind::InvalidInput, "Nothing to paste")
                    .into(),
            ));
        };

        Ok(PastePlan {
            source: path.clone(),
            destination: unique_name(&target_dir.join(name)),
            mode: *mode,
        })
    }

    /// Record that `plan` was carried out successfully.
    ///
    /// A completed cut empties the clipboard, unless something else was
    /// copied or cut in the meantime.
    pub fn complete_paste(&mut self, plan: &PastePlan) {
        if plan.mode != ClipboardMode::Cut {
            return;
        }
        if let ClipboardState::Holding { path, .. } = &self.state {
            if *path == plan.source {
                self.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_paste_empty() {
        let temp = TempDir::new().unwrap();
        let clipboard = ClipboardController::new();
        assert!(matches!(
            clipboard.plan_paste(temp.path()),
            Err(DesktopError::ClipboardEmpty)
        ));
    }

    #[test]
    fn test_copy_and_cut_replace() {
        let mut clipboard = ClipboardController::new();
        clipboard.copy("/a");
        clipboard.cut("/b");
        assert_eq!(
            clipboard.state(),
            &ClipboardState::Holding {
                path: PathBuf::from("/b"),
                mode: ClipboardMode::Cut
            }
        );
    }

    #[test]
    fn test_plan_resolves_unique_name() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        fs::write(&src, "x").unwrap();

        let mut clipboard = ClipboardController::new();
        clipboard.copy(&src);

        let plan = clipboard.plan_paste(temp.path()).unwrap();
        assert_eq!(plan.destination, temp.path().join("a - Copy.txt"));
        assert_eq!(plan.mode, ClipboardMode::Copy);
        assert!(matches!(plan.operation(), FileOperation::Copy { .. }));
    }

    #[test]
    fn test_plan_requires_directory() {
        let temp = TempDir::new().unwrap();
        let mut clipboard = ClipboardController::new();
        clipboard.copy(temp.path().join("a.txt"));
        assert!(matches!(
            clipboard.plan_paste(&temp.path().join("missing")),
            Err(DesktopError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_complete_paste() {
        let temp = TempDir::new().unwrap();
        let mut clipboard = ClipboardController::new();

        clipboard.copy(temp.path().join("a.txt"));
        let plan = clipboard.plan_paste(temp.path()).unwrap();
        clipboard.complete_paste(&plan);
        assert!(!clipboard.is_empty());

        clipboard.cut(temp.path().join("a.txt"));
        let plan = clipboard.plan_paste(temp.path()).unwrap();
        clipboard.complete_paste(&plan);
        assert!(clipboard.is_empty());
    }
}
