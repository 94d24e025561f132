//! Desktop directory resolution and the `in_desktop` predicate.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use deskmirror_core::{DesktopConfig, KnownFolder};

use crate::error::DesktopError;

/// Resolve a path to the key used for tiles.
///
/// Existing paths are fully canonicalized. For a path that no longer (or not
/// yet) exists, the parent is canonicalized and the file name appended, so a
/// deleted file still maps onto the key its tile was stored under.
pub fn canonical_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        if let Ok(parent) = fs::canonicalize(parent) {
            return parent.join(name);
        }
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Locates the desktop directory and answers whether a path lives in it.
///
/// The directory is resolved on first use and cached for the lifetime of the
/// locator.
#[derive(Debug)]
pub struct DesktopLocator {
    home: PathBuf,
    explicit: Option<PathBuf>,
    resolved: OnceLock<Option<PathBuf>>,
}

impl DesktopLocator {
    /// Create a locator probing the known desktop candidates under `home`,
    /// or using `explicit` when given.
    pub fn new(home: impl Into<PathBuf>, explicit: Option<PathBuf>) -> Self {
        Self {
            home: home.into(),
            explicit,
            resolved: OnceLock::new(),
        }
    }

    /// Create a locator from a desktop config.
    pub fn from_config(config: &DesktopConfig) -> Self {
        Self::new(config.home.clone(), config.desktop_dir.clone())
    }

    /// The home directory known folders are resolved against.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The canonical desktop directory, if one exists.
    pub fn desktop_dir(&self) -> Option<&Path> {
        self.resolved
            .get_or_init(|| {
                let found = match &self.explicit {
                    Some(dir) => dir.is_dir().then(|| dir.clone()),
                    None => KnownFolder::Desktop.resolve(&self.home),
                };
                match &found {
                    Some(dir) => tracing::debug!(desktop = %dir.display(), "resolved desktop directory"),
                    None => tracing::warn!(home = %self.home.display(), "no desktop directory found"),
                }
                found.map(|dir| canonical_path(&dir))
            })
            .as_deref()
    }

    /// The desktop directory, or [`DesktopError::DesktopNotFound`].
    pub fn require_desktop_dir(&self) -> Result<&Path, DesktopError> {
        self.desktop_dir().ok_or(DesktopError::DesktopNotFound)
    }

    /// Check whether `path`'s parent directory is the desktop directory.
    pub fn in_desktop(&self, path: &Path) -> bool {
        let Some(desktop) = self.desktop_dir() else {
            return false;
        };
        canonical_path(path)
            .parent()
            .is_some_and(|parent| same_path(parent, desktop))
    }

    /// Resolve any known folder under the home directory.
    pub fn known_folder(&self, folder: KnownFolder) -> Option<PathBuf> {
        match folder {
            KnownFolder::Desktop => self.desktop_dir().map(Path::to_path_buf),
            other => other.resolve(&self.home),
        }
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    if cfg!(windows) {
        a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
    } else {
        a == b
    }
}
