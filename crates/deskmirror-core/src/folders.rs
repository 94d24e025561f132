//! Well-known user folders.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A well-known folder under the user's home directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum KnownFolder {
    Desktop,
    Documents,
    Downloads,
    Pictures,
    Music,
    Videos,
}

impl KnownFolder {
    /// Candidate locations, most preferred first.
    pub fn candidates(&self, home: &Path) -> Vec<PathBuf> {
        let name = self.to_string();
        let mut candidates = vec![home.join(&name)];
        if cfg!(windows) {
            candidates.push(home.join("OneDrive").join(&name));
            if *self == Self::Documents {
                candidates.push(home.join("Documents").join("My Documents"));
            }
        }
        candidates
    }

    /// The first candidate that exists and is a directory.
    pub fn resolve(&self, home: &Path) -> Option<PathBuf> {
        self.candidates(home).into_iter().find(|c| c.is_dir())
    }
}
