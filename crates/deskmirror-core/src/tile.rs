//! Desktop tile representation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// Tile fill colors (salmon, amber, blue, teal, peach).
pub const PALETTE: [&str; 5] = ["#FF8C78", "#FFCC66", "#6699FF", "#60C8C8", "#FFB266"];

/// A file or directory currently shown on the desktop.
///
/// Tiles are keyed by their canonical `path`. A tile is never renamed in
/// place: when its file moves, the old tile is removed and a new one added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Canonical absolute path of the file.
    pub path: PathBuf,
    /// Directory the file lived in before it reached the desktop.
    pub origin_dir: Option<PathBuf>,
    /// Top-left offset within the canvas.
    pub position: Position,
}

impl Tile {
    /// Create a new tile.
    pub fn new(path: impl Into<PathBuf>, origin_dir: Option<PathBuf>, position: Position) -> Self {
        Self {
            path: path.into(),
            origin_dir,
            position,
        }
    }

    /// Display name of the tile (the file name).
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    /// Palette index derived from the path.
    pub fn color_index(&self) -> usize {
        color_index(&self.path)
    }

    /// Fill color of the tile.
    pub fn fill_color(&self) -> &'static str {
        PALETTE[self.color_index()]
    }

    /// Border color of the tile, two palette steps from the fill.
    pub fn border_color(&self) -> &'static str {
        PALETTE[(self.color_index() + 2) % PALETTE.len()]
    }
}

/// Map a path onto the palette.
///
/// Stable across processes and platforms, so a tile keeps its color between
/// runs without the index ever being persisted.
pub fn color_index(path: &Path) -> usize {
    let hash = blake3::hash(path.as_os_str().as_encoded_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[..8]);
    (u64::from_le_bytes(prefix) % PALETTE.len() as u64) as usize
}
