//! In-memory tile store.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use deskmirror_core::{Canvas, Position, Tile};

/// The authoritative set of desktop tiles, keyed by canonical path.
///
/// The store does not touch the filesystem; callers pass keys that are
/// already canonical. Iteration follows insertion order.
#[derive(Debug)]
pub struct TileStore {
    tiles: IndexMap<PathBuf, Tile>,
    canvas: Canvas,
    rng: StdRng,
}

impl TileStore {
    /// Create an empty store with spawn positions drawn from entropy.
    pub fn new(canvas: Canvas) -> Self {
        Self::with_rng(canvas, StdRng::from_entropy())
    }

    /// Create an empty store with reproducible spawn positions.
    pub fn with_seed(canvas: Canvas, seed: u64) -> Self {
        Self::with_rng(canvas, StdRng::seed_from_u64(seed))
    }

    fn with_rng(canvas: Canvas, rng: StdRng) -> Self {
        Self {
            tiles: IndexMap::new(),
            canvas,
            rng,
        }
    }

    /// The canvas positions are clamped to.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Change the canvas and pull every tile back inside it.
    ///
    /// Returns true if any tile moved.
    pub fn set_canvas(&mut self, canvas: Canvas) -> bool {
        self.canvas = canvas;
        let mut moved = false;
        for tile in self.tiles.values_mut() {
            let clamped = canvas.clamp(tile.position);
            if clamped != tile.position {
                tile.position = clamped;
                moved = true;
            }
        }
        moved
    }

    /// Add a tile for `path` unless one already exists.
    ///
    /// Without a position, one is picked at random in the spawn region.
    /// Returns true if a tile was added.
    pub fn add_tile(
        &mut self,
        path: impl Into<PathBuf>,
        origin_dir: Option<PathBuf>,
        position: Option<Position>,
    ) -> bool {
        let path = path.into();
        if self.tiles.contains_key(&path) {
            return false;
        }

        let position = match position {
            Some(p) => self.canvas.clamp(p),
            None => {
                let rx = self.rng.gen_range(0.0..1.0);
                let ry = self.rng.gen_range(0.0..1.0);
                self.canvas.spawn_position(rx, ry)
            }
        };

        self.tiles
            .insert(path.clone(), Tile::new(path, origin_dir, position));
        true
    }

    /// Remove the tile for `path`, returning it if it existed.
    pub fn remove_tile(&mut self, path: &Path) -> Option<Tile> {
        self.tiles.shift_remove(path)
    }

    /// Move a tile. Returns the clamped position, or None if there is no tile.
    pub fn relocate(&mut self, path: &Path, position: Position) -> Option<Position> {
        let clamped = self.canvas.clamp(position);
        let tile = self.tiles.get_mut(path)?;
        tile.position = clamped;
        Some(clamped)
    }

    /// Look up the tile for `path`.
    pub fn find(&self, path: &Path) -> Option<&Tile> {
        self.tiles.get(path)
    }

    /// Check whether a tile exists for `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.tiles.contains_key(path)
    }

    /// Iterate over all tiles.
    pub fn all(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Remove every tile.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}
