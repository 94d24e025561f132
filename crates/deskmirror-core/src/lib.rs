//! Core types for deskmirror.
//!
//! This crate provides the fundamental data structures shared by the rest of
//! the workspace: desktop tiles, canvas geometry, configuration, known-folder
//! resolution and the filesystem error taxonomy.

mod config;
mod error;
mod folders;
mod geometry;
mod tile;

pub use config::{DEFAULT_STATE_FILE_NAME, DesktopConfig, DesktopConfigBuilder};
pub use error::{FsError, IoFailure};
pub use folders::KnownFolder;
pub use geometry::{Canvas, Position, Rect, TILE_SIZE, TRASH_MARGIN};
pub use tile::{PALETTE, Tile, color_index};
