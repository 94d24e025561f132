//! Desktop configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::geometry::{Canvas, TILE_SIZE};

/// File name of the state file, relative to the home directory.
pub const DEFAULT_STATE_FILE_NAME: &str = ".deskmirror_tiles.txt";

/// Configuration for a desktop instance.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct DesktopConfig {
    /// Home directory used to locate known folders and the state file.
    pub home: PathBuf,

    /// Explicit desktop directory (skips candidate probing).
    #[builder(default)]
    #[serde(default)]
    pub desktop_dir: Option<PathBuf>,

    /// Explicit state file location.
    #[builder(default)]
    #[serde(default)]
    pub state_file: Option<PathBuf>,

    /// Canvas the tiles are laid out on.
    #[builder(default)]
    #[serde(default)]
    pub canvas: Canvas,

    /// Seed for spawn positions (None = from entropy).
    #[builder(default)]
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DesktopConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.home {
            Some(ref home) if home.as_os_str().is_empty() => {
                return Err("Home directory cannot be empty".to_string());
            }
            None => return Err("Home directory is required".to_string()),
            _ => {}
        }
        if let Some(canvas) = self.canvas {
            if canvas.width < TILE_SIZE || canvas.height < TILE_SIZE {
                return Err(format!(
                    "Canvas must be at least {TILE_SIZE}x{TILE_SIZE}, got {}x{}",
                    canvas.width, canvas.height
                ));
            }
        }
        Ok(())
    }
}

impl DesktopConfig {
    /// Create a new config builder.
    pub fn builder() -> DesktopConfigBuilder {
        DesktopConfigBuilder::default()
    }

    /// Create a default config rooted at `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            desktop_dir: None,
            state_file: None,
            canvas: Canvas::default(),
            seed: None,
        }
    }

    /// Create a default config for the current user's home directory.
    pub fn detect() -> Option<Self> {
        dirs::home_dir().map(Self::new)
    }

    /// Resolved location of the state file.
    pub fn state_file_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| self.home.join(DEFAULT_STATE_FILE_NAME))
    }
}
