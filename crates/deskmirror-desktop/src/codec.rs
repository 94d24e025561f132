//! Flat-file persistence of the tile set.
//!
//! Each line is one record, `path|originPath|x|y`. A `|` inside a path is
//! written as `%7C` and restored on read. An empty origin field means the
//! tile has no origin directory. The whole file is rewritten on every save.
//!
//! Paths that are not valid UTF-8 or that contain a line break cannot be
//! written as a record. Their tiles are left out of the file with a warning.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use deskmirror_core::{Position, Tile};
use deskmirror_ops::path_exists;

use crate::error::StateWarning;
use crate::locate::DesktopLocator;

const FIELD_DELIMITER: char = '|';
const ESCAPED_DELIMITER: &str = "%7C";
const FIELD_COUNT: usize = 4;

/// One persisted tile.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRecord {
    pub path: PathBuf,
    pub origin_dir: Option<PathBuf>,
    pub position: Position,
}

impl PersistedRecord {
    /// Build the record for a tile.
    pub fn from_tile(tile: &Tile) -> Self {
        Self {
            path: tile.path.clone(),
            origin_dir: tile.origin_dir.clone(),
            position: tile.position,
        }
    }

    /// Encode as a single line (without the trailing newline).
    pub fn encode(&self) -> String {
        let origin = self
            .origin_dir
            .as_deref()
            .map(escape_path)
            .unwrap_or_default();
        format!(
            "{}{d}{}{d}{}{d}{}",
            escape_path(&self.path),
            origin,
            self.position.x,
            self.position.y,
            d = FIELD_DELIMITER
        )
    }

    /// Decode a single line.
    pub fn decode(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(format!(
                "expected {FIELD_COUNT} fields, found {}",
                fields.len()
            ));
        }
        if fields[0].is_empty() {
            return Err("empty path".to_string());
        }

        let x = parse_coordinate(fields[2])?;
        let y = parse_coordinate(fields[3])?;
        let origin_dir = (!fields[1].is_empty()).then(|| unescape_path(fields[1]));

        Ok(Self {
            path: unescape_path(fields[0]),
            origin_dir,
            position: Position::new(x, y),
        })
    }
}

/// Whether `path` survives an encode/decode cycle unchanged.
fn is_storable(path: &Path) -> bool {
    path.to_str().is_some_and(|s| !s.contains(['\n', '\r']))
}

fn escape_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace(FIELD_DELIMITER, ESCAPED_DELIMITER)
}

fn unescape_path(field: &str) -> PathBuf {
    PathBuf::from(field.replace(ESCAPED_DELIMITER, &FIELD_DELIMITER.to_string()))
}

fn parse_coordinate(field: &str) -> Result<f64, String> {
    match field.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("coordinate is not finite: {field}")),
        Err(e) => Err(format!("bad coordinate '{field}': {e}")),
    }
}

/// Reads and writes the state file.
#[derive(Debug, Clone)]
pub struct PersistenceCodec {
    state_file: PathBuf,
}

impl PersistenceCodec {
    /// Create a codec for the given state file.
    pub fn new(state_file: impl Into<PathBuf>) -> Self {
        Self {
            state_file: state_file.into(),
        }
    }

    /// Location of the state file.
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Serialize tiles, one record per line.
    ///
    /// Tiles whose path or origin cannot be stored are skipped.
    pub fn encode<'a>(tiles: impl IntoIterator<Item = &'a Tile>) -> String {
        let mut out = String::new();
        for tile in tiles {
            let storable =
                is_storable(&tile.path) && tile.origin_dir.as_deref().is_none_or(is_storable);
            if !storable {
                tracing::warn!(
                    path = %tile.path.display(),
                    "path cannot be stored in the state file; tile will not survive a reload"
                );
                continue;
            }
            out.push_str(&PersistedRecord::from_tile(tile).encode());
            out.push('\n');
        }
        out
    }

    /// Parse state file contents, skipping malformed lines.
    pub fn decode(text: &str) -> (Vec<PersistedRecord>, Vec<StateWarning>) {
        let (numbered, warnings) = decode_numbered(text);
        (numbered.into_iter().map(|(_, r)| r).collect(), warnings)
    }

    /// Overwrite the state file with the given tiles.
    ///
    /// The contents are written to a sibling temporary file first and then
    /// renamed over the state file, so readers never see a half-written file.
    pub fn save<'a>(&self, tiles: impl IntoIterator<Item = &'a Tile>) -> io::Result<()> {
        let contents = Self::encode(tiles);

        if let Some(parent) = self.state_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp_name = OsString::from(self.state_file.as_os_str());
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.state_file)
    }

    /// Read all well-formed records. A missing state file yields no records.
    pub fn read(&self) -> io::Result<(Vec<PersistedRecord>, Vec<StateWarning>)> {
        let (numbered, warnings) = self.read_numbered()?;
        Ok((numbered.into_iter().map(|(_, r)| r).collect(), warnings))
    }

    fn read_numbered(&self) -> io::Result<(Vec<(usize, PersistedRecord)>, Vec<StateWarning>)> {
        match fs::read_to_string(&self.state_file) {
            Ok(text) => Ok(decode_numbered(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok((Vec::new(), Vec::new())),
            Err(e) => Err(e),
        }
    }

    /// Read records and keep only those still on the desktop.
    ///
    /// A record whose file is gone, or whose parent is no longer the desktop
    /// directory, is reported as a stale entry. An unreadable state file is
    /// logged and treated as empty.
    pub fn load(&self, locator: &DesktopLocator) -> (Vec<PersistedRecord>, Vec<StateWarning>) {
        let (numbered, mut warnings) = match self.read_numbered() {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    state_file = %self.state_file.display(),
                    error = %e,
                    "could not read desktop state"
                );
                return (Vec::new(), Vec::new());
            }
        };

        let mut valid = Vec::with_capacity(numbered.len());
        for (line, record) in numbered {
            if !path_exists(&record.path) {
                warnings.push(StateWarning::stale(line, &record.path, "file no longer exists"));
            } else if !locator.in_desktop(&record.path) {
                warnings.push(StateWarning::stale(
                    line,
                    &record.path,
                    "file is no longer on the desktop",
                ));
            } else {
                valid.push(record);
            }
        }

        warnings.sort_by_key(|w| w.line);
        (valid, warnings)
    }
}

fn decode_numbered(text: &str) -> (Vec<(usize, PersistedRecord)>, Vec<StateWarning>) {
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match PersistedRecord::decode(line) {
            Ok(record) => records.push((index + 1, record)),
            Err(message) => warnings.push(StateWarning::malformed(index + 1, message)),
        }
    }

    (records, warnings)
}
