//! The desktop context: store, clipboard, persistence and file operations.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use deskmirror_core::{Canvas, DesktopConfig, FsError, IoFailure, KnownFolder, Position, Tile};
use deskmirror_ops::{FileOperation, OperationExecutor, unique_name, validate_filename};

use crate::clipboard::{ClipboardController, ClipboardMode, ClipboardState};
use crate::codec::PersistenceCodec;
use crate::error::{DesktopError, StateWarning, WarningKind};
use crate::locate::{DesktopLocator, canonical_path};
use crate::store::TileStore;
use crate::sync::{FsChange, SyncCoordinator};

/// Result of loading the state file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Tiles added to the store.
    pub loaded: usize,
    /// Records that were skipped.
    pub warnings: Vec<StateWarning>,
}

/// A completed paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasteOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: ClipboardMode,
}

/// What happened to the file behind a tile dropped on the trash.
#[derive(Debug, Clone)]
pub enum TrashOutcome {
    /// The file went back to its origin directory.
    Restored { from: PathBuf, to: PathBuf },
    /// The file stayed where it was, without a tile.
    ///
    /// `error` is set when a return to the origin was attempted and failed.
    Orphaned {
        path: PathBuf,
        error: Option<FsError>,
    },
}

/// Result of ending a drag gesture.
#[derive(Debug, Clone)]
pub enum DragOutcome {
    /// The tile was placed at the (clamped) position.
    Placed(Position),
    /// The tile was released over the trash target.
    Trashed(TrashOutcome),
}

/// Kind of entry created by [`Desktop::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One desktop: the tile store and everything that keeps it in line with the
/// filesystem.
///
/// Every store mutation is followed by a save of the state file. The context
/// is not shared; [`DesktopService`](crate::DesktopService) owns it and runs
/// requests one at a time.
#[derive(Debug)]
pub struct Desktop {
    locator: DesktopLocator,
    store: TileStore,
    clipboard: ClipboardController,
    codec: PersistenceCodec,
    executor: OperationExecutor,
}

impl Desktop {
    /// Create a desktop from its configuration. Nothing is read from disk
    /// until [`Desktop::load_desktop_state`] is called.
    pub fn new(config: &DesktopConfig) -> Self {
        let store = match config.seed {
            Some(seed) => TileStore::with_seed(config.canvas, seed),
            None => TileStore::new(config.canvas),
        };
        Self {
            locator: DesktopLocator::from_config(config),
            store,
            clipboard: ClipboardController::new(),
            codec: PersistenceCodec::new(config.state_file_path()),
            executor: OperationExecutor::new(),
        }
    }

    /// The desktop directory, if one was found.
    pub fn desktop_dir(&self) -> Option<&Path> {
        self.locator.desktop_dir()
    }

    /// Resolve a known folder.
    pub fn known_folder(&self, folder: KnownFolder) -> Option<PathBuf> {
        self.locator.known_folder(folder)
    }

    /// The current tiles, in insertion order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.store.all()
    }

    /// Look up a tile by path.
    pub fn find(&self, path: &Path) -> Option<&Tile> {
        self.store.find(&canonical_path(path))
    }

    /// Current clipboard contents.
    pub fn clipboard_state(&self) -> &ClipboardState {
        self.clipboard.state()
    }

    /// The canvas tiles are clamped to.
    pub fn canvas(&self) -> Canvas {
        self.store.canvas()
    }

    /// Resize the canvas, pulling tiles back inside it.
    pub fn set_canvas(&mut self, canvas: Canvas) {
        if self.store.set_canvas(canvas) {
            self.save_desktop_state();
        }
    }

    /// Merge the state file into the store.
    ///
    /// Malformed and stale records are skipped and reported, never returned
    /// as errors.
    pub fn load_desktop_state(&mut self) -> LoadReport {
        let (records, warnings) = self.codec.load(&self.locator);

        let mut loaded = 0;
        for record in records {
            let key = canonical_path(&record.path);
            if self.store.add_tile(key, record.origin_dir, Some(record.position)) {
                loaded += 1;
            }
        }

        for warning in &warnings {
            match warning.kind {
                WarningKind::MalformedRecord => {
                    tracing::warn!(%warning, "skipped malformed state record")
                }
                WarningKind::StaleEntry => tracing::debug!(%warning, "skipped stale state record"),
            }
        }
        tracing::debug!(loaded, skipped = warnings.len(), "desktop state loaded");

        LoadReport { loaded, warnings }
    }

    /// Write the state file. Failures are logged and otherwise ignored.
    pub fn save_desktop_state(&self) {
        if let Err(e) = self.codec.save(self.store.all()) {
            tracing::warn!(
                state_file = %self.codec.state_file().display(),
                error = %e,
                "could not save desktop state"
            );
        }
    }

    /// `path` was created outside the desktop's own operations.
    pub fn notify_created(&mut self, path: &Path) -> bool {
        self.apply(FsChange::Created {
            path: path.to_path_buf(),
            source: None,
        })
    }

    /// `path` was deleted outside the desktop's own operations.
    pub fn notify_deleted(&mut self, path: &Path) -> bool {
        self.apply(FsChange::Deleted {
            path: path.to_path_buf(),
        })
    }

    /// `from` was moved to `to` outside the desktop's own operations.
    pub fn notify_moved(&mut self, from: &Path, to: &Path) -> bool {
        self.apply(FsChange::Moved {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        })
    }

    /// Hold `path` for copying.
    pub fn clipboard_copy(&mut self, path: &Path) {
        self.clipboard.copy(path);
    }

    /// Hold `path` for moving.
    pub fn clipboard_cut(&mut self, path: &Path) {
        self.clipboard.cut(path);
    }

    /// Paste the clipboard into `target_dir`.
    ///
    /// On failure the clipboard keeps its contents, and tiles are reconciled
    /// against whatever the failed operation left on disk. A partial copy
    /// that landed on the desktop still records the source's directory as
    /// its origin.
    pub async fn clipboard_paste(&mut self, target_dir: &Path) -> Result<PasteOutcome, DesktopError> {
        let plan = self.clipboard.plan_paste(target_dir)?;

        match self.executor.execute(plan.operation()).await {
            Ok(_) => {
                let change = match plan.mode {
                    ClipboardMode::Copy => FsChange::Created {
                        path: plan.destination.clone(),
                        source: Some(plan.source.clone()),
                    },
                    ClipboardMode::Cut => FsChange::Moved {
                        from: plan.source.clone(),
                        to: plan.destination.clone(),
                    },
                };
                self.apply(change);
                self.clipboard.complete_paste(&plan);

                tracing::info!(
                    mode = %plan.mode,
                    source = %plan.source.display(),
                    destination = %plan.destination.display(),
                    "pasted"
                );
                Ok(PasteOutcome {
                    source: plan.source,
                    destination: plan.destination,
                    mode: plan.mode,
                })
            }
            Err(e) => {
                self.reconcile(Some(&plan.source), Some(&plan.destination));
                Err(e.into())
            }
        }
    }

    /// Move a tile. Returns the clamped position.
    pub fn relocate_tile(&mut self, path: &Path, x: f64, y: f64) -> Result<Position, DesktopError> {
        let position = self
            .store
            .relocate(&canonical_path(path), Position::new(x, y))
            .ok_or_else(|| DesktopError::UnknownTile {
                path: path.to_path_buf(),
            })?;
        self.save_desktop_state();
        Ok(position)
    }

    /// End a drag: place the tile, or trash it if it was released over the
    /// trash target.
    pub async fn end_drag(&mut self, path: &Path, x: f64, y: f64) -> Result<DragOutcome, DesktopError> {
        let position = self.relocate_tile(path, x, y)?;
        if self.store.canvas().over_trash(position) {
            let outcome = self.drag_tile_to_trash(path).await?;
            Ok(DragOutcome::Trashed(outcome))
        } else {
            Ok(DragOutcome::Placed(position))
        }
    }

    /// Drop a tile on the trash.
    ///
    /// The tile is removed whatever happens next. Its file goes back to the
    /// origin directory under a collision-free name; if there is no origin,
    /// or the move fails, the file stays where it is.
    pub async fn drag_tile_to_trash(&mut self, path: &Path) -> Result<TrashOutcome, DesktopError> {
        let plan = SyncCoordinator::begin_trash_drop(path, &self.locator, &mut self.store)?;
        self.save_desktop_state();

        let Some(restore_to) = plan.restore_to else {
            tracing::info!(file = %plan.file.display(), "no origin to return to, left in place");
            return Ok(TrashOutcome::Orphaned {
                path: plan.file,
                error: None,
            });
        };

        match self.executor.move_to(&plan.file, &restore_to).await {
            Ok(method) => {
                tracing::info!(
                    from = %plan.file.display(),
                    to = %restore_to.display(),
                    ?method,
                    "returned to origin"
                );
                Ok(TrashOutcome::Restored {
                    from: plan.file,
                    to: restore_to,
                })
            }
            Err(e) => {
                tracing::warn!(file = %plan.file.display(), error = %e, "could not return to origin");
                Ok(TrashOutcome::Orphaned {
                    path: plan.file,
                    error: Some(e),
                })
            }
        }
    }

    /// Move `path` onto the desktop. Returns where it landed.
    pub async fn move_to_desktop(&mut self, path: &Path) -> Result<PathBuf, DesktopError> {
        if self.locator.in_desktop(path) {
            self.notify_created(path);
            return Ok(canonical_path(path));
        }

        let desktop = self.locator.require_desktop_dir()?.to_path_buf();
        let name = path.file_name().ok_or_else(|| {
            FsError::from(IoFailure::with_message(
                path,
                io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;
        let destination = unique_name(&desktop.join(name));

        match self.executor.move_to(path, &destination).await {
            Ok(_) => {
                self.apply(FsChange::Moved {
                    from: path.to_path_buf(),
                    to: destination.clone(),
                });
                Ok(destination)
            }
            Err(e) => {
                self.reconcile(Some(path), Some(&destination));
                Err(e.into())
            }
        }
    }

    /// Delete a file or directory tree and drop its tile.
    ///
    /// After a partial failure the tile is only dropped if the path is gone.
    pub async fn delete_path(&mut self, path: &Path) -> Result<(), DesktopError> {
        match self.executor.delete(path).await {
            Ok(stats) => {
                tracing::info!(
                    path = %path.display(),
                    files = stats.files,
                    directories = stats.directories,
                    "deleted"
                );
                self.apply(FsChange::Deleted {
                    path: path.to_path_buf(),
                });
                Ok(())
            }
            Err(e) => {
                self.reconcile(Some(path), None);
                Err(e.into())
            }
        }
    }

    /// Create a new empty file or directory named `name` in `dir`.
    pub async fn create(
        &mut self,
        dir: &Path,
        name: &str,
        kind: EntryKind,
    ) -> Result<PathBuf, DesktopError> {
        let path = dir.join(name);
        validate_filename(name).map_err(|message| {
            FsError::from(IoFailure::with_message(
                &path,
                io::ErrorKind::InvalidInput,
                message,
            ))
        })?;
        if !dir.is_dir() {
            return Err(DesktopError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let operation = match kind {
            EntryKind::File => FileOperation::create_file(&path),
            EntryKind::Directory => FileOperation::create_directory(&path),
        };
        self.executor.execute(operation).await?;

        self.apply(FsChange::Created {
            path: path.clone(),
            source: None,
        });
        Ok(path)
    }

    /// Create a new empty file named `name` in `dir`.
    pub async fn create_file(&mut self, dir: &Path, name: &str) -> Result<PathBuf, DesktopError> {
        self.create(dir, name, EntryKind::File).await
    }

    fn apply(&mut self, change: FsChange) -> bool {
        let changed = SyncCoordinator::apply(&change, &self.locator, &mut self.store);
        if changed {
            self.save_desktop_state();
        }
        changed
    }

    fn reconcile(&mut self, source: Option<&Path>, destination: Option<&Path>) {
        if SyncCoordinator::reconcile(source, destination, &self.locator, &mut self.store) {
            self.save_desktop_state();
        }
    }
}
