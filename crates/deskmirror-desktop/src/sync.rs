//! Rules mapping filesystem changes onto the tile store.

use std::path::{Path, PathBuf};

use deskmirror_ops::{path_exists, unique_name};

use crate::error::DesktopError;
use crate::locate::{DesktopLocator, canonical_path};
use crate::store::TileStore;

/// A filesystem change the desktop should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsChange {
    /// `path` appeared, optionally as a copy or move of `source`.
    Created { path: PathBuf, source: Option<PathBuf> },
    /// `path` was removed.
    Deleted { path: PathBuf },
    /// `from` was moved to `to`.
    Moved { from: PathBuf, to: PathBuf },
}

/// What to do with a file whose tile was dropped on the trash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashPlan {
    /// The file behind the dropped tile.
    pub file: PathBuf,
    /// Collision-free path in the origin directory, when it still exists.
    pub restore_to: Option<PathBuf>,
}

/// Applies sync rules to a [`TileStore`].
///
/// A tile exists for a path exactly when that path's parent is the desktop
/// directory and the change says it exists. Paths are canonicalized before
/// they are used as keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncCoordinator;

impl SyncCoordinator {
    /// Apply one change. Returns true if the store changed.
    pub fn apply(change: &FsChange, locator: &DesktopLocator, store: &mut TileStore) -> bool {
        match change {
            FsChange::Created { path, source } => {
                let origin = source.as_deref().and_then(parent_dir);
                Self::add_if_on_desktop(path, origin, locator, store)
            }
            FsChange::Deleted { path } => Self::remove_if_on_desktop(path, locator, store),
            FsChange::Moved { from, to } => {
                let removed = Self::remove_if_on_desktop(from, locator, store);
                let added = Self::add_if_on_desktop(to, parent_dir(from), locator, store);
                removed || added
            }
        }
    }

    /// Bring the store in line with the disk after an operation failed
    /// part-way.
    ///
    /// A desktop source that no longer exists loses its tile, and a desktop
    /// destination that does exist gains one.
    pub fn reconcile(
        source: Option<&Path>,
        destination: Option<&Path>,
        locator: &DesktopLocator,
        store: &mut TileStore,
    ) -> bool {
        let mut changed = false;
        if let Some(source) = source {
            if !path_exists(source) {
                changed |= Self::remove_if_on_desktop(source, locator, store);
            }
        }
        if let Some(destination) = destination {
            if path_exists(destination) {
                let origin = source.and_then(parent_dir);
                changed |= Self::add_if_on_desktop(destination, origin, locator, store);
            }
        }
        changed
    }

    /// Remove a dropped tile and work out where its file goes back to.
    ///
    /// The tile is removed unconditionally. The file is only restored when
    /// its origin directory still exists and is not the desktop itself.
    ///
    /// An origin equal to the desktop directory counts as no origin: the file
    /// stays where it is rather than being duplicated next to itself.
    pub fn begin_trash_drop(
        tile_path: &Path,
        locator: &DesktopLocator,
        store: &mut TileStore,
    ) -> Result<TrashPlan, DesktopError> {
        let key = canonical_path(tile_path);
        let tile = store
            .remove_tile(&key)
            .ok_or_else(|| DesktopError::UnknownTile {
                path: tile_path.to_path_buf(),
            })?;

        let desktop = locator.desktop_dir();
        let restore_to = match (&tile.origin_dir, tile.path.file_name()) {
            (Some(origin), Some(name))
                if origin.is_dir() && Some(canonical_path(origin).as_path()) != desktop =>
            {
                Some(unique_name(&origin.join(name)))
            }
            _ => None,
        };

        tracing::debug!(
            file = %tile.path.display(),
            restore_to = ?restore_to,
            "tile dropped on trash"
        );

        Ok(TrashPlan {
            file: tile.path,
            restore_to,
        })
    }

    fn add_if_on_desktop(
        path: &Path,
        origin: Option<PathBuf>,
        locator: &DesktopLocator,
        store: &mut TileStore,
    ) -> bool {
        if !locator.in_desktop(path) {
            return false;
        }
        let key = canonical_path(path);
        let added = store.add_tile(&key, origin, None);
        if added {
            tracing::debug!(path = %key.display(), "tile added");
        }
        added
    }

    fn remove_if_on_desktop(path: &Path, locator: &DesktopLocator, store: &mut TileStore) -> bool {
        if !locator.in_desktop(path) {
            return false;
        }
        let key = canonical_path(path);
        let removed = store.remove_tile(&key).is_some();
        if removed {
            tracing::debug!(path = %key.display(), "tile removed");
        }
        removed
    }
}

fn parent_dir(path: &Path) -> Option<PathBuf> {
    canonical_path(path).parent().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskmirror_core::{Canvas, Position};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        desktop: PathBuf,
        docs: PathBuf,
        locator: DesktopLocator,
        store: TileStore,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();
        let desktop = root.join("Desktop");
        let docs = root.join("Documents");
        fs::create_dir(&desktop).unwrap();
        fs::create_dir(&docs).unwrap();
        Fixture {
            locator: DesktopLocator::new(&root, None),
            store: TileStore::with_seed(Canvas::default(), 7),
            _temp: temp,
            desktop,
            docs,
        }
    }

    #[test]
    fn test_created_on_desktop() {
        let mut f = fixture();
        let path = f.desktop.join("a.txt");
        fs::write(&path, "a").unwrap();

        let change = FsChange::Created {
            path: path.clone(),
            source: Some(f.docs.join("a.txt")),
        };
        assert!(SyncCoordinator::apply(&change, &f.locator, &mut f.store));
        assert_eq!(f.store.find(&path).unwrap().origin_dir, Some(f.docs.clone()));

        // Same change again is a no-op.
        assert!(!SyncCoordinator::apply(&change, &f.locator, &mut f.store));
    }

    #[test]
    fn test_created_elsewhere_is_ignored() {
        let mut f = fixture();
        let change = FsChange::Created {
            path: f.docs.join("a.txt"),
            source: None,
        };
        assert!(!SyncCoordinator::apply(&change, &f.locator, &mut f.store));
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_deleted() {
        let mut f = fixture();
        let path = f.desktop.join("a.txt");
        f.store.add_tile(&path, None, None);

        let change = FsChange::Deleted { path: path.clone() };
        assert!(SyncCoordinator::apply(&change, &f.locator, &mut f.store));
        assert!(!SyncCoordinator::apply(&change, &f.locator, &mut f.store));
    }

    #[test]
    fn test_moved_onto_and_off_desktop() {
        let mut f = fixture();
        let on_desktop = f.desktop.join("a.txt");
        fs::write(&on_desktop, "a").unwrap();

        let onto = FsChange::Moved {
            from: f.docs.join("a.txt"),
            to: on_desktop.clone(),
        };
        assert!(SyncCoordinator::apply(&onto, &f.locator, &mut f.store));
        assert_eq!(f.store.find(&on_desktop).unwrap().origin_dir, Some(f.docs.clone()));

        let off = FsChange::Moved {
            from: on_desktop.clone(),
            to: f.docs.join("a.txt"),
        };
        assert!(SyncCoordinator::apply(&off, &f.locator, &mut f.store));
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_reconcile() {
        let mut f = fixture();
        let gone = f.desktop.join("gone.txt");
        let landed = f.desktop.join("landed.txt");
        fs::write(&landed, "x").unwrap();
        f.store.add_tile(&gone, None, None);

        assert!(SyncCoordinator::reconcile(
            Some(&gone),
            Some(&landed),
            &f.locator,
            &mut f.store
        ));
        assert!(!f.store.contains(&gone));
        assert!(f.store.contains(&landed));
    }

    #[test]
    fn test_trash_drop_plans_restore() {
        let mut f = fixture();
        let path = f.desktop.join("foo.txt");
        fs::write(&path, "x").unwrap();
        fs::write(f.docs.join("foo.txt"), "other").unwrap();
        f.store
            .add_tile(&path, Some(f.docs.clone()), Some(Position::new(50.0, 60.0)));

        let plan = SyncCoordinator::begin_trash_drop(&path, &f.locator, &mut f.store).unwrap();
        assert_eq!(plan.file, path);
        assert_eq!(plan.restore_to, Some(f.docs.join("foo - Copy.txt")));
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_trash_drop_without_origin() {
        let mut f = fixture();
        let path = f.desktop.join("foo.txt");
        f.store
            .add_tile(&path, Some(f.docs.join("removed")), None);

        let plan = SyncCoordinator::begin_trash_drop(&path, &f.locator, &mut f.store).unwrap();
        assert_eq!(plan.restore_to, None);
        assert!(f.store.is_empty());

        assert!(matches!(
            SyncCoordinator::begin_trash_drop(&path, &f.locator, &mut f.store),
            Err(DesktopError::UnknownTile { .. })
        ));
    }

    #[test]
    fn test_trash_drop_with_desktop_origin_stays_put() {
        let mut f = fixture();
        let path = f.desktop.join("foo.txt");
        fs::write(&path, "foo").unwrap();
        f.store.add_tile(&path, Some(f.desktop.clone()), None);

        let plan = SyncCoordinator::begin_trash_drop(&path, &f.locator, &mut f.store).unwrap();
        assert_eq!(plan.restore_to, None);
        assert!(f.store.is_empty());
        assert!(path.exists());
    }
}
