//! Desktop state for deskmirror.
//!
//! A desktop mirrors the entries of the user's desktop directory as tiles on
//! a bounded canvas. This crate keeps that tile set consistent with the
//! filesystem as entries are created, moved, copied, deleted or dropped on
//! the trash target:
//!
//! - [`TileStore`] holds the tiles, keyed by canonical path.
//! - [`PersistenceCodec`] reads and writes the flat state file.
//! - [`ClipboardController`] implements cut/copy/paste planning.
//! - [`SyncCoordinator`] maps filesystem changes onto the store.
//! - [`Desktop`] ties them together with the file operations engine, and
//!   [`DesktopService`] runs one `Desktop` behind a request queue.

mod clipboard;
mod codec;
mod desktop;
mod error;
mod locate;
mod service;
mod store;
mod sync;

pub use clipboard::{ClipboardController, ClipboardMode, ClipboardState, PastePlan};
pub use codec::{PersistedRecord, PersistenceCodec};
pub use desktop::{Desktop, DragOutcome, EntryKind, LoadReport, PasteOutcome, TrashOutcome};
pub use error::{DesktopError, StateWarning, WarningKind};
pub use locate::{DesktopLocator, canonical_path};
pub use service::{COMMAND_CHANNEL_SIZE, DesktopHandle, DesktopService};
pub use store::TileStore;
pub use sync::{FsChange, SyncCoordinator, TrashPlan};
