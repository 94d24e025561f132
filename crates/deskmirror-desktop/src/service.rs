//! Single-writer service owning a [`Desktop`].
//!
//! Collaborators talk to the desktop through a cloneable [`DesktopHandle`].
//! Requests are queued on one channel and handled strictly in submission
//! order, so two operations finishing close together can never interleave
//! their tile store mutations or their state file saves.

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};

use deskmirror_core::{Canvas, KnownFolder, Position, Tile};

use crate::clipboard::ClipboardState;
use crate::desktop::{Desktop, DragOutcome, EntryKind, LoadReport, PasteOutcome, TrashOutcome};
use crate::error::DesktopError;

/// Capacity of the request queue.
pub const COMMAND_CHANNEL_SIZE: usize = 100;

type Reply<T> = oneshot::Sender<T>;
type Fallible<T> = Reply<Result<T, DesktopError>>;

enum Command {
    Tiles(Reply<Vec<Tile>>),
    ClipboardState(Reply<ClipboardState>),
    DesktopDir(Reply<Option<PathBuf>>),
    KnownFolder(KnownFolder, Reply<Option<PathBuf>>),
    SetCanvas(Canvas, Reply<()>),
    Load(Reply<LoadReport>),
    Save(Reply<()>),
    NotifyCreated(PathBuf, Reply<bool>),
    NotifyDeleted(PathBuf, Reply<bool>),
    NotifyMoved {
        from: PathBuf,
        to: PathBuf,
        reply: Reply<bool>,
    },
    ClipboardCopy(PathBuf, Reply<()>),
    ClipboardCut(PathBuf, Reply<()>),
    ClipboardPaste(PathBuf, Fallible<PasteOutcome>),
    Relocate {
        path: PathBuf,
        x: f64,
        y: f64,
        reply: Fallible<Position>,
    },
    EndDrag {
        path: PathBuf,
        x: f64,
        y: f64,
        reply: Fallible<DragOutcome>,
    },
    Trash(PathBuf, Fallible<TrashOutcome>),
    MoveToDesktop(PathBuf, Fallible<PathBuf>),
    Delete(PathBuf, Fallible<()>),
    Create {
        dir: PathBuf,
        name: String,
        kind: EntryKind,
        reply: Fallible<PathBuf>,
    },
}

/// The task that owns the desktop.
pub struct DesktopService {
    desktop: Desktop,
    commands: mpsc::Receiver<Command>,
}

impl DesktopService {
    /// Start the service on the current tokio runtime.
    ///
    /// The service runs until every handle has been dropped.
    pub fn spawn(desktop: Desktop) -> DesktopHandle {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let service = Self {
            desktop,
            commands: rx,
        };
        tokio::spawn(service.run());
        DesktopHandle { commands: tx }
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            self.handle(command).await;
        }
        tracing::debug!("desktop service stopped");
    }

    // A dropped reply receiver only means the caller stopped waiting.
    async fn handle(&mut self, command: Command) {
        let desktop = &mut self.desktop;
        match command {
            Command::Tiles(reply) => {
                let _ = reply.send(desktop.tiles().cloned().collect());
            }
            Command::ClipboardState(reply) => {
                let _ = reply.send(desktop.clipboard_state().clone());
            }
            Command::DesktopDir(reply) => {
                let _ = reply.send(desktop.desktop_dir().map(PathBuf::from));
            }
            Command::KnownFolder(folder, reply) => {
                let _ = reply.send(desktop.known_folder(folder));
            }
            Command::SetCanvas(canvas, reply) => {
                desktop.set_canvas(canvas);
                let _ = reply.send(());
            }
            Command::Load(reply) => {
                let _ = reply.send(desktop.load_desktop_state());
            }
            Command::Save(reply) => {
                desktop.save_desktop_state();
                let _ = reply.send(());
            }
            Command::NotifyCreated(path, reply) => {
                let _ = reply.send(desktop.notify_created(&path));
            }
            Command::NotifyDeleted(path, reply) => {
                let _ = reply.send(desktop.notify_deleted(&path));
            }
            Command::NotifyMoved { from, to, reply } => {
                let _ = reply.send(desktop.notify_moved(&from, &to));
            }
            Command::ClipboardCopy(path, reply) => {
                desktop.clipboard_copy(&path);
                let _ = reply.send(());
            }
            Command::ClipboardCut(path, reply) => {
                desktop.clipboard_cut(&path);
                let _ = reply.send(());
            }
            Command::ClipboardPaste(dir, reply) => {
                let _ = reply.send(desktop.clipboard_paste(&dir).await);
            }
            Command::Relocate { path, x, y, reply } => {
                let _ = reply.send(desktop.relocate_tile(&path, x, y));
            }
            Command::EndDrag { path, x, y, reply } => {
                let _ = reply.send(desktop.end_drag(&path, x, y).await);
            }
            Command::Trash(path, reply) => {
                let _ = reply.send(desktop.drag_tile_to_trash(&path).await);
            }
            Command::MoveToDesktop(path, reply) => {
                let _ = reply.send(desktop.move_to_desktop(&path).await);
            }
            Command::Delete(path, reply) => {
                let _ = reply.send(desktop.delete_path(&path).await);
            }
            Command::Create {
                dir,
                name,
                kind,
                reply,
            } => {
                let _ = reply.send(desktop.create(&dir, &name, kind).await);
            }
        }
    }
}

/// Cloneable handle to a running [`DesktopService`].
#[derive(Debug, Clone)]
pub struct DesktopHandle {
    commands: mpsc::Sender<Command>,
}

impl DesktopHandle {
    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T, DesktopError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .await
            .map_err(|_| DesktopError::ServiceStopped)?;
        rx.await.map_err(|_| DesktopError::ServiceStopped)
    }

    /// Snapshot of all tiles.
    pub async fn tiles(&self) -> Result<Vec<Tile>, DesktopError> {
        self.request(Command::Tiles).await
    }

    /// Current clipboard contents.
    pub async fn clipboard_state(&self) -> Result<ClipboardState, DesktopError> {
        self.request(Command::ClipboardState).await
    }

    /// The resolved desktop directory.
    pub async fn desktop_dir(&self) -> Result<Option<PathBuf>, DesktopError> {
        self.request(Command::DesktopDir).await
    }

    /// Resolve a known folder.
    pub async fn known_folder(&self, folder: KnownFolder) -> Result<Option<PathBuf>, DesktopError> {
        self.request(|reply| Command::KnownFolder(folder, reply)).await
    }

    /// Resize the canvas.
    pub async fn set_canvas(&self, width: f64, height: f64) -> Result<(), DesktopError> {
        self.request(|reply| Command::SetCanvas(Canvas::new(width, height), reply))
            .await
    }

    /// Merge the state file into the store.
    pub async fn load_desktop_state(&self) -> Result<LoadReport, DesktopError> {
        self.request(Command::Load).await
    }

    /// Write the state file.
    pub async fn save_desktop_state(&self) -> Result<(), DesktopError> {
        self.request(Command::Save).await
    }

    pub async fn notify_created(&self, path: impl Into<PathBuf>) -> Result<bool, DesktopError> {
        let path = path.into();
        self.request(|reply| Command::NotifyCreated(path, reply)).await
    }

    pub async fn notify_deleted(&self, path: impl Into<PathBuf>) -> Result<bool, DesktopError> {
        let path = path.into();
        self.request(|reply| Command::NotifyDeleted(path, reply)).await
    }

    pub async fn notify_moved(
        &self,
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
    ) -> Result<bool, DesktopError> {
        let (from, to) = (from.into(), to.into());
        self.request(|reply| Command::NotifyMoved { from, to, reply })
            .await
    }

    pub async fn clipboard_copy(&self, path: impl Into<PathBuf>) -> Result<(), DesktopError> {
        let path = path.into();
        self.request(|reply| Command::ClipboardCopy(path, reply)).await
    }

    pub async fn clipboard_cut(&self, path: impl Into<PathBuf>) -> Result<(), DesktopError> {
        let path = path.into();
        self.request(|reply| Command::ClipboardCut(path, reply)).await
    }

    /// Paste the clipboard into `target_dir`.
    pub async fn clipboard_paste(
        &self,
        target_dir: impl Into<PathBuf>,
    ) -> Result<PasteOutcome, DesktopError> {
        let dir = target_dir.into();
        self.request(|reply| Command::ClipboardPaste(dir, reply))
            .await?
    }

    /// Move a tile; returns the clamped position.
    pub async fn relocate_tile(
        &self,
        path: impl Into<PathBuf>,
        x: f64,
        y: f64,
    ) -> Result<Position, DesktopError> {
        let path = path.into();
        self.request(|reply| Command::Relocate { path, x, y, reply })
            .await?
    }

    /// Release a dragged tile at `(x, y)`.
    pub async fn end_drag(
        &self,
        path: impl Into<PathBuf>,
        x: f64,
        y: f64,
    ) -> Result<DragOutcome, DesktopError> {
        let path = path.into();
        self.request(|reply| Command::EndDrag { path, x, y, reply })
            .await?
    }

    /// Drop a tile on the trash.
    pub async fn drag_tile_to_trash(
        &self,
        path: impl Into<PathBuf>,
    ) -> Result<TrashOutcome, DesktopError> {
        let path = path.into();
        self.request(|reply| Command::Trash(path, reply)).await?
    }

    /// Move an item onto the desktop.
    pub async fn move_to_desktop(&self, path: impl Into<PathBuf>) -> Result<PathBuf, DesktopError> {
        let path = path.into();
        self.request(|reply| Command::MoveToDesktop(path, reply))
            .await?
    }

    /// Delete a file or directory tree.
    pub async fn delete_path(&self, path: impl Into<PathBuf>) -> Result<(), DesktopError> {
        let path = path.into();
        self.request(|reply| Command::Delete(path, reply)).await?
    }

    /// Create an empty file or directory.
    pub async fn create(
        &self,
        dir: impl Into<PathBuf>,
        name: impl Into<String>,
        kind: EntryKind,
    ) -> Result<PathBuf, DesktopError> {
        let (dir, name) = (dir.into(), name.into());
        self.request(|reply| Command::Create {
            dir,
            name,
            kind,
            reply,
        })
        .await?
    }
}
