//! deskmirror - A persistent desktop of file tiles kept in sync with disk.
//!
//! Usage:
//!   deskmirror list [--json]              Show the desktop tiles
//!   deskmirror folders                    Show resolved known folders
//!   deskmirror create DIR NAME [--dir]    Create an empty file or folder
//!   deskmirror delete PATH                Delete a file or folder tree
//!   deskmirror to-desktop PATH            Move an item onto the desktop
//!   deskmirror paste SRC DIR [--cut]      Copy (or move) SRC into DIR
//!   deskmirror relocate TILE X Y          Move a tile on the canvas
//!   deskmirror drop TILE X Y              Release a dragged tile at X,Y
//!   deskmirror trash TILE                 Return a tile's file to its origin
//!   deskmirror notify created|deleted|moved ...
//!   deskmirror --help                     Show help

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use deskmirror_core::{Canvas, DesktopConfig, KnownFolder, Tile};
use deskmirror_desktop::{
    Desktop, DesktopHandle, DesktopService, DragOutcome, EntryKind, TrashOutcome,
};

#[derive(Parser)]
#[command(
    name = "deskmirror",
    version,
    about = "A persistent desktop of file tiles",
    long_about = "deskmirror mirrors your desktop folder as tiles on a canvas and keeps \
                  their positions in sync as files are created, moved, copied, deleted \
                  or dropped on the trash."
)]
struct Cli {
    /// Home directory (defaults to the current user's)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Desktop directory (skips the usual candidates)
    #[arg(long, global = true)]
    desktop: Option<PathBuf>,

    /// State file (defaults to ~/.deskmirror_tiles.txt)
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Canvas width
    #[arg(long, global = true, default_value = "1200")]
    width: f64,

    /// Canvas height
    #[arg(long, global = true, default_value = "800")]
    height: f64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the desktop tiles
    List {
        /// Print tiles as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved known folders
    Folders,

    /// Create an empty file (or folder) and add its tile if it is on the desktop
    Create {
        /// Parent directory
        dir: PathBuf,
        /// Name of the new entry
        name: String,
        /// Create a directory instead of a file
        #[arg(long = "dir")]
        dir_entry: bool,
    },

    /// Delete a file or directory tree
    Delete { path: PathBuf },

    /// Move an item onto the desktop
    ToDesktop { path: PathBuf },

    /// Paste SRC into DIR under a collision-free name
    Paste {
        /// Item to copy or move
        source: PathBuf,
        /// Target directory
        target: PathBuf,
        /// Move instead of copy
        #[arg(long)]
        cut: bool,
    },

    /// Move a tile on the canvas
    Relocate { tile: PathBuf, x: f64, y: f64 },

    /// Release a dragged tile; trashes it when released over the trash target
    Drop { tile: PathBuf, x: f64, y: f64 },

    /// Drop a tile on the trash, returning its file to where it came from
    Trash { tile: PathBuf },

    /// Tell the desktop about a change made elsewhere
    Notify {
        #[command(subcommand)]
        change: Change,
    },
}

#[derive(Subcommand)]
enum Change {
    /// PATH was created
    Created { path: PathBuf },
    /// PATH was deleted
    Deleted { path: PathBuf },
    /// FROM was moved to TO
    Moved { from: PathBuf, to: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    let handle = DesktopService::spawn(Desktop::new(&config));

    let report = handle.load_desktop_state().await?;
    if !report.warnings.is_empty() {
        eprintln!("{} state record(s) skipped", report.warnings.len());
    }

    run(&handle, cli.command).await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_config(cli: &Cli) -> Result<DesktopConfig> {
    let home = match &cli.home {
        Some(home) => home.clone(),
        None => DesktopConfig::detect()
            .map(|config| config.home)
            .ok_or_else(|| eyre!("Could not determine the home directory"))?,
    };

    let mut builder = DesktopConfig::builder();
    builder
        .home(home)
        .canvas(Canvas::new(cli.width, cli.height));
    if let Some(desktop) = &cli.desktop {
        builder.desktop_dir(desktop.clone());
    }
    if let Some(state_file) = &cli.state_file {
        builder.state_file(state_file.clone());
    }
    builder.build().context("Invalid configuration")
}

async fn run(handle: &DesktopHandle, command: Command) -> Result<()> {
    match command {
        Command::List { json } => {
            let tiles = handle.tiles().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tiles)?);
            } else {
                print_tiles(&tiles);
            }
        }
        Command::Folders => {
            for folder in KnownFolder::iter() {
                match handle.known_folder(folder).await? {
                    Some(path) => println!(" {:<10} {}", folder.to_string(), path.display()),
                    None => println!(" {:<10} (not found)", folder.to_string()),
                }
            }
        }
        Command::Create {
            dir,
            name,
            dir_entry,
        } => {
            let kind = if dir_entry {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let path = handle
                .create(dir, name, kind)
                .await
                .context("Create failed")?;
            println!("Created {}", path.display());
        }
        Command::Delete { path } => {
            handle
                .delete_path(&path)
                .await
                .with_context(|| format!("Could not delete {}", path.display()))?;
            println!("Deleted {}", path.display());
        }
        Command::ToDesktop { path } => {
            let landed = handle
                .move_to_desktop(&path)
                .await
                .with_context(|| format!("Could not move {} to the desktop", path.display()))?;
            println!("Moved to {}", landed.display());
        }
        Command::Paste {
            source,
            target,
            cut,
        } => {
            if cut {
                handle.clipboard_cut(source).await?;
            } else {
                handle.clipboard_copy(source).await?;
            }
            let outcome = handle
                .clipboard_paste(target)
                .await
                .context("Paste failed")?;
            println!(
                "{} {} -> {}",
                outcome.mode,
                outcome.source.display(),
                outcome.destination.display()
            );
        }
        Command::Relocate { tile, x, y } => {
            let position = handle.relocate_tile(tile, x, y).await?;
            println!("Placed at ({}, {})", position.x, position.y);
        }
        Command::Drop { tile, x, y } => match handle.end_drag(tile, x, y).await? {
            DragOutcome::Placed(position) => {
                println!("Placed at ({}, {})", position.x, position.y)
            }
            DragOutcome::Trashed(outcome) => print_trash_outcome(&outcome),
        },
        Command::Trash { tile } => {
            let outcome = handle.drag_tile_to_trash(tile).await?;
            print_trash_outcome(&outcome);
        }
        Command::Notify { change } => {
            let changed = match change {
                Change::Created { path } => handle.notify_created(path).await?,
                Change::Deleted { path } => handle.notify_deleted(path).await?,
                Change::Moved { from, to } => handle.notify_moved(from, to).await?,
            };
            println!("{}", if changed { "Tiles updated" } else { "No change" });
        }
    }

    Ok(())
}

/// Print tiles as a table.
fn print_tiles(tiles: &[Tile]) {
    if tiles.is_empty() {
        println!(" No tiles.");
        return;
    }

    println!();
    println!("{}", "─".repeat(70));
    println!(" {:<32} {:>8} {:>8}  {:<8} Origin", "Name", "X", "Y", "Color");
    println!("{}", "─".repeat(70));
    for tile in tiles {
        let origin = tile
            .origin_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            " {:<32} {:>8.1} {:>8.1}  {:<8} {}",
            truncate(&tile.name(), 32),
            tile.position.x,
            tile.position.y,
            tile.fill_color(),
            origin
        );
    }
    println!();
    println!(" {} tile(s)", tiles.len());
}

fn print_trash_outcome(outcome: &TrashOutcome) {
    match outcome {
        TrashOutcome::Restored { to, .. } => println!("Returned to {}", to.display()),
        TrashOutcome::Orphaned { path, error: None } => {
            println!("Tile removed; {} left in place", path.display())
        }
        TrashOutcome::Orphaned {
            path,
            error: Some(error),
        } => {
            eprintln!("Could not return {}: {}", path.display(), error);
            println!("Tile removed; {} left in place", path.display());
        }
    }
}

/// Truncate a string to max length (in characters).
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{}…", head)
    }
}
