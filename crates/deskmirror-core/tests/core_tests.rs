use deskmirror_core::{
    Canvas, DEFAULT_STATE_FILE_NAME, DesktopConfig, FsError, IoFailure, KnownFolder, PALETTE,
    Position, Rect, TILE_SIZE, Tile, color_index,
};
use std::io;
use std::path::{Path, PathBuf};

#[test]
fn test_tile_colors_are_stable() {
    let path = Path::new("/home/user/Desktop/report.pdf");
    let tile = Tile::new(path, None, Position::new(0.0, 0.0));

    assert_eq!(tile.color_index(), color_index(path));
    assert!(tile.color_index() < PALETTE.len());
    assert_ne!(tile.fill_color(), tile.border_color());

    // Same path, different origin and position: same color.
    let moved = Tile::new(path, Some(PathBuf::from("/tmp")), Position::new(300.0, 40.0));
    assert_eq!(tile.fill_color(), moved.fill_color());
}

#[test]
fn test_palette_is_covered() {
    let mut seen = [false; PALETTE.len()];
    for i in 0..200 {
        seen[color_index(Path::new(&format!("/desk/file-{i}.txt")))] = true;
    }
    assert!(seen.iter().all(|s| *s));
}

#[test]
fn test_tile_name() {
    let tile = Tile::new("/home/user/Desktop/notes.txt", None, Position::default());
    assert_eq!(tile.name(), "notes.txt");
}

#[test]
fn test_every_tile_fits_after_clamp() {
    let canvas = Canvas::new(640.0, 480.0);
    let samples = [
        Position::new(-50.0, -50.0),
        Position::new(10_000.0, 10_000.0),
        Position::new(f64::NAN, 200.0),
        Position::new(300.0, f64::INFINITY),
    ];
    for sample in samples {
        let p = canvas.clamp(sample);
        assert!((0.0..=canvas.width - TILE_SIZE).contains(&p.x), "{p:?}");
        assert!((0.0..=canvas.height - TILE_SIZE).contains(&p.y), "{p:?}");
    }
}

#[test]
fn test_trash_overlap() {
    let canvas = Canvas::default();
    let trash = canvas.trash_rect();
    assert_eq!(trash, Rect::new(16.0, 704.0, TILE_SIZE, TILE_SIZE));

    assert!(canvas.over_trash(Position::new(trash.x, trash.y)));
    assert!(canvas.over_trash(Position::new(60.0, 650.0)));
    assert!(!canvas.over_trash(Position::new(400.0, 100.0)));
    assert!(!canvas.over_trash(Position::new(trash.x + TILE_SIZE + 1.0, trash.y)));
}

#[test]
fn test_spawn_positions_avoid_trash() {
    let canvas = Canvas::default();
    for (rx, ry) in [(0.0, 0.0), (0.5, 0.5), (0.999, 0.999)] {
        assert!(!canvas.over_trash(canvas.spawn_position(rx, ry)));
    }
}

#[test]
fn test_config_defaults() {
    let config = DesktopConfig::builder().home("/home/user").build().unwrap();

    assert_eq!(config.canvas, Canvas::default());
    assert_eq!(config.seed, None);
    assert_eq!(
        config.state_file_path(),
        PathBuf::from("/home/user").join(DEFAULT_STATE_FILE_NAME)
    );
}

#[test]
fn test_config_rejects_tiny_canvas() {
    let result = DesktopConfig::builder()
        .home("/home/user")
        .canvas(Canvas::new(10.0, 10.0))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_known_folder_names() {
    assert_eq!(KnownFolder::Desktop.to_string(), "Desktop");
    let home = Path::new("/home/user");
    assert_eq!(
        KnownFolder::Downloads.candidates(home)[0],
        home.join("Downloads")
    );
}

#[test]
fn test_partial_tree_lists_failures() {
    let failures = vec![
        IoFailure::with_message("/a", io::ErrorKind::PermissionDenied, "denied"),
        IoFailure::with_message("/b", io::ErrorKind::NotFound, "gone"),
    ];
    let err = FsError::from_failures(failures).unwrap_err();

    assert!(err.is_partial());
    assert_eq!(err.failures().len(), 2);
    assert_eq!(err.to_string(), "2 entries failed during tree operation");
    assert!(FsError::from_failures(Vec::new()).is_ok());
}
