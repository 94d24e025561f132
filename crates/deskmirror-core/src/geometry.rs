//! Canvas geometry: positions, bounds and the trash target.

use serde::{Deserialize, Serialize};

/// Edge length of a (square) tile.
pub const TILE_SIZE: f64 = 80.0;

/// Distance of the trash target from the left and bottom canvas edges.
pub const TRASH_MARGIN: f64 = 16.0;

// Safe spawn region for tiles placed without an explicit position.
const SPAWN_MIN: f64 = 16.0;
const SPAWN_X_BASE: f64 = 220.0;
const SPAWN_X_SPAN: f64 = 300.0;
const SPAWN_Y_BASE: f64 = 40.0;
const SPAWN_Y_SPAN: f64 = 220.0;
const SPAWN_RIGHT_MARGIN: f64 = 20.0;
const SPAWN_BOTTOM_MARGIN: f64 = 60.0;

/// Top-left offset of a tile within the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The bounds of a tile placed at `position`.
    pub fn tile_at(position: Position) -> Self {
        Self::new(position.x, position.y, TILE_SIZE, TILE_SIZE)
    }

    /// Check whether two rectangles overlap. Touching edges count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }
}

/// The bounded area tiles are positioned within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

impl Canvas {
    /// Create a canvas of the given size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest x a tile may occupy.
    pub fn max_x(&self) -> f64 {
        (self.width - TILE_SIZE).max(0.0)
    }

    /// Largest y a tile may occupy.
    pub fn max_y(&self) -> f64 {
        (self.height - TILE_SIZE).max(0.0)
    }

    /// Clamp a position so that the whole tile stays on the canvas.
    ///
    /// NaN coordinates collapse to the origin of their axis.
    pub fn clamp(&self, position: Position) -> Position {
        Position::new(
            clamp_axis(position.x, self.max_x()),
            clamp_axis(position.y, self.max_y()),
        )
    }

    /// Pick a spawn position from two unit samples in `[0, 1)`.
    ///
    /// The result lies in the region right of the trash target and away from
    /// the bottom edge, then is clamped to the canvas.
    pub fn spawn_position(&self, rx: f64, ry: f64) -> Position {
        let x = (SPAWN_X_BASE + rx * SPAWN_X_SPAN)
            .min(self.width - TILE_SIZE - SPAWN_RIGHT_MARGIN)
            .max(SPAWN_MIN);
        let y = (SPAWN_Y_BASE + ry * SPAWN_Y_SPAN)
            .min(self.height - TILE_SIZE - SPAWN_BOTTOM_MARGIN)
            .max(SPAWN_MIN);
        self.clamp(Position::new(x, y))
    }

    /// Bounds of the trash target (bottom-left corner).
    pub fn trash_rect(&self) -> Rect {
        Rect::new(
            TRASH_MARGIN,
            (self.height - TILE_SIZE - TRASH_MARGIN).max(0.0),
            TILE_SIZE,
            TILE_SIZE,
        )
    }

    /// Check whether a tile at `position` overlaps the trash target.
    pub fn over_trash(&self, position: Position) -> bool {
        Rect::tile_at(position).intersects(&self.trash_rect())
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_bounds() {
        let canvas = Canvas::new(400.0, 300.0);
        let p = canvas.clamp(Position::new(-10.0, 1000.0));
        assert_eq!(p, Position::new(0.0, 220.0));

        let p = canvas.clamp(Position::new(50.0, 60.0));
        assert_eq!(p, Position::new(50.0, 60.0));
    }

    #[test]
    fn test_clamp_tiny_canvas() {
        let canvas = Canvas::new(40.0, 40.0);
        assert_eq!(canvas.clamp(Position::new(10.0, 10.0)), Position::new(0.0, 0.0));
    }

    #[test]
    fn test_clamp_nan() {
        let canvas = Canvas::default();
        let p = canvas.clamp(Position::new(f64::NAN, 12.0));
        assert_eq!(p, Position::new(0.0, 12.0));
    }

    #[test]
    fn test_spawn_position_region() {
        let canvas = Canvas::default();
        let low = canvas.spawn_position(0.0, 0.0);
        assert_eq!(low, Position::new(220.0, 40.0));

        let high = canvas.spawn_position(0.999, 0.999);
        assert!(high.x < 520.0 && high.y < 260.0);
    }

    #[test]
    fn test_spawn_position_small_canvas() {
        let canvas = Canvas::new(200.0, 150.0);
        let p = canvas.spawn_position(0.5, 0.5);
        assert!(p.x <= canvas.max_x());
        assert!(p.y <= canvas.max_y());
    }

    #[test]
    fn test_trash_overlap() {
        let canvas = Canvas::new(600.0, 400.0);
        let trash = canvas.trash_rect();
        assert_eq!(trash, Rect::new(16.0, 304.0, TILE_SIZE, TILE_SIZE));

        assert!(canvas.over_trash(Position::new(40.0, 300.0)));
        assert!(!canvas.over_trash(Position::new(300.0, 40.0)));
    }
}
