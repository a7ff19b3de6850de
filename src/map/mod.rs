pub mod camera;
pub mod fog;
pub mod path;

use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

pub use camera::{Camera, Grid, TileRect, ZoomRange};
pub use fog::Fog;
pub use path::{FogWalkMap, corridor_path, find_path};

pub const DEFAULT_MAP_COLS: i32 = 48;
pub const DEFAULT_MAP_ROWS: i32 = 48;
pub const DEFAULT_TILE_SIZE: f64 = 32.0;
/// Largest side length a journey map may have.
pub const MAX_MAP_DIM: i32 = 1024;

/// Tiles uncovered around the monk after every move.
pub const REVEAL_RADIUS: i32 = 3;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub fn delta(self) -> Point {
        match self {
            Direction::Up => Point::new(0, -1),
            Direction::Down => Point::new(0, 1),
            Direction::Left => Point::new(-1, 0),
            Direction::Right => Point::new(1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Only `Left` keeps the sprite mirrored; every other heading faces right.
    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Left => Facing::Left,
            _ => Facing::Right,
        }
    }

    /// Vertical moves keep whatever facing the monk already had.
    pub fn after_delta(self, delta_x: i32) -> Self {
        match delta_x.signum() {
            1 => Facing::Right,
            -1 => Facing::Left,
            _ => self,
        }
    }
}

pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
