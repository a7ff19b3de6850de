use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

/// Static geometry of one tile map.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub tile_w: f64,
    pub tile_h: f64,
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub const fn new(tile_w: f64, tile_h: f64, cols: i32, rows: i32) -> Self {
        Self {
            tile_w,
            tile_h,
            cols,
            rows,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    pub const FREE_CAMERA: ZoomRange = ZoomRange { min: 0.6, max: 2.5 };
    pub const STEPS_CHOOSER: ZoomRange = ZoomRange { min: 1.0, max: 2.5 };

    pub fn clamp(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min;
        }
        zoom.clamp(self.min, self.max)
    }
}

impl Camera {
    pub const fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self { x, y, zoom }
    }

    /// Zooms around a viewport point so the world position under it stays put.
    pub fn zoom_at(&mut self, px: f64, py: f64, zoom: f64, range: ZoomRange) {
        let next = range.clamp(zoom);
        let world_x = (px - self.x) / self.zoom;
        let world_y = (py - self.y) / self.zoom;
        self.x = px - world_x * next;
        self.y = py - world_y * next;
        self.zoom = next;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

/// Inclusive tile bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl TileRect {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x0 && point.x <= self.x1 && point.y >= self.y0 && point.y <= self.y1
    }

    pub fn for_each<F: FnMut(Point)>(&self, mut f: F) {
        for y in self.y0..=self.y1 {
            for x in self.x0..=self.x1 {
                f(Point::new(x, y));
            }
        }
    }
}

/// Quotients within this distance of a whole tile count as that tile, so
/// zooms like 0.6 that aren't exact in binary still land on tile edges.
const TILE_EPSILON: f64 = 1e-9;

fn tile_floor(q: f64) -> i32 {
    let nearest = q.round();
    if (q - nearest).abs() < TILE_EPSILON {
        nearest as i32
    } else {
        q.floor() as i32
    }
}

pub fn world_to_tile(px: f64, py: f64, grid: &Grid, camera: &Camera) -> Point {
    let tx = tile_floor(((px - camera.x) / camera.zoom) / grid.tile_w);
    let ty = tile_floor(((py - camera.y) / camera.zoom) / grid.tile_h);
    Point::new(tx, ty)
}

/// Top-left corner of a tile in viewport pixels.
pub fn tile_to_world(tx: i32, ty: i32, grid: &Grid, camera: &Camera) -> (f64, f64) {
    (
        tx as f64 * grid.tile_w * camera.zoom + camera.x,
        ty as f64 * grid.tile_h * camera.zoom + camera.y,
    )
}

pub fn tile_center_to_world(tx: i32, ty: i32, grid: &Grid, camera: &Camera) -> (f64, f64) {
    let (x, y) = tile_to_world(tx, ty, grid, camera);
    (
        x + grid.tile_w * camera.zoom / 2.0,
        y + grid.tile_h * camera.zoom / 2.0,
    )
}

fn cull_buffer(tile_size: f64) -> i32 {
    ((64.0 / tile_size).ceil() as i32).max(1)
}

/// Tiles overlapping the viewport plus a pop-in buffer, clamped to the map.
/// Always yields `x0 <= x1` and `y0 <= y1`, even when the camera looks at empty space.
pub fn visible_tile_rect(
    viewport_w: f64,
    viewport_h: f64,
    grid: &Grid,
    camera: &Camera,
) -> TileRect {
    let top_left = world_to_tile(0.0, 0.0, grid, camera);
    let bottom_right = world_to_tile(viewport_w, viewport_h, grid, camera);
    let buffer_x = cull_buffer(grid.tile_w);
    let buffer_y = cull_buffer(grid.tile_h);
    let max_x = (grid.cols - 1).max(0);
    let max_y = (grid.rows - 1).max(0);

    TileRect {
        x0: top_left.x.saturating_sub(buffer_x).clamp(0, max_x),
        y0: top_left.y.saturating_sub(buffer_y).clamp(0, max_y),
        x1: bottom_right.x.saturating_add(buffer_x).clamp(0, max_x),
        y1: bottom_right.y.saturating_add(buffer_y).clamp(0, max_y),
    }
}
