use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

use super::MAX_MAP_DIM;

/// Reveal bitmap over the journey map, row-major (`y * cols + x`).
/// Cells only ever go from hidden to revealed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fog {
    pub cols: i32,
    pub rows: i32,
    pub revealed: Vec<bool>,
}

impl Fog {
    /// Dimensions are clamped to `0..=MAX_MAP_DIM`.
    pub fn new(cols: i32, rows: i32) -> Self {
        let cols = cols.clamp(0, MAX_MAP_DIM);
        let rows = rows.clamp(0, MAX_MAP_DIM);
        Self {
            cols,
            rows,
            revealed: vec![false; cols as usize * rows as usize],
        }
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(Point::new(x, y)) {
            Some((y * self.cols + x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.cols && point.y >= 0 && point.y < self.rows
    }

    /// Callers are expected to bounds-check; anything outside the grid reads as hidden.
    pub fn is_revealed(&self, x: i32, y: i32) -> bool {
        self.idx(x, y)
            .and_then(|idx| self.revealed.get(idx).copied())
            .unwrap_or(false)
    }

    pub fn reveal_point(&mut self, point: Point) {
        if let Some(idx) = self.idx(point.x, point.y) {
            self.revealed[idx] = true;
        }
    }

    /// Reveals the inclusive Euclidean disk `(x-cx)² + (y-cy)² <= r²`, clipped to the grid.
    pub fn reveal_radius(&mut self, cx: i32, cy: i32, r: i32) {
        if r < 0 {
            return;
        }
        let r2 = r * r;
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(self.cols - 1);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(self.rows - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= r2 {
                    self.reveal_point(Point::new(x, y));
                }
            }
        }
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|cell| **cell).count()
    }
}
