use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::{
    DEFAULT_MAP_COLS, DEFAULT_MAP_ROWS, Direction, Facing, Fog, FogWalkMap, REVEAL_RADIUS,
    find_path,
};

/// Where the monk stands on the journey map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub tx: i32,
    pub ty: i32,
    pub path_id: String,
    /// Total tiles walked, never decreases.
    pub step: u64,
    pub facing: Facing,
}

impl Default for Journey {
    fn default() -> Self {
        Self {
            tx: DEFAULT_MAP_COLS / 2,
            ty: DEFAULT_MAP_ROWS / 2,
            path_id: "main".to_string(),
            step: 0,
            facing: Facing::Right,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the monk is already standing there")]
    SameTile,
    #[error("tile {0},{1} is outside the map")]
    OutOfBounds(i32, i32),
}

impl Journey {
    pub fn tile(&self) -> Point {
        Point::new(self.tx, self.ty)
    }

    fn arrive(&mut self, target: Point, fog: &mut Fog) {
        self.tx = target.x;
        self.ty = target.y;
        self.step += 1;
        fog.reveal_radius(target.x, target.y, REVEAL_RADIUS);
    }

    /// Walks `count` unit moves in one direction. Moves that would leave the
    /// map are absorbed at the edge but still count as steps taken.
    pub fn advance(&mut self, fog: &mut Fog, direction: Direction, count: u32) {
        let delta = direction.delta();
        for _ in 0..count {
            let next = Point::new(
                (self.tx + delta.x).clamp(0, (fog.cols - 1).max(0)),
                (self.ty + delta.y).clamp(0, (fog.rows - 1).max(0)),
            );
            self.arrive(next, fog);
        }
        if count > 0 {
            self.facing = Facing::from_direction(direction);
        }
    }

    /// Jumps straight to a chosen tile, spending one pending step.
    pub fn move_to(
        &mut self,
        fog: &mut Fog,
        pending_steps: &mut u32,
        target: Point,
    ) -> Result<(), MoveError> {
        if !fog.in_bounds(target) {
            return Err(MoveError::OutOfBounds(target.x, target.y));
        }
        if target == self.tile() {
            return Err(MoveError::SameTile);
        }
        self.facing = self.facing.after_delta(target.x - self.tx);
        self.arrive(target, fog);
        *pending_steps = pending_steps.saturating_sub(1);
        Ok(())
    }

    /// Follows the pathfinder toward `target`, one pending step per tile,
    /// stopping when steps run out. Returns the tiles entered.
    pub fn walk_toward(
        &mut self,
        fog: &mut Fog,
        pending_steps: &mut u32,
        target: Point,
    ) -> Result<Vec<Point>, MoveError> {
        if !fog.in_bounds(target) {
            return Err(MoveError::OutOfBounds(target.x, target.y));
        }
        if target == self.tile() {
            return Err(MoveError::SameTile);
        }
        let route = find_path(self.tile(), target, &FogWalkMap::fogged(fog));
        let budget = *pending_steps as usize;
        let walked: Vec<Point> = route.into_iter().skip(1).take(budget).collect();
        for &tile in &walked {
            self.facing = self.facing.after_delta(tile.x - self.tx);
            self.arrive(tile, fog);
        }
        *pending_steps -= walked.len() as u32;
        Ok(walked)
    }

    /// Path the monk would take to `target`, without moving.
    pub fn preview(&self, fog: &Fog, target: Point) -> Vec<Point> {
        find_path(self.tile(), target, &FogWalkMap::fogged(fog))
    }
}
