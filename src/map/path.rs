use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DistanceAlg};
use smallvec::SmallVec;

use super::fog::Fog;

const STEPS: [Point; 4] = [
    Point { x: 1, y: 0 },
    Point { x: -1, y: 0 },
    Point { x: 0, y: 1 },
    Point { x: 0, y: -1 },
];

/// Journey map as seen by the pathfinder: every in-bounds tile is walkable,
/// unless a fog is supplied, in which case only revealed tiles are.
pub struct FogWalkMap<'a> {
    pub cols: i32,
    pub rows: i32,
    fog: Option<&'a Fog>,
}

impl<'a> FogWalkMap<'a> {
    pub fn open(cols: i32, rows: i32) -> Self {
        Self {
            cols,
            rows,
            fog: None,
        }
    }

    pub fn fogged(fog: &'a Fog) -> Self {
        Self {
            cols: fog.cols,
            rows: fog.rows,
            fog: Some(fog),
        }
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.in_bounds(point)
            && self
                .fog
                .map_or(true, |fog| fog.is_revealed(point.x, point.y))
    }
}

impl<'a> BaseMap for FogWalkMap<'a> {
    fn is_opaque(&self, _idx: usize) -> bool {
        false
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        let point = self.index_to_point2d(idx);
        for dir in STEPS {
            let dest = Point::new(point.x + dir.x, point.y + dir.y);
            if self.is_walkable(dest) {
                exits.push((self.point2d_to_index(dest), 1.0));
            }
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Manhattan.distance2d(p1, p2)
    }
}

impl<'a> Algorithm2D for FogWalkMap<'a> {
    fn dimensions(&self) -> Point {
        Point::new(self.cols, self.rows)
    }

    fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.cols && point.y >= 0 && point.y < self.rows
    }
}

/// Unobstructed L-shaped walk: all of x first, then all of y.
pub fn corridor_path(start: Point, end: Point) -> Vec<Point> {
    let mut path = Vec::new();
    let mut cursor = start;
    path.push(cursor);

    while cursor.x != end.x {
        cursor.x += (end.x - cursor.x).signum();
        path.push(cursor);
    }

    while cursor.y != end.y {
        cursor.y += (end.y - cursor.y).signum();
        path.push(cursor);
    }

    path
}

/// A* over 4-connected tiles with Manhattan heuristic and unit edge cost.
///
/// Ties on the lowest f-score go to whichever open node was queued first, so
/// results are stable for a given map. When the goal can't be reached the
/// search falls back to [`corridor_path`], which ignores fog entirely; callers
/// that care about fog should treat the result as best-effort.
pub fn find_path(start: Point, goal: Point, map: &FogWalkMap) -> Vec<Point> {
    if start == goal {
        return vec![start];
    }
    if !map.in_bounds(start) || !map.in_bounds(goal) {
        return corridor_path(start, goal);
    }

    let size = (map.cols * map.rows) as usize;
    let start_idx = map.point2d_to_index(start);
    let goal_idx = map.point2d_to_index(goal);

    let mut g_score = vec![f32::INFINITY; size];
    let mut f_score = vec![f32::INFINITY; size];
    let mut came_from: Vec<Option<usize>> = vec![None; size];
    let mut closed = vec![false; size];
    let mut open: Vec<usize> = vec![start_idx];

    g_score[start_idx] = 0.0;
    f_score[start_idx] = map.get_pathing_distance(start_idx, goal_idx);

    while !open.is_empty() {
        let mut best = 0;
        for (slot, &idx) in open.iter().enumerate().skip(1) {
            if f_score[idx] < f_score[open[best]] {
                best = slot;
            }
        }
        let current = open.remove(best);

        if current == goal_idx {
            return rebuild(&came_from, current, map);
        }
        closed[current] = true;

        for (next, cost) in map.get_available_exits(current) {
            if closed[next] {
                continue;
            }
            let tentative = g_score[current] + cost;
            if tentative < g_score[next] {
                came_from[next] = Some(current);
                g_score[next] = tentative;
                f_score[next] = tentative + map.get_pathing_distance(next, goal_idx);
                if !open.contains(&next) {
                    open.push(next);
                }
            }
        }
    }

    log::debug!(
        "no walkable route {},{} -> {},{}; using corridor fallback",
        start.x,
        start.y,
        goal.x,
        goal.y
    );
    corridor_path(start, goal)
}

fn rebuild(came_from: &[Option<usize>], mut current: usize, map: &FogWalkMap) -> Vec<Point> {
    let mut path = vec![map.index_to_point2d(current)];
    while let Some(prev) = came_from[current] {
        path.push(map.index_to_point2d(prev));
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::manhattan;

    fn assert_contiguous(path: &[Point]) {
        for pair in path.windows(2) {
            assert_eq!(manhattan(pair[0], pair[1]), 1, "{:?}", pair);
        }
    }

    #[test]
    fn same_tile_is_single_step() {
        let map = FogWalkMap::open(8, 8);
        let path = find_path(Point::new(3, 3), Point::new(3, 3), &map);
        assert_eq!(path, vec![Point::new(3, 3)]);
    }

    #[test]
    fn adjacent_tiles_give_two_step_path() {
        let map = FogWalkMap::open(8, 8);
        let path = find_path(Point::new(2, 2), Point::new(2, 3), &map);
        assert_eq!(path, vec![Point::new(2, 2), Point::new(2, 3)]);
    }

    #[test]
    fn open_map_path_is_shortest() {
        let map = FogWalkMap::open(10, 10);
        let start = Point::new(1, 1);
        let goal = Point::new(7, 4);
        let path = find_path(start, goal, &map);
        assert_eq!(path.len() as i32, manhattan(start, goal) + 1);
        assert_eq!(path[0], start);
        assert_eq!(path[path.len() - 1], goal);
        assert_contiguous(&path);
    }

    #[test]
    fn equal_cost_ties_follow_exit_order() {
        let map = FogWalkMap::open(5, 5);
        let down_right = find_path(Point::new(0, 0), Point::new(2, 2), &map);
        assert_eq!(
            down_right,
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(2, 1),
                Point::new(2, 2),
            ]
        );

        let up_left = find_path(Point::new(2, 2), Point::new(0, 0), &map);
        assert_eq!(
            up_left,
            vec![
                Point::new(2, 2),
                Point::new(1, 2),
                Point::new(0, 2),
                Point::new(0, 1),
                Point::new(0, 0),
            ]
        );
    }

    #[test]
    fn path_detours_through_revealed_tiles() {
        // Revealed U shape: down column 0, across row 4, up column 4.
        let mut fog = Fog::new(5, 5);
        for y in 0..5 {
            fog.reveal_point(Point::new(0, y));
            fog.reveal_point(Point::new(4, y));
        }
        for x in 0..5 {
            fog.reveal_point(Point::new(x, 4));
        }
        let map = FogWalkMap::fogged(&fog);
        let path = find_path(Point::new(0, 0), Point::new(4, 0), &map);
        assert_eq!(path.len(), 13);
        assert_contiguous(&path);
        assert!(path.iter().all(|p| fog.is_revealed(p.x, p.y)));
    }

    #[test]
    fn unreachable_goal_falls_back_to_corridor() {
        let mut fog = Fog::new(6, 6);
        fog.reveal_point(Point::new(0, 0));
        let map = FogWalkMap::fogged(&fog);
        let path = find_path(Point::new(0, 0), Point::new(3, 2), &map);
        assert_eq!(path, corridor_path(Point::new(0, 0), Point::new(3, 2)));
        assert_eq!(path.len(), 6);
        assert_eq!(path[3], Point::new(3, 0));
        assert_contiguous(&path);
    }

    #[test]
    fn corridor_walks_x_then_y() {
        let path = corridor_path(Point::new(2, 2), Point::new(0, 4));
        assert_eq!(
            path,
            vec![
                Point::new(2, 2),
                Point::new(1, 2),
                Point::new(0, 2),
                Point::new(0, 3),
                Point::new(0, 4),
            ]
        );
    }
}
