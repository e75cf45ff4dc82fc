//! Grid pathfinding around the base walls
//!
//! The arena is rasterised once into a walkability grid, plus a second one
//! with the walls grown by the unit radius. Each query runs A* on a throwaway
//! copy of a grid (start and end cells forced open), turns the cell path into
//! pixel waypoints and string-pulls it with sampled line-of-sight checks.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use glam::Vec2;

use super::base::Base;
use super::collision::line_of_sight_blocked;
use super::rect::Rect;
use crate::settings::Settings;

/// Line-of-sight samples per cell length
const LOS_SAMPLES_PER_CELL: f32 = 4.0;

/// 4-connected neighbour offsets, in expansion order
const NEIGHBOURS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Grid coordinates (column, row)
pub type Cell = (usize, usize);

/// Boolean occupancy grid at a fixed cell size
#[derive(Debug, Clone)]
pub struct WalkGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    walkable: Vec<bool>,
}

impl WalkGrid {
    /// Rasterise `walls` over an arena of `size`; a cell is blocked iff a wall overlaps it
    pub fn build(size: Vec2, cell_size: f32, walls: &[Rect]) -> Self {
        let cols = (size.x / cell_size).ceil().max(1.0) as usize;
        let rows = (size.y / cell_size).ceil().max(1.0) as usize;
        let mut walkable = vec![true; cols * rows];

        for y in 0..rows {
            for x in 0..cols {
                let cell = Rect::new(
                    x as f32 * cell_size,
                    y as f32 * cell_size,
                    cell_size,
                    cell_size,
                );
                if walls.iter().any(|wall| wall.overlaps(&cell)) {
                    walkable[y * cols + x] = false;
                }
            }
        }

        Self {
            cell_size,
            cols,
            rows,
            walkable,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    fn idx(&self, cell: Cell) -> usize {
        cell.1 * self.cols + cell.0
    }

    /// Cell containing `pos`, or `None` outside the grid
    pub fn cell_of(&self, pos: Vec2) -> Option<Cell> {
        if !(pos.x >= 0.0 && pos.y >= 0.0) {
            return None;
        }
        let x = (pos.x / self.cell_size).floor() as usize;
        let y = (pos.y / self.cell_size).floor() as usize;
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some((x, y))
    }

    /// Pixel center of a cell
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            (cell.0 as f32 + 0.5) * self.cell_size,
            (cell.1 as f32 + 0.5) * self.cell_size,
        )
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.walkable[self.idx(cell)]
    }

    /// Walkability of the cell under `pos` (out of bounds counts as blocked)
    pub fn is_walkable_at(&self, pos: Vec2) -> bool {
        self.cell_of(pos).is_some_and(|cell| self.is_walkable(cell))
    }

    fn set_walkable(&mut self, cell: Cell, walkable: bool) {
        let i = self.idx(cell);
        self.walkable[i] = walkable;
    }

    /// Sampled straight-line check at sub-cell resolution
    pub fn segment_clear(&self, a: Vec2, b: Vec2) -> bool {
        let step = self.cell_size / LOS_SAMPLES_PER_CELL;
        let steps = (a.distance(b) / step).ceil().max(1.0) as usize;
        (0..=steps).all(|i| {
            let t = i as f32 / steps as f32;
            self.is_walkable_at(a.lerp(b, t))
        })
    }

    /// A* from `start` to `goal`; uniform step cost, Manhattan heuristic.
    /// Equal-priority entries pop in insertion order so results are stable.
    fn search(&self, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
        let n = self.cols * self.rows;
        let mut g_score = vec![u32::MAX; n];
        let mut came_from = vec![usize::MAX; n];
        let mut closed = vec![false; n];

        let start_idx = self.idx(start);
        let goal_idx = self.idx(goal);
        let mut seq: u64 = 0;

        let mut open: BinaryHeap<Reverse<(u32, u64, usize)>> = BinaryHeap::new();
        g_score[start_idx] = 0;
        open.push(Reverse((manhattan(start, goal), seq, start_idx)));

        while let Some(Reverse((_, _, cur))) = open.pop() {
            if closed[cur] {
                continue;
            }
            closed[cur] = true;
            if cur == goal_idx {
                break;
            }

            let cx = (cur % self.cols) as i64;
            let cy = (cur / self.cols) as i64;
            let next_g = g_score[cur] + 1;

            for (dx, dy) in NEIGHBOURS {
                let (nx, ny) = (cx + dx, cy + dy);
                if nx < 0 || ny < 0 || nx >= self.cols as i64 || ny >= self.rows as i64 {
                    continue;
                }
                let nb = (nx as usize, ny as usize);
                let nb_idx = self.idx(nb);
                if closed[nb_idx] || !self.walkable[nb_idx] {
                    continue;
                }
                if next_g < g_score[nb_idx] {
                    g_score[nb_idx] = next_g;
                    came_from[nb_idx] = cur;
                    seq += 1;
                    open.push(Reverse((next_g + manhattan(nb, goal), seq, nb_idx)));
                }
            }
        }

        if !closed[goal_idx] {
            return None;
        }

        let mut path = vec![goal];
        let mut cur = goal_idx;
        while cur != start_idx {
            cur = came_from[cur];
            path.push((cur % self.cols, cur / self.cols));
        }
        path.reverse();
        Some(path)
    }
}

#[inline]
fn manhattan(a: Cell, b: Cell) -> u32 {
    (a.0.abs_diff(b.0) + a.1.abs_diff(b.1)) as u32
}

/// Greedy string-pull: from each anchor jump to the furthest point in clear
/// sight. A shortcut must pass the sampled grid check and cross no blocker.
fn simplify_on(grid: &WalkGrid, blockers: &[Rect], points: &[Vec2]) -> Vec<Vec2> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    let mut anchor = 0;
    while anchor < points.len() - 1 {
        let from = points[anchor];
        let reach = ((anchor + 2)..points.len())
            .rev()
            .find(|&j| {
                grid.segment_clear(from, points[j])
                    && !line_of_sight_blocked(from, points[j], blockers)
            })
            .unwrap_or(anchor + 1);
        out.push(points[reach]);
        anchor = reach;
    }
    out
}

/// Search `grid` with the query cells forced open and string-pull the result
fn route(
    grid: &WalkGrid,
    blockers: &[Rect],
    (start, goal): (Cell, Cell),
    from: Vec2,
    to: Vec2,
) -> Option<Vec<Vec2>> {
    let mut grid = grid.clone();
    grid.set_walkable(start, true);
    grid.set_walkable(goal, true);

    let cells = grid.search(start, goal)?;
    let mut points: Vec<Vec2> = cells.iter().map(|&c| grid.cell_center(c)).collect();
    points[0] = from;
    if let Some(last) = points.last_mut() {
        *last = to;
    }

    let mut waypoints = simplify_on(&grid, blockers, &points);
    waypoints.remove(0);
    Some(waypoints)
}

/// Waypoint planner for units moving around the base
///
/// Two grids are kept: the bare wall raster, and a clearance raster whose
/// walls are grown by the unit radius. Routes are planned on the clearance
/// raster so a unit's body never scrapes a wall; the bare raster is only used
/// when the unit already stands inside that margin with no way out of it.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    grid: WalkGrid,
    clearance_grid: WalkGrid,
    clearance_walls: Vec<Rect>,
    base: Base,
}

impl Pathfinder {
    /// `clearance` is the body radius routes must keep from every wall
    pub fn new(base: &Base, arena_size: Vec2, cell_size: f32, clearance: f32) -> Self {
        let clearance_walls: Vec<Rect> =
            base.walls().iter().map(|wall| wall.inflate(clearance)).collect();
        Self {
            grid: WalkGrid::build(arena_size, cell_size, base.walls()),
            clearance_grid: WalkGrid::build(arena_size, cell_size, &clearance_walls),
            clearance_walls,
            base: base.clone(),
        }
    }

    pub fn from_settings(base: &Base, settings: &Settings) -> Self {
        Self::new(
            base,
            settings.arena_size(),
            settings.cell_size,
            settings.unit_radius,
        )
    }

    /// The canonical walkability grid
    pub fn grid(&self) -> &WalkGrid {
        &self.grid
    }

    /// Walkability for a unit body: walls grown by the clearance radius
    pub fn clearance_grid(&self) -> &WalkGrid {
        &self.clearance_grid
    }

    /// Ordered waypoints from `from` to `to`; the last one is always exactly `to`
    pub fn compute_path(&self, from: Vec2, to: Vec2) -> Vec<Vec2> {
        let (Some(start), Some(goal)) = (self.grid.cell_of(from), self.grid.cell_of(to)) else {
            return vec![to];
        };
        if from == to || start == goal {
            return vec![to];
        }

        let query = (start, goal);
        if let Some(path) = route(&self.clearance_grid, &self.clearance_walls, query, from, to) {
            return path;
        }
        log::debug!("No clearance path {:?} -> {:?}, retrying on the bare grid", from, to);
        if let Some(path) = route(&self.grid, self.base.walls(), query, from, to) {
            return path;
        }

        log::debug!("No grid path {:?} -> {:?}, using gate fallback", from, to);
        self.fallback_path(from, to)
    }

    /// String-pull an arbitrary point list with the unit clearance applied
    pub fn simplify(&self, points: &[Vec2]) -> Vec<Vec2> {
        simplify_on(&self.clearance_grid, &self.clearance_walls, points)
    }

    /// Route through the gate when crossing the base boundary, else go direct
    fn fallback_path(&self, from: Vec2, to: Vec2) -> Vec<Vec2> {
        match (self.base.is_inside(from), self.base.is_inside(to)) {
            (true, false) => vec![self.base.gate_position(), to],
            (false, true) => vec![self.base.entry_gate(), to],
            _ => vec![to],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{circle_rect_collision, segments_intersect};
    use proptest::prelude::*;

    fn default_pathfinder() -> (Base, Pathfinder) {
        let settings = Settings::default();
        let base = Base::from_settings(&settings);
        let pathfinder = Pathfinder::from_settings(&base, &settings);
        (base, pathfinder)
    }

    fn crosses(path: &[Vec2], from: Vec2, a: Vec2, b: Vec2) -> bool {
        let mut prev = from;
        for &p in path {
            if segments_intersect(prev, p, a, b) {
                return true;
            }
            prev = p;
        }
        false
    }

    #[test]
    fn test_grid_dimensions_and_walls() {
        let (_, pathfinder) = default_pathfinder();
        let grid = pathfinder.grid();
        assert_eq!(grid.cols(), 80);
        assert_eq!(grid.rows(), 60);
        // Top wall row
        assert!(!grid.is_walkable_at(Vec2::new(400.0, 230.0)));
        // Interior and gate gap are open
        assert!(grid.is_walkable_at(Vec2::new(400.0, 300.0)));
        assert!(grid.is_walkable_at(Vec2::new(400.0, 370.0)));
        // Bottom wall beside the gate
        assert!(!grid.is_walkable_at(Vec2::new(350.0, 370.0)));
    }

    #[test]
    fn test_clearance_grid_narrows_gate() {
        let (_, pathfinder) = default_pathfinder();
        let grid = pathfinder.clearance_grid();
        // 40 px gate minus a 10 px body radius on each side leaves two columns
        assert!(grid.is_walkable_at(Vec2::new(395.0, 370.0)));
        assert!(grid.is_walkable_at(Vec2::new(405.0, 370.0)));
        assert!(!grid.is_walkable_at(Vec2::new(385.0, 370.0)));
        assert!(!grid.is_walkable_at(Vec2::new(415.0, 370.0)));
        // Cells within a radius of the inner wall faces are closed
        assert!(!grid.is_walkable_at(Vec2::new(315.0, 300.0)));
        assert!(grid.is_walkable_at(Vec2::new(325.0, 300.0)));
    }

    /// Every point along the route keeps a full body radius from the walls
    fn assert_route_clear(base: &Base, radius: f32, from: Vec2, path: &[Vec2]) {
        let mut prev = from;
        for &p in path {
            for i in 0..=100 {
                let q = prev.lerp(p, i as f32 / 100.0);
                for wall in base.walls() {
                    assert!(
                        !circle_rect_collision(q, radius, wall).hit,
                        "{:?} scrapes {:?} on the way to {:?}",
                        q,
                        wall,
                        path.last()
                    );
                }
            }
            prev = p;
        }
    }

    #[test]
    fn test_routes_keep_body_clear_of_walls() {
        let (base, pathfinder) = default_pathfinder();
        let radius = Settings::default().unit_radius;
        let targets = [
            Vec2::new(200.0, 500.0),
            Vec2::new(400.0, 520.0),
            Vec2::new(700.0, 560.0),
            Vec2::new(600.0, 100.0),
            Vec2::new(100.0, 100.0),
        ];
        // A respawn point near the inner corner of the base
        let from = Vec2::new(330.0, 260.0);
        for target in targets {
            let path = pathfinder.compute_path(from, target);
            assert_eq!(*path.last().unwrap(), target);
            assert_route_clear(&base, radius, from, &path);
        }

        let from = Vec2::new(400.0, 560.0);
        for target in [Vec2::new(330.0, 260.0), Vec2::new(450.0, 320.0)] {
            let path = pathfinder.compute_path(from, target);
            assert_route_clear(&base, radius, from, &path);
        }
    }

    #[test]
    fn test_out_of_bounds_goes_direct() {
        let (_, pathfinder) = default_pathfinder();
        let target = Vec2::new(-20.0, 100.0);
        assert_eq!(pathfinder.compute_path(Vec2::new(100.0, 100.0), target), vec![target]);
        let target = Vec2::new(100.0, 100.0);
        assert_eq!(pathfinder.compute_path(Vec2::new(900.0, 100.0), target), vec![target]);
    }

    #[test]
    fn test_zero_length_path() {
        let (_, pathfinder) = default_pathfinder();
        let p = Vec2::new(123.0, 45.0);
        assert_eq!(pathfinder.compute_path(p, p), vec![p]);
    }

    #[test]
    fn test_open_field_collapses_to_target() {
        let (_, pathfinder) = default_pathfinder();
        let target = Vec2::new(700.0, 80.0);
        let path = pathfinder.compute_path(Vec2::new(60.0, 70.0), target);
        assert_eq!(path, vec![target]);
    }

    #[test]
    fn test_enters_base_through_gate() {
        let (base, pathfinder) = default_pathfinder();
        assert_eq!(base.walls().len(), 5);

        let from = Vec2::new(200.0, 500.0);
        let path = pathfinder.compute_path(from, base.center);
        assert!(!path.is_empty());
        assert_eq!(*path.last().unwrap(), base.center);

        // Crosses the bottom wall line within a cell of the gap
        let y = base.center.y + base.half_height - base.wall_thickness / 2.0;
        let cell = pathfinder.grid().cell_size();
        let gap_left = Vec2::new(base.center.x - base.gate_width / 2.0 - cell, y);
        let gap_right = Vec2::new(base.center.x + base.gate_width / 2.0 + cell, y);
        assert!(crosses(&path, from, gap_left, gap_right));
    }

    #[test]
    fn test_reaches_point_beyond_gate() {
        let (base, pathfinder) = default_pathfinder();
        let gate = base.gate_position();
        assert_eq!(gate, Vec2::new(400.0, 390.0));
        let path = pathfinder.compute_path(base.center, gate);
        assert_eq!(*path.last().unwrap(), gate);
        let path = pathfinder.compute_path(Vec2::new(100.0, 550.0), gate);
        assert_eq!(*path.last().unwrap(), gate);
    }

    #[test]
    fn test_leaves_base_around_walls() {
        let (base, pathfinder) = default_pathfinder();
        let target = Vec2::new(400.0, 60.0);
        let path = pathfinder.compute_path(base.center, target);
        // Straight up is walled off, so the path needs a detour
        assert!(path.len() > 1);
        assert_eq!(*path.last().unwrap(), target);
        let mut prev = base.center;
        for &p in &path {
            assert!(pathfinder.grid().segment_clear(prev, p));
            prev = p;
        }
    }

    #[test]
    fn test_start_inside_wall_still_routes() {
        let (_, pathfinder) = default_pathfinder();
        // Standing on the top wall
        let from = Vec2::new(400.0, 230.0);
        let target = Vec2::new(400.0, 100.0);
        let path = pathfinder.compute_path(from, target);
        assert_eq!(*path.last().unwrap(), target);
        // Canonical grid untouched by the query
        assert!(!pathfinder.grid().is_walkable_at(from));
    }

    #[test]
    fn test_unreachable_falls_back_to_gate() {
        // Coarse cells swallow the gate, sealing the interior
        let settings = Settings {
            cell_size: 50.0,
            ..Default::default()
        };
        let base = Base::from_settings(&settings);
        let pathfinder = Pathfinder::from_settings(&base, &settings);

        let outside = Vec2::new(400.0, 550.0);
        let path = pathfinder.compute_path(outside, base.center);
        assert_eq!(path, vec![base.entry_gate(), base.center]);

        let path = pathfinder.compute_path(base.center, outside);
        assert_eq!(path, vec![base.gate_position(), outside]);
    }

    #[test]
    fn test_search_is_deterministic() {
        let (_, pathfinder) = default_pathfinder();
        let from = Vec2::new(50.0, 550.0);
        let to = Vec2::new(420.0, 280.0);
        assert_eq!(pathfinder.compute_path(from, to), pathfinder.compute_path(from, to));
    }

    #[test]
    fn test_simplify_removes_collinear() {
        let (_, pathfinder) = default_pathfinder();
        let points: Vec<Vec2> = (0..10).map(|i| Vec2::new(20.0 + i as f32 * 10.0, 50.0)).collect();
        let simplified = pathfinder.simplify(&points);
        assert_eq!(simplified, vec![points[0], points[9]]);
    }

    proptest! {
        #[test]
        fn prop_out_of_bounds_is_direct(
            fx in 0.0f32..800.0,
            fy in 0.0f32..600.0,
            tx in 801.0f32..2000.0,
            ty in -500.0f32..1000.0,
        ) {
            let (_, pathfinder) = default_pathfinder();
            let inside = Vec2::new(fx, fy);
            let target = Vec2::new(tx, ty);
            prop_assert_eq!(pathfinder.compute_path(inside, target), vec![target]);
            prop_assert_eq!(pathfinder.compute_path(target, inside), vec![inside]);
        }

        #[test]
        fn prop_path_ends_exactly_at_target(
            fx in 0.0f32..800.0,
            fy in 0.0f32..600.0,
            tx in 0.0f32..800.0,
            ty in 0.0f32..600.0,
        ) {
            let (_, pathfinder) = default_pathfinder();
            let target = Vec2::new(tx, ty);
            let path = pathfinder.compute_path(Vec2::new(fx, fy), target);
            prop_assert!(!path.is_empty());
            prop_assert_eq!(*path.last().unwrap(), target);
        }

        #[test]
        fn prop_path_segments_stay_walkable(
            fx in 0.0f32..800.0,
            fy in 0.0f32..600.0,
            tx in 0.0f32..800.0,
            ty in 0.0f32..600.0,
        ) {
            let (_, pathfinder) = default_pathfinder();
            let grid = pathfinder.grid();
            let from = Vec2::new(fx, fy);
            let to = Vec2::new(tx, ty);
            prop_assume!(grid.is_walkable_at(from) && grid.is_walkable_at(to));

            let path = pathfinder.compute_path(from, to);
            let mut prev = from;
            for &p in &path {
                prop_assert!(grid.segment_clear(prev, p));
                prev = p;
            }
        }

        #[test]
        fn prop_simplify_never_grows(
            coords in proptest::collection::vec((0.0f32..800.0, 0.0f32..600.0), 0..20),
        ) {
            let (_, pathfinder) = default_pathfinder();
            let points: Vec<Vec2> = coords.into_iter().map(|(x, y)| Vec2::new(x, y)).collect();
            let simplified = pathfinder.simplify(&points);
            prop_assert!(simplified.len() <= points.len());
            prop_assert_eq!(simplified.first(), points.first());
            prop_assert_eq!(simplified.last(), points.last());
        }
    }
}
