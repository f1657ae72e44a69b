//! Navigation grid for pathfinding
//!
//! Reduces a symbol grid to blocked/floor cells and computes breadth-first
//! distance maps over it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::grid::Grid;

/// Movement class of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavCell {
    Blocked,
    Floor,
}

/// Blocked/floor view of a finished map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGrid {
    width: i32,
    height: i32,
    cells: Vec<NavCell>,
}

impl NavGrid {
    /// Classify every cell of `grid` with `is_blocking`
    pub fn from_grid(grid: &Grid, is_blocking: impl Fn(char) -> bool) -> Self {
        let cells = grid
            .positions()
            .map(|p| {
                if is_blocking(grid.get_at(p)) {
                    NavCell::Blocked
                } else {
                    NavCell::Floor
                }
            })
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// `Blocked` out of bounds
    pub fn cell(&self, x: i32, y: i32) -> NavCell {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return NavCell::Blocked;
        }
        self.cells[self.index(x, y)]
    }

    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.cell(x, y) == NavCell::Blocked
    }

    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == NavCell::Floor).count()
    }

    /// 4-connected step counts from `start` to every reachable floor cell
    ///
    /// A blocked start yields a map where nothing is reachable.
    pub fn distances_from(&self, start: Position) -> DistanceMap {
        let mut steps = vec![None; self.cells.len()];
        let mut queue = VecDeque::new();

        if !self.is_blocked(start.x, start.y) {
            steps[self.index(start.x, start.y)] = Some(0);
            queue.push_back(start);
        }

        while let Some(pos) = queue.pop_front() {
            let current = steps[self.index(pos.x, pos.y)].unwrap_or(0);
            for next in pos.neighbors(false) {
                if self.is_blocked(next.x, next.y) {
                    continue;
                }
                let idx = self.index(next.x, next.y);
                if steps[idx].is_none() {
                    steps[idx] = Some(current + 1);
                    queue.push_back(next);
                }
            }
        }

        DistanceMap {
            width: self.width,
            height: self.height,
            steps,
        }
    }
}

/// Step counts from one origin; `None` marks unreachable cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    width: i32,
    height: i32,
    steps: Vec<Option<u32>>,
}

impl DistanceMap {
    /// `None` when unreachable or out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.steps[y as usize * self.width as usize + x as usize]
    }

    /// Cardinal steps from the origin to (x, y), both ends included
    ///
    /// Walks back from the target through cells one step closer each time,
    /// preferring neighbors in left, right, up, down order.
    pub fn path_to(&self, x: i32, y: i32) -> Option<Vec<Position>> {
        let mut current = Position::new(x, y);
        let mut steps = self.get(x, y)?;
        let mut path = vec![current];
        while steps > 0 {
            current = current
                .neighbors(false)
                .find(|n| self.get(n.x, n.y) == Some(steps - 1))?;
            steps -= 1;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    pub fn reachable_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_some()).count()
    }

    /// The reachable cell farthest from the origin, first in row-major order on ties
    pub fn farthest(&self) -> Option<(Position, u32)> {
        let mut best: Option<(Position, u32)> = None;
        for (i, steps) in self.steps.iter().enumerate() {
            let Some(steps) = *steps else { continue };
            if best.is_none_or(|(_, b)| steps > b) {
                let i = i as i32;
                best = Some((Position::new(i % self.width, i / self.width), steps));
            }
        }
        best
    }
}
