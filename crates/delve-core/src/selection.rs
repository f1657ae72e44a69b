//! Cell selections
//!
//! A [`Selection`] is a set of in-bounds positions over a grid. Filters and
//! set operations return new selections and leave the receiver untouched;
//! each call copies the set, so every operation is O(selection size).
//!
//! A selection remembers only its grid's bounds. Operations that look at
//! cell contents borrow the grid, and [`Selection::fill`] borrows it mutably.

use hashbrown::HashSet;

use crate::geometry::Position;
use crate::grid::Grid;
use crate::rng::MapRng;

/// A set of grid positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    width: i32,
    height: i32,
    cells: HashSet<Position>,
}

impl Selection {
    /// Every cell of `grid`
    pub fn all_of(grid: &Grid) -> Self {
        Self::none_of(grid).all()
    }

    /// An empty selection over `grid`
    pub fn none_of(grid: &Grid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: HashSet::new(),
        }
    }

    /// The cells of [x, x+w) × [y, y+h) that lie on `grid`
    pub fn area(grid: &Grid, x: i32, y: i32, w: i32, h: i32) -> Self {
        let mut selection = Self::none_of(grid);
        for cy in y..y + h {
            for cx in x..x + w {
                selection.add_position(cx, cy);
            }
        }
        selection
    }

    /// Wrap a set of positions, dropping any outside `grid`
    pub fn from_positions(grid: &Grid, positions: impl IntoIterator<Item = Position>) -> Self {
        let mut selection = Self::none_of(grid);
        for p in positions {
            selection.add_position(p.x, p.y);
        }
        selection
    }

    /// Every cell within the same bounds
    pub fn all(&self) -> Self {
        let mut cells = HashSet::with_capacity((self.width * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                cells.insert(Position::new(x, y));
            }
        }
        Self {
            cells,
            ..self.none()
        }
    }

    /// No cells, same bounds
    pub fn none(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }

    /// Positions sorted row-major
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<_> = self.cells.iter().copied().collect();
        positions.sort_unstable_by_key(|p| (p.y, p.x));
        positions
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Keep the positions for which `keep(x, y)` is true
    pub fn filter_by<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(i32, i32) -> bool,
    {
        Self {
            cells: self.cells.iter().copied().filter(|p| keep(p.x, p.y)).collect(),
            ..self.none()
        }
    }

    /// Keep the positions whose cell holds `symbol`
    pub fn filter_by_symbol(&self, grid: &Grid, symbol: char) -> Self {
        self.filter_by(|x, y| grid.get(x, y) == symbol)
    }

    /// Keep the positions inside [x, x+w) × [y, y+h)
    pub fn filter_by_area(&self, x: i32, y: i32, w: i32, h: i32) -> Self {
        self.filter_by(|cx, cy| cx >= x && cy >= y && cx < x + w && cy < y + h)
    }

    /// Keep each position independently with the given probability
    ///
    /// Positions are visited in row-major order so a seeded stream always
    /// makes the same picks.
    pub fn filter_by_percentage(&self, rng: &mut MapRng, probability: f32) -> Self {
        let cells = self
            .positions()
            .into_iter()
            .filter(|_| rng.chance(probability))
            .collect();
        Self {
            cells,
            ..self.none()
        }
    }

    /// Keep the positions with at least `count` neighbors holding `symbol`
    ///
    /// Neighbors are the 4 cardinal cells, plus the diagonals when
    /// `diagonals` is set. With `at_most`, keeps positions with no more than
    /// `count` such neighbors instead.
    pub fn filter_by_neighbor(
        &self,
        grid: &Grid,
        symbol: char,
        count: usize,
        diagonals: bool,
        at_most: bool,
    ) -> Self {
        self.filter_by(|x, y| {
            let n = Position::new(x, y)
                .neighbors(diagonals)
                .filter(|p| grid.get_at(*p) == symbol)
                .count();
            if at_most { n <= count } else { n >= count }
        })
    }

    /// Union with `other`
    pub fn add(&self, other: &Selection) -> Self {
        let mut selection = self.clone();
        for p in &other.cells {
            selection.add_position(p.x, p.y);
        }
        selection
    }

    /// Difference with `other`
    pub fn remove(&self, other: &Selection) -> Self {
        self.filter_by(|x, y| !other.contains(x, y))
    }

    /// Every in-bounds cell not in this selection
    pub fn invert(&self) -> Self {
        self.all().filter_by(|x, y| !self.contains(x, y))
    }

    /// Grow by `distance` rings, or shrink when `distance` is negative
    ///
    /// Growing adds the 4-neighbors (8 with `diagonal`) of every cell.
    /// Shrinking drops every cell with at least one unselected neighbor in
    /// the same neighborhood. Each ring is computed from the previous ring's
    /// snapshot.
    pub fn expand(&self, distance: i32, diagonal: bool) -> Self {
        let mut selection = self.clone();
        for _ in 0..distance.unsigned_abs() {
            let snapshot = selection.clone();
            if distance > 0 {
                for p in &snapshot.cells {
                    for n in p.neighbors(diagonal) {
                        selection.add_position(n.x, n.y);
                    }
                }
            } else {
                selection = snapshot.filter_by(|x, y| {
                    Position::new(x, y)
                        .neighbors(diagonal)
                        .all(|n| snapshot.contains(n.x, n.y))
                });
            }
        }
        selection
    }

    /// Write `symbol` into every selected cell of `grid`
    pub fn fill(&self, grid: &mut Grid, symbol: char) -> &Self {
        for p in &self.cells {
            grid.set(p.x, p.y, symbol);
        }
        self
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.cells.contains(&Position::new(x, y))
    }

    /// Check if any selected cell holds `symbol`
    pub fn contains_symbol(&self, grid: &Grid, symbol: char) -> bool {
        self.cells.iter().any(|p| grid.get_at(*p) == symbol)
    }

    /// Up to `count` positions, in row-major order
    pub fn select(&self, count: usize) -> Vec<Position> {
        let mut positions = self.positions();
        positions.truncate(count);
        positions
    }

    /// Add one position in place; out-of-bounds positions are ignored
    pub fn add_position(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            self.cells.insert(Position::new(x, y));
        }
    }

    /// Remove one position in place
    pub fn remove_position(&mut self, x: i32, y: i32) {
        self.cells.remove(&Position::new(x, y));
    }
}
