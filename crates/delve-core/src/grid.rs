//! Fixed-size symbol grid
//!
//! Cells are stored row-major as `char` symbols. Reads outside the grid yield
//! [`NULL`] and writes outside the grid are ignored, so generators can read
//! neighbors without bounds checks of their own.

use std::collections::VecDeque;
use std::fmt;

use hashbrown::HashSet;

use crate::geometry::Position;
use crate::selection::Selection;
use crate::tile::{BLANK, NULL};

/// A rectangular map of symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<char>,
}

impl Grid {
    /// Create a grid with every cell blank
    ///
    /// Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![BLANK; width as usize * height as usize],
        }
    }

    /// Build a grid from text rows; short rows are padded with [`NULL`]
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0) as i32;
        let height = rows.len() as i32;
        let mut cells = Vec::with_capacity(width as usize * rows.len());
        for row in rows {
            let mut len = 0;
            for c in row.as_ref().chars() {
                cells.push(c);
                len += 1;
            }
            cells.extend(std::iter::repeat_n(NULL, width as usize - len));
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells, saturating at `i32::MAX`
    pub fn area(&self) -> i32 {
        self.width.saturating_mul(self.height)
    }

    /// Length of the shorter side
    pub fn min_side(&self) -> i32 {
        self.width.min(self.height)
    }

    /// Geometric center, rounding toward the top-left
    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (y as usize) * (self.width as usize) + (x as usize))
    }

    /// Symbol at (x, y), or [`NULL`] outside the grid
    pub fn get(&self, x: i32, y: i32) -> char {
        self.index(x, y).map_or(NULL, |idx| self.cells[idx])
    }

    /// Write a symbol at (x, y); out-of-bounds writes are ignored
    pub fn set(&mut self, x: i32, y: i32, symbol: char) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = symbol;
        }
    }

    pub fn get_at(&self, pos: Position) -> char {
        self.get(pos.x, pos.y)
    }

    pub fn set_at(&mut self, pos: Position, symbol: char) {
        self.set(pos.x, pos.y, symbol);
    }

    /// Number of cells holding `symbol`
    pub fn count(&self, symbol: char) -> usize {
        self.cells.iter().filter(|&&c| c == symbol).count()
    }

    /// Change the grid size
    ///
    /// Cells inside both the old and new bounds keep their symbol, new cells
    /// are [`NULL`]. Shrinking drops data.
    pub fn resize(&mut self, width: i32, height: i32) -> &mut Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(self.get(x, y));
            }
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
        self
    }

    /// Rotate the grid 90 degrees clockwise
    pub fn rotate(&mut self) {
        let (old_w, old_h) = (self.width, self.height);
        let mut cells = Vec::with_capacity(self.cells.len());
        for y in 0..old_w {
            for x in 0..old_h {
                cells.push(self.get(y, old_h - 1 - x));
            }
        }
        self.width = old_h;
        self.height = old_w;
        self.cells = cells;
    }

    /// Paste `other` with its top-left corner at (x, y), clipped to this grid
    pub fn copy_from(&mut self, other: &Grid, x: i32, y: i32) {
        for oy in 0..other.height {
            for ox in 0..other.width {
                self.set(x + ox, y + oy, other.get(ox, oy));
            }
        }
    }

    /// Nearest cell holding `symbol`, by Euclidean distance
    ///
    /// Ties go to the first cell in row-major order.
    pub fn closest(&self, x: i32, y: i32, symbol: char) -> Option<Position> {
        let origin = Position::new(x, y);
        self.positions()
            .filter(|p| self.get_at(*p) == symbol)
            .min_by_key(|p| origin.distance_squared(*p))
    }

    /// Every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Position::new(x, y)))
    }

    /// Rows as strings, top to bottom
    pub fn rows(&self) -> Vec<String> {
        if self.width == 0 {
            return vec![String::new(); self.height as usize];
        }
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().collect())
            .collect()
    }

    /// Selection of every cell
    pub fn select(&self) -> Selection {
        Selection::all_of(self)
    }

    /// Selection of the cells connected to (x, y) that hold the same symbol
    pub fn select_contiguous(&self, x: i32, y: i32, diagonal: bool) -> Selection {
        let mut found = HashSet::new();
        if !self.in_bounds(x, y) {
            return Selection::from_positions(self, found);
        }

        let target = self.get(x, y);
        let start = Position::new(x, y);
        let mut queue = VecDeque::from([start]);
        found.insert(start);

        while let Some(pos) = queue.pop_front() {
            for next in pos.neighbors(diagonal) {
                if self.get_at(next) == target && self.in_bounds(next.x, next.y) && found.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        Selection::from_positions(self, found)
    }

    /// Text dump with coordinate rulers, for inspection and tests
    pub fn to_debug_string(&self) -> String {
        let mut s = format!("  W:{} H:{}\n\n       ", self.width, self.height);
        for x in (1..self.width).step_by(2) {
            s.push_str(&format!("{x:2}  "));
        }
        s.push_str("\n     ");
        for x in (0..self.width).step_by(2) {
            s.push_str(&format!("{x:2}  "));
        }
        s.push('\n');

        for (y, row) in self.rows().iter().enumerate() {
            s.push_str(&format!("{y:3}  |"));
            for c in row.chars() {
                s.push(if c == NULL { ' ' } else { c });
                s.push(' ');
            }
            s.push_str("|\n");
        }
        s
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_debug_string())
    }
}
