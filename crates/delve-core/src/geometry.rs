//! Grid coordinates and rectangles

use serde::{Deserialize, Serialize};

/// A cell coordinate on a grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: Position) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    pub fn distance_squared(&self, other: Position) -> i64 {
        let dx = (other.x - self.x) as i64;
        let dy = (other.y - self.y) as i64;
        dx * dx + dy * dy
    }

    /// Cell containing a world-space point, for cells `cell_size` units wide
    pub fn from_world(x: f32, y: f32, cell_size: f32) -> Self {
        Self::new((x / cell_size).floor() as i32, (y / cell_size).floor() as i32)
    }

    /// The four cardinal neighbors, optionally followed by the four diagonals
    pub fn neighbors(&self, diagonal: bool) -> impl Iterator<Item = Position> + use<> {
        const CARDINAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
        let Position { x, y } = *self;
        let cardinal: &'static [(i32, i32)] = &CARDINAL;
        let extra: &'static [(i32, i32)] = if diagonal { &DIAGONAL } else { &[] };
        cardinal
            .iter()
            .chain(extra)
            .map(move |&(dx, dy)| Position::new(x + dx, y + dy))
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle covering [x, x+w) × [y, y+h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn area(&self) -> i32 {
        self.w * self.h
    }

    /// Length of the shorter side
    pub const fn min_side(&self) -> i32 {
        if self.w < self.h { self.w } else { self.h }
    }

    /// Center cell, rounding toward the top-left
    pub const fn center(&self) -> Position {
        Position::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a cell lies inside the rectangle
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    /// Check if the two rectangles share at least one cell
    pub const fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
