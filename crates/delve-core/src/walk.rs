//! Drunk-walk cave carving
//!
//! A single walker wanders the grid in random cardinal steps, carving a 2×2
//! block wherever it stands, until enough of the map is open.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::grid::Grid;
use crate::rng::MapRng;
use crate::selection::Selection;
use crate::tile::Tile;

/// Walk length cap, per grid cell
const STEPS_PER_CELL: u64 = 10_000;

const STEPS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Drunk-walk settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrunkWalkOptions {
    /// Symbol carved by the walker
    pub empty: char,
    /// Symbol the grid starts filled with
    pub wall: char,
    /// Fraction of the grid (0, 1] to carve before stopping
    pub fill_target: f32,
}

impl Default for DrunkWalkOptions {
    fn default() -> Self {
        Self {
            empty: Tile::Floor.symbol(),
            wall: Tile::Wall.symbol(),
            fill_target: 0.8,
        }
    }
}

/// Carve a cave into `grid` and return where the walk started
///
/// Only cells that actually change from wall to empty count toward the
/// target.
pub fn generate_drunk_walk(grid: &mut Grid, options: &DrunkWalkOptions, rng: &mut MapRng) -> Position {
    grid.select().fill(grid, options.wall);
    if grid.area() == 0 {
        return Position::default();
    }

    let start = Position::new(rng.below_i32(grid.width()), rng.below_i32(grid.height()));
    let area = grid.area() as f32;
    let target = options.fill_target.clamp(0.0, 1.0);
    let max_steps = (grid.area() as u64).saturating_mul(STEPS_PER_CELL);

    let mut walker = start;
    let mut carved = 0usize;
    let mut steps = 0u64;

    loop {
        let block = Selection::area(grid, walker.x, walker.y, 2, 2).filter_by_symbol(grid, options.wall);
        if !block.is_empty() {
            carved += block.len();
            block.fill(grid, options.empty);
        }

        if carved as f32 / area >= target {
            break;
        }

        steps += 1;
        if steps >= max_steps {
            warn!(
                "drunk walk: stopped after {steps} steps at {:.2} of target {target:.2}",
                carved as f32 / area
            );
            break;
        }

        let (dx, dy) = STEPS[rng.below(4) as usize];
        walker.x = (walker.x + dx).clamp(0, grid.width() - 1);
        walker.y = (walker.y + dy).clamp(0, grid.height() - 1);
    }

    debug!("drunk walk: carved {carved} cells in {steps} steps from {start:?}");
    start
}
