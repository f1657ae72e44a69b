//! Random room placement
//!
//! Fills the grid with wall, then carves rectangular rooms around random
//! centers and optionally joins consecutive rooms with corridors.

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::grid::Grid;
use crate::line::draw_line;
use crate::rng::MapRng;
use crate::tile::Tile;

/// Random-rooms settings
///
/// Room sizes are half-extents: a room with width 3 spans up to 2 cells on
/// each side of its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomRoomsOptions {
    pub empty: char,
    pub wall: char,
    pub room_count: u32,
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
    /// Draw a corridor from each room center to the next
    pub connect_rooms: bool,
}

impl Default for RandomRoomsOptions {
    fn default() -> Self {
        Self {
            empty: Tile::Floor.symbol(),
            wall: Tile::Wall.symbol(),
            room_count: 10,
            min_width: 3,
            min_height: 3,
            max_width: 5,
            max_height: 5,
            connect_rooms: true,
        }
    }
}

/// Carve random rooms into `grid`, returning their centers in placement order
pub fn generate_random_rooms(
    grid: &mut Grid,
    options: &RandomRoomsOptions,
    rng: &mut MapRng,
) -> Vec<Position> {
    grid.select().fill(grid, options.wall);

    let mut centers = Vec::with_capacity(options.room_count as usize);
    for _ in 0..options.room_count {
        let center = Position::new(rng.below_i32(grid.width()), rng.below_i32(grid.height()));
        let w = options.min_width + rng.below_i32(options.max_width - options.min_width);
        let h = options.min_height + rng.below_i32(options.max_height - options.min_height);

        grid.select()
            .filter_by(|x, y| (center.x - x).abs() < w && (center.y - y).abs() < h)
            .fill(grid, options.empty);

        centers.push(center);
    }

    if options.connect_rooms {
        for pair in centers.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            draw_line(grid, a.x, a.y, b.x, b.y, options.empty, 1, true);
        }
    }

    centers
}
