//! Output tile vocabulary
//!
//! Generators work on raw `char` symbols so callers can pick their own wall
//! and door glyphs; the finished map is expressed in this fixed set.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Symbol of a freshly created grid cell (open floor)
pub const BLANK: char = ' ';

/// Symbol returned for cells outside the grid and used to pad resized grids
pub const NULL: char = '\0';

bitflags! {
    /// Properties collaborators care about when consuming a finished map
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TileFlags: u8 {
        const BLOCKING = 0x01;
        const WALKABLE = 0x02;
        const SPAWN = 0x04;
        const PASSAGE = 0x08;
    }
}

/// Terrain type of a finished map cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Tile {
    Wall,
    #[default]
    Floor,
    AltFloor,
    Door,
    PlayerSpawn,
    EnemySpawn,
}

impl Tile {
    /// Get the map symbol for this tile
    pub const fn symbol(&self) -> char {
        match self {
            Tile::Wall => 'x',
            Tile::Floor => BLANK,
            Tile::AltFloor => '.',
            Tile::Door => '#',
            Tile::PlayerSpawn => 'P',
            Tile::EnemySpawn => 'e',
        }
    }

    /// Look up the tile for a map symbol
    pub const fn from_symbol(symbol: char) -> Option<Tile> {
        match symbol {
            'x' => Some(Tile::Wall),
            BLANK => Some(Tile::Floor),
            '.' => Some(Tile::AltFloor),
            '#' => Some(Tile::Door),
            'P' => Some(Tile::PlayerSpawn),
            'e' => Some(Tile::EnemySpawn),
            _ => None,
        }
    }

    pub const fn flags(&self) -> TileFlags {
        match self {
            Tile::Wall => TileFlags::BLOCKING,
            Tile::Floor | Tile::AltFloor => TileFlags::WALKABLE,
            Tile::Door => TileFlags::WALKABLE.union(TileFlags::PASSAGE),
            Tile::PlayerSpawn | Tile::EnemySpawn => TileFlags::WALKABLE.union(TileFlags::SPAWN),
        }
    }

    /// Whether this tile blocks movement
    pub const fn is_blocking(&self) -> bool {
        self.flags().contains(TileFlags::BLOCKING)
    }
}

/// Blocking test for raw symbols: walls and anything outside the vocabulary
pub fn symbol_blocks(symbol: char) -> bool {
    Tile::from_symbol(symbol).is_none_or(|tile| tile.is_blocking())
}
