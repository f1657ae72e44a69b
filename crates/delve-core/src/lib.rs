//! delve-core: Procedural dungeon generation
//!
//! This crate builds 2D tile maps from a symbol grid: binary space
//! partitioning with a room graph, drunk-walk caves and scattered random
//! rooms, all driven through a small selection algebra over grid cells.
//! It performs no I/O.

pub mod bsp;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod line;
pub mod nav;
pub mod rooms;
pub mod selection;
pub mod tile;
pub mod walk;
pub mod world;

mod rng;

pub use bsp::{BspLayout, BspOptions, BspRoom, RoomGraph, RoomId, generate_bsp};
pub use config::{GenerationKind, WorldConfig};
pub use error::{ConfigError, WorldError};
pub use geometry::{Position, Rect};
pub use grid::Grid;
pub use line::draw_line;
pub use nav::{DistanceMap, NavCell, NavGrid};
pub use rng::MapRng;
pub use rooms::{RandomRoomsOptions, generate_random_rooms};
pub use selection::Selection;
pub use tile::{BLANK, NULL, Tile, TileFlags, symbol_blocks};
pub use walk::{DrunkWalkOptions, generate_drunk_walk};
pub use world::{MapExport, Marker, MarkerKind, World, WorldMap};
