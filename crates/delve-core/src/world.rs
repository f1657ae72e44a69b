//! World map driver
//!
//! Runs one generator over a fresh grid, trims and decorates the result, and
//! hands out what the rest of the game consumes: the symbol grid, spawn
//! markers and a navigation grid.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::bsp::{RoomGraph, RoomId, generate_bsp};
use crate::config::{GenerationKind, WorldConfig};
use crate::error::WorldError;
use crate::geometry::{Position, Rect};
use crate::grid::Grid;
use crate::nav::NavGrid;
use crate::rng::MapRng;
use crate::rooms::generate_random_rooms;
use crate::tile::{Tile, symbol_blocks};
use crate::walk::generate_drunk_walk;

/// What an entity factory should create at a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    Wall,
    PlayerSpawn,
    EnemySpawn,
}

/// One entity to spawn, in grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Position,
    pub kind: MarkerKind,
}

impl Marker {
    /// Top-left corner of the cell in world units
    pub fn world_position(&self, cell_size: f32) -> (f32, f32) {
        (
            self.position.x as f32 * cell_size,
            self.position.y as f32 * cell_size,
        )
    }
}

/// Serializable snapshot of a finished map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapExport {
    pub width: i32,
    pub height: i32,
    pub kind: GenerationKind,
    pub seed: u64,
    pub spawn: Position,
    pub rows: Vec<String>,
    /// BSP room rectangles after pruning; empty for other generators
    pub rooms: Vec<Rect>,
    pub start_room: Option<usize>,
}

/// Entry point for map generation
pub struct World;

impl World {
    /// Validate `config` and generate a complete map
    pub fn generate(config: &WorldConfig) -> Result<WorldMap, WorldError> {
        config.validate()?;

        let mut rng = MapRng::from_optional_seed(config.seed);
        let mut grid = Grid::new(config.width, config.height);
        debug!(
            "generating {} map {}x{} with seed {}",
            config.kind,
            config.width,
            config.height,
            rng.seed()
        );

        let mut rooms = None;
        let mut start_room = None;
        let spawn = match config.kind {
            GenerationKind::Bsp => {
                let layout = generate_bsp(&mut grid, &config.bsp, &mut rng);
                let (graph, start) = prune_rooms(&mut grid, layout.graph, config)?;
                let spawn = graph.get(start).map(|room| room.center()).unwrap_or_default();
                rooms = Some(graph);
                start_room = Some(start);
                spawn
            }
            GenerationKind::DrunkWalk => generate_drunk_walk(&mut grid, &config.drunk_walk, &mut rng),
            GenerationKind::RandomRooms => {
                let centers = generate_random_rooms(&mut grid, &config.random_rooms, &mut rng);
                place_chokepoint_doors(&mut grid, config, &mut rng);
                centers.first().copied().unwrap_or_default()
            }
        };

        let spawn = decorate(&mut grid, spawn, config, &mut rng);

        let map = WorldMap {
            grid,
            spawn,
            kind: config.kind,
            seed: rng.seed(),
            rooms,
            start_room,
        };
        info!(
            "generated {} map {}x{} (seed {}, {} markers)",
            map.kind,
            map.grid.width(),
            map.grid.height(),
            map.seed,
            map.markers().len()
        );
        Ok(map)
    }
}

/// Wall off rooms too far from the start room and drop them from the graph
///
/// The start room is the one whose center is nearest the grid center.
/// Returns the compacted graph and the start room's id in it.
fn prune_rooms(
    grid: &mut Grid,
    mut graph: RoomGraph,
    config: &WorldConfig,
) -> Result<(RoomGraph, RoomId), WorldError> {
    let start = graph.nearest_to(grid.center()).ok_or(WorldError::NoRooms)?;

    let ids: Vec<RoomId> = graph.rooms().map(|(id, _)| id).collect();
    let mut pruned = 0;
    for id in ids {
        let hops = graph.count_hops(id, start);
        if hops.is_some_and(|h| h <= config.prune_hops) {
            continue;
        }
        if let Some(room) = graph.get(id) {
            // Right and bottom edges too, to seal doors into the dropped room
            let r = room.rect;
            grid.select()
                .filter_by_area(r.x, r.y, r.w + 1, r.h + 1)
                .fill(grid, config.bsp.wall);
        }
        graph.discard(id);
        pruned += 1;
    }

    let (graph, remap) = graph.compact();
    let start = remap[start.0].ok_or(WorldError::NoRooms)?;
    debug!("pruned {pruned} rooms, {} remain", graph.len());
    Ok((graph, start))
}

/// Turn some one-wide gaps between walls into doors
fn place_chokepoint_doors(grid: &mut Grid, config: &WorldConfig, rng: &mut MapRng) {
    let empty = config.random_rooms.empty;
    let wall = config.random_rooms.wall;
    let gaps = grid.select().filter_by_symbol(grid, empty).filter_by(|x, y| {
        (grid.get(x - 1, y) == wall && grid.get(x + 1, y) == wall)
            || (grid.get(x, y - 1) == wall && grid.get(x, y + 1) == wall)
    });
    let doors = gaps.filter_by_percentage(rng, config.chokepoint_door_chance);
    debug!("placing {} of {} chokepoint doors", doors.len(), gaps.len());
    doors.fill(grid, Tile::Door.symbol());
}

/// Close the border, place the player and sprinkle floor variety and enemies
///
/// Returns where the player ended up. A spawn that falls on the border moves
/// to the nearest floor cell.
fn decorate(grid: &mut Grid, spawn: Position, config: &WorldConfig, rng: &mut MapRng) -> Position {
    let wall = Tile::Wall.symbol();
    let floor = Tile::Floor.symbol();

    let all = grid.select();
    let inner = all.filter_by_area(1, 1, grid.width() - 2, grid.height() - 2);
    all.remove(&inner).fill(grid, wall);

    let spawn = if inner.contains(spawn.x, spawn.y) {
        spawn
    } else {
        grid.closest(spawn.x, spawn.y, floor).unwrap_or(grid.center())
    };
    grid.set_at(spawn, Tile::PlayerSpawn.symbol());

    grid.select()
        .filter_by_symbol(grid, floor)
        .filter_by_percentage(rng, config.alt_floor_chance)
        .fill(grid, Tile::AltFloor.symbol());
    grid.select()
        .filter_by_symbol(grid, floor)
        .filter_by_percentage(rng, config.enemy_chance)
        .fill(grid, Tile::EnemySpawn.symbol());

    spawn
}

/// A finished map
#[derive(Debug, Clone)]
pub struct WorldMap {
    grid: Grid,
    spawn: Position,
    kind: GenerationKind,
    seed: u64,
    rooms: Option<RoomGraph>,
    start_room: Option<RoomId>,
}

impl WorldMap {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Player spawn cell
    pub fn spawn(&self) -> Position {
        self.spawn
    }

    pub fn kind(&self) -> GenerationKind {
        self.kind
    }

    /// Seed that reproduces this map
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pruned room graph, for BSP maps
    pub fn rooms(&self) -> Option<&RoomGraph> {
        self.rooms.as_ref()
    }

    pub fn start_room(&self) -> Option<RoomId> {
        self.start_room
    }

    /// Walls, player and enemy spawns, row by row
    pub fn markers(&self) -> Vec<Marker> {
        self.grid
            .positions()
            .filter_map(|position| {
                let kind = match Tile::from_symbol(self.grid.get_at(position))? {
                    Tile::Wall => MarkerKind::Wall,
                    Tile::PlayerSpawn => MarkerKind::PlayerSpawn,
                    Tile::EnemySpawn => MarkerKind::EnemySpawn,
                    _ => return None,
                };
                Some(Marker { position, kind })
            })
            .collect()
    }

    pub fn nav_grid(&self) -> NavGrid {
        NavGrid::from_grid(&self.grid, symbol_blocks)
    }

    pub fn to_debug_string(&self) -> String {
        self.grid.to_debug_string()
    }

    pub fn export(&self) -> MapExport {
        MapExport {
            width: self.grid.width(),
            height: self.grid.height(),
            kind: self.kind,
            seed: self.seed,
            spawn: self.spawn,
            rows: self.grid.rows(),
            rooms: self
                .rooms
                .iter()
                .flat_map(|graph| graph.rooms().map(|(_, room)| room.rect))
                .collect(),
            start_room: self.start_room.map(|id| id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(kind: GenerationKind, seed: u64) -> WorldConfig {
        WorldConfig {
            width: 40,
            height: 30,
            kind,
            seed: Some(seed),
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_each_kind_has_one_player() {
        for kind in [GenerationKind::Bsp, GenerationKind::DrunkWalk, GenerationKind::RandomRooms] {
            let map = World::generate(&config(kind, 3)).unwrap();
            assert_eq!(map.grid().count('P'), 1, "{kind}");
            assert_eq!(map.grid().get_at(map.spawn()), 'P');
        }
    }

    #[test]
    fn test_border_is_walled() {
        let map = World::generate(&config(GenerationKind::DrunkWalk, 11)).unwrap();
        let grid = map.grid();
        for x in 0..grid.width() {
            assert_eq!(grid.get(x, 0), 'x');
            assert_eq!(grid.get(x, grid.height() - 1), 'x');
        }
        for y in 0..grid.height() {
            assert_eq!(grid.get(0, y), 'x');
            assert_eq!(grid.get(grid.width() - 1, y), 'x');
        }
    }

    #[test]
    fn test_same_seed_same_map() {
        let a = World::generate(&config(GenerationKind::Bsp, 99)).unwrap();
        let b = World::generate(&config(GenerationKind::Bsp, 99)).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.export(), b.export());
    }

    #[test]
    fn test_bsp_start_room_holds_spawn() {
        let map = World::generate(&config(GenerationKind::Bsp, 5)).unwrap();
        let graph = map.rooms().unwrap();
        let start = map.start_room().unwrap();
        assert_eq!(graph.get(start).unwrap().center(), map.spawn());
        assert_eq!(graph.live_count(), graph.len());
    }

    #[test]
    fn test_non_bsp_has_no_rooms() {
        let map = World::generate(&config(GenerationKind::RandomRooms, 5)).unwrap();
        assert!(map.rooms().is_none());
        assert!(map.start_room().is_none());
        assert!(map.export().rooms.is_empty());
    }

    #[test]
    fn test_markers_match_grid() {
        let map = World::generate(&config(GenerationKind::RandomRooms, 8)).unwrap();
        let markers = map.markers();
        let walls = markers.iter().filter(|m| m.kind == MarkerKind::Wall).count();
        let enemies = markers.iter().filter(|m| m.kind == MarkerKind::EnemySpawn).count();
        assert_eq!(walls, map.grid().count('x'));
        assert_eq!(enemies, map.grid().count('e'));
        assert_eq!(
            markers.iter().filter(|m| m.kind == MarkerKind::PlayerSpawn).count(),
            1
        );
    }

    #[test]
    fn test_world_position_scales() {
        let marker = Marker {
            position: Position::new(3, 2),
            kind: MarkerKind::Wall,
        };
        assert_eq!(marker.world_position(16.0), (48.0, 32.0));
    }

    #[test]
    fn test_world_position_maps_back_to_cell() {
        let map = World::generate(&config(GenerationKind::Bsp, 17)).unwrap();
        for marker in map.markers().iter().take(50) {
            let (x, y) = marker.world_position(16.0);
            assert_eq!(Position::from_world(x + 8.0, y + 8.0, 16.0), marker.position);
        }
    }

    #[test]
    fn test_enemies_can_path_to_spawn() {
        let map = World::generate(&config(GenerationKind::DrunkWalk, 6)).unwrap();
        let distances = map.nav_grid().distances_from(map.spawn());
        let (far, steps) = distances.farthest().unwrap();
        let path = distances.path_to(far.x, far.y).unwrap();
        assert_eq!(path.len(), steps as usize + 1);
        assert_eq!(path[0], map.spawn());
        assert!(path.windows(2).all(|w| w[0].distance_squared(w[1]) == 1));
    }

    #[test]
    fn test_nav_grid_blocks_walls_only() {
        let map = World::generate(&config(GenerationKind::Bsp, 21)).unwrap();
        let nav = map.nav_grid();
        let area = (map.grid().width() * map.grid().height()) as usize;
        assert_eq!(nav.floor_count(), area - map.grid().count('x'));
        assert!(!nav.is_blocked(map.spawn().x, map.spawn().y));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = WorldConfig {
            height: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(World::generate(&bad), Err(WorldError::Config(_))));
    }

    #[test]
    fn test_no_decoration_when_chances_zero() {
        let cfg = WorldConfig {
            alt_floor_chance: 0.0,
            enemy_chance: 0.0,
            ..config(GenerationKind::DrunkWalk, 4)
        };
        let map = World::generate(&cfg).unwrap();
        assert_eq!(map.grid().count('.'), 0);
        assert_eq!(map.grid().count('e'), 0);
    }
}
