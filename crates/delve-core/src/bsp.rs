//! Binary space partition generation
//!
//! Recursively splits the grid with one-cell walls, then opens one doorway
//! per room wall and records which rooms each doorway joins. Walls always sit
//! on a room's top row and left column; the bottom and right edges belong to
//! the neighboring rooms.
//!
//! Rooms live in a [`RoomGraph`] arena and refer to each other by
//! [`RoomId`], so pruning can disconnect and drop rooms without dangling
//! references.

use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Rect};
use crate::grid::Grid;
use crate::line::draw_line;
use crate::rng::MapRng;
use crate::selection::Selection;
use crate::tile::{BLANK, NULL, Tile};

/// Each split attempt budget is this many times the requested split count
pub const ATTEMPTS_PER_SPLIT: u32 = 10;

/// Chance that a split attempt targets a random room instead of the largest
const RANDOM_PICK_CHANCE: f32 = 0.2;

/// BSP generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BspOptions {
    /// Symbol for partition walls
    pub wall: char,
    /// Symbol for doorways
    pub door: char,
    /// How many successful splits to aim for
    pub split_count: u32,
    /// Rooms whose shorter side would be at or below this are never created
    pub minimum_room_size: i32,
}

impl Default for BspOptions {
    fn default() -> Self {
        Self {
            wall: Tile::Wall.symbol(),
            door: Tile::Door.symbol(),
            split_count: 10,
            minimum_room_size: 4,
        }
    }
}

/// Index of a room inside its [`RoomGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

/// A room produced by BSP generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BspRoom {
    pub rect: Rect,
    connected: Vec<RoomId>,
    /// Hop counting never passes through a room with this cleared
    pub traversible: bool,
    discarded: bool,
}

impl BspRoom {
    fn new(rect: Rect) -> Self {
        Self {
            rect,
            connected: Vec::new(),
            traversible: true,
            discarded: false,
        }
    }

    /// Rooms sharing a doorway with this one
    pub fn connected(&self) -> &[RoomId] {
        &self.connected
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    pub fn center(&self) -> Position {
        self.rect.center()
    }
}

/// Undirected room adjacency graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomGraph {
    rooms: Vec<BspRoom>,
}

impl RoomGraph {
    /// A graph of unconnected rooms
    pub fn new(rects: impl IntoIterator<Item = Rect>) -> Self {
        Self {
            rooms: rects.into_iter().map(BspRoom::new).collect(),
        }
    }

    /// Arena size, including discarded rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, id: RoomId) -> Option<&BspRoom> {
        self.rooms.get(id.0)
    }

    /// Live (not discarded) rooms with their ids
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &BspRoom)> {
        self.rooms
            .iter()
            .enumerate()
            .filter(|(_, room)| !room.discarded)
            .map(|(i, room)| (RoomId(i), room))
    }

    pub fn live_count(&self) -> usize {
        self.rooms().count()
    }

    /// Link two rooms; repeated links and self links are ignored
    pub fn connect(&mut self, a: RoomId, b: RoomId) {
        if a == b || a.0 >= self.rooms.len() || b.0 >= self.rooms.len() {
            return;
        }
        if self.rooms[a.0].connected.contains(&b) {
            return;
        }
        self.rooms[a.0].connected.push(b);
        self.rooms[b.0].connected.push(a);
    }

    pub fn are_connected(&self, a: RoomId, b: RoomId) -> bool {
        self.get(a).is_some_and(|room| room.connected.contains(&b))
    }

    pub fn set_traversible(&mut self, id: RoomId, traversible: bool) {
        if let Some(room) = self.rooms.get_mut(id.0) {
            room.traversible = traversible;
        }
    }

    /// Breadth-first hop count from `from` to `to`
    ///
    /// Returns `None` when `to` cannot be reached. Non-traversible rooms can
    /// be arrived at but are never passed through.
    pub fn count_hops(&self, from: RoomId, to: RoomId) -> Option<usize> {
        self.hops_avoiding(from, to, None)
    }

    fn hops_avoiding(&self, from: RoomId, to: RoomId, avoid: Option<RoomId>) -> Option<usize> {
        if from.0 >= self.rooms.len() || to.0 >= self.rooms.len() {
            return None;
        }

        let mut seen = vec![false; self.rooms.len()];
        let mut queue = VecDeque::from([(from, 0)]);
        seen[from.0] = true;

        while let Some((id, hops)) = queue.pop_front() {
            if id == to {
                return Some(hops);
            }
            let room = &self.rooms[id.0];
            if !room.traversible || avoid == Some(id) {
                continue;
            }
            for &next in &room.connected {
                if let Some(visited) = seen.get_mut(next.0)
                    && !*visited
                {
                    *visited = true;
                    queue.push_back((next, hops + 1));
                }
            }
        }

        None
    }

    /// Whether the room is a cut vertex between its own neighbors
    ///
    /// A room with exactly one neighbor, or with a neighbor that hangs off it
    /// alone, is always necessary. Otherwise it is necessary when some pair
    /// of its neighbors cannot reach each other without passing through it.
    pub fn necessary(&self, id: RoomId) -> bool {
        let Some(room) = self.get(id) else {
            return false;
        };
        let neighbors = &room.connected;
        if neighbors.len() == 1 {
            return true;
        }

        for &neighbor in neighbors {
            if self.get(neighbor).is_none_or(|n| n.connected.len() <= 1) {
                return true;
            }
            for &other in neighbors {
                if other == neighbor {
                    continue;
                }
                if self.hops_avoiding(neighbor, other, Some(id)).is_none() {
                    return true;
                }
            }
        }

        false
    }

    /// Remove every edge touching `id`, on both ends
    pub fn disconnect(&mut self, id: RoomId) {
        let Some(room) = self.rooms.get_mut(id.0) else {
            return;
        };
        let neighbors = std::mem::take(&mut room.connected);
        for neighbor in neighbors {
            if let Some(room) = self.rooms.get_mut(neighbor.0) {
                room.connected.retain(|&c| c != id);
            }
        }
    }

    /// Disconnect the room and mark it dropped
    pub fn discard(&mut self, id: RoomId) {
        self.disconnect(id);
        if let Some(room) = self.rooms.get_mut(id.0) {
            room.discarded = true;
        }
    }

    /// Rebuild the arena without discarded rooms
    ///
    /// Returns the new graph and, for every old id, its new id if it survived.
    pub fn compact(&self) -> (RoomGraph, Vec<Option<RoomId>>) {
        let mut remap = vec![None; self.rooms.len()];
        let mut rooms = Vec::with_capacity(self.rooms.len());
        for (i, room) in self.rooms.iter().enumerate() {
            if !room.discarded {
                remap[i] = Some(RoomId(rooms.len()));
                rooms.push(room.clone());
            }
        }
        for room in &mut rooms {
            room.connected = room
                .connected
                .iter()
                .filter_map(|c| remap.get(c.0).copied().flatten())
                .collect();
        }
        (RoomGraph { rooms }, remap)
    }

    /// Live room whose center is closest to `target`
    pub fn nearest_to(&self, target: Position) -> Option<RoomId> {
        self.rooms()
            .min_by_key(|(_, room)| room.center().distance_squared(target))
            .map(|(id, _)| id)
    }

    /// Live rooms whose rectangle shares a cell with `area`
    fn overlapping(&self, area: &Rect) -> Vec<RoomId> {
        self.rooms()
            .filter(|(_, room)| room.rect.overlaps(area))
            .map(|(id, _)| id)
            .collect()
    }
}

/// Result of [`generate_bsp`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BspLayout {
    pub graph: RoomGraph,
    pub splits_requested: u32,
    /// Can fall short of the request when the attempt budget runs out
    pub splits_achieved: u32,
}

/// Partition `grid` into walled rooms joined by doorways
///
/// The grid is cleared to blank first.
pub fn generate_bsp(grid: &mut Grid, options: &BspOptions, rng: &mut MapRng) -> BspLayout {
    grid.select().fill(grid, BLANK);

    let mut rooms = vec![Rect::new(0, 0, grid.width(), grid.height())];
    let max_attempts = options.split_count.saturating_mul(ATTEMPTS_PER_SPLIT);
    let mut attempts = 0;
    let mut achieved = 0;

    while achieved < options.split_count && attempts < max_attempts {
        attempts += 1;

        // Largest first; ties keep insertion order
        rooms.sort_by(|a, b| b.min_side().cmp(&a.min_side()));
        let mut pick = rng.below(rooms.len() as u32) as usize;
        if rng.unit() >= RANDOM_PICK_CHANCE {
            pick = 0;
        }

        if let Some((a, b)) = split_room(grid, rooms[pick], options, rng) {
            rooms.remove(pick);
            rooms.push(a);
            rooms.push(b);
            achieved += 1;
        }
    }

    if achieved < options.split_count {
        debug!(
            "bsp: achieved {achieved} of {} splits after {attempts} attempts",
            options.split_count
        );
    }

    let mut graph = RoomGraph::new(rooms);
    place_doors(grid, &mut graph, options, rng);

    BspLayout {
        graph,
        splits_requested: options.split_count,
        splits_achieved: achieved,
    }
}

/// Try to cut `parent` in two, drawing the dividing wall on success
fn split_room(
    grid: &mut Grid,
    parent: Rect,
    options: &BspOptions,
    rng: &mut MapRng,
) -> Option<(Rect, Rect)> {
    let mut vertical = rng.unit() >= 0.5;
    if parent.w > parent.h * 2 {
        vertical = true;
    } else if parent.h > parent.w * 2 {
        vertical = false;
    }

    let fraction = 0.2 + rng.unit() * 0.6;

    // The wall runs along the first column/row of `b`; `guard` also covers
    // the cell just past the wall's far end, where it meets the next wall.
    let (a, b, guard) = if vertical {
        let cut = (parent.w as f32 * fraction) as i32;
        (
            Rect::new(parent.x, parent.y, cut, parent.h),
            Rect::new(parent.x + cut, parent.y, parent.w - cut, parent.h),
            Rect::new(parent.x + cut, parent.y, 1, parent.h + 1),
        )
    } else {
        let cut = (parent.h as f32 * fraction) as i32;
        (
            Rect::new(parent.x, parent.y, parent.w, cut),
            Rect::new(parent.x, parent.y + cut, parent.w, parent.h - cut),
            Rect::new(parent.x, parent.y + cut, parent.w + 1, 1),
        )
    };

    if a.min_side() <= options.minimum_room_size || b.min_side() <= options.minimum_room_size {
        return None;
    }

    let door_matters = options.door != options.wall && options.door != NULL;
    if door_matters
        && Selection::area(grid, guard.x, guard.y, guard.w, guard.h).contains_symbol(grid, options.door)
    {
        return None;
    }

    if vertical {
        draw_line(grid, b.x, b.y, b.x, b.bottom() - 1, options.wall, 1, false);
    } else {
        draw_line(grid, b.x, b.y, b.right() - 1, b.y, options.wall, 1, false);
    }

    Some((a, b))
}

/// Which of a room's walls get a doorway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DoorWalls {
    Left,
    Top,
    Both,
}

impl DoorWalls {
    fn top(self) -> bool {
        matches!(self, DoorWalls::Top | DoorWalls::Both)
    }

    fn left(self) -> bool {
        matches!(self, DoorWalls::Left | DoorWalls::Both)
    }
}

fn place_doors(grid: &mut Grid, graph: &mut RoomGraph, options: &BspOptions, rng: &mut MapRng) {
    for index in 0..graph.len() {
        let id = RoomId(index);
        let rect = graph.rooms[index].rect;

        let mut walls = [DoorWalls::Left, DoorWalls::Top, DoorWalls::Both][rng.below(3) as usize];
        // Rooms on the top or left border have no wall to pick between
        if rect.x == 0 || rect.y == 0 {
            walls = DoorWalls::Both;
        }

        if walls.top() && rect.y > 0 {
            let sites = Selection::area(grid, rect.x, rect.y, rect.w, 1)
                .filter_by(|x, y| grid.get(x, y - 1) == BLANK && grid.get(x, y + 1) == BLANK)
                .positions();
            match rng.choose(&sites).copied() {
                Some(door) => {
                    grid.set_at(door, options.door);
                    link_through(graph, id, Rect::new(door.x, door.y - 1, 1, 1));
                }
                None => debug!("bsp: no top doorway site for room {rect:?}"),
            }
        }

        if walls.left() && rect.x > 0 {
            let sites = Selection::area(grid, rect.x, rect.y, 1, rect.h)
                .filter_by(|x, y| grid.get(x - 1, y) == BLANK && grid.get(x + 1, y) == BLANK)
                .positions();
            match rng.choose(&sites).copied() {
                Some(door) => {
                    grid.set_at(door, options.door);
                    link_through(graph, id, Rect::new(door.x - 1, door.y, 1, 1));
                }
                None => debug!("bsp: no left doorway site for room {rect:?}"),
            }
        }
    }
}

/// Connect `owner` to every room covering the cell beyond its doorway
fn link_through(graph: &mut RoomGraph, owner: RoomId, beyond: Rect) {
    for other in graph.overlapping(&beyond) {
        graph.connect(owner, other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rooms laid out in a row, linked as listed
    fn graph_with_edges(count: usize, edges: &[(usize, usize)]) -> RoomGraph {
        let mut graph = RoomGraph::new((0..count).map(|i| Rect::new(i as i32 * 10, 0, 10, 10)));
        for &(a, b) in edges {
            graph.connect(RoomId(a), RoomId(b));
        }
        graph
    }

    #[test]
    fn test_connect_is_symmetric_and_deduplicated() {
        let mut graph = graph_with_edges(2, &[(0, 1), (1, 0), (0, 0)]);
        assert_eq!(graph.get(RoomId(0)).unwrap().connected(), &[RoomId(1)]);
        assert_eq!(graph.get(RoomId(1)).unwrap().connected(), &[RoomId(0)]);
        graph.connect(RoomId(0), RoomId(7));
        assert_eq!(graph.get(RoomId(0)).unwrap().connected().len(), 1);
    }

    #[test]
    fn test_count_hops_chain() {
        let graph = graph_with_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(graph.count_hops(RoomId(0), RoomId(0)), Some(0));
        assert_eq!(graph.count_hops(RoomId(0), RoomId(3)), Some(3));
        assert_eq!(graph.count_hops(RoomId(3), RoomId(1)), Some(2));
    }

    #[test]
    fn test_count_hops_unreachable() {
        let graph = graph_with_edges(3, &[(0, 1)]);
        assert_eq!(graph.count_hops(RoomId(0), RoomId(2)), None);
        assert_eq!(graph.count_hops(RoomId(0), RoomId(9)), None);
    }

    #[test]
    fn test_non_traversible_rooms_block_paths() {
        let mut graph = graph_with_edges(3, &[(0, 1), (1, 2)]);
        graph.set_traversible(RoomId(1), false);
        assert_eq!(graph.count_hops(RoomId(0), RoomId(1)), Some(1));
        assert_eq!(graph.count_hops(RoomId(0), RoomId(2)), None);
        graph.set_traversible(RoomId(1), true);
        assert_eq!(graph.count_hops(RoomId(0), RoomId(2)), Some(2));
    }

    #[test]
    fn test_necessary_in_chain() {
        let graph = graph_with_edges(3, &[(0, 1), (1, 2)]);
        assert!(graph.necessary(RoomId(0)));
        assert!(graph.necessary(RoomId(1)));
        assert!(graph.necessary(RoomId(2)));
    }

    #[test]
    fn test_cycle_rooms_are_not_necessary() {
        let graph = graph_with_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        for i in 0..4 {
            assert!(!graph.necessary(RoomId(i)), "room {i} should be optional");
        }
    }

    #[test]
    fn test_bridge_room_is_necessary() {
        // Two triangles joined through room 2
        let graph = graph_with_edges(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)]);
        assert!(graph.necessary(RoomId(2)));
        assert!(!graph.necessary(RoomId(0)));
        assert!(!graph.necessary(RoomId(3)));
    }

    #[test]
    fn test_isolated_room_is_not_necessary() {
        let graph = graph_with_edges(2, &[]);
        assert!(!graph.necessary(RoomId(0)));
    }

    #[test]
    fn test_disconnect_keeps_cycle_reachable() {
        let mut graph = graph_with_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert!(!graph.necessary(RoomId(1)));
        graph.disconnect(RoomId(1));
        assert!(graph.get(RoomId(1)).unwrap().connected().is_empty());
        assert!(!graph.are_connected(RoomId(0), RoomId(1)));
        assert!(!graph.are_connected(RoomId(2), RoomId(1)));
        assert_eq!(graph.count_hops(RoomId(0), RoomId(2)), Some(2));
    }

    #[test]
    fn test_discard_and_compact() {
        let mut graph = graph_with_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        graph.discard(RoomId(3));
        assert_eq!(graph.live_count(), 3);
        assert!(graph.get(RoomId(3)).unwrap().is_discarded());

        let (compact, remap) = graph.compact();
        assert_eq!(compact.len(), 3);
        assert_eq!(remap, vec![Some(RoomId(0)), Some(RoomId(1)), Some(RoomId(2)), None]);
        assert_eq!(compact.count_hops(RoomId(0), RoomId(2)), Some(2));
        assert_eq!(compact.get(RoomId(2)).unwrap().connected(), &[RoomId(1)]);
    }

    #[test]
    fn test_dangling_edges_from_json_are_ignored() {
        let json = r#"{"rooms": [
            {"rect": {"x": 0, "y": 0, "w": 5, "h": 5}, "connected": [7, 1], "traversible": true, "discarded": false},
            {"rect": {"x": 5, "y": 0, "w": 5, "h": 5}, "connected": [0, 9], "traversible": true, "discarded": false}
        ]}"#;
        let mut graph: RoomGraph = serde_json::from_str(json).unwrap();

        assert_eq!(graph.count_hops(RoomId(0), RoomId(1)), Some(1));
        assert_eq!(graph.count_hops(RoomId(0), RoomId(7)), None);
        assert!(graph.necessary(RoomId(0)));
        assert!(graph.necessary(RoomId(1)));

        let (compact, _) = graph.compact();
        assert_eq!(compact.get(RoomId(0)).unwrap().connected(), &[RoomId(1)]);

        graph.disconnect(RoomId(0));
        assert!(graph.get(RoomId(0)).unwrap().connected().is_empty());
        assert_eq!(graph.get(RoomId(1)).unwrap().connected(), &[RoomId(9)]);
    }

    #[test]
    fn test_nearest_to() {
        let graph = graph_with_edges(3, &[]);
        assert_eq!(graph.nearest_to(Position::new(14, 4)), Some(RoomId(1)));
        assert_eq!(RoomGraph::default().nearest_to(Position::new(0, 0)), None);
    }

    #[test]
    fn test_rooms_tile_the_grid() {
        let mut grid = Grid::new(40, 40);
        let options = BspOptions {
            split_count: 8,
            minimum_room_size: 4,
            ..BspOptions::default()
        };
        let layout = generate_bsp(&mut grid, &options, &mut MapRng::new(11));
        let total: i32 = layout.graph.rooms().map(|(_, r)| r.rect.area()).sum();
        assert_eq!(total, 40 * 40);
        assert_eq!(layout.graph.len(), 1 + layout.splits_achieved as usize);
        for (_, room) in layout.graph.rooms() {
            assert!(room.rect.min_side() > options.minimum_room_size);
        }
    }

    #[test]
    fn test_walls_sit_on_top_and_left_edges() {
        let mut grid = Grid::new(30, 30);
        let layout = generate_bsp(&mut grid, &BspOptions::default(), &mut MapRng::new(3));
        for (_, room) in layout.graph.rooms() {
            let r = room.rect;
            if r.x > 0 {
                for y in r.y + 1..r.bottom() {
                    assert_ne!(grid.get(r.x, y), BLANK, "left wall gap in {r:?}");
                }
            }
            // Interior stays open
            assert_ne!(grid.get(r.x + 1, r.y + 1), 'x');
        }
    }

    #[test]
    fn test_edges_are_symmetric() {
        let mut grid = Grid::new(50, 40);
        let layout = generate_bsp(&mut grid, &BspOptions::default(), &mut MapRng::new(99));
        let graph = &layout.graph;
        for (id, room) in graph.rooms() {
            for &other in room.connected() {
                assert_ne!(other, id);
                assert!(graph.are_connected(other, id));
            }
        }
    }

    #[test]
    fn test_doors_are_placed_between_rooms() {
        let mut grid = Grid::new(40, 40);
        let layout = generate_bsp(&mut grid, &BspOptions::default(), &mut MapRng::new(5));
        assert!(layout.splits_achieved > 0);
        assert!(grid.count('#') > 0);
        assert!(layout.graph.rooms().any(|(_, r)| !r.connected().is_empty()));
    }

    #[test]
    fn test_split_shortfall_is_reported() {
        let mut grid = Grid::new(10, 10);
        let options = BspOptions {
            split_count: 10,
            minimum_room_size: 4,
            ..BspOptions::default()
        };
        let layout = generate_bsp(&mut grid, &options, &mut MapRng::new(1));
        assert_eq!(layout.splits_requested, 10);
        assert!(layout.splits_achieved < 10);
        assert_eq!(layout.graph.len(), 1 + layout.splits_achieved as usize);
    }

    #[test]
    fn test_zero_splits_leaves_single_room() {
        let mut grid = Grid::new(12, 12);
        let options = BspOptions {
            split_count: 0,
            ..BspOptions::default()
        };
        let layout = generate_bsp(&mut grid, &options, &mut MapRng::new(1));
        assert_eq!(layout.graph.len(), 1);
        assert_eq!(grid.count('x'), 0);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = Grid::new(40, 30);
        let mut b = Grid::new(40, 30);
        let la = generate_bsp(&mut a, &BspOptions::default(), &mut MapRng::new(77));
        let lb = generate_bsp(&mut b, &BspOptions::default(), &mut MapRng::new(77));
        assert_eq!(a, b);
        assert_eq!(la, lb);
    }

    #[test]
    fn test_split_refuses_to_cover_doors() {
        let mut grid = Grid::new(20, 20);
        // Doors along the whole top edge: every vertical cut would start on one
        for x in 0..20 {
            grid.set(x, 0, '#');
        }
        let parent = Rect::new(0, 0, 20, 8);
        let options = BspOptions {
            minimum_room_size: 2,
            ..BspOptions::default()
        };
        let mut rng = MapRng::new(4);
        for _ in 0..20 {
            assert!(split_room(&mut grid, parent, &options, &mut rng).is_none());
        }
    }
}
