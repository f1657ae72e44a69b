//! Straight line rasterization

use crate::grid::Grid;

/// Draw a line of `symbol` from (x1, y1) to (x2, y2), endpoints included
///
/// Steps one cell at a time along the longer axis and accumulates the slope
/// on the shorter one, rounding to the nearest cell. Each point is stamped
/// as a `thickness` × `thickness` block offset by `-thickness / 2`. With
/// `stagger`, the cell at (previous x, next y) is filled after every step so
/// that a 1-thick diagonal stays passable with cardinal moves only.
#[allow(clippy::too_many_arguments)]
pub fn draw_line(
    grid: &mut Grid,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    symbol: char,
    thickness: i32,
    stagger: bool,
) {
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let x_major = dx >= dy;
    let (length, slope) = if x_major {
        (dx, if dx != 0 { dy as f32 / dx as f32 } else { 0.0 })
    } else {
        (dy, dx as f32 / dy as f32)
    };
    let step_x = if x2 > x1 { 1.0 } else { -1.0 };
    let step_y = if y2 > y1 { 1.0 } else { -1.0 };

    let mut stamp = |x: i32, y: i32| {
        let offset = thickness / 2;
        for fy in 0..thickness {
            for fx in 0..thickness {
                grid.set(x + fx - offset, y + fy - offset, symbol);
            }
        }
    };

    let mut sx = x1 as f32;
    let mut sy = y1 as f32;

    for _ in 0..=length {
        stamp(sx.round() as i32, sy.round() as i32);
        let prev_x = sx.round() as i32;

        if x_major {
            sx += step_x;
            sy += step_y * slope;
        } else {
            sy += step_y;
            sx += step_x * slope;
        }

        if stagger {
            stamp(prev_x, sy.round() as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    fn marked(grid: &Grid, symbol: char) -> Vec<Position> {
        grid.select().filter_by_symbol(grid, symbol).positions()
    }

    #[test]
    fn test_horizontal_line() {
        let mut grid = Grid::new(10, 10);
        draw_line(&mut grid, 0, 0, 9, 0, 'x', 1, false);
        let expected: Vec<_> = (0..10).map(|x| Position::new(x, 0)).collect();
        assert_eq!(marked(&grid, 'x'), expected);
    }

    #[test]
    fn test_vertical_line_reversed() {
        let mut grid = Grid::new(5, 5);
        draw_line(&mut grid, 2, 4, 2, 1, 'x', 1, false);
        assert_eq!(grid.count('x'), 4);
        assert_eq!(grid.get(2, 0), ' ');
        assert_eq!(grid.get(2, 4), 'x');
    }

    #[test]
    fn test_single_point() {
        let mut grid = Grid::new(3, 3);
        draw_line(&mut grid, 1, 1, 1, 1, 'x', 1, false);
        assert_eq!(marked(&grid, 'x'), vec![Position::new(1, 1)]);
    }

    #[test]
    fn test_diagonal_without_stagger() {
        let mut grid = Grid::new(5, 5);
        draw_line(&mut grid, 0, 0, 4, 4, 'x', 1, false);
        assert_eq!(grid.count('x'), 5);
        for i in 0..5 {
            assert_eq!(grid.get(i, i), 'x');
        }
    }

    #[test]
    fn test_stagger_is_four_connected() {
        let mut grid = Grid::new(8, 8);
        draw_line(&mut grid, 0, 0, 6, 6, 'x', 1, true);
        let carved = grid.select_contiguous(0, 0, false);
        assert!(carved.contains(6, 6));
        for i in 0..6 {
            assert_eq!(grid.get(i, i + 1), 'x');
        }
    }

    #[test]
    fn test_thickness_stamps_blocks() {
        let mut grid = Grid::new(10, 10);
        draw_line(&mut grid, 2, 5, 6, 5, 'x', 3, false);
        assert_eq!(grid.count('x'), 21);
        assert_eq!(grid.get(1, 4), 'x');
        assert_eq!(grid.get(7, 6), 'x');
        assert_eq!(grid.get(2, 3), ' ');
    }

    #[test]
    fn test_clipped_line_is_safe() {
        let mut grid = Grid::new(4, 4);
        draw_line(&mut grid, -3, 1, 8, 1, 'x', 1, false);
        assert_eq!(grid.count('x'), 4);
    }
}
