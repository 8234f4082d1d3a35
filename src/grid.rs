//! Plain-text rendering of boards.
//!
//! One character per grid cell, rows from top to bottom. Tiles show their
//! index (`0`-`9`, then `A`-`Z`, then `#`), empty cells show `.`.

use crate::codec::{LiveBoard, State};
use crate::geometry::{Cell, Geometry};

/// Character used for a tile index.
fn tile_char(tile: usize) -> char {
    match tile {
        0..=9 => char::from(b'0' + tile as u8),
        10..=35 => char::from(b'A' + (tile - 10) as u8),
        _ => '#',
    }
}

/// Fills a row-major occupancy grid from tile cells.
fn occupancy(geometry: &Geometry, cells: impl Iterator<Item = Cell>) -> Vec<Option<usize>> {
    let cols = usize::from(geometry.cols());
    let rows = usize::from(geometry.rows());
    let mut grid = vec![None; cols * rows];

    for (tile, cell) in cells.enumerate() {
        let shape = geometry.shape(tile);
        for dy in 0..usize::from(shape.height) {
            for dx in 0..usize::from(shape.width) {
                let x = usize::from(cell.x) + dx;
                let y = usize::from(cell.y) + dy;
                // out-of-bounds cells are clipped rather than drawn
                if x < cols && y < rows {
                    grid[y * cols + x] = Some(tile);
                }
            }
        }
    }

    grid
}

fn render(geometry: &Geometry, grid: &[Option<usize>]) -> String {
    let cols = usize::from(geometry.cols());
    let mut output = String::with_capacity(grid.len() + grid.len() / cols.max(1));
    for row in grid.chunks(cols) {
        output.extend(row.iter().map(|cell| cell.map_or('.', tile_char)));
        output.push('\n');
    }
    output
}

/// Renders a search state.
pub fn format_state(geometry: &Geometry, state: &State) -> String {
    let grid = occupancy(geometry, state.cells().iter().copied());
    render(geometry, &grid)
}

/// Renders the caller's live tiles, reading their pixel positions.
///
/// Positions off the grid are rounded down to the cell that contains them.
pub fn format_board<B: LiveBoard + ?Sized>(geometry: &Geometry, board: &B) -> String {
    let unit = geometry.unit() as i32;
    let cells = (0..board.tile_count()).map(|tile| {
        let (x, y) = board.position(tile);
        let to_cell = |px: i32| u8::try_from(px.max(0) / unit).unwrap_or(u8::MAX);
        Cell::new(to_cell(x), to_cell(y))
    });
    let grid = occupancy(geometry, cells);
    render(geometry, &grid)
}

/// Renders several states, separated by blank lines.
pub fn format_frames(geometry: &Geometry, frames: &[State]) -> String {
    frames
        .iter()
        .map(|state| format_state(geometry, state))
        .collect::<Vec<_>>()
        .join("\n")
}
