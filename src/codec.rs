//! Conversion between the caller's live tiles and the search's state values.
//!
//! The rendering layer owns its tiles and describes them in pixels. The search
//! works on [`State`], a compact value holding one grid cell per tile, and
//! never touches the live tiles directly.

use std::fmt;

use crate::error::{Error, Result};
use crate::geometry::{Cell, Geometry};

/// Position of every tile, in declaration order, in grid cells.
///
/// Two states with the same cells are the same vertex of the search graph, no
/// matter how they were reached.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State(Box<[Cell]>);

impl State {
    pub fn new(cells: impl Into<Box<[Cell]>>) -> Self {
        Self(cells.into())
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    #[inline]
    pub fn cell(&self, tile: usize) -> Cell {
        self.0[tile]
    }

    /// Returns a copy of this state with one tile moved.
    #[inline]
    pub fn with_cell(&self, tile: usize, cell: Cell) -> Self {
        let mut cells = self.0.clone();
        cells[tile] = cell;
        Self(cells)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|cell| (cell.x, cell.y)))
            .finish()
    }
}

/// Live tile storage owned by the rendering layer.
pub trait LiveBoard {
    fn tile_count(&self) -> usize;

    /// Top-left pixel position of `tile`.
    fn position(&self, tile: usize) -> (i32, i32);

    fn set_position(&mut self, tile: usize, position: (i32, i32));
}

/// A tile as the rendering layer sees it: a pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Tile {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl LiveBoard for [Tile] {
    fn tile_count(&self) -> usize {
        self.len()
    }

    fn position(&self, tile: usize) -> (i32, i32) {
        (self[tile].x, self[tile].y)
    }

    fn set_position(&mut self, tile: usize, (x, y): (i32, i32)) {
        self[tile].x = x;
        self[tile].y = y;
    }
}

impl LiveBoard for Vec<Tile> {
    fn tile_count(&self) -> usize {
        self.as_slice().tile_count()
    }

    fn position(&self, tile: usize) -> (i32, i32) {
        self.as_slice().position(tile)
    }

    fn set_position(&mut self, tile: usize, position: (i32, i32)) {
        self.as_mut_slice().set_position(tile, position);
    }
}

/// Reads every tile's position from the live board into a [`State`].
///
/// Only the shape of the data is checked: the tile count must match and each
/// position must be a non-negative multiple of the grid unit. Whether the
/// result is a legal placement is [`Geometry::validate`]'s concern.
pub fn encode<B: LiveBoard + ?Sized>(geometry: &Geometry, board: &B) -> Result<State> {
    if board.tile_count() != geometry.tile_count() {
        return Err(Error::TileCountMismatch {
            expected: geometry.tile_count(),
            found: board.tile_count(),
        });
    }

    let unit = geometry.unit() as i64;
    let mut cells = Vec::with_capacity(board.tile_count());
    for tile in 0..board.tile_count() {
        let (x, y) = board.position(tile);
        let misaligned = Error::MisalignedPosition { tile, x, y };
        let (x_px, y_px) = (i64::from(x), i64::from(y));
        if x_px < 0 || y_px < 0 || x_px % unit != 0 || y_px % unit != 0 {
            return Err(misaligned);
        }
        let cell_x = u8::try_from(x_px / unit).map_err(|_| misaligned.clone())?;
        let cell_y = u8::try_from(y_px / unit).map_err(|_| misaligned)?;
        cells.push(Cell::new(cell_x, cell_y));
    }

    Ok(State::new(cells))
}

/// Writes every tile position in `state` back to the live board.
pub fn decode<B: LiveBoard + ?Sized>(geometry: &Geometry, state: &State, board: &mut B) {
    for (tile, &cell) in state.cells().iter().enumerate() {
        board.set_position(tile, geometry.pixel(cell));
    }
}
