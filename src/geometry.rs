//! Static board geometry: board size, tile shapes, and the goal target.
//!
//! Inputs arrive in pixels, the way the rendering layer measures them, and are
//! converted to grid cells once at construction. Everything the search touches
//! afterwards is in cells, stored as `u8` so a state stays small.
//!
//! Non-goal tiles with the same shape are interchangeable: swapping two of
//! them maps legal moves to legal moves and leaves the goal tile alone. The
//! search may treat such relabellings as one state; see
//! [`Geometry::canonical`].

use crate::codec::State;
use crate::error::{Error, Result};

/// Largest number of cells per board axis.
pub const MAX_CELLS: u32 = u8::MAX as u32;

/// Index of the tile whose position decides victory.
pub const GOAL_TILE: usize = 0;

/// The top-left grid cell of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Width and height of a tile in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u8,
    pub height: u8,
}

/// Axis-aligned rectangle in cell units.
///
/// Signed so that a candidate move off the top or left edge can be represented
/// and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Returns true if both intervals intersect with nonzero length.
    ///
    /// Rectangles that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Returns true if the rectangle lies inside `[0, cols) x [0, rows)`.
    #[inline]
    pub fn within(&self, cols: u8, rows: u8) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x + self.width <= i32::from(cols)
            && self.y + self.height <= i32::from(rows)
    }
}

/// Immutable description of one puzzle: board, tile shapes, and goal target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    cols: u8,
    rows: u8,
    unit: u32,
    shapes: Box<[Extent]>,
    /// Groups of two or more non-goal tiles sharing a shape.
    interchangeable: Box<[Box<[usize]>]>,
    target: Cell,
}

impl Geometry {
    /// Builds a geometry from pixel measurements.
    ///
    /// `shapes` lists each tile's `(width, height)` in declaration order; tile
    /// 0 is the goal tile and `target` is the top-left pixel position it must
    /// reach. Fails if any length is zero or off the grid, if a pixel position
    /// on the board would not fit in `i32`, if a tile can never fit, or if the
    /// target is not a legal goal-tile placement.
    pub fn new(
        width: u32,
        height: u32,
        unit: u32,
        shapes: &[(u32, u32)],
        target: (u32, u32),
    ) -> Result<Self> {
        if width == 0 || height == 0 || unit == 0 {
            return Err(Error::ZeroDimension {
                width,
                height,
                unit,
            });
        }
        // live tiles hold i32 pixel positions
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(Error::PixelRangeExceeded { width, height });
        }
        let cols = cells(width, unit, "Board width")?;
        let rows = cells(height, unit, "Board height")?;
        if cols > MAX_CELLS || rows > MAX_CELLS {
            return Err(Error::BoardTooLarge {
                cols,
                rows,
                max: MAX_CELLS,
            });
        }
        if shapes.is_empty() {
            return Err(Error::NoTiles);
        }

        let mut extents = Vec::with_capacity(shapes.len());
        for (tile, &(tile_width, tile_height)) in shapes.iter().enumerate() {
            let w = cells(tile_width, unit, "Tile width")?;
            let h = cells(tile_height, unit, "Tile height")?;
            if w == 0 || h == 0 || w > cols || h > rows {
                return Err(Error::InvalidTileShape {
                    tile,
                    width: tile_width,
                    height: tile_height,
                });
            }
            // bounded by cols/rows, which already fit in u8
            extents.push(Extent {
                width: w as u8,
                height: h as u8,
            });
        }

        let target_x = cells(target.0, unit, "Target x")?;
        let target_y = cells(target.1, unit, "Target y")?;
        let goal = extents[GOAL_TILE];
        // goal.width <= cols and goal.height <= rows were checked above
        if target_x > cols - u32::from(goal.width) || target_y > rows - u32::from(goal.height) {
            return Err(Error::TargetOutOfBounds {
                x: target.0,
                y: target.1,
            });
        }

        Ok(Self {
            cols: cols as u8,
            rows: rows as u8,
            unit,
            interchangeable: interchangeable_groups(&extents),
            shapes: extents.into_boxed_slice(),
            target: Cell::new(target_x as u8, target_y as u8),
        })
    }

    /// Board width in cells.
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Board height in cells.
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Grid unit in pixels.
    pub fn unit(&self) -> u32 {
        self.unit
    }

    pub fn tile_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn shape(&self, tile: usize) -> Extent {
        self.shapes[tile]
    }

    /// The cell the goal tile must reach.
    pub fn target(&self) -> Cell {
        self.target
    }

    /// Rectangle covered by `tile` when its top-left corner is at `(x, y)`.
    #[inline]
    pub fn rect_at(&self, tile: usize, x: i32, y: i32) -> Rect {
        let shape = self.shapes[tile];
        Rect {
            x,
            y,
            width: i32::from(shape.width),
            height: i32::from(shape.height),
        }
    }

    #[inline]
    pub fn rect(&self, tile: usize, cell: Cell) -> Rect {
        self.rect_at(tile, i32::from(cell.x), i32::from(cell.y))
    }

    /// Converts a cell to its top-left pixel position.
    pub fn pixel(&self, cell: Cell) -> (i32, i32) {
        // new() keeps width and height, and so every cell corner, within i32
        let unit = self.unit as i32;
        (i32::from(cell.x) * unit, i32::from(cell.y) * unit)
    }

    /// Goal predicate: the goal tile sits exactly on the target.
    ///
    /// A state without tiles is never a goal.
    #[inline]
    pub fn is_goal(&self, state: &State) -> bool {
        state.cells().get(GOAL_TILE) == Some(&self.target)
    }

    /// Representative of `state` among all states that differ from it only by
    /// swapping same-shaped non-goal tiles.
    ///
    /// Each group's cells are sorted and handed back to the group's tiles in
    /// index order. Every state in a class has the same distance to the goal.
    /// A state with the wrong tile count is returned unchanged.
    pub fn canonical(&self, state: &State) -> State {
        if self.interchangeable.is_empty() || state.len() != self.shapes.len() {
            return state.clone();
        }

        let mut cells = state.cells().to_vec();
        let mut group_cells = Vec::new();
        for group in self.interchangeable.iter() {
            group_cells.clear();
            group_cells.extend(group.iter().map(|&tile| cells[tile]));
            group_cells.sort_unstable();
            for (&tile, &cell) in group.iter().zip(&group_cells) {
                cells[tile] = cell;
            }
        }
        State::new(cells)
    }

    /// Checks that `state` places every tile on the board without overlap.
    pub fn validate(&self, state: &State) -> Result<()> {
        let cells = state.cells();
        if cells.len() != self.shapes.len() {
            return Err(Error::TileCountMismatch {
                expected: self.shapes.len(),
                found: cells.len(),
            });
        }

        for (tile, &cell) in cells.iter().enumerate() {
            if !self.rect(tile, cell).within(self.cols, self.rows) {
                return Err(Error::TileOutOfBounds {
                    tile,
                    x: u32::from(cell.x),
                    y: u32::from(cell.y),
                });
            }
        }

        for first in 0..cells.len() {
            let first_rect = self.rect(first, cells[first]);
            for second in first + 1..cells.len() {
                if first_rect.overlaps(&self.rect(second, cells[second])) {
                    return Err(Error::TilesOverlap { first, second });
                }
            }
        }

        Ok(())
    }
}

/// Groups non-goal tiles by shape, keeping only groups of two or more.
fn interchangeable_groups(extents: &[Extent]) -> Box<[Box<[usize]>]> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for tile in GOAL_TILE + 1..extents.len() {
        match groups
            .iter_mut()
            .find(|group| extents[group[0]] == extents[tile])
        {
            Some(group) => group.push(tile),
            None => groups.push(vec![tile]),
        }
    }
    groups
        .into_iter()
        .filter(|group| group.len() > 1)
        .map(Vec::into_boxed_slice)
        .collect()
}

/// Converts a pixel length to cells, rejecting lengths off the grid.
fn cells(value: u32, unit: u32, what: &'static str) -> Result<u32> {
    if value % unit != 0 {
        return Err(Error::NotGridAligned { what, value, unit });
    }
    Ok(value / unit)
}
