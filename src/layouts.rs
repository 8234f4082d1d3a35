//! Built-in puzzle layouts.
//!
//! Each layout is described in pixels, the way the rendering layer sets up
//! its tiles. Tile 0 is always the goal tile.

use crate::codec::{encode, State, Tile};
use crate::error::{ParseNameError, Result};
use crate::geometry::Geometry;

/// A board, its tiles at their starting positions, and the goal target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub unit: u32,
    pub tiles: &'static [Tile],
    /// Top-left pixel position the goal tile must reach.
    pub target: (u32, u32),
}

impl Layout {
    /// Creates a layout definition with compile-time checks on its shape.
    ///
    /// Legality of the placement (bounds, overlap) is checked when the layout
    /// is turned into a [`Geometry`] and [`State`].
    pub const fn new(
        name: &'static str,
        width: u32,
        height: u32,
        unit: u32,
        tiles: &'static [Tile],
        target: (u32, u32),
    ) -> Self {
        assert!(unit > 0, "unit must be positive");
        assert!(width % unit == 0 && height % unit == 0, "board must be grid aligned");
        assert!(!tiles.is_empty(), "layout needs a goal tile");
        let mut i = 0;
        while i < tiles.len() {
            let tile = tiles[i];
            assert!(tile.x >= 0 && tile.y >= 0, "tile position must be non-negative");
            assert!(
                tile.width % unit == 0 && tile.height % unit == 0,
                "tile shape must be grid aligned"
            );
            i += 1;
        }
        Self {
            name,
            width,
            height,
            unit,
            tiles,
            target,
        }
    }

    pub fn geometry(&self) -> Result<Geometry> {
        let shapes: Vec<(u32, u32)> = self
            .tiles
            .iter()
            .map(|tile| (tile.width, tile.height))
            .collect();
        Geometry::new(self.width, self.height, self.unit, &shapes, self.target)
    }

    /// A fresh copy of the live tiles, as a rendering layer would hold them.
    pub fn tiles(&self) -> Vec<Tile> {
        self.tiles.to_vec()
    }

    /// Geometry and encoded start state, validated.
    pub fn start(&self) -> Result<(Geometry, State)> {
        let geometry = self.geometry()?;
        let state = encode(&geometry, self.tiles)?;
        geometry.validate(&state)?;
        Ok((geometry, state))
    }
}

/// Klotski on a 4x5 board: the 2x2 goal tile starts top centre and must reach
/// bottom centre. Row 2 singles are labelled left, right, then the middle two.
pub const CLASSIC: Layout = Layout::new(
    "classic",
    400,
    500,
    100,
    &[
        Tile::new(100, 0, 200, 200),
        Tile::new(0, 0, 100, 200),
        Tile::new(300, 0, 100, 200),
        Tile::new(0, 200, 100, 100),
        Tile::new(300, 200, 100, 100),
        Tile::new(100, 200, 100, 100),
        Tile::new(200, 200, 100, 100),
        Tile::new(0, 300, 100, 200),
        Tile::new(300, 300, 100, 200),
        Tile::new(100, 400, 100, 100),
        Tile::new(200, 400, 100, 100),
    ],
    (100, 300),
);

/// Same cells as [`CLASSIC`], with the middle pair of row 2 singles labelled
/// before the outer two.
pub const STANDARD: Layout = Layout::new(
    "standard",
    400,
    500,
    100,
    &[
        Tile::new(100, 0, 200, 200),
        Tile::new(0, 0, 100, 200),
        Tile::new(300, 0, 100, 200),
        Tile::new(100, 200, 100, 100),
        Tile::new(200, 200, 100, 100),
        Tile::new(0, 200, 100, 100),
        Tile::new(300, 200, 100, 100),
        Tile::new(0, 300, 100, 200),
        Tile::new(300, 300, 100, 200),
        Tile::new(100, 400, 100, 100),
        Tile::new(200, 400, 100, 100),
    ],
    (100, 300),
);

/// 3x3 board with two loose singles; the goal needs exactly four moves.
pub const OPEN: Layout = Layout::new(
    "open",
    300,
    300,
    100,
    &[
        Tile::new(0, 0, 100, 100),
        Tile::new(100, 100, 100, 100),
        Tile::new(200, 100, 100, 100),
    ],
    (200, 200),
);

/// 3x4 board that starts solved; scramble it to get a puzzle.
pub const NARROW: Layout = Layout::new(
    "narrow",
    300,
    400,
    100,
    &[
        Tile::new(100, 200, 200, 200),
        Tile::new(0, 0, 100, 200),
        Tile::new(0, 200, 100, 200),
        Tile::new(100, 0, 100, 100),
        Tile::new(200, 0, 100, 100),
    ],
    (100, 200),
);

/// 4x2 board where the goal tile is walled in by a 2x2 block that can never
/// move; only the single on the right has room.
pub const BOXED: Layout = Layout::new(
    "boxed",
    400,
    200,
    100,
    &[
        Tile::new(0, 0, 100, 100),
        Tile::new(0, 100, 100, 100),
        Tile::new(100, 0, 200, 200),
        Tile::new(300, 0, 100, 100),
    ],
    (300, 100),
);

/// One tile already on its target.
pub const SINGLE: Layout = Layout::new(
    "single",
    200,
    100,
    100,
    &[Tile::new(0, 0, 100, 100)],
    (0, 0),
);

/// Every built-in layout.
pub const LAYOUTS: [&Layout; 6] = [&CLASSIC, &STANDARD, &OPEN, &NARROW, &BOXED, &SINGLE];

/// Looks a layout up by name, ignoring case.
pub fn by_name(name: &str) -> std::result::Result<&'static Layout, ParseNameError> {
    LAYOUTS
        .into_iter()
        .find(|layout| layout.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ParseNameError {
            kind: "layout",
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Cell;

    #[test]
    fn test_every_layout_is_legal() {
        for layout in LAYOUTS {
            let (geometry, state) = layout
                .start()
                .unwrap_or_else(|e| panic!("{} is invalid: {e}", layout.name));
            assert_eq!(state.len(), layout.tiles.len());
            assert_eq!(geometry.tile_count(), layout.tiles.len());
        }
    }

    #[test]
    fn test_classic_start_cells() {
        let (geometry, state) = CLASSIC.start().unwrap();
        assert_eq!((geometry.cols(), geometry.rows()), (4, 5));
        assert_eq!(state.cell(0), Cell::new(1, 0));
        assert_eq!(geometry.target(), Cell::new(1, 3));
        assert_eq!(geometry.estimate(&state), 3);
    }

    #[test]
    fn test_solved_layouts() {
        for layout in [&NARROW, &SINGLE] {
            let (geometry, state) = layout.start().unwrap();
            assert!(geometry.is_goal(&state), "{} should start solved", layout.name);
        }
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("Classic").map(|l| l.name), Ok("classic"));
        assert!(by_name("huarong").is_err());
    }
}
