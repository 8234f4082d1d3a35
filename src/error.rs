//! Errors for rejected puzzle configurations.
//!
//! Every variant means the request is rejected before search begins. An
//! unsolvable puzzle is not an error; see [`crate::solver::Outcome`].

use thiserror::Error;

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid board, tile, target, or start-state configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The board or the grid unit has a zero dimension.
    #[error("Board {width}x{height} with grid unit {unit} has a zero dimension")]
    ZeroDimension {
        /// Board width in pixels.
        width: u32,
        /// Board height in pixels.
        height: u32,
        /// Grid unit in pixels.
        unit: u32,
    },

    /// A length is not a multiple of the grid unit.
    #[error("{what} length {value} is not a multiple of grid unit {unit}")]
    NotGridAligned {
        /// Which length was misaligned.
        what: &'static str,
        /// The offending length in pixels.
        value: u32,
        /// Grid unit in pixels.
        unit: u32,
    },

    /// A pixel position on the board would not fit in a live tile's `i32`.
    #[error("Board {width}x{height} exceeds the i32 pixel coordinate range")]
    PixelRangeExceeded {
        /// Board width in pixels.
        width: u32,
        /// Board height in pixels.
        height: u32,
    },

    /// The board spans more grid cells than a state coordinate can hold.
    #[error("Board of {cols}x{rows} cells exceeds the {max} cell limit per axis")]
    BoardTooLarge {
        /// Board width in cells.
        cols: u32,
        /// Board height in cells.
        rows: u32,
        /// Largest supported cell count per axis.
        max: u32,
    },

    /// The puzzle declares no tiles, so there is no goal tile.
    #[error("Puzzle has no tiles")]
    NoTiles,

    /// A tile shape has a zero side or is larger than the board.
    #[error("Tile {tile} with shape {width}x{height} cannot be placed on the board")]
    InvalidTileShape {
        /// Index of the tile.
        tile: usize,
        /// Tile width in pixels.
        width: u32,
        /// Tile height in pixels.
        height: u32,
    },

    /// A state lists a different number of positions than there are tiles.
    #[error("Expected {expected} tile positions but found {found}")]
    TileCountMismatch {
        /// Number of tiles in the geometry.
        expected: usize,
        /// Number of positions supplied.
        found: usize,
    },

    /// A tile extends past the board edge.
    #[error("Tile {tile} at cell ({x}, {y}) extends past the board")]
    TileOutOfBounds {
        /// Index of the tile.
        tile: usize,
        /// Column of the tile's top-left cell.
        x: u32,
        /// Row of the tile's top-left cell.
        y: u32,
    },

    /// Two tiles occupy a common cell.
    #[error("Tiles {first} and {second} overlap")]
    TilesOverlap {
        /// Lower tile index.
        first: usize,
        /// Higher tile index.
        second: usize,
    },

    /// The goal target is not a legal placement of the goal tile.
    #[error("Goal target ({x}, {y}) is not a legal placement for the goal tile")]
    TargetOutOfBounds {
        /// Target x in pixels.
        x: u32,
        /// Target y in pixels.
        y: u32,
    },

    /// A live tile sits at a pixel position that is off the grid.
    #[error("Tile {tile} at pixel ({x}, {y}) is not on the grid")]
    MisalignedPosition {
        /// Index of the tile.
        tile: usize,
        /// Pixel x position.
        x: i32,
        /// Pixel y position.
        y: i32,
    },
}

/// An unknown name was given for a strategy or layout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown {kind} `{name}`")]
pub struct ParseNameError {
    /// What was being parsed.
    pub kind: &'static str,
    /// The name that did not match.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_share_one_register() {
        assert_eq!(Error::NoTiles.to_string(), "Puzzle has no tiles");
        assert_eq!(
            Error::TilesOverlap { first: 1, second: 4 }.to_string(),
            "Tiles 1 and 4 overlap"
        );
        let unknown = ParseNameError {
            kind: "layout",
            name: "huarong".to_string(),
        };
        assert_eq!(unknown.to_string(), "Unknown layout `huarong`");
    }
}
