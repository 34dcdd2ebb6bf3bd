//! Failures surfaced while preparing a level for play.

use thiserror::Error;

use crate::{CellCoord, LevelId};

/// Reasons a level cannot be played.
///
/// Load failures are terminal for the attempt: the session stays suspended
/// until another level is requested.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelLoadError {
    /// The level loader could not fetch or parse the level.
    #[error("level {level} is unavailable: {reason}")]
    Unavailable {
        /// Level that was requested.
        level: LevelId,
        /// Loader supplied description of the failure.
        reason: String,
    },
    /// The grid contains no cells.
    #[error("level grid is empty")]
    EmptyGrid,
    /// A grid row differs in width from the first row.
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: u32,
        /// Width of the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// The grid uses a character with no cell type descriptor.
    #[error("cell {cell} uses unknown cell type '{glyph}'")]
    UnknownCellType {
        /// Character found in the grid.
        glyph: char,
        /// First cell using the character.
        cell: CellCoord,
    },
    /// Two cell type descriptors share a character.
    #[error("cell type '{glyph}' is declared more than once")]
    DuplicateCellType {
        /// Character declared twice.
        glyph: char,
    },
    /// An action cell lies outside the grid.
    #[error("action cell {cell} lies outside the grid")]
    ActionOutOfBounds {
        /// Offending action coordinate.
        cell: CellCoord,
    },
    /// An action cell sits on a tile the player cannot enter.
    #[error("action cell {cell} is not walkable")]
    ActionOnUnwalkableCell {
        /// Offending action coordinate.
        cell: CellCoord,
    },
    /// Two action cells share a coordinate.
    #[error("action cell {cell} is declared more than once")]
    DuplicateActionCell {
        /// Coordinate declared twice.
        cell: CellCoord,
    },
    /// The player would start outside the grid or on a blocked tile.
    #[error("player cannot start at {cell}")]
    UnwalkableStart {
        /// Requested start cell.
        cell: CellCoord,
    },
}
