use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board dimensions must be positive, got {rows}x{cols}")]
    EmptyBoard { rows: Coord, cols: Coord },
    #[error("Too many mines: {mines} requested but only {cells} cells are available")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("Coordinates ({row}, {col}) are outside the {rows}x{cols} board")]
    OutOfBounds {
        row: Coord,
        col: Coord,
        rows: Coord,
        cols: Coord,
    },
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Mines have not been placed on this board yet")]
    MinesNotPlaced,
    #[error("Mines can only be placed before any cell is revealed")]
    BoardInPlay,
    #[error("Action index {index} is outside the action space of size {size}")]
    InvalidAction { index: usize, size: usize },
    #[error("State matrix must be 3 x rows x cols with a non-empty grid, got {channels}x{rows}x{cols}")]
    InvalidMatrixShape {
        channels: usize,
        rows: usize,
        cols: usize,
    },
}

impl GameError {
    /// Errors raised while building a board; no usable object exists afterwards.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::EmptyBoard { .. } | Self::TooManyMines { .. })
    }
}

pub type Result<T> = core::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn out_of_bounds_display() {
        let err = GameError::OutOfBounds {
            row: 9,
            col: 0,
            rows: 9,
            cols: 9,
        };
        assert_eq!(err.to_string(), "Coordinates (9, 0) are outside the 9x9 board");
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn too_many_mines_is_configuration_error() {
        let err = GameError::TooManyMines { mines: 9, cells: 9 };
        assert!(err.is_configuration_error());
        assert_eq!(
            err.to_string(),
            "Too many mines: 9 requested but only 9 cells are available"
        );
    }
}
