use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    Reveal,
    Flag,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action {
    pub row: Coord,
    pub col: Coord,
    pub kind: ActionKind,
}

impl Action {
    pub const fn reveal((row, col): Coord2) -> Self {
        Self {
            row,
            col,
            kind: ActionKind::Reveal,
        }
    }

    pub const fn flag((row, col): Coord2) -> Self {
        Self {
            row,
            col,
            kind: ActionKind::Flag,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            ActionKind::Reveal => "reveal",
            ActionKind::Flag => "flag",
        };
        write!(f, "{} ({}, {})", verb, self.row, self.col)
    }
}

/// Flat action indices: `0..cells` reveal cell `i`, `cells..2*cells` flag cell
/// `i - cells`, where cell `i` is `row * cols + col`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    rows: Coord,
    cols: Coord,
}

impl ActionSpace {
    pub const fn new((rows, cols): Coord2) -> Self {
        Self { rows, cols }
    }

    pub const fn cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub const fn size(&self) -> usize {
        self.cells() * 2
    }

    pub fn index_of(&self, action: Action) -> Result<usize> {
        if action.row >= self.rows || action.col >= self.cols {
            return Err(GameError::OutOfBounds {
                row: action.row,
                col: action.col,
                rows: self.rows,
                cols: self.cols,
            });
        }

        let cell = action.row as usize * self.cols as usize + action.col as usize;
        Ok(match action.kind {
            ActionKind::Reveal => cell,
            ActionKind::Flag => self.cells() + cell,
        })
    }

    pub fn action_at(&self, index: usize) -> Result<Action> {
        if index >= self.size() {
            return Err(GameError::InvalidAction {
                index,
                size: self.size(),
            });
        }

        let (kind, cell) = if index < self.cells() {
            (ActionKind::Reveal, index)
        } else {
            (ActionKind::Flag, index - self.cells())
        };
        let cols = self.cols as usize;
        Ok(Action {
            row: (cell / cols) as Coord,
            col: (cell % cols) as Coord,
            kind,
        })
    }
}
