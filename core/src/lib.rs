//! Minesweeper as a deterministic simulation environment.
//!
//! The engine ([`Board`], [`Game`]) enforces the classic rules and projects the visible
//! board into a 3-channel [`StateMatrix`]. The agent layer ([`Agent`], [`Player`],
//! [`evaluate`]) drives games through policies and records training traces.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeSet;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use action::*;
pub use agent::*;
pub use board::*;
pub use cell::*;
pub use error::*;
pub use evaluator::*;
pub use game::*;
pub use generator::*;
pub use matrix::*;
pub use types::*;

mod action;
mod agent;
mod board;
mod cell;
mod error;
mod evaluator;
mod game;
mod generator;
mod matrix;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
    /// Defer mine placement to the first reveal and keep that cell mine-free.
    pub first_click_safe: bool,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self {
            rows,
            cols,
            mines,
            first_click_safe: false,
        }
    }

    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(rows, cols, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn with_first_click_safe(mut self, first_click_safe: bool) -> Self {
        self.first_click_safe = first_click_safe;
        self
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_count(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// At least one cell must stay mine-free, otherwise the game could never be won.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::EmptyBoard {
                rows: self.rows,
                cols: self.cols,
            });
        }

        if self.mines >= self.total_cells() {
            return Err(GameError::TooManyMines {
                mines: self.mines,
                cells: self.total_cells(),
            });
        }

        Ok(())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (row, col) = coords;
        if row < self.rows && col < self.cols {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(9, 9, 10)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let config = GameConfig::new_unchecked(size.0, size.1, 0);
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard {
                rows: size.0,
                cols: size.1,
            });
        }

        let mut mine_mask: Array2<bool> = Array2::default(grid_index(size));
        for &coords in mine_coords {
            let coords = config.validate_coords(coords)?;
            mine_mask[grid_index(coords)] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        NeighborIter::new(coords, self.size())
            .filter(|&pos| self[pos])
            .count() as u8
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[grid_index(coords)]
    }
}

impl IndexMut<Coord2> for MineLayout {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.mine_mask[grid_index(coords)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Everything a single reveal did to the board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealResult {
    pub hit_mine: bool,
    pub revealed: BTreeSet<Coord2>,
}

impl RevealResult {
    pub fn has_update(&self) -> bool {
        !self.revealed.is_empty()
    }
}
