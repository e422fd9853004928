use alloc::vec::Vec;
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::*;

pub const STATE_CHANNELS: usize = 3;
/// 1.0 where the cell is revealed.
pub const REVEALED_CHANNEL: usize = 0;
/// Adjacent mine count divided by 8 on revealed cells, [`UNKNOWN_ADJACENCY`] elsewhere.
pub const ADJACENCY_CHANNEL: usize = 1;
/// 1.0 where the cell is flagged.
pub const FLAGGED_CHANNEL: usize = 2;
pub const UNKNOWN_ADJACENCY: f32 = -1.0;

/// What an agent can tell about a cell from the state matrix alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
}

/// Owned `3 x rows x cols` snapshot of the visible board. Nothing here points back at
/// the board, so callers may mutate it freely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateMatrix {
    data: Array3<f32>,
}

impl StateMatrix {
    pub fn from_cells(cells: &Array2<Cell>) -> Self {
        let (rows, cols) = cells.dim();
        let mut data = Array3::zeros((STATE_CHANNELS, rows, cols));

        for ((row, col), cell) in cells.indexed_iter() {
            match cell.state() {
                CellState::Revealed => {
                    data[[REVEALED_CHANNEL, row, col]] = 1.0;
                    data[[ADJACENCY_CHANNEL, row, col]] = f32::from(cell.adjacent_mines()) / 8.0;
                }
                CellState::Flagged => {
                    data[[ADJACENCY_CHANNEL, row, col]] = UNKNOWN_ADJACENCY;
                    data[[FLAGGED_CHANNEL, row, col]] = 1.0;
                }
                CellState::Hidden => {
                    data[[ADJACENCY_CHANNEL, row, col]] = UNKNOWN_ADJACENCY;
                }
            }
        }

        Self { data }
    }

    pub fn size(&self) -> Coord2 {
        let (_, rows, cols) = self.data.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn as_array(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn as_array_mut(&mut self) -> &mut Array3<f32> {
        &mut self.data
    }

    pub fn into_array(self) -> Array3<f32> {
        self.data
    }

    /// Channel-major flat copy, the layout most tensor libraries expect.
    pub fn to_flat_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// Decodes one cell, or `None` when `coords` lies outside the grid.
    pub fn view(&self, (row, col): Coord2) -> Option<CellView> {
        let (row, col) = (usize::from(row), usize::from(col));
        let channel = |axis: usize| self.data.get([axis, row, col]).copied();

        let view = if channel(REVEALED_CHANNEL)? >= 0.5 {
            // counts are multiples of 1/8 and exact in f32
            let count = channel(ADJACENCY_CHANNEL)? * 8.0 + 0.5;
            CellView::Revealed(count as u8)
        } else if channel(FLAGGED_CHANNEL)? >= 0.5 {
            CellView::Flagged
        } else {
            CellView::Hidden
        };
        Some(view)
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    pub fn cells_matching(&self, view: CellView) -> Vec<Coord2> {
        self.coords()
            .filter(|&coords| self.view(coords) == Some(view))
            .collect()
    }
}

impl TryFrom<Array3<f32>> for StateMatrix {
    type Error = GameError;

    fn try_from(data: Array3<f32>) -> Result<Self> {
        let (channels, rows, cols) = data.dim();
        if channels != STATE_CHANNELS || rows == 0 || cols == 0 {
            return Err(GameError::InvalidMatrixShape { channels, rows, cols });
        }
        Ok(Self { data })
    }
}
