use alloc::collections::{BTreeSet, VecDeque};
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// The grid of cells plus the counters needed to detect a cleared board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    cells: Array2<Cell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    mines_placed: bool,
}

impl Board {
    /// A board without mines yet; [`Board::place_mines`] must run before any reveal.
    pub fn empty(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cells: Array2::default(grid_index(config.size())),
            revealed_count: 0,
            flagged_count: 0,
            mines_placed: false,
        })
    }

    /// Deals a fresh board: uniform mine placement followed by adjacency counts.
    pub fn generate<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self> {
        let mut board = Self::empty(config)?;
        board.place_mines(None, rng)?;
        Ok(board)
    }

    pub fn from_layout(layout: &MineLayout) -> Result<Self> {
        let (rows, cols) = layout.size();
        let config = GameConfig::new_unchecked(rows, cols, layout.mine_count());
        let mut board = Self::empty(config)?;
        board.apply_layout(layout);
        Ok(board)
    }

    pub fn from_mine_coords(rows: Coord, cols: Coord, mines: &[Coord2]) -> Result<Self> {
        Self::from_layout(&MineLayout::from_mine_coords((rows, cols), mines)?)
    }

    /// Selects `mines` distinct cells uniformly at random, never `exclude`, then
    /// recomputes adjacency. Replaces any earlier layout as long as nothing has been
    /// revealed; flags are kept.
    pub fn place_mines<R: Rng + ?Sized>(
        &mut self,
        exclude: Option<Coord2>,
        rng: &mut R,
    ) -> Result<()> {
        if self.cells.iter().any(|cell| cell.is_revealed()) {
            return Err(GameError::BoardInPlay);
        }
        let layout = RandomMinefieldGenerator::new(exclude).generate(&self.config, rng)?;
        self.apply_layout(&layout);
        Ok(())
    }

    fn apply_layout(&mut self, layout: &MineLayout) {
        for ((row, col), cell) in self.cells.indexed_iter_mut() {
            cell.set_mine(layout[(row as Coord, col as Coord)]);
        }
        self.mines_placed = true;
        self.compute_adjacency();
    }

    /// Counts mines among the in-grid neighbours of every cell.
    pub fn compute_adjacency(&mut self) {
        let (rows, cols) = self.config.size();
        for row in 0..rows {
            for col in 0..cols {
                let count = self
                    .neighbors((row, col))
                    .filter(|&pos| self.cells[grid_index(pos)].is_mine())
                    .count() as u8;
                self.cells[grid_index((row, col))].set_adjacent_mines(count);
            }
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn mines_left(&self) -> i64 {
        i64::from(self.config.mines) - i64::from(self.flagged_count)
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    /// Every non-mine cell is revealed.
    pub fn is_cleared(&self) -> bool {
        self.revealed_count == self.safe_cell_count()
    }

    /// The mine that was revealed, if any.
    pub fn revealed_mine(&self) -> Option<Coord2> {
        self.cells
            .indexed_iter()
            .find(|(_, cell)| cell.is_mine() && cell.is_revealed())
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.config.validate_coords(coords)?;
        Ok(&self.cells[grid_index(coords)])
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealResult> {
        let coords = self.config.validate_coords(coords)?;
        if !self.mines_placed {
            return Err(GameError::MinesNotPlaced);
        }
        let mut result = RevealResult::default();

        let cell = &mut self.cells[grid_index(coords)];
        if !cell.reveal() {
            return Ok(result);
        }
        result.revealed.insert(coords);

        if cell.is_mine() {
            result.hit_mine = true;
            return Ok(result);
        }
        self.revealed_count += 1;

        if cell.adjacent_mines() == 0 {
            self.cascade(coords, &mut result.revealed);
        }

        Ok(result)
    }

    /// Breadth-first flood fill from a zero cell. Each position is queued at most once,
    /// so the walk visits no more than rows*cols cells.
    fn cascade(&mut self, start: Coord2, revealed: &mut BTreeSet<Coord2>) {
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<Coord2> = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in self.neighbors(visit_coords) {
                if !visited.insert(pos) {
                    continue;
                }

                let cell = &mut self.cells[grid_index(pos)];
                if cell.is_mine() || !cell.reveal() {
                    continue;
                }
                self.revealed_count += 1;
                revealed.insert(pos);

                if cell.adjacent_mines() == 0 {
                    to_visit.push_back(pos);
                }
            }
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.config.validate_coords(coords)?;
        let cell = &mut self.cells[grid_index(coords)];

        if !cell.toggle_flag() {
            return Ok(MarkOutcome::NoChange);
        }

        if cell.is_flagged() {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        Ok(MarkOutcome::Changed)
    }

    pub fn state_matrix(&self) -> StateMatrix {
        StateMatrix::from_cells(&self.cells)
    }

    /// Single-channel view: `-2` flagged, `-1` hidden, `0..=8` revealed count.
    pub fn compact_observation(&self) -> Array2<i8> {
        self.cells.map(|cell| match cell.state() {
            CellState::Hidden => -1,
            CellState::Flagged => -2,
            CellState::Revealed => cell.adjacent_mines() as i8,
        })
    }
}
