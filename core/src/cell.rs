use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

/// A grid position: the mine flag and adjacency count are fixed once the board is dealt,
/// only `state` changes afterwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_mine: bool,
    adjacent_mines: u8,
    state: CellState,
}

impl Cell {
    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn is_hidden(&self) -> bool {
        matches!(self.state, CellState::Hidden)
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    pub(crate) fn set_mine(&mut self, is_mine: bool) {
        self.is_mine = is_mine;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    /// Hidden -> Revealed. Returns whether the cell changed.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.is_hidden() {
            self.state = CellState::Revealed;
            true
        } else {
            false
        }
    }

    /// Hidden <-> Flagged. Revealed cells never change.
    pub(crate) fn toggle_flag(&mut self) -> bool {
        use CellState::*;

        self.state = match self.state {
            Hidden => Flagged,
            Flagged => Hidden,
            Revealed => return false,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flag_transitions() {
        for start in [CellState::Hidden, CellState::Flagged, CellState::Revealed] {
            let mut cell = Cell {
                state: start,
                ..Default::default()
            };
            let changed = cell.toggle_flag();
            match (start, cell.state()) {
                (CellState::Hidden, CellState::Flagged) => assert!(changed),
                (CellState::Flagged, CellState::Hidden) => assert!(changed),
                (CellState::Revealed, CellState::Revealed) => assert!(!changed),
                other => panic!("unexpected toggle transition {other:?}"),
            }
        }
    }

    #[test]
    fn reveal_skips_flagged_and_revealed() {
        let mut flagged = Cell {
            state: CellState::Flagged,
            ..Default::default()
        };
        assert!(!flagged.reveal());
        assert!(flagged.is_flagged());

        let mut hidden = Cell::default();
        assert!(hidden.reveal());
        assert!(!hidden.reveal());
        assert!(hidden.is_revealed());
    }
}
