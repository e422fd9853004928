use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::Agent;
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionRule {
    /// The clue already has as many flags as its count: other hidden neighbours are safe.
    AllMinesFound,
    /// The clue's remaining hidden neighbours exactly match its missing mines.
    AllRemainingMines,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    pub clue: Coord2,
    pub rule: DeductionRule,
    pub action: Action,
}

/// Single-clue deductions over revealed counts. Cells and their neighbours are scanned in
/// row-major order and the first applicable deduction wins, so the choice is a pure
/// function of the state matrix.
#[derive(Copy, Clone, Debug, Default)]
pub struct HeuristicAgent;

impl HeuristicAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn deduce(state: &StateMatrix) -> Option<Deduction> {
        state.coords().find_map(|clue| {
            let Some(CellView::Revealed(count)) = state.view(clue) else {
                return None;
            };
            if count == 0 {
                return None;
            }

            let mut hidden: SmallVec<[Coord2; 8]> = SmallVec::new();
            let mut flagged = 0u8;
            for pos in state.neighbors(clue) {
                match state.view(pos) {
                    Some(CellView::Hidden) => hidden.push(pos),
                    Some(CellView::Flagged) => flagged += 1,
                    Some(CellView::Revealed(_)) | None => {}
                }
            }
            let &first = hidden.first()?;

            if flagged == count {
                Some(Deduction {
                    clue,
                    rule: DeductionRule::AllMinesFound,
                    action: Action::reveal(first),
                })
            } else if count.checked_sub(flagged) == Some(hidden.len() as u8) {
                Some(Deduction {
                    clue,
                    rule: DeductionRule::AllRemainingMines,
                    action: Action::flag(first),
                })
            } else {
                None
            }
        })
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str {
        "Heuristic"
    }

    fn choose_action(&mut self, state: &StateMatrix) -> Option<Action> {
        let deduction = Self::deduce(state)?;
        log::trace!(
            "clue {:?} -> {:?}: {}",
            deduction.clue,
            deduction.rule,
            deduction.action
        );
        Some(deduction.action)
    }
}
