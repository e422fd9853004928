use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::Agent;
use crate::*;

/// An agent that picks uniformly among the cells that are not revealed yet.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: SmallRng,
    flag_probability: f64,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: SmallRng) -> Self {
        Self {
            rng,
            flag_probability: 0.0,
        }
    }

    /// With a non-zero probability flagged cells become candidates too (to unflag them)
    /// and hidden cells are flagged instead of revealed that often.
    pub fn with_flag_probability(mut self, flag_probability: f64) -> Self {
        self.flag_probability = flag_probability.clamp(0.0, 1.0);
        self
    }

    pub fn flag_probability(&self) -> f64 {
        self.flag_probability
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "Random"
    }

    fn choose_action(&mut self, state: &StateMatrix) -> Option<Action> {
        let flags_enabled = self.flag_probability > 0.0;
        let candidates: Vec<(Coord2, CellView)> = state
            .coords()
            .filter_map(|coords| Some((coords, state.view(coords)?)))
            .filter(|(_, view)| match view {
                CellView::Hidden => true,
                CellView::Flagged => flags_enabled,
                CellView::Revealed(_) => false,
            })
            .collect();

        let &(coords, view) = candidates.choose(&mut self.rng)?;
        Some(match view {
            CellView::Flagged => Action::flag(coords),
            _ if flags_enabled && self.rng.random_bool(self.flag_probability) => {
                Action::flag(coords)
            }
            _ => Action::reveal(coords),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_picks_hidden_cells() {
        let mut board = Board::from_mine_coords(3, 3, &[(1, 1)]).unwrap();
        board.reveal((0, 0)).unwrap();
        board.toggle_flag((2, 2)).unwrap();
        let state = board.state_matrix();
        let mut agent = RandomAgent::new(4);

        for _ in 0..100 {
            let action = agent.choose_action(&state).unwrap();
            assert_eq!(action.kind, ActionKind::Reveal);
            assert_eq!(state.view(action.coords()), Some(CellView::Hidden));
        }
    }

    #[test]
    fn none_when_nothing_hidden() {
        let mut board = Board::from_mine_coords(1, 2, &[(0, 1)]).unwrap();
        board.reveal((0, 0)).unwrap();
        board.toggle_flag((0, 1)).unwrap();

        let mut agent = RandomAgent::new(0);
        assert_eq!(agent.choose_action(&board.state_matrix()), None);

        let mut flagging = RandomAgent::new(0).with_flag_probability(0.5);
        assert_eq!(
            flagging.choose_action(&board.state_matrix()),
            Some(Action::flag((0, 1)))
        );
    }

    #[test]
    fn covers_every_hidden_cell() {
        let board = Board::from_mine_coords(2, 2, &[]).unwrap();
        let state = board.state_matrix();
        let mut agent = RandomAgent::new(17);
        let mut seen = alloc::collections::BTreeSet::new();

        for _ in 0..200 {
            seen.insert(agent.choose_action(&state).unwrap().coords());
        }

        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn flag_probability_is_clamped() {
        assert_eq!(RandomAgent::new(0).with_flag_probability(3.0).flag_probability(), 1.0);
    }
}
