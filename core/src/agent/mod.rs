use alloc::boxed::Box;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;
pub use heuristic::*;
pub use random::*;

mod heuristic;
mod random;

/// Universal interface for all agents.
pub trait Agent {
    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Pick the next move from the visible board, or `None` when the agent has no legal
    /// or confident move. The caller decides the fallback.
    fn choose_action(&mut self, state: &StateMatrix) -> Option<Action>;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn choose_action(&mut self, state: &StateMatrix) -> Option<Action> {
        (**self).choose_action(state)
    }
}

/// One applied move, paired with the board as it looked right before the move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub state_before: StateMatrix,
    pub action: Action,
    pub move_index: usize,
    pub reward: f32,
    pub status_after: GameStatus,
}

/// Runs an agent against a borrowed game and keeps the training records of that game.
#[derive(Debug)]
pub struct Player<'g, A> {
    game: &'g mut Game,
    agent: A,
    records: Vec<TrainingRecord>,
}

impl<'g, A: Agent> Player<'g, A> {
    pub fn new(game: &'g mut Game, agent: A) -> Self {
        Self {
            game,
            agent,
            records: Vec::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &*self.game
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    pub fn choose_action(&mut self) -> Option<Action> {
        let state = self.game.state_matrix();
        self.agent.choose_action(&state)
    }

    /// Applies `action`, recording it with the pre-move snapshot. Rejected moves leave
    /// both the game and the records untouched.
    pub fn make_move(&mut self, action: Action) -> Result<GameStatus> {
        let state_before = self.game.state_matrix();
        let step = self.game.step(action)?;

        log::trace!("{} #{}: {} -> {:?}", self.agent.name(), self.records.len(), action, step.status);
        self.records.push(TrainingRecord {
            state_before,
            action,
            move_index: self.records.len(),
            reward: step.reward,
            status_after: step.status,
        });
        Ok(step.status)
    }

    pub fn training_data(&self) -> &[TrainingRecord] {
        &self.records
    }

    /// Deals a new game and starts an empty record list.
    pub fn reset<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.game.reset(rng)?;
        self.records.clear();
        Ok(())
    }

    /// Hands the records of the finished game over to the caller.
    pub fn into_training_data(self) -> Vec<TrainingRecord> {
        self.records
    }
}
