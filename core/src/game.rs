use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Shaped rewards handed back by [`Game::step`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardScheme {
    pub mine: f32,
    pub safe_reveal: f32,
    /// Replaces `safe_reveal` on the move that clears the board.
    pub win: f32,
    pub flag: f32,
    pub no_op: f32,
    /// Charged by [`Game::step_index`] for an index outside the action space.
    pub invalid: f32,
}

impl Default for RewardScheme {
    fn default() -> Self {
        Self {
            mine: -10.0,
            safe_reveal: 0.1,
            win: 10.0,
            flag: 0.0,
            no_op: 0.0,
            invalid: -1.0,
        }
    }
}

/// Result of one [`Game::step`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub status: GameStatus,
    pub reward: f32,
    pub hit_mine: bool,
    /// Number of cells the move revealed, cascade included.
    pub revealed: usize,
    pub changed: bool,
}

/// Game controller: owns the board and decides when the game is over.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    status: GameStatus,
    move_count: u32,
    triggered_mine: Option<Coord2>,
    /// Seed for the deferred placement of a first-click-safe game.
    placement_seed: Option<u64>,
    rewards: RewardScheme,
}

impl Game {
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self> {
        let (board, placement_seed) = if config.first_click_safe {
            (Board::empty(config)?, Some(rng.random()))
        } else {
            (Board::generate(config, rng)?, None)
        };

        log::trace!(
            "new {}x{} game with {} mines (first click safe: {})",
            config.rows,
            config.cols,
            config.mines,
            config.first_click_safe
        );

        Ok(Self {
            board,
            status: GameStatus::InProgress,
            move_count: 0,
            triggered_mine: None,
            placement_seed,
            rewards: RewardScheme::default(),
        })
    }

    /// Wraps a board with a known layout, e.g. an engineered scenario. The status is
    /// read off the board, so a board with a revealed mine starts out lost.
    pub fn from_board(board: Board) -> Result<Self> {
        if !board.mines_placed() {
            return Err(GameError::MinesNotPlaced);
        }

        let triggered_mine = board.revealed_mine();
        let status = if triggered_mine.is_some() {
            GameStatus::Lost
        } else if board.is_cleared() {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        };

        Ok(Self {
            board,
            status,
            move_count: 0,
            triggered_mine,
            placement_seed: None,
            rewards: RewardScheme::default(),
        })
    }

    pub fn with_rewards(mut self, rewards: RewardScheme) -> Self {
        self.rewards = rewards;
        self
    }

    /// Deals a fresh board with the same configuration and rewards.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let rewards = self.rewards;
        *self = Self::new(*self.board.config(), rng)?.with_rewards(rewards);
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        self.board.config()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_finished()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn rewards(&self) -> &RewardScheme {
        &self.rewards
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn state_matrix(&self) -> StateMatrix {
        self.board.state_matrix()
    }

    pub fn action_space(&self) -> ActionSpace {
        ActionSpace::new(self.board.size())
    }

    pub fn reveal_cell(&mut self, row: Coord, col: Coord) -> Result<RevealResult> {
        let coords = self.board.config().validate_coords((row, col))?;
        self.check_in_progress()?;
        self.ensure_mines_placed(coords)?;
        if !self.board.mines_placed() {
            // flagged first click: nothing to reveal and nothing dealt
            return Ok(RevealResult::default());
        }

        let result = self.board.reveal(coords)?;
        if !result.has_update() {
            return Ok(result);
        }

        self.move_count += 1;
        if result.hit_mine {
            self.triggered_mine = Some(coords);
            self.end_game(GameStatus::Lost);
        } else if self.board.is_cleared() {
            self.end_game(GameStatus::Won);
        }

        Ok(result)
    }

    pub fn flag_cell(&mut self, row: Coord, col: Coord) -> Result<MarkOutcome> {
        let coords = self.board.config().validate_coords((row, col))?;
        self.check_in_progress()?;

        let outcome = self.board.toggle_flag(coords)?;
        if outcome.has_update() {
            self.move_count += 1;
        }
        Ok(outcome)
    }

    pub fn step(&mut self, action: Action) -> Result<Step> {
        let (row, col) = action.coords();
        let step = match action.kind {
            ActionKind::Reveal => {
                let result = self.reveal_cell(row, col)?;
                let reward = match (result.has_update(), result.hit_mine, self.status) {
                    (false, _, _) => self.rewards.no_op,
                    (true, true, _) => self.rewards.mine,
                    (true, false, GameStatus::Won) => self.rewards.win,
                    (true, false, _) => self.rewards.safe_reveal,
                };
                Step {
                    status: self.status,
                    reward,
                    hit_mine: result.hit_mine,
                    revealed: result.revealed.len(),
                    changed: result.has_update(),
                }
            }
            ActionKind::Flag => {
                let changed = self.flag_cell(row, col)?.has_update();
                Step {
                    status: self.status,
                    reward: if changed {
                        self.rewards.flag
                    } else {
                        self.rewards.no_op
                    },
                    hit_mine: false,
                    revealed: 0,
                    changed,
                }
            }
        };
        Ok(step)
    }

    /// Flat-index variant of [`Game::step`]. An index outside the action space leaves
    /// the game untouched and costs [`RewardScheme::invalid`] instead of failing.
    pub fn step_index(&mut self, index: usize) -> Result<Step> {
        match self.action_space().action_at(index) {
            Ok(action) => self.step(action),
            Err(GameError::InvalidAction { index, size }) => {
                log::debug!("action index {} outside space of {}", index, size);
                Ok(Step {
                    status: self.status,
                    reward: self.rewards.invalid,
                    hit_mine: false,
                    revealed: 0,
                    changed: false,
                })
            }
            Err(err) => Err(err),
        }
    }

    fn ensure_mines_placed(&mut self, first_click: Coord2) -> Result<()> {
        let Some(seed) = self.placement_seed else {
            return Ok(());
        };
        // a no-op first click on a flagged cell must not deal the board
        if !self.board.cell(first_click)?.is_hidden() {
            return Ok(());
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        self.board.place_mines(Some(first_click), &mut rng)?;
        self.placement_seed = None;
        log::trace!("mines placed around first click {:?}", first_click);
        Ok(())
    }

    fn end_game(&mut self, status: GameStatus) {
        if self.status.is_finished() {
            return;
        }

        log::debug!(
            "game over after {} moves: {:?} ({}/{} safe cells revealed)",
            self.move_count,
            status,
            self.board.revealed_count(),
            self.board.safe_cell_count()
        );
        self.status = status;
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
