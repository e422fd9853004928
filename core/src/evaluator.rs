use alloc::string::{String, ToString};
use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// What to do when the agent has no move to offer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fallback {
    /// Reveal a uniformly random hidden cell.
    #[default]
    RandomReveal,
    /// Stop the game; it counts as stuck.
    Forfeit,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub board: GameConfig,
    pub games: usize,
    /// Agent turns allowed per game, rejected and no-op moves included.
    pub max_turns: usize,
    pub seed: u64,
    pub fallback: Fallback,
    pub rewards: RewardScheme,
    /// Keep every game's training records in the report.
    pub keep_traces: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            board: GameConfig::default(),
            games: 100,
            max_turns: 200,
            seed: 0,
            fallback: Fallback::default(),
            rewards: RewardScheme::default(),
            keep_traces: true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
    /// The agent ran out of turns or moves before the game ended. Counted as a loss.
    Stuck,
}

/// Result of a single evaluated game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameTrace {
    pub records: Vec<TrainingRecord>,
    pub outcome: GameOutcome,
    pub status: GameStatus,
    /// Moves that changed the board.
    pub moves: u32,
    pub turns: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalSummary {
    pub agent: String,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub stuck: usize,
    pub win_rate: f64,
    pub avg_moves: f64,
    pub avg_moves_on_win: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub summary: EvalSummary,
    /// One entry per game, empty unless [`EvalConfig::keep_traces`] is set.
    pub traces: Vec<GameTrace>,
}

impl EvalReport {
    pub fn win_rate(&self) -> f64 {
        self.summary.win_rate
    }

    pub fn avg_moves(&self) -> f64 {
        self.summary.avg_moves
    }

    pub fn avg_moves_on_win(&self) -> f64 {
        self.summary.avg_moves_on_win
    }
}

/// Running totals across games.
#[derive(Clone, Debug, Default)]
struct Tally {
    games: usize,
    wins: usize,
    losses: usize,
    stuck: usize,
    total_moves: u64,
    winning_moves: u64,
}

impl Tally {
    fn record(&mut self, outcome: GameOutcome, moves: u32) {
        self.games += 1;
        self.total_moves += u64::from(moves);
        match outcome {
            GameOutcome::Won => {
                self.wins += 1;
                self.winning_moves += u64::from(moves);
            }
            GameOutcome::Lost => self.losses += 1,
            GameOutcome::Stuck => self.stuck += 1,
        }
    }

    fn summary(&self, agent: String) -> EvalSummary {
        let ratio = |num: u64, den: usize| {
            if den == 0 { 0.0 } else { num as f64 / den as f64 }
        };
        EvalSummary {
            agent,
            games: self.games,
            wins: self.wins,
            losses: self.losses,
            stuck: self.stuck,
            win_rate: ratio(self.wins as u64, self.games),
            avg_moves: ratio(self.total_moves, self.games),
            avg_moves_on_win: ratio(self.winning_moves, self.wins),
        }
    }
}

/// Plays `config.games` independent games, each with a fresh board and a fresh agent
/// from `factory`. The factory receives a per-game seed derived from `config.seed`.
pub fn evaluate<A, F>(mut factory: F, config: &EvalConfig) -> Result<EvalReport>
where
    A: Agent,
    F: FnMut(u64) -> A,
{
    config.board.validate()?;

    let mut seeds = SmallRng::seed_from_u64(config.seed);
    let mut tally = Tally::default();
    let mut traces = Vec::new();
    let mut agent_name = None;

    for game_index in 0..config.games {
        let mut board_rng = SmallRng::seed_from_u64(seeds.random());
        let mut fallback_rng = SmallRng::seed_from_u64(seeds.random());
        let agent = factory(seeds.random());
        agent_name.get_or_insert_with(|| agent.name().to_string());

        let mut game = Game::new(config.board, &mut board_rng)?.with_rewards(config.rewards);
        let trace = play_game(&mut game, agent, config, &mut fallback_rng);
        log::debug!(
            "game {}: {:?} after {} moves ({} turns)",
            game_index,
            trace.outcome,
            trace.moves,
            trace.turns
        );

        tally.record(trace.outcome, trace.moves);
        if config.keep_traces {
            traces.push(trace);
        }
    }

    let summary = tally.summary(agent_name.unwrap_or_default());
    log::info!(
        "{}: {}/{} won ({:.1}%), {} stuck, {:.2} moves per game",
        summary.agent,
        summary.wins,
        summary.games,
        summary.win_rate * 100.0,
        summary.stuck,
        summary.avg_moves
    );
    Ok(EvalReport { summary, traces })
}

/// Drives one game to its end or to the turn cap.
pub fn play_game<A: Agent, R: Rng + ?Sized>(
    game: &mut Game,
    agent: A,
    config: &EvalConfig,
    rng: &mut R,
) -> GameTrace {
    let mut player = Player::new(game, agent);
    let mut turns = 0;

    while !player.game().is_terminal() {
        if turns >= config.max_turns {
            log::warn!(
                "{} stuck: no result after {} turns",
                player.agent().name(),
                turns
            );
            break;
        }
        turns += 1;

        let action = match player.choose_action() {
            Some(action) => action,
            None => match fallback_action(&player.game().state_matrix(), config.fallback, rng) {
                Some(action) => action,
                None => {
                    log::warn!("{} stuck: no move available", player.agent().name());
                    break;
                }
            },
        };

        if let Err(err) = player.make_move(action) {
            log::warn!("{} proposed {}: {}", player.agent().name(), action, err);
        }
    }

    let status = player.game().status();
    let moves = player.game().move_count();
    let outcome = match status {
        GameStatus::Won => GameOutcome::Won,
        GameStatus::Lost => GameOutcome::Lost,
        GameStatus::InProgress => GameOutcome::Stuck,
    };

    GameTrace {
        records: player.into_training_data(),
        outcome,
        status,
        moves,
        turns,
    }
}

fn fallback_action<R: Rng + ?Sized>(
    state: &StateMatrix,
    fallback: Fallback,
    rng: &mut R,
) -> Option<Action> {
    match fallback {
        Fallback::RandomReveal => state
            .cells_matching(CellView::Hidden)
            .choose(rng)
            .map(|&coords| Action::reveal(coords)),
        Fallback::Forfeit => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl Agent for Idle {
        fn name(&self) -> &str {
            "Idle"
        }

        fn choose_action(&mut self, _state: &StateMatrix) -> Option<Action> {
            None
        }
    }

    /// Keeps toggling the same flag, which never ends a game.
    struct Dithering;

    impl Agent for Dithering {
        fn name(&self) -> &str {
            "Dithering"
        }

        fn choose_action(&mut self, _state: &StateMatrix) -> Option<Action> {
            Some(Action::flag((0, 0)))
        }
    }

    fn config(games: usize) -> EvalConfig {
        EvalConfig {
            board: GameConfig::new(5, 5, 3).unwrap(),
            games,
            ..Default::default()
        }
    }

    #[test]
    fn turn_cap_is_a_stuck_loss() {
        let config = EvalConfig {
            max_turns: 10,
            ..config(3)
        };

        let report = evaluate(|_| Dithering, &config).unwrap();

        assert_eq!(report.summary.stuck, 3);
        assert_eq!(report.summary.wins, 0);
        assert_eq!(report.win_rate(), 0.0);
        for trace in &report.traces {
            assert_eq!(trace.outcome, GameOutcome::Stuck);
            assert_eq!(trace.turns, 10);
            assert_eq!(trace.records.len(), 10);
        }
    }

    #[test]
    fn forfeit_ends_game_without_moves() {
        let config = EvalConfig {
            fallback: Fallback::Forfeit,
            ..config(2)
        };

        let report = evaluate(|_| Idle, &config).unwrap();

        assert_eq!(report.summary.stuck, 2);
        assert_eq!(report.avg_moves(), 0.0);
        assert!(report.traces.iter().all(|trace| trace.records.is_empty()));
    }

    #[test]
    fn random_fallback_finishes_games() {
        let report = evaluate(|_| Idle, &config(20)).unwrap();

        assert_eq!(report.summary.stuck, 0);
        assert_eq!(report.summary.wins + report.summary.losses, 20);
        for trace in &report.traces {
            assert!(trace.status.is_finished());
            assert_eq!(trace.records.len(), trace.moves as usize);
            assert_eq!(trace.records.last().unwrap().status_after, trace.status);
        }
    }

    #[test]
    fn same_seed_same_report() {
        let a = evaluate(RandomAgent::new, &config(10)).unwrap();
        let b = evaluate(RandomAgent::new, &config(10)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn traces_can_be_dropped() {
        let config = EvalConfig {
            keep_traces: false,
            ..config(5)
        };
        let report = evaluate(RandomAgent::new, &config).unwrap();
        assert!(report.traces.is_empty());
        assert_eq!(report.summary.games, 5);
    }

    #[test]
    fn invalid_board_is_rejected_up_front() {
        let config = EvalConfig {
            board: GameConfig::new_unchecked(2, 2, 4),
            ..Default::default()
        };
        assert_eq!(
            evaluate(RandomAgent::new, &config),
            Err(GameError::TooManyMines { mines: 4, cells: 4 })
        );
    }

    #[test]
    fn tally_averages() {
        let mut tally = Tally::default();
        tally.record(GameOutcome::Won, 10);
        tally.record(GameOutcome::Lost, 4);
        tally.record(GameOutcome::Won, 6);
        tally.record(GameOutcome::Stuck, 0);

        let summary = tally.summary("test".to_string());

        assert_eq!(summary.win_rate, 0.5);
        assert_eq!(summary.avg_moves, 5.0);
        assert_eq!(summary.avg_moves_on_win, 8.0);
    }
}
