//! # Arena
//!
//! Plays batches of AI-vs-AI games. Every game gets its own pair of engines
//! and its own search trees, so games run in parallel on a rayon thread pool
//! without sharing any tree state; only the final tally is shared.

use parking_lot::Mutex;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::game_controller::{play_game, GameStatus};
use crate::games::GameKind;
use crate::player::{MonteCarloPlayer, Player};
use crate::{GameState, Outcome, PlayerError, FIRST_PLAYER, SECOND_PLAYER};

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Player(#[from] PlayerError),
}

/// Tally of a finished arena run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaSummary {
    pub games: usize,
    pub first_player_wins: usize,
    pub second_player_wins: usize,
    pub draws: usize,
    /// Moves played across all games.
    pub total_moves: usize,
}

impl ArenaSummary {
    fn record(&mut self, outcome: Outcome, moves: usize) {
        self.games += 1;
        self.total_moves += moves;
        match outcome {
            Outcome::Win(FIRST_PLAYER) => self.first_player_wins += 1,
            Outcome::Win(_) => self.second_player_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }
}

/// Settings for an arena run.
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub games: usize,
    /// Worker threads; 0 uses one per CPU.
    pub threads: usize,
    /// Engine settings for the side moving first.
    pub first: SearchConfig,
    /// Engine settings for the side moving second.
    pub second: SearchConfig,
}

impl ArenaConfig {
    pub fn new(games: usize, search: SearchConfig) -> Self {
        ArenaConfig {
            games,
            threads: 0,
            first: search.clone(),
            second: search,
        }
    }
}

/// Gives each game its own seed so seeded runs stay reproducible without
/// every game playing out identically.
fn seeded_for_game(config: &SearchConfig, game: usize, side_offset: u64) -> SearchConfig {
    let mut config = config.clone();
    if let Some(seed) = config.seed {
        config.seed = Some(seed.wrapping_add((game as u64) * 2 + side_offset));
    }
    config
}

/// Plays `config.games` games between two engines, starting each from
/// `new_game()`.
pub fn run_arena<S, F>(kind: GameKind, new_game: F, config: &ArenaConfig) -> Result<ArenaSummary, ArenaError>
where
    S: GameState,
    F: Fn() -> S + Sync,
{
    let threads = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
    let summary = Mutex::new(ArenaSummary::default());

    info!(game = %kind, games = config.games, threads, "starting arena");

    pool.install(|| {
        (0..config.games).into_par_iter().try_for_each(|game| {
            let initial = new_game();
            let mut first = MonteCarloPlayer::new(
                FIRST_PLAYER,
                initial.clone(),
                seeded_for_game(&config.first, game, 0),
            );
            let mut second = MonteCarloPlayer::new(
                SECOND_PLAYER,
                initial.clone(),
                seeded_for_game(&config.second, game, 1),
            );
            let mut players: [&mut dyn Player<S>; 2] = [&mut first, &mut second];

            let controller = play_game(kind, initial, &mut players, |_| {})?;
            if let GameStatus::Finished(outcome) = controller.status() {
                debug!(game, %outcome, moves = controller.move_count(), "arena game finished");
                summary.lock().record(outcome, controller.move_count());
            }
            Ok::<(), PlayerError>(())
        })
    })?;

    let summary = summary.into_inner();
    info!(
        first_wins = summary.first_player_wins,
        second_wins = summary.second_player_wins,
        draws = summary.draws,
        "arena finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::TicTacToeState;

    #[test]
    fn test_summary_record() {
        let mut summary = ArenaSummary::default();
        summary.record(Outcome::Win(1), 5);
        summary.record(Outcome::Win(-1), 6);
        summary.record(Outcome::Draw, 9);

        assert_eq!(summary.games, 3);
        assert_eq!(summary.first_player_wins, 1);
        assert_eq!(summary.second_player_wins, 1);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.total_moves, 20);
    }

    #[test]
    fn test_seed_per_game() {
        let config = SearchConfig::default().with_seed(10);
        assert_eq!(seeded_for_game(&config, 0, 0).seed, Some(10));
        assert_eq!(seeded_for_game(&config, 3, 1).seed, Some(17));
        assert_eq!(seeded_for_game(&SearchConfig::default(), 3, 1).seed, None);
    }

    #[test]
    fn test_tic_tac_toe_arena() {
        let mut config = ArenaConfig::new(4, SearchConfig::for_testing(200, 1));
        config.threads = 2;

        let summary = run_arena(GameKind::TicTacToe, TicTacToeState::new, &config).unwrap();
        assert_eq!(summary.games, 4);
        assert_eq!(
            summary.first_player_wins + summary.second_player_wins + summary.draws,
            4
        );
        assert!(summary.total_moves >= 4 * 5);
        assert!(summary.total_moves <= 4 * 9);
    }
}
