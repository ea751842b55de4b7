//! # Monte Carlo Game Engine
//!
//! A turn-based two-player game framework with a Monte Carlo Tree Search (MCTS)
//! decision engine. Games plug in through the [`GameState`] trait; the engine
//! only ever sees that trait and hands moves back to the game loop.
//!
//! ## Modules
//! - [`node`]: the search tree node, its statistics and the selection policy
//! - [`engine`]: time-budgeted search over a root node, tree reuse between turns
//! - [`games`]: tic-tac-toe and Othello rule implementations
//! - [`player`]: decision drivers (engine-backed and human)
//! - [`game_controller`]: move validation, history and the game loop
//! - [`arena`]: batches of AI-vs-AI games on a thread pool
//! - [`transcript`]: saving and replaying played games

use std::fmt;

pub mod arena;
pub mod config;
pub mod engine;
pub mod error;
pub mod game_controller;
pub mod games;
pub mod node;
pub mod player;
pub mod transcript;

pub use config::SearchConfig;
pub use engine::{MonteCarloEngine, SearchStatistics};
pub use error::{GameError, PlayerError};
pub use node::Node;

/// The player who moves first (X in tic-tac-toe, Black in Othello).
pub const FIRST_PLAYER: i32 = 1;
/// The player who moves second (O in tic-tac-toe, White in Othello).
pub const SECOND_PLAYER: i32 = -1;

/// The result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The given player won.
    Win(i32),
    /// Nobody won.
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(player) => write!(f, "player {} wins", player),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// The state of the game at a single point in time.
///
/// States are immutable values: applying a move returns a new state and leaves
/// the receiver untouched. The search tree keeps one state per node and relies
/// on this.
pub trait GameState: Clone + fmt::Display {
    /// The type of a move in the game.
    type Move: Clone + PartialEq + fmt::Debug + fmt::Display;

    /// Returns every move available to `player`, in a fixed order.
    /// Empty if it is not `player`'s turn or the game is over.
    fn legal_moves(&self, player: i32) -> Vec<Self::Move>;

    /// Returns the state reached when `player` makes `mv`.
    ///
    /// Fails with [`GameError::OutOfTurn`] if `player` is not the active player
    /// and with [`GameError::IllegalMove`] if `mv` is not currently legal.
    fn apply_move(&self, player: i32, mv: &Self::Move) -> Result<Self, GameError>;

    /// Returns the player whose turn it is to move.
    fn active_player(&self) -> i32;

    /// Returns true if the game has ended, with or without a winner.
    fn is_finished(&self) -> bool;

    /// Returns the outcome of the game, `None` while it is still being played.
    fn winner(&self) -> Option<Outcome>;
}

/// Returns the opponent of `player`.
pub fn opponent(player: i32) -> i32 {
    -player
}

/// Checks that `player` is one of the two player ids.
pub fn validate_player(player: i32) -> Result<i32, GameError> {
    match player {
        FIRST_PLAYER | SECOND_PLAYER => Ok(player),
        other => Err(GameError::InvalidPlayer(other)),
    }
}
