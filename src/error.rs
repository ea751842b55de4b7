//! Error types shared by the game implementations and the search engine.

use thiserror::Error;

/// Errors raised by [`crate::GameState`] implementations.
///
/// The search engine never produces these itself: it only applies moves taken
/// from `legal_moves`, so any `GameError` reaching a caller of the engine comes
/// straight from the game rules and is passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A player tried to move while it was the opponent's turn.
    #[error("it is not player {player}'s turn")]
    OutOfTurn { player: i32 },

    /// The move is not in the current legal move list.
    #[error("illegal move {mv} for player {player}")]
    IllegalMove { player: i32, mv: String },

    /// A player id other than `1` or `-1`.
    #[error("invalid player {0}")]
    InvalidPlayer(i32),

    /// A custom starting position that cannot occur under the rules.
    #[error("invalid board: {0}")]
    InvalidBoard(String),
}

/// Errors raised while a player chooses a move or the game loop drives players.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("failed to read move: {0}")]
    Io(#[from] std::io::Error),

    /// The human input stream ended before a legal move was entered.
    #[error("input closed before player {player} chose a move")]
    InputClosed { player: i32 },

    #[error("no player is registered for side {0}")]
    MissingPlayer(i32),

    /// A player returned no move although the game is not over.
    #[error("player {player} has no move although the game is not over")]
    Stalled { player: i32 },
}
