//! # Game Implementations Module
//!
//! This module contains implementations of all supported games.
//! Each game implements the `GameState` trait to provide a consistent interface
//! for the Monte Carlo Tree Search engine and the game loop.
//!
//! ## Supported Games
//! - **Tic-tac-toe**: 3x3 grid, three in a row wins
//! - **Othello (Reversi)**: Classic 8x8 piece-flipping strategy game
//!
//! ## Adding New Games
//! To add a new game, create a new module and implement:
//! 1. A move type with `Display` and `FromStr` so humans can type it and transcripts can store it
//! 2. A game state type with the `GameState` trait
//! 3. Game-specific rules and win conditions
//! 4. A `GameKind` variant so the binaries can select it

use std::fmt;

use clap::ValueEnum;

pub mod othello;
pub mod tictactoe;

/// The games the binaries know how to set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GameKind {
    TicTacToe,
    Othello,
}

impl GameKind {
    /// The stable name stored in transcripts.
    pub fn name(&self) -> &'static str {
        match self {
            GameKind::TicTacToe => "tic-tac-toe",
            GameKind::Othello => "othello",
        }
    }

    /// Looks a game up by its transcript name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tic-tac-toe" => Some(GameKind::TicTacToe),
            "othello" => Some(GameKind::Othello),
            _ => None,
        }
    }

    /// Returns a display name for `player` in this game.
    pub fn player_name(&self, player: i32) -> &'static str {
        match (self, player) {
            (GameKind::TicTacToe, 1) => "X",
            (GameKind::TicTacToe, _) => "O",
            (GameKind::Othello, 1) => "Black",
            (GameKind::Othello, _) => "White",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
