//! # Players
//!
//! A player is whatever decides the moves for one side: the Monte Carlo
//! engine or a human typing at a prompt. The game loop asks the player whose
//! turn it is for a move and then tells every player which move was played.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::engine::MonteCarloEngine;
use crate::{GameError, GameState, PlayerError};

/// How many legal moves to list after an invalid entry.
const SUGGESTED_MOVES: usize = 5;

/// A decision maker for one side of a game.
pub trait Player<S: GameState> {
    /// The side this player moves for.
    fn side(&self) -> i32;

    /// Picks a move for `state`, which must be this player's turn.
    /// `Ok(None)` means the player cannot act (the game is over).
    fn choose_move(&mut self, state: &S) -> Result<Option<S::Move>, PlayerError>;

    /// Called after any player (including this one) made a move.
    fn notify_move(&mut self, mv: &S::Move, side: i32) -> Result<(), GameError>;
}

/// A player backed by a [`MonteCarloEngine`].
///
/// The engine's tree follows the game through `notify_move`, so work spent on
/// the position that actually arises is reused on the next turn.
pub struct MonteCarloPlayer<S: GameState> {
    side: i32,
    engine: MonteCarloEngine<S>,
}

impl<S: GameState> MonteCarloPlayer<S> {
    /// Creates a player for `side`, starting from `initial_state`.
    pub fn new(side: i32, initial_state: S, config: SearchConfig) -> Self {
        MonteCarloPlayer {
            side,
            engine: MonteCarloEngine::new(initial_state, config),
        }
    }

    pub fn engine(&self) -> &MonteCarloEngine<S> {
        &self.engine
    }
}

impl<S: GameState> Player<S> for MonteCarloPlayer<S> {
    fn side(&self) -> i32 {
        self.side
    }

    fn choose_move(&mut self, _state: &S) -> Result<Option<S::Move>, PlayerError> {
        info!(side = self.side, "thinking...");
        let mv = self.engine.get_move()?;
        if let Some(stats) = self.engine.last_search() {
            debug!(
                side = self.side,
                iterations = stats.iterations,
                root_trials = stats.root_trials,
                "search statistics"
            );
        }
        Ok(mv)
    }

    fn notify_move(&mut self, mv: &S::Move, side: i32) -> Result<(), GameError> {
        self.engine.advance(mv, side)
    }
}

/// A line-oriented source of typed moves.
///
/// `Stdin` reads through the process-wide buffer, so several human players can
/// share the terminal without holding a lock between turns.
pub trait MoveInput {
    /// Appends the next line to `buf` and returns the bytes read, 0 at end of input.
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl MoveInput for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::Stdin::read_line(self, buf)
    }
}

impl<T: AsRef<[u8]>> MoveInput for io::Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// A player that reads moves as text.
///
/// Prompts go to `output` and answers are read line by line from `input`,
/// so the same type serves the terminal and tests.
pub struct HumanPlayer<R, W> {
    side: i32,
    name: String,
    input: R,
    output: W,
}

impl<R: MoveInput, W: Write> HumanPlayer<R, W> {
    pub fn new(side: i32, name: impl Into<String>, input: R, output: W) -> Self {
        HumanPlayer {
            side,
            name: name.into(),
            input,
            output,
        }
    }

    /// Gives back the prompt sink, e.g. to inspect what was printed.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<S, R, W> Player<S> for HumanPlayer<R, W>
where
    S: GameState,
    S::Move: FromStr,
    R: MoveInput,
    W: Write,
{
    fn side(&self) -> i32 {
        self.side
    }

    fn choose_move(&mut self, state: &S) -> Result<Option<S::Move>, PlayerError> {
        let legal = state.legal_moves(self.side);
        if legal.is_empty() {
            return Ok(None);
        }

        loop {
            write!(self.output, "It is {}'s turn. What is your move? ", self.name)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(PlayerError::InputClosed { player: self.side });
            }

            match line.trim().parse::<S::Move>() {
                Ok(mv) if legal.contains(&mv) => return Ok(Some(mv)),
                _ => writeln!(
                    self.output,
                    "Invalid move! Possible moves include {}",
                    list_moves(&legal[..legal.len().min(SUGGESTED_MOVES)])
                )?,
            }
        }
    }

    fn notify_move(&mut self, _mv: &S::Move, _side: i32) -> Result<(), GameError> {
        Ok(())
    }
}

fn list_moves<M: fmt::Display>(moves: &[M]) -> String {
    moves
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
