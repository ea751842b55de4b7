//! # Game Controller Module - Central Game State Management
//!
//! This module provides the `GameController` which serves as the single source of truth
//! for the authoritative game state, and `play_game`, the loop that drives two
//! players through a game.
//!
//! The engines inside the players keep their own copies of the state in their
//! search trees. The controller's copy is the one every move is validated
//! against before it is applied and announced to the players.

use tracing::{debug, info};

use crate::games::GameKind;
use crate::player::Player;
use crate::{GameError, GameState, Outcome, PlayerError};

/// Result of attempting to apply a move
#[derive(Debug, Clone, PartialEq)]
pub enum MoveResult<M> {
    /// Move was successfully applied
    Success {
        /// The applied move
        move_made: M,
        /// Player who made the move
        player: i32,
        /// The outcome if the move ended the game
        outcome: Option<Outcome>,
    },
    /// Move was rejected by the game rules
    Invalid { reason: GameError },
    /// Game is already over, no more moves allowed
    GameOver,
}

/// A single entry in the move history
#[derive(Debug, Clone, PartialEq)]
pub struct MoveHistoryEntry<M> {
    /// Player who made the move
    pub player: i32,
    /// The move that was made
    pub move_made: M,
    /// Move number (1-indexed)
    pub move_number: usize,
}

/// Current game status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Finished(Outcome),
}

impl GameStatus {
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// The central game controller that owns the authoritative game state
///
/// All moves go through the controller, which validates them with the game
/// rules before applying them.
#[derive(Debug, Clone)]
pub struct GameController<S: GameState> {
    kind: GameKind,
    /// The authoritative game state
    game_state: S,
    /// Complete history of moves made
    move_history: Vec<MoveHistoryEntry<S::Move>>,
    status: GameStatus,
}

impl<S: GameState> GameController<S> {
    /// Create a new game controller with the given initial state
    pub fn new(kind: GameKind, initial_state: S) -> Self {
        let status = Self::status_of(&initial_state);
        Self {
            kind,
            game_state: initial_state,
            move_history: Vec::new(),
            status,
        }
    }

    fn status_of(state: &S) -> GameStatus {
        match state.winner() {
            Some(outcome) => GameStatus::Finished(outcome),
            None => GameStatus::InProgress,
        }
    }

    /// Attempt to make a move for the player whose turn it is
    pub fn try_make_move(&mut self, mv: S::Move) -> MoveResult<S::Move> {
        if self.status.is_game_over() {
            return MoveResult::GameOver;
        }

        let player = self.game_state.active_player();
        let next = match self.game_state.apply_move(player, &mv) {
            Ok(next) => next,
            Err(reason) => return MoveResult::Invalid { reason },
        };

        self.game_state = next;
        self.move_history.push(MoveHistoryEntry {
            player,
            move_made: mv.clone(),
            move_number: self.move_history.len() + 1,
        });
        self.status = Self::status_of(&self.game_state);

        let outcome = match self.status {
            GameStatus::Finished(outcome) => Some(outcome),
            GameStatus::InProgress => None,
        };
        MoveResult::Success {
            move_made: mv,
            player,
            outcome,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn state(&self) -> &S {
        &self.game_state
    }

    pub fn current_player(&self) -> i32 {
        self.game_state.active_player()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    pub fn history(&self) -> &[MoveHistoryEntry<S::Move>] {
        &self.move_history
    }

    pub fn move_count(&self) -> usize {
        self.move_history.len()
    }

    /// Get legal moves for the current player
    pub fn legal_moves(&self) -> Vec<S::Move> {
        self.game_state.legal_moves(self.current_player())
    }

    /// Reset the game to a new initial state
    pub fn reset(&mut self, new_state: S) {
        self.status = Self::status_of(&new_state);
        self.game_state = new_state;
        self.move_history.clear();
    }

    /// Format move history as plain text, one numbered move per line
    pub fn format_history(&self) -> String {
        if self.move_history.is_empty() {
            return String::from("No moves made yet.");
        }

        let mut output = format!("=== {} Game History ===\n\n", self.kind);

        for entry in &self.move_history {
            output.push_str(&format!(
                "{}. {} - {}\n",
                entry.move_number,
                self.kind.player_name(entry.player),
                entry.move_made
            ));
        }

        match self.status {
            GameStatus::Finished(Outcome::Win(winner)) => {
                output.push_str(&format!("\nResult: {} wins!\n", self.kind.player_name(winner)));
            }
            GameStatus::Finished(Outcome::Draw) => {
                output.push_str("\nResult: Draw\n");
            }
            GameStatus::InProgress => {
                output.push_str(&format!(
                    "\n(Game in progress - {} to move)\n",
                    self.kind.player_name(self.current_player())
                ));
            }
        }

        output
    }
}

/// Plays a game from `initial_state` until it finishes.
///
/// Each turn the player for the active side is asked for a move, the move is
/// validated and applied, and every player is notified. `on_move` sees the
/// controller after each applied move.
pub fn play_game<S, F>(
    kind: GameKind,
    initial_state: S,
    players: &mut [&mut dyn Player<S>],
    mut on_move: F,
) -> Result<GameController<S>, PlayerError>
where
    S: GameState,
    F: FnMut(&GameController<S>),
{
    let mut controller = GameController::new(kind, initial_state);

    while !controller.is_game_over() {
        let side = controller.current_player();
        let player = players
            .iter_mut()
            .find(|player| player.side() == side)
            .ok_or(PlayerError::MissingPlayer(side))?;

        let mv = player
            .choose_move(controller.state())?
            .ok_or(PlayerError::Stalled { player: side })?;

        match controller.try_make_move(mv.clone()) {
            MoveResult::Success { .. } => {}
            MoveResult::Invalid { reason } => return Err(reason.into()),
            MoveResult::GameOver => break,
        }
        debug!(side, %mv, move_number = controller.move_count(), "move played");

        for player in players.iter_mut() {
            player.notify_move(&mv, side)?;
        }
        on_move(&controller);
    }

    if let GameStatus::Finished(outcome) = controller.status() {
        info!(game = %kind, moves = controller.move_count(), %outcome, "game over");
    }
    Ok(controller)
}
