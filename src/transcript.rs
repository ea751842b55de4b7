//! # Game Transcripts
//!
//! A transcript records which game was played, every move in order and the
//! result, as JSON. Moves are stored in the same text notation humans type,
//! so a transcript can be read by eye and replayed through the game rules.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::game_controller::{GameController, GameStatus};
use crate::games::GameKind;
use crate::{GameError, GameState, Outcome};

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed transcript: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown game '{0}'")]
    UnknownGame(String),

    #[error("move {index} '{text}' cannot be parsed")]
    BadMove { index: usize, text: String },

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("recorded result {recorded:?} does not match replayed result {replayed:?}")]
    OutcomeMismatch {
        recorded: Option<RecordedOutcome>,
        replayed: Option<RecordedOutcome>,
    },
}

/// The result of a game as stored in a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordedOutcome {
    Win(i32),
    Draw,
}

impl From<Outcome> for RecordedOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win(player) => RecordedOutcome::Win(player),
            Outcome::Draw => RecordedOutcome::Draw,
        }
    }
}

/// One move of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedMove {
    pub player: i32,
    #[serde(rename = "move")]
    pub text: String,
}

/// A played game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub game: String,
    pub moves: Vec<RecordedMove>,
    /// `None` if the game was stopped before it finished.
    pub outcome: Option<RecordedOutcome>,
}

impl Transcript {
    /// Records the history and result held by `controller`.
    pub fn from_controller<S: GameState>(controller: &GameController<S>) -> Self {
        let outcome = match controller.status() {
            GameStatus::Finished(outcome) => Some(outcome.into()),
            GameStatus::InProgress => None,
        };
        Transcript {
            game: controller.kind().name().to_string(),
            moves: controller
                .history()
                .iter()
                .map(|entry| RecordedMove {
                    player: entry.player,
                    text: entry.move_made.to_string(),
                })
                .collect(),
            outcome,
        }
    }

    /// The game this transcript belongs to.
    pub fn kind(&self) -> Result<GameKind, TranscriptError> {
        GameKind::from_name(&self.game).ok_or_else(|| TranscriptError::UnknownGame(self.game.clone()))
    }

    pub fn to_json(&self) -> Result<String, TranscriptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, TranscriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), TranscriptError> {
        fs::write(path, self.to_json()?).map_err(|source| TranscriptError::Io {
            operation: format!("write {}", path.display()),
            source,
        })?;
        info!(path = %path.display(), moves = self.moves.len(), "saved transcript");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, TranscriptError> {
        let json = fs::read_to_string(path).map_err(|source| TranscriptError::Io {
            operation: format!("read {}", path.display()),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Re-applies every move to `initial` with full rule checks and returns
    /// the final state. The recorded result must match the replayed one.
    pub fn replay<S>(&self, initial: S) -> Result<S, TranscriptError>
    where
        S: GameState,
        S::Move: FromStr,
    {
        let mut state = initial;
        for (index, recorded) in self.moves.iter().enumerate() {
            let mv = recorded
                .text
                .parse::<S::Move>()
                .map_err(|_| TranscriptError::BadMove {
                    index,
                    text: recorded.text.clone(),
                })?;
            state = state.apply_move(recorded.player, &mv)?;
        }

        let replayed = state.winner().map(RecordedOutcome::from);
        if replayed != self.outcome {
            return Err(TranscriptError::OutcomeMismatch {
                recorded: self.outcome,
                replayed,
            });
        }
        Ok(state)
    }
}
