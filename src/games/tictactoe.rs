//! # Tic-Tac-Toe Game Implementation
//!
//! Players alternate marking cells of a 3x3 grid; three marks in a row,
//! column or diagonal win, a full grid without a line is a draw.
//!
//! Cells are indexed 0 to 8 row by row, and a move is the index of the cell
//! to mark. X (player 1) moves first.

use std::fmt;

use crate::{opponent, validate_player, GameError, GameState, Outcome, FIRST_PLAYER};

/// All winning lines as cell indices.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A move is the index of the cell to mark.
pub type TicTacToeMove = usize;

/// The complete state of a tic-tac-toe game.
///
/// Cells hold 1 for X, -1 for O and 0 when empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicTacToeState {
    cells: [i32; 9],
    current_player: i32,
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToeState {
    /// Creates an empty board with X to move.
    pub fn new() -> Self {
        TicTacToeState {
            cells: [0; 9],
            current_player: FIRST_PLAYER,
        }
    }

    /// Creates a position from raw cells and the player to move.
    pub fn from_cells(cells: [i32; 9], to_move: i32) -> Result<Self, GameError> {
        let current_player = validate_player(to_move)?;
        if let Some(bad) = cells.iter().find(|&&cell| !(-1..=1).contains(&cell)) {
            return Err(GameError::InvalidBoard(format!("unknown cell value {}", bad)));
        }
        Ok(TicTacToeState {
            cells,
            current_player,
        })
    }

    pub fn cells(&self) -> &[i32; 9] {
        &self.cells
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != 0)
    }

    fn line_winner(&self) -> Option<i32> {
        LINES.iter().find_map(|line| {
            let first = self.cells[line[0]];
            (first != 0 && line.iter().all(|&i| self.cells[i] == first)).then_some(first)
        })
    }
}

impl GameState for TicTacToeState {
    type Move = TicTacToeMove;

    fn legal_moves(&self, player: i32) -> Vec<Self::Move> {
        if player != self.current_player || self.is_finished() {
            return Vec::new();
        }
        (0..self.cells.len())
            .filter(|&i| self.cells[i] == 0)
            .collect()
    }

    fn apply_move(&self, player: i32, mv: &Self::Move) -> Result<Self, GameError> {
        if player != self.current_player {
            return Err(GameError::OutOfTurn { player });
        }
        if !self.legal_moves(player).contains(mv) {
            return Err(GameError::IllegalMove {
                player,
                mv: mv.to_string(),
            });
        }

        let mut next = self.clone();
        next.cells[*mv] = player;
        next.current_player = opponent(player);
        Ok(next)
    }

    fn active_player(&self) -> i32 {
        self.current_player
    }

    fn is_finished(&self) -> bool {
        self.line_winner().is_some() || self.is_full()
    }

    fn winner(&self) -> Option<Outcome> {
        match self.line_winner() {
            Some(player) => Some(Outcome::Win(player)),
            None if self.is_full() => Some(Outcome::Draw),
            None => None,
        }
    }
}

impl fmt::Display for TicTacToeState {
    /// Draws the grid; empty cells show their index so a human can type it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            let marks: Vec<String> = chunk
                .iter()
                .enumerate()
                .map(|(col, &cell)| match cell {
                    1 => "X".to_string(),
                    -1 => "O".to_string(),
                    _ => (row * 3 + col).to_string(),
                })
                .collect();
            writeln!(f, " {} ", marks.join(" | "))?;
            if row < 2 {
                writeln!(f, "---+---+---")?;
            }
        }
        Ok(())
    }
}
