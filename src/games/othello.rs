//! # Othello (Reversi) Game Implementation
//!
//! This module implements the classic Othello (also known as Reversi) board game.
//! Players take turns placing pieces on an 8x8 board, with the goal of having
//! the most pieces of their color when the board is full or no more moves are possible.
//!
//! ## Rules
//! - Players must place pieces that "sandwich" opponent pieces between the new piece
//!   and an existing piece of the same color
//! - All sandwiched pieces are flipped to the current player's color
//! - A player with no placement must pass while the opponent still has one
//! - Game ends when neither player can place a piece
//! - Winner is determined by who has more pieces on the board; equal counts draw

use std::fmt;
use std::str::FromStr;

use crate::{opponent, validate_player, GameError, GameState, Outcome, FIRST_PLAYER};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 8;

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Represents a move in Othello
///
/// A placement holds 0-based (row, column) coordinates. `Pass` is only legal
/// when the player to move has no placement but the opponent does.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OthelloMove {
    Place(usize, usize),
    Pass,
}

/// Represents the complete state of an Othello game
///
/// The board uses 1 for black pieces, -1 for white pieces, and 0 for empty spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OthelloState {
    board: [[i32; BOARD_SIZE]; BOARD_SIZE],
    /// Current player (1 for black, -1 for white)
    current_player: i32,
}

impl Default for OthelloState {
    fn default() -> Self {
        Self::new()
    }
}

impl OthelloState {
    /// Creates a new Othello game with the standard starting position
    ///
    /// Sets up the board with 4 pieces in the center in the traditional pattern.
    /// Black (player 1) starts first.
    pub fn new() -> Self {
        let mut board = [[0; BOARD_SIZE]; BOARD_SIZE];
        let center = BOARD_SIZE / 2;
        board[center - 1][center - 1] = -1; // White
        board[center - 1][center] = 1; // Black
        board[center][center - 1] = 1; // Black
        board[center][center] = -1; // White
        OthelloState {
            board,
            current_player: FIRST_PLAYER,
        }
    }

    /// Creates a position from a raw board and the player to move.
    pub fn from_board(
        board: [[i32; BOARD_SIZE]; BOARD_SIZE],
        to_move: i32,
    ) -> Result<Self, GameError> {
        let current_player = validate_player(to_move)?;
        if let Some(bad) = board
            .iter()
            .flatten()
            .find(|&&cell| !(-1..=1).contains(&cell))
        {
            return Err(GameError::InvalidBoard(format!("unknown cell value {}", bad)));
        }
        Ok(OthelloState {
            board,
            current_player,
        })
    }

    pub fn board(&self) -> &[[i32; BOARD_SIZE]; BOARD_SIZE] {
        &self.board
    }

    /// Number of pieces `player` has on the board.
    pub fn score(&self, player: i32) -> usize {
        self.board
            .iter()
            .flatten()
            .filter(|&&cell| cell == player)
            .count()
    }

    /// Walks from (r, c) in direction (dr, dc) and returns how many opponent
    /// pieces would be flipped if `player` placed a piece at (r, c).
    fn flanked(&self, player: i32, r: usize, c: usize, (dr, dc): (i32, i32)) -> usize {
        let mut count = 0;
        let mut nr = r as i32 + dr;
        let mut nc = c as i32 + dc;

        while (0..BOARD_SIZE as i32).contains(&nr) && (0..BOARD_SIZE as i32).contains(&nc) {
            let cell = self.board[nr as usize][nc as usize];
            if cell == opponent(player) {
                count += 1;
            } else if cell == player {
                return count;
            } else {
                return 0;
            }
            nr += dr;
            nc += dc;
        }
        0
    }

    /// Checks if `player` may place a piece at (r, c).
    fn is_valid_placement(&self, player: i32, r: usize, c: usize) -> bool {
        self.board[r][c] == 0
            && DIRECTIONS
                .iter()
                .any(|&direction| self.flanked(player, r, c, direction) > 0)
    }

    /// Every square where `player` could place a piece, ignoring whose turn it is.
    fn placements(&self, player: i32) -> Vec<OthelloMove> {
        (0..BOARD_SIZE)
            .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| self.is_valid_placement(player, r, c))
            .map(|(r, c)| OthelloMove::Place(r, c))
            .collect()
    }

    /// Places a piece for `player` at (r, c) and flips every flanked line.
    fn place(&mut self, player: i32, r: usize, c: usize) {
        for &(dr, dc) in DIRECTIONS.iter() {
            let flips = self.flanked(player, r, c, (dr, dc));
            for step in 1..=flips as i32 {
                let fr = (r as i32 + dr * step) as usize;
                let fc = (c as i32 + dc * step) as usize;
                self.board[fr][fc] = player;
            }
        }
        self.board[r][c] = player;
    }
}

impl GameState for OthelloState {
    type Move = OthelloMove;

    fn legal_moves(&self, player: i32) -> Vec<Self::Move> {
        if player != self.current_player {
            return Vec::new();
        }

        let moves = self.placements(player);
        if moves.is_empty() && !self.placements(opponent(player)).is_empty() {
            vec![OthelloMove::Pass]
        } else {
            moves
        }
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
        if let OthelloMove::Place(r, c) = *mv {
            next.place(player, r, c);
        }
        next.current_player = opponent(player);
        Ok(next)
    }

    fn active_player(&self) -> i32 {
        self.current_player
    }

    fn is_finished(&self) -> bool {
        self.placements(self.current_player).is_empty()
            && self.placements(opponent(self.current_player)).is_empty()
    }

    fn winner(&self) -> Option<Outcome> {
        if !self.is_finished() {
            return None;
        }

        let black = self.score(1);
        let white = self.score(-1);
        Some(match black.cmp(&white) {
            std::cmp::Ordering::Greater => Outcome::Win(1),
            std::cmp::Ordering::Less => Outcome::Win(-1),
            std::cmp::Ordering::Equal => Outcome::Draw,
        })
    }
}

impl fmt::Display for OthelloState {
    /// Draws the board inside a box with row numbers on the left and column
    /// letters underneath, matching the notation moves are typed in.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge = "━".repeat(BOARD_SIZE * 2 - 1);
        writeln!(f, "  ┏{}┓", edge)?;
        for (r, row) in self.board.iter().enumerate() {
            let cells: Vec<&str> = row
                .iter()
                .map(|&cell| match cell {
                    1 => "●",
                    -1 => "○",
                    _ => "·",
                })
                .collect();
            writeln!(f, "{} ┃{}┃", r + 1, cells.join(" "))?;
        }
        writeln!(f, "  ┗{}┛", edge)?;
        let letters: Vec<String> = (0..BOARD_SIZE)
            .map(|c| char::from(b'a' + c as u8).to_string())
            .collect();
        writeln!(f, "   {}", letters.join(" "))
    }
}

impl fmt::Display for OthelloMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OthelloMove::Place(r, c) => write!(f, "{}{}", char::from(b'a' + *c as u8), r + 1),
            OthelloMove::Pass => write!(f, "pass"),
        }
    }
}

impl FromStr for OthelloMove {
    type Err = String;

    /// Parses a column letter followed by a row number (e.g. "d3"), or "pass".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "pass" {
            return Ok(OthelloMove::Pass);
        }

        let mut chars = s.chars();
        let column = chars
            .next()
            .filter(|ch| ('a'..='h').contains(ch))
            .ok_or_else(|| "Expected format: column letter a-h then row 1-8, e.g. d3".to_string())?;
        let row = chars
            .as_str()
            .parse::<usize>()
            .map_err(|e| e.to_string())?;
        if !(1..=BOARD_SIZE).contains(&row) {
            return Err(format!("Row {} is off the board", row));
        }
        Ok(OthelloMove::Place(row - 1, column as usize - 'a' as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_board(white: &[(usize, usize)], black: &[(usize, usize)], to_move: i32) -> OthelloState {
        let mut board = [[0; BOARD_SIZE]; BOARD_SIZE];
        for &(r, c) in white {
            board[r][c] = -1;
        }
        for &(r, c) in black {
            board[r][c] = 1;
        }
        OthelloState::from_board(board, to_move).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = OthelloState::new();
        assert_eq!(game.active_player(), 1);
        assert_eq!(game.score(1), 2);
        assert_eq!(game.score(-1), 2);
        assert!(!game.is_finished());
        assert_eq!(
            game.legal_moves(1),
            vec![
                OthelloMove::Place(2, 3),
                OthelloMove::Place(3, 2),
                OthelloMove::Place(4, 5),
                OthelloMove::Place(5, 4),
            ]
        );
        assert!(game.legal_moves(-1).is_empty());
    }

    #[test]
    fn test_no_moves() {
        let game = gen_board(&[(4, 4)], &[], -1);
        assert!(game.legal_moves(-1).is_empty());
        assert!(game.is_finished());
        assert_eq!(game.winner(), Some(Outcome::Win(-1)));
    }

    #[test]
    fn test_all_directions_move() {
        let black = [
            (3, 3), (3, 4), (3, 5),
            (4, 3),         (4, 5),
            (5, 3), (5, 4), (5, 5),
        ];
        let game = gen_board(&[(4, 4)], &black, -1);
        assert_eq!(game.legal_moves(-1).len(), 8);

        let next = game.apply_move(-1, &OthelloMove::Place(2, 2)).unwrap();
        assert_eq!(next.board()[3][3], -1);
        assert_eq!(next.board()[2][2], -1);
        assert_eq!(next.score(-1), 3);
        assert_eq!(next.score(1), 7);
    }

    #[test]
    fn test_single_line_move() {
        let game = gen_board(&[(4, 4)], &[(5, 4)], -1);
        assert_eq!(game.legal_moves(-1), vec![OthelloMove::Place(6, 4)]);
    }

    #[test]
    fn test_flips_multiple_lines() {
        // White at d3 flanks both e4 (diagonal) and d4/d5 (vertical).
        let game = gen_board(&[(5, 3), (4, 5)], &[(3, 3), (4, 3), (3, 4)], -1);
        let next = game.apply_move(-1, &OthelloMove::Place(2, 3)).unwrap();
        assert_eq!(next.board()[3][3], -1);
        assert_eq!(next.board()[4][3], -1);
        assert_eq!(next.board()[3][4], -1);
        assert_eq!(next.score(1), 0);
    }

    #[test]
    fn test_forced_pass() {
        let game = gen_board(&[(0, 0)], &[(0, 1)], 1);
        assert!(!game.is_finished());
        assert_eq!(game.legal_moves(1), vec![OthelloMove::Pass]);

        let passed = game.apply_move(1, &OthelloMove::Pass).unwrap();
        assert_eq!(passed.active_player(), -1);
        assert_eq!(passed.board(), game.board());
        assert_eq!(passed.legal_moves(-1), vec![OthelloMove::Place(0, 2)]);

        let finished = passed.apply_move(-1, &OthelloMove::Place(0, 2)).unwrap();
        assert!(finished.is_finished());
        assert_eq!(finished.winner(), Some(Outcome::Win(-1)));
    }

    #[test]
    fn test_pass_illegal_when_placements_exist() {
        let game = OthelloState::new();
        assert!(matches!(
            game.apply_move(1, &OthelloMove::Pass),
            Err(GameError::IllegalMove { player: 1, .. })
        ));
    }

    #[test]
    fn test_wrong_turn() {
        let game = OthelloState::new();
        assert_eq!(
            game.apply_move(-1, &OthelloMove::Place(2, 3)),
            Err(GameError::OutOfTurn { player: -1 })
        );
    }

    #[test]
    fn test_apply_move_is_immutable() {
        let before = OthelloState::new();
        let snapshot = *before.board();
        let after = before.apply_move(1, &OthelloMove::Place(2, 3)).unwrap();

        assert_eq!(before.board(), &snapshot);
        assert_eq!(after.board()[2][3], 1);
        assert_eq!(after.board()[3][3], 1);
        assert_eq!(after.score(1), 4);
        assert_eq!(after.score(-1), 1);
    }

    #[test]
    fn test_draw_on_equal_count() {
        let game = gen_board(&[(0, 0)], &[(7, 7)], 1);
        assert!(game.is_finished());
        assert_eq!(game.winner(), Some(Outcome::Draw));
    }

    #[test]
    fn test_move_notation() {
        assert_eq!(OthelloMove::Place(2, 3).to_string(), "d3");
        assert_eq!(OthelloMove::from_str("d3"), Ok(OthelloMove::Place(2, 3)));
        assert_eq!(OthelloMove::from_str(" H8 "), Ok(OthelloMove::Place(7, 7)));
        assert_eq!(OthelloMove::from_str("pass"), Ok(OthelloMove::Pass));
        assert!(OthelloMove::from_str("i1").is_err());
        assert!(OthelloMove::from_str("a9").is_err());
        assert!(OthelloMove::from_str("").is_err());
    }

    #[test]
    fn test_display() {
        let text = OthelloState::new().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[4], "4 ┃· · · ○ ● · · ·┃");
        assert_eq!(lines[10], "   a b c d e f g h");
    }
}
