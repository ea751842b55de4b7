use mcts::games::othello::{OthelloMove, OthelloState, BOARD_SIZE};
use mcts::games::tictactoe::TicTacToeState;
use mcts::{opponent, GameError, GameState, Outcome};
use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Plays uniformly random legal moves from `initial` and checks the
/// contract every game has to honor along the way. Returns the final state
/// and the number of moves played.
fn random_playout<S: GameState + PartialEq + std::fmt::Debug>(initial: S, seed: u64, max_moves: usize) -> (S, usize) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut state = initial;
    let mut played = 0;

    while !state.is_finished() {
        assert!(played < max_moves, "game did not finish within {} moves", max_moves);
        assert!(state.winner().is_none());

        let player = state.active_player();
        assert!(state.legal_moves(opponent(player)).is_empty());
        assert_eq!(
            state.apply_move(opponent(player), &state.legal_moves(player)[0]),
            Err(GameError::OutOfTurn { player: opponent(player) })
        );

        let moves = state.legal_moves(player);
        assert!(!moves.is_empty());
        let mv = moves[rng.random_range(0..moves.len())].clone();

        let before = state.clone();
        let next = state.apply_move(player, &mv).unwrap();
        assert_eq!(state, before, "apply_move must not change the receiver");
        assert_eq!(next.active_player(), opponent(player));

        state = next;
        played += 1;
    }

    assert!(state.winner().is_some());
    assert!(state.legal_moves(state.active_player()).is_empty());
    (state, played)
}

#[test]
fn test_tic_tac_toe_random_games() {
    for seed in 0..200 {
        let (state, played) = random_playout(TicTacToeState::new(), seed, 9);
        assert!((5..=9).contains(&played));

        let x = state.cells().iter().filter(|&&c| c == 1).count();
        let o = state.cells().iter().filter(|&&c| c == -1).count();
        assert_eq!(x + o, played);
        assert!(x == o || x == o + 1);
        if state.winner() == Some(Outcome::Draw) {
            assert_eq!(played, 9);
        }
    }
}

#[test]
fn test_othello_random_games() {
    for seed in 0..40 {
        let (state, _) = random_playout(OthelloState::new(), seed, 200);

        let black = state.score(1);
        let white = state.score(-1);
        assert!(black + white <= BOARD_SIZE * BOARD_SIZE);
        let expected = match black.cmp(&white) {
            std::cmp::Ordering::Greater => Outcome::Win(1),
            std::cmp::Ordering::Less => Outcome::Win(-1),
            std::cmp::Ordering::Equal => Outcome::Draw,
        };
        assert_eq!(state.winner(), Some(expected));
    }
}

#[test]
fn test_othello_placements_add_one_disc() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
    let mut state = OthelloState::new();

    while !state.is_finished() {
        let player = state.active_player();
        let moves = state.legal_moves(player);
        let mv = moves[rng.random_range(0..moves.len())];
        let next = state.apply_move(player, &mv).unwrap();

        let discs = |s: &OthelloState| s.score(1) + s.score(-1);
        match mv {
            OthelloMove::Place(..) => {
                assert_eq!(discs(&next), discs(&state) + 1);
                assert!(next.score(player) >= state.score(player) + 2);
            }
            OthelloMove::Pass => {
                assert_eq!(moves, vec![OthelloMove::Pass]);
                assert_eq!(next.board(), state.board());
            }
        }
        state = next;
    }
}

#[test]
fn test_moves_parse_from_their_display() {
    let mut state = OthelloState::new();
    for _ in 0..6 {
        let moves = state.legal_moves(state.active_player());
        for mv in &moves {
            assert_eq!(mv.to_string().parse::<OthelloMove>().unwrap(), *mv);
        }
        state = state.apply_move(state.active_player(), &moves[0]).unwrap();
    }
}
