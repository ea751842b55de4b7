//! # Search Tree Node
//!
//! One node of the Monte Carlo search tree. A node owns a snapshot of the game
//! state, the statistics of every simulation that passed through it, and its
//! children, which are created all at once the first time the node is
//! expanded.
//!
//! Statistics are kept from the point of view of the player who made the move
//! leading into the node (`side`), not the player about to move.

use rand::Rng;

use crate::{GameError, GameState, Outcome};

/// A node in the Monte Carlo search tree.
#[derive(Debug, Clone)]
pub struct Node<S: GameState> {
    /// The game state at this node.
    state: S,
    /// The player who moved into this node, `None` for a fresh root.
    side: Option<i32>,
    /// The move that produced this node from its parent.
    incoming_move: Option<S::Move>,
    /// Win credit for `side`. A draw counts as half a win.
    wins: f64,
    /// Number of simulations that passed through this node.
    trials: u32,
    /// One child per legal move, in the order the moves were generated.
    children: Vec<Node<S>>,
}

impl<S: GameState> Node<S> {
    /// Creates a root node for `state` with no statistics.
    pub fn new(state: S) -> Self {
        Node {
            state,
            side: None,
            incoming_move: None,
            wins: 0.0,
            trials: 0,
            children: Vec::new(),
        }
    }

    fn with_move(state: S, side: i32, mv: S::Move) -> Self {
        Node {
            side: Some(side),
            incoming_move: Some(mv),
            ..Node::new(state)
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn side(&self) -> Option<i32> {
        self.side
    }

    pub fn incoming_move(&self) -> Option<&S::Move> {
        self.incoming_move.as_ref()
    }

    pub fn wins(&self) -> f64 {
        self.wins
    }

    pub fn trials(&self) -> u32 {
        self.trials
    }

    pub fn children(&self) -> &[Node<S>] {
        &self.children
    }

    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the child reached by `mv`, if the node has been expanded.
    pub fn child(&self, mv: &S::Move) -> Option<&Node<S>> {
        self.children
            .iter()
            .find(|child| child.incoming_move.as_ref() == Some(mv))
    }

    /// Returns the fraction of simulations through this node won by `side`.
    ///
    /// NaN when the node has never been visited. Callers must read that as
    /// "unknown", never as a zero win rate.
    pub fn win_rate(&self) -> f64 {
        self.wins / f64::from(self.trials)
    }

    /// Calculates the UCB1 weight of this node for selection by its parent.
    ///
    /// # Arguments
    /// * `parent_visits` - The number of simulations through the parent, including the current one.
    /// * `exploration` - The exploration constant `C`.
    ///
    /// NaN when the node has no trials.
    pub fn weight(&self, parent_visits: u32, exploration: f64) -> f64 {
        self.win_rate()
            + exploration * (f64::from(parent_visits).ln() / f64::from(self.trials)).sqrt()
    }

    /// Adds one child per legal move of the active player.
    ///
    /// Does nothing if the node already has children or the game is over.
    pub fn expand(&mut self) -> Result<(), GameError> {
        if self.is_expanded() || self.state.is_finished() {
            return Ok(());
        }

        let mover = self.state.active_player();
        let children = self
            .state
            .legal_moves(mover)
            .into_iter()
            .map(|mv| {
                let next = self.state.apply_move(mover, &mv)?;
                Ok(Node::with_move(next, mover, mv))
            })
            .collect::<Result<Vec<_>, GameError>>()?;

        self.children = children;
        Ok(())
    }

    /// Runs one simulation from this node and returns its outcome.
    ///
    /// The descent stays inside the tree: at each unfinished node the children
    /// are expanded if needed and one is drawn according to
    /// [`selection_weights`]. The outcome of the finished state reached at the
    /// bottom is credited to every node on the way back up, each from the
    /// point of view of its own `side`.
    pub fn explore<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        exploration: f64,
    ) -> Result<Option<Outcome>, GameError> {
        self.trials += 1;

        let outcome = if self.state.is_finished() {
            self.state.winner()
        } else {
            self.expand()?;
            if self.children.is_empty() {
                // Unfinished but nobody can move: nothing to credit.
                None
            } else {
                let weights = selection_weights(&self.children, self.trials, exploration);
                let index = sample(&weights, rng);
                self.children[index].explore(rng, exploration)?
            }
        };

        self.record(outcome);
        Ok(outcome)
    }

    fn record(&mut self, outcome: Option<Outcome>) {
        match outcome {
            Some(Outcome::Win(winner)) if self.side == Some(winner) => self.wins += 1.0,
            Some(Outcome::Draw) => self.wins += 0.5,
            _ => {}
        }
    }

    /// Returns the index of the child with the highest win rate.
    ///
    /// Unvisited children rank as a zero win rate. Ties go to the child that
    /// was expanded first.
    pub fn best_child_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, child) in self.children.iter().enumerate() {
            let rate = child.win_rate();
            let rate = if rate.is_nan() { 0.0 } else { rate };
            if best.map_or(true, |(_, best_rate)| rate > best_rate) {
                best = Some((index, rate));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Returns the move of the best child as ranked by [`Node::best_child_index`].
    pub fn best_move(&self) -> Option<&S::Move> {
        self.best_child_index()
            .and_then(|index| self.children[index].incoming_move())
    }

    /// Detaches and returns the child reached by `mv`.
    pub(crate) fn take_child(&mut self, mv: &S::Move) -> Option<Node<S>> {
        let index = self
            .children
            .iter()
            .position(|child| child.incoming_move.as_ref() == Some(mv))?;
        Some(self.children.swap_remove(index))
    }

    /// Number of nodes in the subtree rooted here, this node included.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_size).sum::<usize>()
    }
}

/// Computes the probability of drawing each child during selection.
pub fn selection_weights<S: GameState>(
    children: &[Node<S>],
    parent_visits: u32,
    exploration: f64,
) -> Vec<f64> {
    let raw: Vec<f64> = children
        .iter()
        .map(|child| child.weight(parent_visits, exploration))
        .collect();
    normalize_weights(&raw)
}

/// Turns raw UCB1 weights into a probability distribution.
///
/// If any weight is NaN (an unvisited child) only the NaN entries are
/// candidates, each with the same probability. Otherwise negative weights are
/// clamped to zero and the rest are divided by their sum. An all-zero vector
/// becomes uniform.
pub fn normalize_weights(raw: &[f64]) -> Vec<f64> {
    let weights: Vec<f64> = if raw.iter().any(|w| w.is_nan()) {
        raw.iter()
            .map(|w| if w.is_nan() { 1.0 } else { 0.0 })
            .collect()
    } else {
        raw.iter().map(|w| w.max(0.0)).collect()
    };

    let total: f64 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        weights.iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / raw.len() as f64; raw.len()]
    }
}

/// Samples an index from a probability distribution.
///
/// Entries with zero probability are never chosen.
pub fn sample<R: Rng + ?Sized>(policy: &[f64], rng: &mut R) -> usize {
    let mut remaining: f64 = rng.random();

    policy
        .iter()
        .position(|&p| {
            remaining -= p;
            p > 0.0 && remaining <= 0.0
        })
        .or_else(|| policy.iter().rposition(|&p| p > 0.0))
        .unwrap_or(policy.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::TicTacToeState;
    use rand_xoshiro::rand_core::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    const SQRT_2: f64 = std::f64::consts::SQRT_2;

    /// X X . / O O . / . . . with X to move.
    fn x_to_win() -> TicTacToeState {
        TicTacToeState::from_cells([1, 1, 0, -1, -1, 0, 0, 0, 0], 1).unwrap()
    }

    /// X O X / X O O / O X . with X to move; the last cell draws.
    fn one_move_to_draw() -> TicTacToeState {
        TicTacToeState::from_cells([1, -1, 1, 1, -1, -1, -1, 1, 0], 1).unwrap()
    }

    /// X O X / O X O / . . . with X to move; three cells left.
    fn three_cells_left() -> TicTacToeState {
        TicTacToeState::from_cells([1, -1, 1, -1, 1, -1, 0, 0, 0], 1).unwrap()
    }

    #[test]
    fn test_new_root() {
        let node = Node::new(TicTacToeState::new());
        assert!(node.side().is_none());
        assert!(node.incoming_move().is_none());
        assert_eq!(node.trials(), 0);
        assert_eq!(node.wins(), 0.0);
        assert!(!node.is_expanded());
        assert!(node.win_rate().is_nan());
    }

    #[test]
    fn test_weight_of_single_win() {
        let mut node = Node::new(TicTacToeState::new());
        node.wins = 1.0;
        node.trials = 1;
        assert_eq!(node.weight(1, SQRT_2), 1.0);
    }

    #[test]
    fn test_weight_unvisited_is_nan() {
        let node = Node::new(TicTacToeState::new());
        assert!(node.weight(1, SQRT_2).is_nan());
        assert!(node.weight(10, SQRT_2).is_nan());
    }

    #[test]
    fn test_weight_formula() {
        let mut node = Node::new(TicTacToeState::new());
        node.wins = 3.0;
        node.trials = 5;
        let expected = 0.6 + SQRT_2 * (10f64.ln() / 5.0).sqrt();
        assert!((node.weight(10, SQRT_2) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_expand_creates_one_child_per_move() {
        let mut node = Node::new(TicTacToeState::new());
        node.expand().unwrap();
        assert_eq!(node.children().len(), 9);
        for (index, child) in node.children().iter().enumerate() {
            assert_eq!(child.incoming_move(), Some(&index));
            assert_eq!(child.side(), Some(1));
            assert_eq!(child.state().active_player(), -1);
            assert_eq!(child.trials(), 0);
        }
    }

    #[test]
    fn test_expand_is_idempotent() {
        let mut node = Node::new(three_cells_left());
        node.expand().unwrap();
        node.children[0].trials = 4;
        node.expand().unwrap();
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.children[0].trials(), 4);
    }

    #[test]
    fn test_finished_node_never_expands() {
        let finished = x_to_win().apply_move(1, &2).unwrap();
        let mut node = Node::new(finished);
        node.expand().unwrap();
        assert!(!node.is_expanded());

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        node.explore(&mut rng, SQRT_2).unwrap();
        assert!(!node.is_expanded());
        assert_eq!(node.trials(), 1);
    }

    #[test]
    fn test_unvisited_children_take_precedence() {
        let mut node = Node::new(three_cells_left());
        node.expand().unwrap();
        node.children[1].trials = 5;
        node.children[1].wins = 3.0;

        let weights = selection_weights(node.children(), 6, SQRT_2);
        assert_eq!(weights, vec![0.5, 0.0, 0.5]);

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let mut counts = [0usize; 3];
        for _ in 0..2000 {
            counts[sample(&weights, &mut rng)] += 1;
        }
        assert_eq!(counts[1], 0);
        assert!(counts[0] > 800 && counts[2] > 800, "{:?}", counts);
    }

    #[test]
    fn test_defined_weights_are_normalized() {
        let mut node = Node::new(three_cells_left());
        node.expand().unwrap();
        for (child, (wins, trials)) in node.children.iter_mut().zip([(1.0, 2), (2.0, 2), (0.0, 2)]) {
            child.wins = wins;
            child.trials = trials;
        }

        let weights = selection_weights(node.children(), 6, SQRT_2);
        let exploration = SQRT_2 * (6f64.ln() / 2.0).sqrt();
        let raw = [0.5 + exploration, 1.0 + exploration, exploration];
        let total: f64 = raw.iter().sum();
        for (weight, raw) in weights.iter().zip(raw) {
            assert!((weight - raw / total).abs() < 1e-12);
        }
    }

    #[test]
    fn test_negative_weights_are_clamped() {
        let weights = normalize_weights(&[-0.5, 1.0, 3.0]);
        assert_eq!(weights, vec![0.0, 0.25, 0.75]);

        let weights = normalize_weights(&[-1.0, -2.0]);
        assert_eq!(weights, vec![0.5, 0.5]);
    }

    #[test]
    fn test_sample_skips_zero_entries() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        for _ in 0..500 {
            assert_eq!(sample(&[0.0, 1.0, 0.0], &mut rng), 1);
        }
    }

    #[test]
    fn test_explore_backpropagates_win() {
        let mut root = Node::new(x_to_win());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        for _ in 0..200 {
            root.explore(&mut rng, SQRT_2).unwrap();
        }

        assert_eq!(root.trials(), 200);
        let child_trials: u32 = root.children().iter().map(Node::trials).sum();
        assert_eq!(child_trials, 200);

        let winning = root.child(&2).unwrap();
        assert!(winning.trials() > 0);
        assert_eq!(winning.wins(), f64::from(winning.trials()));
        assert!(!winning.is_expanded());
        assert_eq!(root.best_move(), Some(&2));
    }

    #[test]
    fn test_explore_credits_draw_as_half() {
        let mut root = Node::new(one_move_to_draw());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let outcome = root.explore(&mut rng, SQRT_2).unwrap();

        assert_eq!(outcome, Some(Outcome::Draw));
        let child = &root.children()[0];
        assert_eq!(child.trials(), 1);
        assert_eq!(child.wins(), 0.5);
        assert_eq!(root.wins(), 0.5);
    }

    #[test]
    fn test_wins_never_exceed_trials() {
        let mut root = Node::new(TicTacToeState::new());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        for _ in 0..1000 {
            root.explore(&mut rng, SQRT_2).unwrap();
        }

        fn check(node: &Node<TicTacToeState>) {
            assert!(node.wins() <= f64::from(node.trials()));
            node.children().iter().for_each(check);
        }
        check(&root);
    }

    #[test]
    fn test_best_child_tie_goes_to_first_expanded() {
        let mut node = Node::new(three_cells_left());
        node.expand().unwrap();
        node.children[0].wins = 1.0;
        node.children[0].trials = 2;
        node.children[1].wins = 0.0;
        node.children[1].trials = 3;
        node.children[2].wins = 2.0;
        node.children[2].trials = 4;

        assert_eq!(node.best_child_index(), Some(0));
        assert_eq!(node.best_move(), Some(&6));
    }

    #[test]
    fn test_best_child_treats_unvisited_as_zero() {
        let mut node = Node::new(three_cells_left());
        node.expand().unwrap();
        node.children[2].wins = 1.0;
        node.children[2].trials = 10;

        assert_eq!(node.best_child_index(), Some(2));

        node.children[2].wins = 0.0;
        assert_eq!(node.best_child_index(), Some(0));
    }

    #[test]
    fn test_take_child_keeps_statistics() {
        let mut node = Node::new(three_cells_left());
        node.expand().unwrap();
        node.children[1].trials = 7;
        node.children[1].wins = 2.5;

        let child = node.take_child(&7).unwrap();
        assert_eq!(child.trials(), 7);
        assert_eq!(child.wins(), 2.5);
        assert!(node.take_child(&0).is_none());
    }
}
