//! # Monte Carlo Search Engine
//!
//! Wraps a root [`Node`] and runs simulations from it until the configured
//! wall-clock budget runs out, then reports the child with the best win rate.
//! The tree is kept between decisions: when a move is played the engine moves
//! its root down to the matching child instead of starting over.

use std::time::{Duration, Instant};

use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::node::Node;
use crate::{GameError, GameState};

/// Figures from the most recent call to [`MonteCarloEngine::get_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStatistics {
    /// Simulations run during the call.
    pub iterations: u64,
    /// Wall-clock time spent simulating.
    pub elapsed: Duration,
    /// Total simulations recorded at the root, including earlier turns.
    pub root_trials: u32,
}

/// The Monte Carlo decision engine.
pub struct MonteCarloEngine<S: GameState> {
    /// The node for the position currently being reasoned about.
    root: Node<S>,
    config: SearchConfig,
    /// Generator for the weighted child draws.
    rng: Xoshiro256PlusPlus,
    last_search: Option<SearchStatistics>,
}

impl<S: GameState> MonteCarloEngine<S> {
    /// Creates an engine with a fresh tree rooted at `state`.
    pub fn new(state: S, config: SearchConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        MonteCarloEngine {
            root: Node::new(state),
            config,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            last_search: None,
        }
    }

    pub fn root(&self) -> &Node<S> {
        &self.root
    }

    pub fn state(&self) -> &S {
        self.root.state()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn last_search(&self) -> Option<SearchStatistics> {
        self.last_search
    }

    /// Searches from the root and returns the move with the best win rate.
    ///
    /// Returns `Ok(None)` when the game at the root is already over. With a
    /// single legal move no simulations are run.
    pub fn get_move(&mut self) -> Result<Option<S::Move>, GameError> {
        if self.root.state().is_finished() {
            debug!("game already finished, no move to make");
            return Ok(None);
        }

        self.root.expand()?;

        let start = Instant::now();
        let mut iterations: u64 = 0;
        if self.root.children().len() > 1 {
            while start.elapsed() < self.config.decision_time
                && self
                    .config
                    .max_iterations
                    .map_or(true, |max| iterations < max)
            {
                self.root.explore(&mut self.rng, self.config.exploration)?;
                iterations += 1;
            }
        }

        let stats = SearchStatistics {
            iterations,
            elapsed: start.elapsed(),
            root_trials: self.root.trials(),
        };
        self.last_search = Some(stats);

        for child in self.root.children() {
            if let Some(mv) = child.incoming_move() {
                trace!(
                    %mv,
                    trials = child.trials(),
                    wins = child.wins(),
                    "candidate move"
                );
            }
        }

        let best = self.root.best_move().cloned();
        debug!(
            iterations = stats.iterations,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            root_trials = stats.root_trials,
            best = ?best,
            "search finished"
        );
        Ok(best)
    }

    /// Moves the root to the child reached when `side` plays `mv`.
    ///
    /// The child keeps every statistic gathered while it was part of the
    /// larger tree. The rest of the tree is dropped.
    pub fn advance(&mut self, mv: &S::Move, side: i32) -> Result<(), GameError> {
        if side != self.root.state().active_player() {
            return Err(GameError::OutOfTurn { player: side });
        }

        self.root.expand()?;
        let child = self
            .root
            .take_child(mv)
            .ok_or_else(|| GameError::IllegalMove {
                player: side,
                mv: mv.to_string(),
            })?;

        trace!(%mv, side, kept_trials = child.trials(), "advanced root");
        self.root = child;
        Ok(())
    }

    /// Discards the tree and starts again from `state`.
    pub fn reset(&mut self, state: S) {
        self.root = Node::new(state);
        self.last_search = None;
    }
}
