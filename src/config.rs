//! Search configuration parameters.

use std::time::Duration;

/// Wall-clock budget used when nothing else is configured.
pub const DEFAULT_DECISION_TIME: Duration = Duration::from_secs(2);

/// Configuration for one Monte Carlo search engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// How long `get_move` keeps running simulations before answering.
    pub decision_time: Duration,

    /// Exploration constant `C` of the UCB1 weight.
    /// Higher values spread simulations more evenly across siblings.
    pub exploration: f64,

    /// Stop simulating after this many iterations even if time remains.
    /// `None` means only the clock bounds the search.
    pub max_iterations: Option<u64>,

    /// Seed for the selection generator. `None` seeds from the process
    /// generator, so separate runs differ.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            decision_time: DEFAULT_DECISION_TIME,
            exploration: std::f64::consts::SQRT_2,
            max_iterations: None,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Sets the wall-clock budget per decision.
    pub fn with_decision_time(mut self, decision_time: Duration) -> Self {
        self.decision_time = decision_time;
        self
    }

    /// Sets the UCB1 exploration constant.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Caps the number of simulations per decision.
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Fixes the seed of the selection generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// A fast configuration for tests: iteration-bounded with a generous clock.
    pub fn for_testing(iterations: u64, seed: u64) -> Self {
        Self::default()
            .with_decision_time(Duration::from_secs(60))
            .with_max_iterations(iterations)
            .with_seed(seed)
    }
}
