use std::time::Duration;

/// Default number of plies searched by [`Minimax`](crate::minimax::Minimax)
pub const MINIMAX_DEPTH: usize = 5;
/// Default deepest iteration of [`IterativeDeepening`](crate::iterative_deepening::IterativeDeepening)
pub const ITERATIVE_DEEPENING_DEPTH: usize = 7;
pub const MCTS_ITERATIONS: usize = 1000;
pub const MCTS_TIME_LIMIT: Duration = Duration::from_secs(2);
/// UCT exploration constant, roughly sqrt(2)
pub const MCTS_EXPLORATION_WEIGHT: f64 = 1.41;

/// Settings shared by every search strategy
///
/// Each strategy only reads the fields that concern it.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Plies searched by minimax
    pub depth: usize,
    /// Deepest iteration of iterative deepening
    pub max_depth: usize,
    /// MCTS iteration cap
    pub iterations: usize,
    /// MCTS wall-clock cap, checked between iterations
    pub time_limit: Duration,
    /// MCTS UCT exploration constant
    pub exploration_weight: f64,
    /// Seed for MCTS randomness, drawn from the OS when absent
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: MINIMAX_DEPTH,
            max_depth: ITERATIVE_DEEPENING_DEPTH,
            iterations: MCTS_ITERATIONS,
            time_limit: MCTS_TIME_LIMIT,
            exploration_weight: MCTS_EXPLORATION_WEIGHT,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Lets MCTS run until the iteration cap alone stops it
    pub fn without_time_limit(mut self) -> Self {
        self.time_limit = Duration::MAX;
        self
    }

    pub fn with_exploration_weight(mut self, exploration_weight: f64) -> Self {
        self.exploration_weight = exploration_weight;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
