//! The interface shared by every move-choosing agent

use anyhow::{anyhow, Error, Result};

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Player};
use crate::config::SearchConfig;
use crate::greedy::Greedy;
use crate::iterative_deepening::IterativeDeepening;
use crate::mcts::MonteCarloTreeSearch;
use crate::minimax::Minimax;

/// An agent that picks a column to play
///
/// Implementations search on clones of `board` and never modify it. `None`
/// is returned only when no column is playable.
pub trait SearchStrategy {
    fn get_move(&mut self, board: &Board) -> Option<usize>;

    /// The player this strategy moves for
    fn player(&self) -> Player;

    fn name(&self) -> &'static str;
}

/// The available strategies, for building them by name
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StrategyKind {
    Minimax,
    IterativeDeepening,
    Greedy,
    MonteCarlo,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Minimax,
        StrategyKind::IterativeDeepening,
        StrategyKind::Greedy,
        StrategyKind::MonteCarlo,
    ];

    pub fn build(self, config: &SearchConfig, player: Player) -> Box<dyn SearchStrategy + Send> {
        match self {
            StrategyKind::Minimax => Box::new(Minimax::new(player, config.depth)),
            StrategyKind::IterativeDeepening => {
                Box::new(IterativeDeepening::new(player, config.max_depth))
            }
            StrategyKind::Greedy => Box::new(Greedy::new(player)),
            StrategyKind::MonteCarlo => Box::new(MonteCarloTreeSearch::new(player, config)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Minimax => "minimax",
            StrategyKind::IterativeDeepening => "iterative-deepening",
            StrategyKind::Greedy => "greedy",
            StrategyKind::MonteCarlo => "mcts",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "minimax" | "m" => Ok(StrategyKind::Minimax),
            "iterative-deepening" | "iterative" | "id" | "i" => Ok(StrategyKind::IterativeDeepening),
            "greedy" | "g" => Ok(StrategyKind::Greedy),
            "mcts" | "monte-carlo" | "c" => Ok(StrategyKind::MonteCarlo),
            other => Err(anyhow!("unknown strategy '{}'", other)),
        }
    }
}
