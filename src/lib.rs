//! Search agents for playing the board game 'Connect 4'
//!
//! Four interchangeable strategies choose a column for a given board:
//! fixed-depth minimax with alpha-beta pruning, iterative deepening with
//! forced-move detection, a one-ply greedy scorer, and Monte Carlo Tree
//! Search. All of them search on clones and leave the caller's board alone.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_search::{Board, Minimax, Player, SearchStrategy};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // both players have three stacked up, player one to move
//! let board = Board::from_moves("121212")?;
//! let mut minimax = Minimax::new(Player::One, 5);
//!
//! assert!(minimax.get_move(&board) == Some(0));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod evaluator;

pub mod config;

pub mod strategy;

pub mod minimax;

pub mod iterative_deepening;

pub mod greedy;

pub mod mcts;

pub mod tournament;

mod test;

pub use board::{Board, Cell, GameState, Player};
pub use config::SearchConfig;
pub use greedy::Greedy;
pub use iterative_deepening::IterativeDeepening;
pub use mcts::MonteCarloTreeSearch;
pub use minimax::Minimax;
pub use strategy::{SearchStrategy, StrategyKind};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// the evaluation windows and centre-column bonus assume room for a 4-in-a-row
const_assert!(WIDTH >= 4 && HEIGHT >= 4);
// moves are written as single digits
const_assert!(WIDTH <= 9);
