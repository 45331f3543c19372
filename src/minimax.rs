//! Fixed-depth minimax search with alpha-beta pruning

use log::debug;

use crate::board::{Board, Player};
use crate::config::MINIMAX_DEPTH;
use crate::evaluator::{score_position, terminal_score};
use crate::strategy::SearchStrategy;

/// A fixed-depth alpha-beta searcher
///
/// # Notes
/// Columns are tried in ascending order and ties keep the first column to
/// reach the best value, so the chosen move is deterministic. Leaves at the
/// depth limit are scored with [`score_position`] from the AI's side; won,
/// lost and drawn positions use the terminal scores.
///
/// [`score_position`]: crate::evaluator::score_position
#[derive(Clone, Debug)]
pub struct Minimax {
    player: Player,
    depth: usize,

    /// The number of nodes visited by the last search (for diagnostics only)
    pub node_count: usize,
}

impl Minimax {
    pub fn new(player: Player, depth: usize) -> Self {
        Self {
            player,
            depth,
            node_count: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Searches `board` to the configured depth with the AI to move
    ///
    /// Returns the best column (if the position isn't terminal) and its value
    pub fn search(&mut self, board: &Board) -> (Option<usize>, i32) {
        self.node_count = 0;
        self.minimax(board, self.depth, true, i32::MIN, i32::MAX)
    }

    fn minimax(
        &mut self,
        board: &Board,
        depth: usize,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> (Option<usize>, i32) {
        self.node_count += 1;

        if let Some(score) = terminal_score(board, self.player) {
            return (None, score);
        }
        if depth == 0 {
            return (None, score_position(board, self.player));
        }

        let columns = board.find_available_columns();
        let mut best_column = columns[0];
        let mover = if maximizing {
            self.player
        } else {
            self.player.opponent()
        };
        let mut value = if maximizing { i32::MIN } else { i32::MAX };

        for column in columns {
            let mut next = board.clone();
            next.drop_piece(column, mover);
            let (_, score) = self.minimax(&next, depth - 1, !maximizing, alpha, beta);

            if maximizing {
                if score > value {
                    value = score;
                    best_column = column;
                }
                alpha = alpha.max(value);
            } else {
                if score < value {
                    value = score;
                    best_column = column;
                }
                beta = beta.min(value);
            }
            // the opponent will never allow this line, skip the remaining siblings
            if alpha >= beta {
                break;
            }
        }

        (Some(best_column), value)
    }
}

impl Default for Minimax {
    fn default() -> Self {
        Self::new(Player::Two, MINIMAX_DEPTH)
    }
}

impl SearchStrategy for Minimax {
    fn get_move(&mut self, board: &Board) -> Option<usize> {
        let first = board.find_available_columns().first().copied()?;
        let (best_column, value) = self.search(board);
        debug!(
            "minimax depth {}: column {:?}, value {}, {} nodes",
            self.depth, best_column, value, self.node_count
        );
        Some(best_column.unwrap_or(first))
    }

    fn player(&self) -> Player {
        self.player
    }

    fn name(&self) -> &'static str {
        "Minimax"
    }
}
