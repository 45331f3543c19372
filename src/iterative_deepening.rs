//! Iterative deepening alpha-beta search with forced-move detection

use log::{debug, trace};

use crate::board::{Board, Player};
use crate::config::ITERATIVE_DEEPENING_DEPTH;
use crate::evaluator::{score_position, terminal_score};
use crate::strategy::SearchStrategy;
use crate::WIDTH;

/// Returns the columns ordered from the middle outwards, preferring the
/// left-hand column of each pair, as central columns are usually stronger
pub const fn move_order() -> [usize; WIDTH] {
    let mut move_order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        move_order[i] = (WIDTH / 2) + (1 - i % 2) * (i / 2) - (i % 2) * (i / 2 + 1);
        i += 1;
    }
    move_order
}

/// A searcher that deepens an alpha-beta search one ply at a time
///
/// # Notes
/// Before searching, every legal column is checked for a move that wins on
/// the spot or blocks an immediate opponent win, and such a move is played
/// without further search. Otherwise depths `1..=max_depth` are searched in
/// turn and the deepest completed result is kept. The depth cap is the only
/// bound on the work done.
#[derive(Clone, Debug)]
pub struct IterativeDeepening {
    player: Player,
    max_depth: usize,

    /// The number of nodes visited by the last search (for diagnostics only)
    pub node_count: usize,
}

impl IterativeDeepening {
    pub fn new(player: Player, max_depth: usize) -> Self {
        Self {
            player,
            max_depth,
            node_count: 0,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// A column that wins immediately for the AI, or else one that stops the
    /// opponent winning immediately
    ///
    /// All columns are checked for a win before any are checked for a block.
    pub fn forced_move(&self, board: &Board) -> Option<usize> {
        let available = board.find_available_columns();
        available
            .iter()
            .copied()
            .find(|&column| board.is_winning_move(column, self.player))
            .or_else(|| {
                available
                    .iter()
                    .copied()
                    .find(|&column| board.is_winning_move(column, self.player.opponent()))
            })
    }

    /// Orders root candidates: a single winning or blocking column if one
    /// exists, otherwise the legal columns in centre-first order
    pub fn order_moves(&self, board: &Board) -> Vec<usize> {
        if let Some(column) = self.forced_move(board) {
            return vec![column];
        }

        let available = board.find_available_columns();
        move_order()
            .iter()
            .copied()
            .filter(|column| available.contains(column))
            .collect()
    }

    /// Searches the root to `depth` plies, returning the best column
    fn depth_limited_search(&mut self, board: &Board, depth: usize) -> Option<usize> {
        let mut alpha = i32::MIN;
        let beta = i32::MAX;
        let mut best_score = i32::MIN;
        let mut best_move = None;

        for column in self.order_moves(board) {
            let mut next = board.clone();
            next.drop_piece(column, self.player);

            let score = self.alpha_beta(&next, depth - 1, false, alpha, beta);
            trace!("depth {}: column {} scored {}", depth, column, score);

            if best_move.is_none() || score > best_score {
                best_score = score;
                best_move = Some(column);
            }
            alpha = alpha.max(best_score);
            if beta <= alpha {
                break;
            }
        }

        debug!(
            "iterative deepening depth {}/{}: column {:?}, score {}",
            depth, self.max_depth, best_move, best_score
        );
        best_move
    }

    fn alpha_beta(
        &mut self,
        board: &Board,
        depth: usize,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.node_count += 1;

        if let Some(score) = terminal_score(board, self.player) {
            return score;
        }
        if depth == 0 {
            return score_position(board, self.player);
        }

        let mover = if maximizing {
            self.player
        } else {
            self.player.opponent()
        };
        let mut value = if maximizing { i32::MIN } else { i32::MAX };

        for column in board.find_available_columns() {
            let mut next = board.clone();
            next.drop_piece(column, mover);
            let score = self.alpha_beta(&next, depth - 1, !maximizing, alpha, beta);

            if maximizing {
                value = value.max(score);
                alpha = alpha.max(score);
            } else {
                value = value.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }
        value
    }
}

impl Default for IterativeDeepening {
    fn default() -> Self {
        Self::new(Player::Two, ITERATIVE_DEEPENING_DEPTH)
    }
}

impl SearchStrategy for IterativeDeepening {
    fn get_move(&mut self, board: &Board) -> Option<usize> {
        self.node_count = 0;

        if let Some(column) = self.forced_move(board) {
            debug!("iterative deepening: forced move {}", column);
            return Some(column);
        }

        let mut best_move = None;
        for depth in 1..=self.max_depth {
            if let Some(column) = self.depth_limited_search(board, depth) {
                best_move = Some(column);
            }
        }

        // a zero depth cap still has to answer with a legal column
        best_move.or_else(|| self.order_moves(board).first().copied())
    }

    fn player(&self) -> Player {
        self.player
    }

    fn name(&self) -> &'static str {
        "Iterative Deepening"
    }
}
