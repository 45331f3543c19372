//! One-ply heuristic move selection

use crate::board::{Board, Player};
use crate::strategy::SearchStrategy;
use crate::{HEIGHT, WIDTH};

/// Value of a move that wins on the spot
pub const SELF_WIN_BONUS: i32 = 10_000;
/// Value of a move that takes the square the opponent would win with
pub const BLOCK_BONUS: i32 = 5_000;

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Picks the column with the best immediate value, without looking ahead
#[derive(Clone, Debug)]
pub struct Greedy {
    player: Player,
}

impl Greedy {
    pub fn new(player: Player) -> Self {
        Self { player }
    }

    /// Sums the squared lengths of `player`'s unbroken runs leading away
    /// from (row, column) in each of the 8 directions
    pub fn adjacency(board: &Board, row: usize, column: usize, player: Player) -> i32 {
        let mark = player.cell();
        let mut total = 0;

        for &(dr, dc) in NEIGHBOURS.iter() {
            let mut count = 0;
            let (mut r, mut c) = (row as isize + dr, column as isize + dc);
            while r >= 0
                && r < HEIGHT as isize
                && c >= 0
                && c < WIDTH as isize
                && board.cell(r as usize, c as usize) == mark
            {
                count += 1;
                r += dr;
                c += dc;
            }
            total += count * count;
        }
        total
    }

    /// The greedy value of dropping the AI's piece in `column`
    pub fn move_value(&self, board: &Board, column: usize) -> Option<i32> {
        let row = board.get_available_row(column)?;
        let mut value = Self::adjacency(board, row, column, self.player);
        if board.is_winning_move(column, self.player) {
            value += SELF_WIN_BONUS;
        }
        if board.is_winning_move(column, self.player.opponent()) {
            value += BLOCK_BONUS;
        }
        Some(value)
    }
}

impl SearchStrategy for Greedy {
    fn get_move(&mut self, board: &Board) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for column in board.find_available_columns() {
            if let Some(value) = self.move_value(board, column) {
                // strict comparison keeps the leftmost of equal moves
                if best.map_or(true, |(_, best_value)| value > best_value) {
                    best = Some((column, value));
                }
            }
        }
        best.map(|(column, _)| column)
    }

    fn player(&self) -> Player {
        self.player
    }

    fn name(&self) -> &'static str {
        "Greedy"
    }
}
