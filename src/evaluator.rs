//! Heuristic scoring of positions for the depth-limited searches

use crate::board::{Board, Cell, Player, WINDOWS};
use crate::{HEIGHT, WIDTH};

/// Score of a position the AI has won
pub const WIN_SCORE: i32 = 1_000_000;
/// Score of a position the opponent has won
pub const LOSS_SCORE: i32 = -WIN_SCORE;
/// Score of a drawn position
pub const DRAW_SCORE: i32 = 0;

/// Bonus for each of a player's pieces in the centre column
pub const CENTER_BONUS: i32 = 5;

const CENTER_COLUMN: usize = WIDTH / 2;

/// Scores a single 4-cell window from `player`'s point of view
pub fn score_window(window: &[Cell; 4], player: Player) -> i32 {
    let own = player.cell();
    let opponent = player.opponent().cell();

    let count = |mark: Cell| window.iter().filter(|&&cell| cell == mark).count();
    let (p, o, e) = (count(own), count(opponent), count(Cell::Empty));

    let mut score = 0;
    if p == 4 {
        score += 1000;
    } else if p == 3 && e == 1 {
        score += 10;
    } else if p == 2 && e == 2 {
        score += 3;
    }
    if o == 3 && e == 1 {
        score -= 8;
    } else if o == 2 && e == 2 {
        score -= 2;
    }
    score
}

/// Scores a non-terminal position for `player` by summing every window
/// score plus a bonus for central control
///
/// Won and drawn positions are scored by the searches themselves with
/// [`WIN_SCORE`], [`LOSS_SCORE`] and [`DRAW_SCORE`].
pub fn score_position(board: &Board, player: Player) -> i32 {
    let center = (0..HEIGHT)
        .filter(|&row| board.cell(row, CENTER_COLUMN) == player.cell())
        .count() as i32
        * CENTER_BONUS;

    WINDOWS
        .iter()
        .map(|window| {
            let cells = [
                board.cell(window[0].0, window[0].1),
                board.cell(window[1].0, window[1].1),
                board.cell(window[2].0, window[2].1),
                board.cell(window[3].0, window[3].1),
            ];
            score_window(&cells, player)
        })
        .sum::<i32>()
        + center
}

/// Scores a finished position for `ai`, or `None` if the game is still going
pub fn terminal_score(board: &Board, ai: Player) -> Option<i32> {
    if board.has_won(ai) {
        Some(WIN_SCORE)
    } else if board.has_won(ai.opponent()) {
        Some(LOSS_SCORE)
    } else if board.is_full() {
        Some(DRAW_SCORE)
    } else {
        None
    }
}
