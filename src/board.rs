use anyhow::{anyhow, Result};
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::fmt;
use std::io::{stdout, Write};

use crate::{HEIGHT, WIDTH};

/// One of the two sides of a game
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        player.cell()
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

/// The number of 4-cell windows on the board
pub const NUM_WINDOWS: usize =
    HEIGHT * (WIDTH - 3) + WIDTH * (HEIGHT - 3) + 2 * (HEIGHT - 3) * (WIDTH - 3);

/// Every horizontal, vertical and diagonal run of 4 cells as (row, column) pairs
pub static WINDOWS: [[(usize, usize); 4]; NUM_WINDOWS] = windows();

// (row step, column step) for horizontal, vertical and both diagonals
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

const fn windows() -> [[(usize, usize); 4]; NUM_WINDOWS] {
    let mut windows = [[(0, 0); 4]; NUM_WINDOWS];
    let mut n = 0;
    let mut d = 0;
    while d < 4 {
        let (dr, dc) = DIRECTIONS[d];
        let mut row = 0;
        while row < HEIGHT as isize {
            let mut col = 0;
            while col < WIDTH as isize {
                let (end_row, end_col) = (row + 3 * dr, col + 3 * dc);
                if end_row >= 0 && end_row < HEIGHT as isize && end_col < WIDTH as isize {
                    let mut i = 0;
                    while i < 4 {
                        windows[n][i] = ((row + i as isize * dr) as usize, (col + i as isize * dc) as usize);
                        i += 1;
                    }
                    n += 1;
                }
                col += 1;
            }
            row += 1;
        }
        d += 1;
    }
    windows
}

/// A Connect 4 grid
///
/// Row 0 is the top of the board and row `HEIGHT - 1` the bottom, so pieces
/// fall towards higher row indices. Cloning produces a fully independent copy,
/// which is how every search explores hypothetical moves.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Board {
    cells: [[Cell; WIDTH]; HEIGHT],
    num_moves: usize,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; WIDTH]; HEIGHT],
            num_moves: 0,
        }
    }

    /// Creates a board from a string of one-indexed column numbers, with
    /// Player One moving first and players alternating
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();
        let mut player = Player::One;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    if board.is_game_over() {
                        return Err(anyhow!("Invalid position, game is over"));
                    }
                    board.play_checked(column, player)?;
                    player = player.opponent();
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    pub fn cell(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    pub fn is_available_column(&self, column: usize) -> bool {
        self.cells[0][column].is_empty()
    }

    /// The lowest empty row in `column`, if any
    pub fn get_available_row(&self, column: usize) -> Option<usize> {
        (0..HEIGHT).rev().find(|&row| self.cells[row][column].is_empty())
    }

    /// Writes `player`'s mark at (row, column)
    ///
    /// The position must come from [`get_available_row`]; occupancy is not
    /// checked and out-of-range indices panic. Use [`play_checked`] for
    /// untrusted input.
    ///
    /// [`get_available_row`]: #method.get_available_row
    /// [`play_checked`]: #method.play_checked
    pub fn place_piece(&mut self, row: usize, column: usize, player: Player) {
        debug_assert!(self.cells[row][column].is_empty());
        self.cells[row][column] = player.cell();
        self.num_moves += 1;
    }

    /// Drops a piece into `column`, returning the row it landed in
    pub fn drop_piece(&mut self, column: usize, player: Player) -> Option<usize> {
        let row = self.get_available_row(column)?;
        self.place_piece(row, column, player);
        Some(row)
    }

    /// Validates and plays a one-indexed column for `player`
    pub fn play_checked(&mut self, column_one_indexed: usize, player: Player) -> Result<GameState> {
        if column_one_indexed < 1 || column_one_indexed > WIDTH {
            return Err(anyhow!(
                "Invalid move, column {} out of range. Columns must be between 1 and {}",
                column_one_indexed,
                WIDTH
            ));
        }
        if self.drop_piece(column_one_indexed - 1, player).is_none() {
            return Err(anyhow!("Invalid move, column {} full", column_one_indexed));
        }
        Ok(self.state())
    }

    /// Drops `player`'s piece into `column` on a clone and reports whether it wins
    pub fn is_winning_move(&self, column: usize, player: Player) -> bool {
        let mut next = self.clone();
        next.drop_piece(column, player).is_some() && next.has_won(player)
    }

    /// Checks every window on the board for four of `player`'s marks
    pub fn has_won(&self, player: Player) -> bool {
        let mark = player.cell();
        WINDOWS
            .iter()
            .any(|window| window.iter().all(|&(row, col)| self.cells[row][col] == mark))
    }

    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::One) {
            Some(Player::One)
        } else if self.has_won(Player::Two) {
            Some(Player::Two)
        } else {
            None
        }
    }

    pub fn is_full(&self) -> bool {
        (0..WIDTH).all(|column| !self.is_available_column(column))
    }

    pub fn is_draw(&self) -> bool {
        self.is_full() && self.winner().is_none()
    }

    pub fn is_game_over(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    pub fn state(&self) -> GameState {
        match self.winner() {
            Some(Player::One) => GameState::PlayerOneWin,
            Some(Player::Two) => GameState::PlayerTwoWin,
            None if self.is_full() => GameState::Draw,
            None => GameState::Playing,
        }
    }

    /// Playable columns in ascending order
    pub fn find_available_columns(&self) -> Vec<usize> {
        (0..WIDTH).filter(|&column| self.is_available_column(column)).collect()
    }

    /// Draws the board to the terminal
    pub fn display(&self) -> Result<()> {
        let mut stdout = stdout();

        let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
        stdout.queue(PrintStyledContent(style(cols + "\n")))?;

        for row in self.cells.iter() {
            for cell in row.iter() {
                stdout.queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match cell {
                            Cell::PlayerOne => Color::Red,
                            Cell::PlayerTwo => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
            }
            stdout.queue(PrintStyledContent(style("\n")))?;
        }
        stdout.flush()?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            let line: String = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => '.',
                    Cell::PlayerOne => 'X',
                    Cell::PlayerTwo => 'O',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
