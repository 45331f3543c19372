//! Strategy-versus-strategy games and matches

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use std::time::{Duration, Instant};

use crate::board::{Board, GameState, Player};
use crate::config::SearchConfig;
use crate::strategy::{SearchStrategy, StrategyKind};

/// The course of a single finished game
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub state: GameState,
    /// Zero-indexed columns in the order they were played
    pub moves: Vec<usize>,
    /// Total thinking time of player one and player two
    pub think_time: [Duration; 2],
}

impl GameRecord {
    pub fn winner(&self) -> Option<Player> {
        match self.state {
            GameState::PlayerOneWin => Some(Player::One),
            GameState::PlayerTwoWin => Some(Player::Two),
            _ => None,
        }
    }
}

/// Tally of games between a side moving first and a side moving second
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct MatchResults {
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,

    /// Summed thinking time of the first and second side over all games
    pub think_time: [Duration; 2],
    /// Moves made by the first and second side over all games
    pub moves: [usize; 2],
}

impl MatchResults {
    pub fn record(&mut self, game: &GameRecord) {
        match game.winner() {
            Some(Player::One) => self.first_wins += 1,
            Some(Player::Two) => self.second_wins += 1,
            None => self.draws += 1,
        }

        // player one makes the even-numbered moves
        let first_moves = (game.moves.len() + 1) / 2;
        self.moves[0] += first_moves;
        self.moves[1] += game.moves.len() - first_moves;
        self.think_time[0] += game.think_time[0];
        self.think_time[1] += game.think_time[1];
    }

    pub fn total(&self) -> usize {
        self.first_wins + self.second_wins + self.draws
    }

    /// Mean time `player` spent per move, zero if it never moved
    pub fn mean_think_time(&self, player: Player) -> Duration {
        let slot = match player {
            Player::One => 0,
            Player::Two => 1,
        };
        match self.moves[slot] {
            0 => Duration::default(),
            moves => self.think_time[slot] / moves as u32,
        }
    }
}

/// Plays `first` (as player one) against `second` (as player two) on a fresh board
///
/// A strategy that fails to produce a move on an unfinished board ends the
/// game as a draw.
pub fn play_game<'a>(
    first: &mut (dyn SearchStrategy + 'a),
    second: &mut (dyn SearchStrategy + 'a),
) -> GameRecord {
    let mut board = Board::new();
    let mut moves = Vec::new();
    let mut think_time = [Duration::default(); 2];
    let mut player = Player::One;

    let state = loop {
        let state = board.state();
        if state != GameState::Playing {
            break state;
        }

        let (strategy, slot) = match player {
            Player::One => (&mut *first, 0),
            Player::Two => (&mut *second, 1),
        };
        let start = Instant::now();
        let column = strategy.get_move(&board);
        think_time[slot] += start.elapsed();

        match column.and_then(|column| board.drop_piece(column, player).map(|_| column)) {
            Some(column) => moves.push(column),
            None => {
                debug!("{} had no move on an unfinished board", strategy.name());
                break GameState::Draw;
            }
        }
        player = player.opponent();
    };

    GameRecord {
        state,
        moves,
        think_time,
    }
}

/// Plays `rounds` games with `a` moving first, then `rounds` with `b` moving first
///
/// Games run in parallel, each with its own strategy instances. When the
/// config carries a seed, every game gets a distinct seed derived from it.
pub fn run_match(
    a: StrategyKind,
    b: StrategyKind,
    config: &SearchConfig,
    rounds: usize,
    show_progress: bool,
) -> (MatchResults, MatchResults) {
    let progress = if show_progress {
        let progress = ProgressBar::new(2 * rounds as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("Playing games: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
                .progress_chars("█▓▒░  "),
        );
        progress
    } else {
        ProgressBar::hidden()
    };

    let half = |first: StrategyKind, second: StrategyKind, offset: usize| {
        (0..rounds)
            .into_par_iter()
            .map(|round| {
                let config = match config.seed {
                    Some(seed) => config.clone().with_seed(seed.wrapping_add((offset + round) as u64)),
                    None => config.clone(),
                };
                let mut one = first.build(&config, Player::One);
                let mut two = second.build(&config, Player::Two);
                let game = play_game(one.as_mut(), two.as_mut());
                progress.inc(1);
                game
            })
            .collect::<Vec<_>>()
            .into_iter()
            .fold(MatchResults::default(), |mut results, game| {
                results.record(&game);
                results
            })
    };

    let results = half(a, b, 0);
    info!("{} vs {}: {:?}", a, b, results);
    let swapped = half(b, a, rounds);
    info!("{} vs {}: {:?}", b, a, swapped);

    progress.finish_with_message("done");
    (results, swapped)
}
