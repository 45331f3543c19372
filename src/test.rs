#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use proptest::prelude::*;
    use std::time::{Duration, Instant};

    use crate::evaluator::{score_position, score_window, terminal_score, LOSS_SCORE, WIN_SCORE};
    use crate::iterative_deepening::move_order;
    use crate::tournament::{play_game, run_match, GameRecord, MatchResults};
    use crate::*;

    // rows are given top to bottom, X for player one, O for player two
    fn board_from_rows(rows: [&str; HEIGHT]) -> Board {
        let mut board = Board::new();
        for (row, line) in rows.iter().enumerate() {
            for (column, cell) in line.chars().enumerate() {
                match cell {
                    'X' => board.place_piece(row, column, Player::One),
                    'O' => board.place_piece(row, column, Player::Two),
                    _ => {}
                }
            }
        }
        board
    }

    // plays columns in turn, skipping full columns and stopping before the game ends
    fn board_from_columns(columns: &[usize]) -> (Board, Player) {
        let mut board = Board::new();
        let mut player = Player::One;
        for &column in columns {
            let mut next = board.clone();
            if next.drop_piece(column, player).is_none() {
                continue;
            }
            if next.is_game_over() {
                break;
            }
            board = next;
            player = player.opponent();
        }
        (board, player)
    }

    fn full_minimax(board: &Board, depth: usize, maximizing: bool, ai: Player) -> i32 {
        if let Some(score) = terminal_score(board, ai) {
            return score;
        }
        if depth == 0 {
            return score_position(board, ai);
        }
        let mover = if maximizing { ai } else { ai.opponent() };
        let scores = board.find_available_columns().into_iter().map(|column| {
            let mut next = board.clone();
            next.drop_piece(column, mover);
            full_minimax(&next, depth - 1, !maximizing, ai)
        });
        if maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    fn all_strategies(player: Player) -> Vec<Box<dyn SearchStrategy + Send>> {
        let config = SearchConfig::default()
            .with_depth(3)
            .with_max_depth(4)
            .with_iterations(200)
            .with_seed(7);
        StrategyKind::ALL
            .iter()
            .map(|kind| kind.build(&config, player))
            .collect()
    }

    // player one has three along the bottom row with column 3 open
    fn bottom_row_threat() -> Board {
        board_from_rows([
            ".......",
            ".......",
            ".......",
            ".......",
            "OO.....",
            "XXX...O",
        ])
    }

    fn drawn_board() -> Board {
        board_from_rows([
            "OXXOOOX",
            "XOOXXXO",
            "OOOXOXO",
            "XXOXOOO",
            "XOXOXXX",
            "XXOOXOX",
        ])
    }

    #[test]
    pub fn horizontal_win_at_edge() {
        let board = board_from_rows([
            ".......",
            ".......",
            ".......",
            ".......",
            "...OOO.",
            "...XXXX",
        ]);
        assert!(board.has_won(Player::One));
        assert!(!board.has_won(Player::Two));
        assert_eq!(board.state(), GameState::PlayerOneWin);
    }

    #[test]
    pub fn vertical_win_in_corner() {
        let board = board_from_rows([
            "......O",
            "......O",
            "......O",
            "......O",
            "......X",
            "XX.X..X",
        ]);
        assert!(board.has_won(Player::Two));
        assert!(!board.has_won(Player::One));
        assert_eq!(board.winner(), Some(Player::Two));
    }

    #[test]
    pub fn diagonal_wins() {
        let descending = board_from_rows([
            ".......",
            ".......",
            "X......",
            "OX.....",
            "OOX....",
            "OOOX...",
        ]);
        assert!(descending.has_won(Player::One));
        assert!(!descending.has_won(Player::Two));

        let ascending = board_from_rows([
            ".......",
            ".......",
            "......O",
            ".....OX",
            "....OXX",
            "...OXXX",
        ]);
        assert!(ascending.has_won(Player::Two));
        assert!(!ascending.has_won(Player::One));
    }

    #[test]
    pub fn no_false_wins() {
        let board = board_from_rows([
            ".......",
            ".......",
            ".......",
            "X......",
            "X..O...",
            "XXOXXXO",
        ]);
        assert!(!board.has_won(Player::One));
        assert!(!board.has_won(Player::Two));
        assert_eq!(board.state(), GameState::Playing);
        assert_eq!(crate::board::NUM_WINDOWS, 69);
    }

    #[test]
    pub fn gravity_and_availability() {
        let mut board = Board::new();
        assert_eq!(board.get_available_row(2), Some(HEIGHT - 1));

        for i in 0..HEIGHT {
            assert!(board.is_available_column(2));
            let player = if i % 2 == 0 { Player::One } else { Player::Two };
            assert_eq!(board.drop_piece(2, player), Some(HEIGHT - 1 - i));
        }
        assert!(!board.is_available_column(2));
        assert_eq!(board.get_available_row(2), None);
        assert_eq!(board.drop_piece(2, Player::One), None);
        assert_eq!(board.find_available_columns(), vec![0, 1, 3, 4, 5, 6]);
        assert_eq!(board.num_moves(), HEIGHT);
    }

    #[test]
    pub fn from_moves() -> Result<()> {
        let board = Board::from_moves("4453")?;
        assert_eq!(board.cell(5, 3), Cell::PlayerOne);
        assert_eq!(board.cell(4, 3), Cell::PlayerTwo);
        assert_eq!(board.cell(5, 4), Cell::PlayerOne);
        assert_eq!(board.cell(5, 2), Cell::PlayerTwo);

        assert!(Board::from_moves("8").is_err());
        assert!(Board::from_moves("0").is_err());
        assert!(Board::from_moves("4a").is_err());
        assert!(Board::from_moves("1111111").is_err());
        // player one wins on the seventh move
        assert!(Board::from_moves("1212121").is_ok());
        assert!(Board::from_moves("12121213").is_err());
        Ok(())
    }

    #[test]
    pub fn play_checked() -> Result<()> {
        let mut board = Board::new();
        assert!(board.play_checked(0, Player::One).is_err());
        assert!(board.play_checked(WIDTH + 1, Player::One).is_err());
        assert_eq!(board.play_checked(1, Player::One)?, GameState::Playing);

        let mut board = Board::from_moves("121212")?;
        assert_eq!(board.play_checked(1, Player::One)?, GameState::PlayerOneWin);
        Ok(())
    }

    #[test]
    pub fn drawn_position() {
        let board = drawn_board();
        assert!(board.find_available_columns().is_empty());
        assert!(board.winner().is_none());
        assert!(board.is_draw());
        assert!(board.is_game_over());
        assert_eq!(board.state(), GameState::Draw);

        // a full board with a winner is not a draw
        let won = board_from_rows([
            "OXXOOOX",
            "XOOXXXO",
            "OOOXOXO",
            "XXOXOOO",
            "XOXOXXX",
            "XXXXOOO",
        ]);
        assert!(won.has_won(Player::One));
        assert!(!won.is_draw());
    }

    #[test]
    pub fn strategies_give_up_on_full_board() {
        let board = drawn_board();
        for player in [Player::One, Player::Two].iter() {
            for mut strategy in all_strategies(*player) {
                assert_eq!(strategy.get_move(&board), None, "{}", strategy.name());
            }
        }
    }

    #[test]
    pub fn window_scores() {
        let e = Cell::Empty;
        let x = Cell::PlayerOne;
        let o = Cell::PlayerTwo;

        assert_eq!(score_window(&[x, x, x, x], Player::One), 1000);
        assert_eq!(score_window(&[x, x, e, x], Player::One), 10);
        assert_eq!(score_window(&[x, e, e, x], Player::One), 3);
        assert_eq!(score_window(&[o, o, e, o], Player::One), -8);
        assert_eq!(score_window(&[e, o, o, e], Player::One), -2);
        assert_eq!(score_window(&[x, o, e, e], Player::One), 0);
        assert_eq!(score_window(&[o, o, e, o], Player::Two), 10);
    }

    #[test]
    pub fn position_scores() {
        assert_eq!(score_position(&Board::new(), Player::One), 0);

        // one piece in the centre only earns the centre bonus
        let mut board = Board::new();
        board.drop_piece(3, Player::One);
        assert_eq!(score_position(&board, Player::One), 5);
        assert_eq!(score_position(&board, Player::Two), 0);

        // two in a row on the bottom: three windows score 3 each, plus one centre piece
        let mut board = Board::new();
        board.drop_piece(2, Player::One);
        board.drop_piece(3, Player::One);
        assert_eq!(score_position(&board, Player::One), 3 + 3 + 3 + 5);
        assert_eq!(score_position(&board, Player::Two), -2 * 3);

        assert_eq!(terminal_score(&bottom_row_threat(), Player::One), None);
        assert_eq!(terminal_score(&drawn_board(), Player::One), Some(0));
        let won = Board::from_moves("1212121").unwrap();
        assert_eq!(terminal_score(&won, Player::One), Some(WIN_SCORE));
        assert_eq!(terminal_score(&won, Player::Two), Some(LOSS_SCORE));
    }

    #[test]
    pub fn minimax_empty_board() {
        let mut minimax = Minimax::new(Player::One, 3);
        let column = minimax.get_move(&Board::new());
        assert!(matches!(column, Some(c) if c < WIDTH));
        assert!(minimax.node_count > 0);
    }

    #[test]
    pub fn minimax_prefers_centre() {
        for depth in 1..=3 {
            let mut minimax = Minimax::new(Player::One, depth);
            assert_eq!(minimax.get_move(&Board::new()), Some(3));
        }
    }

    #[test]
    pub fn all_strategies_complete_four() {
        let board = bottom_row_threat();
        assert_eq!(Minimax::new(Player::One, 5).get_move(&board), Some(3));
        assert_eq!(Minimax::new(Player::One, 1).get_move(&board), Some(3));
        assert_eq!(IterativeDeepening::new(Player::One, 7).get_move(&board), Some(3));
        assert_eq!(Greedy::new(Player::One).get_move(&board), Some(3));
    }

    #[test]
    pub fn block_opponent_win() {
        // player two threatens column 3 and player one has no win
        let board = board_from_rows([
            ".......",
            ".......",
            ".......",
            ".......",
            "XX.....",
            "OOO...X",
        ]);
        assert_eq!(Greedy::new(Player::One).get_move(&board), Some(3));
        assert_eq!(IterativeDeepening::new(Player::One, 7).get_move(&board), Some(3));
        assert_eq!(Minimax::new(Player::One, 3).get_move(&board), Some(3));
    }

    #[test]
    pub fn winning_beats_blocking() {
        // player two threatens column 3, player one can win in column 5
        let board = board_from_rows([
            ".......",
            ".......",
            ".......",
            ".....X.",
            ".....X.",
            "OOO..X.",
        ]);
        let id = IterativeDeepening::new(Player::One, 7);
        assert_eq!(id.forced_move(&board), Some(5));
        assert_eq!(id.order_moves(&board), vec![5]);
        assert_eq!(IterativeDeepening::new(Player::One, 7).get_move(&board), Some(5));
        assert_eq!(Greedy::new(Player::One).get_move(&board), Some(5));
        assert_eq!(Minimax::new(Player::One, 5).get_move(&board), Some(5));
    }

    #[test]
    pub fn centre_first_ordering() -> Result<()> {
        assert_eq!(move_order(), [3, 2, 4, 1, 5, 0, 6]);

        let id = IterativeDeepening::new(Player::One, 3);
        assert_eq!(id.order_moves(&Board::new()), vec![3, 2, 4, 1, 5, 0, 6]);

        // fill the centre column without creating any threats
        let board = Board::from_moves("444444")?;
        assert_eq!(id.forced_move(&board), None);
        assert_eq!(id.order_moves(&board), vec![2, 4, 1, 5, 0, 6]);
        Ok(())
    }

    #[test]
    pub fn greedy_adjacency() {
        let board = board_from_rows([
            ".......",
            ".......",
            ".......",
            ".......",
            "..X....",
            ".XX.O..",
        ]);
        // (5, 3): two to the left, one up-left
        assert_eq!(Greedy::adjacency(&board, 5, 3, Player::One), 4 + 1);
        // (5, 0): two to the right
        assert_eq!(Greedy::adjacency(&board, 5, 0, Player::One), 4);
        assert_eq!(Greedy::adjacency(&board, 5, 3, Player::Two), 1);

        let greedy = Greedy::new(Player::One);
        assert_eq!(greedy.move_value(&board, 3), Some(5));
        assert_eq!(greedy.move_value(&board, 1), Some(1 + 1 + 1));
    }

    #[test]
    pub fn greedy_ties_resolve_left() {
        // every column is worth nothing on an empty board
        assert_eq!(Greedy::new(Player::Two).get_move(&Board::new()), Some(0));
    }

    #[test]
    pub fn searches_leave_board_untouched() {
        let board = bottom_row_threat();
        let snapshot = board.clone();
        for player in [Player::One, Player::Two].iter() {
            for mut strategy in all_strategies(*player) {
                let column = strategy.get_move(&board);
                assert!(column.map_or(false, |c| board.is_available_column(c)));
                assert_eq!(board, snapshot, "{} modified the board", strategy.name());
            }
        }
    }

    #[test]
    pub fn iterative_deepening_without_forced_moves() -> Result<()> {
        let board = Board::from_moves("4433")?;
        let mut id = IterativeDeepening::new(Player::One, 4);
        let column = id.get_move(&board);
        assert!(matches!(column, Some(c) if c < WIDTH));
        assert!(id.node_count > 0);

        // one ply sees only the evaluation, three see the reply
        let board = Board::from_moves("44")?;
        assert!(IterativeDeepening::new(Player::One, 1).forced_move(&board).is_none());
        assert_eq!(IterativeDeepening::new(Player::One, 1).get_move(&board), Some(2));
        assert_eq!(IterativeDeepening::new(Player::One, 3).get_move(&board), Some(3));

        // depth cap of zero still answers
        let mut shallow = IterativeDeepening::new(Player::One, 0);
        assert_eq!(shallow.get_move(&Board::new()), Some(3));
        Ok(())
    }

    #[test]
    pub fn mcts_finds_winning_move() {
        // player one has three stacked in column 0
        let board = board_from_rows([
            ".......",
            ".......",
            "X......",
            "XO.....",
            "XO.....",
            "OX..O..",
        ]);
        let runs = 10;
        let hits = (0..runs)
            .filter(|&seed| {
                let config = SearchConfig::default()
                    .with_iterations(2000)
                    .without_time_limit()
                    .with_seed(seed);
                MonteCarloTreeSearch::new(Player::One, &config).get_move(&board) == Some(0)
            })
            .count();
        assert!(hits >= runs as usize - 1, "winning move found in {}/{} runs", hits, runs);
    }

    #[test]
    pub fn mcts_blocks_when_it_cannot_win() {
        let board = board_from_rows([
            ".......",
            ".......",
            ".......",
            ".......",
            "XX.....",
            "OOO...X",
        ]);
        let config = SearchConfig::default()
            .with_iterations(2000)
            .without_time_limit()
            .with_seed(3);
        let mut mcts = MonteCarloTreeSearch::new(Player::One, &config);
        assert_eq!(mcts.get_move(&board), Some(3));
    }

    #[test]
    pub fn mcts_iteration_cap() {
        let config = SearchConfig::default()
            .with_iterations(50)
            .without_time_limit()
            .with_seed(1);
        let mut mcts = MonteCarloTreeSearch::new(Player::Two, &config);
        let column = mcts.get_move(&Board::new());

        assert!(matches!(column, Some(c) if c < WIDTH));
        assert_eq!(mcts.iterations_run, 50);
        // one new node per iteration at most, plus the root
        assert!(mcts.node_count <= 51);
        // every root child is created in the first iterations
        assert!(mcts.node_count >= WIDTH + 1);
    }

    #[test]
    pub fn mcts_time_limit() {
        let config = SearchConfig::default()
            .with_iterations(usize::MAX)
            .with_time_limit(Duration::from_millis(100))
            .with_seed(2);
        let mut mcts = MonteCarloTreeSearch::new(Player::One, &config);

        let start = Instant::now();
        let column = mcts.get_move(&Board::new());
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(matches!(column, Some(c) if c < WIDTH));
        assert!(mcts.iterations_run > 0);
    }

    #[test]
    pub fn mcts_is_reproducible_with_seed() {
        let board = Board::from_moves("4435").unwrap();
        let config = SearchConfig::default()
            .with_iterations(300)
            .without_time_limit()
            .with_seed(42);
        let first = MonteCarloTreeSearch::new(Player::One, &config).get_move(&board);
        let second = MonteCarloTreeSearch::new(Player::One, &config).get_move(&board);
        assert_eq!(first, second);
    }

    #[test]
    pub fn strategy_names() -> Result<()> {
        for kind in StrategyKind::ALL.iter() {
            assert_eq!(kind.to_string().parse::<StrategyKind>()?, *kind);
            let strategy = kind.build(&SearchConfig::default(), Player::Two);
            assert_eq!(strategy.player(), Player::Two);
        }
        assert_eq!("Greedy".parse::<StrategyKind>()?, StrategyKind::Greedy);
        assert!("random".parse::<StrategyKind>().is_err());
        Ok(())
    }

    #[test]
    pub fn config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.depth, 5);
        assert_eq!(config.max_depth, 7);
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.time_limit, Duration::from_secs(2));
        assert!((config.exploration_weight - 1.41).abs() < 1e-9);
        assert_eq!(config.seed, None);
    }

    #[test]
    pub fn greedy_self_play() {
        let mut one = Greedy::new(Player::One);
        let mut two = Greedy::new(Player::Two);
        let game = play_game(&mut one, &mut two);

        assert_ne!(game.state, GameState::Playing);
        let mut board = Board::new();
        let mut player = Player::One;
        for &column in game.moves.iter() {
            assert!(board.drop_piece(column, player).is_some());
            player = player.opponent();
        }
        assert_eq!(board.state(), game.state);
    }

    #[test]
    pub fn match_tally() {
        let config = SearchConfig::default().with_depth(2).with_seed(11);
        let (results, swapped) =
            run_match(StrategyKind::Greedy, StrategyKind::Minimax, &config, 2, false);
        assert_eq!(results.total(), 2);
        assert_eq!(swapped.total(), 2);

        // deterministic strategies replay the same game every round
        let (results, _) = run_match(StrategyKind::Greedy, StrategyKind::Greedy, &config, 3, false);
        let outcomes = (results.first_wins, results.second_wins, results.draws);
        assert!(outcomes == (3, 0, 0) || outcomes == (0, 3, 0) || outcomes == (0, 0, 3));
        assert!(results.moves[0] >= 3 * 4);
        // a first-side win is the only way to end on an odd move
        assert_eq!(results.moves[0] - results.moves[1], results.first_wins);
    }

    #[test]
    pub fn mixed_strategies_play_a_game() {
        let config = SearchConfig::default().with_depth(2).with_iterations(50).with_seed(5);
        let mut one = StrategyKind::MonteCarlo.build(&config, Player::One);
        let mut two = StrategyKind::Minimax.build(&config, Player::Two);
        let game = play_game(one.as_mut(), two.as_mut());
        assert_ne!(game.state, GameState::Playing);

        let mut greedy = Greedy::new(Player::One);
        let mut deepening = IterativeDeepening::new(Player::Two, 2);
        let game = play_game(&mut greedy, &mut deepening);
        assert_ne!(game.state, GameState::Playing);
        assert!(game.moves.len() >= 7);
    }

    #[test]
    pub fn match_think_time() {
        let mut results = MatchResults::default();
        assert_eq!(results.mean_think_time(Player::One), Duration::default());

        results.record(&GameRecord {
            state: GameState::PlayerOneWin,
            moves: vec![3, 2, 3, 2, 3, 2, 3],
            think_time: [Duration::from_millis(40), Duration::from_millis(30)],
        });
        results.record(&GameRecord {
            state: GameState::PlayerTwoWin,
            moves: vec![0, 1, 0, 1, 0, 1, 6, 1],
            think_time: [Duration::from_millis(40), Duration::from_millis(10)],
        });

        assert_eq!((results.first_wins, results.second_wins, results.draws), (1, 1, 0));
        assert_eq!(results.moves, [8, 7]);
        assert_eq!(
            results.think_time,
            [Duration::from_millis(80), Duration::from_millis(40)]
        );
        assert_eq!(results.mean_think_time(Player::One), Duration::from_millis(10));
        assert_eq!(results.mean_think_time(Player::Two), Duration::from_nanos(5_714_285));
    }

    proptest! {
        #[test]
        fn clone_is_independent(
            setup in prop::collection::vec(0..WIDTH, 0..20),
            extra in prop::collection::vec(0..WIDTH, 1..20)
        ) {
            let (original, player) = board_from_columns(&setup);
            let snapshot = original.clone();

            let mut copy = original.clone();
            let mut mover = player;
            for &column in extra.iter() {
                copy.drop_piece(column, mover);
                mover = mover.opponent();
            }
            prop_assert_eq!(&original, &snapshot);

            let mut original = original;
            let copy = original.clone();
            for &column in extra.iter() {
                original.drop_piece(column, player);
            }
            prop_assert_eq!(&copy, &snapshot);
        }

        #[test]
        fn pruning_preserves_value(columns in prop::collection::vec(0..WIDTH, 0..16)) {
            let (board, player) = board_from_columns(&columns);
            let mut minimax = Minimax::new(player, 3);
            let (column, value) = minimax.search(&board);

            prop_assert!(column.is_some());
            prop_assert_eq!(value, full_minimax(&board, 3, true, player));
        }

        #[test]
        fn deepening_picks_a_best_column(
            columns in prop::collection::vec(0..WIDTH, 0..16),
            depth in 1..4usize
        ) {
            let (board, player) = board_from_columns(&columns);
            let mut id = IterativeDeepening::new(player, depth);
            prop_assume!(id.forced_move(&board).is_none());

            let value_of = |column: usize| {
                let mut next = board.clone();
                next.drop_piece(column, player);
                full_minimax(&next, depth - 1, false, player)
            };
            let best = board.find_available_columns().into_iter().map(&value_of).max();

            let column = id.get_move(&board);
            prop_assert!(column.is_some());
            prop_assert_eq!(column.map(&value_of), best);
        }

        #[test]
        fn draw_iff_full_without_winner(columns in prop::collection::vec(0..WIDTH, 0..60)) {
            let mut board = Board::new();
            let mut player = Player::One;
            for &column in columns.iter() {
                if board.is_game_over() {
                    break;
                }
                if board.drop_piece(column, player).is_some() {
                    player = player.opponent();
                }
            }
            prop_assert_eq!(
                board.is_draw(),
                board.find_available_columns().is_empty() && board.winner().is_none()
            );
        }
    }
}
