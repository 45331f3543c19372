use anyhow::Result;

use std::io::{stdin, stdout, Stdin, Write};
use std::time::{Duration, Instant};

use connect4_search::tournament::{run_match, MatchResults};
use connect4_search::*;

const MATCH_ROUNDS: usize = 10;

fn prompt(stdin: &Stdin, question: &str) -> Result<String> {
    print!("{}", question);
    stdout().flush()?;
    let mut buffer = String::new();
    stdin.read_line(&mut buffer)?;
    Ok(buffer.trim().to_string())
}

fn choose_strategy(stdin: &Stdin, question: &str) -> Result<StrategyKind> {
    let names: Vec<String> = StrategyKind::ALL.iter().map(|kind| kind.to_string()).collect();
    loop {
        let answer = prompt(stdin, &format!("{} ({}): ", question, names.join("/")))?;
        match answer.parse::<StrategyKind>() {
            Ok(kind) => return Ok(kind),
            Err(err) => println!("{}", err),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let stdin = stdin();
    let config = SearchConfig::default();

    println!("Welcome to Connect 4\n");

    loop {
        match prompt(&stdin, "Play against the AI or watch an AI match? p/m: ")?
            .to_lowercase()
            .chars()
            .next()
        {
            Some('p') => return play_human(&stdin, &config),
            Some('m') => return play_match(&stdin, &config),
            _ => println!("Unknown answer given"),
        }
    }
}

fn play_human(stdin: &Stdin, config: &SearchConfig) -> Result<()> {
    let kind = choose_strategy(stdin, "Which AI would you like to play")?;

    // the human always moves first as player one
    let human = Player::One;
    let mut ai = kind.build(config, human.opponent());

    let mut board = Board::new();
    let mut player = human;
    let mut ai_time = Duration::default();
    let mut ai_moves = 0;

    // game loop
    loop {
        board.display()?;

        match board.state() {
            GameState::Playing => {
                if player == human {
                    let input = prompt(stdin, "Move input > ")?;
                    let column = match input.parse::<usize>() {
                        Err(_) => {
                            println!("Invalid number: {}", input);
                            continue;
                        }
                        Ok(column) => column,
                    };
                    if let Err(err) = board.play_checked(column, player) {
                        println!("{}", err);
                        // try the move again
                        continue;
                    }
                } else {
                    println!("{} is thinking...", ai.name());
                    let start = Instant::now();
                    let next_move = ai.get_move(&board);
                    ai_time += start.elapsed();

                    match next_move {
                        Some(column) => {
                            ai_moves += 1;
                            println!("AI plays: {}", column + 1);
                            board.play_checked(column + 1, player)?;
                        }
                        None => break,
                    }
                }
                player = player.opponent();
            }

            // end states
            GameState::PlayerOneWin => {
                println!("Player wins!");
                break;
            }
            GameState::PlayerTwoWin => {
                println!("AI wins!");
                break;
            }
            GameState::Draw => {
                println!("Draw!");
                break;
            }
        }
    }

    if ai_moves > 0 {
        println!("AI made {} moves.", ai_moves);
        println!("Total AI thinking time: {:.3}s", ai_time.as_secs_f64());
        println!(
            "Average time per move: {:.3}s",
            ai_time.as_secs_f64() / ai_moves as f64
        );
    } else {
        println!("AI made no moves.");
    }
    Ok(())
}

fn play_match(stdin: &Stdin, config: &SearchConfig) -> Result<()> {
    let first = choose_strategy(stdin, "First AI")?;
    let second = choose_strategy(stdin, "Second AI")?;

    let (results, swapped) = run_match(first, second, config, MATCH_ROUNDS, true);

    println!("\nFirst {} games complete:", results.total());
    println!("{} wins: {}", first, results.first_wins);
    println!("{} wins: {}", second, results.second_wins);
    println!("Draws: {}", results.draws);
    print_think_times(&results, first, second);

    println!("\nSecond {} games complete (after swapping players):", swapped.total());
    println!("{} wins: {}", second, swapped.first_wins);
    println!("{} wins: {}", first, swapped.second_wins);
    println!("Draws: {}", swapped.draws);
    print_think_times(&swapped, second, first);
    Ok(())
}

fn print_think_times(results: &MatchResults, first: StrategyKind, second: StrategyKind) {
    for (slot, (kind, player)) in [(first, Player::One), (second, Player::Two)].iter().enumerate() {
        println!(
            "{} thinking time: {:.3}s over {} moves ({:.3}s per move)",
            kind,
            results.think_time[slot].as_secs_f64(),
            results.moves[slot],
            results.mean_think_time(*player).as_secs_f64()
        );
    }
}
