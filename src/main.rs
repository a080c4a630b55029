//! Sliding-Block Puzzle Solver
//!
//! Runs an anytime solving session for the classic Klotski layout. The
//! session lives on a worker thread and streams progress and per-trial
//! results back to the terminal until Ctrl-C or a trial limit stops it.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use klotski::{grid, Puzzle, Report, Session};

/// Solves the classic Klotski sliding-block puzzle.
#[derive(Parser)]
#[command(name = "klotski")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run solving trials until stopped, printing each outcome.
    Solve {
        /// Seed for the move-ordering RNG; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Per-trial move limit.
        #[arg(long)]
        max_depth: Option<u32>,
        /// Stop after this many trials; unlimited when omitted.
        #[arg(long)]
        trials: Option<u64>,
    },
    /// Print the starting board.
    Show,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Solve {
            seed,
            max_depth,
            trials,
        }) => run_solve(seed, max_depth, trials),
        Some(Command::Show) => run_show(),
        None => run_solve(None, None, None),
    }
}

/// Runs the session on a worker thread and consumes its reports.
fn run_solve(seed: Option<u64>, max_depth: Option<u32>, trials: Option<u64>) {
    let puzzle = Puzzle::klotski();
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (tx, rx) = channel();
    let mut session = match Session::start(puzzle, max_depth, rng, tx) {
        Ok(session) => session,
        Err(error) => {
            eprintln!("invalid configuration: {error}");
            return;
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst))
        .expect("installing the Ctrl-C handler");

    let worker_stop = Arc::clone(&stop);
    let worker = thread::spawn(move || session.run(&worker_stop));

    let mut finished = 0u64;
    for report in rx {
        match report {
            Report::Tick {
                trial,
                rounds,
                visited,
                depth,
                ..
            } => {
                print!("\rtrial {trial}: {rounds} rounds, {visited} states, depth {depth}    ");
                let _ = io::stdout().flush();
            }
            Report::Result {
                trial,
                rounds,
                duration,
                sequence,
            } => {
                match sequence {
                    Some(sequence) => {
                        let moves: Vec<String> =
                            sequence.iter().map(ToString::to_string).collect();
                        println!(
                            "\rtrial {trial}: [{} moves][{:.2}s] {}",
                            sequence.len(),
                            duration.as_secs_f64(),
                            moves.join(" ")
                        );
                    }
                    None => println!(
                        "\rtrial {trial}: no solution within bound ({rounds} rounds, {:.2}s)",
                        duration.as_secs_f64()
                    ),
                }
                finished += 1;
                if trials.is_some_and(|limit| finished >= limit) {
                    stop.store(true, Ordering::SeqCst);
                }
            }
        }
    }

    let _ = worker.join();
}

/// Prints the starting board and goal.
fn run_show() {
    let puzzle = Puzzle::klotski();
    print!("{}", grid::format_board(puzzle.board, &puzzle.pieces));
    println!("goal: target corner at ({}, {})", puzzle.goal.0, puzzle.goal.1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use klotski::moves::apply;
    use klotski::{Move, PieceId};

    #[test]
    fn test_start_board_snapshot() {
        let puzzle = Puzzle::klotski();
        insta::assert_snapshot!(grid::format_board(puzzle.board, &puzzle.pieces), @r"
        1663
        1663
        .55.
        2794
        28A4
        ");
    }

    #[test]
    fn test_board_after_opening_slide() {
        let mut puzzle = Puzzle::klotski();
        apply(
            &mut puzzle.pieces,
            Move {
                piece: PieceId(4),
                from: (1, 2),
                to: (0, 2),
            },
        );
        insta::assert_snapshot!(grid::format_board(puzzle.board, &puzzle.pieces), @r"
        1663
        1663
        55..
        2794
        28A4
        ");
    }
}
