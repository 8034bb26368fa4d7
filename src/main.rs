//! randgo: a flat Monte Carlo Go engine.
//!
//! ## Usage
//!
//! - `randgo` - Show a demo
//! - `randgo gtp` - Start GTP server for GUI integration
//! - `randgo demo` - Search a small fixed position
//!
//! Set `RUST_LOG=info` (or `debug` for per-move statistics) to see search
//! progress on stderr.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use randgo::board::{BoardKind, Color};
use randgo::constants::{DEFAULT_BOARD_SIZE, DEFAULT_GENMOVE_SECS, DEFAULT_KOMI};
use randgo::gtp::{Session, check_size, format_vertex};
use randgo::mcts::{SearchConfig, get_best_move};
use randgo::position::GameState;

/// randgo: a flat Monte Carlo Go engine
#[derive(Parser)]
#[command(name = "randgo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp(EngineArgs),
    /// Run a search on a small fixed position
    Demo(DemoArgs),
}

#[derive(Args)]
struct EngineArgs {
    /// Initial board size
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,
    /// Initial komi
    #[arg(long, default_value_t = DEFAULT_KOMI)]
    komi: f32,
    /// Seconds to think per generated move
    #[arg(long, default_value_t = DEFAULT_GENMOVE_SECS)]
    time: f64,
    /// Search worker threads (defaults to one per CPU)
    #[arg(long)]
    threads: Option<usize>,
    /// Board representation
    #[arg(long, value_enum, default_value_t = BoardKind::Flat)]
    board: BoardKind,
}

#[derive(Args)]
struct DemoArgs {
    /// Seconds to search
    #[arg(long, default_value_t = 5.0)]
    time: f64,
    /// Search worker threads (defaults to one per CPU)
    #[arg(long)]
    threads: Option<usize>,
}

fn search_config(time: f64, threads: Option<usize>) -> Result<SearchConfig> {
    let budget = Duration::try_from_secs_f64(time).with_context(|| format!("invalid --time {time}"))?;
    let mut config = SearchConfig::default().with_time_budget(budget);
    config.workers = threads;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp(args)) => run_gtp(args),
        Some(Commands::Demo(args)) => run_demo(args),
        None => run_demo(DemoArgs {
            time: 5.0,
            threads: None,
        }),
    }
}

fn run_gtp(args: EngineArgs) -> Result<()> {
    check_size(args.size).context("invalid --size")?;
    let config = search_config(args.time, args.threads)?;
    let mut state = GameState::new(args.board, args.size, args.size)?;
    state.set_komi(args.komi);
    let mut session = Session::new(state, config);
    session.run(std::io::stdin().lock(), std::io::stdout().lock())
}

fn run_demo(args: DemoArgs) -> Result<()> {
    println!("randgo: flat Monte Carlo Go engine\n");

    let state = GameState::from_layout(
        BoardKind::Flat,
        5,
        4,
        0.0,
        "ox.. / ox.. / ox.x / oxxo / oooo",
    )?;
    println!("{}", state.board());

    let config = search_config(args.time, args.threads)?;
    println!(
        "Searching for Black with {} workers for {:.1}s...",
        config.worker_count(),
        config.time_budget.as_secs_f64()
    );
    let outcome = get_best_move(&state, Color::Black, &config);
    for (p, s) in outcome.candidates.iter().zip(&outcome.stats) {
        println!(
            "  {}: {} / {} = {:.3}",
            format_vertex(*p)?,
            s.wins,
            s.trials,
            s.winrate()
        );
    }
    println!("{} playouts", outcome.playouts);
    match outcome.best {
        Some(p) => {
            let mut after = state.clone();
            after.play(p, Color::Black);
            println!("Best move: {} {:?}", format_vertex(p)?, p);
            println!("{}", after.board());
            println!("White stones captured: {}", after.captured_white());
        }
        None => println!("Best move: pass"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_args(size: usize) -> EngineArgs {
        EngineArgs {
            size,
            komi: DEFAULT_KOMI,
            time: 0.1,
            threads: Some(1),
            board: BoardKind::Flat,
        }
    }

    #[test]
    fn test_gtp_rejects_board_without_vertices() {
        // Size checks run before stdin is touched.
        assert!(run_gtp(engine_args(26)).is_err());
        assert!(run_gtp(engine_args(0)).is_err());
    }

    #[test]
    fn test_cli_parses_gtp_flags() {
        let cli = Cli::try_parse_from(["randgo", "gtp", "--size", "13", "--board", "rows"]).unwrap();
        match cli.command {
            Some(Commands::Gtp(args)) => {
                assert_eq!(args.size, 13);
                assert_eq!(args.board, BoardKind::Rows);
            }
            _ => panic!("expected the gtp subcommand"),
        }
    }
}
