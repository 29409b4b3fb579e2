use std::collections::VecDeque;
use std::time::Duration;

use clap::Parser;
use log::info;

use plysearch::agent::think;
use plysearch::game::{Mark, TicTacToe, TicTacToeEval};
use plysearch::logging;
use plysearch::search::{Algorithm, SearchConfig, SearchEngine};

#[derive(Parser)]
#[command(
    name = "plysearch move",
    about = "Plan the next moves of a tic-tac-toe position."
)]
struct Opts {
    /// Search configuration.
    #[arg(long, default_value_t)]
    config: SearchConfig,
    /// Overrides the algorithm of the configuration.
    #[arg(long, value_enum)]
    algorithm: Option<Algorithm>,
    /// Board with `x`, `o` and `.` in row major order.
    #[arg(value_parser = parse_board)]
    board: TicTacToe,
    /// Time in ms the search may take.
    #[arg(long, default_value_t = 1000)]
    timeout: u64,
}

fn parse_board(txt: &str) -> Result<TicTacToe, String> {
    TicTacToe::parse(txt).ok_or_else(|| format!("invalid board: {txt:?}"))
}

#[tokio::main]
async fn main() {
    logging();

    let Opts {
        mut config,
        algorithm,
        board,
        timeout,
    } = Opts::parse();

    if let Some(algorithm) = algorithm {
        config.algorithm = algorithm;
    }

    info!("{board:?}");
    info!("{config}");

    let engine = SearchEngine::new(config, TicTacToeEval, |plan: &VecDeque<Mark>| {
        info!("Plan: {plan:?}")
    });
    let thought = think(engine, board, Duration::from_millis(timeout)).await;

    info!("Report: {:?}", thought.report);
    info!("Moves: {:?}", thought.engine.plan());
}
