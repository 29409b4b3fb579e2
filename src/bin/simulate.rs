use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use log::warn;
use owo_colors::OwoColorize;

use plysearch::agent::think;
use plysearch::game::{Boxes, BoxesEval, TicTacToe, TicTacToeEval};
use plysearch::logging;
use plysearch::search::{Discard, Evaluator, GameState, SearchConfig, SearchEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GameKind {
    Tictactoe,
    Boxes,
}

#[derive(Parser)]
#[command(
    name = "plysearch simulator",
    about = "Play games between two search configurations."
)]
struct Opts {
    /// Game to play.
    #[arg(long, value_enum, default_value_t = GameKind::Tictactoe)]
    game: GameKind,
    /// Number of boxes per row.
    #[arg(long, default_value_t = 3)]
    width: usize,
    /// Number of boxes per column.
    #[arg(long, default_value_t = 3)]
    height: usize,
    /// Time in ms each player may think per move.
    #[arg(long, default_value_t = 1000)]
    timeout: u64,
    #[arg(short, long, default_value_t = 1)]
    game_count: usize,
    #[arg(short, long)]
    verbose: bool,

    /// Configuration of the first player.
    #[arg(default_value_t)]
    first: SearchConfig,
    /// Configuration of the second player.
    #[arg(default_value_t)]
    second: SearchConfig,
}

#[tokio::main]
async fn main() {
    logging();

    let Opts {
        game,
        width,
        height,
        timeout,
        game_count,
        verbose,
        first,
        second,
    } = Opts::parse();

    let start = Instant::now();
    let timeout = Duration::from_millis(timeout);
    let configs = [first, second];

    let mut results = [0; 3];
    for i in 0..game_count {
        let outcome = match game {
            GameKind::Tictactoe => {
                play_game(TicTacToe::default(), TicTacToeEval, &configs, timeout, verbose).await
            }
            GameKind::Boxes => {
                play_game(Boxes::new(width, height), BoxesEval, &configs, timeout, verbose).await
            }
        };
        match outcome {
            Some(winner) => results[winner] += 1,
            None => results[2] += 1,
        }
        println!(
            "{}: {} {}ms",
            "Finish Game".bright_green(),
            i,
            start.elapsed().as_millis()
        );
    }

    println!(
        "Result: {} wins, {} losses, {} draws",
        results[0], results[1], results[2]
    );
}

/// Plays a game and returns the winner, `None` on a draw.
async fn play_game<G, E>(
    mut game: G,
    evaluator: E,
    configs: &[SearchConfig; 2],
    timeout: Duration,
    verbose: bool,
) -> Option<usize>
where
    G: GameState + Send + 'static + std::fmt::Debug,
    G::Move: Send,
    E: Evaluator<G> + Clone + Send + 'static,
{
    let mut engines = configs
        .iter()
        .map(|config| Some(SearchEngine::new(config.clone(), evaluator.clone(), Discard)))
        .collect::<Vec<_>>();

    for ply in 0.. {
        if game.is_terminal() {
            if verbose {
                println!("game: {:?} after {ply} moves", game.winner());
            }
            break;
        }

        let player = game.turn();
        let Some(engine) = engines[player].take() else {
            unreachable!("engine of player {player} is thinking");
        };
        let mut thought = think(engine, game, timeout).await;
        let m = match thought.next_move() {
            Some(m) => m,
            None => {
                warn!(">>> no plan, taking the first legal move");
                let Some(m) = thought.state.legal_moves().into_iter().next() else {
                    unreachable!("non-terminal position without moves");
                };
                m
            }
        };
        engines[player] = Some(thought.engine);
        game = thought.state;

        if verbose {
            println!("{ply}: {m:?}");
        }
        game.apply_move(m);
        if verbose {
            println!("{game:?}");
        }
    }
    game.winner()
}
