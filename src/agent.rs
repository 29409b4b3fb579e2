//! Thinking with a deadline.

use std::panic;
use std::time::{Duration, Instant};

use log::{info, warn};
use tokio::{task, time};

use crate::search::{Evaluator, GameState, PlanListener, SearchEngine, SearchReport};

const CANCEL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of [think], returning ownership of the engine and the position.
pub struct Thought<G: GameState, E, L> {
    pub engine: SearchEngine<G, E, L>,
    pub state: G,
    /// `None` if the cached plan was still valid.
    pub report: Option<SearchReport>,
}

impl<G: GameState, E, L> Thought<G, E, L> {
    /// Takes the next planned move.
    pub fn next_move(&mut self) -> Option<G::Move> {
        self.engine.next_move()
    }
}

/// Builds the moves list on a blocking thread.
///
/// If the search does not finish within `timeout` it is cancelled and the
/// best-effort plan is returned instead.
pub async fn think<G, E, L>(
    mut engine: SearchEngine<G, E, L>,
    mut state: G,
    timeout: Duration,
) -> Thought<G, E, L>
where
    G: GameState + Send + 'static,
    G::Move: Send,
    E: Evaluator<G> + Send + 'static,
    L: PlanListener<G::Move> + Send + 'static,
{
    let start = Instant::now();
    let handle = engine.handle();
    let mut search = task::spawn_blocking(move || {
        let report = engine.build_moves_list(&mut state);
        Thought {
            engine,
            state,
            report,
        }
    });

    let result = match time::timeout(timeout, &mut search).await {
        Ok(result) => result,
        Err(_) => {
            warn!(">>> timeout after {}ms", timeout.as_millis());
            // a search that starts late clears the flag, so repeat the cancel
            loop {
                handle.cancel();
                if let Ok(result) = time::timeout(CANCEL_INTERVAL, &mut search).await {
                    break result;
                }
            }
        }
    };

    match result {
        Ok(thought) => {
            info!(">>> thought {}ms", start.elapsed().as_millis());
            thought
        }
        Err(e) => match e.try_into_panic() {
            Ok(payload) => panic::resume_unwind(payload),
            Err(e) => panic!("search task failed: {e}"),
        },
    }
}
