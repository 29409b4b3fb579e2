use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::leaf::LeafScorer;
use super::{Algorithm, Evaluator, GameState, Move, PathRecorder, Search, SearchConfig, LOSS, WIN};

/// Receives the principal variation after every completed search.
pub trait PlanListener<M> {
    fn on_move_list_generated(&mut self, plan: &VecDeque<M>);
}

impl<M, F: FnMut(&VecDeque<M>)> PlanListener<M> for F {
    fn on_move_list_generated(&mut self, plan: &VecDeque<M>) {
        self(plan)
    }
}

/// Listener that ignores all plans.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl<M> PlanListener<M> for Discard {
    fn on_move_list_generated(&mut self, _plan: &VecDeque<M>) {}
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    Completed,
    /// Stopped early, the plan is only a best effort.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// Score of the root from the point of view of the player on move.
    pub score: i64,
    pub status: SearchStatus,
    /// Explored moves, excluding the root.
    pub nodes: usize,
    pub evaluations: usize,
    pub eval_time: Duration,
    pub elapsed: Duration,
}

/// Progress of the engine, shared with [SearchHandle]s.
///
/// The flags are plain relaxed atomics. A cancel may take effect a few
/// recursive calls late, which the best-effort result tolerates.
#[derive(Debug)]
struct Monitor {
    cancelled: AtomicBool,
    thinking: AtomicBool,
    epoch: Instant,
    /// Start of the running search in ms since `epoch`.
    started: AtomicU64,
}

impl Monitor {
    fn new() -> Monitor {
        Monitor {
            cancelled: AtomicBool::new(false),
            thinking: AtomicBool::new(false),
            epoch: Instant::now(),
            started: AtomicU64::new(0),
        }
    }

    fn now(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Marks the engine as thinking until dropped, even if the search panics.
struct Thinking(Arc<Monitor>);

impl Thinking {
    fn begin(monitor: &Arc<Monitor>) -> Thinking {
        monitor.cancelled.store(false, Ordering::Relaxed);
        monitor.started.store(monitor.now(), Ordering::Relaxed);
        monitor.thinking.store(true, Ordering::Relaxed);
        Thinking(monitor.clone())
    }
}

impl Drop for Thinking {
    fn drop(&mut self) {
        self.0.thinking.store(false, Ordering::Relaxed);
    }
}

/// Cancels and observes a search from other threads.
#[derive(Debug, Clone)]
pub struct SearchHandle(Arc<Monitor>);

impl SearchHandle {
    /// Stops the running search as soon as possible.
    /// The search still finishes regularly with the best plan found so far.
    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::Relaxed);
        thread::yield_now();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::Relaxed)
    }

    pub fn is_thinking(&self) -> bool {
        self.0.thinking.load(Ordering::Relaxed)
    }

    /// Whole seconds the running search takes so far, 0 if idle.
    pub fn thinking_time_secs(&self) -> u64 {
        if !self.is_thinking() {
            return 0;
        }
        let started = self.0.started.load(Ordering::Relaxed);
        self.0.now().saturating_sub(started) / 1000
    }
}

/// Plans moves for the player on move with one of the tree search algorithms.
///
/// The computed principal variation is cached and consumed move by move.
/// It is reused as long as its next move belongs to the player on move.
pub struct SearchEngine<G: GameState, E, L> {
    config: SearchConfig,
    evaluator: E,
    listener: L,
    plan: VecDeque<G::Move>,
    path: PathRecorder<G::Move>,
    leaf: LeafScorer,
    monitor: Arc<Monitor>,
    nodes: usize,
}

impl<G: GameState, E, L> SearchEngine<G, E, L> {
    pub fn new(config: SearchConfig, evaluator: E, listener: L) -> Self {
        Self {
            config,
            evaluator,
            listener,
            plan: VecDeque::new(),
            path: PathRecorder::new(),
            leaf: LeafScorer::new(SmallRng::from_entropy()),
            monitor: Arc::new(Monitor::new()),
            nodes: 0,
        }
    }

    /// Uses a fixed seed for the tie break randomization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.leaf.reseed(seed);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn handle(&self) -> SearchHandle {
        SearchHandle(self.monitor.clone())
    }

    pub fn cancel(&self) {
        self.handle().cancel()
    }

    pub fn is_thinking(&self) -> bool {
        self.handle().is_thinking()
    }

    pub fn thinking_time_secs(&self) -> u64 {
        self.handle().thinking_time_secs()
    }

    /// Leaf evaluations of the last search.
    pub fn eval_count(&self) -> usize {
        self.leaf.evaluations
    }

    /// Time spent in the evaluator during the last search.
    pub fn eval_time_total_ms(&self) -> u64 {
        self.leaf.eval_time.as_millis() as u64
    }

    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// The remaining principal variation, next move first.
    pub fn plan(&self) -> &VecDeque<G::Move> {
        &self.plan
    }

    /// Takes the next move of the plan.
    pub fn next_move(&mut self) -> Option<G::Move> {
        self.plan.pop_front()
    }

    pub fn clear_plan(&mut self) {
        self.plan.clear();
    }
}

impl<G, E, L> SearchEngine<G, E, L>
where
    G: GameState,
    E: Evaluator<G>,
    L: PlanListener<G::Move>,
{
    /// Searches a new plan unless the cached one continues with a move of
    /// the player on move. Returns `None` if the cached plan is kept.
    pub fn build_moves_list(&mut self, state: &mut G) -> Option<SearchReport> {
        if let Some(next) = self.plan.front() {
            let player = next.player();
            assert!(
                player < state.player_count(),
                "move {next:?} is owned by unknown player {player}"
            );
            if player == state.turn() {
                debug!(">>> keep plan of {} moves", self.plan.len());
                return None;
            }
        }
        Some(self.force_rebuild_moves_list(state))
    }

    /// Drops the cached plan and searches a new one.
    ///
    /// # Panics
    /// If the position is terminal or a non-terminal position without legal
    /// moves is reached, unless the config provides a `zero_moves_value`.
    pub fn force_rebuild_moves_list(&mut self, state: &mut G) -> SearchReport {
        self.plan.clear();
        let thinking = Thinking::begin(&self.monitor);
        let start = Instant::now();

        self.leaf.reset(self.config.randomize_duplicates);
        let root = self.path.reset(state.root_move());
        let player = state.turn();
        assert!(
            player < state.player_count(),
            "invalid player {player} on move"
        );

        let (score, nodes) = if state.is_terminal() {
            match self.config.zero_moves_value {
                Some(value) => (value, 0),
                None => panic!("search started on a terminal position"),
            }
        } else {
            let mut search = Search {
                state,
                evaluator: &self.evaluator,
                path: &mut self.path,
                leaf: &mut self.leaf,
                cancelled: &self.monitor.cancelled,
                player,
                zero_moves_value: self.config.zero_moves_value,
                nodes: 0,
            };
            let depth = self.config.max_depth;
            let score = match self.config.algorithm {
                Algorithm::Minimax => search.minimax(root, depth, 0, true),
                Algorithm::MinimaxAlphaBeta => search.alphabeta(root, depth, 0, LOSS, WIN, true),
                Algorithm::Negamax => search.negamax(root, depth, 0, 1),
                Algorithm::NegamaxAlphaBeta => {
                    search.negamax_alphabeta(root, depth, 0, LOSS, WIN, 1)
                }
            };
            (score, search.nodes)
        };

        let status = if self.monitor.cancelled.load(Ordering::Relaxed) {
            warn!(">>> search cancelled after {nodes} nodes");
            SearchStatus::Cancelled
        } else {
            SearchStatus::Completed
        };

        self.nodes = nodes;
        self.plan = self.path.principal_variation();
        drop(thinking);

        let report = SearchReport {
            score,
            status,
            nodes,
            evaluations: self.leaf.evaluations,
            eval_time: self.leaf.eval_time,
            elapsed: start.elapsed(),
        };
        info!(
            ">>> {} {} {:?}ms {:?} score={} nodes={} evals={} plan={:?}",
            self.config.algorithm,
            self.config.max_depth,
            report.elapsed.as_millis(),
            report.status,
            report.score,
            report.nodes,
            report.evaluations,
            self.plan
        );

        self.listener.on_move_list_generated(&self.plan);
        report
    }
}
