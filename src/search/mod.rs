//! Exhaustive adversarial tree search.
//!
//! All variants share the same turn-aware depth accounting: a ply of the
//! depth budget is only consumed by moves that pass the turn to another
//! player. Moves after which the same player acts again keep the remaining
//! budget but still count towards the actual depth, which is used to prefer
//! faster wins and slower losses.

use std::fmt::{self, Debug};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

mod alphabeta;
mod engine;
pub use engine::*;
mod leaf;
mod minimax;
mod negamax;
mod path;
pub use path::*;

#[cfg(test)]
mod scripted;

/// Highest possible score, a win at depth zero.
pub const WIN: i64 = i64::MAX;
pub const DRAW: i64 = 0;
/// Lowest possible score. Evaluators return this if a position cannot be
/// evaluated meaningfully. It is the negation of [WIN] so that scores can
/// be negated without overflow.
pub const LOSS: i64 = -i64::MAX;

/// A transition of the searched game.
///
/// The ordering is only used to sort siblings before the negamax alpha-beta
/// search and has to be total and stable.
pub trait Move: Clone + Ord + Debug {
    /// Index of the player that makes this move.
    fn player(&self) -> usize;
}

/// Mutable game state that is threaded through the whole search.
///
/// Moves are applied and undone in strict stack order, so implementations
/// can keep a simple undo stack.
pub trait GameState {
    type Move: Move;

    /// The player to move.
    fn turn(&self) -> usize;

    fn player_count(&self) -> usize {
        2
    }

    /// All legal moves of the player to move in enumeration order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn apply_move(&mut self, m: Self::Move);

    /// Reverts the most recently applied move and returns it.
    fn undo_move(&mut self) -> Self::Move;

    fn winner(&self) -> Option<usize>;

    fn is_draw(&self) -> bool;

    fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_draw()
    }

    /// Synthetic move representing the current position as the search root.
    /// It is never applied.
    fn root_move(&self) -> Self::Move;
}

/// Scores positions at the search horizon.
pub trait Evaluator<G: GameState> {
    /// Evaluates `state`, reached by `node`, from the point of view of `player`.
    /// Returns [LOSS] if the position has no meaningful value.
    fn evaluate(&self, state: &G, node: &G::Move, player: usize) -> i64;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Minimax,
    MinimaxAlphaBeta,
    Negamax,
    #[default]
    NegamaxAlphaBeta,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Minimax => "minimax",
            Algorithm::MinimaxAlphaBeta => "minimax-alpha-beta",
            Algorithm::Negamax => "negamax",
            Algorithm::NegamaxAlphaBeta => "negamax-alpha-beta",
        })
    }
}

/// Configuration of the search engine.
/// It may be changed between searches but never during one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    /// Number of turn changes the search looks ahead.
    pub max_depth: usize,
    /// Randomize the order of equally scored leafs.
    pub randomize_duplicates: bool,
    /// Score of non-terminal positions without legal moves.
    /// If unset, reaching such a position is a contract violation.
    pub zero_moves_value: Option<i64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            max_depth: 4,
            randomize_duplicates: false,
            zero_moves_value: None,
        }
    }
}

impl FromStr for SearchConfig {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(s)
    }
}

impl fmt::Display for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// State of a single top-level search that is threaded through the recursion.
struct Search<'a, G: GameState, E> {
    state: &'a mut G,
    evaluator: &'a E,
    path: &'a mut PathRecorder<G::Move>,
    leaf: &'a mut leaf::LeafScorer,
    cancelled: &'a AtomicBool,
    /// The player to move at the root, scores are from their point of view.
    player: usize,
    zero_moves_value: Option<i64>,
    nodes: usize,
}

impl<G: GameState, E: Evaluator<G>> Search<'_, G, E> {
    fn cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn at_horizon(&self, depth: usize) -> bool {
        depth == 0 || self.state.is_terminal()
    }

    /// Applies `m` and allocates a node for it.
    /// Returns the node and whether the turn passed to another player.
    fn descend(&mut self, m: G::Move) -> (NodeId, bool) {
        let turn = self.state.turn();
        let node = self.path.alloc(m.clone());
        self.state.apply_move(m);
        self.nodes += 1;
        (node, self.state.turn() != turn)
    }

    fn ascend(&mut self) {
        self.state.undo_move();
    }

    /// Score of a non-terminal position without legal moves.
    fn dead_end(&self) -> i64 {
        match self.zero_moves_value {
            Some(value) => value,
            None => panic!(
                "no legal moves for player {} in a non-terminal position",
                self.state.turn()
            ),
        }
    }
}
