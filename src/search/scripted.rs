//! Explicit game trees for testing the search variants.

use std::collections::{HashSet, VecDeque};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{Algorithm, Evaluator, GameState, Move, SearchConfig, SearchEngine};
use crate::search::Discard;

#[derive(Debug, Clone, Default)]
struct ScriptNode {
    turn: usize,
    /// Static value from player 0's point of view.
    value: i64,
    winner: Option<usize>,
    draw: bool,
    children: Vec<usize>,
}

/// Moves to node `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Step {
    pub to: usize,
    pub player: usize,
}

impl Move for Step {
    fn player(&self) -> usize {
        self.player
    }
}

/// A game given as an explicit tree. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct Script {
    nodes: Vec<ScriptNode>,
    history: Vec<Step>,
    pub applied: usize,
}

impl Script {
    pub fn new(turn: usize) -> Script {
        Script {
            nodes: vec![ScriptNode {
                turn,
                ..Default::default()
            }],
            history: Vec::new(),
            applied: 0,
        }
    }

    fn push(&mut self, parent: usize, node: ScriptNode) -> usize {
        self.nodes.push(node);
        let id = self.nodes.len() - 1;
        self.nodes[parent].children.push(id);
        id
    }

    /// Adds a child where `turn` is on move.
    pub fn add(&mut self, parent: usize, turn: usize, value: i64) -> usize {
        self.push(
            parent,
            ScriptNode {
                turn,
                value,
                ..Default::default()
            },
        )
    }

    pub fn win(&mut self, parent: usize, turn: usize, winner: usize) -> usize {
        self.push(
            parent,
            ScriptNode {
                turn,
                winner: Some(winner),
                ..Default::default()
            },
        )
    }

    pub fn draw(&mut self, parent: usize, turn: usize) -> usize {
        self.push(
            parent,
            ScriptNode {
                turn,
                draw: true,
                ..Default::default()
            },
        )
    }

    /// Random two player tree where every leaf is exactly `depth` turn
    /// changes away from the root and all leaf values are distinct.
    pub fn random(seed: u64, depth: usize, branching: usize) -> Script {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut script = Script::new(0);
        let mut used = HashSet::new();
        script.grow(&mut rng, &mut used, 0, depth, 0, branching, 2 * depth + 2);
        script
    }

    #[allow(clippy::too_many_arguments)]
    fn grow(
        &mut self,
        rng: &mut SmallRng,
        used: &mut HashSet<i64>,
        parent: usize,
        changes_left: usize,
        actual: usize,
        branching: usize,
        max_actual: usize,
    ) {
        let turn = self.nodes[parent].turn;
        for _ in 0..branching {
            let passes = actual + 1 >= max_actual || rng.gen_bool(0.7);
            let child_turn = if passes { 1 - turn } else { turn };
            let value = loop {
                // spaced apart so depth adjustments never collide
                let v = rng.gen_range(-10_000..10_000) * 1000;
                if used.insert(v) {
                    break v;
                }
            };
            let child = self.add(parent, child_turn, value);
            let left = changes_left - passes as usize;
            if left > 0 {
                self.grow(rng, used, child, left, actual + 1, branching, max_actual);
            }
        }
    }

    /// The node the game is currently at.
    pub fn current(&self) -> usize {
        self.history.last().map(|s| s.to).unwrap_or(0)
    }

    fn node(&self) -> &ScriptNode {
        &self.nodes[self.current()]
    }
}

impl GameState for Script {
    type Move = Step;

    fn turn(&self) -> usize {
        self.node().turn
    }

    fn legal_moves(&self) -> Vec<Step> {
        let player = self.turn();
        self.node()
            .children
            .iter()
            .map(|&to| Step { to, player })
            .collect()
    }

    fn apply_move(&mut self, m: Step) {
        assert!(self.node().children.contains(&m.to), "illegal {m:?}");
        self.applied += 1;
        self.history.push(m);
    }

    fn undo_move(&mut self) -> Step {
        self.history.pop().expect("nothing to undo")
    }

    fn winner(&self) -> Option<usize> {
        self.node().winner
    }

    fn is_draw(&self) -> bool {
        self.node().draw
    }

    fn root_move(&self) -> Step {
        Step {
            to: 0,
            player: self.nodes[0].turn,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptEval;

impl Evaluator<Script> for ScriptEval {
    fn evaluate(&self, state: &Script, node: &Step, player: usize) -> i64 {
        assert_eq!(node.to, state.current());
        let value = state.node().value;
        if player == 0 {
            value
        } else {
            -value
        }
    }
}

pub fn searcher(
    algorithm: Algorithm,
    max_depth: usize,
) -> SearchEngine<Script, ScriptEval, Discard> {
    let config = SearchConfig {
        algorithm,
        max_depth,
        ..Default::default()
    };
    SearchEngine::new(config, ScriptEval, Discard)
}

/// Node ids of a plan.
pub fn pv(plan: &VecDeque<Step>) -> Vec<usize> {
    plan.iter().map(|s| s.to).collect()
}
