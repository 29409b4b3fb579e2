use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{Evaluator, GameState, NodeId, Search, DRAW, LOSS, WIN};

/// Jittered scores are scaled by this factor before the noise is added.
const JITTER_SCALE: i64 = 100;

/// Leaf scoring state that outlives a single search:
/// the random source for tie breaking and the evaluation counters.
#[derive(Debug)]
pub(super) struct LeafScorer {
    rng: SmallRng,
    randomize: bool,
    pub evaluations: usize,
    pub eval_time: Duration,
}

impl LeafScorer {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            rng,
            randomize: false,
            evaluations: 0,
            eval_time: Duration::ZERO,
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Resets the counters at the start of a top-level search.
    pub fn reset(&mut self, randomize: bool) {
        self.randomize = randomize;
        self.evaluations = 0;
        self.eval_time = Duration::ZERO;
    }

    /// Spreads equal scores so that equally good moves are picked randomly.
    /// Scores near the bounds (terminal positions) and zero are kept as is.
    pub fn jitter(&mut self, score: i64) -> i64 {
        if !self.randomize || score == 0 || score <= LOSS / 1000 || score >= WIN / 1000 {
            return score;
        }
        let noise = self.rng.gen_range(0..JITTER_SCALE);
        if score < 0 {
            score * JITTER_SCALE - noise
        } else {
            score * JITTER_SCALE + noise
        }
    }
}

impl<G: GameState, E: Evaluator<G>> Search<'_, G, E> {
    /// Scores the current position from the root player's point of view.
    ///
    /// Terminal scores shrink with `actual_depth`, preferring faster wins and
    /// slower losses.
    pub(super) fn leaf(&mut self, node: NodeId, actual_depth: usize) -> i64 {
        let depth = actual_depth as i64;

        if let Some(winner) = self.state.winner() {
            return if winner == self.player {
                WIN - depth
            } else {
                LOSS + depth
            };
        }
        if self.state.is_draw() {
            return DRAW;
        }

        let start = Instant::now();
        let score = self
            .evaluator
            .evaluate(&*self.state, self.path.get(node), self.player)
            .max(LOSS);
        self.leaf.evaluations += 1;
        self.leaf.eval_time += start.elapsed();

        // no value, nothing to adjust
        if score == LOSS {
            return score;
        }
        let score = score.saturating_sub(depth).max(LOSS);
        self.leaf.jitter(score)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::search::scripted::{pv, searcher, Script};
    use crate::search::Algorithm;

    const ALGORITHMS: [Algorithm; 4] = [
        Algorithm::Minimax,
        Algorithm::MinimaxAlphaBeta,
        Algorithm::Negamax,
        Algorithm::NegamaxAlphaBeta,
    ];

    #[test]
    fn unvalued_leaf_is_not_depth_adjusted() {
        for algorithm in ALGORITHMS {
            let mut script = Script::new(0);
            let a = script.add(0, 0, 0);
            let _ = script.add(a, 1, LOSS);
            let mut engine = searcher(algorithm, 1);
            let report = engine.force_rebuild_moves_list(&mut script);
            // two plies deep, still exactly the sentinel
            assert_eq!(report.score, LOSS, "{algorithm}");
            assert_eq!(report.evaluations, 1, "{algorithm}");
        }
    }

    #[test]
    fn values_below_loss_are_clamped() {
        for algorithm in ALGORITHMS {
            let mut script = Script::new(0);
            let _ = script.add(0, 1, i64::MIN);
            let mut engine = searcher(algorithm, 1);
            let report = engine.force_rebuild_moves_list(&mut script);
            assert_eq!(report.score, LOSS, "{algorithm}");
        }
    }

    #[test]
    fn unvalued_leaf_ranks_last() {
        for algorithm in ALGORITHMS {
            let mut script = Script::new(0);
            let _ = script.add(0, 1, i64::MIN);
            let _ = script.add(0, 1, LOSS);
            let b = script.add(0, 1, -5);
            let mut engine = searcher(algorithm, 1);
            let report = engine.force_rebuild_moves_list(&mut script);
            assert_eq!(report.score, -5 - 1, "{algorithm}");
            assert_eq!(pv(engine.plan()), vec![b], "{algorithm}");
        }
    }

    #[test]
    fn unvalued_leaf_below_opponent_node() {
        // the child negates the sentinel to WIN and the root negates it back
        for algorithm in [Algorithm::Negamax, Algorithm::NegamaxAlphaBeta] {
            let mut script = Script::new(1);
            // value from player 0's view, player 1 gets -WIN
            let w = script.add(0, 0, WIN);
            let mut engine = searcher(algorithm, 1);
            let report = engine.force_rebuild_moves_list(&mut script);
            assert_eq!(report.score, LOSS, "{algorithm}");
            assert_eq!(pv(engine.plan()), vec![w], "{algorithm}");
        }
    }

    fn scorer(seed: u64) -> LeafScorer {
        let mut scorer = LeafScorer::new(SmallRng::seed_from_u64(seed));
        scorer.reset(true);
        scorer
    }

    #[test]
    fn jitter_keeps_sign_and_order() {
        let mut scorer = scorer(1);
        for _ in 0..200 {
            let v = scorer.jitter(7);
            assert!((700..800).contains(&v), "{v}");
            let v = scorer.jitter(-7);
            assert!((-799..=-700).contains(&v), "{v}");
            // a difference of one point is never overturned
            assert!(scorer.jitter(8) > scorer.jitter(7));
        }
    }

    #[test]
    fn jitter_skips_zero_and_bounds() {
        let mut scorer = scorer(2);
        assert_eq!(scorer.jitter(0), 0);
        assert_eq!(scorer.jitter(WIN - 3), WIN - 3);
        assert_eq!(scorer.jitter(LOSS + 3), LOSS + 3);
        assert_eq!(scorer.jitter(WIN / 1000), WIN / 1000);

        scorer.reset(false);
        assert_eq!(scorer.jitter(42), 42);
    }

    #[test]
    fn jitter_reproducible_with_seed() {
        let mut a = scorer(3);
        let mut b = scorer(3);
        let a: Vec<i64> = (1..20).map(|v| a.jitter(v)).collect();
        let b: Vec<i64> = (1..20).map(|v| b.jitter(v)).collect();
        assert_eq!(a, b);
    }
}
