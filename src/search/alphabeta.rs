use super::{Evaluator, GameState, NodeId, Search, LOSS, WIN};

impl<G: GameState, E: Evaluator<G>> Search<'_, G, E> {
    /// Alpha-Beta tree search.
    ///
    /// @see https://en.wikipedia.org/wiki/Alpha%E2%80%93beta_pruning
    /// - The root player maximizes, all others minimize
    /// - Cutoff only if `alpha > beta`, so ties are always explored
    /// - Equally scored later children replace earlier ones
    pub(super) fn alphabeta(
        &mut self,
        node: NodeId,
        depth: usize,
        actual_depth: usize,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
    ) -> i64 {
        // cancelled: keep whatever the siblings produced
        if self.cancelled() {
            return 0;
        }
        if self.at_horizon(depth) {
            return self.leaf(node, actual_depth);
        }

        let moves = self.state.legal_moves();
        if moves.is_empty() {
            return self.dead_end();
        }

        if maximizing {
            let mut value = LOSS;
            let mut first = true;
            for m in moves {
                let (child, passed) = self.descend(m);
                let v = if passed {
                    self.alphabeta(child, depth - 1, actual_depth + 1, alpha, beta, false)
                } else {
                    self.alphabeta(child, depth, actual_depth + 1, alpha, beta, true)
                };
                self.ascend();

                if first || v >= value {
                    value = v;
                    self.path.record(node, child);
                    first = false;
                }
                alpha = alpha.max(value);
                if alpha > beta {
                    break;
                }
            }
            value
        } else {
            let mut value = WIN;
            let mut first = true;
            for m in moves {
                let (child, passed) = self.descend(m);
                let v = if passed {
                    self.alphabeta(child, depth - 1, actual_depth + 1, alpha, beta, true)
                } else {
                    self.alphabeta(child, depth, actual_depth + 1, alpha, beta, false)
                };
                self.ascend();

                if first || v <= value {
                    value = v;
                    self.path.record(node, child);
                    first = false;
                }
                beta = beta.min(value);
                if alpha > beta {
                    break;
                }
            }
            value
        }
    }
}

#[cfg(test)]
mod test {
    use crate::logging;
    use crate::search::scripted::{pv, searcher, Script};
    use crate::search::Algorithm;

    /// Root with a clearly best first move and a refuted second move.
    fn refutation() -> (Script, [usize; 3]) {
        let mut script = Script::new(0);
        let good = script.add(0, 1, 0);
        let _ = script.add(good, 0, 40);
        let reply = script.add(good, 0, 30);
        let bad = script.add(0, 1, 0);
        let _ = script.add(bad, 0, 10);
        for value in [50, 60, 70] {
            script.add(bad, 0, value);
        }
        (script, [good, reply, bad])
    }

    #[test]
    fn prunes_refuted_move() {
        logging();
        let (mut script, [good, reply, _]) = refutation();

        let mut plain = searcher(Algorithm::Minimax, 2);
        let full = plain.force_rebuild_moves_list(&mut script);

        let mut pruned = searcher(Algorithm::MinimaxAlphaBeta, 2);
        let report = pruned.force_rebuild_moves_list(&mut script);

        assert_eq!(report.score, full.score);
        assert_eq!(pv(pruned.plan()), vec![good, reply]);
        assert_eq!(pv(plain.plan()), vec![good, reply]);
        // the three replies after the refutation are skipped
        assert_eq!(report.nodes + 3, full.nodes);
        assert!(report.evaluations < full.evaluations);
    }

    #[test]
    fn ties_take_last_move() {
        let mut script = Script::new(0);
        let _a = script.add(0, 1, 5);
        let b = script.add(0, 1, 5);

        let mut engine = searcher(Algorithm::MinimaxAlphaBeta, 1);
        let report = engine.force_rebuild_moves_list(&mut script);
        assert_eq!(report.score, 5 - 1);
        assert_eq!(pv(engine.plan()), vec![b]);
    }

    #[test]
    fn same_player_keeps_window_side() {
        let mut script = Script::new(0);
        let a = script.add(0, 0, 0);
        let a1 = script.add(a, 1, 12);
        let _a2 = script.add(a, 1, 9);
        // scores 10 - 1, just below the continuation
        let _b = script.add(0, 1, 10);

        let mut engine = searcher(Algorithm::MinimaxAlphaBeta, 1);
        let report = engine.force_rebuild_moves_list(&mut script);
        assert_eq!(report.score, 12 - 2);
        assert_eq!(pv(engine.plan()), vec![a, a1]);
    }
}
