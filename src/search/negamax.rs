use super::{Evaluator, GameState, NodeId, Search, LOSS};

impl<G: GameState, E: Evaluator<G>> Search<'_, G, E> {
    /// Negamax tree search.
    ///
    /// `color` is `1` if the root player is on move and `-1` otherwise.
    /// It only flips if a move passes the turn.
    /// Ties keep the first best child.
    pub(super) fn negamax(
        &mut self,
        node: NodeId,
        depth: usize,
        actual_depth: usize,
        color: i64,
    ) -> i64 {
        // cancelled: keep whatever the siblings produced
        if self.cancelled() {
            return 0;
        }
        if self.at_horizon(depth) {
            return color * self.leaf(node, actual_depth);
        }

        let moves = self.state.legal_moves();
        if moves.is_empty() {
            return color * self.dead_end();
        }

        let mut value = LOSS;
        let mut first = true;
        for m in moves {
            let (child, passed) = self.descend(m);
            let v = if passed {
                -self.negamax(child, depth - 1, actual_depth + 1, -color)
            } else {
                self.negamax(child, depth, actual_depth + 1, color)
            };
            self.ascend();

            if first || v > value {
                value = v;
                self.path.record(node, child);
                first = false;
            }
        }
        value
    }

    /// Negamax with alpha-beta pruning.
    ///
    /// Siblings are sorted by their move order first.
    /// The window is negated and swapped only if the turn passes.
    pub(super) fn negamax_alphabeta(
        &mut self,
        node: NodeId,
        depth: usize,
        actual_depth: usize,
        mut alpha: i64,
        beta: i64,
        color: i64,
    ) -> i64 {
        if self.cancelled() {
            return 0;
        }
        if self.at_horizon(depth) {
            return color * self.leaf(node, actual_depth);
        }

        let mut moves = self.state.legal_moves();
        if moves.is_empty() {
            return color * self.dead_end();
        }
        moves.sort();

        let mut value = LOSS;
        let mut first = true;
        for m in moves {
            let (child, passed) = self.descend(m);
            let v = if passed {
                -self.negamax_alphabeta(
                    child,
                    depth - 1,
                    actual_depth + 1,
                    -beta,
                    -alpha,
                    -color,
                )
            } else {
                self.negamax_alphabeta(child, depth, actual_depth + 1, alpha, beta, color)
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
    }
}
