use super::{Evaluator, GameState, NodeId, Search, LOSS, WIN};

impl<G: GameState, E: Evaluator<G>> Search<'_, G, E> {
    /// Minimax tree search.
    ///
    /// The root player maximizes, all others minimize. `maximizing` only
    /// flips if a move passes the turn, consecutive moves of the same player
    /// stay on the same side and do not consume `depth`.
    ///
    /// Ties keep the first best child.
    pub(super) fn minimax(
        &mut self,
        node: NodeId,
        depth: usize,
        actual_depth: usize,
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

        let mut value = if maximizing { LOSS } else { WIN };
        let mut first = true;
        for m in moves {
            let (child, passed) = self.descend(m);
            let v = if passed {
                self.minimax(child, depth - 1, actual_depth + 1, !maximizing)
            } else {
                self.minimax(child, depth, actual_depth + 1, maximizing)
            };
            self.ascend();

            if first || (maximizing && v > value) || (!maximizing && v < value) {
                value = v;
                self.path.record(node, child);
                first = false;
            }
        }
        value
    }
}
