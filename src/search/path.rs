use std::collections::VecDeque;

/// Identifies a move explored during one top-level search.
///
/// Ids are handed out in exploration order, so two equal moves at different
/// positions of the tree never share an id. Children always have larger ids
/// than their parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// Records the best continuation of every explored move.
#[derive(Debug, Clone)]
pub struct PathRecorder<M> {
    moves: Vec<M>,
    best: Vec<Option<NodeId>>,
}

impl<M> Default for PathRecorder<M> {
    fn default() -> Self {
        Self {
            moves: Vec::new(),
            best: Vec::new(),
        }
    }
}

impl<M: Clone> PathRecorder<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all recorded nodes and starts a new tree at `root`.
    pub fn reset(&mut self, root: M) -> NodeId {
        self.moves.clear();
        self.best.clear();
        let root_id = self.alloc(root);
        debug_assert_eq!(root_id, NodeId::ROOT);
        root_id
    }

    pub fn alloc(&mut self, m: M) -> NodeId {
        self.moves.push(m);
        self.best.push(None);
        NodeId(self.moves.len() - 1)
    }

    /// Marks `child` as the best continuation of `node`.
    pub fn record(&mut self, node: NodeId, child: NodeId) {
        debug_assert!(node < child);
        self.best[node.0] = Some(child);
    }

    pub fn best(&self, node: NodeId) -> Option<NodeId> {
        self.best.get(node.0).copied().flatten()
    }

    pub fn get(&self, node: NodeId) -> &M {
        &self.moves[node.0]
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Follows the best continuations from the root.
    /// The root move itself is not part of the result.
    pub fn principal_variation(&self) -> VecDeque<M> {
        let mut pv = VecDeque::new();
        let mut node = NodeId::ROOT;
        while let Some(next) = self.best(node) {
            pv.push_back(self.get(next).clone());
            node = next;
        }
        pv
    }
}
