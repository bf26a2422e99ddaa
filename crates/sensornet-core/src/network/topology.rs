use petgraph::graphmap::UnGraphMap;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::network::types::{NodeId, NodeKind, SensorNode};

/// The radio adjacency graph. Nodes are keyed by their IDs.
pub type AdjacencyGraph = UnGraphMap<NodeId, ()>;

#[derive(Debug, Clone)]
pub(crate) struct Topology {
    pub(crate) nodes: Vec<SensorNode>,
    pub(crate) data: Vec<NodeId>,
    pub(crate) storage: Vec<NodeId>,
    pub(crate) graph: AdjacencyGraph,
    id2idx: FxHashMap<NodeId, usize>,
}

impl Topology {
    /// Creates a network topology from an ordered list of nodes. The adjacency graph is derived
    /// from the nodes' positions and transmission ranges.
    ///
    /// Correctness properties:
    ///
    /// - Every node must have a unique ID.
    /// - Adjacency is symmetric and irreflexive.
    /// - Every node appears in the graph, even if it has no neighbors.
    pub(crate) fn new(nodes: Vec<SensorNode>) -> Result<Self, Error> {
        let mut id2idx = FxHashMap::default();
        let mut graph = AdjacencyGraph::with_capacity(nodes.len(), 0);
        let (mut data, mut storage) = (Vec::new(), Vec::new());
        for (idx, node) in nodes.iter().enumerate() {
            // CORRECTNESS: Every node must have a unique ID.
            if id2idx.insert(node.id, idx).is_some() {
                return Err(Error::DuplicateNodeId(node.id));
            }
            graph.add_node(node.id);
            match node.kind() {
                NodeKind::Data => data.push(node.id),
                NodeKind::Storage => storage.push(node.id),
            }
        }
        for (a, b) in adjacent_pairs(&nodes) {
            graph.add_edge(a, b, ());
        }
        Ok(Self {
            nodes,
            data,
            storage,
            graph,
            id2idx,
        })
    }

    pub(crate) fn idx_of(&self, id: NodeId) -> Option<usize> {
        self.id2idx.get(&id).copied()
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&SensorNode> {
        self.idx_of(id).map(|idx| &self.nodes[idx])
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut SensorNode> {
        self.idx_of(id).map(move |idx| &mut self.nodes[idx])
    }

    /// Nodes adjacent to `id`, in the order their links were discovered.
    pub(crate) fn neighbors(&self, id: NodeId) -> impl Iterator<Item = &SensorNode> + '_ {
        self.graph.neighbors(id).filter_map(|n| self.node(n))
    }
}

/// Evaluates every unordered pair once. Pairs are independent, so rows are tested in parallel;
/// the result is ordered by `(i, j)` regardless of scheduling.
fn adjacent_pairs(nodes: &[SensorNode]) -> Vec<(NodeId, NodeId)> {
    (0..nodes.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let a = &nodes[i];
            nodes[i + 1..]
                .iter()
                .filter(move |b| a.in_range_of(b))
                .map(move |b| (a.id, b.id))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Duplicate node ID {0}")]
    DuplicateNodeId(NodeId),
}
