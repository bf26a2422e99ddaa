//! Minimum-cost paths between sensor nodes.
//!
//! Every hop costs one packet's transmission at the sender plus one packet's reception at the
//! receiver. Paths are found with a lazy-deletion Dijkstra search.

use std::{cmp::Reverse, collections::BinaryHeap, hash::BuildHasherDefault};

use dashmap::DashMap;
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHasher};

use crate::{
    energy,
    network::{topology::Topology, types::NodeId},
    units::MicroJoules,
};

// Ordered by cumulative cost, then node ID, then predecessor (`None` first)
type Entry = Reverse<(MicroJoules, NodeId, Option<NodeId>)>;

/// Finds the cheapest path from `source` to `target`, both included. Returns an empty path if
/// either endpoint is unknown or `target` is unreachable.
///
/// Ties between equal cumulative costs go to the smaller node ID, and for the same node to the
/// smaller predecessor ID, so results do not depend on neighbor order.
pub(crate) fn min_cost_path(topology: &Topology, source: NodeId, target: NodeId) -> Vec<NodeId> {
    if topology.node(source).is_none() || topology.node(target).is_none() {
        return Vec::new();
    }
    let mut settled: FxHashMap<NodeId, Option<NodeId>> = FxHashMap::default();
    let mut heap: BinaryHeap<Entry> = BinaryHeap::new();
    heap.push(Reverse((MicroJoules::ZERO, source, None)));
    while let Some(Reverse((cost, id, pred))) = heap.pop() {
        if settled.contains_key(&id) {
            continue;
        }
        settled.insert(id, pred);
        if id == target {
            return walk_back(&settled, target);
        }
        let Some(node) = topology.node(id) else {
            continue;
        };
        for next in topology.neighbors(id) {
            if !settled.contains_key(&next.id()) {
                let hop = energy::hop_cost(node, next);
                heap.push(Reverse((cost + hop, next.id(), Some(id))));
            }
        }
    }
    Vec::new()
}

fn walk_back(settled: &FxHashMap<NodeId, Option<NodeId>>, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut cur = target;
    while let Some(&Some(pred)) = settled.get(&cur) {
        path.push(pred);
        cur = pred;
    }
    path.reverse();
    path
}

/// Sums the hop costs along `path`. Paths with fewer than two nodes cost nothing, and so do hops
/// from or to a node that is not in the topology.
pub(crate) fn cost_of_path(topology: &Topology, path: &[NodeId]) -> MicroJoules {
    path.iter()
        .tuple_windows()
        .filter_map(|(&a, &b)| Some(energy::hop_cost(topology.node(a)?, topology.node(b)?)))
        .sum()
}

/// Memoized pair costs, shared across worker threads.
#[derive(Debug, Clone, Default)]
pub(crate) struct PathCostCache {
    inner: DashMap<(NodeId, NodeId), Option<MicroJoules>, BuildHasherDefault<FxHasher>>,
}

impl PathCostCache {
    pub(crate) fn get_or_compute<F>(&self, from: NodeId, to: NodeId, f: F) -> Option<MicroJoules>
    where
        F: FnOnce() -> Option<MicroJoules>,
    {
        if let Some(cost) = self.inner.get(&(from, to)) {
            return *cost;
        }
        let cost = f();
        self.inner.insert((from, to), cost);
        cost
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }

    pub(crate) fn clear(&self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NodeKind;
    use crate::testing;

    fn ids(ids: &[usize]) -> Vec<NodeId> {
        ids.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn chain_path_and_cost() {
        let network = testing::chain_network();
        let path = network.min_cost_path(NodeId::new(1), NodeId::new(3));
        assert_eq!(path, ids(&[1, 2, 3]));
        // Each 10m hop costs 352 to send and 320 to receive
        assert_eq!(network.cost_of_path(&path), MicroJoules::new(2 * 672));
    }

    #[test]
    fn direct_edge_beats_relay() {
        let layout = [
            (NodeKind::Data, 0.0, 0.0),
            (NodeKind::Storage, 8.0, 6.0),
            (NodeKind::Storage, 16.0, 0.0),
        ];
        // Out of range of each other, A and C relay through B
        let relayed = testing::network(10.0, &layout);
        let path = relayed.min_cost_path(NodeId::new(1), NodeId::new(3));
        assert_eq!(path, ids(&[1, 2, 3]));
        assert_eq!(relayed.cost_of_path(&path), MicroJoules::new(1344));

        // One 16m hop costs 320 + 82 + 320, less than two 10m hops
        let direct = testing::network(16.0, &layout);
        let path = direct.min_cost_path(NodeId::new(1), NodeId::new(3));
        assert_eq!(path, ids(&[1, 3]));
        assert_eq!(direct.cost_of_path(&path), MicroJoules::new(722));
    }

    #[test]
    fn unreachable_target_gives_empty_path() {
        let network = testing::network(
            10.0,
            &[(NodeKind::Data, 0.0, 0.0), (NodeKind::Storage, 50.0, 0.0)],
        );
        assert!(network.min_cost_path(NodeId::new(1), NodeId::new(2)).is_empty());
        assert!(network.min_cost_path(NodeId::new(1), NodeId::new(7)).is_empty());
        assert_eq!(network.min_cost(NodeId::new(1), NodeId::new(2)), None);
    }

    #[test]
    fn trivial_paths() {
        let network = testing::chain_network();
        let path = network.min_cost_path(NodeId::new(2), NodeId::new(2));
        assert_eq!(path, ids(&[2]));
        assert_eq!(network.cost_of_path(&path), MicroJoules::ZERO);
        assert_eq!(network.cost_of_path(&[]), MicroJoules::ZERO);
    }

    #[test]
    fn ties_go_to_smaller_ids() {
        // A square: 1 and 4 are opposite corners, 2 and 3 are equally good relays
        let network = testing::network(
            10.0,
            &[
                (NodeKind::Data, 0.0, 0.0),
                (NodeKind::Storage, 10.0, 0.0),
                (NodeKind::Storage, 0.0, 10.0),
                (NodeKind::Storage, 10.0, 10.0),
            ],
        );
        for _ in 0..10 {
            let path = network.min_cost_path(NodeId::new(1), NodeId::new(4));
            assert_eq!(path, ids(&[1, 2, 4]));
        }
    }
}
