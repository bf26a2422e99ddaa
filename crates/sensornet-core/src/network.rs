pub(crate) mod topology;
pub(crate) mod types;

use petgraph::visit::Dfs;
use rand::prelude::*;

pub use topology::{AdjacencyGraph, Error as TopologyError};
pub use types::*;

use crate::{
    dimacs, flow,
    params::{NetworkParams, ParamsError},
    routing::{self, PathCostCache},
    solver::{LpSolver, SolveError},
    units::MicroJoules,
};

use self::topology::Topology;

/// Where a node sits and what it does. Placements are the persisted form of a network: the rest
/// of a node's state follows from the [`NetworkParams`].
#[derive(Debug, Clone, Copy, PartialEq, derive_new::new, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub kind: NodeKind,
    pub position: Point,
}

/// A sensor network: the nodes, their radio adjacency graph and the parameters they were built
/// from.
#[derive(Debug, Clone)]
pub struct Network {
    params: NetworkParams,
    topology: Topology,
    costs: PathCostCache,
}

impl Network {
    /// Generates a network by placing `params.nr_nodes` nodes uniformly at random. Exactly
    /// `params.nr_data_nodes` of them become data nodes.
    pub fn generate<R>(params: NetworkParams, mut rng: R) -> Result<Self, ParamsError>
    where
        R: Rng,
    {
        params.validate()?;
        let placements = random_placements(&params, &mut rng);
        Self::from_placements(params, &placements)
    }

    /// Generates networks until one is connected. Fails without retrying if the parameters can
    /// never yield enough storage, and fails once `max_attempts` networks have been rejected.
    pub fn generate_connected<R>(
        params: NetworkParams,
        mut rng: R,
        max_attempts: usize,
    ) -> Result<Self, GenerateError>
    where
        R: Rng,
    {
        params.validate()?;
        let supply = params
            .packets_per_node
            .saturating_mul(params.nr_data_nodes as u64);
        let storage = params
            .storage_capacity
            .saturating_mul(params.nr_storage_nodes() as u64);
        if supply > storage {
            return Err(GenerateError::Infeasible { supply, storage });
        }
        for attempt in 1..=max_attempts {
            let network = Self::generate(params.clone(), &mut rng)?;
            if network.is_connected() {
                log::info!("Generated a connected network after {attempt} attempt(s)");
                return Ok(network);
            }
            log::debug!("Attempt {attempt} produced a disconnected network");
        }
        log::warn!("No connected network found within {max_attempts} attempts");
        Err(GenerateError::Exhausted {
            attempts: max_attempts,
        })
    }

    /// Builds a network from an ordered list of placements. IDs and names are assigned in order.
    pub fn from_placements(
        params: NetworkParams,
        placements: &[Placement],
    ) -> Result<Self, ParamsError> {
        params.validate()?;
        if placements.len() != params.nr_nodes {
            return Err(ParamsError::PlacementCount {
                expected: params.nr_nodes,
                got: placements.len(),
            });
        }
        let nr_data = placements
            .iter()
            .filter(|p| p.kind == NodeKind::Data)
            .count();
        if nr_data != params.nr_data_nodes {
            return Err(ParamsError::DataPlacementCount {
                expected: params.nr_data_nodes,
                got: nr_data,
            });
        }
        let mut seq = NodeSequence::new();
        let nodes = placements
            .iter()
            .map(|&Placement { kind, position }| {
                let (id, name) = seq.next(kind);
                let range = params.transmission_range;
                let battery = params.battery_capacity;
                match kind {
                    NodeKind::Data => SensorNode::new_data(
                        id,
                        name,
                        position,
                        range,
                        battery,
                        params.packets_per_node,
                    ),
                    NodeKind::Storage => SensorNode::new_storage(
                        id,
                        name,
                        position,
                        range,
                        battery,
                        params.storage_capacity,
                    ),
                }
            })
            .collect::<Vec<_>>();
        // IDs come from a fresh sequence, so they are unique
        let topology = match Topology::new(nodes) {
            Ok(topology) => topology,
            Err(e) => unreachable!("sequential IDs collided: {e}"),
        };
        log::debug!(
            "Built network with {} nodes and {} links",
            topology.nodes.len(),
            topology.graph.edge_count()
        );
        Ok(Self {
            params,
            topology,
            costs: PathCostCache::default(),
        })
    }

    /// Get a reference to the network's parameters.
    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// The placements this network was built from, in node order.
    pub fn placements(&self) -> Vec<Placement> {
        self.nodes()
            .iter()
            .map(|n| Placement::new(n.kind(), n.position()))
            .collect()
    }

    /// All nodes, in creation order.
    pub fn nodes(&self) -> &[SensorNode] {
        &self.topology.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&SensorNode> {
        self.topology.node(id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&SensorNode> {
        self.nodes().iter().find(|n| n.name() == name)
    }

    /// IDs of the data nodes, in creation order.
    pub fn data_ids(&self) -> &[NodeId] {
        &self.topology.data
    }

    /// IDs of the storage nodes, in creation order.
    pub fn storage_ids(&self) -> &[NodeId] {
        &self.topology.storage
    }

    pub fn data_nodes(&self) -> impl Iterator<Item = &SensorNode> + '_ {
        self.nodes().iter().filter(|n| n.is_data())
    }

    pub fn storage_nodes(&self) -> impl Iterator<Item = &SensorNode> + '_ {
        self.nodes().iter().filter(|n| n.is_storage())
    }

    /// Nodes within radio range of `id`.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = &SensorNode> + '_ {
        self.topology.neighbors(id)
    }

    /// The adjacency graph, keyed by node ID.
    pub fn graph(&self) -> &AdjacencyGraph {
        &self.topology.graph
    }

    delegate::delegate! {
        to self.topology.graph {
            #[call(node_count)]
            pub fn nr_nodes(&self) -> usize;

            #[call(edge_count)]
            pub fn nr_edges(&self) -> usize;

            #[call(contains_edge)]
            pub fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool;
        }
    }

    /// Tests whether every node can reach every other node, directly or through relays. Networks
    /// with zero or one node are trivially connected.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.nodes().first() else {
            return true;
        };
        let g = &self.topology.graph;
        let mut dfs = Dfs::new(g, start.id());
        let mut nr_visited = 0;
        while dfs.next(g).is_some() {
            nr_visited += 1;
        }
        nr_visited == self.nodes().len()
    }

    /// Tests whether there is enough storage for all overflow packets. This ignores connectivity
    /// and energy, so it is necessary but not sufficient for an offload to exist.
    pub fn is_feasible(&self) -> bool {
        self.total_supply() <= self.total_storage()
    }

    /// The number of overflow packets over all data nodes, saturating at `u64::MAX`.
    pub fn total_supply(&self) -> u64 {
        self.data_nodes()
            .filter_map(|n| n.as_data())
            .fold(0, |acc, d| acc.saturating_add(d.overflow_packets()))
    }

    /// The storage capacity over all storage nodes, saturating at `u64::MAX`.
    pub fn total_storage(&self) -> u64 {
        self.storage_nodes()
            .filter_map(|n| n.as_storage())
            .fold(0, |acc, s| acc.saturating_add(s.capacity()))
    }

    /// The cheapest path from `from` to `to`, endpoints included. Empty if there is none.
    pub fn min_cost_path(&self, from: NodeId, to: NodeId) -> Vec<NodeId> {
        routing::min_cost_path(&self.topology, from, to)
    }

    /// The single-packet cost of walking `path`.
    pub fn cost_of_path(&self, path: &[NodeId]) -> MicroJoules {
        routing::cost_of_path(&self.topology, path)
    }

    /// The cost of the cheapest path from `from` to `to`, or `None` if `to` is unreachable.
    /// Results are cached until the network is reconfigured.
    pub fn min_cost(&self, from: NodeId, to: NodeId) -> Option<MicroJoules> {
        self.costs.get_or_compute(from, to, || {
            let path = self.min_cost_path(from, to);
            (!path.is_empty()).then(|| self.cost_of_path(&path))
        })
    }

    pub fn can_send_packets(&self, from: NodeId, to: NodeId, packets: u64) -> bool {
        let src = self.node(from).and_then(|n| n.as_data());
        let dst = self.node(to).and_then(|n| n.as_storage());
        match (src, dst) {
            (Some(src), Some(dst)) => src.can_remove_packets(packets) && dst.can_store(packets),
            _ => false,
        }
    }

    /// Moves `packets` packets from data node `from` to storage node `to`. Nothing changes if
    /// either side cannot take part.
    pub fn send_packets(
        &mut self,
        from: NodeId,
        to: NodeId,
        packets: u64,
    ) -> Result<(), SendError> {
        if !self.can_send_packets(from, to, packets) {
            let src = self.node(from).ok_or(SendError::UnknownNode(from))?;
            let dst = self.node(to).ok_or(SendError::UnknownNode(to))?;
            let src_state = src.as_data().ok_or_else(|| PacketError::WrongKind {
                node: src.name().to_owned(),
                expected: NodeKind::Data,
            })?;
            let dst_state = dst.as_storage().ok_or_else(|| PacketError::WrongKind {
                node: dst.name().to_owned(),
                expected: NodeKind::Storage,
            })?;
            return Err(SendError::Rejected {
                src: src.name().to_owned(),
                left: src_state.packets_left(),
                total: src_state.overflow_packets(),
                dst: dst.name().to_owned(),
                space_left: dst_state.space_left(),
                capacity: dst_state.capacity(),
                packets,
            });
        }
        self.node_mut(from)?.remove_packets(packets)?;
        self.node_mut(to)?.store_packets(packets)?;
        Ok(())
    }

    /// Restores every data node's packets and empties every storage node.
    pub fn reset_packets(&mut self) {
        self.topology.nodes.iter_mut().for_each(|n| n.reset_packets());
    }

    /// Recharges every node to its battery capacity.
    pub fn reset_energy(&mut self) {
        self.topology.nodes.iter_mut().for_each(|n| n.reset_energy());
    }

    pub fn set_overflow_packets(&mut self, packets: u64) {
        self.params.packets_per_node = packets;
        for node in &mut self.topology.nodes {
            node.set_overflow_packets(packets);
        }
        self.costs.clear();
    }

    pub fn set_storage_capacity(&mut self, capacity: u64) {
        self.params.storage_capacity = capacity;
        for node in &mut self.topology.nodes {
            node.set_capacity(capacity);
        }
        self.costs.clear();
    }

    pub fn set_battery_capacity(&mut self, capacity: MicroJoules) {
        self.params.battery_capacity = capacity;
        for node in &mut self.topology.nodes {
            node.set_battery_capacity(capacity);
        }
        self.costs.clear();
    }

    /// Tests whether every overflow packet can be offloaded within the storage and energy
    /// budgets, by maximizing the flow out of the source. The optimum must match the total
    /// supply up to [`FLOW_TOLERANCE`].
    pub fn is_max_flow_feasible<S>(&self, solver: S) -> Result<bool, SolveError>
    where
        S: LpSolver,
    {
        let lp = flow::feasibility_program(self);
        log::info!("Solving max-flow feasibility over {} variables", lp.nr_vars());
        let value = solver.solve(&lp).map_err(|e| {
            log::warn!("Max-flow feasibility failed: {e}");
            e
        })?;
        Ok((value - self.total_supply() as f64).abs() <= FLOW_TOLERANCE)
    }

    /// The minimum total energy needed to offload every overflow packet.
    pub fn min_cost_flow<S>(&self, solver: S) -> Result<MicroJoules, SolveError>
    where
        S: LpSolver,
    {
        let lp = flow::min_cost_program(self);
        log::info!("Solving min-cost flow over {} variables", lp.nr_vars());
        let value = solver.solve(&lp).map_err(|e| {
            log::warn!("Min-cost flow failed: {e}");
            e
        })?;
        Ok(MicroJoules::new(value.round().max(0.0) as u64))
    }

    /// Formats the network as a DIMACS min-cost flow problem.
    pub fn to_dimacs(&self) -> String {
        dimacs::write_min_cost_flow(self)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SensorNode, SendError> {
        self.topology.node_mut(id).ok_or(SendError::UnknownNode(id))
    }
}

// Each node is a data node with probability `remaining quota / remaining slots`. Once the slots
// left no longer exceed the quota left, every remaining node must be a data node.
fn random_placements<R: Rng>(params: &NetworkParams, rng: &mut R) -> Vec<Placement> {
    let mut quota = params.nr_data_nodes;
    (0..params.nr_nodes)
        .map(|index| {
            let x = rng.gen_range(0.0..params.width);
            let y = rng.gen_range(0.0..params.length);
            let slots = params.nr_nodes - index;
            let is_data =
                quota > 0 && (slots <= quota || rng.gen_bool(quota as f64 / slots as f64));
            let kind = if is_data {
                quota -= 1;
                NodeKind::Data
            } else {
                NodeKind::Storage
            };
            Placement::new(kind, Point::new(x, y))
        })
        .collect()
}

/// How far a solver's max-flow optimum may stray from the total supply and still count as a
/// full offload.
pub const FLOW_TOLERANCE: f64 = 1e-6;

/// Errors from generating a network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid network parameters")]
    InvalidParams(#[from] ParamsError),

    #[error("{supply} overflow packets cannot fit in {storage} packets of storage")]
    Infeasible { supply: u64, storage: u64 },

    #[error("no feasible topology found within {attempts} attempts")]
    Exhausted { attempts: usize },
}

/// Errors from sending packets between nodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("node {0} is not part of the network")]
    UnknownNode(NodeId),

    #[error(
        "cannot send {packets} packets from {src} ({left}/{total} packets left) -> \
         {dst} ({space_left}/{capacity} space left)"
    )]
    Rejected {
        src: String,
        left: u64,
        total: u64,
        dst: String,
        space_left: u64,
        capacity: u64,
        packets: u64,
    },

    #[error(transparent)]
    Packet(#[from] PacketError),
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;

    use super::*;
    use crate::testing;

    #[test]
    fn generation_meets_quota_exactly() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        for (n, p) in [(1, 0), (1, 1), (10, 0), (10, 3), (10, 10), (25, 24)] {
            let network = Network::generate(testing::params(n, p), &mut rng)?;
            assert_eq!(network.nodes().len(), n);
            assert_eq!(network.data_ids().len(), p);
            assert_eq!(network.storage_ids().len(), n - p);
        }
        Ok(())
    }

    #[test]
    fn generation_assigns_sequential_ids_and_names() -> anyhow::Result<()> {
        let network = Network::generate(testing::params(12, 5), StdRng::seed_from_u64(1))?;
        for (i, node) in network.nodes().iter().enumerate() {
            assert_eq!(node.id(), NodeId::new(i + 1));
        }
        for (i, node) in network.data_nodes().enumerate() {
            assert_eq!(node.name(), format!("DN{:02}", i + 1));
        }
        for (i, node) in network.storage_nodes().enumerate() {
            assert_eq!(node.name(), format!("SN{:02}", i + 1));
        }
        Ok(())
    }

    #[test]
    fn generation_stays_in_field() -> anyhow::Result<()> {
        let params = testing::params(50, 10);
        let network = Network::generate(params.clone(), StdRng::seed_from_u64(3))?;
        let in_field = |n: &SensorNode| {
            (0.0..params.width).contains(&n.x()) && (0.0..params.length).contains(&n.y())
        };
        assert!(network.nodes().iter().all(in_field));
        Ok(())
    }

    #[test]
    fn generation_rejects_bad_quota() {
        let res = Network::generate(testing::params(3, 4), StdRng::seed_from_u64(0));
        assert!(matches!(res, Err(ParamsError::QuotaExceedsNodes { .. })));
    }

    #[test]
    fn two_networks_do_not_share_counters() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let first = Network::generate(testing::params(4, 2), &mut rng)?;
        let second = Network::generate(testing::params(4, 2), &mut rng)?;
        assert_eq!(first.nodes()[0].id(), second.nodes()[0].id());
        assert_eq!(
            second.data_nodes().next().map(|n| n.name().to_owned()),
            Some("DN01".to_owned())
        );
        Ok(())
    }

    #[test]
    fn generate_connected_finds_dense_network() -> anyhow::Result<()> {
        let mut params = testing::params(8, 3);
        params.transmission_range = 200.0;
        let network = Network::generate_connected(params, StdRng::seed_from_u64(5), 10)?;
        assert!(network.is_connected());
        assert_eq!(network.nr_edges(), 8 * 7 / 2);
        Ok(())
    }

    #[test]
    fn generate_connected_gives_up() {
        let mut params = testing::params(20, 2);
        params.transmission_range = 1e-3;
        let res = Network::generate_connected(params, StdRng::seed_from_u64(5), 3);
        assert_eq!(res.unwrap_err(), GenerateError::Exhausted { attempts: 3 });
    }

    #[test]
    fn generate_connected_rejects_infeasible_params() {
        // 4 data nodes x 5 packets > 1 storage node x 4 packets
        let res = Network::generate_connected(testing::params(5, 4), StdRng::seed_from_u64(5), 3);
        assert_eq!(
            res.unwrap_err(),
            GenerateError::Infeasible {
                supply: 20,
                storage: 4
            }
        );
    }

    #[test]
    fn generate_connected_saturates_huge_totals() {
        let mut params = testing::params(3, 2);
        params.packets_per_node = u64::MAX / 2 + 1;
        let res = Network::generate_connected(params, StdRng::seed_from_u64(5), 3);
        assert_eq!(
            res.unwrap_err(),
            GenerateError::Infeasible {
                supply: u64::MAX,
                storage: 4
            }
        );
    }

    #[test]
    fn totals_saturate() {
        let mut network = testing::network(
            testing::RANGE,
            &[
                (NodeKind::Data, 0.0, 0.0),
                (NodeKind::Data, 5.0, 0.0),
                (NodeKind::Storage, 0.0, 5.0),
                (NodeKind::Storage, 5.0, 5.0),
            ],
        );
        network.set_overflow_packets(u64::MAX / 2 + 1);
        network.set_storage_capacity(u64::MAX);
        assert_eq!(network.total_supply(), u64::MAX);
        assert_eq!(network.total_storage(), u64::MAX);
        assert!(network.is_feasible());
    }

    #[test]
    fn from_placements_checks_counts() {
        let placements = testing::placements(&[(NodeKind::Data, 0.0, 0.0)]);
        let res = Network::from_placements(testing::params(2, 1), &placements);
        assert!(matches!(res, Err(ParamsError::PlacementCount { expected: 2, got: 1 })));
        let res = Network::from_placements(testing::params(1, 0), &placements);
        assert!(matches!(
            res,
            Err(ParamsError::DataPlacementCount { expected: 0, got: 1 })
        ));
    }

    #[test]
    fn single_node_is_connected() {
        let network = testing::network(testing::RANGE, &[(NodeKind::Storage, 1.0, 1.0)]);
        assert!(network.is_connected());
    }

    #[test]
    fn chain_is_connected_and_gap_is_not() {
        assert!(testing::chain_network().is_connected());
        let network = testing::network(
            testing::RANGE,
            &[
                (NodeKind::Data, 0.0, 0.0),
                (NodeKind::Storage, 10.0, 0.0),
                (NodeKind::Storage, 30.0, 0.0),
            ],
        );
        assert!(!network.is_connected());
    }

    #[test]
    fn feasibility_arithmetic() {
        let spread = |n: usize| (0..n).map(move |i| i as f64 * 5.0);
        // 2 data nodes x 5 packets <= 3 storage nodes x 4 packets
        let mut layout = spread(2).map(|x| (NodeKind::Data, x, 0.0)).collect::<Vec<_>>();
        layout.extend(spread(3).map(|x| (NodeKind::Storage, x, 10.0)));
        let mut network = testing::network(testing::RANGE, &layout);
        assert!(network.is_feasible());
        // 2 x 5 > 3 x 3
        network.set_storage_capacity(3);
        assert!(!network.is_feasible());

        // 2 x 5 > 1 x 4
        let mut layout = spread(2).map(|x| (NodeKind::Data, x, 0.0)).collect::<Vec<_>>();
        layout.push((NodeKind::Storage, 0.0, 10.0));
        assert!(!testing::network(testing::RANGE, &layout).is_feasible());
    }

    #[test]
    fn send_packets_moves_packets() -> anyhow::Result<()> {
        let mut network = testing::chain_network();
        let (dn, sn) = (NodeId::new(1), NodeId::new(2));
        network.send_packets(dn, sn, 3)?;
        assert_eq!(network.node(dn).map(|n| n.packets_left()), Some(2));
        assert_eq!(network.node(sn).map(|n| n.space_left()), Some(1));
        network.reset_packets();
        assert_eq!(network.node(dn).map(|n| n.packets_left()), Some(5));
        assert_eq!(network.node(sn).map(|n| n.space_left()), Some(4));
        Ok(())
    }

    #[test]
    fn send_packets_rejects_without_side_effects() -> anyhow::Result<()> {
        let mut network = testing::chain_network();
        let (dn, sn) = (NodeId::new(1), NodeId::new(2));
        let err = network.send_packets(dn, sn, 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot send 5 packets from DN01 (5/5 packets left) -> SN01 (4/4 space left)"
        );
        assert_eq!(network.node(dn).map(|n| n.packets_left()), Some(5));
        assert_eq!(network.node(sn).map(|n| n.space_left()), Some(4));

        assert!(matches!(
            network.send_packets(sn, dn, 1),
            Err(SendError::Packet(PacketError::WrongKind { .. }))
        ));
        assert_eq!(
            network.send_packets(dn, NodeId::new(9), 1),
            Err(SendError::UnknownNode(NodeId::new(9)))
        );
        Ok(())
    }

    #[test]
    fn reconfiguration_updates_nodes() {
        let mut network = testing::chain_network();
        network.set_overflow_packets(9);
        network.set_battery_capacity(MicroJoules::new(77));
        assert_eq!(network.params().packets_per_node, 9);
        assert_eq!(network.total_supply(), 9);
        assert!(network.nodes().iter().all(|n| n.energy() == MicroJoules::new(77)));
    }

    #[test]
    fn reset_energy_recharges_nodes() {
        let mut network = testing::chain_network();
        for node in &mut network.topology.nodes {
            node.energy = MicroJoules::new(100);
        }
        assert!(network.nodes().iter().all(|n| n.energy() == MicroJoules::new(100)));
        network.reset_energy();
        assert!(network.nodes().iter().all(|n| n.energy() == testing::BATTERY));
    }

    #[test]
    fn lookup_by_name() {
        let network = testing::chain_network();
        assert_eq!(network.node_by_name("SN02").map(|n| n.id()), Some(NodeId::new(3)));
        assert!(network.node_by_name("DN02").is_none());
        let neighbors = network.neighbors(NodeId::new(2)).map(|n| n.id()).collect::<Vec<_>>();
        assert_eq!(neighbors.len(), 2);
        assert!(network.is_adjacent(NodeId::new(1), NodeId::new(2)));
        assert!(!network.is_adjacent(NodeId::new(1), NodeId::new(3)));
    }

    #[test]
    fn path_cost_is_cached_until_reconfigured() {
        let mut network = testing::chain_network();
        let cost = network.min_cost(NodeId::new(1), NodeId::new(3));
        assert_eq!(cost, Some(MicroJoules::new(1344)));
        assert_eq!(network.min_cost(NodeId::new(1), NodeId::new(3)), cost);
        assert_eq!(network.costs.len(), 1);
        network.set_storage_capacity(2);
        assert_eq!(network.costs.len(), 0);
    }

    struct Fixed(Result<f64, SolveError>);

    impl LpSolver for Fixed {
        fn solve(&self, _: &flow::LinearProgram) -> Result<f64, SolveError> {
            self.0.clone()
        }
    }

    #[test]
    fn max_flow_feasibility_requires_full_supply() -> anyhow::Result<()> {
        let network = testing::chain_network();
        assert!(network.is_max_flow_feasible(Fixed(Ok(4.9999996)))?);
        assert!(network.is_max_flow_feasible(Fixed(Ok(5.0000004)))?);
        assert!(!network.is_max_flow_feasible(Fixed(Ok(4.6)))?);
        assert!(!network.is_max_flow_feasible(Fixed(Ok(4.999)))?);
        assert!(!network.is_max_flow_feasible(Fixed(Ok(4.0)))?);
        let solver = Fixed(Err(SolveError::Unbounded));
        assert_eq!(
            network.is_max_flow_feasible(&solver),
            Err(SolveError::Unbounded)
        );
        Ok(())
    }

    #[test]
    fn min_cost_flow_rounds_objective() -> anyhow::Result<()> {
        let network = testing::chain_network();
        assert_eq!(
            network.min_cost_flow(Fixed(Ok(4031.9999)))?,
            MicroJoules::new(4032)
        );
        assert_eq!(
            network.min_cost_flow(Fixed(Err(SolveError::Infeasible))),
            Err(SolveError::Infeasible)
        );
        Ok(())
    }
}
