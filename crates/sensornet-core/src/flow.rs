//! Linear programs over the node-split flow network.
//!
//! Every sensor node `v` is split into an inbound vertex `In(v)` and an outbound vertex `Out(v)`
//! joined by an internal edge. A synthetic source feeds the data nodes and a synthetic sink drains
//! the storage nodes. There is one flow variable per ordered vertex pair; pairs that are not edges
//! are pinned to zero by a single aggregate constraint.

use ndarray::Array2;
use rustc_hash::FxHashMap;

use crate::{
    energy,
    network::{Network, NodeId},
    units::MicroJoules,
};

/// A vertex of the node-split flow network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertex {
    Source,
    In(NodeId),
    Out(NodeId),
    Sink,
}

/// Maps vertices to a dense index space: the source is 0, `In(v)` is `pos(v) + 1`, `Out(v)` is
/// `pos(v) + 1 + N` and the sink is `2N + 1`, where `pos(v)` is the position of `v` in node order.
#[derive(Debug, Clone)]
pub struct VertexIndex {
    ids: Vec<NodeId>,
    pos: FxHashMap<NodeId, usize>,
}

impl VertexIndex {
    pub fn new(network: &Network) -> Self {
        let ids = network.nodes().iter().map(|n| n.id()).collect::<Vec<_>>();
        let pos = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self { ids, pos }
    }

    /// The number of vertices, `2N + 2`.
    pub fn len(&self) -> usize {
        2 * self.ids.len() + 2
    }

    /// Always false: the source and the sink are always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn index(&self, vertex: Vertex) -> Option<usize> {
        let n = self.ids.len();
        match vertex {
            Vertex::Source => Some(0),
            Vertex::In(id) => self.pos.get(&id).map(|&p| p + 1),
            Vertex::Out(id) => self.pos.get(&id).map(|&p| p + 1 + n),
            Vertex::Sink => Some(2 * n + 1),
        }
    }

    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        let n = self.ids.len();
        match index {
            0 => Some(Vertex::Source),
            i if i <= n => Some(Vertex::In(self.ids[i - 1])),
            i if i <= 2 * n => Some(Vertex::Out(self.ids[i - 1 - n])),
            i if i == 2 * n + 1 => Some(Vertex::Sink),
            _ => None,
        }
    }

    /// The variable for the flow from vertex `i` to vertex `j`.
    pub fn var(&self, i: usize, j: usize) -> usize {
        i * self.len() + j
    }

    /// The variable for the flow from `from` to `to`, if both vertices exist.
    pub fn edge_var(&self, from: Vertex, to: Vertex) -> Option<usize> {
        Some(self.var(self.index(from)?, self.index(to)?))
    }

    fn in_(&self, id: NodeId) -> usize {
        self.pos[&id] + 1
    }

    fn out(&self, id: NodeId) -> usize {
        self.pos[&id] + 1 + self.ids.len()
    }

    fn sink(&self) -> usize {
        2 * self.ids.len() + 1
    }
}

/// The cost of one unit of flow along a vertex pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeCost {
    Cost(MicroJoules),
    /// The pair is not an edge of the flow network.
    Disallowed,
}

impl EdgeCost {
    pub fn is_allowed(&self) -> bool {
        matches!(self, EdgeCost::Cost(_))
    }
}

/// Per-unit costs over every ordered vertex pair.
///
/// Source, sink and internal edges are free, `Out(u) -> In(v)` costs one hop from `u` to `v`, and
/// every other pair is [`EdgeCost::Disallowed`].
#[derive(Debug, Clone)]
pub struct CostMatrix {
    index: VertexIndex,
    inner: Array2<EdgeCost>,
}

impl CostMatrix {
    pub fn new(network: &Network) -> Self {
        let index = VertexIndex::new(network);
        let len = index.len();
        let mut inner = Array2::from_elem((len, len), EdgeCost::Disallowed);
        let free = EdgeCost::Cost(MicroJoules::ZERO);
        for node in network.nodes() {
            let id = node.id();
            inner[[index.in_(id), index.out(id)]] = free;
            if node.is_data() {
                inner[[0, index.in_(id)]] = free;
            } else {
                inner[[index.out(id), index.sink()]] = free;
            }
            for other in network.neighbors(id) {
                let cost = energy::hop_cost(node, other);
                inner[[index.out(id), index.in_(other.id())]] = EdgeCost::Cost(cost);
            }
        }
        Self { index, inner }
    }

    pub fn index(&self) -> &VertexIndex {
        &self.index
    }

    pub fn get(&self, from: Vertex, to: Vertex) -> EdgeCost {
        match (self.index.index(from), self.index.index(to)) {
            (Some(i), Some(j)) => self.inner[[i, j]],
            _ => EdgeCost::Disallowed,
        }
    }

    /// Iterates over `(from, to, cost)` by vertex index, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, EdgeCost)> + '_ {
        self.inner.indexed_iter().map(|((i, j), &c)| (i, j, c))
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// A sparse linear objective.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub sense: Sense,
    pub coeffs: Vec<(usize, f64)>,
}

/// A named ranged row `lower <= sum(coeff * var) <= upper`.
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct Constraint {
    pub name: String,
    pub coeffs: Vec<(usize, f64)>,
    pub lower: f64,
    pub upper: f64,
}

impl Constraint {
    fn equal(name: String, coeffs: Vec<(usize, f64)>, value: f64) -> Self {
        Self::new(name, coeffs, value, value)
    }

    fn at_most(name: String, coeffs: Vec<(usize, f64)>, value: f64) -> Self {
        Self::new(name, coeffs, f64::NEG_INFINITY, value)
    }

    /// The coefficient of `var` in this row, 0 if absent.
    pub fn coeff(&self, var: usize) -> f64 {
        self.coeffs
            .iter()
            .filter(|&&(v, _)| v == var)
            .map(|&(_, c)| c)
            .sum()
    }
}

/// A linear program whose variables are all bounded to `[0, +inf)`. When `integer` is set
/// every variable must also take an integral value.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    nr_vars: usize,
    integer: bool,
    objective: Objective,
    constraints: Vec<Constraint>,
}

impl LinearProgram {
    pub fn nr_vars(&self) -> usize {
        self.nr_vars
    }

    /// Packet counts are whole, so every program built here is integral. Solvers without
    /// integer support solve the relaxation.
    pub fn is_integer(&self) -> bool {
        self.integer
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }
}

/// Maximizes the flow leaving the source. The network can offload everything iff the optimum
/// equals the total supply.
pub fn feasibility_program(network: &Network) -> LinearProgram {
    let costs = CostMatrix::new(network);
    let idx = costs.index();
    let coeffs = network
        .data_ids()
        .iter()
        .map(|&d| (idx.var(0, idx.in_(d)), 1.0))
        .collect();
    let objective = Objective {
        sense: Sense::Maximize,
        coeffs,
    };
    build(network, &costs, objective, Constraint::at_most)
}

/// Minimizes the total energy of offloading every overflow packet.
pub fn min_cost_program(network: &Network) -> LinearProgram {
    let costs = CostMatrix::new(network);
    let coeffs = costs
        .iter()
        .filter_map(|(i, j, c)| match c {
            EdgeCost::Cost(c) => Some((costs.index().var(i, j), c.into_f64())),
            EdgeCost::Disallowed => None,
        })
        .collect();
    let objective = Objective {
        sense: Sense::Minimize,
        coeffs,
    };
    build(network, &costs, objective, Constraint::equal)
}

fn build(
    network: &Network,
    costs: &CostMatrix,
    objective: Objective,
    offload: fn(String, Vec<(usize, f64)>, f64) -> Constraint,
) -> LinearProgram {
    let idx = costs.index();
    let len = idx.len();
    let mut constraints = Vec::new();

    for dn in network.data_nodes() {
        let q = dn.as_data().map_or(0, |d| d.overflow_packets());
        let coeffs = vec![(idx.var(0, idx.in_(dn.id())), 1.0)];
        constraints.push(offload(format!("offload_{}", dn.id()), coeffs, q as f64));
    }
    for sn in network.storage_nodes() {
        let m = sn.as_storage().map_or(0, |s| s.capacity());
        let coeffs = vec![(idx.var(idx.out(sn.id()), idx.sink()), 1.0)];
        constraints.push(Constraint::at_most(
            format!("storage_{}", sn.id()),
            coeffs,
            m as f64,
        ));
    }
    for node in network.nodes() {
        let (in_v, out_v) = (idx.in_(node.id()), idx.out(node.id()));
        let inflow = (0..len).filter(|&w| w != out_v).map(|w| (idx.var(w, in_v), 1.0));
        let outflow = (0..len).filter(|&w| w != in_v).map(|w| (idx.var(out_v, w), -1.0));
        let role = if node.is_data() { "data" } else { "storage" };
        constraints.push(Constraint::equal(
            format!("conserve_{role}_{}", node.id()),
            inflow.chain(outflow).collect(),
            0.0,
        ));
    }
    let rx = energy::receiving_cost(1).into_f64();
    for v in network.nodes() {
        let (in_v, out_v) = (idx.in_(v.id()), idx.out(v.id()));
        let mut coeffs = Vec::new();
        for u in network.nodes().iter().filter(|u| u.id() != v.id()) {
            let (in_u, out_u) = (idx.in_(u.id()), idx.out(u.id()));
            let tx = energy::transmission_cost(v, u, 1).into_f64();
            coeffs.push((idx.var(in_u, in_v), rx));
            coeffs.push((idx.var(out_u, in_v), rx));
            coeffs.push((idx.var(out_v, in_u), tx));
            coeffs.push((idx.var(out_v, out_u), tx));
        }
        constraints.push(Constraint::at_most(
            format!("energy_{}", v.id()),
            coeffs,
            v.energy().into_f64(),
        ));
    }
    let disallowed = costs
        .iter()
        .filter(|(_, _, c)| !c.is_allowed())
        .map(|(i, j, _)| (idx.var(i, j), 1.0))
        .collect();
    constraints.push(Constraint::equal("no_edge".to_owned(), disallowed, 0.0));

    log::debug!(
        "Built {:?} program with {} variables and {} constraints",
        objective.sense,
        len * len,
        constraints.len()
    );
    LinearProgram {
        nr_vars: len * len,
        integer: true,
        objective,
        constraints,
    }
}
