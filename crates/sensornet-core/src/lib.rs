#![warn(unreachable_pub, missing_debug_implementations)]

//! The core sensor network library. This crate builds [networks](Network) of data and storage
//! nodes, prices packet transfers with a radio energy model, and formulates the problem of
//! offloading overflow packets as a [min-cost flow instance](dimacs) or a
//! [linear program](flow) for an external [solver](LpSolver).

#[macro_use]
mod ident;

pub mod dimacs;
pub mod energy;
pub mod flow;
mod network;
mod params;
mod routing;
mod solver;
pub mod units;

#[cfg(test)]
pub(crate) mod testing;

pub use network::{
    AdjacencyGraph, DataState, GenerateError, Network, NodeId, NodeKind, PacketError, Placement,
    Point, Role, SendError, SensorNode, StorageState, TopologyError, FLOW_TOLERANCE,
};
pub use params::{NetworkParams, ParamsError};
pub use solver::{LpSolver, SolveError};
