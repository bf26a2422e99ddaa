//! This crate contains implementations of the [`LpSolver`](sensornet_core::LpSolver) trait.
//! The types here bridge the flow formulations and backend LP solvers.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

pub mod minilp;

pub use crate::minilp::MinilpSolver;
