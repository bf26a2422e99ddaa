//! Implementations of the [`LpSolver`](crate::core::LpSolver) trait.

pub use solver_impls::*;
