//! This module defines the interface between the flow formulations and an LP backend.

use crate::flow::LinearProgram;

/// An LP backend. Implementations return the optimal objective value, or a [`SolveError`] if no
/// optimum exists.
pub trait LpSolver {
    fn solve(&self, lp: &LinearProgram) -> Result<f64, SolveError>;
}

impl<S: LpSolver + ?Sized> LpSolver for &S {
    fn solve(&self, lp: &LinearProgram) -> Result<f64, SolveError> {
        (**self).solve(lp)
    }
}

/// Non-optimal solver outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("the linear program is infeasible")]
    Infeasible,

    #[error("the linear program is unbounded")]
    Unbounded,

    #[error("solver backend failed: {0}")]
    Backend(String),
}
