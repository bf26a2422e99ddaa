//! A pure-Rust simplex backend.

use ::minilp::{
    ComparisonOp, Error as MinilpError, LinearExpr, OptimizationDirection, Problem, Variable,
};
use rustc_hash::{FxHashMap, FxHashSet};
use sensornet_core::{
    flow::{Constraint, LinearProgram, Sense},
    LpSolver, SolveError,
};

/// Solves the LP relaxation with [`minilp`](::minilp).
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct MinilpSolver {
    /// Drop variables that a row pins to zero before handing the program to the solver. An `= 0`
    /// row whose coefficients are all positive forces each of its variables to zero, so the row
    /// and its variables can be removed without changing the optimum.
    #[builder(default = true)]
    presolve: bool,
}

impl Default for MinilpSolver {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LpSolver for MinilpSolver {
    fn solve(&self, lp: &LinearProgram) -> Result<f64, SolveError> {
        if lp.is_integer() {
            log::debug!("minilp has no integer variables, solving the relaxation");
        }
        let pinned = if self.presolve {
            pinned_rows(lp)
        } else {
            FxHashSet::default()
        };
        let fixed = pinned
            .iter()
            .flat_map(|&row| lp.constraints()[row].coeffs.iter().map(|&(v, _)| v))
            .collect::<FxHashSet<_>>();

        let direction = match lp.objective().sense {
            Sense::Maximize => OptimizationDirection::Maximize,
            Sense::Minimize => OptimizationDirection::Minimize,
        };
        let mut objective = FxHashMap::default();
        for &(var, coeff) in &lp.objective().coeffs {
            *objective.entry(var).or_insert(0.0) += coeff;
        }

        let mut problem = Problem::new(direction);
        let mut vars = FxHashMap::default();
        for var in (0..lp.nr_vars()).filter(|v| !fixed.contains(v)) {
            let coeff = objective.get(&var).copied().unwrap_or(0.0);
            vars.insert(var, problem.add_var(coeff, (0.0, f64::INFINITY)));
        }
        let mut nr_rows = 0;
        for (i, row) in lp.constraints().iter().enumerate() {
            if pinned.contains(&i) {
                continue;
            }
            if expr(row, &vars).is_none() {
                // Every term is fixed at zero
                if row.lower > 0.0 || row.upper < 0.0 {
                    log::debug!("Row {} cannot hold with its variables at zero", row.name);
                    return Err(SolveError::Infeasible);
                }
                continue;
            }
            nr_rows += add_row(&mut problem, row, &vars);
        }
        log::debug!(
            "minilp: {} of {} variables, {} rows ({} pinned rows dropped)",
            vars.len(),
            lp.nr_vars(),
            nr_rows,
            pinned.len()
        );

        match problem.solve() {
            Ok(solution) => Ok(solution.objective()),
            Err(MinilpError::Infeasible) => Err(SolveError::Infeasible),
            Err(MinilpError::Unbounded) => Err(SolveError::Unbounded),
        }
    }
}

// Indices of `= 0` rows with only positive coefficients
fn pinned_rows(lp: &LinearProgram) -> FxHashSet<usize> {
    lp.constraints()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.lower == 0.0 && c.upper == 0.0 && c.coeffs.iter().all(|&(_, a)| a > 0.0))
        .map(|(i, _)| i)
        .collect()
}

// The row's terms over the variables kept in the problem, or `None` if there are none
fn expr(row: &Constraint, vars: &FxHashMap<usize, Variable>) -> Option<LinearExpr> {
    let mut expr = LinearExpr::empty();
    let mut is_empty = true;
    for &(var, coeff) in &row.coeffs {
        if let Some(&v) = vars.get(&var) {
            expr.add(v, coeff);
            is_empty = false;
        }
    }
    (!is_empty).then_some(expr)
}

// Adds a ranged row as one or two one-sided rows and returns how many were added
fn add_row(problem: &mut Problem, row: &Constraint, vars: &FxHashMap<usize, Variable>) -> usize {
    let mut add = |op, rhs| {
        if let Some(expr) = expr(row, vars) {
            problem.add_constraint(expr, op, rhs);
        }
    };
    match (row.lower.is_finite(), row.upper.is_finite()) {
        (true, true) if row.lower == row.upper => {
            add(ComparisonOp::Eq, row.upper);
            1
        }
        (true, true) => {
            add(ComparisonOp::Ge, row.lower);
            add(ComparisonOp::Le, row.upper);
            2
        }
        (true, false) => {
            add(ComparisonOp::Ge, row.lower);
            1
        }
        (false, true) => {
            add(ComparisonOp::Le, row.upper);
            1
        }
        (false, false) => 0,
    }
}
