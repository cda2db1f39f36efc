use std::time::Instant;

use good_lp::constraint::{eq, leq};
use good_lp::solvers::clarabel::clarabel;
use good_lp::{variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable};

use crate::optimizer::{LinearRow, LpProblem, LpSolution, LpSolver, SolverError};

/// Interior-point backend via good_lp.
///
/// Values are accurate to the solver tolerance (~1e-8), so bounds may be
/// overshot by that amount.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClarabelSolver;

impl LpSolver for ClarabelSolver {
    fn name(&self) -> &'static str {
        "clarabel"
    }

    fn solve(&self, problem: &LpProblem) -> Result<LpSolution, SolverError> {
        let started = Instant::now();

        let mut vars = variables!();
        let xs: Vec<Variable> = problem
            .bounds
            .iter()
            .map(|&(lo, hi)| vars.add(variable().min(lo).max(hi)))
            .collect();

        let objective: Expression = problem
            .objective
            .iter()
            .zip(&xs)
            .map(|(&cost, &x)| x * cost)
            .sum();

        let mut model = vars.minimise(objective).using(clarabel);
        for row in &problem.equalities {
            model = model.with(eq(row_expression(&xs, row), row.rhs));
        }
        for row in &problem.inequalities {
            model = model.with(leq(row_expression(&xs, row), row.rhs));
        }

        let solution = model.solve().map_err(|err| match err {
            ResolutionError::Infeasible => SolverError::Infeasible,
            ResolutionError::Unbounded => SolverError::Unbounded,
            other => SolverError::Backend(other.to_string()),
        })?;

        let values: Vec<f64> = xs.iter().map(|&x| solution.value(x)).collect();
        Ok(LpSolution {
            objective: problem.objective_value(&values),
            values,
            solve_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

fn row_expression(xs: &[Variable], row: &LinearRow) -> Expression {
    row.terms.iter().map(|&(col, coeff)| xs[col] * coeff).sum()
}
