use std::time::Instant;

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};

use crate::optimizer::{LinearRow, LpProblem, LpSolution, LpSolver, SolverError};

/// Dual simplex backend. Vertex solutions make repeated solves bit-identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinilpSolver;

impl LpSolver for MinilpSolver {
    fn name(&self) -> &'static str {
        "minilp"
    }

    fn solve(&self, problem: &LpProblem) -> Result<LpSolution, SolverError> {
        let started = Instant::now();

        let mut lp = Problem::new(OptimizationDirection::Minimize);
        let vars: Vec<Variable> = problem
            .objective
            .iter()
            .zip(&problem.bounds)
            .map(|(&cost, &bounds)| lp.add_var(cost, bounds))
            .collect();

        for row in &problem.equalities {
            lp.add_constraint(linear_expr(&vars, row), ComparisonOp::Eq, row.rhs);
        }
        for row in &problem.inequalities {
            lp.add_constraint(linear_expr(&vars, row), ComparisonOp::Le, row.rhs);
        }

        let solution = lp.solve().map_err(map_error)?;
        let values: Vec<f64> = vars.iter().map(|&v| solution[v]).collect();
        let objective = solution.objective();

        // minilp can finish an unbounded ray with inf/NaN instead of an error.
        if !objective.is_finite() || values.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::Unbounded);
        }

        Ok(LpSolution {
            objective,
            values,
            solve_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

fn linear_expr(vars: &[Variable], row: &LinearRow) -> LinearExpr {
    let mut expr = LinearExpr::empty();
    for &(col, coeff) in &row.terms {
        expr.add(vars[col], coeff);
    }
    expr
}

#[allow(unreachable_patterns)]
fn map_error(err: minilp::Error) -> SolverError {
    match err {
        minilp::Error::Infeasible => SolverError::Infeasible,
        minilp::Error::Unbounded => SolverError::Unbounded,
        other => SolverError::Backend(other.to_string()),
    }
}
