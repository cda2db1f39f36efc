use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

use super::LpProblem;

/// Terminal state reported by an LP backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
}

/// Optimal point returned by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpSolution {
    /// Values in [`super::VariableLayout`] order
    pub values: Vec<f64>,
    pub objective: f64,
    /// Wall-clock time spent inside the backend (ms)
    pub solve_time_ms: f64,
}

impl LpSolution {
    pub fn status(&self) -> SolverStatus {
        SolverStatus::Optimal
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("linear program is infeasible")]
    Infeasible,

    #[error("linear program is unbounded")]
    Unbounded,

    #[error("solver backend error: {0}")]
    Backend(String),
}

impl SolverError {
    pub fn status(&self) -> Option<SolverStatus> {
        match self {
            SolverError::Infeasible => Some(SolverStatus::Infeasible),
            SolverError::Unbounded => Some(SolverStatus::Unbounded),
            SolverError::Backend(_) => None,
        }
    }
}

/// Black-box LP backend. Implementations must be deterministic for identical problems.
#[cfg_attr(test, mockall::automock)]
pub trait LpSolver: Send + Sync {
    /// Short backend identifier used in logs and reports
    fn name(&self) -> &'static str;

    fn solve(&self, problem: &LpProblem) -> Result<LpSolution, SolverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(SolverStatus::Optimal.to_string(), "optimal");
        assert_eq!(SolverStatus::Infeasible.to_string(), "infeasible");
        assert_eq!(SolverStatus::Unbounded.to_string(), "unbounded");
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(SolverError::Infeasible.status(), Some(SolverStatus::Infeasible));
        assert_eq!(SolverError::Unbounded.status(), Some(SolverStatus::Unbounded));
        assert_eq!(SolverError::Backend("boom".into()).status(), None);
    }
}
