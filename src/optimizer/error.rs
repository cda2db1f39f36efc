use thiserror::Error;

use crate::domain::ConfigurationError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// No schedule satisfies the bounds, dynamics and export limit together.
    /// `over_limit_intervals` lists where `solar - load` alone exceeds the limit.
    #[error(
        "optimization problem is infeasible ({} interval(s) exceed the export limit before battery action)",
        over_limit_intervals.len()
    )]
    Infeasible { over_limit_intervals: Vec<usize> },

    #[error("optimization problem is unbounded")]
    Unbounded,

    #[error("solver failure: {0}")]
    Solver(String),
}
