//! Connection-point flow and export compliance
//!
//! The checker only sees forecasts and the dispatched schedule; it recomputes the
//! flow itself and audits it against the export limit.

pub mod compliance;
pub mod flow;

pub use compliance::{
    GridComplianceChecker, GridComplianceReport, GridPhysics, GridViolation, ViolationSeverity,
    DEFAULT_TOLERANCE_KW,
};
pub use flow::grid_flow_kw;
