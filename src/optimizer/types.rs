use serde::{Deserialize, Serialize};

use super::SolverStatus;
use crate::domain::Schedule;
use crate::economics::{BaselineSummary, Payback, WarrantyOutlook};
use crate::power_flow::GridComplianceReport;

/// Solved schedule with its financial and wear metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub schedule: Schedule,
    /// SoC over the horizon in percent of capacity (N+1 points)
    pub soc_trajectory_pct: Vec<f64>,
    /// Net connection-point flow, positive = export (kW)
    pub grid_flow_kw: Vec<f64>,

    // Financial metrics
    pub revenue_gbp: f64,
    pub cost_gbp: f64,
    pub net_profit_gbp: f64,
    pub degradation_cost_gbp: f64,
    pub effective_profit_gbp: f64,
    pub sharpe_ratio: f64,
    pub payback: Payback,

    // Battery usage
    pub cycle_count: f64,
    /// Deepest depletion over the horizon: `100 - min SoC%`
    pub max_drawdown_pct: f64,
    /// Intervals where the LP charges and discharges at once
    pub simultaneous_intervals: Vec<usize>,

    // Solver info
    pub objective_gbp: f64,
    pub solver: String,
    pub solver_status: SolverStatus,
    pub solve_time_ms: f64,
}

/// Everything returned to the caller for one optimization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub result: OptimizationResult,
    pub compliance: GridComplianceReport,
    /// Same site without a battery
    pub baseline: BaselineSummary,
    /// Present when warranty terms are configured
    pub warranty: Option<WarrantyOutlook>,
}
