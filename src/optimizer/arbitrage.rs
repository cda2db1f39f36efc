//! Arbitrage optimizer
//!
//! Solves the single-horizon battery dispatch LP and dresses the solution up with
//! financial, wear and grid-compliance figures.
//!
//! The formulation:
//! - Objective: minimise `Σ (price+wear)·dt·charge − (price−wear)·dt·discharge`
//! - SoC dynamics with one-way efficiency on each side
//! - Charge/discharge power limits, SoC within `[0, capacity]`
//! - Net export `solar − load + discharge − charge` capped by the connection limit
//!
//! The optimizer is synchronous and holds no mutable state; one instance can serve
//! concurrent requests from several threads.

use ordered_float::OrderedFloat;
use tracing::{debug, info, warn};

use super::{
    Constraints, LpProblemBuilder, LpSolver, OptimizationReport, OptimizationResult,
    OptimizerError, ScheduleExtractor, SolverError,
};
use crate::domain::{BatteryAsset, ConfigurationError, TimeSeriesInputs};
use crate::economics::{DegradationModel, FinancialEvaluator, FinancialSettings, WarrantyTerms};
use crate::optimizer::solvers::DefaultSolver;
use crate::power_flow::{grid_flow_kw, GridComplianceChecker, GridPhysics};

pub struct BatteryOptimizer {
    solver: Box<dyn LpSolver>,
    constraints: Constraints,
    degradation: DegradationModel,
    financial: FinancialEvaluator,
    checker: GridComplianceChecker,
    warranty: Option<WarrantyTerms>,
}

impl BatteryOptimizer {
    /// Optimizer backed by the default LP backend.
    pub fn new(constraints: Constraints) -> Result<Self, ConfigurationError> {
        Self::with_solver(Box::new(DefaultSolver::default()), constraints)
    }

    pub fn with_solver(
        solver: Box<dyn LpSolver>,
        constraints: Constraints,
    ) -> Result<Self, ConfigurationError> {
        constraints.validate()?;
        Ok(Self {
            solver,
            constraints,
            degradation: DegradationModel::new(constraints.degradation_cost_gbp_per_kwh)?,
            financial: FinancialEvaluator::default(),
            checker: GridComplianceChecker::new(
                constraints.grid_export_limit_kw,
                GridPhysics::default(),
            )?,
            warranty: None,
        })
    }

    pub fn with_financial_settings(
        mut self,
        settings: FinancialSettings,
    ) -> Result<Self, ConfigurationError> {
        self.financial = FinancialEvaluator::new(settings)?;
        Ok(self)
    }

    pub fn with_grid_physics(mut self, physics: GridPhysics) -> Result<Self, ConfigurationError> {
        self.checker = GridComplianceChecker::new(self.constraints.grid_export_limit_kw, physics)?;
        Ok(self)
    }

    pub fn with_warranty(mut self, terms: WarrantyTerms) -> Result<Self, ConfigurationError> {
        terms.validate()?;
        self.warranty = Some(terms);
        Ok(self)
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    /// Solve the dispatch problem and evaluate the resulting schedule.
    ///
    /// Fails before solving on invalid parameters, and with [`OptimizerError::Infeasible`]
    /// when no schedule can keep exports under the limit. Export violations found by the
    /// independent audit are returned inside the report, not as errors.
    pub fn optimize(
        &self,
        inputs: &TimeSeriesInputs,
        asset: &BatteryAsset,
    ) -> Result<OptimizationReport, OptimizerError> {
        let problem = LpProblemBuilder::new(inputs, asset, &self.constraints)?.build();

        let solution = self
            .solver
            .solve(&problem)
            .map_err(|err| self.classify_failure(err, inputs))?;
        debug!(
            solver = self.solver.name(),
            solve_time_ms = solution.solve_time_ms,
            objective = solution.objective,
            "LP solved"
        );

        let schedule = ScheduleExtractor::new(problem.layout).extract(&solution.values)?;
        let dt = inputs.dt_hours();

        let flows = grid_flow_kw(inputs, &schedule);
        let money = self.financial.evaluate(inputs, &schedule, &flows);
        let wear = self.degradation.assess(&schedule, asset, dt);
        let effective_profit_gbp =
            DegradationModel::effective_profit_gbp(money.net_profit_gbp, wear.degradation_cost_gbp);

        let soc_trajectory_pct = schedule.soc_percent(asset);
        let min_soc_pct = soc_trajectory_pct
            .iter()
            .copied()
            .map(OrderedFloat)
            .min()
            .map_or(asset.initial_soc_pct, |m| m.0);

        let simultaneous_intervals = schedule.simultaneous_intervals();
        if !simultaneous_intervals.is_empty() {
            warn!(
                intervals = simultaneous_intervals.len(),
                efficiency = asset.efficiency,
                degradation = self.constraints.degradation_cost_gbp_per_kwh,
                "schedule charges and discharges in the same interval"
            );
        }

        let compliance = self.checker.check(&flows, dt);
        let baseline = self.financial.baseline(inputs);
        let warranty = self.warranty.map(|terms| {
            terms.outlook(&schedule, asset, dt, self.financial.settings().days_per_year)
        });

        info!(
            intervals = inputs.len(),
            net_profit_gbp = money.net_profit_gbp,
            effective_profit_gbp,
            cycle_count = wear.cycle_count,
            compliant = compliance.compliant,
            "optimization complete"
        );

        let result = OptimizationResult {
            soc_trajectory_pct,
            grid_flow_kw: flows,
            revenue_gbp: money.revenue_gbp,
            cost_gbp: money.cost_gbp,
            net_profit_gbp: money.net_profit_gbp,
            degradation_cost_gbp: wear.degradation_cost_gbp,
            effective_profit_gbp,
            sharpe_ratio: money.sharpe_ratio,
            payback: self.financial.payback(effective_profit_gbp),
            cycle_count: wear.cycle_count,
            max_drawdown_pct: 100.0 - min_soc_pct,
            simultaneous_intervals,
            objective_gbp: solution.objective,
            solver: self.solver.name().to_string(),
            solver_status: solution.status(),
            solve_time_ms: solution.solve_time_ms,
            schedule,
        };

        Ok(OptimizationReport {
            result,
            compliance,
            baseline,
            warranty,
        })
    }

    fn classify_failure(&self, err: SolverError, inputs: &TimeSeriesInputs) -> OptimizerError {
        match err {
            SolverError::Infeasible => {
                let limit = self.constraints.grid_export_limit_kw;
                let over_limit_intervals: Vec<usize> = inputs
                    .net_site_kw()
                    .iter()
                    .enumerate()
                    .filter(|(_, &site)| site > limit)
                    .map(|(t, _)| t)
                    .collect();
                warn!(
                    over_limit = over_limit_intervals.len(),
                    limit_kw = limit,
                    "dispatch problem infeasible"
                );
                OptimizerError::Infeasible {
                    over_limit_intervals,
                }
            }
            SolverError::Unbounded => OptimizerError::Unbounded,
            SolverError::Backend(msg) => OptimizerError::Solver(msg),
        }
    }
}
