//! Standard-form LP assembly for the arbitrage problem
//!
//! Decision vector layout (3N+1 columns):
//! - `charge[t]`    at `t`        (kW drawn from the grid into the battery)
//! - `discharge[t]` at `N + t`    (kW delivered by the battery)
//! - `soc[t]`       at `2N + t`   (kWh stored at the start of interval t, t = 0..=N)
//!
//! Rows:
//! - N equalities: `soc[t+1] - soc[t] - eff*dt*charge[t] + dt/eff*discharge[t] = 0`
//! - N inequalities: `discharge[t] - charge[t] <= limit - (solar[t] - load[t])`
//!
//! `soc[0]` is pinned through its bounds instead of an extra equality row.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::Constraints;
use crate::domain::{BatteryAsset, ConfigurationError, TimeSeriesInputs};

/// Column indexing for the 3N+1 decision variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableLayout {
    intervals: usize,
}

impl VariableLayout {
    pub fn new(intervals: usize) -> Self {
        Self { intervals }
    }

    pub fn intervals(&self) -> usize {
        self.intervals
    }

    pub fn len(&self) -> usize {
        3 * self.intervals + 1
    }

    pub fn is_empty(&self) -> bool {
        self.intervals == 0
    }

    pub fn charge(&self, t: usize) -> usize {
        t
    }

    pub fn discharge(&self, t: usize) -> usize {
        self.intervals + t
    }

    pub fn soc(&self, t: usize) -> usize {
        2 * self.intervals + t
    }

    pub fn charge_range(&self) -> Range<usize> {
        0..self.intervals
    }

    pub fn discharge_range(&self) -> Range<usize> {
        self.intervals..2 * self.intervals
    }

    pub fn soc_range(&self) -> Range<usize> {
        2 * self.intervals..self.len()
    }
}

/// Sparse linear row `Σ coeff * x[col]` compared against `rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRow {
    pub terms: Vec<(usize, f64)>,
    pub rhs: f64,
}

impl LinearRow {
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.terms.iter().map(|&(col, coeff)| coeff * x[col]).sum()
    }
}

/// Backend-neutral minimisation problem.
///
/// `equalities` hold `row == rhs`, `inequalities` hold `row <= rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpProblem {
    pub layout: VariableLayout,
    pub objective: Vec<f64>,
    pub bounds: Vec<(f64, f64)>,
    pub equalities: Vec<LinearRow>,
    pub inequalities: Vec<LinearRow>,
}

impl LpProblem {
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Largest absolute constraint or bound violation of `x`. Zero for a feasible point.
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        let eq = self
            .equalities
            .iter()
            .map(|row| (row.evaluate(x) - row.rhs).abs());
        let ineq = self
            .inequalities
            .iter()
            .map(|row| (row.evaluate(x) - row.rhs).max(0.0));
        let bounds = self
            .bounds
            .iter()
            .zip(x)
            .map(|(&(lo, hi), &v)| (lo - v).max(v - hi).max(0.0));
        eq.chain(ineq).chain(bounds).fold(0.0, f64::max)
    }
}

/// Translates forecasts, battery parameters and market constraints into an [`LpProblem`].
#[derive(Debug, Clone, Copy)]
pub struct LpProblemBuilder<'a> {
    inputs: &'a TimeSeriesInputs,
    asset: &'a BatteryAsset,
    constraints: &'a Constraints,
}

impl<'a> LpProblemBuilder<'a> {
    /// Validate parameters up front so that `build` cannot fail.
    pub fn new(
        inputs: &'a TimeSeriesInputs,
        asset: &'a BatteryAsset,
        constraints: &'a Constraints,
    ) -> Result<Self, ConfigurationError> {
        inputs.validate()?;
        asset.validate()?;
        constraints.validate()?;
        Ok(Self {
            inputs,
            asset,
            constraints,
        })
    }

    pub fn build(&self) -> LpProblem {
        let n = self.inputs.len();
        let layout = VariableLayout::new(n);
        let dt = self.inputs.dt_hours();
        let eff = self.asset.efficiency;
        let wear = self.constraints.degradation_cost_gbp_per_kwh;
        let prices = self.inputs.price_gbp_per_kwh();

        let mut objective = vec![0.0; layout.len()];
        for (t, &price) in prices.iter().enumerate() {
            // Charging pays the price plus wear; discharging earns the price minus wear.
            objective[layout.charge(t)] = (price + wear) * dt;
            objective[layout.discharge(t)] = -(price - wear) * dt;
        }

        let mut bounds = Vec::with_capacity(layout.len());
        bounds.extend(layout.charge_range().map(|_| (0.0, self.asset.power_kw)));
        bounds.extend(layout.discharge_range().map(|_| (0.0, self.asset.power_kw)));
        let soc0 = self.asset.initial_soc_kwh();
        bounds.push((soc0, soc0));
        bounds.extend((1..=n).map(|_| (0.0, self.asset.capacity_kwh)));

        let equalities = (0..n)
            .map(|t| LinearRow {
                terms: vec![
                    (layout.soc(t + 1), 1.0),
                    (layout.soc(t), -1.0),
                    (layout.charge(t), -eff * dt),
                    (layout.discharge(t), dt / eff),
                ],
                rhs: 0.0,
            })
            .collect();

        let limit = self.constraints.grid_export_limit_kw;
        let inequalities = self
            .inputs
            .net_site_kw()
            .into_iter()
            .enumerate()
            .map(|(t, site_kw)| LinearRow {
                terms: vec![(layout.discharge(t), 1.0), (layout.charge(t), -1.0)],
                rhs: limit - site_kw,
            })
            .collect();

        tracing::debug!(
            intervals = n,
            variables = layout.len(),
            dt_hours = dt,
            "assembled arbitrage LP"
        );

        LpProblem {
            layout,
            objective,
            bounds,
            equalities,
            inequalities,
        }
    }
}
