//! Independent grid export audit
//!
//! Re-derives the connection-point flow from the raw forecasts and the dispatched
//! schedule and compares it against the export limit. Nothing here trusts solver
//! internals; a violation is data in the report, never an error.

use chrono::NaiveTime;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::grid_flow_kw;
use crate::domain::error::{ensure_non_negative, ensure_positive};
use crate::domain::{ConfigurationError, Schedule, TimeSeriesInputs};

/// Numerical slack allowed above the export limit (kW)
pub const DEFAULT_TOLERANCE_KW: f64 = 1e-6;

/// LV feeder and statutory parameters used for the voltage-rise estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPhysics {
    /// Service cable / LV feeder resistance (ohm)
    pub line_resistance_ohm: f64,
    /// UK single-phase nominal voltage (V)
    pub nominal_voltage_v: f64,
    /// Statutory voltage-rise ceiling (% of nominal)
    pub voltage_rise_limit_pct: f64,
    pub tolerance_kw: f64,
    /// Excess above which a violation is critical rather than a warning (kW)
    pub critical_excess_kw: f64,
    /// Fraction of the limit counted as "at limit"
    pub near_limit_fraction: f64,
}

impl Default for GridPhysics {
    fn default() -> Self {
        Self {
            line_resistance_ohm: 0.075,
            nominal_voltage_v: 230.0,
            voltage_rise_limit_pct: 10.0,
            tolerance_kw: DEFAULT_TOLERANCE_KW,
            critical_excess_kw: 0.5,
            near_limit_fraction: 0.95,
        }
    }
}

impl GridPhysics {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_non_negative("line_resistance_ohm", self.line_resistance_ohm)?;
        ensure_positive("nominal_voltage_v", self.nominal_voltage_v)?;
        ensure_positive("voltage_rise_limit_pct", self.voltage_rise_limit_pct)?;
        ensure_non_negative("tolerance_kw", self.tolerance_kw)?;
        ensure_non_negative("critical_excess_kw", self.critical_excess_kw)?;
        ensure_positive("near_limit_fraction", self.near_limit_fraction)?;
        Ok(())
    }

    /// Voltage rise across the feeder for an export of `export_kw` (V).
    ///
    /// `I = P / V_nom`, `ΔV = I * R`. Imports (negative flow) produce no rise.
    pub fn voltage_rise_v(&self, export_kw: f64) -> f64 {
        export_kw.max(0.0) * 1000.0 * self.line_resistance_ohm / self.nominal_voltage_v
    }

    pub fn voltage_rise_pct(&self, export_kw: f64) -> f64 {
        self.voltage_rise_v(export_kw) / self.nominal_voltage_v * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViolationSeverity {
    Warning,
    Critical,
}

/// One interval where the export limit is exceeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridViolation {
    pub interval: usize,
    /// Interval start as `HH:MM` from the beginning of the horizon
    pub time_label: String,
    pub net_export_kw: f64,
    pub limit_kw: f64,
    pub excess_kw: f64,
    pub voltage_rise_pct: f64,
    pub severity: ViolationSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridComplianceReport {
    pub violation_count: usize,
    /// Largest export over the horizon, 0 when the site only imports (kW)
    pub max_export_kw: f64,
    pub max_voltage_rise_v: f64,
    pub max_voltage_rise_pct: f64,
    /// `max_export / limit`; above 1.0 means the limit was exceeded
    pub peak_grid_stress: f64,
    /// Intervals exporting above `near_limit_fraction` of the limit
    pub times_at_limit: usize,
    /// No export violations and voltage rise below the statutory ceiling
    pub compliant: bool,
    pub violations: Vec<GridViolation>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridComplianceChecker {
    grid_export_limit_kw: f64,
    physics: GridPhysics,
}

impl GridComplianceChecker {
    pub fn new(
        grid_export_limit_kw: f64,
        physics: GridPhysics,
    ) -> Result<Self, ConfigurationError> {
        ensure_non_negative("grid_export_limit_kw", grid_export_limit_kw)?;
        physics.validate()?;
        Ok(Self {
            grid_export_limit_kw,
            physics,
        })
    }

    pub fn grid_export_limit_kw(&self) -> f64 {
        self.grid_export_limit_kw
    }

    pub fn physics(&self) -> &GridPhysics {
        &self.physics
    }

    /// Audit a schedule against the raw forecasts.
    pub fn check_schedule(
        &self,
        inputs: &TimeSeriesInputs,
        schedule: &Schedule,
    ) -> GridComplianceReport {
        self.check(&grid_flow_kw(inputs, schedule), inputs.dt_hours())
    }

    /// Audit a precomputed flow series (positive = export).
    pub fn check(&self, grid_flow_kw: &[f64], dt_hours: f64) -> GridComplianceReport {
        let limit = self.grid_export_limit_kw;
        let physics = &self.physics;

        let violations: Vec<GridViolation> = grid_flow_kw
            .iter()
            .enumerate()
            .filter(|(_, &flow)| flow > limit + physics.tolerance_kw)
            .map(|(t, &flow)| {
                let excess_kw = flow - limit;
                GridViolation {
                    interval: t,
                    time_label: time_label(t, dt_hours),
                    net_export_kw: flow,
                    limit_kw: limit,
                    excess_kw,
                    voltage_rise_pct: physics.voltage_rise_pct(flow),
                    severity: if excess_kw > physics.critical_excess_kw {
                        ViolationSeverity::Critical
                    } else {
                        ViolationSeverity::Warning
                    },
                }
            })
            .collect();

        let max_export_kw = grid_flow_kw
            .iter()
            .copied()
            .map(OrderedFloat)
            .max()
            .map_or(0.0, |m| m.0.max(0.0));

        let max_voltage_rise_v = physics.voltage_rise_v(max_export_kw);
        let max_voltage_rise_pct = physics.voltage_rise_pct(max_export_kw);

        let peak_grid_stress = if limit > 0.0 {
            max_export_kw / limit
        } else if max_export_kw > physics.tolerance_kw {
            f64::INFINITY
        } else {
            0.0
        };

        let near_limit = limit * physics.near_limit_fraction;
        let times_at_limit = grid_flow_kw
            .iter()
            .filter(|&&flow| flow > 0.0 && flow > near_limit)
            .count();

        let compliant =
            violations.is_empty() && max_voltage_rise_pct < physics.voltage_rise_limit_pct;

        if !violations.is_empty() {
            tracing::warn!(
                violations = violations.len(),
                max_export_kw,
                limit_kw = limit,
                "grid export limit exceeded"
            );
        }

        GridComplianceReport {
            violation_count: violations.len(),
            max_export_kw,
            max_voltage_rise_v,
            max_voltage_rise_pct,
            peak_grid_stress,
            times_at_limit,
            compliant,
            violations,
        }
    }

    /// Export that would have to be curtailed per interval to respect the limit (kW).
    pub fn curtailment_required(&self, unconstrained_export_kw: &[f64]) -> Vec<f64> {
        unconstrained_export_kw
            .iter()
            .map(|&flow| (flow - self.grid_export_limit_kw).max(0.0))
            .collect()
    }
}

fn time_label(interval: usize, dt_hours: f64) -> String {
    let seconds = (interval as f64 * dt_hours * 3600.0).round() as u32 % 86_400;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}
