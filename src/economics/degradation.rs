use serde::{Deserialize, Serialize};

use crate::domain::error::{ensure_non_negative, ensure_positive};
use crate::domain::{BatteryAsset, ConfigurationError, Schedule};
use crate::optimizer::DEFAULT_DEGRADATION_COST_GBP_PER_KWH;

/// Linear wear model: every kWh discharged costs a fixed amount of battery life.
///
/// The same rate is charged inside the LP objective, so the figures produced here
/// restate the cost the optimizer already traded against; they never re-optimize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegradationModel {
    cost_gbp_per_kwh: f64,
}

impl Default for DegradationModel {
    fn default() -> Self {
        Self {
            cost_gbp_per_kwh: DEFAULT_DEGRADATION_COST_GBP_PER_KWH,
        }
    }
}

impl DegradationModel {
    pub fn new(cost_gbp_per_kwh: f64) -> Result<Self, ConfigurationError> {
        ensure_non_negative("degradation_cost_gbp_per_kwh", cost_gbp_per_kwh)?;
        Ok(Self { cost_gbp_per_kwh })
    }

    /// Derive the marginal rate from warranty economics for a given pack size.
    pub fn from_warranty(
        terms: &WarrantyTerms,
        capacity_kwh: f64,
    ) -> Result<Self, ConfigurationError> {
        terms.validate()?;
        ensure_positive("capacity_kwh", capacity_kwh)?;
        Self::new(terms.cost_per_cycle_gbp() / capacity_kwh)
    }

    pub fn cost_gbp_per_kwh(&self) -> f64 {
        self.cost_gbp_per_kwh
    }

    /// `rate * Σ discharge[t] * dt`
    pub fn cost_gbp(&self, schedule: &Schedule, dt_hours: f64) -> f64 {
        self.cost_gbp_per_kwh * schedule.discharged_kwh(dt_hours)
    }

    /// Equivalent full cycles. Only discharged energy counts toward wear.
    pub fn cycle_count(schedule: &Schedule, dt_hours: f64, capacity_kwh: f64) -> f64 {
        schedule.discharged_kwh(dt_hours) / capacity_kwh
    }

    pub fn effective_profit_gbp(net_profit_gbp: f64, degradation_cost_gbp: f64) -> f64 {
        net_profit_gbp - degradation_cost_gbp
    }

    pub fn assess(
        &self,
        schedule: &Schedule,
        asset: &BatteryAsset,
        dt_hours: f64,
    ) -> WearAssessment {
        WearAssessment {
            degradation_cost_gbp: self.cost_gbp(schedule, dt_hours),
            cycle_count: Self::cycle_count(schedule, dt_hours, asset.capacity_kwh),
            discharged_kwh: schedule.discharged_kwh(dt_hours),
        }
    }
}

/// Post-hoc wear figures for one schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WearAssessment {
    pub degradation_cost_gbp: f64,
    pub cycle_count: f64,
    pub discharged_kwh: f64,
}

/// Manufacturer warranty used to price battery wear.
///
/// Defaults follow a 13.5 kWh Powerwall-class unit: GBP 7000 replacement,
/// 70% capacity retained after 3650 cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarrantyTerms {
    pub replacement_cost_gbp: f64,
    pub capacity_retention_pct: f64,
    pub warranty_cycles: f64,
}

impl Default for WarrantyTerms {
    fn default() -> Self {
        Self {
            replacement_cost_gbp: 7000.0,
            capacity_retention_pct: 70.0,
            warranty_cycles: 3650.0,
        }
    }
}

impl WarrantyTerms {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_non_negative("replacement_cost_gbp", self.replacement_cost_gbp)?;
        ensure_positive("warranty_cycles", self.warranty_cycles)?;
        if !(0.0..=100.0).contains(&self.capacity_retention_pct) {
            return Err(ConfigurationError::OutOfRange {
                field: "capacity_retention_pct",
                value: self.capacity_retention_pct,
                range: "[0, 100]",
            });
        }
        Ok(())
    }

    /// Value lost per full cycle: `replacement_cost * capacity_loss / warranty_cycles`
    pub fn cost_per_cycle_gbp(&self) -> f64 {
        let loss_fraction = 1.0 - self.capacity_retention_pct / 100.0;
        self.replacement_cost_gbp * loss_fraction / self.warranty_cycles
    }

    /// Depth-of-discharge weighted wear: `Σ (discharge[t]*dt / capacity)² * cost_per_cycle`.
    ///
    /// Quadratic in depth, so deep intervals are penalised far more than shallow ones.
    /// Reported alongside the linear cost; the LP never sees it.
    pub fn depth_weighted_cost_gbp(
        &self,
        schedule: &Schedule,
        dt_hours: f64,
        capacity_kwh: f64,
    ) -> f64 {
        let cycle_equivalent: f64 = schedule
            .discharge_kw
            .iter()
            .map(|d| (d * dt_hours / capacity_kwh).powi(2))
            .sum();
        cycle_equivalent * self.cost_per_cycle_gbp()
    }

    /// Years until the warranted cycle count is used up at `cycles_per_day`.
    /// `None` when the battery is not cycled at all.
    pub fn years_to_exhaust(&self, cycles_per_day: f64, days_per_year: f64) -> Option<f64> {
        let annual_cycles = cycles_per_day * days_per_year;
        (annual_cycles > 0.0).then(|| self.warranty_cycles / annual_cycles)
    }

    pub fn outlook(
        &self,
        schedule: &Schedule,
        asset: &BatteryAsset,
        dt_hours: f64,
        days_per_year: f64,
    ) -> WarrantyOutlook {
        let cycles = DegradationModel::cycle_count(schedule, dt_hours, asset.capacity_kwh);
        WarrantyOutlook {
            cost_per_cycle_gbp: self.cost_per_cycle_gbp(),
            depth_weighted_cost_gbp: self.depth_weighted_cost_gbp(
                schedule,
                dt_hours,
                asset.capacity_kwh,
            ),
            annual_cycles: cycles * days_per_year,
            years_to_warranty_limit: self.years_to_exhaust(cycles, days_per_year),
        }
    }
}

/// Lifetime view of a daily schedule repeated for a year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarrantyOutlook {
    pub cost_per_cycle_gbp: f64,
    pub depth_weighted_cost_gbp: f64,
    pub annual_cycles: f64,
    pub years_to_warranty_limit: Option<f64>,
}
