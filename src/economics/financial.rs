use itertools::izip;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::domain::error::{ensure_non_negative, ensure_positive};
use crate::domain::{ConfigurationError, Schedule, TimeSeriesInputs};

/// Standard deviation below this is treated as a flat P&L series
const FLAT_PNL_STD_DEV: f64 = 1e-12;

/// Annual effective profit at or below this is solver noise, not a return (GBP)
pub const MIN_ANNUAL_PROFIT_GBP: f64 = 1e-9;

/// Parameters that are not part of the optimization but shape its financial reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSettings {
    /// Installed cost of the battery system (GBP)
    pub battery_install_cost_gbp: f64,
    /// Export tariff as a fraction of the import price, used for the no-battery baseline only
    pub export_tariff_ratio: f64,
    /// Days used to annualise a single-horizon result
    pub days_per_year: f64,
}

impl Default for FinancialSettings {
    fn default() -> Self {
        Self {
            battery_install_cost_gbp: 7000.0,
            // Typical UK SEG export rate vs. import rate
            export_tariff_ratio: 0.5,
            days_per_year: 365.0,
        }
    }
}

impl FinancialSettings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_non_negative("battery_install_cost_gbp", self.battery_install_cost_gbp)?;
        ensure_non_negative("export_tariff_ratio", self.export_tariff_ratio)?;
        ensure_positive("days_per_year", self.days_per_year)?;
        Ok(())
    }
}

/// Time to recover the install cost from repeated daily effective profit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payback {
    Years(f64),
    /// Annual effective profit is zero or negative; the investment never pays back.
    Unrecoverable,
}

impl Payback {
    pub fn years(&self) -> Option<f64> {
        match self {
            Payback::Years(y) => Some(*y),
            Payback::Unrecoverable => None,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, Payback::Years(_))
    }
}

/// Money view of a dispatched horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub revenue_gbp: f64,
    pub cost_gbp: f64,
    pub net_profit_gbp: f64,
    pub sharpe_ratio: f64,
}

/// Site economics without a battery: solar surplus exported at the export tariff,
/// deficit imported at full price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineSummary {
    pub cost_gbp: f64,
    pub revenue_gbp: f64,
    pub net_gbp: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialEvaluator {
    settings: FinancialSettings,
}

impl FinancialEvaluator {
    pub fn new(settings: FinancialSettings) -> Result<Self, ConfigurationError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &FinancialSettings {
        &self.settings
    }

    /// Revenue on exported energy and cost on imported energy, both at the same price.
    pub fn evaluate(
        &self,
        inputs: &TimeSeriesInputs,
        schedule: &Schedule,
        grid_flow_kw: &[f64],
    ) -> FinancialSummary {
        let dt = inputs.dt_hours();
        let prices = inputs.price_gbp_per_kwh();

        let (revenue_gbp, cost_gbp) = grid_flow_kw.iter().zip(prices).fold(
            (0.0, 0.0),
            |(revenue, cost), (&flow, &price)| {
                (
                    revenue + flow.max(0.0) * price * dt,
                    cost + (-flow).max(0.0) * price * dt,
                )
            },
        );

        let pnl: Vec<f64> = izip!(&schedule.discharge_kw, &schedule.charge_kw, prices)
            .map(|(d, c, p)| (d - c) * p * dt)
            .collect();

        FinancialSummary {
            revenue_gbp,
            cost_gbp,
            net_profit_gbp: revenue_gbp - cost_gbp,
            sharpe_ratio: sharpe_ratio(&pnl),
        }
    }

    pub fn payback(&self, effective_profit_gbp: f64) -> Payback {
        let annual = effective_profit_gbp * self.settings.days_per_year;
        if annual > MIN_ANNUAL_PROFIT_GBP && annual.is_finite() {
            Payback::Years(self.settings.battery_install_cost_gbp / annual)
        } else {
            Payback::Unrecoverable
        }
    }

    pub fn baseline(&self, inputs: &TimeSeriesInputs) -> BaselineSummary {
        let dt = inputs.dt_hours();
        let (cost_gbp, revenue_gbp) = inputs
            .net_site_kw()
            .iter()
            .zip(inputs.price_gbp_per_kwh())
            .fold((0.0, 0.0), |(cost, revenue), (&site, &price)| {
                (
                    cost + (-site).max(0.0) * price * dt,
                    revenue + site.max(0.0) * price * self.settings.export_tariff_ratio * dt,
                )
            });
        BaselineSummary {
            cost_gbp,
            revenue_gbp,
            net_gbp: revenue_gbp - cost_gbp,
        }
    }
}

/// Per-interval Sharpe ratio `mean(pnl) / std(pnl)`, unannualised.
///
/// Returns 0.0 for flat or empty series instead of NaN/inf.
pub fn sharpe_ratio(pnl: &[f64]) -> f64 {
    if pnl.is_empty() {
        return 0.0;
    }
    let std_dev = pnl.iter().population_std_dev();
    if !std_dev.is_finite() || std_dev < FLAT_PNL_STD_DEV {
        return 0.0;
    }
    pnl.iter().mean() / std_dev
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn inputs() -> TimeSeriesInputs {
        TimeSeriesInputs::with_horizon(
            vec![0.0, 0.0, 3.0, 0.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![0.10, 0.10, 0.05, 0.30],
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_revenue_and_cost_split_on_flow_sign() {
        let evaluator = FinancialEvaluator::default();
        let schedule = Schedule::new(
            vec![2.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 4.0],
            vec![0.0; 5],
        )
        .unwrap();
        // flows: -3, -1, +2, +3
        let flows = vec![-3.0, -1.0, 2.0, 3.0];
        let summary = evaluator.evaluate(&inputs(), &schedule, &flows);

        let expected_cost = (3.0 * 0.10 + 1.0 * 0.10) * 0.25;
        let expected_revenue = (2.0 * 0.05 + 3.0 * 0.30) * 0.25;
        assert!((summary.cost_gbp - expected_cost).abs() < 1e-12);
        assert!((summary.revenue_gbp - expected_revenue).abs() < 1e-12);
        assert!((summary.net_profit_gbp - (expected_revenue - expected_cost)).abs() < 1e-12);
    }

    #[test]
    fn test_sharpe_zero_for_flat_series() {
        assert_eq!(sharpe_ratio(&[0.0; 96]), 0.0);
        assert_eq!(sharpe_ratio(&[0.3; 10]), 0.0);
        assert_eq!(sharpe_ratio(&[]), 0.0);
    }

    #[test]
    fn test_sharpe_sign_follows_mean() {
        let s = sharpe_ratio(&[1.0, 2.0, 3.0]);
        // mean 2, population std sqrt(2/3)
        assert!((s - 2.0 / (2.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert!(sharpe_ratio(&[-1.0, -2.0, -3.0]) < 0.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.5)]
    #[case(f64::NAN)]
    #[case(1e-13)]
    #[case(-2e-15)]
    fn test_payback_unrecoverable(#[case] effective_profit: f64) {
        let evaluator = FinancialEvaluator::default();
        let payback = evaluator.payback(effective_profit);
        assert_eq!(payback, Payback::Unrecoverable);
        assert_eq!(payback.years(), None);
    }

    #[test]
    fn test_payback_years() {
        let evaluator = FinancialEvaluator::default();
        // 7000 / (1.0 * 365)
        let years = evaluator.payback(1.0).years().unwrap();
        assert!((years - 7000.0 / 365.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_uses_export_ratio() {
        let evaluator = FinancialEvaluator::default();
        let baseline = evaluator.baseline(&inputs());
        let cost = (1.0 * 0.10 + 1.0 * 0.10 + 1.0 * 0.30) * 0.25;
        let revenue = 2.0 * 0.05 * 0.5 * 0.25;
        assert!((baseline.cost_gbp - cost).abs() < 1e-12);
        assert!((baseline.revenue_gbp - revenue).abs() < 1e-12);
        assert!((baseline.net_gbp - (revenue - cost)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = FinancialSettings {
            days_per_year: 0.0,
            ..FinancialSettings::default()
        };
        assert!(FinancialEvaluator::new(settings).is_err());
    }
}
