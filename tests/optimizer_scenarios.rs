//! End-to-end optimizer scenarios
//!
//! Run with:
//! ```bash
//! cargo test --test optimizer_scenarios
//! ```

use battery_arbitrage::domain::{BatteryAsset, ConfigurationError, Schedule, TimeSeriesInputs};
use battery_arbitrage::economics::{Payback, WarrantyTerms};
use battery_arbitrage::optimizer::{BatteryOptimizer, Constraints, OptimizerError, SolverStatus};
use battery_arbitrage::power_flow::{GridComplianceChecker, GridPhysics};
use battery_arbitrage::simulation::{MarketDataGenerator, ScenarioParams};
use rstest::rstest;

const EPS: f64 = 1e-6;

/// 96 x 15 min, no solar, 0.5 kW base load, cheap first half and expensive second half.
fn two_price_day() -> TimeSeriesInputs {
    let price = (0..96).map(|t| if t < 48 { 0.02 } else { 0.18 }).collect();
    TimeSeriesInputs::new(vec![0.0; 96], vec![0.5; 96], price).unwrap()
}

fn optimizer(limit_kw: f64, degradation: f64) -> BatteryOptimizer {
    BatteryOptimizer::new(Constraints::new(limit_kw, degradation).unwrap()).unwrap()
}

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

#[test]
fn test_two_price_day_charges_cheap_discharges_dear() {
    let inputs = two_price_day();
    let asset = BatteryAsset::default();
    let report = optimizer(4.0, 0.05).optimize(&inputs, &asset).unwrap();
    let r = &report.result;
    let s = &r.schedule;

    assert_eq!(r.solver_status, SolverStatus::Optimal);

    // Fill up from 50% in the cheap half, empty out in the dear half.
    assert!((s.soc_kwh[48] - 13.5).abs() < EPS);
    assert!(s.soc_kwh[96].abs() < EPS);
    assert!(sum(&s.discharge_kw[..48]) < EPS);
    assert!(sum(&s.charge_kw[48..]) < EPS);
    assert!((sum(&s.charge_kw[..48]) * 0.25 - 7.5).abs() < 1e-5);

    // Discharge is capped by the export limit: 4 kW + 0.5 kW load.
    assert!(s.discharge_kw.iter().all(|&d| d <= 4.5 + EPS));
    assert!((s.discharged_kwh(0.25) - 12.15).abs() < 1e-5);

    assert!(r.net_profit_gbp > 0.0);
    assert!((r.net_profit_gbp - 0.837).abs() < 1e-4);
    assert!((r.degradation_cost_gbp - 0.6075).abs() < 1e-5);
    assert!((r.effective_profit_gbp - 0.2295).abs() < 1e-4);
    assert!((0.6..=1.0).contains(&r.cycle_count));
    assert!(r.payback.is_recoverable());
    assert!(r.simultaneous_intervals.is_empty());
    assert!((r.max_drawdown_pct - 100.0).abs() < 1e-4);

    assert!(report.compliance.compliant);
    assert_eq!(report.compliance.violation_count, 0);
    assert!(r.grid_flow_kw.iter().all(|&f| f <= 4.0 + EPS));

    // Without a battery the same day only costs money.
    assert!((report.baseline.cost_gbp - 1.2).abs() < 1e-9);
    assert_eq!(report.baseline.revenue_gbp, 0.0);
}

#[test]
fn test_constant_price_empty_battery_does_nothing() {
    let inputs = TimeSeriesInputs::new(vec![0.0; 96], vec![0.0; 96], vec![0.1; 96]).unwrap();
    let asset = BatteryAsset::new(13.5, 5.0, 0.9, 0.0).unwrap();
    let r = optimizer(4.0, 0.05).optimize(&inputs, &asset).unwrap().result;

    assert!(r.net_profit_gbp.abs() < EPS);
    assert!(r.cycle_count.abs() < EPS);
    assert_eq!(r.sharpe_ratio, 0.0);
    assert_eq!(r.payback, Payback::Unrecoverable);
    assert_eq!(r.payback.years(), None);
}

#[test]
fn test_unprofitable_schedule_never_reports_finite_payback() {
    // Wear priced above the whole spread: the battery only sits there.
    let inputs = two_price_day();
    let r = optimizer(4.0, 0.5)
        .optimize(&inputs, &BatteryAsset::default())
        .unwrap()
        .result;

    assert!(r.effective_profit_gbp <= 0.0);
    assert_eq!(r.payback, Payback::Unrecoverable);
}

#[test]
fn test_higher_wear_cost_never_increases_cycling() {
    let inputs = two_price_day();
    let asset = BatteryAsset::default();

    let cycles: Vec<f64> = [0.0, 0.02, 0.05, 0.1, 0.2]
        .iter()
        .map(|&d| {
            optimizer(4.0, d)
                .optimize(&inputs, &asset)
                .unwrap()
                .result
                .cycle_count
        })
        .collect();

    for pair in cycles.windows(2) {
        assert!(pair[1] <= pair[0] + EPS, "cycles {cycles:?}");
    }
    assert!(cycles[4] < EPS);
}

#[test]
fn test_repeated_solves_identical() {
    let inputs = MarketDataGenerator::new(42)
        .generate(&ScenarioParams::default())
        .unwrap()
        .to_inputs()
        .unwrap();
    let asset = BatteryAsset::default();
    let optimizer = optimizer(4.0, 0.05);

    let a = optimizer.optimize(&inputs, &asset).unwrap();
    let b = optimizer.optimize(&inputs, &asset).unwrap();
    assert_eq!(a.result.schedule, b.result.schedule);
    assert_eq!(a.result.net_profit_gbp, b.result.net_profit_gbp);
    assert_eq!(a.compliance, b.compliance);
}

#[test]
fn test_shared_optimizer_across_threads() {
    let inputs = two_price_day();
    let asset = BatteryAsset::default();
    let optimizer = optimizer(4.0, 0.05);
    let expected = optimizer.optimize(&inputs, &asset).unwrap().result.schedule;

    let schedules: Vec<Schedule> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| optimizer.optimize(&inputs, &asset).unwrap().result.schedule))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(schedules.iter().all(|s| *s == expected));
}

#[rstest]
#[case(0.0)]
#[case(37.5)]
#[case(100.0)]
fn test_soc_starts_at_initial_and_stays_in_bounds(#[case] initial_soc_pct: f64) {
    let inputs = MarketDataGenerator::new(7)
        .generate(&ScenarioParams {
            volatility: 3.0,
            ..ScenarioParams::default()
        })
        .unwrap()
        .to_inputs()
        .unwrap();
    let asset = BatteryAsset::new(10.0, 3.0, 0.92, initial_soc_pct).unwrap();
    let r = optimizer(4.0, 0.03).optimize(&inputs, &asset).unwrap().result;

    assert_eq!(r.schedule.soc_kwh.len(), inputs.len() + 1);
    assert!((r.schedule.soc_kwh[0] - initial_soc_pct / 100.0 * 10.0).abs() < EPS);
    assert!(r
        .schedule
        .soc_kwh
        .iter()
        .all(|&s| (-EPS..=10.0 + EPS).contains(&s)));
    assert!((r.soc_trajectory_pct[0] - initial_soc_pct).abs() < 1e-4);
}

#[test]
fn test_battery_soaks_up_solar_above_export_limit() {
    // Midday surplus of 5 kW against a 4 kW limit; the battery must take the extra 1 kW.
    let mut solar = vec![0.0; 96];
    solar[44..52].iter_mut().for_each(|s| *s = 5.5);
    let inputs = TimeSeriesInputs::new(solar, vec![0.5; 96], vec![0.1; 96]).unwrap();
    let asset = BatteryAsset::new(13.5, 5.0, 0.9, 20.0).unwrap();
    let report = optimizer(4.0, 0.05).optimize(&inputs, &asset).unwrap();

    assert!(report.result.grid_flow_kw.iter().all(|&f| f <= 4.0 + EPS));
    assert!(report.compliance.compliant);
    assert!(report.result.schedule.charge_kw[44..52].iter().all(|&c| c >= 1.0 - EPS));
    assert!(report.compliance.times_at_limit >= 8);
}

#[test]
fn test_unabsorbable_surplus_is_infeasible() {
    let mut solar = vec![0.0; 8];
    solar[3] = 12.0;
    let inputs = TimeSeriesInputs::with_horizon(solar, vec![0.5; 8], vec![0.1; 8], 2.0).unwrap();
    let err = optimizer(4.0, 0.05)
        .optimize(&inputs, &BatteryAsset::default())
        .unwrap_err();

    assert_eq!(
        err,
        OptimizerError::Infeasible {
            over_limit_intervals: vec![3]
        }
    );
}

#[test]
fn test_checker_flags_over_limit_forecast_without_fixing_it() {
    let mut solar = vec![0.0; 8];
    solar[3] = 12.0;
    let inputs = TimeSeriesInputs::with_horizon(solar, vec![0.5; 8], vec![0.1; 8], 2.0).unwrap();
    let checker = GridComplianceChecker::new(4.0, GridPhysics::default()).unwrap();

    let report = checker.check_schedule(&inputs, &Schedule::idle(8, &BatteryAsset::default()));
    assert_eq!(report.violation_count, 1);
    assert_eq!(report.violations[0].interval, 3);
    assert_eq!(report.violations[0].time_label, "00:45");
    assert!((report.violations[0].excess_kw - 7.5).abs() < 1e-9);
    assert!(!report.compliant);
}

#[test]
fn test_full_battery_at_negative_prices_flags_simultaneous_use() {
    // Paid to import with no headroom: charging and discharging together earns money.
    let inputs =
        TimeSeriesInputs::with_horizon(vec![0.0; 4], vec![0.0; 4], vec![-0.5; 4], 1.0).unwrap();
    let asset = BatteryAsset::new(13.5, 5.0, 0.9, 100.0).unwrap();
    let r = optimizer(4.0, 0.0).optimize(&inputs, &asset).unwrap().result;

    assert!(r.simultaneous_intervals.contains(&0));
    assert!(r.net_profit_gbp > 0.0);
}

#[test]
fn test_warranty_outlook_for_daily_cycling() {
    let optimizer = optimizer(4.0, 0.05)
        .with_warranty(WarrantyTerms::default())
        .unwrap();
    let report = optimizer
        .optimize(&two_price_day(), &BatteryAsset::default())
        .unwrap();
    let outlook = report.warranty.unwrap();

    assert!((outlook.annual_cycles - 0.9 * 365.0).abs() < 1e-3);
    let years = outlook.years_to_warranty_limit.unwrap();
    assert!((years - 3650.0 / 328.5).abs() < 1e-3);
}

#[test]
fn test_empty_or_mismatched_inputs_rejected() {
    assert_eq!(
        TimeSeriesInputs::new(vec![], vec![], vec![]),
        Err(ConfigurationError::EmptyHorizon)
    );
    assert!(matches!(
        TimeSeriesInputs::new(vec![0.0; 3], vec![0.0; 3], vec![0.1; 2]),
        Err(ConfigurationError::LengthMismatch { .. })
    ));
}

#[rstest]
#[case(BatteryAsset { capacity_kwh: 0.0, ..BatteryAsset::default() })]
#[case(BatteryAsset { power_kw: -1.0, ..BatteryAsset::default() })]
#[case(BatteryAsset { efficiency: 0.0, ..BatteryAsset::default() })]
#[case(BatteryAsset { initial_soc_pct: 120.0, ..BatteryAsset::default() })]
fn test_invalid_asset_fails_before_solving(#[case] asset: BatteryAsset) {
    let err = optimizer(4.0, 0.05)
        .optimize(&two_price_day(), &asset)
        .unwrap_err();
    assert!(matches!(err, OptimizerError::Configuration(_)));
}

#[test]
fn test_deserialized_forecast_is_validated_before_solving() {
    let mismatched: TimeSeriesInputs = serde_json::from_str(
        r#"{"solar_kw":[0.0,0.0],"load_kw":[0.5,0.5],"price_gbp_per_kwh":[0.1,0.1,0.1],"horizon_hours":1.0}"#,
    )
    .unwrap();
    let err = optimizer(4.0, 0.05)
        .optimize(&mismatched, &BatteryAsset::default())
        .unwrap_err();
    assert!(matches!(
        err,
        OptimizerError::Configuration(ConfigurationError::LengthMismatch { .. })
    ));

    let empty: TimeSeriesInputs = serde_json::from_str(
        r#"{"solar_kw":[],"load_kw":[],"price_gbp_per_kwh":[],"horizon_hours":24.0}"#,
    )
    .unwrap();
    assert_eq!(
        optimizer(4.0, 0.05)
            .optimize(&empty, &BatteryAsset::default())
            .unwrap_err(),
        OptimizerError::Configuration(ConfigurationError::EmptyHorizon)
    );
}
