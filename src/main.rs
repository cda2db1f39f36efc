use anyhow::{Context, Result};
use battery_arbitrage::{config, optimizer, simulation, telemetry};
use config::Config;
use optimizer::BatteryOptimizer;
use simulation::MarketDataGenerator;
use telemetry::init_tracing;
use tracing::{info, warn};

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    let asset = cfg.battery.asset().context("battery section")?;
    let constraints = cfg.constraints().context("market section")?;

    let mut optimizer = BatteryOptimizer::new(constraints)?
        .with_financial_settings(cfg.finance.settings())?
        .with_grid_physics(cfg.grid.physics())?;
    if let Some(warranty) = &cfg.warranty {
        optimizer = optimizer.with_warranty(warranty.terms())?;
    }

    let scenario = MarketDataGenerator::new(cfg.scenario.seed).generate(&cfg.scenario.params())?;
    let inputs = scenario.to_inputs()?;
    if (inputs.horizon_hours() - cfg.market.horizon_hours).abs() > 1e-9 {
        warn!(
            scenario_hours = inputs.horizon_hours(),
            configured_hours = cfg.market.horizon_hours,
            "scenario length differs from configured horizon; using scenario length"
        );
    }

    info!(
        seed = cfg.scenario.seed,
        intervals = inputs.len(),
        solver = optimizer.solver_name(),
        "optimizing synthetic day"
    );

    let report = optimizer.optimize(&inputs, &asset)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
