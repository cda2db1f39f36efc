use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{BatteryAsset, ConfigurationError};
use crate::economics::{DegradationModel, FinancialSettings, WarrantyTerms};
use crate::optimizer::{Constraints, DEFAULT_DEGRADATION_COST_GBP_PER_KWH};
use crate::power_flow::{GridPhysics, DEFAULT_TOLERANCE_KW};
use crate::simulation::ScenarioParams;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "ARB__";

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub battery: BatteryConfig,
    #[validate(nested)]
    pub market: MarketConfig,
    #[validate(nested)]
    pub grid: GridConfig,
    #[validate(nested)]
    pub finance: FinanceConfig,
    /// Omit to skip the warranty outlook
    #[validate(nested)]
    pub warranty: Option<WarrantyConfig>,
    #[validate(nested)]
    pub scenario: ScenarioConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct BatteryConfig {
    #[validate(range(exclusive_min = 0.0))]
    pub capacity_kwh: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub power_kw: f64,
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub efficiency: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub initial_soc_percent: f64,
}

impl BatteryConfig {
    pub fn asset(&self) -> Result<BatteryAsset, ConfigurationError> {
        BatteryAsset::new(
            self.capacity_kwh,
            self.power_kw,
            self.efficiency,
            self.initial_soc_percent,
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct MarketConfig {
    #[validate(range(exclusive_min = 0.0))]
    pub horizon_hours: f64,
    #[validate(range(min = 0.0))]
    pub grid_export_limit_kw: f64,
    /// Omit to derive the rate from the `[warranty]` section
    #[validate(range(min = 0.0))]
    pub degradation_cost_gbp_per_kwh: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct GridConfig {
    #[validate(range(min = 0.0))]
    pub line_resistance_ohm: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub nominal_voltage_v: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub voltage_rise_limit_pct: f64,
    #[serde(default = "default_tolerance_kw")]
    #[validate(range(min = 0.0))]
    pub tolerance_kw: f64,
}

fn default_tolerance_kw() -> f64 {
    DEFAULT_TOLERANCE_KW
}

impl GridConfig {
    pub fn physics(&self) -> GridPhysics {
        GridPhysics {
            line_resistance_ohm: self.line_resistance_ohm,
            nominal_voltage_v: self.nominal_voltage_v,
            voltage_rise_limit_pct: self.voltage_rise_limit_pct,
            tolerance_kw: self.tolerance_kw,
            ..GridPhysics::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct FinanceConfig {
    #[validate(range(min = 0.0))]
    pub battery_install_cost_gbp: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub export_tariff_ratio: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub days_per_year: f64,
}

impl FinanceConfig {
    pub fn settings(&self) -> FinancialSettings {
        FinancialSettings {
            battery_install_cost_gbp: self.battery_install_cost_gbp,
            export_tariff_ratio: self.export_tariff_ratio,
            days_per_year: self.days_per_year,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct WarrantyConfig {
    #[validate(range(min = 0.0))]
    pub replacement_cost_gbp: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub capacity_retention_pct: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub warranty_cycles: f64,
}

impl WarrantyConfig {
    pub fn terms(&self) -> WarrantyTerms {
        WarrantyTerms {
            replacement_cost_gbp: self.replacement_cost_gbp,
            capacity_retention_pct: self.capacity_retention_pct,
            warranty_cycles: self.warranty_cycles,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ScenarioConfig {
    pub seed: u64,
    #[validate(range(min = 1))]
    pub intervals: usize,
    #[validate(range(min = 0.0))]
    pub system_size_kwp: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub daily_load_kwh: f64,
    #[validate(range(min = 0.0))]
    pub volatility: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub cloud_cover: f64,
    /// Defaults to midsummer midnight when absent
    pub start: Option<NaiveDateTime>,
}

impl ScenarioConfig {
    pub fn params(&self) -> ScenarioParams {
        let defaults = ScenarioParams::default();
        ScenarioParams {
            system_size_kwp: self.system_size_kwp,
            daily_load_kwh: self.daily_load_kwh,
            volatility: self.volatility,
            cloud_cover: self.cloud_cover,
            intervals: self.intervals,
            start: self.start.unwrap_or(defaults.start),
        }
    }
}

impl Config {
    /// `config/default.toml` overlaid with `ARB__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(DEFAULT_CONFIG_PATH))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Self::from_figment(Figment::new().merge(Toml::string(toml)))
    }

    /// Export limit and wear rate. An explicit `[market]` rate wins, then one
    /// derived from `[warranty]` for the configured pack, then the default.
    pub fn constraints(&self) -> Result<Constraints, ConfigurationError> {
        let rate = match (self.market.degradation_cost_gbp_per_kwh, &self.warranty) {
            (Some(rate), _) => rate,
            (None, Some(warranty)) => {
                DegradationModel::from_warranty(&warranty.terms(), self.battery.capacity_kwh)?
                    .cost_gbp_per_kwh()
            }
            (None, None) => DEFAULT_DEGRADATION_COST_GBP_PER_KWH,
        };
        Constraints::new(self.market.grid_export_limit_kw, rate)
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Self = figment.extract().context("failed to read configuration")?;
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }
}
