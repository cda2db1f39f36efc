use serde::{Deserialize, Serialize};

use crate::domain::error::{ensure_non_negative, ConfigurationError};

/// Reference wear cost: Powerwall-class warranty economics rounded up (GBP/kWh)
pub const DEFAULT_DEGRADATION_COST_GBP_PER_KWH: f64 = 0.05;

/// Typical single-phase G99 export limit (kW)
pub const DEFAULT_GRID_EXPORT_LIMIT_KW: f64 = 4.0;

/// Market and connection parameters applied to every interval of the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Maximum net export at the point of connection (kW)
    pub grid_export_limit_kw: f64,
    /// Marginal wear cost charged on every kWh moved through the battery (GBP/kWh)
    pub degradation_cost_gbp_per_kwh: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            grid_export_limit_kw: DEFAULT_GRID_EXPORT_LIMIT_KW,
            degradation_cost_gbp_per_kwh: DEFAULT_DEGRADATION_COST_GBP_PER_KWH,
        }
    }
}

impl Constraints {
    pub fn new(
        grid_export_limit_kw: f64,
        degradation_cost_gbp_per_kwh: f64,
    ) -> Result<Self, ConfigurationError> {
        let constraints = Self {
            grid_export_limit_kw,
            degradation_cost_gbp_per_kwh,
        };
        constraints.validate()?;
        Ok(constraints)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_non_negative("grid_export_limit_kw", self.grid_export_limit_kw)?;
        ensure_non_negative(
            "degradation_cost_gbp_per_kwh",
            self.degradation_cost_gbp_per_kwh,
        )?;
        Ok(())
    }
}
