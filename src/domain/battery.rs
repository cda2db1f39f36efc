use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, ensure_positive, ConfigurationError};

/// Static physical parameters of the battery for one optimization call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryAsset {
    /// Usable energy storage (kWh)
    pub capacity_kwh: f64,
    /// Symmetric charge/discharge power limit (kW)
    pub power_kw: f64,
    /// One-way conversion efficiency applied on both charge and discharge (0-1]
    pub efficiency: f64,
    /// Starting state of charge (%)
    pub initial_soc_pct: f64,
}

impl BatteryAsset {
    /// Build a validated asset.
    pub fn new(
        capacity_kwh: f64,
        power_kw: f64,
        efficiency: f64,
        initial_soc_pct: f64,
    ) -> Result<Self, ConfigurationError> {
        let asset = Self {
            capacity_kwh,
            power_kw,
            efficiency,
            initial_soc_pct,
        };
        asset.validate()?;
        Ok(asset)
    }

    /// Check every physical parameter against its admissible range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_positive("capacity_kwh", self.capacity_kwh)?;
        ensure_positive("power_kw", self.power_kw)?;

        ensure_finite("efficiency", self.efficiency)?;
        if self.efficiency <= 0.0 || self.efficiency > 1.0 {
            return Err(ConfigurationError::OutOfRange {
                field: "efficiency",
                value: self.efficiency,
                range: "(0, 1]",
            });
        }

        ensure_finite("initial_soc_pct", self.initial_soc_pct)?;
        if !(0.0..=100.0).contains(&self.initial_soc_pct) {
            return Err(ConfigurationError::OutOfRange {
                field: "initial_soc_pct",
                value: self.initial_soc_pct,
                range: "[0, 100]",
            });
        }

        Ok(())
    }

    /// Stored energy at the start of the horizon (kWh).
    pub fn initial_soc_kwh(&self) -> f64 {
        self.initial_soc_pct / 100.0 * self.capacity_kwh
    }

    pub fn soc_percent(&self, soc_kwh: f64) -> f64 {
        soc_kwh / self.capacity_kwh * 100.0
    }
}

impl Default for BatteryAsset {
    /// 13.5 kWh / 5 kW home battery at half charge
    fn default() -> Self {
        Self {
            capacity_kwh: 13.5,
            power_kw: 5.0,
            efficiency: 0.9,
            initial_soc_pct: 50.0,
        }
    }
}
