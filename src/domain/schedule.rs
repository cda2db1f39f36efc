use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;
use super::BatteryAsset;

/// Power below this is treated as zero when classifying an interval (kW).
pub const ACTIVITY_THRESHOLD_KW: f64 = 1e-6;

/// Battery dispatch over the horizon.
///
/// `soc_kwh` has one more entry than the power series: `soc_kwh[t]` is the
/// stored energy at the start of interval `t`, `soc_kwh[N]` at the end of the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub charge_kw: Vec<f64>,
    pub discharge_kw: Vec<f64>,
    pub soc_kwh: Vec<f64>,
}

impl Schedule {
    pub fn new(
        charge_kw: Vec<f64>,
        discharge_kw: Vec<f64>,
        soc_kwh: Vec<f64>,
    ) -> Result<Self, ConfigurationError> {
        if charge_kw.len() != discharge_kw.len() || soc_kwh.len() != charge_kw.len() + 1 {
            return Err(ConfigurationError::ScheduleShape {
                charge: charge_kw.len(),
                discharge: discharge_kw.len(),
                soc: soc_kwh.len(),
            });
        }
        Ok(Self {
            charge_kw,
            discharge_kw,
            soc_kwh,
        })
    }

    /// The zero-action schedule: no charging, no discharging, SoC held at its initial value.
    pub fn idle(intervals: usize, asset: &BatteryAsset) -> Self {
        Self {
            charge_kw: vec![0.0; intervals],
            discharge_kw: vec![0.0; intervals],
            soc_kwh: vec![asset.initial_soc_kwh(); intervals + 1],
        }
    }

    pub fn len(&self) -> usize {
        self.charge_kw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charge_kw.is_empty()
    }

    /// Battery contribution to site export per interval: `discharge - charge` (kW).
    pub fn net_battery_kw(&self) -> Vec<f64> {
        self.discharge_kw
            .iter()
            .zip(&self.charge_kw)
            .map(|(d, c)| d - c)
            .collect()
    }

    /// Total AC energy delivered by the battery over the horizon (kWh).
    pub fn discharged_kwh(&self, dt_hours: f64) -> f64 {
        self.discharge_kw.iter().sum::<f64>() * dt_hours
    }

    /// Total AC energy drawn into the battery over the horizon (kWh).
    pub fn charged_kwh(&self, dt_hours: f64) -> f64 {
        self.charge_kw.iter().sum::<f64>() * dt_hours
    }

    pub fn soc_percent(&self, asset: &BatteryAsset) -> Vec<f64> {
        self.soc_kwh.iter().map(|&s| asset.soc_percent(s)).collect()
    }

    /// Intervals in which the battery both charges and discharges.
    pub fn simultaneous_intervals(&self) -> Vec<usize> {
        self.charge_kw
            .iter()
            .zip(&self.discharge_kw)
            .enumerate()
            .filter(|(_, (c, d))| **c > ACTIVITY_THRESHOLD_KW && **d > ACTIVITY_THRESHOLD_KW)
            .map(|(t, _)| t)
            .collect()
    }
}
