use serde::{Deserialize, Serialize};

use super::error::{ensure_positive, ConfigurationError};

/// Reference horizon: one day
pub const DEFAULT_HORIZON_HOURS: f64 = 24.0;

/// Forecast arrays for a fixed horizon split into N equal intervals.
///
/// Construction validates the series: equal lengths, `N > 0`, finite entries and
/// non-negative solar/load. Deserialized values are unchecked until [`Self::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesInputs {
    solar_kw: Vec<f64>,
    load_kw: Vec<f64>,
    price_gbp_per_kwh: Vec<f64>,
    horizon_hours: f64,
}

impl TimeSeriesInputs {
    /// Build inputs over the default 24h horizon.
    pub fn new(
        solar_kw: Vec<f64>,
        load_kw: Vec<f64>,
        price_gbp_per_kwh: Vec<f64>,
    ) -> Result<Self, ConfigurationError> {
        Self::with_horizon(solar_kw, load_kw, price_gbp_per_kwh, DEFAULT_HORIZON_HOURS)
    }

    pub fn with_horizon(
        solar_kw: Vec<f64>,
        load_kw: Vec<f64>,
        price_gbp_per_kwh: Vec<f64>,
        horizon_hours: f64,
    ) -> Result<Self, ConfigurationError> {
        let inputs = Self {
            solar_kw,
            load_kw,
            price_gbp_per_kwh,
            horizon_hours,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    /// Re-check the construction invariants. Needed for values that arrive through serde.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let n = self.solar_kw.len();
        if self.load_kw.len() != n || self.price_gbp_per_kwh.len() != n {
            return Err(ConfigurationError::LengthMismatch {
                solar: n,
                load: self.load_kw.len(),
                price: self.price_gbp_per_kwh.len(),
            });
        }
        if n == 0 {
            return Err(ConfigurationError::EmptyHorizon);
        }
        ensure_positive("horizon_hours", self.horizon_hours)?;

        check_series("solar_kw", &self.solar_kw, true)?;
        check_series("load_kw", &self.load_kw, true)?;
        // Prices may be negative.
        check_series("price_gbp_per_kwh", &self.price_gbp_per_kwh, false)?;
        Ok(())
    }

    pub fn solar_kw(&self) -> &[f64] {
        &self.solar_kw
    }

    pub fn load_kw(&self) -> &[f64] {
        &self.load_kw
    }

    pub fn price_gbp_per_kwh(&self) -> &[f64] {
        &self.price_gbp_per_kwh
    }

    pub fn horizon_hours(&self) -> f64 {
        self.horizon_hours
    }

    /// Number of intervals N
    pub fn len(&self) -> usize {
        self.solar_kw.len()
    }

    /// Always false for a constructed value.
    pub fn is_empty(&self) -> bool {
        self.solar_kw.is_empty()
    }

    /// Interval length in hours
    pub fn dt_hours(&self) -> f64 {
        self.horizon_hours / self.len() as f64
    }

    /// Site net export before any battery action: `solar - load` per interval (kW).
    pub fn net_site_kw(&self) -> Vec<f64> {
        self.solar_kw
            .iter()
            .zip(&self.load_kw)
            .map(|(s, l)| s - l)
            .collect()
    }
}

fn check_series(
    field: &'static str,
    values: &[f64],
    non_negative: bool,
) -> Result<(), ConfigurationError> {
    for (index, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(ConfigurationError::NonFinite { field, index });
        }
        if non_negative && v < 0.0 {
            return Err(ConfigurationError::Negative { field, value: v });
        }
    }
    Ok(())
}
