//! # Synthetic Market Scenarios
//!
//! Day-long solar, household load and day-ahead price profiles for a UK home,
//! sampled at 15-minute resolution:
//!
//! - **Solar**: Gaussian clear-sky curve around solar noon with multiplicative cloud noise
//! - **Load**: overnight base with morning and evening peaks, scaled to a daily total
//! - **Price**: duck curve with a midday trough, an evening scarcity peak and
//!   optional spikes at high volatility

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::domain::error::{ensure_non_negative, ensure_positive};
use crate::domain::{ConfigurationError, TimeSeriesInputs};

/// Interval length of generated scenarios
pub const INTERVAL_MINUTES: i64 = 15;

/// Peak PV output as a fraction of rated capacity
const PEAK_CAPACITY_FACTOR: f64 = 0.85;
/// Lowest price emitted (GBP/kWh)
const PRICE_FLOOR_GBP_PER_KWH: f64 = 0.01;
/// Lowest household draw before scaling (kW)
const LOAD_FLOOR_KW: f64 = 0.3;

/// Knobs for one generated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Rated PV array size (kWp)
    pub system_size_kwp: f64,
    /// Household consumption over the generated horizon (kWh)
    pub daily_load_kwh: f64,
    /// Price noise multiplier: 1 = typical day, above 2 adds spikes
    pub volatility: f64,
    /// Solar intermittency: 0 = clear sky, 1 = heavy cloud
    pub cloud_cover: f64,
    /// Number of 15-minute intervals
    pub intervals: usize,
    pub start: NaiveDateTime,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            system_size_kwp: 3.5,
            daily_load_kwh: 12.0,
            volatility: 1.0,
            cloud_cover: 0.3,
            intervals: 96,
            start: NaiveDate::from_ymd_opt(2024, 6, 21)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
        }
    }
}

impl ScenarioParams {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_non_negative("system_size_kwp", self.system_size_kwp)?;
        ensure_positive("daily_load_kwh", self.daily_load_kwh)?;
        ensure_non_negative("volatility", self.volatility)?;
        if !(0.0..=1.0).contains(&self.cloud_cover) {
            return Err(ConfigurationError::OutOfRange {
                field: "cloud_cover",
                value: self.cloud_cover,
                range: "[0, 1]",
            });
        }
        if self.intervals == 0 {
            return Err(ConfigurationError::EmptyHorizon);
        }
        Ok(())
    }

    pub fn horizon_hours(&self) -> f64 {
        self.intervals as f64 * INTERVAL_MINUTES as f64 / 60.0
    }
}

/// A generated day, ready to feed the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketScenario {
    pub timestamps: Vec<NaiveDateTime>,
    pub solar_kw: Vec<f64>,
    pub load_kw: Vec<f64>,
    pub price_gbp_per_kwh: Vec<f64>,
    pub params: ScenarioParams,
}

impl MarketScenario {
    pub fn to_inputs(&self) -> Result<TimeSeriesInputs, ConfigurationError> {
        TimeSeriesInputs::with_horizon(
            self.solar_kw.clone(),
            self.load_kw.clone(),
            self.price_gbp_per_kwh.clone(),
            self.params.horizon_hours(),
        )
    }
}

/// Seeded scenario generator. Equal seeds and params give identical scenarios.
pub struct MarketDataGenerator {
    rng: StdRng,
}

impl MarketDataGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Continue from an existing generator state, e.g. for consecutive days.
    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn generate(
        &mut self,
        params: &ScenarioParams,
    ) -> Result<MarketScenario, ConfigurationError> {
        params.validate()?;

        let timestamps: Vec<NaiveDateTime> = (0..params.intervals)
            .map(|i| params.start + Duration::minutes(INTERVAL_MINUTES * i as i64))
            .collect();
        let hours: Vec<f64> = timestamps
            .iter()
            .map(|ts| ts.hour() as f64 + ts.minute() as f64 / 60.0)
            .collect();

        let solar_kw = self.solar(&hours, params.system_size_kwp, params.cloud_cover)?;
        let load_kw = self.load(&hours, params.daily_load_kwh)?;
        let price_gbp_per_kwh = self.prices(&hours, params.volatility)?;

        tracing::debug!(
            intervals = params.intervals,
            solar_kwh = solar_kw.iter().sum::<f64>() * INTERVAL_MINUTES as f64 / 60.0,
            volatility = params.volatility,
            "generated market scenario"
        );

        Ok(MarketScenario {
            timestamps,
            solar_kw,
            load_kw,
            price_gbp_per_kwh,
            params: params.clone(),
        })
    }

    fn solar(
        &mut self,
        hours: &[f64],
        system_size_kwp: f64,
        cloud_cover: f64,
    ) -> Result<Vec<f64>, ConfigurationError> {
        let cloud = normal("cloud_cover", cloud_cover * 0.3)?;
        Ok(hours
            .iter()
            .map(|&h| {
                let clear_sky = system_size_kwp * PEAK_CAPACITY_FACTOR * bell(h, 12.0, 2.5);
                let transmission = (1.0 + cloud.sample(&mut self.rng)).clamp(0.2, 1.0);
                (clear_sky * transmission).max(0.0)
            })
            .collect())
    }

    fn load(&mut self, hours: &[f64], daily_load_kwh: f64) -> Result<Vec<f64>, ConfigurationError> {
        let appliance = normal("load_noise", 0.1)?;
        let raw: Vec<f64> = hours
            .iter()
            .map(|&h| {
                let morning = 1.5 * bell(h, 7.5, 1.0);
                let evening = 2.2 * bell(h, 19.0, 1.5);
                (0.5 + morning + evening + appliance.sample(&mut self.rng)).max(LOAD_FLOOR_KW)
            })
            .collect();

        let dt = INTERVAL_MINUTES as f64 / 60.0;
        let scale = daily_load_kwh / (raw.iter().sum::<f64>() * dt);
        Ok(raw.into_iter().map(|l| l * scale).collect())
    }

    fn prices(&mut self, hours: &[f64], volatility: f64) -> Result<Vec<f64>, ConfigurationError> {
        let noise = normal("volatility", 0.008 * volatility)?;
        let spike_prob = if volatility > 2.0 {
            (volatility - 2.0) * 0.05
        } else {
            0.0
        };
        let spike_size = Uniform::new(0.1, 0.3);

        Ok(hours
            .iter()
            .map(|&h| {
                let base = 0.05 + 0.01 * ((h - 3.0) * PI / 12.0).sin();
                let solar_trough = -0.04 * bell(h, 13.0, 1.5);
                let evening_peak = 0.12 * bell(h, 18.5, 1.0);
                let mut price = base + solar_trough + evening_peak + noise.sample(&mut self.rng);
                if spike_prob > 0.0 && self.rng.gen::<f64>() < spike_prob {
                    price += spike_size.sample(&mut self.rng);
                }
                price.max(PRICE_FLOOR_GBP_PER_KWH)
            })
            .collect())
    }
}

fn bell(hour: f64, centre: f64, width: f64) -> f64 {
    (-(hour - centre).powi(2) / (2.0 * width.powi(2))).exp()
}

fn normal(field: &'static str, std_dev: f64) -> Result<Normal<f64>, ConfigurationError> {
    Normal::new(0.0, std_dev).map_err(|_| ConfigurationError::OutOfRange {
        field,
        value: std_dev,
        range: "[0, inf)",
    })
}
