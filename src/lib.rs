//! Battery arbitrage scheduling
//!
//! Given solar, load and price forecasts for one horizon, [`optimizer::BatteryOptimizer`]
//! solves a linear program for the charge/discharge schedule that maximises trading profit
//! net of battery wear while keeping site exports under the connection limit. The result
//! carries financial metrics and an independent grid-compliance audit.

pub mod config;
pub mod domain;
pub mod economics;
pub mod optimizer;
pub mod power_flow;
pub mod simulation;
pub mod telemetry;
