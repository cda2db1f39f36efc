//! # Scenario Simulation
//!
//! Seeded synthetic market days for demos, benchmarks and tests.
//!
//! ## Usage
//!
//! ```rust
//! use battery_arbitrage::simulation::{MarketDataGenerator, ScenarioParams};
//!
//! let mut generator = MarketDataGenerator::new(42);
//! let scenario = generator.generate(&ScenarioParams::default()).unwrap();
//! let inputs = scenario.to_inputs().unwrap();
//! assert_eq!(inputs.len(), 96);
//! ```

pub mod market;

pub use market::{MarketDataGenerator, MarketScenario, ScenarioParams, INTERVAL_MINUTES};
