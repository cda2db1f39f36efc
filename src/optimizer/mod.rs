pub mod arbitrage;
pub mod constraints;
pub mod error;
pub mod extract;
pub mod problem;
pub mod solver;
pub mod solvers;
pub mod types;

pub use arbitrage::BatteryOptimizer;
pub use constraints::*;
pub use error::OptimizerError;
pub use extract::ScheduleExtractor;
pub use problem::*;
pub use solver::*;
pub use types::*;
