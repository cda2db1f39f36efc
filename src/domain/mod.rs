pub mod battery;
pub mod error;
pub mod forecast;
pub mod schedule;

pub use battery::*;
pub use error::ConfigurationError;
pub use forecast::*;
pub use schedule::*;
