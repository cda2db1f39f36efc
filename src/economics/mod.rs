//! Wear and money: degradation accounting and financial evaluation of a schedule

pub mod degradation;
pub mod financial;

pub use degradation::*;
pub use financial::*;
