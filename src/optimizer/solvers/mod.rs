//! LP backends
//!
//! - minilp: pure-Rust dual simplex, returns vertex solutions (default)
//! - clarabel: interior-point solver driven through good_lp

#[cfg(feature = "clarabel")]
pub mod clarabel;
#[cfg(feature = "minilp")]
pub mod minilp;

#[cfg(feature = "clarabel")]
pub use self::clarabel::ClarabelSolver;
#[cfg(feature = "minilp")]
pub use self::minilp::MinilpSolver;

#[cfg(feature = "minilp")]
pub type DefaultSolver = MinilpSolver;

#[cfg(all(feature = "clarabel", not(feature = "minilp")))]
pub type DefaultSolver = ClarabelSolver;

#[cfg(not(any(feature = "minilp", feature = "clarabel")))]
compile_error!("enable at least one LP backend feature: `minilp` or `clarabel`");
