//! Numeric traits shared by every geometry routine in the crate.
mod fuzzy;
mod real;

pub use fuzzy::{FuzzyEq, FuzzyOrd};
pub use real::Real;
