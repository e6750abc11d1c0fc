//! Shared math, numeric traits and control flow types.
pub mod math;
pub mod traits;

/// Visitor control flow, returned from visitor closures to continue or stop early.
///
/// Re-exported from the spatial index crate so the same closures work for index queries and
/// intersect visiting.
pub use static_aabb2d_index::{Control, ControlFlow};
