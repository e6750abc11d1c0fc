//! 2D polyline geometry kernel.
//!
//! Polylines are sequences of line and arc segments (arcs encoded by bulge). On top of them the
//! crate provides a static segment spatial index, segment and polyline intersects, boolean
//! operations between closed polylines, parallel offsets and multi-contour shape offsets.
//!
//! All operations are synchronous, borrow their inputs and return owned results. Caller contract
//! violations are reported with [KernelError], degenerate geometry yields (possibly empty) valid
//! results.

#[macro_use]
mod macros;
pub mod core;
pub mod error;
pub mod polyline;
pub mod shape;

pub use error::KernelError;
pub use static_aabb2d_index::AABB;
