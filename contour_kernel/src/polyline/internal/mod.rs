//! Algorithm internals behind the polyline operations, public for benchmarking and testing.
//!
//! Not expected to be used directly, the [Polyline](super::Polyline) methods wrap them.
pub mod pline_boolean;
pub mod pline_intersects;
pub mod pline_offset;
pub mod pline_slice;
