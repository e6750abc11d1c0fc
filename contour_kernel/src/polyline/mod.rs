//! Polylines, polyline vertexes and segments, plus the spatial index and algorithms built on them.
pub mod internal;
mod pline;
mod pline_index;
mod pline_seg;
mod pline_seg_intersect;
mod pline_types;
mod pline_vertex;

pub use pline::*;
pub use pline_index::*;
pub use pline_seg::*;
pub use pline_seg_intersect::*;
pub use pline_types::*;
pub use pline_vertex::*;
