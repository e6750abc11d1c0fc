use crate::polyline::PlineOrientation;
use static_aabb2d_index::StaticAABB2DIndexBuildError;
use thiserror::Error;

/// Errors for contract violations by the caller.
///
/// Degenerate geometry (zero length segments, collapsed arcs, empty boolean or offset results) is
/// never an error, those produce valid and possibly empty outputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("operation requires at least {required} vertexes but polyline has {count}")]
    InsufficientVertexes { count: usize, required: usize },

    #[error("vertex index {index} is out of bounds for polyline with {len} vertexes")]
    VertexIndexOutOfBounds { index: usize, len: usize },

    #[error("{orientation:?} contour index {index} is out of bounds for {len} contours")]
    ContourIndexOutOfBounds {
        orientation: PlineOrientation,
        index: usize,
        len: usize,
    },

    #[error("operation requires a closed polyline")]
    OpenPolyline,

    #[error("vertex buffer of length {len} does not hold whole (x, y, bulge) triples")]
    InvalidVertexBuffer { len: usize },

    #[error("spatial index has {index_count} boxes but polyline has {segment_count} segments")]
    IndexSegmentCountMismatch {
        index_count: usize,
        segment_count: usize,
    },

    #[error("failed to build spatial index: {0}")]
    IndexBuild(String),
}

impl From<StaticAABB2DIndexBuildError> for KernelError {
    fn from(err: StaticAABB2DIndexBuildError) -> Self {
        KernelError::IndexBuild(format!("{:?}", err))
    }
}
