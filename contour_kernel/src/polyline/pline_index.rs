use super::{seg_bounding_box, seg_fast_approx_bounding_box, Polyline};
use crate::{core::traits::Real, error::KernelError};
use static_aabb2d_index::{
    ControlFlow, QueryVisitor, StaticAABB2DIndex, StaticAABB2DIndexBuilder, AABB,
};

/// Immutable spatial index holding one bounding box per polyline segment.
///
/// Box `i` bounds the segment starting at vertex `i`. The index does not track changes to the
/// polyline it was built from, rebuild it after modifying the polyline.
#[derive(Debug, Clone)]
pub struct SpatialIndex<T = f64>
where
    T: Real,
{
    inner: Option<StaticAABB2DIndex<T>>,
    segment_count: usize,
    exact: bool,
}

impl<T> SpatialIndex<T>
where
    T: Real,
{
    /// Bulk build the index for `pline`. With `exact` set the boxes are the true segment extents,
    /// otherwise the faster approximate boxes (never smaller than the segment) are used.
    ///
    /// A polyline with fewer than 2 vertexes produces an empty index.
    pub fn build(pline: &Polyline<T>, exact: bool) -> Result<Self, KernelError> {
        let segment_count = pline.segment_count();
        if segment_count == 0 {
            return Ok(Self {
                inner: None,
                segment_count,
                exact,
            });
        }

        let mut builder = StaticAABB2DIndexBuilder::new(segment_count);
        for (v1, v2) in pline.iter_segments() {
            let bb = if exact {
                seg_bounding_box(v1, v2)
            } else {
                seg_fast_approx_bounding_box(v1, v2)
            };
            builder.add(bb.min_x, bb.min_y, bb.max_x, bb.max_y);
        }

        Ok(Self {
            inner: Some(builder.build()?),
            segment_count,
            exact,
        })
    }

    /// Number of segment boxes held.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// True if built with exact segment boxes.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Box containing every segment box. An empty index returns a box with NaN corners.
    ///
    /// # Examples
    ///
    /// ```
    /// # use contour_kernel::polyline::*;
    /// let index = SpatialIndex::build(&Polyline::<f64>::new(), true).unwrap();
    /// assert!(index.extents().min_x.is_nan());
    /// ```
    pub fn extents(&self) -> AABB<T> {
        self.inner
            .as_ref()
            .and_then(|index| index.bounds())
            .unwrap_or_else(|| AABB::new(T::nan(), T::nan(), T::nan(), T::nan()))
    }

    /// Segment indexes whose boxes overlap `aabb`.
    pub fn query(&self, aabb: &AABB<T>) -> Vec<usize> {
        match &self.inner {
            Some(index) => index.query(aabb.min_x, aabb.min_y, aabb.max_x, aabb.max_y),
            None => Vec::new(),
        }
    }

    /// Same as [SpatialIndex::query] but reuses `stack` for traversal and appends to `results`.
    pub fn query_with_stack(
        &self,
        aabb: &AABB<T>,
        results: &mut Vec<usize>,
        stack: &mut Vec<usize>,
    ) {
        if let Some(index) = &self.inner {
            let mut visitor = |i: usize| {
                results.push(i);
            };
            index.visit_query_with_stack(
                aabb.min_x,
                aabb.min_y,
                aabb.max_x,
                aabb.max_y,
                &mut visitor,
                stack,
            );
        }
    }

    /// Visit segment indexes whose boxes overlap `aabb`. The visitor may return
    /// [crate::core::Control::Break] to stop early.
    pub fn visit_query<V, C>(&self, aabb: &AABB<T>, visitor: &mut V, stack: &mut Vec<usize>)
    where
        V: QueryVisitor<T, C>,
        C: ControlFlow,
    {
        if let Some(index) = &self.inner {
            index.visit_query_with_stack(
                aabb.min_x,
                aabb.min_y,
                aabb.max_x,
                aabb.max_y,
                visitor,
                stack,
            );
        }
    }

    /// Error if the index was not built for a polyline with `segment_count` segments.
    pub(crate) fn check_segment_count(&self, segment_count: usize) -> Result<(), KernelError> {
        if self.segment_count != segment_count {
            return Err(KernelError::IndexSegmentCountMismatch {
                index_count: self.segment_count,
                segment_count,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Control;

    #[test]
    fn query_square_segments() {
        let pline = pline_closed![(0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (2.0, 2.0, 0.0), (0.0, 2.0, 0.0)];
        let index = SpatialIndex::build(&pline, true).unwrap();
        assert_eq!(index.segment_count(), 4);
        assert!(index.is_exact());

        let mut hits = index.query(&AABB::new(1.5, -0.5, 2.5, 0.5));
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);

        let ext = index.extents();
        assert_eq!((ext.min_x, ext.min_y, ext.max_x, ext.max_y), (0.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn exact_box_includes_arc_bulge() {
        let pline = pline_closed![(0.0f64, 0.0, 1.0), (2.0, 0.0, 1.0)];
        let exact = SpatialIndex::build(&pline, true).unwrap();
        let ext = exact.extents();
        assert!((ext.min_y + 1.0).abs() < 1e-12);
        assert!((ext.max_y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn visit_query_stops_on_break() {
        let pline = pline_closed![(0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (2.0, 2.0, 0.0), (0.0, 2.0, 0.0)];
        let index = SpatialIndex::build(&pline, false).unwrap();
        let mut visited = 0;
        let mut visitor = |_: usize| {
            visited += 1;
            Control::Break(())
        };
        let mut stack = Vec::new();
        index.visit_query(&AABB::new(-1.0, -1.0, 3.0, 3.0), &mut visitor, &mut stack);
        assert_eq!(visited, 1);
    }

    #[test]
    fn empty_index() {
        let pline = Polyline::<f64>::new();
        let index = SpatialIndex::build(&pline, false).unwrap();
        assert!(index.is_empty());
        assert!(index.query(&AABB::new(-1.0, -1.0, 1.0, 1.0)).is_empty());
        let ext = index.extents();
        assert!(ext.max_x.is_nan() && ext.max_y.is_nan());
    }
}
