//! Multi-contour shapes: counter clockwise outer contours plus clockwise holes, offset together.
use crate::{
    core::traits::Real,
    error::KernelError,
    polyline::{
        internal::{
            pline_intersects::find_intersects,
            pline_offset::{slice_intersects_original, slice_points_valid},
            pline_slice::{create_slices, sort_split_points, stitch_slices, PlineSlice, SplitPoint},
        },
        FindIntersectsOptions, IndexSource, OffsetOptions, PlineOrientation, Polyline,
        SpatialIndex,
    },
};
use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuilder};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed polyline paired with its approximate segment index.
#[derive(Debug, Clone)]
pub struct IndexedPolyline<T = f64>
where
    T: Real,
{
    polyline: Polyline<T>,
    spatial_index: SpatialIndex<T>,
}

impl<T> IndexedPolyline<T>
where
    T: Real,
{
    pub fn new(polyline: Polyline<T>) -> Result<Self, KernelError> {
        let spatial_index = polyline.create_approx_index()?;
        Ok(Self {
            polyline,
            spatial_index,
        })
    }

    #[inline]
    pub fn polyline(&self) -> &Polyline<T> {
        &self.polyline
    }

    #[inline]
    pub fn spatial_index(&self) -> &SpatialIndex<T> {
        &self.spatial_index
    }

    fn offset_for_shape(
        &self,
        offset: T,
        options: &ShapeOffsetOptions<T>,
    ) -> Result<Vec<Polyline<T>>, KernelError> {
        let opts = OffsetOptions {
            index: IndexSource::Provided(&self.spatial_index),
            pos_equal_eps: options.pos_equal_eps,
            slice_join_eps: options.slice_join_eps,
            offset_dist_eps: options.offset_dist_eps,
            handle_self_intersects: false,
        };

        self.polyline.parallel_offset_opt(offset, &opts)
    }
}

/// Options for [Shape::parallel_offset].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ShapeOffsetOptions<T> {
    /// Fuzzy comparison epsilon used for determining if two positions are equal.
    pub pos_equal_eps: T,
    /// Epsilon used when testing the distance of slices to the original contours.
    pub offset_dist_eps: T,
    /// Epsilon used for joining slice end points when stitching.
    pub slice_join_eps: T,
}

impl<T> ShapeOffsetOptions<T>
where
    T: Real,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            pos_equal_eps: T::from_f64_lit(1e-5),
            offset_dist_eps: T::from_f64_lit(1e-4),
            slice_join_eps: T::from_f64_lit(1e-4),
        }
    }
}

impl<T> Default for ShapeOffsetOptions<T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Offset result of one input contour, `parent` is the input contour index (counter clockwise
/// contours first, then clockwise).
struct OffsetLoop<T>
where
    T: Real,
{
    parent: usize,
    indexed_pline: IndexedPolyline<T>,
}

/// Region made of positive area counter clockwise contours and negative area (hole) clockwise
/// contours.
///
/// Each contour carries a spatial index, contours are immutable once added except for their
/// userdata.
#[derive(Debug, Clone)]
pub struct Shape<T = f64>
where
    T: Real,
{
    ccw_plines: Vec<IndexedPolyline<T>>,
    cw_plines: Vec<IndexedPolyline<T>>,
}

impl<T> Default for Shape<T>
where
    T: Real,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Shape<T>
where
    T: Real,
{
    /// Shape with no contours.
    #[inline]
    pub fn empty() -> Self {
        Self {
            ccw_plines: Vec::new(),
            cw_plines: Vec::new(),
        }
    }

    /// Build a shape from closed polylines, classifying each by the sign of its area.
    ///
    /// # Examples
    ///
    /// ```
    /// # use contour_kernel::pline_closed;
    /// # use contour_kernel::shape::Shape;
    /// let outer = pline_closed![(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 10.0, 0.0), (0.0, 10.0, 0.0)];
    /// let mut hole = pline_closed![(4.0, 4.0, 0.0), (6.0, 4.0, 0.0), (6.0, 6.0, 0.0), (4.0, 6.0, 0.0)];
    /// hole.invert_direction();
    /// let shape = Shape::from_plines([outer, hole]).unwrap();
    /// assert_eq!(shape.ccw_count(), 1);
    /// assert_eq!(shape.cw_count(), 1);
    /// ```
    pub fn from_plines<I>(plines: I) -> Result<Self, KernelError>
    where
        I: IntoIterator<Item = Polyline<T>>,
    {
        let mut shape = Self::empty();
        for pline in plines {
            shape.add_pline(pline)?;
        }

        Ok(shape)
    }

    fn add_pline(&mut self, pline: Polyline<T>) -> Result<(), KernelError> {
        if pline.vertex_count() < 2 {
            return Err(KernelError::InsufficientVertexes {
                count: pline.vertex_count(),
                required: 2,
            });
        }

        if !pline.is_closed() {
            return Err(KernelError::OpenPolyline);
        }

        let clockwise = pline.area() < T::zero();
        let indexed = IndexedPolyline::new(pline)?;
        if clockwise {
            self.cw_plines.push(indexed);
        } else {
            self.ccw_plines.push(indexed);
        }

        Ok(())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ccw_plines.is_empty() && self.cw_plines.is_empty()
    }

    #[inline]
    pub fn ccw_count(&self) -> usize {
        self.ccw_plines.len()
    }

    #[inline]
    pub fn cw_count(&self) -> usize {
        self.cw_plines.len()
    }

    fn contour(
        plines: &[IndexedPolyline<T>],
        orientation: PlineOrientation,
        index: usize,
    ) -> Result<&IndexedPolyline<T>, KernelError> {
        plines
            .get(index)
            .ok_or(KernelError::ContourIndexOutOfBounds {
                orientation,
                index,
                len: plines.len(),
            })
    }

    fn contour_mut(
        plines: &mut [IndexedPolyline<T>],
        orientation: PlineOrientation,
        index: usize,
    ) -> Result<&mut IndexedPolyline<T>, KernelError> {
        let len = plines.len();
        plines
            .get_mut(index)
            .ok_or(KernelError::ContourIndexOutOfBounds {
                orientation,
                index,
                len,
            })
    }

    pub fn ccw_pline(&self, index: usize) -> Result<&Polyline<T>, KernelError> {
        Self::contour(&self.ccw_plines, PlineOrientation::CounterClockwise, index).map(|c| c.polyline())
    }

    pub fn cw_pline(&self, index: usize) -> Result<&Polyline<T>, KernelError> {
        Self::contour(&self.cw_plines, PlineOrientation::Clockwise, index).map(|c| c.polyline())
    }

    pub fn ccw_userdata(&self, index: usize) -> Result<&[u64], KernelError> {
        self.ccw_pline(index).map(|p| p.userdata())
    }

    pub fn cw_userdata(&self, index: usize) -> Result<&[u64], KernelError> {
        self.cw_pline(index).map(|p| p.userdata())
    }

    pub fn set_ccw_userdata(&mut self, index: usize, userdata: Vec<u64>) -> Result<(), KernelError> {
        let c = Self::contour_mut(&mut self.ccw_plines, PlineOrientation::CounterClockwise, index)?;
        c.polyline.set_userdata(userdata);
        Ok(())
    }

    pub fn set_cw_userdata(&mut self, index: usize, userdata: Vec<u64>) -> Result<(), KernelError> {
        let c = Self::contour_mut(&mut self.cw_plines, PlineOrientation::Clockwise, index)?;
        c.polyline.set_userdata(userdata);
        Ok(())
    }

    /// Counter clockwise (outer) contours.
    pub fn ccw_plines(&self) -> impl Iterator<Item = &Polyline<T>> + '_ {
        self.ccw_plines.iter().map(|c| c.polyline())
    }

    /// Clockwise (hole) contours.
    pub fn cw_plines(&self) -> impl Iterator<Item = &Polyline<T>> + '_ {
        self.cw_plines.iter().map(|c| c.polyline())
    }

    /// All contours, counter clockwise first.
    fn all_contours(&self) -> impl Iterator<Item = &IndexedPolyline<T>> + '_ {
        self.ccw_plines.iter().chain(self.cw_plines.iter())
    }

    /// Parallel offset the whole shape. Positive `offset` grows the filled region: outer contours
    /// move outward and holes shrink.
    ///
    /// Every contour is offset on its own, then offset loops that cross each other are sliced at
    /// their intersects and the slices that stay `|offset|` away from every input contour are
    /// stitched into the result contours.
    pub fn parallel_offset(
        &self,
        offset: T,
        options: &ShapeOffsetOptions<T>,
    ) -> Result<Self, KernelError> {
        let pos_equal_eps = options.pos_equal_eps;

        let mut loops = Vec::new();
        for (parent, contour) in self.all_contours().enumerate() {
            let parent_is_ccw = parent < self.ccw_plines.len();
            for offset_pline in contour.offset_for_shape(offset, options)? {
                let area = offset_pline.area();
                // orientation flipped from the inward collapse of a narrow contour
                if (parent_is_ccw && offset < T::zero() && area < T::zero())
                    || (!parent_is_ccw && offset > T::zero() && area > T::zero())
                {
                    continue;
                }

                loops.push(OffsetLoop {
                    parent,
                    indexed_pline: IndexedPolyline::new(offset_pline)?,
                });
            }
        }

        if loops.is_empty() {
            tracing::debug!(contours = self.ccw_count() + self.cw_count(), "shape offset is empty");
            return Ok(Self::empty());
        }

        let loops_index = {
            let mut builder = StaticAABB2DIndexBuilder::new(loops.len());
            for l in loops.iter() {
                let bb = l.indexed_pline.spatial_index.extents();
                builder.add(bb.min_x, bb.min_y, bb.max_x, bb.max_y);
            }
            builder.build()?
        };

        let split_points = self.loop_split_points(&loops, &loops_index, pos_equal_eps)?;

        let mut result = Self::empty();
        let mut slices: Vec<PlineSlice<T>> = Vec::new();
        let mut query_stack = Vec::with_capacity(8);

        for (loop_idx, (l, points)) in loops.iter().zip(split_points.into_iter()).enumerate() {
            let pline = &l.indexed_pline.polyline;
            if points.is_empty() {
                // an unsliced loop may still sit inside the offset of another contour
                if self.slice_is_valid(pline, l.parent, offset, options, &mut query_stack) {
                    result.add_offset_pline(pline.clone(), l.parent, &self.all_contours_userdata())?;
                }
                continue;
            }

            let sorted = sort_split_points(pline, points, pos_equal_eps);
            slices.extend(
                create_slices(pline, &sorted, loop_idx, pos_equal_eps)
                    .into_iter()
                    .filter(|s| self.slice_is_valid(&s.pline, l.parent, offset, options, &mut query_stack)),
            );
        }

        let stitched = stitch_slices(&slices, options.slice_join_eps, |current, c| {
            let same_source = c.slice.source == current.source;
            let dist = if same_source {
                let n = loops[current.source].indexed_pline.polyline.vertex_count();
                if c.slice.start_index >= current.end_index {
                    c.slice.start_index - current.end_index
                } else {
                    n - current.end_index + c.slice.start_index
                }
            } else {
                0
            };
            (!same_source, dist, !c.closes, c.slice_index)
        })?;

        let stitched_count = stitched.len();
        let userdata = self.all_contours_userdata();
        for s in stitched.into_iter() {
            if !s.pline.is_closed() {
                tracing::debug!(
                    vertex_count = s.pline.vertex_count(),
                    "dropping open fragment of shape offset"
                );
                continue;
            }

            let pline = s.pline.remove_repeat_positions(pos_equal_eps).into_owned();
            if pline.vertex_count() < 2 || pline.area().fuzzy_eq_zero_eps(pos_equal_eps) {
                continue;
            }

            result.add_offset_pline(pline, loops[s.source].parent, &userdata)?;
        }

        tracing::debug!(
            offset_loops = loops.len(),
            slices = slices.len(),
            stitched = stitched_count,
            ccw_count = result.ccw_count(),
            cw_count = result.cw_count(),
            "shape parallel offset"
        );

        Ok(result)
    }

    fn all_contours_userdata(&self) -> Vec<&[u64]> {
        self.all_contours().map(|c| c.polyline.userdata()).collect()
    }

    fn add_offset_pline(
        &mut self,
        mut pline: Polyline<T>,
        parent: usize,
        userdata: &[&[u64]],
    ) -> Result<(), KernelError> {
        if let Some(u) = userdata.get(parent) {
            pline.set_userdata(u.to_vec());
        }
        self.add_pline(pline)
    }

    /// Split points for every offset loop from its intersects with the other loops.
    fn loop_split_points(
        &self,
        loops: &[OffsetLoop<T>],
        loops_index: &StaticAABB2DIndex<T>,
        pos_equal_eps: T,
    ) -> Result<Vec<Vec<SplitPoint<T>>>, KernelError> {
        let mut split_points: Vec<Vec<SplitPoint<T>>> = (0..loops.len()).map(|_| Vec::new()).collect();
        let mut query_stack = Vec::with_capacity(8);

        for (i, loop1) in loops.iter().enumerate() {
            let bb = loop1.indexed_pline.spatial_index.extents();
            let candidates =
                loops_index.query_with_stack(bb.min_x, bb.min_y, bb.max_x, bb.max_y, &mut query_stack);

            // each pair once
            for j in candidates.into_iter().filter(|&j| j > i) {
                let loop2 = &loops[j];
                let intrs = find_intersects(
                    &loop1.indexed_pline.polyline,
                    &loop2.indexed_pline.polyline,
                    &FindIntersectsOptions {
                        pline1_index: IndexSource::Provided(&loop1.indexed_pline.spatial_index),
                        pos_equal_eps,
                    },
                )?;

                for intr in intrs.basic_intersects.iter() {
                    split_points[i].push(SplitPoint::new(intr.start_index1, intr.point));
                    split_points[j].push(SplitPoint::new(intr.start_index2, intr.point));
                }
                for intr in intrs.overlapping_intersects.iter() {
                    for p in [intr.point1, intr.point2] {
                        split_points[i].push(SplitPoint::new(intr.start_index1, p));
                        split_points[j].push(SplitPoint::new(intr.start_index2, p));
                    }
                }
            }
        }

        Ok(split_points)
    }

    /// A slice of the offset of contour `parent` is valid when it keeps the offset distance from
    /// (and does not cross) every other input contour.
    fn slice_is_valid(
        &self,
        slice: &Polyline<T>,
        parent: usize,
        offset: T,
        options: &ShapeOffsetOptions<T>,
        query_stack: &mut Vec<usize>,
    ) -> bool {
        self.all_contours()
            .enumerate()
            .filter(|(i, _)| *i != parent)
            .all(|(_, c)| {
                slice_points_valid(
                    slice,
                    &c.polyline,
                    &c.spatial_index,
                    offset,
                    options.offset_dist_eps,
                    query_stack,
                ) && !slice_intersects_original(
                    slice,
                    &c.polyline,
                    &c.spatial_index,
                    options.pos_equal_eps,
                    query_stack,
                )
            })
    }
}
