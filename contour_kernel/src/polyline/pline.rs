use super::{
    internal::{
        pline_boolean::polyline_boolean,
        pline_intersects::{find_intersects, visit_global_self_intersects, visit_local_self_intersects},
        pline_offset::parallel_offset,
    },
    seg_arc_radius_and_center, seg_bounding_box, seg_closest_point, seg_length, seg_sweep_angle,
    BooleanOp, BooleanOptions, BooleanResult, ClosestPointResult, FindIntersectsOptions,
    IntersectsCollection, OffsetOptions, PlineIntersect, PlineIntersectVisitor, PlineOrientation,
    PlineVertex, SpatialIndex,
};
use crate::{
    core::{
        math::{
            bulge_from_angle, dist_squared, fmax, fmin, is_left, is_left_or_equal, orient2d, Vector2,
        },
        traits::Real,
        Control, ControlFlow,
    },
    error::KernelError,
};
use static_aabb2d_index::AABB;
use std::{
    borrow::Cow,
    ops::{Index, IndexMut},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Polyline made of line and arc segments.
///
/// Each vertex holds the bulge of the segment that starts at it. A closed polyline has an implicit
/// segment from the last vertex back to the first, for an open polyline the last vertex bulge is
/// unused. `userdata` is carried through transforms and inherited by operation results.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Polyline<T = f64> {
    vertexes: Vec<PlineVertex<T>>,
    is_closed: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    userdata: Vec<u64>,
}

impl<T> Polyline<T>
where
    T: Real,
{
    /// Create a new empty open polyline.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0, false)
    }

    #[inline]
    pub fn with_capacity(capacity: usize, is_closed: bool) -> Self {
        Polyline {
            vertexes: Vec::with_capacity(capacity),
            is_closed,
            userdata: Vec::new(),
        }
    }

    pub fn from_vertexes<I>(vertexes: I, is_closed: bool) -> Self
    where
        I: IntoIterator<Item = PlineVertex<T>>,
    {
        Polyline {
            vertexes: vertexes.into_iter().collect(),
            is_closed,
            userdata: Vec::new(),
        }
    }

    /// Create from a flat buffer of `[x0, y0, bulge0, x1, y1, bulge1, ...]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use contour_kernel::polyline::*;
    /// let pline = Polyline::from_flat_buffer(&[0.0, 0.0, 1.0, 2.0, 0.0, 1.0], true).unwrap();
    /// assert_eq!(pline.vertex_count(), 2);
    /// assert_eq!(pline[1], PlineVertex::new(2.0, 0.0, 1.0));
    /// assert!(Polyline::from_flat_buffer(&[0.0, 0.0], false).is_err());
    /// ```
    pub fn from_flat_buffer(buffer: &[T], is_closed: bool) -> Result<Self, KernelError> {
        if buffer.len() % 3 != 0 {
            return Err(KernelError::InvalidVertexBuffer { len: buffer.len() });
        }

        Ok(Self::from_vertexes(
            buffer.chunks_exact(3).filter_map(PlineVertex::from_slice),
            is_closed,
        ))
    }

    /// Write all vertexes into `buffer` as `(x, y, bulge)` triples, `buffer` must have a length of
    /// exactly `3 * vertex_count()`.
    pub fn copy_to_flat_buffer(&self, buffer: &mut [T]) -> Result<(), KernelError> {
        if buffer.len() != 3 * self.vertexes.len() {
            return Err(KernelError::InvalidVertexBuffer { len: buffer.len() });
        }

        for (chunk, v) in buffer.chunks_exact_mut(3).zip(self.vertexes.iter()) {
            chunk[0] = v.x;
            chunk[1] = v.y;
            chunk[2] = v.bulge;
        }

        Ok(())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertexes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertexes.is_empty()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    #[inline]
    pub fn set_is_closed(&mut self, is_closed: bool) {
        self.is_closed = is_closed;
    }

    #[inline]
    pub fn userdata(&self) -> &[u64] {
        &self.userdata
    }

    #[inline]
    pub fn set_userdata(&mut self, userdata: Vec<u64>) {
        self.userdata = userdata;
    }

    /// Add a vertex to the end of the polyline.
    #[inline]
    pub fn add(&mut self, x: T, y: T, bulge: T) {
        self.vertexes.push(PlineVertex::new(x, y, bulge));
    }

    #[inline]
    pub fn add_vertex(&mut self, vertex: PlineVertex<T>) {
        self.vertexes.push(vertex);
    }

    #[inline]
    pub fn last(&self) -> Option<&PlineVertex<T>> {
        self.vertexes.last()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.vertexes.clear();
    }

    #[inline]
    pub fn vertexes(&self) -> &[PlineVertex<T>] {
        &self.vertexes
    }

    /// Replace all vertexes (closed state and userdata are kept).
    #[inline]
    pub fn set_vertexes(&mut self, vertexes: Vec<PlineVertex<T>>) {
        self.vertexes = vertexes;
    }

    fn check_index(&self, index: usize) -> Result<(), KernelError> {
        if index >= self.vertexes.len() {
            return Err(KernelError::VertexIndexOutOfBounds {
                index,
                len: self.vertexes.len(),
            });
        }

        Ok(())
    }

    pub fn vertex(&self, index: usize) -> Result<PlineVertex<T>, KernelError> {
        self.check_index(index)?;
        Ok(self.vertexes[index])
    }

    pub fn set_vertex(&mut self, index: usize, vertex: PlineVertex<T>) -> Result<(), KernelError> {
        self.check_index(index)?;
        self.vertexes[index] = vertex;
        Ok(())
    }

    /// Insert `vertex` at `index`, shifting later vertexes. `index == vertex_count()` appends.
    pub fn insert_vertex(&mut self, index: usize, vertex: PlineVertex<T>) -> Result<(), KernelError> {
        if index > self.vertexes.len() {
            return Err(KernelError::VertexIndexOutOfBounds {
                index,
                len: self.vertexes.len(),
            });
        }

        self.vertexes.insert(index, vertex);
        Ok(())
    }

    pub fn remove_vertex(&mut self, index: usize) -> Result<PlineVertex<T>, KernelError> {
        self.check_index(index)?;
        Ok(self.vertexes.remove(index))
    }

    /// Iterate over the vertexes, the iterator can be cloned to restart.
    #[inline]
    pub fn iter_vertexes(&self) -> std::iter::Copied<std::slice::Iter<'_, PlineVertex<T>>> {
        self.vertexes.iter().copied()
    }

    /// Number of segments, includes the closing segment when closed.
    #[inline]
    pub fn segment_count(&self) -> usize {
        let n = self.vertexes.len();
        if n < 2 {
            0
        } else if self.is_closed {
            n
        } else {
            n - 1
        }
    }

    /// Iterate over segment `(start index, end index)` pairs.
    #[inline]
    pub fn iter_segment_indexes(&self) -> impl Iterator<Item = (usize, usize)> + Clone + '_ {
        let n = self.vertexes.len();
        (0..self.segment_count()).map(move |i| (i, if i + 1 == n { 0 } else { i + 1 }))
    }

    /// Iterate over segments as `(start vertex, end vertex)` pairs.
    #[inline]
    pub fn iter_segments(
        &self,
    ) -> impl Iterator<Item = (PlineVertex<T>, PlineVertex<T>)> + Clone + '_ {
        self.iter_segment_indexes()
            .map(move |(i, j)| (self.vertexes[i], self.vertexes[j]))
    }

    /// Next index wrapping back to 0 after the last vertex.
    #[inline]
    pub fn next_wrapping_index(&self, i: usize) -> usize {
        let next = i + 1;
        if next >= self.vertexes.len() {
            0
        } else {
            next
        }
    }

    /// Previous index wrapping to the last vertex before 0.
    #[inline]
    pub fn prev_wrapping_index(&self, i: usize) -> usize {
        if i == 0 {
            self.vertexes.len().saturating_sub(1)
        } else {
            i - 1
        }
    }

    /// Total length of all segments.
    pub fn path_length(&self) -> T {
        self.iter_segments()
            .fold(T::zero(), |acc, (v1, v2)| acc + seg_length(v1, v2))
    }

    /// Signed area, positive when counter clockwise. For an open polyline this is the area
    /// enclosed by its segments and the implicit chord from the last vertex back to the first.
    ///
    /// # Examples
    ///
    /// ```
    /// # use contour_kernel::polyline::*;
    /// # use contour_kernel::core::traits::*;
    /// // unit circle from two half circle arcs
    /// let pline = Polyline::from_vertexes(
    ///     [PlineVertex::new(1.0, 0.0, 1.0), PlineVertex::new(-1.0, 0.0, 1.0)],
    ///     true,
    /// );
    /// assert!(pline.area().fuzzy_eq(std::f64::consts::PI));
    /// ```
    pub fn area(&self) -> T {
        if self.vertexes.len() < 2 {
            return T::zero();
        }

        let mut double_chord_area = T::zero();
        let mut arc_area = T::zero();
        for (v1, v2) in self.iter_segments() {
            double_chord_area = double_chord_area + v1.x * v2.y - v2.x * v1.y;
            if !v1.bulge_is_zero() && v1.pos() != v2.pos() {
                let (r, _) = seg_arc_radius_and_center(v1, v2);
                let sweep = seg_sweep_angle(v1);
                let theta = sweep.abs();
                let segment_area = r * r * (theta - theta.sin()) / T::two();
                if sweep < T::zero() {
                    arc_area = arc_area - segment_area;
                } else {
                    arc_area = arc_area + segment_area;
                }
            }
        }

        if !self.is_closed {
            let first = self.vertexes[0];
            let last = self.vertexes[self.vertexes.len() - 1];
            double_chord_area = double_chord_area + last.x * first.y - first.x * last.y;
        }

        double_chord_area / T::two() + arc_area
    }

    /// Winding number of `point` relative to the polyline, 0 when outside (or open), otherwise
    /// positive for counter clockwise and negative for clockwise. Points exactly on the boundary
    /// may return either value.
    pub fn winding_number(&self, point: Vector2<T>) -> i32 {
        if !self.is_closed || self.vertexes.len() < 2 {
            return 0;
        }

        self.iter_segments()
            .map(|(v1, v2)| {
                if v1.bulge_is_zero() || v1.pos() == v2.pos() {
                    line_winding(v1.pos(), v2.pos(), point)
                } else {
                    arc_winding(v1, v2, point)
                }
            })
            .sum()
    }

    /// Exact bounding box of the polyline including arc bulges.
    pub fn extents(&self) -> Result<AABB<T>, KernelError> {
        if self.vertexes.len() < 2 {
            return Err(KernelError::InsufficientVertexes {
                count: self.vertexes.len(),
                required: 2,
            });
        }

        let first = self.vertexes[0];
        let init = AABB::new(first.x, first.y, first.x, first.y);
        Ok(self.iter_segments().fold(init, |acc, (v1, v2)| {
            let bb = seg_bounding_box(v1, v2);
            AABB::new(
                fmin(acc.min_x, bb.min_x),
                fmin(acc.min_y, bb.min_y),
                fmax(acc.max_x, bb.max_x),
                fmax(acc.max_y, bb.max_y),
            )
        }))
    }

    pub fn orientation(&self) -> PlineOrientation {
        if !self.is_closed {
            return PlineOrientation::Open;
        }

        if self.area() < T::zero() {
            PlineOrientation::Clockwise
        } else {
            PlineOrientation::CounterClockwise
        }
    }

    /// Closest point on the polyline to `point`, `None` if the polyline has no vertexes. Stops
    /// searching once a segment within `pos_equal_eps` is found.
    pub fn closest_point(&self, point: Vector2<T>, pos_equal_eps: T) -> Option<ClosestPointResult<T>> {
        let first = *self.vertexes.first()?;
        let mut result = ClosestPointResult {
            seg_start_index: 0,
            seg_point: first.pos(),
            distance: (first.pos() - point).length(),
        };

        for (i, j) in self.iter_segment_indexes() {
            if result.distance < pos_equal_eps {
                break;
            }

            let cp = seg_closest_point(self.vertexes[i], self.vertexes[j], point);
            let dist = (cp - point).length();
            if dist < result.distance {
                result = ClosestPointResult {
                    seg_start_index: i,
                    seg_point: cp,
                    distance: dist,
                };
            }
        }

        Some(result)
    }

    /// Reverse the direction of the polyline, applying twice restores the exact original.
    pub fn invert_direction(&mut self) {
        let n = self.vertexes.len();
        if n < 2 {
            return;
        }

        self.vertexes.reverse();
        // each bulge moves to the new start of the segment it belongs to
        let first_bulge = self.vertexes[0].bulge;
        for i in 0..n - 1 {
            self.vertexes[i].bulge = -self.vertexes[i + 1].bulge;
        }
        self.vertexes[n - 1].bulge = -first_bulge;
    }

    /// Uniformly scale positions about the origin (bulges unchanged).
    pub fn scale(&mut self, factor: T) {
        for v in self.vertexes.iter_mut() {
            v.x = v.x * factor;
            v.y = v.y * factor;
        }
    }

    pub fn translate(&mut self, dx: T, dy: T) {
        for v in self.vertexes.iter_mut() {
            v.x = v.x + dx;
            v.y = v.y + dy;
        }
    }

    fn with_same_props(&self, vertexes: Vec<PlineVertex<T>>) -> Self {
        Polyline {
            vertexes,
            is_closed: self.is_closed,
            userdata: self.userdata.clone(),
        }
    }

    /// Remove consecutive vertexes within `pos_equal_eps` of each other (and the last vertex if it
    /// repeats the first of a closed polyline). The first position of a repeated run is kept with
    /// the bulge of the last vertex in the run.
    pub fn remove_repeat_positions(&self, pos_equal_eps: T) -> Cow<'_, Self> {
        let n = self.vertexes.len();
        if n < 2 {
            return Cow::Borrowed(self);
        }

        let repeats = |a: &PlineVertex<T>, b: &PlineVertex<T>| a.pos().fuzzy_eq_eps(b.pos(), pos_equal_eps);
        let any_repeat = self.vertexes.windows(2).any(|w| repeats(&w[0], &w[1]))
            || (self.is_closed && repeats(&self.vertexes[n - 1], &self.vertexes[0]));
        if !any_repeat {
            return Cow::Borrowed(self);
        }

        let mut result: Vec<PlineVertex<T>> = Vec::with_capacity(n);
        for v in self.vertexes.iter() {
            match result.last_mut() {
                Some(last) if repeats(last, v) => last.bulge = v.bulge,
                _ => result.push(*v),
            }
        }

        if self.is_closed {
            while result.len() > 1 && repeats(&result[result.len() - 1], &result[0]) {
                result.pop();
            }
        }

        Cow::Owned(self.with_same_props(result))
    }

    /// Remove vertexes that do not change the path: a vertex between two collinear lines running
    /// the same direction, or between two arcs on the same circle turning the same way whose
    /// combined sweep is no more than π. Repeat positions are removed first.
    pub fn remove_redundant(&self, pos_equal_eps: T) -> Cow<'_, Self> {
        let pline = self.remove_repeat_positions(pos_equal_eps);
        let n = pline.vertex_count();
        if n < 3 {
            return pline;
        }

        let mut out: Vec<PlineVertex<T>> = Vec::with_capacity(n);
        for &v in pline.vertexes.iter() {
            out.push(v);
            while out.len() >= 3 {
                let k = out.len();
                match merged_bulge(out[k - 3], out[k - 2], out[k - 1], pos_equal_eps) {
                    Some(b) => {
                        out[k - 3].bulge = b;
                        out.remove(k - 2);
                    }
                    None => break,
                }
            }
        }

        if pline.is_closed {
            loop {
                let k = out.len();
                if k < 3 {
                    break;
                }

                if let Some(b) = merged_bulge(out[k - 2], out[k - 1], out[0], pos_equal_eps) {
                    out[k - 2].bulge = b;
                    out.pop();
                    continue;
                }

                if let Some(b) = merged_bulge(out[k - 1], out[0], out[1], pos_equal_eps) {
                    out[k - 1].bulge = b;
                    out.remove(0);
                    continue;
                }

                break;
            }
        }

        if out.len() == n {
            return pline;
        }

        Cow::Owned(pline.with_same_props(out))
    }

    /// Create a spatial index of the segments, see [SpatialIndex::build].
    #[inline]
    pub fn create_index(&self, exact: bool) -> Result<SpatialIndex<T>, KernelError> {
        SpatialIndex::build(self, exact)
    }

    #[inline]
    pub fn create_approx_index(&self) -> Result<SpatialIndex<T>, KernelError> {
        SpatialIndex::build(self, false)
    }

    #[inline]
    pub fn create_exact_index(&self) -> Result<SpatialIndex<T>, KernelError> {
        SpatialIndex::build(self, true)
    }

    /// Find all intersects between `self` and `other`.
    pub fn find_intersects(
        &self,
        other: &Polyline<T>,
        options: &FindIntersectsOptions<T>,
    ) -> Result<IntersectsCollection<T>, KernelError> {
        find_intersects(self, other, options)
    }

    /// Visit all local and global self intersects. `index` must be built from this polyline.
    pub fn visit_self_intersects<C, V>(
        &self,
        index: &SpatialIndex<T>,
        pos_equal_eps: T,
        visitor: &mut V,
    ) -> Result<C, KernelError>
    where
        C: ControlFlow,
        V: PlineIntersectVisitor<T, C>,
    {
        index.check_segment_count(self.segment_count())?;
        let local = visit_local_self_intersects(self, visitor, pos_equal_eps);
        if local.should_break() {
            return Ok(local);
        }

        Ok(visit_global_self_intersects(self, index, visitor, pos_equal_eps))
    }

    /// Collect all local and global self intersects.
    pub fn find_self_intersects(
        &self,
        index: &SpatialIndex<T>,
        pos_equal_eps: T,
    ) -> Result<IntersectsCollection<T>, KernelError> {
        let mut result = IntersectsCollection::new_empty();
        let mut visitor = |intr: PlineIntersect<T>| match intr {
            PlineIntersect::Basic(b) => result.basic_intersects.push(b),
            PlineIntersect::Overlapping(o) => result.overlapping_intersects.push(o),
        };
        self.visit_self_intersects::<(), _>(index, pos_equal_eps, &mut visitor)?;
        Ok(result)
    }

    /// True if the polyline has any self intersect, stopping at the first one found.
    ///
    /// # Examples
    ///
    /// ```
    /// # use contour_kernel::polyline::*;
    /// let figure_eight = Polyline::from_vertexes(
    ///     [
    ///         PlineVertex::new(0.0, 0.0, 0.0),
    ///         PlineVertex::new(2.0, 2.0, 0.0),
    ///         PlineVertex::new(2.0, 0.0, 0.0),
    ///         PlineVertex::new(0.0, 2.0, 0.0),
    ///     ],
    ///     true,
    /// );
    /// assert!(figure_eight.scan_for_self_intersect(1e-5).unwrap());
    /// ```
    pub fn scan_for_self_intersect(&self, pos_equal_eps: T) -> Result<bool, KernelError> {
        if self.vertexes.len() < 2 {
            return Ok(false);
        }

        let index = self.create_approx_index()?;
        let mut visitor = |_: PlineIntersect<T>| Control::Break(());
        let cf = self.visit_self_intersects(&index, pos_equal_eps, &mut visitor)?;
        Ok(cf.should_break())
    }

    /// Boolean operation with default options.
    pub fn boolean(&self, other: &Polyline<T>, op: BooleanOp) -> Result<BooleanResult<T>, KernelError> {
        self.boolean_opt(other, op, &BooleanOptions::new())
    }

    /// Boolean operation between `self` and `other`, both must be closed unless empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use contour_kernel::polyline::*;
    /// # use contour_kernel::core::traits::*;
    /// let square = |x: f64, y: f64| {
    ///     Polyline::from_vertexes(
    ///         [
    ///             PlineVertex::new(x, y, 0.0),
    ///             PlineVertex::new(x + 10.0, y, 0.0),
    ///             PlineVertex::new(x + 10.0, y + 10.0, 0.0),
    ///             PlineVertex::new(x, y + 10.0, 0.0),
    ///         ],
    ///         true,
    ///     )
    /// };
    /// let result = square(0.0, 0.0).boolean(&square(5.0, 5.0), BooleanOp::And).unwrap();
    /// assert_eq!(result.pos_plines.len(), 1);
    /// assert!(result.pos_plines[0].area().fuzzy_eq_eps(25.0, 1e-9));
    /// ```
    pub fn boolean_opt(
        &self,
        other: &Polyline<T>,
        op: BooleanOp,
        options: &BooleanOptions<T>,
    ) -> Result<BooleanResult<T>, KernelError> {
        polyline_boolean(self, other, op, options)
    }

    /// Parallel offset with default options. Positive `offset` is to the right of the direction of
    /// travel (outward for counter clockwise polylines).
    pub fn parallel_offset(&self, offset: T) -> Result<Vec<Polyline<T>>, KernelError> {
        self.parallel_offset_opt(offset, &OffsetOptions::new())
    }

    pub fn parallel_offset_opt(
        &self,
        offset: T,
        options: &OffsetOptions<T>,
    ) -> Result<Vec<Polyline<T>>, KernelError> {
        parallel_offset(self, offset, options)
    }
}

/// Bulge of the single segment replacing `a->b->c`, if `b` is redundant.
fn merged_bulge<T>(a: PlineVertex<T>, b: PlineVertex<T>, c: PlineVertex<T>, eps: T) -> Option<T>
where
    T: Real,
{
    if a.bulge_is_zero() && b.bulge_is_zero() {
        let chord = c.pos() - a.pos();
        let chord_len = chord.length();
        if chord_len < eps {
            return None;
        }

        let perp_dist = orient2d(a.pos(), c.pos(), b.pos()).abs() / chord_len;
        let same_dir = (b.pos() - a.pos()).dot(c.pos() - b.pos()) > T::zero();
        return if perp_dist < eps && same_dir {
            Some(T::zero())
        } else {
            None
        };
    }

    if a.bulge_is_zero() || b.bulge_is_zero() || a.bulge_is_pos() != b.bulge_is_pos() {
        return None;
    }

    let (r1, c1) = seg_arc_radius_and_center(a, b);
    let (r2, c2) = seg_arc_radius_and_center(b, c);
    if !c1.fuzzy_eq_eps(c2, eps) || !r1.fuzzy_eq_eps(r2, eps) {
        return None;
    }

    let total = seg_sweep_angle(a) + seg_sweep_angle(b);
    if total.abs().fuzzy_lt(T::pi()) {
        Some(bulge_from_angle(total))
    } else {
        None
    }
}

/// Winding contribution of the line segment `p1 -> p2`.
fn line_winding<T>(p1: Vector2<T>, p2: Vector2<T>, point: Vector2<T>) -> i32
where
    T: Real,
{
    if p1.y <= point.y {
        // upward crossing with point left of the segment
        if p2.y > point.y && is_left(p1, p2, point) {
            return 1;
        }
    } else if p2.y <= point.y && !is_left(p1, p2, point) {
        // downward crossing with point right of (or on) the segment
        return -1;
    }

    0
}

/// Winding contribution of the arc segment `v1 -> v2`.
///
/// Points exactly on the chord are assigned to the side the arc bulges toward (right of the chord
/// for counter clockwise arcs, left for clockwise arcs), so the disc sector between chord and arc
/// is counted even when the point lies on the chord.
fn arc_winding<T>(v1: PlineVertex<T>, v2: PlineVertex<T>, point: Vector2<T>) -> i32
where
    T: Real,
{
    let ccw = v1.bulge_is_pos();
    let (p1, p2) = (v1.pos(), v2.pos());
    let left_of_chord = if ccw {
        is_left(p1, p2, point)
    } else {
        is_left_or_equal(p1, p2, point)
    };
    let in_circle = || {
        let (radius, center) = seg_arc_radius_and_center(v1, v2);
        dist_squared(center, point) < radius * radius
    };
    let between_x = |lo: T, hi: T| lo < point.x && point.x < hi;

    let upward = p1.y <= point.y && p2.y > point.y;
    let downward = p1.y > point.y && p2.y <= point.y;

    match (upward, downward, ccw, left_of_chord) {
        (true, _, true, true) => 1,
        (true, _, true, false) => i32::from(in_circle()),
        (true, _, false, true) => i32::from(!in_circle()),
        (true, _, false, false) => 0,
        (_, true, true, true) => 0,
        (_, true, true, false) => -i32::from(!in_circle()),
        (_, true, false, true) => -i32::from(in_circle()),
        (_, true, false, false) => -1,
        _ => {
            // chord does not span the point's y, only the sector past the chord can hold it
            let chord_below = p1.y <= point.y;
            let (lo, hi) = if chord_below == ccw {
                (p2.x, p1.x)
            } else {
                (p1.x, p2.x)
            };
            if ccw && !left_of_chord && between_x(lo, hi) && in_circle() {
                1
            } else if !ccw && left_of_chord && between_x(lo, hi) && in_circle() {
                -1
            } else {
                0
            }
        }
    }
}

impl<T> Index<usize> for Polyline<T> {
    type Output = PlineVertex<T>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.vertexes[index]
    }
}

impl<T> IndexMut<usize> for Polyline<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.vertexes[index]
    }
}
