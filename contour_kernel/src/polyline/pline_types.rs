//! Supporting public types used by the polyline operations.

use super::{Polyline, SpatialIndex};
use crate::core::{
    math::Vector2,
    traits::Real,
    ControlFlow,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Orientation of a polyline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlineOrientation {
    /// Polyline is open.
    Open,
    /// Polyline is closed and directionally clockwise.
    Clockwise,
    /// Polyline is closed and directionally counter clockwise.
    CounterClockwise,
}

/// Result from calling [Polyline::closest_point].
#[derive(Debug, Copy, Clone)]
pub struct ClosestPointResult<T>
where
    T: Real,
{
    /// The start vertex index of the closest segment.
    pub seg_start_index: usize,
    /// The closest point on the closest segment.
    pub seg_point: Vector2<T>,
    /// The distance between the points.
    pub distance: T,
}

/// Where an operation gets the spatial index of its input polyline from.
#[derive(Debug, Copy, Clone, Default)]
pub enum IndexSource<'a, T>
where
    T: Real,
{
    /// Build an approximate index internally.
    #[default]
    Build,
    /// Use an index the caller already built for the polyline. It must have been built from the
    /// same vertexes (boxes at least as large as the segments).
    Provided(&'a SpatialIndex<T>),
}

/// Boolean operation to apply to polylines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BooleanOp {
    /// Union of the polylines.
    Or,
    /// Intersection of the polylines.
    And,
    /// Exclusion of the second polyline from the first.
    Not,
    /// Exclusive OR between polylines.
    Xor,
}

/// Describes how the two boolean operands were related.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanResultInfo {
    /// At least one operand has fewer than 2 vertexes or no area.
    EmptyOperand,
    /// No intersects and the first polyline lies inside the second.
    Pline1InsidePline2,
    /// No intersects and the second polyline lies inside the first.
    Pline2InsidePline1,
    /// No intersects and neither polyline contains the other.
    Disjoint,
    /// Every slice of both polylines is coincident with the other polyline.
    Overlapping,
    /// Polylines intersect and were sliced and stitched.
    Intersected,
}

/// Result of a boolean operation between two closed polylines.
#[derive(Debug, Clone)]
pub struct BooleanResult<T = f64>
where
    T: Real,
{
    /// Counter clockwise result polylines (islands).
    pub pos_plines: Vec<Polyline<T>>,
    /// Clockwise result polylines (holes in the islands).
    pub neg_plines: Vec<Polyline<T>>,
    pub result_info: BooleanResultInfo,
}

impl<T> BooleanResult<T>
where
    T: Real,
{
    #[inline]
    pub fn new(
        pos_plines: Vec<Polyline<T>>,
        neg_plines: Vec<Polyline<T>>,
        result_info: BooleanResultInfo,
    ) -> Self {
        Self {
            pos_plines,
            neg_plines,
            result_info,
        }
    }

    #[inline]
    pub fn empty(result_info: BooleanResultInfo) -> Self {
        Self::new(Vec::new(), Vec::new(), result_info)
    }
}

/// Options for [Polyline::boolean_opt].
#[derive(Debug, Clone)]
pub struct BooleanOptions<'a, T>
where
    T: Real,
{
    /// Spatial index for the first polyline argument (`self`).
    pub pline1_index: IndexSource<'a, T>,
    /// Fuzzy comparison epsilon used for determining if two positions are equal.
    pub pos_equal_eps: T,
    /// Results and operands with an absolute area below this are treated as empty.
    pub collapsed_area_eps: T,
}

impl<'a, T> BooleanOptions<'a, T>
where
    T: Real,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            pline1_index: IndexSource::Build,
            pos_equal_eps: T::from_f64_lit(1e-5),
            collapsed_area_eps: T::from_f64_lit(1e-5),
        }
    }
}

impl<'a, T> Default for BooleanOptions<'a, T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Options for [Polyline::parallel_offset_opt].
#[derive(Debug, Clone)]
pub struct OffsetOptions<'a, T>
where
    T: Real,
{
    /// Spatial index of the polyline being offset.
    pub index: IndexSource<'a, T>,
    /// Fuzzy comparison epsilon used for determining if two positions are equal.
    pub pos_equal_eps: T,
    /// Epsilon used for joining slice end points when stitching.
    pub slice_join_eps: T,
    /// Epsilon used when testing the distance of slices to the original polyline.
    pub offset_dist_eps: T,
    /// Also slice at intersects with the dual (opposite sign) raw offset, required for the offset
    /// of a self intersecting closed polyline to be correct.
    pub handle_self_intersects: bool,
}

impl<'a, T> OffsetOptions<'a, T>
where
    T: Real,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            index: IndexSource::Build,
            pos_equal_eps: T::from_f64_lit(1e-5),
            slice_join_eps: T::from_f64_lit(1e-5),
            offset_dist_eps: T::from_f64_lit(1e-5),
            handle_self_intersects: true,
        }
    }
}

impl<'a, T> Default for OffsetOptions<'a, T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Options for [Polyline::find_intersects].
#[derive(Debug, Clone)]
pub struct FindIntersectsOptions<'a, T>
where
    T: Real,
{
    /// Spatial index for the first polyline.
    pub pline1_index: IndexSource<'a, T>,
    /// Fuzzy comparison epsilon used for determining if two positions are equal.
    pub pos_equal_eps: T,
}

impl<'a, T> FindIntersectsOptions<'a, T>
where
    T: Real,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            pline1_index: IndexSource::Build,
            pos_equal_eps: T::from_f64_lit(1e-5),
        }
    }
}

impl<'a, T> Default for FindIntersectsOptions<'a, T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Single point intersect between a segment of the first polyline and a segment of the second
/// (the same polyline for self intersects).
#[derive(Debug, Copy, Clone)]
pub struct BasicIntersect<T> {
    /// Start vertex index of the first polyline segment.
    pub start_index1: usize,
    /// Start vertex index of the second polyline segment.
    pub start_index2: usize,
    pub point: Vector2<T>,
}

impl<T> BasicIntersect<T> {
    #[inline]
    pub fn new(start_index1: usize, start_index2: usize, point: Vector2<T>) -> Self {
        Self {
            start_index1,
            start_index2,
            point,
        }
    }
}

/// Two segments that overlap along an interval, `point1` and `point2` are ordered along the first
/// segment.
#[derive(Debug, Copy, Clone)]
pub struct OverlappingIntersect<T> {
    pub start_index1: usize,
    pub start_index2: usize,
    pub point1: Vector2<T>,
    pub point2: Vector2<T>,
}

impl<T> OverlappingIntersect<T> {
    #[inline]
    pub fn new(
        start_index1: usize,
        start_index2: usize,
        point1: Vector2<T>,
        point2: Vector2<T>,
    ) -> Self {
        Self {
            start_index1,
            start_index2,
            point1,
            point2,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub enum PlineIntersect<T> {
    Basic(BasicIntersect<T>),
    Overlapping(OverlappingIntersect<T>),
}

/// Collection of basic and overlapping polyline intersects.
#[derive(Debug, Clone, Default)]
pub struct IntersectsCollection<T> {
    pub basic_intersects: Vec<BasicIntersect<T>>,
    pub overlapping_intersects: Vec<OverlappingIntersect<T>>,
}

impl<T> IntersectsCollection<T> {
    #[inline]
    pub fn new(
        basic_intersects: Vec<BasicIntersect<T>>,
        overlapping_intersects: Vec<OverlappingIntersect<T>>,
    ) -> Self {
        Self {
            basic_intersects,
            overlapping_intersects,
        }
    }

    #[inline]
    pub fn new_empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.basic_intersects.is_empty() && self.overlapping_intersects.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.basic_intersects.len() + self.overlapping_intersects.len()
    }
}

/// Visitor of polyline intersects, closures taking a [PlineIntersect] implement it.
pub trait PlineIntersectVisitor<T, C>
where
    C: ControlFlow,
{
    fn visit_basic_intr(&mut self, intr: BasicIntersect<T>) -> C;
    fn visit_overlapping_intr(&mut self, intr: OverlappingIntersect<T>) -> C;
}

impl<T, C, F> PlineIntersectVisitor<T, C> for F
where
    C: ControlFlow,
    F: FnMut(PlineIntersect<T>) -> C,
{
    #[inline]
    fn visit_basic_intr(&mut self, intr: BasicIntersect<T>) -> C {
        self(PlineIntersect::Basic(intr))
    }

    #[inline]
    fn visit_overlapping_intr(&mut self, intr: OverlappingIntersect<T>) -> C {
        self(PlineIntersect::Overlapping(intr))
    }
}
