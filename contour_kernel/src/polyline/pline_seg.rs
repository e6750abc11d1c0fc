//! Geometry of a single polyline segment, the segment from `v1` to `v2` where `v1.bulge`
//! determines whether it is a line or an arc.
use super::PlineVertex;
use crate::core::{
    math::{
        angle, angle_from_bulge, bulge_from_angle, directed_sweep, dist_squared, fmax, fmin,
        line_seg_closest_point, midpoint, min_max, parametric_from_point, point_on_circle,
        Vector2,
    },
    traits::Real,
};
use static_aabb2d_index::AABB;

/// Radius and center of the arc segment `v1->v2`.
///
/// The center sits on the chord bisector at signed distance `chord_len * (1 - b²) / (4b)` along
/// the counter clockwise chord normal, which covers sweeps above π (|b| > 1) as well.
///
/// # Examples
///
/// ```
/// # use contour_kernel::polyline::*;
/// # use contour_kernel::core::math::*;
/// # use contour_kernel::core::traits::*;
/// // half circle from (1, 0) to (-1, 0) counter clockwise
/// let (r, c) = seg_arc_radius_and_center(PlineVertex::new(1.0, 0.0, 1.0), PlineVertex::new(-1.0, 0.0, 0.0));
/// assert!(r.fuzzy_eq(1.0));
/// assert!(c.fuzzy_eq(Vector2::zero()));
/// ```
#[inline]
pub fn seg_arc_radius_and_center<T>(v1: PlineVertex<T>, v2: PlineVertex<T>) -> (T, Vector2<T>)
where
    T: Real,
{
    debug_assert!(!v1.bulge_is_zero(), "v1 to v2 must be an arc");
    let b = v1.bulge;
    let chord = v2.pos() - v1.pos();
    let chord_len = chord.length();
    let radius = chord_len * (b * b + T::one()) / (T::four() * b.abs());
    let center = midpoint(v1.pos(), v2.pos()) + chord.perp().scale((T::one() - b * b) / (T::four() * b));
    (radius, center)
}

/// Signed sweep angle of the segment starting at `v1`, zero for lines.
#[inline]
pub fn seg_sweep_angle<T>(v1: PlineVertex<T>) -> T
where
    T: Real,
{
    angle_from_bulge(v1.bulge)
}

/// Test if `point` (assumed on the arc's circle) falls within the sweep of the arc that starts at
/// `arc_start` and sweeps `arc_sweep` radians. `epsilon` is a position tolerance converted to an
/// angle using the arc radius.
#[inline]
pub fn point_within_arc_sweep<T>(
    center: Vector2<T>,
    arc_start: Vector2<T>,
    arc_sweep: T,
    point: Vector2<T>,
    epsilon: T,
) -> bool
where
    T: Real,
{
    if point.fuzzy_eq_eps(arc_start, epsilon) {
        return true;
    }

    let radius = (arc_start - center).length();
    let angle_eps = if radius > T::zero() {
        epsilon / radius
    } else {
        epsilon
    };
    let swept = directed_sweep(
        angle(center, arc_start),
        angle(center, point),
        arc_sweep < T::zero(),
    );
    swept <= arc_sweep.abs() + angle_eps || swept >= T::tau() - angle_eps
}

/// Sweep from the start of the arc `v1->v2` to `point`, clamped to the arc sweep magnitude.
/// Points just before the start (from numeric noise) resolve to zero.
fn arc_sweep_to_point<T>(v1: PlineVertex<T>, center: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let total = seg_sweep_angle(v1).abs();
    let swept = directed_sweep(angle(center, v1.pos()), angle(center, point), v1.bulge_is_neg());
    if swept <= total {
        return swept;
    }

    // past the end, snap to whichever arc end is angularly closer
    if swept - total < T::tau() - swept {
        total
    } else {
        T::zero()
    }
}

/// Normalized position of `point` along the segment in `[0, 1]` (parametric for lines, fraction of
/// sweep for arcs). Used for ordering points on a segment.
pub fn seg_param_of_point<T>(v1: PlineVertex<T>, v2: PlineVertex<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    if v1.bulge_is_zero() || v1.pos() == v2.pos() {
        let t = parametric_from_point(v1.pos(), v2.pos(), point);
        return fmin(fmax(t, T::zero()), T::one());
    }

    let (_, center) = seg_arc_radius_and_center(v1, v2);
    arc_sweep_to_point(v1, center, point) / seg_sweep_angle(v1).abs()
}

/// Bulge of the part of segment `v1->v2` running from `from` to `to` (both on the segment with
/// `from` before `to`).
pub fn seg_sub_bulge<T>(v1: PlineVertex<T>, v2: PlineVertex<T>, from: Vector2<T>, to: Vector2<T>) -> T
where
    T: Real,
{
    if v1.bulge_is_zero() || v1.pos() == v2.pos() {
        return T::zero();
    }

    let (_, center) = seg_arc_radius_and_center(v1, v2);
    let s0 = arc_sweep_to_point(v1, center, from);
    let s1 = arc_sweep_to_point(v1, center, to);
    let sub_sweep = if s1 > s0 { s1 - s0 } else { T::zero() };
    let signed = if v1.bulge_is_neg() { -sub_sweep } else { sub_sweep };
    bulge_from_angle(signed)
}

#[derive(Debug, Copy, Clone)]
pub struct SplitResult<T = f64>
where
    T: Real,
{
    /// `v1` with its bulge updated to end at the split point.
    pub updated_start: PlineVertex<T>,
    /// Vertex at the split point with the bulge of the remaining part of the segment.
    pub split_vertex: PlineVertex<T>,
}

/// Split the segment `v1->v2` at `point_on_seg`.
pub fn seg_split_at_point<T>(
    v1: PlineVertex<T>,
    v2: PlineVertex<T>,
    point_on_seg: Vector2<T>,
    pos_equal_eps: T,
) -> SplitResult<T>
where
    T: Real,
{
    if v1.bulge_is_zero() {
        return SplitResult {
            updated_start: v1,
            split_vertex: PlineVertex::from_vector2(point_on_seg, T::zero()),
        };
    }

    if v1.pos().fuzzy_eq_eps(v2.pos(), pos_equal_eps)
        || v1.pos().fuzzy_eq_eps(point_on_seg, pos_equal_eps)
    {
        // nothing before the split point, the whole arc continues from it
        return SplitResult {
            updated_start: PlineVertex::from_vector2(point_on_seg, T::zero()),
            split_vertex: PlineVertex::from_vector2(point_on_seg, v1.bulge),
        };
    }

    if v2.pos().fuzzy_eq_eps(point_on_seg, pos_equal_eps) {
        return SplitResult {
            updated_start: v1,
            split_vertex: PlineVertex::from_vector2(v2.pos(), T::zero()),
        };
    }

    SplitResult {
        updated_start: v1.with_bulge(seg_sub_bulge(v1, v2, v1.pos(), point_on_seg)),
        split_vertex: PlineVertex::from_vector2(
            point_on_seg,
            seg_sub_bulge(v1, v2, point_on_seg, v2.pos()),
        ),
    }
}

/// Tangent direction (not normalized) of the segment at `point_on_seg`.
pub fn seg_tangent_vector<T>(
    v1: PlineVertex<T>,
    v2: PlineVertex<T>,
    point_on_seg: Vector2<T>,
) -> Vector2<T>
where
    T: Real,
{
    if v1.bulge_is_zero() {
        return v2.pos() - v1.pos();
    }

    let (_, center) = seg_arc_radius_and_center(v1, v2);
    let radial = (point_on_seg - center).perp();
    if v1.bulge_is_pos() {
        radial
    } else {
        -radial
    }
}

/// Closest point on the segment to `point`.
pub fn seg_closest_point<T>(v1: PlineVertex<T>, v2: PlineVertex<T>, point: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    if v1.bulge_is_zero() {
        return line_seg_closest_point(v1.pos(), v2.pos(), point);
    }

    let (radius, center) = seg_arc_radius_and_center(v1, v2);
    if point.fuzzy_eq(center) {
        // every point on the arc is equidistant
        return v1.pos();
    }

    let on_circle = center + (point - center).normalize().scale(radius);
    if point_within_arc_sweep(center, v1.pos(), seg_sweep_angle(v1), on_circle, T::fuzzy_epsilon()) {
        return on_circle;
    }

    if dist_squared(v1.pos(), point) < dist_squared(v2.pos(), point) {
        v1.pos()
    } else {
        v2.pos()
    }
}

/// Length of the segment, `radius * |sweep|` for arcs.
pub fn seg_length<T>(v1: PlineVertex<T>, v2: PlineVertex<T>) -> T
where
    T: Real,
{
    if v1.pos() == v2.pos() {
        return T::zero();
    }

    if v1.bulge_is_zero() {
        return (v2.pos() - v1.pos()).length();
    }

    let (radius, _) = seg_arc_radius_and_center(v1, v2);
    radius * seg_sweep_angle(v1).abs()
}

/// Point halfway along the segment.
pub fn seg_midpoint<T>(v1: PlineVertex<T>, v2: PlineVertex<T>) -> Vector2<T>
where
    T: Real,
{
    if v1.bulge_is_zero() || v1.pos() == v2.pos() {
        return midpoint(v1.pos(), v2.pos());
    }

    let (radius, center) = seg_arc_radius_and_center(v1, v2);
    let mid_angle = angle(center, v1.pos()) + seg_sweep_angle(v1) / T::two();
    point_on_circle(radius, center, mid_angle)
}

/// Exact bounding box of the segment.
pub fn seg_bounding_box<T>(v1: PlineVertex<T>, v2: PlineVertex<T>) -> AABB<T>
where
    T: Real,
{
    let (min_x, max_x) = min_max(v1.x, v2.x);
    let (min_y, max_y) = min_max(v1.y, v2.y);
    if v1.bulge_is_zero() || v1.pos() == v2.pos() {
        return AABB::new(min_x, min_y, max_x, max_y);
    }

    let (radius, center) = seg_arc_radius_and_center(v1, v2);
    let start_angle = angle(center, v1.pos());
    let sweep = seg_sweep_angle(v1).abs();
    let cw = v1.bulge_is_neg();
    let crosses = |axis_angle: T| directed_sweep(start_angle, axis_angle, cw) < sweep;

    let half_pi = T::pi() / T::two();
    AABB::new(
        if crosses(T::pi()) { center.x - radius } else { min_x },
        if crosses(-half_pi) { center.y - radius } else { min_y },
        if crosses(T::zero()) { center.x + radius } else { max_x },
        if crosses(half_pi) { center.y + radius } else { max_y },
    )
}

/// Fast bounding box that is always at least as large as the exact one.
///
/// For sweeps up to π (|bulge| <= 1) the box is the chord extended perpendicular by the sagitta,
/// larger sweeps wrap past the chord ends so the exact box is used.
pub fn seg_fast_approx_bounding_box<T>(v1: PlineVertex<T>, v2: PlineVertex<T>) -> AABB<T>
where
    T: Real,
{
    let (min_x, max_x) = min_max(v1.x, v2.x);
    let (min_y, max_y) = min_max(v1.y, v2.y);
    if v1.bulge_is_zero() {
        return AABB::new(min_x, min_y, max_x, max_y);
    }

    if v1.bulge.abs() > T::one() {
        return seg_bounding_box(v1, v2);
    }

    // sagitta vector: chord rotated clockwise scaled by bulge / 2
    let b = v1.bulge;
    let offs_x = b * (v2.y - v1.y) / T::two();
    let offs_y = -b * (v2.x - v1.x) / T::two();
    let (sx_min, sx_max) = min_max(v1.x + offs_x, v2.x + offs_x);
    let (sy_min, sy_max) = min_max(v1.y + offs_y, v2.y + offs_y);

    AABB::new(
        fmin(min_x, sx_min),
        fmin(min_y, sy_min),
        fmax(max_x, sx_max),
        fmax(max_y, sy_max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;
    use std::f64::consts::PI;

    fn quarter_arc() -> (PlineVertex<f64>, PlineVertex<f64>) {
        // counter clockwise quarter circle from (1, 0) to (0, 1) centered at origin
        (
            PlineVertex::new(1.0, 0.0, bulge_from_angle(PI / 2.0)),
            PlineVertex::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn radius_and_center_negative_bulge() {
        let v1 = PlineVertex::new(0.0, 1.0, -bulge_from_angle(PI / 2.0));
        let v2 = PlineVertex::new(1.0, 0.0, 0.0);
        let (r, c) = seg_arc_radius_and_center(v1, v2);
        assert!(r.fuzzy_eq(1.0));
        assert!(c.fuzzy_eq(Vector2::zero()));
    }

    #[test]
    fn radius_and_center_major_arc() {
        // 270 degree counter clockwise sweep from (1, 0) to (0, -1)
        let v1 = PlineVertex::new(1.0, 0.0, bulge_from_angle(1.5 * PI));
        let v2 = PlineVertex::new(0.0, -1.0, 0.0);
        let (r, c) = seg_arc_radius_and_center(v1, v2);
        assert!(r.fuzzy_eq(1.0));
        assert!(c.fuzzy_eq(Vector2::zero()));
        assert!(seg_length(v1, v2).fuzzy_eq(1.5 * PI));
        assert!(seg_midpoint(v1, v2).fuzzy_eq(Vector2::new(-(0.5f64).sqrt(), (0.5f64).sqrt())));
    }

    #[test]
    fn length_and_midpoint() {
        let (v1, v2) = quarter_arc();
        assert!(seg_length(v1, v2).fuzzy_eq(PI / 2.0));
        let h = (0.5f64).sqrt();
        assert!(seg_midpoint(v1, v2).fuzzy_eq(Vector2::new(h, h)));

        let l1 = PlineVertex::new(0.0, 0.0, 0.0);
        let l2 = PlineVertex::new(3.0, 4.0, 0.0);
        assert!(seg_length(l1, l2).fuzzy_eq(5.0));
        assert!(seg_midpoint(l1, l2).fuzzy_eq(Vector2::new(1.5, 2.0)));
    }

    #[test]
    fn split_arc_in_half() {
        let (v1, v2) = quarter_arc();
        let h = (0.5f64).sqrt();
        let split = seg_split_at_point(v1, v2, Vector2::new(h, h), 1e-5);
        let eighth_bulge = bulge_from_angle(PI / 4.0);
        assert!(split.updated_start.bulge.fuzzy_eq(eighth_bulge));
        assert!(split.split_vertex.bulge.fuzzy_eq(eighth_bulge));
        assert!(split.split_vertex.pos().fuzzy_eq(Vector2::new(h, h)));
    }

    #[test]
    fn split_at_end_points() {
        let (v1, v2) = quarter_arc();
        let at_start = seg_split_at_point(v1, v2, v1.pos(), 1e-5);
        assert!(at_start.split_vertex.bulge.fuzzy_eq(v1.bulge));
        let at_end = seg_split_at_point(v1, v2, v2.pos(), 1e-5);
        assert!(at_end.updated_start.bulge.fuzzy_eq(v1.bulge));
        assert!(at_end.split_vertex.bulge.fuzzy_eq(0.0));
    }

    #[test]
    fn closest_point() {
        let (v1, v2) = quarter_arc();
        let h = (0.5f64).sqrt();
        assert!(seg_closest_point(v1, v2, Vector2::new(2.0, 2.0)).fuzzy_eq(Vector2::new(h, h)));
        assert!(seg_closest_point(v1, v2, Vector2::new(1.0, -3.0)).fuzzy_eq(v1.pos()));
        assert!(seg_closest_point(v1, v2, Vector2::zero()).fuzzy_eq(v1.pos()));
    }

    #[test]
    fn tangent_directions() {
        let (v1, v2) = quarter_arc();
        let t = seg_tangent_vector(v1, v2, v1.pos());
        assert!(t.normalize().fuzzy_eq(Vector2::new(0.0, 1.0)));
        let cw = PlineVertex::new(0.0, 1.0, -v1.bulge);
        let t = seg_tangent_vector(cw, v1, cw.pos());
        assert!(t.normalize().fuzzy_eq(Vector2::new(1.0, 0.0)));
    }

    #[test]
    fn bounding_boxes() {
        // half circle over the top from (1, 0) to (-1, 0)
        let v1 = PlineVertex::new(1.0, 0.0, 1.0);
        let v2 = PlineVertex::new(-1.0, 0.0, 0.0);
        let exact = seg_bounding_box(v1, v2);
        assert!(exact.min_x.fuzzy_eq(-1.0));
        assert!(exact.min_y.fuzzy_eq(0.0));
        assert!(exact.max_x.fuzzy_eq(1.0));
        assert!(exact.max_y.fuzzy_eq(1.0));

        let approx = seg_fast_approx_bounding_box(v1, v2);
        assert!(approx.min_x <= exact.min_x && approx.max_x >= exact.max_x);
        assert!(approx.min_y <= exact.min_y + 1e-12 && approx.max_y >= exact.max_y - 1e-12);

        // major arc falls back to exact extents
        let m1 = PlineVertex::new(1.0, 0.0, bulge_from_angle(1.5 * PI));
        let m2 = PlineVertex::new(0.0, -1.0, 0.0);
        let bb = seg_fast_approx_bounding_box(m1, m2);
        assert!(bb.min_x.fuzzy_eq(-1.0));
        assert!(bb.min_y.fuzzy_eq(-1.0));
        assert!(bb.max_x.fuzzy_eq(1.0));
        assert!(bb.max_y.fuzzy_eq(1.0));
    }

    #[test]
    fn param_of_point_on_arc() {
        let (v1, v2) = quarter_arc();
        let h = (0.5f64).sqrt();
        assert!(seg_param_of_point(v1, v2, Vector2::new(h, h)).fuzzy_eq(0.5));
        assert!(seg_param_of_point(v1, v2, v2.pos()).fuzzy_eq(1.0));
        assert!(seg_param_of_point(v1, v2, v1.pos()).fuzzy_eq(0.0));
    }
}
