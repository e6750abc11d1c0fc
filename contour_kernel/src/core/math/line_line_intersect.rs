use super::{base_math::min_max, Vector2};
use crate::core::traits::Real;

/// Result of intersecting two line segments.
#[derive(Debug, Copy, Clone)]
pub enum LineLineIntr<T>
where
    T: Real,
{
    /// Parallel and not collinear, or collinear without overlap.
    NoIntersect,
    /// Single intersect within both segments, given as parametric values on each segment.
    TrueIntersect { seg1_t: T, seg2_t: T },
    /// Collinear segments overlapping over `[seg1_t0, seg1_t1]` of the first segment
    /// (`seg1_t0 <= seg1_t1`).
    Overlapping { seg1_t0: T, seg1_t1: T },
    /// The infinite lines intersect but the point lies outside of at least one segment.
    FalseIntersect { seg1_t: T, seg2_t: T },
}

/// Finds the intersect between the line segments `v1->v2` and `u1->u2`.
///
/// `epsilon` is a position tolerance: parametric values are compared after being scaled by the
/// segment length, so the tolerance is independent of the segment size. Degenerate (point)
/// segments are supported.
///
/// # Examples
///
/// ```
/// # use contour_kernel::core::math::*;
/// # use contour_kernel::core::traits::*;
/// let v1 = Vector2::new(0.0, 0.0);
/// let v2 = Vector2::new(2.0, 2.0);
/// let u1 = Vector2::new(0.0, 2.0);
/// let u2 = Vector2::new(2.0, 0.0);
/// if let LineLineIntr::TrueIntersect { seg1_t, seg2_t } = line_line_intr(v1, v2, u1, u2, 1e-5) {
///     assert!(seg1_t.fuzzy_eq(0.5));
///     assert!(seg2_t.fuzzy_eq(0.5));
/// } else {
///     unreachable!("expected true intersect");
/// }
/// ```
pub fn line_line_intr<T>(
    v1: Vector2<T>,
    v2: Vector2<T>,
    u1: Vector2<T>,
    u2: Vector2<T>,
    epsilon: T,
) -> LineLineIntr<T>
where
    T: Real,
{
    use LineLineIntr::*;

    let v = v2 - v1;
    let u = u2 - u1;
    let v_len = v.length();
    let u_len = u.length();

    let in_seg = |t: T, len: T| -> bool { (t * len).fuzzy_in_range_eps(T::zero(), len, epsilon) };

    let v_is_point = v_len < epsilon;
    let u_is_point = u_len < epsilon;

    if v_is_point || u_is_point {
        return match (v_is_point, u_is_point) {
            (true, true) => {
                if v1.fuzzy_eq_eps(u1, epsilon) {
                    TrueIntersect {
                        seg1_t: T::zero(),
                        seg2_t: T::zero(),
                    }
                } else {
                    NoIntersect
                }
            }
            (true, false) => {
                let seg2_t = (v1 - u1).dot(u) / (u_len * u_len);
                let dist = (u.perp_dot(v1 - u1) / u_len).abs();
                if dist < epsilon && in_seg(seg2_t, u_len) {
                    TrueIntersect {
                        seg1_t: T::zero(),
                        seg2_t,
                    }
                } else {
                    NoIntersect
                }
            }
            _ => {
                let seg1_t = (u1 - v1).dot(v) / (v_len * v_len);
                let dist = (v.perp_dot(u1 - v1) / v_len).abs();
                if dist < epsilon && in_seg(seg1_t, v_len) {
                    TrueIntersect {
                        seg1_t,
                        seg2_t: T::zero(),
                    }
                } else {
                    NoIntersect
                }
            }
        };
    }

    let w = u1 - v1;
    let denom = v.perp_dot(u);

    // denom / longest length is the lateral drift of the shorter segment across its length
    // relative to the longer one, below epsilon the segments are treated as parallel
    let longest = if v_len > u_len { v_len } else { u_len };
    if denom.abs() >= epsilon * longest {
        let seg1_t = w.perp_dot(u) / denom;
        let seg2_t = w.perp_dot(v) / denom;
        if in_seg(seg1_t, v_len) && in_seg(seg2_t, u_len) {
            return TrueIntersect { seg1_t, seg2_t };
        }

        return FalseIntersect { seg1_t, seg2_t };
    }

    // parallel, check collinear by distance of u end points from the line through v
    let u1_dist = (v.perp_dot(u1 - v1) / v_len).abs();
    let u2_dist = (v.perp_dot(u2 - v1) / v_len).abs();
    if u1_dist >= epsilon || u2_dist >= epsilon {
        return NoIntersect;
    }

    let v_len2 = v_len * v_len;
    let (t0, t1) = min_max((u1 - v1).dot(v) / v_len2, (u2 - v1).dot(v) / v_len2);
    let lo = if t0 > T::zero() { t0 } else { T::zero() };
    let hi = if t1 < T::one() { t1 } else { T::one() };

    if ((hi - lo) * v_len) < -epsilon {
        return NoIntersect;
    }

    if ((hi - lo) * v_len) < epsilon {
        // touching end to end
        let seg1_t = (lo + hi) / T::two();
        let point = v1 + v.scale(seg1_t);
        let seg2_t = (point - u1).dot(u) / (u_len * u_len);
        return TrueIntersect { seg1_t, seg2_t };
    }

    Overlapping {
        seg1_t0: lo,
        seg1_t1: hi,
    }
}
