use super::{base_math::point_from_parametric, Vector2};
use crate::core::traits::Real;

/// Result of intersecting the infinite line through two points with a circle.
///
/// Parametric values are relative to the defining points (t = 0 at `p0`, t = 1 at `p1`) and are
/// not limited to `[0, 1]`.
#[derive(Debug, Copy, Clone)]
pub enum LineCircleIntr<T>
where
    T: Real,
{
    NoIntersect,
    TangentIntersect { t0: T },
    /// Two intersects with `t0 < t1`.
    TwoIntersects { t0: T, t1: T },
}

/// Intersect the line through `p0` and `p1` with the circle at `circle_center`.
///
/// The center is projected onto the line, the line is tangent if the projected distance is within
/// `epsilon` of `radius`. A degenerate line (`p0 == p1`) is treated as a point and reported as a
/// tangent intersect if it lies on the circle.
///
/// ```
/// # use contour_kernel::core::math::*;
/// # use contour_kernel::core::traits::*;
/// let r = line_circle_intr(Vector2::new(-2.0, 0.0), Vector2::new(2.0, 0.0), 1.0, Vector2::zero(), 1e-5);
/// if let LineCircleIntr::TwoIntersects { t0, t1 } = r {
///     assert!(t0.fuzzy_eq(0.25));
///     assert!(t1.fuzzy_eq(0.75));
/// } else {
///     unreachable!();
/// }
/// ```
pub fn line_circle_intr<T>(
    p0: Vector2<T>,
    p1: Vector2<T>,
    radius: T,
    circle_center: Vector2<T>,
    epsilon: T,
) -> LineCircleIntr<T>
where
    T: Real,
{
    use LineCircleIntr::*;

    let d = p1 - p0;
    let len2 = d.length_squared();

    if len2 < epsilon * epsilon {
        let dist = (p0 - circle_center).length();
        if dist.fuzzy_eq_eps(radius, epsilon) {
            return TangentIntersect { t0: T::zero() };
        }
        return NoIntersect;
    }

    let t_center = (circle_center - p0).dot(d) / len2;
    let foot = point_from_parametric(p0, p1, t_center);
    let center_dist = (circle_center - foot).length();

    if center_dist > radius + epsilon {
        return NoIntersect;
    }

    if center_dist.fuzzy_eq_eps(radius, epsilon) {
        return TangentIntersect { t0: t_center };
    }

    let half_chord = (radius * radius - center_dist * center_dist).sqrt();
    let half_t = half_chord / len2.sqrt();

    TwoIntersects {
        t0: t_center - half_t,
        t1: t_center + half_t,
    }
}
