use super::Vector2;
use crate::core::traits::Real;

/// Returns `(min, max)` of the two values.
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

#[inline]
pub fn fmin<T: Real>(v1: T, v2: T) -> T {
    num_traits::real::Real::min(v1, v2)
}

#[inline]
pub fn fmax<T: Real>(v1: T, v2: T) -> T {
    num_traits::real::Real::max(v1, v2)
}

/// Normalize radians to be in `[0, 2π]`.
///
/// ```
/// # use contour_kernel::core::math::*;
/// # use contour_kernel::core::traits::*;
/// # use std::f64::consts::PI;
/// assert!(normalize_radians(-PI / 2.0).fuzzy_eq(3.0 * PI / 2.0));
/// assert!(normalize_radians(5.0 * PI).fuzzy_eq(PI));
/// assert_eq!(normalize_radians(PI), PI);
/// ```
#[inline]
pub fn normalize_radians<T>(angle: T) -> T
where
    T: Real,
{
    if angle >= T::zero() && angle <= T::tau() {
        return angle;
    }

    angle - (angle / T::tau()).floor() * T::tau()
}

/// Smallest signed angle to rotate from `angle1` to `angle2`, in `[-π, π]`.
#[inline]
pub fn delta_angle<T>(angle1: T, angle2: T) -> T
where
    T: Real,
{
    let mut diff = normalize_radians(angle2 - angle1);
    if diff > T::pi() {
        diff = diff - T::tau();
    }

    diff
}

/// Same as [delta_angle] but with the sign forced, `negative` selects a clockwise result.
#[inline]
pub fn delta_angle_signed<T>(angle1: T, angle2: T, negative: bool) -> T
where
    T: Real,
{
    let diff = delta_angle(angle1, angle2).abs();
    if negative {
        -diff
    } else {
        diff
    }
}

/// Angle swept travelling from `start_angle` to `test_angle` in the direction given, always in
/// `[0, 2π]`.
#[inline]
pub fn directed_sweep<T>(start_angle: T, test_angle: T, is_clockwise: bool) -> T
where
    T: Real,
{
    if is_clockwise {
        normalize_radians(start_angle - test_angle)
    } else {
        normalize_radians(test_angle - start_angle)
    }
}

/// Test if `test_angle` lies within the sweep starting at `start_angle`. The sweep is signed
/// (negative is clockwise) and may exceed π. `epsilon` widens both ends.
///
/// ```
/// # use contour_kernel::core::math::*;
/// # use std::f64::consts::PI;
/// assert!(angle_is_within_sweep_eps(PI / 2.0, 0.0, PI, 1e-9));
/// assert!(!angle_is_within_sweep_eps(-PI / 2.0, 0.0, PI, 1e-9));
/// assert!(angle_is_within_sweep_eps(-PI / 2.0, 0.0, -PI, 1e-9));
/// assert!(angle_is_within_sweep_eps(PI, 0.0, 1.5 * PI, 1e-9));
/// ```
#[inline]
pub fn angle_is_within_sweep_eps<T>(test_angle: T, start_angle: T, sweep_angle: T, epsilon: T) -> bool
where
    T: Real,
{
    let swept = directed_sweep(start_angle, test_angle, sweep_angle < T::zero());
    swept <= sweep_angle.abs() + epsilon || swept >= T::tau() - epsilon
}

#[inline]
pub fn angle_is_within_sweep<T>(test_angle: T, start_angle: T, sweep_angle: T) -> bool
where
    T: Real,
{
    angle_is_within_sweep_eps(test_angle, start_angle, sweep_angle, T::fuzzy_epsilon())
}

#[inline]
pub fn dist_squared<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    let d = p0 - p1;
    d.dot(d)
}

/// Angle of the direction from `p0` to `p1`, in `[-π, π]`.
#[inline]
pub fn angle<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    T::atan2(p1.y - p0.y, p1.x - p0.x)
}

#[inline]
pub fn midpoint<T>(p0: Vector2<T>, p1: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    Vector2::new((p0.x + p1.x) / T::two(), (p0.y + p1.y) / T::two())
}

#[inline]
pub fn point_on_circle<T>(radius: T, center: Vector2<T>, angle: T) -> Vector2<T>
where
    T: Real,
{
    let (s, c) = angle.sin_cos();
    Vector2::new(center.x + radius * c, center.y + radius * s)
}

/// Point at parametric `t` on the line through `p0` (t = 0) and `p1` (t = 1).
#[inline]
pub fn point_from_parametric<T>(p0: Vector2<T>, p1: Vector2<T>, t: T) -> Vector2<T>
where
    T: Real,
{
    p0 + (p1 - p0).scale(t)
}

/// Parametric value of `point` projected onto the line through `p0` and `p1`. Returns 0 for a
/// degenerate line.
#[inline]
pub fn parametric_from_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let d = p1 - p0;
    let len2 = d.length_squared();
    if len2 == T::zero() {
        return T::zero();
    }

    (point - p0).dot(d) / len2
}

/// Closest point on the line segment `p0` to `p1` from `point`.
#[inline]
pub fn line_seg_closest_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    let t = parametric_from_point(p0, p1, point);
    if t <= T::zero() {
        return p0;
    }

    if t >= T::one() {
        return p1;
    }

    point_from_parametric(p0, p1, t)
}

/// Signed area of the parallelogram (p0, p1, point), positive when `point` is left of the
/// directed line `p0` to `p1`.
#[inline]
pub fn orient2d<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    (p1 - p0).perp_dot(point - p0)
}

#[inline]
pub fn is_left<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> bool
where
    T: Real,
{
    orient2d(p0, p1, point) > T::zero()
}

#[inline]
pub fn is_left_or_equal<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> bool
where
    T: Real,
{
    orient2d(p0, p1, point) >= T::zero()
}

/// Bulge for an arc with the signed sweep `angle`.
///
/// ```
/// # use contour_kernel::core::math::*;
/// # use contour_kernel::core::traits::*;
/// # use std::f64::consts::PI;
/// assert!(bulge_from_angle(PI).fuzzy_eq(1.0));
/// assert!(bulge_from_angle(-PI / 2.0).fuzzy_eq(-(PI / 8.0).tan()));
/// assert!(angle_from_bulge(bulge_from_angle(1.2)).fuzzy_eq(1.2));
/// ```
#[inline]
pub fn bulge_from_angle<T>(angle: T) -> T
where
    T: Real,
{
    (angle / T::four()).tan()
}

/// Signed sweep angle of an arc with the given bulge, in `(-2π, 2π)`.
#[inline]
pub fn angle_from_bulge<T>(bulge: T) -> T
where
    T: Real,
{
    T::four() * bulge.atan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;
    use std::f64::consts::PI;

    #[test]
    fn delta_angle_wraps() {
        assert!(delta_angle(0.1, -0.1).fuzzy_eq(-0.2));
        assert!(delta_angle(PI - 0.1, -PI + 0.1).fuzzy_eq(0.2));
        assert!(delta_angle_signed(0.0, PI / 2.0, true).fuzzy_eq(-PI / 2.0));
    }

    #[test]
    fn directed_sweep_directions() {
        assert!(directed_sweep(0.0, PI / 2.0, false).fuzzy_eq(PI / 2.0));
        assert!(directed_sweep(0.0, PI / 2.0, true).fuzzy_eq(1.5 * PI));
    }

    #[test]
    fn closest_point_on_line_seg() {
        let p0 = Vector2::new(0.0, 0.0);
        let p1 = Vector2::new(2.0, 0.0);
        assert!(line_seg_closest_point(p0, p1, Vector2::new(1.0, 3.0)).fuzzy_eq(Vector2::new(1.0, 0.0)));
        assert!(line_seg_closest_point(p0, p1, Vector2::new(-1.0, 3.0)).fuzzy_eq(p0));
        assert!(line_seg_closest_point(p0, p1, Vector2::new(5.0, -1.0)).fuzzy_eq(p1));
    }

    #[test]
    fn left_tests() {
        let p0 = Vector2::new(0.0, 0.0);
        let p1 = Vector2::new(1.0, 0.0);
        assert!(is_left(p0, p1, Vector2::new(0.5, 1.0)));
        assert!(!is_left(p0, p1, Vector2::new(0.5, 0.0)));
        assert!(is_left_or_equal(p0, p1, Vector2::new(0.5, 0.0)));
    }
}
