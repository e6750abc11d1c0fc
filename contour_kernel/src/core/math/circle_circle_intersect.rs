use super::Vector2;
use crate::core::traits::Real;

#[derive(Debug, Copy, Clone)]
pub enum CircleCircleIntr<T>
where
    T: Real,
{
    NoIntersect,
    TangentIntersect { point: Vector2<T> },
    TwoIntersects {
        point1: Vector2<T>,
        point2: Vector2<T>,
    },
    /// Same center and radius.
    Overlapping,
}

/// Intersect two circles.
///
/// Solves for the radical line: `a` is the distance from `center1` to the chord joining the
/// intersects along the center line and `h` the half chord length. Circles are tangent when `h`
/// falls below `epsilon`.
///
/// ```
/// # use contour_kernel::core::math::*;
/// # use contour_kernel::core::traits::*;
/// let r = circle_circle_intr(1.0, Vector2::zero(), 1.0, Vector2::new(2.0, 0.0), 1e-5);
/// if let CircleCircleIntr::TangentIntersect { point } = r {
///     assert!(point.fuzzy_eq(Vector2::new(1.0, 0.0)));
/// } else {
///     unreachable!();
/// }
/// ```
pub fn circle_circle_intr<T>(
    radius1: T,
    center1: Vector2<T>,
    radius2: T,
    center2: Vector2<T>,
    epsilon: T,
) -> CircleCircleIntr<T>
where
    T: Real,
{
    use CircleCircleIntr::*;

    let cv = center2 - center1;
    let d2 = cv.length_squared();
    let d = d2.sqrt();

    if d < epsilon {
        if radius1.fuzzy_eq_eps(radius2, epsilon) {
            return Overlapping;
        }
        return NoIntersect;
    }

    if d > radius1 + radius2 + epsilon || d < (radius1 - radius2).abs() - epsilon {
        return NoIntersect;
    }

    let a = (radius1 * radius1 - radius2 * radius2 + d2) / (T::two() * d);
    let chord_mid = center1 + cv.scale(a / d);
    let h2 = radius1 * radius1 - a * a;

    if h2 <= T::zero() || h2.sqrt() < epsilon {
        return TangentIntersect { point: chord_mid };
    }

    let offset = cv.perp().scale(h2.sqrt() / d);
    TwoIntersects {
        point1: chord_mid + offset,
        point2: chord_mid - offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;

    #[test]
    fn two_intersects() {
        let r = circle_circle_intr(1.0, Vector2::zero(), 1.0, Vector2::new(1.0, 0.0), 1e-5);
        match r {
            CircleCircleIntr::TwoIntersects { point1, point2 } => {
                let h = (3.0f64).sqrt() / 2.0;
                assert!(point1.fuzzy_eq(Vector2::new(0.5, h)));
                assert!(point2.fuzzy_eq(Vector2::new(0.5, -h)));
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn contained_no_intersect() {
        let r = circle_circle_intr(5.0, Vector2::zero(), 1.0, Vector2::new(1.0, 0.0), 1e-5);
        assert!(matches!(r, CircleCircleIntr::NoIntersect));
    }

    #[test]
    fn coincident() {
        let r = circle_circle_intr(2.0, Vector2::new(1.0, 1.0), 2.0, Vector2::new(1.0, 1.0), 1e-5);
        assert!(matches!(r, CircleCircleIntr::Overlapping));
    }
}
