use super::{
    pline_seg::{point_within_arc_sweep, seg_arc_radius_and_center, seg_param_of_point, seg_sweep_angle},
    PlineVertex,
};
use crate::core::{
    math::{
        angle, circle_circle_intr, fmax, fmin, line_circle_intr, line_line_intr,
        normalize_radians, point_from_parametric, point_on_circle, CircleCircleIntr,
        LineCircleIntr, LineLineIntr, Vector2,
    },
    traits::Real,
};

/// Result of intersecting two polyline segments.
///
/// Every pair of points is ordered along the direction of the first segment.
#[derive(Debug, Copy, Clone)]
pub enum PlineSegIntr<T>
where
    T: Real,
{
    NoIntersect,
    /// Segments touch at a single point without crossing (line tangent to arc or arcs tangent).
    TangentIntersect {
        point: Vector2<T>,
    },
    OneIntersect {
        point: Vector2<T>,
    },
    TwoIntersects {
        point1: Vector2<T>,
        point2: Vector2<T>,
    },
    /// Collinear lines sharing the interval `point1` to `point2`.
    OverlappingLines {
        point1: Vector2<T>,
        point2: Vector2<T>,
    },
    /// Arcs on the same circle sharing the arc from `point1` to `point2`.
    OverlappingArcs {
        point1: Vector2<T>,
        point2: Vector2<T>,
    },
}

/// Intersect the segment `v1->v2` with the segment `u1->u2`.
///
/// `pos_equal_eps` is used for every endpoint and degeneracy comparison, and intersect points
/// within it of a segment end point are snapped onto that end point.
///
/// # Examples
///
/// ```
/// # use contour_kernel::polyline::*;
/// # use contour_kernel::core::math::*;
/// # use contour_kernel::core::traits::*;
/// // line crossing a half circle arc
/// let v1 = PlineVertex::new(0.0, -1.0, 0.0);
/// let v2 = PlineVertex::new(0.0, 3.0, 0.0);
/// let u1 = PlineVertex::new(1.0, 0.0, 1.0);
/// let u2 = PlineVertex::new(-1.0, 0.0, 0.0);
/// match pline_seg_intr(v1, v2, u1, u2, 1e-5) {
///     PlineSegIntr::OneIntersect { point } => assert!(point.fuzzy_eq(Vector2::new(0.0, 1.0))),
///     r => panic!("unexpected {:?}", r),
/// }
/// ```
pub fn pline_seg_intr<T>(
    v1: PlineVertex<T>,
    v2: PlineVertex<T>,
    u1: PlineVertex<T>,
    u2: PlineVertex<T>,
    pos_equal_eps: T,
) -> PlineSegIntr<T>
where
    T: Real,
{
    use PlineSegIntr::*;

    let eps = pos_equal_eps;
    let snap = |p: Vector2<T>| -> Vector2<T> {
        for end in [v1.pos(), v2.pos(), u1.pos(), u2.pos()] {
            if p.fuzzy_eq_eps(end, eps) {
                return end;
            }
        }
        p
    };

    // zero length segments are handled as points with the line code path
    let v_is_line = v1.bulge_is_zero() || v1.pos().fuzzy_eq_eps(v2.pos(), eps);
    let u_is_line = u1.bulge_is_zero() || u1.pos().fuzzy_eq_eps(u2.pos(), eps);

    if v_is_line && u_is_line {
        return match line_line_intr(v1.pos(), v2.pos(), u1.pos(), u2.pos(), eps) {
            LineLineIntr::NoIntersect | LineLineIntr::FalseIntersect { .. } => NoIntersect,
            LineLineIntr::TrueIntersect { seg1_t, .. } => OneIntersect {
                point: snap(point_from_parametric(v1.pos(), v2.pos(), seg1_t)),
            },
            LineLineIntr::Overlapping { seg1_t0, seg1_t1 } => OverlappingLines {
                point1: snap(point_from_parametric(v1.pos(), v2.pos(), seg1_t0)),
                point2: snap(point_from_parametric(v1.pos(), v2.pos(), seg1_t1)),
            },
        };
    }

    let two_or_one = |point1: Vector2<T>, point2: Vector2<T>| -> PlineSegIntr<T> {
        let (p1, p2) = (snap(point1), snap(point2));
        if p1.fuzzy_eq_eps(p2, eps) {
            return OneIntersect { point: p1 };
        }
        // order along first segment
        if seg_param_of_point(v1, v2, p1) <= seg_param_of_point(v1, v2, p2) {
            TwoIntersects {
                point1: p1,
                point2: p2,
            }
        } else {
            TwoIntersects {
                point1: p2,
                point2: p1,
            }
        }
    };

    if v_is_line || u_is_line {
        let (p0, p1, a1, a2) = if v_is_line {
            (v1.pos(), v2.pos(), u1, u2)
        } else {
            (u1.pos(), u2.pos(), v1, v2)
        };

        let (arc_radius, arc_center) = seg_arc_radius_and_center(a1, a2);
        let arc_sweep = seg_sweep_angle(a1);
        let line_len = (p1 - p0).length();
        let point_in_both = |t: T| -> Option<Vector2<T>> {
            if !(t * line_len).fuzzy_in_range_eps(T::zero(), line_len, eps) {
                return None;
            }

            let p = point_from_parametric(p0, p1, t);
            if point_within_arc_sweep(arc_center, a1.pos(), arc_sweep, p, eps) {
                Some(p)
            } else {
                None
            }
        };

        return match line_circle_intr(p0, p1, arc_radius, arc_center, eps) {
            LineCircleIntr::NoIntersect => NoIntersect,
            LineCircleIntr::TangentIntersect { t0 } => match point_in_both(t0) {
                Some(p) => TangentIntersect { point: snap(p) },
                None => NoIntersect,
            },
            LineCircleIntr::TwoIntersects { t0, t1 } => match (point_in_both(t0), point_in_both(t1)) {
                (None, None) => NoIntersect,
                (Some(p), None) | (None, Some(p)) => OneIntersect { point: snap(p) },
                (Some(pa), Some(pb)) => two_or_one(pa, pb),
            },
        };
    }

    let (r1, c1) = seg_arc_radius_and_center(v1, v2);
    let (r2, c2) = seg_arc_radius_and_center(u1, u2);
    let sweep1 = seg_sweep_angle(v1);
    let sweep2 = seg_sweep_angle(u1);
    let in_both_sweeps = |p: Vector2<T>| -> bool {
        point_within_arc_sweep(c1, v1.pos(), sweep1, p, eps)
            && point_within_arc_sweep(c2, u1.pos(), sweep2, p, eps)
    };

    match circle_circle_intr(r1, c1, r2, c2, eps) {
        CircleCircleIntr::NoIntersect => NoIntersect,
        CircleCircleIntr::TangentIntersect { point } => {
            if in_both_sweeps(point) {
                TangentIntersect { point: snap(point) }
            } else {
                NoIntersect
            }
        }
        CircleCircleIntr::TwoIntersects { point1, point2 } => {
            match (in_both_sweeps(point1), in_both_sweeps(point2)) {
                (false, false) => NoIntersect,
                (true, false) => OneIntersect { point: snap(point1) },
                (false, true) => OneIntersect { point: snap(point2) },
                (true, true) => two_or_one(point1, point2),
            }
        }
        CircleCircleIntr::Overlapping => {
            coincident_arcs_intr(v1, v2, u1, u2, r1, c1, eps, &snap)
        }
    }
}

/// Intersect two arcs lying on the same circle.
///
/// Both arcs are converted to counter clockwise angular intervals measured from the start of the
/// first arc's interval, then intersected. Pieces longer than `eps` are overlaps, zero length
/// pieces are touching end points.
#[allow(clippy::too_many_arguments)]
fn coincident_arcs_intr<T, F>(
    v1: PlineVertex<T>,
    v2: PlineVertex<T>,
    u1: PlineVertex<T>,
    u2: PlineVertex<T>,
    radius: T,
    center: Vector2<T>,
    eps: T,
    snap: &F,
) -> PlineSegIntr<T>
where
    T: Real,
    F: Fn(Vector2<T>) -> Vector2<T>,
{
    use PlineSegIntr::*;

    let sweep1 = seg_sweep_angle(v1);
    let sweep2 = seg_sweep_angle(u1);
    let ccw_start = |s: PlineVertex<T>, e: PlineVertex<T>, sweep: T| {
        if sweep < T::zero() {
            angle(center, e.pos())
        } else {
            angle(center, s.pos())
        }
    };

    let start1 = ccw_start(v1, v2, sweep1);
    let len1 = sweep1.abs();
    let len2 = sweep2.abs();
    let offset = normalize_radians(ccw_start(u1, u2, sweep2) - start1);
    let angle_eps = eps / radius;

    let mut overlap: Option<(T, T)> = None;
    let mut touches: Vec<T> = Vec::with_capacity(2);
    for shift in [offset, offset - T::tau()] {
        let lo = fmax(shift, T::zero());
        let hi = fmin(shift + len2, len1);
        if hi < lo - angle_eps {
            continue;
        }

        if hi - lo > angle_eps {
            let longer = match overlap {
                Some((a, b)) => hi - lo > b - a,
                None => true,
            };
            if longer {
                overlap = Some((lo, hi));
            }
        } else {
            let t = (lo + hi) / T::two();
            if !touches.iter().any(|&x| (x - t).abs() < angle_eps) {
                touches.push(t);
            }
        }
    }

    let at = |t: T| snap(point_on_circle(radius, center, start1 + t));
    // relative angles increase along the first arc when it is counter clockwise
    let along_first = |a: T, b: T| {
        if sweep1 < T::zero() {
            (at(b), at(a))
        } else {
            (at(a), at(b))
        }
    };

    if let Some((lo, hi)) = overlap {
        let (point1, point2) = along_first(lo, hi);
        return OverlappingArcs { point1, point2 };
    }

    match touches.as_slice() {
        [] => NoIntersect,
        [t] => OneIntersect { point: at(*t) },
        [a, b, ..] => {
            let (lo, hi) = if a < b { (*a, *b) } else { (*b, *a) };
            let (point1, point2) = along_first(lo, hi);
            TwoIntersects { point1, point2 }
        }
    }
}
