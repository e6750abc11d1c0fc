use super::{
    pline_intersects::find_intersects,
    pline_slice::{create_slices, sort_split_points, stitch_slices, PlineSlice, SplitPoint},
};
use crate::{
    core::{
        math::{angle, bulge_from_angle, delta_angle_signed, dist_squared, Vector2},
        traits::Real,
        Control,
    },
    error::KernelError,
    polyline::{
        pline_seg_intr, seg_arc_radius_and_center, seg_closest_point,
        seg_fast_approx_bounding_box, seg_midpoint, seg_sub_bulge, seg_tangent_vector,
        FindIntersectsOptions, IndexSource, OffsetOptions, PlineSegIntr, PlineVertex, Polyline,
        SpatialIndex,
    },
};
use static_aabb2d_index::AABB;
use std::borrow::Cow;

/// Line or arc segment after being parallel offset, before joining.
#[derive(Debug, Copy, Clone)]
pub struct RawOffsetSeg<T>
where
    T: Real,
{
    pub v1: PlineVertex<T>,
    pub v2: PlineVertex<T>,
    /// Position of the original vertex at the end of the segment, the center of join arcs.
    pub orig_v2_pos: Vector2<T>,
    /// Arc whose radius went to zero or below, turned into a line.
    pub collapsed_arc: bool,
}

/// Offset every segment of `pline` independently. Positive `offset` moves segments to the right
/// of the direction of travel.
pub fn create_raw_offset_segs<T>(pline: &Polyline<T>, offset: T, pos_equal_eps: T) -> Vec<RawOffsetSeg<T>>
where
    T: Real,
{
    pline
        .iter_segments()
        .map(|(v1, v2)| {
            if v1.bulge_is_zero() {
                let shift = (v2.pos() - v1.pos()).unit_right_normal().scale(offset);
                return RawOffsetSeg {
                    v1: PlineVertex::from_vector2(v1.pos() + shift, T::zero()),
                    v2: PlineVertex::from_vector2(v2.pos() + shift, T::zero()),
                    orig_v2_pos: v2.pos(),
                    collapsed_arc: false,
                };
            }

            let (radius, center) = seg_arc_radius_and_center(v1, v2);
            // counter clockwise arcs have their center on the left
            let new_radius = if v1.bulge_is_pos() {
                radius + offset
            } else {
                radius - offset
            };
            let scale = new_radius / radius;
            let p1 = center + (v1.pos() - center).scale(scale);
            let p2 = center + (v2.pos() - center).scale(scale);
            let collapsed_arc = new_radius < pos_equal_eps;

            RawOffsetSeg {
                v1: PlineVertex::from_vector2(p1, if collapsed_arc { T::zero() } else { v1.bulge }),
                v2: PlineVertex::from_vector2(p2, T::zero()),
                orig_v2_pos: v2.pos(),
                collapsed_arc,
            }
        })
        .collect()
}

/// Bulge of the arc around `center` from `start` to `end`.
#[inline]
fn connection_bulge<T>(center: Vector2<T>, start: Vector2<T>, end: Vector2<T>, is_ccw: bool) -> T
where
    T: Real,
{
    bulge_from_angle(delta_angle_signed(angle(center, start), angle(center, end), !is_ccw))
}

/// Push `vertex` unless it repeats the position of the last vertex, in which case the last vertex
/// takes its bulge.
#[inline]
fn push_or_replace<T>(out: &mut Vec<PlineVertex<T>>, vertex: PlineVertex<T>, pos_equal_eps: T)
where
    T: Real,
{
    match out.last_mut() {
        Some(last) if last.pos().fuzzy_eq_eps(vertex.pos(), pos_equal_eps) => last.bulge = vertex.bulge,
        _ => out.push(vertex),
    }
}

/// Join `s1` to `s2`. The last vertex of `out` is the (possibly trimmed) start of `s1`, on return
/// the last vertex is the (possibly trimmed) start of `s2`.
fn join_raw_segs<T>(
    s1: &RawOffsetSeg<T>,
    s2: &RawOffsetSeg<T>,
    offset: T,
    out: &mut Vec<PlineVertex<T>>,
    pos_equal_eps: T,
) where
    T: Real,
{
    let p_end = s1.v2.pos();
    let q_start = s2.v1.pos();
    let connection_ccw = offset > T::zero();

    let connect_using_arc = |out: &mut Vec<PlineVertex<T>>| {
        let bulge = connection_bulge(s1.orig_v2_pos, p_end, q_start, connection_ccw);
        push_or_replace(out, PlineVertex::from_vector2(p_end, bulge), pos_equal_eps);
        push_or_replace(out, s2.v1, pos_equal_eps);
    };

    if p_end.fuzzy_eq_eps(q_start, pos_equal_eps) {
        push_or_replace(out, s2.v1, pos_equal_eps);
        return;
    }

    if s1.collapsed_arc || s2.collapsed_arc {
        connect_using_arc(out);
        return;
    }

    let t1 = seg_tangent_vector(s1.v1, s1.v2, p_end);
    let t2 = seg_tangent_vector(s2.v1, s2.v2, q_start);
    let turn = t1.perp_dot(t2);
    let u_turn = turn.fuzzy_eq_zero() && t1.dot(t2) < T::zero();
    let convex = u_turn || (offset > T::zero() && turn > T::zero()) || (offset < T::zero() && turn < T::zero());

    if convex {
        connect_using_arc(out);
        return;
    }

    // concave corner, trim both segments to the intersect closest to the original vertex
    let Some(&s1_start) = out.last() else {
        return;
    };
    let closest = |a: Vector2<T>, b: Vector2<T>| {
        if dist_squared(a, s1.orig_v2_pos) <= dist_squared(b, s1.orig_v2_pos) {
            a
        } else {
            b
        }
    };
    let trim_point = match pline_seg_intr(s1_start, s1.v2, s2.v1, s2.v2, pos_equal_eps) {
        PlineSegIntr::NoIntersect => None,
        PlineSegIntr::TangentIntersect { point } | PlineSegIntr::OneIntersect { point } => Some(point),
        PlineSegIntr::TwoIntersects { point1, point2 }
        | PlineSegIntr::OverlappingLines { point1, point2 }
        | PlineSegIntr::OverlappingArcs { point1, point2 } => Some(closest(point1, point2)),
    };

    match trim_point {
        Some(p) => {
            let trimmed_bulge = seg_sub_bulge(s1_start, s1.v2, s1_start.pos(), p);
            if let Some(last) = out.last_mut() {
                last.bulge = trimmed_bulge;
            }
            let remaining_bulge = seg_sub_bulge(s2.v1, s2.v2, p, s2.v2.pos());
            push_or_replace(out, PlineVertex::from_vector2(p, remaining_bulge), pos_equal_eps);
        }
        None => {
            // joined with a line, the self intersects this creates are sliced away later
            push_or_replace(out, PlineVertex::from_vector2(p_end, T::zero()), pos_equal_eps);
            push_or_replace(out, s2.v1, pos_equal_eps);
        }
    }
}

/// Create the raw offset polyline: offset segments joined at every original vertex, not yet
/// trimmed of self intersects.
pub fn create_raw_offset_polyline<T>(pline: &Polyline<T>, offset: T, pos_equal_eps: T) -> Polyline<T>
where
    T: Real,
{
    let segs = create_raw_offset_segs(pline, offset, pos_equal_eps);
    let mut out: Vec<PlineVertex<T>> = Vec::with_capacity(segs.len() * 2);
    let (Some(first), Some(last)) = (segs.first(), segs.last()) else {
        return Polyline::new();
    };

    out.push(first.v1);
    for w in segs.windows(2) {
        join_raw_segs(&w[0], &w[1], offset, &mut out, pos_equal_eps);
    }

    if pline.is_closed() && segs.len() > 1 {
        join_raw_segs(last, first, offset, &mut out, pos_equal_eps);
        // the join produced the (possibly trimmed) start of the first segment as the last vertex
        if out.len() > 1 {
            if let Some(wrapped_start) = out.pop() {
                if !wrapped_start.pos().fuzzy_eq_eps(out[0].pos(), pos_equal_eps) {
                    let bulge = if out.len() > 1 {
                        seg_sub_bulge(first.v1, first.v2, wrapped_start.pos(), out[1].pos())
                    } else {
                        wrapped_start.bulge
                    };
                    out[0] = PlineVertex::from_vector2(wrapped_start.pos(), bulge);
                }
            }
        }
    } else {
        push_or_replace(&mut out, last.v2, pos_equal_eps);
    }

    let raw = Polyline::from_vertexes(out, pline.is_closed());
    let raw = raw.remove_repeat_positions(pos_equal_eps).into_owned();
    if raw.vertex_count() < 2 {
        return Polyline::new();
    }

    raw
}

/// True if `point` is at least `|offset| - offset_dist_eps` away from every segment of the original.
pub fn point_valid_for_offset<T>(
    original: &Polyline<T>,
    original_index: &SpatialIndex<T>,
    offset: T,
    point: Vector2<T>,
    offset_dist_eps: T,
    query_stack: &mut Vec<usize>,
) -> bool
where
    T: Real,
{
    let min_dist = offset.abs() - offset_dist_eps;
    if min_dist <= T::zero() {
        return true;
    }

    let min_dist_sq = min_dist * min_dist;
    let mut point_valid = true;
    let mut visitor = |i: usize| {
        let j = original.next_wrapping_index(i);
        let cp = seg_closest_point(original[i], original[j], point);
        if dist_squared(cp, point) < min_dist_sq {
            point_valid = false;
            Control::Break(())
        } else {
            Control::Continue
        }
    };

    original_index.visit_query(
        &AABB::new(point.x - min_dist, point.y - min_dist, point.x + min_dist, point.y + min_dist),
        &mut visitor,
        query_stack,
    );

    point_valid
}

/// True if any segment of `slice` intersects (or touches) the original polyline.
pub fn slice_intersects_original<T>(
    slice: &Polyline<T>,
    original: &Polyline<T>,
    original_index: &SpatialIndex<T>,
    pos_equal_eps: T,
    query_stack: &mut Vec<usize>,
) -> bool
where
    T: Real,
{
    for (v1, v2) in slice.iter_segments() {
        let bb = seg_fast_approx_bounding_box(v1, v2);
        let query_box = AABB::new(
            bb.min_x - pos_equal_eps,
            bb.min_y - pos_equal_eps,
            bb.max_x + pos_equal_eps,
            bb.max_y + pos_equal_eps,
        );
        let mut intersects = false;
        let mut visitor = |i: usize| {
            let u1 = original[i];
            let u2 = original[original.next_wrapping_index(i)];
            if matches!(pline_seg_intr(v1, v2, u1, u2, pos_equal_eps), PlineSegIntr::NoIntersect) {
                Control::Continue
            } else {
                intersects = true;
                Control::Break(())
            }
        };
        original_index.visit_query(&query_box, &mut visitor, query_stack);

        if intersects {
            return true;
        }
    }

    false
}

/// Test every vertex and segment midpoint of `slice` for distance validity.
pub fn slice_points_valid<T>(
    slice: &Polyline<T>,
    original: &Polyline<T>,
    original_index: &SpatialIndex<T>,
    offset: T,
    offset_dist_eps: T,
    query_stack: &mut Vec<usize>,
) -> bool
where
    T: Real,
{
    let valid = |p: Vector2<T>, stack: &mut Vec<usize>| {
        point_valid_for_offset(original, original_index, offset, p, offset_dist_eps, stack)
    };

    slice.iter_vertexes().all(|v| valid(v.pos(), query_stack))
        && slice
            .iter_segments()
            .all(|(v1, v2)| valid(seg_midpoint(v1, v2), query_stack))
}

/// Circle as a closed polyline of two half arcs.
fn circle_pline<T>(center: Vector2<T>, radius: T) -> Polyline<T>
where
    T: Real,
{
    Polyline::from_vertexes(
        [
            PlineVertex::new(center.x - radius, center.y, T::one()),
            PlineVertex::new(center.x + radius, center.y, T::one()),
        ],
        true,
    )
}

/// Points on `raw_offset` where it must be sliced.
fn raw_offset_split_points<T>(
    original: &Polyline<T>,
    raw_offset: &Polyline<T>,
    raw_offset_index: &SpatialIndex<T>,
    offset: T,
    options: &OffsetOptions<T>,
) -> Result<Vec<SplitPoint<T>>, KernelError>
where
    T: Real,
{
    let pos_equal_eps = options.pos_equal_eps;
    let mut points = Vec::new();

    let self_intrs = raw_offset.find_self_intersects(raw_offset_index, pos_equal_eps)?;
    for intr in self_intrs.basic_intersects.iter() {
        points.push(SplitPoint::new(intr.start_index1, intr.point));
        points.push(SplitPoint::new(intr.start_index2, intr.point));
    }
    for intr in self_intrs.overlapping_intersects.iter() {
        for p in [intr.point1, intr.point2] {
            points.push(SplitPoint::new(intr.start_index1, p));
            points.push(SplitPoint::new(intr.start_index2, p));
        }
    }

    let find_on_raw = |other: &Polyline<T>, points: &mut Vec<SplitPoint<T>>| -> Result<(), KernelError> {
        let intrs = find_intersects(
            raw_offset,
            other,
            &FindIntersectsOptions {
                pline1_index: IndexSource::Provided(raw_offset_index),
                pos_equal_eps,
            },
        )?;
        for intr in intrs.basic_intersects.iter() {
            points.push(SplitPoint::new(intr.start_index1, intr.point));
        }
        for intr in intrs.overlapping_intersects.iter() {
            points.push(SplitPoint::new(intr.start_index1, intr.point1));
            points.push(SplitPoint::new(intr.start_index1, intr.point2));
        }
        Ok(())
    };

    if options.handle_self_intersects || !original.is_closed() {
        let dual_raw_offset = create_raw_offset_polyline(original, -offset, pos_equal_eps);
        if dual_raw_offset.vertex_count() > 1 {
            find_on_raw(&dual_raw_offset, &mut points)?;
        }
    }

    if !original.is_closed() {
        let n = original.vertex_count();
        for end in [original[0].pos(), original[n - 1].pos()] {
            find_on_raw(&circle_pline(end, offset.abs()), &mut points)?;
        }
    }

    Ok(points)
}

/// Offset `pline` by `offset`, returning the trimmed offset polylines.
pub fn parallel_offset<T>(
    pline: &Polyline<T>,
    offset: T,
    options: &OffsetOptions<T>,
) -> Result<Vec<Polyline<T>>, KernelError>
where
    T: Real,
{
    let pos_equal_eps = options.pos_equal_eps;
    let cleaned = pline.remove_repeat_positions(pos_equal_eps);
    let original: &Polyline<T> = &cleaned;
    if original.vertex_count() < 2 {
        return Ok(Vec::new());
    }

    // a provided index only matches when no repeat vertexes were removed
    let constructed_index;
    let original_index = match (&cleaned, options.index) {
        (Cow::Borrowed(_), IndexSource::Provided(index)) => {
            index.check_segment_count(original.segment_count())?;
            index
        }
        _ => {
            constructed_index = original.create_approx_index()?;
            &constructed_index
        }
    };

    let raw_offset = create_raw_offset_polyline(original, offset, pos_equal_eps);
    if raw_offset.vertex_count() < 2 {
        tracing::debug!(raw_vertex_count = raw_offset.vertex_count(), "offset collapsed");
        return Ok(Vec::new());
    }

    let raw_offset_index = raw_offset.create_approx_index()?;
    let split_points = sort_split_points(
        &raw_offset,
        raw_offset_split_points(original, &raw_offset, &raw_offset_index, offset, options)?,
        pos_equal_eps,
    );

    let mut query_stack = Vec::with_capacity(8);
    let finish = |mut result: Polyline<T>| {
        result.set_userdata(original.userdata().to_vec());
        result
    };

    if split_points.is_empty() {
        let valid = point_valid_for_offset(
            original,
            original_index,
            offset,
            raw_offset[0].pos(),
            options.offset_dist_eps,
            &mut query_stack,
        );
        tracing::debug!(
            raw_vertex_count = raw_offset.vertex_count(),
            slice_points = 0,
            valid,
            "parallel offset"
        );
        return Ok(if valid { vec![finish(raw_offset)] } else { Vec::new() });
    }

    let slices: Vec<PlineSlice<T>> = create_slices(&raw_offset, &split_points, 0, pos_equal_eps)
        .into_iter()
        .filter(|s| {
            slice_points_valid(
                &s.pline,
                original,
                original_index,
                offset,
                options.offset_dist_eps,
                &mut query_stack,
            ) && !slice_intersects_original(
                &s.pline,
                original,
                original_index,
                pos_equal_eps,
                &mut query_stack,
            )
        })
        .collect();

    let raw_count = raw_offset.vertex_count();
    let is_closed = original.is_closed();
    let forward_dist = |from: usize, to: usize| {
        if to >= from {
            to - from
        } else if is_closed {
            raw_count - from + to
        } else {
            usize::MAX
        }
    };

    let stitched = stitch_slices(&slices, options.slice_join_eps, |current, c| {
        (forward_dist(current.end_index, c.slice.start_index), !c.closes, c.slice_index)
    })?;

    let mut results = Vec::with_capacity(stitched.len());
    for s in stitched.into_iter() {
        if is_closed && !s.pline.is_closed() {
            tracing::debug!(
                vertex_count = s.pline.vertex_count(),
                "dropping open fragment of closed offset"
            );
            continue;
        }

        let result = s.pline.remove_repeat_positions(pos_equal_eps).into_owned();
        if result.vertex_count() < 2 || (result.is_closed() && result.area().fuzzy_eq_zero_eps(pos_equal_eps)) {
            continue;
        }

        results.push(finish(result));
    }

    tracing::debug!(
        raw_vertex_count = raw_count,
        slice_points = split_points.len(),
        valid_slices = slices.len(),
        results = results.len(),
        "parallel offset"
    );

    Ok(results)
}
