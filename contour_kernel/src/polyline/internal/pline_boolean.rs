use super::{
    pline_intersects::find_intersects,
    pline_slice::{create_slices, sort_split_points, stitch_slices, PlineSlice, SplitPoint},
};
use crate::{
    core::traits::Real,
    error::KernelError,
    polyline::{
        seg_closest_point, seg_length, seg_midpoint, seg_tangent_vector, BooleanOp,
        BooleanOptions, BooleanResult, BooleanResultInfo, FindIntersectsOptions, IndexSource,
        IntersectsCollection, PlineOrientation, Polyline, SpatialIndex,
    },
};
use static_aabb2d_index::AABB;
use std::borrow::Cow;

/// Where a slice lies relative to the other boolean operand.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SliceClass {
    Inside,
    Outside,
    /// Coincident with the other polyline running the same direction.
    SharedSame,
    /// Coincident with the other polyline running the opposite direction.
    SharedOpposite,
}

const PLINE1_SOURCE: usize = 0;
const PLINE2_SOURCE: usize = 1;

/// Operand with less than 2 vertexes or (closed) with no area.
fn is_empty_operand<T>(pline: &Polyline<T>, collapsed_area_eps: T) -> bool
where
    T: Real,
{
    pline.vertex_count() < 2 || (pline.is_closed() && pline.area().abs() < collapsed_area_eps)
}

fn to_ccw<T>(pline: &Polyline<T>) -> Cow<'_, Polyline<T>>
where
    T: Real,
{
    if pline.orientation() == PlineOrientation::Clockwise {
        let mut inverted = pline.clone();
        inverted.invert_direction();
        Cow::Owned(inverted)
    } else {
        Cow::Borrowed(pline)
    }
}

fn as_cw<T>(pline: &Polyline<T>) -> Polyline<T>
where
    T: Real,
{
    let mut inverted = pline.clone();
    inverted.invert_direction();
    inverted
}

/// Classify `slice` against `other` using the midpoint of the slice's longest segment.
pub fn classify_slice<T>(
    slice: &Polyline<T>,
    other: &Polyline<T>,
    other_index: &SpatialIndex<T>,
    pos_equal_eps: T,
    query_stack: &mut Vec<usize>,
) -> SliceClass
where
    T: Real,
{
    let longest = slice
        .iter_segments()
        .map(|(v1, v2)| (seg_length(v1, v2), v1, v2))
        .fold(None, |acc: Option<(T, _, _)>, item| match acc {
            Some(best) if best.0 >= item.0 => Some(best),
            _ => Some(item),
        });

    let Some((_, v1, v2)) = longest else {
        return SliceClass::Outside;
    };

    let mid = seg_midpoint(v1, v2);
    let tangent = seg_tangent_vector(v1, v2, mid);

    let query_box = AABB::new(
        mid.x - pos_equal_eps,
        mid.y - pos_equal_eps,
        mid.x + pos_equal_eps,
        mid.y + pos_equal_eps,
    );
    let mut coincident = None;
    let mut visitor = |i: usize| {
        if coincident.is_some() {
            return;
        }
        let u1 = other[i];
        let u2 = other[other.next_wrapping_index(i)];
        let cp = seg_closest_point(u1, u2, mid);
        if cp.fuzzy_eq_eps(mid, pos_equal_eps) {
            coincident = Some(seg_tangent_vector(u1, u2, cp));
        }
    };
    other_index.visit_query(&query_box, &mut visitor, query_stack);

    match coincident {
        Some(other_tangent) if tangent.dot(other_tangent) > T::zero() => SliceClass::SharedSame,
        Some(_) => SliceClass::SharedOpposite,
        None if other.winding_number(mid) != 0 => SliceClass::Inside,
        None => SliceClass::Outside,
    }
}

/// Split points on each polyline from the intersects (overlap end points included).
fn split_points<T>(
    intrs: &IntersectsCollection<T>,
) -> (Vec<SplitPoint<T>>, Vec<SplitPoint<T>>)
where
    T: Real,
{
    let mut points1 = Vec::with_capacity(intrs.len() * 2);
    let mut points2 = Vec::with_capacity(intrs.len() * 2);
    for intr in intrs.basic_intersects.iter() {
        points1.push(SplitPoint::new(intr.start_index1, intr.point));
        points2.push(SplitPoint::new(intr.start_index2, intr.point));
    }

    for intr in intrs.overlapping_intersects.iter() {
        for p in [intr.point1, intr.point2] {
            points1.push(SplitPoint::new(intr.start_index1, p));
            points2.push(SplitPoint::new(intr.start_index2, p));
        }
    }

    (points1, points2)
}

/// Stitch selected slices into closed loops and sort them by orientation, dropping loops that
/// collapsed.
fn stitch_into_result<T>(
    selected: &[PlineSlice<T>],
    pos_plines: &mut Vec<Polyline<T>>,
    neg_plines: &mut Vec<Polyline<T>>,
    options: &BooleanOptions<T>,
) -> Result<(), KernelError>
where
    T: Real,
{
    // close the loop first, then prefer switching to the other polyline
    let stitched = stitch_slices(selected, options.pos_equal_eps, |current, c| {
        (!c.closes, c.slice.source == current.source, c.slice_index)
    })?;

    for s in stitched.into_iter() {
        if !s.pline.is_closed() {
            tracing::debug!(
                vertex_count = s.pline.vertex_count(),
                "dropping unclosed boolean fragment"
            );
            continue;
        }

        let cleaned = s.pline.remove_redundant(options.pos_equal_eps).into_owned();
        if cleaned.vertex_count() < 2 {
            continue;
        }

        let area = cleaned.area();
        if area.abs() < options.collapsed_area_eps {
            continue;
        }

        if area > T::zero() {
            pos_plines.push(cleaned);
        } else {
            neg_plines.push(cleaned);
        }
    }

    Ok(())
}

/// Boolean results when one operand is empty.
fn empty_operand_result<T>(
    pline1: &Polyline<T>,
    pline2: &Polyline<T>,
    empty1: bool,
    empty2: bool,
    op: BooleanOp,
) -> BooleanResult<T>
where
    T: Real,
{
    let keep = |p: &Polyline<T>| vec![to_ccw(p).into_owned()];
    let pos_plines = match op {
        BooleanOp::And => Vec::new(),
        BooleanOp::Not if empty1 => Vec::new(),
        BooleanOp::Not => keep(pline1),
        BooleanOp::Or | BooleanOp::Xor if !empty1 => keep(pline1),
        BooleanOp::Or | BooleanOp::Xor if !empty2 => keep(pline2),
        BooleanOp::Or | BooleanOp::Xor => Vec::new(),
    };

    BooleanResult::new(pos_plines, Vec::new(), BooleanResultInfo::EmptyOperand)
}

/// Boolean results when the polylines do not intersect.
fn no_intersect_result<T>(
    pline1: &Polyline<T>,
    pline2: &Polyline<T>,
    op: BooleanOp,
) -> BooleanResult<T>
where
    T: Real,
{
    use BooleanResultInfo::*;

    let info = if pline2.winding_number(pline1[0].pos()) != 0 {
        Pline1InsidePline2
    } else if pline1.winding_number(pline2[0].pos()) != 0 {
        Pline2InsidePline1
    } else {
        Disjoint
    };

    let a = || pline1.clone();
    let b = || pline2.clone();
    let (pos_plines, neg_plines) = match (op, info) {
        (BooleanOp::Or, Pline1InsidePline2) => (vec![b()], vec![]),
        (BooleanOp::Or, Pline2InsidePline1) => (vec![a()], vec![]),
        (BooleanOp::Or, _) => (vec![a(), b()], vec![]),
        (BooleanOp::And, Pline1InsidePline2) => (vec![a()], vec![]),
        (BooleanOp::And, Pline2InsidePline1) => (vec![b()], vec![]),
        (BooleanOp::And, _) => (vec![], vec![]),
        (BooleanOp::Not, Pline1InsidePline2) => (vec![], vec![]),
        (BooleanOp::Not, Pline2InsidePline1) => (vec![a()], vec![as_cw(pline2)]),
        (BooleanOp::Not, _) => (vec![a()], vec![]),
        (BooleanOp::Xor, Pline1InsidePline2) => (vec![b()], vec![as_cw(pline1)]),
        (BooleanOp::Xor, Pline2InsidePline1) => (vec![a()], vec![as_cw(pline2)]),
        (BooleanOp::Xor, _) => (vec![a(), b()], vec![]),
    };

    BooleanResult::new(pos_plines, neg_plines, info)
}

/// Perform a boolean operation between two closed polylines.
pub fn polyline_boolean<T>(
    pline1: &Polyline<T>,
    pline2: &Polyline<T>,
    op: BooleanOp,
    options: &BooleanOptions<T>,
) -> Result<BooleanResult<T>, KernelError>
where
    T: Real,
{
    let pos_equal_eps = options.pos_equal_eps;
    for p in [pline1, pline2] {
        if p.vertex_count() >= 2 && !p.is_closed() {
            return Err(KernelError::OpenPolyline);
        }
    }

    let empty1 = is_empty_operand(pline1, options.collapsed_area_eps);
    let empty2 = is_empty_operand(pline2, options.collapsed_area_eps);
    if empty1 || empty2 {
        let result = empty_operand_result(pline1, pline2, empty1, empty2, op);
        tracing::debug!(?op, pos = result.pos_plines.len(), "boolean with empty operand");
        return Ok(result);
    }

    let a_ccw = to_ccw(pline1);
    let b_ccw = to_ccw(pline2);
    let a: &Polyline<T> = &a_ccw;
    let b: &Polyline<T> = &b_ccw;

    // a provided index only matches when pline1 was not inverted
    let pline1_index = match (&a_ccw, options.pline1_index) {
        (Cow::Borrowed(_), IndexSource::Provided(index)) => IndexSource::Provided(index),
        _ => IndexSource::Build,
    };

    let constructed_index1;
    let index1 = match pline1_index {
        IndexSource::Provided(index) => index,
        IndexSource::Build => {
            constructed_index1 = a.create_approx_index()?;
            &constructed_index1
        }
    };
    let intrs = find_intersects(
        a,
        b,
        &FindIntersectsOptions {
            pline1_index: IndexSource::Provided(index1),
            pos_equal_eps,
        },
    )?;

    if intrs.is_empty() {
        let result = no_intersect_result(a, b, op);
        tracing::debug!(
            ?op,
            info = ?result.result_info,
            pos = result.pos_plines.len(),
            neg = result.neg_plines.len(),
            "boolean without intersects"
        );
        return Ok(result);
    }

    let (points1, points2) = split_points(&intrs);
    let slices1 = create_slices(
        a,
        &sort_split_points(a, points1, pos_equal_eps),
        PLINE1_SOURCE,
        pos_equal_eps,
    );
    let slices2 = create_slices(
        b,
        &sort_split_points(b, points2, pos_equal_eps),
        PLINE2_SOURCE,
        pos_equal_eps,
    );

    let index2 = b.create_approx_index()?;
    let mut query_stack = Vec::with_capacity(8);

    let classified1: Vec<(PlineSlice<T>, SliceClass)> = slices1
        .into_iter()
        .map(|s| {
            let class = classify_slice(&s.pline, b, &index2, pos_equal_eps, &mut query_stack);
            (s, class)
        })
        .collect();
    let classified2: Vec<(PlineSlice<T>, SliceClass)> = slices2
        .into_iter()
        .map(|s| {
            let class = classify_slice(&s.pline, a, index1, pos_equal_eps, &mut query_stack);
            (s, class)
        })
        .collect();

    let all_shared = classified1
        .iter()
        .chain(classified2.iter())
        .all(|(_, c)| matches!(c, SliceClass::SharedSame | SliceClass::SharedOpposite));

    let select = |from: &[(PlineSlice<T>, SliceClass)], classes: &[SliceClass], invert: bool| {
        from.iter()
            .filter(|(_, c)| classes.contains(c))
            .map(|(s, _)| {
                let mut s = s.clone();
                if invert {
                    s.pline.invert_direction();
                    std::mem::swap(&mut s.start_index, &mut s.end_index);
                }
                s
            })
            .collect::<Vec<_>>()
    };

    use SliceClass::*;
    let groups: Vec<Vec<PlineSlice<T>>> = match op {
        BooleanOp::Or => {
            let mut g = select(&classified1, &[Outside, SharedSame], false);
            g.extend(select(&classified2, &[Outside], false));
            vec![g]
        }
        BooleanOp::And => {
            let mut g = select(&classified1, &[Inside, SharedSame], false);
            g.extend(select(&classified2, &[Inside], false));
            vec![g]
        }
        BooleanOp::Not => {
            let mut g = select(&classified1, &[Outside, SharedOpposite], false);
            g.extend(select(&classified2, &[Inside], true));
            vec![g]
        }
        BooleanOp::Xor => {
            let mut g1 = select(&classified1, &[Outside, SharedOpposite], false);
            g1.extend(select(&classified2, &[Inside], true));
            let mut g2 = select(&classified2, &[Outside, SharedOpposite], false);
            g2.extend(select(&classified1, &[Inside], true));
            vec![g1, g2]
        }
    };

    let mut pos_plines = Vec::new();
    let mut neg_plines = Vec::new();
    for group in groups.iter() {
        stitch_into_result(group, &mut pos_plines, &mut neg_plines, options)?;
    }

    let result_info = if all_shared {
        BooleanResultInfo::Overlapping
    } else {
        BooleanResultInfo::Intersected
    };

    tracing::debug!(
        ?op,
        info = ?result_info,
        basic_intersects = intrs.basic_intersects.len(),
        overlapping_intersects = intrs.overlapping_intersects.len(),
        slices = classified1.len() + classified2.len(),
        pos = pos_plines.len(),
        neg = neg_plines.len(),
        "polyline boolean"
    );

    Ok(BooleanResult::new(pos_plines, neg_plines, result_info))
}
