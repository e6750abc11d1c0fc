use crate::{
    core::{math::Vector2, traits::Real, Control, ControlFlow},
    error::KernelError,
    polyline::{
        pline_seg_intr, seg_fast_approx_bounding_box, BasicIntersect, FindIntersectsOptions,
        IndexSource, IntersectsCollection, OverlappingIntersect, PlineIntersectVisitor,
        PlineSegIntr, Polyline, SpatialIndex,
    },
};
use static_aabb2d_index::AABB;
use std::collections::HashSet;

/// Box around the segment starting at `i`, grown by `fuzz`.
#[inline]
fn seg_query_box<T>(polyline: &Polyline<T>, i: usize, fuzz: T) -> AABB<T>
where
    T: Real,
{
    let bb = seg_fast_approx_bounding_box(polyline[i], polyline[polyline.next_wrapping_index(i)]);
    AABB::new(bb.min_x - fuzz, bb.min_y - fuzz, bb.max_x + fuzz, bb.max_y + fuzz)
}

/// Visits all local self intersects of the polyline. Local self intersects are between two
/// segments that share a vertex, the shared vertex itself is not an intersect.
pub fn visit_local_self_intersects<T, C, V>(
    polyline: &Polyline<T>,
    visitor: &mut V,
    pos_equal_eps: T,
) -> C
where
    T: Real,
    C: ControlFlow,
    V: PlineIntersectVisitor<T, C>,
{
    let ln = polyline.vertex_count();
    if ln < 2 {
        return C::continuing();
    }

    if ln == 2 {
        // both segments share both vertexes, only a full fold back on itself counts
        if polyline.is_closed() && polyline[0].bulge.fuzzy_eq(-polyline[1].bulge) {
            return visitor.visit_overlapping_intr(OverlappingIntersect::new(
                0,
                1,
                polyline[0].pos(),
                polyline[1].pos(),
            ));
        }
        return C::continuing();
    }

    let mut visit_indexes = |i: usize, j: usize, k: usize| {
        let v1 = polyline[i];
        let v2 = polyline[j];
        let v3 = polyline[k];
        let not_shared = |p: Vector2<T>| !p.fuzzy_eq_eps(v2.pos(), pos_equal_eps);

        match pline_seg_intr(v1, v2, v2, v3, pos_equal_eps) {
            PlineSegIntr::NoIntersect => {}
            PlineSegIntr::TangentIntersect { point } | PlineSegIntr::OneIntersect { point } => {
                if not_shared(point) {
                    try_cf!(visitor.visit_basic_intr(BasicIntersect::new(i, j, point)));
                }
            }
            PlineSegIntr::TwoIntersects { point1, point2 } => {
                if not_shared(point1) {
                    try_cf!(visitor.visit_basic_intr(BasicIntersect::new(i, j, point1)));
                }
                if not_shared(point2) {
                    try_cf!(visitor.visit_basic_intr(BasicIntersect::new(i, j, point2)));
                }
            }
            PlineSegIntr::OverlappingLines { point1, point2 }
            | PlineSegIntr::OverlappingArcs { point1, point2 } => {
                try_cf!(visitor.visit_overlapping_intr(OverlappingIntersect::new(
                    i, j, point1, point2
                )));
            }
        }

        C::continuing()
    };

    for i in 2..ln {
        try_cf!(visit_indexes(i - 2, i - 1, i));
    }

    if polyline.is_closed() {
        // remaining adjacent pairs across the closing segment
        try_cf!(visit_indexes(ln - 2, ln - 1, 0));
        try_cf!(visit_indexes(ln - 1, 0, 1));
    }

    C::continuing()
}

/// Visits all global self intersects of the polyline. Global self intersects are between two
/// segments that do not share a vertex, each segment pair is tested once.
///
/// An intersect at the end point of both segments is skipped since it is found again by the
/// segments starting at those points.
pub fn visit_global_self_intersects<T, C, V>(
    polyline: &Polyline<T>,
    index: &SpatialIndex<T>,
    visitor: &mut V,
    pos_equal_eps: T,
) -> C
where
    T: Real,
    C: ControlFlow,
    V: PlineIntersectVisitor<T, C>,
{
    let ln = polyline.vertex_count();
    if ln < 3 {
        return C::continuing();
    }

    let mut query_stack = Vec::with_capacity(8);
    let mut cf = C::continuing();

    for (i, j) in polyline.iter_segment_indexes() {
        let v1 = polyline[i];
        let v2 = polyline[j];
        let mut query_visitor = |hit_i: usize| {
            let hit_j = polyline.next_wrapping_index(hit_i);
            // each pair once, and skip local pairs
            if hit_i <= i || i == hit_j || j == hit_i || j == hit_j {
                return Control::Continue;
            }

            let u1 = polyline[hit_i];
            let u2 = polyline[hit_j];
            let skip_intr_at_end = |intr: Vector2<T>| -> bool {
                v2.pos().fuzzy_eq_eps(intr, pos_equal_eps) && u2.pos().fuzzy_eq_eps(intr, pos_equal_eps)
            };

            match pline_seg_intr(v1, v2, u1, u2, pos_equal_eps) {
                PlineSegIntr::NoIntersect => {}
                PlineSegIntr::TangentIntersect { point } | PlineSegIntr::OneIntersect { point } => {
                    if !skip_intr_at_end(point) {
                        cf = visitor.visit_basic_intr(BasicIntersect::new(i, hit_i, point));
                    }
                }
                PlineSegIntr::TwoIntersects { point1, point2 } => {
                    if !skip_intr_at_end(point1) {
                        cf = visitor.visit_basic_intr(BasicIntersect::new(i, hit_i, point1));
                    }
                    if !cf.should_break() && !skip_intr_at_end(point2) {
                        cf = visitor.visit_basic_intr(BasicIntersect::new(i, hit_i, point2));
                    }
                }
                PlineSegIntr::OverlappingLines { point1, point2 }
                | PlineSegIntr::OverlappingArcs { point1, point2 } => {
                    if !skip_intr_at_end(point1) {
                        cf = visitor.visit_overlapping_intr(OverlappingIntersect::new(
                            i, hit_i, point1, point2,
                        ));
                    }
                }
            }

            if cf.should_break() {
                Control::Break(())
            } else {
                Control::Continue
            }
        };

        index.visit_query(
            &seg_query_box(polyline, i, pos_equal_eps),
            &mut query_visitor,
            &mut query_stack,
        );

        if cf.should_break() {
            break;
        }
    }

    cf
}

/// Find all intersects between two polylines.
///
/// Basic intersects at the end point of a segment are skipped since they are found again by the
/// segment starting at that point, except at the final vertex of an open polyline. Overlapping
/// intersects are recorded with `point1` and `point2` ordered along the `pline1` segment and basic
/// intersects coinciding with an overlap end point are removed.
pub fn find_intersects<T>(
    pline1: &Polyline<T>,
    pline2: &Polyline<T>,
    options: &FindIntersectsOptions<T>,
) -> Result<IntersectsCollection<T>, KernelError>
where
    T: Real,
{
    let mut result = IntersectsCollection::new_empty();
    if pline1.vertex_count() < 2 || pline2.vertex_count() < 2 {
        return Ok(result);
    }

    let pos_equal_eps = options.pos_equal_eps;
    let constructed_index;
    let pline1_index = match options.pline1_index {
        IndexSource::Provided(index) => {
            index.check_segment_count(pline1.segment_count())?;
            index
        }
        IndexSource::Build => {
            constructed_index = pline1.create_approx_index()?;
            &constructed_index
        }
    };

    // segment start indexes that may carry a duplicate of an overlap end point
    let mut possible_duplicates1 = HashSet::<usize>::new();
    let mut possible_duplicates2 = HashSet::<usize>::new();

    let open1_last_idx = pline1.vertex_count() - 2;
    let open2_last_idx = pline2.vertex_count() - 2;
    let mut query_stack = Vec::with_capacity(8);

    for (i2, j2) in pline2.iter_segment_indexes() {
        let p2v1 = pline2[i2];
        let p2v2 = pline2[j2];
        let mut query_visitor = |i1: usize| {
            let j1 = pline1.next_wrapping_index(i1);
            let p1v1 = pline1[i1];
            let p1v2 = pline1[j1];

            let skip_intr_at_end = |intr: Vector2<T>| -> bool {
                (p1v2.pos().fuzzy_eq_eps(intr, pos_equal_eps)
                    && (pline1.is_closed() || i1 != open1_last_idx))
                    || (p2v2.pos().fuzzy_eq_eps(intr, pos_equal_eps)
                        && (pline2.is_closed() || i2 != open2_last_idx))
            };

            match pline_seg_intr(p1v1, p1v2, p2v1, p2v2, pos_equal_eps) {
                PlineSegIntr::NoIntersect => {}
                PlineSegIntr::TangentIntersect { point } | PlineSegIntr::OneIntersect { point } => {
                    if !skip_intr_at_end(point) {
                        result.basic_intersects.push(BasicIntersect::new(i1, i2, point));
                    }
                }
                PlineSegIntr::TwoIntersects { point1, point2 } => {
                    if !skip_intr_at_end(point1) {
                        result.basic_intersects.push(BasicIntersect::new(i1, i2, point1));
                    }
                    if !skip_intr_at_end(point2) {
                        result.basic_intersects.push(BasicIntersect::new(i1, i2, point2));
                    }
                }
                PlineSegIntr::OverlappingLines { point1, point2 }
                | PlineSegIntr::OverlappingArcs { point1, point2 } => {
                    result
                        .overlapping_intersects
                        .push(OverlappingIntersect::new(i1, i2, point1, point2));

                    if p1v2.pos().fuzzy_eq_eps(point1, pos_equal_eps)
                        || p1v2.pos().fuzzy_eq_eps(point2, pos_equal_eps)
                    {
                        possible_duplicates1.insert(j1);
                    }
                    if p2v2.pos().fuzzy_eq_eps(point1, pos_equal_eps)
                        || p2v2.pos().fuzzy_eq_eps(point2, pos_equal_eps)
                    {
                        possible_duplicates2.insert(j2);
                    }
                }
            }
        };

        pline1_index.visit_query(
            &seg_query_box(pline2, i2, pos_equal_eps),
            &mut query_visitor,
            &mut query_stack,
        );
    }

    if result.overlapping_intersects.is_empty() {
        return Ok(result);
    }

    // remove basic intersects duplicating an overlap end point
    let overlaps = &result.overlapping_intersects;
    let on_overlap_end = |intr: &BasicIntersect<T>| {
        let at_start1 = possible_duplicates1.contains(&intr.start_index1)
            && intr.point.fuzzy_eq_eps(pline1[intr.start_index1].pos(), pos_equal_eps);
        let at_start2 = possible_duplicates2.contains(&intr.start_index2)
            && intr.point.fuzzy_eq_eps(pline2[intr.start_index2].pos(), pos_equal_eps);
        at_start1
            || at_start2
            || overlaps.iter().any(|o| {
                intr.point.fuzzy_eq_eps(o.point1, pos_equal_eps)
                    || intr.point.fuzzy_eq_eps(o.point2, pos_equal_eps)
            })
    };

    let basic: Vec<_> = result
        .basic_intersects
        .iter()
        .filter(|intr| !on_overlap_end(intr))
        .copied()
        .collect();

    tracing::trace!(
        basic = basic.len(),
        overlapping = result.overlapping_intersects.len(),
        "found polyline intersects"
    );

    result.basic_intersects = basic;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_self_intersects(pline: &Polyline<f64>) -> IntersectsCollection<f64> {
        let index = pline.create_approx_index().unwrap();
        pline.find_self_intersects(&index, 1e-5).unwrap()
    }

    #[test]
    fn square_has_no_self_intersects() {
        let square = pline_closed![(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 1.0, 0.0), (0.0, 1.0, 0.0)];
        assert!(collect_self_intersects(&square).is_empty());
    }

    #[test]
    fn figure_eight_self_intersect() {
        let pline = pline_closed![(0.0, 0.0, 0.0), (2.0, 2.0, 0.0), (2.0, 0.0, 0.0), (0.0, 2.0, 0.0)];
        let intrs = collect_self_intersects(&pline);
        assert_eq!(intrs.basic_intersects.len(), 1);
        let intr = intrs.basic_intersects[0];
        assert_eq!((intr.start_index1, intr.start_index2), (0, 2));
        assert!(intr.point.fuzzy_eq(Vector2::new(1.0, 1.0)));
    }

    #[test]
    fn local_fold_back_overlap() {
        let pline = pline_open![(0.0, 0.0, 0.0), (4.0, 0.0, 0.0), (2.0, 0.0, 0.0)];
        let intrs = collect_self_intersects(&pline);
        assert_eq!(intrs.overlapping_intersects.len(), 1);
    }

    #[test]
    fn open_end_point_intersect_included() {
        // pline1 ends exactly on pline2's segment interior
        let pline1 = pline_open![(0.0, -1.0, 0.0), (0.0, 0.0, 0.0)];
        let pline2 = pline_open![(-1.0, 0.0, 0.0), (1.0, 0.0, 0.0)];
        let intrs = find_intersects(&pline1, &pline2, &FindIntersectsOptions::new()).unwrap();
        assert_eq!(intrs.basic_intersects.len(), 1);
        assert!(intrs.basic_intersects[0].point.fuzzy_eq(Vector2::new(0.0, 0.0)));
    }

    #[test]
    fn shared_edge_reports_overlap_only() {
        let a = pline_closed![(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 1.0, 0.0), (0.0, 1.0, 0.0)];
        let b = pline_closed![(1.0, 0.0, 0.0), (2.0, 0.0, 0.0), (2.0, 1.0, 0.0), (1.0, 1.0, 0.0)];
        let intrs = find_intersects(&a, &b, &FindIntersectsOptions::new()).unwrap();
        assert_eq!(intrs.overlapping_intersects.len(), 1);
        assert!(intrs.basic_intersects.is_empty());
    }
}
