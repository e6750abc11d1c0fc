//! Splitting polylines into open slices at intersect points and stitching selected slices back
//! together, shared by the boolean, offset and shape algorithms.

use crate::{
    core::{math::Vector2, traits::Real},
    error::KernelError,
    polyline::{seg_param_of_point, seg_split_at_point, seg_sub_bulge, PlineVertex, Polyline},
};
use static_aabb2d_index::StaticAABB2DIndexBuilder;
use std::cmp::Ordering;

/// Point on a polyline used to split it, `seg_index` is the start vertex index of the segment the
/// point lies on.
#[derive(Debug, Copy, Clone)]
pub struct SplitPoint<T> {
    pub seg_index: usize,
    pub point: Vector2<T>,
}

impl<T> SplitPoint<T> {
    #[inline]
    pub fn new(seg_index: usize, point: Vector2<T>) -> Self {
        Self { seg_index, point }
    }
}

/// Open piece of a source polyline.
#[derive(Debug, Clone)]
pub struct PlineSlice<T = f64> {
    pub pline: Polyline<T>,
    /// Caller defined id of the polyline the slice came from.
    pub source: usize,
    /// Segment index (on the source) the slice starts on.
    pub start_index: usize,
    /// Segment index (on the source) the slice ends on.
    pub end_index: usize,
}

impl<T> PlineSlice<T>
where
    T: Real,
{
    #[inline]
    pub fn start_point(&self) -> Vector2<T> {
        self.pline[0].pos()
    }

    #[inline]
    pub fn end_point(&self) -> Vector2<T> {
        self.pline[self.pline.vertex_count() - 1].pos()
    }
}

/// Normalize, sort and dedupe split points.
///
/// A point on the end of a segment moves to the start of the next segment (except the final
/// vertex of an open polyline), then points are sorted by segment and by position along the
/// segment. Repeated points on the same segment are removed.
pub fn sort_split_points<T>(
    pline: &Polyline<T>,
    mut points: Vec<SplitPoint<T>>,
    pos_equal_eps: T,
) -> Vec<SplitPoint<T>>
where
    T: Real,
{
    let n = pline.vertex_count();
    for sp in points.iter_mut() {
        let start = pline[sp.seg_index].pos();
        let next = pline.next_wrapping_index(sp.seg_index);
        let end = pline[next].pos();
        if sp.point.fuzzy_eq_eps(end, pos_equal_eps) {
            if pline.is_closed() || next != n - 1 {
                *sp = SplitPoint::new(next, end);
            } else {
                sp.point = end;
            }
        } else if sp.point.fuzzy_eq_eps(start, pos_equal_eps) {
            sp.point = start;
        }
    }

    let param = |sp: &SplitPoint<T>| {
        let i = sp.seg_index;
        seg_param_of_point(pline[i], pline[pline.next_wrapping_index(i)], sp.point)
    };

    points.sort_by(|a, b| {
        a.seg_index
            .cmp(&b.seg_index)
            .then_with(|| param(a).partial_cmp(&param(b)).unwrap_or(Ordering::Equal))
    });

    points.dedup_by(|a, b| a.seg_index == b.seg_index && a.point.fuzzy_eq_eps(b.point, pos_equal_eps));
    points
}

/// Build the slice of `pline` running from `start` to `end`. When `full_loop` is set (closed
/// polyline with a single split point) the slice goes all the way around.
fn slice_between<T>(
    pline: &Polyline<T>,
    start: SplitPoint<T>,
    end: SplitPoint<T>,
    full_loop: bool,
    pos_equal_eps: T,
) -> Option<Polyline<T>>
where
    T: Real,
{
    let seg = |i: usize| (pline[i], pline[pline.next_wrapping_index(i)]);
    let mut vertexes = Vec::new();

    let (sv1, sv2) = seg(start.seg_index);
    let within_one_seg = !full_loop
        && start.seg_index == end.seg_index
        && seg_param_of_point(sv1, sv2, end.point) >= seg_param_of_point(sv1, sv2, start.point);

    if within_one_seg {
        vertexes.push(PlineVertex::from_vector2(
            start.point,
            seg_sub_bulge(sv1, sv2, start.point, end.point),
        ));
    } else {
        vertexes.push(seg_split_at_point(sv1, sv2, start.point, pos_equal_eps).split_vertex);

        let mut i = pline.next_wrapping_index(start.seg_index);
        let mut guard = 0;
        while i != end.seg_index {
            vertexes.push(pline[i]);
            i = pline.next_wrapping_index(i);
            guard += 1;
            if guard > pline.vertex_count() {
                return None;
            }
        }

        let (ev1, ev2) = seg(end.seg_index);
        vertexes.push(seg_split_at_point(ev1, ev2, end.point, pos_equal_eps).updated_start);
    }
    vertexes.push(PlineVertex::from_vector2(end.point, T::zero()));

    let slice = Polyline::from_vertexes(vertexes, false)
        .remove_repeat_positions(pos_equal_eps)
        .into_owned();

    if slice.vertex_count() < 2 {
        return None;
    }

    Some(slice)
}

/// Slice `pline` at the sorted split points (see [sort_split_points]). Closed polylines need at
/// least one split point, open polylines are also sliced at their end points.
pub fn create_slices<T>(
    pline: &Polyline<T>,
    split_points: &[SplitPoint<T>],
    source: usize,
    pos_equal_eps: T,
) -> Vec<PlineSlice<T>>
where
    T: Real,
{
    let n = pline.vertex_count();
    if n < 2 {
        return Vec::new();
    }

    let make = |start: SplitPoint<T>, end: SplitPoint<T>, full_loop: bool| {
        slice_between(pline, start, end, full_loop, pos_equal_eps).map(|mut sliced| {
            sliced.set_userdata(pline.userdata().to_vec());
            PlineSlice {
                pline: sliced,
                source,
                start_index: start.seg_index,
                end_index: end.seg_index,
            }
        })
    };

    if pline.is_closed() {
        let m = split_points.len();
        return (0..m)
            .filter_map(|k| make(split_points[k], split_points[(k + 1) % m], m == 1))
            .collect();
    }

    let mut bounds = Vec::with_capacity(split_points.len() + 2);
    bounds.push(SplitPoint::new(0, pline[0].pos()));
    bounds.extend_from_slice(split_points);
    bounds.push(SplitPoint::new(n - 2, pline[n - 1].pos()));
    bounds.dedup_by(|a, b| a.seg_index == b.seg_index && a.point.fuzzy_eq_eps(b.point, pos_equal_eps));

    bounds
        .windows(2)
        .filter_map(|w| make(w[0], w[1], false))
        .collect()
}

/// Polyline produced by stitching, `source` is the source of its first slice.
#[derive(Debug, Clone)]
pub struct StitchedPline<T> {
    pub pline: Polyline<T>,
    pub source: usize,
}

/// Candidate for continuing a stitch, passed to the priority function.
#[derive(Debug, Copy, Clone)]
pub struct StitchCandidate<'a, T> {
    pub slice_index: usize,
    pub slice: &'a PlineSlice<T>,
    /// Taking this candidate closes the loop (it is the slice the loop started with).
    pub closes: bool,
}

/// Stitch slices end to start into polylines.
///
/// At each slice end every unused slice starting within `join_eps`, plus the loop start slice if
/// the loop can close, is a candidate. The candidate with the smallest `priority` key is taken.
/// Loops that close are returned closed, others are returned open.
pub fn stitch_slices<T, K, F>(
    slices: &[PlineSlice<T>],
    join_eps: T,
    mut priority: F,
) -> Result<Vec<StitchedPline<T>>, KernelError>
where
    T: Real,
    K: Ord,
    F: FnMut(&PlineSlice<T>, &StitchCandidate<'_, T>) -> K,
{
    let mut result = Vec::new();
    if slices.is_empty() {
        return Ok(result);
    }

    let mut builder = StaticAABB2DIndexBuilder::new(slices.len());
    for s in slices.iter() {
        let p = s.start_point();
        builder.add(p.x - join_eps, p.y - join_eps, p.x + join_eps, p.y + join_eps);
    }
    let start_index = builder.build()?;

    let mut visited = vec![false; slices.len()];
    let mut query_stack = Vec::with_capacity(8);
    let mut query_results = Vec::new();

    for first in 0..slices.len() {
        if visited[first] {
            continue;
        }
        visited[first] = true;

        let loop_start = slices[first].start_point();
        let mut vertexes: Vec<PlineVertex<T>> = slices[first].pline.vertexes().to_vec();
        let mut current = first;
        let mut is_closed = false;
        let mut loop_count = 0;
        let max_loop_count = slices.len() + 1;

        loop {
            loop_count += 1;
            if loop_count > max_loop_count {
                tracing::warn!(
                    first_slice = first,
                    max_loop_count,
                    "slice stitching exceeded loop limit, emitting partial result"
                );
                break;
            }

            let end = slices[current].end_point();
            query_results.clear();
            {
                let mut visitor = |i: usize| {
                    if !visited[i] && slices[i].start_point().fuzzy_eq_eps(end, join_eps) {
                        query_results.push(i);
                    }
                };
                start_index.visit_query_with_stack(
                    end.x - join_eps,
                    end.y - join_eps,
                    end.x + join_eps,
                    end.y + join_eps,
                    &mut visitor,
                    &mut query_stack,
                );
            }

            let mut candidates: Vec<StitchCandidate<T>> = query_results
                .iter()
                .map(|&i| StitchCandidate {
                    slice_index: i,
                    slice: &slices[i],
                    closes: false,
                })
                .collect();

            if end.fuzzy_eq_eps(loop_start, join_eps) {
                candidates.push(StitchCandidate {
                    slice_index: first,
                    slice: &slices[first],
                    closes: true,
                });
            }

            let chosen = candidates
                .iter()
                .min_by_key(|c| priority(&slices[current], c))
                .copied();

            let Some(next) = chosen else {
                tracing::trace!(first_slice = first, "no slice continues stitch, leaving open");
                break;
            };

            // last vertex is replaced by the joined slice start (or the loop start)
            vertexes.pop();
            if next.closes {
                tracing::trace!(first_slice = first, joined = loop_count - 1, "closed stitched loop");
                is_closed = true;
                break;
            }

            tracing::trace!(from = current, to = next.slice_index, "stitching slice");
            vertexes.extend_from_slice(next.slice.pline.vertexes());
            visited[next.slice_index] = true;
            current = next.slice_index;
        }

        let mut pline = Polyline::from_vertexes(vertexes, is_closed);
        pline.set_userdata(slices[first].pline.userdata().to_vec());
        result.push(StitchedPline {
            pline,
            source: slices[first].source,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;

    fn square() -> Polyline<f64> {
        pline_closed![(0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (2.0, 2.0, 0.0), (0.0, 2.0, 0.0)]
    }

    #[test]
    fn split_points_sorted_and_normalized() {
        let pline = square();
        let points = vec![
            SplitPoint::new(2, Vector2::new(1.0, 2.0)),
            SplitPoint::new(0, Vector2::new(1.5, 0.0)),
            SplitPoint::new(0, Vector2::new(2.0, 0.0)),
            SplitPoint::new(0, Vector2::new(0.5, 0.0)),
            SplitPoint::new(1, Vector2::new(2.0, 0.0)),
        ];
        let sorted = sort_split_points(&pline, points, 1e-5);
        let segs: Vec<_> = sorted.iter().map(|sp| sp.seg_index).collect();
        assert_eq!(segs, vec![0, 0, 1, 2]);
        assert!(sorted[0].point.fuzzy_eq(Vector2::new(0.5, 0.0)));
        assert!(sorted[2].point.fuzzy_eq(Vector2::new(2.0, 0.0)));
    }

    #[test]
    fn arc_slices_split_bulges() {
        let circle = pline_closed![(1.0, 0.0, 1.0), (-1.0, 0.0, 1.0)];
        let points = sort_split_points(
            &circle,
            vec![
                SplitPoint::new(0, Vector2::new(0.0, 1.0)),
                SplitPoint::new(1, Vector2::new(0.0, -1.0)),
            ],
            1e-5,
        );
        let slices = create_slices(&circle, &points, 0, 1e-5);
        assert_eq!(slices.len(), 2);

        let eighth = (std::f64::consts::PI / 8.0).tan();
        for s in slices.iter() {
            assert!(s.pline.path_length().fuzzy_eq(std::f64::consts::PI));
            assert_eq!(s.pline.vertex_count(), 3);
            assert!(s.pline[0].bulge.fuzzy_eq(eighth));
            assert!(s.pline[1].bulge.fuzzy_eq(eighth));
            assert!(s.pline[2].bulge.fuzzy_eq(0.0));
        }
    }

    #[test]
    fn closed_slices_cover_loop() {
        let pline = square();
        let points = sort_split_points(
            &pline,
            vec![
                SplitPoint::new(0, Vector2::new(1.0, 0.0)),
                SplitPoint::new(2, Vector2::new(1.0, 2.0)),
            ],
            1e-5,
        );
        let slices = create_slices(&pline, &points, 0, 1e-5);
        assert_eq!(slices.len(), 2);
        let total: f64 = slices.iter().map(|s| s.pline.path_length()).sum();
        assert!(total.fuzzy_eq(8.0));
        assert_eq!(slices[0].pline.vertex_count(), 4);
        assert!(slices[0].end_point().fuzzy_eq(Vector2::new(1.0, 2.0)));
    }

    #[test]
    fn single_split_point_full_loop() {
        let pline = square();
        let points = vec![SplitPoint::new(1, Vector2::new(2.0, 1.0))];
        let slices = create_slices(&pline, &points, 0, 1e-5);
        assert_eq!(slices.len(), 1);
        assert!(slices[0].pline.path_length().fuzzy_eq(8.0));
        assert_eq!(slices[0].pline.vertex_count(), 6);
    }

    #[test]
    fn arc_slice_keeps_shape() {
        // half circle split at its midpoint
        let pline = pline_open![(1.0, 0.0, 1.0), (-1.0, 0.0, 0.0)];
        let points = vec![SplitPoint::new(0, Vector2::new(0.0, 1.0))];
        let slices = create_slices(&pline, &points, 0, 1e-5);
        assert_eq!(slices.len(), 2);
        let quarter = (std::f64::consts::PI / 8.0).tan();
        assert!(slices[0].pline[0].bulge.fuzzy_eq(quarter));
        assert!(slices[1].pline[0].bulge.fuzzy_eq(quarter));
    }

    #[test]
    fn stitch_two_halves_closed() {
        let pline = square();
        let points = sort_split_points(
            &pline,
            vec![
                SplitPoint::new(0, Vector2::new(1.0, 0.0)),
                SplitPoint::new(2, Vector2::new(1.0, 2.0)),
            ],
            1e-5,
        );
        let slices = create_slices(&pline, &points, 0, 1e-5);
        let stitched = stitch_slices(&slices, 1e-5, |_, c| (!c.closes, c.slice_index)).unwrap();
        assert_eq!(stitched.len(), 1);
        assert!(stitched[0].pline.is_closed());
        assert!(stitched[0].pline.area().fuzzy_eq(4.0));
    }
}
