mod test_utils;

use contour_kernel::{
    core::math::Vector2,
    pline_closed, pline_open,
    polyline::FindIntersectsOptions,
};
use test_utils::{circle, for_each_modified, square};

const EPS: f64 = 1e-5;

#[test]
fn convex_polygons_have_no_self_intersects() {
    for pline in [square(0.0, 0.0, 10.0), circle(3.0, 3.0, 2.0)] {
        for_each_modified(&pline, |p, state| {
            assert!(!p.scan_for_self_intersect(EPS).unwrap(), "state: {:?}", state);
            let index = p.create_approx_index().unwrap();
            assert!(p.find_self_intersects(&index, EPS).unwrap().is_empty());
        });
    }
}

#[test]
fn figure_eight_self_intersects() {
    let figure_eight = pline_closed![(0.0, 0.0, 0.0), (2.0, 2.0, 0.0), (2.0, 0.0, 0.0), (0.0, 2.0, 0.0)];
    for_each_modified(&figure_eight, |p, state| {
        assert!(p.scan_for_self_intersect(EPS).unwrap(), "state: {:?}", state);
        let index = p.create_approx_index().unwrap();
        let intrs = p.find_self_intersects(&index, EPS).unwrap();
        assert_eq!(intrs.basic_intersects.len(), 1, "state: {:?}", state);
        assert!(intrs.basic_intersects[0].point.fuzzy_eq(Vector2::new(1.0, 1.0)));
    });
}

#[test]
fn open_polyline_crossing_itself() {
    let pline = pline_open![(0.0, 0.0, 0.0), (4.0, 0.0, 0.0), (4.0, 2.0, 0.0), (2.0, 2.0, 0.0), (2.0, -2.0, 0.0)];
    assert!(pline.scan_for_self_intersect(EPS).unwrap());

    let touching_ends = pline_open![(0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (2.0, 2.0, 0.0)];
    assert!(!touching_ends.scan_for_self_intersect(EPS).unwrap());
}

#[test]
fn arc_loop_intersects() {
    // arc leaving and crossing back over the first line
    let pline = pline_open![(0.0, 0.0, 0.0), (4.0, 0.0, 1.0), (4.0, 2.0, 0.0), (2.0, -1.0, 0.0)];
    assert!(pline.scan_for_self_intersect(EPS).unwrap());
}

#[test]
fn intersects_between_two_polylines() {
    let a = square(0.0, 0.0, 10.0);
    let b = square(5.0, 5.0, 10.0);
    let intrs = a.find_intersects(&b, &FindIntersectsOptions::new()).unwrap();
    assert_eq!(intrs.basic_intersects.len(), 2);
    assert!(intrs.overlapping_intersects.is_empty());

    let mut points: Vec<_> = intrs.basic_intersects.iter().map(|i| (i.point.x, i.point.y)).collect();
    points.sort_by(|p, q| p.partial_cmp(q).unwrap());
    assert!(Vector2::new(points[0].0, points[0].1).fuzzy_eq(Vector2::new(5.0, 10.0)));
    assert!(Vector2::new(points[1].0, points[1].1).fuzzy_eq(Vector2::new(10.0, 5.0)));

    let far = square(50.0, 50.0, 1.0);
    assert!(a.find_intersects(&far, &FindIntersectsOptions::new()).unwrap().is_empty());
}
