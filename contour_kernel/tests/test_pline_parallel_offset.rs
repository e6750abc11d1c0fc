mod test_utils;

use contour_kernel::{
    assert_fuzzy_eq,
    core::traits::FuzzyEq,
    pline_closed, pline_open,
    polyline::{OffsetOptions, Polyline},
};
use std::f64::consts::PI;
use test_utils::{
    aabb_fuzzy_eq_eps, circle, create_property_set, for_each_modified, property_sets_match, square,
    PlineProperties,
};

fn offset_properties(pline: &Polyline<f64>, offset: f64, handle_self_intersects: bool) -> Vec<PlineProperties> {
    let options = OffsetOptions {
        handle_self_intersects,
        ..OffsetOptions::new()
    };
    let results = pline.parallel_offset_opt(offset, &options).unwrap();
    for r in results.iter() {
        assert_eq!(
            r.remove_repeat_positions(PlineProperties::POS_EQ_EPS).vertex_count(),
            r.vertex_count(),
            "offset result should not have repeat positioned vertexes"
        );
    }
    create_property_set(&results, false)
}

/// Offset every modification of `input` (direction inverted, start index cycled), flipping the
/// offset sign for inverted inputs so the expected results stay the same (up to area sign).
fn run_offset_tests(input: &Polyline<f64>, offset: f64, expected: &[PlineProperties]) {
    for_each_modified(input, |pline, state| {
        let signed = if state.inverted_direction { -offset } else { offset };
        for handle_self_intersects in [true, false] {
            let mut result = offset_properties(&pline, signed, handle_self_intersects);
            if state.inverted_direction {
                for r in result.iter_mut() {
                    r.area = -r.area;
                }
            }
            assert!(
                property_sets_match(&result, expected),
                "state: {:?}, handle_self_intersects: {}",
                state,
                handle_self_intersects
            );
        }
    });
}

#[test]
fn square_inward() {
    run_offset_tests(
        &square(0.0, 0.0, 10.0),
        -1.0,
        &[PlineProperties::new(4, 64.0, 32.0, 1.0, 1.0, 9.0, 9.0)],
    );
}

#[test]
fn square_outward_rounds_corners() {
    run_offset_tests(
        &square(0.0, 0.0, 10.0),
        1.0,
        &[PlineProperties::new(8, 140.0 + PI, 40.0 + 2.0 * PI, -1.0, -1.0, 11.0, 11.0)],
    );
}

#[test]
fn circle_inward_and_outward() {
    let c = circle(0.0, 0.0, 5.0);
    run_offset_tests(&c, -2.0, &[PlineProperties::new(2, 9.0 * PI, 6.0 * PI, -3.0, -3.0, 3.0, 3.0)]);
    run_offset_tests(&c, 2.0, &[PlineProperties::new(2, 49.0 * PI, 14.0 * PI, -7.0, -7.0, 7.0, 7.0)]);
}

#[test]
fn collapsed_offsets_are_empty() {
    assert!(square(0.0, 0.0, 2.0).parallel_offset(-1.5).unwrap().is_empty());
    assert!(circle(0.0, 0.0, 1.0).parallel_offset(-1.5).unwrap().is_empty());
    assert!(Polyline::<f64>::new().parallel_offset(1.0).unwrap().is_empty());
    assert!(pline_closed![(1.0, 1.0, 0.0)].parallel_offset(1.0).unwrap().is_empty());
}

#[test]
fn inward_then_outward_restores_extents() {
    let options = OffsetOptions::new();
    for pline in [square(0.0, 0.0, 10.0), pline_closed![(0.0, 0.0, 0.0), (12.0, 0.0, 0.0), (12.0, 6.0, 0.0), (0.0, 6.0, 0.0)]] {
        let original = pline.extents().unwrap();
        let inward = pline.parallel_offset_opt(-1.0, &options).unwrap();
        assert_eq!(inward.len(), 1);
        let outward = inward[0].parallel_offset_opt(1.0, &options).unwrap();
        assert_eq!(outward.len(), 1);
        let restored = outward[0].extents().unwrap();
        assert!(aabb_fuzzy_eq_eps(&original, &restored, options.offset_dist_eps));
    }
}

#[test]
fn open_corner_offsets() {
    let pline = pline_open![(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 10.0, 0.0)];

    // right side of travel is the outside of the corner
    let right = pline.parallel_offset(1.0).unwrap();
    assert_eq!(right.len(), 1);
    assert!(!right[0].is_closed());
    assert_eq!(right[0].vertex_count(), 4);
    assert_fuzzy_eq!(right[0].path_length(), 20.0 + PI / 2.0, 1e-9);
    let ext = right[0].extents().unwrap();
    assert!(aabb_fuzzy_eq_eps(&ext, &contour_kernel::AABB::new(0.0, -1.0, 11.0, 10.0), 1e-9));

    let left = pline.parallel_offset(-1.0).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].vertex_count(), 3);
    assert_fuzzy_eq!(left[0].path_length(), 18.0, 1e-9);
}

#[test]
fn narrow_neck_splits_into_two() {
    let pline = pline_closed![
        (0.0, 0.0, 0.0),
        (4.0, 0.0, 0.0),
        (4.0, 1.5, 0.0),
        (6.0, 1.5, 0.0),
        (6.0, 0.0, 0.0),
        (10.0, 0.0, 0.0),
        (10.0, 4.0, 0.0),
        (6.0, 4.0, 0.0),
        (6.0, 2.5, 0.0),
        (4.0, 2.5, 0.0),
        (4.0, 4.0, 0.0),
        (0.0, 4.0, 0.0),
    ];
    assert_fuzzy_eq!(pline.area(), 34.0);

    let results = pline.parallel_offset(-1.0).unwrap();
    assert_eq!(results.len(), 2);
    for r in results.iter() {
        assert!(r.is_closed());
        assert!(r.area() > 4.0 && r.area() < 4.6, "area: {}", r.area());
    }
    assert_fuzzy_eq!(results[0].area(), results[1].area(), 1e-6);
}

#[test]
fn offset_keeps_userdata() {
    let mut pline = square(0.0, 0.0, 10.0);
    pline.set_userdata(vec![3, 4]);
    let results = pline.parallel_offset(-1.0).unwrap();
    assert_eq!(results[0].userdata(), &[3, 4]);
}
