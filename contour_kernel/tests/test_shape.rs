mod test_utils;

use contour_kernel::{
    polyline::PlineOrientation,
    shape::{Shape, ShapeOffsetOptions},
    KernelError,
};
use std::f64::consts::PI;
use test_utils::{circle, square};

#[test]
fn empty_shape() {
    let shape = Shape::<f64>::empty();
    assert!(shape.is_empty());
    assert!(shape.parallel_offset(1.0, &ShapeOffsetOptions::new()).unwrap().is_empty());
}

#[test]
fn nearby_islands_merge_when_grown() {
    let mut a = square(0.0, 0.0, 4.0);
    a.set_userdata(vec![1]);
    let shape = Shape::from_plines([a, square(5.0, 0.0, 4.0)]).unwrap();
    let single_area = 32.0 + PI;

    let result = shape.parallel_offset(1.0, &ShapeOffsetOptions::new()).unwrap();
    assert_eq!(result.ccw_count(), 1);
    assert_eq!(result.cw_count(), 0);
    let area = result.ccw_pline(0).unwrap().area();
    assert!(area > 2.0 * single_area - 6.0 && area < 2.0 * single_area - 4.0, "area: {}", area);
    assert_eq!(result.ccw_userdata(0).unwrap(), &[1]);
}

#[test]
fn far_islands_stay_separate() {
    let shape = Shape::from_plines([square(0.0, 0.0, 4.0), square(20.0, 0.0, 4.0)]).unwrap();
    let result = shape.parallel_offset(1.0, &ShapeOffsetOptions::new()).unwrap();
    assert_eq!(result.ccw_count(), 2);
    for p in result.ccw_plines() {
        assert!((p.area() - (32.0 + PI)).abs() < 1e-6);
    }
}

#[test]
fn shrinking_island_with_circular_hole() {
    let shape = Shape::from_plines([square(0.0, 0.0, 20.0), {
        let mut hole = circle(10.0, 10.0, 2.0);
        hole.invert_direction();
        hole.set_userdata(vec![9]);
        hole
    }])
    .unwrap();

    let result = shape.parallel_offset(-1.0, &ShapeOffsetOptions::new()).unwrap();
    assert_eq!(result.ccw_count(), 1);
    assert_eq!(result.cw_count(), 1);
    assert!((result.ccw_pline(0).unwrap().area() - 324.0).abs() < 1e-6);
    assert!((result.cw_pline(0).unwrap().area() + 9.0 * PI).abs() < 1e-6);
    assert_eq!(result.cw_userdata(0).unwrap(), &[9]);
}

#[test]
fn contour_index_out_of_bounds() {
    let mut shape = Shape::from_plines([square(0.0, 0.0, 1.0)]).unwrap();
    assert_eq!(
        shape.ccw_pline(3).unwrap_err(),
        KernelError::ContourIndexOutOfBounds {
            orientation: PlineOrientation::CounterClockwise,
            index: 3,
            len: 1
        }
    );
    assert_eq!(
        shape.set_cw_userdata(0, vec![1]).unwrap_err(),
        KernelError::ContourIndexOutOfBounds {
            orientation: PlineOrientation::Clockwise,
            index: 0,
            len: 0
        }
    );
    assert!(shape.cw_userdata(0).is_err());
}
