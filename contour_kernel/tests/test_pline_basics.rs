mod test_utils;

use contour_kernel::{
    assert_fuzzy_eq,
    core::{math::Vector2, traits::FuzzyEq},
    pline_closed, pline_open,
    polyline::{PlineOrientation, PlineVertex, Polyline},
    KernelError,
};
use std::f64::consts::PI;
use test_utils::{circle, square};

#[test]
fn empty_polyline() {
    let pline = Polyline::<f64>::new();
    assert!(pline.is_empty());
    assert_eq!(pline.segment_count(), 0);
    assert_fuzzy_eq!(pline.area(), 0.0);
    assert_fuzzy_eq!(pline.path_length(), 0.0);
    assert_eq!(
        pline.extents().unwrap_err(),
        KernelError::InsufficientVertexes {
            count: 0,
            required: 2
        }
    );
}

#[test]
fn segment_counts() {
    let open = pline_open![(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 1.0, 0.0)];
    assert_eq!(open.segment_count(), 2);
    let closed = pline_closed![(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 1.0, 0.0)];
    assert_eq!(closed.segment_count(), 3);
    assert_eq!(closed.iter_segments().count(), 3);
    assert_eq!(closed.next_wrapping_index(2), 0);
    assert_eq!(closed.prev_wrapping_index(0), 2);
}

#[test]
fn square_area_and_length() {
    let sq = square(0.0, 0.0, 10.0);
    assert_fuzzy_eq!(sq.area(), 100.0);
    assert_fuzzy_eq!(sq.path_length(), 40.0);
    assert_eq!(sq.orientation(), PlineOrientation::CounterClockwise);

    let mut cw = sq.clone();
    cw.invert_direction();
    assert_fuzzy_eq!(cw.area(), -100.0);
    assert_eq!(cw.orientation(), PlineOrientation::Clockwise);
}

#[test]
fn circle_area_length_extents() {
    let c = circle(2.0, 3.0, 2.0);
    assert_fuzzy_eq!(c.area(), PI * 4.0);
    assert_fuzzy_eq!(c.path_length(), PI * 4.0);
    let ext = c.extents().unwrap();
    assert_fuzzy_eq!(ext.min_x, 0.0);
    assert_fuzzy_eq!(ext.min_y, 1.0);
    assert_fuzzy_eq!(ext.max_x, 4.0);
    assert_fuzzy_eq!(ext.max_y, 5.0);
}

#[test]
fn open_polyline_area_closes_with_chord() {
    // half circle below the x axis, closed by the chord back to the start
    let pline = pline_open![(0.0, 0.0, 1.0), (2.0, 0.0, 0.0)];
    assert_fuzzy_eq!(pline.area(), PI / 2.0);
    assert_fuzzy_eq!(pline.path_length(), PI);
    assert_eq!(pline.orientation(), PlineOrientation::Open);

    let corner = pline_open![(0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (2.0, 2.0, 0.0)];
    assert_fuzzy_eq!(corner.area(), 2.0);
    assert_fuzzy_eq!(corner.path_length(), 4.0);

    let mut closed = corner.clone();
    closed.set_is_closed(true);
    assert_fuzzy_eq!(closed.area(), corner.area());

    let mut reversed = corner.clone();
    reversed.invert_direction();
    assert_fuzzy_eq!(reversed.area(), -2.0);
}

#[test]
fn winding_numbers() {
    let sq = square(0.0, 0.0, 2.0);
    assert_eq!(sq.winding_number(Vector2::new(1.0, 1.0)), 1);
    assert_eq!(sq.winding_number(Vector2::new(3.0, 1.0)), 0);

    let mut cw = sq.clone();
    cw.invert_direction();
    assert_eq!(cw.winding_number(Vector2::new(1.0, 1.0)), -1);

    let c = circle(0.0, 0.0, 1.0);
    assert_eq!(c.winding_number(Vector2::new(0.0, 0.9)), 1);
    assert_eq!(c.winding_number(Vector2::new(0.0, -0.9)), 1);
    assert_eq!(c.winding_number(Vector2::new(0.95, 0.95)), 0);

    let open = pline_open![(0.0, 0.0, 0.0), (2.0, 0.0, 0.0)];
    assert_eq!(open.winding_number(Vector2::new(1.0, 1.0)), 0);
}

#[test]
fn vertex_index_errors() {
    let mut pline = pline_open![(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)];
    assert!(pline.vertex(1).is_ok());
    assert_eq!(
        pline.vertex(2).unwrap_err(),
        KernelError::VertexIndexOutOfBounds { index: 2, len: 2 }
    );
    assert_eq!(
        pline.set_vertex(5, PlineVertex::new(0.0, 0.0, 0.0)).unwrap_err(),
        KernelError::VertexIndexOutOfBounds { index: 5, len: 2 }
    );
    assert_eq!(
        pline.remove_vertex(2).unwrap_err(),
        KernelError::VertexIndexOutOfBounds { index: 2, len: 2 }
    );

    // inserting at the end is allowed
    pline.insert_vertex(2, PlineVertex::new(2.0, 0.0, 0.0)).unwrap();
    assert_eq!(
        pline.insert_vertex(4, PlineVertex::new(3.0, 0.0, 0.0)).unwrap_err(),
        KernelError::VertexIndexOutOfBounds { index: 4, len: 3 }
    );
    assert_eq!(pline.remove_vertex(0).unwrap(), PlineVertex::new(0.0, 0.0, 0.0));
    assert_eq!(pline.vertex_count(), 2);
}

#[test]
fn flat_buffer_round_trip() {
    let buffer = [0.0, 0.0, 0.5, 3.0, 0.0, 0.0, 3.0, 4.0, -0.25];
    let pline = Polyline::from_flat_buffer(&buffer, true).unwrap();
    assert_eq!(pline.vertex_count(), 3);
    assert_eq!(pline[2], PlineVertex::new(3.0, 4.0, -0.25));

    let mut out = [0.0; 9];
    pline.copy_to_flat_buffer(&mut out).unwrap();
    assert_eq!(out, buffer);

    let mut short = [0.0; 6];
    assert!(pline.copy_to_flat_buffer(&mut short).is_err());
    assert_eq!(
        Polyline::<f64>::from_flat_buffer(&buffer[..8], false).unwrap_err(),
        KernelError::InvalidVertexBuffer { len: 8 }
    );
}

#[test]
fn userdata_is_kept_by_clone_and_transforms() {
    let mut pline = square(0.0, 0.0, 1.0);
    pline.set_userdata(vec![1, 2, 3]);
    pline.translate(5.0, 5.0);
    pline.scale(2.0);
    pline.invert_direction();
    assert_eq!(pline.userdata(), &[1, 2, 3]);
    assert_eq!(pline.clone().userdata(), &[1, 2, 3]);
}

#[test]
fn invert_direction_keeps_arcs() {
    let mut pline = pline_open![(0.0, 0.0, 0.5), (2.0, 0.0, -1.0), (4.0, 0.0, 0.0)];
    let length = pline.path_length();
    pline.invert_direction();
    assert_eq!(pline[0], PlineVertex::new(4.0, 0.0, 1.0));
    assert_eq!(pline[1], PlineVertex::new(2.0, 0.0, -0.5));
    assert_eq!(pline[2], PlineVertex::new(0.0, 0.0, 0.0));
    assert_fuzzy_eq!(pline.path_length(), length);
}

#[test]
fn remove_redundant_merges_collinear() {
    let pline = pline_closed![
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (2.0, 0.0, 0.0),
        (2.0, 2.0, 0.0),
        (2.0, 2.0, 0.0),
        (0.0, 2.0, 0.0),
    ];
    let cleaned = pline.remove_redundant(1e-5);
    assert_eq!(cleaned.vertex_count(), 4);
    assert_fuzzy_eq!(cleaned.area(), 4.0);
}

#[test]
fn closest_point_on_square() {
    let sq = square(0.0, 0.0, 2.0);
    let result = sq.closest_point(Vector2::new(1.0, -3.0), 1e-5).unwrap();
    assert_eq!(result.seg_start_index, 0);
    assert!(result.seg_point.fuzzy_eq(Vector2::new(1.0, 0.0)));
    assert_fuzzy_eq!(result.distance, 3.0);
}
