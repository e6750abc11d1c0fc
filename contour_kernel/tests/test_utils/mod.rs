#![allow(dead_code)]

use contour_kernel::{core::traits::FuzzyEq, polyline::Polyline, AABB};

pub fn aabb_fuzzy_eq_eps(a: &AABB<f64>, b: &AABB<f64>, eps: f64) -> bool {
    a.min_x.fuzzy_eq_eps(b.min_x, eps)
        && a.min_y.fuzzy_eq_eps(b.min_y, eps)
        && a.max_x.fuzzy_eq_eps(b.max_x, eps)
        && a.max_y.fuzzy_eq_eps(b.max_y, eps)
}

/// Properties of a polyline compared in tests in place of exact vertexes.
#[derive(Debug, Copy, Clone)]
pub struct PlineProperties {
    pub vertex_count: usize,
    pub area: f64,
    pub path_length: f64,
    pub extents: AABB<f64>,
}

impl PlineProperties {
    pub const POS_EQ_EPS: f64 = 1e-5;
    pub const PROP_CMP_EPS: f64 = 1e-4;
    pub const REMOVE_REDUNDANT_EPS: f64 = 1e-4;

    pub fn new(
        vertex_count: usize,
        area: f64,
        path_length: f64,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    ) -> Self {
        Self {
            vertex_count,
            area,
            path_length,
            extents: AABB::new(min_x, min_y, max_x, max_y),
        }
    }

    pub fn from_pline(pline: &Polyline<f64>, invert_area: bool) -> Self {
        // vertex counts compared after merging redundant vertexes
        let pline = pline.remove_redundant(Self::REMOVE_REDUNDANT_EPS);
        let area = if invert_area { -pline.area() } else { pline.area() };

        Self {
            vertex_count: pline.vertex_count(),
            area,
            path_length: pline.path_length(),
            extents: pline.extents().unwrap(),
        }
    }

    pub fn fuzzy_eq_eps(&self, other: &Self, eps: f64) -> bool {
        self.vertex_count == other.vertex_count
            && self.area.fuzzy_eq_eps(other.area, eps)
            && self.path_length.fuzzy_eq_eps(other.path_length, eps)
            && aabb_fuzzy_eq_eps(&self.extents, &other.extents, eps)
    }
}

pub fn create_property_set<'a, I>(plines: I, invert_area: bool) -> Vec<PlineProperties>
where
    I: IntoIterator<Item = &'a Polyline<f64>>,
{
    plines
        .into_iter()
        .map(|pl| PlineProperties::from_pline(pl, invert_area))
        .collect()
}

/// True if every expected property set matches exactly one result.
pub fn property_sets_match(result_set: &[PlineProperties], expected_set: &[PlineProperties]) -> bool {
    let sets_match = result_set.len() == expected_set.len()
        && expected_set.iter().all(|expected| {
            result_set
                .iter()
                .filter(|r| expected.fuzzy_eq_eps(r, PlineProperties::PROP_CMP_EPS))
                .count()
                == 1
        });

    if !sets_match {
        eprintln!("result:\n{:?}", result_set);
        eprintln!("expected:\n{:?}", expected_set);
    }

    sets_match
}

/// Rotate the vertex order of a closed polyline so vertex `n` becomes the first.
pub fn cycle_start_index_forward(input: &Polyline<f64>, n: usize) -> Polyline<f64> {
    assert!(input.is_closed(), "only closed polylines can be cycled");
    let len = input.vertex_count();
    Polyline::from_vertexes(
        input.iter_vertexes().cycle().skip(n).take(len),
        true,
    )
}

#[derive(Debug, Clone, Copy)]
pub struct ModifiedPlineState {
    pub inverted_direction: bool,
    pub cycle_position: usize,
}

/// Visit the input plus its direction inverted and every start index rotation of both.
pub fn for_each_modified<F>(input: &Polyline<f64>, mut visitor: F)
where
    F: FnMut(Polyline<f64>, ModifiedPlineState),
{
    let mut inverted = input.clone();
    inverted.invert_direction();

    for (pline, inverted_direction) in [(input, false), (&inverted, true)] {
        visitor(
            pline.clone(),
            ModifiedPlineState {
                inverted_direction,
                cycle_position: 0,
            },
        );

        if pline.is_closed() {
            for i in 1..pline.vertex_count() {
                visitor(
                    cycle_start_index_forward(pline, i),
                    ModifiedPlineState {
                        inverted_direction,
                        cycle_position: i,
                    },
                );
            }
        }
    }
}

pub fn square(min_x: f64, min_y: f64, size: f64) -> Polyline<f64> {
    let mut pline = Polyline::with_capacity(4, true);
    pline.add(min_x, min_y, 0.0);
    pline.add(min_x + size, min_y, 0.0);
    pline.add(min_x + size, min_y + size, 0.0);
    pline.add(min_x, min_y + size, 0.0);
    pline
}

/// Counter clockwise circle made of two half arcs.
pub fn circle(center_x: f64, center_y: f64, radius: f64) -> Polyline<f64> {
    let mut pline = Polyline::with_capacity(2, true);
    pline.add(center_x - radius, center_y, 1.0);
    pline.add(center_x + radius, center_y, 1.0);
    pline
}
