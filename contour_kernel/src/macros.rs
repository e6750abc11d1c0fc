/// Return early from a visiting function when the control flow value says to stop.
macro_rules! try_cf {
    ($e:expr) => {
        match $e {
            x => {
                if x.should_break() {
                    return x;
                }
            }
        }
    };
}

/// Assert two values are fuzzy equal, optionally with an explicit epsilon.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(left_val.fuzzy_eq(*right_val)) {
                    panic!(
                        "fuzzy assertion failed\n  left: `{:?}`\n right: `{:?}`",
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
    ($left:expr, $right:expr, $eps:expr) => {{
        match (&$left, &$right, &$eps) {
            (left_val, right_val, eps_val) => {
                if !(left_val.fuzzy_eq_eps(*right_val, *eps_val)) {
                    panic!(
                        "fuzzy assertion failed\n  left: `{:?}`\n right: `{:?}`\n   eps: `{:?}`",
                        &*left_val, &*right_val, &*eps_val
                    )
                }
            }
        }
    }};
}

/// Counts macro repetitions for the polyline constructor macros.
#[doc(hidden)]
#[macro_export]
macro_rules! replace_expr {
    ($_t:tt $sub:expr) => {
        $sub
    };
}

/// Open polyline from `(x, y, bulge)` tuples.
///
/// # Examples
///
/// ```
/// # use contour_kernel::pline_open;
/// # use contour_kernel::polyline::*;
/// let pline = pline_open![(0.0, 0.0, 0.5), (4.0, 0.0, 0.0)];
/// assert!(!pline.is_closed());
/// assert_eq!(pline.segment_count(), 1);
/// assert_eq!(pline[0], PlineVertex::new(0.0, 0.0, 0.5));
/// ```
#[macro_export]
macro_rules! pline_open {
    ($( $x:expr ),* $(,)?) => {
        {
            use $crate::polyline::*;
            let size = <[()]>::len(&[$($crate::replace_expr!(($x) ())),*]);
            let mut pl = Polyline::with_capacity(size, false);
            $(
                pl.add($x.0, $x.1, $x.2);
            )*
            pl
        }
    };
}

/// Closed polyline from `(x, y, bulge)` tuples.
///
/// # Examples
///
/// ```
/// # use contour_kernel::pline_closed;
/// # use contour_kernel::polyline::*;
/// let square = pline_closed![(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 1.0, 0.0), (0.0, 1.0, 0.0)];
/// assert!(square.is_closed());
/// assert_eq!(square.segment_count(), 4);
/// ```
#[macro_export]
macro_rules! pline_closed {
    ($( $x:expr ),* $(,)?) => {
        {
            use $crate::polyline::*;
            let size = <[()]>::len(&[$($crate::replace_expr!(($x) ())),*]);
            let mut pl = Polyline::with_capacity(size, true);
            $(
                pl.add($x.0, $x.1, $x.2);
            )*
            pl
        }
    };
}
