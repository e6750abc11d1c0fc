/// Equality comparisons with a tolerance.
///
/// Geometry computed with floating point rarely lands on exact values, so every comparison in the
/// kernel that decides topology (is this point on that segment, are these two positions the same)
/// goes through this trait with an explicit or default epsilon.
///
/// # Examples
///
/// ```
/// # use contour_kernel::core::traits::*;
/// let a = 0.1 + 0.2;
/// assert_ne!(a, 0.3);
/// assert!(a.fuzzy_eq(0.3));
/// assert!(!1.0f64.fuzzy_eq_eps(1.1, 0.05));
/// ```
pub trait FuzzyEq: Sized + Copy {
    /// Default epsilon used by the non `_eps` methods.
    fn fuzzy_epsilon() -> Self;

    /// `true` if `|self - other| < fuzzy_epsilon`.
    fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool;

    #[inline]
    fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, Self::fuzzy_epsilon())
    }

    /// `true` if `|self| < fuzzy_epsilon`.
    fn fuzzy_eq_zero_eps(&self, fuzzy_epsilon: Self) -> bool;

    #[inline]
    fn fuzzy_eq_zero(&self) -> bool {
        self.fuzzy_eq_zero_eps(Self::fuzzy_epsilon())
    }
}

/// Ordering comparisons with a tolerance, the "sticky" counterpart of [FuzzyEq].
pub trait FuzzyOrd: FuzzyEq {
    /// `self > other - fuzzy_epsilon`.
    fn fuzzy_gt_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool;

    #[inline]
    fn fuzzy_gt(&self, other: Self) -> bool {
        self.fuzzy_gt_eps(other, Self::fuzzy_epsilon())
    }

    /// `self < other + fuzzy_epsilon`.
    fn fuzzy_lt_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool;

    #[inline]
    fn fuzzy_lt(&self, other: Self) -> bool {
        self.fuzzy_lt_eps(other, Self::fuzzy_epsilon())
    }

    /// Inclusive range test where both bounds are widened by `fuzzy_epsilon`.
    ///
    /// ```
    /// # use contour_kernel::core::traits::*;
    /// assert!(0.99f64.fuzzy_in_range_eps(1.0, 2.0, 0.05));
    /// assert!(2.0f64.fuzzy_in_range_eps(1.0, 2.0, 1e-5));
    /// assert!(!2.1f64.fuzzy_in_range_eps(1.0, 2.0, 1e-5));
    /// ```
    #[inline]
    fn fuzzy_in_range_eps(&self, min: Self, max: Self, fuzzy_epsilon: Self) -> bool {
        self.fuzzy_gt_eps(min, fuzzy_epsilon) && self.fuzzy_lt_eps(max, fuzzy_epsilon)
    }

    #[inline]
    fn fuzzy_in_range(&self, min: Self, max: Self) -> bool {
        self.fuzzy_in_range_eps(min, max, Self::fuzzy_epsilon())
    }
}

macro_rules! impl_fuzzy_traits {
    ($ty:ty, $eps:expr) => {
        impl FuzzyEq for $ty {
            #[inline]
            fn fuzzy_epsilon() -> Self {
                $eps
            }

            #[inline]
            fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool {
                (*self - other).abs() < fuzzy_epsilon
            }

            #[inline]
            fn fuzzy_eq_zero_eps(&self, fuzzy_epsilon: Self) -> bool {
                self.abs() < fuzzy_epsilon
            }
        }

        impl FuzzyOrd for $ty {
            #[inline]
            fn fuzzy_gt_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool {
                *self + fuzzy_epsilon > other
            }

            #[inline]
            fn fuzzy_lt_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool {
                *self < other + fuzzy_epsilon
            }
        }
    };
}

impl_fuzzy_traits!(f32, 1.0e-8);
impl_fuzzy_traits!(f64, 1.0e-8);
