use super::FuzzyOrd;
use static_aabb2d_index::IndexableNum;

/// Float type the kernel is generic over.
///
/// Bundles the numeric operations (`num_traits`), fuzzy comparisons and the bound required to
/// store values in a [static_aabb2d_index::StaticAABB2DIndex].
pub trait Real:
    num_traits::real::Real
    + num_traits::Bounded
    + FuzzyOrd
    + std::default::Default
    + std::fmt::Debug
    + IndexableNum
    + 'static
{
    fn pi() -> Self;

    fn tau() -> Self;

    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    #[inline]
    fn four() -> Self {
        Self::two() + Self::two()
    }

    /// Not a number, used for the empty extents sentinel.
    #[inline]
    fn nan() -> Self {
        Self::zero() / Self::zero()
    }

    /// Convert an `f64` constant (tolerances, defaults) to `Self`, rounding if needed.
    fn from_f64_lit(value: f64) -> Self;
}

macro_rules! impl_real {
    ($ty:ident) => {
        impl Real for $ty {
            #[inline]
            fn pi() -> Self {
                std::$ty::consts::PI
            }

            #[inline]
            fn tau() -> Self {
                std::$ty::consts::TAU
            }

            #[inline]
            fn two() -> Self {
                2.0
            }

            #[inline]
            fn four() -> Self {
                4.0
            }

            #[inline]
            fn nan() -> Self {
                $ty::NAN
            }

            #[inline]
            fn from_f64_lit(value: f64) -> Self {
                value as $ty
            }
        }
    };
}

impl_real!(f32);
impl_real!(f64);
