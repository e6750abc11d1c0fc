use crate::core::{math::Vector2, traits::Real};

/// Polyline vertex, position plus the bulge of the segment that starts at it.
///
/// `bulge == 0` is a line to the next vertex, otherwise `bulge = tan(sweep / 4)` with a positive
/// sweep being counter clockwise.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlineVertex<T = f64> {
    pub x: T,
    pub y: T,
    pub bulge: T,
}

impl<T> PlineVertex<T>
where
    T: Real,
{
    #[inline]
    pub fn new(x: T, y: T, bulge: T) -> Self {
        PlineVertex { x, y, bulge }
    }

    /// Construct from a `[x, y, bulge]` slice, returns `None` if the slice is not of length 3.
    #[inline]
    pub fn from_slice(slice: &[T]) -> Option<Self> {
        match *slice {
            [x, y, bulge] => Some(PlineVertex::new(x, y, bulge)),
            _ => None,
        }
    }

    #[inline]
    pub fn from_vector2(v: Vector2<T>, bulge: T) -> Self {
        PlineVertex::new(v.x, v.y, bulge)
    }

    #[inline]
    pub fn pos(&self) -> Vector2<T> {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn with_bulge(&self, bulge: T) -> Self {
        PlineVertex::new(self.x, self.y, bulge)
    }

    #[inline]
    pub fn bulge_is_zero(&self) -> bool {
        self.bulge.fuzzy_eq_zero()
    }

    #[inline]
    pub fn bulge_is_pos(&self) -> bool {
        self.bulge > T::zero()
    }

    #[inline]
    pub fn bulge_is_neg(&self) -> bool {
        self.bulge < T::zero()
    }

    #[inline]
    pub fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: T) -> bool {
        self.x.fuzzy_eq_eps(other.x, fuzzy_epsilon)
            && self.y.fuzzy_eq_eps(other.y, fuzzy_epsilon)
            && self.bulge.fuzzy_eq_eps(other.bulge, fuzzy_epsilon)
    }

    #[inline]
    pub fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, T::fuzzy_epsilon())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice() {
        assert_eq!(
            PlineVertex::from_slice(&[1.0, 2.0, 0.5]),
            Some(PlineVertex::new(1.0, 2.0, 0.5))
        );
        assert_eq!(PlineVertex::<f64>::from_slice(&[1.0, 2.0]), None);
    }

    #[test]
    fn bulge_predicates() {
        let v = PlineVertex::new(0.0, 0.0, -0.5);
        assert!(v.bulge_is_neg());
        assert!(!v.bulge_is_zero());
        assert!(v.with_bulge(1e-12).bulge_is_zero());
    }
}
