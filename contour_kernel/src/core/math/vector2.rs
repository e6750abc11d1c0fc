use crate::core::traits::Real;
use std::ops;

/// Two dimensional vector, also used to represent positions.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector2<T = f64> {
    pub x: T,
    pub y: T,
}

impl<T> Vector2<T>
where
    T: Real,
{
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Vector2 { x, y }
    }

    #[inline]
    pub fn zero() -> Self {
        Vector2::new(T::zero(), T::zero())
    }

    #[inline]
    pub fn scale(&self, factor: T) -> Self {
        Vector2::new(self.x * factor, self.y * factor)
    }

    #[inline]
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// Perpendicular dot product (2D cross product z component). Positive when `other` is counter
    /// clockwise from `self`.
    #[inline]
    pub fn perp_dot(&self, other: Self) -> T {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length_squared(&self) -> T {
        self.dot(*self)
    }

    #[inline]
    pub fn length(&self) -> T {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction. The zero vector yields NaN components.
    #[inline]
    pub fn normalize(&self) -> Self {
        self.scale(T::one() / self.length())
    }

    /// Counter clockwise perpendicular (rotated +90 degrees).
    #[inline]
    pub fn perp(&self) -> Self {
        Vector2::new(-self.y, self.x)
    }

    #[inline]
    pub fn unit_perp(&self) -> Self {
        self.perp().normalize()
    }

    /// Clockwise unit perpendicular, the right hand side when walking along `self`.
    #[inline]
    pub fn unit_right_normal(&self) -> Self {
        Vector2::new(self.y, -self.x).normalize()
    }

    #[inline]
    pub fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: T) -> bool {
        self.x.fuzzy_eq_eps(other.x, fuzzy_epsilon) && self.y.fuzzy_eq_eps(other.y, fuzzy_epsilon)
    }

    #[inline]
    pub fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, T::fuzzy_epsilon())
    }
}

macro_rules! impl_binary_op {
    ($op_trait:ident, $op_func:ident, $op:tt) => {
        impl<T: Real> ops::$op_trait<Vector2<T>> for Vector2<T> {
            type Output = Vector2<T>;
            #[inline]
            fn $op_func(self, rhs: Vector2<T>) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl<T: Real> ops::$op_trait<&Vector2<T>> for Vector2<T> {
            type Output = Vector2<T>;
            #[inline]
            fn $op_func(self, rhs: &Vector2<T>) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl<T: Real> ops::$op_trait<Vector2<T>> for &Vector2<T> {
            type Output = Vector2<T>;
            #[inline]
            fn $op_func(self, rhs: Vector2<T>) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }
    };
}

impl_binary_op!(Add, add, +);
impl_binary_op!(Sub, sub, -);

impl<T: Real> ops::Neg for Vector2<T> {
    type Output = Vector2<T>;
    #[inline]
    fn neg(self) -> Self::Output {
        Vector2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops() {
        let v1 = Vector2::new(4.0, 5.0);
        let v2 = Vector2::new(1.0, 2.0);
        assert!((v1 + v2).fuzzy_eq(Vector2::new(5.0, 7.0)));
        assert!((&v1 - v2).fuzzy_eq(Vector2::new(3.0, 3.0)));
        assert!((v1 - &v2).fuzzy_eq(Vector2::new(3.0, 3.0)));
        assert!((-v2).fuzzy_eq(Vector2::new(-1.0, -2.0)));
    }

    #[test]
    fn perpendiculars() {
        let v = Vector2::new(2.0, 0.0);
        assert!(v.unit_perp().fuzzy_eq(Vector2::new(0.0, 1.0)));
        assert!(v.unit_right_normal().fuzzy_eq(Vector2::new(0.0, -1.0)));
        assert!(v.perp_dot(Vector2::new(0.0, 1.0)) > 0.0);
    }
}
