//! 2D vector value type.

use crate::float::Float;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// 2D vector used for positions, velocities and forces.
///
/// Plain `Copy` value: every operation produces a new vector, so two
/// quantities never share storage.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Create a new 2D vector.
    pub fn new(x: F, y: F) -> Self { Vec2 { x, y } }

    /// Zero vector.
    pub fn zero() -> Self { Vec2 { x: F::zero(), y: F::zero() } }

    /// Dot product.
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (returns scalar): self.x * other.y - self.y * other.x
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    /// Perpendicular vector (rotated 90 degrees clockwise).
    pub fn perp_cw(self) -> Self {
        Vec2 { x: self.y, y: -self.x }
    }

    /// Scale both components by a scalar.
    pub fn scale(self, s: F) -> Self {
        Vec2 { x: self.x * s, y: self.y * s }
    }

    /// Squared length (avoids sqrt).
    pub fn length_sq(self) -> F {
        self.dot(self)
    }

    /// Length (magnitude).
    pub fn length(self) -> F {
        self.length_sq().sqrt()
    }

    /// Normalize to unit length. Returns zero vector if length is near zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len.is_near_zero(F::from_f64(1e-10)) {
            Self::zero()
        } else {
            self.scale(F::one() / len)
        }
    }

    /// Distance between two points.
    pub fn distance(self, other: Self) -> F {
        (self - other).length()
    }

    /// Squared distance between two points.
    pub fn distance_sq(self, other: Self) -> F {
        (self - other).length_sq()
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Vec2 { x: self.x.min(other.x), y: self.y.min(other.y) }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Vec2 { x: self.x.max(other.x), y: self.y.max(other.y) }
    }

    /// True when both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Vec2 { x: self.x + rhs.x, y: self.y + rhs.y } }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Vec2 { x: self.x - rhs.x, y: self.y - rhs.y } }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec2 { x: -self.x, y: -self.y } }
}

impl<F: Float> AddAssign for Vec2<F> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<F: Float> SubAssign for Vec2<F> {
    fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::Float;

    #[test]
    fn vec2_length() {
        let v = Vec2::new(3.0f32, 4.0);
        assert!(Float::abs(v.length() - 5.0) < 1e-6);
    }

    #[test]
    fn clockwise_perpendicular() {
        let e = Vec2::new(1.0f64, 0.0);
        assert_eq!(e.perp_cw(), Vec2::new(0.0, -1.0));
        assert_eq!(e.perp_cw().dot(e), 0.0);
    }

    #[test]
    fn normalize_zero_vector() {
        let v = Vec2::<f32>::zero();
        assert_eq!(v.normalize(), Vec2::zero());
    }

    #[test]
    fn assign_ops() {
        let mut v = Vec2::new(1.0f32, 2.0);
        v += Vec2::new(1.0, 1.0);
        v -= Vec2::new(0.5, 0.5);
        assert_eq!(v, Vec2::new(1.5, 2.5));
    }

    #[test]
    fn componentwise_min_max() {
        let a = Vec2::new(1.0f32, 5.0);
        let b = Vec2::new(3.0f32, -2.0);
        assert_eq!(a.min(b), Vec2::new(1.0, -2.0));
        assert_eq!(a.max(b), Vec2::new(3.0, 5.0));
    }

    #[test]
    fn distance_calculation() {
        let a = Vec2::new(0.0f32, 0.0);
        let b = Vec2::new(3.0f32, 4.0);
        assert!(Float::abs(a.distance(b) - 5.0) < 1e-6);
    }
}
