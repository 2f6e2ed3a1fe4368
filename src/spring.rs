//! Damped linear springs between two point masses of the same body.

use crate::float::Float;
use crate::point::PointMass;
use crate::vec::Vec2;

/// A damped spring connecting points `a` and `b` by index.
///
/// Immutable once built; the owning body validates the indices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spring<F: Float> {
    pub a: usize,
    pub b: usize,
    pub rest_length: F,
    /// Hooke constant (N/m).
    pub stiffness: F,
    /// Damping along the spring axis (N.s/m).
    pub damping: F,
}

impl<F: Float> Spring<F> {
    pub fn new(a: usize, b: usize, rest_length: F, stiffness: F, damping: F) -> Self {
        Spring { a, b, rest_length, stiffness, damping }
    }

    /// Spring whose rest length is the current distance between `a` and `b`.
    pub fn from_points(a: usize, b: usize, points: &[PointMass<F>], stiffness: F, damping: F) -> Self {
        let rest_length = points[a].position.distance(points[b].position);
        Spring { a, b, rest_length, stiffness, damping }
    }

    /// Signed axial force magnitude, positive when stretched or separating.
    pub fn axial_force(&self, points: &[PointMass<F>]) -> F {
        let pa = &points[self.a];
        let pb = &points[self.b];
        let delta = pb.position - pa.position;
        let length = delta.length();
        let axis = delta.normalize();
        let relative_velocity = pb.velocity - pa.velocity;
        self.stiffness * (length - self.rest_length) + relative_velocity.dot(axis) * self.damping
    }

    /// Accumulate this spring's force onto both endpoints.
    ///
    /// `a` is pulled toward `b` by `f * axis` and `b` receives the opposite.
    /// Coincident endpoints have no axis and contribute nothing.
    pub fn apply(&self, points: &mut [PointMass<F>]) {
        let axis = (points[self.b].position - points[self.a].position).normalize();
        if axis == Vec2::zero() {
            return;
        }
        let force = axis.scale(self.axial_force(points));
        points[self.a].apply_force(force);
        points[self.b].apply_force(-force);
    }

    pub fn endpoints(&self, points: &[PointMass<F>]) -> (Vec2<F>, Vec2<F>) {
        (points[self.a].position, points[self.b].position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn stretched_spring_pulls_endpoints_together() {
        let mut points = vec![
            PointMass::new(Vec2::new(0.0f64, 0.0), 1.0),
            PointMass::new(Vec2::new(2.0, 0.0), 1.0),
        ];
        let spring = Spring::new(0, 1, 1.0, 10.0, 0.0);
        spring.apply(&mut points);
        assert_eq!(points[0].force, Vec2::new(10.0, 0.0));
        assert_eq!(points[1].force, Vec2::new(-10.0, 0.0));
    }

    #[test]
    fn damping_opposes_separation() {
        let mut points = vec![
            PointMass::new(Vec2::new(0.0f64, 0.0), 1.0),
            PointMass::new(Vec2::new(1.0, 0.0), 1.0),
        ];
        points[1].velocity = Vec2::new(2.0, 0.0);
        let spring = Spring::from_points(0, 1, &points, 10.0, 0.5);
        assert_eq!(spring.rest_length, 1.0);
        spring.apply(&mut points);
        // At rest length only damping acts: 2 * 0.5
        assert_eq!(points[0].force, Vec2::new(1.0, 0.0));
        assert_eq!(points[1].force, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn coincident_endpoints_are_skipped() {
        let mut points = vec![
            PointMass::new(Vec2::new(1.0f32, 1.0), 1.0),
            PointMass::new(Vec2::new(1.0, 1.0), 1.0),
        ];
        Spring::new(0, 1, 1.0, 10.0, 0.1).apply(&mut points);
        assert_eq!(points[0].force, Vec2::zero());
        assert_eq!(points[1].force, Vec2::zero());
    }
}
