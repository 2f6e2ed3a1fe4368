//! Point masses integrated with explicit Euler.

use crate::float::Float;
use crate::vec::Vec2;

/// A mass-bearing particle with an explicit velocity and a force accumulator.
#[derive(Clone, Debug, PartialEq)]
pub struct PointMass<F: Float> {
    pub position: Vec2<F>,
    pub velocity: Vec2<F>,
    /// Accumulated force for the current step. Cleared by `clear_force`.
    pub force: Vec2<F>,
    pub mass: F,
}

impl<F: Float> PointMass<F> {
    /// A point at rest.
    pub fn new(position: Vec2<F>, mass: F) -> Self {
        PointMass {
            position,
            velocity: Vec2::zero(),
            force: Vec2::zero(),
            mass,
        }
    }

    pub fn apply_force(&mut self, force: Vec2<F>) {
        self.force += force;
    }

    pub fn clear_force(&mut self) {
        self.force = Vec2::zero();
    }

    /// Explicit Euler: velocity from the accumulated force, then position
    /// from the new velocity.
    ///
    /// Only conditionally stable: roughly `k * dt^2 / m` must stay small for
    /// every spring attached to this point, otherwise energy grows without
    /// bound.
    pub fn integrate(&mut self, dt: F) {
        self.velocity += self.force.scale(dt / self.mass);
        self.position += self.velocity.scale(dt);
    }

    pub fn kinetic_energy(&self) -> F {
        F::half() * self.mass * self.velocity.length_sq()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrate_updates_velocity_before_position() {
        let mut p = PointMass::new(Vec2::new(0.0f64, 0.0), 2.0);
        p.apply_force(Vec2::new(4.0, 0.0));
        p.integrate(0.5);
        // a = 2, v = 1, x = v * dt
        assert_eq!(p.velocity, Vec2::new(1.0, 0.0));
        assert_eq!(p.position, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn clear_force_resets_accumulator() {
        let mut p = PointMass::new(Vec2::new(1.0f32, 1.0), 1.0);
        p.apply_force(Vec2::new(1.0, 2.0));
        p.apply_force(Vec2::new(1.0, 2.0));
        assert_eq!(p.force, Vec2::new(2.0, 4.0));
        p.clear_force();
        assert_eq!(p.force, Vec2::zero());
    }
}
