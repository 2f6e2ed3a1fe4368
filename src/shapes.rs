//! Procedural bodies: pressurized balls and four-point spring lattices.

use crate::body::{BodyBuilder, DeformableBody};
use crate::error::{Result, TopologyError};
use crate::float::Float;
use crate::spring::Spring;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Angle offset of the lattice corners, so it does not land flat on a face.
pub const LATTICE_ANGLE_OFFSET: f64 = 0.1;

/// `count` points on a circle around the origin, counter-clockwise.
///
/// `angle_offset` rotates the whole ring; low counts (3 or 4) placed
/// axis-aligned sit on the floor in an unstable balance.
pub fn ring_coordinates<F: Float>(radius: F, count: usize, angle_offset: F) -> AllocVec<Vec2<F>> {
    let two_pi = F::two() * F::pi();
    (0..count)
        .map(|i| {
            let angle = two_pi * F::from_usize(i) / F::from_usize(count) + angle_offset;
            Vec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Parameters of a pressurized ball.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BallConfig<F: Float> {
    /// Shared evenly between the points (kg).
    pub total_mass: F,
    pub radius: F,
    pub point_count: usize,
    /// Perimeter spring stiffness (N/m).
    pub stiffness: F,
    pub damping: F,
    pub pressure: F,
    pub pressure_damping: F,
    /// Rotation of the initial ring (radians).
    pub angle_offset: F,
}

impl<F: Float> BallConfig<F> {
    /// Round, firm ball. Needs a small `dt` (about 1/100 s) to stay stable.
    pub fn soft_ball() -> Self {
        BallConfig {
            total_mass: F::one(),
            radius: F::half(),
            point_count: 50,
            stiffness: F::from_f64(100.0),
            damping: F::from_f64(0.2),
            pressure: F::from_f64(100.0),
            pressure_damping: F::from_f64(0.2),
            angle_offset: F::zero(),
        }
    }

    /// Heavy, saggy ball that flattens like a drop of water.
    pub fn water_drop() -> Self {
        BallConfig {
            total_mass: F::from_f64(5.0),
            stiffness: F::from_f64(40.0),
            damping: F::from_f64(0.1),
            pressure: F::from_f64(60.0),
            ..Self::soft_ball()
        }
    }

    /// Ten-sided soft polygon.
    pub fn soft_polygon() -> Self {
        BallConfig {
            point_count: 10,
            stiffness: F::from_f64(40.0),
            damping: F::from_f64(0.1),
            pressure: F::from_f64(60.0),
            ..Self::soft_ball()
        }
    }

    pub fn with_point_count(mut self, point_count: usize) -> Self {
        self.point_count = point_count;
        self
    }

    pub fn with_angle_offset(mut self, angle_offset: F) -> Self {
        self.angle_offset = angle_offset;
        self
    }
}

impl<F: Float> Default for BallConfig<F> {
    fn default() -> Self {
        Self::soft_ball()
    }
}

/// Parameters of a four-point spring lattice.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeConfig<F: Float> {
    pub total_mass: F,
    /// Radius of the circle the corners sit on.
    pub radius: F,
    pub stiffness: F,
    pub damping: F,
}

impl<F: Float> LatticeConfig<F> {
    /// Wobbly jelly block. A damping of 0.05 makes it much springier.
    pub fn jelly() -> Self {
        LatticeConfig {
            total_mass: F::from_f64(0.1),
            radius: F::half(),
            stiffness: F::from_f64(7.0),
            damping: F::from_f64(0.2),
        }
    }
}

impl<F: Float> Default for LatticeConfig<F> {
    fn default() -> Self {
        Self::jelly()
    }
}

fn check_mass<F: Float>(total_mass: F) -> Result<()> {
    if total_mass > F::zero() && total_mass.is_finite() {
        Ok(())
    } else {
        Err(TopologyError::InvalidMass.into())
    }
}

fn check_radius<F: Float>(radius: F) -> Result<()> {
    if radius > F::zero() && radius.is_finite() {
        Ok(())
    } else {
        Err(TopologyError::InvalidRadius.into())
    }
}

impl<F: Float> DeformableBody<F> {
    /// Pressurized ring of `point_count` points around `center`.
    ///
    /// Perimeter springs rest at the initial edge lengths and the pressure
    /// rests at the initial enclosed area.
    pub fn spherical(center: Vec2<F>, config: &BallConfig<F>) -> Result<Self> {
        let n = config.point_count;
        if n < 3 {
            return Err(TopologyError::InsufficientPoints { count: n }.into());
        }
        check_mass(config.total_mass)?;
        check_radius(config.radius)?;

        let mass = config.total_mass / F::from_usize(n);
        let mut builder = BodyBuilder::new();
        for offset in ring_coordinates(config.radius, n, config.angle_offset) {
            builder.add_point(center + offset, mass);
        }
        for i in 0..n {
            builder.connect(i, (i + 1) % n, config.stiffness, config.damping);
        }
        builder
            .with_springs()
            .with_gravity()
            .with_pressure(config.pressure)
            .with_pressure_damping(config.pressure_damping)
            .build()
    }

    /// Four corners on a circle of `radius` with perimeter springs and two
    /// diagonal braces resting at `2 * radius`. No pressure.
    pub fn springy_lattice(center: Vec2<F>, total_mass: F, radius: F, stiffness: F, damping: F) -> Result<Self> {
        check_mass(total_mass)?;
        check_radius(radius)?;

        let mass = total_mass / F::from_f64(4.0);
        let mut builder = BodyBuilder::new();
        for offset in ring_coordinates(radius, 4, F::from_f64(LATTICE_ANGLE_OFFSET)) {
            builder.add_point(center + offset, mass);
        }
        for i in 0..4 {
            builder.connect(i, (i + 1) % 4, stiffness, damping);
        }
        let diagonal = F::two() * radius;
        builder
            .add_spring(Spring::new(0, 2, diagonal, stiffness, damping))
            .add_spring(Spring::new(1, 3, diagonal, stiffness, damping));
        builder.with_springs().with_gravity().build()
    }

    pub fn lattice(center: Vec2<F>, config: &LatticeConfig<F>) -> Result<Self> {
        Self::springy_lattice(center, config.total_mass, config.radius, config.stiffness, config.damping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhysicsError;
    use crate::force::ForceModule;

    #[test]
    fn ball_shares_mass_and_rests() {
        let config = BallConfig::<f64>::soft_polygon();
        let body = DeformableBody::spherical(Vec2::new(4.0, 1.0), &config).unwrap();
        assert_eq!(body.point_count(), 10);
        assert_eq!(body.spring_count(), 10);
        assert!(body.points().iter().all(|p| p.mass == 0.1));
        assert_eq!(body.rest_area(), Some(body.area()));
        for s in body.springs() {
            let (a, b) = s.endpoints(body.points());
            assert!((a.distance(b) - s.rest_length).abs() < 1e-12);
        }
    }

    #[test]
    fn ball_attaches_all_four_modules() {
        let body = DeformableBody::spherical(Vec2::new(0.0f32, 0.0), &BallConfig::default()).unwrap();
        let modules = body.modules();
        assert_eq!(modules.len(), 4);
        assert!(matches!(modules[2], ForceModule::Pressure(_)));
        assert!(matches!(modules[3], ForceModule::PressureDamping(_)));
    }

    #[test]
    fn ball_rejects_bad_input() {
        let too_few = BallConfig::<f64>::default().with_point_count(2);
        assert_eq!(
            DeformableBody::spherical(Vec2::zero(), &too_few).unwrap_err(),
            PhysicsError::InvalidTopology(TopologyError::InsufficientPoints { count: 2 })
        );
        let massless = BallConfig { total_mass: 0.0f64, ..BallConfig::default() };
        assert_eq!(
            DeformableBody::spherical(Vec2::zero(), &massless).unwrap_err(),
            PhysicsError::InvalidTopology(TopologyError::InvalidMass)
        );
    }

    #[test]
    fn lattice_topology() {
        let body = DeformableBody::lattice(Vec2::new(2.0f64, 2.0), &LatticeConfig::jelly()).unwrap();
        assert_eq!(body.point_count(), 4);
        assert_eq!(body.spring_count(), 6);
        assert_eq!(body.rest_area(), None);
        assert_eq!(body.modules(), &[ForceModule::Springs, ForceModule::Gravity]);
        let diagonals = &body.springs()[4..];
        assert!(diagonals.iter().all(|s| s.rest_length == 1.0));
        // Corners are exactly diagonal apart at rest.
        let (a, b) = diagonals[0].endpoints(body.points());
        assert!((a.distance(b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn lattice_rejects_bad_radius() {
        for radius in [-0.5f64, 0.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                DeformableBody::springy_lattice(Vec2::zero(), 0.1, radius, 7.0, 0.2).unwrap_err(),
                PhysicsError::InvalidTopology(TopologyError::InvalidRadius),
                "radius = {}",
                radius
            );
        }
        let inside_out = BallConfig { radius: -1.0f64, ..BallConfig::soft_polygon() };
        assert_eq!(
            DeformableBody::spherical(Vec2::zero(), &inside_out).unwrap_err(),
            PhysicsError::from(TopologyError::InvalidRadius)
        );
    }

    #[test]
    fn lattice_is_not_axis_aligned() {
        let body = DeformableBody::lattice(Vec2::new(0.0f64, 0.0), &LatticeConfig::jelly()).unwrap();
        assert!(body.point(0).position.y > 0.0);
    }
}
