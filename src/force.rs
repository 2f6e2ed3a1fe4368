//! Force contributors attached to a body.
//!
//! A body is a ring of points plus a list of these modules; a pressurized
//! ball and a plain spring lattice differ only in which ones are attached.

use crate::config::SimulationConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::geometry;
use crate::observer::StepObserver;
use crate::point::PointMass;
use crate::spring::Spring;
use crate::vec::Vec2;

/// A force contributor, applied once per step after the accumulators are
/// cleared.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForceModule<F: Float> {
    /// Constant downward pull of `mass * config.gravity`.
    Gravity,
    /// Every spring owned by the body.
    Springs,
    Pressure(Pressure<F>),
    PressureDamping(PressureDamping<F>),
}

impl<F: Float> ForceModule<F> {
    pub fn apply<O: StepObserver>(
        &self,
        points: &mut [PointMass<F>],
        springs: &[Spring<F>],
        config: &SimulationConfig<F>,
        observer: &mut O,
    ) {
        match self {
            ForceModule::Gravity => apply_gravity(points, config.gravity),
            ForceModule::Springs => apply_springs(points, springs),
            ForceModule::Pressure(p) => p.apply(points, config.min_area, observer),
            ForceModule::PressureDamping(d) => d.apply(points),
        }
    }
}

/// Add `(0, -g * mass)` to every point.
pub fn apply_gravity<F: Float>(points: &mut [PointMass<F>], g: F) {
    for p in points.iter_mut() {
        let weight = Vec2::new(F::zero(), -g * p.mass);
        p.apply_force(weight);
    }
}

pub fn apply_springs<F: Float>(points: &mut [PointMass<F>], springs: &[Spring<F>]) {
    for spring in springs {
        spring.apply(points);
    }
}

/// Internal pressure keyed to the area enclosed at rest.
///
/// Scalar pressure is `coefficient * (1/area - 1/rest_area)`: positive (push
/// out) when compressed, negative (pull in) when expanded. Each edge gets
/// `length * P` along its outward normal, split evenly between its ends.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pressure<F: Float> {
    pub rest_area: F,
    pub coefficient: F,
}

impl<F: Float> Pressure<F> {
    pub fn new(rest_area: F, coefficient: F) -> Self {
        Pressure { rest_area, coefficient }
    }

    /// Scalar pressure for a given area, clamping it to `min_area` first.
    ///
    /// `min_area` is itself floored at 1e-12, so a zeroed config field cannot
    /// divide by zero. NaN areas are clamped like collapsed ones. An infinite
    /// area has `1/area = 0` and pulls inward with `-coefficient / rest_area`.
    ///
    /// Returns the pressure and, when clamping happened, the condition to
    /// report.
    pub fn pressure_at(&self, area: F, min_area: F) -> (F, Option<PhysicsError>) {
        let floor = min_area.max(F::from_f64(1e-12));
        let (inverse, degenerate) = if !(area >= floor) {
            let err = PhysicsError::DegenerateGeometry {
                area: area.to_f64(),
                clamped_to: floor.to_f64(),
            };
            (F::one() / floor, Some(err))
        } else if area.is_finite() {
            (F::one() / area, None)
        } else {
            (F::zero(), None)
        };
        let p = self.coefficient * (inverse - F::one() / self.rest_area);
        (p, degenerate)
    }

    pub fn apply<O: StepObserver>(&self, points: &mut [PointMass<F>], min_area: F, observer: &mut O) {
        let n = points.len();
        if n < 3 {
            return;
        }
        let (p, degenerate) = self.pressure_at(geometry::area(points), min_area);
        if let Some(err) = degenerate {
            log::warn!("{}", err);
            observer.on_degenerate(&err);
        }

        for i in 0..n {
            let j = (i + 1) % n;
            let from = points[i].position;
            let to = points[j].position;
            let edge_force = geometry::outward_normal(from, to).scale(from.distance(to) * p);
            let half = edge_force.scale(F::half());
            points[i].apply_force(half);
            points[j].apply_force(half);
        }
    }
}

/// Damps each point's motion relative to the centroid along the line
/// joining them, which calms the breathing mode the pressure excites.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PressureDamping<F: Float> {
    pub coefficient: F,
}

impl<F: Float> PressureDamping<F> {
    pub fn new(coefficient: F) -> Self {
        PressureDamping { coefficient }
    }

    pub fn apply(&self, points: &mut [PointMass<F>]) {
        let center = geometry::centroid(points);
        for p in points.iter_mut() {
            let direction = (center.position - p.position).normalize();
            let relative_velocity = p.velocity - center.velocity;
            let damping = direction.dot(relative_velocity) * self.coefficient;
            p.force -= direction.scale(damping);
        }
    }
}
