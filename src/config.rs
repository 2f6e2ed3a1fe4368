//! Configuration types for the simulation.

use crate::float::Float;

/// Gravity acceleration (m/s^2).
pub const GRAVITY: f64 = 9.81;

/// Distance under which a grabbed point stops chasing the target.
pub const GRAB_MIN: f64 = 0.02;

/// Smallest area the pressure model divides by.
pub const MIN_AREA: f64 = 1e-6;

/// Axis-aligned container box every body is kept inside.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container<F: Float> {
    pub xmin: F,
    pub xmax: F,
    pub ymin: F,
    pub ymax: F,
}

impl<F: Float> Container<F> {
    pub fn new(xmin: F, xmax: F, ymin: F, ymax: F) -> Self {
        Container { xmin, xmax, ymin, ymax }
    }
}

impl<F: Float> Default for Container<F> {
    fn default() -> Self {
        Container {
            xmin: F::from_f64(-5.0),
            xmax: F::from_f64(5.0),
            ymin: F::from_f64(-2.0),
            ymax: F::from_f64(10.0),
        }
    }
}

/// How velocity is rewritten when a point is pushed back into the container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionResponse {
    /// Negate the whole velocity, then zero the tangential component.
    ///
    /// A sticky bounce: the wall kills all sliding motion.
    #[default]
    NegateAll,
    /// Reverse only the normal component and keep the tangential one
    /// (frictionless elastic bounce).
    ReflectNormal,
}

/// Configuration shared by every body in a step.
///
/// # Builder Pattern
/// ```
/// use squish::config::{CollisionResponse, Container, SimulationConfig};
///
/// let config: SimulationConfig<f32> = SimulationConfig::new()
///     .with_gravity(9.81)
///     .with_container(Container::new(0.0, 10.0, 0.0, 10.0))
///     .with_collision_response(CollisionResponse::ReflectNormal);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig<F: Float> {
    /// Gravity acceleration magnitude, applied along -y. Default: 9.81.
    pub gravity: F,
    /// Container box. Default: x in [-5, 5], y in [-2, 10].
    pub container: Container<F>,
    /// Whether `step` resolves container collisions. Default: true.
    pub collide: bool,
    /// Velocity rewrite on collision. Default: `NegateAll`.
    pub collision_response: CollisionResponse,
    /// Drag dead zone around the target. Default: 0.02.
    pub grab_min: F,
    /// Lower clamp on the area used by the pressure model. Default: 1e-6.
    pub min_area: F,
}

impl<F: Float> SimulationConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SimulationConfig {
            gravity: F::from_f64(GRAVITY),
            container: Container::default(),
            collide: true,
            collision_response: CollisionResponse::default(),
            grab_min: F::from_f64(GRAB_MIN),
            min_area: F::from_f64(MIN_AREA),
        }
    }

    /// Set the gravity magnitude.
    pub fn with_gravity(mut self, gravity: F) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the container box.
    pub fn with_container(mut self, container: Container<F>) -> Self {
        self.container = container;
        self
    }

    /// Enable or disable container collisions inside `step`.
    pub fn with_collisions(mut self, collide: bool) -> Self {
        self.collide = collide;
        self
    }

    /// Set the collision velocity response.
    pub fn with_collision_response(mut self, response: CollisionResponse) -> Self {
        self.collision_response = response;
        self
    }

    /// Set the drag dead zone.
    pub fn with_grab_min(mut self, grab_min: F) -> Self {
        self.grab_min = grab_min;
        self
    }

    /// Set the minimum area; non-positive values fall back to the default.
    pub fn with_min_area(mut self, min_area: F) -> Self {
        self.min_area = if min_area > F::zero() { min_area } else { F::from_f64(MIN_AREA) };
        self
    }
}

impl<F: Float> Default for SimulationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
