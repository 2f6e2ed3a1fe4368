//! Pressurized spring-mass soft bodies in 2D.
//!
//! `squish` simulates deformable bodies built from point masses joined by
//! damped springs, optionally inflated by an internal pressure that resists
//! area change. Bodies are stepped with explicit Euler and kept inside a
//! rectangular container; a single point can be grabbed and dragged around.
//!
//! # Features
//!
//! - **Composable forces**: gravity, springs, pressure and pressure damping
//!   are independent modules attached to a body
//! - **Procedural shapes**: pressurized balls and braced four-point lattices
//! - **Grab and drag**: one point at a time follows external input
//! - **Observable**: monitor steps, collisions and clamped geometry via the
//!   `StepObserver` trait; diagnostics also go to the `log` facade
//! - **`no_std` compatible**: only needs `alloc`
//!
//! # Stability
//!
//! Explicit Euler is conditionally stable. Keep `stiffness * dt^2 / mass`
//! small (stiff bodies need a smaller `dt`); otherwise the body gains energy
//! every step and explodes. This is a property of the integrator and is not
//! corrected for.
//!
//! ```
//! use squish::{BallConfig, DeformableBody, NoOpStepObserver, SimulationConfig, Vec2};
//!
//! let mut ball = DeformableBody::spherical(Vec2::new(0.0f32, 3.0), &BallConfig::soft_polygon()).unwrap();
//! let config = SimulationConfig::new();
//! for _ in 0..60 {
//!     ball.step(1.0 / 100.0, &config, &mut NoOpStepObserver);
//! }
//! assert!(ball.centroid().position.y < 3.0);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod point;
pub mod spring;
pub mod geometry;
pub mod force;
pub mod body;
pub mod shapes;
pub mod world;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use point::PointMass;
pub use spring::Spring;
pub use geometry::{Aabb, Centroid};
pub use force::{ForceModule, Pressure, PressureDamping};
pub use body::{BodyBuilder, DeformableBody, Grab};
pub use shapes::{BallConfig, LatticeConfig};
pub use world::{BodyId, World};
pub use config::{CollisionResponse, Container, SimulationConfig};
pub use observer::{Edge, NoOpStepObserver, StepObserver, StepStats};
pub use error::{PhysicsError, TopologyError};
