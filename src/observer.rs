//! Step observer trait for monitoring simulation progress.

use crate::error::PhysicsError;

/// Container wall a point was pushed back from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Floor,
    Right,
    Left,
    Ceiling,
}

/// Trait for observing simulation steps.
///
/// Implement this trait to monitor a step (e.g., for debugging,
/// visualization, or profiling). All methods have default no-op
/// implementations.
pub trait StepObserver {
    /// Called once every force module has written into the accumulators.
    fn on_forces_accumulated(&mut self) {}

    /// Called after all free points have been integrated.
    fn on_integrate(&mut self) {}

    /// Called for every boundary correction.
    fn on_collision(&mut self, _point: usize, _edge: Edge) {}

    /// Called when a recoverable condition was handled in place.
    fn on_degenerate(&mut self, _error: &PhysicsError) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}

/// Observer that counts what happened, handy in tests and debug overlays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepStats {
    pub steps: usize,
    pub integrations: usize,
    pub collisions: usize,
    pub degenerate: usize,
}

impl StepObserver for StepStats {
    fn on_integrate(&mut self) {
        self.integrations += 1;
    }

    fn on_collision(&mut self, _point: usize, _edge: Edge) {
        self.collisions += 1;
    }

    fn on_degenerate(&mut self, _error: &PhysicsError) {
        self.degenerate += 1;
    }

    fn on_step_complete(&mut self) {
        self.steps += 1;
    }
}
