//! A set of bodies sharing one container, one config and one grab.

use crate::body::DeformableBody;
use crate::config::{Container, SimulationConfig};
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::observer::StepObserver;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Handle to a body inside a [`World`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Owns every body of a scene.
///
/// At most one point of at most one body is grabbed at a time. The world
/// records that grab itself; a grab made directly on a body through
/// [`World::body_mut`] is dropped by the next world operation. A frame
/// driver typically calls [`World::drag`] (while the mouse is held), then
/// [`World::step`], then reads positions for drawing.
#[derive(Clone, Debug)]
pub struct World<F: Float> {
    bodies: AllocVec<DeformableBody<F>>,
    config: SimulationConfig<F>,
    grab: Option<(BodyId, usize)>,
}

impl<F: Float> World<F> {
    pub fn new(config: SimulationConfig<F>) -> Self {
        World { bodies: AllocVec::new(), config, grab: None }
    }

    pub fn add_body(&mut self, body: DeformableBody<F>) -> BodyId {
        self.bodies.push(body);
        BodyId(self.bodies.len() - 1)
    }

    pub fn body(&self, id: BodyId) -> Option<&DeformableBody<F>> {
        self.bodies.get(id.0)
    }

    /// Mutable access to one body. Grabs made through it are not recorded
    /// by the world and get released by the next `drag`, `step` or grab.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut DeformableBody<F>> {
        self.bodies.get_mut(id.0)
    }

    pub fn bodies(&self) -> &[DeformableBody<F>] {
        &self.bodies
    }

    pub fn config(&self) -> &SimulationConfig<F> {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SimulationConfig<F> {
        &mut self.config
    }

    pub fn set_container(&mut self, container: Container<F>) {
        self.config.container = container;
    }

    /// Grab the point nearest to `target` across all bodies.
    ///
    /// Any previous grab is released first. Fails with `EmptyBody` when the
    /// world holds no points at all.
    pub fn grab_nearest(&mut self, target: Vec2<F>) -> Result<(BodyId, usize)> {
        self.release();
        let mut nearest: Option<(usize, usize, F)> = None;
        for (b, body) in self.bodies.iter().enumerate() {
            if let Some((i, d)) = body.nearest_point(target) {
                match nearest {
                    Some((_, _, best)) if d >= best => {}
                    _ => nearest = Some((b, i, d)),
                }
            }
        }
        let (b, _, _) = nearest.ok_or(PhysicsError::EmptyBody)?;
        let index = self.bodies[b].grab_nearest(target)?;
        self.grab = Some((BodyId(b), index));
        Ok((BodyId(b), index))
    }

    /// Body and point currently grabbed, if any.
    pub fn grabbed(&self) -> Option<(BodyId, usize)> {
        self.grab
    }

    /// Drag the grabbed point toward `target`. Returns whether it moved.
    pub fn drag(&mut self, target: Vec2<F>, dt: F) -> bool {
        self.sync_grab();
        let grab_min = self.config.grab_min;
        match self.grab {
            Some((id, _)) => self.bodies[id.0].drag_grabbed_point_with(target, dt, grab_min),
            None => false,
        }
    }

    pub fn release(&mut self) {
        self.grab = None;
        for body in self.bodies.iter_mut() {
            body.release();
        }
    }

    /// Make the bodies' grab states agree with the world's record.
    fn sync_grab(&mut self) {
        for (b, body) in self.bodies.iter_mut().enumerate() {
            let wanted = match self.grab {
                Some((id, index)) if id.0 == b => Some(index),
                _ => None,
            };
            if body.grabbed() != wanted {
                log::debug!("body {} grab {:?} overridden by world grab {:?}", b, body.grabbed(), self.grab);
                match wanted {
                    Some(index) => body.hold(index),
                    None => body.release(),
                }
            }
        }
    }

    /// Step every body once with the shared config.
    pub fn step<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        self.sync_grab();
        for body in self.bodies.iter_mut() {
            body.step(dt, &self.config, observer);
        }
    }
}

impl<F: Float> Default for World<F> {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
