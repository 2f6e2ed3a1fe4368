//! Deformable bodies: a ring of point masses, springs, and force modules.

use crate::config::{CollisionResponse, Container, SimulationConfig, GRAB_MIN};
use crate::error::{PhysicsError, Result, TopologyError};
use crate::float::Float;
use crate::force::{self, ForceModule, Pressure, PressureDamping};
use crate::geometry::{self, Aabb, Centroid};
use crate::observer::{Edge, StepObserver};
use crate::point::PointMass;
use crate::spring::Spring;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Interaction state of a body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Grab {
    #[default]
    Free,
    /// Index of the point driven by drag input instead of integration.
    Held(usize),
}

/// A 2D deformable body.
///
/// Points are stored counter-clockwise, so [`DeformableBody::outward_normal`]
/// points away from the interior. Topology (point count, springs, modules)
/// is fixed once built; only point state and the grab change afterwards.
#[derive(Clone, Debug)]
pub struct DeformableBody<F: Float> {
    points: AllocVec<PointMass<F>>,
    springs: AllocVec<Spring<F>>,
    modules: AllocVec<ForceModule<F>>,
    grab: Grab,
}

impl<F: Float> DeformableBody<F> {
    /// Start describing a body point by point.
    pub fn builder() -> BodyBuilder<F> {
        BodyBuilder::new()
    }

    // ---- geometry -------------------------------------------------------

    /// Unweighted mean position and velocity of all points.
    pub fn centroid(&self) -> Centroid<F> {
        geometry::centroid(&self.points)
    }

    pub fn bounding_box(&self) -> Aabb<F> {
        geometry::bounding_box(&self.points)
    }

    pub fn in_bounding_box(&self, point: Vec2<F>) -> bool {
        self.bounding_box().contains(point)
    }

    /// Approximate inside test.
    ///
    /// Returns false as soon as one body point `Pi` gives a negative
    /// `(point - centroid) . (Pi - point)`. This is a sign heuristic, not a
    /// point-in-polygon test: it holds for the centroid and rejects far
    /// points, but is unreliable near the boundary and for concave or
    /// strongly deformed shapes.
    pub fn contains_point(&self, point: Vec2<F>) -> bool {
        let from_center = point - self.centroid().position;
        self.points
            .iter()
            .all(|p| from_center.dot(p.position - point) >= F::zero())
    }

    /// Shoelace area; positive because points are kept counter-clockwise.
    pub fn signed_area(&self) -> F {
        geometry::signed_area(&self.points)
    }

    pub fn area(&self) -> F {
        geometry::area(&self.points)
    }

    /// Unit normal of the edge from point `i` to point `j`, facing out of
    /// the body when `j` follows `i` in the ring.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not less than [`DeformableBody::point_count`].
    pub fn outward_normal(&self, i: usize, j: usize) -> Vec2<F> {
        geometry::outward_normal(self.points[i].position, self.points[j].position)
    }

    // ---- forces ---------------------------------------------------------

    pub fn reset_forces(&mut self) {
        for p in self.points.iter_mut() {
            p.clear_force();
        }
    }

    pub fn spring_forces(&mut self) {
        force::apply_springs(&mut self.points, &self.springs);
    }

    pub fn gravity_forces(&mut self, g: F) {
        force::apply_gravity(&mut self.points, g);
    }

    /// Apply every attached pressure module. No-op for bodies without one.
    pub fn pressure_forces<O: StepObserver>(&mut self, min_area: F, observer: &mut O) {
        for module in &self.modules {
            if let ForceModule::Pressure(p) = module {
                p.apply(&mut self.points, min_area, observer);
            }
        }
    }

    pub fn pressure_damping_forces(&mut self) {
        for module in &self.modules {
            if let ForceModule::PressureDamping(d) = module {
                d.apply(&mut self.points);
            }
        }
    }

    /// Clear the accumulators, then run every attached module in order.
    pub fn accumulate_forces<O: StepObserver>(&mut self, config: &SimulationConfig<F>, observer: &mut O) {
        self.reset_forces();
        for module in &self.modules {
            module.apply(&mut self.points, &self.springs, config, observer);
        }
        observer.on_forces_accumulated();
    }

    // ---- integration & collisions ---------------------------------------

    /// Explicit Euler on every point except the grabbed one.
    ///
    /// Non-positive (or NaN) `dt` does nothing. Stability needs roughly
    /// `stiffness * dt^2 / mass` to stay small; past that the body gains
    /// energy every step and blows up.
    pub fn integrate(&mut self, dt: F) {
        if !(dt > F::zero()) {
            return;
        }
        let held = self.grabbed();
        for (i, p) in self.points.iter_mut().enumerate() {
            if held != Some(i) {
                p.integrate(dt);
            }
        }
    }

    /// Push points back inside the container.
    ///
    /// Edges are tested in the order floor, right, left, ceiling and only the
    /// first violated one is corrected per point per call. Returns the number
    /// of corrected points.
    pub fn resolve_boundary_collision<O: StepObserver>(
        &mut self,
        container: &Container<F>,
        response: CollisionResponse,
        observer: &mut O,
    ) -> usize {
        let mut hits = 0;
        for (i, p) in self.points.iter_mut().enumerate() {
            let edge = if p.position.y < container.ymin {
                p.position.y = container.ymin;
                Edge::Floor
            } else if p.position.x > container.xmax {
                p.position.x = container.xmax;
                Edge::Right
            } else if p.position.x < container.xmin {
                p.position.x = container.xmin;
                Edge::Left
            } else if p.position.y > container.ymax {
                p.position.y = container.ymax;
                Edge::Ceiling
            } else {
                continue;
            };

            let horizontal = matches!(edge, Edge::Floor | Edge::Ceiling);
            match response {
                CollisionResponse::NegateAll => {
                    p.velocity = -p.velocity;
                    if horizontal {
                        p.velocity.x = F::zero();
                    } else {
                        p.velocity.y = F::zero();
                    }
                }
                CollisionResponse::ReflectNormal => {
                    if horizontal {
                        p.velocity.y = -p.velocity.y;
                    } else {
                        p.velocity.x = -p.velocity.x;
                    }
                }
            }

            log::trace!("point {} hit {:?}", i, edge);
            observer.on_collision(i, edge);
            hits += 1;
        }
        hits
    }

    /// One frame: accumulate forces, integrate, then collide if enabled.
    pub fn step<O: StepObserver>(&mut self, dt: F, config: &SimulationConfig<F>, observer: &mut O) {
        if !(dt > F::zero()) {
            return;
        }
        self.accumulate_forces(config, observer);

        self.integrate(dt);
        observer.on_integrate();

        if config.collide {
            self.resolve_boundary_collision(&config.container, config.collision_response, observer);
        }
        observer.on_step_complete();
    }

    // ---- grab & drag ----------------------------------------------------

    /// Grab the point nearest to `target`, replacing any previous grab.
    pub fn grab_nearest(&mut self, target: Vec2<F>) -> Result<usize> {
        let (index, _) = self.nearest_point(target).ok_or(PhysicsError::EmptyBody)?;
        self.grab = Grab::Held(index);
        log::debug!("grabbed point {}", index);
        Ok(index)
    }

    /// Hold a known point; the world uses this to restore its own grab.
    pub(crate) fn hold(&mut self, index: usize) {
        self.grab = Grab::Held(index);
    }

    /// Index and squared distance of the point closest to `target`.
    pub fn nearest_point(&self, target: Vec2<F>) -> Option<(usize, F)> {
        let mut nearest: Option<(usize, F)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = p.position.distance_sq(target);
            match nearest {
                Some((_, best)) if d >= best => {}
                _ => nearest = Some((i, d)),
            }
        }
        nearest
    }

    /// Move the grabbed point toward `target` with the default dead zone.
    pub fn drag_grabbed_point(&mut self, target: Vec2<F>, dt: F) -> bool {
        self.drag_grabbed_point_with(target, dt, F::from_f64(GRAB_MIN))
    }

    /// Move the grabbed point toward `target`.
    ///
    /// The point moves when it is farther than `grab_min` from the target, or
    /// when its x exceeds the target's x. Its step keeps the direction to the
    /// target but takes the length of `target - centroid`, so the pull stays
    /// strong as the point closes in. Returns whether the point moved; with
    /// nothing grabbed this does nothing.
    pub fn drag_grabbed_point_with(&mut self, target: Vec2<F>, dt: F, grab_min: F) -> bool {
        let Grab::Held(index) = self.grab else {
            return false;
        };
        if !(dt > F::zero()) {
            return false;
        }
        let current = self.points[index].position;
        let offset = target - current;
        let distance = offset.length();
        if !(distance > grab_min || current.x > target.x) {
            return false;
        }
        // Already on target: no direction to rescale.
        if distance.is_near_zero(F::from_f64(1e-12)) {
            return false;
        }
        let reach = target.distance(self.centroid().position);
        let velocity = offset.scale(reach / distance);
        self.points[index].position += velocity.scale(dt);
        true
    }

    /// Let go of the grabbed point; it integrates normally from the next step.
    pub fn release(&mut self) {
        if let Grab::Held(index) = self.grab {
            log::debug!("released point {}", index);
        }
        self.grab = Grab::Free;
    }

    pub fn grab_state(&self) -> Grab {
        self.grab
    }

    pub fn grabbed(&self) -> Option<usize> {
        match self.grab {
            Grab::Held(index) => Some(index),
            Grab::Free => None,
        }
    }

    // ---- accessors ------------------------------------------------------

    /// Ordered ring of positions, ready for polygon drawing.
    pub fn point_positions(&self) -> AllocVec<Vec2<F>> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn spring_endpoints(&self) -> AllocVec<(Vec2<F>, Vec2<F>)> {
        self.springs.iter().map(|s| s.endpoints(&self.points)).collect()
    }

    pub fn points(&self) -> &[PointMass<F>] {
        &self.points
    }

    /// Mutable point state. The slice cannot grow or shrink, so topology
    /// stays intact.
    pub fn points_mut(&mut self) -> &mut [PointMass<F>] {
        &mut self.points
    }

    /// # Panics
    ///
    /// Panics if `index` is not less than [`DeformableBody::point_count`].
    pub fn point(&self, index: usize) -> &PointMass<F> {
        &self.points[index]
    }

    pub fn springs(&self) -> &[Spring<F>] {
        &self.springs
    }

    pub fn modules(&self) -> &[ForceModule<F>] {
        &self.modules
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Rest area of the first pressure module, if any.
    pub fn rest_area(&self) -> Option<F> {
        self.modules.iter().find_map(|m| match m {
            ForceModule::Pressure(p) => Some(p.rest_area),
            _ => None,
        })
    }
}

/// Validating constructor for [`DeformableBody`].
///
/// ```
/// use squish::{DeformableBody, Vec2};
///
/// let mut builder = DeformableBody::<f64>::builder();
/// let a = builder.add_point(Vec2::new(0.0, 0.0), 1.0);
/// let b = builder.add_point(Vec2::new(1.0, 0.0), 1.0);
/// let c = builder.add_point(Vec2::new(0.0, 1.0), 1.0);
/// builder.connect(a, b, 10.0, 0.1).connect(b, c, 10.0, 0.1).connect(c, a, 10.0, 0.1);
/// let body = builder.with_gravity().with_springs().build().unwrap();
/// assert_eq!(body.spring_count(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct BodyBuilder<F: Float> {
    points: AllocVec<PointMass<F>>,
    springs: AllocVec<Spring<F>>,
    modules: AllocVec<ForceModule<F>>,
}

impl<F: Float> BodyBuilder<F> {
    pub fn new() -> Self {
        BodyBuilder {
            points: AllocVec::new(),
            springs: AllocVec::new(),
            modules: AllocVec::new(),
        }
    }

    /// Append a point at rest; returns its index.
    ///
    /// If the finished ring turns out clockwise, `build` reverses it around
    /// point 0: index 0 keeps its point and index `i` becomes `n - i`.
    pub fn add_point(&mut self, position: Vec2<F>, mass: F) -> usize {
        self.points.push(PointMass::new(position, mass));
        self.points.len() - 1
    }

    pub fn add_spring(&mut self, spring: Spring<F>) -> &mut Self {
        self.springs.push(spring);
        self
    }

    /// Spring between two added points, resting at their current distance.
    ///
    /// Out-of-range indices are kept as given and rejected by `build`.
    pub fn connect(&mut self, a: usize, b: usize, stiffness: F, damping: F) -> &mut Self {
        let rest_length = match (self.points.get(a), self.points.get(b)) {
            (Some(pa), Some(pb)) => pa.position.distance(pb.position),
            _ => F::zero(),
        };
        self.springs.push(Spring::new(a, b, rest_length, stiffness, damping));
        self
    }

    pub fn with_module(&mut self, module: ForceModule<F>) -> &mut Self {
        self.modules.push(module);
        self
    }

    pub fn with_gravity(&mut self) -> &mut Self {
        self.with_module(ForceModule::Gravity)
    }

    pub fn with_springs(&mut self) -> &mut Self {
        self.with_module(ForceModule::Springs)
    }

    /// Pressure resting at the area the points enclose when built.
    pub fn with_pressure(&mut self, coefficient: F) -> &mut Self {
        self.with_module(ForceModule::Pressure(Pressure::new(F::zero(), coefficient)))
    }

    pub fn with_pressure_damping(&mut self, coefficient: F) -> &mut Self {
        self.with_module(ForceModule::PressureDamping(PressureDamping::new(coefficient)))
    }

    /// Validate and build.
    ///
    /// A clockwise ring is reversed around point 0 (index `i` becomes
    /// `(n - i) % n`, springs follow) so every body is stored
    /// counter-clockwise. Pressure modules without a positive rest
    /// area take the built area.
    pub fn build(&self) -> Result<DeformableBody<F>> {
        let count = self.points.len();
        if count < 3 {
            return Err(TopologyError::InsufficientPoints { count }.into());
        }
        if self.points.iter().any(|p| !(p.mass > F::zero()) || !p.mass.is_finite()) {
            return Err(TopologyError::InvalidMass.into());
        }
        for (spring, s) in self.springs.iter().enumerate() {
            for index in [s.a, s.b] {
                if index >= count {
                    return Err(TopologyError::SpringOutOfBounds { spring, index, count }.into());
                }
            }
            if s.a == s.b {
                return Err(TopologyError::SelfSpring { spring, index: s.a }.into());
            }
        }

        let mut points = self.points.clone();
        let mut springs = self.springs.clone();
        if geometry::signed_area(&points) < F::zero() {
            let rewound = |i: usize| (count - i) % count;
            points = (0..count).map(|i| self.points[rewound(i)].clone()).collect();
            for s in springs.iter_mut() {
                s.a = rewound(s.a);
                s.b = rewound(s.b);
            }
        }

        let area = geometry::area(&points);
        let mut modules = self.modules.clone();
        for module in modules.iter_mut() {
            if let ForceModule::Pressure(p) = module {
                if !(p.rest_area > F::zero()) {
                    p.rest_area = area;
                }
                if p.rest_area.is_near_zero(F::from_f64(1e-12)) {
                    return Err(TopologyError::DegenerateRestArea.into());
                }
            }
        }

        log::debug!(
            "built body: {} points, {} springs, {} modules, area {:.4}",
            count,
            springs.len(),
            modules.len(),
            area.to_f64()
        );
        Ok(DeformableBody { points, springs, modules, grab: Grab::Free })
    }
}

impl<F: Float> Default for BodyBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoOpStepObserver;

    fn triangle(builder: &mut BodyBuilder<f64>) {
        builder.add_point(Vec2::new(0.0, 0.0), 1.0);
        builder.add_point(Vec2::new(1.0, 0.0), 1.0);
        builder.add_point(Vec2::new(0.0, 1.0), 1.0);
    }

    #[test]
    fn rejects_too_few_points() {
        let mut builder = BodyBuilder::<f64>::new();
        builder.add_point(Vec2::new(0.0, 0.0), 1.0);
        builder.add_point(Vec2::new(1.0, 0.0), 1.0);
        assert_eq!(
            builder.build().unwrap_err(),
            PhysicsError::InvalidTopology(TopologyError::InsufficientPoints { count: 2 })
        );
    }

    #[test]
    fn rejects_bad_springs_and_mass() {
        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        builder.connect(0, 7, 1.0, 0.0);
        assert!(matches!(
            builder.build(),
            Err(PhysicsError::InvalidTopology(TopologyError::SpringOutOfBounds { index: 7, .. }))
        ));

        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        builder.connect(1, 1, 1.0, 0.0);
        assert!(matches!(
            builder.build(),
            Err(PhysicsError::InvalidTopology(TopologyError::SelfSpring { index: 1, .. }))
        ));

        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        builder.add_point(Vec2::new(-1.0, 0.5), 0.0);
        assert_eq!(builder.build().unwrap_err(), PhysicsError::from(TopologyError::InvalidMass));
    }

    #[test]
    fn clockwise_input_is_rewound() {
        let mut builder = BodyBuilder::<f64>::new();
        builder.add_point(Vec2::new(0.0, 0.0), 1.0);
        builder.add_point(Vec2::new(0.0, 1.0), 1.0);
        builder.add_point(Vec2::new(1.0, 0.0), 1.0);
        builder.connect(0, 1, 5.0, 0.0);
        let body = builder.build().unwrap();
        assert!(body.signed_area() > 0.0);
        // The spring still joins (0,0) and (0,1).
        let (a, b) = body.spring_endpoints()[0];
        assert_eq!((a, b), (Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn rewinding_keeps_the_first_index() {
        let mut builder = BodyBuilder::<f64>::new();
        let first = builder.add_point(Vec2::new(0.0, 0.0), 1.0);
        let second = builder.add_point(Vec2::new(0.0, 1.0), 1.0);
        let third = builder.add_point(Vec2::new(1.0, 1.0), 1.0);
        let fourth = builder.add_point(Vec2::new(1.0, 0.0), 1.0);
        builder.connect(first, third, 5.0, 0.0);
        let body = builder.build().unwrap();
        assert!(body.signed_area() > 0.0);
        assert_eq!(body.point(first).position, Vec2::new(0.0, 0.0));
        assert_eq!(body.point(4 - second).position, Vec2::new(0.0, 1.0));
        assert_eq!(body.point(4 - third).position, Vec2::new(1.0, 1.0));
        assert_eq!(body.point(4 - fourth).position, Vec2::new(1.0, 0.0));
        assert_eq!((body.springs()[0].a, body.springs()[0].b), (0, 2));
    }

    #[test]
    #[should_panic]
    fn point_index_out_of_range_panics() {
        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        let body = builder.build().unwrap();
        body.point(3);
    }

    #[test]
    #[should_panic]
    fn outward_normal_index_out_of_range_panics() {
        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        let body = builder.build().unwrap();
        body.outward_normal(2, 3);
    }

    #[test]
    fn collinear_ring_cannot_hold_pressure() {
        let mut builder = BodyBuilder::<f64>::new();
        builder.add_point(Vec2::new(0.0, 0.0), 1.0);
        builder.add_point(Vec2::new(1.0, 0.0), 1.0);
        builder.add_point(Vec2::new(2.0, 0.0), 1.0);
        builder.with_pressure(10.0);
        assert_eq!(builder.build().unwrap_err(), PhysicsError::from(TopologyError::DegenerateRestArea));
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        let mut body = builder.with_gravity().build().unwrap();
        let before = body.point_positions();
        let config = SimulationConfig::new();
        body.step(0.0, &config, &mut NoOpStepObserver);
        body.step(-0.1, &config, &mut NoOpStepObserver);
        body.step(f64::NAN, &config, &mut NoOpStepObserver);
        assert_eq!(body.point_positions(), before);
    }

    #[test]
    fn drag_without_grab_does_nothing() {
        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        let mut body = builder.build().unwrap();
        assert!(!body.drag_grabbed_point(Vec2::new(5.0, 5.0), 0.1));
        body.release();
        assert_eq!(body.grab_state(), Grab::Free);
    }

    #[test]
    fn drag_inside_dead_zone_is_ignored() {
        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        let mut body = builder.build().unwrap();
        body.grab_nearest(Vec2::new(0.0, 1.0)).unwrap();
        // Slightly up-right of the point, within 0.02.
        assert!(!body.drag_grabbed_point(Vec2::new(0.005, 1.01), 0.1));
        assert_eq!(body.point(2).position, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn drag_corrects_a_point_right_of_target_even_when_close() {
        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        let mut body = builder.build().unwrap();
        body.grab_nearest(Vec2::new(1.0, 0.0)).unwrap();
        assert!(body.drag_grabbed_point(Vec2::new(0.99, 0.0), 0.1));
        assert!(body.point(1).position.x < 1.0);
    }

    #[test]
    fn drag_step_length_follows_centroid_distance() {
        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        let mut body = builder.build().unwrap();
        let index = body.grab_nearest(Vec2::new(0.0, 1.0)).unwrap();
        let target = Vec2::new(0.0, 3.0);
        let reach = target.distance(body.centroid().position);
        let before = body.point(index).position;
        body.drag_grabbed_point(target, 0.5);
        let moved = body.point(index).position - before;
        assert!((moved.length() - reach * 0.5).abs() < 1e-12);
        assert!(moved.x.abs() < 1e-12 && moved.y > 0.0);
    }

    #[test]
    fn grabbed_point_skips_integration() {
        let mut builder = BodyBuilder::new();
        triangle(&mut builder);
        let mut body = builder.with_gravity().build().unwrap();
        let held = body.grab_nearest(Vec2::new(0.0, 0.0)).unwrap();
        let config = SimulationConfig::new().with_collisions(false);
        body.step(0.1, &config, &mut NoOpStepObserver);
        assert_eq!(body.point(held).position, Vec2::new(0.0, 0.0));
        assert_eq!(body.point(held).velocity, Vec2::zero());
        assert!(body.point((held + 1) % 3).velocity.y < 0.0);
    }
}
