//! Polygon queries over a ring of point masses.
//!
//! Shared by the body accessors and the force modules. Consecutive points
//! (wrapping) form the polygon boundary.

use crate::float::Float;
use crate::point::PointMass;
use crate::vec::Vec2;

/// Unweighted mean position and velocity of a set of points.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Centroid<F: Float> {
    pub position: Vec2<F>,
    pub velocity: Vec2<F>,
}

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb<F: Float> {
    pub min: Vec2<F>,
    pub max: Vec2<F>,
}

impl<F: Float> Aabb<F> {
    /// Inclusive on every side.
    pub fn contains(&self, point: Vec2<F>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Mean of positions and of velocities. Not mass-weighted.
pub fn centroid<F: Float>(points: &[PointMass<F>]) -> Centroid<F> {
    if points.is_empty() {
        return Centroid::default();
    }
    let mut position = Vec2::zero();
    let mut velocity = Vec2::zero();
    for p in points {
        position += p.position;
        velocity += p.velocity;
    }
    let inv_n = F::one() / F::from_usize(points.len());
    Centroid {
        position: position.scale(inv_n),
        velocity: velocity.scale(inv_n),
    }
}

pub fn bounding_box<F: Float>(points: &[PointMass<F>]) -> Aabb<F> {
    let Some(first) = points.first() else {
        return Aabb::default();
    };
    points.iter().skip(1).fold(
        Aabb { min: first.position, max: first.position },
        |aabb, p| Aabb {
            min: aabb.min.min(p.position),
            max: aabb.max.max(p.position),
        },
    )
}

/// Shoelace sum: positive for counter-clockwise rings, negative for clockwise.
pub fn signed_area<F: Float>(points: &[PointMass<F>]) -> F {
    let n = points.len();
    if n < 3 {
        return F::zero();
    }
    let mut sum = F::zero();
    for i in 0..n {
        let a = points[i].position;
        let b = points[(i + 1) % n].position;
        sum = sum + a.cross(b);
    }
    sum * F::half()
}

/// Enclosed area, independent of winding.
pub fn area<F: Float>(points: &[PointMass<F>]) -> F {
    signed_area(points).abs()
}

/// Unit normal of the edge `from -> to`, rotated clockwise.
///
/// Points outward for a counter-clockwise ring and inward for a clockwise
/// one. Zero for a degenerate edge.
pub fn outward_normal<F: Float>(from: Vec2<F>, to: Vec2<F>) -> Vec2<F> {
    (to - from).normalize().perp_cw()
}
