//! A rolling ball that lives on a surface.

use super::{Surface, SurfaceCoordinate};
use crate::float_types::{ADVECT_EPSILON, Real};
use crate::vertex::HasNormal;
use nalgebra::{Matrix3, Point3, Unit, UnitQuaternion, Vector3};
use std::fmt;

/// A particle of mass `mass` and radius `radius` rolling along a surface.
///
/// Forces accumulate through [`apply_force`](Self::apply_force) and are consumed by
/// the next [`integrate`](Self::integrate).
pub struct SurfaceParticle<'a, S> {
    pub coordinate: SurfaceCoordinate<'a, S>,
    pub velocity: Vector3<Real>,
    pub forces: Vector3<Real>,
    pub rotation: UnitQuaternion<Real>,
    pub mass: Real,
    pub radius: Real,
}

impl<S> Clone for SurfaceParticle<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for SurfaceParticle<'_, S> {}

impl<S> fmt::Debug for SurfaceParticle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceParticle")
            .field("coordinate", &self.coordinate)
            .field("velocity", &self.velocity)
            .field("forces", &self.forces)
            .field("rotation", &self.rotation)
            .field("mass", &self.mass)
            .field("radius", &self.radius)
            .finish()
    }
}

impl<'a, S> SurfaceParticle<'a, S> {
    pub fn new(
        coordinate: SurfaceCoordinate<'a, S>,
        velocity: Vector3<Real>,
        rotation: UnitQuaternion<Real>,
        mass: Real,
        radius: Real,
    ) -> Self {
        debug_assert!(mass > 0.0, "particle mass must be positive");
        debug_assert!(radius > 0.0, "particle radius must be positive");
        SurfaceParticle {
            coordinate,
            velocity,
            forces: Vector3::zeros(),
            rotation,
            mass,
            radius,
        }
    }

    #[inline]
    pub fn apply_force(&mut self, force: Vector3<Real>) {
        self.forces += force;
    }
}

impl<S> SurfaceParticle<'_, S>
where
    S: Surface,
    S::Vertex: HasNormal,
{
    /// Advance the particle by `dt` seconds.
    ///
    /// Accumulated forces are applied and cleared, the velocity is projected onto the
    /// surface and damped by `exp(-dt · friction)`, the ball rolls about
    /// `normal × velocity` by `|v| dt / radius`, and the coordinate is advected by
    /// `v dt`. The speed is kept while the direction follows the surface.
    pub fn integrate(&mut self, dt: Real) {
        self.velocity += self.forces * (dt / self.mass);
        self.forces = Vector3::zeros();
        self.velocity = self.coordinate.project_to_tangent_space(&self.velocity);
        if !self.coordinate.is_free() {
            self.velocity *= (-dt * self.coordinate.friction()).exp();
        }

        let speed = self.velocity.norm();
        if speed <= ADVECT_EPSILON {
            return;
        }

        let normal = self.coordinate.interpolated_normal();
        if let Some(axis) = Unit::try_new(normal.cross(&self.velocity), Real::EPSILON) {
            let spin = UnitQuaternion::from_axis_angle(&axis, speed * dt / self.radius);
            self.rotation = spin * self.rotation;
        }

        let moved = self.coordinate.advect(&(self.velocity * dt));
        let m = moved.norm();
        self.velocity = if m > ADVECT_EPSILON {
            moved * (speed / m)
        } else {
            moved
        };
    }

    /// Rows are tangent, normal and binormal. The tangent follows the velocity,
    /// then the pending forces, then the triangle's `du` axis.
    pub fn frame(&self) -> Matrix3<Real> {
        let tangent_space = self.coordinate.tangent_space();
        let n = tangent_space.n;
        let tangent = self
            .velocity
            .try_normalize(ADVECT_EPSILON)
            .or_else(|| self.forces.try_normalize(ADVECT_EPSILON))
            .or_else(|| tangent_space.du.try_normalize(Real::EPSILON))
            .unwrap_or_else(Vector3::x);
        let binormal = n
            .cross(&tangent)
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        Matrix3::from_rows(&[tangent.transpose(), n.transpose(), binormal.transpose()])
    }

    /// Centre of the ball, lifted off the surface by its radius along the normal.
    pub fn center(&self) -> Point3<Real> {
        if self.coordinate.is_free() {
            return self.coordinate.position;
        }
        self.coordinate.position + self.coordinate.interpolated_normal() * self.radius
    }

    /// Elastic push between two overlapping particles. Returns whether they touch.
    ///
    /// Impulses are only exchanged when the particles approach each other; they are
    /// applied as forces over `dt`.
    pub fn collide(&mut self, other: &mut Self, dt: Real) -> bool {
        let mut dir = self.center() - other.center();
        let mut d = dir.norm();
        if d > self.radius + other.radius {
            return false;
        }
        if d < 1e-6 {
            d = 1.0;
        }
        dir /= d;

        let ua = dir.dot(&self.velocity);
        let ub = dir.dot(&other.velocity);
        if ua + ub < 0.0 {
            return true;
        }

        let (ma, mb) = (self.mass, other.mass);
        self.apply_force(dir * (mb * (ub - ua) + mb * ub) / dt);
        other.apply_force(dir * (ma * (ua - ub) + ma * ua) / dt);
        true
    }
}
