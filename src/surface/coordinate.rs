//! `SurfaceCoordinate`: a point pinned to a triangle, with geodesic advection.

use super::Surface;
use crate::float_types::{ADVECT_EPSILON, EDGE_NUDGE, MAX_ADVECT_STEPS, Real};
use crate::trimesh::TriMesh;
use crate::vertex::{HasNormal, HasPosition};
use nalgebra::{Point3, Vector3};
use std::fmt;
use tracing::{trace, warn};

/// Local basis of a triangle: `du = v2 - v0`, `dv = v1 - v0` (neither normalized
/// nor orthogonal in general) and the unit normal `n = dv × du / |dv × du|`.
///
/// `n` follows the right-hand winding `v0 → v1 → v2`, the same orientation the
/// extractor and [`estimate_normals`](crate::algorithm::estimate_normals) use, so on
/// extracted surfaces it points out of the solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentFrame {
    pub du: Vector3<Real>,
    pub dv: Vector3<Real>,
    pub n: Vector3<Real>,
}

impl TangentFrame {
    /// Frame used away from any surface: `du = x`, `dv = z`, `n = y = z × x`.
    pub fn free() -> Self {
        TangentFrame {
            du: Vector3::x(),
            dv: Vector3::z(),
            n: Vector3::y(),
        }
    }

    /// Frame of the triangle `verts`. A degenerate triangle gets a zero normal.
    pub fn from_vertices(verts: &[Point3<Real>; 3]) -> Self {
        let du = verts[2] - verts[0];
        let dv = verts[1] - verts[0];
        let n = dv
            .cross(&du)
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        TangentFrame { du, dv, n }
    }

    /// Remove the component of `v` along the normal.
    #[inline]
    pub fn project(&self, v: &Vector3<Real>) -> Vector3<Real> {
        v - self.n * self.n.dot(v)
    }
}

/// A point on a surface: the triangle it lies in and its world position.
///
/// The coordinate borrows its surface without owning it. A coordinate with no
/// surface is "free in space" and every operation falls back to plain vector math.
///
/// The triangle is stored by name, so it is invalidated by anything that removes
/// or renumbers triangles, in particular
/// [`TriMesh::garbage_collect`](crate::trimesh::TriMesh::garbage_collect).
/// Recreate coordinates (for example with
/// [`Solid::closest_point`](crate::solid::Solid::closest_point)) after rebuilding a
/// mesh.
pub struct SurfaceCoordinate<'a, S> {
    pub triangle: usize,
    pub position: Point3<Real>,
    surface: Option<&'a S>,
}

impl<S> Clone for SurfaceCoordinate<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for SurfaceCoordinate<'_, S> {}

impl<S> fmt::Debug for SurfaceCoordinate<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceCoordinate")
            .field("triangle", &self.triangle)
            .field("position", &self.position)
            .field("attached", &self.surface.is_some())
            .finish()
    }
}

impl<'a, S> SurfaceCoordinate<'a, S> {
    /// A coordinate on `surface`, in triangle `triangle`.
    pub const fn new(triangle: usize, position: Point3<Real>, surface: &'a S) -> Self {
        SurfaceCoordinate {
            triangle,
            position,
            surface: Some(surface),
        }
    }

    /// A coordinate that is not attached to any surface.
    pub const fn free(position: Point3<Real>) -> Self {
        SurfaceCoordinate {
            triangle: 0,
            position,
            surface: None,
        }
    }

    #[inline]
    pub const fn surface(&self) -> Option<&'a S> {
        self.surface
    }

    #[inline]
    pub const fn is_free(&self) -> bool {
        self.surface.is_none()
    }

    /// Barycentric coordinates `(λ0, λ1, λ2)` of `p` with respect to the triangle
    /// spanned by `base`, `base + frame.dv`, `base + frame.du`, after projecting `p`
    /// onto its plane. `p ≈ λ0 v0 + λ1 v1 + λ2 v2`. A degenerate frame maps
    /// everything onto `v0`.
    pub fn barycentric(
        p: &Point3<Real>,
        frame: &TangentFrame,
        base: &Point3<Real>,
    ) -> Vector3<Real> {
        let p0 = frame.project(&(p - base));
        let dot00 = frame.du.dot(&frame.du);
        let dot01 = frame.du.dot(&frame.dv);
        let dot02 = frame.du.dot(&p0);
        let dot11 = frame.dv.dot(&frame.dv);
        let dot12 = frame.dv.dot(&p0);
        let denom = dot00 * dot11 - dot01 * dot01;
        if denom.abs() <= Real::EPSILON * dot00.max(dot11).max(1.0) {
            return Vector3::new(1.0, 0.0, 0.0);
        }
        let inv_denom = 1.0 / denom;
        let l2 = (dot11 * dot02 - dot01 * dot12) * inv_denom;
        let l1 = (dot00 * dot12 - dot01 * dot02) * inv_denom;
        Vector3::new(1.0 - l1 - l2, l1, l2)
    }

    /// Zero out negative barycentric weights, redistributing onto the other two.
    pub fn clamp_barycentric(b: &mut Vector3<Real>) {
        for i in 0..3 {
            if b[i] < 0.0 {
                let (j, k) = ((i + 1) % 3, (i + 2) % 3);
                let s = b[j] + b[k];
                b[i] = 0.0;
                b[j] /= s;
                b[k] /= s;
            }
        }
    }
}

impl<'a, S: Surface> SurfaceCoordinate<'a, S> {
    fn mesh(&self) -> Option<&'a TriMesh<S::Vertex, S::TriangleData>> {
        self.surface.map(Surface::mesh)
    }

    /// Corner positions of the current triangle; all at the origin when free.
    pub fn triangle_vertices(&self) -> [Point3<Real>; 3] {
        match self.mesh() {
            Some(mesh) => mesh.triangle(self.triangle).v.map(|v| mesh.vertex(v).position()),
            None => [Point3::origin(); 3],
        }
    }

    /// Local basis `(du, dv, n)` of the current triangle.
    pub fn tangent_space(&self) -> TangentFrame {
        if self.is_free() {
            return TangentFrame::free();
        }
        TangentFrame::from_vertices(&self.triangle_vertices())
    }

    /// Remove the component of `v` along the current triangle normal.
    pub fn project_to_tangent_space(&self, v: &Vector3<Real>) -> Vector3<Real> {
        if self.is_free() {
            return *v;
        }
        self.tangent_space().project(v)
    }

    /// Barycentric coordinates of `position` in the current triangle.
    pub fn barycentric_position(&self) -> Vector3<Real> {
        let verts = self.triangle_vertices();
        Self::barycentric(&self.position, &self.tangent_space(), &verts[0])
    }

    /// Friction of the surface at this point; `1` when free.
    pub fn friction(&self) -> Real {
        match self.surface {
            Some(surface) => surface.friction(&self.position),
            None => 1.0,
        }
    }

    /// Move along the surface by `v`, parallel-transporting the direction across
    /// triangle edges.
    ///
    /// `v` is projected onto the tangent plane, then the point walks straight inside
    /// the current triangle until it either uses up the length of the projection or
    /// hits an edge. At an edge it hops into the neighbouring triangle, re-projects
    /// the remaining velocity onto the new plane and continues. When no neighbour
    /// exists (a boundary or non-manifold edge) the walk stops on the edge and the
    /// remaining length is discarded.
    ///
    /// Returns the final direction scaled by the length of the *initial* tangential
    /// velocity, regardless of how far the point actually travelled.
    ///
    /// A free coordinate simply moves by `v` and returns it.
    pub fn advect(&mut self, v: &Vector3<Real>) -> Vector3<Real> {
        let Some(mesh) = self.mesh() else {
            self.position += v;
            return *v;
        };

        let projected = self.project_to_tangent_space(v);
        let initial_mag = projected.norm();
        let Some(mut v_dir) = projected.try_normalize(ADVECT_EPSILON) else {
            return projected;
        };
        let mut v_mag = initial_mag;

        let mut steps = 0;
        while v_mag > ADVECT_EPSILON {
            if steps == MAX_ADVECT_STEPS {
                warn!(
                    triangle = self.triangle,
                    remaining = v_mag,
                    "advection step budget exhausted"
                );
                break;
            }
            steps += 1;

            let tri = *mesh.triangle(self.triangle);
            let verts = self.triangle_vertices();
            let frame = TangentFrame::from_vertices(&verts);

            // Transport the residual velocity into the current plane
            let residual = v_dir * v_mag;
            match frame.project(&residual).try_normalize(ADVECT_EPSILON) {
                Some(dir) => v_dir = dir,
                None => break,
            }
            let residual = v_dir * v_mag;

            let mu = Self::barycentric(&(self.position + residual), &frame, &verts[0]);
            let mut nu = Self::barycentric(&self.position, &frame, &verts[0]);
            let db = mu - nu;

            // First barycentric coordinate to reach zero along the segment
            let mut t: Real = 1.0;
            let mut crossed = None;
            for i in 0..3 {
                if nu[i].abs() <= EDGE_NUDGE {
                    nu[i] += EDGE_NUDGE;
                }
                if db[i] < 0.0 && nu[i] + t * db[i] < -ADVECT_EPSILON {
                    crossed = Some(i);
                    t = (-nu[i] / db[i]).clamp(0.0, t);
                }
            }

            let b = nu + db * t;
            let next = verts[0] + frame.du * b[2] + frame.dv * b[1];
            v_mag = (v_mag - (next - self.position).norm()).max(0.0);
            self.position = next;

            let Some(edge) = crossed else {
                break;
            };

            // Edge opposite corner `edge` runs from e[1] to e[2]
            let e = [tri.v[edge], tri.v[(edge + 1) % 3], tri.v[(edge + 2) % 3]];
            match neighbor_across(mesh, self.triangle, e) {
                Some(next_triangle) => self.triangle = next_triangle,
                None => {
                    trace!(
                        triangle = self.triangle,
                        remaining = v_mag,
                        "advection stopped at a boundary edge"
                    );
                    break;
                },
            }
        }

        v_dir * initial_mag
    }
}

impl<S> SurfaceCoordinate<'_, S>
where
    S: Surface,
    S::Vertex: HasNormal,
{
    /// Barycentric blend of the current triangle's vertex normals; `+y` when free.
    pub fn interpolated_normal(&self) -> Vector3<Real> {
        let Some(mesh) = self.mesh() else {
            return Vector3::y();
        };
        let verts = self.triangle_vertices();
        let frame = TangentFrame::from_vertices(&verts);
        let mu = Self::barycentric(&self.position, &frame, &verts[0]);
        let tri = mesh.triangle(self.triangle);
        let blended = (0..3)
            .map(|k| mesh.vertex(tri.v[k]).normal() * mu[k])
            .sum::<Vector3<Real>>();
        blended.try_normalize(Real::EPSILON).unwrap_or(frame.n)
    }
}

/// The triangle other than `current` that contains `e[1]` and `e[2]` but not `e[0]`.
fn neighbor_across<V, T>(mesh: &TriMesh<V, T>, current: usize, e: [usize; 3]) -> Option<usize> {
    mesh.vertex_incidence(e[1]).iter().copied().find(|&t| {
        let tri = mesh.triangle(t);
        t != current && tri.contains(e[2]) && !tri.contains(e[0])
    })
}
