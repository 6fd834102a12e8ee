//! Points and particles constrained to a triangulated surface.

use crate::float_types::Real;
use crate::trimesh::TriMesh;
use crate::vertex::HasPosition;
use nalgebra::Point3;

pub mod coordinate;
pub mod particle;

pub use coordinate::{SurfaceCoordinate, TangentFrame};
pub use particle::SurfaceParticle;

/// Something a [`SurfaceCoordinate`] can walk on: a mesh plus a friction field.
pub trait Surface {
    type Vertex: HasPosition;
    type TriangleData;

    fn mesh(&self) -> &TriMesh<Self::Vertex, Self::TriangleData>;

    /// Friction at `position`, roughly the inverse of the seconds needed to stop.
    fn friction(&self, _position: &Point3<Real>) -> Real {
        1.0
    }
}

impl<V: HasPosition, T> Surface for TriMesh<V, T> {
    type Vertex = V;
    type TriangleData = T;

    #[inline]
    fn mesh(&self) -> &TriMesh<V, T> {
        self
    }
}
