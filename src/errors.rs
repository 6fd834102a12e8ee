//! Validation and construction errors

use crate::float_types::Real;
use nalgebra::Point3;

/// Violations of the triangle mesh incidence invariant, as reported by
/// [`TriMesh::validate`](crate::trimesh::TriMesh::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// (DanglingVertex) A live triangle references a dead or out-of-range vertex
    #[error("(DanglingVertex) triangle {triangle} references dead or missing vertex {vertex}")]
    DanglingVertex { triangle: usize, vertex: usize },
    /// (StaleIncidence) An incidence list names a triangle that is dead or does not use
    /// the vertex
    #[error("(StaleIncidence) vertex {vertex} lists triangle {triangle}, which does not use it")]
    StaleIncidence { vertex: usize, triangle: usize },
    /// (IncidenceMismatch) The multiplicity of a triangle in an incidence list is wrong
    #[error(
        "(IncidenceMismatch) vertex {vertex} lists triangle {triangle} {listed} time(s), \
         expected {expected}"
    )]
    IncidenceMismatch {
        vertex: usize,
        triangle: usize,
        listed: usize,
        expected: usize,
    },
    /// (DeadVertexIncidence) A dead vertex still has incident triangles
    #[error("(DeadVertexIncidence) dead vertex {0} still has incident triangles")]
    DeadVertexIncidence(usize),
}

/// Errors raised while setting up a [`Solid`](crate::solid::Solid).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolidError {
    /// (InvalidResolution) Every axis needs at least two samples
    #[error("(InvalidResolution) resolution {0:?} must be at least 2 along every axis")]
    InvalidResolution([usize; 3]),
    /// (InvalidBounds) The upper corner must exceed the lower corner on every axis
    #[error("(InvalidBounds) upper bound {upper} must exceed lower bound {lower} on every axis")]
    InvalidBounds {
        lower: Point3<Real>,
        upper: Point3<Real>,
    },
}
