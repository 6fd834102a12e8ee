//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use isosolid::{float_types::Real, shapes, trimesh::TriMesh, vertex::Vertex};
use nalgebra::{Point3, Vector3};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Sphere of radius `radius` at the origin, extracted over `[-2r, 2r]³`.
pub fn sphere_mesh(radius: Real, resolution: usize) -> TriMesh<Vertex> {
    let field = shapes::sphere(Point3::origin(), radius);
    let extent = 2.0 * radius;
    TriMesh::from_isocontour(
        field,
        |p: &Point3<Real>| Vertex::new(*p, Vector3::zeros()),
        Point3::new(-extent, -extent, -extent),
        Point3::new(extent, extent, extent),
        [resolution; 3],
    )
}

/// Two triangles sharing the diagonal of the unit square in the z = 0 plane:
/// `[0, 1, 2]` below the diagonal and `[1, 3, 2]` above it.
pub fn unit_square() -> TriMesh<Vertex> {
    let n = Vector3::z();
    TriMesh::from_indexed(
        vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0), n),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), n),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), n),
            Vertex::new(Point3::new(1.0, 1.0, 0.0), n),
        ],
        [[0, 1, 2], [1, 3, 2]],
    )
}

/// Every vertex position of a mesh, live or not.
pub fn positions(mesh: &TriMesh<Vertex>) -> Vec<Point3<Real>> {
    mesh.vertices().iter().map(|v| v.position).collect()
}
