//! Geodesic advection tests

mod support;

use isosolid::{
    SurfaceCoordinate, TriMesh, Vertex,
    algorithm::estimate_normals,
    float_types::Real,
};
use nalgebra::{Point3, Vector3};
use support::unit_square;

/// Inside one flat triangle the point moves by exactly the tangential velocity
#[test]
fn test_flat_advection_moves_exactly() {
    let mesh = unit_square();
    let mut coord = SurfaceCoordinate::new(0, Point3::new(0.2, 0.2, 0.0), &mesh);

    let out = coord.advect(&Vector3::new(0.1, 0.05, 0.3));

    assert!((out - Vector3::new(0.1, 0.05, 0.0)).norm() < 1e-9);
    assert!((coord.position - Point3::new(0.3, 0.25, 0.0)).norm() < 1e-9);
    assert_eq!(coord.triangle, 0);
}

/// Crossing the shared diagonal lands in the second triangle
#[test]
fn test_advection_crosses_shared_edge() {
    let mesh = unit_square();
    let start = Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0);
    let mut coord = SurfaceCoordinate::new(0, start, &mesh);

    let v = Vector3::new(0.5, 0.5, 0.0);
    let out = coord.advect(&v);

    assert_eq!(coord.triangle, 1);
    assert!((coord.position - (start + v)).norm() < 1e-5);
    assert!((out.norm() - v.norm()).abs() < 1e-9);

    println!("✓ Advection hops across the shared edge");
}

/// A boundary edge stops the walk, but the returned magnitude is the initial one
#[test]
fn test_advection_stops_at_boundary() {
    let mesh = unit_square();
    let mut coord = SurfaceCoordinate::new(0, Point3::new(0.2, 0.2, 0.0), &mesh);

    let out = coord.advect(&Vector3::new(-1.0, 0.0, 0.0));

    assert_eq!(coord.triangle, 0);
    assert!(coord.position.x.abs() < 1e-5);
    assert!((coord.position.y - 0.2).abs() < 1e-5);
    assert!((out - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-9);
}

/// Over a fold the direction is transported into the new plane
#[test]
fn test_advection_over_fold() {
    let mesh: TriMesh<Point3<Real>> = TriMesh::from_indexed(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
        ],
        [[0, 1, 2], [1, 3, 2]],
    );
    let mut coord = SurfaceCoordinate::new(0, Point3::new(0.2, 0.2, 0.0), &mesh);

    let v = Vector3::new(0.5, 0.5, 0.0);
    let out = coord.advect(&v);

    assert_eq!(coord.triangle, 1);
    let p = coord.position;
    assert!(p.z > 0.1, "point should climb the fold, got {p:?}");
    assert!((p.x + p.y - p.z - 1.0).abs() < 1e-5, "point left the second plane");
    assert!((out.norm() - v.norm()).abs() < 1e-9);

    let frame = coord.tangent_space();
    assert!(out.dot(&frame.n).abs() < 1e-9, "returned velocity must be tangent");
}

/// Interpolated normals blend vertex normals; free coordinates face +y
#[test]
fn test_interpolated_normal() {
    let mesh = unit_square();
    let coord = SurfaceCoordinate::new(1, Point3::new(0.7, 0.6, 0.0), &mesh);
    assert!((coord.interpolated_normal() - Vector3::z()).norm() < 1e-9);

    let free = SurfaceCoordinate::<TriMesh<Vertex>>::free(Point3::origin());
    assert_eq!(free.interpolated_normal(), Vector3::y());
}

/// Tangent frame of a triangle and of free space
#[test]
fn test_tangent_space() {
    let mesh = unit_square();
    let coord = SurfaceCoordinate::new(0, Point3::new(0.2, 0.2, 0.0), &mesh);
    let frame = coord.tangent_space();
    assert_eq!(frame.du, Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(frame.dv, Vector3::new(1.0, 0.0, 0.0));
    assert!((frame.n - Vector3::z()).norm() < 1e-12);
    assert_eq!(coord.friction(), 1.0);

    let free = SurfaceCoordinate::<TriMesh<Vertex>>::free(Point3::origin());
    let frame = free.tangent_space();
    assert_eq!((frame.du, frame.dv, frame.n), (Vector3::x(), Vector3::z(), Vector3::y()));
}

/// Many small steps around a closed surface never leave it
#[test]
fn test_long_walk_on_sphere_stays_on_surface() {
    let mesh = support::sphere_mesh(1.0, 16);
    let start = mesh.triangle_ids().next().expect("non-empty mesh");
    let corners = mesh.triangle(start).v.map(|v| mesh.vertex(v).position.coords);
    let centroid = Point3::from((corners[0] + corners[1] + corners[2]) / 3.0);
    let mut coord = SurfaceCoordinate::new(start, centroid, &mesh);

    let mut v = Vector3::new(0.05, 0.02, 0.03);
    for _ in 0..200 {
        v = coord.advect(&v);
        let r = coord.position.coords.norm();
        assert!((r - 1.0).abs() < 0.25, "walked off the sphere to radius {r}");
        assert!(mesh.is_triangle_alive(coord.triangle));
        let b = coord.barycentric_position();
        assert!(b.min() >= -1e-9, "position left triangle {}: {b:?}", coord.triangle);
    }
}

/// Face normals and blended vertex normals agree on an extracted sphere
#[test]
fn test_frame_normal_agrees_with_vertex_normals() {
    let mut mesh = support::sphere_mesh(1.0, 24);
    estimate_normals(&mut mesh);

    let mut aligned = 0usize;
    let mut opposed = 0usize;
    let mut inward = 0usize;
    for t in mesh.triangle_ids() {
        let corners = mesh.triangle(t).v.map(|v| mesh.vertex(v).position.coords);
        let centroid = Point3::from((corners[0] + corners[1] + corners[2]) / 3.0);
        let coord = SurfaceCoordinate::new(t, centroid, &mesh);
        let n = coord.tangent_space().n;
        let d = n.dot(&coord.interpolated_normal());
        if d > 0.0 {
            aligned += 1;
        } else if d < 0.0 {
            opposed += 1;
        }
        if n.dot(&centroid.coords) < 0.0 {
            inward += 1;
        }
    }
    assert!(opposed * 20 < aligned, "{opposed} opposed against {aligned} aligned");
    assert!(inward * 20 < aligned, "{inward} face normals point into the sphere");

    println!("✓ Tangent frames face outward");
}

/// Without vertex normals the face normal is used
#[test]
fn test_interpolated_normal_falls_back_to_face() {
    let mesh: TriMesh<Vertex> = TriMesh::from_indexed(
        vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::zeros()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::zeros()),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::zeros()),
        ],
        [[0, 1, 2]],
    );
    let coord = SurfaceCoordinate::new(0, Point3::new(0.25, 0.25, 0.0), &mesh);
    assert!((coord.interpolated_normal() - Vector3::z()).norm() < 1e-12);
}
