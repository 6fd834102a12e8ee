//! Vertex welding and connected component tests

mod support;

use isosolid::{
    TriMesh, Vertex,
    algorithm::{analyze_manifold, connected_components, repair_mesh_vertices},
    float_types::Real,
    shapes,
};
use nalgebra::{Point3, Vector3};
use support::{positions, sphere_mesh};

fn vertex(x: Real, y: Real, z: Real) -> Vertex {
    Vertex::new(Point3::new(x, y, z), Vector3::zeros())
}

/// A triangle soup square collapses onto four shared vertices
#[test]
fn test_weld_square_soup() {
    let mut mesh = TriMesh::<Vertex>::from_indexed(
        vec![
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(0.0, 1.0, 0.0),
            vertex(1.0, 0.0, 1e-5),
            vertex(1.0, 1.0, 0.0),
            vertex(0.0, 1.0, 0.0),
        ],
        [[0, 1, 2], [3, 4, 2 + 3]],
    );

    let fused = repair_mesh_vertices(&mut mesh, 1e-3);
    assert_eq!(fused, 2);
    assert_eq!(mesh.vertices().len(), 4);
    assert_eq!(mesh.triangles().len(), 2);
    assert_eq!(mesh.validate(), Ok(()));
    assert_eq!(connected_components(&mesh).len(), 1);

    println!("✓ Welding joins the two halves of the square");
}

/// Triangles that collapse while welding are dropped
#[test]
fn test_weld_drops_collapsed_triangles() {
    let mut mesh = TriMesh::<Vertex>::from_indexed(
        vec![
            vertex(0.0, 0.0, 0.0),
            vertex(1e-6, 0.0, 0.0),
            vertex(0.0, 1.0, 0.0),
            vertex(1.0, 1.0, 0.0),
        ],
        [[0, 1, 2], [0, 3, 2]],
    );

    let fused = repair_mesh_vertices(&mut mesh, 1e-3);
    assert_eq!(fused, 1);
    assert_eq!(mesh.triangles().len(), 1);
    assert_eq!(mesh.vertices().len(), 3);
    assert_eq!(mesh.validate(), Ok(()));
}

/// Distant vertices are left alone
#[test]
fn test_weld_respects_tolerance() {
    // centre off the lattice so no sample sits exactly on the surface
    let field = shapes::sphere(Point3::new(0.013, 0.029, -0.017), 0.93);
    let mut mesh: TriMesh<Point3<Real>> = TriMesh::from_isocontour(
        field,
        |p: &Point3<Real>| *p,
        Point3::new(-2.0, -2.0, -2.0),
        Point3::new(2.0, 2.0, 2.0),
        [16, 16, 16],
    );
    let before = mesh.vertices().len();
    assert_eq!(repair_mesh_vertices(&mut mesh, 1e-4), 0);
    assert_eq!(mesh.vertices().len(), before);
}

/// Running the repair twice changes nothing the second time
#[test]
fn test_repair_idempotent() {
    let mut mesh = sphere_mesh(1.0, 24);
    repair_mesh_vertices(&mut mesh, 0.05);
    let vertices = positions(&mesh);
    let triangles = mesh.triangles().to_vec();

    assert_eq!(repair_mesh_vertices(&mut mesh, 0.05), 0);
    assert_eq!(positions(&mesh), vertices);
    assert_eq!(mesh.triangles(), triangles.as_slice());
    assert_eq!(mesh.validate(), Ok(()));
}

/// Two separate spheres split into two closed components covering the mesh
#[test]
fn test_components_of_two_spheres() {
    let left = shapes::sphere(Point3::new(-1.5, 0.0, 0.0), 0.7);
    let right = shapes::sphere(Point3::new(1.5, 0.0, 0.0), 0.7);
    let mut mesh: TriMesh<Point3<Real>> = TriMesh::from_isocontour(
        |p: &Point3<Real>| left(p).min(right(p)),
        |p: &Point3<Real>| *p,
        Point3::new(-3.0, -1.5, -1.5),
        Point3::new(3.0, 1.5, 1.5),
        [48, 24, 24],
    );
    let lonely = mesh.add_vertex(Point3::new(0.0, 0.0, 10.0));

    let parts = connected_components(&mesh);
    assert_eq!(parts.len(), 3);

    let vertex_total: usize = parts.iter().map(|m| m.live_vertex_count()).sum();
    let triangle_total: usize = parts.iter().map(|m| m.live_triangle_count()).sum();
    assert_eq!(vertex_total, mesh.live_vertex_count());
    assert_eq!(triangle_total, mesh.live_triangle_count());

    let isolated: Vec<_> = parts.iter().filter(|m| m.live_triangle_count() == 0).collect();
    assert_eq!(isolated.len(), 1);
    assert_eq!(*isolated[0].vertex(0), *mesh.vertex(lonely));

    for part in parts.iter().filter(|m| m.live_triangle_count() > 0) {
        assert!(analyze_manifold(part).is_closed_manifold());
        assert_eq!(part.validate(), Ok(()));
        let side = part.vertex(0).x.signum();
        assert!(part.vertices().iter().all(|p| p.x.signum() == side));
    }
}

/// Removed entries are not copied into components
#[test]
fn test_components_skip_dead_entries() {
    let mut mesh = TriMesh::<Vertex>::from_indexed(
        vec![
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(0.0, 1.0, 0.0),
            vertex(1.0, 1.0, 0.0),
        ],
        [[0, 1, 2], [1, 3, 2]],
    );
    mesh.remove_vertex(3);

    let parts = connected_components(&mesh);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].vertices().len(), 3);
    assert_eq!(parts[0].triangles().len(), 1);
}
