//! Vertex normal estimation from incident faces.

use crate::float_types::Real;
use crate::trimesh::TriMesh;
use crate::vertex::{HasNormal, HasPosition};
use nalgebra::Vector3;

/// Recompute every vertex normal as the normalized sum, over incident triangles, of
/// the cross product of the two unit edges leaving the vertex.
///
/// Orientation follows the right-hand winding of each triangle, so meshes produced
/// by [`isocontour`](super::isocontour) get normals pointing toward increasing
/// density (outward for negative-inside fields). Vertices without triangles get a
/// zero normal. The mesh is garbage-collected first.
pub fn estimate_normals<V, T>(mesh: &mut TriMesh<V, T>)
where
    V: HasPosition + HasNormal,
{
    mesh.garbage_collect(false);

    for i in (0..mesh.vertices().len()).rev() {
        let mut sum = Vector3::zeros();
        for &t in mesh.vertex_incidence(i) {
            let tri = mesh.triangle(t);
            let Some(corner) = tri.index_of(i) else {
                continue;
            };
            let p0 = mesh.vertex(tri.v[corner]).position();
            let p1 = mesh.vertex(tri.v[(corner + 1) % 3]).position();
            let p2 = mesh.vertex(tri.v[(corner + 2) % 3]).position();
            let (Some(e1), Some(e2)) = (
                (p1 - p0).try_normalize(Real::EPSILON),
                (p2 - p0).try_normalize(Real::EPSILON),
            ) else {
                continue;
            };
            sum += e1.cross(&e2);
        }
        let normal = sum.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros);
        mesh.vertex_mut(i).set_normal(normal);
    }
}
