//! Vertex welding: fuse vertices that lie within a tolerance of each other.

use crate::float_types::Real;
use crate::spatial_grid::{GridKey, SpatialGrid};
use crate::trimesh::TriMesh;
use crate::vertex::HasPosition;
use nalgebra::Point3;
use tracing::debug;

#[inline]
fn bucket(p: &Point3<Real>, scale: Real) -> GridKey {
    let q = p.coords * scale;
    GridKey::new(q.x.floor() as i32, q.y.floor() as i32, q.z.floor() as i32)
}

/// Fuse duplicate and near-duplicate vertices of `mesh`, returning how many were
/// removed.
///
/// Vertices are visited in reverse index order and bucketed on a grid of cell size
/// `tolerance / 2`, so a bucket holds at most one surviving vertex. For each vertex
/// the 27 surrounding buckets are searched; every occupant of those buckets closer
/// than `tolerance` is fused into the current vertex. Pairs two buckets apart are
/// not compared. A fused vertex has its triangles re-targeted onto the
/// survivor (triangles that already use the survivor would become degenerate and
/// are dropped), the duplicate is removed and its bucket cleared.
///
/// The mesh is garbage-collected before and after, so all names change. Running the
/// repair twice with the same tolerance is a no-op the second time.
pub fn repair_mesh_vertices<V, T>(mesh: &mut TriMesh<V, T>, tolerance: Real) -> usize
where
    V: HasPosition,
    T: Clone,
{
    mesh.garbage_collect(false);

    let scale = 2.0 / tolerance.max(Real::EPSILON);
    let mut vertex_hash: SpatialGrid<Option<usize>> = SpatialGrid::default();
    let mut fused = 0usize;
    let mut dropped_triangles = 0usize;

    for i in (0..mesh.vertices().len()).rev() {
        let pos = mesh.vertex(i).position();
        let key = bucket(&pos, scale);

        let mut overlaps = Vec::new();
        for x in -1..=1 {
            for y in -1..=1 {
                for z in -1..=1 {
                    let neighbor = GridKey::new(key.0[0] + x, key.0[1] + y, key.0[2] + z);
                    if let Some(&Some(v)) = vertex_hash.get(&neighbor) {
                        overlaps.push(v);
                    }
                }
            }
        }

        for &v in overlaps.iter().rev() {
            let vpos = mesh.vertex(v).position();
            if (pos - vpos).norm() > tolerance {
                continue;
            }

            let incident = mesh.vertex_incidence(v).to_vec();
            for &t in incident.iter().rev() {
                if !mesh.is_triangle_alive(t) {
                    continue;
                }
                let mut tri = *mesh.triangle(t);
                let data = mesh.triangle_data(t).clone();
                mesh.remove_triangle(t);
                tri.replace(v, i);
                if tri.is_degenerate() {
                    dropped_triangles += 1;
                    continue;
                }
                mesh.add_triangle_with(tri, data);
            }

            mesh.remove_vertex(v);
            vertex_hash.insert(bucket(&vpos, scale), None);
            fused += 1;
        }

        vertex_hash.insert(key, Some(i));
    }

    mesh.garbage_collect(false);
    debug!(
        fused,
        dropped_triangles,
        tolerance,
        vertices = mesh.vertices().len(),
        "repaired mesh vertices"
    );
    fused
}
