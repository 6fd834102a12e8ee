//! Manifold validation and topology analysis for `TriMesh`

use crate::float_types::Real;
use crate::trimesh::TriMesh;
use crate::vertex::HasPosition;
use hashbrown::HashMap;

/// **Mathematical Foundation: Edge-Manifold Topology of a Triangle Mesh**
///
/// ## **Properties Reported**
/// 1. **Edge Manifold**: each edge shared by exactly 2 triangles
/// 2. **Boundary Detection**: edges used by a single triangle
/// 3. **Orientation Consistency**: the two triangles on an edge traverse it in
///    opposite directions
/// 4. **Euler Characteristic**: χ = V - E + F over live entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifoldAnalysis {
    /// Number of boundary edges (0 for closed meshes)
    pub boundary_edges: usize,
    /// Number of non-manifold edges (shared by more than 2 triangles)
    pub non_manifold_edges: usize,
    /// Number of live vertices without triangles
    pub isolated_vertices: usize,
    /// Whether every manifold edge is traversed once in each direction
    pub consistent_orientation: bool,
    /// Euler characteristic (V - E + F)
    pub euler_characteristic: i64,
}

impl ManifoldAnalysis {
    /// Closed, edge-manifold and consistently oriented.
    pub const fn is_closed_manifold(&self) -> bool {
        self.boundary_edges == 0 && self.non_manifold_edges == 0 && self.consistent_orientation
    }
}

/// Number of live triangles using each undirected edge, keyed by `(min, max)`.
pub fn edge_triangle_counts<V, T>(mesh: &TriMesh<V, T>) -> HashMap<(usize, usize), usize> {
    let mut counts = HashMap::new();
    for t in mesh.triangle_ids() {
        for (a, b) in mesh.triangle(t).edges() {
            let edge = if a < b { (a, b) } else { (b, a) };
            *counts.entry(edge).or_insert(0) += 1;
        }
    }
    counts
}

/// Edge-manifold analysis of the live part of `mesh`.
pub fn analyze_manifold<V, T>(mesh: &TriMesh<V, T>) -> ManifoldAnalysis {
    // canonical edge -> (forward uses, backward uses)
    let mut directed: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    for t in mesh.triangle_ids() {
        for (a, b) in mesh.triangle(t).edges() {
            let entry = directed.entry((a.min(b), a.max(b))).or_insert((0, 0));
            if a < b {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }

    let mut boundary_edges = 0;
    let mut non_manifold_edges = 0;
    let mut consistent_orientation = true;
    for &(forward, backward) in directed.values() {
        match forward + backward {
            1 => boundary_edges += 1,
            2 => {
                if forward != 1 {
                    consistent_orientation = false;
                }
            },
            _ => non_manifold_edges += 1,
        }
    }

    let isolated_vertices = mesh
        .vertex_ids()
        .filter(|&v| mesh.vertex_incidence(v).is_empty())
        .count();

    let euler_characteristic = mesh.live_vertex_count() as i64 - directed.len() as i64
        + mesh.live_triangle_count() as i64;

    ManifoldAnalysis {
        boundary_edges,
        non_manifold_edges,
        isolated_vertices,
        consistent_orientation,
        euler_characteristic,
    }
}

/// Signed enclosed volume by the divergence theorem, Σ p0 · (p1 × p2) / 6.
///
/// Positive when triangle normals (right-hand winding) point outward.
pub fn signed_volume<V: HasPosition, T>(mesh: &TriMesh<V, T>) -> Real {
    mesh.triangle_ids()
        .map(|t| {
            let [a, b, c] = mesh.triangle(t).v;
            let p0 = mesh.vertex(a).position().coords;
            let p1 = mesh.vertex(b).position().coords;
            let p2 = mesh.vertex(c).position().coords;
            p0.dot(&p1.cross(&p2))
        })
        .sum::<Real>()
        / 6.0
}

/// Total area of the live triangles.
pub fn surface_area<V: HasPosition, T>(mesh: &TriMesh<V, T>) -> Real {
    mesh.triangle_ids()
        .map(|t| {
            let [a, b, c] = mesh.triangle(t).v;
            let p0 = mesh.vertex(a).position();
            let p1 = mesh.vertex(b).position();
            let p2 = mesh.vertex(c).position();
            (p1 - p0).cross(&(p2 - p0)).norm() * 0.5
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn tetrahedron() -> TriMesh<Point3<Real>> {
        TriMesh::from_indexed(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
    }

    #[test]
    fn tetrahedron_is_closed_with_positive_volume() {
        let mesh = tetrahedron();
        let analysis = analyze_manifold(&mesh);
        assert!(analysis.is_closed_manifold());
        assert_eq!(analysis.euler_characteristic, 2);
        assert!((signed_volume(&mesh) - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn removing_a_face_opens_three_edges() {
        let mut mesh = tetrahedron();
        mesh.remove_triangle(3);
        let analysis = analyze_manifold(&mesh);
        assert_eq!(analysis.boundary_edges, 3);
        assert!(analysis.consistent_orientation);
        assert!(!analysis.is_closed_manifold());
    }

    #[test]
    fn flipped_face_breaks_orientation() {
        let mut mesh = tetrahedron();
        mesh.remove_triangle(3);
        mesh.add_triangle(1, 3, 2);
        assert!(!analyze_manifold(&mesh).consistent_orientation);
    }
}
