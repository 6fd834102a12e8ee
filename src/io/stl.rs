use crate::float_types::Real;
use crate::trimesh::TriMesh;
use crate::vertex::HasPosition;
use nalgebra::{Point3, Vector3};
use std::io::Cursor;

/// Corner positions and right-hand facet normal of every live triangle.
fn facets<V: HasPosition, T>(
    mesh: &TriMesh<V, T>,
) -> impl Iterator<Item = (Vector3<Real>, [Point3<Real>; 3])> + '_ {
    mesh.triangle_ids().map(|t| {
        let corners = mesh.triangle(t).v.map(|v| mesh.vertex(v).position());
        let normal = (corners[1] - corners[0])
            .cross(&(corners[2] - corners[0]))
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        (normal, corners)
    })
}

/// Export to ASCII STL
/// Convert the live triangles of `mesh` to an **ASCII STL** string with the given `name`.
///
/// Facet normals are recomputed from the winding; dead entries are skipped, so the
/// mesh does not need to be compact.
///
/// ```rust
/// # use isosolid::{io::to_stl_ascii, trimesh::TriMesh, float_types::Real};
/// # use nalgebra::Point3;
/// let mesh: TriMesh<Point3<Real>> = TriMesh::from_indexed(
///     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
///     [[0, 1, 2]],
/// );
/// let text = to_stl_ascii(&mesh, "patch");
/// assert!(text.starts_with("solid patch\n"));
/// ```
pub fn to_stl_ascii<V: HasPosition, T>(mesh: &TriMesh<V, T>, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    for (n, corners) in facets(mesh) {
        out.push_str(&format!(
            "  facet normal {:.6} {:.6} {:.6}\n",
            n.x, n.y, n.z
        ));
        out.push_str("    outer loop\n");
        for p in &corners {
            out.push_str(&format!(
                "      vertex {:.6} {:.6} {:.6}\n",
                p.x, p.y, p.z
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// Convert the live triangles of `mesh` to a **binary STL** byte vector.
pub fn to_stl_binary<V: HasPosition, T>(mesh: &TriMesh<V, T>) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    #[allow(clippy::unnecessary_cast)]
    let triangles: Vec<Triangle> = facets(mesh)
        .map(|(n, corners)| Triangle {
            normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
            vertices: corners.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
        })
        .collect();

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

impl<V: HasPosition, T> TriMesh<V, T> {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }
    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}
