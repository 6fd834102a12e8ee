use super::IoError;
use crate::trimesh::TriMesh;
use crate::vertex::HasPosition;
use std::io::Write;

/// Write `mesh` as an ASCII PLY file: positions only, one `3 i j k` line per face.
///
/// The output is standard PLY: the header ends with `end_header` and every face
/// line carries its vertex count, so common readers load it as is.
///
/// The mesh must be compact (see
/// [`TriMesh::garbage_collect`](crate::trimesh::TriMesh::garbage_collect)) so that
/// array indices and face indices agree.
///
/// ```rust
/// # use isosolid::{io::write_ply_ascii, trimesh::TriMesh, float_types::Real};
/// # use nalgebra::Point3;
/// let mesh: TriMesh<Point3<Real>> = TriMesh::from_indexed(
///     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
///     [[0, 1, 2]],
/// );
/// let mut out = Vec::new();
/// write_ply_ascii(&mut out, &mesh).unwrap();
/// assert!(String::from_utf8(out).unwrap().ends_with("3 0 1 2\n"));
/// ```
pub fn write_ply_ascii<W, V, T>(out: &mut W, mesh: &TriMesh<V, T>) -> Result<(), IoError>
where
    W: Write,
    V: HasPosition,
{
    if !mesh.is_compact() {
        return Err(IoError::NotCompact {
            dead_vertices: mesh.vertices().len() - mesh.live_vertex_count(),
            dead_triangles: mesh.triangles().len() - mesh.live_triangle_count(),
        });
    }
    let vertex_count = mesh.vertices().len();
    if u32::try_from(vertex_count).is_err() {
        return Err(IoError::TooManyVertices(vertex_count));
    }

    writeln!(out, "ply")?;
    writeln!(out, "format ascii 1.0")?;
    writeln!(out, "element vertex {vertex_count}")?;
    writeln!(out, "property float x")?;
    writeln!(out, "property float y")?;
    writeln!(out, "property float z")?;
    writeln!(out, "element face {}", mesh.triangles().len())?;
    writeln!(out, "property list uchar int vertex_index")?;
    writeln!(out, "end_header")?;

    for vertex in mesh.vertices() {
        let p = vertex.position();
        writeln!(out, "{:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
    }
    for tri in mesh.triangles() {
        let [a, b, c] = tri.v;
        writeln!(out, "3 {a} {b} {c}")?;
    }
    Ok(())
}

impl<V: HasPosition, T> TriMesh<V, T> {
    /// The mesh as an ASCII PLY string. See [`write_ply_ascii`].
    pub fn to_ply_ascii(&self) -> Result<String, IoError> {
        let mut out = Vec::new();
        write_ply_ascii(&mut out, self)?;
        // every byte written above comes from ASCII formatting
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
