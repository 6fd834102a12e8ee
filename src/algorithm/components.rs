//! Splitting a mesh into its connected components.

use crate::trimesh::{Triangle, TriMesh};
use tracing::debug;

/// Split `mesh` into one mesh per connected component.
///
/// Two triangles belong to the same component when they are joined by a chain of
/// shared vertices. Vertex and triangle payloads are copied; names are renumbered
/// locally in each output mesh. A live vertex without triangles becomes a component
/// of its own. Components are produced in order of their lowest vertex name.
pub fn connected_components<V, T>(mesh: &TriMesh<V, T>) -> Vec<TriMesh<V, T>>
where
    V: Clone,
    T: Clone,
{
    let nv = mesh.vertices().len();
    let nt = mesh.triangles().len();
    let mut visited_v: Vec<Option<usize>> = vec![None; nv];
    let mut visited_t: Vec<Option<usize>> = vec![None; nt];
    let mut to_visit = Vec::new();
    let mut result = Vec::new();

    for i in mesh.vertex_ids() {
        if visited_v[i].is_some() {
            continue;
        }

        let mut component = TriMesh::new();
        visited_v[i] = Some(component.add_vertex(mesh.vertex(i).clone()));
        to_visit.push(i);

        while let Some(v) = to_visit.pop() {
            for &t in mesh.vertex_incidence(v).iter().rev() {
                if visited_t[t].is_some() {
                    continue;
                }

                let tri = mesh.triangle(t);
                let mut local = [0usize; 3];
                for (k, &u) in tri.v.iter().enumerate() {
                    local[k] = match visited_v[u] {
                        Some(name) => name,
                        None => {
                            let name = component.add_vertex(mesh.vertex(u).clone());
                            visited_v[u] = Some(name);
                            to_visit.push(u);
                            name
                        },
                    };
                }
                visited_t[t] = Some(component.add_triangle_with(
                    Triangle::from(local),
                    mesh.triangle_data(t).clone(),
                ));
            }
        }

        result.push(component);
    }

    debug!(components = result.len(), "split mesh into connected components");
    result
}
