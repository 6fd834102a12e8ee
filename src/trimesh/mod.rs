//! `TriMesh`: a garbage-collected indexed triangle mesh with vertex incidence.
//!
//! Vertices and triangles are addressed by dense integer *names* (indices into the
//! backing arrays). Removal is soft: the entry is marked dead, detached from the
//! incidence lists and its slot is recycled by the next insertion (LIFO). Dead
//! entries are only erased by [`TriMesh::garbage_collect`], which compacts the arrays
//! and **renumbers** live entries. Every name held outside the mesh is invalid after
//! a garbage collection; this includes the triangle of any stored
//! [`SurfaceCoordinate`](crate::surface::SurfaceCoordinate).
//!
//! Dereferencing a dead or out-of-range name is a programming error. Debug builds
//! catch it with assertions, release builds do not check.

use crate::errors::MeshError;
use tracing::debug;

mod triangle;

pub use triangle::Triangle;

/// Names of the triangles incident to a vertex. Unordered.
pub type IncidenceList = Vec<usize>;

/// Indexed triangle mesh.
///
/// - `V` is the vertex payload (position, normal, color, ...).
/// - `T` is an optional per-triangle payload, `()` by default.
#[derive(Debug, Clone)]
pub struct TriMesh<V, T = ()> {
    dead_tris: Vec<usize>,
    tri_data: Vec<Triangle>,
    tri_payload: Vec<T>,
    tri_alive: Vec<bool>,

    dead_verts: Vec<usize>,
    vert_data: Vec<V>,
    vert_alive: Vec<bool>,
    incidence: Vec<IncidenceList>,
}

impl<V, T> Default for TriMesh<V, T> {
    fn default() -> Self {
        TriMesh {
            dead_tris: Vec::new(),
            tri_data: Vec::new(),
            tri_payload: Vec::new(),
            tri_alive: Vec::new(),
            dead_verts: Vec::new(),
            vert_data: Vec::new(),
            vert_alive: Vec::new(),
            incidence: Vec::new(),
        }
    }
}

/// Flat vertex and index buffers, three indices per triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers<'a, V> {
    pub vertices: &'a [V],
    pub indices: Vec<u32>,
}

impl<V, T> TriMesh<V, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocate room for `nv` vertices and `nt` triangles.
    pub fn reserve(&mut self, nv: usize, nt: usize) {
        self.tri_data.reserve(nt);
        self.tri_payload.reserve(nt);
        self.tri_alive.reserve(nt);
        self.vert_data.reserve(nv);
        self.vert_alive.reserve(nv);
        self.incidence.reserve(nv);
    }

    /// Exchange the contents of two meshes.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Remove every vertex and triangle.
    pub fn clear(&mut self) {
        self.dead_tris.clear();
        self.tri_data.clear();
        self.tri_payload.clear();
        self.tri_alive.clear();
        self.dead_verts.clear();
        self.vert_data.clear();
        self.vert_alive.clear();
        self.incidence.clear();
    }

    /// The vertex triple of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> &Triangle {
        debug_assert!(self.tri_alive[t], "triangle {t} is dead");
        &self.tri_data[t]
    }

    /// The payload of triangle `t`.
    #[inline]
    pub fn triangle_data(&self, t: usize) -> &T {
        debug_assert!(self.tri_alive[t], "triangle {t} is dead");
        &self.tri_payload[t]
    }

    #[inline]
    pub fn triangle_data_mut(&mut self, t: usize) -> &mut T {
        debug_assert!(self.tri_alive[t], "triangle {t} is dead");
        &mut self.tri_payload[t]
    }

    /// Backing triangle storage, dead entries included.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.tri_data
    }

    /// The payload of vertex `v`.
    #[inline]
    pub fn vertex(&self, v: usize) -> &V {
        debug_assert!(self.vert_alive[v], "vertex {v} is dead");
        &self.vert_data[v]
    }

    #[inline]
    pub fn vertex_mut(&mut self, v: usize) -> &mut V {
        debug_assert!(self.vert_alive[v], "vertex {v} is dead");
        &mut self.vert_data[v]
    }

    /// Backing vertex storage, dead entries included.
    #[inline]
    pub fn vertices(&self) -> &[V] {
        &self.vert_data
    }

    /// Names of the triangles incident to vertex `v`.
    #[inline]
    pub fn vertex_incidence(&self, v: usize) -> &[usize] {
        debug_assert!(self.vert_alive[v], "vertex {v} is dead");
        &self.incidence[v]
    }

    #[inline]
    pub fn is_vertex_alive(&self, v: usize) -> bool {
        self.vert_alive.get(v).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_triangle_alive(&self, t: usize) -> bool {
        self.tri_alive.get(t).copied().unwrap_or(false)
    }

    /// Names of all live vertices, ascending.
    pub fn vertex_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.vert_alive
            .iter()
            .enumerate()
            .filter_map(|(v, &alive)| alive.then_some(v))
    }

    /// Names of all live triangles, ascending.
    pub fn triangle_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.tri_alive
            .iter()
            .enumerate()
            .filter_map(|(t, &alive)| alive.then_some(t))
    }

    pub fn live_vertex_count(&self) -> usize {
        self.vert_alive.iter().filter(|&&alive| alive).count()
    }

    pub fn live_triangle_count(&self) -> usize {
        self.tri_alive.iter().filter(|&&alive| alive).count()
    }

    /// True when no dead entries are waiting for garbage collection.
    #[inline]
    pub fn is_compact(&self) -> bool {
        self.dead_verts.is_empty() && self.dead_tris.is_empty()
    }

    /// Create a vertex, reusing the most recently freed slot if there is one.
    pub fn add_vertex(&mut self, data: V) -> usize {
        if let Some(n) = self.dead_verts.pop() {
            self.incidence[n].clear();
            self.vert_data[n] = data;
            self.vert_alive[n] = true;
            n
        } else {
            self.incidence.push(IncidenceList::new());
            self.vert_data.push(data);
            self.vert_alive.push(true);
            self.vert_data.len() - 1
        }
    }

    /// Create a triangle carrying `data`. The corners are not checked for
    /// distinctness.
    pub fn add_triangle_with(&mut self, tri: Triangle, data: T) -> usize {
        let n = if let Some(n) = self.dead_tris.pop() {
            self.tri_data[n] = tri;
            self.tri_payload[n] = data;
            self.tri_alive[n] = true;
            n
        } else {
            self.tri_data.push(tri);
            self.tri_payload.push(data);
            self.tri_alive.push(true);
            self.tri_data.len() - 1
        };
        for &v in &tri.v {
            debug_assert!(self.vert_alive[v], "triangle {n} references dead vertex {v}");
            self.incidence[v].push(n);
        }
        n
    }

    /// Remove vertex `n` together with every triangle incident to it.
    ///
    /// The name stays reserved until it is recycled by [`TriMesh::add_vertex`] or
    /// erased by [`TriMesh::garbage_collect`].
    pub fn remove_vertex(&mut self, n: usize) {
        debug_assert!(self.vert_alive[n], "vertex {n} removed twice");
        let incident = std::mem::take(&mut self.incidence[n]);
        for &t in incident.iter().rev() {
            // a degenerate triangle is listed once per corner
            if self.tri_alive[t] {
                self.remove_triangle(t);
            }
        }
        self.vert_alive[n] = false;
        self.dead_verts.push(n);
    }

    /// Remove triangle `n`, detaching it from its three vertices.
    pub fn remove_triangle(&mut self, n: usize) {
        debug_assert!(self.tri_alive[n], "triangle {n} removed twice");
        let tri = self.tri_data[n];
        for &v in &tri.v {
            let list = &mut self.incidence[v];
            if let Some(j) = list.iter().position(|&t| t == n) {
                list.swap_remove(j);
            }
        }
        self.tri_alive[n] = false;
        self.dead_tris.push(n);
    }

    /// Erase dead vertices and triangles, compacting the backing arrays.
    ///
    /// Live entries from the end of each array are moved into the holes left by dead
    /// ones, so **names change**: no vertex or triangle name obtained before this call
    /// may be used after it. With `cleanup_orphan_vertices`, vertices without incident
    /// triangles are removed first.
    pub fn garbage_collect(&mut self, cleanup_orphan_vertices: bool) {
        if cleanup_orphan_vertices {
            for v in (0..self.vert_data.len()).rev() {
                if self.vert_alive[v] && self.incidence[v].is_empty() {
                    self.remove_vertex(v);
                }
            }
        }

        let dead_verts = self.dead_verts.len();
        let dead_tris = self.dead_tris.len();
        if dead_verts == 0 && dead_tris == 0 {
            return;
        }

        let moved_verts = self.compact_vertices();
        let moved_tris = self.compact_triangles();
        debug!(
            dead_verts,
            dead_tris,
            moved_verts,
            moved_tris,
            vertices = self.vert_data.len(),
            triangles = self.tri_data.len(),
            "garbage collected mesh"
        );
    }

    fn compact_vertices(&mut self) -> usize {
        let mut dead = std::mem::take(&mut self.dead_verts);
        if dead.is_empty() {
            return 0;
        }
        dead.sort_unstable();
        dead.dedup();

        let mut end = self.vert_data.len();
        let (mut lo, mut hi) = (0, dead.len());
        let mut moved = 0;
        while lo < hi {
            // trailing dead slots are simply cut off
            if dead[hi - 1] + 1 == end {
                end -= 1;
                hi -= 1;
                continue;
            }
            let hole = dead[lo];
            let from = end - 1;
            for &t in &self.incidence[from] {
                self.tri_data[t].replace(from, hole);
            }
            self.vert_data.swap(hole, from);
            self.vert_alive.swap(hole, from);
            self.incidence.swap(hole, from);
            end -= 1;
            lo += 1;
            moved += 1;
        }

        self.vert_data.truncate(end);
        self.vert_alive.truncate(end);
        self.incidence.truncate(end);
        moved
    }

    fn compact_triangles(&mut self) -> usize {
        let mut dead = std::mem::take(&mut self.dead_tris);
        if dead.is_empty() {
            return 0;
        }
        dead.sort_unstable();
        dead.dedup();

        let mut end = self.tri_data.len();
        let (mut lo, mut hi) = (0, dead.len());
        let mut moved = 0;
        while lo < hi {
            if dead[hi - 1] + 1 == end {
                end -= 1;
                hi -= 1;
                continue;
            }
            let hole = dead[lo];
            let from = end - 1;
            for &v in &self.tri_data[from].v {
                for t in self.incidence[v].iter_mut() {
                    if *t == from {
                        *t = hole;
                    }
                }
            }
            self.tri_data.swap(hole, from);
            self.tri_payload.swap(hole, from);
            self.tri_alive.swap(hole, from);
            end -= 1;
            lo += 1;
            moved += 1;
        }

        self.tri_data.truncate(end);
        self.tri_payload.truncate(end);
        self.tri_alive.truncate(end);
        moved
    }

    /// Vertex and index buffers for upload to a renderer.
    ///
    /// Only meaningful directly after [`TriMesh::garbage_collect`]; any later
    /// mutation invalidates the buffers.
    pub fn buffers(&self) -> MeshBuffers<'_, V> {
        debug_assert!(
            self.is_compact(),
            "garbage_collect must run before exporting buffers"
        );
        let indices = self
            .tri_data
            .iter()
            .flat_map(|tri| tri.v.iter().map(|&v| v as u32))
            .collect();
        MeshBuffers {
            vertices: &self.vert_data,
            indices,
        }
    }

    /// Check the incidence invariant: every live triangle names live vertices, and
    /// every vertex lists exactly the live triangles that reference it.
    pub fn validate(&self) -> Result<(), MeshError> {
        for (t, tri) in self.tri_data.iter().enumerate() {
            if !self.tri_alive[t] {
                continue;
            }
            for &v in &tri.v {
                if !self.is_vertex_alive(v) {
                    return Err(MeshError::DanglingVertex {
                        triangle: t,
                        vertex: v,
                    });
                }
            }
            for &v in &tri.v {
                let expected = tri.v.iter().filter(|&&x| x == v).count();
                let listed = self.incidence[v].iter().filter(|&&x| x == t).count();
                if listed != expected {
                    return Err(MeshError::IncidenceMismatch {
                        vertex: v,
                        triangle: t,
                        listed,
                        expected,
                    });
                }
            }
        }

        for (v, list) in self.incidence.iter().enumerate() {
            if !self.vert_alive[v] {
                if !list.is_empty() {
                    return Err(MeshError::DeadVertexIncidence(v));
                }
                continue;
            }
            for &t in list {
                if !self.is_triangle_alive(t) || !self.tri_data[t].contains(v) {
                    return Err(MeshError::StaleIncidence { vertex: v, triangle: t });
                }
            }
        }
        Ok(())
    }
}

impl<V, T: Default> TriMesh<V, T> {
    /// Create a triangle with a default payload.
    #[inline]
    pub fn add_triangle(&mut self, v0: usize, v1: usize, v2: usize) -> usize {
        self.add_triangle_with(Triangle::new(v0, v1, v2), T::default())
    }

    /// Build a mesh from a vertex list and index triples.
    pub fn from_indexed<I>(vertices: Vec<V>, triangles: I) -> Self
    where
        I: IntoIterator<Item = [usize; 3]>,
    {
        let mut mesh = TriMesh::new();
        let triangles = triangles.into_iter();
        mesh.reserve(vertices.len(), triangles.size_hint().0);
        for v in vertices {
            mesh.add_vertex(v);
        }
        for [a, b, c] in triangles {
            mesh.add_triangle(a, b, c);
        }
        mesh
    }
}
