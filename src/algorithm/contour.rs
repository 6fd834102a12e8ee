//! Isosurface extraction by dual contouring (surface nets) on a regular grid.

use crate::float_types::{Real, tolerance};
use crate::spatial_grid::{GridKey, SpatialGrid};
use crate::trimesh::{Triangle, TriMesh};
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// Stand-in for non-finite density samples: far outside.
const NON_FINITE_DENSITY: Real = 1e10;

/// A sign change of the density along one grid edge.
#[derive(Debug, Clone, Copy, PartialEq)]
struct EdgeCrossing {
    point: Point3<Real>,
    /// The density increases along the edge's axis.
    rising: bool,
}

/// **Mathematical Foundation: Dual Contouring of an Implicit Function**
///
/// Appends to `mesh` a triangulation of the zero level set of `density` inside the
/// box `[lo, hi]`, sampled with `resolution` cells per axis.
///
/// ## **Sign Convention**
/// Negative density is inside, positive is outside. Samples within the tolerance
/// band around zero ([`tolerance`]) count as inside, so every lattice point has a
/// definite side.
///
/// ## **Algorithm Overview**
/// 1. **Padding**: the lattice is grown by one cell on every side, so `density` is
///    evaluated slightly outside `[lo, hi]` and must be well defined there
/// 2. **Slab Sampling**: two rolling z-slabs hold the samples, each lattice point is
///    evaluated exactly once
/// 3. **Edge Crossings**: every axis edge whose endpoints lie on different sides gets
///    the linear root of the density along it
/// 4. **Dual Vertices**: every cell touching a crossing gets one vertex at the mean
///    of the crossings on its edges; `attr` turns that position into the payload
/// 5. **Quads**: each interior crossing connects the four cells around its edge with
///    two triangles, wound so the right-hand normal points toward increasing density
///
/// ## **Edge Cases**
/// - Non-finite samples are treated as far outside
/// - Crossings on the padded boundary never emit faces
/// - Resolution components of zero are raised to one
///
/// # Example
/// ```
/// # use isosolid::{algorithm::isocontour, trimesh::TriMesh, float_types::Real};
/// # use nalgebra::Point3;
/// let mut mesh: TriMesh<Point3<Real>> = TriMesh::new();
/// isocontour(
///     &mut mesh,
///     |p: &Point3<Real>| p.coords.norm() - 1.0,
///     |p: &Point3<Real>| *p,
///     Point3::new(-2.0, -2.0, -2.0),
///     Point3::new(2.0, 2.0, 2.0),
///     [16, 16, 16],
/// );
/// assert!(mesh.live_triangle_count() > 0);
/// ```
pub fn isocontour<V, T, F, A>(
    mesh: &mut TriMesh<V, T>,
    mut density: F,
    mut attr: A,
    lo: Point3<Real>,
    hi: Point3<Real>,
    resolution: [usize; 3],
) where
    T: Default,
    F: FnMut(&Point3<Real>) -> Real,
    A: FnMut(&Point3<Real>) -> V,
{
    let resolution = resolution.map(|r| r.max(1));
    let h = Vector3::new(
        (hi.x - lo.x) / resolution[0] as Real,
        (hi.y - lo.y) / resolution[1] as Real,
        (hi.z - lo.z) / resolution[2] as Real,
    );
    let origin = lo - h;
    let n = resolution.map(|r| r + 2);
    let lattice = |x: usize, y: usize, z: usize| {
        origin + Vector3::new(x as Real * h.x, y as Real * h.y, z as Real * h.z)
    };
    let iso_tolerance = tolerance();
    let inside = |value: Real| value <= iso_tolerance;
    let mut sample = |p: &Point3<Real>| {
        let value = density(p);
        if value.is_finite() { value } else { NON_FINITE_DENSITY }
    };

    let mut edges: [SpatialGrid<EdgeCrossing>; 3] = Default::default();
    let mut cells: SpatialGrid<usize> = SpatialGrid::default();

    // Rolling slabs indexed by x * stride + y
    let stride = n[1] + 1;
    let slab_len = (n[0] + 1) * stride;
    let mut below = vec![0.0 as Real; slab_len];
    let mut above = vec![0.0 as Real; slab_len];
    for x in 0..=n[0] {
        for y in 0..=n[1] {
            below[x * stride + y] = sample(&lattice(x, y, 0));
        }
    }

    for z in 0..n[2] {
        for x in 0..=n[0] {
            for y in 0..=n[1] {
                above[x * stride + y] = sample(&lattice(x, y, z + 1));
            }
        }

        for x in 0..n[0] {
            for y in 0..n[1] {
                let c = below[x * stride + y];
                let ends = [
                    below[(x + 1) * stride + y],
                    below[x * stride + y + 1],
                    above[x * stride + y],
                ];
                let key = GridKey::new(x as i32, y as i32, z as i32);

                for (axis, &e) in ends.iter().enumerate() {
                    if inside(c) == inside(e) {
                        continue;
                    }

                    let t = (c / (c - e)).clamp(0.0, 1.0);
                    let mut point = lattice(x, y, z);
                    point[axis] += t * h[axis];
                    edges[axis].insert(key, EdgeCrossing { point, rising: c < e });

                    // The (up to) four cells sharing this edge
                    let (u_dir, v_dir) = ((axis + 1) % 3, (axis + 2) % 3);
                    for u in 0..=1 {
                        if key.0[u_dir] - u < 0 {
                            continue;
                        }
                        for v in 0..=1 {
                            if key.0[v_dir] - v < 0 {
                                continue;
                            }
                            cells.insert(key.offset(u_dir, -u).offset(v_dir, -v), usize::MAX);
                        }
                    }
                }
            }
        }

        std::mem::swap(&mut below, &mut above);
    }

    // One vertex per marked cell, at the centroid of its edge crossings
    mesh.reserve(cells.len(), 2 * (edges[0].len() + edges[1].len() + edges[2].len()));
    for (cell, name) in cells.iter_mut() {
        let mut center = Vector3::zeros();
        let mut count = 0usize;
        for (axis, grid) in edges.iter().enumerate() {
            let (u_dir, v_dir) = ((axis + 1) % 3, (axis + 2) % 3);
            for u in 0..=1 {
                for v in 0..=1 {
                    if let Some(crossing) = grid.get(&cell.offset(u_dir, u).offset(v_dir, v)) {
                        center += crossing.point.coords;
                        count += 1;
                    }
                }
            }
        }
        let position = Point3::from(center / count.max(1) as Real);
        *name = mesh.add_vertex(attr(&position));
    }

    // Two triangles per interior crossing
    let mut emitted = 0usize;
    for (axis, grid) in edges.iter().enumerate() {
        let (u_dir, v_dir) = ((axis + 1) % 3, (axis + 2) % 3);
        let limit = |d: usize| n[d] as i32;

        for (key, crossing) in grid {
            let k = key.0;
            if k[u_dir] <= 0
                || k[v_dir] <= 0
                || k[u_dir] >= limit(u_dir) - 1
                || k[v_dir] >= limit(v_dir) - 1
                || k[axis] >= limit(axis) - 2
            {
                continue;
            }

            let quad = [
                cells.get(key),
                cells.get(&key.offset(v_dir, -1)),
                cells.get(&key.offset(u_dir, -1)),
                cells.get(&key.offset(u_dir, -1).offset(v_dir, -1)),
            ];
            let [Some(&a), Some(&b), Some(&c), Some(&d)] = quad else {
                continue;
            };

            if crossing.rising {
                mesh.add_triangle_with(Triangle::new(a, c, b), T::default());
                mesh.add_triangle_with(Triangle::new(b, c, d), T::default());
            } else {
                mesh.add_triangle_with(Triangle::new(a, b, c), T::default());
                mesh.add_triangle_with(Triangle::new(c, b, d), T::default());
            }
            emitted += 2;
        }
    }

    debug!(
        vertices = cells.len(),
        triangles = emitted,
        resolution = ?resolution,
        "isocontour extracted"
    );
}

impl<V, T: Default> TriMesh<V, T> {
    /// Create a mesh from the zero level set of `density`; see [`isocontour`].
    ///
    /// # Example
    /// ```
    /// # use isosolid::{trimesh::TriMesh, vertex::Vertex, float_types::Real};
    /// # use nalgebra::{Point3, Vector3};
    /// let mesh: TriMesh<Vertex> = TriMesh::from_isocontour(
    ///     |p: &Point3<Real>| p.coords.norm_squared() - 1.0,
    ///     |p: &Point3<Real>| Vertex::new(*p, p.coords.normalize()),
    ///     Point3::new(-1.5, -1.5, -1.5),
    ///     Point3::new(1.5, 1.5, 1.5),
    ///     [24, 24, 24],
    /// );
    /// assert!(mesh.is_compact());
    /// ```
    pub fn from_isocontour<F, A>(
        density: F,
        attr: A,
        lo: Point3<Real>,
        hi: Point3<Real>,
        resolution: [usize; 3],
    ) -> Self
    where
        F: FnMut(&Point3<Real>) -> Real,
        A: FnMut(&Point3<Real>) -> V,
    {
        let mut mesh = TriMesh::new();
        isocontour(&mut mesh, density, attr, lo, hi, resolution);
        mesh
    }
}
