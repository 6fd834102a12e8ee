//! `Solid`: a sampled density/friction field together with its extracted surface.

use crate::algorithm::isocontour;
use crate::errors::SolidError;
use crate::float_types::Real;
use crate::surface::{Surface, SurfaceCoordinate, TangentFrame};
use crate::trimesh::TriMesh;
use crate::vertex::{HasPosition, Vertex};
use nalgebra::{Point3, Vector3};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Density reported outside the sampled grid (positive means outside).
pub const OUTSIDE_DENSITY: Real = 1000.0;

/// One sample of a solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Negative inside, positive outside.
    pub density: Real,
    /// Roughly the inverse of the number of seconds before a particle stops.
    pub friction: Real,
}

impl Cell {
    /// Empty space.
    pub const EMPTY: Cell = Cell {
        density: OUTSIDE_DENSITY,
        friction: 0.0,
    };

    pub const fn new(density: Real, friction: Real) -> Self {
        Cell { density, friction }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::EMPTY
    }
}

/// A regular grid of [`Cell`]s over `[lower_bound, upper_bound]`, and the surface
/// extracted from its density.
///
/// Cell `(i, j, k)` sits at `lower_bound + (i, j, k) * step`, with
/// `step = (upper_bound - lower_bound) / resolution`. Sampling is trilinear and only
/// defined while the whole 2×2×2 stencil lies inside the grid; elsewhere the solid
/// reports [`OUTSIDE_DENSITY`] and zero friction.
#[derive(Debug, Clone)]
pub struct Solid<V = Vertex> {
    resolution: [usize; 3],
    lower_bound: Point3<Real>,
    upper_bound: Point3<Real>,
    /// Cells per world unit along each axis.
    scale: Vector3<Real>,
    data: Vec<Cell>,
    mesh: TriMesh<V>,
    mass: Real,
}

impl<V> Solid<V> {
    /// An empty solid. Needs at least two cells per axis and a non-empty box.
    pub fn new(
        resolution: [usize; 3],
        lower_bound: Point3<Real>,
        upper_bound: Point3<Real>,
    ) -> Result<Self, SolidError> {
        if resolution.iter().any(|&r| r < 2) {
            return Err(SolidError::InvalidResolution(resolution));
        }
        let extent = upper_bound - lower_bound;
        if extent.iter().any(|&e| !(e > 0.0) || !e.is_finite()) {
            return Err(SolidError::InvalidBounds {
                lower: lower_bound,
                upper: upper_bound,
            });
        }
        let scale = Vector3::new(
            resolution[0] as Real / extent.x,
            resolution[1] as Real / extent.y,
            resolution[2] as Real / extent.z,
        );
        Ok(Solid {
            resolution,
            lower_bound,
            upper_bound,
            scale,
            data: vec![Cell::EMPTY; resolution[0] * resolution[1] * resolution[2]],
            mesh: TriMesh::new(),
            mass: 0.0,
        })
    }

    pub const fn resolution(&self) -> [usize; 3] {
        self.resolution
    }

    pub const fn lower_bound(&self) -> Point3<Real> {
        self.lower_bound
    }

    pub const fn upper_bound(&self) -> Point3<Real> {
        self.upper_bound
    }

    /// World-space spacing of the cells.
    pub fn step(&self) -> Vector3<Real> {
        self.scale.map(|s| 1.0 / s)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.data
    }

    pub const fn mesh(&self) -> &TriMesh<V> {
        &self.mesh
    }

    /// Total mass, `Σ -density · cell volume` over the cells with negative density.
    pub const fn mass(&self) -> Real {
        self.mass
    }

    /// World position of cell `(i, j, k)`.
    pub fn cell_position(&self, i: usize, j: usize, k: usize) -> Point3<Real> {
        let step = self.step();
        self.lower_bound + Vector3::new(i as Real * step.x, j as Real * step.y, k as Real * step.z)
    }

    #[inline]
    fn cell_index(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(
            i < self.resolution[0] && j < self.resolution[1] && k < self.resolution[2],
            "cell ({i}, {j}, {k}) outside resolution {:?}",
            self.resolution
        );
        i + self.resolution[0] * (j + self.resolution[1] * k)
    }

    pub fn cell(&self, i: usize, j: usize, k: usize) -> &Cell {
        &self.data[self.cell_index(i, j, k)]
    }

    /// Mutable access to a cell. Call [`rebuild`](Self::rebuild) afterwards to
    /// refresh the mesh and mass.
    pub fn cell_mut(&mut self, i: usize, j: usize, k: usize) -> &mut Cell {
        let index = self.cell_index(i, j, k);
        &mut self.data[index]
    }

    /// Integer cell and fractional offset of `p`, or `None` when the trilinear
    /// stencil would leave the grid.
    fn coordinate_parts(&self, p: &Point3<Real>) -> Option<([usize; 3], Vector3<Real>)> {
        let grid = (p - self.lower_bound).component_mul(&self.scale);
        let mut cell = [0usize; 3];
        let mut frac = Vector3::zeros();
        for axis in 0..3 {
            let g = grid[axis];
            if !(g >= 0.0 && g < (self.resolution[axis] - 1) as Real) {
                return None;
            }
            let whole = g.floor();
            cell[axis] = whole as usize;
            frac[axis] = g - whole;
        }
        Some((cell, frac))
    }

    fn trilinear(&self, p: &Point3<Real>, field: impl Fn(&Cell) -> Real) -> Option<Real> {
        let (c, f) = self.coordinate_parts(p)?;
        let mut total = 0.0;
        for dx in 0..2 {
            for dy in 0..2 {
                for dz in 0..2 {
                    let w = lerp_weight(dx, f.x) * lerp_weight(dy, f.y) * lerp_weight(dz, f.z);
                    total += field(self.cell(c[0] + dx, c[1] + dy, c[2] + dz)) * w;
                }
            }
        }
        Some(total)
    }

    /// Trilinear density at `p`; [`OUTSIDE_DENSITY`] off the grid.
    pub fn density(&self, p: &Point3<Real>) -> Real {
        self.trilinear(p, |cell| cell.density)
            .unwrap_or(OUTSIDE_DENSITY)
    }

    /// Trilinear friction at `p`; zero off the grid.
    pub fn friction(&self, p: &Point3<Real>) -> Real {
        self.trilinear(p, |cell| cell.friction).unwrap_or(0.0)
    }

    /// World-space gradient of the trilinear density; zero off the grid.
    pub fn gradient(&self, p: &Point3<Real>) -> Vector3<Real> {
        let Some((c, f)) = self.coordinate_parts(p) else {
            return Vector3::zeros();
        };
        let mut g = Vector3::zeros();
        for dx in 0..2 {
            for dy in 0..2 {
                for dz in 0..2 {
                    let sign = |d: usize| if d == 1 { 1.0 } else { -1.0 };
                    let w = Vector3::new(
                        sign(dx) * lerp_weight(dy, f.y) * lerp_weight(dz, f.z),
                        sign(dy) * lerp_weight(dx, f.x) * lerp_weight(dz, f.z),
                        sign(dz) * lerp_weight(dx, f.x) * lerp_weight(dy, f.y),
                    );
                    g += w * self.cell(c[0] + dx, c[1] + dy, c[2] + dz).density;
                }
            }
        }
        g.component_mul(&self.scale)
    }

    fn update_mass(&mut self) {
        let cell_volume = 1.0 / (self.scale.x * self.scale.y * self.scale.z);
        self.mass = self
            .data
            .iter()
            .filter(|cell| cell.density < 0.0)
            .map(|cell| -cell.density * cell_volume)
            .sum();
    }

    /// Re-extract the surface from the current cells and recompute the mass.
    /// `style` turns each surface position into a vertex payload.
    pub fn rebuild<A>(&mut self, style: A)
    where
        A: FnMut(&Point3<Real>) -> V,
    {
        let mut mesh = TriMesh::new();
        isocontour(
            &mut mesh,
            |p: &Point3<Real>| self.density(p),
            style,
            self.lower_bound,
            self.upper_bound,
            self.resolution,
        );
        mesh.garbage_collect(false);
        self.mesh = mesh;
        self.update_mass();
        debug!(
            vertices = self.mesh.live_vertex_count(),
            triangles = self.mesh.live_triangle_count(),
            mass = self.mass,
            "rebuilt solid surface"
        );
    }

    /// Sample `field` at every cell, then extract the surface with `style`.
    ///
    /// # Example
    /// ```
    /// # use isosolid::{solid::{Cell, Solid}, shapes, vertex::Vertex, float_types::Real};
    /// # use nalgebra::{Point3, Vector3};
    /// let ball = shapes::sphere(Point3::origin(), 1.0);
    /// let solid: Solid = Solid::build(
    ///     [24, 24, 24],
    ///     Point3::new(-2.0, -2.0, -2.0),
    ///     Point3::new(2.0, 2.0, 2.0),
    ///     |p: &Point3<Real>| Cell::new(ball(p), 1.0),
    ///     |p: &Point3<Real>| Vertex::new(*p, p.coords.normalize()),
    /// )
    /// .expect("valid grid");
    /// assert!(solid.mass() > 0.0);
    /// assert!(solid.mesh().live_triangle_count() > 0);
    /// ```
    pub fn build<F, A>(
        resolution: [usize; 3],
        lower_bound: Point3<Real>,
        upper_bound: Point3<Real>,
        field: F,
        style: A,
    ) -> Result<Self, SolidError>
    where
        F: Fn(&Point3<Real>) -> Cell + Sync,
        A: FnMut(&Point3<Real>) -> V,
    {
        let mut solid = Solid::new(resolution, lower_bound, upper_bound)?;
        let [nx, ny, _] = resolution;
        let step = solid.step();
        let at = |index: usize| {
            let (i, j, k) = (index % nx, (index / nx) % ny, index / (nx * ny));
            lower_bound + Vector3::new(i as Real * step.x, j as Real * step.y, k as Real * step.z)
        };

        #[cfg(feature = "parallel")]
        let data: Vec<Cell> = (0..solid.data.len())
            .into_par_iter()
            .map(|index| field(&at(index)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let data: Vec<Cell> = (0..solid.data.len()).map(|index| field(&at(index))).collect();

        solid.data = data;
        solid.rebuild(style);
        Ok(solid)
    }
}

impl<V: HasPosition> Solid<V> {
    /// A uniformly chosen live triangle and a random point inside it, or `None` for
    /// an empty surface.
    pub fn random_point(&self, rng: &mut fastrand::Rng) -> Option<SurfaceCoordinate<'_, Self>> {
        let count = self.mesh.live_triangle_count();
        if count == 0 {
            return None;
        }
        let triangle = self.mesh.triangle_ids().nth(rng.usize(..count))?;
        let a = rng.f64() as Real;
        let b = (1.0 - a) * rng.f64() as Real;
        let c = 1.0 - a - b;
        let [p0, p1, p2] = self.mesh.triangle(triangle).v.map(|v| self.mesh.vertex(v).position());
        let position = Point3::from(p0.coords * a + p1.coords * b + p2.coords * c);
        Some(SurfaceCoordinate::new(triangle, position, self))
    }

    /// The nearest point on the surface to `p`, or `None` for an empty surface.
    pub fn closest_point(&self, p: &Point3<Real>) -> Option<SurfaceCoordinate<'_, Self>> {
        let mut best: Option<(Real, SurfaceCoordinate<'_, Self>)> = None;
        for triangle in self.mesh.triangle_ids() {
            let verts = self.mesh.triangle(triangle).v.map(|v| self.mesh.vertex(v).position());
            let frame = TangentFrame::from_vertices(&verts);
            let mut mu = SurfaceCoordinate::<Self>::barycentric(p, &frame, &verts[0]);
            SurfaceCoordinate::<Self>::clamp_barycentric(&mut mu);
            let position = Point3::from(
                verts[0].coords * mu[0] + verts[1].coords * mu[1] + verts[2].coords * mu[2],
            );
            let distance = (position - p).norm_squared();
            if best.as_ref().is_none_or(|(d, _)| distance < *d) {
                best = Some((distance, SurfaceCoordinate::new(triangle, position, self)));
            }
        }
        best.map(|(_, coordinate)| coordinate)
    }
}

impl<V: HasPosition> Surface for Solid<V> {
    type Vertex = V;
    type TriangleData = ();

    fn mesh(&self) -> &TriMesh<V> {
        &self.mesh
    }

    fn friction(&self, position: &Point3<Real>) -> Real {
        Solid::friction(self, position)
    }
}

/// Weight of the `d`-th corner (0 or 1) for fractional offset `f`.
#[inline]
fn lerp_weight(d: usize, f: Real) -> Real {
    if d == 1 { f } else { 1.0 - f }
}
