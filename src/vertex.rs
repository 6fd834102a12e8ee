//! Vertex payloads and the attribute traits the mesh algorithms read them through.
//!
//! Mesh algorithms are generic over the vertex payload. Anything that can report a
//! position implements [`HasPosition`]; payloads that also carry a normal implement
//! [`HasNormal`]. [`Vertex`] is the stock payload produced by solids, holding a
//! position, a normal and a color.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Read/write access to a vertex position.
pub trait HasPosition {
    fn position(&self) -> Point3<Real>;
    fn set_position(&mut self, position: Point3<Real>);
}

/// Read/write access to a vertex normal.
pub trait HasNormal {
    fn normal(&self) -> Vector3<Real>;
    fn set_normal(&mut self, normal: Vector3<Real>);
}

impl HasPosition for Point3<Real> {
    #[inline]
    fn position(&self) -> Point3<Real> {
        *self
    }

    #[inline]
    fn set_position(&mut self, position: Point3<Real>) {
        *self = position;
    }
}

/// Position, normal and color of a surface vertex.
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Vertex {
    pub position: Point3<Real>,
    pub normal: Vector3<Real>,
    pub color: Vector3<Real>,
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            position: Point3::origin(),
            normal: Vector3::zeros(),
            color: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Vertex {
    /// Create a new Vertex with sanitized coordinates
    #[inline]
    pub fn new(position: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex {
            position: position.map(sanitize),
            normal: normal.map(sanitize),
            ..Default::default()
        }
    }

    /// Same as [`Vertex::new`] with an explicit color.
    pub fn with_color(
        position: Point3<Real>,
        normal: Vector3<Real>,
        color: Vector3<Real>,
    ) -> Self {
        Vertex {
            color: color.map(sanitize),
            ..Vertex::new(position, normal)
        }
    }

    /// Barycentric blend of three vertices; the normal is renormalized when possible.
    pub fn barycentric(vertices: [&Vertex; 3], weights: [Real; 3]) -> Vertex {
        let mut position = Vector3::zeros();
        let mut normal = Vector3::zeros();
        let mut color = Vector3::zeros();
        for (v, w) in vertices.iter().zip(weights) {
            position += v.position.coords * w;
            normal += v.normal * w;
            color += v.color * w;
        }
        let normal = normal.try_normalize(Real::EPSILON).unwrap_or(normal);
        Vertex::with_color(Point3::from(position), normal, color)
    }
}

#[inline]
fn sanitize(x: Real) -> Real {
    if x.is_finite() { x } else { 0.0 }
}

impl HasPosition for Vertex {
    #[inline]
    fn position(&self) -> Point3<Real> {
        self.position
    }

    #[inline]
    fn set_position(&mut self, position: Point3<Real>) {
        self.position = position;
    }
}

impl HasNormal for Vertex {
    #[inline]
    fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    #[inline]
    fn set_normal(&mut self, normal: Vector3<Real>) {
        self.normal = normal;
    }
}
