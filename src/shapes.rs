//! Ready-made density fields. All of them are negative inside and positive outside.

use crate::float_types::Real;
use nalgebra::Point3;

/// Signed distance to a sphere.
pub fn sphere(
    center: Point3<Real>,
    radius: Real,
) -> impl Fn(&Point3<Real>) -> Real + Copy + Send + Sync {
    move |p: &Point3<Real>| (p - center).norm() - radius
}

/// Torus around the z axis: `(major - √(x² + y²))² + z² - minor²`.
pub fn torus(major: Real, minor: Real) -> impl Fn(&Point3<Real>) -> Real + Copy + Send + Sync {
    move |p: &Point3<Real>| {
        let ring = major - (p.x * p.x + p.y * p.y).sqrt();
        ring * ring + p.z * p.z - minor * minor
    }
}

/// **Mathematical Foundation: Metaball Potential**
///
/// For a metaball at position C with radius R and strength s:
/// ```text
/// f(p) = s · R² / |p - C|²
/// ```
/// Potentials of several balls add up and blend smoothly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metaball {
    pub center: Point3<Real>,
    /// Radius of influence
    pub radius: Real,
    pub strength: Real,
}

impl Metaball {
    pub const fn new(center: Point3<Real>, radius: Real, strength: Real) -> Self {
        Self {
            center,
            radius,
            strength,
        }
    }

    /// Potential at `point`. Finite everywhere, including the centre.
    pub fn potential(&self, point: &Point3<Real>) -> Real {
        let distance_sq = (point - self.center).norm_squared().max(Real::EPSILON);
        self.strength * self.radius * self.radius / distance_sq
    }
}

/// Blended metaballs: `threshold - Σ potential`, so the inside is where the summed
/// potential exceeds `threshold` (typically `1.0`).
///
/// # Example
/// ```
/// # use isosolid::shapes::{Metaball, metaballs};
/// # use nalgebra::Point3;
/// let field = metaballs(
///     vec![
///         Metaball::new(Point3::new(-0.5, 0.0, 0.0), 1.0, 1.0),
///         Metaball::new(Point3::new(0.5, 0.0, 0.0), 1.0, 1.0),
///     ],
///     1.0,
/// );
/// assert!(field(&Point3::origin()) < 0.0);
/// assert!(field(&Point3::new(5.0, 0.0, 0.0)) > 0.0);
/// ```
pub fn metaballs(
    balls: Vec<Metaball>,
    threshold: Real,
) -> impl Fn(&Point3<Real>) -> Real + Send + Sync {
    move |p: &Point3<Real>| threshold - balls.iter().map(|ball| ball.potential(p)).sum::<Real>()
}
