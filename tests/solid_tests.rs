//! Tests for sampled solids and particles rolling on them

mod support;

use isosolid::{
    Cell, Solid, SurfaceParticle, Vertex,
    algorithm::analyze_manifold,
    float_types::{PI, Real},
    shapes,
    solid::OUTSIDE_DENSITY,
};
use nalgebra::{Point3, UnitQuaternion, Vector3};

fn ball() -> Solid {
    let field = shapes::sphere(Point3::origin(), 1.0);
    Solid::build(
        [24, 24, 24],
        Point3::new(-2.0, -2.0, -2.0),
        Point3::new(2.0, 2.0, 2.0),
        |p: &Point3<Real>| Cell::new(field(p), 0.75),
        |p: &Point3<Real>| Vertex::new(*p, p.coords.normalize()),
    )
    .expect("valid grid")
}

/// The extracted surface of a sampled ball is closed and round
#[test]
fn test_ball_surface() {
    let solid = ball();
    let mesh = solid.mesh();
    assert!(mesh.is_compact());
    assert!(analyze_manifold(mesh).is_closed_manifold());
    let h = 4.0 / 24.0;
    for v in mesh.vertices() {
        let r = v.position.coords.norm();
        assert!((r - 1.0).abs() < h, "surface vertex at radius {r}");
    }
}

/// Mass integrates the negative density over the cells
#[test]
fn test_ball_mass() {
    let solid = ball();
    // ∫ (1 - r) over the unit ball
    let exact = PI / 3.0;
    assert!(
        (solid.mass() - exact).abs() < 0.15 * exact,
        "mass {} too far from {exact}",
        solid.mass()
    );
}

/// Sampling is defined inside the grid and empty outside
#[test]
fn test_sampling() {
    let solid = ball();
    assert!(solid.density(&Point3::origin()) < -0.9);
    assert!(solid.density(&Point3::new(1.5, 0.0, 0.0)) > 0.4);
    assert_eq!(solid.density(&Point3::new(5.0, 0.0, 0.0)), OUTSIDE_DENSITY);
    assert!((solid.friction(&Point3::new(0.3, 0.2, 0.1)) - 0.75).abs() < 1e-9);
    assert_eq!(solid.friction(&Point3::new(5.0, 0.0, 0.0)), 0.0);

    let g = solid.gradient(&Point3::new(0.0, 0.0, 1.0));
    assert!(g.normalize().dot(&Vector3::z()) > 0.9, "gradient {g:?} should point outward");
}

/// Closest point projects onto the surface
#[test]
fn test_closest_point() {
    let solid = ball();
    let coord = solid
        .closest_point(&Point3::new(3.0, 0.0, 0.0))
        .expect("non-empty surface");
    assert!((coord.position - Point3::new(1.0, 0.0, 0.0)).norm() < 0.2);
    assert!(solid.mesh().is_triangle_alive(coord.triangle));
    assert!((coord.friction() - 0.75).abs() < 1e-9);

    let empty: Solid = Solid::new([4, 4, 4], Point3::origin(), Point3::new(1.0, 1.0, 1.0))
        .expect("valid grid");
    assert!(empty.closest_point(&Point3::origin()).is_none());
}

/// Random points lie on the surface and are reproducible for a fixed seed
#[test]
fn test_random_point() {
    let solid = ball();
    let mut rng = fastrand::Rng::with_seed(7);
    let mut again = fastrand::Rng::with_seed(7);
    for _ in 0..50 {
        let a = solid.random_point(&mut rng).expect("non-empty surface");
        let b = solid.random_point(&mut again).expect("non-empty surface");
        assert_eq!(a.triangle, b.triangle);
        assert_eq!(a.position, b.position);
        assert!((a.position.coords.norm() - 1.0).abs() < 0.2);

        let mu = a.barycentric_position();
        assert!(mu.iter().all(|&w| w > -1e-6), "point outside its triangle: {mu:?}");
    }
}

/// A particle rolling on the ball slows down and stays on the surface
#[test]
fn test_particle_rolls_on_solid() {
    let solid = ball();
    let start = solid
        .closest_point(&Point3::new(0.0, 2.0, 0.0))
        .expect("non-empty surface");
    let mut particle = SurfaceParticle::new(
        start,
        Vector3::new(1.0, 0.0, 0.0),
        UnitQuaternion::identity(),
        1.0,
        0.1,
    );

    let mut speed = particle.velocity.norm();
    for _ in 0..100 {
        particle.integrate(0.01);
        let next = particle.velocity.norm();
        assert!(next <= speed + 1e-9, "friction must not speed the particle up");
        speed = next;
        assert!((particle.coordinate.position.coords.norm() - 1.0).abs() < 0.2);
    }
    assert!(speed < 1.0);
    assert!(particle.rotation.angle() > 0.0);
    let center = particle.center();
    assert!((center.coords.norm() - 1.1).abs() < 0.25);
}

/// The particle frame's normal row points the same way the ball is lifted
#[test]
fn test_particle_frame_faces_outward() {
    let solid = ball();
    for target in [
        Point3::new(0.0, 2.0, 0.0),
        Point3::new(-2.0, 0.3, 0.1),
        Point3::new(0.4, -0.2, -2.0),
    ] {
        let start = solid.closest_point(&target).expect("non-empty surface");
        let particle = SurfaceParticle::new(
            start,
            Vector3::new(0.0, 0.0, 1.0),
            UnitQuaternion::identity(),
            1.0,
            0.1,
        );
        let lift = particle.center() - particle.coordinate.position;
        let normal = particle.frame().row(1).transpose();
        assert!(normal.dot(&lift) > 0.0, "frame normal {normal:?} against lift {lift:?}");
        assert!(normal.dot(&start.position.coords) > 0.5);
    }
}

/// Construction rejects degenerate grids
#[test]
fn test_invalid_grid() {
    let err = Solid::<Vertex>::new([4, 0, 4], Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    assert!(err.is_err());
    let message = err.err().map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("InvalidResolution"));
}
