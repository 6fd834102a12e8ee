// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Lazily-initialized tolerance used for sign classification during contouring
/// and as the default welding distance.
///
/// Defaults to `1e-6` for both precisions, but can be overridden:
///  1) **Build-time**: set env var `ISOSOLID_TOLERANCE`
///     (e.g. `ISOSOLID_TOLERANCE=1e-5 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

/// Symmetric band around zero inside which a density sample counts as "on the surface".
pub const FP_TOLERANCE: Real = 1e-6;

/// Remaining velocity magnitude below which surface advection stops.
#[cfg(feature = "f32")]
pub const ADVECT_EPSILON: Real = 1e-7;
/// Remaining velocity magnitude below which surface advection stops.
#[cfg(feature = "f64")]
pub const ADVECT_EPSILON: Real = 1e-8;

/// Barycentric coordinates closer than this to zero are pushed off the edge.
pub const EDGE_NUDGE: Real = 1e-6;

/// Upper bound on edge crossings performed by a single advection.
pub const MAX_ADVECT_STEPS: usize = 4096;

#[inline]
const fn default_tolerance() -> Real {
    FP_TOLERANCE
}

/// Returns the current tolerance value.
/// If not set yet, it tries `ISOSOLID_TOLERANCE` (parsed as the active `Real`) and
/// falls back to [`FP_TOLERANCE`].
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("ISOSOLID_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `isosolid::float_types::set_tolerance(1e-5);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

// Pi
/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_is_positive_and_stable() {
        let first = tolerance();
        assert!(first > 0.0);
        set_tolerance(first * 10.0);
        // the cell was already initialized by the first read
        assert_eq!(tolerance(), first);
    }

    #[test]
    fn advection_epsilon_is_finer_than_nudge() {
        assert!(ADVECT_EPSILON < EDGE_NUDGE);
        assert!(EDGE_NUDGE <= FP_TOLERANCE);
    }
}
