//! Induced velocity of a horseshoe vortex.

use std::f64::consts::PI;

use nalgebra::Vector3;

/// Terms whose denominator falls below this are treated as singular and
/// contribute nothing (a point on the bound segment or a trailing leg).
const SINGULAR: f64 = 1e-12;

/// Velocity induced at `point` by a unit-strength horseshoe vortex.
///
/// The vortex runs in from infinity along `-trailing` to `a`, along the bound
/// segment from `a` to `b`, and back out to infinity along `trailing`.
/// `trailing` must be a unit vector.
pub(super) fn horseshoe(
    point: &Vector3<f64>,
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    trailing: &Vector3<f64>,
) -> Vector3<f64> {
    let r1 = point - a;
    let r2 = point - b;
    let r1_mag = r1.norm();
    let r2_mag = r2.norm();

    let mut velocity = Vector3::zeros();

    let denom = r2_mag * (r2_mag - trailing.dot(&r2));
    if denom > SINGULAR {
        velocity += trailing.cross(&r2) / denom;
    }

    let denom = r1_mag * r2_mag * (r1_mag * r2_mag + r1.dot(&r2));
    if denom > SINGULAR {
        velocity += (r1_mag + r2_mag) * r1.cross(&r2) / denom;
    }

    let denom = r1_mag * (r1_mag - trailing.dot(&r1));
    if denom > SINGULAR {
        velocity -= trailing.cross(&r1) / denom;
    }

    velocity / (4.0 * PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn aft() -> Vector3<f64> {
        Vector3::new(-1.0, 0.0, 0.0)
    }

    #[test]
    fn downwash_at_center_of_bound_segment() {
        let a = Vector3::new(0.0, -1.0, 0.0);
        let b = Vector3::new(0.0, 1.0, 0.0);
        let v = horseshoe(&Vector3::zeros(), &a, &b, &aft());

        // Two semi-infinite legs at distance 1, each inducing 1/(4π).
        assert_relative_eq!(v.z, 2.0 / (4.0 * PI), epsilon = 1e-14);
        assert_relative_eq!(v.x, 0.0);
        assert_relative_eq!(v.y, 0.0);
    }

    #[test]
    fn matches_biot_savart_for_wide_vortex_far_behind() {
        // Far downstream between widely spaced legs each leg acts like an
        // infinite line vortex, 1/(2πd).
        let a = Vector3::new(0.0, -1.0, 0.0);
        let b = Vector3::new(0.0, 1.0, 0.0);
        let p = Vector3::new(-1.0e3, 0.0, 0.0);
        let v = horseshoe(&p, &a, &b, &aft());
        assert_relative_eq!(v.z, 2.0 / (2.0 * PI), max_relative = 1e-5);
    }

    #[test]
    fn upwash_outboard_of_the_legs() {
        let a = Vector3::new(0.0, -1.0, 0.0);
        let b = Vector3::new(0.0, 1.0, 0.0);
        let v = horseshoe(&Vector3::new(-0.5, 3.0, 0.0), &a, &b, &aft());
        assert!(v.z < 0.0);
    }

    #[test]
    fn finite_on_the_bound_segment() {
        let a = Vector3::new(0.0, -1.0, 0.0);
        let b = Vector3::new(0.0, 1.0, 0.0);
        let v = horseshoe(&Vector3::new(0.0, 0.3, 0.0), &a, &b, &aft());
        assert!(v.iter().all(|c| c.is_finite()));
    }
}
