use nalgebra::{UnitQuaternion, Vector3};
use std::f64::consts::FRAC_PI_2;

/// Below this squared length a direction is treated as zero.
const DEGENERATE_NORM_SQ: f64 = 1.0e-24;
/// `|dir × up|²` below this means `dir` is (anti)parallel to the up axis.
const PARALLEL_CROSS_SQ: f64 = 1.0e-12;

/// Angle between two vectors in `[0, π]`.
///
/// When either vector has zero length the angle is undefined; the result is
/// then `π/2`, so a stationary boid perceives every direction whenever its
/// field of view is wider than a right angle.
pub fn angle_to(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let denom = (a.norm_squared() * b.norm_squared()).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return FRAC_PI_2;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Scale `v` so its length lies in `[min, max]`, keeping its direction.
/// A zero vector stays zero.
pub fn clamp_length(v: Vector3<f64>, min: f64, max: f64) -> Vector3<f64> {
    let len = v.norm();
    if len == 0.0 {
        return v;
    }
    let target = len.max(min).min(max);
    v * (target / len)
}

/// Divide `v` by `distance / view_distance`, so closer sources weigh more.
/// Coincident sources (`distance == 0`) contribute nothing.
pub fn scale_by_proximity(v: Vector3<f64>, distance: f64, view_distance: f64) -> Vector3<f64> {
    if distance <= 0.0 {
        return Vector3::zeros();
    }
    v * (view_distance / distance)
}

/// Rotation that turns the local +Z axis onto `dir`, with +Y kept as up.
///
/// A zero direction yields the identity. A direction along the Y axis falls
/// back to +Z as the up vector.
pub fn facing(dir: &Vector3<f64>) -> UnitQuaternion<f64> {
    if dir.norm_squared() < DEGENERATE_NORM_SQ {
        return UnitQuaternion::identity();
    }
    let unit = dir.normalize();
    let up = if unit.cross(&Vector3::y()).norm_squared() < PARALLEL_CROSS_SQ {
        Vector3::z()
    } else {
        Vector3::y()
    };
    UnitQuaternion::face_towards(&unit, &up)
}

/// Toroidal wrap of one coordinate: past `+bound` jumps to `-bound` and
/// past `-bound` jumps to `+bound`.
pub fn wrap_coordinate(value: f64, bound: f64) -> f64 {
    if value > bound {
        -bound
    } else if value < -bound {
        bound
    } else {
        value
    }
}
