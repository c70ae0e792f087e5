use std::f64::consts::{PI, TAU};

/// Wraps an angle in radians into [-PI, PI)
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Angular interpolation in radians along the shortest arc.
/// The result is wrapped into [-PI, PI).
pub fn angle_lerp(start: f64, end: f64, alpha: f64) -> f64 {
    let diff = wrap_angle(end - start);
    wrap_angle(start + diff * alpha)
}
