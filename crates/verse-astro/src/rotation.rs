//! Rotation phase of a body and its orientation toward its star.

use glam::DVec3;

use crate::angle::{asin_deg, normalize_180, normalize_360};
use crate::catalogue::CelestialBody;

/// Derived rotational state of one body at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationState {
    /// Fraction of the current rotation completed, `[0, 1)`.
    pub current_cycle: f64,
    /// Angle of the prime meridian from the reference direction, `[0, 360)`.
    pub meridian_longitude: f64,
    /// Unit vector from the body centre toward its star.
    pub star_direction: Option<DVec3>,
    /// Body-fixed longitude currently facing the star, `(-180, 180]`.
    pub noon_longitude: Option<f64>,
    /// Star elevation above the body's equatorial plane, degrees.
    pub declination: Option<f64>,
}

/// `normalize(currentCycle * 360 + correction)`. For non-rotating bodies the
/// cycle is 0 and the meridian stays at the correction.
pub fn meridian_longitude(body: &CelestialBody, current_cycle: f64) -> f64 {
    normalize_360(current_cycle * 360.0 + body.rotation_correction)
}

/// Unit vector from `body_position` toward `star_position`; `None` when the
/// two coincide.
pub fn star_direction(body_position: DVec3, star_position: DVec3) -> Option<DVec3> {
    (star_position - body_position).try_normalize()
}

/// Signed angle, in the body's equatorial plane, from the meridian to the
/// projection of the star direction.
pub fn noon_longitude(body: &CelestialBody, meridian: f64, star_direction: DVec3) -> f64 {
    let local = body.orientation.inverse() * star_direction;
    let star_angle = local.y.atan2(local.x).to_degrees();
    normalize_180(star_angle - meridian)
}

/// `asin(starDirection . polarAxis)`.
pub fn declination(body: &CelestialBody, star_direction: DVec3) -> f64 {
    asin_deg(star_direction.dot(body.polar_axis()))
}

/// Resolve the full rotational state. `star_position` is `None` for bodies
/// without a light source (stars themselves).
pub fn resolve(
    body: &CelestialBody,
    current_cycle: f64,
    body_position: DVec3,
    star_position: Option<DVec3>,
) -> RotationState {
    let meridian = meridian_longitude(body, current_cycle);
    let direction = star_position.and_then(|star| star_direction(body_position, star));
    RotationState {
        current_cycle,
        meridian_longitude: meridian,
        star_direction: direction,
        noon_longitude: direction.map(|d| noon_longitude(body, meridian, d)),
        declination: direction.map(|d| declination(body, d)),
    }
}
