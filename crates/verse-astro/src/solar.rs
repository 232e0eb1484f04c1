//! Solar geometry for a point on a body's surface: where the star stands in
//! the local sky and whether it rises at all.
//!
//! All angles are degrees. The hour angle is 0 at local solar noon, negative
//! before noon, positive after, and grows with time.

use glam::DVec3;

use crate::angle::{asin_deg, normalize_180, normalize_360};

/// Seconds in the 24-hour dial used for local time.
const SECONDS_PER_DIAL: f64 = 86_400.0;

/// Latitude, longitude and height of a surface point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    pub latitude: f64,
    /// `(-180, 180]`.
    pub longitude: f64,
    /// `[0, 360)`.
    pub longitude_360: f64,
    /// Height above the body radius, km.
    pub elevation: f64,
    /// Horizon dip caused by the elevation.
    pub elevation_degrees: f64,
}

impl SurfacePoint {
    /// Derive the surface coordinates of a body-fixed `offset` on a body of
    /// the given `radius`. The offset must be non-zero and the radius
    /// positive; the catalogue guarantees both.
    pub fn from_offset(offset: DVec3, radius: f64) -> Self {
        let distance = offset.length();
        let longitude = normalize_180(offset.y.atan2(offset.x).to_degrees());
        let elevation = distance - radius;
        Self {
            latitude: asin_deg(offset.z / distance),
            longitude,
            longitude_360: normalize_360(longitude),
            elevation,
            elevation_degrees: horizon_dip(radius, elevation),
        }
    }
}

/// How far the visible horizon sits below the geometric one for an observer
/// `height` km above a sphere of `radius`. Negative heights give a negative
/// dip.
pub fn horizon_dip(radius: f64, height: f64) -> f64 {
    if height.abs() < 1e-9 {
        return 0.0;
    }
    let ratio = (radius / (radius + height.abs())).clamp(-1.0, 1.0);
    let dip = ratio.acos().to_degrees();
    if height > 0.0 { dip } else { -dip }
}

/// Whether and where the star crosses the horizon during a rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RiseSet {
    /// The star rises at hour angle `-angle` and sets at `+angle`.
    Normal(f64),
    /// Polar day: the star never sets.
    AlwaysUp,
    /// Polar night: the star never rises.
    AlwaysDown,
}

impl RiseSet {
    pub fn angle(self) -> Option<f64> {
        match self {
            RiseSet::Normal(angle) => Some(angle),
            RiseSet::AlwaysUp | RiseSet::AlwaysDown => None,
        }
    }

    /// Fraction of a rotation the star spends above the horizon.
    pub fn daylight_fraction(self) -> f64 {
        match self {
            RiseSet::Normal(angle) => angle / 180.0,
            RiseSet::AlwaysUp => 1.0,
            RiseSet::AlwaysDown => 0.0,
        }
    }
}

/// Solve `cos(H) = -tan(lat) * tan(decl)`.
pub fn rise_set_angle(latitude: f64, declination: f64) -> RiseSet {
    let cos_h = -(latitude.to_radians().tan() * declination.to_radians().tan());
    if cos_h < -1.0 {
        RiseSet::AlwaysUp
    } else if cos_h > 1.0 {
        RiseSet::AlwaysDown
    } else {
        RiseSet::Normal(cos_h.acos().to_degrees())
    }
}

/// Hour angle of the star for an observer at `longitude`, given the
/// body-fixed longitude currently facing the star.
pub fn hour_angle(longitude: f64, noon_longitude: f64) -> f64 {
    normalize_180(longitude - noon_longitude)
}

pub fn star_altitude(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let (lat, decl, ha) = (
        latitude.to_radians(),
        declination.to_radians(),
        hour_angle.to_radians(),
    );
    asin_deg(lat.sin() * decl.sin() + lat.cos() * decl.cos() * ha.cos())
}

/// Compass bearing of the star, `[0, 360)`: 0 north, 90 east.
pub fn star_azimuth(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let (lat, decl, ha) = (
        latitude.to_radians(),
        declination.to_radians(),
        hour_angle.to_radians(),
    );
    // measured from south, westward
    let y = ha.sin() * decl.cos();
    let x = ha.cos() * lat.sin() * decl.cos() - decl.sin() * lat.cos();
    normalize_360(y.atan2(x).to_degrees() + 180.0)
}

/// Altitude of the star at culmination.
pub fn culmination_altitude(latitude: f64, declination: f64) -> f64 {
    90.0 - (latitude - declination).abs()
}

/// Seconds past local midnight on a 24-hour dial; noon is 43 200.
pub fn local_time_seconds(hour_angle: f64) -> f64 {
    normalize_360(hour_angle + 180.0) / 360.0 * SECONDS_PER_DIAL
}

/// Star position and day shape for one surface point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolarGeometry {
    pub surface: SurfacePoint,
    pub hour_angle: f64,
    pub declination: f64,
    pub star_altitude: f64,
    pub star_azimuth: f64,
    pub star_max_altitude: f64,
    pub rise_set: RiseSet,
    pub local_time_seconds: f64,
}

impl SolarGeometry {
    pub fn compute(surface: SurfacePoint, noon_longitude: f64, declination: f64) -> Self {
        let hour_angle = hour_angle(surface.longitude, noon_longitude);
        Self {
            surface,
            hour_angle,
            declination,
            star_altitude: star_altitude(surface.latitude, declination, hour_angle),
            star_azimuth: star_azimuth(surface.latitude, declination, hour_angle),
            star_max_altitude: culmination_altitude(surface.latitude, declination),
            rise_set: rise_set_angle(surface.latitude, declination),
            local_time_seconds: local_time_seconds(hour_angle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_surface_point_on_equator() {
        let p = SurfacePoint::from_offset(DVec3::new(0.0, 1000.0, 0.0), 1000.0);
        assert!(p.latitude.abs() < EPS);
        assert!((p.longitude - 90.0).abs() < EPS);
        assert!(p.elevation.abs() < EPS);
        assert_eq!(p.elevation_degrees, 0.0);
    }

    #[test]
    fn test_surface_point_signed_and_unsigned_longitude() {
        let p = SurfacePoint::from_offset(DVec3::new(0.0, -500.0, 500.0), 707.0);
        assert!((p.longitude + 90.0).abs() < EPS);
        assert!((p.longitude_360 - 270.0).abs() < EPS);
        assert!((p.latitude - 45.0).abs() < EPS);
        assert!(p.elevation > 0.0);
        assert!(p.elevation_degrees > 0.0);
    }

    #[test]
    fn test_horizon_dip_sign() {
        assert!(horizon_dip(1000.0, 10.0) > 0.0);
        assert!(horizon_dip(1000.0, -10.0) < 0.0);
        assert_eq!(horizon_dip(1000.0, 0.0), 0.0);
        // acos(1000 / 1010) ~ 8.07 degrees
        assert!((horizon_dip(1000.0, 10.0) - 8.07).abs() < 0.01);
    }

    #[test]
    fn test_culmination_identity() {
        for lat in (-90..=90).step_by(5) {
            for decl in (-90..=90).step_by(5) {
                let (lat, decl) = (lat as f64, decl as f64);
                let noon = star_altitude(lat, decl, 0.0);
                let max = culmination_altitude(lat, decl);
                assert!((max - (90.0 - (lat - decl).abs())).abs() < EPS);
                assert!((noon - max).abs() < 1e-6, "lat {lat} decl {decl}");
            }
        }
    }

    #[test]
    fn test_equator_equinox_day() {
        // lat 0, decl 0: 12-hour day, star overhead at noon
        assert_eq!(culmination_altitude(0.0, 0.0), 90.0);
        let RiseSet::Normal(angle) = rise_set_angle(0.0, 0.0) else {
            panic!("expected a normal day");
        };
        assert!((angle - 90.0).abs() < EPS);
        assert!((RiseSet::Normal(angle).daylight_fraction() - 0.5).abs() < EPS);

        assert!(star_altitude(0.0, 0.0, -angle).abs() < 1e-9);
        assert!((star_azimuth(0.0, 0.0, -angle) - 90.0).abs() < 1e-9, "rise due east");
        assert!((star_azimuth(0.0, 0.0, angle) - 270.0).abs() < 1e-9, "set due west");
    }

    #[test]
    fn test_high_latitude_summer_is_always_up() {
        let result = rise_set_angle(80.0, 20.0);
        assert_eq!(result, RiseSet::AlwaysUp);
        assert_eq!(result.angle(), None);
        // the star is still above the horizon at midnight
        assert!(star_altitude(80.0, 20.0, 180.0) > 0.0);
    }

    #[test]
    fn test_high_latitude_winter_is_always_down() {
        assert_eq!(rise_set_angle(80.0, -20.0), RiseSet::AlwaysDown);
        assert!(star_altitude(80.0, -20.0, 0.0) < 0.0);
        assert_eq!(rise_set_angle(-80.0, 20.0), RiseSet::AlwaysDown);
    }

    #[test]
    fn test_rise_set_never_nan() {
        for lat in (-90..=90).step_by(3) {
            for decl in (-90..=90).step_by(3) {
                let result = rise_set_angle(lat as f64, decl as f64);
                if let RiseSet::Normal(angle) = result {
                    assert!(angle.is_finite() && (0.0..=180.0).contains(&angle));
                }
            }
        }
    }

    #[test]
    fn test_altitude_zero_at_rise_and_set() {
        let (lat, decl) = (35.0, 12.0);
        let angle = rise_set_angle(lat, decl).angle().unwrap();
        assert!(star_altitude(lat, decl, angle).abs() < 1e-9);
        assert!(star_altitude(lat, decl, -angle).abs() < 1e-9);
        assert!(angle > 90.0, "summer days are longer than nights");
    }

    #[test]
    fn test_azimuth_south_at_noon_north_of_star() {
        assert!((star_azimuth(45.0, 10.0, 0.0) - 180.0).abs() < 1e-9);
        assert!(star_azimuth(-45.0, 10.0, 0.0).abs() < 1e-9);
        // morning sun is in the east half, afternoon in the west
        assert!(star_azimuth(45.0, 10.0, -60.0) < 180.0);
        assert!(star_azimuth(45.0, 10.0, 60.0) > 180.0);
    }

    #[test]
    fn test_local_time_dial() {
        assert!((local_time_seconds(0.0) - 43_200.0).abs() < EPS);
        assert!(local_time_seconds(180.0).abs() < EPS);
        assert!((local_time_seconds(-90.0) - 21_600.0).abs() < EPS);
    }

    #[test]
    fn test_hour_angle_wraps() {
        assert!((hour_angle(170.0, -170.0) + 20.0).abs() < EPS);
        assert!((hour_angle(-170.0, 170.0) - 20.0).abs() < EPS);
    }
}
