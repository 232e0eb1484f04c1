//! Per-tick derived state for bodies and locations.
//!
//! [`Ephemeris`] chains clock, rotation, orbital position, solar geometry and
//! event prediction over an immutable [`Catalogue`]. Nothing is cached:
//! every call is a pure function of the entity and the [`SimTime`].

use glam::DVec3;
use serde::Serialize;

use crate::catalogue::{BodyId, Catalogue, LocationId, ThemeColor};
use crate::clock::SimTime;
use crate::events::{self, EventForecast};
use crate::format;
use crate::orbit::{EpochSnapshot, OrbitalModel};
use crate::rotation::{self, RotationState};
use crate::solar::{RiseSet, SolarGeometry, SurfacePoint};

/// Derived state of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: DVec3,
    pub rotation: RotationState,
}

/// Derived state of a surface location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocationState {
    /// Seconds past local midnight.
    pub local_time: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub longitude_360: f64,
    /// km above the body radius.
    pub elevation: f64,
    pub elevation_degrees: f64,
    pub hour_angle: f64,
    pub declination: f64,
    pub star_azimuth: f64,
    pub star_altitude: f64,
    pub star_max_altitude: f64,
    pub rise_set: RiseSet,
    pub next_star_rise: Option<f64>,
    pub next_noon: Option<f64>,
    pub next_star_set: Option<f64>,
}

impl LocationState {
    fn assemble(geometry: SolarGeometry, forecast: EventForecast) -> Self {
        Self {
            local_time: geometry.local_time_seconds,
            latitude: geometry.surface.latitude,
            longitude: geometry.surface.longitude,
            longitude_360: geometry.surface.longitude_360,
            elevation: geometry.surface.elevation,
            elevation_degrees: geometry.surface.elevation_degrees,
            hour_angle: geometry.hour_angle,
            declination: geometry.declination,
            star_azimuth: geometry.star_azimuth,
            star_altitude: geometry.star_altitude,
            star_max_altitude: geometry.star_max_altitude,
            rise_set: geometry.rise_set,
            next_star_rise: forecast.next_rise,
            next_noon: forecast.next_noon,
            next_star_set: forecast.next_set,
        }
    }

    pub fn is_daytime(&self) -> bool {
        self.star_altitude > 0.0
    }
}

/// Display-ready summary of a location for the UI.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocationCard {
    pub name: String,
    pub body: String,
    pub local_time: String,
    pub universe_time: Option<String>,
    pub next_rise_countdown: String,
    pub next_noon_countdown: String,
    pub next_set_countdown: String,
    pub next_rise_at: Option<String>,
    pub next_noon_at: Option<String>,
    pub next_set_at: Option<String>,
    pub star_altitude: f64,
    pub star_azimuth: f64,
    pub theme_color: ThemeColor,
    /// Panel background shade of `theme_color`.
    pub theme_color_dark: ThemeColor,
    /// Location image, or the parent body's when the location has none.
    pub theme_image: Option<String>,
}

/// Resolver chain over one catalogue.
pub struct Ephemeris<'a, M: OrbitalModel = EpochSnapshot> {
    catalogue: &'a Catalogue,
    orbits: M,
}

impl<'a> Ephemeris<'a, EpochSnapshot> {
    pub fn new(catalogue: &'a Catalogue) -> Self {
        Self::with_orbital_model(catalogue, EpochSnapshot)
    }
}

impl<'a, M: OrbitalModel> Ephemeris<'a, M> {
    pub fn with_orbital_model(catalogue: &'a Catalogue, orbits: M) -> Self {
        Self { catalogue, orbits }
    }

    pub fn catalogue(&self) -> &'a Catalogue {
        self.catalogue
    }

    pub fn position(&self, body: BodyId, time: &SimTime) -> DVec3 {
        self.orbits.position(self.catalogue, body, time)
    }

    /// Body state with respect to its own parent star.
    pub fn body_state(&self, body: BodyId, time: &SimTime) -> BodyState {
        let star = self.catalogue.body(body).parent_star;
        self.body_state_lit_by(body, star, time)
    }

    fn body_state_lit_by(&self, body: BodyId, star: Option<BodyId>, time: &SimTime) -> BodyState {
        let entity = self.catalogue.body(body);
        let position = self.position(body, time);
        let star_position = star
            .filter(|&star| star != body)
            .map(|star| self.position(star, time));
        BodyState {
            position,
            rotation: rotation::resolve(
                entity,
                time.current_cycle(entity),
                position,
                star_position,
            ),
        }
    }

    /// Full solar state of a surface location.
    ///
    /// `None` when the orbital model places the body at the centre of its
    /// star, leaving no direction to the light source. The catalogue rejects
    /// that layout at the epoch, so it only arises with moving orbits.
    pub fn location_state(&self, location: LocationId, time: &SimTime) -> Option<LocationState> {
        let site = self.catalogue.location(location);
        let body = self.catalogue.body(site.parent_body);
        let state = self.body_state_lit_by(site.parent_body, Some(site.star), time);
        let noon_longitude = state.rotation.noon_longitude?;
        let declination = state.rotation.declination?;

        let surface = SurfacePoint::from_offset(site.offset, body.radius);
        let geometry = SolarGeometry::compute(surface, noon_longitude, declination);
        let forecast = events::forecast(
            geometry.hour_angle,
            geometry.rise_set,
            body.cycles_per_day(),
        );
        Some(LocationState::assemble(geometry, forecast))
    }

    /// Location state formatted for display, themed after the parent body.
    pub fn location_card(&self, location: LocationId, time: &SimTime) -> Option<LocationCard> {
        let site = self.catalogue.location(location);
        let body = self.catalogue.body(site.parent_body);
        let state = self.location_state(location, time)?;
        let at = |days: Option<f64>| {
            days.and_then(|d| events::event_instant(time, d))
                .map(format::short_time)
        };
        Some(LocationCard {
            name: site.name.clone(),
            body: body.name.clone(),
            local_time: format::hours_to_clock_string(state.local_time / 3600.0),
            universe_time: format::universe_time_string(time),
            next_rise_countdown: format::countdown(state.next_star_rise),
            next_noon_countdown: format::countdown(state.next_noon),
            next_set_countdown: format::countdown(state.next_star_set),
            next_rise_at: at(state.next_star_rise),
            next_noon_at: at(state.next_noon),
            next_set_at: at(state.next_star_set),
            star_altitude: state.star_altitude,
            star_azimuth: state.star_azimuth,
            theme_color: body.theme_color,
            theme_color_dark: body.theme_color.dimmed(),
            theme_image: site.theme_image.clone().or_else(|| body.theme_image.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::tests::{orbiter, site, star};
    use crate::catalogue::BodyKind;
    use crate::clock::{DEFAULT_ACCELERATION, EPOCH_2020_MS};
    use crate::demo;
    use glam::DQuat;

    fn at_days(days: f64) -> SimTime {
        SimTime::from_elapsed_days(days, DEFAULT_ACCELERATION)
    }

    /// Star at the origin, a 24-hour planet on +X with an upright axis.
    fn equatorial_world(offset: DVec3, tilt_deg: f64) -> Catalogue {
        let mut planet = orbiter("Terra", BodyKind::Planet, "Sol", "Sol");
        planet.rotation_rate = 24.0;
        planet.orientation = DQuat::from_rotation_y(tilt_deg.to_radians());
        Catalogue::builder()
            .body(star("Sol"))
            .body(planet)
            .location(site("Here", "Terra", offset))
            .build()
            .unwrap()
    }

    #[test]
    fn test_stationary_star_has_constant_meridian() {
        let catalogue = demo::stanton().unwrap();
        let ephemeris = Ephemeris::new(&catalogue);
        let stanton = catalogue.body_id("Stanton").unwrap();
        assert_eq!(catalogue.body(stanton).radius, 696_000.0);
        for days in [0.0, 0.1, 17.3, 2400.9] {
            let state = ephemeris.body_state(stanton, &at_days(days));
            assert_eq!(state.rotation.current_cycle, 0.0);
            assert_eq!(state.rotation.meridian_longitude, 0.0);
            assert!(state.rotation.star_direction.is_none());
        }
    }

    #[test]
    fn test_hour_angle_repeats_every_rotation() {
        let catalogue = demo::stanton().unwrap();
        let ephemeris = Ephemeris::new(&catalogue);
        for (id, location) in catalogue.locations() {
            let body = catalogue.body(location.parent_body);
            let period = 1.0 / body.cycles_per_day();
            let t = at_days(321.123);
            let a = ephemeris.location_state(id, &t).unwrap().hour_angle;
            let b = ephemeris
                .location_state(id, &t.advanced_by_days(period))
                .unwrap()
                .hour_angle;
            let diff = crate::angle::normalize_180(a - b).abs();
            // one millisecond of rounding in the advanced instant
            assert!(diff < 0.01, "{}: {a} vs {b}", location.name);
        }
    }

    #[test]
    fn test_max_altitude_matches_latitude_and_declination() {
        let catalogue = demo::stanton().unwrap();
        let ephemeris = Ephemeris::new(&catalogue);
        for (id, _) in catalogue.locations() {
            let s = ephemeris.location_state(id, &at_days(12.0)).unwrap();
            let expected = 90.0 - (s.latitude - s.declination).abs();
            assert!((s.star_max_altitude - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_noon_at_subsolar_longitude() {
        // Location on +X faces the star (at -X from the planet) half a
        // rotation after the meridian points at +X.
        let catalogue = equatorial_world(DVec3::new(1000.0, 0.0, 0.0), 0.0);
        let ephemeris = Ephemeris::new(&catalogue);
        let here = catalogue.location_id("Here").unwrap();

        let midnight = ephemeris.location_state(here, &at_days(0.0)).unwrap();
        assert!((midnight.hour_angle.abs() - 180.0).abs() < 1e-6);
        assert!((midnight.star_altitude + 90.0).abs() < 1e-6);
        assert!((midnight.next_noon.unwrap() - 0.5).abs() < 1e-6);
        assert!((midnight.next_star_rise.unwrap() - 0.25).abs() < 1e-6);
        assert!((midnight.next_star_set.unwrap() - 0.75).abs() < 1e-6);

        let noon = ephemeris.location_state(here, &at_days(0.5)).unwrap();
        assert!(noon.hour_angle.abs() < 1e-6);
        assert!((noon.star_altitude - 90.0).abs() < 1e-4);
        assert!((noon.local_time - 43_200.0).abs() < 1e-3);
        assert!(noon.is_daytime());
    }

    #[test]
    fn test_hour_angle_advances_with_time() {
        let catalogue = equatorial_world(DVec3::new(0.0, 1000.0, 0.0), 0.0);
        let ephemeris = Ephemeris::new(&catalogue);
        let here = catalogue.location_id("Here").unwrap();
        let hour_angle = |days: f64| {
            ephemeris
                .location_state(here, &at_days(days))
                .unwrap()
                .hour_angle
        };
        let a = hour_angle(3.1);
        let b = hour_angle(3.1 + 1.0 / 24.0);
        assert!((crate::angle::normalize_180(b - a) - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_predictions_reset_forward_after_event() {
        let catalogue = demo::stanton().unwrap();
        let ephemeris = Ephemeris::new(&catalogue);
        let orison = catalogue.location_id("Orison").unwrap();
        let start = at_days(1000.0);
        let mut previous = ephemeris.location_state(orison, &start).unwrap();
        // sample every 30 real seconds across two Crusader days
        for step in 1..=1224 {
            let t = start.advanced_by_days(step as f64 * 30.0 / 86_400.0);
            let state = ephemeris.location_state(orison, &t).unwrap();
            for (before, now) in [
                (previous.next_star_rise, state.next_star_rise),
                (previous.next_noon, state.next_noon),
                (previous.next_star_set, state.next_star_set),
            ] {
                let (Some(before), Some(now)) = (before, now) else {
                    continue;
                };
                assert!(now >= 0.0);
                // either counting down by the step, or jumped forward to the
                // next rotation after the event passed
                let step_days = 30.0 / 86_400.0;
                let counted_down = (before - now - step_days).abs() < 1e-6;
                let reset = now > before;
                assert!(counted_down || reset, "step {step}: {before} -> {now}");
            }
            previous = state;
        }
    }

    #[test]
    fn test_polar_location_in_summer_is_always_up() {
        // Pole tilted 20 degrees toward the star; location at latitude 80
        // on the star side.
        let lat = 80f64.to_radians();
        let offset = DVec3::new(-lat.cos(), 0.0, lat.sin()) * 1000.0;
        let catalogue = equatorial_world(offset, -20.0);
        let ephemeris = Ephemeris::new(&catalogue);
        let here = catalogue.location_id("Here").unwrap();
        let state = ephemeris.location_state(here, &at_days(5.0)).unwrap();

        assert!((state.latitude - 80.0).abs() < 1e-9);
        assert!((state.declination - 20.0).abs() < 1e-9);
        assert_eq!(state.rise_set, RiseSet::AlwaysUp);
        assert_eq!(state.next_star_rise, None);
        assert_eq!(state.next_star_set, None);
        assert!(state.next_noon.unwrap().is_finite());
        assert!(state.star_altitude > 0.0);
    }

    #[test]
    fn test_location_on_moon_uses_parent_star() {
        let mut moon = orbiter("Luna", BodyKind::Moon, "Terra", "Sol");
        moon.coordinates = DVec3::new(1_000_400.0, 0.0, 0.0);
        let catalogue = Catalogue::builder()
            .body(star("Sol"))
            .body(orbiter("Terra", BodyKind::Planet, "Sol", "Sol"))
            .body(moon)
            .location(site("Base", "Luna", DVec3::new(-1000.0, 0.0, 0.0)))
            .build()
            .unwrap();
        let ephemeris = Ephemeris::new(&catalogue);
        let luna = catalogue.body_id("Luna").unwrap();
        let state = ephemeris.body_state(luna, &at_days(0.0));
        let dir = state.rotation.star_direction.unwrap();
        assert!((dir - DVec3::NEG_X).length() < 1e-9);

        let base = catalogue.location_id("Base").unwrap();
        assert!(ephemeris.location_state(base, &at_days(0.0)).unwrap().next_noon.is_some());
    }

    #[test]
    fn test_location_card_strings() {
        let catalogue = demo::stanton().unwrap();
        let ephemeris = Ephemeris::new(&catalogue);
        let orison = catalogue.location_id("Orison").unwrap();
        let t = SimTime::from_real_ms(EPOCH_2020_MS + 123_456_789, DEFAULT_ACCELERATION);
        let card = ephemeris.location_card(orison, &t).unwrap();
        assert_eq!(card.name, "Orison");
        assert_eq!(card.body, "Crusader");
        assert_eq!(card.local_time.len(), 8);
        assert!(card.universe_time.as_deref().unwrap().ends_with("SET"));
        assert!(card.next_noon_at.is_some());

        let crusader = catalogue.body(catalogue.body_id("Crusader").unwrap());
        assert_eq!(card.theme_color, crusader.theme_color);
        let expected_dark = ThemeColor::new(
            (crusader.theme_color.r as f32 * 0.2) as u8,
            (crusader.theme_color.g as f32 * 0.2) as u8,
            (crusader.theme_color.b as f32 * 0.2) as u8,
        );
        assert_eq!(card.theme_color_dark, expected_dark);
        let site = catalogue.location(orison);
        assert!(site.theme_image.is_some());
        assert_eq!(card.theme_image, site.theme_image);

        let json = serde_json::to_string(&card).unwrap();
        assert!(json.contains("\"next_noon_countdown\""));
        assert!(json.contains("\"theme_color_dark\""));
    }

    #[test]
    fn test_card_falls_back_to_body_image() {
        let catalogue = equatorial_world(DVec3::new(1000.0, 0.0, 0.0), 0.0);
        let ephemeris = Ephemeris::new(&catalogue);
        let here = catalogue.location_id("Here").unwrap();
        let card = ephemeris.location_card(here, &at_days(0.25)).unwrap();
        assert_eq!(card.theme_image.as_deref(), Some("Terra.jpg"));
        assert_eq!(card.theme_color, ThemeColor::new(10, 20, 30));
        assert_eq!(card.theme_color_dark, ThemeColor::new(2, 4, 6));
    }

    #[test]
    fn test_no_state_when_orbit_meets_star() {
        // Every body pinned to the star's position.
        struct OnStar;
        impl OrbitalModel for OnStar {
            fn position(&self, _: &Catalogue, _: BodyId, _: &SimTime) -> DVec3 {
                DVec3::ZERO
            }
        }
        let catalogue = equatorial_world(DVec3::new(1000.0, 0.0, 0.0), 0.0);
        let ephemeris = Ephemeris::with_orbital_model(&catalogue, OnStar);
        let here = catalogue.location_id("Here").unwrap();
        assert!(ephemeris.location_state(here, &at_days(1.0)).is_none());
        assert!(ephemeris.location_card(here, &at_days(1.0)).is_none());
    }
}
