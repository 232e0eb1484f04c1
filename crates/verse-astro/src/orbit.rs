//! Orbital state: where a body is at a given time.
//!
//! The default model is the epoch snapshot stored in the catalogue, so bodies
//! do not revolve during a session and only their rotation advances.
//! [`CircularRevolution`] is the alternative for maps that should show bodies
//! moving along their orbits.

use glam::{DQuat, DVec3};

use crate::catalogue::{BodyId, BodyKind, Catalogue, LocationId};
use crate::clock::SimTime;
use crate::rotation;

/// Position provider for catalogue bodies.
pub trait OrbitalModel {
    /// Body centre in the system frame, km.
    fn position(&self, catalogue: &Catalogue, body: BodyId, time: &SimTime) -> DVec3;
}

/// Bodies stay at their stored epoch coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct EpochSnapshot;

impl OrbitalModel for EpochSnapshot {
    fn position(&self, catalogue: &Catalogue, body: BodyId, _time: &SimTime) -> DVec3 {
        catalogue.body(body).position
    }
}

/// Circular orbits in the parent's XY plane with one shared period.
///
/// Angle 0 lies on the +X axis. At the epoch each body sits at its stored
/// orbit angle; bodies without a parent or with a zero orbit radius keep
/// their epoch position. Orbits around a star are centred on the system
/// origin, like the catalogue coordinates: a star may sit off its planets'
/// orbital plane.
#[derive(Clone, Copy, Debug)]
pub struct CircularRevolution {
    period_days: f64,
}

impl CircularRevolution {
    /// # Panics
    ///
    /// Panics if `period_days` is not strictly positive.
    pub fn new(period_days: f64) -> Self {
        assert!(period_days > 0.0, "orbital period must be positive");
        Self { period_days }
    }

    pub fn orbit_angle(&self, epoch_angle: f64, time: &SimTime) -> f64 {
        crate::angle::normalize_360(epoch_angle + 360.0 * time.elapsed_days() / self.period_days)
    }
}

impl OrbitalModel for CircularRevolution {
    fn position(&self, catalogue: &Catalogue, body: BodyId, time: &SimTime) -> DVec3 {
        let entity = catalogue.body(body);
        let Some(parent) = entity.parent_body else {
            return entity.position;
        };
        if entity.orbit_radius <= 0.0 {
            return entity.position;
        }
        let (centre, origin) = match catalogue.body(parent).kind {
            BodyKind::Star => (DVec3::ZERO, DVec3::ZERO),
            _ => (
                self.position(catalogue, parent, time),
                catalogue.body(parent).position,
            ),
        };
        let angle = self.orbit_angle(entity.orbit_angle, time).to_radians();
        // height above the orbit centre is kept from the epoch snapshot
        let height = entity.position.z - origin.z;
        DVec3::new(
            centre.x + entity.orbit_radius * angle.cos(),
            centre.y + entity.orbit_radius * angle.sin(),
            centre.z + height,
        )
    }
}

/// World position of a surface location: parent centre plus the body-fixed
/// offset, turned by the current meridian about the polar axis.
pub fn location_position(
    catalogue: &Catalogue,
    model: &impl OrbitalModel,
    location: LocationId,
    time: &SimTime,
) -> DVec3 {
    let location = catalogue.location(location);
    let body = catalogue.body(location.parent_body);
    let meridian = rotation::meridian_longitude(body, time.current_cycle(body));
    let spin = DQuat::from_rotation_z(meridian.to_radians());
    model.position(catalogue, location.parent_body, time) + body.orientation * spin * location.offset
}

/// Straight-line distance between two bodies, km.
pub fn distance_between(
    catalogue: &Catalogue,
    model: &impl OrbitalModel,
    a: BodyId,
    b: BodyId,
    time: &SimTime,
) -> f64 {
    model
        .position(catalogue, a, time)
        .distance(model.position(catalogue, b, time))
}
