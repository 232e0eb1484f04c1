//! Forward prediction of the next star rise, solar noon and star set.
//!
//! Every prediction is a non-negative fraction of a real day. Rise and set
//! are `None` during polar day or night; noon still happens every rotation.

use time::{Duration, OffsetDateTime};

use crate::angle::angular_distance_forward;
use crate::clock::{MS_PER_DAY, SimTime};
use crate::solar::RiseSet;

/// Time until the next events, in real days.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EventForecast {
    pub next_rise: Option<f64>,
    pub next_noon: Option<f64>,
    pub next_set: Option<f64>,
}

/// Days until the hour angle travels from `current` to `target` on a body
/// turning `cycles_per_day` times a day. `None` for non-rotating bodies.
///
/// At the exact event instant the result is `Some(0.0)`: the event is
/// happening now. Any later instant counts toward the next rotation.
pub fn days_until(current: f64, target: f64, cycles_per_day: f64) -> Option<f64> {
    if cycles_per_day <= 0.0 || !cycles_per_day.is_finite() {
        return None;
    }
    Some(angular_distance_forward(current, target) / (360.0 * cycles_per_day))
}

/// Predict rise, noon and set from the current hour angle.
pub fn forecast(hour_angle: f64, rise_set: RiseSet, cycles_per_day: f64) -> EventForecast {
    let angle = rise_set.angle();
    EventForecast {
        next_rise: angle.and_then(|a| days_until(hour_angle, -a, cycles_per_day)),
        next_noon: days_until(hour_angle, 0.0, cycles_per_day),
        next_set: angle.and_then(|a| days_until(hour_angle, a, cycles_per_day)),
    }
}

/// Convert a day fraction into a `time::Duration`, rounded to milliseconds.
pub fn day_fraction_to_duration(days: f64) -> Duration {
    Duration::milliseconds((days * MS_PER_DAY).round() as i64)
}

/// Real wall-clock instant at which an event `days` from `now` happens.
pub fn event_instant(now: &SimTime, days: f64) -> Option<OffsetDateTime> {
    now.advanced_by_days(days).real_datetime()
}
