//! Universe clock: maps wall-clock time to the in-universe calendar.
//!
//! Universe time runs `acceleration` times faster than real time and is
//! anchored so that 2020-01-01T00:00Z real maps to 2950-01-01T00:00Z in the
//! universe. Nothing is persisted: every derived quantity can be recomputed
//! from the wall clock alone.

use std::time::{SystemTime, UNIX_EPOCH};

use time::OffsetDateTime;

use crate::angle::fract_positive;
use crate::catalogue::CelestialBody;

/// 2020-01-01T00:00:00Z in milliseconds since the Unix epoch.
pub const EPOCH_2020_MS: i64 = 1_577_836_800_000;

/// 2950-01-01T00:00:00Z in milliseconds since the Unix epoch.
pub const EPOCH_2950_MS: i64 = 30_925_843_200_000;

/// Universe seconds per real second.
pub const DEFAULT_ACCELERATION: f64 = 6.0;

pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Source of real time.
pub trait WallClock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Reads the operating system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now_ms(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_millis() as i64,
            Err(before) => -(before.duration().as_millis() as i64),
        }
    }
}

/// A wall clock stuck at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedWallClock(pub i64);

impl WallClock for FixedWallClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// One sample of the clock. All resolvers are pure functions of a `SimTime`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimTime {
    real_ms: i64,
    acceleration: f64,
}

impl SimTime {
    pub fn from_real_ms(real_ms: i64, acceleration: f64) -> Self {
        Self {
            real_ms,
            acceleration,
        }
    }

    /// The instant `days` real days after the 2020 epoch.
    pub fn from_elapsed_days(days: f64, acceleration: f64) -> Self {
        Self::from_real_ms(EPOCH_2020_MS + (days * MS_PER_DAY).round() as i64, acceleration)
    }

    pub fn real_ms(&self) -> i64 {
        self.real_ms
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// `epoch2950 + (real - epoch2020) * acceleration`, in milliseconds.
    pub fn universe_ms(&self) -> i64 {
        let elapsed = (self.real_ms - EPOCH_2020_MS) as f64;
        EPOCH_2950_MS + (elapsed * self.acceleration).round() as i64
    }

    /// Real days since the epoch. Equal to elapsed universe days divided by
    /// the acceleration, so rotation keeps real-time day lengths.
    pub fn elapsed_days(&self) -> f64 {
        (self.real_ms - EPOCH_2020_MS) as f64 / MS_PER_DAY
    }

    /// Fraction of the current rotation completed, in `[0, 1)`.
    /// Always 0 for bodies that do not rotate.
    pub fn current_cycle(&self, body: &CelestialBody) -> f64 {
        if !body.is_rotating() {
            return 0.0;
        }
        fract_positive(self.elapsed_days() * body.cycles_per_day())
    }

    /// This instant shifted by a number of real days.
    pub fn advanced_by_days(&self, days: f64) -> Self {
        Self::from_real_ms(
            self.real_ms + (days * MS_PER_DAY).round() as i64,
            self.acceleration,
        )
    }

    pub fn real_datetime(&self) -> Option<OffsetDateTime> {
        datetime_from_ms(self.real_ms)
    }

    /// Universe timestamp as a calendar date. `None` outside the range the
    /// `time` crate can represent.
    pub fn universe_datetime(&self) -> Option<OffsetDateTime> {
        datetime_from_ms(self.universe_ms())
    }
}

fn datetime_from_ms(ms: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000).ok()
}

/// Samples a [`WallClock`] into [`SimTime`]s.
#[derive(Clone, Debug)]
pub struct ClockSource<W: WallClock = SystemWallClock> {
    wall: W,
    acceleration: f64,
}

impl ClockSource<SystemWallClock> {
    pub fn new(acceleration: f64) -> Self {
        Self::with_wall_clock(SystemWallClock, acceleration)
    }
}

impl Default for ClockSource<SystemWallClock> {
    fn default() -> Self {
        Self::new(DEFAULT_ACCELERATION)
    }
}

impl<W: WallClock> ClockSource<W> {
    pub fn with_wall_clock(wall: W, acceleration: f64) -> Self {
        Self { wall, acceleration }
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    pub fn set_acceleration(&mut self, acceleration: f64) {
        self.acceleration = acceleration;
    }

    pub fn now(&self) -> SimTime {
        SimTime::from_real_ms(self.wall.now_ms(), self.acceleration)
    }

    pub fn real_time_ms(&self) -> i64 {
        self.wall.now_ms()
    }

    pub fn universe_time_ms(&self) -> i64 {
        self.now().universe_ms()
    }

    pub fn universe_datetime(&self) -> Option<OffsetDateTime> {
        self.now().universe_datetime()
    }

    pub fn elapsed_days(&self) -> f64 {
        self.now().elapsed_days()
    }

    pub fn current_cycle(&self, body: &CelestialBody) -> f64 {
        self.now().current_cycle(body)
    }
}
