//! Fixed-timestep tick loop.
//!
//! Astronomical state is recomputed at a fixed rate (24 Hz by default) while
//! frames are produced at whatever rate the caller drives the loop. An
//! accumulator carries leftover time between frames.

use std::time::{Duration, Instant};

use tracing::warn;

/// Default tick rate of the astronomical update.
pub const DEFAULT_TICK_RATE_HZ: f64 = 24.0;

/// Maximum frame time clamp. A stalled frame is accepted as slowdown rather
/// than replayed as a burst of ticks.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Fixed-timestep loop state.
pub struct TickLoop {
    dt: f64,
    previous_time: Instant,
    accumulator: f64,
    total_time: f64,
    frame_count: u64,
    tick_count: u64,
}

impl TickLoop {
    /// # Panics
    ///
    /// Panics if `tick_rate_hz` is not strictly positive.
    pub fn new(tick_rate_hz: f64) -> Self {
        assert!(tick_rate_hz > 0.0, "tick rate must be positive");
        Self {
            dt: 1.0 / tick_rate_hz,
            previous_time: Instant::now(),
            accumulator: 0.0,
            total_time: 0.0,
            frame_count: 0,
            tick_count: 0,
        }
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Runs one frame against the wall clock.
    ///
    /// - `update_fn(dt, total_time)` runs zero or more times at the fixed rate.
    /// - `frame_fn(frame_index, alpha)` runs exactly once, with the index of
    ///   this frame and the interpolation alpha in `[0.0, 1.0)`.
    pub fn tick(&mut self, update_fn: impl FnMut(f64, f64), frame_fn: impl FnMut(u64, f64)) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time, update_fn, frame_fn);
    }

    /// Runs one frame with an explicit frame time in seconds.
    pub fn advance(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, f64),
        mut frame_fn: impl FnMut(u64, f64),
    ) {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        while self.accumulator >= self.dt {
            update_fn(self.dt, self.total_time);
            self.total_time += self.dt;
            self.accumulator -= self.dt;
            self.tick_count += 1;
        }

        frame_fn(self.frame_count, self.alpha());
        self.frame_count += 1;
    }

    /// Time left until the next tick is due.
    pub fn until_next_tick(&self) -> Duration {
        Duration::from_secs_f64((self.dt - self.accumulator).max(0.0))
    }

    /// Interpolation alpha between the last two ticks.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / self.dt
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated seconds covered by completed ticks.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }
}

impl Default for TickLoop {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE_HZ)
    }
}
