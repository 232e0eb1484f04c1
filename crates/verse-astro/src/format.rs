//! Human-readable clock strings for the location card.

use time::OffsetDateTime;
use time::macros::format_description;

use crate::clock::SimTime;

/// Placeholder shown for predictions that do not apply.
pub const NOT_APPLICABLE: &str = "--:--:--";

/// Format a number of hours as `HH:MM:SS`. Seconds are rounded and carry
/// into minutes and hours. Hours are not wrapped at 24.
pub fn hours_to_clock_string(hours: f64) -> String {
    let total_seconds = (hours.max(0.0) * 3600.0).round() as u64;
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Countdown string for a day fraction, or [`NOT_APPLICABLE`].
pub fn countdown(days: Option<f64>) -> String {
    match days {
        Some(days) => hours_to_clock_string(days * 24.0),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// `HH:MM` of a wall-clock instant.
pub fn short_time(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}", at.hour(), at.minute())
}

/// Universe timestamp in the style `Wed, 01 Jan 2950 00:00:00 SET`.
pub fn universe_time_string(time: &SimTime) -> Option<String> {
    let at = time.universe_datetime()?;
    let description = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second]"
    );
    let stamp = at.format(description).ok()?;
    Some(format!("{stamp} SET"))
}
