//! Race and pace time codec
//!
//! Times travel between callers and the engine as `"H:MM:SS"` or `"M:SS"`
//! strings; the engine works in whole seconds.

use crate::error::{PaceError, Result};

/// Parse `H:MM:SS`, `M:SS` or `MM:SS` into whole seconds
pub fn parse_time(time_str: &str) -> Result<u32> {
    let invalid = || PaceError::InvalidTime {
        input: time_str.to_string(),
    };

    let parts = time_str
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<Vec<u32>>>()?;

    let seconds = match parts.as_slice() {
        [h, m, s] => h
            .checked_mul(3600)
            .and_then(|h| h.checked_add(m.checked_mul(60)?))
            .and_then(|hm| hm.checked_add(*s)),
        [m, s] => m.checked_mul(60).and_then(|m| m.checked_add(*s)),
        _ => None,
    };

    seconds.ok_or_else(invalid)
}

/// Format whole seconds as `H:MM:SS`, dropping the hour field when it is zero
pub fn format_time(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a pace in seconds per kilometer as `M:SS/km`
pub fn format_pace(seconds_per_km: u32) -> String {
    format!("{}/km", format_time(seconds_per_km))
}

/// Format a `(fast, slow)` pace pair as `"M:SS - M:SS"`
pub fn format_pace_range(range: (u32, u32)) -> String {
    format!("{} - {}", format_time(range.0), format_time(range.1))
}

/// Round a non-negative float number of seconds to whole seconds
pub(crate) fn round_seconds(seconds: f64) -> u32 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}
