//! # Duration Codec
//!
//! Converts the platform's compact ISO 8601 durations (`PT1H2M3S`) into
//! seconds, and seconds into the two forms the record store accepts.
//!
//! All functions are total. Anything that does not parse decodes to `0`,
//! which callers treat as "unknown" and which the minimum-duration filter
//! always rejects.

use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").ok());

/// Decode a compact duration into whole seconds.
///
/// Day, hour, minute and second components are each optional. Empty,
/// malformed or overflowing input yields `0`.
///
/// ```ignore
/// assert_eq!(decode("PT5M30S"), 330);
/// assert_eq!(decode("garbage"), 0);
/// ```
pub fn decode(raw: &str) -> u64 {
    let Some(caps) = DURATION_PATTERN
        .as_ref()
        .and_then(|pattern| pattern.captures(raw.trim()))
    else {
        return 0;
    };

    let component = |index: usize| -> Option<u64> {
        match caps.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let total = (|| {
        let days = component(1)?;
        let hours = component(2)?;
        let minutes = component(3)?;
        let seconds = component(4)?;

        days.checked_mul(86_400)?
            .checked_add(hours.checked_mul(3_600)?)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(seconds)
    })();

    total.unwrap_or(0)
}

/// Render seconds as `H:MM:SS` from one hour up, `M:SS` below.
pub fn encode_display(seconds: u64) -> String {
    if seconds == 0 {
        return "0:00".to_string();
    }

    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Minutes, rounded to two decimal places.
pub fn encode_numeric(seconds: u64) -> f64 {
    if seconds == 0 {
        return 0.0;
    }
    (seconds as f64 / 60.0 * 100.0).round() / 100.0
}
