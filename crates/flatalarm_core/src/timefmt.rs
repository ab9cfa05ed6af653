//! Date and duration text helpers shared by list and edit surfaces.
//!
//! # Responsibility
//! - Render timestamps and second counts the way alarm rows display them.
//! - Parse the human duration syntax accepted by editable pickers.
//!
//! # Invariants
//! - `format_duration` and `parse_duration` are inverses for positive values.
//! - Zero (and anything below) renders as the empty string.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Components optional but fixed in order: days, hours, minutes, seconds.
static DURATION_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+)d)?\s*(?:(\d+)h)?\s*(?:(\d+)m)?\s*(?:(\d+)s)?$")
        .expect("duration pattern is a valid literal regex")
});

/// Duration text that matches neither raw seconds nor the `1d 2h 3m 4s` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDuration {
    pub value: String,
}

impl Display for InvalidDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid duration `{}`; expected seconds or `1d 2h 3m 4s` components",
            self.value
        )
    }
}

impl Error for InvalidDuration {}

/// Renders a timestamp as `YYYY-MM-DD HH:MM`, or `""` when absent.
///
/// Absent timestamps come from records whose kickoff could not be parsed,
/// so the empty string is a displayable value, not an error.
pub fn format_date_time(time: Option<NaiveDateTime>) -> String {
    match time {
        Some(time) => time.format(DISPLAY_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Renders a second count as `1d 2h 3m 4s`, omitting zero components.
///
/// Zero and negative counts render as `""` (a one-shot repeat shows nothing).
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return String::new();
    }

    let days = seconds / SECONDS_PER_DAY;
    let hours = (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = seconds % SECONDS_PER_MINUTE;

    let mut parts = Vec::with_capacity(4);
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 {
        parts.push(format!("{secs}s"));
    }
    parts.join(" ")
}

/// Parses editable-picker text into seconds.
///
/// Accepts either a raw decimal second count (`"3600"`) or the
/// [`format_duration`] syntax (`"1h 30m"`). Blank input is rejected; the
/// caller decides what an empty field means.
///
/// # Errors
/// - [`InvalidDuration`] when the text matches neither form.
pub fn parse_duration(text: &str) -> Result<i64, InvalidDuration> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InvalidDuration {
            value: text.to_string(),
        });
    }

    if let Ok(seconds) = trimmed.parse::<i64>() {
        return Ok(seconds);
    }

    let captures = DURATION_SYNTAX
        .captures(trimmed)
        .filter(|caps| caps.iter().skip(1).any(|group| group.is_some()))
        .ok_or_else(|| InvalidDuration {
            value: text.to_string(),
        })?;

    let component = |index: usize| -> i64 {
        captures
            .get(index)
            .and_then(|group| group.as_str().parse::<i64>().ok())
            .unwrap_or(0)
    };

    Ok(component(1) * SECONDS_PER_DAY
        + component(2) * SECONDS_PER_HOUR
        + component(3) * SECONDS_PER_MINUTE
        + component(4))
}

#[cfg(test)]
mod tests {
    use super::{format_date_time, format_duration, parse_duration};
    use chrono::NaiveDate;

    #[test]
    fn format_date_time_renders_minutes_precision() {
        let time = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(12, 30, 59))
            .expect("valid test timestamp");
        assert_eq!(format_date_time(Some(time)), "2024-01-01 12:30");
    }

    #[test]
    fn format_date_time_renders_absent_time_as_empty() {
        assert_eq!(format_date_time(None), "");
    }

    #[test]
    fn format_duration_omits_zero_components() {
        assert_eq!(format_duration(3661), "1h 1m 1s");
        assert_eq!(format_duration(90_061), "1d 1h 1m 1s");
        assert_eq!(format_duration(86_400), "1d");
        assert_eq!(format_duration(45), "45s");
    }

    #[test]
    fn format_duration_renders_zero_and_negative_as_empty() {
        assert_eq!(format_duration(0), "");
        assert_eq!(format_duration(-5), "");
    }

    #[test]
    fn parse_duration_accepts_raw_seconds() {
        assert_eq!(parse_duration("3600"), Ok(3600));
        assert_eq!(parse_duration(" 0 "), Ok(0));
    }

    #[test]
    fn parse_duration_accepts_component_syntax() {
        assert_eq!(parse_duration("1h 1m 1s"), Ok(3661));
        assert_eq!(parse_duration("1d"), Ok(86_400));
        assert_eq!(parse_duration("2h30m"), Ok(9000));
    }

    #[test]
    fn parse_duration_inverts_format_duration() {
        for seconds in [1, 59, 60, 3599, 3600, 3661, 86_400, 90_061] {
            let rendered = format_duration(seconds);
            assert_eq!(parse_duration(&rendered), Ok(seconds), "via `{rendered}`");
        }
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        for text in ["", "  ", "soon", "1x", "h1", "1h x"] {
            assert!(parse_duration(text).is_err(), "accepted `{text}`");
        }
    }
}
