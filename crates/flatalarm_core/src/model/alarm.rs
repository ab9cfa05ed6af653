//! Alarm domain model.
//!
//! # Responsibility
//! - Define the canonical alarm record shared by list and edit surfaces.
//! - Encode and decode the line-oriented storage format.
//! - Derive deadline and status from kickoff, duration and the running flag.
//!
//! # Invariants
//! - `deadline` is `kickoff + duration_seconds` whenever `kickoff` is present.
//! - Ordering and equality ignore the `running` flag.
//! - A record with an unparsable kickoff keeps empty timestamps instead of
//!   being dropped from the collection.

use crate::timefmt::{format_date_time, format_duration};
use chrono::{Duration, Local, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// On-disk kickoff timestamp layout, 14 digits, no timezone.
const STORAGE_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

const FIELD_SEPARATOR: char = ';';

/// `kickoff;repeat;duration;running;message`; message is the raw remainder.
const STORAGE_FIELD_COUNT: usize = 5;

pub type ParseResult<T> = Result<T, AlarmParseError>;

/// Structural failure of a stored alarm line.
///
/// An unparsable kickoff timestamp is not represented here: that case
/// degrades the record (empty timestamps) instead of failing the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmParseError {
    /// The line has fewer than the five `;`-separated fields.
    MissingFields { found: usize },
    /// A numeric field (repeat, duration or running) is not a decimal integer.
    InvalidNumber {
        field: &'static str,
        value: String,
    },
}

impl Display for AlarmParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields { found } => write!(
                f,
                "alarm line has {found} of {STORAGE_FIELD_COUNT} expected fields"
            ),
            Self::InvalidNumber { field, value } => {
                write!(f, "invalid integer `{value}` in alarm field `{field}`")
            }
        }
    }
}

impl Error for AlarmParseError {}

/// Derived alarm state; expiry wins over the running flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmStatus {
    Unknown,
    Running,
    Stopped,
    Expired,
}

impl Display for AlarmStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Unknown => "UNKNOWN",
            Self::Running => "RUNNING",
            Self::Stopped => "STOPPED",
            Self::Expired => "EXPIRED",
        };
        write!(f, "{text}")
    }
}

/// One scheduled reminder.
///
/// Timestamps are `None` only for records whose stored kickoff could not be
/// parsed; such records stay in the collection but cannot be written back to
/// disk (see [`Alarm::storage_line`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    /// Reference start timestamp the deadline is computed from.
    pub kickoff: Option<NaiveDateTime>,
    /// `kickoff + duration_seconds`; the moment the alarm is due.
    pub deadline: Option<NaiveDateTime>,
    /// Free-form reminder text, stored unescaped.
    pub message: String,
    /// Recurrence interval in seconds; zero means one-shot.
    pub repeat_seconds: i64,
    /// Offset from kickoff to deadline in seconds.
    pub duration_seconds: i64,
    /// User-controlled flag, independent of deadline expiry.
    pub running: bool,
}

impl Alarm {
    /// Creates an alarm with the deadline derived from kickoff and duration.
    pub fn new(
        kickoff: NaiveDateTime,
        duration_seconds: i64,
        repeat_seconds: i64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kickoff: Some(kickoff),
            deadline: Some(kickoff + Duration::seconds(duration_seconds)),
            message: message.into(),
            repeat_seconds,
            duration_seconds,
            running: false,
        }
    }

    /// Decodes one stored line.
    ///
    /// Returns `Ok(None)` for blank lines. A kickoff that is not a valid
    /// 14-digit timestamp degrades the record to empty timestamps (logged)
    /// rather than failing the line; the record still participates in the
    /// collection.
    ///
    /// # Errors
    /// - [`AlarmParseError::MissingFields`] when fewer than five fields are
    ///   present.
    /// - [`AlarmParseError::InvalidNumber`] when repeat, duration or running
    ///   is not a decimal integer. Negative values and running flags other
    ///   than 0/1 are accepted as stored.
    pub fn parse_line(line: &str) -> ParseResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let parts: Vec<&str> = line.splitn(STORAGE_FIELD_COUNT, FIELD_SEPARATOR).collect();
        if parts.len() < STORAGE_FIELD_COUNT {
            return Err(AlarmParseError::MissingFields { found: parts.len() });
        }

        let repeat_seconds = parse_integer_field("repeat", parts[1])?;
        let duration_seconds = parse_integer_field("duration", parts[2])?;
        let running = parse_integer_field("running", parts[3])? == 1;
        let message = parts[4].to_string();

        let (kickoff, deadline) =
            match NaiveDateTime::parse_from_str(parts[0], STORAGE_TIME_FORMAT) {
                Ok(kickoff) => (
                    Some(kickoff),
                    Some(kickoff + Duration::seconds(duration_seconds)),
                ),
                Err(err) => {
                    warn!(
                        "event=alarm_parse module=model status=degraded reason=bad_kickoff value={} error={err}",
                        parts[0]
                    );
                    (None, None)
                }
            };

        Ok(Some(Self {
            kickoff,
            deadline,
            message,
            repeat_seconds,
            duration_seconds,
            running,
        }))
    }

    /// Encodes this alarm as one stored line, the inverse of [`parse_line`].
    ///
    /// Returns `None` for records without a kickoff: they have no on-disk
    /// representation. The message is written unescaped, so a message
    /// containing `;` does not round-trip field-for-field.
    ///
    /// [`parse_line`]: Self::parse_line
    pub fn storage_line(&self) -> Option<String> {
        let kickoff = self.kickoff?;
        Some(format!(
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            kickoff.format(STORAGE_TIME_FORMAT),
            self.repeat_seconds,
            self.duration_seconds,
            u8::from(self.running),
            self.message,
            sep = FIELD_SEPARATOR,
        ))
    }

    /// Marks the alarm as running; kickoff and deadline are untouched.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Clears the running flag; kickoff and deadline are untouched.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether `now` is at or after the deadline; false without a deadline.
    pub fn is_expired_at(&self, now: NaiveDateTime) -> bool {
        match self.deadline {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    /// [`is_expired_at`] against the local wall clock.
    ///
    /// [`is_expired_at`]: Self::is_expired_at
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Local::now().naive_local())
    }

    /// Derived status at `now`; expiry wins over the running flag.
    pub fn status_at(&self, now: NaiveDateTime) -> AlarmStatus {
        if self.is_expired_at(now) {
            AlarmStatus::Expired
        } else if self.running {
            AlarmStatus::Running
        } else {
            AlarmStatus::Stopped
        }
    }

    /// [`status_at`] against the local wall clock.
    ///
    /// [`status_at`]: Self::status_at
    pub fn status(&self) -> AlarmStatus {
        self.status_at(Local::now().naive_local())
    }

    /// One-line schedule summary: `deadline <- kickoff (duration) [@ repeat]`.
    pub fn time_info(&self) -> String {
        let summary = format!(
            "{} <- {} ({}) {}",
            format_date_time(self.deadline),
            format_date_time(self.kickoff),
            format_duration(self.duration_seconds),
            self.repeat_info(),
        );
        summary.trim_end().to_string()
    }

    fn repeat_info(&self) -> String {
        if self.repeat_seconds == 0 {
            String::new()
        } else {
            format!("@ {}", format_duration(self.repeat_seconds))
        }
    }

    /// Comparison key: deadline, message, repeat, duration, kickoff, all
    /// ascending. Records without timestamps sort first. `running` is
    /// deliberately excluded.
    fn comparison_key(&self) -> (Option<NaiveDateTime>, &str, i64, i64, Option<NaiveDateTime>) {
        (
            self.deadline,
            self.message.as_str(),
            self.repeat_seconds,
            self.duration_seconds,
            self.kickoff,
        )
    }
}

impl Display for Alarm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", format_date_time(self.deadline), self.message)
    }
}

impl PartialEq for Alarm {
    fn eq(&self, other: &Self) -> bool {
        self.comparison_key() == other.comparison_key()
    }
}

impl Eq for Alarm {}

impl Ord for Alarm {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparison_key().cmp(&other.comparison_key())
    }
}

impl PartialOrd for Alarm {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn parse_integer_field(field: &'static str, value: &str) -> ParseResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| AlarmParseError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
