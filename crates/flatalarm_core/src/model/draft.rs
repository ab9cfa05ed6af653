//! Editable alarm draft backing the new/edit flow.
//!
//! # Responsibility
//! - Hold the text-level field values an edit surface binds to.
//! - Validate user input and produce a well-formed [`Alarm`].
//!
//! # Invariants
//! - A draft is short-lived and owned by the caller per invocation; there is
//!   no shared dialog state between edits.
//! - `build` never partially applies: it returns a fresh record or an error.

use crate::model::alarm::Alarm;
use crate::timefmt::{format_date_time, format_duration, parse_duration, InvalidDuration};
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Kickoff layout shown in edit fields, minute precision.
const EDIT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Rejected draft input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// Kickoff text does not match `YYYY-MM-DD HH:MM`.
    InvalidKickoff { value: String },
    /// Duration or repeat text is not a recognizable duration.
    InvalidDuration {
        field: &'static str,
        source: InvalidDuration,
    },
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKickoff { value } => {
                write!(f, "invalid start time `{value}`; expected `YYYY-MM-DD HH:MM`")
            }
            Self::InvalidDuration { field, source } => {
                write!(f, "invalid {field}: {source}")
            }
        }
    }
}

impl Error for DraftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKickoff { .. } => None,
            Self::InvalidDuration { source, .. } => Some(source),
        }
    }
}

/// Text-level field values for one edit invocation.
///
/// Duration and repeat accept raw seconds or the `1h 30m` syntax, matching
/// what editable pickers display. An empty repeat means one-shot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmDraft {
    /// Start-time text; ignored when `start_now` is set.
    pub kickoff_text: String,
    /// Use the current time as kickoff instead of `kickoff_text`.
    pub start_now: bool,
    pub duration_text: String,
    pub repeat_text: String,
    pub message: String,
}

impl Default for AlarmDraft {
    /// The new-alarm draft: start now, no repeat, everything else blank.
    fn default() -> Self {
        Self {
            kickoff_text: String::new(),
            start_now: true,
            duration_text: String::new(),
            repeat_text: String::new(),
            message: String::new(),
        }
    }
}

impl AlarmDraft {
    /// Prefills a draft from an existing record for the edit flow.
    ///
    /// A record without a kickoff yields empty start-time text; saving such a
    /// draft requires the user to supply a time (or tick "now").
    pub fn for_alarm(alarm: &Alarm) -> Self {
        Self {
            kickoff_text: format_date_time(alarm.kickoff),
            start_now: false,
            duration_text: alarm.duration_seconds.to_string(),
            repeat_text: if alarm.repeat_seconds > 0 {
                format_duration(alarm.repeat_seconds)
            } else {
                String::new()
            },
            message: alarm.message.clone(),
        }
    }

    /// Validates the draft and produces the resulting record.
    ///
    /// `now` is the kickoff used when `start_now` is set; passing it in keeps
    /// the build deterministic for callers and tests. The produced alarm is
    /// stopped; starting it is a separate user action.
    ///
    /// # Errors
    /// - [`DraftError::InvalidKickoff`] when the start-time text is
    ///   unparsable and `start_now` is not set.
    /// - [`DraftError::InvalidDuration`] for unparsable duration or repeat
    ///   text.
    pub fn build(&self, now: NaiveDateTime) -> Result<Alarm, DraftError> {
        let kickoff = if self.start_now {
            now
        } else {
            NaiveDateTime::parse_from_str(self.kickoff_text.trim(), EDIT_TIME_FORMAT).map_err(
                |_| DraftError::InvalidKickoff {
                    value: self.kickoff_text.clone(),
                },
            )?
        };

        let duration_seconds = parse_duration(&self.duration_text)
            .map_err(|source| DraftError::InvalidDuration {
                field: "duration",
                source,
            })?;

        let repeat_seconds = if self.repeat_text.trim().is_empty() {
            0
        } else {
            parse_duration(&self.repeat_text).map_err(|source| DraftError::InvalidDuration {
                field: "repeat",
                source,
            })?
        };

        Ok(Alarm::new(
            kickoff,
            duration_seconds,
            repeat_seconds,
            self.message.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{AlarmDraft, DraftError};
    use crate::model::alarm::Alarm;
    use chrono::{NaiveDate, NaiveDateTime};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid test timestamp")
    }

    #[test]
    fn build_uses_now_when_requested() {
        let draft = AlarmDraft {
            duration_text: "1h".to_string(),
            message: "tea".to_string(),
            ..AlarmDraft::default()
        };

        let alarm = draft.build(noon()).expect("draft is valid");
        assert_eq!(alarm.kickoff, Some(noon()));
        assert_eq!(alarm.duration_seconds, 3600);
        assert_eq!(alarm.repeat_seconds, 0);
        assert!(!alarm.running);
    }

    #[test]
    fn build_parses_explicit_kickoff_text() {
        let draft = AlarmDraft {
            kickoff_text: "2024-02-03 08:30".to_string(),
            start_now: false,
            duration_text: "600".to_string(),
            repeat_text: "1d".to_string(),
            message: "standup".to_string(),
        };

        let alarm = draft.build(noon()).expect("draft is valid");
        let expected = NaiveDate::from_ymd_opt(2024, 2, 3)
            .and_then(|date| date.and_hms_opt(8, 30, 0))
            .expect("valid test timestamp");
        assert_eq!(alarm.kickoff, Some(expected));
        assert_eq!(alarm.repeat_seconds, 86_400);
    }

    #[test]
    fn build_rejects_bad_kickoff_text() {
        let draft = AlarmDraft {
            kickoff_text: "tomorrow".to_string(),
            start_now: false,
            duration_text: "60".to_string(),
            ..AlarmDraft::default()
        };

        let err = draft.build(noon()).expect_err("kickoff is invalid");
        assert!(matches!(err, DraftError::InvalidKickoff { .. }));
    }

    #[test]
    fn build_rejects_bad_duration_text() {
        let draft = AlarmDraft {
            duration_text: "soon".to_string(),
            ..AlarmDraft::default()
        };

        let err = draft.build(noon()).expect_err("duration is invalid");
        assert!(matches!(
            err,
            DraftError::InvalidDuration { field: "duration", .. }
        ));
    }

    #[test]
    fn for_alarm_round_trips_through_build() {
        let original = Alarm::new(noon(), 3600, 600, "tea");
        let draft = AlarmDraft::for_alarm(&original);
        let rebuilt = draft.build(noon()).expect("prefilled draft is valid");
        assert_eq!(rebuilt, original);
    }
}
