//! Core domain logic for Flat Alarm.
//! This crate is the single source of truth for alarm records and their store.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod timefmt;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::alarm::{Alarm, AlarmParseError, AlarmStatus, ParseResult};
pub use model::draft::{AlarmDraft, DraftError};
pub use repo::alarm_repo::{
    AlarmRepository, FileAlarmRepository, MemoryAlarmRepository, RepoError, RepoResult,
    STORE_FILE_NAME,
};
pub use service::alarm_service::AlarmService;
pub use timefmt::{format_date_time, format_duration, parse_duration, InvalidDuration};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
