//! Alarm store contracts, flat-file implementation and in-memory double.
//!
//! # Responsibility
//! - Provide whole-collection load/save over the line-oriented store file.
//! - Keep file layout and I/O details inside the persistence boundary.
//!
//! # Invariants
//! - `load_alarms` creates an empty store file when none exists.
//! - One line per alarm; blank lines are skipped, records with unparsable
//!   timestamps are kept (degraded), malformed numeric fields fail the load.
//! - No file locking: single-threaded access is assumed throughout.

use crate::model::alarm::{Alarm, AlarmParseError};
use log::{info, warn};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Fixed store filename, resolved against the working directory by default.
pub const STORE_FILE_NAME: &str = "alarms.txt";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-layer error for file transport and line decoding.
#[derive(Debug)]
pub enum RepoError {
    Io(io::Error),
    /// A stored line failed structural parsing; `line` is 1-based.
    Parse {
        line: usize,
        source: AlarmParseError,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Parse { line, source } => write!(f, "store line {line}: {source}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for RepoError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Persistence contract for the alarm collection.
///
/// Both operations move the whole collection; the store is the single source
/// of truth at load and the single sink at save.
pub trait AlarmRepository {
    fn load_alarms(&self) -> RepoResult<Vec<Alarm>>;
    fn save_alarms(&self, alarms: &[Alarm]) -> RepoResult<()>;
}

/// Flat-file alarm store.
pub struct FileAlarmRepository {
    path: PathBuf,
}

impl FileAlarmRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves [`STORE_FILE_NAME`] in the process working directory.
    ///
    /// # Errors
    /// - Propagates the I/O error when the working directory is unavailable.
    pub fn in_current_dir() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?.join(STORE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_store_exists(&self) -> io::Result<()> {
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map(drop)
    }
}

impl AlarmRepository for FileAlarmRepository {
    /// Reads every stored line into a record.
    ///
    /// Creates an empty store file first when none exists, so a fresh
    /// working directory yields an empty collection instead of an error.
    ///
    /// # Errors
    /// - [`RepoError::Io`] when the file cannot be created or read.
    /// - [`RepoError::Parse`] for the first line with malformed numeric
    ///   fields; no partial collection is returned in that case.
    fn load_alarms(&self) -> RepoResult<Vec<Alarm>> {
        let started_at = Instant::now();
        self.ensure_store_exists()?;
        let contents = std::fs::read_to_string(&self.path)?;

        let mut alarms = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            match Alarm::parse_line(line) {
                Ok(Some(alarm)) => alarms.push(alarm),
                Ok(None) => {}
                Err(source) => {
                    return Err(RepoError::Parse {
                        line: index + 1,
                        source,
                    });
                }
            }
        }

        info!(
            "event=store_load module=repo status=ok path={} count={} duration_ms={}",
            self.path.display(),
            alarms.len(),
            started_at.elapsed().as_millis()
        );
        Ok(alarms)
    }

    /// Rewrites the store file with one line per alarm.
    ///
    /// Records without an on-disk representation (no kickoff) are skipped
    /// with a warning; everything else is written in collection order.
    ///
    /// # Errors
    /// - [`RepoError::Io`] when the file cannot be written; the previous
    ///   file contents are then left as they were.
    fn save_alarms(&self, alarms: &[Alarm]) -> RepoResult<()> {
        let started_at = Instant::now();
        let mut contents = String::new();
        let mut skipped = 0usize;

        for alarm in alarms {
            match alarm.storage_line() {
                Some(line) => {
                    contents.push_str(&line);
                    contents.push('\n');
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(
                "event=store_save module=repo status=degraded reason=unrepresentable_records skipped={skipped}"
            );
        }

        std::fs::write(&self.path, contents)?;
        info!(
            "event=store_save module=repo status=ok path={} count={} duration_ms={}",
            self.path.display(),
            alarms.len() - skipped,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// In-memory store double for tests and ephemeral collections.
///
/// Single-threaded by design, mirroring the process model of the file store.
#[derive(Default)]
pub struct MemoryAlarmRepository {
    alarms: RefCell<Vec<Alarm>>,
}

impl MemoryAlarmRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with records, as if a file already held them.
    pub fn with_alarms(alarms: Vec<Alarm>) -> Self {
        Self {
            alarms: RefCell::new(alarms),
        }
    }
}

impl AlarmRepository for MemoryAlarmRepository {
    fn load_alarms(&self) -> RepoResult<Vec<Alarm>> {
        Ok(self.alarms.borrow().clone())
    }

    fn save_alarms(&self, alarms: &[Alarm]) -> RepoResult<()> {
        *self.alarms.borrow_mut() = alarms.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AlarmRepository, MemoryAlarmRepository};
    use crate::model::alarm::Alarm;
    use chrono::NaiveDate;

    #[test]
    fn memory_repository_round_trips_collections() {
        let kickoff = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid test timestamp");
        let repo = MemoryAlarmRepository::new();

        repo.save_alarms(&[Alarm::new(kickoff, 60, 0, "tea")])
            .expect("memory save cannot fail");
        let loaded = repo.load_alarms().expect("memory load cannot fail");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].message, "tea");
    }
}
