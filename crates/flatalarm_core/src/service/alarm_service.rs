//! Alarm collection management.
//!
//! # Responsibility
//! - Exclusively own the ordered alarm sequence and its derived value sets.
//! - Mediate every load/save against the store; no other component touches
//!   the file.
//!
//! # Invariants
//! - The sequence is sorted in comparison order immediately after a load.
//!   In-place mutation (`add`, `replace`, start/stop through `alarm_mut`)
//!   does not re-sort.
//! - The derived sets reflect the most recent load only; they are not
//!   refreshed by collection mutation.
//! - Load and save failures degrade with logging; they never propagate.

use crate::model::alarm::Alarm;
use crate::repo::alarm_repo::AlarmRepository;
use log::error;
use std::collections::BTreeSet;

/// Use-case wrapper owning the alarm collection over a store implementation.
pub struct AlarmService<R: AlarmRepository> {
    repo: R,
    alarms: Vec<Alarm>,
    durations: BTreeSet<i64>,
    repeats: BTreeSet<i64>,
    messages: BTreeSet<String>,
}

impl<R: AlarmRepository> AlarmService<R> {
    /// Creates the service and loads the collection immediately.
    ///
    /// A failing store yields an empty collection for the session, logged
    /// but not surfaced.
    pub fn new(repo: R) -> Self {
        let mut service = Self {
            repo,
            alarms: Vec::new(),
            durations: BTreeSet::new(),
            repeats: BTreeSet::new(),
            messages: BTreeSet::new(),
        };
        service.reload();
        service
    }

    /// Replaces the collection with the store contents.
    ///
    /// Sorts the loaded records and rebuilds the derived sets. On store
    /// failure the previously loaded collection (empty on first load) is
    /// kept and the failure is logged.
    pub fn reload(&mut self) {
        match self.repo.load_alarms() {
            Ok(mut alarms) => {
                alarms.sort();
                self.durations.clear();
                self.repeats.clear();
                self.messages.clear();
                for alarm in &alarms {
                    self.durations.insert(alarm.duration_seconds);
                    self.repeats.insert(alarm.repeat_seconds);
                    self.messages.insert(alarm.message.clone());
                }
                self.alarms = alarms;
            }
            Err(err) => {
                error!("event=alarms_reload module=service status=error error={err}");
            }
        }
    }

    /// Writes the whole collection back to the store.
    ///
    /// A store failure leaves the file stale; it is logged, never surfaced.
    pub fn save(&self) {
        if let Err(err) = self.repo.save_alarms(&self.alarms) {
            error!("event=alarms_save module=service status=error error={err}");
        }
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Returns the alarm at `index`.
    ///
    /// # Panics
    /// Panics when `index` is out of range; callers validate their selection
    /// before asking.
    pub fn alarm(&self, index: usize) -> &Alarm {
        &self.alarms[index]
    }

    /// Mutable access for start/stop toggles and in-place edits.
    ///
    /// # Panics
    /// Panics when `index` is out of range; callers validate their selection
    /// before asking.
    pub fn alarm_mut(&mut self, index: usize) -> &mut Alarm {
        &mut self.alarms[index]
    }

    /// Appends a newly created record.
    ///
    /// The collection is not re-sorted and the derived sets are not
    /// refreshed until the next [`reload`].
    ///
    /// [`reload`]: Self::reload
    pub fn add(&mut self, alarm: Alarm) {
        self.alarms.push(alarm);
    }

    /// Replaces the record at `index` with an edited one.
    ///
    /// Same staleness rules as [`add`].
    ///
    /// # Panics
    /// Panics when `index` is out of range.
    ///
    /// [`add`]: Self::add
    pub fn replace(&mut self, index: usize, alarm: Alarm) {
        self.alarms[index] = alarm;
    }

    /// Removes the records at the given indices.
    ///
    /// Removal happens in descending index order so earlier removals cannot
    /// shift later targets. An empty slice is a no-op.
    ///
    /// # Panics
    /// Panics when any index is out of range; indices are expected to be a
    /// pre-validated selection.
    pub fn delete(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }

        let mut ordered = indices.to_vec();
        ordered.sort_unstable();
        ordered.dedup();
        for index in ordered.into_iter().rev() {
            self.alarms.remove(index);
        }
    }

    /// Distinct duration values from the most recent load.
    pub fn durations(&self) -> &BTreeSet<i64> {
        &self.durations
    }

    /// Distinct repeat values from the most recent load.
    pub fn repeats(&self) -> &BTreeSet<i64> {
        &self.repeats
    }

    /// Distinct message strings from the most recent load.
    pub fn messages(&self) -> &BTreeSet<String> {
        &self.messages
    }
}
