//! Daily task ledger.
//!
//! Each calendar day keeps the set of completed tasks and the number of
//! casts posted. Records are stored through a [`DayRecordRepository`].

use crate::{LedgerError, LedgerErrorKind};
use chrono::{Days, Local, NaiveDate};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, instrument, warn};

/// Posts per day that earn the bonus.
pub const BONUS_POST_THRESHOLD: u32 = 3;

/// A daily task worth points.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Task {
    /// Open the app
    Checkin,
    /// Create a draft
    Generate,
    /// Share a cast
    Post,
    /// Post three casts in one day
    #[serde(rename = "bonus3")]
    #[strum(serialize = "bonus3")]
    Bonus3,
}

impl Task {
    /// Points awarded for completing the task.
    pub fn points(&self) -> u32 {
        match self {
            Task::Checkin => 5,
            Task::Generate => 10,
            Task::Post => 20,
            Task::Bonus3 => 25,
        }
    }

    /// Short title.
    pub fn title(&self) -> &'static str {
        match self {
            Task::Checkin => "Daily check-in",
            Task::Generate => "Generate a cast",
            Task::Post => "Post a cast",
            Task::Bonus3 => "3 casts in a day",
        }
    }
}

/// Progress for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Completed tasks
    #[serde(default)]
    pub done: BTreeSet<Task>,
    /// Casts posted
    #[serde(default)]
    pub posted_count: u32,
}

impl DayRecord {
    /// Returns true if `task` is complete.
    pub fn is_done(&self, task: Task) -> bool {
        self.done.contains(&task)
    }

    /// Points earned on this day.
    pub fn points(&self) -> u32 {
        Task::iter()
            .filter(|task| self.is_done(*task))
            .map(|task| task.points())
            .sum()
    }

    /// Returns true if at least one task is complete.
    pub fn has_activity(&self) -> bool {
        !self.done.is_empty()
    }
}

/// Storage for day records.
pub trait DayRecordRepository: Send + Sync {
    /// Record for `date`, if one exists.
    fn get(&self, date: NaiveDate) -> Result<Option<DayRecord>, LedgerError>;

    /// Stores the record for `date`.
    fn put(&self, date: NaiveDate, record: &DayRecord) -> Result<(), LedgerError>;

    /// Every stored record.
    fn all(&self) -> Result<BTreeMap<NaiveDate, DayRecord>, LedgerError>;
}

/// Repository held in memory.
#[derive(Debug, Default)]
pub struct InMemoryDayRecords {
    days: Mutex<BTreeMap<NaiveDate, DayRecord>>,
}

impl InMemoryDayRecords {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DayRecordRepository for InMemoryDayRecords {
    fn get(&self, date: NaiveDate) -> Result<Option<DayRecord>, LedgerError> {
        Ok(self.days.lock().get(&date).cloned())
    }

    fn put(&self, date: NaiveDate, record: &DayRecord) -> Result<(), LedgerError> {
        self.days.lock().insert(date, record.clone());
        Ok(())
    }

    fn all(&self) -> Result<BTreeMap<NaiveDate, DayRecord>, LedgerError> {
        Ok(self.days.lock().clone())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerDocument {
    #[serde(default)]
    days: BTreeMap<NaiveDate, DayRecord>,
}

/// Repository stored as a single JSON document.
///
/// A missing or unreadable file is treated as an empty ledger.
#[derive(Debug)]
pub struct JsonFileDayRecords {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileDayRecords {
    /// Uses the ledger file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default ledger location under the user's data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("moodcaster")
            .join("tasks.json")
    }

    /// Ledger file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> LedgerDocument {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(
                    path = %self.path.display(),
                    error = %e,
                    "Ledger file not readable, starting empty"
                );
                return LedgerDocument::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Corrupt ledger file, starting empty");
            LedgerDocument::default()
        })
    }

    fn save(&self, document: &LedgerDocument) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| LedgerError::new(LedgerErrorKind::Io(e.to_string())))?;
        }
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| LedgerError::new(LedgerErrorKind::Serialization(e.to_string())))?;
        std::fs::write(&self.path, json)
            .map_err(|e| LedgerError::new(LedgerErrorKind::Io(e.to_string())))
    }
}

impl DayRecordRepository for JsonFileDayRecords {
    fn get(&self, date: NaiveDate) -> Result<Option<DayRecord>, LedgerError> {
        let _guard = self.lock.lock();
        Ok(self.load().days.remove(&date))
    }

    fn put(&self, date: NaiveDate, record: &DayRecord) -> Result<(), LedgerError> {
        let _guard = self.lock.lock();
        let mut document = self.load();
        document.days.insert(date, record.clone());
        self.save(&document)
    }

    fn all(&self) -> Result<BTreeMap<NaiveDate, DayRecord>, LedgerError> {
        let _guard = self.lock.lock();
        Ok(self.load().days)
    }
}

/// Task bookkeeping for the current day.
#[derive(Debug)]
pub struct TaskLedger<R> {
    repository: R,
    today: NaiveDate,
}

impl<R: DayRecordRepository> TaskLedger<R> {
    /// Creates a ledger for an explicit date.
    pub fn new(repository: R, today: NaiveDate) -> Self {
        Self { repository, today }
    }

    /// Creates a ledger for the local calendar date.
    pub fn for_today(repository: R) -> Self {
        Self::new(repository, Local::now().date_naive())
    }

    /// The date this ledger writes to.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Today's record, created and stored if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub fn ensure_today(&self) -> Result<DayRecord, LedgerError> {
        if let Some(record) = self.repository.get(self.today)? {
            return Ok(record);
        }
        let record = DayRecord::default();
        self.repository.put(self.today, &record)?;
        Ok(record)
    }

    /// Marks a task complete for today.
    ///
    /// Marking `Post` once three casts are counted also completes `Bonus3`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    #[instrument(skip(self), fields(today = %self.today))]
    pub fn mark_done(&self, task: Task) -> Result<DayRecord, LedgerError> {
        let mut record = self.ensure_today()?;
        record.done.insert(task);
        if task == Task::Post && record.posted_count >= BONUS_POST_THRESHOLD {
            record.done.insert(Task::Bonus3);
        }
        self.repository.put(self.today, &record)?;
        debug!(points = record.points(), "Task marked done");
        Ok(record)
    }

    /// Counts one posted cast, completing `Bonus3` at the threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    #[instrument(skip(self), fields(today = %self.today))]
    pub fn increment_posted(&self) -> Result<DayRecord, LedgerError> {
        let mut record = self.ensure_today()?;
        record.posted_count += 1;
        if record.posted_count >= BONUS_POST_THRESHOLD {
            record.done.insert(Task::Bonus3);
        }
        self.repository.put(self.today, &record)?;
        debug!(posted_count = record.posted_count, "Posted cast counted");
        Ok(record)
    }

    /// Points earned today.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub fn today_points(&self) -> Result<u32, LedgerError> {
        Ok(self.ensure_today()?.points())
    }

    /// Points earned across every stored day.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub fn total_points(&self) -> Result<u32, LedgerError> {
        Ok(self.repository.all()?.values().map(DayRecord::points).sum())
    }

    /// Consecutive days ending today with at least one completed task.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub fn streak(&self) -> Result<u32, LedgerError> {
        let days = self.repository.all()?;
        let mut cursor = Some(self.today);
        let mut streak = 0;
        while let Some(date) = cursor {
            match days.get(&date) {
                Some(record) if record.has_activity() => {
                    streak += 1;
                    cursor = date.checked_sub_days(Days::new(1));
                }
                _ => break,
            }
        }
        Ok(streak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger(today: NaiveDate) -> TaskLedger<InMemoryDayRecords> {
        TaskLedger::new(InMemoryDayRecords::new(), today)
    }

    #[test]
    fn test_points_accumulate_per_task() {
        let ledger = ledger(date(2026, 10, 16));
        assert_eq!(ledger.today_points().unwrap(), 0);

        ledger.mark_done(Task::Checkin).unwrap();
        ledger.mark_done(Task::Generate).unwrap();
        ledger.mark_done(Task::Generate).unwrap();
        assert_eq!(ledger.today_points().unwrap(), 15);
    }

    #[test]
    fn test_third_post_earns_bonus() {
        let ledger = ledger(date(2026, 10, 16));
        for _ in 0..2 {
            ledger.increment_posted().unwrap();
            ledger.mark_done(Task::Post).unwrap();
        }
        assert!(!ledger.ensure_today().unwrap().is_done(Task::Bonus3));

        let record = ledger.increment_posted().unwrap();
        assert!(record.is_done(Task::Bonus3));
        assert_eq!(ledger.today_points().unwrap(), 45);
    }

    #[test]
    fn test_marking_post_after_threshold_adds_bonus() {
        let repo = InMemoryDayRecords::new();
        let today = date(2026, 10, 16);
        repo.put(
            today,
            &DayRecord {
                done: BTreeSet::new(),
                posted_count: 3,
            },
        )
        .unwrap();

        let record = TaskLedger::new(repo, today).mark_done(Task::Post).unwrap();
        assert!(record.is_done(Task::Bonus3));
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        let repo = InMemoryDayRecords::new();
        let active = DayRecord {
            done: [Task::Checkin].into_iter().collect(),
            posted_count: 0,
        };
        repo.put(date(2026, 10, 16), &active).unwrap();
        repo.put(date(2026, 10, 15), &active).unwrap();
        repo.put(date(2026, 10, 14), &DayRecord::default()).unwrap();
        repo.put(date(2026, 10, 13), &active).unwrap();

        let ledger = TaskLedger::new(repo, date(2026, 10, 16));
        assert_eq!(ledger.streak().unwrap(), 2);
        assert_eq!(ledger.total_points().unwrap(), 15);
    }

    #[test]
    fn test_streak_is_zero_without_activity_today() {
        let ledger = ledger(date(2026, 1, 1));
        ledger.ensure_today().unwrap();
        assert_eq!(ledger.streak().unwrap(), 0);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let repo = InMemoryDayRecords::new();
        let active = DayRecord {
            done: [Task::Generate].into_iter().collect(),
            posted_count: 0,
        };
        repo.put(date(2026, 3, 1), &active).unwrap();
        repo.put(date(2026, 2, 28), &active).unwrap();

        assert_eq!(TaskLedger::new(repo, date(2026, 3, 1)).streak().unwrap(), 2);
    }

    #[test]
    fn test_task_keys() {
        assert_eq!(Task::Bonus3.as_ref(), "bonus3");
        assert_eq!(serde_json::to_string(&Task::Checkin).unwrap(), "\"checkin\"");
    }
}
