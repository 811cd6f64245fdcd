//! DayStore: day-indexed task values backed by one JSON file.
//!
//! File shape:
//!
//! ```json
//! [ { "date": "25122024", "data": { "MEDITATE": 20, "SHOWER": 1 } } ]
//! ```
//!
//! The whole file is read once on open and rewritten in full after every
//! mutation (write `<file name>.tmp` next to it, fsync, then rename it over the
//! store file). That keeps a crash from leaving a half-written store, but the cost of a
//! write grows with the number of days ever recorded. Fine for one person's
//! history; an append-only log with compaction would be the next step if it
//! ever is not.
//!
//! Values are sparse: a task with no key reads as 0 and writing 0 removes the
//! key. Records are kept most-recently-created first.

use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::day::DayKey;
use crate::error::{CoreError, Result};
use crate::task::Task;

/// One calendar day's recorded values, keyed by persisted task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: DayKey,
    pub data: BTreeMap<String, u32>,
}

impl DayRecord {
    pub fn new(date: DayKey) -> Self {
        Self {
            date,
            data: BTreeMap::new(),
        }
    }

    pub fn value_of(&self, task_id: &str) -> u32 {
        self.data.get(task_id).copied().unwrap_or(0)
    }

    pub fn value(&self, task: Task) -> u32 {
        self.value_of(task.id())
    }

    /// A record with no non-zero value has no reason to be stored.
    pub fn is_empty(&self) -> bool {
        self.data.values().all(|v| *v == 0)
    }

    /// Non-zero values of tasks that exist in the catalog; unknown ids are skipped.
    pub fn known_values(&self) -> Vec<(Task, u32)> {
        self.data
            .iter()
            .filter(|(_, v)| **v > 0)
            .filter_map(|(id, v)| Task::from_id(id).ok().map(|t| (t, *v)))
            .collect()
    }

    /// Ids recorded on this day that the current catalog does not know.
    pub fn unknown_ids(&self) -> impl Iterator<Item = &str> {
        self.data
            .keys()
            .map(String::as_str)
            .filter(|id| Task::from_id(id).is_err())
    }
}

#[derive(Debug)]
pub struct DayStore {
    path: PathBuf,
    days: Vec<DayRecord>,
}

impl DayStore {
    /// Opens the store at `path`, creating it as `[]` when it does not exist.
    ///
    /// A file that exists but does not parse is reported as
    /// [`CoreError::MalformedStore`]; it is never overwritten here.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
            }
            fs::write(&path, "[]").map_err(|e| CoreError::io(&path, e))?;
            tracing::debug!(path = %path.display(), "created empty task data file");
        }

        let text = fs::read_to_string(&path).map_err(|e| CoreError::io(&path, e))?;
        let days: Vec<DayRecord> =
            serde_json::from_str(&text).map_err(|source| CoreError::MalformedStore {
                path: path.clone(),
                source,
            })?;

        let mut seen = HashSet::new();
        for record in &days {
            if !seen.insert(record.date) {
                return Err(CoreError::DuplicateDay {
                    path,
                    date: record.date,
                });
            }
        }

        let unknown: Vec<&str> = days.iter().flat_map(|r| r.unknown_ids()).collect();
        if !unknown.is_empty() {
            tracing::warn!(
                path = %path.display(),
                ids = ?unknown,
                "task data references tasks missing from the catalog; ignoring them"
            );
        }

        tracing::debug!(path = %path.display(), days = days.len(), "loaded task data");
        Ok(Self { path, days })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in storage order (most recently created first).
    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The stored record for `date`, without creating one.
    pub fn find(&self, date: DayKey) -> Option<&DayRecord> {
        self.days.iter().find(|r| r.date == date)
    }

    fn position(&self, date: DayKey) -> Option<usize> {
        self.days.iter().position(|r| r.date == date)
    }

    /// The record for `date`, created (and persisted) if missing.
    ///
    /// Reading may write: a new record goes to the front, other empty
    /// records are dropped, and the file is rewritten before returning.
    pub fn record_for(&mut self, date: DayKey) -> Result<&DayRecord> {
        let index = match self.position(date) {
            Some(i) => i,
            None => {
                let snapshot = self.days.clone();
                self.insert_front(date);
                if let Err(e) = self.persist() {
                    self.days = snapshot;
                    return Err(e);
                }
                tracing::info!(%date, "started a new day record");
                0
            }
        };
        Ok(&self.days[index])
    }

    fn insert_front(&mut self, date: DayKey) {
        self.days.insert(0, DayRecord::new(date));
        let before = self.days.len();
        let mut index = 0;
        self.days.retain(|r| {
            let keep = index == 0 || !r.is_empty();
            index += 1;
            keep
        });
        let dropped = before - self.days.len();
        if dropped > 0 {
            tracing::debug!(dropped, "dropped empty day records");
        }
    }

    /// Stored value for `task_id` on `date`; 0 when nothing was recorded.
    pub fn get_value(&self, date: DayKey, task_id: &str) -> u32 {
        self.find(date).map(|r| r.value_of(task_id)).unwrap_or(0)
    }

    /// Records `value` for `task_id` on `date` and persists the store.
    ///
    /// Negative values (or values beyond `u32::MAX`) are rejected before
    /// anything changes. Writing 0 removes the key. If the file cannot be
    /// written the in-memory store is rolled back and the error returned.
    pub fn set_value(&mut self, date: DayKey, task_id: &str, value: i64) -> Result<()> {
        let stored = u32::try_from(value).map_err(|_| CoreError::InvalidValue {
            task: task_id.to_string(),
            value,
        })?;

        let snapshot = self.days.clone();
        let index = match self.position(date) {
            Some(i) => i,
            None => {
                self.insert_front(date);
                0
            }
        };

        let data = &mut self.days[index].data;
        if stored == 0 {
            data.remove(task_id);
        } else {
            data.insert(task_id.to_string(), stored);
        }

        if let Err(e) = self.persist() {
            self.days = snapshot;
            return Err(e);
        }
        tracing::debug!(%date, task = task_id, value = stored, "recorded value");
        Ok(())
    }

    /// Drops every record whose values are all zero, except `keep`.
    ///
    /// Age alone never removes a record. Returns how many were dropped; the
    /// file is only rewritten when something changed.
    pub fn prune(&mut self, keep: Option<DayKey>) -> Result<usize> {
        let snapshot = self.days.clone();
        self.days
            .retain(|r| Some(r.date) == keep || !r.is_empty());
        let dropped = snapshot.len() - self.days.len();
        if dropped == 0 {
            return Ok(0);
        }
        if let Err(e) = self.persist() {
            self.days = snapshot;
            return Err(e);
        }
        tracing::debug!(dropped, "pruned empty day records");
        Ok(dropped)
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.days).map_err(|source| {
            CoreError::MalformedStore {
                path: self.path.clone(),
                source,
            }
        })?;
        let tmp = self.temp_path();
        let mut file = fs::File::create(&tmp).map_err(|e| CoreError::io(&tmp, e))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| CoreError::io(&tmp, e))?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(|e| CoreError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), days = self.days.len(), "persisted task data");
        Ok(())
    }

    /// Sibling of the store file with `.tmp` appended to its full name.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(d: u32) -> DayKey {
        DayKey::from_ymd(2024, 1, d).unwrap()
    }

    fn open(tmp: &TempDir) -> DayStore {
        DayStore::open(tmp.path().join("TaskData.json")).unwrap()
    }

    fn on_disk(store: &DayStore) -> String {
        fs::read_to_string(store.path()).unwrap()
    }

    #[test]
    fn creates_missing_file_as_empty_list() {
        let tmp = TempDir::new().unwrap();
        let store = DayStore::open(tmp.path().join("nested/dir/TaskData.json")).unwrap();
        assert!(store.is_empty());
        assert_eq!(on_disk(&store), "[]");
    }

    #[test]
    fn record_for_creates_once() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);

        let first = store.record_for(day(1)).unwrap().clone();
        let after_first = on_disk(&store);
        let second = store.record_for(day(1)).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(after_first, on_disk(&store));
        assert_eq!(store.len(), 1);
        assert_eq!(after_first, r#"[{"date":"01012024","data":{}}]"#);
    }

    #[test]
    fn new_records_go_first_and_replace_empty_ones() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);

        store.set_value(day(1), "SHOWER", 1).unwrap();
        store.record_for(day(2)).unwrap();
        store.record_for(day(3)).unwrap();

        let dates: Vec<DayKey> = store.days().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3), day(1)]);
    }

    #[test]
    fn zero_removes_the_key() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);

        store.set_value(day(1), "MEDITATE", 20).unwrap();
        store.set_value(day(1), "SHOWER", 1).unwrap();
        store.set_value(day(1), "MEDITATE", 0).unwrap();

        assert_eq!(store.get_value(day(1), "MEDITATE"), 0);
        assert!(!on_disk(&store).contains("MEDITATE"));
        assert!(!store.find(day(1)).unwrap().data.contains_key("MEDITATE"));
    }

    #[test]
    fn negative_values_are_rejected_without_side_effects() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);

        let err = store.set_value(day(1), "EXERCISE", -5).unwrap_err();
        assert!(matches!(err, CoreError::InvalidValue { value: -5, .. }));
        assert!(store.is_empty());
        assert_eq!(on_disk(&store), "[]");

        let err = store.set_value(day(1), "EXERCISE", i64::from(u32::MAX) + 1);
        assert!(err.is_err());
    }

    #[test]
    fn values_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("TaskData.json");
        {
            let mut store = DayStore::open(&path).unwrap();
            store.set_value(day(4), "EXERCISE", 45).unwrap();
        }
        let store = DayStore::open(&path).unwrap();
        assert_eq!(store.get_value(day(4), "EXERCISE"), 45);
        assert_eq!(store.get_value(day(5), "EXERCISE"), 0);
    }

    #[test]
    fn get_value_does_not_create_records() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        assert_eq!(store.get_value(day(9), "JOURNAL"), 0);
        assert!(store.find(day(9)).is_none());
    }

    #[test]
    fn prune_keeps_active_and_non_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("TaskData.json");
        fs::write(
            &path,
            r#"[{"date":"03012024","data":{}},{"date":"02012024","data":{"JOURNAL":0}},{"date":"01012024","data":{"JOURNAL":1}}]"#,
        )
        .unwrap();
        let mut store = DayStore::open(&path).unwrap();

        assert_eq!(store.prune(Some(day(3))).unwrap(), 1);
        let dates: Vec<DayKey> = store.days().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3), day(1)]);

        assert_eq!(store.prune(None).unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.prune(None).unwrap(), 0);
    }

    #[test]
    fn malformed_file_is_reported_and_left_alone() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("TaskData.json");
        fs::write(&path, "{not json").unwrap();

        let err = DayStore::open(&path).unwrap_err();
        assert!(matches!(err, CoreError::MalformedStore { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn wrong_field_types_are_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("TaskData.json");
        for bad in [
            r#"[{"date":"01012024","data":{"SHOWER":-1}}]"#,
            r#"[{"date":"01012024","data":{"SHOWER":"yes"}}]"#,
            r#"[{"date":"2024-01-01","data":{}}]"#,
            r#"[{"date":"01012024"}]"#,
            r#"{"date":"01012024","data":{}}"#,
        ] {
            fs::write(&path, bad).unwrap();
            let err = DayStore::open(&path).unwrap_err();
            assert!(matches!(err, CoreError::MalformedStore { .. }), "{bad}");
        }
    }

    #[test]
    fn duplicate_days_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("TaskData.json");
        fs::write(
            &path,
            r#"[{"date":"01012024","data":{}},{"date":"01012024","data":{"SHOWER":1}}]"#,
        )
        .unwrap();
        let err = DayStore::open(&path).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateDay { date, .. } if date == day(1)));
    }

    #[test]
    fn unknown_ids_are_kept_but_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("TaskData.json");
        fs::write(&path, r#"[{"date":"01012024","data":{"GHOST_TASK":3,"SHOWER":1}}]"#).unwrap();

        let mut store = DayStore::open(&path).unwrap();
        let record = store.find(day(1)).unwrap();
        assert_eq!(record.known_values(), vec![(Task::Shower, 1)]);
        assert_eq!(record.unknown_ids().collect::<Vec<_>>(), vec!["GHOST_TASK"]);

        store.set_value(day(1), "JOURNAL", 1).unwrap();
        assert!(on_disk(&store).contains("GHOST_TASK"));
    }

    #[test]
    fn no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let mut store = open(&tmp);
        store.set_value(day(1), "SHOWER", 1).unwrap();
        assert!(!tmp.path().join("TaskData.json.tmp").exists());
    }

    #[test]
    fn temp_file_keeps_the_store_extension() {
        let tmp = TempDir::new().unwrap();
        // Another store's temp name must not get in the way.
        fs::create_dir(tmp.path().join("data.json.tmp")).unwrap();

        let mut store = DayStore::open(tmp.path().join("data.db")).unwrap();
        store.set_value(day(1), "SHOWER", 1).unwrap();
        assert_eq!(store.temp_path(), tmp.path().join("data.db.tmp"));
        assert!(!tmp.path().join("data.db.tmp").exists());
        assert_eq!(on_disk(&store), r#"[{"date":"01012024","data":{"SHOWER":1}}]"#);
    }

    #[test]
    fn out_of_range_years_never_reach_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("TaskData.json");
        let mut store = DayStore::open(&path).unwrap();
        store.set_value(day(1), "SHOWER", 1).unwrap();
        let before = on_disk(&store);

        assert!(matches!(
            DayKey::from_ymd(10000, 1, 1),
            Err(CoreError::InvalidDate(_))
        ));
        let far = chrono::NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        assert!(DayKey::try_from(far).is_err());

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        let reopened = DayStore::open(&path).unwrap();
        assert_eq!(reopened.get_value(day(1), "SHOWER"), 1);
    }

    #[test]
    fn failed_write_rolls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("TaskData.json");
        let mut store = DayStore::open(&path).unwrap();
        store.set_value(day(1), "SHOWER", 1).unwrap();

        // A directory squatting on the temp path makes the write fail.
        fs::create_dir(tmp.path().join("TaskData.json.tmp")).unwrap();

        assert!(matches!(
            store.set_value(day(1), "JOURNAL", 1),
            Err(CoreError::Io { .. })
        ));
        assert_eq!(store.get_value(day(1), "JOURNAL"), 0);
        assert!(store.record_for(day(2)).is_err());
        assert!(store.find(day(2)).is_none());
        assert_eq!(store.get_value(day(1), "SHOWER"), 1);
    }
}
