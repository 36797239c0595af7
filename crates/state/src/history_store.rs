use anyhow::{Context, Result};
use learnpath_core::{HistorySink, ProgressHistory};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Maximum entries returned by [`JsonHistoryStore::query`].
pub const HISTORY_QUERY_LIMIT: usize = 50;

/// Progress history kept as a pretty-printed JSON array on disk.
///
/// The file is append-only from the caller's point of view; entries are never
/// rewritten or pruned.
#[derive(Debug)]
pub struct JsonHistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored entries in insertion order.
    pub fn load(&self) -> Result<Vec<ProgressHistory>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&data).with_context(|| format!("parsing {}", self.path.display()))
    }

    /// Entries for one OKR, newest first, at most [`HISTORY_QUERY_LIMIT`].
    ///
    /// `key_result_index` narrows the result to a single key result.
    pub fn query(
        &self,
        okr_id: &str,
        key_result_index: Option<usize>,
    ) -> Result<Vec<ProgressHistory>> {
        let mut entries: Vec<_> = self
            .load()?
            .into_iter()
            .filter(|e| e.okr_id == okr_id)
            .filter(|e| key_result_index.map_or(true, |i| e.key_result_index == i))
            .collect();
        // stable: equal timestamps keep reverse insertion order
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(HISTORY_QUERY_LIMIT);
        Ok(entries)
    }

    fn save(&self, entries: &[ProgressHistory]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl HistorySink for JsonHistoryStore {
    fn append(&self, entry: &ProgressHistory) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        entries.push(entry.clone());
        self.save(&entries)?;
        tracing::debug!(
            path = %self.path.display(),
            okr_id = %entry.okr_id,
            total = entries.len(),
            "appended progress history"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use learnpath_core::{KeyResult, Progress};

    fn entry(okr: &str, index: usize, progress: i64, minutes: i64) -> ProgressHistory {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap() + Duration::minutes(minutes);
        let before = KeyResult::new("kr");
        let after = before.advanced_to(Progress::new(progress), "step", at);
        ProgressHistory::transition(okr, index, &before, &after, at)
    }

    #[test]
    fn missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(tmp.path().join("none.json"));
        assert!(store.load().unwrap().is_empty());
        assert!(store.query("okr-1", None).unwrap().is_empty());
    }

    #[test]
    fn append_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(tmp.path().join("nested/dir/history.json"));
        store.append(&entry("okr-1", 0, 10, 0)).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn query_filters_and_orders_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(tmp.path().join("history.json"));
        store.append(&entry("okr-1", 0, 10, 0)).unwrap();
        store.append(&entry("okr-2", 0, 99, 1)).unwrap();
        store.append(&entry("okr-1", 1, 20, 2)).unwrap();
        store.append(&entry("okr-1", 0, 30, 3)).unwrap();

        let all = store.query("okr-1", None).unwrap();
        let progress: Vec<u8> = all.iter().map(|e| e.progress.value()).collect();
        assert_eq!(progress, vec![30, 20, 10]);

        let first_kr = store.query("okr-1", Some(0)).unwrap();
        assert_eq!(first_kr.len(), 2);
        assert!(first_kr.iter().all(|e| e.key_result_index == 0));
    }

    #[test]
    fn query_is_capped() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(tmp.path().join("history.json"));
        let entries: Vec<_> = (0..60).map(|i| entry("okr-1", 0, i, i)).collect();
        store.save(&entries).unwrap();
        let result = store.query("okr-1", None).unwrap();
        assert_eq!(result.len(), HISTORY_QUERY_LIMIT);
        assert_eq!(result[0].progress.value(), 59);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("history.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonHistoryStore::new(&path);
        assert!(store.load().is_err());
        assert!(store.append(&entry("okr-1", 0, 10, 0)).is_err());
    }
}
