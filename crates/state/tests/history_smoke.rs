use chrono::Utc;
use learnpath_core::{HistorySink, KeyResult, Progress, ProgressHistory};
use learnpath_state::JsonHistoryStore;
use tempfile::tempdir;

#[test]
fn history_round_trip() {
    let tmp = tempdir().unwrap();
    let store = JsonHistoryStore::new(tmp.path().join(".learnpath/progress-history.json"));

    let now = Utc::now();
    let before = KeyResult::new("Ship the CLI").with_progress(40);
    let after = before.advanced_to(Progress::new(55), "Completed task \"Parser\" (+15%)", now);
    let entry = ProgressHistory::transition("okr-1", 0, &before, &after, now);
    store.append(&entry).unwrap();

    let reopened = JsonHistoryStore::new(store.path());
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded, vec![entry]);
    assert_eq!(loaded[0].previous_progress, Some(Progress::new(40)));
    assert_eq!(loaded[0].delta(), 15);
}
