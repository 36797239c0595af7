//! CLI handlers for task completion and progress submission.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use learnpath_core::{DailyTask, HistorySink, Okr};
use learnpath_intelligence::{commit_history, BatchEntry, ProgressPropagator};
use learnpath_state::{JsonHistoryStore, Settings};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::warn;

use super::{history_store, read_json};

/// Handle the `complete-task` command.
pub fn handle_complete_task_command(
    settings: &Settings,
    okr: PathBuf,
    task: PathBuf,
    history: Option<PathBuf>,
) -> Result<Value> {
    let mut okr: Okr = read_json(&okr)?;
    let mut task: DailyTask = read_json(&task)?;
    let now = Utc::now();

    let transition = task.complete(now).context("completing task")?;
    let update = if transition.propagate {
        ProgressPropagator::at(now)
            .complete_task(&task, &okr)
            .context("propagating task completion")?
    } else {
        None
    };

    let mut history_recorded = false;
    if let Some(update) = &update {
        update.apply_to(&mut okr);
        history_recorded = record(&history_store(history, settings), |store| {
            commit_history(update, store)
        });
    }

    Ok(json!({
        "task": task,
        "okr": okr,
        "history": update.map(|u| u.history),
        "history_recorded": history_recorded,
    }))
}

/// Handle the `update-progress` command.
pub fn handle_update_progress_command(
    settings: &Settings,
    okr: PathBuf,
    updates: PathBuf,
    history: Option<PathBuf>,
) -> Result<Value> {
    let mut okr: Okr = read_json(&okr)?;
    let entries: Vec<BatchEntry> = read_json(&updates)?;

    let outcome = ProgressPropagator::new().apply_batch(&okr, &entries);
    let store = history_store(history, settings);
    let mut recorded = 0usize;
    for entry in &outcome.history {
        let stored = record(&store, |s| match s.append(entry) {
            Ok(()) => true,
            Err(err) => {
                warn!(okr_id = %entry.okr_id, error = %err, "failed to record progress history");
                false
            }
        });
        if stored {
            recorded += 1;
        }
    }

    okr.key_results = outcome.key_results;
    Ok(json!({
        "okr": okr,
        "history": outcome.history,
        "skipped": outcome.skipped,
        "history_recorded": recorded,
    }))
}

/// Handle the `history` command.
pub fn handle_history_command(
    settings: &Settings,
    okr_id: String,
    index: Option<usize>,
    history: Option<PathBuf>,
) -> Result<Value> {
    let Some(store) = history_store(history, settings) else {
        bail!("no history file configured; set LEARNPATH_HISTORY_FILE or pass --history");
    };
    let entries = store.query(&okr_id, index)?;
    Ok(json!({ "okr_id": okr_id, "history": entries }))
}

fn record(store: &Option<JsonHistoryStore>, write: impl FnOnce(&JsonHistoryStore) -> bool) -> bool {
    match store {
        Some(store) => write(store),
        None => {
            warn!("no history file configured; progress history not recorded");
            false
        }
    }
}
