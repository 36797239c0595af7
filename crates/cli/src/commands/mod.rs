//! Command handlers. Each returns the JSON document the command prints.

mod obstacles;
mod progress;
mod recommend;
mod tasks;

pub use obstacles::{handle_obstacles_command, handle_stale_tasks_command};
pub use progress::{
    handle_complete_task_command, handle_history_command, handle_update_progress_command,
};
pub use recommend::handle_recommend_command;
pub use tasks::{handle_fallback_tasks_command, handle_generate_tasks_command};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

use learnpath_state::{JsonHistoryStore, Settings};

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Read a JSON array, skipping elements that do not deserialize as `T`.
pub(crate) fn read_json_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let rows: Vec<Value> = read_json(path)?;
    let total = rows.len();
    let parsed: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(position, row)| match serde_json::from_value(row) {
            Ok(row) => Some(row),
            Err(err) => {
                warn!(path = %path.display(), position, error = %err, "skipping unreadable row");
                None
            }
        })
        .collect();
    if parsed.len() < total {
        warn!(path = %path.display(), skipped = total - parsed.len(), total, "skipped rows");
    }
    Ok(parsed)
}

pub(crate) fn read_optional_json<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => read_json(path),
        None => Ok(T::default()),
    }
}

/// History store at `explicit`, else the configured location.
pub(crate) fn history_store(explicit: Option<PathBuf>, settings: &Settings) -> Option<JsonHistoryStore> {
    explicit
        .or_else(|| settings.history_file.clone())
        .map(JsonHistoryStore::new)
}
