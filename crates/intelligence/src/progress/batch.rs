//! Ordered multi-entry progress submission for one OKR.

use learnpath_core::{KeyResult, Okr, ProgressHistory};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ProgressPropagator;

/// One absolute progress value in a batch.
///
/// Fields stay loosely typed so out-of-range entries can be reported instead of
/// failing deserialization of the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub key_result_index: i64,
    pub progress: i64,
    #[serde(default)]
    pub progress_description: Option<String>,
}

impl BatchEntry {
    pub fn new(key_result_index: i64, progress: i64) -> Self {
        Self {
            key_result_index,
            progress,
            progress_description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.progress_description = Some(description.into());
        self
    }
}

/// An entry that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// Zero-based position in the submitted batch.
    pub position: usize,
    pub reason: String,
}

/// Key results after the batch, plus one history entry per applied update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub key_results: Vec<KeyResult>,
    pub history: Vec<ProgressHistory>,
    pub skipped: Vec<SkippedEntry>,
}

impl BatchOutcome {
    pub fn applied(&self) -> usize {
        self.history.len()
    }
}

impl ProgressPropagator {
    /// Apply `entries` in submission order.
    ///
    /// Each entry sees the result of the ones before it, so `previous_progress`
    /// comes from the running state rather than the pre-batch snapshot. Invalid
    /// entries are skipped and never abort the batch.
    pub fn apply_batch(&self, okr: &Okr, entries: &[BatchEntry]) -> BatchOutcome {
        let mut key_results = okr.key_results.clone();
        let mut history = Vec::new();
        let mut skipped = Vec::new();

        for (position, entry) in entries.iter().enumerate() {
            match self.apply_update(
                &okr.id,
                &key_results,
                entry.key_result_index,
                entry.progress,
                entry.progress_description.as_deref(),
            ) {
                Ok(update) => {
                    debug!(
                        okr_id = %okr.id,
                        position,
                        key_result_index = update.key_result_index,
                        progress = update.key_result.progress.value(),
                        "applied batch entry"
                    );
                    key_results[update.key_result_index] = update.key_result;
                    history.push(update.history);
                }
                Err(err) => {
                    warn!(okr_id = %okr.id, position, error = %err, "skipping batch entry");
                    skipped.push(SkippedEntry {
                        position,
                        reason: err.to_string(),
                    });
                }
            }
        }

        BatchOutcome {
            key_results,
            history,
            skipped,
        }
    }
}
