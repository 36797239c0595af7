//! Single key-result updates.

use chrono::{DateTime, Utc};
use learnpath_core::{
    CompletionEvent, CoreError, DailyTask, HistorySink, KeyResult, Okr, Progress,
    ProgressHistory, Result,
};
use tracing::{debug, info, warn};

use super::ProgressUpdate;

/// Computes key-result progress changes at a fixed point in time.
///
/// Pure: nothing is persisted here. Callers store the returned key result and
/// hand the history entry to [`commit_history`].
#[derive(Debug, Clone, Copy)]
pub struct ProgressPropagator {
    now: DateTime<Utc>,
}

impl Default for ProgressPropagator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPropagator {
    /// Propagator stamping updates with the current time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Add a completed task's contribution to its key result.
    ///
    /// The contribution is additive and clamped at 100.
    pub fn propagate_completion(
        &self,
        okr_id: &str,
        key_results: &[KeyResult],
        event: &CompletionEvent,
    ) -> Result<ProgressUpdate> {
        if event.progress_contribution == 0 {
            return Err(CoreError::validation(
                "progress contribution must be positive",
            ));
        }
        let index = event.key_result_index;
        let before = key_results
            .get(index)
            .ok_or_else(|| CoreError::key_result_not_found(index))?;

        let progress = before.progress.saturating_add(event.progress_contribution);
        let description = format!(
            "Completed task \"{}\" (+{}%)",
            event.title, event.progress_contribution
        );
        let after = before.advanced_to(progress, description, self.now);
        info!(
            okr_id,
            key_result_index = index,
            previous = before.progress.value(),
            progress = progress.value(),
            "propagated task completion"
        );
        Ok(self.update(okr_id, index, before, after))
    }

    /// Propagate a just-completed task, if it feeds a key result.
    ///
    /// Returns `Ok(None)` for tasks without a key result or contribution.
    pub fn complete_task(&self, task: &DailyTask, okr: &Okr) -> Result<Option<ProgressUpdate>> {
        if task.okr_id != okr.id {
            return Err(CoreError::validation(format!(
                "task belongs to okr {}, not {}",
                task.okr_id, okr.id
            )));
        }
        match task.completion_event() {
            Some(event) => self
                .propagate_completion(&okr.id, &okr.key_results, &event)
                .map(Some),
            None => {
                debug!(task_id = task.id, "task does not feed a key result");
                Ok(None)
            }
        }
    }

    /// Manual submission of an absolute progress value. Decreases are allowed.
    pub fn apply_update(
        &self,
        okr_id: &str,
        key_results: &[KeyResult],
        index: i64,
        progress: i64,
        description: Option<&str>,
    ) -> Result<ProgressUpdate> {
        let progress = Progress::checked(progress)?;
        let slot = usize::try_from(index)
            .ok()
            .filter(|&i| i < key_results.len())
            .ok_or_else(|| CoreError::key_result_not_found(index))?;
        let before = &key_results[slot];
        let after = before.advanced_to(progress, description.unwrap_or_default(), self.now);
        Ok(self.update(okr_id, slot, before, after))
    }

    fn update(
        &self,
        okr_id: &str,
        index: usize,
        before: &KeyResult,
        after: KeyResult,
    ) -> ProgressUpdate {
        let history = ProgressHistory::transition(okr_id, index, before, &after, self.now);
        ProgressUpdate {
            key_result_index: index,
            key_result: after,
            history,
        }
    }
}

/// Write the update's history entry, logging and swallowing any failure.
///
/// Returns whether the write succeeded. The key-result update itself is never
/// affected.
pub fn commit_history(update: &ProgressUpdate, sink: &dyn HistorySink) -> bool {
    match sink.append(&update.history) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                okr_id = %update.history.okr_id,
                key_result_index = update.key_result_index,
                error = %err,
                "failed to record progress history"
            );
            false
        }
    }
}
