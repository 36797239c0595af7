//! OKR aggregates, key results and their progress audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Progress;
use crate::{CoreError, Result};

/// One measurable sub-goal of an objective.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    pub text: String,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub progress_description: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
}

impl KeyResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_progress(mut self, progress: i64) -> Self {
        self.progress = Progress::new(progress);
        self.completed = self.progress.is_complete();
        self
    }

    /// Copy of this key result moved to `progress`, keeping `completed` in sync.
    pub fn advanced_to(
        &self,
        progress: Progress,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            text: self.text.clone(),
            progress,
            progress_description: Some(description.into()),
            last_updated: Some(at),
            completed: progress.is_complete(),
        }
    }
}

/// An objective with its key results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Okr {
    pub id: String,
    pub objective: String,
    #[serde(default)]
    pub key_results: Vec<KeyResult>,
}

impl Okr {
    pub fn new(id: impl Into<String>, objective: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            objective: objective.into(),
            key_results: Vec::new(),
        }
    }

    pub fn with_key_result(mut self, key_result: KeyResult) -> Self {
        self.key_results.push(key_result);
        self
    }

    pub fn key_result(&self, index: usize) -> Result<&KeyResult> {
        self.key_results
            .get(index)
            .ok_or_else(|| CoreError::key_result_not_found(index))
    }

    /// Mean progress across key results, 0 for an OKR without any.
    pub fn overall_progress(&self) -> Progress {
        if self.key_results.is_empty() {
            return Progress::ZERO;
        }
        let total: i64 = self
            .key_results
            .iter()
            .map(|kr| i64::from(kr.progress.value()))
            .sum();
        Progress::new(total / self.key_results.len() as i64)
    }
}

/// Append-only audit record of one key-result progress change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressHistory {
    pub okr_id: String,
    pub key_result_index: usize,
    pub key_result_text: String,
    pub progress: Progress,
    #[serde(default)]
    pub progress_description: Option<String>,
    #[serde(default)]
    pub previous_progress: Option<Progress>,
    pub created_at: DateTime<Utc>,
}

impl ProgressHistory {
    /// Record the transition from `before` to `after` for the key result at `index`.
    pub fn transition(
        okr_id: impl Into<String>,
        index: usize,
        before: &KeyResult,
        after: &KeyResult,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            okr_id: okr_id.into(),
            key_result_index: index,
            key_result_text: after.text.clone(),
            progress: after.progress,
            progress_description: after.progress_description.clone(),
            previous_progress: Some(before.progress),
            created_at: at,
        }
    }

    /// Signed change recorded by this entry.
    pub fn delta(&self) -> i16 {
        let before = self.previous_progress.unwrap_or_default().value();
        i16::from(self.progress.value()) - i16::from(before)
    }
}
