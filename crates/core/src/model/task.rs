//! Daily tasks and their lifecycle.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Priority;
use crate::{CoreError, Result};

pub const DEFAULT_TASK_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Blocked => "blocked",
        }
    }

    /// Open work that can still be blocked, cancelled or completed.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress | Self::Blocked)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeneratedBy {
    Ai,
    #[default]
    User,
    System,
}

/// Completion payload consumed by progress propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub title: String,
    pub key_result_index: usize,
    pub progress_contribution: u8,
}

/// Result of a lifecycle move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTransition {
    pub from: TaskStatus,
    pub to: TaskStatus,
    /// Whether the caller should propagate the task's contribution into its
    /// key result.
    pub propagate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTask {
    #[serde(default)]
    pub id: i64,
    pub okr_id: String,
    #[serde(default)]
    pub key_result_index: Option<usize>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    pub task_date: NaiveDate,
    #[serde(default = "default_minutes")]
    pub estimated_duration: u32,
    #[serde(default)]
    pub progress_contribution: u8,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub generated_by: GeneratedBy,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_minutes() -> u32 {
    DEFAULT_TASK_MINUTES
}

impl DailyTask {
    pub fn new(okr_id: impl Into<String>, title: impl Into<String>, task_date: NaiveDate) -> Self {
        Self {
            id: 0,
            okr_id: okr_id.into(),
            key_result_index: None,
            title: title.into(),
            description: None,
            task_type: TaskType::Daily,
            status: TaskStatus::Pending,
            priority: Priority::default(),
            task_date,
            estimated_duration: DEFAULT_TASK_MINUTES,
            progress_contribution: 0,
            completed_at: None,
            generated_by: GeneratedBy::User,
            created_at: None,
        }
    }

    pub fn for_key_result(mut self, index: usize, contribution: u8) -> Self {
        self.key_result_index = Some(index);
        self.progress_contribution = contribution.min(100);
        self
    }

    /// Completion payload, present only when the task feeds a key result.
    pub fn completion_event(&self) -> Option<CompletionEvent> {
        let index = self.key_result_index?;
        (self.progress_contribution > 0).then(|| CompletionEvent {
            title: self.title.clone(),
            key_result_index: index,
            progress_contribution: self.progress_contribution,
        })
    }

    /// Mark done. Completing twice is rejected so a contribution is never
    /// propagated twice for one completion.
    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<TaskTransition> {
        let transition = self.move_to(TaskStatus::Completed, |s| s.is_open())?;
        self.completed_at = Some(at);
        Ok(TaskTransition {
            propagate: self.completion_event().is_some(),
            ..transition
        })
    }

    /// Back to pending after completion. Progress already propagated stays.
    pub fn reopen(&mut self) -> Result<TaskTransition> {
        let transition = self.move_to(TaskStatus::Pending, |s| s == TaskStatus::Completed)?;
        self.completed_at = None;
        Ok(transition)
    }

    pub fn start(&mut self) -> Result<TaskTransition> {
        let transition = self.move_to(TaskStatus::InProgress, |s| {
            matches!(s, TaskStatus::Pending | TaskStatus::Completed)
        })?;
        self.completed_at = None;
        Ok(transition)
    }

    /// Obstacle reported.
    pub fn block(&mut self) -> Result<TaskTransition> {
        self.move_to(TaskStatus::Blocked, |s| s.is_open())
    }

    /// Obstacle resolved.
    pub fn unblock(&mut self) -> Result<TaskTransition> {
        self.move_to(TaskStatus::Pending, |s| s == TaskStatus::Blocked)
    }

    /// Stale-task sweep. Not reversible.
    pub fn fail_stale(&mut self) -> Result<TaskTransition> {
        self.move_to(TaskStatus::Failed, |s| {
            matches!(s, TaskStatus::Pending | TaskStatus::InProgress)
        })
    }

    pub fn cancel(&mut self) -> Result<TaskTransition> {
        self.move_to(TaskStatus::Cancelled, |s| s.is_open())
    }

    fn move_to(
        &mut self,
        to: TaskStatus,
        allowed_from: impl Fn(TaskStatus) -> bool,
    ) -> Result<TaskTransition> {
        let from = self.status;
        if !allowed_from(from) {
            return Err(CoreError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        debug!(task_id = self.id, %from, %to, "task transition");
        self.status = to;
        Ok(TaskTransition {
            from,
            to,
            propagate: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> DailyTask {
        DailyTask::new("okr-1", "Read chapter 4", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
    }

    #[test]
    fn complete_sets_timestamp_and_requests_propagation() {
        let now = Utc::now();
        let mut t = task().for_key_result(0, 10);
        let tr = t.complete(now).unwrap();
        assert_eq!(tr.from, TaskStatus::Pending);
        assert_eq!(tr.to, TaskStatus::Completed);
        assert!(tr.propagate);
        assert_eq!(t.completed_at, Some(now));
    }

    #[test]
    fn complete_without_key_result_does_not_propagate() {
        let mut t = task();
        assert!(!t.complete(Utc::now()).unwrap().propagate);

        let mut zero = task().for_key_result(1, 0);
        assert!(!zero.complete(Utc::now()).unwrap().propagate);
    }

    #[test]
    fn double_completion_is_rejected() {
        let mut t = task().for_key_result(0, 10);
        t.complete(Utc::now()).unwrap();
        assert!(matches!(
            t.complete(Utc::now()),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn reopen_clears_completion() {
        let mut t = task().for_key_result(0, 10);
        t.complete(Utc::now()).unwrap();
        let tr = t.reopen().unwrap();
        assert!(!tr.propagate);
        assert_eq!(t.status, TaskStatus::Pending);
        assert!(t.completed_at.is_none());
    }

    #[test]
    fn obstacle_round_trip() {
        let mut t = task();
        t.start().unwrap();
        t.block().unwrap();
        assert_eq!(t.status, TaskStatus::Blocked);
        t.unblock().unwrap();
        assert_eq!(t.status, TaskStatus::Pending);
    }

    #[test]
    fn failed_is_final_for_users() {
        let mut t = task();
        t.fail_stale().unwrap();
        assert!(t.reopen().is_err());
        assert!(t.start().is_err());
        assert!(t.complete(Utc::now()).is_err());
        assert!(t.block().is_err());
    }

    #[test]
    fn blocked_tasks_are_not_swept() {
        let mut t = task();
        t.block().unwrap();
        assert!(t.fail_stale().is_err());
    }

    #[test]
    fn completion_event_requires_contribution() {
        assert!(task().completion_event().is_none());
        let ev = task().for_key_result(2, 15).completion_event().unwrap();
        assert_eq!(ev.key_result_index, 2);
        assert_eq!(ev.progress_contribution, 15);
    }

    #[test]
    fn deserializes_with_defaults() {
        let t: DailyTask = serde_json::from_str(
            r#"{"okr_id": "o", "title": "t", "task_date": "2026-03-02", "priority": 9}"#,
        )
        .unwrap();
        assert_eq!(t.priority, Priority::LOWEST);
        assert_eq!(t.estimated_duration, DEFAULT_TASK_MINUTES);
        assert_eq!(t.status, TaskStatus::Pending);
    }
}
