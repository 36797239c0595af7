//! Obstacle suggestions for tasks that stall.

mod analysis;
mod heuristics;

pub use analysis::{fallback_analysis, ObstacleAnalysis};
pub use heuristics::{proactive_message, suggest_obstacle_types};

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use learnpath_core::{DailyTask, Obstacle, ObstacleType, TaskStatus};
use serde::{Deserialize, Serialize};

/// At most this many stale tasks are surfaced per check.
pub const STALE_TASK_LIMIT: usize = 5;

/// A stalled task together with the help to offer for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleTaskSuggestion {
    pub task_id: i64,
    pub task_title: String,
    pub days_since_created: i64,
    pub suggested_obstacle_types: Vec<ObstacleType>,
    pub message: String,
}

/// Pending or in-progress tasks older than `min_age_days` that have no
/// obstacle on record, oldest first.
///
/// Tasks without `created_at` are aged from the start of their task date.
pub fn find_stale_tasks(
    tasks: &[DailyTask],
    obstacles: &[Obstacle],
    now: DateTime<Utc>,
    min_age_days: u32,
) -> Vec<StaleTaskSuggestion> {
    let reported: HashSet<i64> = obstacles.iter().map(|o| o.task_id).collect();
    let mut stale: Vec<(DateTime<Utc>, &DailyTask)> = tasks
        .iter()
        .filter(|t| matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress))
        .filter(|t| !reported.contains(&t.id))
        .map(|t| (created_at(t), t))
        .filter(|(created, _)| (now - *created).num_days() >= i64::from(min_age_days))
        .collect();
    stale.sort_by_key(|(created, _)| *created);

    stale
        .into_iter()
        .take(STALE_TASK_LIMIT)
        .map(|(created, task)| {
            let days = (now - created).num_days();
            StaleTaskSuggestion {
                task_id: task.id,
                task_title: task.title.clone(),
                days_since_created: days,
                suggested_obstacle_types: suggest_obstacle_types(&task.title, days),
                message: proactive_message(&task.title, days),
            }
        })
        .collect()
}

fn created_at(task: &DailyTask) -> DateTime<Utc> {
    task.created_at
        .unwrap_or_else(|| task.task_date.and_time(chrono::NaiveTime::MIN).and_utc())
}
