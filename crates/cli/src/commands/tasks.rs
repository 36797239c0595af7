//! CLI handlers for task planning.

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate, Utc};
use learnpath_core::{DailyTask, Okr, TaskType};
use learnpath_intelligence::{
    fail_stale_tasks, fallback_tasks, generate_or_fallback, ChatCompletionsGenerator,
    GenerationOutcome, TaskGenerator,
};
use learnpath_state::Settings;
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::{read_json, read_optional_json};
use crate::cli::Cadence;

impl From<Cadence> for TaskType {
    fn from(cadence: Cadence) -> Self {
        match cadence {
            Cadence::Daily => TaskType::Daily,
            Cadence::Weekly => TaskType::Weekly,
        }
    }
}

/// Handle the `fallback-tasks` command.
pub fn handle_fallback_tasks_command(okr: PathBuf) -> Result<Value> {
    let okr: Okr = read_json(&okr)?;
    let tasks = fallback_tasks(std::slice::from_ref(&okr));
    Ok(json!({ "okr_id": okr.id, "tasks": tasks.tasks }))
}

/// Handle the `generate-tasks` command.
pub fn handle_generate_tasks_command(
    settings: &Settings,
    okrs: PathBuf,
    previous: Option<PathBuf>,
    cadence: Cadence,
    date: Option<NaiveDate>,
) -> Result<Value> {
    let okrs: Vec<Okr> = read_json(&okrs)?;
    let mut previous: Vec<DailyTask> = read_optional_json(previous.as_deref())?;
    let task_date = date.unwrap_or_else(|| Utc::now().date_naive());
    let task_type = TaskType::from(cadence);

    let yesterday = task_date - Duration::days(1);
    let yesterdays: Vec<DailyTask> = previous
        .iter()
        .filter(|t| t.task_date == yesterday)
        .cloned()
        .collect();

    let generator = match ChatCompletionsGenerator::new(&settings.llm) {
        Ok(generator) => Some(generator),
        Err(err) => {
            debug!(error = %err, "task generator unavailable");
            None
        }
    };

    let rt = Runtime::new()?;
    let outcome: GenerationOutcome = rt
        .block_on(generate_or_fallback(
            generator.as_ref().map(|g| g as &dyn TaskGenerator),
            &okrs,
            &yesterdays,
            task_type,
        ))
        .map_err(|e| anyhow!("task generation failed: {e}"))?;

    // The prompt saw yesterday's real statuses; unfinished ones fail only now.
    let failed = fail_stale_tasks(&mut previous, task_date);
    if !failed.is_empty() {
        info!(count = failed.len(), "marked stale tasks failed");
    }

    let source = outcome.source;
    let failure = outcome.failure.clone();
    let tasks = outcome.into_daily_tasks(&okrs, task_date, task_type);
    Ok(json!({
        "source": source,
        "failure": failure,
        "task_date": task_date,
        "failed_task_ids": failed,
        "previous_tasks": previous,
        "tasks": tasks,
    }))
}
