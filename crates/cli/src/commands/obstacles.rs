//! CLI handlers for obstacle help.

use anyhow::Result;
use chrono::Utc;
use learnpath_core::{DailyTask, Obstacle, ObstacleType};
use learnpath_intelligence::{fallback_analysis, find_stale_tasks};
use learnpath_state::Settings;
use serde_json::{json, Value};
use std::path::PathBuf;

use super::{read_json, read_optional_json};

/// Handle the `obstacles` command.
pub fn handle_obstacles_command(obstacle_type: &str) -> Result<Value> {
    let obstacle_type: ObstacleType = obstacle_type.parse()?;
    let analysis = fallback_analysis(obstacle_type);
    Ok(json!({
        "obstacle_type": obstacle_type,
        "name": obstacle_type.display_name(),
        "analysis": analysis.analysis,
        "solutions": analysis.solutions,
    }))
}

/// Handle the `stale-tasks` command.
pub fn handle_stale_tasks_command(
    settings: &Settings,
    tasks: PathBuf,
    obstacles: Option<PathBuf>,
    min_days: Option<u32>,
) -> Result<Value> {
    let tasks: Vec<DailyTask> = read_json(&tasks)?;
    let obstacles: Vec<Obstacle> = read_optional_json(obstacles.as_deref())?;
    let min_days = min_days.unwrap_or(settings.stale_days);
    let stale = find_stale_tasks(&tasks, &obstacles, Utc::now(), min_days);
    Ok(json!({ "min_days": min_days, "stale_tasks": stale }))
}
