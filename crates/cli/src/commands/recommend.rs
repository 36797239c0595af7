//! CLI handler for the `recommend` command.

use anyhow::Result;
use learnpath_core::{Interaction, Resource, UserPreferences};
use learnpath_intelligence::{
    summarize_recommendations, RecommendationRecord, RecommendationScorer, Scorer,
};
use learnpath_state::Settings;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::info;

use super::{read_json, read_json_rows};

/// Handle the `recommend` command.
#[allow(clippy::too_many_arguments)]
pub fn handle_recommend_command(
    settings: &Settings,
    resources: PathBuf,
    preferences: Option<PathBuf>,
    interactions: Option<PathBuf>,
    user: Option<String>,
    obstacle: Option<String>,
    limit: Option<usize>,
) -> Result<Value> {
    let candidates: Vec<Resource> = read_json_rows(&resources)?;
    let preferences: Option<UserPreferences> = preferences
        .as_deref()
        .map(read_json)
        .transpose()?;
    let mut history: Vec<Interaction> = match interactions.as_deref() {
        Some(path) => read_json_rows(path)?,
        None => Vec::new(),
    };
    if let Some(user) = user.as_deref() {
        history.retain(|i| i.user_id == user);
    }

    let has_preferences = preferences.is_some();
    let scorer = RecommendationScorer::new()
        .with_preferences(preferences)
        .with_interactions(&history)
        .with_obstacle(obstacle.as_deref());

    let limit = limit.filter(|&n| n > 0).unwrap_or(settings.recommend_limit);
    let ranked = scorer.recommend(&candidates, limit);
    info!(
        candidates = candidates.len(),
        returned = ranked.len(),
        limit,
        "ranked resources"
    );

    let records = user
        .as_deref()
        .map(|u| RecommendationRecord::from_ranked(u, &ranked, obstacle.as_deref()))
        .unwrap_or_default();

    Ok(json!({
        "summary": summarize_recommendations(ranked.len(), has_preferences, obstacle.as_deref()),
        "recommendations": ranked,
        "records": records,
    }))
}
