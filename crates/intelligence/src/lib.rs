//! Study-planning intelligence for learnpath.
//!
//! This crate provides:
//! - Personalized learning-resource recommendations with explanations
//! - Key-result progress propagation from task completion and manual updates
//! - Daily task generation through an LLM seam with a deterministic fallback
//! - Obstacle suggestions for stalled tasks

pub mod obstacles;
pub mod progress;
pub mod recommend;
pub mod tasks;

pub use obstacles::{
    fallback_analysis, find_stale_tasks, proactive_message, suggest_obstacle_types,
    ObstacleAnalysis, StaleTaskSuggestion, STALE_TASK_LIMIT,
};
pub use progress::{
    commit_history, fallback_contribution, BatchEntry, BatchOutcome, ProgressPropagator,
    ProgressUpdate, SkippedEntry,
};
pub use recommend::{
    generate_explanation, summarize_recommendations, RecommendationRecord,
    RecommendationScorer, RecommendationSignal, ScoreBreakdown, ScoredResource, Scorer,
};
pub use tasks::{
    build_generation_prompt, fail_stale_tasks, fallback_tasks, generate_or_fallback,
    materialize_tasks, parse_generated_tasks, ChatCompletionsGenerator, GeneratedTask,
    GeneratedTasks, GenerationFailure, GenerationOutcome, TaskGenerator, TaskSource,
};
