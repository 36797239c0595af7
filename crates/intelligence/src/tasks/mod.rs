//! Daily task generation with a deterministic fallback.
//!
//! The language model is one [`TaskGenerator`]; any failure it reports is
//! answered by [`fallback_tasks`], so callers always receive a task list.

mod fallback;
mod generator;
mod materialize;
mod parser;
mod prompt;

pub use fallback::{fail_stale_tasks, fallback_tasks, FALLBACK_TASK_LIMIT};
pub use generator::{
    generate_or_fallback, ChatCompletionsGenerator, GenerationOutcome, TaskGenerator,
};
pub use materialize::materialize_tasks;
pub use parser::parse_generated_tasks;
pub use prompt::{build_generation_prompt, SYSTEM_PROMPT};

use learnpath_core::lenient;
use serde::{Deserialize, Serialize};

/// One task as produced by the model (or the fallback), before it is bound to
/// an OKR and a date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTask {
    pub title: String,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::int_or_none")]
    pub priority: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int_or_none")]
    pub estimated_duration: Option<i64>,
    #[serde(
        default,
        rename = "relatedKRIndex",
        deserialize_with = "lenient::int_or_none"
    )]
    pub related_kr_index: Option<i64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub okr_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::int_or_none")]
    pub progress_contribution: Option<i64>,
}

/// Envelope the model is asked to return: `{"tasks": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTasks {
    pub tasks: Vec<GeneratedTask>,
}

impl GeneratedTasks {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Why the model did not produce usable tasks.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("task generator request failed: {0}")]
    Transport(String),
    #[error("task generator returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("task generator returned no content")]
    EmptyResponse,
    #[error("task generator output is not valid task JSON: {0}")]
    Unparsable(String),
    #[error("task generator is not configured: {0}")]
    NotConfigured(String),
}

/// Which path produced a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    Ai,
    Fallback,
}
