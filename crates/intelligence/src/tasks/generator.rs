use async_trait::async_trait;
use learnpath_core::{CoreError, DailyTask, GeneratedBy, Okr, TaskType};
use learnpath_state::LlmConfig;
use reqwest::Url;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{
    build_generation_prompt, fallback_tasks, materialize_tasks, parse_generated_tasks,
    GeneratedTasks, GenerationFailure, TaskSource, SYSTEM_PROMPT,
};

const TEMPERATURE: f64 = 0.7;

/// Produces tasks for a prompt. The only network-facing seam in task
/// generation.
#[async_trait]
pub trait TaskGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedTasks, GenerationFailure>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsGenerator {
    api_key: String,
    endpoint: Url,
    model: String,
    client: reqwest::Client,
}

impl ChatCompletionsGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self, GenerationFailure> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                GenerationFailure::NotConfigured("LEARNPATH_LLM_API_KEY is not set".into())
            })?;

        // Url::join drops the last path segment unless the base ends with '/'.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)
            .and_then(|b| b.join("chat/completions"))
            .map_err(|e| {
                GenerationFailure::NotConfigured(format!(
                    "invalid base url {}: {e}",
                    config.base_url
                ))
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationFailure::Transport(e.to_string()))?;

        Ok(Self {
            api_key,
            endpoint,
            model: config.model.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TaskGenerator for ChatCompletionsGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedTasks, GenerationFailure> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": TEMPERATURE,
        });

        debug!(endpoint = %self.endpoint, model = %self.model, "requesting tasks");
        let resp = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationFailure::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GenerationFailure::Transport(e.to_string()))?;
        let parsed: Value = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "raw": text }));

        if !status.is_success() {
            let message = parsed
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("task generation call failed")
                .to_string();
            return Err(GenerationFailure::Status {
                status: status.as_u16(),
                message,
            });
        }

        let content = extract_message_text(&parsed)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationFailure::EmptyResponse)?;
        parse_generated_tasks(&content)
    }
}

fn extract_message_text(val: &Value) -> Option<String> {
    let content = val
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))?;
    if let Some(s) = content.as_str() {
        return Some(s.to_string());
    }
    let parts = content.as_array()?;
    let mut buf = String::new();
    for part in parts {
        if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
            buf.push_str(text);
        }
    }
    Some(buf)
}

/// Result of one generation round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub source: TaskSource,
    pub tasks: GeneratedTasks,
    /// Why the model output was not used, when the fallback ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(skip)]
    pub prompt: String,
}

impl GenerationOutcome {
    /// Bind the tasks to OKRs and a date. Fallback tasks are marked as
    /// system-generated.
    pub fn into_daily_tasks(
        self,
        okrs: &[Okr],
        task_date: chrono::NaiveDate,
        task_type: TaskType,
    ) -> Vec<DailyTask> {
        let mut tasks = materialize_tasks(&self.tasks, okrs, task_date, task_type);
        if self.source == TaskSource::Fallback {
            for task in &mut tasks {
                task.generated_by = GeneratedBy::System;
            }
        }
        tasks
    }
}

/// Ask `generator` for tasks and fall back to [`fallback_tasks`] on any
/// failure, including an empty task list.
///
/// Fails only when there is no OKR to plan for.
pub async fn generate_or_fallback(
    generator: Option<&dyn TaskGenerator>,
    okrs: &[Okr],
    previous: &[DailyTask],
    task_type: TaskType,
) -> Result<GenerationOutcome, CoreError> {
    if okrs.is_empty() {
        return Err(CoreError::validation(
            "create an OKR before generating tasks",
        ));
    }
    let prompt = build_generation_prompt(okrs, previous, task_type);

    let result = match generator {
        Some(generator) => generator.generate(&prompt).await,
        None => Err(GenerationFailure::NotConfigured(
            "no task generator available".into(),
        )),
    };

    let outcome = match result {
        Ok(tasks) if !tasks.is_empty() => {
            info!(count = tasks.len(), "generated tasks");
            GenerationOutcome {
                source: TaskSource::Ai,
                tasks,
                failure: None,
                prompt,
            }
        }
        Ok(_) => fallback(okrs, prompt, GenerationFailure::EmptyResponse),
        Err(failure) => fallback(okrs, prompt, failure),
    };
    Ok(outcome)
}

fn fallback(okrs: &[Okr], prompt: String, failure: GenerationFailure) -> GenerationOutcome {
    warn!(error = %failure, "task generation failed; using fallback tasks");
    GenerationOutcome {
        source: TaskSource::Fallback,
        tasks: fallback_tasks(okrs),
        failure: Some(failure.to_string()),
        prompt,
    }
}
