use learnpath_core::{DailyTask, Okr, TaskType};
use serde_json::{json, Value};

/// System message sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are a JSON API. Return only valid JSON with no explanation \
or extra text. Generate a list of study tasks from the user's OKR goals.";

/// User message asking for three or four tasks tied to the given OKRs.
///
/// `previous` is yesterday's task list, summarized so the model can follow up
/// on unfinished work.
pub fn build_generation_prompt(okrs: &[Okr], previous: &[DailyTask], task_type: TaskType) -> String {
    let okr_summary: Vec<Value> = okrs
        .iter()
        .map(|okr| {
            let key_results: Vec<Value> = okr
                .key_results
                .iter()
                .enumerate()
                .map(|(index, kr)| {
                    json!({ "index": index, "text": kr.text, "progress": kr.progress.value() })
                })
                .collect();
            json!({ "objective": okr.objective, "keyResults": key_results })
        })
        .collect();

    let previous_summary = if previous.is_empty() {
        "No tasks recorded for the previous day".to_string()
    } else {
        let rows: Vec<Value> = previous
            .iter()
            .map(|t| {
                json!({
                    "title": t.title,
                    "status": t.status.as_str(),
                    "priority": t.priority.value(),
                    "relatedKR": t.key_result_index,
                })
            })
            .collect();
        pretty(&Value::Array(rows))
    };

    let cadence = match task_type {
        TaskType::Daily => "daily",
        TaskType::Weekly => "weekly",
    };
    let okr_id = okrs.first().map(|o| o.id.as_str()).unwrap_or_default();

    format!(
        r#"You are an experienced study planner. Generate today's study tasks from the user's OKR goals.

User OKRs:
{okrs}

Previous day's tasks:
{previous_summary}

Generate 3-4 concrete, actionable {cadence} tasks. Requirements:
1. Each task relates directly to an OKR key result
2. Priority 1-5 (1 is highest)
3. Estimated completion time in minutes
4. Progress contribution: percentage points completing the task adds to its key result (5-20)
5. Tasks are specific and actionable

**Important: return JSON only, no explanatory text**

JSON format:
{{
  "tasks": [
    {{
      "title": "Concrete task title",
      "description": "Detailed description",
      "priority": 2,
      "estimatedDuration": 60,
      "relatedKRIndex": 0,
      "okrId": "{okr_id}",
      "progressContribution": 10
    }}
  ]
}}"#,
        okrs = pretty(&Value::Array(okr_summary)),
    )
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use learnpath_core::KeyResult;

    fn okr() -> Okr {
        Okr::new("okr-42", "Ship a Rust CLI")
            .with_key_result(KeyResult::new("Write the parser").with_progress(30))
    }

    #[test]
    fn prompt_lists_okrs_and_target_id() {
        let prompt = build_generation_prompt(&[okr()], &[], TaskType::Daily);
        assert!(prompt.contains("Ship a Rust CLI"));
        assert!(prompt.contains("\"progress\": 30"));
        assert!(prompt.contains("\"okrId\": \"okr-42\""));
        assert!(prompt.contains("No tasks recorded for the previous day"));
        assert!(prompt.contains("3-4 concrete, actionable daily tasks"));
    }

    #[test]
    fn prompt_summarizes_previous_tasks() {
        let prev = DailyTask::new(
            "okr-42",
            "Sketch grammar",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        )
        .for_key_result(0, 10);
        let prompt = build_generation_prompt(&[okr()], &[prev], TaskType::Weekly);
        assert!(prompt.contains("Sketch grammar"));
        assert!(prompt.contains("\"status\": \"pending\""));
        assert!(prompt.contains("\"relatedKR\": 0"));
        assert!(prompt.contains("weekly tasks"));
    }

    #[test]
    fn prompt_without_okrs_has_empty_id() {
        let prompt = build_generation_prompt(&[], &[], TaskType::Daily);
        assert!(prompt.contains("\"okrId\": \"\""));
    }
}
