use tracing::debug;

use super::{GeneratedTasks, GenerationFailure};

const FENCE: &str = "```";

/// Extract the task envelope from free-form model output.
///
/// Tried in order: the whole text as JSON, a ```` ```json ```` block, any
/// fenced block, then the span from the first `{` to the last `}`.
pub fn parse_generated_tasks(raw: &str) -> Result<GeneratedTasks, GenerationFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GenerationFailure::EmptyResponse);
    }

    let candidates = [
        Some(trimmed),
        fenced_block(trimmed, "```json"),
        fenced_block(trimmed, FENCE),
        outermost_object(trimmed),
    ];

    let mut last_error = String::from("no JSON object found");
    for candidate in candidates.into_iter().flatten() {
        match serde_json::from_str::<GeneratedTasks>(candidate) {
            Ok(tasks) => return Ok(tasks),
            Err(err) => {
                debug!(error = %err, "candidate is not task JSON");
                last_error = err.to_string();
            }
        }
    }
    Err(GenerationFailure::Unparsable(last_error))
}

/// Body between `opener` and the next closing fence, trimmed.
fn fenced_block<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find(FENCE)?;
    Some(rest[..end].trim())
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"tasks":[{"title":"Read chapter 4","priority":2,"relatedKRIndex":0}]}"#;

    #[test]
    fn direct_json() {
        let tasks = parse_generated_tasks(BODY).unwrap();
        assert_eq!(tasks.tasks[0].title, "Read chapter 4");
    }

    #[test]
    fn json_fence() {
        let raw = format!("Here you go:\n```json\n{BODY}\n```\nGood luck!");
        assert_eq!(parse_generated_tasks(&raw).unwrap().len(), 1);
    }

    #[test]
    fn bare_fence() {
        let raw = format!("```\n{BODY}\n```");
        assert_eq!(parse_generated_tasks(&raw).unwrap().len(), 1);
    }

    #[test]
    fn embedded_object() {
        let raw = format!("Sure! {BODY} Let me know if you need more.");
        assert_eq!(parse_generated_tasks(&raw).unwrap().len(), 1);
    }

    #[test]
    fn float_priority_parses() {
        let raw = r#"```json
{"tasks":[{"title":"Review","priority":2.0,"estimatedDuration":30.0}]}
```"#;
        let tasks = parse_generated_tasks(raw).unwrap();
        assert_eq!(tasks.tasks[0].priority, Some(2));
        assert_eq!(tasks.tasks[0].estimated_duration, Some(30));
    }

    #[test]
    fn prose_is_unparsable() {
        let err = parse_generated_tasks("I cannot help with that.").unwrap_err();
        assert!(matches!(err, GenerationFailure::Unparsable(_)));
    }

    #[test]
    fn object_without_tasks_is_unparsable() {
        let err = parse_generated_tasks(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, GenerationFailure::Unparsable(_)));
    }

    #[test]
    fn blank_is_empty_response() {
        assert_eq!(
            parse_generated_tasks("  \n ").unwrap_err(),
            GenerationFailure::EmptyResponse
        );
    }
}
