use learnpath_core::{GeneratedBy, TaskStatus, TaskType};
use learnpath_intelligence::{
    fail_stale_tasks, generate_or_fallback, ChatCompletionsGenerator, TaskGenerator, TaskSource,
};
use learnpath_state::LlmConfig;
use learnpath_test_utils::{day, okr_with_progress, set_env_var, task_for};
use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
}

#[tokio::test]
#[serial]
async fn generator_configured_from_environment() {
    let server = MockServer::start().await;
    let content = r#"{"tasks":[
        {"title":"Read ownership chapter","priority":1,"estimatedDuration":40,"relatedKRIndex":0,"okrId":"okr-1","progressContribution":12},
        {"title":"Write a tiny CLI","relatedKRIndex":1,"okrId":"okr-1"}
    ]}"#;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/v1", server.uri());
    let _key = set_env_var("LEARNPATH_LLM_API_KEY", Some("sk-env"));
    let _url = set_env_var("LEARNPATH_LLM_BASE_URL", Some(&base));
    let _model = set_env_var("LEARNPATH_LLM_MODEL", None);

    let config = LlmConfig::from_env();
    assert_eq!(config.model, "grok-2-1212");
    let generator = ChatCompletionsGenerator::new(&config).unwrap();

    let okrs = vec![okr_with_progress("okr-1", &[10, 60])];
    let outcome = generate_or_fallback(
        Some(&generator as &dyn TaskGenerator),
        &okrs,
        &[],
        TaskType::Daily,
    )
    .await
    .unwrap();
    assert_eq!(outcome.source, TaskSource::Ai);

    let tasks = outcome.into_daily_tasks(&okrs, day(2026, 3, 2), TaskType::Daily);
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].priority.value(), 1);
    assert_eq!(tasks[0].estimated_duration, 40);
    assert_eq!(tasks[0].progress_contribution, 12);
    // Derived from the key result's 60% progress.
    assert_eq!(tasks[1].progress_contribution, 10);
    assert!(tasks.iter().all(|t| t.generated_by == GeneratedBy::Ai));
    assert!(tasks.iter().all(|t| t.status == TaskStatus::Pending));
}

#[tokio::test]
#[serial]
async fn unparsable_reply_yields_fallback_plan() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Here are some ideas: study more!")),
        )
        .mount(&server)
        .await;

    let _key = set_env_var("LEARNPATH_LLM_API_KEY", Some("sk-env"));
    let _url = set_env_var("LEARNPATH_LLM_BASE_URL", Some(&server.uri()));
    let generator = ChatCompletionsGenerator::new(&LlmConfig::from_env()).unwrap();

    let okrs = vec![okr_with_progress("okr-1", &[0, 50, 80])];
    let outcome = generate_or_fallback(Some(&generator), &okrs, &[], TaskType::Daily)
        .await
        .unwrap();
    assert_eq!(outcome.source, TaskSource::Fallback);
    let titles: Vec<&str> = outcome.tasks.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Start: Key result number 1...",
            "Continue: Key result number 2...",
            "Polish: Key result number 3...",
        ]
    );

    let tasks = outcome.into_daily_tasks(&okrs, day(2026, 3, 2), TaskType::Daily);
    assert!(tasks.iter().all(|t| t.generated_by == GeneratedBy::System));
    let contributions: Vec<u8> = tasks.iter().map(|t| t.progress_contribution).collect();
    assert_eq!(contributions, vec![15, 10, 5]);
}

#[tokio::test]
#[serial]
async fn missing_api_key_means_fallback_without_network() {
    let _key = set_env_var("LEARNPATH_LLM_API_KEY", None);
    let generator = ChatCompletionsGenerator::new(&LlmConfig::from_env()).ok();
    assert!(generator.is_none());

    let okrs = vec![okr_with_progress("okr-1", &[30])];
    let outcome = generate_or_fallback(
        generator.as_ref().map(|g| g as &dyn TaskGenerator),
        &okrs,
        &[],
        TaskType::Weekly,
    )
    .await
    .unwrap();
    assert_eq!(outcome.source, TaskSource::Fallback);
    assert_eq!(outcome.tasks.len(), 2);
    assert_eq!(outcome.tasks.tasks[1].title, "Plan: Become fluent in Rust");
}

#[test]
fn new_day_fails_yesterdays_open_tasks() {
    let mut yesterday = vec![task_for("okr-1", 0, 10), task_for("okr-1", 1, 10)];
    yesterday[0].id = 11;
    yesterday[1].id = 12;
    yesterday[1].complete(chrono::Utc::now()).unwrap();

    let failed = fail_stale_tasks(&mut yesterday, day(2026, 3, 3));
    assert_eq!(failed, vec![11]);
    assert_eq!(yesterday[0].status, TaskStatus::Failed);
    assert!(yesterday[0].reopen().is_err());
}
