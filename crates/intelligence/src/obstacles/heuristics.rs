use learnpath_core::ObstacleType;

const KNOWLEDGE_KEYWORDS: [&str; 3] = ["learn", "master", "understand"];
const TECHNICAL_KEYWORDS: [&str; 3] = ["code", "programming", "technical"];
const RESOURCE_KEYWORDS: [&str; 3] = ["material", "tool", "environment"];

/// Likely blockers for a task that has been sitting open.
///
/// Age-based guesses come first, then keyword matches on the title. Never
/// empty: with no signal at all the answer is time management.
pub fn suggest_obstacle_types(title: &str, days_since_created: i64) -> Vec<ObstacleType> {
    let mut suggestions = Vec::new();

    if days_since_created >= 7 {
        suggestions.push(ObstacleType::Motivation);
    }
    if days_since_created >= 5 {
        suggestions.push(ObstacleType::TimeManagement);
    }

    let title = title.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| title.contains(w));
    if mentions(&KNOWLEDGE_KEYWORDS) {
        suggestions.push(ObstacleType::KnowledgeGap);
    }
    if mentions(&TECHNICAL_KEYWORDS) {
        suggestions.push(ObstacleType::TechnicalIssue);
    }
    if mentions(&RESOURCE_KEYWORDS) {
        suggestions.push(ObstacleType::ResourceLack);
    }

    if suggestions.is_empty() {
        suggestions.push(ObstacleType::TimeManagement);
    }
    suggestions
}

/// Check-in message for a stale task, escalating with age.
pub fn proactive_message(title: &str, days_since_created: i64) -> String {
    match days_since_created {
        d if d >= 7 => format!(
            "Task \"{title}\" was created {d} days ago. Have you run into a problem? \
I can help analyze possible obstacles and suggest solutions."
        ),
        d if d >= 5 => format!(
            "Task \"{title}\" has been open for {d} days. Would you like help working out \
what is getting in the way?"
        ),
        d if d >= 3 => format!(
            "Task \"{title}\" seems to be moving slowly. Want me to look at possible causes?"
        ),
        _ => format!("Need a hand with task \"{title}\"? I can help analyze possible obstacles."),
    }
}
