//! Generate human-readable explanations for recommendations.

use learnpath_core::ObstacleType;

use super::RecommendationSignal;

/// Generate a human-readable explanation from recommendation signals.
pub fn generate_explanation(signals: &[RecommendationSignal]) -> String {
    if signals.is_empty() {
        return "Recommended resource".to_string();
    }

    let mut parts = Vec::new();

    for signal in signals {
        let part = match signal {
            RecommendationSignal::BaseQuality { score } => {
                format!("Base quality score: {}", score)
            }
            RecommendationSignal::ObstacleMatch { obstacle } => {
                format!("Helps with {}", obstacle_name(obstacle))
            }
            RecommendationSignal::PlatformMatch => "Matches preferred platform".to_string(),
            RecommendationSignal::ResourceTypeMatch => {
                "Matches preferred resource type".to_string()
            }
            RecommendationSignal::DifficultyMatch => "Matches preferred difficulty".to_string(),
            RecommendationSignal::TopicMatch { topics } => {
                format!("Matches interests: {}", topics.join(", "))
            }
            RecommendationSignal::HighlyRated { rating, .. } => {
                format!("Highly rated ({:.1} stars)", rating)
            }
            RecommendationSignal::Novel => "New to you".to_string(),
        };
        parts.push(part);
    }

    parts.join("; ")
}

/// Readable name for an obstacle tag; unknown tags are shown verbatim.
fn obstacle_name(tag: &str) -> String {
    tag.parse::<ObstacleType>()
        .map(|t| t.display_name().to_string())
        .unwrap_or_else(|_| tag.to_string())
}

/// Generate a summary of a recommendation run.
pub fn summarize_recommendations(
    count: usize,
    has_preferences: bool,
    obstacle: Option<&str>,
) -> String {
    let mut parts = Vec::new();

    parts.push(format!("Found {} recommendations", count));

    if has_preferences {
        parts.push("personalized to your preferences".to_string());
    }

    if let Some(obstacle) = obstacle {
        parts.push(format!("focused on {}", obstacle_name(obstacle)));
    }

    parts.join(", ")
}
