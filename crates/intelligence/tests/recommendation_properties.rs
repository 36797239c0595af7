use learnpath_core::{
    DifficultyLevel, Interaction, InteractionType, Platform, Resource, ResourceType,
    UserPreferences,
};
use learnpath_intelligence::{RecommendationScorer, Scorer};
use learnpath_test_utils::{resource, resource_for_obstacles};

/// Preferences that match nothing the plain fixture resource carries.
fn unrelated_preferences() -> UserPreferences {
    UserPreferences {
        preferred_platforms: vec![Platform::Youtube],
        preferred_resource_types: vec![ResourceType::Video],
        preferred_difficulty: Some(DifficultyLevel::Advanced),
        preferred_language: None,
        topics_of_interest: vec!["haskell".into()],
    }
}

/// Scorer for a user who has already touched the resource, so novelty is off.
fn seen_scorer(resource_id: i64) -> RecommendationScorer {
    RecommendationScorer::new()
        .with_preferences(Some(unrelated_preferences()))
        .with_interactions(&[Interaction::new("u1", resource_id, InteractionType::View)])
}

#[test]
fn quality_alone_is_the_score() {
    let scored = seen_scorer(1).score(&resource(1, 70));
    assert_eq!(scored.relevance_score, 70);
    assert_eq!(scored.recommendation_reason, "Base quality score: 70");
}

#[test]
fn obstacle_match_adds_twenty() {
    let scored = seen_scorer(1)
        .with_obstacle(Some("knowledge_gap"))
        .score(&resource_for_obstacles(1, 60, &["knowledge_gap"]));
    assert_eq!(scored.relevance_score, 80);
    assert_eq!(
        scored.recommendation_reason,
        "Base quality score: 60; Helps with knowledge gap"
    );
}

#[test]
fn score_is_clamped_at_one_hundred() {
    let candidate = Resource {
        platform: Platform::Youtube,
        resource_type: ResourceType::Video,
        difficulty_level: DifficultyLevel::Advanced,
        ..resource_for_obstacles(1, 95, &["motivation"])
    };
    let scored = RecommendationScorer::new()
        .with_preferences(Some(unrelated_preferences()))
        .with_obstacle(Some("motivation"))
        .score(&candidate);
    // 95 + 20 + 30 + 5 = 150
    assert_eq!(scored.relevance_score, 100);
    assert_eq!(scored.score_breakdown.total(), 150.0);
}

#[test]
fn overlapping_tags_credit_a_topic_once() {
    let candidate = Resource {
        tags: vec!["Python".into(), "python basics".into()],
        ..resource(1, 50)
    };
    let prefs = UserPreferences {
        topics_of_interest: vec!["python".into()],
        ..Default::default()
    };
    let scored = RecommendationScorer::new()
        .with_preferences(Some(prefs))
        .with_interactions(&[Interaction::new("u1", 1, InteractionType::View)])
        .score(&candidate);
    assert_eq!(scored.relevance_score, 55);
}

#[test]
fn shared_tag_does_not_starve_a_second_topic() {
    let candidate = Resource {
        tags: vec!["python go".into(), "golang".into()],
        ..resource(1, 50)
    };
    let prefs = UserPreferences {
        topics_of_interest: vec!["go".into(), "python".into()],
        ..Default::default()
    };
    let scored = RecommendationScorer::new()
        .with_preferences(Some(prefs))
        .with_interactions(&[Interaction::new("u1", 1, InteractionType::View)])
        .score(&candidate);
    assert_eq!(scored.relevance_score, 60);
    assert!(scored
        .recommendation_reason
        .ends_with("Matches interests: go, python"));
}

#[test]
fn equal_scores_keep_input_order() {
    let candidates: Vec<_> = (1..=6).map(|id| resource(id, 60)).collect();
    let ranked = RecommendationScorer::new().rank(&candidates);
    let ids: Vec<i64> = ranked.iter().map(|s| s.resource.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn rating_above_user_average_is_rewarded() {
    let candidate = Resource {
        rating: Some(4.5),
        ..resource(9, 50)
    };
    let history = [
        Interaction::new("u1", 1, InteractionType::Rate).with_rating(3),
        Interaction::new("u1", 2, InteractionType::Rate).with_rating(4),
        Interaction::new("u1", 9, InteractionType::View),
    ];
    let scored = RecommendationScorer::new()
        .with_interactions(&history)
        .score(&candidate);
    // average 3.5, (4.5 - 3.5) * 5 = 5
    assert_eq!(scored.relevance_score, 55);
    assert!(scored.recommendation_reason.contains("Highly rated (4.5 stars)"));
}

#[test]
fn recommend_truncates_after_ranking() {
    let candidates = vec![resource(1, 40), resource(2, 90), resource(3, 70)];
    let top = RecommendationScorer::new().recommend(&candidates, 2);
    let ids: Vec<i64> = top.iter().map(|s| s.resource.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn missing_quality_uses_neutral_baseline() {
    let candidate = Resource {
        quality_score: None,
        ..resource(1, 0)
    };
    assert_eq!(seen_scorer(1).score(&candidate).relevance_score, 50);
}
