//! Multi-signal recommendation scoring.

use std::collections::{HashMap, HashSet};

use learnpath_core::{Interaction, Resource, UserPreferences};
use tracing::debug;

use super::{explainer, RecommendationSignal, ScoreBreakdown, ScoredResource};

/// Points for each rule.
const OBSTACLE_MATCH_BONUS: f64 = 20.0;
const PLATFORM_MATCH_BONUS: f64 = 10.0;
const RESOURCE_TYPE_MATCH_BONUS: f64 = 10.0;
const DIFFICULTY_MATCH_BONUS: f64 = 10.0;
const TOPIC_MATCH_BONUS: f64 = 5.0;
const RATING_WEIGHT: f64 = 5.0;
const NOVELTY_BONUS: f64 = 5.0;

/// Average assumed for users who have never rated anything.
const NEUTRAL_USER_RATING: f64 = 3.0;

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

/// Trait for computing recommendation scores.
pub trait Scorer {
    /// Score a single candidate.
    fn score(&self, resource: &Resource) -> ScoredResource;

    /// Score every candidate and sort by descending score. Equal scores keep
    /// their input order.
    fn rank(&self, candidates: &[Resource]) -> Vec<ScoredResource> {
        let mut scored: Vec<ScoredResource> = candidates.iter().map(|r| self.score(r)).collect();
        scored.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        scored
    }

    /// Rank and keep the top `limit`.
    fn recommend(&self, candidates: &[Resource], limit: usize) -> Vec<ScoredResource> {
        let mut ranked = self.rank(candidates);
        ranked.truncate(limit);
        ranked
    }
}

/// Recommendation scorer for one user at one point in time.
///
/// Candidates are expected to be pre-filtered by the caller; the scorer only
/// scores. Missing preference or interaction data disables the matching
/// rules and never fails.
#[derive(Debug, Default, Clone)]
pub struct RecommendationScorer {
    /// Stored preferences, if the user has any.
    preferences: Option<UserPreferences>,
    /// Mean of the user's own ratings, one per resource.
    user_average_rating: Option<f64>,
    /// Resources the user has interacted with in any way.
    seen: HashSet<i64>,
    /// Obstacle tag the user is trying to get past.
    obstacle: Option<String>,
}

impl RecommendationScorer {
    /// Create a new scorer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stored preferences.
    pub fn with_preferences(mut self, preferences: Option<UserPreferences>) -> Self {
        self.preferences = preferences;
        self
    }

    /// Add this user's interaction history.
    pub fn with_interactions(mut self, interactions: &[Interaction]) -> Self {
        let mut ratings: HashMap<i64, u8> = HashMap::new();
        for interaction in interactions {
            self.seen.insert(interaction.resource_id);
            if let Some(rating) = interaction.effective_rating() {
                ratings.insert(interaction.resource_id, rating);
            }
        }
        self.user_average_rating = if ratings.is_empty() {
            None
        } else {
            let sum: f64 = ratings.values().map(|&r| f64::from(r)).sum();
            Some(sum / ratings.len() as f64)
        };
        self
    }

    /// Restrict the obstacle bonus to resources tagged with `obstacle`.
    pub fn with_obstacle(mut self, obstacle: Option<&str>) -> Self {
        self.obstacle = obstacle
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string);
        self
    }

    /// Mean rating used for the collaborative signal.
    pub fn user_average_rating(&self) -> f64 {
        self.user_average_rating.unwrap_or(NEUTRAL_USER_RATING)
    }

    /// Collect every rule that fires for `resource`, in explanation order.
    pub fn collect_signals(&self, resource: &Resource) -> Vec<RecommendationSignal> {
        let mut signals = vec![RecommendationSignal::BaseQuality {
            score: resource.base_quality(),
        }];

        if let Some(ref obstacle) = self.obstacle {
            if resource.content_features.helps_with(obstacle) {
                signals.push(RecommendationSignal::ObstacleMatch {
                    obstacle: obstacle.clone(),
                });
            }
        }

        if let Some(ref prefs) = self.preferences {
            if prefs.prefers_platform(resource.platform) {
                signals.push(RecommendationSignal::PlatformMatch);
            }
            if prefs.prefers_resource_type(resource.resource_type) {
                signals.push(RecommendationSignal::ResourceTypeMatch);
            }
            if prefs.prefers_difficulty(resource.difficulty_level) {
                signals.push(RecommendationSignal::DifficultyMatch);
            }
            let topics = match_topics(&resource.tags, &prefs.topics_of_interest);
            if !topics.is_empty() {
                signals.push(RecommendationSignal::TopicMatch { topics });
            }
        }

        if let Some(rating) = resource.valid_rating() {
            let user_average = self.user_average_rating();
            if rating > user_average {
                signals.push(RecommendationSignal::HighlyRated {
                    rating,
                    user_average,
                });
            }
        }

        if !self.seen.contains(&resource.id) {
            signals.push(RecommendationSignal::Novel);
        }

        signals
    }
}

impl Scorer for RecommendationScorer {
    fn score(&self, resource: &Resource) -> ScoredResource {
        let signals = self.collect_signals(resource);
        let mut breakdown = ScoreBreakdown::default();

        for signal in &signals {
            match signal {
                RecommendationSignal::BaseQuality { score } => {
                    breakdown.quality_score = f64::from(*score);
                }
                RecommendationSignal::ObstacleMatch { .. } => {
                    breakdown.obstacle_score += OBSTACLE_MATCH_BONUS;
                }
                RecommendationSignal::PlatformMatch => {
                    breakdown.preference_score += PLATFORM_MATCH_BONUS;
                }
                RecommendationSignal::ResourceTypeMatch => {
                    breakdown.preference_score += RESOURCE_TYPE_MATCH_BONUS;
                }
                RecommendationSignal::DifficultyMatch => {
                    breakdown.preference_score += DIFFICULTY_MATCH_BONUS;
                }
                RecommendationSignal::TopicMatch { topics } => {
                    breakdown.preference_score += TOPIC_MATCH_BONUS * topics.len() as f64;
                }
                RecommendationSignal::HighlyRated {
                    rating,
                    user_average,
                } => {
                    breakdown.collaborative_score += (rating - user_average) * RATING_WEIGHT;
                }
                RecommendationSignal::Novel => {
                    breakdown.novelty_score += NOVELTY_BONUS;
                }
            }
        }

        let total = breakdown.total();
        let relevance_score = total.clamp(MIN_SCORE, MAX_SCORE).round() as u8;
        debug!(
            resource_id = resource.id,
            raw = total,
            relevance_score,
            "scored resource"
        );

        ScoredResource {
            resource: resource.clone(),
            relevance_score,
            recommendation_reason: explainer::generate_explanation(&signals),
            score_breakdown: breakdown,
            signals,
        }
    }
}

/// Case-insensitive substring match of topics against tags.
///
/// Each topic is credited at most once and each tag backs at most one topic.
/// Within those limits as many topics as possible are credited, so a tag that
/// matches several topics never blocks a topic that only it could back.
/// Credited topics keep their input order. Blank topics never match.
fn match_topics(tags: &[String], topics: &[String]) -> Vec<String> {
    let lowered: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
    let mut needles = HashSet::new();
    let candidates: Vec<(&String, Vec<usize>)> = topics
        .iter()
        .filter_map(|topic| {
            let needle = topic.trim().to_lowercase();
            if needle.is_empty() || !needles.insert(needle.clone()) {
                return None;
            }
            let hits: Vec<usize> = lowered
                .iter()
                .enumerate()
                .filter(|(_, tag)| tag.contains(&needle))
                .map(|(i, _)| i)
                .collect();
            (!hits.is_empty()).then_some((topic, hits))
        })
        .collect();

    // owner[tag] = candidate currently backed by that tag
    let mut owner: Vec<Option<usize>> = vec![None; lowered.len()];
    for candidate in 0..candidates.len() {
        let mut visited = vec![false; lowered.len()];
        assign_tag(candidate, &candidates, &mut owner, &mut visited);
    }

    let mut credited = vec![false; candidates.len()];
    for &candidate in owner.iter().flatten() {
        credited[candidate] = true;
    }
    candidates
        .iter()
        .zip(credited)
        .filter(|(_, credited)| *credited)
        .map(|((topic, _), _)| (*topic).clone())
        .collect()
}

/// Augmenting-path step: give `candidate` a tag, moving earlier owners to
/// other tags where they have one.
fn assign_tag(
    candidate: usize,
    candidates: &[(&String, Vec<usize>)],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &tag in &candidates[candidate].1 {
        if visited[tag] {
            continue;
        }
        visited[tag] = true;
        let free = match owner[tag] {
            None => true,
            Some(other) => assign_tag(other, candidates, owner, visited),
        };
        if free {
            owner[tag] = Some(candidate);
            return true;
        }
    }
    false
}
