//! Personalized learning-resource recommendations.

mod explainer;
mod scorer;

pub use explainer::{generate_explanation, summarize_recommendations};
pub use scorer::{RecommendationScorer, Scorer};

use learnpath_core::Resource;
use serde::{Deserialize, Serialize};

/// A resource with its relevance score and justification.
///
/// Serializes as the resource's own fields plus `relevance_score` and
/// `recommendation_reason`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResource {
    #[serde(flatten)]
    pub resource: Resource,
    /// Clamped, rounded score (0 - 100).
    pub relevance_score: u8,
    /// Every rule that fired, joined by "; ".
    pub recommendation_reason: String,
    /// Raw score components before clamping.
    #[serde(skip)]
    pub score_breakdown: ScoreBreakdown,
    /// Rules that fired, in explanation order.
    #[serde(skip)]
    pub signals: Vec<RecommendationSignal>,
}

/// Breakdown of recommendation score components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Intrinsic quality baseline.
    pub quality_score: f64,
    /// Bonus for helping with the requested obstacle.
    pub obstacle_score: f64,
    /// Platform, type, difficulty and topic matches.
    pub preference_score: f64,
    /// Rating above the user's own average.
    pub collaborative_score: f64,
    /// Bonus for content the user has never touched.
    pub novelty_score: f64,
}

impl ScoreBreakdown {
    /// Unclamped total.
    pub fn total(&self) -> f64 {
        self.quality_score
            + self.obstacle_score
            + self.preference_score
            + self.collaborative_score
            + self.novelty_score
    }
}

/// Rules that contribute to a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecommendationSignal {
    /// Always present: the resource's quality baseline.
    BaseQuality {
        /// Quality score (0 - 100).
        score: u8,
    },
    /// Resource is tagged as helping with the requested obstacle.
    ObstacleMatch {
        /// Obstacle tag.
        obstacle: String,
    },
    /// Platform is one the user prefers.
    PlatformMatch,
    /// Resource type is one the user prefers.
    ResourceTypeMatch,
    /// Difficulty equals the user's preferred difficulty.
    DifficultyMatch,
    /// Tags overlap with the user's topics of interest.
    TopicMatch {
        /// Topics that were credited, one tag each.
        topics: Vec<String>,
    },
    /// Rated higher than the user's own average rating.
    HighlyRated {
        /// Resource rating (0 - 5).
        rating: f64,
        /// The user's mean rating (3.0 when unknown).
        user_average: f64,
    },
    /// The user has no interaction with this resource.
    Novel,
}

impl RecommendationSignal {
    /// Get a short label for this signal.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BaseQuality { .. } => "base-quality",
            Self::ObstacleMatch { .. } => "obstacle-match",
            Self::PlatformMatch => "platform-match",
            Self::ResourceTypeMatch => "resource-type-match",
            Self::DifficultyMatch => "difficulty-match",
            Self::TopicMatch { .. } => "topic-match",
            Self::HighlyRated { .. } => "highly-rated",
            Self::Novel => "novel",
        }
    }
}

/// Row the caller upserts per (user, resource) after recommending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub user_id: String,
    pub resource_id: i64,
    pub recommendation_reason: String,
    pub relevance_score: u8,
    pub obstacle_match: Option<String>,
}

impl RecommendationRecord {
    /// Build the records for a ranked list.
    pub fn from_ranked(
        user_id: &str,
        ranked: &[ScoredResource],
        obstacle: Option<&str>,
    ) -> Vec<Self> {
        ranked
            .iter()
            .map(|scored| Self {
                user_id: user_id.to_string(),
                resource_id: scored.resource.id,
                recommendation_reason: scored.recommendation_reason.clone(),
                relevance_score: scored.relevance_score,
                obstacle_match: obstacle.map(str::to_string),
            })
            .collect()
    }
}
