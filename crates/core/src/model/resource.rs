//! Learning resource catalog entries.

use serde::{Deserialize, Serialize};

use crate::lenient;

/// Baseline quality assumed for resources without an editorial score.
pub const DEFAULT_QUALITY_SCORE: u8 = 50;

/// Hosting platform of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Youtube,
    Bilibili,
    Blog,
    Documentation,
    Course,
    #[default]
    #[serde(other)]
    Other,
}

/// Format of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Video,
    #[default]
    Article,
    Course,
    Tutorial,
    Documentation,
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Zh,
    En,
    #[default]
    #[serde(other)]
    Other,
}

/// Structured description of what a resource teaches and whom it helps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFeatures {
    pub topics: Vec<String>,
    pub prerequisites: Vec<String>,
    pub learning_outcomes: Vec<String>,
    /// Obstacle-type tags this resource helps with.
    pub suitable_for_obstacles: Vec<String>,
}

impl ContentFeatures {
    pub fn helps_with(&self, obstacle: &str) -> bool {
        self.suitable_for_obstacles.iter().any(|o| o == obstacle)
    }
}

/// A learning resource as stored in the catalog.
///
/// Absent or malformed fields take their defaults, so one bad column never
/// drops the row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub id: i64,
    pub title: String,
    #[serde(deserialize_with = "lenient::or_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::or_none")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub platform: Platform,
    #[serde(deserialize_with = "lenient::or_default")]
    pub resource_type: ResourceType,
    #[serde(deserialize_with = "lenient::or_default")]
    pub difficulty_level: DifficultyLevel,
    #[serde(deserialize_with = "lenient::or_default")]
    pub language: Language,
    #[serde(deserialize_with = "lenient::or_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient::or_none")]
    pub author: Option<String>,
    /// Editorial or AI quality baseline, 0-100.
    #[serde(deserialize_with = "lenient::percent_or_none")]
    pub quality_score: Option<u8>,
    /// Mean user rating, 0-5.
    #[serde(deserialize_with = "lenient::float_or_none")]
    pub rating: Option<f64>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub content_features: ContentFeatures,
}

impl Resource {
    /// Quality score with the catalog default applied, capped at 100.
    pub fn base_quality(&self) -> u8 {
        self.quality_score
            .unwrap_or(DEFAULT_QUALITY_SCORE)
            .min(100)
    }

    /// Rating if present and within `[0, 5]`.
    pub fn valid_rating(&self) -> Option<f64> {
        self.rating
            .filter(|r| r.is_finite() && (0.0..=5.0).contains(r))
    }
}
