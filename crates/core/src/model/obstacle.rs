//! Obstacle taxonomy and reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Closed set of blocker categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleType {
    TimeManagement,
    KnowledgeGap,
    Motivation,
    ResourceLack,
    TechnicalIssue,
    #[default]
    Other,
}

impl ObstacleType {
    pub const ALL: [ObstacleType; 6] = [
        Self::TimeManagement,
        Self::KnowledgeGap,
        Self::Motivation,
        Self::ResourceLack,
        Self::TechnicalIssue,
        Self::Other,
    ];

    /// Wire tag, as stored in `suitable_for_obstacles`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimeManagement => "time_management",
            Self::KnowledgeGap => "knowledge_gap",
            Self::Motivation => "motivation",
            Self::ResourceLack => "resource_lack",
            Self::TechnicalIssue => "technical_issue",
            Self::Other => "other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::TimeManagement => "time management",
            Self::KnowledgeGap => "knowledge gap",
            Self::Motivation => "low motivation",
            Self::ResourceLack => "missing resources",
            Self::TechnicalIssue => "technical issue",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ObstacleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObstacleType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "obstacle type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleStatus {
    #[default]
    Identified,
    InProgress,
    Resolved,
    Dismissed,
}

/// One suggested way past an obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub title: String,
    pub description: String,
    pub priority: u8,
    /// Minutes.
    pub estimated_time: u32,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// A user-reported blocker on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub task_id: i64,
    #[serde(default)]
    pub obstacle_type: ObstacleType,
    pub description: String,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub suggested_solutions: Vec<Solution>,
    #[serde(default)]
    pub status: ObstacleStatus,
}

impl Obstacle {
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            ObstacleStatus::Identified | ObstacleStatus::InProgress
        )
    }
}
