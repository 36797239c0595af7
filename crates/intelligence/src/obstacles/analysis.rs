use learnpath_core::{ObstacleType, Solution};
use serde::{Deserialize, Serialize};

/// Root-cause analysis and suggested solutions for a reported obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleAnalysis {
    pub analysis: String,
    pub solutions: Vec<Solution>,
}

/// Canned analysis used when no model-backed analysis is available.
///
/// Only time management, knowledge gaps and motivation have their own
/// solutions; every other type gets the time-management plan.
pub fn fallback_analysis(obstacle_type: ObstacleType) -> ObstacleAnalysis {
    let analysis = match obstacle_type {
        ObstacleType::TimeManagement => {
            "Time management problems usually come from unclear priorities and no concrete schedule."
        }
        ObstacleType::KnowledgeGap => {
            "A knowledge gap means some foundations or skills are missing; study them systematically."
        }
        ObstacleType::Motivation => {
            "Low motivation often comes from vague goals, too little sense of achievement or too much outside pressure."
        }
        ObstacleType::ResourceLack => {
            "Missing resources call for alternatives or better use of what is already available."
        }
        ObstacleType::TechnicalIssue => {
            "Technical problems need specific technical support and a concrete fix."
        }
        ObstacleType::Other => {
            "The situation needs a closer look before the best solution can be chosen."
        }
    };

    let solutions = match obstacle_type {
        ObstacleType::KnowledgeGap => vec![solution(
            "Study systematically",
            "Find learning resources for the topic and build up the missing knowledge",
            120,
            &["Identify the gap", "Find learning resources", "Make a study plan"],
        )],
        ObstacleType::Motivation => vec![solution(
            "Reset the goal",
            "Clarify why the goal matters to strengthen intrinsic motivation",
            45,
            &["Reflect on the goal", "Set small milestones", "Add a reward"],
        )],
        _ => vec![solution(
            "Make a time plan",
            "Use time blocking to split the task into concrete sessions",
            30,
            &[
                "Estimate the time needed",
                "Draw up a daily schedule",
                "Set reminders and checkpoints",
            ],
        )],
    };

    ObstacleAnalysis {
        analysis: analysis.to_string(),
        solutions,
    }
}

fn solution(title: &str, description: &str, minutes: u32, steps: &[&str]) -> Solution {
    Solution {
        title: title.to_string(),
        description: description.to_string(),
        priority: 1,
        estimated_time: minutes,
        steps: steps.iter().map(|s| s.to_string()).collect(),
    }
}
