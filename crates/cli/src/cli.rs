use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Task cadence for generation.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Cadence {
    #[default]
    Daily,
    Weekly,
}

/// Command-line interface for the `learnpath` application.
#[derive(Debug, Parser)]
#[command(
    name = "learnpath",
    about = "Learning-resource recommendations, OKR progress tracking and daily study tasks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available `learnpath` commands. Every command reads JSON files and prints
/// JSON to stdout.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ranks candidate resources for a user.
    Recommend {
        /// JSON array of candidate resources.
        #[arg(long, value_name = "FILE")]
        resources: PathBuf,
        /// The user's stored preferences.
        #[arg(long, value_name = "FILE")]
        preferences: Option<PathBuf>,
        /// JSON array of the user's interactions.
        #[arg(long, value_name = "FILE")]
        interactions: Option<PathBuf>,
        /// Only use interactions of this user.
        #[arg(long)]
        user: Option<String>,
        /// Obstacle tag to favor (e.g. `knowledge_gap`).
        #[arg(long)]
        obstacle: Option<String>,
        /// Maximum results (overrides `LEARNPATH_RECOMMEND_LIMIT`).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Marks a task completed and propagates its contribution.
    CompleteTask {
        /// The task's OKR.
        #[arg(long, value_name = "FILE")]
        okr: PathBuf,
        /// The task to complete.
        #[arg(long, value_name = "FILE")]
        task: PathBuf,
        /// Progress history file (overrides `LEARNPATH_HISTORY_FILE`).
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,
    },
    /// Applies an ordered batch of absolute progress values.
    UpdateProgress {
        /// The OKR to update.
        #[arg(long, value_name = "FILE")]
        okr: PathBuf,
        /// JSON array of `{key_result_index, progress, progress_description}`.
        #[arg(long, value_name = "FILE")]
        updates: PathBuf,
        /// Progress history file (overrides `LEARNPATH_HISTORY_FILE`).
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,
    },
    /// Prints recorded progress history for an OKR, newest first.
    History {
        #[arg(long)]
        okr_id: String,
        /// Restrict to one key result.
        #[arg(long)]
        index: Option<usize>,
        /// Progress history file (overrides `LEARNPATH_HISTORY_FILE`).
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,
    },
    /// Prints the deterministic task plan for an OKR.
    FallbackTasks {
        #[arg(long, value_name = "FILE")]
        okr: PathBuf,
    },
    /// Generates tasks with the configured LLM, falling back when it fails.
    GenerateTasks {
        /// JSON array of OKRs; the first is the primary one.
        #[arg(long, value_name = "FILE")]
        okrs: PathBuf,
        /// JSON array of the previous day's tasks.
        #[arg(long, value_name = "FILE")]
        previous: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Cadence::Daily)]
        cadence: Cadence,
        /// Task date (YYYY-MM-DD), today when omitted.
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },
    /// Prints the built-in analysis for an obstacle type.
    Obstacles {
        /// One of time_management, knowledge_gap, motivation, resource_lack,
        /// technical_issue, other.
        #[arg(long = "type", value_name = "TYPE")]
        obstacle_type: String,
    },
    /// Lists stalled tasks that may need help.
    StaleTasks {
        /// JSON array of tasks.
        #[arg(long, value_name = "FILE")]
        tasks: PathBuf,
        /// JSON array of already reported obstacles.
        #[arg(long, value_name = "FILE")]
        obstacles: Option<PathBuf>,
        /// Minimum age in days (overrides `LEARNPATH_STALE_DAYS`).
        #[arg(long)]
        min_days: Option<u32>,
    },
}
