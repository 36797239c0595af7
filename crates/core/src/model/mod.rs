//! Domain value objects.

pub mod interaction;
pub mod obstacle;
pub mod okr;
pub mod preferences;
pub mod resource;
pub mod task;

pub use interaction::{aggregate_rating, Interaction, InteractionLog, InteractionType, RecordOutcome};
pub use obstacle::{Obstacle, ObstacleStatus, ObstacleType, Solution};
pub use okr::{KeyResult, Okr, ProgressHistory};
pub use preferences::UserPreferences;
pub use resource::{
    ContentFeatures, DifficultyLevel, Language, Platform, Resource, ResourceType,
    DEFAULT_QUALITY_SCORE,
};
pub use task::{
    CompletionEvent, DailyTask, GeneratedBy, TaskStatus, TaskTransition, TaskType,
    DEFAULT_TASK_MINUTES,
};
