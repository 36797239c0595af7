//! Error types surfaced by domain operations.

use std::fmt;

/// Failures raised for a primary operation's own invariants.
///
/// Collaborator failures (database, network) never pass through this type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed or out-of-range input.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    /// Task lifecycle does not allow the requested move.
    #[error("cannot move task from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    /// A closed taxonomy received a tag it does not know.
    #[error("unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn key_result_not_found(index: impl fmt::Display) -> Self {
        Self::NotFound {
            kind: EntityKind::KeyResult,
            id: index.to_string(),
        }
    }
}

/// Entity named by [`CoreError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Okr,
    KeyResult,
    Resource,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Okr => "okr",
            Self::KeyResult => "key result",
            Self::Resource => "resource",
            Self::Task => "task",
        };
        f.write_str(label)
    }
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;
