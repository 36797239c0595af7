//! Typed value objects for the learnpath study planner.
//!
//! This crate provides:
//! - Learning resources, user preferences and interaction history
//! - OKRs, key results and the progress audit trail
//! - Daily tasks and their lifecycle
//! - The obstacle taxonomy
//!
//! Everything here is validated once at the boundary; downstream crates work
//! with these types instead of loosely typed rows.

pub mod error;
pub mod history;
pub mod lenient;
pub mod model;
pub mod types;

pub use error::{CoreError, EntityKind, Result};
pub use history::{HistorySink, MemHistorySink};
pub use model::*;
pub use types::{Priority, Progress};
