//! Bounded numeric newtypes shared across the domain.

use serde::{Deserialize, Serialize};

/// Percentage progress clamped to the `[0, 100]` range.
///
/// Construction through [`Progress::new`] or deserialization clamps; use
/// [`Progress::checked`] where out-of-range input must be rejected instead.
///
/// # Examples
///
/// ```
/// use learnpath_core::Progress;
///
/// assert_eq!(Progress::new(90).saturating_add(15).value(), 100);
/// assert_eq!(Progress::new(-4).value(), 0);
/// assert!(Progress::checked(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "u8")]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Progress = Progress(0);
    pub const COMPLETE: Progress = Progress(100);

    /// Create a progress value, clamping to `[0, 100]`.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Create a progress value, rejecting anything outside `[0, 100]`.
    pub fn checked(value: i64) -> crate::Result<Self> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(crate::CoreError::validation(format!(
                "progress must be between 0 and 100, got {value}"
            )))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Add percentage points, clamping at 100 instead of wrapping.
    #[must_use]
    pub fn saturating_add(self, points: u8) -> Self {
        Self::new(i64::from(self.0) + i64::from(points))
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 >= 100
    }
}

impl From<i64> for Progress {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Progress> for u8 {
    fn from(p: Progress) -> Self {
        p.0
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Task priority where 1 is the most urgent and 5 the least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(1);
    pub const LOWEST: Priority = Priority(5);

    /// Create a priority, clamping to `[1, 5]`.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value.clamp(1, 5) as u8)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Short label used in prompts and listings.
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "urgent",
            2 => "important",
            3 => "normal",
            4 => "low",
            _ => "lowest",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(3)
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.0
    }
}
