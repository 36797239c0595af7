//! User/resource interaction events.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{lenient, CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    View,
    Bookmark,
    Complete,
    Rate,
    Share,
}

impl InteractionType {
    /// Views may repeat; every other type is unique per (user, resource, type).
    pub fn is_repeatable(self) -> bool {
        matches!(self, Self::View)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub user_id: String,
    pub resource_id: i64,
    pub interaction_type: InteractionType,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub rating: Option<u8>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub completion_percentage: Option<u8>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub time_spent_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub feedback: Option<String>,
}

impl Interaction {
    pub fn new(
        user_id: impl Into<String>,
        resource_id: i64,
        interaction_type: InteractionType,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            resource_id,
            interaction_type,
            rating: None,
            completion_percentage: None,
            time_spent_minutes: None,
            feedback: None,
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Boundary check for a freshly submitted interaction.
    pub fn validate(&self) -> Result<()> {
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(CoreError::validation(format!(
                    "rating must be between 1 and 5, got {rating}"
                )));
            }
        }
        if let Some(pct) = self.completion_percentage {
            if pct > 100 {
                return Err(CoreError::validation(format!(
                    "completion percentage must be at most 100, got {pct}"
                )));
            }
        }
        Ok(())
    }

    /// Rating carried by a `rate` event, if it is in range.
    pub fn effective_rating(&self) -> Option<u8> {
        match self.interaction_type {
            InteractionType::Rate => self.rating.filter(|r| (1..=5).contains(r)),
            _ => None,
        }
    }

    fn same_slot(&self, other: &Interaction) -> bool {
        self.user_id == other.user_id
            && self.resource_id == other.resource_id
            && self.interaction_type == other.interaction_type
    }
}

/// Follow-up work a caller owes after recording an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Nothing further to do.
    Recorded,
    /// The resource's mean rating must be re-aggregated.
    RatingChanged { resource_id: i64 },
    /// The user's preferences should absorb the completed resource.
    PreferencesNeedUpdate { resource_id: i64 },
}

/// In-memory interaction history with the upsert rules applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionLog {
    entries: Vec<Interaction>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Interaction>) -> Self {
        Self { entries }
    }

    /// Record an interaction. Views append; other types replace the earlier
    /// event for the same (user, resource, type).
    pub fn record(&mut self, interaction: Interaction) -> Result<RecordOutcome> {
        interaction.validate()?;
        let resource_id = interaction.resource_id;
        let outcome = match interaction.interaction_type {
            InteractionType::Rate if interaction.rating.is_some() => {
                RecordOutcome::RatingChanged { resource_id }
            }
            InteractionType::Complete => RecordOutcome::PreferencesNeedUpdate { resource_id },
            _ => RecordOutcome::Recorded,
        };

        if interaction.interaction_type.is_repeatable() {
            self.entries.push(interaction);
        } else if let Some(existing) = self.entries.iter_mut().find(|e| e.same_slot(&interaction)) {
            debug!(
                resource_id,
                kind = ?interaction.interaction_type,
                "upserting interaction"
            );
            *existing = interaction;
        } else {
            self.entries.push(interaction);
        }
        Ok(outcome)
    }

    pub fn entries(&self) -> &[Interaction] {
        &self.entries
    }

    pub fn for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Interaction> {
        self.entries.iter().filter(move |e| e.user_id == user_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mean `rate` rating for a resource across all users, rounded to two decimals.
pub fn aggregate_rating(interactions: &[Interaction], resource_id: i64) -> Option<f64> {
    let ratings: Vec<f64> = interactions
        .iter()
        .filter(|i| i.resource_id == resource_id)
        .filter_map(Interaction::effective_rating)
        .map(f64::from)
        .collect();
    if ratings.is_empty() {
        return None;
    }
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}
