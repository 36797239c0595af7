//! Per-user learning preferences.
//!
//! Preferences are created lazily from the first completed resource and grow
//! incrementally afterwards. Absent fields mean "no constraint".

use serde::{Deserialize, Deserializer, Serialize};

use crate::lenient::{self, Lenient};

use super::resource::{DifficultyLevel, Language, Platform, Resource, ResourceType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default, deserialize_with = "dedup_vec")]
    pub preferred_platforms: Vec<Platform>,
    #[serde(default, deserialize_with = "dedup_vec")]
    pub preferred_resource_types: Vec<ResourceType>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub preferred_difficulty: Option<DifficultyLevel>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub preferred_language: Option<Language>,
    #[serde(default, deserialize_with = "dedup_vec")]
    pub topics_of_interest: Vec<String>,
}

impl UserPreferences {
    /// Seed a preference record from the first resource a user completes.
    pub fn from_completed_resource(resource: &Resource) -> Self {
        let mut prefs = Self {
            preferred_platforms: vec![resource.platform],
            preferred_resource_types: vec![resource.resource_type],
            preferred_difficulty: Some(resource.difficulty_level),
            preferred_language: Some(resource.language),
            topics_of_interest: Vec::new(),
        };
        push_unique_all(&mut prefs.topics_of_interest, resource.tags.iter().cloned());
        prefs
    }

    /// Fold a completed resource into existing preferences without removing
    /// anything. Returns whether the record changed.
    pub fn absorb_completion(&mut self, resource: &Resource) -> bool {
        let mut changed = push_unique(&mut self.preferred_platforms, resource.platform);
        changed |= push_unique(&mut self.preferred_resource_types, resource.resource_type);
        changed |= push_unique_all(&mut self.topics_of_interest, resource.tags.iter().cloned());
        changed
    }

    pub fn prefers_platform(&self, platform: Platform) -> bool {
        self.preferred_platforms.contains(&platform)
    }

    pub fn prefers_resource_type(&self, resource_type: ResourceType) -> bool {
        self.preferred_resource_types.contains(&resource_type)
    }

    pub fn prefers_difficulty(&self, difficulty: DifficultyLevel) -> bool {
        self.preferred_difficulty == Some(difficulty)
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        false
    } else {
        items.push(item);
        true
    }
}

fn push_unique_all<T: PartialEq>(items: &mut Vec<T>, new: impl IntoIterator<Item = T>) -> bool {
    let mut changed = false;
    for item in new {
        changed |= push_unique(items, item);
    }
    changed
}

fn dedup_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + PartialEq,
{
    // Unknown entries are dropped; a non-list means no constraint.
    let raw: Vec<Lenient<T>> = lenient::or_none(deserializer)?.unwrap_or_default();
    let mut out = Vec::with_capacity(raw.len());
    push_unique_all(&mut out, raw.into_iter().filter_map(Lenient::into_option));
    Ok(out)
}
