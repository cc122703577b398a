use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::game::{COMPLEXITY_RANGE, PLAYER_COUNT_RANGE, PLAY_TIME_RANGE};
use crate::error::{AppError, AppResult};

/// What a player is looking for in a game night
///
/// Every field is optional; an unset field means the player has no preference on that
/// dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerPreferences {
    /// The player these preferences belong to
    pub player_id: Uuid,
    /// Shortest game the player wants, in minutes
    pub minimum_play_time: Option<i32>,
    /// Longest game the player wants, in minutes
    pub maximum_play_time: Option<i32>,
    pub preferred_player_count: Option<i32>,
    pub preferred_complexity_min: Option<f64>,
    pub preferred_complexity_max: Option<f64>,
    #[serde(default)]
    pub preferred_category_ids: HashSet<Uuid>,
}

impl PlayerPreferences {
    /// Creates preferences with nothing set
    pub fn new(player_id: Uuid) -> Self {
        Self {
            player_id,
            minimum_play_time: None,
            maximum_play_time: None,
            preferred_player_count: None,
            preferred_complexity_min: None,
            preferred_complexity_max: None,
            preferred_category_ids: HashSet::new(),
        }
    }

    pub fn with_play_time(mut self, min: i32, max: i32) -> Self {
        self.minimum_play_time = Some(min);
        self.maximum_play_time = Some(max);
        self
    }

    pub fn with_player_count(mut self, count: i32) -> Self {
        self.preferred_player_count = Some(count);
        self
    }

    pub fn with_complexity(mut self, min: f64, max: f64) -> Self {
        self.preferred_complexity_min = Some(min);
        self.preferred_complexity_max = Some(max);
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Uuid>) -> Self {
        self.preferred_category_ids.extend(categories);
        self
    }

    /// Checks field ranges and that every max is at least its min
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("minimum_play_time", self.minimum_play_time),
            ("maximum_play_time", self.maximum_play_time),
        ] {
            if let Some(minutes) = value {
                if !PLAY_TIME_RANGE.contains(&minutes) {
                    return Err(AppError::InvalidInput(format!(
                        "{} must be between {} and {} minutes",
                        field,
                        PLAY_TIME_RANGE.start(),
                        PLAY_TIME_RANGE.end()
                    )));
                }
            }
        }

        if let Some(count) = self.preferred_player_count {
            if !PLAYER_COUNT_RANGE.contains(&count) {
                return Err(AppError::InvalidInput(format!(
                    "preferred_player_count must be between {} and {}",
                    PLAYER_COUNT_RANGE.start(),
                    PLAYER_COUNT_RANGE.end()
                )));
            }
        }

        for (field, value) in [
            ("preferred_complexity_min", self.preferred_complexity_min),
            ("preferred_complexity_max", self.preferred_complexity_max),
        ] {
            if let Some(rating) = value {
                if !COMPLEXITY_RANGE.contains(&rating) {
                    return Err(AppError::InvalidInput(format!(
                        "{} must be between 1.0 and 5.0",
                        field
                    )));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.minimum_play_time, self.maximum_play_time) {
            if max < min {
                return Err(AppError::InvalidInput(
                    "maximum_play_time must be greater than minimum_play_time".to_string(),
                ));
            }
        }

        if let (Some(min), Some(max)) =
            (self.preferred_complexity_min, self.preferred_complexity_max)
        {
            if max < min {
                return Err(AppError::InvalidInput(
                    "preferred_complexity_max must be greater than preferred_complexity_min"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Partial update to a player's preferences
///
/// A field left out of the body keeps its stored value, while an explicit `null` clears it.
/// `preferred_category_ids` replaces the stored set when present.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PreferencesUpdate {
    #[serde(default, deserialize_with = "present")]
    pub minimum_play_time: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub maximum_play_time: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub preferred_player_count: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub preferred_complexity_min: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub preferred_complexity_max: Option<Option<f64>>,
    #[serde(default)]
    pub preferred_category_ids: Option<HashSet<Uuid>>,
}

/// Marks a field that appeared in the body, even as `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PreferencesUpdate {
    /// Overlays the fields present in this update onto `preferences`
    pub fn apply_to(self, mut preferences: PlayerPreferences) -> PlayerPreferences {
        if let Some(value) = self.minimum_play_time {
            preferences.minimum_play_time = value;
        }
        if let Some(value) = self.maximum_play_time {
            preferences.maximum_play_time = value;
        }
        if let Some(value) = self.preferred_player_count {
            preferences.preferred_player_count = value;
        }
        if let Some(value) = self.preferred_complexity_min {
            preferences.preferred_complexity_min = value;
        }
        if let Some(value) = self.preferred_complexity_max {
            preferences.preferred_complexity_max = value;
        }
        if let Some(categories) = self.preferred_category_ids {
            preferences.preferred_category_ids = categories;
        }
        preferences
    }
}
