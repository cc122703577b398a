use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Allowed username length, in characters
pub const USERNAME_LENGTH: RangeInclusive<usize> = 3..=50;
/// Allowed display name length, in characters
pub const DISPLAY_NAME_LENGTH: RangeInclusive<usize> = 1..=100;
/// Scale players rate their sessions on
pub const RATING_RANGE: RangeInclusive<f64> = 1.0..=5.0;

/// A registered player
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: Uuid,
    /// Unique login name, also what the curated library is anchored on
    pub username: String,
    pub display_name: Option<String>,
}

impl Player {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        let username_length = self.username.trim().chars().count();
        if !USERNAME_LENGTH.contains(&username_length) {
            return Err(AppError::InvalidInput(format!(
                "username must be between {} and {} characters",
                USERNAME_LENGTH.start(),
                USERNAME_LENGTH.end()
            )));
        }

        if let Some(display_name) = &self.display_name {
            if !DISPLAY_NAME_LENGTH.contains(&display_name.trim().chars().count()) {
                return Err(AppError::InvalidInput(format!(
                    "display_name must be between {} and {} characters",
                    DISPLAY_NAME_LENGTH.start(),
                    DISPLAY_NAME_LENGTH.end()
                )));
            }
        }

        Ok(())
    }
}

/// One entry in a player's game history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayRecord {
    pub player_id: Uuid,
    pub game_id: Uuid,
    pub played_at: DateTime<Utc>,
    /// The player's rating of the session
    pub rating: Option<f64>,
}

impl PlayRecord {
    pub fn new(player_id: Uuid, game_id: Uuid) -> Self {
        Self {
            player_id,
            game_id,
            played_at: Utc::now(),
            rating: None,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        match self.rating {
            Some(rating) if !RATING_RANGE.contains(&rating) => Err(AppError::InvalidInput(
                format!(
                    "rating must be between {} and {}",
                    RATING_RANGE.start(),
                    RATING_RANGE.end()
                ),
            )),
            _ => Ok(()),
        }
    }
}
