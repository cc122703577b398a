use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Player count bounds accepted for any game
pub const PLAYER_COUNT_RANGE: std::ops::RangeInclusive<i32> = 1..=10;
/// Play time bounds (minutes) accepted for games and preferences
pub const PLAY_TIME_RANGE: std::ops::RangeInclusive<i32> = 5..=240;
/// Complexity rating scale
pub const COMPLEXITY_RANGE: std::ops::RangeInclusive<f64> = 1.0..=5.0;

/// A category games are filed under and players can prefer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A board game in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    /// Unique identifier for the game
    pub id: Uuid,
    /// Display name, also the catalog's sort key
    pub name: String,
    pub min_players: i32,
    pub max_players: i32,
    /// Typical play time in minutes
    pub average_play_time: i32,
    /// Weight on a 1.0 to 5.0 scale
    pub complexity_rating: f64,
    /// Categories the game belongs to
    #[serde(default)]
    pub category_ids: HashSet<Uuid>,
}

impl Game {
    /// Creates a game with a fresh id and no categories
    pub fn new(
        name: impl Into<String>,
        min_players: i32,
        max_players: i32,
        average_play_time: i32,
        complexity_rating: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            min_players,
            max_players,
            average_play_time,
            complexity_rating,
            category_ids: HashSet::new(),
        }
    }

    /// Adds categories to the game
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Uuid>) -> Self {
        self.category_ids.extend(categories);
        self
    }

    /// Checks the catalog invariants before a game is stored
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidInput("Game name must not be empty".to_string()));
        }
        if !PLAYER_COUNT_RANGE.contains(&self.min_players)
            || !PLAYER_COUNT_RANGE.contains(&self.max_players)
        {
            return Err(AppError::InvalidInput(format!(
                "Player counts must be between {} and {}",
                PLAYER_COUNT_RANGE.start(),
                PLAYER_COUNT_RANGE.end()
            )));
        }
        if self.min_players > self.max_players {
            return Err(AppError::InvalidInput(
                "min_players cannot be greater than max_players".to_string(),
            ));
        }
        if !PLAY_TIME_RANGE.contains(&self.average_play_time) {
            return Err(AppError::InvalidInput(format!(
                "average_play_time must be between {} and {} minutes",
                PLAY_TIME_RANGE.start(),
                PLAY_TIME_RANGE.end()
            )));
        }
        if !COMPLEXITY_RANGE.contains(&self.complexity_rating) {
            return Err(AppError::InvalidInput(
                "complexity_rating must be between 1.0 and 5.0".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `count` players can sit down to this game
    pub fn supports_player_count(&self, count: i32) -> bool {
        self.min_players <= count && count <= self.max_players
    }
}
