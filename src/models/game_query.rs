use serde::{Deserialize, Serialize};

use super::game::{Game, COMPLEXITY_RANGE, PLAYER_COUNT_RANGE};
use super::GenericFilter;
use crate::error::{AppError, AppResult};

/// Optional attribute filters for browsing the catalog
///
/// Player bounds match on overlap with the game's supported range; play time and complexity
/// bounds are inclusive. Unset bounds match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameQuery {
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    pub min_play_time: Option<i32>,
    pub max_play_time: Option<i32>,
    pub min_complexity: Option<f64>,
    pub max_complexity: Option<f64>,
}

impl GameQuery {
    pub fn validate(&self) -> AppResult<()> {
        for value in [self.min_players, self.max_players].into_iter().flatten() {
            if !PLAYER_COUNT_RANGE.contains(&value) {
                return Err(AppError::InvalidInput(format!(
                    "Player counts must be between {} and {}",
                    PLAYER_COUNT_RANGE.start(),
                    PLAYER_COUNT_RANGE.end()
                )));
            }
        }
        for value in [self.min_play_time, self.max_play_time].into_iter().flatten() {
            if value < 1 {
                return Err(AppError::InvalidInput(
                    "Play times must be at least 1 minute".to_string(),
                ));
            }
        }
        for value in [self.min_complexity, self.max_complexity].into_iter().flatten() {
            if !COMPLEXITY_RANGE.contains(&value) {
                return Err(AppError::InvalidInput(
                    "Complexity must be between 1.0 and 5.0".to_string(),
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.min_players, self.max_players) {
            if min > max {
                return Err(AppError::InvalidInput(
                    "min_players cannot be greater than max_players".to_string(),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min_play_time, self.max_play_time) {
            if min > max {
                return Err(AppError::InvalidInput(
                    "min_play_time cannot be greater than max_play_time".to_string(),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min_complexity, self.max_complexity) {
            if min > max {
                return Err(AppError::InvalidInput(
                    "min_complexity cannot be greater than max_complexity".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn matches(&self, game: &Game) -> bool {
        self.min_players.map_or(true, |min| game.max_players >= min)
            && self.max_players.map_or(true, |max| game.min_players <= max)
            && self.min_play_time.map_or(true, |min| game.average_play_time >= min)
            && self.max_play_time.map_or(true, |max| game.average_play_time <= max)
            && self.min_complexity.map_or(true, |min| game.complexity_rating >= min)
            && self.max_complexity.map_or(true, |max| game.complexity_rating <= max)
    }
}

impl From<GenericFilter> for GameQuery {
    fn from(filter: GenericFilter) -> Self {
        Self {
            min_players: Some(filter.min_players),
            max_players: Some(filter.max_players),
            min_play_time: Some(filter.min_play_time),
            max_play_time: Some(filter.max_play_time),
            min_complexity: None,
            max_complexity: None,
        }
    }
}
