//! Storage abstractions the recommendation logic reads from
//!
//! The core never talks to a database directly. Each backend (in-memory, PostgreSQL)
//! implements these traits and every query returns a fresh snapshot.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Game, GameQuery, GenericFilter, Player, PlayerPreferences, SimilarityWindow},
};

/// Access to the game catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GameCatalog: Send + Sync {
    /// Distinct games with at least one history record for any of `usernames`, ordered by name
    async fn games_played_by(&self, usernames: &[String]) -> AppResult<Vec<Game>>;

    /// Games inside `window` on every bound, minus `excluding`, ordered by name
    async fn similar_games(
        &self,
        window: &SimilarityWindow,
        excluding: &HashSet<Uuid>,
        limit: usize,
    ) -> AppResult<Vec<Game>>;

    /// One page of games matching `filter`, ordered by name
    async fn filter_games(
        &self,
        filter: &GenericFilter,
        skip: usize,
        limit: usize,
    ) -> AppResult<Vec<Game>>;

    async fn get_game(&self, id: Uuid) -> AppResult<Option<Game>>;

    /// One page of games matching `query`, ordered by name
    async fn list_games(&self, query: &GameQuery, skip: usize, limit: usize)
        -> AppResult<Vec<Game>>;

    async fn count_games(&self, query: &GameQuery) -> AppResult<usize>;

    /// Validates and stores a new game
    ///
    /// Names are unique ignoring case. Category ids that don't exist are dropped.
    async fn create_game(&self, game: Game) -> AppResult<Game>;

    /// Round-trips the backing store
    async fn ping(&self) -> AppResult<()>;
}

/// Registered players
#[async_trait::async_trait]
pub trait PlayerStore: Send + Sync {
    /// Validates and stores a new player; usernames are unique
    async fn create_player(&self, player: Player) -> AppResult<Player>;

    async fn get_player(&self, id: Uuid) -> AppResult<Option<Player>>;

    /// One page of players ordered by username
    async fn list_players(&self, skip: usize, limit: usize) -> AppResult<Vec<Player>>;
}

/// Per-player preference storage
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get_preferences(&self, player_id: Uuid) -> AppResult<Option<PlayerPreferences>>;

    /// Validates and upserts, returning what was stored
    ///
    /// Unknown players are `NotFound`. Category ids that don't exist are dropped.
    async fn put_preferences(
        &self,
        preferences: PlayerPreferences,
    ) -> AppResult<PlayerPreferences>;
}
