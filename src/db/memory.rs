use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Category, Game, GameQuery, GenericFilter, PlayRecord, Player, PlayerPreferences,
        SimilarityWindow,
    },
    services::catalog::{GameCatalog, PlayerStore, PreferenceStore},
};

/// Catalog held entirely in process memory
///
/// Backs local development and tests. Cloning shares the same underlying data.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<RwLock<CatalogData>>,
}

#[derive(Default)]
struct CatalogData {
    categories: HashMap<Uuid, Category>,
    games: HashMap<Uuid, Game>,
    players: HashMap<Uuid, Player>,
    history: Vec<PlayRecord>,
    preferences: HashMap<Uuid, PlayerPreferences>,
}

impl CatalogData {
    /// All games matching `predicate`, sorted by name then id
    fn sorted_games(&self, predicate: impl Fn(&Game) -> bool) -> Vec<Game> {
        let mut games: Vec<Game> = self.games.values().filter(|g| predicate(*g)).cloned().collect();
        games.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        games
    }

    fn known_categories(&self, ids: &HashSet<Uuid>) -> HashSet<Uuid> {
        ids.iter()
            .filter(|id| self.categories.contains_key(id))
            .copied()
            .collect()
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_category(&self, category: Category) -> Category {
        let mut inner = self.inner.write().await;
        inner.categories.insert(category.id, category.clone());
        category
    }

    /// Adds or replaces a game, keeping its category ids as given
    pub async fn insert_game(&self, game: Game) -> AppResult<Game> {
        game.validate()?;
        let mut inner = self.inner.write().await;
        inner.games.insert(game.id, game.clone());
        Ok(game)
    }

    /// Registers a player; usernames must be unique
    pub async fn add_player(&self, player: Player) -> AppResult<Player> {
        player.validate()?;

        let mut inner = self.inner.write().await;
        if inner
            .players
            .values()
            .any(|p| p.username == player.username && p.id != player.id)
        {
            return Err(AppError::InvalidInput(format!(
                "Username {} is already taken",
                player.username
            )));
        }
        inner.players.insert(player.id, player.clone());
        Ok(player)
    }

    /// Appends a history record for an existing player and game
    pub async fn record_play(&self, record: PlayRecord) -> AppResult<()> {
        record.validate()?;

        let mut inner = self.inner.write().await;
        if !inner.players.contains_key(&record.player_id) {
            return Err(AppError::NotFound(format!("Player {}", record.player_id)));
        }
        if !inner.games.contains_key(&record.game_id) {
            return Err(AppError::NotFound(format!("Game {}", record.game_id)));
        }
        inner.history.push(record);
        Ok(())
    }

    /// Deletes a game along with its history
    pub async fn remove_game(&self, id: Uuid) -> Option<Game> {
        let mut inner = self.inner.write().await;
        inner.history.retain(|record| record.game_id != id);
        inner.games.remove(&id)
    }
}

#[async_trait]
impl GameCatalog for InMemoryCatalog {
    async fn games_played_by(&self, usernames: &[String]) -> AppResult<Vec<Game>> {
        let inner = self.inner.read().await;

        let player_ids: HashSet<Uuid> = inner
            .players
            .values()
            .filter(|p| usernames.contains(&p.username))
            .map(|p| p.id)
            .collect();

        let played: HashSet<Uuid> = inner
            .history
            .iter()
            .filter(|record| player_ids.contains(&record.player_id))
            .map(|record| record.game_id)
            .collect();

        Ok(inner.sorted_games(|game| played.contains(&game.id)))
    }

    async fn similar_games(
        &self,
        window: &SimilarityWindow,
        excluding: &HashSet<Uuid>,
        limit: usize,
    ) -> AppResult<Vec<Game>> {
        let inner = self.inner.read().await;
        let mut games =
            inner.sorted_games(|game| !excluding.contains(&game.id) && window.contains(game));
        games.truncate(limit);
        Ok(games)
    }

    async fn filter_games(
        &self,
        filter: &GenericFilter,
        skip: usize,
        limit: usize,
    ) -> AppResult<Vec<Game>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sorted_games(|game| filter.matches(game))
            .into_iter()
            .skip(skip)
            .take(limit)
            .collect())
    }

    async fn get_game(&self, id: Uuid) -> AppResult<Option<Game>> {
        let inner = self.inner.read().await;
        Ok(inner.games.get(&id).cloned())
    }

    async fn list_games(
        &self,
        query: &GameQuery,
        skip: usize,
        limit: usize,
    ) -> AppResult<Vec<Game>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sorted_games(|game| query.matches(game))
            .into_iter()
            .skip(skip)
            .take(limit)
            .collect())
    }

    async fn count_games(&self, query: &GameQuery) -> AppResult<usize> {
        let inner = self.inner.read().await;
        Ok(inner.games.values().filter(|game| query.matches(game)).count())
    }

    async fn create_game(&self, mut game: Game) -> AppResult<Game> {
        game.validate()?;

        let mut inner = self.inner.write().await;
        if inner
            .games
            .values()
            .any(|existing| existing.name.to_lowercase() == game.name.to_lowercase())
        {
            return Err(AppError::InvalidInput(format!(
                "Game {} already exists",
                game.name
            )));
        }
        game.category_ids = inner.known_categories(&game.category_ids);
        inner.games.insert(game.id, game.clone());
        Ok(game)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl PlayerStore for InMemoryCatalog {
    async fn create_player(&self, player: Player) -> AppResult<Player> {
        self.add_player(player).await
    }

    async fn get_player(&self, id: Uuid) -> AppResult<Option<Player>> {
        let inner = self.inner.read().await;
        Ok(inner.players.get(&id).cloned())
    }

    async fn list_players(&self, skip: usize, limit: usize) -> AppResult<Vec<Player>> {
        let inner = self.inner.read().await;
        let mut players: Vec<Player> = inner.players.values().cloned().collect();
        players.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(players.into_iter().skip(skip).take(limit).collect())
    }
}

#[async_trait]
impl PreferenceStore for InMemoryCatalog {
    async fn get_preferences(&self, player_id: Uuid) -> AppResult<Option<PlayerPreferences>> {
        let inner = self.inner.read().await;
        Ok(inner.preferences.get(&player_id).cloned())
    }

    async fn put_preferences(
        &self,
        mut preferences: PlayerPreferences,
    ) -> AppResult<PlayerPreferences> {
        preferences.validate()?;

        let mut inner = self.inner.write().await;
        if !inner.players.contains_key(&preferences.player_id) {
            return Err(AppError::NotFound(format!("Player {}", preferences.player_id)));
        }
        preferences.preferred_category_ids =
            inner.known_categories(&preferences.preferred_category_ids);
        inner
            .preferences
            .insert(preferences.player_id, preferences.clone());
        Ok(preferences)
    }
}
