use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        game::{COMPLEXITY_RANGE, PLAYER_COUNT_RANGE},
        CuratedCount, Game, GenericFilter, PlayedGameStats, SimilarityWindow,
    },
    services::catalog::GameCatalog,
};

/// Tunables for building the curated library
#[derive(Debug, Clone, PartialEq)]
pub struct CurationConfig {
    /// Usernames whose play history anchors the library
    pub real_players: Vec<String>,
    /// Library size `count()` estimates toward
    pub target_total: usize,
    /// Used instead of similarity search when the real players have no history
    pub fallback_filter: GenericFilter,
    /// Subtracted from the rounded mean `min_players`
    pub min_players_margin: i32,
    /// Added to the rounded mean `max_players`
    pub max_players_margin: i32,
    /// Play time window as multiples of the mean play time
    pub play_time_shrink: f64,
    pub play_time_stretch: f64,
    /// Play time window clamp, in minutes
    pub min_play_time_floor: i32,
    pub max_play_time_ceiling: i32,
    /// Half-width of the complexity window
    pub complexity_spread: f64,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            real_players: vec![
                "alice_gamer".to_string(),
                "bob_plays".to_string(),
                "carol_dice".to_string(),
                "dave_meeple".to_string(),
            ],
            target_total: 150,
            fallback_filter: GenericFilter::default(),
            min_players_margin: 1,
            max_players_margin: 2,
            play_time_shrink: 0.5,
            play_time_stretch: 2.0,
            min_play_time_floor: 15,
            max_play_time_ceiling: 300,
            complexity_spread: 1.0,
        }
    }
}

impl CurationConfig {
    /// Window around the played games' averages, clamped to valid attribute ranges
    pub fn similarity_window(&self, stats: &PlayedGameStats) -> SimilarityWindow {
        SimilarityWindow {
            min_players: (round(stats.mean_min_players) - self.min_players_margin)
                .max(*PLAYER_COUNT_RANGE.start()),
            max_players: (round(stats.mean_max_players) + self.max_players_margin)
                .min(*PLAYER_COUNT_RANGE.end()),
            min_play_time: round(stats.mean_play_time * self.play_time_shrink)
                .max(self.min_play_time_floor),
            max_play_time: round(stats.mean_play_time * self.play_time_stretch)
                .min(self.max_play_time_ceiling),
            min_complexity: (stats.mean_complexity - self.complexity_spread)
                .max(*COMPLEXITY_RANGE.start()),
            max_complexity: (stats.mean_complexity + self.complexity_spread)
                .min(*COMPLEXITY_RANGE.end()),
        }
    }
}

/// Halves go to the even neighbour, so 2.5 rounds to 2 and 3.5 to 4
fn round(value: f64) -> i32 {
    value.round_ties_even() as i32
}

/// Builds the curated starter library: games the real players have played, topped up with
/// unplayed games that look like them
pub struct CurationSelector {
    catalog: Arc<dyn GameCatalog>,
    config: CurationConfig,
}

impl CurationSelector {
    pub fn new(catalog: Arc<dyn GameCatalog>, config: CurationConfig) -> Self {
        Self { catalog, config }
    }

    /// One page of the curated library
    ///
    /// Played games come first, then similar games, both in name order. The similar portion
    /// only tops up to `limit`, and `skip`/`limit` slice the combined sequence afterwards.
    pub async fn select(&self, skip: usize, limit: usize) -> AppResult<Vec<Game>> {
        let played = self
            .catalog
            .games_played_by(&self.config.real_players)
            .await?;

        let Some(stats) = PlayedGameStats::from_games(played) else {
            tracing::info!(
                skip,
                limit,
                "No play history for real players, using generic filter"
            );
            return self
                .catalog
                .filter_games(&self.config.fallback_filter, skip, limit)
                .await;
        };

        let played_count = stats.played_count();
        let played_ids: Vec<Uuid> = stats.games.iter().map(|game| game.id).collect();
        let excluding: HashSet<Uuid> = played_ids.iter().copied().collect();
        let similar_needed = limit.saturating_sub(played_count);

        let similar_ids: Vec<Uuid> = if similar_needed == 0 {
            Vec::new()
        } else {
            let window = self.config.similarity_window(&stats);
            tracing::debug!(
                played = played_count,
                similar_needed,
                window = ?window,
                "Searching for similar games"
            );
            self.catalog
                .similar_games(&window, &excluding, similar_needed)
                .await?
                .into_iter()
                .map(|game| game.id)
                .filter(|id| !excluding.contains(id))
                .collect()
        };

        tracing::info!(
            played = played_count,
            similar = similar_ids.len(),
            skip,
            limit,
            "Curated library candidates built"
        );

        let page: Vec<Uuid> = played_ids
            .into_iter()
            .chain(similar_ids)
            .skip(skip)
            .take(limit)
            .collect();

        let mut games = Vec::with_capacity(page.len());
        for id in page {
            match self.catalog.get_game(id).await? {
                Some(game) => games.push(game),
                None => tracing::debug!(game_id = %id, "Curated game no longer exists, dropping"),
            }
        }

        Ok(games)
    }

    /// Estimated library size
    ///
    /// This does not run the similarity query, so `similar_games` is the gap to the target
    /// rather than the number of matches actually available.
    pub async fn count(&self) -> AppResult<CuratedCount> {
        let played_games = self
            .catalog
            .games_played_by(&self.config.real_players)
            .await?
            .len();
        let similar_games = self.config.target_total.saturating_sub(played_games);

        Ok(CuratedCount {
            played_games,
            similar_games,
            total_curated: played_games + similar_games,
        })
    }
}
