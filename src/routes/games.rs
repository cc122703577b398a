use std::collections::HashSet;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_page_size, default_page_size};
use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{CompatibilityResult, Game, GameQuery},
    services::CompatibilityEngine,
    state::AppState,
};

/// Catalog filters plus paging
///
/// Spelled out rather than flattening [`GameQuery`], since query strings carry every value
/// as text and flattened fields lose their numeric types.
#[derive(Debug, Deserialize)]
pub struct ListGamesQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_page_size")]
    pub limit: usize,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    pub min_play_time: Option<i32>,
    pub max_play_time: Option<i32>,
    pub min_complexity: Option<f64>,
    pub max_complexity: Option<f64>,
}

impl ListGamesQuery {
    fn filter(&self) -> GameQuery {
        GameQuery {
            min_players: self.min_players,
            max_players: self.max_players,
            min_play_time: self.min_play_time,
            max_play_time: self.max_play_time,
            min_complexity: self.min_complexity,
            max_complexity: self.max_complexity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GameCountResponse {
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub name: String,
    pub min_players: i32,
    pub max_players: i32,
    pub average_play_time: i32,
    pub complexity_rating: f64,
    #[serde(default)]
    pub category_ids: HashSet<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CompatibilityQuery {
    pub player_id: Uuid,
}

/// Handler for a filtered page of the catalog
pub async fn list_games(
    State(state): State<AppState>,
    query: Result<Query<ListGamesQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Game>>> {
    let Query(query) = query?;
    check_page_size(query.limit)?;
    let filter = query.filter();
    filter.validate()?;

    let games = state
        .catalog
        .list_games(&filter, query.skip, query.limit)
        .await?;
    Ok(Json(games))
}

/// Number of games matching the same filters as [`list_games`]; paging is ignored
pub async fn count_games(
    State(state): State<AppState>,
    query: Result<Query<ListGamesQuery>, QueryRejection>,
) -> AppResult<Json<GameCountResponse>> {
    let Query(query) = query?;
    let filter = query.filter();
    filter.validate()?;

    let count = state.catalog.count_games(&filter).await?;
    Ok(Json(GameCountResponse { count }))
}

pub async fn create_game(
    State(state): State<AppState>,
    request: Result<Json<CreateGameRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Game>)> {
    let Json(request) = request?;
    let game = Game::new(
        request.name,
        request.min_players,
        request.max_players,
        request.average_play_time,
        request.complexity_rating,
    )
    .with_categories(request.category_ids);

    let created = state.catalog.create_game(game).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for a single game
pub async fn get_game(
    State(state): State<AppState>,
    game_id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Game>> {
    let Path(game_id) = game_id?;
    state
        .catalog
        .get_game(game_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Game {}", game_id)))
}

/// Handler scoring one game against one player's stored preferences
pub async fn compatibility(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    game_id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<CompatibilityQuery>, QueryRejection>,
) -> AppResult<Json<CompatibilityResult>> {
    let Path(game_id) = game_id?;
    let Query(query) = query?;

    let game = state
        .catalog
        .get_game(game_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Game {}", game_id)))?;

    let preferences = state
        .preferences
        .get_preferences(query.player_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Preferences for player {}", query.player_id))
        })?;

    let result = CompatibilityEngine::score(&game, &preferences);

    tracing::debug!(
        %request_id,
        %game_id,
        player_id = %query.player_id,
        score = result.compatibility_score,
        "Scored game compatibility"
    );

    Ok(Json(result))
}
