use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{check_page_size, default_page_size};
use crate::{
    error::{AppError, AppResult},
    models::{Player, PlayerPreferences, PreferencesUpdate},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListPlayersQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_page_size")]
    pub limit: usize,
}

pub async fn create_player(
    State(state): State<AppState>,
    request: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Player>)> {
    let Json(request) = request?;
    let mut player = Player::new(request.username);
    if let Some(display_name) = request.display_name {
        player = player.with_display_name(display_name);
    }

    let created = state.players.create_player(player).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_players(
    State(state): State<AppState>,
    query: Result<Query<ListPlayersQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Player>>> {
    let Query(query) = query?;
    check_page_size(query.limit)?;

    let players = state.players.list_players(query.skip, query.limit).await?;
    Ok(Json(players))
}

pub async fn get_player(
    State(state): State<AppState>,
    player_id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Player>> {
    let Path(player_id) = player_id?;
    require_player(&state, player_id).await.map(Json)
}

/// The player's preferences, stored empty on first read
pub async fn get_preferences(
    State(state): State<AppState>,
    player_id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<PlayerPreferences>> {
    let Path(player_id) = player_id?;
    require_player(&state, player_id).await?;

    if let Some(preferences) = state.preferences.get_preferences(player_id).await? {
        return Ok(Json(preferences));
    }

    tracing::debug!(%player_id, "No preferences yet, storing defaults");
    let created = state
        .preferences
        .put_preferences(PlayerPreferences::new(player_id))
        .await?;
    Ok(Json(created))
}

/// Merges the fields present in the body onto the stored preferences
pub async fn put_preferences(
    State(state): State<AppState>,
    player_id: Result<Path<Uuid>, PathRejection>,
    update: Result<Json<PreferencesUpdate>, JsonRejection>,
) -> AppResult<Json<PlayerPreferences>> {
    let Path(player_id) = player_id?;
    let Json(update) = update?;
    require_player(&state, player_id).await?;

    let current = state
        .preferences
        .get_preferences(player_id)
        .await?
        .unwrap_or_else(|| PlayerPreferences::new(player_id));

    let stored = state
        .preferences
        .put_preferences(update.apply_to(current))
        .await?;

    Ok(Json(stored))
}

async fn require_player(state: &AppState, player_id: Uuid) -> AppResult<Player> {
    state
        .players
        .get_player(player_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Player {}", player_id)))
}
