use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use super::{check_page_size, default_page_size};
use crate::{
    error::AppResult,
    models::{CuratedCount, Game},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CuratedQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_page_size")]
    pub limit: usize,
}

/// Handler for one page of the curated library
pub async fn curated(
    State(state): State<AppState>,
    query: Result<Query<CuratedQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Game>>> {
    let Query(query) = query?;
    check_page_size(query.limit)?;

    let games = state.curation.select(query.skip, query.limit).await?;
    Ok(Json(games))
}

pub async fn curated_count(State(state): State<AppState>) -> AppResult<Json<CuratedCount>> {
    let count = state.curation.count().await?;
    Ok(Json(count))
}
