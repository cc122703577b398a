use std::ops::RangeInclusive;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware, RequestId},
    state::AppState,
};

pub mod games;
pub mod library;
pub mod players;

/// Page size used when a listing doesn't ask for one
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Page sizes a listing accepts
pub const PAGE_SIZE_RANGE: RangeInclusive<usize> = 1..=500;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/db", get(database_health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(games::list_games).post(games::create_game))
        .route("/games/count", get(games::count_games))
        .route("/games/:game_id", get(games::get_game))
        .route("/games/:game_id/compatibility", get(games::compatibility))
        .route(
            "/players",
            get(players::list_players).post(players::create_player),
        )
        .route("/players/:player_id", get(players::get_player))
        .route(
            "/players/:player_id/preferences",
            get(players::get_preferences).put(players::put_preferences),
        )
        .route("/library/curated", get(library::curated))
        .route("/library/curated/count", get(library::curated_count))
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Rejects page sizes outside [`PAGE_SIZE_RANGE`]
fn check_page_size(limit: usize) -> AppResult<()> {
    if PAGE_SIZE_RANGE.contains(&limit) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "limit must be between {} and {}",
            PAGE_SIZE_RANGE.start(),
            PAGE_SIZE_RANGE.end()
        )))
    }
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Checks that the backing store answers
async fn database_health_check(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<Value>> {
    if let Err(error) = state.catalog.ping().await {
        tracing::error!(%request_id, %error, "Database health check failed");
        return Err(AppError::ServiceUnavailable(
            "Database connection failed".to_string(),
        ));
    }

    tracing::info!(%request_id, "Database health check successful");

    Ok(Json(json!({
        "status": "healthy",
        "message": "Database connection successful",
        "request_id": request_id.to_string(),
    })))
}
