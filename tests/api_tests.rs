use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;
use uuid::Uuid;

use game_night_api::{
    db::InMemoryCatalog,
    models::{Category, Game, PlayRecord, Player},
    routes::create_router,
    services::CurationConfig,
    state::AppState,
};

struct Fixture {
    server: TestServer,
    catalog: InMemoryCatalog,
    alice: Player,
    wingspan: Game,
}

async fn create_test_server() -> Fixture {
    let catalog = InMemoryCatalog::new();

    let alice = catalog.add_player(Player::new("alice_gamer")).await.unwrap();
    catalog.add_player(Player::new("bob_plays")).await.unwrap();

    let wingspan = catalog
        .insert_game(Game::new("Wingspan", 1, 5, 60, 2.4))
        .await
        .unwrap();
    for game in [
        Game::new("Azul", 2, 4, 40, 1.8),
        Game::new("Brass", 2, 4, 120, 3.9),
        Game::new("Marathon", 2, 4, 200, 3.0),
        Game::new("Solo Quest", 1, 1, 60, 2.0),
    ] {
        catalog.insert_game(game).await.unwrap();
    }

    let state = AppState::in_memory(catalog.clone(), CurationConfig::default());
    let server = TestServer::new(create_router(state)).unwrap();

    Fixture {
        server,
        catalog,
        alice,
        wingspan,
    }
}

fn names(games: &[serde_json::Value]) -> Vec<&str> {
    games.iter().map(|g| g["name"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = create_test_server().await;
    let response = fixture.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let fixture = create_test_server().await;
    let request_id = Uuid::new_v4().to_string();

    let response = fixture
        .server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_str(&request_id).unwrap(),
        )
        .await;

    assert_eq!(response.header("x-request-id"), request_id.as_str());
}

#[tokio::test]
async fn test_request_id_is_generated_when_missing() {
    let fixture = create_test_server().await;
    let response = fixture.server.get("/health").await;

    let header = response.header("x-request-id");
    assert!(Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_get_game() {
    let fixture = create_test_server().await;

    let response = fixture
        .server
        .get(&format!("/api/v1/games/{}", fixture.wingspan.id))
        .await;
    response.assert_status_ok();
    let game: serde_json::Value = response.json();
    assert_eq!(game["name"], "Wingspan");
    assert_eq!(game["max_players"], 5);

    let response = fixture
        .server
        .get(&format!("/api/v1/games/{}", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Game"));
}

#[tokio::test]
async fn test_preferences_default_to_empty_for_known_player() {
    let fixture = create_test_server().await;
    let path = format!("/api/v1/players/{}/preferences", fixture.alice.id);

    let response = fixture.server.get(&path).await;
    response.assert_status_ok();
    let prefs: serde_json::Value = response.json();
    assert_eq!(prefs["player_id"], fixture.alice.id.to_string());
    assert_eq!(prefs["preferred_player_count"], serde_json::Value::Null);
    assert_eq!(prefs["preferred_category_ids"], json!([]));

    // The defaults are stored, so compatibility can be scored straight away
    let response = fixture
        .server
        .get(&format!("/api/v1/games/{}/compatibility", fixture.wingspan.id))
        .add_query_param("player_id", fixture.alice.id)
        .await;
    response.assert_status_ok();
    let result: serde_json::Value = response.json();
    assert_eq!(result["compatibility_score"], 0.5);

    let response = fixture
        .server
        .get(&format!("/api/v1/players/{}/preferences", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preferences_round_trip() {
    let fixture = create_test_server().await;
    let path = format!("/api/v1/players/{}/preferences", fixture.alice.id);

    let response = fixture
        .server
        .put(&path)
        .json(&json!({
            "preferred_player_count": 3,
            "minimum_play_time": 30,
            "maximum_play_time": 90
        }))
        .await;
    response.assert_status_ok();

    let response = fixture.server.get(&path).await;
    response.assert_status_ok();
    let prefs: serde_json::Value = response.json();
    assert_eq!(prefs["player_id"], fixture.alice.id.to_string());
    assert_eq!(prefs["preferred_player_count"], 3);
    assert_eq!(prefs["preferred_complexity_min"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_partial_preference_updates_merge() {
    let fixture = create_test_server().await;
    let path = format!("/api/v1/players/{}/preferences", fixture.alice.id);
    let strategy = fixture.catalog.insert_category(Category::new("Strategy")).await;

    fixture
        .server
        .put(&path)
        .json(&json!({
            "preferred_player_count": 3,
            "preferred_category_ids": [strategy.id]
        }))
        .await
        .assert_status_ok();

    fixture
        .server
        .put(&path)
        .json(&json!({ "minimum_play_time": 30, "maximum_play_time": 90 }))
        .await
        .assert_status_ok();

    let prefs: serde_json::Value = fixture.server.get(&path).await.json();
    assert_eq!(prefs["preferred_player_count"], 3);
    assert_eq!(prefs["minimum_play_time"], 30);
    assert_eq!(prefs["maximum_play_time"], 90);
    assert_eq!(prefs["preferred_category_ids"], json!([strategy.id]));

    // An explicit null clears a single field
    let response = fixture
        .server
        .put(&path)
        .json(&json!({ "preferred_player_count": null }))
        .await;
    response.assert_status_ok();
    let prefs: serde_json::Value = response.json();
    assert_eq!(prefs["preferred_player_count"], serde_json::Value::Null);
    assert_eq!(prefs["minimum_play_time"], 30);
}

#[tokio::test]
async fn test_unknown_preferred_categories_are_dropped() {
    let fixture = create_test_server().await;
    let strategy = fixture.catalog.insert_category(Category::new("Strategy")).await;

    let response = fixture
        .server
        .put(&format!("/api/v1/players/{}/preferences", fixture.alice.id))
        .json(&json!({
            "preferred_category_ids": [strategy.id, "00000000-0000-0000-0000-000000000001"]
        }))
        .await;
    response.assert_status_ok();

    let prefs: serde_json::Value = response.json();
    assert_eq!(prefs["preferred_category_ids"], json!([strategy.id]));
}

#[tokio::test]
async fn test_invalid_preferences_rejected() {
    let fixture = create_test_server().await;

    let response = fixture
        .server
        .put(&format!("/api/v1/players/{}/preferences", fixture.alice.id))
        .json(&json!({
            "minimum_play_time": 90,
            "maximum_play_time": 30
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = fixture
        .server
        .put(&format!("/api/v1/players/{}/preferences", fixture.alice.id))
        .json(&json!({ "preferred_player_count": 11 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preferences_for_unknown_player() {
    let fixture = create_test_server().await;

    let response = fixture
        .server
        .put(&format!("/api/v1/players/{}/preferences", Uuid::new_v4()))
        .json(&json!({ "preferred_player_count": 3 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_compatibility_flow() {
    let fixture = create_test_server().await;

    fixture
        .server
        .put(&format!("/api/v1/players/{}/preferences", fixture.alice.id))
        .json(&json!({
            "preferred_player_count": 3,
            "minimum_play_time": 30,
            "maximum_play_time": 90,
            "preferred_complexity_min": 2.0,
            "preferred_complexity_max": 3.0
        }))
        .await
        .assert_status_ok();

    let response = fixture
        .server
        .get(&format!("/api/v1/games/{}/compatibility", fixture.wingspan.id))
        .add_query_param("player_id", fixture.alice.id)
        .await;
    response.assert_status_ok();

    let result: serde_json::Value = response.json();
    assert_eq!(result["game_id"], fixture.wingspan.id.to_string());
    assert_eq!(result["player_id"], fixture.alice.id.to_string());
    assert_eq!(result["compatibility_score"], 0.875);
    assert_eq!(result["recommendation"], "recommended");
    assert_eq!(
        result["details"],
        json!({
            "player_count": "compatible",
            "play_time": "compatible",
            "complexity": "compatible",
            "categories": "no_preference"
        })
    );
}

#[tokio::test]
async fn test_compatibility_not_found() {
    let fixture = create_test_server().await;

    // No preferences stored for alice yet
    let response = fixture
        .server
        .get(&format!("/api/v1/games/{}/compatibility", fixture.wingspan.id))
        .add_query_param("player_id", fixture.alice.id)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = fixture
        .server
        .get(&format!("/api/v1/games/{}/compatibility", Uuid::new_v4()))
        .add_query_param("player_id", fixture.alice.id)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_curated_falls_back_without_history() {
    let fixture = create_test_server().await;

    let response = fixture.server.get("/api/v1/library/curated").await;
    response.assert_status_ok();
    let games: Vec<serde_json::Value> = response.json();
    assert_eq!(names(&games), vec!["Azul", "Brass", "Wingspan"]);

    let response = fixture
        .server
        .get("/api/v1/library/curated")
        .add_query_param("skip", 1)
        .add_query_param("limit", 1)
        .await;
    let games: Vec<serde_json::Value> = response.json();
    assert_eq!(names(&games), vec!["Brass"]);
}

#[tokio::test]
async fn test_curated_played_then_similar() {
    let fixture = create_test_server().await;
    fixture
        .catalog
        .record_play(PlayRecord::new(fixture.alice.id, fixture.wingspan.id))
        .await
        .unwrap();

    let response = fixture.server.get("/api/v1/library/curated").await;
    response.assert_status_ok();
    let games: Vec<serde_json::Value> = response.json();
    assert_eq!(names(&games), vec!["Wingspan", "Azul", "Solo Quest"]);

    let response = fixture
        .server
        .get("/api/v1/library/curated")
        .add_query_param("limit", 2)
        .await;
    let games: Vec<serde_json::Value> = response.json();
    assert_eq!(names(&games), vec!["Wingspan", "Azul"]);
}

#[tokio::test]
async fn test_curated_limit_is_validated() {
    let fixture = create_test_server().await;

    for limit in [0, 501] {
        let response = fixture
            .server
            .get("/api/v1/library/curated")
            .add_query_param("limit", limit)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_curated_count() {
    let fixture = create_test_server().await;

    let response = fixture.server.get("/api/v1/library/curated/count").await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "played_games": 0,
        "similar_games": 150,
        "total_curated": 150
    }));

    fixture
        .catalog
        .record_play(PlayRecord::new(fixture.alice.id, fixture.wingspan.id))
        .await
        .unwrap();

    let response = fixture.server.get("/api/v1/library/curated/count").await;
    response.assert_json(&json!({
        "played_games": 1,
        "similar_games": 149,
        "total_curated": 150
    }));
}

#[tokio::test]
async fn test_malformed_query_parameters_return_json_errors() {
    let fixture = create_test_server().await;

    for (key, value) in [("skip", "-1"), ("limit", "abc")] {
        let response = fixture
            .server
            .get("/api/v1/library/curated")
            .add_query_param(key, value)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["error"].is_string());
    }

    let response = fixture
        .server
        .get(&format!("/api/v1/games/{}/compatibility", fixture.wingspan.id))
        .add_query_param("player_id", "not-a-uuid")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());

    let response = fixture.server.get("/api/v1/games/not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_database_health_check() {
    let fixture = create_test_server().await;

    let response = fixture.server.get("/health/db").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(
        body["request_id"].as_str().unwrap(),
        response.header("x-request-id").to_str().unwrap()
    );
}

#[tokio::test]
async fn test_create_and_get_player() {
    let fixture = create_test_server().await;

    let response = fixture
        .server
        .post("/api/v1/players")
        .json(&json!({ "username": "carol_dice", "display_name": "Carol" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["display_name"], "Carol");

    let response = fixture
        .server
        .get(&format!("/api/v1/players/{}", created["id"].as_str().unwrap()))
        .await;
    response.assert_status_ok();
    let player: serde_json::Value = response.json();
    assert_eq!(player["username"], "carol_dice");

    let response = fixture
        .server
        .post("/api/v1/players")
        .json(&json!({ "username": "carol_dice" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = fixture
        .server
        .get(&format!("/api/v1/players/{}", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = fixture.server.get("/api/v1/players").await;
    let players: Vec<serde_json::Value> = response.json();
    let usernames: Vec<&str> = players
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(usernames, vec!["alice_gamer", "bob_plays", "carol_dice"]);
}

#[tokio::test]
async fn test_list_and_count_games_with_filters() {
    let fixture = create_test_server().await;

    let response = fixture
        .server
        .get("/api/v1/games")
        .add_query_param("max_play_time", 60)
        .add_query_param("min_complexity", 2.0)
        .await;
    response.assert_status_ok();
    let games: Vec<serde_json::Value> = response.json();
    assert_eq!(names(&games), vec!["Solo Quest", "Wingspan"]);

    let response = fixture
        .server
        .get("/api/v1/games/count")
        .add_query_param("max_play_time", 60)
        .add_query_param("min_complexity", 2.0)
        .await;
    response.assert_json(&json!({ "count": 2 }));

    let response = fixture
        .server
        .get("/api/v1/games")
        .add_query_param("min_players", 5)
        .add_query_param("max_players", 2)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = fixture.server.get("/api/v1/games/count").await;
    response.assert_json(&json!({ "count": 5 }));
}

#[tokio::test]
async fn test_create_game() {
    let fixture = create_test_server().await;

    let response = fixture
        .server
        .post("/api/v1/games")
        .json(&json!({
            "name": "Carcassonne",
            "min_players": 2,
            "max_players": 5,
            "average_play_time": 35,
            "complexity_rating": 1.9
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let game: serde_json::Value = response.json();

    let response = fixture
        .server
        .get(&format!("/api/v1/games/{}", game["id"].as_str().unwrap()))
        .await;
    response.assert_status_ok();

    let response = fixture
        .server
        .post("/api/v1/games")
        .json(&json!({
            "name": "WINGSPAN",
            "min_players": 1,
            "max_players": 5,
            "average_play_time": 60,
            "complexity_rating": 2.4
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = fixture
        .server
        .post("/api/v1/games")
        .json(&json!({ "name": "Missing fields" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
