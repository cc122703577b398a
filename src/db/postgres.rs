use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Game, GameQuery, GenericFilter, Player, PlayerPreferences, SimilarityWindow},
    services::catalog::{GameCatalog, PlayerStore, PreferenceStore},
};

/// Creates a PostgreSQL connection pool and brings the schema up to date
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Selects games with their category ids folded into an array
const GAME_SELECT: &str = r#"
    SELECT g.id, g.name, g.min_players, g.max_players, g.average_play_time,
           g.complexity_rating,
           COALESCE(
               array_agg(gc.category_id) FILTER (WHERE gc.category_id IS NOT NULL),
               '{}'
           ) AS category_ids
    FROM games g
    LEFT JOIN games_categories gc ON gc.game_id = g.id
"#;

#[derive(Debug, FromRow)]
struct GameRow {
    id: Uuid,
    name: String,
    min_players: i32,
    max_players: i32,
    average_play_time: i32,
    complexity_rating: f64,
    category_ids: Vec<Uuid>,
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Game {
            id: row.id,
            name: row.name,
            min_players: row.min_players,
            max_players: row.max_players,
            average_play_time: row.average_play_time,
            complexity_rating: row.complexity_rating,
            category_ids: row.category_ids.into_iter().collect(),
        }
    }
}

#[derive(Debug, FromRow)]
struct PreferencesRow {
    player_id: Uuid,
    minimum_play_time: Option<i32>,
    maximum_play_time: Option<i32>,
    preferred_player_count: Option<i32>,
    preferred_complexity_min: Option<f64>,
    preferred_complexity_max: Option<f64>,
    preferred_category_ids: Vec<Uuid>,
}

impl From<PreferencesRow> for PlayerPreferences {
    fn from(row: PreferencesRow) -> Self {
        PlayerPreferences {
            player_id: row.player_id,
            minimum_play_time: row.minimum_play_time,
            maximum_play_time: row.maximum_play_time,
            preferred_player_count: row.preferred_player_count,
            preferred_complexity_min: row.preferred_complexity_min,
            preferred_complexity_max: row.preferred_complexity_max,
            preferred_category_ids: row.preferred_category_ids.into_iter().collect(),
        }
    }
}

#[derive(Debug, FromRow)]
struct PlayerRow {
    id: Uuid,
    username: String,
    display_name: Option<String>,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Player {
            id: row.id,
            username: row.username,
            display_name: row.display_name,
        }
    }
}

/// Optional bounds of a [`GameQuery`]; a NULL parameter disables its condition
const GAME_QUERY_WHERE: &str = r#"
    WHERE ($1::int IS NULL OR g.max_players >= $1)
      AND ($2::int IS NULL OR g.min_players <= $2)
      AND ($3::int IS NULL OR g.average_play_time >= $3)
      AND ($4::int IS NULL OR g.average_play_time <= $4)
      AND ($5::float8 IS NULL OR g.complexity_rating >= $5)
      AND ($6::float8 IS NULL OR g.complexity_rating <= $6)
"#;

/// Links existing categories only; unknown ids produce no row
const LINK_GAME_CATEGORIES: &str = r#"
    INSERT INTO games_categories (game_id, category_id)
    SELECT $1, c.id FROM game_categories c WHERE c.id = ANY($2)
    RETURNING category_id
"#;

const LINK_PREFERRED_CATEGORIES: &str = r#"
    INSERT INTO player_preferred_categories (preference_id, category_id)
    SELECT $1, c.id FROM game_categories c WHERE c.id = ANY($2)
    RETURNING category_id
"#;

/// Clamps a page parameter into Postgres' BIGINT range
fn to_sql_count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Catalog backed by PostgreSQL
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameCatalog for PgCatalog {
    async fn games_played_by(&self, usernames: &[String]) -> AppResult<Vec<Game>> {
        let query = format!(
            r#"{GAME_SELECT}
            WHERE g.id IN (
                SELECT h.game_id
                FROM player_game_history h
                JOIN players p ON p.id = h.player_id
                WHERE p.username = ANY($1)
            )
            GROUP BY g.id
            ORDER BY g.name, g.id"#
        );

        let rows = sqlx::query_as::<_, GameRow>(&query)
            .bind(usernames)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(players = usernames.len(), games = rows.len(), "Loaded played games");

        Ok(rows.into_iter().map(Game::from).collect())
    }

    async fn similar_games(
        &self,
        window: &SimilarityWindow,
        excluding: &HashSet<Uuid>,
        limit: usize,
    ) -> AppResult<Vec<Game>> {
        let query = format!(
            r#"{GAME_SELECT}
            WHERE g.min_players >= $1
              AND g.max_players <= $2
              AND g.average_play_time BETWEEN $3 AND $4
              AND g.complexity_rating BETWEEN $5 AND $6
              AND NOT (g.id = ANY($7))
            GROUP BY g.id
            ORDER BY g.name, g.id
            LIMIT $8"#
        );
        let excluded: Vec<Uuid> = excluding.iter().copied().collect();

        let rows = sqlx::query_as::<_, GameRow>(&query)
            .bind(window.min_players)
            .bind(window.max_players)
            .bind(window.min_play_time)
            .bind(window.max_play_time)
            .bind(window.min_complexity)
            .bind(window.max_complexity)
            .bind(&excluded)
            .bind(to_sql_count(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Game::from).collect())
    }

    async fn filter_games(
        &self,
        filter: &GenericFilter,
        skip: usize,
        limit: usize,
    ) -> AppResult<Vec<Game>> {
        self.list_games(&GameQuery::from(*filter), skip, limit).await
    }

    async fn get_game(&self, id: Uuid) -> AppResult<Option<Game>> {
        let query = format!("{GAME_SELECT} WHERE g.id = $1 GROUP BY g.id");

        let row = sqlx::query_as::<_, GameRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Game::from))
    }

    async fn list_games(
        &self,
        query: &GameQuery,
        skip: usize,
        limit: usize,
    ) -> AppResult<Vec<Game>> {
        let sql = format!(
            r#"{GAME_SELECT}
            {GAME_QUERY_WHERE}
            GROUP BY g.id
            ORDER BY g.name, g.id
            OFFSET $7
            LIMIT $8"#
        );

        let rows = sqlx::query_as::<_, GameRow>(&sql)
            .bind(query.min_players)
            .bind(query.max_players)
            .bind(query.min_play_time)
            .bind(query.max_play_time)
            .bind(query.min_complexity)
            .bind(query.max_complexity)
            .bind(to_sql_count(skip))
            .bind(to_sql_count(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Game::from).collect())
    }

    async fn count_games(&self, query: &GameQuery) -> AppResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM games g {GAME_QUERY_WHERE}");

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(query.min_players)
            .bind(query.max_players)
            .bind(query.min_play_time)
            .bind(query.max_play_time)
            .bind(query.min_complexity)
            .bind(query.max_complexity)
            .fetch_one(&self.pool)
            .await?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn create_game(&self, mut game: Game) -> AppResult<Game> {
        game.validate()?;

        let mut tx = self.pool.begin().await?;

        let name_taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM games WHERE lower(name) = lower($1))")
                .bind(&game.name)
                .fetch_one(&mut *tx)
                .await?;
        if name_taken {
            return Err(AppError::InvalidInput(format!(
                "Game {} already exists",
                game.name
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO games (id, name, min_players, max_players, average_play_time, complexity_rating)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(game.id)
        .bind(&game.name)
        .bind(game.min_players)
        .bind(game.max_players)
        .bind(game.average_play_time)
        .bind(game.complexity_rating)
        .execute(&mut *tx)
        .await?;

        let requested: Vec<Uuid> = game.category_ids.iter().copied().collect();
        let linked: Vec<Uuid> = sqlx::query_scalar(LINK_GAME_CATEGORIES)
            .bind(game.id)
            .bind(&requested)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        game.category_ids = linked.into_iter().collect();
        tracing::info!(game_id = %game.id, name = %game.name, "Created game");

        Ok(game)
    }

    async fn ping(&self) -> AppResult<()> {
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        if one != 1 {
            return Err(AppError::Internal(
                "Database returned an unexpected result".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerStore for PgCatalog {
    async fn create_player(&self, player: Player) -> AppResult<Player> {
        player.validate()?;

        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM players WHERE username = $1)")
                .bind(&player.username)
                .fetch_one(&self.pool)
                .await?;
        if taken {
            return Err(AppError::InvalidInput(format!(
                "Username {} is already taken",
                player.username
            )));
        }

        sqlx::query("INSERT INTO players (id, username, display_name) VALUES ($1, $2, $3)")
            .bind(player.id)
            .bind(&player.username)
            .bind(&player.display_name)
            .execute(&self.pool)
            .await?;

        tracing::info!(player_id = %player.id, username = %player.username, "Created player");

        Ok(player)
    }

    async fn get_player(&self, id: Uuid) -> AppResult<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>(
            "SELECT id, username, display_name FROM players WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Player::from))
    }

    async fn list_players(&self, skip: usize, limit: usize) -> AppResult<Vec<Player>> {
        let rows = sqlx::query_as::<_, PlayerRow>(
            "SELECT id, username, display_name FROM players ORDER BY username OFFSET $1 LIMIT $2",
        )
        .bind(to_sql_count(skip))
        .bind(to_sql_count(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Player::from).collect())
    }
}

#[async_trait]
impl PreferenceStore for PgCatalog {
    async fn get_preferences(&self, player_id: Uuid) -> AppResult<Option<PlayerPreferences>> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r#"
            SELECT pp.player_id, pp.minimum_play_time, pp.maximum_play_time,
                   pp.preferred_player_count, pp.preferred_complexity_min,
                   pp.preferred_complexity_max,
                   COALESCE(
                       array_agg(pc.category_id) FILTER (WHERE pc.category_id IS NOT NULL),
                       '{}'
                   ) AS preferred_category_ids
            FROM player_preferences pp
            LEFT JOIN player_preferred_categories pc ON pc.preference_id = pp.id
            WHERE pp.player_id = $1
            GROUP BY pp.id
            "#,
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PlayerPreferences::from))
    }

    async fn put_preferences(
        &self,
        mut preferences: PlayerPreferences,
    ) -> AppResult<PlayerPreferences> {
        preferences.validate()?;

        let mut tx = self.pool.begin().await?;

        let player_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM players WHERE id = $1)")
                .bind(preferences.player_id)
                .fetch_one(&mut *tx)
                .await?;
        if !player_exists {
            return Err(AppError::NotFound(format!("Player {}", preferences.player_id)));
        }

        let preference_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO player_preferences (
                id, player_id, minimum_play_time, maximum_play_time, preferred_player_count,
                preferred_complexity_min, preferred_complexity_max
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (player_id) DO UPDATE SET
                minimum_play_time = EXCLUDED.minimum_play_time,
                maximum_play_time = EXCLUDED.maximum_play_time,
                preferred_player_count = EXCLUDED.preferred_player_count,
                preferred_complexity_min = EXCLUDED.preferred_complexity_min,
                preferred_complexity_max = EXCLUDED.preferred_complexity_max,
                updated_at = now()
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(preferences.player_id)
        .bind(preferences.minimum_play_time)
        .bind(preferences.maximum_play_time)
        .bind(preferences.preferred_player_count)
        .bind(preferences.preferred_complexity_min)
        .bind(preferences.preferred_complexity_max)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM player_preferred_categories WHERE preference_id = $1")
            .bind(preference_id)
            .execute(&mut *tx)
            .await?;

        let requested: Vec<Uuid> = preferences.preferred_category_ids.iter().copied().collect();
        let linked: Vec<Uuid> = sqlx::query_scalar(LINK_PREFERRED_CATEGORIES)
            .bind(preference_id)
            .bind(&requested)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        preferences.preferred_category_ids = linked.into_iter().collect();
        tracing::info!(player_id = %preferences.player_id, "Stored player preferences");

        Ok(preferences)
    }
}
