//! Database initialization
//!
//! Creates the database file on first run and brings the schema up to date.
//! Every statement is idempotent so startup can always run it.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open (creating if needed) the game database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;
    Ok(pool)
}

/// Private in-memory database with the full schema.
///
/// Limited to one connection: every SQLite memory connection is its own
/// database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    Ok(pool)
}

pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_film_images_table(pool).await?;
    create_game_sessions_table(pool).await?;
    create_session_remaining_images_table(pool).await?;
    Ok(())
}

async fn create_film_images_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS film_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            image TEXT NOT NULL,
            tier TEXT NOT NULL CHECK (tier IN ('Easy', 'Medium', 'Hard')),
            frame TEXT NOT NULL DEFAULT 'first' CHECK (frame IN ('first', 'last')),
            hint_1 TEXT,
            hint_2 TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_film_images_tier ON film_images(tier)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_film_images_frame ON film_images(frame)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_game_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS game_sessions (
            session_id TEXT PRIMARY KEY,
            score INTEGER NOT NULL DEFAULT 0 CHECK (score >= 0),
            time_remaining INTEGER NOT NULL DEFAULT 90 CHECK (time_remaining >= 0),
            current_tier_shown TEXT NOT NULL DEFAULT '[]',
            frame_mode TEXT NOT NULL DEFAULT 'first' CHECK (frame_mode IN ('first', 'last')),
            last_active TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_game_sessions_last_active ON game_sessions(last_active)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_session_remaining_images_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session_remaining_images (
            session_id TEXT NOT NULL REFERENCES game_sessions(session_id) ON DELETE CASCADE,
            image_id INTEGER NOT NULL REFERENCES film_images(id) ON DELETE CASCADE,
            PRIMARY KEY (session_id, image_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
