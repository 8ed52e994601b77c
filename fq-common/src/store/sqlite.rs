//! SQLite-backed store
//!
//! Id sets cross the SQL boundary as JSON arrays and are expanded with
//! `json_each`, so a whole remaining set is written in one statement.

use super::{ImageCatalog, SessionStore};
use crate::models::{FilmImage, FrameMode, GameSession, NewFilmImage, Tier};
use crate::rotation::RotationSet;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeSet;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Fixed-width UTC timestamp so text comparison orders correctly
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Bad timestamp '{}': {}", raw, e)))
}

fn image_from_row(row: &SqliteRow) -> Result<FilmImage> {
    let tier: String = row.try_get("tier")?;
    let frame: String = row.try_get("frame")?;

    Ok(FilmImage {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        image: row.try_get("image")?,
        tier: tier
            .parse::<Tier>()
            .map_err(|e| Error::Internal(format!("Corrupt film_images row: {}", e)))?,
        frame: frame
            .parse::<FrameMode>()
            .map_err(|e| Error::Internal(format!("Corrupt film_images row: {}", e)))?,
        hint_1: row.try_get("hint_1")?,
        hint_2: row.try_get("hint_2")?,
    })
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn insert_session(&self, session: &GameSession) -> Result<()> {
        let rotation = serde_json::to_string(&session.current_tier_shown)?;
        let remaining = serde_json::to_string(&session.images_remaining)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO game_sessions
                (session_id, score, time_remaining, current_tier_shown, frame_mode, last_active)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.session_id)
        .bind(session.score as i64)
        .bind(session.time_remaining as i64)
        .bind(&rotation)
        .bind(session.frame_mode.as_str())
        .bind(format_timestamp(&session.last_active))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO session_remaining_images (session_id, image_id)
            SELECT ?, id FROM film_images
            WHERE id IN (SELECT value FROM json_each(?))
            "#,
        )
        .bind(&session.session_id)
        .bind(&remaining)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn load_session(&self, session_id: &str) -> Result<Option<GameSession>> {
        let row = sqlx::query(
            r#"
            SELECT session_id, score, time_remaining, current_tier_shown, frame_mode, last_active
            FROM game_sessions
            WHERE session_id = ?
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let remaining: Vec<i64> = sqlx::query_scalar(
            "SELECT image_id FROM session_remaining_images WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        let rotation: String = row.try_get("current_tier_shown")?;
        let frame_mode: String = row.try_get("frame_mode")?;
        let last_active: String = row.try_get("last_active")?;
        let score: i64 = row.try_get("score")?;
        let time_remaining: i64 = row.try_get("time_remaining")?;

        Ok(Some(GameSession {
            session_id: row.try_get("session_id")?,
            score: score.max(0) as u32,
            time_remaining: time_remaining.max(0) as u32,
            images_remaining: remaining.into_iter().collect(),
            current_tier_shown: serde_json::from_str::<RotationSet>(&rotation)?,
            frame_mode: frame_mode.parse()?,
            last_active: parse_timestamp(&last_active)?,
        }))
    }

    async fn save_session(&self, session: &GameSession) -> Result<()> {
        let rotation = serde_json::to_string(&session.current_tier_shown)?;
        let remaining = serde_json::to_string(&session.images_remaining)?;

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE game_sessions
            SET score = ?, time_remaining = ?, current_tier_shown = ?, frame_mode = ?, last_active = ?
            WHERE session_id = ?
            "#,
        )
        .bind(session.score as i64)
        .bind(session.time_remaining as i64)
        .bind(&rotation)
        .bind(session.frame_mode.as_str())
        .bind(format_timestamp(&session.last_active))
        .bind(&session.session_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::SessionNotFound(session.session_id.clone()));
        }

        sqlx::query(
            r#"
            DELETE FROM session_remaining_images
            WHERE session_id = ?
              AND image_id NOT IN (SELECT value FROM json_each(?))
            "#,
        )
        .bind(&session.session_id)
        .bind(&remaining)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO session_remaining_images (session_id, image_id)
            SELECT ?, id FROM film_images
            WHERE id IN (SELECT value FROM json_each(?))
            "#,
        )
        .bind(&session.session_id)
        .bind(&remaining)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn purge_sessions_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM game_sessions WHERE last_active < ?")
            .bind(format_timestamp(&cutoff))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_sessions(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM game_sessions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ImageCatalog for SqliteStore {
    async fn insert_image(&self, image: &NewFilmImage) -> Result<FilmImage> {
        let result = sqlx::query(
            r#"
            INSERT INTO film_images (title, image, tier, frame, hint_1, hint_2)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&image.title)
        .bind(&image.image)
        .bind(image.tier.as_str())
        .bind(image.frame.as_str())
        .bind(&image.hint_1)
        .bind(&image.hint_2)
        .execute(&self.pool)
        .await?;

        Ok(image.clone().into_image(result.last_insert_rowid()))
    }

    async fn get_image(&self, id: i64) -> Result<Option<FilmImage>> {
        let row = sqlx::query(
            "SELECT id, title, image, tier, frame, hint_1, hint_2 FROM film_images WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(image_from_row).transpose()
    }

    async fn images_by_ids(&self, ids: &BTreeSet<i64>) -> Result<Vec<FilmImage>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, title, image, tier, frame, hint_1, hint_2
            FROM film_images
            WHERE id IN (SELECT value FROM json_each(?))
            ORDER BY id
            "#,
        )
        .bind(serde_json::to_string(ids)?)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(image_from_row).collect()
    }

    async fn image_ids_by_frame(&self, frame: FrameMode) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM film_images WHERE frame = ? ORDER BY id")
            .bind(frame.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn count_by_tier(&self, tier: Tier) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM film_images WHERE tier = ?")
            .bind(tier.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn retain_per_tier(&self, tier: Tier, keep: usize) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM film_images
            WHERE tier = ?
              AND id NOT IN (
                SELECT id FROM film_images WHERE tier = ? ORDER BY id LIMIT ?
              )
            "#,
        )
        .bind(tier.as_str())
        .bind(tier.as_str())
        .bind(keep as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
