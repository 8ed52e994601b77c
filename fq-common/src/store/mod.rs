//! State store abstraction
//!
//! The game logic only talks to these traits. `SqliteStore` is the
//! production backend; `MemoryStore` backs unit tests and throwaway games.

use crate::models::{FilmImage, FrameMode, GameSession, NewFilmImage, Tier};
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Keyed storage of game sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a brand new session together with its remaining set
    async fn insert_session(&self, session: &GameSession) -> Result<()>;

    async fn load_session(&self, session_id: &str) -> Result<Option<GameSession>>;

    /// Write score, rotation, remaining set and `last_active` as one unit.
    ///
    /// Fails with `SessionNotFound` if the session was purged meanwhile.
    async fn save_session(&self, session: &GameSession) -> Result<()>;

    /// Delete sessions whose `last_active` is before `cutoff`
    async fn purge_sessions_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    async fn count_sessions(&self) -> Result<u64>;
}

/// Film still catalog
#[async_trait]
pub trait ImageCatalog: Send + Sync {
    async fn insert_image(&self, image: &NewFilmImage) -> Result<FilmImage>;

    async fn get_image(&self, id: i64) -> Result<Option<FilmImage>>;

    /// Stills for the given ids, ordered by id. Unknown ids are skipped.
    async fn images_by_ids(&self, ids: &BTreeSet<i64>) -> Result<Vec<FilmImage>>;

    async fn image_ids_by_frame(&self, frame: FrameMode) -> Result<Vec<i64>>;

    async fn count_by_tier(&self, tier: Tier) -> Result<u64>;

    /// Keep the `keep` lowest-id stills of a tier and delete the rest.
    /// Deleted stills also drop out of every session's remaining set.
    async fn retain_per_tier(&self, tier: Tier, keep: usize) -> Result<u64>;
}

/// Everything the game service needs from storage
pub trait GameStore: SessionStore + ImageCatalog {}

impl<T: SessionStore + ImageCatalog> GameStore for T {}
