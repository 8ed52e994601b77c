//! In-memory store

use super::{ImageCatalog, SessionStore};
use crate::models::{FilmImage, FrameMode, GameSession, NewFilmImage, Tier};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    images: BTreeMap<i64, FilmImage>,
    next_image_id: i64,
    sessions: HashMap<String, GameSession>,
}

/// Process-local store; contents vanish on drop
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(&self, session: &GameSession) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.sessions.contains_key(&session.session_id) {
            return Err(Error::InvalidInput(format!(
                "session {} already exists",
                session.session_id
            )));
        }
        let mut stored = session.clone();
        stored.images_remaining.retain(|id| inner.images.contains_key(id));
        inner.sessions.insert(stored.session_id.clone(), stored);
        Ok(())
    }

    async fn load_session(&self, session_id: &str) -> Result<Option<GameSession>> {
        Ok(self.inner.read().await.sessions.get(session_id).cloned())
    }

    async fn save_session(&self, session: &GameSession) -> Result<()> {
        let mut inner = self.inner.write().await;
        let Inner { images, sessions, .. } = &mut *inner;
        let stored = sessions
            .get_mut(&session.session_id)
            .ok_or_else(|| Error::SessionNotFound(session.session_id.clone()))?;
        *stored = session.clone();
        stored.images_remaining.retain(|id| images.contains_key(id));
        Ok(())
    }

    async fn purge_sessions_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.sessions.len();
        inner.sessions.retain(|_, s| s.last_active >= cutoff);
        Ok((before - inner.sessions.len()) as u64)
    }

    async fn count_sessions(&self) -> Result<u64> {
        Ok(self.inner.read().await.sessions.len() as u64)
    }
}

#[async_trait]
impl ImageCatalog for MemoryStore {
    async fn insert_image(&self, image: &NewFilmImage) -> Result<FilmImage> {
        let mut inner = self.inner.write().await;
        inner.next_image_id += 1;
        let stored = image.clone().into_image(inner.next_image_id);
        inner.images.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_image(&self, id: i64) -> Result<Option<FilmImage>> {
        Ok(self.inner.read().await.images.get(&id).cloned())
    }

    async fn images_by_ids(&self, ids: &BTreeSet<i64>) -> Result<Vec<FilmImage>> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.images.get(id).cloned())
            .collect())
    }

    async fn image_ids_by_frame(&self, frame: FrameMode) -> Result<Vec<i64>> {
        let inner = self.inner.read().await;
        Ok(inner
            .images
            .values()
            .filter(|i| i.frame == frame)
            .map(|i| i.id)
            .collect())
    }

    async fn count_by_tier(&self, tier: Tier) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.images.values().filter(|i| i.tier == tier).count() as u64)
    }

    async fn retain_per_tier(&self, tier: Tier, keep: usize) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let doomed: Vec<i64> = inner
            .images
            .values()
            .filter(|i| i.tier == tier)
            .map(|i| i.id)
            .skip(keep)
            .collect();

        for id in &doomed {
            inner.images.remove(id);
        }
        for session in inner.sessions.values_mut() {
            session.images_remaining.retain(|id| !doomed.contains(id));
        }
        Ok(doomed.len() as u64)
    }
}
