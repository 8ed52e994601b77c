//! Session progression
//!
//! `GameService` is the boundary the web layer calls into. Each operation
//! is a read-modify-write of one session, serialized per session id by a
//! striped lock so two requests for the same game cannot interleave inside
//! one process.

use crate::answer::is_answer_correct;
use crate::config::DEFAULT_MEDIA_URL;
use crate::models::{FilmImage, FrameMode, GameSession};
use crate::performance::PerformanceTable;
use crate::random::{RandomSource, ThreadRandom};
use crate::selector::select_next;
use crate::store::GameStore;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Score that ends the game
pub const WINNING_SCORE: u32 = 50;

/// Longest accepted answer, in characters
pub const MAX_ANSWER_LEN: usize = 255;

pub const CORRECT_MESSAGE: &str = "Correct!";
pub const INCORRECT_MESSAGE: &str = "Incorrect!";

/// Consolation lines for a wrong guess
pub const CONSOLATION_QUOTES: &[&str] = &[
    "You're gonna need a bigger boat.",
    "Not quite my tempo!",
    "Why do we fall Master Bruce... to pick ourselves back up.",
    "I didn't hear no bell!",
    "We who are about to die, salute you!",
    "I'll be back.",
    "I know it was you, Fredo!",
    "What we got here, is a failure to communicate.",
    "It's like finding a needle in a stack of needles.",
    "It's only after we've lost everything that we're free to do anything.",
    "There's no crying in baseball",
    "Houston, we have a problem",
];

const LOCK_STRIPES: usize = 64;

/// What the client needs to render a still; the title stays server-side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDescriptor {
    pub id: i64,
    pub url: String,
    pub hint_count: usize,
    pub score: u32,
    pub time_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextImage {
    Image(ImageDescriptor),
    GameOver { score: u32 },
}

impl NextImage {
    pub fn is_game_over(&self) -> bool {
        matches!(self, NextImage::GameOver { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub score: u32,
    pub message: String,
    pub movie_title: String,
    /// Only set for wrong answers
    pub quote: Option<String>,
    pub next: NextImage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub message: String,
    pub image: String,
}

pub struct GameService {
    store: Arc<dyn GameStore>,
    random: Arc<dyn RandomSource>,
    performance: PerformanceTable,
    media_url: String,
    locks: Vec<Mutex<()>>,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            store,
            random: Arc::new(ThreadRandom),
            performance: PerformanceTable::default(),
            media_url: DEFAULT_MEDIA_URL.to_string(),
            locks: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_performance_table(mut self, table: PerformanceTable) -> Self {
        self.performance = table;
        self
    }

    pub fn with_media_url(mut self, media_url: impl Into<String>) -> Self {
        let mut url = media_url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.media_url = url;
        self
    }

    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    fn lock_for(&self, session_id: &str) -> &Mutex<()> {
        let mut hasher = DefaultHasher::new();
        session_id.hash(&mut hasher);
        &self.locks[(hasher.finish() as usize) % self.locks.len()]
    }

    async fn load_session(&self, session_id: &str) -> Result<GameSession> {
        self.store
            .load_session(session_id)
            .await?
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))
    }

    async fn load_image(&self, image_id: i64) -> Result<FilmImage> {
        self.store
            .get_image(image_id)
            .await?
            .ok_or(Error::ImageNotFound(image_id))
    }

    fn describe(&self, image: &FilmImage, session: &GameSession) -> ImageDescriptor {
        ImageDescriptor {
            id: image.id,
            url: format!("{}{}", self.media_url, image.image.trim_start_matches('/')),
            hint_count: image.hints().len(),
            score: session.score,
            time_remaining: session.time_remaining,
        }
    }

    /// Pick the next still and persist the rotation change
    async fn advance(&self, session: &mut GameSession, current_image: Option<i64>) -> Result<NextImage> {
        let remaining = self.store.images_by_ids(&session.images_remaining).await?;
        let picked = select_next(
            session.score,
            &remaining,
            &mut session.current_tier_shown,
            current_image,
            self.random.as_ref(),
        )
        .cloned();

        session.touch();
        self.store.save_session(session).await?;

        match picked {
            Some(image) => {
                debug!("Session {} shows image {}", session.session_id, image.id);
                Ok(NextImage::Image(self.describe(&image, session)))
            }
            None => {
                info!(
                    "No next image for session {}, ending with score {}",
                    session.session_id, session.score
                );
                Ok(NextImage::GameOver { score: session.score })
            }
        }
    }

    /// Create a session holding every still of the chosen frame mode
    pub async fn start(&self, frame_mode: FrameMode) -> Result<GameSession> {
        let image_ids = self.store.image_ids_by_frame(frame_mode).await?;
        let session = GameSession::new(frame_mode, image_ids);
        self.store.insert_session(&session).await?;

        info!(
            "Started new game session: {} with mode: {} ({} images)",
            session.session_id,
            frame_mode,
            session.images_remaining.len()
        );
        Ok(session)
    }

    /// Next still to show, never `current_image_id` itself
    pub async fn next(&self, session_id: &str, current_image_id: Option<i64>) -> Result<NextImage> {
        let _guard = self.lock_for(session_id).lock().await;
        let mut session = self.load_session(session_id).await?;

        if session.images_remaining.is_empty() {
            info!("No images remaining for session {}", session_id);
            return Ok(NextImage::GameOver { score: session.score });
        }

        self.advance(&mut session, current_image_id).await
    }

    /// Judge an answer, update the score and fetch the following still.
    ///
    /// Only stills still in play can be answered; anything else is invalid input.
    pub async fn submit_answer(&self, session_id: &str, image_id: i64, answer: &str) -> Result<AnswerOutcome> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(Error::InvalidInput("answer is required".to_string()));
        }
        if answer.chars().count() > MAX_ANSWER_LEN {
            return Err(Error::InvalidInput(format!(
                "answer longer than {} characters",
                MAX_ANSWER_LEN
            )));
        }

        let _guard = self.lock_for(session_id).lock().await;
        let mut session = self.load_session(session_id).await?;
        let image = self.load_image(image_id).await?;
        if !session.images_remaining.contains(&image.id) {
            return Err(Error::InvalidInput(format!(
                "image {} is not in play for session {}",
                image.id, session_id
            )));
        }

        let correct = is_answer_correct(answer, &image.title);
        let (message, quote) = if correct {
            session.score += 1;
            session.images_remaining.remove(&image.id);
            (CORRECT_MESSAGE, None)
        } else {
            let quote = CONSOLATION_QUOTES[self.random.pick_index(CONSOLATION_QUOTES.len())];
            (INCORRECT_MESSAGE, Some(quote.to_string()))
        };

        let next = if session.score >= WINNING_SCORE {
            info!("Session {} reached a score of {}, ending game", session_id, session.score);
            session.touch();
            self.store.save_session(&session).await?;
            NextImage::GameOver { score: session.score }
        } else {
            self.advance(&mut session, Some(image.id)).await?
        };

        Ok(AnswerOutcome {
            correct,
            score: session.score,
            message: message.to_string(),
            movie_title: image.title,
            quote,
            next,
        })
    }

    /// Move past a still without touching the score
    pub async fn skip(&self, session_id: &str, image_id: i64) -> Result<NextImage> {
        let _guard = self.lock_for(session_id).lock().await;
        let mut session = self.load_session(session_id).await?;
        let image = self.load_image(image_id).await?;

        self.advance(&mut session, Some(image.id)).await
    }

    /// Hint number `hint_index`, wrapping around the available hints
    pub async fn hint(&self, image_id: i64, hint_index: usize) -> Result<String> {
        let image = self.load_image(image_id).await?;
        let hints = image.hints();
        if hints.is_empty() {
            info!("No hints available for image ID {}", image_id);
            return Err(Error::NoHints(image_id));
        }

        Ok(format!("\"{}\"", hints[hint_index % hints.len()]))
    }

    /// Final score and performance verdict; clears the rotation window
    pub async fn end(&self, session_id: &str) -> Result<GameSummary> {
        let _guard = self.lock_for(session_id).lock().await;
        let mut session = self.load_session(session_id).await?;

        session.current_tier_shown.reset();
        session.touch();
        self.store.save_session(&session).await?;

        let (message, image) = self.performance.lookup(session.score);
        info!("Ending game for session {} with score {}", session_id, session.score);

        Ok(GameSummary {
            score: session.score,
            message: message.to_string(),
            image: image.to_string(),
        })
    }
}
