//! # FrameQuiz Common Library
//!
//! Shared code for the FrameQuiz game server and admin tool:
//! - Domain model (film stills, game sessions, tiers, frame modes)
//! - Tier selection and rotation bookkeeping
//! - Fuzzy answer evaluation
//! - Session progression service
//! - State store abstraction with SQLite and in-memory backends
//! - Configuration loading and database bootstrap

pub mod answer;
pub mod config;
pub mod db;
pub mod error;
pub mod game;
pub mod models;
pub mod performance;
pub mod random;
pub mod rotation;
pub mod selector;
pub mod store;

pub use error::{Error, Result};
pub use game::{AnswerOutcome, GameService, GameSummary, ImageDescriptor, NextImage};
pub use models::{FilmImage, FrameMode, GameSession, NewFilmImage, Tier};
pub use random::{FixedRandom, RandomSource, ThreadRandom};
pub use rotation::RotationSet;
pub use store::{GameStore, ImageCatalog, MemoryStore, SessionStore, SqliteStore};
