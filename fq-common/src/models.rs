//! Domain models

use crate::rotation::RotationSet;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Seconds on the client-side countdown for a fresh session
pub const DEFAULT_TIME_REMAINING: u32 = 90;

/// Difficulty bucket assigned to each film still
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "Easy",
            Tier::Medium => "Medium",
            Tier::Hard => "Hard",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Tier::Easy),
            "medium" => Ok(Tier::Medium),
            "hard" => Ok(Tier::Hard),
            other => Err(Error::InvalidInput(format!("unknown tier '{}'", other))),
        }
    }
}

/// Whether the displayed still is the first or last frame of a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameMode {
    #[default]
    First,
    Last,
}

impl FrameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameMode::First => "first",
            FrameMode::Last => "last",
        }
    }

    /// Parse a mode supplied by a player, falling back to `First` on anything
    /// unrecognised
    pub fn parse_or_default(s: Option<&str>) -> Self {
        match s {
            None => FrameMode::First,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid mode '{}' provided, defaulting to 'first'", raw);
                FrameMode::First
            }),
        }
    }
}

impl fmt::Display for FrameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(FrameMode::First),
            "last" => Ok(FrameMode::Last),
            other => Err(Error::InvalidInput(format!("unknown frame mode '{}'", other))),
        }
    }
}

/// A film still that players must identify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmImage {
    pub id: i64,
    pub title: String,
    /// Path relative to the media root, e.g. `film_images/heat.jpg`
    pub image: String,
    pub tier: Tier,
    pub frame: FrameMode,
    pub hint_1: Option<String>,
    pub hint_2: Option<String>,
}

impl FilmImage {
    /// Non-empty hints in display order
    pub fn hints(&self) -> Vec<&str> {
        [self.hint_1.as_deref(), self.hint_2.as_deref()]
            .into_iter()
            .flatten()
            .filter(|h| !h.trim().is_empty())
            .collect()
    }
}

/// Film still before it has been assigned an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFilmImage {
    pub title: String,
    pub image: String,
    pub tier: Tier,
    pub frame: FrameMode,
    pub hint_1: Option<String>,
    pub hint_2: Option<String>,
}

impl NewFilmImage {
    pub fn new(title: impl Into<String>, image: impl Into<String>, tier: Tier, frame: FrameMode) -> Self {
        Self {
            title: title.into(),
            image: image.into(),
            tier,
            frame,
            hint_1: None,
            hint_2: None,
        }
    }

    pub fn with_hints(mut self, hint_1: Option<&str>, hint_2: Option<&str>) -> Self {
        self.hint_1 = blank_to_none(hint_1);
        self.hint_2 = blank_to_none(hint_2);
        self
    }

    pub fn into_image(self, id: i64) -> FilmImage {
        FilmImage {
            id,
            title: self.title,
            image: self.image,
            tier: self.tier,
            frame: self.frame,
            hint_1: self.hint_1,
            hint_2: self.hint_2,
        }
    }
}

fn blank_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Per-player game state, one row per session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub session_id: String,
    pub score: u32,
    pub time_remaining: u32,
    /// Ids of stills not yet answered correctly
    pub images_remaining: BTreeSet<i64>,
    /// Rotation exclusion set for the current tier window
    pub current_tier_shown: RotationSet,
    pub frame_mode: FrameMode,
    pub last_active: DateTime<Utc>,
}

impl GameSession {
    /// Fresh session with a random v4 id
    pub fn new(frame_mode: FrameMode, images_remaining: impl IntoIterator<Item = i64>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            score: 0,
            time_remaining: DEFAULT_TIME_REMAINING,
            images_remaining: images_remaining.into_iter().collect(),
            current_tier_shown: RotationSet::new(),
            frame_mode,
            last_active: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}
