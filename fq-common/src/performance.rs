//! End-of-game performance messages
//!
//! A ranked table of score ranges loaded from `performance_score.json`. The
//! first range containing the final score wins; a fixed default covers an
//! unreadable file or a score that matches nothing.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, warn};

pub const DEFAULT_MESSAGE: &str = "You're not wrong, you're just out of frames!";
pub const DEFAULT_IMAGE: &str = "performance/lebowski.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceTier {
    pub min_score: u32,
    pub max_score: u32,
    pub message: String,
    pub image: String,
}

#[derive(Debug, Clone, Default)]
pub struct PerformanceTable {
    tiers: Vec<PerformanceTier>,
}

impl PerformanceTable {
    pub fn new(tiers: Vec<PerformanceTier>) -> Self {
        Self { tiers }
    }

    /// Load from a JSON array; any failure yields an empty table
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                error!("Error loading performance scores from {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<PerformanceTier>>(&content) {
            Ok(tiers) => Self { tiers },
            Err(e) => {
                error!("Error parsing performance scores in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Message and image for a final score
    pub fn lookup(&self, score: u32) -> (&str, &str) {
        match self
            .tiers
            .iter()
            .find(|t| t.min_score <= score && score <= t.max_score)
        {
            Some(tier) => (tier.message.as_str(), tier.image.as_str()),
            None => {
                warn!("No performance tier matches score {}, using default", score);
                (DEFAULT_MESSAGE, DEFAULT_IMAGE)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tier(min: u32, max: u32, message: &str) -> PerformanceTier {
        PerformanceTier {
            min_score: min,
            max_score: max,
            message: message.to_string(),
            image: format!("performance/{}.png", min),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let table = PerformanceTable::new(vec![
            tier(0, 10, "Rookie"),
            tier(5, 20, "Overlap"),
            tier(21, 50, "Cinephile"),
        ]);
        assert_eq!(table.lookup(7).0, "Rookie");
        assert_eq!(table.lookup(15).0, "Overlap");
        assert_eq!(table.lookup(50), ("Cinephile", "performance/21.png"));
    }

    #[test]
    fn test_unmatched_score_uses_default() {
        let table = PerformanceTable::new(vec![tier(0, 10, "Rookie")]);
        assert_eq!(table.lookup(11), (DEFAULT_MESSAGE, DEFAULT_IMAGE));
    }

    #[test]
    fn test_missing_file_is_empty_table() {
        let table = PerformanceTable::load(Path::new("/nonexistent/performance_score.json"));
        assert!(table.is_empty());
        assert_eq!(table.lookup(3), (DEFAULT_MESSAGE, DEFAULT_IMAGE));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"min_score": 0, "max_score": 49, "message": "Keep watching", "image": "performance/popcorn.png"}},
                {{"min_score": 50, "max_score": 50, "message": "Perfect", "image": "performance/oscar.png"}}]"#
        )
        .unwrap();

        let table = PerformanceTable::load(file.path());
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(50), ("Perfect", "performance/oscar.png"));
    }

    #[test]
    fn test_malformed_file_is_empty_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(PerformanceTable::load(file.path()).is_empty());
    }
}
