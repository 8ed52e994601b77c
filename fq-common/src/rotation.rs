//! Rotation exclusion set
//!
//! Tracks which stills have already been offered in the current tier window.
//! Once every eligible still has been shown the set is reset and the window
//! starts over.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RotationSet {
    shown: BTreeSet<i64>,
}

impl RotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, image_id: i64) -> bool {
        self.shown.contains(&image_id)
    }

    /// Returns false if the id was already in the window
    pub fn insert(&mut self, image_id: i64) -> bool {
        self.shown.insert(image_id)
    }

    pub fn reset(&mut self) {
        self.shown.clear();
    }

    /// Start a new window that already contains `image_id`
    pub fn reset_to(&mut self, image_id: i64) {
        self.shown.clear();
        self.shown.insert(image_id);
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.shown.iter().copied()
    }
}

impl FromIterator<i64> for RotationSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            shown: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_to_keeps_only_new_id() {
        let mut rotation: RotationSet = [1, 2, 3].into_iter().collect();
        rotation.reset_to(9);
        assert_eq!(rotation.ids().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_json_is_plain_array() {
        let rotation: RotationSet = [4, 2].into_iter().collect();
        assert_eq!(serde_json::to_string(&rotation).unwrap(), "[2,4]");
        let back: RotationSet = serde_json::from_str("[]").unwrap();
        assert!(back.is_empty());
    }
}
