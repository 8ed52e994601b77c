//! Catalog manifest
//!
//! ```toml
//! [[image]]
//! title = "Inception"
//! image_filename = "inception_first.jpg"
//! tier = "Easy"
//! frame = "first"
//! hint_1 = "A dream within a dream."
//! ```

use anyhow::{Context, Result};
use fq_common::{FrameMode, NewFilmImage, Tier};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogManifest {
    #[serde(default, rename = "image")]
    pub images: Vec<ManifestEntry>,
}

/// One still as listed in the manifest; tier and frame stay raw until checked
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub title: String,
    pub image_filename: String,
    pub tier: String,
    pub frame: String,
    pub hint_1: Option<String>,
    pub hint_2: Option<String>,
}

impl CatalogManifest {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid catalog manifest")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}

impl ManifestEntry {
    /// File name without any directory part
    pub fn file_name(&self) -> Option<&str> {
        Path::new(self.image_filename.trim())
            .file_name()
            .and_then(|name| name.to_str())
    }

    /// Validate and turn into a catalog row stored under `stored_path`
    pub fn to_new_image(&self, stored_path: String) -> Result<NewFilmImage> {
        let title = self.title.trim();
        if title.is_empty() {
            anyhow::bail!("entry for {} has no title", self.image_filename);
        }

        let tier: Tier = self.tier.trim().parse()?;
        let frame: FrameMode = self.frame.trim().parse()?;

        Ok(NewFilmImage::new(title, stored_path, tier, frame)
            .with_hints(self.hint_1.as_deref(), self.hint_2.as_deref()))
    }
}
