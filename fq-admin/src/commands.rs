//! Admin jobs
//!
//! - `load_catalog`: import stills listed in a manifest
//! - `purge_sessions`: drop sessions idle past the retention window
//! - `cleanup_images`: cap the number of stills kept per tier

use crate::manifest::CatalogManifest;
use crate::resize::resize_still;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use fq_common::{ImageCatalog, SessionStore, Tier};
use std::path::Path;
use tracing::{info, warn};

/// Folder under the media root that holds catalog stills
pub const FILM_IMAGES_DIR: &str = "film_images";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Import every manifest entry whose file exists in `images_dir`.
///
/// Stills are shrunk into `<media_dir>/film_images/`. Entries with a missing
/// file, bad tier/frame or undecodable image are skipped with a warning.
pub async fn load_catalog(
    catalog: &dyn ImageCatalog,
    manifest_path: &Path,
    images_dir: &Path,
    media_dir: &Path,
) -> Result<LoadReport> {
    let manifest = CatalogManifest::load(manifest_path)?;
    let target_dir = media_dir.join(FILM_IMAGES_DIR);
    std::fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create {}", target_dir.display()))?;

    info!(
        "Loading {} catalog entries from {}",
        manifest.images.len(),
        manifest_path.display()
    );

    let mut report = LoadReport::default();
    for entry in &manifest.images {
        let Some(file_name) = entry.file_name() else {
            warn!("Entry '{}' has no usable image filename", entry.title);
            report.skipped += 1;
            continue;
        };

        let src = images_dir.join(file_name);
        if !src.exists() {
            warn!("Image file not found: {}", src.display());
            report.skipped += 1;
            continue;
        }

        let stored_path = format!("{}/{}", FILM_IMAGES_DIR, file_name);
        let new_image = match entry.to_new_image(stored_path) {
            Ok(image) => image,
            Err(e) => {
                warn!("Skipping {}: {}", file_name, e);
                report.skipped += 1;
                continue;
            }
        };

        if let Err(e) = resize_still(&src, &target_dir.join(file_name)) {
            warn!("Skipping {}: {:#}", file_name, e);
            report.skipped += 1;
            continue;
        }

        let image = catalog.insert_image(&new_image).await?;
        info!("Loaded image for {} ({}) as id {}", image.title, image.frame, image.id);
        report.loaded += 1;
    }

    info!("Catalog load finished: {} loaded, {} skipped", report.loaded, report.skipped);
    Ok(report)
}

/// Delete sessions whose last activity is more than `days` days old
pub async fn purge_sessions(sessions: &dyn SessionStore, days: i64) -> Result<u64> {
    if days < 0 {
        anyhow::bail!("--days must not be negative (got {})", days);
    }

    let cutoff = Duration::try_days(days)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| anyhow::anyhow!("--days {} is out of range", days))?;
    info!("Starting purge of sessions older than {} day(s)", days);

    let deleted = sessions.purge_sessions_before(cutoff).await?;
    if deleted == 0 {
        info!("No sessions older than {} day(s) were found", days);
    } else {
        info!("Deleted {} session(s) older than {} day(s)", deleted, days);
    }
    Ok(deleted)
}

/// How many stills to keep per tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            easy: 15,
            medium: 20,
            hard: 15,
        }
    }
}

impl TierLimits {
    pub fn keep_for(&self, tier: Tier) -> usize {
        match tier {
            Tier::Easy => self.easy,
            Tier::Medium => self.medium,
            Tier::Hard => self.hard,
        }
    }
}

/// Keep the lowest-id stills of each tier up to its limit; returns deletions per tier
pub async fn cleanup_images(catalog: &dyn ImageCatalog, limits: TierLimits) -> Result<Vec<(Tier, u64)>> {
    let mut deleted = Vec::with_capacity(Tier::ALL.len());

    for tier in Tier::ALL {
        let keep = limits.keep_for(tier);
        let total = catalog.count_by_tier(tier).await?;
        info!("Tier '{}': {} total images", tier, total);

        if total as usize <= keep {
            info!("No images deleted from tier '{}' ({} <= {})", tier, total, keep);
            deleted.push((tier, 0));
            continue;
        }

        let removed = catalog.retain_per_tier(tier, keep).await?;
        info!("Deleted {} images from tier '{}'", removed, tier);
        deleted.push((tier, removed));
    }

    Ok(deleted)
}
