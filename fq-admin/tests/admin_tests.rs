//! Admin job tests against an in-memory database

use chrono::{Duration, Utc};
use fq_admin::{cleanup_images, load_catalog, purge_sessions, LoadReport, TierLimits};
use fq_common::{db, FrameMode, GameSession, ImageCatalog, NewFilmImage, SessionStore, SqliteStore, Tier};
use image::{DynamicImage, RgbImage};
use std::collections::BTreeSet;

async fn setup_store() -> SqliteStore {
    let pool = db::init_memory_database().await.unwrap();
    SqliteStore::new(pool)
}

fn write_png(path: &std::path::Path, width: u32, height: u32) {
    DynamicImage::ImageRgb8(RgbImage::new(width, height)).save(path).unwrap();
}

// =============================================================================
// load
// =============================================================================

#[tokio::test]
async fn test_load_catalog_skips_missing_and_invalid_entries() {
    let store = setup_store().await;
    let work = tempfile::tempdir().unwrap();
    let images_dir = work.path().join("incoming");
    let media_dir = work.path().join("media");
    std::fs::create_dir_all(&images_dir).unwrap();

    write_png(&images_dir.join("inception.png"), 2160, 400);
    write_png(&images_dir.join("alien.png"), 100, 100);

    let manifest = work.path().join("catalog.toml");
    std::fs::write(
        &manifest,
        r#"
[[image]]
title = "Inception"
image_filename = "somewhere/else/inception.png"
tier = "Easy"
frame = "first"
hint_1 = "A dream within a dream."
hint_2 = ""

[[image]]
title = "Jaws"
image_filename = "jaws.png"
tier = "Easy"
frame = "first"

[[image]]
title = "Alien"
image_filename = "alien.png"
tier = "Impossible"
frame = "last"
"#,
    )
    .unwrap();

    let report = load_catalog(&store, &manifest, &images_dir, &media_dir).await.unwrap();
    assert_eq!(report, LoadReport { loaded: 1, skipped: 2 });

    let stored = media_dir.join("film_images/inception.png");
    assert!(stored.exists());
    let dims = image::image_dimensions(&stored).unwrap();
    assert_eq!(dims, (1080, 200));

    let ids = store.image_ids_by_frame(FrameMode::First).await.unwrap();
    assert_eq!(ids.len(), 1);
    let image = store.get_image(ids[0]).await.unwrap().unwrap();
    assert_eq!(image.title, "Inception");
    assert_eq!(image.image, "film_images/inception.png");
    assert_eq!(image.hints(), vec!["A dream within a dream."]);
}

#[tokio::test]
async fn test_load_catalog_rejects_unreadable_manifest() {
    let store = setup_store().await;
    let work = tempfile::tempdir().unwrap();
    let manifest = work.path().join("catalog.toml");
    std::fs::write(&manifest, "[[image]]\ntitle = ").unwrap();

    let result = load_catalog(&store, &manifest, work.path(), &work.path().join("media")).await;
    assert!(result.is_err());
}

// =============================================================================
// purge-sessions
// =============================================================================

#[tokio::test]
async fn test_purge_sessions_removes_only_stale() {
    let store = setup_store().await;

    let fresh = GameSession::new(FrameMode::First, Vec::new());
    let mut stale = GameSession::new(FrameMode::Last, Vec::new());
    stale.last_active = Utc::now() - Duration::days(10);
    store.insert_session(&fresh).await.unwrap();
    store.insert_session(&stale).await.unwrap();

    let deleted = purge_sessions(&store, 7).await.unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(store.count_sessions().await.unwrap(), 1);
    assert!(store.load_session(&fresh.session_id).await.unwrap().is_some());
    assert!(store.load_session(&stale.session_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_purge_sessions_rejects_negative_days() {
    let store = setup_store().await;
    assert!(purge_sessions(&store, -1).await.is_err());
}

#[tokio::test]
async fn test_purge_sessions_rejects_out_of_range_days() {
    let store = setup_store().await;
    let session = GameSession::new(FrameMode::First, Vec::new());
    store.insert_session(&session).await.unwrap();

    assert!(purge_sessions(&store, 1_000_000_000_000).await.is_err());
    assert!(purge_sessions(&store, 100_000_000_000).await.is_err());
    assert!(purge_sessions(&store, i64::MAX).await.is_err());
    assert_eq!(store.count_sessions().await.unwrap(), 1);
}

// =============================================================================
// cleanup-images
// =============================================================================

#[tokio::test]
async fn test_cleanup_keeps_lowest_ids_per_tier() {
    let store = setup_store().await;

    let mut easy_ids = Vec::new();
    for n in 0..4 {
        let image = NewFilmImage::new(format!("Easy {}", n), format!("film_images/e{}.jpg", n), Tier::Easy, FrameMode::First);
        easy_ids.push(store.insert_image(&image).await.unwrap().id);
    }
    let hard = NewFilmImage::new("Hard", "film_images/h.jpg", Tier::Hard, FrameMode::First);
    store.insert_image(&hard).await.unwrap();

    let limits = TierLimits {
        easy: 2,
        ..TierLimits::default()
    };
    let deleted = cleanup_images(&store, limits).await.unwrap();
    assert_eq!(deleted, vec![(Tier::Easy, 2), (Tier::Medium, 0), (Tier::Hard, 0)]);

    assert_eq!(store.count_by_tier(Tier::Easy).await.unwrap(), 2);
    assert_eq!(store.count_by_tier(Tier::Hard).await.unwrap(), 1);

    let all: BTreeSet<i64> = easy_ids.iter().copied().collect();
    let kept: Vec<i64> = store.images_by_ids(&all).await.unwrap().into_iter().map(|i| i.id).collect();
    assert_eq!(kept, easy_ids[..2].to_vec());
}
