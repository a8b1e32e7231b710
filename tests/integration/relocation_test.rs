//! Integration tests for relocating videos after naming changes.

mod helpers;

use glossvideo_core::traits::StorageProvider;
use glossvideo_entity::{GlossVideo, VideoAction};
use helpers::{DATASET, GLOSS, TestApp};

const ACTIVE: &str = "glossvideo/NGT/HU/HUIS-10.mp4";
const POSTER: &str = "glossimage/NGT/HU/HUIS-10.png";

#[tokio::test]
async fn test_relocate_without_moving_files() {
    let app = TestApp::seeded().await;
    let video = app.upload("a.mp4", "a").await;
    app.store
        .registry
        .set_translation(GLOSS, "nl", "WONING")
        .await
        .unwrap();

    let moved = app
        .store
        .relocation
        .relocate(&app.ctx, video.id, false)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(moved.videofile, "glossvideo/NGT/WO/WONING-10.mp4");
    assert!(app.exists(ACTIVE).await, "file stays in place");
    assert!(!app.exists("glossvideo/NGT/WO/WONING-10.mp4").await);
    let history = app.store.catalog.history(GLOSS).await;
    assert!(history.iter().all(|h| h.action != VideoAction::Rename));
}

#[tokio::test]
async fn test_relocate_without_moving_files_clears_artifact_flags() {
    let app = TestApp::seeded().await;
    let video = app.upload("a.mp4", "a").await;
    assert!(video.poster.generated);
    app.store
        .registry
        .set_translation(GLOSS, "nl", "WONING")
        .await
        .unwrap();

    let moved = app
        .store
        .relocation
        .relocate(&app.ctx, video.id, false)
        .await
        .unwrap()
        .unwrap();
    assert!(!moved.poster.generated);
    assert!(!moved.small.generated);

    // The file catches up with its record later on.
    app.store
        .storage
        .rename(ACTIVE, "glossvideo/NGT/WO/WONING-10.mp4")
        .await
        .unwrap();
    let poster = app.store.artifacts.ensure_poster(video.id).await.unwrap();

    assert_eq!(poster.as_deref(), Some("glossimage/NGT/WO/WONING-10.png"));
    assert_eq!(app.read("glossimage/NGT/WO/WONING-10.png").await, "poster:a");
    assert!(app.exists(POSTER).await, "old poster is left alone");
}

#[tokio::test]
async fn test_relocate_with_missing_source_updates_metadata() {
    let app = TestApp::seeded().await;
    let video = GlossVideo::new(GLOSS, "glossvideo/NGT/OL/OLD-10.mp4");
    app.store.catalog.write().await.insert(video.clone()).unwrap();

    let moved = app
        .store
        .relocation
        .relocate(&app.ctx, video.id, true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(moved.videofile, ACTIVE);
    assert_eq!(app.store.catalog.get(video.id).await.unwrap().videofile, ACTIVE);
    assert!(!app.exists(ACTIVE).await);
}

#[tokio::test]
async fn test_idgloss_change_moves_files_and_backups() {
    let app = TestApp::seeded().await;
    app.upload("a.mp4", "a").await;
    app.upload("b.mp4", "b").await;

    let moved = app
        .store
        .relocation
        .on_idgloss_changed(&app.ctx, GLOSS, "nl", "WONING")
        .await
        .unwrap();

    assert_eq!(moved.len(), 2);
    assert_eq!(app.read("glossvideo/NGT/WO/WONING-10.mp4").await, "b");
    assert_eq!(app.read("glossvideo/NGT/WO/WONING-10.mp4.bak").await, "a");
    assert!(app.exists("glossvideo/NGT/WO/WONING-10_small.mp4").await);
    assert!(app.exists("glossimage/NGT/WO/WONING-10.png").await);
    assert!(!app.exists(ACTIVE).await);
    assert!(!app.exists(POSTER).await);

    let owner = app.store.registry.owner(GLOSS).await.unwrap();
    assert_eq!(owner.idgloss, "WONING");
    let renames = app
        .store
        .catalog
        .history(GLOSS)
        .await
        .into_iter()
        .filter(|h| h.action == VideoAction::Rename)
        .count();
    assert_eq!(renames, 2);
}

#[tokio::test]
async fn test_acronym_change_renames_dataset_directories() {
    let app = TestApp::seeded().await;
    let video = app.upload("a.mp4", "a").await;

    let moved = app
        .store
        .relocation
        .on_dataset_acronym_changed(&app.ctx, DATASET, "NGT", "NGT2")
        .await
        .unwrap();

    assert_eq!(moved.len(), 1);
    let stored = app.store.catalog.get(video.id).await.unwrap();
    assert_eq!(stored.videofile, "glossvideo/NGT2/HU/HUIS-10.mp4");
    assert_eq!(app.read("glossvideo/NGT2/HU/HUIS-10.mp4").await, "a");
    assert!(app.exists("glossimage/NGT2/HU/HUIS-10.png").await);
    assert!(!app.exists("glossvideo/NGT").await);
    assert!(!app.exists("glossimage/NGT").await);
    assert_eq!(app.store.registry.dataset(DATASET).await.unwrap().acronym, "NGT2");
}

#[tokio::test]
async fn test_acronym_change_without_directories() {
    let app = TestApp::seeded().await;

    let moved = app
        .store
        .relocation
        .on_dataset_acronym_changed(&app.ctx, DATASET, "NGT", "SLN")
        .await
        .unwrap();

    assert!(moved.is_empty());
    assert_eq!(app.store.registry.dataset(DATASET).await.unwrap().acronym, "SLN");
}

#[tokio::test]
async fn test_default_language_change_moves_videos() {
    let app = TestApp::seeded().await;
    app.upload("a.mp4", "a").await;

    let moved = app
        .store
        .relocation
        .on_default_language_changed(&app.ctx, DATASET, "nl", "en")
        .await
        .unwrap();

    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].videofile, "glossvideo/NGT/HO/HOUSE-10.mp4");
    assert_eq!(app.read("glossvideo/NGT/HO/HOUSE-10.mp4").await, "a");
    assert!(app.exists("glossimage/NGT/HO/HOUSE-10.png").await);
    assert!(!app.exists(ACTIVE).await);
}

#[tokio::test]
async fn test_relocation_is_idempotent() {
    let app = TestApp::seeded().await;
    let video = app.upload("a.mp4", "a").await;

    let moved = app
        .store
        .relocation
        .relocate(&app.ctx, video.id, true)
        .await
        .unwrap();

    assert!(moved.is_none());
    assert_eq!(app.read(ACTIVE).await, "a");
}
