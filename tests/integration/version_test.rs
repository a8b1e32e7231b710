//! Integration tests for upload rotation and reverts.

mod helpers;

use glossvideo_core::error::ErrorKind;
use glossvideo_entity::{GlossVideo, VideoAction};
use glossvideo_service::RevertOutcome;
use helpers::{GLOSS, TestApp};

const ACTIVE: &str = "glossvideo/NGT/HU/HUIS-10.mp4";
const BACKUP: &str = "glossvideo/NGT/HU/HUIS-10.mp4.bak";
const SMALL: &str = "glossvideo/NGT/HU/HUIS-10_small.mp4";
const POSTER: &str = "glossimage/NGT/HU/HUIS-10.png";

#[tokio::test]
async fn test_first_upload_becomes_active() {
    let app = TestApp::seeded().await;
    let upload = app.upload_file("first.mp4", "one").await;

    let video = app
        .store
        .versions
        .rotate_in(&app.ctx, GLOSS, &upload)
        .await
        .unwrap();

    assert_eq!(video.version, 0);
    assert_eq!(video.videofile, ACTIVE);
    assert_eq!(app.read(ACTIVE).await, "one");
    assert!(!upload.exists(), "upload should be moved into storage");
    assert!(video.poster.generated);
    assert!(video.small.generated);
    assert_eq!(app.read(POSTER).await, "poster:one");
    assert_eq!(app.read(SMALL).await, "one");

    let history = app.store.catalog.history(GLOSS).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, VideoAction::Upload);
    assert_eq!(history[0].actor, "tester");
    assert!(history[0].uploadfile.ends_with("first.mp4"));
    assert!(history[0].goal_location.ends_with("HUIS-10.mp4"));
}

#[tokio::test]
async fn test_rotate_then_restore_brings_back_original() {
    let app = TestApp::seeded().await;
    let original = app.upload("first.mp4", "one").await;
    let replacement = app.upload("second.mp4", "two").await;

    let videos = app.store.catalog.for_gloss(GLOSS).await;
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].id, replacement.id);
    assert_eq!(videos[1].id, original.id);
    assert_eq!(videos[1].version, 1);
    assert_eq!(videos[1].videofile, BACKUP);
    assert_eq!(app.read(ACTIVE).await, "two");
    assert_eq!(app.read(BACKUP).await, "one");
    assert_eq!(app.read(POSTER).await, "poster:two");

    let active = app
        .store
        .versions
        .restore_previous(&app.ctx, GLOSS)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(active.id, original.id);
    assert_eq!(active.version, 0);
    assert_eq!(active.videofile, ACTIVE);
    assert_eq!(app.read(ACTIVE).await, "one");
    assert!(!app.exists(BACKUP).await);
    assert_eq!(app.store.catalog.for_gloss(GLOSS).await.len(), 1);
}

#[tokio::test]
async fn test_revert_active_deletes_files_and_record() {
    let app = TestApp::seeded().await;
    let video = app.upload("first.mp4", "one").await;
    assert!(app.exists(POSTER).await);

    let outcome = app.store.versions.revert(&app.ctx, video.id).await.unwrap();

    assert!(matches!(outcome, RevertOutcome::Deleted(_)));
    assert!(!app.exists(ACTIVE).await);
    assert!(!app.exists(SMALL).await);
    assert!(!app.exists(POSTER).await);
    let err = app.store.catalog.get(video.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let history = app.store.catalog.history(GLOSS).await;
    assert_eq!(history.last().unwrap().action, VideoAction::Delete);
}

#[tokio::test]
async fn test_revert_without_backup_marker_is_format_error() {
    let app = TestApp::seeded().await;
    let mut broken = GlossVideo::new(GLOSS, ACTIVE);
    broken.version = 1;
    app.store.catalog.write().await.insert(broken.clone()).unwrap();

    let err = app
        .store
        .versions
        .revert(&app.ctx, broken.id)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Format);
    let unchanged = app.store.catalog.get(broken.id).await.unwrap();
    assert_eq!(unchanged.version, 1);
    assert_eq!(unchanged.videofile, ACTIVE);
}

#[tokio::test]
async fn test_restore_with_broken_chain_keeps_active_video() {
    let app = TestApp::seeded().await;
    let active = app.upload("first.mp4", "one").await;
    let mut broken = GlossVideo::new(GLOSS, "glossvideo/NGT/HU/other.mp4");
    broken.version = 1;
    app.store.catalog.write().await.insert(broken).unwrap();

    let err = app
        .store
        .versions
        .restore_previous(&app.ctx, GLOSS)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Format);
    assert!(app.store.catalog.get(active.id).await.is_ok());
    assert!(app.exists(ACTIVE).await);
}

#[tokio::test]
async fn test_revert_into_taken_slot_conflicts() {
    let app = TestApp::seeded().await;
    let oldest = app.upload("a.mp4", "a").await;
    app.upload("b.mp4", "b").await;
    app.upload("c.mp4", "c").await;

    let oldest = app.store.catalog.get(oldest.id).await.unwrap();
    assert_eq!(oldest.version, 2);

    let err = app
        .store
        .versions
        .revert(&app.ctx, oldest.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_repeated_uploads_skip_stray_backup_files() {
    let app = TestApp::seeded().await;
    app.put(BACKUP, "stray").await;

    let first = app.upload("a.mp4", "a").await;
    app.upload("b.mp4", "b").await;

    let first = app.store.catalog.get(first.id).await.unwrap();
    assert_eq!(first.version, 2);
    assert_eq!(first.videofile, "glossvideo/NGT/HU/HUIS-10.mp4.bak.bak");
    assert_eq!(app.read(BACKUP).await, "stray");

    app.upload("c.mp4", "c").await;
    app.upload("d.mp4", "d").await;

    let videos = app.store.catalog.for_gloss(GLOSS).await;
    assert_eq!(videos.len(), 4);
    let mut paths: Vec<&str> = videos.iter().map(|v| v.videofile.as_str()).collect();
    paths.sort_unstable();
    paths.dedup();
    assert_eq!(paths.len(), 4, "every video has its own file");
    for video in &videos {
        assert!(app.exists(&video.videofile).await, "{} missing", video.videofile);
        assert_ne!(video.videofile, BACKUP);
    }
    assert_eq!(app.read(ACTIVE).await, "d");
    assert_eq!(app.read(BACKUP).await, "stray");
}

#[tokio::test]
async fn test_restore_closes_gap_left_by_stray_backup() {
    let app = TestApp::seeded().await;
    app.put(BACKUP, "stray").await;
    let original = app.upload("a.mp4", "a").await;
    app.upload("b.mp4", "b").await;

    let active = app
        .store
        .versions
        .restore_previous(&app.ctx, GLOSS)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(active.id, original.id);
    assert_eq!(active.version, 0);
    assert_eq!(active.videofile, ACTIVE);
    assert_eq!(app.read(ACTIVE).await, "a");
    assert_eq!(app.read(BACKUP).await, "stray");
    let active_now = app.store.catalog.active(GLOSS).await.unwrap();
    assert_eq!(active_now.id, original.id);
    assert_eq!(app.store.catalog.for_gloss(GLOSS).await.len(), 1);
}

#[tokio::test]
async fn test_revert_moves_untracked_file_at_target_aside() {
    let app = TestApp::seeded().await;
    app.put(BACKUP, "stray").await;
    let original = app.upload("a.mp4", "a").await;
    app.upload("b.mp4", "b").await;

    let outcome = app
        .store
        .versions
        .revert(&app.ctx, original.id)
        .await
        .unwrap();

    let RevertOutcome::Reverted(video) = outcome else {
        panic!("expected a revert");
    };
    assert_eq!(video.version, 1);
    assert_eq!(video.videofile, BACKUP);
    assert_eq!(app.read(BACKUP).await, "a");
    assert_eq!(
        app.read("glossvideo/NGT/HU/HUIS-10.mp4.bak.bak.bak").await,
        "stray"
    );
    assert!(!app.exists("glossvideo/NGT/HU/HUIS-10.mp4.bak.bak").await);
    assert_eq!(app.read(ACTIVE).await, "b");
}

#[tokio::test]
async fn test_untracked_active_file_is_moved_aside() {
    let app = TestApp::seeded().await;
    app.put(ACTIVE, "stray").await;

    let video = app.upload("a.mp4", "a").await;

    assert_eq!(video.videofile, ACTIVE);
    assert_eq!(app.read(ACTIVE).await, "a");
    assert_eq!(app.read(BACKUP).await, "stray");
    assert_eq!(app.store.catalog.for_gloss(GLOSS).await.len(), 1);
}

#[tokio::test]
async fn test_missing_tools_do_not_fail_upload() {
    let app = TestApp::with_missing_tools().await;
    app.seed().await;

    let video = app.upload("a.mp4", "a").await;

    assert!(!video.poster.generated);
    assert!(!video.small.generated);
    assert_eq!(app.store.artifacts.ensure_poster(video.id).await.unwrap(), None);
    assert_eq!(app.store.artifacts.ensure_small(video.id).await.unwrap(), None);
}

#[tokio::test]
async fn test_missing_upload_is_not_found() {
    let app = TestApp::seeded().await;
    let missing = app.dir.path().join("uploads/nothing.mp4");

    let err = app
        .store
        .versions
        .rotate_in(&app.ctx, GLOSS, &missing)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.store.catalog.for_gloss(GLOSS).await.is_empty());
}

#[tokio::test]
async fn test_delete_backup_video() {
    let app = TestApp::seeded().await;
    let original = app.upload("a.mp4", "a").await;
    let active = app.upload("b.mp4", "b").await;

    app.store
        .versions
        .delete_video(&app.ctx, original.id)
        .await
        .unwrap();

    assert!(!app.exists(BACKUP).await);
    assert_eq!(app.read(ACTIVE).await, "b");
    let videos = app.store.catalog.for_gloss(GLOSS).await;
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].id, active.id);
}
