//! Integration tests for event publication and the event handler loop.

mod helpers;

use std::time::Duration;

use glossvideo_core::events::{DomainEvent, GlossEvent};
use glossvideo_service::StateSnapshot;
use helpers::{GLOSS, TestApp};

async fn next_matching<F>(
    rx: &mut tokio::sync::broadcast::Receiver<DomainEvent>,
    mut pred: F,
) -> DomainEvent
where
    F: FnMut(&GlossEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.expect("bus closed");
            if pred(&event.payload) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

#[tokio::test]
async fn test_upload_publishes_event() {
    let app = TestApp::seeded().await;
    let mut rx = app.store.events.subscribe();

    let video = app.upload("a.mp4", "a").await;

    let event = next_matching(&mut rx, |p| matches!(p, GlossEvent::VideoUploaded { .. })).await;
    assert_eq!(event.actor.as_deref(), Some("tester"));
    match event.payload {
        GlossEvent::VideoUploaded {
            video_id, gloss_id, ..
        } => {
            assert_eq!(video_id, video.id);
            assert_eq!(gloss_id, GLOSS);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_handler_loop_relocates_on_idgloss_change() {
    let app = TestApp::seeded().await;
    let video = app.upload("a.mp4", "a").await;

    let handler = app.store.event_handler();
    let task = tokio::spawn(handler.run(app.store.events.subscribe()));
    let mut rx = app.store.events.subscribe();

    app.store.events.publish(
        Some("editor".into()),
        GlossEvent::IdglossChanged {
            gloss_id: GLOSS,
            language: "nl".into(),
            old_idgloss: Some("HUIS".into()),
            new_idgloss: "WONING".into(),
        },
    );

    let event = next_matching(&mut rx, |p| matches!(p, GlossEvent::VideoMoved { .. })).await;
    assert_eq!(event.actor.as_deref(), Some("editor"));
    match event.payload {
        GlossEvent::VideoMoved {
            video_id,
            to,
            files_moved,
            ..
        } => {
            assert_eq!(video_id, video.id);
            assert_eq!(to, "glossvideo/NGT/WO/WONING-10.mp4");
            assert!(files_moved);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(app.exists("glossvideo/NGT/WO/WONING-10.mp4").await);

    task.abort();
}

#[tokio::test]
async fn test_handler_ignores_video_events() {
    let app = TestApp::seeded().await;
    let handler = app.store.event_handler();

    let event = DomainEvent::new(
        None,
        GlossEvent::VideoDeleted {
            video_id: Default::default(),
            gloss_id: GLOSS,
        },
    );
    handler.handle(&event).await.unwrap();
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let app = TestApp::seeded().await;
    let video = app.upload("a.mp4", "a").await;
    app.store.save_state().await.unwrap();

    let reopened = TestApp::new().await;
    let snapshot = StateSnapshot::load(
        app.store.storage.as_ref(),
        &app.config.storage.state_file,
    )
    .await
    .unwrap();
    snapshot
        .restore_into(&reopened.store.registry, &reopened.store.catalog)
        .await
        .unwrap();

    let restored = reopened.store.catalog.get(video.id).await.unwrap();
    assert_eq!(restored.videofile, video.videofile);
    assert!(restored.poster.generated);
    assert_eq!(reopened.store.catalog.history(GLOSS).await.len(), 1);
    assert_eq!(
        reopened.store.registry.owner(GLOSS).await.unwrap().idgloss,
        "HUIS"
    );
}
