//! Integration tests for the detect/compose/deliver/fallback pipeline.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use mailwatch::notifier::{DeliveryOutcome, NotificationPayload, Notifier};
use mailwatch::pipeline::{DeliveryPipeline, FallbackRecorder};
use mailwatch::watcher::{DirWatcher, EventFilter, EventKind, FileEvent};
use mailwatch::DeliveryErrorKind;

/// Delivery attempts observed by the test notifier: (subject, attachment size).
type Attempts = Arc<Mutex<Vec<(String, u64)>>>;

/// Notifier capturing every delivery attempt.
struct CapturingNotifier {
    fail: bool,
    attempts: Attempts,
}

#[async_trait]
impl Notifier for CapturingNotifier {
    async fn deliver(&self, payload: &NotificationPayload) -> DeliveryOutcome {
        self.attempts
            .lock()
            .push((payload.subject.clone(), payload.attachment_size()));
        if self.fail {
            DeliveryOutcome::failed(DeliveryErrorKind::DeliveryFailed)
        } else {
            DeliveryOutcome::delivered()
        }
    }
}

fn build_pipeline(
    tmp: &TempDir,
    fail: bool,
) -> (DeliveryPipeline<CapturingNotifier>, PathBuf, Attempts) {
    let attempts = Attempts::default();
    let notifier = CapturingNotifier {
        fail,
        attempts: Arc::clone(&attempts),
    };
    let log = tmp.path().join("failed-deliveries.log");
    let fallback = FallbackRecorder::open(&log, "admin@example.com").unwrap();
    (
        DeliveryPipeline::new(EventFilter::new(".txt"), notifier, fallback),
        log,
        attempts,
    )
}

/// Creating a matching export file drives exactly one delivery carrying
/// the file's name and size.
#[tokio::test]
async fn test_new_export_is_delivered_with_content() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("report.txt");
    fs::write(&path, vec![b'x'; 500]).unwrap();

    let (pipeline, log, attempts) = build_pipeline(&tmp, false);
    pipeline.handle(&FileEvent::created(&path)).await;

    let stats = pipeline.stats().snapshot();
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.fallback_recorded, 0);

    // Exactly one attempt, carrying the file name and its 500 bytes.
    let seen = attempts.lock();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].0.contains("report.txt"));
    assert_eq!(seen[0].1, 500);
    drop(seen);

    assert!(fs::read_to_string(&log).unwrap().is_empty());
}

/// Non-matching suffixes never reach composition or delivery.
#[tokio::test]
async fn test_non_matching_suffix_is_ignored() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("data.csv");
    fs::write(&path, "a,b,c\n").unwrap();

    let (pipeline, _log, attempts) = build_pipeline(&tmp, false);
    pipeline.handle(&FileEvent::created(&path)).await;

    assert_eq!(pipeline.stats().snapshot().events_admitted, 0);
    assert!(attempts.lock().is_empty());
}

/// A file deleted before composition lands in the fallback log tagged
/// FileUnreadable, and the loop survives.
#[tokio::test]
async fn test_deleted_file_falls_back_without_panicking() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("a.txt");

    let (pipeline, log, attempts) = build_pipeline(&tmp, false);
    pipeline.handle(&FileEvent::created(&path)).await;

    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("FileUnreadable"));
    assert!(contents.contains("a.txt"));
    assert!(attempts.lock().is_empty());

    // Subsequent events still flow.
    let ok = tmp.path().join("next.txt");
    fs::write(&ok, "fine").unwrap();
    pipeline.handle(&FileEvent::created(&ok)).await;
    assert_eq!(pipeline.stats().snapshot().delivered, 1);
}

/// A notifier failure produces exactly one fallback record and exactly
/// one delivery attempt.
#[tokio::test]
async fn test_failed_delivery_recorded_once() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("b.txt");
    fs::write(&path, "export body").unwrap();

    let (pipeline, log, attempts) = build_pipeline(&tmp, true);
    pipeline.handle(&FileEvent::created(&path)).await;

    assert_eq!(attempts.lock().len(), 1);

    let contents = fs::read_to_string(&log).unwrap();
    assert_eq!(contents.matches("UNDELIVERED NOTIFICATION").count(), 1);
    assert!(contents.contains("DeliveryFailed"));
    assert!(contents.contains("b.txt"));
}

/// Live end-to-end: the watcher observes a real file creation and the
/// pipeline delivers it.
#[tokio::test]
async fn test_live_watch_detects_creation() {
    let tmp = TempDir::new().unwrap();
    let watch_dir = tmp.path().join("exports");
    fs::create_dir_all(&watch_dir).unwrap();

    let mut watcher = DirWatcher::new(&watch_dir).unwrap();

    // Let the OS watch settle before writing.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let target = watch_dir.join("report.txt");
    fs::write(&target, vec![b'x'; 500]).unwrap();

    // Match on file name: some platforms report canonicalized paths.
    let event = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let event = watcher.recv().await.expect("watcher closed");
            if event.kind == EventKind::Created && event.file_name() == Some("report.txt") {
                return event;
            }
        }
    })
    .await
    .expect("no creation event observed");

    assert!(!event.is_directory);

    let (pipeline, _log, _attempts) = build_pipeline(&tmp, false);
    pipeline.handle(&event).await;

    assert_eq!(pipeline.stats().snapshot().delivered, 1);

    watcher.stop();
}

/// Cancellation stops the run loop and releases the watch.
#[tokio::test]
async fn test_run_loop_shuts_down_cleanly() {
    let tmp = TempDir::new().unwrap();
    let watch_dir = tmp.path().join("exports");
    fs::create_dir_all(&watch_dir).unwrap();

    let watcher = DirWatcher::new(&watch_dir).unwrap();
    let (pipeline, _log, _attempts) = build_pipeline(&tmp, false);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    tokio::time::timeout(Duration::from_secs(5), pipeline.run(watcher, cancel))
        .await
        .expect("run loop did not shut down");
}
