//! Per-event delivery orchestration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::composer::{ComposeError, Composer};
use super::fallback::FallbackRecorder;
use crate::error::DeliveryErrorKind;
use crate::notifier::{NotificationPayload, Notifier};
use crate::watcher::{DirWatcher, EventFilter, FileEvent};

/// Statistics for the delivery pipeline.
#[derive(Debug, Default)]
pub struct PipelineStats {
    pub events_seen: AtomicU64,
    pub events_admitted: AtomicU64,
    pub delivered: AtomicU64,
    pub fallback_recorded: AtomicU64,
    pub recorder_failures: AtomicU64,
}

impl PipelineStats {
    /// Create new stats tracker.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Get snapshot of current stats.
    #[must_use]
    pub fn snapshot(&self) -> PipelineStatsSnapshot {
        PipelineStatsSnapshot {
            events_seen: self.events_seen.load(Ordering::Relaxed),
            events_admitted: self.events_admitted.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            fallback_recorded: self.fallback_recorded.load(Ordering::Relaxed),
            recorder_failures: self.recorder_failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of pipeline stats.
#[derive(Debug, Clone, Copy)]
pub struct PipelineStatsSnapshot {
    pub events_seen: u64,
    pub events_admitted: u64,
    pub delivered: u64,
    pub fallback_recorded: u64,
    pub recorder_failures: u64,
}

/// Orchestrates one delivery per admitted event.
///
/// Every admitted event yields exactly one outcome: a notifier delivery
/// or a fallback record. All failures are absorbed inside [`handle`];
/// a bad event never stops the watch loop.
///
/// [`handle`]: DeliveryPipeline::handle
pub struct DeliveryPipeline<N: Notifier> {
    filter: EventFilter,
    composer: Composer,
    notifier: N,
    fallback: FallbackRecorder,
    stats: Arc<PipelineStats>,
}

impl<N: Notifier> DeliveryPipeline<N> {
    /// Assemble a pipeline.
    #[must_use]
    pub fn new(filter: EventFilter, notifier: N, fallback: FallbackRecorder) -> Self {
        Self {
            filter,
            composer: Composer::new(),
            notifier,
            fallback,
            stats: PipelineStats::new(),
        }
    }

    /// Handle a single file event end to end.
    ///
    /// Rejected events return immediately with no trace. Admitted events
    /// are composed and delivered exactly once; composition or delivery
    /// failure routes the payload to the fallback recorder instead.
    pub async fn handle(&self, event: &FileEvent) {
        self.stats.events_seen.fetch_add(1, Ordering::Relaxed);

        if !self.filter.admit(event) {
            tracing::debug!(path = %event.path.display(), "Event rejected by filter");
            return;
        }
        self.stats.events_admitted.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            path = %event.path.display(),
            observed_at = %event.observed_at.format("%Y-%m-%d %H:%M:%S"),
            "New export file detected"
        );

        let payload = match self.composer.compose(&event.path).await {
            Ok(payload) => payload,
            Err(ComposeError::FileUnreadable { reason, .. }) => {
                // File is gone; retrying composition cannot help.
                let synthetic = Composer::unreadable_payload(&event.path, &reason);
                self.record_fallback(&synthetic, DeliveryErrorKind::FileUnreadable);
                return;
            }
        };

        // Single attempt: transport-level retries belong to the notifier.
        let outcome = self.notifier.deliver(&payload).await;
        if outcome.success {
            self.stats.delivered.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                subject = %payload.subject,
                attachment = %payload.attachment_name(),
                "Notification delivered"
            );
        } else {
            let kind = outcome.error.unwrap_or(DeliveryErrorKind::DeliveryFailed);
            self.record_fallback(&payload, kind);
        }
    }

    /// Drive the pipeline from a watcher until cancelled or the event
    /// source closes. Releases the watch handle on exit.
    pub async fn run(&self, mut watcher: DirWatcher, cancel: CancellationToken) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Stop requested, shutting down watch loop");
                    break;
                }
                event = watcher.recv() => match event {
                    Some(event) => self.handle(&event).await,
                    None => {
                        tracing::warn!("Event source closed");
                        break;
                    }
                },
            }
        }

        watcher.stop();

        let snapshot = self.stats.snapshot();
        tracing::info!(
            seen = snapshot.events_seen,
            admitted = snapshot.events_admitted,
            delivered = snapshot.delivered,
            fallback = snapshot.fallback_recorded,
            "Watch loop finished"
        );
    }

    /// Get current stats.
    #[must_use]
    pub fn stats(&self) -> Arc<PipelineStats> {
        Arc::clone(&self.stats)
    }

    fn record_fallback(&self, payload: &NotificationPayload, kind: DeliveryErrorKind) {
        if self.fallback.record(payload, kind) {
            self.stats.fallback_recorded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.recorder_failures.fetch_add(1, Ordering::Relaxed);
        }
    }
}
