//! Notifier boundary: payload types and the delivery capability.
//!
//! The pipeline treats delivery as opaque. A [`Notifier`] receives a composed
//! [`NotificationPayload`], attempts transmission however it likes (SMTP,
//! HTTP, nothing at all) and reports a [`DeliveryOutcome`]. Transport-level
//! retry policy belongs to the notifier, never to the pipeline.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Local};

use crate::error::DeliveryErrorKind;

/// A composed, self-contained notification ready for transmission.
///
/// Built fresh for each delivery attempt and never shared across
/// concurrent deliveries.
#[derive(Debug, Clone)]
pub struct NotificationPayload {
    /// Message subject line.
    pub subject: String,
    /// Plain-text message body.
    pub body: String,
    /// Full path of the attached export file.
    pub attachment_path: PathBuf,
    /// Raw attachment content, read at composition time.
    ///
    /// `None` for synthetic payloads describing a file that could not
    /// be read.
    pub attachment_bytes: Option<Vec<u8>>,
}

impl NotificationPayload {
    /// File name of the attachment.
    #[must_use]
    pub fn attachment_name(&self) -> String {
        self.attachment_path
            .file_name()
            .map_or_else(|| self.attachment_path.display().to_string(), |n| {
                n.to_string_lossy().into_owned()
            })
    }

    /// Attachment size in bytes, zero when no content was read.
    #[must_use]
    pub fn attachment_size(&self) -> u64 {
        self.attachment_bytes.as_ref().map_or(0, |b| b.len() as u64)
    }
}

/// Result of a single delivery attempt.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    /// Whether the notifier accepted the message.
    pub success: bool,
    /// Failure classification when `success` is false.
    pub error: Option<DeliveryErrorKind>,
    /// When the attempt was made.
    pub attempted_at: DateTime<Local>,
}

impl DeliveryOutcome {
    /// A successful delivery, stamped now.
    #[must_use]
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
            attempted_at: Local::now(),
        }
    }

    /// A failed delivery, stamped now.
    #[must_use]
    pub fn failed(kind: DeliveryErrorKind) -> Self {
        Self {
            success: false,
            error: Some(kind),
            attempted_at: Local::now(),
        }
    }
}

/// Capability for transmitting a composed notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt to deliver the payload exactly once.
    async fn deliver(&self, payload: &NotificationPayload) -> DeliveryOutcome;
}

/// Notifier that renders the full message to the log instead of
/// transmitting it.
///
/// Stands in for a real SMTP transport: same headers, same base64
/// attachment encoding, no network. Swap it out through the [`Notifier`]
/// trait to go live.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    sender: String,
    recipient: String,
}

impl LogNotifier {
    /// Create a log-mode notifier with the given identities.
    #[must_use]
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, payload: &NotificationPayload) -> DeliveryOutcome {
        let attachment_name = payload.attachment_name();

        tracing::info!(
            from = %self.sender,
            to = %self.recipient,
            subject = %payload.subject,
            attachment = %attachment_name,
            size_bytes = payload.attachment_size(),
            "Notification rendered (log mode, not transmitted)"
        );

        if let Some(bytes) = &payload.attachment_bytes {
            let encoded = BASE64.encode(bytes);
            tracing::trace!(
                attachment = %attachment_name,
                encoded_len = encoded.len(),
                "Attachment encoded for transport"
            );
        }
        tracing::trace!(body = %payload.body, "Notification body");

        DeliveryOutcome::delivered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NotificationPayload {
        NotificationPayload {
            subject: "Export notification: 2026-08-30 12:00:00".to_string(),
            body: "body".to_string(),
            attachment_path: PathBuf::from("/exports/report.txt"),
            attachment_bytes: Some(vec![0u8; 500]),
        }
    }

    #[test]
    fn test_attachment_name_and_size() {
        let p = payload();
        assert_eq!(p.attachment_name(), "report.txt");
        assert_eq!(p.attachment_size(), 500);

        let empty = NotificationPayload {
            attachment_bytes: None,
            ..p
        };
        assert_eq!(empty.attachment_size(), 0);
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = DeliveryOutcome::delivered();
        assert!(ok.success);
        assert!(ok.error.is_none());

        let failed = DeliveryOutcome::failed(DeliveryErrorKind::DeliveryFailed);
        assert!(!failed.success);
        assert_eq!(failed.error, Some(DeliveryErrorKind::DeliveryFailed));
    }

    #[tokio::test]
    async fn test_log_notifier_reports_success() {
        let notifier = LogNotifier::new("mailwatch@example.com", "admin@example.com");
        let outcome = notifier.deliver(&payload()).await;
        assert!(outcome.success);
    }
}
