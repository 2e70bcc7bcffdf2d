//! Durable fallback recording for failed deliveries.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Local;
use parking_lot::Mutex;

use crate::error::DeliveryErrorKind;
use crate::notifier::NotificationPayload;
use crate::Result;

/// Last line of defense: appends one self-contained block per failed
/// delivery to a log file.
///
/// `record` never returns an error. The sink's own failure is reported
/// once on the diagnostic channel and swallowed; there is nowhere
/// further to escalate.
pub struct FallbackRecorder {
    sink: Mutex<File>,
    recipient: String,
}

impl FallbackRecorder {
    /// Open (or create) the fallback log at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened for appending.
    pub fn open(path: impl AsRef<Path>, recipient: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!(path = %path.display(), "Fallback log opened");

        Ok(Self {
            sink: Mutex::new(file),
            recipient: recipient.into(),
        })
    }

    /// Record an undelivered notification. Best effort, never raises.
    ///
    /// Returns whether the record reached the sink; callers use this only
    /// for accounting.
    pub fn record(&self, payload: &NotificationPayload, error: DeliveryErrorKind) -> bool {
        let block = self.render(payload, error);

        let mut sink = self.sink.lock();
        let written = sink
            .write_all(block.as_bytes())
            .and_then(|()| sink.flush());
        drop(sink);

        match written {
            Ok(()) => {
                tracing::warn!(
                    error = %error,
                    subject = %payload.subject,
                    attachment = %payload.attachment_name(),
                    "Delivery failed, notification recorded to fallback log"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %DeliveryErrorKind::RecorderFailed,
                    reason = %e,
                    subject = %payload.subject,
                    "Fallback sink write failed, record lost"
                );
                false
            }
        }
    }

    fn render(&self, payload: &NotificationPayload, error: DeliveryErrorKind) -> String {
        format!(
            "{rule}\n\
             UNDELIVERED NOTIFICATION\n\
             Time:       {time}\n\
             Error:      {error}\n\
             To:         {recipient}\n\
             Subject:    {subject}\n\
             Attachment: {attachment} ({size} bytes)\n\
             {rule}\n",
            rule = "=".repeat(60),
            time = Local::now().format("%Y-%m-%d %H:%M:%S"),
            recipient = self.recipient,
            subject = payload.subject,
            attachment = payload.attachment_name(),
            size = payload.attachment_size(),
        )
    }
}
