//! Notification composition.

use std::path::Path;

use chrono::Local;
use thiserror::Error;

use crate::notifier::NotificationPayload;

/// Fixed subject prefix for export notifications.
const SUBJECT_PREFIX: &str = "Export notification";

/// Timestamp format used in subjects and bodies.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Composition failure.
#[derive(Error, Debug)]
pub enum ComposeError {
    /// File vanished or is inaccessible at composition time.
    #[error("file '{path}' is unreadable: {reason}")]
    FileUnreadable { path: String, reason: String },
}

/// Builds a [`NotificationPayload`] from a file path.
///
/// Stats and reads the file at call time rather than trusting event
/// metadata: the file may have changed or vanished since detection.
#[derive(Debug, Clone, Default)]
pub struct Composer;

impl Composer {
    /// Create a composer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compose a notification for a newly created export file.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::FileUnreadable`] if the file no longer
    /// exists or cannot be opened.
    pub async fn compose(&self, path: &Path) -> Result<NotificationPayload, ComposeError> {
        let unreadable = |e: std::io::Error| ComposeError::FileUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let metadata = tokio::fs::metadata(path).await.map_err(unreadable)?;
        if !metadata.is_file() {
            return Err(ComposeError::FileUnreadable {
                path: path.display().to_string(),
                reason: "not a regular file".to_string(),
            });
        }
        let bytes = tokio::fs::read(path).await.map_err(unreadable)?;

        let file_name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        let size_bytes = metadata.len();
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        let subject = format!("{SUBJECT_PREFIX}: {file_name} ({timestamp})");
        let body = format!(
            "A new export file has been created.\n\
             \n\
             File details:\n\
             - Filename: {file_name}\n\
             - Size: {size_bytes} bytes\n\
             - Timestamp: {timestamp}\n\
             - Path: {path}\n\
             \n\
             This is an automated notification from the mailwatch file monitor.\n\
             The exported file is attached to this message.\n",
            path = path.display(),
        );

        Ok(NotificationPayload {
            subject,
            body,
            attachment_path: path.to_path_buf(),
            attachment_bytes: Some(bytes),
        })
    }

    /// Synthetic payload for a file that could not be read.
    ///
    /// Routed straight to the fallback recorder so the event still leaves
    /// a trace; carries no attachment content.
    #[must_use]
    pub fn unreadable_payload(path: &Path, reason: &str) -> NotificationPayload {
        let file_name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        NotificationPayload {
            subject: format!("{SUBJECT_PREFIX}: {file_name} (unreadable)"),
            body: format!(
                "An export file was detected but could not be read.\n\
                 \n\
                 - Filename: {file_name}\n\
                 - Timestamp: {timestamp}\n\
                 - Path: {path}\n\
                 - Reason: {reason}\n",
                path = path.display(),
            ),
            attachment_path: path.to_path_buf(),
            attachment_bytes: None,
        }
    }
}
