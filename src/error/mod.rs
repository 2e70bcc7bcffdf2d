//! Error types and Result aliases for Mailwatch.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.

use thiserror::Error;

/// Result type alias using Mailwatch's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Mailwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// File watching error.
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// File watcher errors.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Failed to watch path.
    #[error("failed to watch path '{path}': {reason}")]
    WatchFailed { path: String, reason: String },
}

/// Reason a notification ended up in the fallback log instead of delivered.
///
/// Carried inside a `DeliveryOutcome` and written into every fallback record.
/// These are outcome tags rather than propagated errors: the pipeline absorbs
/// all of them so a single bad event never stops the watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryErrorKind {
    /// File vanished or was inaccessible at composition time. Not retried.
    FileUnreadable,
    /// The notifier reported failure. Not retried by the pipeline.
    DeliveryFailed,
    /// The fallback sink itself failed to write. Terminal failure mode.
    RecorderFailed,
}

impl DeliveryErrorKind {
    /// Stable label used in fallback records and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileUnreadable => "FileUnreadable",
            Self::DeliveryFailed => "DeliveryFailed",
            Self::RecorderFailed => "RecorderFailed",
        }
    }
}

impl std::fmt::Display for DeliveryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
