//! Configuration settings and validation.

use crate::{Error, Result};
use std::path::PathBuf;

/// Main configuration for the Mailwatch daemon.
///
/// Built once at startup and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory watched (non-recursively) for new export files.
    pub watch_dir: PathBuf,

    /// File name suffix that admits an event, including the leading dot.
    pub suffix: String,

    /// Recipient address for notifications.
    pub recipient: String,

    /// Sender identity placed on outgoing notifications.
    pub sender: String,

    /// Path of the fallback log written when delivery fails.
    pub fallback_log: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("./exports"),
            suffix: ".txt".to_string(),
            recipient: "admin@example.com".to_string(),
            sender: "mailwatch@example.com".to_string(),
            fallback_log: PathBuf::from("./data/failed-deliveries.log"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.watch_dir.as_os_str().is_empty() {
            return Err(Error::config("watch_dir cannot be empty"));
        }

        if self.suffix.is_empty() {
            return Err(Error::config("suffix cannot be empty"));
        }

        if !self.suffix.starts_with('.') {
            return Err(Error::config(format!(
                "suffix '{}' must start with a dot, e.g. '.txt'",
                self.suffix
            )));
        }

        for (name, addr) in [("recipient", &self.recipient), ("sender", &self.sender)] {
            if addr.is_empty() || !addr.contains('@') {
                return Err(Error::config(format!(
                    "{name} '{addr}' is not a valid address"
                )));
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }
}
