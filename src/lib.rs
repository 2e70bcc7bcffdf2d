//! Mailwatch Library
//!
//! Watches an export directory and dispatches email notifications for newly
//! created files, with a durable fallback log for failed deliveries.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod notifier;
pub mod observability;
pub mod pipeline;
pub mod watcher;

pub use config::Config;
pub use error::{DeliveryErrorKind, Error, Result};
