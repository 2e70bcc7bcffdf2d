//! The detect/compose/deliver/fallback pipeline.
//!
//! This module provides:
//! - Notification composition from a freshly detected export file
//! - Per-event delivery orchestration over the [`crate::notifier::Notifier`] boundary
//! - A durable fallback log guaranteeing no admitted event is lost

mod composer;
mod fallback;
mod handler;

pub use composer::{ComposeError, Composer};
pub use fallback::FallbackRecorder;
pub use handler::{DeliveryPipeline, PipelineStats, PipelineStatsSnapshot};
