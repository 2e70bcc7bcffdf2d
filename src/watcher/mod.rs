//! File system watching for the delivery pipeline.
//!
//! This module provides:
//! - Non-recursive directory watching using notify-rs
//! - Suffix-based filtering of creation events

mod events;
mod filter;
#[allow(clippy::module_inception)]
mod watcher;

pub use events::{EventKind, FileEvent};
pub use filter::EventFilter;
pub use watcher::DirWatcher;
