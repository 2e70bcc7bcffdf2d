//! Suffix-based event filtering.

use std::path::Path;

use super::events::{EventKind, FileEvent};

/// Predicate over file events.
///
/// Admits only regular-file creation events whose name ends with the
/// configured suffix. Pure and idempotent: admitting the same event twice
/// always yields the same answer.
#[derive(Debug, Clone)]
pub struct EventFilter {
    suffix: String,
}

impl EventFilter {
    /// Create a filter for the given suffix (including the leading dot).
    #[must_use]
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Check whether an event should enter the delivery pipeline.
    #[must_use]
    pub fn admit(&self, event: &FileEvent) -> bool {
        !event.is_directory
            && event.kind == EventKind::Created
            && Self::has_suffix(&event.path, &self.suffix)
    }

    /// The suffix this filter admits.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    fn has_suffix(path: &Path, suffix: &str) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watcher::FileEvent;

    fn filter() -> EventFilter {
        EventFilter::new(".txt")
    }

    #[test]
    fn test_admits_matching_file_creation() {
        assert!(filter().admit(&FileEvent::created("/exports/report.txt")));
    }

    #[test]
    fn test_rejects_non_matching_suffix() {
        assert!(!filter().admit(&FileEvent::created("/exports/data.csv")));
    }

    #[test]
    fn test_rejects_directory_events() {
        let event = FileEvent::new("/exports/nested.txt", EventKind::Created, true);
        assert!(!filter().admit(&event));
    }

    #[test]
    fn test_rejects_non_creation_events() {
        let event = FileEvent::new("/exports/report.txt", EventKind::Other, false);
        assert!(!filter().admit(&event));
    }

    #[test]
    fn test_admit_is_idempotent() {
        let f = filter();
        let event = FileEvent::created("/exports/report.txt");
        assert_eq!(f.admit(&event), f.admit(&event));

        let rejected = FileEvent::created("/exports/data.csv");
        assert_eq!(f.admit(&rejected), f.admit(&rejected));
    }

    #[test]
    fn test_custom_suffix() {
        let f = EventFilter::new(".csv");
        assert!(f.admit(&FileEvent::created("/exports/data.csv")));
        assert!(!f.admit(&FileEvent::created("/exports/report.txt")));
        assert_eq!(f.suffix(), ".csv");
    }
}
