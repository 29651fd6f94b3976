//! User-facing notification seam.
//!
//! The host owns presentation; the core only emits `(message, title, options)` triples through a
//! [`NotificationSink`]. [`TracingNotifier`] renders them as log events.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyOptions {
    pub level: NotifyLevel,
}

impl NotifyOptions {
    pub fn new(level: NotifyLevel) -> Self {
        Self { level }
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, title: &str, options: &NotifyOptions);
}

/// Default sink: forwards notices to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, message: &str, title: &str, options: &NotifyOptions) {
        match options.level {
            NotifyLevel::Info | NotifyLevel::Success => {
                info!(title, level = ?options.level, "{}", message)
            }
            NotifyLevel::Warning => warn!(title, "{}", message),
            NotifyLevel::Error => error!(title, "{}", message),
        }
    }
}

/// Admits at most one event per `min_interval`.
#[derive(Debug)]
pub struct NotifyThrottle {
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl NotifyThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Mutex::new(None),
        }
    }

    /// Returns `true` (and records the event) if enough time passed since the last admitted one.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock();
        match *last {
            Some(prev) if now.duration_since(prev) < self.min_interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::{Notification, RecordingNotifier};

#[cfg(any(test, feature = "mock"))]
mod mock {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Notification {
        pub message: String,
        pub title: String,
        pub options: NotifyOptions,
    }

    /// Sink that records every notice for later inspection.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        events: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn notifications(&self) -> Vec<Notification> {
            self.events.lock().clone()
        }

        pub fn count(&self, level: NotifyLevel) -> usize {
            self.events
                .lock()
                .iter()
                .filter(|n| n.options.level == level)
                .count()
        }

        pub fn clear(&self) {
            self.events.lock().clear();
        }
    }

    impl NotificationSink for RecordingNotifier {
        fn notify(&self, message: &str, title: &str, options: &NotifyOptions) {
            self.events.lock().push(Notification {
                message: message.to_string(),
                title: title.to_string(),
                options: *options,
            });
        }
    }
}
