//! Operator notifications
//!
//! Notifications are the operator-facing outcome channel: every
//! workflow result is published exactly once through a
//! [`NotificationSink`]. Tracing remains the diagnostic channel; a UI
//! embedding the station renders notifications as toasts, the CLI prints
//! them.

use std::sync::Mutex;

use serde::Serialize;

/// How the operator should read a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One operator-visible outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Where notifications go
pub trait NotificationSink: Send + Sync {
    fn publish(&self, notification: Notification);
}

/// Sink that forwards notifications to the tracing subscriber
///
/// Severity maps onto log levels, so a headless deployment still sees
/// every outcome.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn publish(&self, notification: Notification) {
        match notification.severity {
            Severity::Info | Severity::Success => {
                tracing::info!(message = %notification.message, "notification")
            }
            Severity::Warning => {
                tracing::warn!(message = %notification.message, "notification")
            }
            Severity::Error => {
                tracing::error!(message = %notification.message, "notification")
            }
        }
    }
}

/// Sink that records notifications in memory
///
/// For tests and embedders that drain outcomes themselves.
#[derive(Debug, Default)]
pub struct MemorySink {
    published: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all notifications published so far
    pub fn drain(&self) -> Vec<Notification> {
        let mut published = self.published.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *published)
    }
}

impl NotificationSink for MemorySink {
    fn publish(&self, notification: Notification) {
        self.published
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}
