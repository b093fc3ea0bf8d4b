//! # Notification Service
//!
//! Typed user-facing messages ("toasts") raised by the editor.
//!
//! ## Philosophy
//!
//! - **Structured, not stdout**: Notifications are typed events, not print statements
//! - **Prioritized**: Notifications carry one of four levels
//! - **Ordered**: Every notification gets a sequence number
//! - **Testable**: Notification history can be inspected
//!
//! Presentation is the host's business. The editor talks to a [`Notifier`];
//! [`NotificationService`] is the recording implementation used by hosts
//! that poll, and by tests.
//!
//! ## Example
//!
//! ```ignore
//! use services_notification::{NotificationLevel, NotificationService, Notifier};
//!
//! let mut service = NotificationService::new();
//! service.success("Changes saved");
//! assert_eq!(service.last().unwrap().level, NotificationLevel::Success);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// Maximum number of notifications to keep in history
const MAX_NOTIFICATION_HISTORY: usize = 100;

/// Unique identifier for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new notification ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notif:{}", self.0)
    }
}

/// Notification severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Informational message
    Info,
    /// Success message
    Success,
    /// Warning message
    Warning,
    /// Error message
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "INFO"),
            NotificationLevel::Success => write!(f, "SUCCESS"),
            NotificationLevel::Warning => write!(f, "WARNING"),
            NotificationLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier
    pub id: NotificationId,
    /// Notification level
    pub level: NotificationLevel,
    /// Message text
    pub message: String,
    /// Position in the order notifications were raised
    pub sequence: u64,
}

/// Surface that shows notifications to the user
pub trait Notifier {
    fn notify(&mut self, level: NotificationLevel, message: &str);

    fn info(&mut self, message: &str) {
        self.notify(NotificationLevel::Info, message);
    }

    fn success(&mut self, message: &str) {
        self.notify(NotificationLevel::Success, message);
    }

    fn warning(&mut self, message: &str) {
        self.notify(NotificationLevel::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.notify(NotificationLevel::Error, message);
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, level: NotificationLevel, message: &str) {
        (**self).notify(level, message);
    }
}

/// Recording notifier with bounded history
#[derive(Debug, Default)]
pub struct NotificationService {
    notifications: VecDeque<Notification>,
    next_sequence: u64,
}

impl NotificationService {
    /// Creates a new notification service
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent notification
    pub fn last(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    /// Returns all recent notifications, newest first
    pub fn recent(&self, limit: usize) -> Vec<&Notification> {
        self.notifications.iter().rev().take(limit).collect()
    }

    /// Returns notifications filtered by level, oldest first
    pub fn by_level(&self, level: NotificationLevel) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| n.level == level)
            .collect()
    }

    /// True if any recorded message at `level` contains `needle`
    pub fn contains(&self, level: NotificationLevel, needle: &str) -> bool {
        self.notifications
            .iter()
            .any(|n| n.level == level && n.message.contains(needle))
    }

    /// Clears all notifications from history
    pub fn clear(&mut self) {
        self.notifications.clear();
    }

    /// Returns the number of notifications in history
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

impl Notifier for NotificationService {
    fn notify(&mut self, level: NotificationLevel, message: &str) {
        tracing::debug!(%level, message, "notification");
        self.notifications.push_back(Notification {
            id: NotificationId::new(),
            level,
            message: message.to_string(),
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;

        while self.notifications.len() > MAX_NOTIFICATION_HISTORY {
            self.notifications.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_id_creation() {
        let id1 = NotificationId::new();
        let id2 = NotificationId::new();
        assert_ne!(id1, id2);
        assert!(id1.to_string().starts_with("notif:"));
    }

    #[test]
    fn test_notification_level_ordering() {
        assert!(NotificationLevel::Info < NotificationLevel::Success);
        assert!(NotificationLevel::Success < NotificationLevel::Warning);
        assert!(NotificationLevel::Warning < NotificationLevel::Error);
    }

    #[test]
    fn test_level_wire_names() {
        assert_eq!(
            serde_json::to_string(&NotificationLevel::Warning).unwrap(),
            "\"warning\""
        );
    }

    #[test]
    fn test_helpers_set_level() {
        let mut service = NotificationService::new();
        service.info("i");
        service.success("s");
        service.warning("w");
        service.error("e");

        let levels: Vec<_> = service.recent(4).iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![
                NotificationLevel::Error,
                NotificationLevel::Warning,
                NotificationLevel::Success,
                NotificationLevel::Info
            ]
        );
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let mut service = NotificationService::new();
        service.info("a");
        service.info("b");
        let recent = service.recent(2);
        assert!(recent[0].sequence > recent[1].sequence);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut service = NotificationService::new();
        for i in 0..(MAX_NOTIFICATION_HISTORY + 10) {
            service.info(&format!("message {i}"));
        }
        assert_eq!(service.len(), MAX_NOTIFICATION_HISTORY);
        assert_eq!(service.last().unwrap().message, "message 109");
        assert!(!service.contains(NotificationLevel::Info, "message 0"));
    }

    #[test]
    fn test_by_level_and_contains() {
        let mut service = NotificationService::new();
        service.error("Wrong password");
        service.success("Saved");
        assert_eq!(service.by_level(NotificationLevel::Error).len(), 1);
        assert!(service.contains(NotificationLevel::Error, "password"));
        assert!(!service.contains(NotificationLevel::Success, "password"));

        service.clear();
        assert!(service.is_empty());
    }
}
