//! Notification pattern
//!
//! Business failures are collected as notifications instead of being raised
//! as errors. Entities and validators accumulate them, handlers return them
//! inside a failed response and the API layer turns them into status codes.

use serde::{Deserialize, Serialize};

/// Well-known notification keys used by handlers.
pub mod keys {
    pub const NOT_FOUND: &str = "NotFound";
    pub const OPERATION: &str = "Operation";
    pub const FORBIDDEN: &str = "Forbidden";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub key: String,
    pub message: String,
}

impl Notification {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(keys::NOT_FOUND, message)
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::new(keys::OPERATION, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(keys::FORBIDDEN, message)
    }

    pub fn is(&self, key: &str) -> bool {
        self.key == key
    }
}

/// Ordered collection of notifications raised while processing one unit of work.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NotificationContext {
    notifications: Vec<Notification>,
}

impl NotificationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.notifications.push(Notification::new(key, message));
    }

    pub fn add_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn extend(&mut self, notifications: impl IntoIterator<Item = Notification>) {
        self.notifications.extend(notifications);
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }
}
