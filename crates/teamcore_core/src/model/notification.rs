//! Notification item model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NotificationId = Uuid;

/// One alert shown in the notification dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: NotificationId,
    pub title: String,
    pub description: String,
    pub read: bool,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    /// Optional in-app route the item points at.
    pub link: Option<String>,
}

/// Producer-supplied part of a notification.
///
/// `id`, `timestamp` and `read` are assigned by the list on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub title: String,
    pub description: String,
    pub link: Option<String>,
}

impl NewNotification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}
