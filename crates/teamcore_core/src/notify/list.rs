//! Capped, newest-first notification list.
//!
//! # Invariants
//! - Items are ordered newest first.
//! - Length never exceeds the configured capacity; the oldest item is
//!   evicted first.
//! - Unread count is recomputed from the items on every call.

use crate::clock::{Clock, SystemClock};
use crate::config::DEFAULT_MAX_NOTIFICATIONS;
use crate::model::notification::{NewNotification, NotificationId, NotificationItem};
use log::debug;
use std::collections::VecDeque;
use uuid::Uuid;

const MINUTE_MS: i64 = 60 * 1000;

pub struct NotificationList<C: Clock = SystemClock> {
    items: VecDeque<NotificationItem>,
    capacity: usize,
    clock: C,
}

impl NotificationList<SystemClock> {
    /// Empty list with the default capacity and the system clock.
    pub fn new() -> Self {
        Self::with_clock(DEFAULT_MAX_NOTIFICATIONS, SystemClock)
    }
}

impl Default for NotificationList<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> NotificationList<C> {
    /// Empty list holding at most `capacity` items (minimum 1).
    pub fn with_clock(capacity: usize, clock: C) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            clock,
        }
    }

    /// List pre-filled with the dashboard's demo alerts.
    pub fn with_demo_items(capacity: usize, clock: C) -> Self {
        let mut list = Self::with_clock(capacity, clock);
        let now = list.clock.now_epoch_ms();
        let demo = [
            (
                "Project Milestone Reached",
                "\"Soundtrack Vol. I\" is now complete!",
                false,
                now - 120 * MINUTE_MS,
            ),
            (
                "Comment on \"Login Bug\"",
                "@JaxCoderius mentioned you: \"Can you take a look?\"",
                true,
                now - 30 * MINUTE_MS,
            ),
            (
                "New Task Assigned",
                "Design the \"Azure Glade\" loading screen.",
                false,
                now - 5 * MINUTE_MS,
            ),
        ];
        for (title, description, read, timestamp) in demo {
            list.push_front(NotificationItem {
                id: Uuid::new_v4(),
                title: title.to_string(),
                description: description.to_string(),
                read,
                timestamp,
                link: None,
            });
        }
        list
    }

    /// Prepends a new unread item and evicts overflow from the tail.
    pub fn add(&mut self, notification: NewNotification) -> NotificationId {
        let item = NotificationItem {
            id: Uuid::new_v4(),
            title: notification.title,
            description: notification.description,
            read: false,
            timestamp: self.clock.now_epoch_ms(),
            link: notification.link,
        };
        let id = item.id;
        self.push_front(item);
        id
    }

    /// Marks one item read; unknown ids are ignored.
    pub fn mark_read(&mut self, id: NotificationId) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.read = true;
        }
    }

    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            item.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.read).count()
    }

    pub fn get(&self, id: NotificationId) -> Option<&NotificationItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &NotificationItem> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<NotificationItem> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push_front(&mut self, item: NotificationItem) {
        self.items.push_front(item);
        while self.items.len() > self.capacity {
            if let Some(evicted) = self.items.pop_back() {
                debug!(
                    "event=notification_evict module=notify status=ok notification_id={}",
                    evicted.id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationList;
    use crate::clock::ManualClock;
    use crate::model::notification::NewNotification;

    #[test]
    fn demo_items_are_newest_first_with_two_unread() {
        let clock = ManualClock::new(10_000_000);
        let list = NotificationList::with_demo_items(20, &clock);
        let titles: Vec<_> = list.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "New Task Assigned",
                "Comment on \"Login Bug\"",
                "Project Milestone Reached"
            ]
        );
        assert_eq!(list.unread_count(), 2);
    }

    #[test]
    fn add_stamps_time_and_starts_unread() {
        let clock = ManualClock::new(1_000);
        let mut list = NotificationList::with_clock(3, &clock);
        clock.advance_ms(500);
        let id = list.add(NewNotification::new("t", "d").with_link("/dashboard/tasks"));

        let item = list.get(id).expect("item present");
        assert_eq!(item.timestamp, 1_500);
        assert!(!item.read);
        assert_eq!(item.link.as_deref(), Some("/dashboard/tasks"));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let clock = ManualClock::new(0);
        let mut list = NotificationList::with_clock(0, &clock);
        list.add(NewNotification::new("a", ""));
        list.add(NewNotification::new("b", ""));
        assert_eq!(list.capacity(), 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list.iter().next().map(|item| item.title.as_str()), Some("b"));
    }
}
