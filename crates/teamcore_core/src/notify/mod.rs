//! In-memory notification feed.
//!
//! Notifications are not persisted; the list lives as long as its owner.

pub mod list;
