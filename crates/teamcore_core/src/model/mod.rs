//! Domain records for the TeamCore client core.
//!
//! # Responsibility
//! - Define the user directory record and its closed role set.
//! - Define notification items held by the in-memory list.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - A user's verification flag is always derived from its role.

pub mod notification;
pub mod user;
