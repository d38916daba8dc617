//! Mock authentication building blocks.
//!
//! # Responsibility
//! - Persist and restore the single local session.
//! - Decide role assignments from the role table.
//!
//! # Invariants
//! - Policy functions are pure and never touch storage.
//! - Credentials are not verified; this is demo-only authentication.

pub mod policy;
pub mod session;
