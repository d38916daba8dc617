//! Persistence contracts and storage-backed implementations.
//!
//! # Responsibility
//! - Define key/value and directory access contracts.
//! - Isolate SQLite and JSON encoding details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `User::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateEmail`)
//!   in addition to storage transport errors.

pub mod kv_repo;
pub mod seed;
pub mod user_repo;
