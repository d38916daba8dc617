//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and policy calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod auth_service;
pub mod latency;
