//! Flutter-facing FFI surface for TeamCore core.

pub mod api;
