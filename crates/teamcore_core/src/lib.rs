//! Core domain logic for TeamCore.
//! This crate is the single source of truth for session, directory and
//! role invariants.

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use auth::policy::{
    assignable_roles, can_access_admin_panel, can_assign_role, check_role_change, PolicyDenial,
    RoleChange,
};
pub use auth::session::{Session, SessionStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::notification::{NewNotification, NotificationId, NotificationItem};
pub use model::user::{parse_user_role, Privilege, User, UserId, UserRole, UserValidationError};
pub use notify::list::NotificationList;
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore, StorageKeys,
};
pub use repo::seed::demo_directory;
pub use repo::user_repo::{KvUserDirectory, UserDirectory};
pub use service::auth_service::{AuthError, AuthResult, AuthService};
pub use service::latency::{FixedLatency, Latency, NoLatency};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
