//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose session, user management and notification use-cases to Dart.
//! - Map core errors to stable `error_code` strings.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every auth call opens the database, restores the session, then acts.
//! - Logout only needs session storage and never reads the directory.
//! - Mock latency is left to the UI; calls here resolve immediately.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use teamcore_core::db::open_db;
use teamcore_core::{
    core_version as core_version_inner, demo_directory, init_logging as init_logging_inner,
    parse_user_role, ping as ping_inner, AuthError, AuthService, CoreConfig, NewNotification,
    NotificationItem, NotificationList, SqliteKeyValueStore, SystemClock, User,
};
use uuid::Uuid;

const DB_FILE_NAME: &str = "teamcore.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static NOTIFICATIONS: OnceLock<Mutex<NotificationList<SystemClock>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Directory record as shown by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Stable role id, e.g. `community_manager`.
    pub role: String,
    /// Display label, e.g. `Community Manager`.
    pub role_label: String,
    pub is_verified: bool,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            role: user.role.as_str().to_string(),
            role_label: user.role.label().to_string(),
            name: user.name,
            email: user.email,
            is_verified: user.is_verified,
        }
    }
}

/// Envelope for single-user auth results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub ok: bool,
    pub user: Option<UserView>,
    /// Stable code such as `not_verified`; `None` on success.
    pub error_code: Option<String>,
    pub message: String,
}

impl AuthResponse {
    fn success(message: impl Into<String>, user: Option<User>) -> Self {
        Self {
            ok: true,
            user: user.map(UserView::from),
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            user: None,
            error_code: Some(error_code.to_string()),
            message: message.into(),
        }
    }

    fn from_error(err: &CallError) -> Self {
        Self::failure(err.code(), err.to_string())
    }
}

/// Envelope for the admin user listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListResponse {
    pub ok: bool,
    pub users: Vec<UserView>,
    pub error_code: Option<String>,
    pub message: String,
}

/// Notification as shown by the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub read: bool,
    pub timestamp_ms: i64,
    pub link: Option<String>,
}

impl From<NotificationItem> for NotificationView {
    fn from(item: NotificationItem) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.title,
            description: item.description,
            read: item.read,
            timestamp_ms: item.timestamp,
            link: item.link,
        }
    }
}

/// Snapshot of the notification list after a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationsResponse {
    pub items: Vec<NotificationView>,
    pub unread_count: u32,
}

/// Logs in by email; the password is not verified in this demo build.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(email: String, password: String) -> AuthResponse {
    match with_auth_service(|service| service.login(&email, &password)) {
        Ok(user) => AuthResponse::success("Logged in.", Some(user)),
        Err(err) => AuthResponse::from_error(&err),
    }
}

/// Registers a pending guest account; no session is created.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_register(name: String, email: String, password: String) -> AuthResponse {
    match with_auth_service(|service| service.register(&name, &email, &password)) {
        Ok(user) => AuthResponse::success(
            "Account created. An administrator must approve it before you can log in.",
            Some(user),
        ),
        Err(err) => AuthResponse::from_error(&err),
    }
}

/// Ends the current session; succeeds when already logged out.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_logout() -> AuthResponse {
    match with_uninitialized_service(|service| service.logout()) {
        Ok(()) => AuthResponse::success("Logged out.", None),
        Err(err) => AuthResponse::from_error(&err),
    }
}

/// Returns the persisted session user, or `user: None` when logged out.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_restore_session() -> AuthResponse {
    match with_auth_service(|service| Ok(service.current_user().cloned())) {
        Ok(Some(user)) => AuthResponse::success("Session restored.", Some(user)),
        Ok(None) => AuthResponse::success("No active session.", None),
        Err(err) => AuthResponse::from_error(&err),
    }
}

/// Lists all users for the admin panel (admin/owner only).
#[flutter_rust_bridge::frb(sync)]
pub fn admin_list_users() -> UserListResponse {
    match with_auth_service(|service| service.list_users()) {
        Ok(users) => UserListResponse {
            ok: true,
            message: format!("{} user(s).", users.len()),
            users: users.into_iter().map(UserView::from).collect(),
            error_code: None,
        },
        Err(err) => UserListResponse {
            ok: false,
            users: Vec::new(),
            error_code: Some(err.code().to_string()),
            message: err.to_string(),
        },
    }
}

/// Changes a user's role on behalf of the logged-in admin/owner.
///
/// `role` is a stable role id such as `verified` or `project_manager`.
#[flutter_rust_bridge::frb(sync)]
pub fn admin_update_role(user_id: String, role: String) -> AuthResponse {
    let Ok(target_id) = Uuid::parse_str(user_id.trim()) else {
        return AuthResponse::failure("invalid_input", format!("invalid user id `{user_id}`"));
    };
    let Some(new_role) = parse_user_role(&role) else {
        return AuthResponse::failure("invalid_input", format!("unknown role `{role}`"));
    };

    match with_auth_service(|service| service.update_user_role(target_id, new_role)) {
        Ok(user) => AuthResponse::success(
            format!("User role changed to {}.", new_role.label()),
            Some(user),
        ),
        Err(err) => AuthResponse::from_error(&err),
    }
}

/// Returns the notification list, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn notifications_list() -> NotificationsResponse {
    with_notifications(|_| {})
}

/// Adds an unread notification at the top of the list.
#[flutter_rust_bridge::frb(sync)]
pub fn notification_add(
    title: String,
    description: String,
    link: Option<String>,
) -> NotificationsResponse {
    with_notifications(|list| {
        let mut notification = NewNotification::new(title, description);
        notification.link = link.filter(|value| !value.trim().is_empty());
        list.add(notification);
    })
}

/// Marks one notification read; unknown ids are ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn notification_mark_read(id: String) -> NotificationsResponse {
    with_notifications(|list| {
        if let Ok(id) = Uuid::parse_str(id.trim()) {
            list.mark_read(id);
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn notifications_mark_all_read() -> NotificationsResponse {
    with_notifications(|list| list.mark_all_read())
}

#[flutter_rust_bridge::frb(sync)]
pub fn notifications_clear() -> NotificationsResponse {
    with_notifications(|list| list.clear())
}

#[flutter_rust_bridge::frb(sync)]
pub fn notifications_unread_count() -> u32 {
    notifications_list().unread_count
}

/// Failure of one FFI auth call: either opening storage or the use-case.
#[derive(Debug)]
enum CallError {
    Storage(String),
    Auth(AuthError),
}

impl CallError {
    fn code(&self) -> &'static str {
        match self {
            Self::Storage(_) => "storage_error",
            Self::Auth(err) => err.code(),
        }
    }
}

impl std::fmt::Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(message) => write!(f, "{message}"),
            Self::Auth(err) => write!(f, "{err}"),
        }
    }
}

impl From<AuthError> for CallError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("TEAMCORE_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

type FfiAuthService<'store> = AuthService<'store, SqliteKeyValueStore<'store>>;

fn with_auth_service<T>(
    f: impl FnOnce(&mut FfiAuthService<'_>) -> Result<T, AuthError>,
) -> Result<T, CallError> {
    with_uninitialized_service(|service| {
        let config = CoreConfig::default();
        let seed = if config.seed_demo_directory {
            demo_directory()
        } else {
            Vec::new()
        };
        service.init(&seed)?;
        f(service)
    })
}

/// Opens storage and runs `f` without restoring the session or seeding.
fn with_uninitialized_service<T>(
    f: impl FnOnce(&mut FfiAuthService<'_>) -> Result<T, AuthError>,
) -> Result<T, CallError> {
    let config = CoreConfig::default();
    let conn = open_db(resolve_db_path())
        .map_err(|err| CallError::Storage(format!("storage open failed: {err}")))?;
    let store = SqliteKeyValueStore::new(&conn);
    let mut service = AuthService::new(&store, &config.storage_keys());
    f(&mut service).map_err(CallError::from)
}

fn with_notifications(
    f: impl FnOnce(&mut NotificationList<SystemClock>),
) -> NotificationsResponse {
    let mut list = lock_notifications();
    f(&mut list);
    NotificationsResponse {
        items: list.to_vec().into_iter().map(NotificationView::from).collect(),
        unread_count: u32::try_from(list.unread_count()).unwrap_or(u32::MAX),
    }
}

fn lock_notifications() -> MutexGuard<'static, NotificationList<SystemClock>> {
    let cell = NOTIFICATIONS.get_or_init(|| {
        let capacity = CoreConfig::default().max_notifications;
        Mutex::new(NotificationList::with_demo_items(capacity, SystemClock))
    });
    cell.lock().unwrap_or_else(|poisoned| {
        warn!("event=notifications_lock module=ffi status=recovered reason=poisoned");
        poisoned.into_inner()
    })
}
