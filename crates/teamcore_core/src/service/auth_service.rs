//! Mock authentication and user management use-cases.
//!
//! # Responsibility
//! - Orchestrate directory lookups, session persistence and policy checks.
//! - Hold the in-memory "currently logged in" state for one client.
//!
//! # Invariants
//! - Failed operations leave directory, session and in-memory state unchanged.
//! - Registration never establishes a session; new accounts await approval.
//! - Every role write goes through `User::set_role`.
//! - Credentials are accepted but never verified (demo-only).

use crate::auth::policy::{check_role_change, require_admin_panel, PolicyDenial, RoleChange};
use crate::auth::session::{Session, SessionStore};
use crate::model::user::{User, UserId, UserRole};
use crate::repo::kv_repo::{KeyValueStore, RepoError, StorageKeys};
use crate::repo::user_repo::{KvUserDirectory, UserDirectory};
use crate::service::latency::{Latency, NoLatency};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

/// Failure reasons surfaced to the UI boundary.
#[derive(Debug)]
pub enum AuthError {
    /// No directory entry matches the login email.
    NotFound(String),
    /// The account is still a guest awaiting approval.
    NotVerified(UserId),
    /// Registration email is already taken.
    AlreadyExists(String),
    /// Role update target is missing.
    UserNotFound(UserId),
    /// A required registration field is blank.
    InvalidInput(&'static str),
    /// Operation requires a logged-in user.
    NotAuthenticated,
    PermissionDenied(PolicyDenial),
    Repo(RepoError),
}

impl AuthError {
    /// Stable machine-readable code for FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::NotVerified(_) => "not_verified",
            Self::AlreadyExists(_) => "already_exists",
            Self::UserNotFound(_) => "user_not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::NotAuthenticated => "not_authenticated",
            Self::PermissionDenied(_) => "permission_denied",
            Self::Repo(_) => "storage_error",
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(email) => write!(f, "no account found for {email}"),
            Self::NotVerified(_) => {
                write!(f, "account is pending verification by an administrator")
            }
            Self::AlreadyExists(email) => write!(f, "an account already exists for {email}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::InvalidInput(field) => write!(f, "{field} must not be empty"),
            Self::NotAuthenticated => write!(f, "not logged in"),
            Self::PermissionDenied(denial) => write!(f, "{denial}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PermissionDenied(denial) => Some(denial),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::UserNotFound(id),
            RepoError::DuplicateEmail(email) => Self::AlreadyExists(email),
            other => Self::Repo(other),
        }
    }
}

impl From<PolicyDenial> for AuthError {
    fn from(value: PolicyDenial) -> Self {
        Self::PermissionDenied(value)
    }
}

/// Auth facade over one key/value store.
pub struct AuthService<'store, S: KeyValueStore, L: Latency = NoLatency> {
    directory: KvUserDirectory<'store, S>,
    sessions: SessionStore<'store, S>,
    latency: L,
    current: Option<Session>,
}

impl<'store, S: KeyValueStore> AuthService<'store, S, NoLatency> {
    /// Creates a service that resolves mock calls immediately.
    pub fn new(store: &'store S, keys: &StorageKeys) -> Self {
        Self::with_latency(store, keys, NoLatency)
    }
}

impl<'store, S: KeyValueStore, L: Latency> AuthService<'store, S, L> {
    pub fn with_latency(store: &'store S, keys: &StorageKeys, latency: L) -> Self {
        Self {
            directory: KvUserDirectory::new(store, keys.users.clone()),
            sessions: SessionStore::new(store, keys),
            latency,
            current: None,
        }
    }

    /// Load-or-seed startup: restores the persisted session, then seeds an
    /// empty directory.
    ///
    /// An unreadable directory is left untouched and does not block session
    /// restore; directory operations report it as a storage error.
    pub fn init(&mut self, seed: &[User]) -> AuthResult<Option<User>> {
        let restored = self.restore_session()?;
        if let Err(err) = self.directory.seed_if_empty(seed) {
            warn!("event=directory_seed module=service status=error error={err}");
        }
        Ok(restored)
    }

    /// Restores the persisted session into memory.
    ///
    /// Inconsistent persisted state is cleared and reported as no session.
    pub fn restore_session(&mut self) -> AuthResult<Option<User>> {
        self.current = self.sessions.load()?;
        match &self.current {
            Some(session) => info!(
                "event=session_restore module=service status=ok user_id={}",
                session.user.id
            ),
            None => info!("event=session_restore module=service status=empty"),
        }
        Ok(self.current_user().cloned())
    }

    /// Logs in by email.
    ///
    /// `_credential` is accepted for interface parity but not verified.
    pub fn login(&mut self, email: &str, _credential: &str) -> AuthResult<User> {
        self.latency.simulate("login");

        let email = email.trim();
        let Some(user) = self.directory.find_by_email(email)? else {
            warn!("event=login module=service status=rejected reason=not_found");
            return Err(AuthError::NotFound(email.to_string()));
        };
        if !user.can_log_in() {
            warn!(
                "event=login module=service status=rejected reason=not_verified user_id={}",
                user.id
            );
            return Err(AuthError::NotVerified(user.id));
        }

        let session = self.sessions.persist(&user)?;
        info!("event=login module=service status=ok user_id={}", user.id);
        self.current = Some(session);
        Ok(user)
    }

    /// Registers a new guest account without logging it in.
    pub fn register(&mut self, name: &str, email: &str, credential: &str) -> AuthResult<User> {
        self.latency.simulate("register");

        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("name"));
        }
        if email.is_empty() {
            return Err(AuthError::InvalidInput("email"));
        }
        if credential.is_empty() {
            return Err(AuthError::InvalidInput("password"));
        }

        if self.directory.find_by_email(email)?.is_some() {
            warn!("event=register module=service status=rejected reason=already_exists");
            return Err(AuthError::AlreadyExists(email.to_string()));
        }

        let user = User::new_guest(name, email);
        self.directory.insert_user(&user)?;
        info!(
            "event=register module=service status=ok user_id={} role={}",
            user.id, user.role
        );
        Ok(user)
    }

    /// Ends the current session; idempotent.
    pub fn logout(&mut self) -> AuthResult<()> {
        self.sessions.clear()?;
        if let Some(session) = self.current.take() {
            info!(
                "event=logout module=service status=ok user_id={}",
                session.user.id
            );
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref().map(|session| &session.user)
    }

    pub fn session_token(&self) -> Option<&str> {
        self.current.as_ref().map(|session| session.token.as_str())
    }

    /// Lists the directory for the admin panel.
    pub fn list_users(&self) -> AuthResult<Vec<User>> {
        let actor = self.acting_user()?;
        require_admin_panel(actor.role)?;
        Ok(self.directory.list_users()?)
    }

    /// Changes `target_id`'s role on behalf of the logged-in user.
    ///
    /// # Errors
    /// - `NotAuthenticated` without a session.
    /// - `PermissionDenied` when the actor is not staff, targets themselves
    ///   with a different role, or the role table forbids the change.
    /// - `UserNotFound` when `target_id` is not in the directory.
    pub fn update_user_role(&mut self, target_id: UserId, new_role: UserRole) -> AuthResult<User> {
        let actor = self.acting_user()?;
        require_admin_panel(actor.role)?;

        let mut target = self
            .directory
            .find_by_id(target_id)?
            .ok_or(AuthError::UserNotFound(target_id))?;

        match check_role_change(&actor, &target, new_role) {
            Ok(RoleChange::Unchanged) => return Ok(target),
            Ok(RoleChange::Apply) => {}
            Err(denial) => {
                warn!(
                    "event=role_update module=service status=denied actor_id={} target_id={} candidate={}",
                    actor.id, target.id, new_role
                );
                return Err(denial.into());
            }
        }

        let previous = target.role;
        target.set_role(new_role);
        self.directory.update_user(&target)?;
        info!(
            "event=role_update module=service status=ok actor_id={} target_id={} from={} to={} verified={}",
            actor.id, target.id, previous, new_role, target.is_verified
        );
        Ok(target)
    }

    /// Drops directory and session; used for test teardown.
    pub fn reset(&mut self) -> AuthResult<()> {
        self.sessions.clear()?;
        self.directory.clear()?;
        self.current = None;
        Ok(())
    }

    /// Current actor as recorded in the directory.
    fn acting_user(&self) -> AuthResult<User> {
        let session = self.current.as_ref().ok_or(AuthError::NotAuthenticated)?;
        self.directory
            .find_by_id(session.user.id)?
            .ok_or(AuthError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthError, AuthService};
    use crate::model::user::{User, UserRole};
    use crate::repo::kv_repo::{MemoryKeyValueStore, StorageKeys};
    use crate::service::latency::Latency;
    use std::cell::RefCell;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingLatency {
        calls: RefCell<Vec<&'static str>>,
    }

    impl Latency for &RecordingLatency {
        fn simulate(&self, operation: &'static str) {
            self.calls.borrow_mut().push(operation);
        }
    }

    #[test]
    fn login_and_register_go_through_latency() {
        let store = MemoryKeyValueStore::new();
        let latency = RecordingLatency::default();
        let mut service = AuthService::with_latency(&store, &StorageKeys::default(), &latency);

        service
            .register("Nia", "nia@x.com", "pw")
            .expect("register");
        let _ = service.login("nia@x.com", "pw");

        assert_eq!(*latency.calls.borrow(), vec!["register", "login"]);
    }

    #[test]
    fn register_rejects_blank_fields() {
        let store = MemoryKeyValueStore::new();
        let mut service = AuthService::new(&store, &StorageKeys::default());

        for (name, email, password, field) in [
            ("  ", "a@x.com", "pw", "name"),
            ("A", " ", "pw", "email"),
            ("A", "a@x.com", "", "password"),
        ] {
            let err = service
                .register(name, email, password)
                .expect_err("blank field must fail");
            assert!(matches!(err, AuthError::InvalidInput(f) if f == field));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn list_users_requires_session_and_staff_role() {
        let store = MemoryKeyValueStore::new();
        let mut service = AuthService::new(&store, &StorageKeys::default());
        let dev = User::with_role(Uuid::new_v4(), "Dev", "dev@x.com", UserRole::Developer);
        service.init(std::slice::from_ref(&dev)).expect("init");

        assert!(matches!(
            service.list_users().expect_err("no session"),
            AuthError::NotAuthenticated
        ));

        service.login("dev@x.com", "pw").expect("login");
        let err = service.list_users().expect_err("developer is not staff");
        assert_eq!(err.code(), "permission_denied");
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(AuthError::NotFound("x".to_string()).code(), "not_found");
        assert_eq!(AuthError::NotVerified(Uuid::nil()).code(), "not_verified");
        assert_eq!(
            AuthError::AlreadyExists("x".to_string()).code(),
            "already_exists"
        );
        assert_eq!(AuthError::UserNotFound(Uuid::nil()).code(), "user_not_found");
    }
}
