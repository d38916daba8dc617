//! Persisted session: an opaque token plus a snapshot of the logged-in user.
//!
//! # Invariants
//! - Token and user snapshot are written and cleared together.
//! - A half-written or undecodable session is cleared on load, never surfaced.

use crate::model::user::User;
use crate::repo::kv_repo::{KeyValueStore, RepoError, RepoResult, StorageKeys};
use log::{info, warn};
use uuid::Uuid;

/// Restored or freshly created session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Session persistence over a [`KeyValueStore`].
pub struct SessionStore<'store, S: KeyValueStore> {
    store: &'store S,
    token_key: String,
    user_key: String,
}

impl<'store, S: KeyValueStore> SessionStore<'store, S> {
    pub fn new(store: &'store S, keys: &StorageKeys) -> Self {
        Self {
            store,
            token_key: keys.session_token.clone(),
            user_key: keys.current_user.clone(),
        }
    }

    /// Persists a new session for `user` and returns it.
    pub fn persist(&self, user: &User) -> RepoResult<Session> {
        let token = format!("session-{}", Uuid::new_v4().simple());
        self.write_user(user)?;
        self.store.set(&self.token_key, &token)?;
        Ok(Session {
            token,
            user: user.clone(),
        })
    }

    /// Loads the persisted session.
    ///
    /// Returns `Ok(None)` after clearing both entries when only one is
    /// present or the snapshot is unusable.
    pub fn load(&self) -> RepoResult<Option<Session>> {
        let token = self.store.get(&self.token_key)?;
        let raw_user = self.store.get(&self.user_key)?;

        match (token, raw_user) {
            (None, None) => Ok(None),
            (Some(token), Some(raw_user)) => match decode_user(&raw_user) {
                Ok(user) => Ok(Some(Session { token, user })),
                Err(err) => {
                    warn!(
                        "event=session_restore module=auth status=discarded reason=bad_snapshot error={err}"
                    );
                    self.clear()?;
                    Ok(None)
                }
            },
            (token, _) => {
                let reason = if token.is_some() {
                    "token_without_user"
                } else {
                    "user_without_token"
                };
                warn!("event=session_restore module=auth status=discarded reason={reason}");
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// Removes both session entries; idempotent.
    pub fn clear(&self) -> RepoResult<()> {
        self.store.remove(&self.token_key)?;
        self.store.remove(&self.user_key)?;
        info!("event=session_clear module=auth status=ok");
        Ok(())
    }

    fn write_user(&self, user: &User) -> RepoResult<()> {
        let raw = serde_json::to_string(user)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode session user: {err}")))?;
        self.store.set(&self.user_key, &raw)
    }
}

fn decode_user(raw: &str) -> RepoResult<User> {
    let user: User = serde_json::from_str(raw)
        .map_err(|err| RepoError::InvalidData(format!("cannot decode session user: {err}")))?;
    user.validate()?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::SessionStore;
    use crate::model::user::{User, UserRole};
    use crate::repo::kv_repo::{KeyValueStore, MemoryKeyValueStore, StorageKeys};
    use uuid::Uuid;

    fn verified_user() -> User {
        User::with_role(Uuid::new_v4(), "Vera", "vera@x.com", UserRole::Verified)
    }

    #[test]
    fn persist_then_load_returns_same_session() {
        let store = MemoryKeyValueStore::new();
        let sessions = SessionStore::new(&store, &StorageKeys::default());
        let created = sessions.persist(&verified_user()).expect("persist");

        let loaded = sessions.load().expect("load").expect("session present");
        assert_eq!(loaded, created);
        assert!(loaded.token.starts_with("session-"));
    }

    #[test]
    fn token_without_user_is_cleared() {
        let store = MemoryKeyValueStore::new();
        let keys = StorageKeys::default();
        store.set(&keys.session_token, "session-orphan").expect("set");

        let sessions = SessionStore::new(&store, &keys);
        assert_eq!(sessions.load().expect("load"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn user_without_token_is_cleared() {
        let store = MemoryKeyValueStore::new();
        let keys = StorageKeys::default();
        let raw = serde_json::to_string(&verified_user()).expect("encode");
        store.set(&keys.current_user, &raw).expect("set");

        let sessions = SessionStore::new(&store, &keys);
        assert_eq!(sessions.load().expect("load"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn undecodable_snapshot_is_cleared() {
        let store = MemoryKeyValueStore::new();
        let keys = StorageKeys::default();
        store.set(&keys.session_token, "session-x").expect("set token");
        store.set(&keys.current_user, "[]").expect("set user");

        let sessions = SessionStore::new(&store, &keys);
        assert_eq!(sessions.load().expect("load"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let store = MemoryKeyValueStore::new();
        let sessions = SessionStore::new(&store, &StorageKeys::default());
        sessions.clear().expect("first clear");
        sessions.clear().expect("second clear");
        assert_eq!(sessions.load().expect("load"), None);
    }
}
