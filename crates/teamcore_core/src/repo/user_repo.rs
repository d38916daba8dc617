//! User directory persisted as one JSON array entry.
//!
//! # Responsibility
//! - Provide lookup, append and update over the full user list.
//! - Keep serialization details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `User::validate()` before persisting.
//! - Read paths reject invalid persisted users instead of masking them.
//! - Emails are unique under trimmed, case-insensitive comparison.

use crate::model::user::{User, UserId};
use crate::repo::kv_repo::{KeyValueStore, RepoError, RepoResult};
use log::{info, warn};

/// Directory contract used by the auth service.
pub trait UserDirectory {
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    fn insert_user(&self, user: &User) -> RepoResult<()>;
    fn update_user(&self, user: &User) -> RepoResult<()>;
    /// Writes `seed` when no directory has been persisted yet.
    ///
    /// Returns `true` when the seed was written.
    fn seed_if_empty(&self, seed: &[User]) -> RepoResult<bool>;
    fn clear(&self) -> RepoResult<()>;
}

/// Directory stored under a single key of a [`KeyValueStore`].
pub struct KvUserDirectory<'store, S: KeyValueStore> {
    store: &'store S,
    key: String,
}

impl<'store, S: KeyValueStore> KvUserDirectory<'store, S> {
    pub fn new(store: &'store S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    fn load(&self) -> RepoResult<Option<Vec<User>>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let users: Vec<User> = serde_json::from_str(&raw).map_err(|err| {
            RepoError::InvalidData(format!("cannot decode `{}`: {err}", self.key))
        })?;
        for user in &users {
            user.validate()?;
        }
        Ok(Some(users))
    }

    fn save(&self, users: &[User]) -> RepoResult<()> {
        let raw = serde_json::to_string(users).map_err(|err| {
            RepoError::InvalidData(format!("cannot encode `{}`: {err}", self.key))
        })?;
        self.store.set(&self.key, &raw)
    }
}

impl<S: KeyValueStore> UserDirectory for KvUserDirectory<'_, S> {
    fn list_users(&self) -> RepoResult<Vec<User>> {
        Ok(self.load()?.unwrap_or_default())
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .list_users()?
            .into_iter()
            .find(|user| user.has_email(email)))
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.list_users()?.into_iter().find(|user| user.id == id))
    }

    fn insert_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let mut users = self.list_users()?;
        if users.iter().any(|existing| existing.has_email(&user.email)) {
            return Err(RepoError::DuplicateEmail(user.email.trim().to_string()));
        }
        if users.iter().any(|existing| existing.id == user.id) {
            return Err(RepoError::InvalidData(format!(
                "user id {} already present",
                user.id
            )));
        }

        users.push(user.clone());
        self.save(&users)?;
        info!(
            "event=directory_insert module=repo status=ok user_id={} total={}",
            user.id,
            users.len()
        );
        Ok(())
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let mut users = self.list_users()?;
        let slot = users
            .iter_mut()
            .find(|existing| existing.id == user.id)
            .ok_or(RepoError::NotFound(user.id))?;
        *slot = user.clone();
        self.save(&users)
    }

    fn seed_if_empty(&self, seed: &[User]) -> RepoResult<bool> {
        if self.load()?.is_some() {
            return Ok(false);
        }
        for user in seed {
            user.validate()?;
        }
        self.save(seed)?;
        info!(
            "event=directory_seed module=repo status=ok total={}",
            seed.len()
        );
        Ok(true)
    }

    fn clear(&self) -> RepoResult<()> {
        warn!("event=directory_clear module=repo status=ok");
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::{KvUserDirectory, UserDirectory};
    use crate::model::user::{User, UserRole};
    use crate::repo::kv_repo::{KeyValueStore, MemoryKeyValueStore, RepoError};
    use uuid::Uuid;

    #[test]
    fn missing_entry_reads_as_empty_directory() {
        let store = MemoryKeyValueStore::new();
        let directory = KvUserDirectory::new(&store, "t:users");
        assert!(directory.list_users().expect("list").is_empty());
    }

    #[test]
    fn insert_rejects_duplicate_email_case_insensitively() {
        let store = MemoryKeyValueStore::new();
        let directory = KvUserDirectory::new(&store, "t:users");
        directory
            .insert_user(&User::new_guest("A", "a@x.com"))
            .expect("first insert");

        let err = directory
            .insert_user(&User::new_guest("A2", " A@X.com"))
            .expect_err("duplicate must fail");
        assert!(matches!(err, RepoError::DuplicateEmail(email) if email == "A@X.com"));
        assert_eq!(directory.list_users().expect("list").len(), 1);
    }

    #[test]
    fn update_missing_user_returns_not_found() {
        let store = MemoryKeyValueStore::new();
        let directory = KvUserDirectory::new(&store, "t:users");
        let ghost = User::with_role(Uuid::new_v4(), "G", "g@x.com", UserRole::Verified);
        let err = directory.update_user(&ghost).expect_err("missing user");
        assert!(matches!(err, RepoError::NotFound(id) if id == ghost.id));
    }

    #[test]
    fn seed_is_written_only_once() {
        let store = MemoryKeyValueStore::new();
        let directory = KvUserDirectory::new(&store, "t:users");
        let seed = [User::with_role(Uuid::new_v4(), "O", "o@x.com", UserRole::Owner)];

        assert!(directory.seed_if_empty(&seed).expect("first seed"));
        directory
            .insert_user(&User::new_guest("N", "n@x.com"))
            .expect("insert");
        assert!(!directory.seed_if_empty(&seed).expect("second seed"));
        assert_eq!(directory.list_users().expect("list").len(), 2);
    }

    #[test]
    fn corrupt_entry_is_reported_as_invalid_data() {
        let store = MemoryKeyValueStore::new();
        store.set("t:users", "{not json").expect("set");
        let directory = KvUserDirectory::new(&store, "t:users");
        let err = directory.list_users().expect_err("corrupt data must fail");
        assert!(matches!(err, RepoError::InvalidData(_)));
    }

    #[test]
    fn persisted_invariant_violation_is_rejected() {
        let store = MemoryKeyValueStore::new();
        let id = Uuid::new_v4();
        store
            .set(
                "t:users",
                &format!(
                    r#"[{{"id":"{id}","name":"X","email":"x@x.com","role":"guest","isVerified":true}}]"#
                ),
            )
            .expect("set");
        let directory = KvUserDirectory::new(&store, "t:users");
        let err = directory.list_users().expect_err("invalid user must fail");
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
