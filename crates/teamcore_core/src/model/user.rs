//! User record and role table.
//!
//! # Responsibility
//! - Define the directory record shared by session, admin and policy code.
//! - Own the closed role set and its privilege table.
//!
//! # Invariants
//! - `id` is stable and never reused for another user.
//! - `role == Guest` if and only if `is_verified == false`.
//! - Role changes go through [`User::set_role`], which restores the invariant.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every directory record.
pub type UserId = Uuid;

/// Privilege tier used by the authorization table.
///
/// Ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Privilege {
    /// Unverified account, cannot log in.
    Guest,
    /// Verified account without management rights.
    Member,
    /// Manages non-staff users.
    Staff,
    /// Manages everyone.
    Owner,
}

/// Closed set of TeamCore roles.
///
/// Declaration order is the display order used by role pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Guest,
    Verified,
    Developer,
    Builder,
    Designer,
    CommunityManager,
    Moderator,
    ProjectManager,
    Admin,
    Owner,
}

/// One row of the role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleEntry {
    pub role: UserRole,
    pub id: &'static str,
    pub label: &'static str,
    pub privilege: Privilege,
    /// Highest tier this role may assign or modify; `None` means no grants.
    pub grant_ceiling: Option<Privilege>,
}

const fn entry(
    role: UserRole,
    id: &'static str,
    label: &'static str,
    privilege: Privilege,
    grant_ceiling: Option<Privilege>,
) -> RoleEntry {
    RoleEntry {
        role,
        id,
        label,
        privilege,
        grant_ceiling,
    }
}

const ROLE_TABLE: &[RoleEntry] = &[
    entry(UserRole::Guest, "guest", "Guest", Privilege::Guest, None),
    entry(UserRole::Verified, "verified", "Verified", Privilege::Member, None),
    entry(UserRole::Developer, "developer", "Developer", Privilege::Member, None),
    entry(UserRole::Builder, "builder", "Builder", Privilege::Member, None),
    entry(UserRole::Designer, "designer", "Designer", Privilege::Member, None),
    entry(
        UserRole::CommunityManager,
        "community_manager",
        "Community Manager",
        Privilege::Member,
        None,
    ),
    entry(UserRole::Moderator, "moderator", "Moderator", Privilege::Member, None),
    entry(
        UserRole::ProjectManager,
        "project_manager",
        "Project Manager",
        Privilege::Member,
        None,
    ),
    entry(
        UserRole::Admin,
        "admin",
        "Admin",
        Privilege::Staff,
        Some(Privilege::Member),
    ),
    entry(
        UserRole::Owner,
        "owner",
        "Owner",
        Privilege::Owner,
        Some(Privilege::Owner),
    ),
];

/// Returns the full role table in display order.
pub fn role_table() -> &'static [RoleEntry] {
    ROLE_TABLE
}

impl UserRole {
    /// Every role, in display order.
    pub fn all() -> impl Iterator<Item = UserRole> {
        ROLE_TABLE.iter().map(|entry| entry.role)
    }

    fn entry(self) -> &'static RoleEntry {
        // The table lists variants in declaration order.
        &ROLE_TABLE[self as usize]
    }

    /// Stable storage/FFI id, e.g. `community_manager`.
    pub fn as_str(self) -> &'static str {
        self.entry().id
    }

    /// Human-readable label, e.g. `Community Manager`.
    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn privilege(self) -> Privilege {
        self.entry().privilege
    }

    pub fn grant_ceiling(self) -> Option<Privilege> {
        self.entry().grant_ceiling
    }

    /// Verification flag implied by holding this role.
    pub fn implies_verified(self) -> bool {
        self != UserRole::Guest
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a role from its stable id.
///
/// Matching is exact; labels such as `Community Manager` are not accepted.
pub fn parse_user_role(value: &str) -> Option<UserRole> {
    ROLE_TABLE
        .iter()
        .find(|entry| entry.id == value.trim())
        .map(|entry| entry.role)
}

/// Directory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Serialized as `isVerified` to match the stored snapshot shape.
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
}

impl User {
    /// Creates a freshly registered, unverified guest.
    pub fn new_guest(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_role(Uuid::new_v4(), name, email, UserRole::Guest)
    }

    /// Creates a user with a caller-provided id and role.
    ///
    /// `is_verified` is derived from `role`.
    pub fn with_role(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            is_verified: role.implies_verified(),
        }
    }

    /// Replaces the role and forces `is_verified` to match it.
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.is_verified = role.implies_verified();
    }

    /// Returns whether this user may establish a session.
    pub fn can_log_in(&self) -> bool {
        self.role != UserRole::Guest
    }

    /// Returns whether `email` identifies this user (trimmed, case-insensitive).
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if self.email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if self.is_verified != self.role.implies_verified() {
            return Err(UserValidationError::VerificationMismatch {
                role: self.role,
                is_verified: self.is_verified,
            });
        }
        Ok(())
    }
}

/// Record-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyEmail,
    VerificationMismatch { role: UserRole, is_verified: bool },
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "user name must not be empty"),
            Self::EmptyEmail => write!(f, "user email must not be empty"),
            Self::VerificationMismatch { role, is_verified } => write!(
                f,
                "role `{role}` is inconsistent with is_verified={is_verified}"
            ),
        }
    }
}

impl Error for UserValidationError {}

#[cfg(test)]
mod tests {
    use super::{parse_user_role, role_table, Privilege, User, UserRole, UserValidationError};
    use uuid::Uuid;

    #[test]
    fn role_table_rows_follow_variant_order() {
        for (index, entry) in role_table().iter().enumerate() {
            assert_eq!(entry.role as usize, index, "row {} out of order", entry.id);
        }
    }

    #[test]
    fn parse_user_role_accepts_stable_ids_only() {
        assert_eq!(parse_user_role("owner"), Some(UserRole::Owner));
        assert_eq!(
            parse_user_role(" community_manager "),
            Some(UserRole::CommunityManager)
        );
        assert_eq!(parse_user_role("Community Manager"), None);
        assert_eq!(parse_user_role("root"), None);
    }

    #[test]
    fn privilege_tiers_are_ordered() {
        assert!(UserRole::Guest.privilege() < UserRole::Developer.privilege());
        assert!(UserRole::Moderator.privilege() < UserRole::Admin.privilege());
        assert!(UserRole::Admin.privilege() < UserRole::Owner.privilege());
        assert_eq!(UserRole::Admin.grant_ceiling(), Some(Privilege::Member));
        assert_eq!(UserRole::Designer.grant_ceiling(), None);
    }

    #[test]
    fn set_role_restores_verification_invariant() {
        let mut user = User::new_guest("Ada", "ada@teamcore.dev");
        assert!(!user.is_verified);

        user.set_role(UserRole::Builder);
        assert!(user.is_verified);
        user.validate().expect("builder should be valid");

        user.set_role(UserRole::Guest);
        assert!(!user.is_verified);
        user.validate().expect("guest should be valid");
    }

    #[test]
    fn validate_rejects_inconsistent_verification() {
        let mut user = User::with_role(Uuid::new_v4(), "Bo", "bo@x.com", UserRole::Admin);
        user.is_verified = false;
        assert_eq!(
            user.validate().expect_err("mismatch must fail"),
            UserValidationError::VerificationMismatch {
                role: UserRole::Admin,
                is_verified: false,
            }
        );
    }

    #[test]
    fn has_email_ignores_case_and_padding() {
        let user = User::new_guest("Cy", "Cy@Example.com");
        assert!(user.has_email("  cy@example.COM "));
        assert!(!user.has_email("cy@example.org"));
    }

    #[test]
    fn snapshot_uses_camel_case_verification_field() {
        let user = User::with_role(Uuid::nil(), "Di", "di@x.com", UserRole::ProjectManager);
        let json = serde_json::to_string(&user).expect("serialize user");
        assert!(json.contains("\"isVerified\":true"));
        assert!(json.contains("\"role\":\"project_manager\""));
    }
}
