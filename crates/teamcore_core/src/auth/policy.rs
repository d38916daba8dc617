//! Role assignment policy.
//!
//! Decisions are lookups over the role table in [`crate::model::user`]: an
//! actor may touch a target and grant a candidate role only when both sit at
//! or below the actor's grant ceiling.

use crate::model::user::{Privilege, User, UserRole};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Returns whether `actor_role` may move a user from `target_current_role`
/// to `candidate_role`.
///
/// Record identity is not considered here; see [`check_role_change`].
pub fn can_assign_role(
    actor_role: UserRole,
    target_current_role: UserRole,
    candidate_role: UserRole,
) -> bool {
    match actor_role.grant_ceiling() {
        Some(ceiling) => {
            target_current_role.privilege() <= ceiling && candidate_role.privilege() <= ceiling
        }
        None => false,
    }
}

/// Returns whether `role` may open the admin panel.
pub fn can_access_admin_panel(role: UserRole) -> bool {
    role.privilege() >= Privilege::Staff
}

/// Fails unless `role` may open the admin panel.
pub fn require_admin_panel(role: UserRole) -> Result<(), PolicyDenial> {
    if can_access_admin_panel(role) {
        Ok(())
    } else {
        Err(PolicyDenial::AdminAccessRequired { role })
    }
}

/// Roles `actor_role` may pick for a user currently holding
/// `target_current_role`, in display order.
pub fn assignable_roles(actor_role: UserRole, target_current_role: UserRole) -> Vec<UserRole> {
    UserRole::all()
        .filter(|candidate| can_assign_role(actor_role, target_current_role, *candidate))
        .collect()
}

/// Outcome of a permitted role change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    /// The target's role must be rewritten.
    Apply,
    /// The target already holds the candidate role on the actor's own record.
    Unchanged,
}

/// Why a role change was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDenial {
    /// Only staff roles may manage the directory.
    AdminAccessRequired { role: UserRole },
    /// Actors never change their own role.
    SelfModification,
    /// The role table does not allow this transition for the actor.
    RoleNotAssignable {
        actor_role: UserRole,
        target_role: UserRole,
        candidate_role: UserRole,
    },
}

impl Display for PolicyDenial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AdminAccessRequired { role } => {
                write!(f, "role `{role}` cannot access user management")
            }
            Self::SelfModification => write!(f, "users cannot change their own role"),
            Self::RoleNotAssignable {
                actor_role,
                target_role,
                candidate_role,
            } => write!(
                f,
                "role `{actor_role}` cannot change a `{target_role}` user to `{candidate_role}`"
            ),
        }
    }
}

impl Error for PolicyDenial {}

/// Record-level role change check.
///
/// Re-selecting the role an actor already holds on their own record is
/// accepted as [`RoleChange::Unchanged`].
pub fn check_role_change(
    actor: &User,
    target: &User,
    candidate_role: UserRole,
) -> Result<RoleChange, PolicyDenial> {
    if actor.id == target.id {
        return if candidate_role == target.role {
            Ok(RoleChange::Unchanged)
        } else {
            Err(PolicyDenial::SelfModification)
        };
    }

    if can_assign_role(actor.role, target.role, candidate_role) {
        Ok(RoleChange::Apply)
    } else {
        Err(PolicyDenial::RoleNotAssignable {
            actor_role: actor.role,
            target_role: target.role,
            candidate_role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        assignable_roles, can_access_admin_panel, can_assign_role, check_role_change,
        require_admin_panel, PolicyDenial, RoleChange,
    };
    use crate::model::user::{User, UserRole};
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User::with_role(Uuid::new_v4(), "Test", format!("{role}@x.com"), role)
    }

    #[test]
    fn owner_may_assign_anything_to_anyone() {
        for target in UserRole::all() {
            for candidate in UserRole::all() {
                assert!(
                    can_assign_role(UserRole::Owner, target, candidate),
                    "owner denied {target} -> {candidate}"
                );
            }
        }
    }

    #[test]
    fn admin_cannot_touch_or_grant_staff_roles() {
        assert!(can_assign_role(UserRole::Admin, UserRole::Guest, UserRole::Verified));
        assert!(can_assign_role(UserRole::Admin, UserRole::Moderator, UserRole::Guest));
        assert!(!can_assign_role(UserRole::Admin, UserRole::Guest, UserRole::Admin));
        assert!(!can_assign_role(UserRole::Admin, UserRole::Verified, UserRole::Owner));
        assert!(!can_assign_role(UserRole::Admin, UserRole::Admin, UserRole::Verified));
        assert!(!can_assign_role(UserRole::Admin, UserRole::Owner, UserRole::Guest));
    }

    #[test]
    fn non_staff_roles_assign_nothing() {
        for actor in [
            UserRole::Guest,
            UserRole::Verified,
            UserRole::Developer,
            UserRole::ProjectManager,
        ] {
            assert!(!can_assign_role(actor, UserRole::Guest, UserRole::Verified));
            assert!(assignable_roles(actor, UserRole::Guest).is_empty());
        }
    }

    #[test]
    fn assignable_roles_for_admin_exclude_staff() {
        let roles = assignable_roles(UserRole::Admin, UserRole::Guest);
        assert_eq!(roles.len(), 8);
        assert_eq!(roles.first(), Some(&UserRole::Guest));
        assert!(!roles.contains(&UserRole::Admin));
        assert!(!roles.contains(&UserRole::Owner));
        assert!(assignable_roles(UserRole::Admin, UserRole::Owner).is_empty());
    }

    #[test]
    fn admin_panel_is_staff_only() {
        assert!(can_access_admin_panel(UserRole::Owner));
        assert!(can_access_admin_panel(UserRole::Admin));
        assert!(!can_access_admin_panel(UserRole::Moderator));
        assert!(!can_access_admin_panel(UserRole::Guest));
        assert_eq!(
            require_admin_panel(UserRole::Builder),
            Err(PolicyDenial::AdminAccessRequired {
                role: UserRole::Builder
            })
        );
    }

    #[test]
    fn self_change_is_denied_unless_role_is_unchanged() {
        let owner = user(UserRole::Owner);
        assert_eq!(
            check_role_change(&owner, &owner, UserRole::Verified),
            Err(PolicyDenial::SelfModification)
        );
        assert_eq!(
            check_role_change(&owner, &owner, UserRole::Owner),
            Ok(RoleChange::Unchanged)
        );
    }

    #[test]
    fn record_check_defers_to_role_table() {
        let admin = user(UserRole::Admin);
        let other_admin = user(UserRole::Admin);
        let guest = user(UserRole::Guest);

        assert_eq!(
            check_role_change(&admin, &guest, UserRole::Designer),
            Ok(RoleChange::Apply)
        );
        assert_eq!(
            check_role_change(&admin, &other_admin, UserRole::Verified),
            Err(PolicyDenial::RoleNotAssignable {
                actor_role: UserRole::Admin,
                target_role: UserRole::Admin,
                candidate_role: UserRole::Verified,
            })
        );
    }
}
