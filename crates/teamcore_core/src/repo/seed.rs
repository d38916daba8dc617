//! Demo directory written on first start.

use crate::model::user::{User, UserRole};
use uuid::Uuid;

/// Stable id of the seeded owner account.
pub const DEMO_OWNER_ID: Uuid = Uuid::from_u128(0x7ea3_c0de_0000_4000_8000_0000_0000_0001);
/// Stable id of the seeded admin account.
pub const DEMO_ADMIN_ID: Uuid = Uuid::from_u128(0x7ea3_c0de_0000_4000_8000_0000_0000_0002);

/// Accounts available out of the box in the demo workspace.
///
/// Includes one pending guest so the approval flow can be exercised.
pub fn demo_directory() -> Vec<User> {
    vec![
        User::with_role(DEMO_OWNER_ID, "Olivia Owner", "owner@teamcore.dev", UserRole::Owner),
        User::with_role(DEMO_ADMIN_ID, "Adrian Admin", "admin@teamcore.dev", UserRole::Admin),
        User::with_role(
            Uuid::from_u128(0x7ea3_c0de_0000_4000_8000_0000_0000_0003),
            "Jax Coderius",
            "jax@teamcore.dev",
            UserRole::Developer,
        ),
        User::with_role(
            Uuid::from_u128(0x7ea3_c0de_0000_4000_8000_0000_0000_0004),
            "Mira Moderator",
            "mira@teamcore.dev",
            UserRole::Moderator,
        ),
        User::with_role(
            Uuid::from_u128(0x7ea3_c0de_0000_4000_8000_0000_0000_0005),
            "Gus Guest",
            "guest@teamcore.dev",
            UserRole::Guest,
        ),
    ]
}
