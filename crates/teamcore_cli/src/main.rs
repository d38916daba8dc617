//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `teamcore_core` linkage.
//! - Walk the guest approval flow against an in-memory database.

use std::process::ExitCode;
use teamcore_core::db::open_db_in_memory;
use teamcore_core::{AuthService, CoreConfig, SqliteKeyValueStore, User, UserRole};
use uuid::Uuid;

fn main() -> ExitCode {
    println!("teamcore_core ping={}", teamcore_core::ping());
    println!("teamcore_core version={}", teamcore_core::core_version());

    match run_approval_demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("demo failed: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_approval_demo() -> Result<(), String> {
    let config = CoreConfig::default();
    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let store = SqliteKeyValueStore::new(&conn);
    let mut service =
        AuthService::with_latency(&store, &config.storage_keys(), config.latency());

    let guest = User::with_role(Uuid::new_v4(), "Aria", "a@x.com", UserRole::Guest);
    let admin = User::with_role(Uuid::new_v4(), "Adrian", "admin@x.com", UserRole::Admin);
    service
        .init(&[guest.clone(), admin])
        .map_err(|err| err.to_string())?;

    match service.login("a@x.com", "anything") {
        Ok(_) => return Err("guest login unexpectedly succeeded".to_string()),
        Err(err) => println!("login a@x.com -> {} ({err})", err.code()),
    }

    service
        .login("admin@x.com", "anything")
        .map_err(|err| err.to_string())?;
    let approved = service
        .update_user_role(guest.id, UserRole::Verified)
        .map_err(|err| err.to_string())?;
    println!(
        "admin set role={} is_verified={}",
        approved.role, approved.is_verified
    );
    service.logout().map_err(|err| err.to_string())?;

    let user = service
        .login("a@x.com", "anything")
        .map_err(|err| err.to_string())?;
    println!(
        "login a@x.com -> ok role={} session={}",
        user.role,
        service.session_token().is_some()
    );
    Ok(())
}
