//! Startup seeding of the administrator account

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    config::ServerConfig,
    models::{NewUser, Role, user::normalize_email},
    repositories::{UserRepository, user::hash_password},
};

/// Create the configured admin unless an account with that email exists.
///
/// Returns `true` when a new account was created.
pub async fn seed_admin(users: &UserRepository, config: &ServerConfig) -> Result<bool> {
    let email = normalize_email(&config.admin_email);

    if users
        .find_by_email(&email)
        .await
        .context("Failed to look up admin account")?
        .is_some()
    {
        info!("Admin account {} already exists", email);
        return Ok(false);
    }

    let admin = admin_account(email, &config.admin_password);
    let password_hash = hash_password(&admin.password)?;
    let user = users
        .create(&admin, &password_hash)
        .await
        .context("Failed to create admin account")?;

    info!("Seeded admin account {}", user.email);
    Ok(true)
}

fn admin_account(email: String, password: &str) -> NewUser {
    NewUser {
        first_name: "Admin".to_string(),
        last_name: "User".to_string(),
        email,
        phone_number: "0000000000".to_string(),
        password: password.to_string(),
        role: Role::Admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_account_is_an_admin() {
        let admin = admin_account("admin@hopesanctuary.local".to_string(), "Admin@12345");
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.first_name, "Admin");
        assert_eq!(admin.last_name, "User");
        assert_eq!(admin.phone_number, "0000000000");
    }
}
