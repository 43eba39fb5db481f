//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin user
//! oracle-cli admin create -e admin@example.com -n "Admin Name" -r super_admin
//! ```
//!
//! # Environment Variables
//!
//! - `ORACLE_DATA_FILE` - Path to the JSON document store
//! - `ORACLE_ADMIN_PASSWORD` - Password when `--password` is not given
//!
//! Passwords are never defaulted: one must come from the flag or the
//! environment variable, and it is stored only as an Argon2id hash.

use chrono::Utc;
use thiserror::Error;

use oracle_api::db::{DocumentStore, StoreError};
use oracle_api::models::AdminUser;
use oracle_api::services::auth;
use oracle_core::{AdminRole, AdminUserId, Email};

/// Minimum admin password length.
const MIN_PASSWORD_LENGTH: usize = 12;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin, viewer")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No password supplied.
    #[error("Missing password: pass --password or set ORACLE_ADMIN_PASSWORD")]
    MissingPassword,

    /// Password does not meet requirements.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Hashing failed.
    #[error("Failed to hash password")]
    PasswordHash,

    /// Admin already exists.
    #[error("Admin user already exists with email: {0}")]
    UserExists(String),

    /// Store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create a new admin user in the configured document store.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `role` - Admin's role (`super_admin`, `admin`, or `viewer`)
/// * `password` - Password, or `None` to read `ORACLE_ADMIN_PASSWORD`
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns `AdminError` if validation fails, the email is already
/// provisioned, or the store cannot be written.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: Option<&str>,
) -> Result<AdminUserId, AdminError> {
    dotenvy::dotenv().ok();

    let password = match password {
        Some(p) => p.to_owned(),
        None => std::env::var("ORACLE_ADMIN_PASSWORD").map_err(|_| AdminError::MissingPassword)?,
    };

    let path = std::env::var("ORACLE_DATA_FILE").unwrap_or_else(|_| "data/oracle.json".to_owned());

    tracing::info!("Opening document store at {path}");
    let store = DocumentStore::open(&path).await?;

    let admin_id = create_user_in(&store, email, name, role, &password).await?;

    tracing::info!("Admin user created successfully! ID: {admin_id}");
    Ok(admin_id)
}

/// Validate inputs and insert the admin into an open store.
async fn create_user_in(
    store: &DocumentStore,
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<AdminUserId, AdminError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;

    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword);
    }
    let password_hash = auth::hash_password(password).map_err(|_| AdminError::PasswordHash)?;

    tracing::info!("Creating admin user: {} ({})", email, role);

    store
        .mutate(move |doc| {
            if doc.admin_by_email(&email).is_some() {
                return Err(AdminError::UserExists(email.to_string()));
            }

            let admin = AdminUser {
                id: AdminUserId::generate(),
                email,
                name: name.to_owned(),
                password_hash,
                role,
                created_at: Utc::now(),
            };
            let id = admin.id;
            doc.admins.push(admin);
            Ok(id)
        })
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, DocumentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("oracle.json"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_create_admin_stores_hash_not_password() {
        let (_dir, store) = store().await;

        let id = create_user_in(
            &store,
            "admin@example.com",
            "Admin",
            "super_admin",
            "kX9#mP2$vL8@qR5!",
        )
        .await
        .unwrap();

        let doc = store.read().await;
        let admin = doc.admins.iter().find(|a| a.id == id).unwrap();
        assert_eq!(admin.role, AdminRole::SuperAdmin);
        assert_ne!(admin.password_hash, "kX9#mP2$vL8@qR5!");
        assert!(admin.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_create_admin_rejects_duplicate_email() {
        let (_dir, store) = store().await;

        create_user_in(&store, "admin@example.com", "A", "admin", "kX9#mP2$vL8@qR5!")
            .await
            .unwrap();
        let err = create_user_in(&store, "ADMIN@example.com", "B", "admin", "kX9#mP2$vL8@qR5!")
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::UserExists(_)));
    }

    #[tokio::test]
    async fn test_create_admin_rejects_weak_password() {
        let (_dir, store) = store().await;

        let err = create_user_in(&store, "a@example.com", "A", "admin", "short")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::WeakPassword));
    }

    #[tokio::test]
    async fn test_create_admin_rejects_unknown_role() {
        let (_dir, store) = store().await;

        let err = create_user_in(&store, "a@example.com", "A", "root", "kX9#mP2$vL8@qR5!")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::InvalidRole(_)));
    }
}
