//! User and admin account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oracle_core::{AdminRole, AdminUserId, Email, UserId};

/// A registered user.
///
/// Created once at registration together with their wallet; the `id` is
/// immutable and users are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique, immutable user ID.
    pub id: UserId,
    /// Email address (unique, case-insensitive).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Argon2 password hash. Opaque to everything but the auth service.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// An admin account, provisioned explicitly via the CLI.
///
/// There is no implicit bootstrap admin; `oracle-cli admin create` is the
/// only way one comes into existence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    /// Unique admin ID.
    pub id: AdminUserId,
    /// Email address (unique, case-insensitive).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Permission level.
    pub role: AdminRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
