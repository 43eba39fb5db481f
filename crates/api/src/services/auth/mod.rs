//! Authentication service.
//!
//! Password registration and login. Registration creates the user's wallet
//! in the same store mutation that creates the account — a user without a
//! wallet cannot exist.

mod error;
mod token;

pub use error::AuthError;
pub use token::{Claims, TokenCodec};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;

use oracle_core::{Email, UserId};

use crate::db::DocumentStore;
use crate::models::{User, Wallet};
use crate::services::ledger::LedgerService;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    store: &'a DocumentStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Register a new user with email, password, and display name.
    ///
    /// The wallet (balance 0) is created atomically with the user.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmail` if the email format is invalid,
    /// `WeakPassword` if the password doesn't meet requirements,
    /// `MissingName` for an empty name, and `UserAlreadyExists` if the
    /// email is taken (case-insensitive).
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(User, Wallet), AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }

        let password_hash = hash_password(password)?;
        let name = name.to_owned();

        self.store
            .mutate(move |doc| {
                if doc.user_by_email(&email).is_some() {
                    return Err(AuthError::UserAlreadyExists);
                }

                let user = User {
                    id: UserId::generate(),
                    email,
                    name,
                    password_hash,
                    created_at: Utc::now(),
                };
                let wallet = LedgerService::new_wallet(user.id);

                doc.users.push(user.clone());
                doc.wallets.push(wallet.clone());

                Ok((user, wallet))
            })
            .await
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` if the email/password is wrong. The
    /// unknown-user and wrong-password cases are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, Wallet), AuthError> {
        let email = Email::parse(email)?;

        let doc = self.store.read().await;
        let user = doc
            .user_by_email(&email)
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        let wallet = doc.wallet(user.id).ok_or(AuthError::UserNotFound)?;
        Ok((user.clone(), wallet.clone()))
    }

    /// Get a user and their wallet by ID.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the user (or their wallet) doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<(User, Wallet), AuthError> {
        let doc = self.store.read().await;
        let user = doc.user(user_id).ok_or(AuthError::UserNotFound)?;
        let wallet = doc.wallet(user_id).ok_or(AuthError::UserNotFound)?;
        Ok((user.clone(), wallet.clone()))
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
