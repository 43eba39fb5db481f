//! Signed identity tokens.
//!
//! The API issues an opaque signed token (HS256 JWT) at registration and
//! login; every protected operation resolves a `UserId` from it and trusts
//! nothing else about the caller.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use oracle_core::UserId;

use super::AuthError;
use crate::models::User;

/// How long an issued token stays valid.
const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried by an identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's ID.
    pub sub: UserId,
    /// Email at issuance time (display only — not re-validated).
    pub email: String,
    /// Display name at issuance time.
    pub name: String,
    /// Expiry (seconds since epoch).
    pub exp: i64,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
}

/// Encodes and verifies identity tokens with a shared secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    /// Create a codec from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.to_string(),
            name: user.name.clone(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
            iat: now.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if the signature is wrong or
    /// the token has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use oracle_core::Email;

    fn test_user() -> User {
        User {
            id: UserId::generate(),
            email: Email::parse("user@example.com").unwrap(),
            name: "Test User".to_owned(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn secret() -> SecretString {
        SecretString::from("kX9#mP2$vL8@qR5!wT3^nB7&zD1*fG4j")
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let codec = TokenCodec::new(&secret());
        let user = test_user();

        let token = codec.issue(&user).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "user@example.com");
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let codec = TokenCodec::new(&secret());
        let other = TokenCodec::new(&SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6e"));

        let token = codec.issue(&test_user()).unwrap();
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let codec = TokenCodec::new(&secret());
        assert!(matches!(
            codec.verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
