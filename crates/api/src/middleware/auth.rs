//! Authentication extractors for route handlers.
//!
//! Identity travels as a `Bearer` token in the `Authorization` header.
//! The extractor verifies the signature and expiry; it does not touch the
//! store, so a deleted user's token stays valid until it expires and the
//! handler fails on lookup instead.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use oracle_core::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, resolved from a verified token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_owned()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Expected Bearer token".to_owned()))?;

        let claims = state.tokens().verify(token)?;

        Ok(Self(CurrentUser {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        }))
    }
}
