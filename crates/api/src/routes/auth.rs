//! Authentication route handlers.
//!
//! Registration creates the account and its wallet together and returns a
//! signed token so the client can call protected routes immediately.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{User, Wallet};
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User profile as returned to clients. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
            name: user.name.clone(),
        }
    }
}

/// Wallet summary included in auth responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub balance: i64,
    pub currency: &'static str,
}

impl From<&Wallet> for WalletSummary {
    fn from(wallet: &Wallet) -> Self {
        Self {
            balance: wallet.balance.get(),
            currency: wallet.currency.code(),
        }
    }
}

/// Response for register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserProfile,
    pub wallet: WalletSummary,
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = AuthService::new(state.store());
    let (user, wallet) = auth.register(&req.email, &req.password, &req.name).await?;
    let token = state.tokens().issue(&user)?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful",
            token,
            user: UserProfile::from(&user),
            wallet: WalletSummary::from(&wallet),
        }),
    ))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.store());
    let (user, wallet) = auth.login(&req.email, &req.password).await?;
    let token = state.tokens().issue(&user)?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        user: UserProfile::from(&user),
        wallet: WalletSummary::from(&wallet),
    }))
}

/// Response for the profile endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: UserProfile,
    pub wallet: WalletSummary,
}

/// `GET /auth/me`
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<MeResponse>> {
    let auth = AuthService::new(state.store());
    let (user, wallet) = auth.get_user(current.id).await.map_err(AppError::from)?;

    Ok(Json(MeResponse {
        user: UserProfile::from(&user),
        wallet: WalletSummary::from(&wallet),
    }))
}
