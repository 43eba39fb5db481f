//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`. Every expected failure maps to a stable
//! machine-readable kind; storage internals are never exposed.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::services::{AuthError, CartError, CheckoutError, LedgerError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced user/wallet/cart/item absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Non-positive or non-numeric amount.
    #[error("invalid amount")]
    InvalidAmount,

    /// Balance too low; carries the shortfall for top-up prompts.
    #[error("insufficient balance")]
    InsufficientFunds {
        required: i64,
        available: i64,
        shortfall: i64,
    },

    /// Duplicate plan in cart, duplicate email, replayed reference.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Checkout with nothing to buy.
    #[error("cart is empty")]
    EmptyCart,

    /// Missing/invalid identity token or wrong credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Machine-readable error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shortfall: Option<i64>,
}

impl ErrorBody {
    fn new(kind: &'static str, message: String) -> Self {
        Self {
            error: message,
            kind,
            required: None,
            available: None,
            shortfall: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server faults to Sentry
        if matches!(self, Self::Store(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidAmount | Self::BadRequest(_) | Self::EmptyCart => StatusCode::BAD_REQUEST,
            Self::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let body = match self {
            Self::NotFound(what) => ErrorBody::new("not_found", format!("{what} not found")),
            Self::InvalidAmount => ErrorBody::new("invalid_amount", "Invalid amount".to_owned()),
            Self::InsufficientFunds {
                required,
                available,
                shortfall,
            } => ErrorBody {
                required: Some(required),
                available: Some(available),
                shortfall: Some(shortfall),
                ..ErrorBody::new("insufficient_funds", "Insufficient wallet balance".to_owned())
            },
            Self::Conflict(msg) => ErrorBody::new("conflict", msg),
            Self::EmptyCart => ErrorBody::new("empty_cart", "Cart is empty".to_owned()),
            Self::Unauthorized(msg) => ErrorBody::new("unauthorized", msg),
            Self::BadRequest(msg) => ErrorBody::new("bad_request", msg),
            Self::Store(_) | Self::Internal(_) => {
                ErrorBody::new("internal", "Internal server error".to_owned())
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::WalletNotFound => Self::NotFound("Wallet".to_owned()),
            LedgerError::InvalidAmount => Self::InvalidAmount,
            LedgerError::InsufficientFunds {
                required,
                available,
                shortfall,
            } => Self::InsufficientFunds {
                required,
                available,
                shortfall,
            },
            LedgerError::DuplicateReference(reference) => {
                Self::Conflict(format!("Top-up reference already recorded: {reference}"))
            }
            LedgerError::BalanceOverflow => Self::InvalidAmount,
            LedgerError::Store(e) => Self::Store(e),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::CartNotFound => Self::NotFound("Cart".to_owned()),
            CartError::ItemNotFound => Self::NotFound("Item".to_owned()),
            CartError::DuplicatePlan(plan) => {
                Self::Conflict(format!("Item already in cart: {plan}"))
            }
            CartError::InvalidInput(msg) => Self::BadRequest(msg.to_owned()),
            CartError::TotalOverflow => Self::BadRequest("Cart total overflow".to_owned()),
            CartError::Store(e) => Self::Store(e),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => Self::EmptyCart,
            CheckoutError::WalletNotFound => Self::NotFound("Wallet".to_owned()),
            CheckoutError::InsufficientFunds {
                required,
                available,
                shortfall,
            } => Self::InsufficientFunds {
                required,
                available,
                shortfall,
            },
            CheckoutError::TotalOverflow => Self::BadRequest("Cart total overflow".to_owned()),
            CheckoutError::Store(e) => Self::Store(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized("Invalid credentials".to_owned()),
            AuthError::InvalidToken => {
                Self::Unauthorized("Invalid or expired token".to_owned())
            }
            AuthError::UserNotFound => Self::NotFound("User".to_owned()),
            AuthError::UserAlreadyExists => Self::Conflict("Email already registered".to_owned()),
            AuthError::WeakPassword(msg) => Self::BadRequest(msg),
            AuthError::MissingName => Self::BadRequest("Name is required".to_owned()),
            AuthError::InvalidEmail(e) => Self::BadRequest(e.to_string()),
            AuthError::Store(e) => Self::Store(e),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_owned()),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
