//! HTTP route handlers for the wallet API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//!
//! # Auth
//! POST /auth/register           - Create account + wallet, returns token
//! POST /auth/login              - Login, returns token
//! GET  /auth/me                 - Current user profile + balance
//!
//! # Wallet (requires auth)
//! GET  /wallet/balance          - Current balance
//! POST /wallet/topup            - Credit the wallet
//! POST /wallet/pay              - Direct debit
//! GET  /wallet/transactions     - Transaction history (newest first)
//!
//! # Cart (requires auth)
//! GET    /cart                  - Show cart with total
//! POST   /cart/items            - Add an item
//! DELETE /cart/items/{item_id}  - Remove an item
//! DELETE /cart                  - Clear the cart
//! POST   /cart/checkout         - Settle the cart against the wallet
//! ```

pub mod auth;
pub mod cart;
pub mod wallet;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create the wallet routes router.
pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/balance", get(wallet::balance))
        .route("/topup", post(wallet::topup))
        .route("/pay", post(wallet::pay))
        .route("/transactions", get(wallet::transactions))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route("/items/{item_id}", delete(cart::remove_item))
        .route("/checkout", post(cart::checkout))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/wallet", wallet_routes())
        .nest("/cart", cart_routes())
}
