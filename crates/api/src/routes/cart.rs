//! Cart and checkout route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use oracle_core::{Amount, CartItemId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{CartItem, Transaction};
use crate::services::{CartService, CartView, CheckoutOutcome, CheckoutService, notify};
use crate::state::AppState;

/// Add-item request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub plan_name: String,
    /// Price in minor units. Must be positive.
    pub price: i64,
    pub price_usd: Option<i64>,
    pub description: Option<String>,
}

/// Response after adding an item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemResponse {
    pub message: &'static str,
    pub item: CartItem,
    pub cart: CartView,
}

/// Response after removing an item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemResponse {
    pub message: &'static str,
    pub removed: CartItem,
    pub cart: CartView,
}

/// Response after a successful checkout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: &'static str,
    pub purchased_items: Vec<CartItem>,
    pub total_paid: Amount,
    pub new_balance: Amount,
    pub transactions: Vec<Transaction>,
}

/// `GET /cart`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartView>> {
    let carts = CartService::new(state.store());
    let view = carts.get(user.id).await?;
    Ok(Json(view))
}

/// `POST /cart/items`
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<AddItemResponse>)> {
    let price = Amount::new(req.price).map_err(|_| AppError::InvalidAmount)?;

    let carts = CartService::new(state.store());
    let (item, cart) = carts
        .add_item(
            user.id,
            &req.plan_name,
            price,
            req.price_usd,
            req.description.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddItemResponse {
            message: "Item added to cart",
            item,
            cart,
        }),
    ))
}

/// `DELETE /cart/items/{item_id}`
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<CartItemId>,
) -> Result<Json<RemoveItemResponse>> {
    let carts = CartService::new(state.store());
    let (removed, cart) = carts.remove_item(user.id, item_id).await?;

    Ok(Json(RemoveItemResponse {
        message: "Item removed from cart",
        removed,
        cart,
    }))
}

/// Response after clearing the cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCartResponse {
    pub message: &'static str,
    pub total: i64,
    pub item_count: usize,
}

/// `DELETE /cart`
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ClearCartResponse>> {
    let carts = CartService::new(state.store());
    carts.clear(user.id).await?;

    Ok(Json(ClearCartResponse {
        message: "Cart cleared",
        total: 0,
        item_count: 0,
    }))
}

/// `POST /cart/checkout`
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CheckoutResponse>> {
    let service = CheckoutService::new(state.store());
    let CheckoutOutcome {
        purchased_items,
        total_paid,
        new_balance,
        transactions,
    } = service.checkout(user.id).await?;

    tracing::info!(
        user_id = %user.id,
        items = purchased_items.len(),
        total = total_paid.get(),
        "checkout settled"
    );
    notify::send_purchase_receipt(
        user.email,
        user.name,
        purchased_items.clone(),
        total_paid,
        new_balance,
    );

    Ok(Json(CheckoutResponse {
        message: "Checkout successful",
        purchased_items,
        total_paid,
        new_balance,
        transactions,
    }))
}
