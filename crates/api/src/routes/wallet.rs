//! Wallet route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use oracle_core::Amount;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Transaction;
use crate::services::{BalanceView, LedgerReceipt, LedgerService, notify};
use crate::state::AppState;

/// Default description for a top-up transaction.
const TOPUP_DESCRIPTION: &str = "Wallet top-up via Paystack";

/// Top-up request body.
#[derive(Debug, Deserialize)]
pub struct TopupRequest {
    /// Amount in minor units (kobo). Must be positive.
    pub amount: i64,
    /// Payment-processor reference; replays are rejected.
    pub reference: Option<String>,
    pub description: Option<String>,
}

/// Direct debit request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    /// Amount in minor units. Must be positive.
    pub amount: i64,
    pub plan_name: Option<String>,
    pub description: Option<String>,
}

/// Response for a completed credit or debit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub message: &'static str,
    pub new_balance: Amount,
    pub transaction: Transaction,
}

/// `GET /wallet/balance`
pub async fn balance(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<BalanceView>> {
    let ledger = LedgerService::new(state.store());
    let view = ledger.get_balance(user.id).await?;
    Ok(Json(view))
}

/// `POST /wallet/topup`
pub async fn topup(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<TopupRequest>,
) -> Result<Json<ReceiptResponse>> {
    let amount = parse_amount(req.amount)?;
    let description = req.description.as_deref().unwrap_or(TOPUP_DESCRIPTION);

    let ledger = LedgerService::new(state.store());
    let LedgerReceipt {
        new_balance,
        transaction,
    } = ledger
        .credit(user.id, amount, description, req.reference.as_deref())
        .await?;

    tracing::info!(user_id = %user.id, amount = amount.get(), "wallet credited");
    notify::send_topup_receipt(user.email, user.name, amount, req.reference);

    Ok(Json(ReceiptResponse {
        message: "Wallet funded successfully",
        new_balance,
        transaction,
    }))
}

/// `POST /wallet/pay`
pub async fn pay(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<PayRequest>,
) -> Result<Json<ReceiptResponse>> {
    let amount = parse_amount(req.amount)?;
    let description = req.description.clone().unwrap_or_else(|| {
        req.plan_name
            .as_deref()
            .map_or_else(|| "Wallet payment".to_owned(), |plan| format!("Purchase: {plan}"))
    });

    let ledger = LedgerService::new(state.store());
    let LedgerReceipt {
        new_balance,
        transaction,
    } = ledger
        .debit(user.id, amount, &description, req.plan_name.as_deref())
        .await?;

    tracing::info!(user_id = %user.id, amount = amount.get(), "wallet debited");

    Ok(Json(ReceiptResponse {
        message: "Payment successful",
        new_balance,
        transaction,
    }))
}

/// Response for the transaction history endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub count: usize,
}

/// `GET /wallet/transactions`
pub async fn transactions(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<TransactionsResponse>> {
    let ledger = LedgerService::new(state.store());
    let transactions = ledger.list_transactions(user.id).await?;
    let count = transactions.len();

    Ok(Json(TransactionsResponse {
        transactions,
        count,
    }))
}

/// Parse a raw minor-unit amount from a request body. Zero and negative
/// amounts are rejected before they reach the ledger.
fn parse_amount(raw: i64) -> Result<Amount> {
    let amount = Amount::new(raw).map_err(|_| AppError::InvalidAmount)?;
    if amount.is_zero() {
        return Err(AppError::InvalidAmount);
    }
    Ok(amount)
}
