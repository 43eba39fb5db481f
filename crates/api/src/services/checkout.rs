//! Checkout settlement.
//!
//! Converts a cart into debit transactions against the wallet and an
//! emptied cart, as one all-or-nothing state transition. This is the only
//! place allowed to mutate both the cart and the wallet in one operation.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use oracle_core::{Amount, TransactionId, TransactionStatus, TransactionType, UserId};

use crate::db::{DocumentStore, StoreError};
use crate::models::{CartItem, Transaction};

/// Errors from checkout settlement.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no items (or does not exist).
    #[error("cart is empty")]
    EmptyCart,

    /// No wallet exists for the user.
    #[error("wallet not found")]
    WalletNotFound,

    /// The balance cannot cover the cart total.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientFunds {
        /// Minor units the cart total came to.
        required: i64,
        /// Minor units actually spendable.
        available: i64,
        /// `required - available`, for top-up prompts.
        shortfall: i64,
    },

    /// The cart total would exceed the representable range.
    #[error("cart total overflow")]
    TotalOverflow,

    /// The store failed; no state was changed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    /// The items that were settled, snapshotted before the cart was cleared.
    pub purchased_items: Vec<CartItem>,
    /// Total charged in minor units.
    pub total_paid: Amount,
    /// Wallet balance after settlement.
    pub new_balance: Amount,
    /// One `purchase` ledger entry per item.
    pub transactions: Vec<Transaction>,
}

/// Checkout settlement over the document store.
pub struct CheckoutService<'a> {
    store: &'a DocumentStore,
}

impl<'a> CheckoutService<'a> {
    /// Create a checkout service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Settle the user's cart against their wallet.
    ///
    /// Debits the wallet by the cart total, records one `purchase`
    /// transaction per item (per-item auditability), and clears the cart —
    /// all inside one critical section. Any failure leaves both the cart
    /// and the wallet exactly as they were.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` if there is nothing to buy, `WalletNotFound` if
    /// the user has no wallet, `InsufficientFunds` (with the shortfall) if
    /// the balance cannot cover the total, and `Store` if persistence
    /// fails.
    pub async fn checkout(&self, user_id: UserId) -> Result<CheckoutOutcome, CheckoutError> {
        self.store
            .mutate(move |doc| {
                let cart = doc.cart(user_id).ok_or(CheckoutError::EmptyCart)?;
                if cart.items.is_empty() {
                    return Err(CheckoutError::EmptyCart);
                }

                let purchased_items = cart.items.clone();
                let total = cart.total().ok_or(CheckoutError::TotalOverflow)?;

                let now = Utc::now();
                let wallet = doc
                    .wallet_mut(user_id)
                    .ok_or(CheckoutError::WalletNotFound)?;
                wallet.balance = wallet.balance.checked_sub(total).ok_or(
                    CheckoutError::InsufficientFunds {
                        required: total.get(),
                        available: wallet.balance.get(),
                        shortfall: total.get() - wallet.balance.get(),
                    },
                )?;
                wallet.updated_at = now;
                let new_balance = wallet.balance;

                let transactions: Vec<Transaction> = purchased_items
                    .iter()
                    .map(|item| Transaction {
                        id: TransactionId::generate(),
                        user_id,
                        kind: TransactionType::Purchase,
                        amount: -item.price.get(),
                        description: format!("Purchased: {}", item.plan_name),
                        plan_name: Some(item.plan_name.clone()),
                        reference: None,
                        status: TransactionStatus::Completed,
                        created_at: now,
                    })
                    .collect();
                doc.transactions.extend(transactions.iter().cloned());

                let cart = doc.cart_mut(user_id).ok_or(CheckoutError::EmptyCart)?;
                cart.items.clear();
                cart.updated_at = now;

                Ok(CheckoutOutcome {
                    purchased_items,
                    total_paid: total,
                    new_balance,
                    transactions,
                })
            })
            .await
    }
}
