//! Fire-and-forget receipt notifications.
//!
//! The core informs the notification collaborator out of band after a
//! settled operation; delivery is best-effort with no retry contract, and
//! a failure never affects the ledger. The actual transport lives outside
//! this service — here we hand the event off on a background task and log
//! it.

use oracle_core::Amount;

use crate::models::CartItem;

/// Queue a top-up receipt for a user.
pub fn send_topup_receipt(email: String, name: String, amount: Amount, reference: Option<String>) {
    tokio::spawn(async move {
        tracing::info!(
            recipient = %email,
            name = %name,
            amount = %amount,
            reference = reference.as_deref().unwrap_or("-"),
            "top-up receipt queued"
        );
    });
}

/// Queue a purchase receipt for a user.
pub fn send_purchase_receipt(
    email: String,
    name: String,
    items: Vec<CartItem>,
    total: Amount,
    new_balance: Amount,
) {
    tokio::spawn(async move {
        let plans: Vec<&str> = items.iter().map(|i| i.plan_name.as_str()).collect();
        tracing::info!(
            recipient = %email,
            name = %name,
            plans = ?plans,
            total = %total,
            new_balance = %new_balance,
            "purchase receipt queued"
        );
    });
}
