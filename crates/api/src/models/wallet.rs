//! Wallet and transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oracle_core::{Amount, CurrencyCode, TransactionId, TransactionStatus, TransactionType, UserId};

/// A per-user prepaid wallet.
///
/// Exactly one per user, created atomically with the account. The balance
/// is mutated only by the ledger service, and only together with a
/// [`Transaction`] being appended in the same atomic step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Owning user (unique across wallets).
    pub user_id: UserId,
    /// Spendable balance in minor units. Never negative.
    pub balance: Amount,
    /// Currency, fixed at creation.
    pub currency: CurrencyCode,
    /// When the wallet was created.
    pub created_at: DateTime<Utc>,
    /// When the balance last changed.
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Create an empty wallet for a user.
    #[must_use]
    pub fn new(user_id: UserId, currency: CurrencyCode, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            balance: Amount::ZERO,
            currency,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An immutable, append-only ledger entry.
///
/// The signed `amount` is positive for credits and negative for debits;
/// for every user the amounts sum to the wallet balance at all times.
/// Once recorded, a transaction is never mutated or deleted — corrections
/// are made by recording an equal-and-opposite entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction ID.
    pub id: TransactionId,
    /// User whose wallet this entry moved.
    pub user_id: UserId,
    /// Credit or debit.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Signed minor-unit amount. Positive for topups, negative for purchases.
    pub amount: i64,
    /// Human-readable description.
    pub description: String,
    /// Plan this purchase was for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    /// External payment-processor reference, if any. Unique per user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Lifecycle status. Always `completed`; reserved for future use.
    pub status: TransactionStatus,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}
