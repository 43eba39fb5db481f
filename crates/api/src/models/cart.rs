//! Cart records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oracle_core::{Amount, CartItemId, UserId};

/// A user's open cart.
///
/// At most one per user, created empty on first access. Items are cleared
/// wholesale on successful checkout or explicit clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Owning user (unique across carts).
    pub user_id: UserId,
    /// Selected plan line-items, in insertion order. No two entries share
    /// a plan name.
    pub items: Vec<CartItem>,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the items last changed.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart for a user.
    #[must_use]
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of item prices in minor units.
    ///
    /// Returns `None` on `i64` overflow.
    #[must_use]
    pub fn total(&self) -> Option<Amount> {
        self.items
            .iter()
            .try_fold(Amount::ZERO, |sum, item| sum.checked_add(item.price))
    }
}

/// A single plan line-item in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique item ID.
    pub id: CartItemId,
    /// Plan name, unique within the cart.
    pub plan_name: String,
    /// Minor-unit price in the wallet currency.
    pub price: Amount,
    /// Optional USD display price in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<i64>,
    /// Human-readable description.
    pub description: String,
    /// When the item was added.
    pub added_at: DateTime<Utc>,
}
