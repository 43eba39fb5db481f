//! Cart service.
//!
//! A user has at most one open cart, created empty on first access. Items
//! are keyed by plan name — adding a plan that is already in the cart is a
//! conflict, not a quantity bump.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use oracle_core::{Amount, CartItemId, CurrencyCode, UserId};

use crate::db::{DocumentStore, StoreError};
use crate::models::{Cart, CartItem};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The user has no cart yet.
    #[error("cart not found")]
    CartNotFound,

    /// The referenced item is not in the cart.
    #[error("item not found in cart")]
    ItemNotFound,

    /// The plan is already in the cart.
    #[error("plan already in cart: {0}")]
    DuplicatePlan(String),

    /// Plan name or price missing/invalid.
    #[error("invalid cart input: {0}")]
    InvalidInput(&'static str),

    /// The cart total would exceed the representable range.
    #[error("cart total overflow")]
    TotalOverflow,

    /// The store failed; no state was changed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A cart snapshot with derived totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Line-items in insertion order.
    pub items: Vec<CartItem>,
    /// Sum of item prices in minor units.
    pub total: Amount,
    /// Display currency for the totals.
    pub currency: CurrencyCode,
    /// Number of items.
    pub item_count: usize,
}

/// Cart operations over the document store.
pub struct CartService<'a> {
    store: &'a DocumentStore,
}

impl<'a> CartService<'a> {
    /// Create a cart service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Get the user's cart, creating an empty one if none exists.
    ///
    /// # Errors
    ///
    /// Returns `Store` if creating the missing cart cannot be persisted,
    /// or `TotalOverflow` if the stored prices no longer sum into an `i64`.
    pub async fn get(&self, user_id: UserId) -> Result<CartView, CartError> {
        // Fast path: existing cart under the read lock only.
        {
            let doc = self.store.read().await;
            if let Some(cart) = doc.cart(user_id) {
                return Self::view(cart);
            }
        }

        // Upsert-on-read: create the empty cart.
        self.store
            .mutate(move |doc| {
                if doc.cart(user_id).is_none() {
                    doc.carts.push(Cart::new(user_id, Utc::now()));
                }
                let cart = doc.cart(user_id).ok_or(CartError::CartNotFound)?;
                Self::view(cart)
            })
            .await
    }

    /// Add a plan line-item to the cart, creating the cart if needed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty plan name, a zero price, or a
    /// negative USD display price, `DuplicatePlan` if the plan is already
    /// in the cart, and `Store` if persistence fails.
    pub async fn add_item(
        &self,
        user_id: UserId,
        plan_name: &str,
        price: Amount,
        price_usd: Option<i64>,
        description: Option<&str>,
    ) -> Result<(CartItem, CartView), CartError> {
        if plan_name.trim().is_empty() {
            return Err(CartError::InvalidInput("plan name required"));
        }
        if price.is_zero() {
            return Err(CartError::InvalidInput("price must be positive"));
        }
        if price_usd.is_some_and(|usd| usd < 0) {
            return Err(CartError::InvalidInput("usd price cannot be negative"));
        }

        let plan_name = plan_name.to_owned();
        let description = description
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{plan_name} API Plan"));

        self.store
            .mutate(move |doc| {
                let now = Utc::now();
                if doc.cart(user_id).is_none() {
                    doc.carts.push(Cart::new(user_id, now));
                }
                let cart = doc.cart_mut(user_id).ok_or(CartError::CartNotFound)?;

                if cart.items.iter().any(|i| i.plan_name == plan_name) {
                    return Err(CartError::DuplicatePlan(plan_name));
                }

                let item = CartItem {
                    id: CartItemId::generate(),
                    plan_name,
                    price,
                    price_usd,
                    description,
                    added_at: now,
                };
                cart.items.push(item.clone());
                cart.updated_at = now;

                let view = Self::view(cart)?;
                Ok((item, view))
            })
            .await
    }

    /// Remove an item from the cart, returning it.
    ///
    /// # Errors
    ///
    /// Returns `CartNotFound` if the user has no cart, `ItemNotFound` if
    /// the item is not in it, and `Store` if persistence fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<(CartItem, CartView), CartError> {
        self.store
            .mutate(move |doc| {
                let cart = doc.cart_mut(user_id).ok_or(CartError::CartNotFound)?;
                let pos = cart
                    .items
                    .iter()
                    .position(|i| i.id == item_id)
                    .ok_or(CartError::ItemNotFound)?;
                let removed = cart.items.remove(pos);
                cart.updated_at = Utc::now();
                let view = Self::view(cart)?;
                Ok((removed, view))
            })
            .await
    }

    /// Empty the cart. Idempotent — clearing an empty or missing cart is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `Store` if persistence fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), CartError> {
        // Nothing to do if there is no cart or it is already empty.
        {
            let doc = self.store.read().await;
            match doc.cart(user_id) {
                None => return Ok(()),
                Some(cart) if cart.items.is_empty() => return Ok(()),
                Some(_) => {}
            }
        }

        self.store
            .mutate(move |doc| {
                if let Some(cart) = doc.cart_mut(user_id)
                    && !cart.items.is_empty()
                {
                    cart.items.clear();
                    cart.updated_at = Utc::now();
                }
                Ok::<_, CartError>(())
            })
            .await
    }

    /// Sum of item prices; zero for an empty or missing cart.
    ///
    /// # Errors
    ///
    /// Returns `TotalOverflow` if the prices no longer sum into an `i64`.
    pub async fn total(&self, user_id: UserId) -> Result<Amount, CartError> {
        let doc = self.store.read().await;
        doc.cart(user_id).map_or(Ok(Amount::ZERO), |cart| {
            cart.total().ok_or(CartError::TotalOverflow)
        })
    }

    fn view(cart: &Cart) -> Result<CartView, CartError> {
        Ok(CartView {
            items: cart.items.clone(),
            total: cart.total().ok_or(CartError::TotalOverflow)?,
            currency: CurrencyCode::default(),
            item_count: cart.items.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, DocumentStore, UserId) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("oracle.json"))
            .await
            .unwrap();
        (dir, store, UserId::generate())
    }

    #[tokio::test]
    async fn test_get_creates_empty_cart() {
        let (_dir, store, user_id) = store().await;
        let carts = CartService::new(&store);

        let view = carts.get(user_id).await.unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.total, Amount::ZERO);
        assert_eq!(view.item_count, 0);

        // The cart now exists in the document.
        assert!(store.read().await.cart(user_id).is_some());
    }

    #[tokio::test]
    async fn test_add_item_and_total() {
        let (_dir, store, user_id) = store().await;
        let carts = CartService::new(&store);

        let (item, view) = carts
            .add_item(user_id, "Pro", Amount::new(3000).unwrap(), None, None)
            .await
            .unwrap();

        assert_eq!(item.plan_name, "Pro");
        assert_eq!(item.description, "Pro API Plan");
        assert_eq!(view.total.get(), 3000);
        assert_eq!(view.item_count, 1);
        assert_eq!(carts.total(user_id).await.unwrap().get(), 3000);
    }

    #[tokio::test]
    async fn test_add_duplicate_plan_rejected_cart_unchanged() {
        let (_dir, store, user_id) = store().await;
        let carts = CartService::new(&store);

        carts
            .add_item(user_id, "Pro", Amount::new(3000).unwrap(), None, None)
            .await
            .unwrap();
        let err = carts
            .add_item(user_id, "Pro", Amount::new(3000).unwrap(), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::DuplicatePlan(_)));
        let view = carts.get(user_id).await.unwrap();
        assert_eq!(view.item_count, 1);
    }

    #[tokio::test]
    async fn test_add_item_validation() {
        let (_dir, store, user_id) = store().await;
        let carts = CartService::new(&store);

        assert!(matches!(
            carts
                .add_item(user_id, "  ", Amount::new(100).unwrap(), None, None)
                .await,
            Err(CartError::InvalidInput(_))
        ));
        assert!(matches!(
            carts.add_item(user_id, "Pro", Amount::ZERO, None, None).await,
            Err(CartError::InvalidInput(_))
        ));
        assert!(matches!(
            carts
                .add_item(user_id, "Pro", Amount::new(100).unwrap(), Some(-5), None)
                .await,
            Err(CartError::InvalidInput(_))
        ));

        // The cart stays empty after rejected adds.
        let view = carts.get(user_id).await.unwrap();
        assert_eq!(view.item_count, 0);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let (_dir, store, user_id) = store().await;
        let carts = CartService::new(&store);

        let (item, _) = carts
            .add_item(user_id, "Pro", Amount::new(3000).unwrap(), None, None)
            .await
            .unwrap();
        let (removed, view) = carts.remove_item(user_id, item.id).await.unwrap();

        assert_eq!(removed.id, item.id);
        assert_eq!(view.item_count, 0);
        assert_eq!(view.total, Amount::ZERO);
    }

    #[tokio::test]
    async fn test_remove_missing_item() {
        let (_dir, store, user_id) = store().await;
        let carts = CartService::new(&store);

        // No cart at all.
        assert!(matches!(
            carts.remove_item(user_id, CartItemId::generate()).await,
            Err(CartError::CartNotFound)
        ));

        carts.get(user_id).await.unwrap();
        assert!(matches!(
            carts.remove_item(user_id, CartItemId::generate()).await,
            Err(CartError::ItemNotFound)
        ));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let (_dir, store, user_id) = store().await;
        let carts = CartService::new(&store);

        // Clearing a missing cart is fine.
        carts.clear(user_id).await.unwrap();

        carts
            .add_item(user_id, "Pro", Amount::new(3000).unwrap(), None, None)
            .await
            .unwrap();
        carts.clear(user_id).await.unwrap();
        carts.clear(user_id).await.unwrap();

        let view = carts.get(user_id).await.unwrap();
        assert_eq!(view.item_count, 0);
    }

    #[tokio::test]
    async fn test_total_missing_cart_is_zero() {
        let (_dir, store, user_id) = store().await;
        let carts = CartService::new(&store);
        assert_eq!(carts.total(user_id).await.unwrap(), Amount::ZERO);
    }
}
