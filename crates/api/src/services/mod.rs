//! Business logic services.
//!
//! Each service borrows the shared [`DocumentStore`](crate::db::DocumentStore)
//! and owns one slice of state: the ledger owns balances and transactions,
//! the cart service owns carts, and checkout is the only component allowed
//! to touch both in one operation.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod ledger;
pub mod notify;

pub use auth::{AuthError, AuthService, TokenCodec};
pub use cart::{CartError, CartService, CartView};
pub use checkout::{CheckoutError, CheckoutOutcome, CheckoutService};
pub use ledger::{BalanceView, LedgerError, LedgerReceipt, LedgerService};
