//! Persisted record types.
//!
//! These are the documents stored in the flat JSON store. Field names are
//! camelCase on the wire and on disk, matching the store's historical
//! layout.

pub mod cart;
pub mod user;
pub mod wallet;

pub use cart::{Cart, CartItem};
pub use user::{AdminUser, User};
pub use wallet::{Transaction, Wallet};
