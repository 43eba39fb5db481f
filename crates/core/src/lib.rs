//! Oracle Core - Shared types library.
//!
//! This crate provides common types used across all Oracle Commerce components:
//! - `api` - Wallet, cart, and checkout HTTP API
//! - `cli` - Command-line tools for store initialization and admin provisioning
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, minor-unit amounts,
//!   emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
