//! The flat document schema and in-memory lookup helpers.

use serde::{Deserialize, Serialize};

use oracle_core::{Email, UserId};

use crate::models::{AdminUser, Cart, Transaction, User, Wallet};

/// The whole persisted state: one JSON document, four ledger collections
/// plus admin accounts. Read and rewritten wholesale on every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    /// Registered users.
    pub users: Vec<User>,
    /// One wallet per user.
    pub wallets: Vec<Wallet>,
    /// Append-only ledger entries.
    pub transactions: Vec<Transaction>,
    /// At most one open cart per user.
    pub carts: Vec<Cart>,
    /// CLI-provisioned admin accounts.
    pub admins: Vec<AdminUser>,
}

impl Document {
    /// Find a user by ID.
    #[must_use]
    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Find a user by (already normalized) email.
    #[must_use]
    pub fn user_by_email(&self, email: &Email) -> Option<&User> {
        self.users.iter().find(|u| &u.email == email)
    }

    /// Find an admin by (already normalized) email.
    #[must_use]
    pub fn admin_by_email(&self, email: &Email) -> Option<&AdminUser> {
        self.admins.iter().find(|a| &a.email == email)
    }

    /// Find a user's wallet.
    #[must_use]
    pub fn wallet(&self, user_id: UserId) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.user_id == user_id)
    }

    /// Find a user's wallet for mutation.
    #[must_use]
    pub fn wallet_mut(&mut self, user_id: UserId) -> Option<&mut Wallet> {
        self.wallets.iter_mut().find(|w| w.user_id == user_id)
    }

    /// Find a user's cart.
    #[must_use]
    pub fn cart(&self, user_id: UserId) -> Option<&Cart> {
        self.carts.iter().find(|c| c.user_id == user_id)
    }

    /// Find a user's cart for mutation.
    #[must_use]
    pub fn cart_mut(&mut self, user_id: UserId) -> Option<&mut Cart> {
        self.carts.iter_mut().find(|c| c.user_id == user_id)
    }

    /// A user's ledger entries, newest first.
    #[must_use]
    pub fn transactions_for(&self, user_id: UserId) -> Vec<Transaction> {
        let mut entries: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    /// Whether a top-up `reference` was already recorded for this user.
    #[must_use]
    pub fn has_reference(&self, user_id: UserId, reference: &str) -> bool {
        self.transactions
            .iter()
            .any(|t| t.user_id == user_id && t.reference.as_deref() == Some(reference))
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_is_empty() {
        let doc = Document::default();
        assert!(doc.users.is_empty());
        assert!(doc.wallets.is_empty());
        assert!(doc.transactions.is_empty());
        assert!(doc.carts.is_empty());
        assert!(doc.admins.is_empty());
    }

    #[test]
    fn test_deserialize_tolerates_missing_collections() {
        // Older store files may lack collections added later.
        let doc: Document = serde_json::from_str(r#"{"users": []}"#).unwrap();
        assert!(doc.wallets.is_empty());
        assert!(doc.admins.is_empty());
    }
}
