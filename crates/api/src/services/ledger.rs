//! Wallet ledger service.
//!
//! Owns every balance mutation. A wallet balance changes only here (and in
//! checkout settlement, which goes through the same store critical section),
//! and always together with an immutable [`Transaction`] appended in the
//! same atomic step — for each user, the signed transaction amounts sum to
//! the wallet balance at all times.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use oracle_core::{Amount, CurrencyCode, TransactionId, TransactionStatus, TransactionType, UserId};

use crate::db::{DocumentStore, StoreError};
use crate::models::{Transaction, Wallet};

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No wallet exists for the user.
    #[error("wallet not found")]
    WalletNotFound,

    /// The amount is zero (non-positive amounts cannot move money).
    #[error("amount must be positive")]
    InvalidAmount,

    /// The balance cannot cover the debit.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientFunds {
        /// Minor units the operation needed.
        required: i64,
        /// Minor units actually spendable.
        available: i64,
        /// `required - available`, for top-up prompts.
        shortfall: i64,
    },

    /// A top-up with this external reference was already recorded.
    #[error("duplicate top-up reference: {0}")]
    DuplicateReference(String),

    /// The balance would exceed the representable range.
    #[error("balance overflow")]
    BalanceOverflow,

    /// The store failed; no state was changed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a successful credit or debit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    /// Balance after the operation.
    pub new_balance: Amount,
    /// The ledger entry that was recorded.
    pub transaction: Transaction,
}

/// A read-only balance snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceView {
    /// Spendable balance in minor units.
    pub balance: Amount,
    /// Wallet currency.
    pub currency: CurrencyCode,
    /// When the balance last changed.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Wallet ledger operations over the document store.
pub struct LedgerService<'a> {
    store: &'a DocumentStore,
}

impl<'a> LedgerService<'a> {
    /// Create a ledger service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Credit a wallet and record a `topup` transaction atomically.
    ///
    /// If `reference` is supplied it must be new for this user; a replayed
    /// payment-processor webhook is rejected instead of double-crediting.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a zero amount, `WalletNotFound` if the
    /// user has no wallet, `DuplicateReference` on a replayed reference,
    /// and `Store` if persistence fails (no state change).
    pub async fn credit(
        &self,
        user_id: UserId,
        amount: Amount,
        description: &str,
        reference: Option<&str>,
    ) -> Result<LedgerReceipt, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }

        let description = description.to_owned();
        let reference = reference.map(str::to_owned);

        self.store
            .mutate(move |doc| {
                if let Some(reference) = &reference
                    && doc.has_reference(user_id, reference)
                {
                    return Err(LedgerError::DuplicateReference(reference.clone()));
                }

                let now = Utc::now();
                let wallet = doc.wallet_mut(user_id).ok_or(LedgerError::WalletNotFound)?;
                wallet.balance = wallet
                    .balance
                    .checked_add(amount)
                    .ok_or(LedgerError::BalanceOverflow)?;
                wallet.updated_at = now;
                let new_balance = wallet.balance;

                let transaction = Transaction {
                    id: TransactionId::generate(),
                    user_id,
                    kind: TransactionType::Topup,
                    amount: amount.get(),
                    description,
                    plan_name: None,
                    reference,
                    status: TransactionStatus::Completed,
                    created_at: now,
                };
                doc.transactions.push(transaction.clone());

                Ok(LedgerReceipt {
                    new_balance,
                    transaction,
                })
            })
            .await
    }

    /// Debit a wallet and record a `purchase` transaction atomically.
    ///
    /// The balance check and the deduction happen inside one critical
    /// section, so two concurrent debits can never both pass the check
    /// against a stale balance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a zero amount, `WalletNotFound` if the
    /// user has no wallet, `InsufficientFunds` (with the shortfall) if the
    /// balance cannot cover it, and `Store` if persistence fails.
    pub async fn debit(
        &self,
        user_id: UserId,
        amount: Amount,
        description: &str,
        plan_name: Option<&str>,
    ) -> Result<LedgerReceipt, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }

        let description = description.to_owned();
        let plan_name = plan_name.map(str::to_owned);

        self.store
            .mutate(move |doc| {
                let now = Utc::now();
                let wallet = doc.wallet_mut(user_id).ok_or(LedgerError::WalletNotFound)?;

                wallet.balance = wallet.balance.checked_sub(amount).ok_or(
                    LedgerError::InsufficientFunds {
                        required: amount.get(),
                        available: wallet.balance.get(),
                        shortfall: amount.get() - wallet.balance.get(),
                    },
                )?;
                wallet.updated_at = now;
                let new_balance = wallet.balance;

                let transaction = Transaction {
                    id: TransactionId::generate(),
                    user_id,
                    kind: TransactionType::Purchase,
                    amount: -amount.get(),
                    description,
                    plan_name,
                    reference: None,
                    status: TransactionStatus::Completed,
                    created_at: now,
                };
                doc.transactions.push(transaction.clone());

                Ok(LedgerReceipt {
                    new_balance,
                    transaction,
                })
            })
            .await
    }

    /// Current balance snapshot for a user.
    ///
    /// # Errors
    ///
    /// Returns `WalletNotFound` if the user has no wallet.
    pub async fn get_balance(&self, user_id: UserId) -> Result<BalanceView, LedgerError> {
        let doc = self.store.read().await;
        let wallet = doc.wallet(user_id).ok_or(LedgerError::WalletNotFound)?;
        Ok(BalanceView {
            balance: wallet.balance,
            currency: wallet.currency,
            updated_at: wallet.updated_at,
        })
    }

    /// A user's ledger entries, newest first.
    ///
    /// Re-querying returns the then-current state; this is a finite
    /// snapshot, not a cursor.
    ///
    /// # Errors
    ///
    /// Returns `WalletNotFound` if the user has no wallet.
    pub async fn list_transactions(&self, user_id: UserId) -> Result<Vec<Transaction>, LedgerError> {
        let doc = self.store.read().await;
        if doc.wallet(user_id).is_none() {
            return Err(LedgerError::WalletNotFound);
        }
        Ok(doc.transactions_for(user_id))
    }

    /// Create a wallet for a new user.
    ///
    /// Called by registration only, in the same store mutation that
    /// creates the user.
    #[must_use]
    pub fn new_wallet(user_id: UserId) -> Wallet {
        Wallet::new(user_id, CurrencyCode::default(), Utc::now())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store_with_wallet(balance: i64) -> (tempfile::TempDir, DocumentStore, UserId) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("oracle.json"))
            .await
            .unwrap();
        let user_id = UserId::generate();
        store
            .mutate(|doc| {
                let mut wallet = Wallet::new(user_id, CurrencyCode::NGN, Utc::now());
                wallet.balance = Amount::new(balance).unwrap();
                doc.wallets.push(wallet);
                if balance > 0 {
                    // Seed the matching ledger entry so the consistency
                    // invariant holds from the start.
                    doc.transactions.push(Transaction {
                        id: TransactionId::generate(),
                        user_id,
                        kind: TransactionType::Topup,
                        amount: balance,
                        description: "seed".to_owned(),
                        plan_name: None,
                        reference: None,
                        status: TransactionStatus::Completed,
                        created_at: Utc::now(),
                    });
                }
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap();
        (dir, store, user_id)
    }

    async fn ledger_sum(store: &DocumentStore, user_id: UserId) -> i64 {
        store
            .read()
            .await
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| t.amount)
            .sum()
    }

    #[tokio::test]
    async fn test_credit_updates_balance_and_ledger() {
        let (_dir, store, user_id) = store_with_wallet(0).await;
        let ledger = LedgerService::new(&store);

        let receipt = ledger
            .credit(user_id, Amount::new(5000).unwrap(), "Wallet top-up", None)
            .await
            .unwrap();

        assert_eq!(receipt.new_balance.get(), 5000);
        assert_eq!(receipt.transaction.amount, 5000);
        assert_eq!(receipt.transaction.kind, TransactionType::Topup);
        assert_eq!(ledger_sum(&store, user_id).await, 5000);
    }

    #[tokio::test]
    async fn test_credit_zero_amount_rejected() {
        let (_dir, store, user_id) = store_with_wallet(0).await;
        let ledger = LedgerService::new(&store);

        assert!(matches!(
            ledger.credit(user_id, Amount::ZERO, "x", None).await,
            Err(LedgerError::InvalidAmount)
        ));
    }

    #[tokio::test]
    async fn test_credit_unknown_wallet() {
        let (_dir, store, _) = store_with_wallet(0).await;
        let ledger = LedgerService::new(&store);

        assert!(matches!(
            ledger
                .credit(UserId::generate(), Amount::new(100).unwrap(), "x", None)
                .await,
            Err(LedgerError::WalletNotFound)
        ));
    }

    #[tokio::test]
    async fn test_credit_duplicate_reference_rejected() {
        let (_dir, store, user_id) = store_with_wallet(0).await;
        let ledger = LedgerService::new(&store);

        ledger
            .credit(
                user_id,
                Amount::new(1000).unwrap(),
                "Wallet top-up",
                Some("psk_abc123"),
            )
            .await
            .unwrap();

        // A replayed webhook must not double-credit.
        let replay = ledger
            .credit(
                user_id,
                Amount::new(1000).unwrap(),
                "Wallet top-up",
                Some("psk_abc123"),
            )
            .await;
        assert!(matches!(replay, Err(LedgerError::DuplicateReference(_))));

        let balance = ledger.get_balance(user_id).await.unwrap();
        assert_eq!(balance.balance.get(), 1000);
    }

    #[tokio::test]
    async fn test_debit_happy_path() {
        let (_dir, store, user_id) = store_with_wallet(5000).await;
        let ledger = LedgerService::new(&store);

        let receipt = ledger
            .debit(
                user_id,
                Amount::new(3000).unwrap(),
                "Purchase: Pro",
                Some("Pro"),
            )
            .await
            .unwrap();

        assert_eq!(receipt.new_balance.get(), 2000);
        assert_eq!(receipt.transaction.amount, -3000);
        assert_eq!(receipt.transaction.plan_name.as_deref(), Some("Pro"));
        assert_eq!(ledger_sum(&store, user_id).await, 2000);
    }

    #[tokio::test]
    async fn test_debit_insufficient_funds_reports_shortfall() {
        let (_dir, store, user_id) = store_with_wallet(1000).await;
        let ledger = LedgerService::new(&store);

        let err = ledger
            .debit(user_id, Amount::new(5000).unwrap(), "Purchase: Starter", None)
            .await
            .unwrap_err();

        match err {
            LedgerError::InsufficientFunds {
                required,
                available,
                shortfall,
            } => {
                assert_eq!(required, 5000);
                assert_eq!(available, 1000);
                assert_eq!(shortfall, 4000);
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }

        // No partial debit.
        let balance = ledger.get_balance(user_id).await.unwrap();
        assert_eq!(balance.balance.get(), 1000);
        assert_eq!(ledger_sum(&store, user_id).await, 1000);
    }

    #[tokio::test]
    async fn test_list_transactions_newest_first() {
        let (_dir, store, user_id) = store_with_wallet(0).await;
        let ledger = LedgerService::new(&store);

        ledger
            .credit(user_id, Amount::new(100).unwrap(), "first", None)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        ledger
            .credit(user_id, Amount::new(200).unwrap(), "second", None)
            .await
            .unwrap();

        let entries = ledger.list_transactions(user_id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.first().unwrap().description, "second");
        assert!(entries.first().unwrap().created_at >= entries.last().unwrap().created_at);
    }

    #[tokio::test]
    async fn test_balance_view_serializes_updated_at() {
        let (_dir, store, user_id) = store_with_wallet(1500).await;
        let view = LedgerService::new(&store)
            .get_balance(user_id)
            .await
            .unwrap();

        // Same field name as the persisted wallet record.
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["balance"], 1500);
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("lastUpdated").is_none());
    }

    #[tokio::test]
    async fn test_list_transactions_requires_wallet() {
        let (_dir, store, _) = store_with_wallet(0).await;
        let ledger = LedgerService::new(&store);

        assert!(matches!(
            ledger.list_transactions(UserId::generate()).await,
            Err(LedgerError::WalletNotFound)
        ));
    }
}
