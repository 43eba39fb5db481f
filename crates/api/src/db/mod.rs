//! Document store adapter.
//!
//! All state lives in one JSON document with four ledger collections
//! (`users`, `wallets`, `transactions`, `carts`) plus `admins`. There is no
//! row-level access: every operation reads the whole state, mutates it in
//! memory, and rewrites the whole state.
//!
//! # Consistency
//!
//! The in-memory document is the authority and sits behind a
//! `tokio::sync::RwLock`. Mutations go through [`DocumentStore::mutate`],
//! which holds the write lock across load-validate-persist, so
//! check-then-act sequences (the insufficient-funds check in particular)
//! can never interleave. Reads take the read lock and proceed in parallel.
//!
//! Persistence is atomic: the document is serialized to a sibling temp file
//! and renamed over the store path. If persistence fails, the in-memory
//! document is left at its pre-operation state, so a failed operation makes
//! no visible change.

pub mod document;

pub use document::Document;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file is not valid JSON for the document schema.
    #[error("store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Handle to the flat JSON document store.
pub struct DocumentStore {
    path: PathBuf,
    doc: RwLock<Document>,
}

impl DocumentStore {
    /// Open the store at `path`, loading the existing document or starting
    /// from an empty one if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read,
    /// or [`StoreError::Corrupt`] if it is not a valid document.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let doc = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Document::default(),
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    /// The store file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-only access to the current document.
    ///
    /// Multiple readers may hold this concurrently; a reader blocks
    /// mutations for as long as it is held, so keep the guard short-lived.
    pub async fn read(&self) -> RwLockReadGuard<'_, Document> {
        self.doc.read().await
    }

    /// Run a mutation as a serialized critical section.
    ///
    /// The operation receives a working copy of the document. If it returns
    /// an error, nothing changes. If it succeeds, the working copy is
    /// persisted and only then swapped in as the new authority — a
    /// persistence failure therefore also leaves no visible change.
    ///
    /// # Errors
    ///
    /// Returns the operation's error unchanged, or the persistence error
    /// converted via `From<StoreError>`.
    pub async fn mutate<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut guard = self.doc.write().await;
        let mut working = guard.clone();

        let out = op(&mut working)?;

        self.persist(&working).await?;
        *guard = working;
        Ok(out)
    }

    /// Serialize and atomically replace the store file.
    async fn persist(&self, doc: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(doc)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Persist the current document as-is.
    ///
    /// Used by the CLI after out-of-band edits; API code goes through
    /// [`Self::mutate`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the file write fails.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let guard = self.doc.read().await;
        self.persist(&guard).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use chrono::Utc;
    use oracle_core::{CurrencyCode, UserId};

    use crate::models::Wallet;

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("oracle.json"))
            .await
            .unwrap();
        assert!(store.read().await.users.is_empty());
    }

    #[tokio::test]
    async fn test_mutate_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oracle.json");
        let user_id = UserId::generate();

        let store = DocumentStore::open(&path).await.unwrap();
        store
            .mutate(|doc| {
                doc.wallets
                    .push(Wallet::new(user_id, CurrencyCode::NGN, Utc::now()));
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap();

        let reopened = DocumentStore::open(&path).await.unwrap();
        assert!(reopened.read().await.wallet(user_id).is_some());
    }

    #[tokio::test]
    async fn test_failed_mutation_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("oracle.json"))
            .await
            .unwrap();

        let result = store
            .mutate(|doc| {
                doc.wallets
                    .push(Wallet::new(UserId::generate(), CurrencyCode::NGN, Utc::now()));
                Err::<(), StoreError>(StoreError::Io(std::io::Error::other("boom")))
            })
            .await;

        assert!(result.is_err());
        assert!(store.read().await.wallets.is_empty());
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oracle.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        assert!(matches!(
            DocumentStore::open(&path).await,
            Err(StoreError::Corrupt(_))
        ));
    }
}
