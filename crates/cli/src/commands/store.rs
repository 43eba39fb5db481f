//! Document store setup commands.
//!
//! # Environment Variables
//!
//! - `ORACLE_DATA_FILE` - Path to the JSON document store
//!   (default: data/oracle.json)

use oracle_api::db::{DocumentStore, StoreError};

/// Create an empty document store file at the configured path.
///
/// Opening the store creates an empty in-memory document if the file is
/// missing; flushing writes it out. An existing file is left untouched.
///
/// # Errors
///
/// Returns `StoreError` if the file exists but is corrupt, or if writing
/// fails.
pub async fn init() -> Result<(), StoreError> {
    dotenvy::dotenv().ok();

    let path = std::env::var("ORACLE_DATA_FILE").unwrap_or_else(|_| "data/oracle.json".to_owned());

    let store = DocumentStore::open(&path).await?;
    store.flush().await?;

    tracing::info!("Document store ready at {path}");
    Ok(())
}
