//! # gamehub-store
//!
//! Storage layer implementing the `DocumentStore` port from `gamehub-core`.
//!
//! ## Overview
//!
//! - [`MemoryDocumentStore`]: in-process store with change notifications, used for
//!   development and tests
//! - [`PgDocumentStore`]: PostgreSQL store keeping documents as JSONB rows with a
//!   version column
//! - [`run_transaction`]: optimistic read-modify-write with bounded retries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gamehub_store::{run_transaction, MemoryDocumentStore, TransactionConfig};
//!
//! let store = MemoryDocumentStore::new();
//! let count = run_transaction(&store, &TransactionConfig::default(), |tx| {
//!     Box::pin(async move {
//!         let current: Option<u32> = tx.get_as("counters/visits").await?;
//!         let next = current.unwrap_or(0) + 1;
//!         tx.set("counters/visits", &next)?;
//!         Ok(next)
//!     })
//! })
//! .await?;
//! ```

pub mod pool;
pub mod stores;
pub mod transaction;

// Re-export commonly used types
pub use pool::{create_pool, PgPool, PoolConfig};
pub use stores::{ChangeKind, DocumentChange, MemoryDocumentStore, PgDocumentStore};
pub use transaction::{run_transaction, Transaction, TransactionConfig};
