//! Optimistic multi-document transactions

mod runner;

pub use runner::{run_transaction, Transaction, TransactionConfig};
