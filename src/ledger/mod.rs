//! Transaction Ledger
//!
//! Append-oriented record of transfer attempts, keyed by both the generated
//! transaction id and the caller-supplied request id. Request-id uniqueness
//! is enforced at insert, which closes the duplicate-check-then-insert race:
//! the loser of a concurrent insert gets `DuplicateRequestId` and re-reads
//! the winner's entry instead of double-applying.
//!
//! Status updates are compare-and-set `(expected, new)`, so a terminal entry
//! can never move again.

use async_trait::async_trait;
use thiserror::Error;

use crate::transfer::status::TransactionStatus;
use crate::transfer::types::{RequestId, Transaction, TransactionId};

pub mod db;
pub mod memory;

pub use db::PgTransactionLedger;
pub use memory::MemoryLedger;

#[derive(Debug, Error, Clone)]
pub enum LedgerError {
    /// An entry already exists for this request id
    #[error("an entry already exists for this request id")]
    DuplicateRequestId,

    #[error("ledger storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::Storage(e.to_string())
    }
}

/// Durable transfer-attempt records
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Idempotency lookup
    async fn find_by_request_id(
        &self,
        request_id: RequestId,
    ) -> Result<Option<Transaction>, LedgerError>;

    /// Persist a new entry; fails `DuplicateRequestId` when the request id
    /// is already taken
    async fn insert(&self, txn: &Transaction) -> Result<(), LedgerError>;

    /// Atomic CAS status transition; returns false when the current status
    /// did not match `expected` (the entry was already moved)
    async fn update_status(
        &self,
        transaction_id: TransactionId,
        expected: TransactionStatus,
        new: TransactionStatus,
        error: Option<&str>,
    ) -> Result<bool, LedgerError>;
}
