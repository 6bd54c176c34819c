//! Account Store
//!
//! Durable account balances keyed by account number. The store owns the only
//! shared mutable state in the system; balances change exclusively through
//! `debit`/`credit`, and both must serialize per account number so the
//! check-then-write sequence never observes a stale balance.

use async_trait::async_trait;
use thiserror::Error;

use crate::money::Money;

pub mod db;
pub mod memory;

pub use db::PgAccountStore;
pub use memory::MemoryAccountStore;

/// A customer account holding a single-currency balance
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique, immutable identity
    pub account_number: String,
    pub holder: String,
    /// Bank holding this account
    pub bank_code: String,
    /// Invariant: never negative between operations
    pub balance: Money,
}

/// Account store failures
#[derive(Debug, Error, Clone)]
pub enum AccountError {
    #[error("account not found: {0}")]
    NotFound(String),

    #[error("insufficient funds in account {0}")]
    InsufficientFunds(String),

    #[error("currency mismatch for account {0}")]
    CurrencyMismatch(String),

    #[error("account storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for AccountError {
    fn from(e: sqlx::Error) -> Self {
        AccountError::Storage(e.to_string())
    }
}

/// Durable account balance operations
///
/// `debit` and `credit` on the same account number must be atomic relative
/// to each other; concurrent operations on different accounts proceed
/// independently (no global lock).
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch an account by number
    async fn get(&self, account_number: &str) -> Result<Account, AccountError>;

    /// Atomically check sufficiency and reduce the balance; returns the
    /// updated account
    async fn debit(&self, account_number: &str, amount: &Money) -> Result<Account, AccountError>;

    /// Atomically increase the balance; returns the updated account
    async fn credit(&self, account_number: &str, amount: &Money) -> Result<Account, AccountError>;
}
