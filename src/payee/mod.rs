//! Payee Registry
//!
//! Read-only lookup of beneficiary accounts pre-registered against a payer
//! account. A transfer may only target a registered payee whose recorded
//! bank code matches the one supplied in the request; a mismatch is treated
//! the same as an unregistered payee.

use async_trait::async_trait;
use thiserror::Error;

pub mod db;
pub mod memory;

pub use db::PgPayeeRegistry;
pub use memory::MemoryPayeeRegistry;

/// A beneficiary registered by a payer account
#[derive(Debug, Clone)]
pub struct Payee {
    pub id: i64,
    pub nickname: String,
    /// Target account number
    pub account_number: String,
    /// Bank holding the target account
    pub bank_code: String,
    /// The account that registered this payee
    pub payer_account_number: String,
}

#[derive(Debug, Error, Clone)]
pub enum PayeeError {
    /// No payee row for the (payer, payee) pair, or the bank code differs
    #[error("payee not registered")]
    NotRegistered,

    #[error("payee storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for PayeeError {
    fn from(e: sqlx::Error) -> Self {
        PayeeError::Storage(e.to_string())
    }
}

/// Payee rows are created and removed out-of-core; the engine only reads
#[async_trait]
pub trait PayeeRegistry: Send + Sync {
    async fn find_registered(
        &self,
        payer_account: &str,
        payee_account: &str,
        payee_bank_code: &str,
    ) -> Result<Payee, PayeeError>;
}
