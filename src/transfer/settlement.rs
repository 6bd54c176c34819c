//! Partner-bank settlement hook
//!
//! Inter-bank transfers hand off to this trait after the local debit and the
//! SUCCESS ledger write are durably committed. The contract exposed to the
//! integration: "local debit has been committed; proceed with settlement or
//! compensate". The real wire protocol lives outside this service.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::payee::Payee;

use super::types::Transaction;

#[derive(Debug, Error, Clone)]
#[error("settlement handoff failed: {0}")]
pub struct SettlementError(pub String);

#[async_trait]
pub trait SettlementGateway: Send + Sync {
    async fn settle(&self, transaction: &Transaction, payee: &Payee)
    -> Result<(), SettlementError>;
}

/// Stand-in gateway that only records the handoff
#[derive(Default)]
pub struct LoggingSettlementGateway;

impl LoggingSettlementGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SettlementGateway for LoggingSettlementGateway {
    async fn settle(
        &self,
        transaction: &Transaction,
        payee: &Payee,
    ) -> Result<(), SettlementError> {
        info!(
            transaction_id = %transaction.transaction_id,
            request_id = %transaction.request_id,
            payee_bank = %payee.bank_code,
            payee_account = %payee.account_number,
            amount = %transaction.amount,
            "handing transfer off to partner bank for settlement"
        );
        Ok(())
    }
}
