//! In-memory ledger for dev mode and tests
//!
//! The request-id index uses the map entry API, so two concurrent inserts
//! with the same request id resolve to exactly one stored entry.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::transfer::status::TransactionStatus;
use crate::transfer::types::{RequestId, Transaction, TransactionId};

use super::{LedgerError, TransactionLedger};

#[derive(Default)]
pub struct MemoryLedger {
    by_id: DashMap<TransactionId, Transaction>,
    by_request: DashMap<RequestId, TransactionId>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionLedger for MemoryLedger {
    async fn find_by_request_id(
        &self,
        request_id: RequestId,
    ) -> Result<Option<Transaction>, LedgerError> {
        let Some(txn_id) = self.by_request.get(&request_id).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.by_id.get(&txn_id).map(|t| t.clone()))
    }

    async fn insert(&self, txn: &Transaction) -> Result<(), LedgerError> {
        match self.by_request.entry(txn.request_id) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateRequestId),
            Entry::Vacant(slot) => {
                self.by_id.insert(txn.transaction_id, txn.clone());
                slot.insert(txn.transaction_id);
                Ok(())
            }
        }
    }

    async fn update_status(
        &self,
        transaction_id: TransactionId,
        expected: TransactionStatus,
        new: TransactionStatus,
        error: Option<&str>,
    ) -> Result<bool, LedgerError> {
        let Some(mut entry) = self.by_id.get_mut(&transaction_id) else {
            return Ok(false);
        };
        let txn = entry.value_mut();

        if txn.status != expected || !expected.can_transition_to(new) {
            return Ok(false);
        }

        txn.status = new;
        txn.error = error.map(str::to_string);
        txn.updated_at = Utc::now();
        Ok(true)
    }
}
