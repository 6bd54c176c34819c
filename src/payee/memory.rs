//! In-memory payee registry for dev mode and tests

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Payee, PayeeError, PayeeRegistry};

#[derive(Default)]
pub struct MemoryPayeeRegistry {
    // keyed by (payer account, payee account)
    payees: DashMap<(String, String), Payee>,
    next_id: AtomicI64,
}

impl MemoryPayeeRegistry {
    pub fn new() -> Self {
        Self {
            payees: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Register a payee for a payer account; returns the assigned id
    pub fn register(
        &self,
        payer_account: &str,
        nickname: &str,
        payee_account: &str,
        bank_code: &str,
    ) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.payees.insert(
            (payer_account.to_string(), payee_account.to_string()),
            Payee {
                id,
                nickname: nickname.to_string(),
                account_number: payee_account.to_string(),
                bank_code: bank_code.to_string(),
                payer_account_number: payer_account.to_string(),
            },
        );
        id
    }
}

#[async_trait]
impl PayeeRegistry for MemoryPayeeRegistry {
    async fn find_registered(
        &self,
        payer_account: &str,
        payee_account: &str,
        payee_bank_code: &str,
    ) -> Result<Payee, PayeeError> {
        let key = (payer_account.to_string(), payee_account.to_string());
        let payee = self
            .payees
            .get(&key)
            .map(|p| p.clone())
            .ok_or(PayeeError::NotRegistered)?;

        // Bank code must match exactly as registered
        if payee.bank_code != payee_bank_code {
            return Err(PayeeError::NotRegistered);
        }
        Ok(payee)
    }
}
