//! In-memory account store
//!
//! Backs dev mode and tests. `DashMap::get_mut` holds the shard write lock
//! for the lifetime of the guard, so the sufficiency check and the balance
//! write happen under one lock per account number, while accounts on other
//! shards proceed untouched.

use std::cmp::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::money::Money;

use super::{Account, AccountError, AccountStore};

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: DashMap<String, Account>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace an account (out-of-core lifecycle: seed/admin only)
    pub fn insert(&self, account: Account) {
        self.accounts.insert(account.account_number.clone(), account);
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn get(&self, account_number: &str) -> Result<Account, AccountError> {
        self.accounts
            .get(account_number)
            .map(|a| a.clone())
            .ok_or_else(|| AccountError::NotFound(account_number.to_string()))
    }

    async fn debit(&self, account_number: &str, amount: &Money) -> Result<Account, AccountError> {
        let mut entry = self
            .accounts
            .get_mut(account_number)
            .ok_or_else(|| AccountError::NotFound(account_number.to_string()))?;
        let account = entry.value_mut();

        let order = account
            .balance
            .compare(amount)
            .map_err(|_| AccountError::CurrencyMismatch(account_number.to_string()))?;
        if order == Ordering::Less {
            return Err(AccountError::InsufficientFunds(account_number.to_string()));
        }

        account.balance = account
            .balance
            .checked_sub(amount)
            .map_err(|_| AccountError::CurrencyMismatch(account_number.to_string()))?;
        Ok(account.clone())
    }

    async fn credit(&self, account_number: &str, amount: &Money) -> Result<Account, AccountError> {
        let mut entry = self
            .accounts
            .get_mut(account_number)
            .ok_or_else(|| AccountError::NotFound(account_number.to_string()))?;
        let account = entry.value_mut();

        account.balance = account
            .balance
            .checked_add(amount)
            .map_err(|_| AccountError::CurrencyMismatch(account_number.to_string()))?;
        Ok(account.clone())
    }
}
