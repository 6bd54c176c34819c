//! Demo dataset for local runs and tests
//!
//! Three current accounts at this bank plus payee registrations,
//! matching the dataset served by the development environment.

use rust_decimal::Decimal;
use tracing::info;

use crate::account::{Account, MemoryAccountStore};
use crate::money::{Currency, Money};
use crate::payee::MemoryPayeeRegistry;

/// Bank code this service runs under in development
pub const DEMO_BANK_CODE: &str = "A00001";
/// Partner bank reachable only through the settlement gateway
pub const PARTNER_BANK_CODE: &str = "B00001";

pub fn seed_demo_data(accounts: &MemoryAccountStore, payees: &MemoryPayeeRegistry) {
    let holders = [
        ("123456", "Person1", Decimal::new(100000, 2)),
        ("789123", "Person2", Decimal::new(200000, 2)),
        ("978654", "Person3", Decimal::new(300000, 2)),
    ];
    for (acc_num, holder, balance) in holders {
        accounts.insert(Account {
            account_number: acc_num.to_string(),
            holder: holder.to_string(),
            bank_code: DEMO_BANK_CODE.to_string(),
            balance: Money::new(balance, Currency::Gbp),
        });
    }

    payees.register("123456", "Person1-Payee1", "978654", DEMO_BANK_CODE);
    payees.register("123456", "Person1-Payee2", "654321", PARTNER_BANK_CODE);
    payees.register("978654", "Person3-Payee1", "654321", PARTNER_BANK_CODE);

    info!("seeded demo accounts and payee registrations");
}
