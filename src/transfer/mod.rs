//! Transfer Execution Engine
//!
//! Moves funds from a payer account to a registered payee, either within
//! this bank or toward another bank, with a durable ledger entry per
//! attempt and request-id idempotency.
//!
//! # Flow
//!
//! ```text
//! TransferEngine ──▶ idempotency replay (ledger)
//!       │
//!       ├──▶ payer lookup + validation (account store)
//!       ├──▶ payee resolution (payee registry)
//!       └──▶ router ──▶ IntraBankExecutor | InterBankExecutor
//!                              │
//!                              └──▶ ledger entry: PENDING ──▶ SUCCESS
//!                                                    └──────▶ FAILURE
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Entry-Before-Debit**: the PENDING entry is persisted before any
//!    balance mutation, so a debited payer always has a recorded attempt
//! 2. **Request-Id Uniqueness**: the ledger rejects a second entry for the
//!    same request id; the loser replays the winner's entry
//! 3. **Forward-Only Status**: PENDING -> SUCCESS | FAILURE via CAS, and
//!    terminal entries never move again
//! 4. **Lookup Failures Leave No Trace**: validation and lookup errors are
//!    raised before an entry exists

pub mod engine;
pub mod error;
pub mod executor;
pub mod router;
pub mod settlement;
pub mod status;
pub mod types;

#[cfg(test)]
mod integration_tests;

// Re-exports for convenience
pub use engine::TransferEngine;
pub use error::TransferError;
pub use executor::{InterBankExecutor, IntraBankExecutor, TransferExecutor, TransferOutcome};
pub use settlement::{LoggingSettlementGateway, SettlementGateway};
pub use status::TransactionStatus;
pub use types::{
    RequestId, Transaction, TransactionId, TransferRequest, TransferResponse, TransferType,
};
