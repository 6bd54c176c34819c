//! FundFlow - Idempotent Money Transfer Service
//!
//! Executes transfers between bank accounts with a durable transaction
//! ledger. Each request carries a client-generated request id; retries
//! replay the recorded outcome instead of moving money twice.
//!
//! ```text
//! ┌─────────┐    ┌──────────┐    ┌───────────┐    ┌──────────┐
//! │ Gateway │───▶│  Engine  │───▶│  Router   │───▶│ Executor │
//! │ (axum)  │    │(validate)│    │intra/inter│    │(dr/cr)   │
//! └─────────┘    └──────────┘    └───────────┘    └──────────┘
//!                      │                                │
//!                      ▼                                ▼
//!                 Ledger replay                  PENDING▶SUCCESS/FAILURE
//! ```
//!
//! Stores are trait seams with in-memory and PostgreSQL implementations.

pub mod account;
pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod money;
pub mod payee;
pub mod seed;
pub mod transfer;

pub use money::{Currency, Money, MoneyError};
pub use transfer::{TransferEngine, TransferError, TransferRequest, TransferResponse};
