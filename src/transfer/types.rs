//! Transfer Core Types
//!
//! Identifiers, the transfer request/response pair, and the ledger entry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::payee::Payee;

use super::status::TransactionStatus;

/// Caller-supplied request identifier, used for idempotency correlation.
///
/// The request id is threaded explicitly through every call and error so a
/// whole attempt can be traced without process-global context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(uuid::Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    pub fn inner(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<uuid::Uuid> for RequestId {
    fn from(id: uuid::Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generated transaction identifier - ULID-based
///
/// Using ULID provides:
/// - Monotonic, sortable IDs
/// - No coordination needed (no machine_id)
/// - 128-bit with good entropy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(ulid::Ulid);

impl TransactionId {
    /// Generate a new unique TransactionId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// Transfer type, selected by the router from the bank codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum TransferType {
    /// Payer and payee bank codes match; both balances mutate locally
    IntraBank = 1,
    /// Payee is held at another bank; only the payer balance mutates locally
    InterBank = 2,
}

impl TransferType {
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(TransferType::IntraBank),
            2 => Some(TransferType::InterBank),
            _ => None,
        }
    }

    /// Label recorded on ledger entries and echoed in responses
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::IntraBank => "IntraBankTransfer",
            TransferType::InterBank => "InterBankTransfer",
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated transfer order handed to the engine
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Idempotency key; resending the same id replays the recorded outcome
    pub request_id: RequestId,
    /// Account to debit
    pub payer_account: String,
    /// Account to credit (must be registered as a payee of the payer)
    pub payee_account: String,
    /// Bank holding the payee account
    pub payee_bank_code: String,
    pub amount: Money,
    /// Client-side timestamp
    pub timestamp: DateTime<Utc>,
}

impl TransferRequest {
    pub fn new(
        request_id: RequestId,
        payer_account: impl Into<String>,
        payee_account: impl Into<String>,
        payee_bank_code: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            request_id,
            payer_account: payer_account.into(),
            payee_account: payee_account.into(),
            payee_bank_code: payee_bank_code.into(),
            amount,
            timestamp: Utc::now(),
        }
    }
}

/// Durable record of one transfer attempt
#[derive(Debug, Clone)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    /// Idempotency correlation back to the caller's request
    pub request_id: RequestId,
    pub payer_account: String,
    pub payee_id: i64,
    pub amount: Money,
    pub status: TransactionStatus,
    pub transfer_type: TransferType,
    /// Failure cause, set when status is FAILURE
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Open a new PENDING entry for an attempt
    pub fn open(request: &TransferRequest, payee: &Payee, transfer_type: TransferType) -> Self {
        let now = Utc::now();
        Self {
            transaction_id: TransactionId::new(),
            request_id: request.request_id,
            payer_account: request.payer_account.clone(),
            payee_id: payee.id,
            amount: request.amount,
            status: TransactionStatus::Pending,
            transfer_type,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Txn[{}] request={} payer={} payee_id={} amount={} type={} status={}",
            self.transaction_id,
            self.request_id,
            self.payer_account,
            self.payee_id,
            self.amount,
            self.transfer_type,
            self.status
        )
    }
}

/// Outcome returned to the caller; derived, never persisted
#[derive(Debug, Clone)]
pub struct TransferResponse {
    pub request_id: RequestId,
    pub transaction_id: TransactionId,
    pub status: TransactionStatus,
    /// Payer balance after the transfer (current balance on replay)
    pub balance: Money,
    pub amount: Money,
    pub transfer_type: TransferType,
    /// True when the response was assembled from a previously recorded entry
    pub duplicate: bool,
    pub timestamp: DateTime<Utc>,
}

impl TransferResponse {
    pub fn from_transaction(txn: &Transaction, balance: Money, duplicate: bool) -> Self {
        Self {
            request_id: txn.request_id,
            transaction_id: txn.transaction_id,
            status: txn.status,
            balance,
            amount: txn.amount,
            transfer_type: txn.transfer_type,
            duplicate,
            timestamp: Utc::now(),
        }
    }
}
