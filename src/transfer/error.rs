//! Transfer Error Types
//!
//! One flat error enum for the whole engine; every variant carries the
//! request id so failures stay correlated without global logging context.

use thiserror::Error;

use crate::account::AccountError;
use crate::ledger::LedgerError;
use crate::payee::PayeeError;

use super::types::RequestId;

/// Transfer engine errors
///
/// Error codes are stable strings used by the API layer.
#[derive(Error, Debug, Clone)]
pub enum TransferError {
    /// Payer or payee account number is unknown
    #[error("account {account} not found")]
    AccountNotFound { request_id: RequestId, account: String },

    /// No payee row for the (payer, payee) pair, or its bank code differs
    #[error("payee is not registered for the payer account")]
    PayeeNotRegistered { request_id: RequestId },

    /// Business rejection: payer balance is below the transfer amount
    #[error("insufficient funds in payer account")]
    InsufficientFunds { request_id: RequestId },

    /// Caller error: same-account transfer, blank bank code, bad amount
    #[error("invalid transfer request: {reason}")]
    InvalidRequest { request_id: RequestId, reason: String },

    /// Another attempt owns this request id right now; the engine normally
    /// resolves this by re-reading the ledger
    #[error("request is already being processed")]
    DuplicateInFlight { request_id: RequestId },

    /// A failure occurred after a PENDING ledger entry was opened; the entry
    /// is retained as FAILURE and the original cause is carried here
    #[error("transaction processing failed: {message}")]
    Processing { request_id: RequestId, message: String },
}

impl TransferError {
    pub fn request_id(&self) -> RequestId {
        match self {
            TransferError::AccountNotFound { request_id, .. }
            | TransferError::PayeeNotRegistered { request_id }
            | TransferError::InsufficientFunds { request_id }
            | TransferError::InvalidRequest { request_id, .. }
            | TransferError::DuplicateInFlight { request_id }
            | TransferError::Processing { request_id, .. } => *request_id,
        }
    }

    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            TransferError::PayeeNotRegistered { .. } => "PAYEE_NOT_REGISTERED",
            TransferError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            TransferError::InvalidRequest { .. } => "INVALID_REQUEST",
            TransferError::DuplicateInFlight { .. } => "DUPLICATE_REQUEST",
            TransferError::Processing { .. } => "TRANSACTION_PROCESSING",
        }
    }

    /// HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::AccountNotFound { .. } | TransferError::PayeeNotRegistered { .. } => 404,
            TransferError::InvalidRequest { .. } => 400,
            TransferError::InsufficientFunds { .. } => 422,
            TransferError::DuplicateInFlight { .. } => 409,
            TransferError::Processing { .. } => 500,
        }
    }

    pub fn invalid(request_id: RequestId, reason: impl Into<String>) -> Self {
        TransferError::InvalidRequest {
            request_id,
            reason: reason.into(),
        }
    }

    pub fn processing(request_id: RequestId, message: impl Into<String>) -> Self {
        TransferError::Processing {
            request_id,
            message: message.into(),
        }
    }

    /// Attach a request id to an account store failure
    pub fn from_account(request_id: RequestId, account: &str, e: AccountError) -> Self {
        match e {
            AccountError::NotFound(account) => TransferError::AccountNotFound {
                request_id,
                account,
            },
            AccountError::InsufficientFunds(_) => {
                TransferError::InsufficientFunds { request_id }
            }
            AccountError::CurrencyMismatch(_) => TransferError::invalid(
                request_id,
                format!("currency does not match account {account}"),
            ),
            AccountError::Storage(message) => TransferError::Processing {
                request_id,
                message,
            },
        }
    }

    /// Attach a request id to a payee registry failure
    pub fn from_payee(request_id: RequestId, e: PayeeError) -> Self {
        match e {
            PayeeError::NotRegistered => TransferError::PayeeNotRegistered { request_id },
            PayeeError::Storage(message) => TransferError::Processing {
                request_id,
                message,
            },
        }
    }

    /// Attach a request id to a ledger failure
    pub fn from_ledger(request_id: RequestId, e: LedgerError) -> Self {
        match e {
            LedgerError::DuplicateRequestId => TransferError::DuplicateInFlight { request_id },
            LedgerError::Storage(message) => TransferError::Processing {
                request_id,
                message,
            },
        }
    }
}
