//! Wire types for the transfer API
//!
//! Field names are camelCase on the wire. Shape checks (lengths, formats)
//! live here; business rules stay in the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::money::{Currency, Money};
use crate::transfer::{RequestId, TransferError, TransferRequest, TransferResponse};

/// Incoming transfer request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequestDto {
    /// Client-generated idempotency key
    #[schema(example = "0b38fc21-5b4f-4c95-9e55-6fb3c1f4a27d")]
    pub request_id: Uuid,
    #[validate(length(min = 5, max = 8, message = "account number must be 5 to 8 digits"))]
    #[schema(example = "123456")]
    pub payer_acc_number: String,
    #[validate(length(min = 5, max = 8, message = "account number must be 5 to 8 digits"))]
    #[schema(example = "978654")]
    pub payee_acc_number: String,
    /// Display name of the payee's bank; informational only
    #[serde(default)]
    #[schema(example = "BANK_A")]
    pub payee_bank_name: Option<String>,
    #[validate(length(equal = 6, message = "bank code must be exactly 6 characters"))]
    #[schema(example = "A00001")]
    pub payee_bank_code: String,
    /// Decimal string, two fraction digits expected
    #[schema(example = "100.00")]
    pub amount: String,
    /// ISO currency code, EUR or GBP
    #[schema(example = "GBP")]
    pub currency: String,
    /// Client-side submission time; defaults to receipt time when absent
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TransferRequestDto {
    /// Validate the shape and convert into the engine's request type
    pub fn into_domain(self) -> Result<TransferRequest, String> {
        self.validate()
            .map_err(|e| first_validation_message(&e))?;

        if !self.payer_acc_number.chars().all(|c| c.is_ascii_digit()) {
            return Err("payer account number must be numeric".to_string());
        }
        if !self.payee_acc_number.chars().all(|c| c.is_ascii_digit()) {
            return Err("payee account number must be numeric".to_string());
        }

        let currency: Currency = self
            .currency
            .parse()
            .map_err(|_| format!("unsupported currency: {}", self.currency))?;
        let amount = Money::parse(&self.amount, currency)
            .map_err(|_| format!("invalid amount: {}", self.amount))?;

        let mut request = TransferRequest::new(
            RequestId::from(self.request_id),
            self.payer_acc_number,
            self.payee_acc_number,
            self.payee_bank_code,
            amount,
        );
        if let Some(timestamp) = self.timestamp {
            request.timestamp = timestamp;
        }
        Ok(request)
    }
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "invalid request body".to_string())
}

/// Successful transfer response body
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponseDto {
    pub request_id: Uuid,
    /// Ledger entry id, ULID format
    #[schema(example = "01JD2W8E2V9GQZK3M4N5P6R7S8")]
    pub transaction_id: String,
    #[schema(example = "SUCCESS")]
    pub status: String,
    /// Payer balance after the transfer
    #[schema(example = "900.00")]
    pub balance: String,
    #[schema(example = "100.00")]
    pub amount: String,
    #[schema(example = "GBP")]
    pub currency: String,
    #[schema(example = "IntraBankTransfer")]
    pub transfer_type: String,
    /// True when this request id was seen before and the recorded
    /// outcome is being replayed
    pub duplicate: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<TransferResponse> for TransferResponseDto {
    fn from(resp: TransferResponse) -> Self {
        Self {
            request_id: resp.request_id.inner(),
            transaction_id: resp.transaction_id.to_string(),
            status: resp.status.as_str().to_string(),
            balance: resp.balance.amount.to_string(),
            amount: resp.amount.amount.to_string(),
            currency: resp.amount.currency.as_str().to_string(),
            transfer_type: resp.transfer_type.as_str().to_string(),
            duplicate: resp.duplicate,
            timestamp: resp.timestamp,
        }
    }
}

/// Error response body, shared by all endpoints
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponseDto {
    #[schema(example = "INSUFFICIENT_FUNDS")]
    pub code: String,
    #[schema(example = "insufficient funds in payer account")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponseDto {
    pub fn new(code: impl Into<String>, message: impl Into<String>, request_id: Option<Uuid>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl From<&TransferError> for ErrorResponseDto {
    fn from(e: &TransferError) -> Self {
        Self::new(e.code(), e.to_string(), Some(e.request_id().inner()))
    }
}
