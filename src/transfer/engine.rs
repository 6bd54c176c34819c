//! Transfer Engine
//!
//! The façade invoked once per request: idempotency replay, validation,
//! payee resolution, routing, and delegation to the selected executor.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::account::AccountStore;
use crate::ledger::TransactionLedger;
use crate::payee::PayeeRegistry;

use super::error::TransferError;
use super::executor::{InterBankExecutor, IntraBankExecutor, TransferExecutor};
use super::router;
use super::settlement::SettlementGateway;
use super::types::{TransferRequest, TransferResponse, TransferType};

/// How often to re-poll the ledger after losing an insert race
const DUPLICATE_POLL_ATTEMPTS: u32 = 5;
const DUPLICATE_POLL_DELAY: Duration = Duration::from_millis(50);

pub struct TransferEngine {
    accounts: Arc<dyn AccountStore>,
    payees: Arc<dyn PayeeRegistry>,
    ledger: Arc<dyn TransactionLedger>,
    intra: IntraBankExecutor,
    inter: InterBankExecutor,
    /// Bank code of this institution; payer accounts are held here
    bank_code: String,
}

impl TransferEngine {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        payees: Arc<dyn PayeeRegistry>,
        ledger: Arc<dyn TransactionLedger>,
        settlement: Arc<dyn SettlementGateway>,
        bank_code: impl Into<String>,
    ) -> Self {
        let intra = IntraBankExecutor::new(accounts.clone(), ledger.clone());
        let inter = InterBankExecutor::new(accounts.clone(), ledger.clone(), settlement);
        Self {
            accounts,
            payees,
            ledger,
            intra,
            inter,
            bank_code: bank_code.into(),
        }
    }

    /// Execute one transfer end-to-end.
    ///
    /// A request id that already has a ledger entry replays the recorded
    /// outcome with `duplicate = true` and performs no account mutation.
    pub async fn execute(&self, request: TransferRequest) -> Result<TransferResponse, TransferError> {
        let request_id = request.request_id;
        info!(
            request_id = %request_id,
            payer = %request.payer_account,
            payee = %request.payee_account,
            "processing transfer request"
        );

        self.validate_shape(&request)?;

        // Idempotency check before any account read
        if let Some(response) = self.replay(&request).await? {
            return Ok(response);
        }

        let payer = self
            .accounts
            .get(&request.payer_account)
            .await
            .map_err(|e| TransferError::from_account(request_id, &request.payer_account, e))?;

        if request.payer_account == request.payee_account {
            return Err(TransferError::invalid(
                request_id,
                "payer and payee accounts cannot be the same",
            ));
        }
        let sufficient = payer
            .balance
            .compare(&request.amount)
            .map_err(|e| TransferError::invalid(request_id, e.to_string()))?;
        if sufficient == std::cmp::Ordering::Less {
            warn!(
                request_id = %request_id,
                balance = %payer.balance,
                "transfer rejected: insufficient funds"
            );
            return Err(TransferError::InsufficientFunds { request_id });
        }

        let payee = self
            .payees
            .find_registered(
                &request.payer_account,
                &request.payee_account,
                &request.payee_bank_code,
            )
            .await
            .map_err(|e| TransferError::from_payee(request_id, e))?;

        let transfer_type = router::select(&self.bank_code, &request.payee_bank_code)
            .map_err(|e| TransferError::invalid(request_id, e.to_string()))?;
        let executor: &dyn TransferExecutor = match transfer_type {
            TransferType::IntraBank => &self.intra,
            TransferType::InterBank => &self.inter,
        };

        match executor.execute(&payer, &payee, &request).await {
            Ok(outcome) => Ok(TransferResponse::from_transaction(
                &outcome.transaction,
                outcome.payer_balance,
                false,
            )),
            // Lost the insert race: another attempt owns this request id.
            // Re-read the ledger and return the winner's entry.
            Err(TransferError::DuplicateInFlight { .. }) => self.resolve_in_flight(&request).await,
            Err(e) => Err(e),
        }
    }

    /// Request-shape checks that precede everything, including replay
    fn validate_shape(&self, request: &TransferRequest) -> Result<(), TransferError> {
        if !request.amount.is_positive() {
            return Err(TransferError::invalid(
                request.request_id,
                "transfer amount must be greater than zero",
            ));
        }
        if request.payee_bank_code.trim().is_empty() {
            return Err(TransferError::invalid(
                request.request_id,
                "payee bank code is required",
            ));
        }
        Ok(())
    }

    /// Assemble a duplicate response from an existing ledger entry, if any.
    ///
    /// FAILURE entries replay as FAILURE: a retry under a failed request id
    /// reports the prior failed attempt rather than silently re-running it.
    async fn replay(
        &self,
        request: &TransferRequest,
    ) -> Result<Option<TransferResponse>, TransferError> {
        let request_id = request.request_id;
        let Some(existing) = self
            .ledger
            .find_by_request_id(request_id)
            .await
            .map_err(|e| TransferError::from_ledger(request_id, e))?
        else {
            return Ok(None);
        };

        info!(
            request_id = %request_id,
            transaction_id = %existing.transaction_id,
            status = %existing.status,
            "duplicate request id; replaying recorded outcome"
        );

        let payer = self
            .accounts
            .get(&existing.payer_account)
            .await
            .map_err(|e| TransferError::from_account(request_id, &existing.payer_account, e))?;

        Ok(Some(TransferResponse::from_transaction(
            &existing,
            payer.balance,
            true,
        )))
    }

    /// After a lost insert race, poll until the winner's entry is readable
    async fn resolve_in_flight(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferResponse, TransferError> {
        for _ in 0..DUPLICATE_POLL_ATTEMPTS {
            if let Some(response) = self.replay(request).await? {
                return Ok(response);
            }
            tokio::time::sleep(DUPLICATE_POLL_DELAY).await;
        }

        warn!(
            request_id = %request.request_id,
            "concurrent attempt holds this request id but its entry never became readable"
        );
        Err(TransferError::DuplicateInFlight {
            request_id: request.request_id,
        })
    }
}
