//! Transfer Executors
//!
//! One strategy per transfer type, behind a common trait selected by the
//! router. Both strategies share the same attempt shape: open a PENDING
//! ledger entry, debit the payer, finish the type-specific leg, mark the
//! entry SUCCESS. Any failure after the entry exists is captured into it as
//! FAILURE before the error is surfaced, so the ledger never loses the fact
//! that an attempt happened.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::account::{Account, AccountStore};
use crate::ledger::TransactionLedger;
use crate::money::Money;
use crate::payee::Payee;

use super::error::TransferError;
use super::settlement::SettlementGateway;
use super::status::TransactionStatus;
use super::types::{Transaction, TransferRequest, TransferType};

/// Result of one executed transfer attempt
#[derive(Debug)]
pub struct TransferOutcome {
    pub transaction: Transaction,
    /// Payer balance captured from the debit
    pub payer_balance: Money,
}

/// One transfer strategy
#[async_trait]
pub trait TransferExecutor: Send + Sync {
    fn transfer_type(&self) -> TransferType;

    async fn execute(
        &self,
        payer: &Account,
        payee: &Payee,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, TransferError>;
}

/// Open a PENDING entry for the attempt.
///
/// A `DuplicateRequestId` here means another attempt won the insert race;
/// the engine resolves it by re-reading the ledger.
async fn open_entry(
    ledger: &dyn TransactionLedger,
    request: &TransferRequest,
    payee: &Payee,
    transfer_type: TransferType,
) -> Result<Transaction, TransferError> {
    let txn = Transaction::open(request, payee, transfer_type);
    ledger
        .insert(&txn)
        .await
        .map_err(|e| TransferError::from_ledger(request.request_id, e))?;
    Ok(txn)
}

/// Capture a post-PENDING failure into the entry, then hand back the
/// processing error for the caller to raise.
async fn fail_entry(
    ledger: &dyn TransactionLedger,
    txn: &Transaction,
    cause: String,
) -> TransferError {
    error!(
        transaction_id = %txn.transaction_id,
        request_id = %txn.request_id,
        cause = %cause,
        "transfer attempt failed; recording FAILURE entry"
    );

    match ledger
        .update_status(
            txn.transaction_id,
            TransactionStatus::Pending,
            TransactionStatus::Failure,
            Some(&cause),
        )
        .await
    {
        Ok(true) => {}
        Ok(false) => warn!(
            transaction_id = %txn.transaction_id,
            "FAILURE transition lost; entry already terminal"
        ),
        Err(e) => error!(
            transaction_id = %txn.transaction_id,
            error = %e,
            "could not persist FAILURE entry"
        ),
    }

    TransferError::processing(txn.request_id, cause)
}

/// Mark the entry SUCCESS; a lost transition is itself a processing failure.
async fn mark_success(
    ledger: &dyn TransactionLedger,
    txn: &Transaction,
) -> Result<(), TransferError> {
    match ledger
        .update_status(
            txn.transaction_id,
            TransactionStatus::Pending,
            TransactionStatus::Success,
            None,
        )
        .await
    {
        Ok(true) => Ok(()),
        Ok(false) => Err(fail_entry(
            ledger,
            txn,
            "SUCCESS transition lost: ledger entry was not PENDING".to_string(),
        )
        .await),
        Err(e) => Err(fail_entry(ledger, txn, e.to_string()).await),
    }
}

/// Intra-bank strategy: both legs settle locally
pub struct IntraBankExecutor {
    accounts: Arc<dyn AccountStore>,
    ledger: Arc<dyn TransactionLedger>,
}

impl IntraBankExecutor {
    pub fn new(accounts: Arc<dyn AccountStore>, ledger: Arc<dyn TransactionLedger>) -> Self {
        Self { accounts, ledger }
    }
}

#[async_trait]
impl TransferExecutor for IntraBankExecutor {
    fn transfer_type(&self) -> TransferType {
        TransferType::IntraBank
    }

    async fn execute(
        &self,
        payer: &Account,
        payee: &Payee,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, TransferError> {
        let request_id = request.request_id;

        // The payee account must exist locally; lookup failures happen
        // before any ledger entry is opened.
        self.accounts
            .get(&payee.account_number)
            .await
            .map_err(|e| TransferError::from_account(request_id, &payee.account_number, e))?;

        let mut txn =
            open_entry(self.ledger.as_ref(), request, payee, TransferType::IntraBank).await?;

        let payer_after = match self.accounts.debit(&payer.account_number, &request.amount).await {
            Ok(account) => account,
            Err(e) => return Err(fail_entry(self.ledger.as_ref(), &txn, e.to_string()).await),
        };

        // Payer is debited from here on: a credit failure leaves the system
        // transiently inconsistent and is only recorded, not compensated.
        // Reconciliation runs against FAILURE entries.
        if let Err(e) = self.accounts.credit(&payee.account_number, &request.amount).await {
            return Err(fail_entry(self.ledger.as_ref(), &txn, e.to_string()).await);
        }

        mark_success(self.ledger.as_ref(), &txn).await?;
        txn.status = TransactionStatus::Success;

        info!(
            transaction_id = %txn.transaction_id,
            request_id = %request_id,
            amount = %request.amount,
            "intra-bank transfer completed"
        );
        Ok(TransferOutcome {
            transaction: txn,
            payer_balance: payer_after.balance,
        })
    }
}

/// Inter-bank strategy: only the payer leg settles locally, then the
/// attempt is handed off to the partner bank
pub struct InterBankExecutor {
    accounts: Arc<dyn AccountStore>,
    ledger: Arc<dyn TransactionLedger>,
    settlement: Arc<dyn SettlementGateway>,
}

impl InterBankExecutor {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        ledger: Arc<dyn TransactionLedger>,
        settlement: Arc<dyn SettlementGateway>,
    ) -> Self {
        Self {
            accounts,
            ledger,
            settlement,
        }
    }
}

#[async_trait]
impl TransferExecutor for InterBankExecutor {
    fn transfer_type(&self) -> TransferType {
        TransferType::InterBank
    }

    async fn execute(
        &self,
        payer: &Account,
        payee: &Payee,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, TransferError> {
        let request_id = request.request_id;

        let mut txn =
            open_entry(self.ledger.as_ref(), request, payee, TransferType::InterBank).await?;

        let payer_after = match self.accounts.debit(&payer.account_number, &request.amount).await {
            Ok(account) => account,
            Err(e) => return Err(fail_entry(self.ledger.as_ref(), &txn, e.to_string()).await),
        };

        mark_success(self.ledger.as_ref(), &txn).await?;
        txn.status = TransactionStatus::Success;

        // Settlement runs only after the local debit and the SUCCESS write
        // are committed; its failure handling belongs to the partner-bank
        // integration, not to this attempt.
        if let Err(e) = self.settlement.settle(&txn, payee).await {
            warn!(
                transaction_id = %txn.transaction_id,
                request_id = %request_id,
                error = %e,
                "settlement handoff reported an error"
            );
        }

        info!(
            transaction_id = %txn.transaction_id,
            request_id = %request_id,
            amount = %request.amount,
            payee_bank = %payee.bank_code,
            "inter-bank transfer committed locally"
        );
        Ok(TransferOutcome {
            transaction: txn,
            payer_balance: payer_after.balance,
        })
    }
}
