//! End-to-end engine tests against the in-memory stores

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use rust_decimal::Decimal;

use crate::account::{Account, AccountError, AccountStore, MemoryAccountStore};
use crate::ledger::{MemoryLedger, TransactionLedger};
use crate::money::{Currency, Money};
use crate::payee::MemoryPayeeRegistry;
use crate::seed;

use super::engine::TransferEngine;
use super::error::TransferError;
use super::settlement::LoggingSettlementGateway;
use super::status::TransactionStatus;
use super::types::{RequestId, TransferRequest, TransferType};

const LOCAL_BANK: &str = "A00001";

struct TestEnv {
    engine: Arc<TransferEngine>,
    accounts: Arc<MemoryAccountStore>,
    payees: Arc<MemoryPayeeRegistry>,
    ledger: Arc<MemoryLedger>,
}

fn env() -> TestEnv {
    let accounts = Arc::new(MemoryAccountStore::new());
    let payees = Arc::new(MemoryPayeeRegistry::new());
    let ledger = Arc::new(MemoryLedger::new());
    seed::seed_demo_data(&accounts, &payees);

    let engine = Arc::new(TransferEngine::new(
        accounts.clone(),
        payees.clone(),
        ledger.clone(),
        Arc::new(LoggingSettlementGateway::new()),
        LOCAL_BANK,
    ));
    TestEnv {
        engine,
        accounts,
        payees,
        ledger,
    }
}

fn gbp(s: &str) -> Money {
    Money::parse(s, Currency::Gbp).unwrap()
}

fn request(payer: &str, payee: &str, bank: &str, amount: &str) -> TransferRequest {
    TransferRequest::new(RequestId::new(), payer, payee, bank, gbp(amount))
}

#[tokio::test]
async fn test_intra_bank_transfer_moves_both_balances() {
    let env = env();
    let payer_before = env.accounts.get("123456").await.unwrap().balance;
    let payee_before = env.accounts.get("978654").await.unwrap().balance;

    let resp = env
        .engine
        .execute(request("123456", "978654", "A00001", "100.00"))
        .await
        .unwrap();

    assert_eq!(resp.status, TransactionStatus::Success);
    assert_eq!(resp.transfer_type, TransferType::IntraBank);
    assert!(!resp.duplicate);
    assert_eq!(resp.balance, gbp("900.00"));

    let payer_after = env.accounts.get("123456").await.unwrap().balance;
    let payee_after = env.accounts.get("978654").await.unwrap().balance;
    assert_eq!(payer_after, gbp("900.00"));
    assert_eq!(payee_after, gbp("3100.00"));

    // conservation: the sum of both balances is unchanged
    let before = payer_before.checked_add(&payee_before).unwrap();
    let after = payer_after.checked_add(&payee_after).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_replayed_request_id_does_not_reapply() {
    let env = env();
    let req = request("123456", "978654", "A00001", "100.00");

    let first = env.engine.execute(req.clone()).await.unwrap();
    let second = env.engine.execute(req).await.unwrap();

    assert!(!first.duplicate);
    assert!(second.duplicate);
    assert_eq!(second.transaction_id, first.transaction_id);
    assert_eq!(second.status, TransactionStatus::Success);

    // debited exactly once
    assert_eq!(second.balance, gbp("900.00"));
    assert_eq!(env.accounts.get("123456").await.unwrap().balance, gbp("900.00"));
    assert_eq!(env.accounts.get("978654").await.unwrap().balance, gbp("3100.00"));
}

#[tokio::test]
async fn test_insufficient_funds_rejected_without_entry() {
    let env = env();
    let req = request("123456", "978654", "A00001", "5000.00");
    let request_id = req.request_id;

    let err = env.engine.execute(req).await.unwrap_err();
    assert!(matches!(err, TransferError::InsufficientFunds { .. }));

    assert!(
        env.ledger
            .find_by_request_id(request_id)
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(env.accounts.get("123456").await.unwrap().balance, gbp("1000.00"));
}

#[tokio::test]
async fn test_unregistered_payee_rejected_without_entry() {
    let env = env();
    // 789123 exists locally but was never registered as a payee of 123456
    let req = request("123456", "789123", "A00001", "100.00");
    let request_id = req.request_id;

    let err = env.engine.execute(req).await.unwrap_err();
    assert!(matches!(err, TransferError::PayeeNotRegistered { .. }));
    assert!(
        env.ledger
            .find_by_request_id(request_id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_bank_code_mismatch_is_unregistered() {
    let env = env();
    // payee 654321 is registered at B00001; supplying A00001 must not match.
    // The mismatched code equals the local bank, so it would also route
    // intra-bank toward an account this bank does not hold.
    let err = env
        .engine
        .execute(request("123456", "654321", "A00001", "100.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::PayeeNotRegistered { .. }));
}

#[tokio::test]
async fn test_inter_bank_transfer_debits_only_locally() {
    let env = env();

    let resp = env
        .engine
        .execute(request("123456", "654321", "B00001", "100.00"))
        .await
        .unwrap();

    assert_eq!(resp.status, TransactionStatus::Success);
    assert_eq!(resp.transfer_type, TransferType::InterBank);
    assert_eq!(resp.balance, gbp("900.00"));

    // no local account was credited; 654321 lives at the partner bank
    assert!(env.accounts.get("654321").await.is_err());
    assert_eq!(env.accounts.get("123456").await.unwrap().balance, gbp("900.00"));
}

#[tokio::test]
async fn test_same_account_rejected() {
    let env = env();
    let err = env
        .engine
        .execute(request("123456", "123456", "A00001", "100.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::InvalidRequest { .. }));
}

#[tokio::test]
async fn test_non_positive_amount_rejected() {
    let env = env();
    for amount in ["0.00", "-5.00"] {
        let err = env
            .engine
            .execute(request("123456", "978654", "A00001", amount))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::InvalidRequest { .. }));
    }
}

#[tokio::test]
async fn test_blank_bank_code_rejected() {
    let env = env();
    let err = env
        .engine
        .execute(request("123456", "978654", "  ", "100.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::InvalidRequest { .. }));
}

#[tokio::test]
async fn test_unknown_payer_account() {
    let env = env();
    let err = env
        .engine
        .execute(request("000000", "978654", "A00001", "100.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::AccountNotFound { .. }));
}

#[tokio::test]
async fn test_intra_bank_missing_payee_account_leaves_no_entry() {
    let env = env();
    // registered at the local bank, but the account row does not exist
    env.payees.register("123456", "Ghost", "111111", "A00001");
    let req = request("123456", "111111", "A00001", "100.00");
    let request_id = req.request_id;

    let err = env.engine.execute(req).await.unwrap_err();
    assert!(matches!(err, TransferError::AccountNotFound { .. }));
    assert!(
        env.ledger
            .find_by_request_id(request_id)
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(env.accounts.get("123456").await.unwrap().balance, gbp("1000.00"));
}

/// Account store whose credit leg always fails, for failure-durability tests
struct BrokenCreditStore {
    inner: MemoryAccountStore,
}

#[async_trait]
impl AccountStore for BrokenCreditStore {
    async fn get(&self, account_number: &str) -> Result<Account, AccountError> {
        self.inner.get(account_number).await
    }

    async fn debit(&self, account_number: &str, amount: &Money) -> Result<Account, AccountError> {
        self.inner.debit(account_number, amount).await
    }

    async fn credit(&self, _account_number: &str, _amount: &Money) -> Result<Account, AccountError> {
        Err(AccountError::Storage("simulated storage outage".to_string()))
    }
}

#[tokio::test]
async fn test_credit_failure_is_durably_recorded() {
    let inner = MemoryAccountStore::new();
    let payees = Arc::new(MemoryPayeeRegistry::new());
    seed::seed_demo_data(&inner, &payees);
    let accounts = Arc::new(BrokenCreditStore { inner });
    let ledger = Arc::new(MemoryLedger::new());

    let engine = TransferEngine::new(
        accounts.clone(),
        payees,
        ledger.clone(),
        Arc::new(LoggingSettlementGateway::new()),
        LOCAL_BANK,
    );

    let req = request("123456", "978654", "A00001", "100.00");
    let request_id = req.request_id;

    let err = engine.execute(req.clone()).await.unwrap_err();
    assert!(matches!(err, TransferError::Processing { .. }));

    // exactly one FAILURE entry with the cause survives
    let entry = ledger
        .find_by_request_id(request_id)
        .await
        .unwrap()
        .expect("attempt must be recorded");
    assert_eq!(entry.status, TransactionStatus::Failure);
    assert!(entry.error.as_deref().unwrap().contains("simulated storage outage"));

    // the payer was debited before the credit leg broke; the inconsistency
    // is recorded for reconciliation, not rolled back
    assert_eq!(accounts.get("123456").await.unwrap().balance, gbp("900.00"));

    // a retry under the same request id replays the failed attempt
    let replay = engine.execute(req).await.unwrap();
    assert!(replay.duplicate);
    assert_eq!(replay.status, TransactionStatus::Failure);
    assert_eq!(replay.transaction_id, entry.transaction_id);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_same_request_id_debits_once() {
    let env = env();
    let req = request("123456", "978654", "A00001", "100.00");

    let tasks = (0..8).map(|_| {
        let engine = env.engine.clone();
        let req = req.clone();
        tokio::spawn(async move { engine.execute(req).await })
    });
    let results: Vec<_> = join_all(tasks).await;

    let mut transaction_ids = Vec::new();
    let mut originals = 0;
    for r in results {
        let resp = r.unwrap().expect("every attempt resolves to the same entry");
        if !resp.duplicate {
            originals += 1;
        }
        transaction_ids.push(resp.transaction_id);
    }

    assert_eq!(originals, 1);
    transaction_ids.dedup();
    assert_eq!(transaction_ids.len(), 1);

    // debited exactly once
    assert_eq!(env.accounts.get("123456").await.unwrap().balance, gbp("900.00"));
    assert_eq!(env.accounts.get("978654").await.unwrap().balance, gbp("3100.00"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_transfers_never_overdraw() {
    let env = env();
    // 789123 holds 2000.00 and can afford two 700.00 transfers
    env.payees.register("789123", "Person2-Payee1", "978654", "A00001");
    let payee_before = env.accounts.get("978654").await.unwrap().balance;

    let requests: Vec<TransferRequest> = (0..10)
        .map(|_| request("789123", "978654", "A00001", "700.00"))
        .collect();
    let tasks = requests.iter().map(|req| {
        let engine = env.engine.clone();
        let req = req.clone();
        tokio::spawn(async move { engine.execute(req).await })
    });
    let results: Vec<_> = join_all(tasks).await;

    let mut successes = 0;
    for (req, r) in requests.iter().zip(results) {
        let entry = env.ledger.find_by_request_id(req.request_id).await.unwrap();
        match r.unwrap() {
            Ok(resp) => {
                assert_eq!(resp.status, TransactionStatus::Success);
                successes += 1;
            }
            // rejected by the balance pre-check, before any entry is opened
            Err(TransferError::InsufficientFunds { .. }) => {
                assert!(entry.is_none());
            }
            // a stale pre-check passed but the atomic debit lost the race;
            // the opened entry must survive as FAILURE with the cause
            Err(TransferError::Processing { .. }) => {
                let entry = entry.expect("debit failure must leave an entry");
                assert_eq!(entry.status, TransactionStatus::Failure);
                assert!(entry.error.is_some());
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 2);

    let payer_after = env.accounts.get("789123").await.unwrap().balance;
    assert_eq!(payer_after, gbp("600.00"));
    assert!(payer_after.amount >= Decimal::ZERO);

    let payee_after = env.accounts.get("978654").await.unwrap().balance;
    let credited = payee_after.checked_sub(&payee_before).unwrap();
    assert_eq!(credited, gbp("1400.00"));
}
