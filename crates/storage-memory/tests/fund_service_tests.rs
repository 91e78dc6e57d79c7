//! End-to-end tests of the fund service over the in-memory repository.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use clubfund_core::errors::{DatabaseError, Error};
use clubfund_core::ledger::LedgerEntry;
use clubfund_core::settings::FundSettings;
use clubfund_core::units::{
    FundRepositoryTrait, FundService, FundServiceTrait, FundSnapshot, FundState, MemberPosition,
    NewTransaction, TransactionType, UnitAccountingEngine, UnitError, UnitOperation,
};
use clubfund_storage_memory::InMemoryFundRepository;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn new_service() -> (Arc<InMemoryFundRepository>, FundService) {
    let repo = Arc::new(InMemoryFundRepository::new());
    let service = FundService::new(repo.clone(), FundSettings::default());
    (repo, service)
}

#[tokio::test]
async fn test_club_lifecycle() {
    let (repo, service) = new_service();

    assert_eq!(service.get_unit_price().unwrap(), None);
    let err = service.deposit("alice", dec!(100)).await.unwrap_err();
    assert!(matches!(
        err.as_unit_error(),
        Some(UnitError::UndefinedPrice(_))
    ));
    assert!(!err.is_user_error());

    service.seed_price(dec!(50)).await.unwrap();
    service.deposit("alice", dec!(5000)).await.unwrap();
    service.deposit("bob", dec!(2500)).await.unwrap();
    let reval = service.revalue(dec!(9000)).await.unwrap();
    assert_eq!(reval.old_price, dec!(50));
    assert_eq!(reval.new_price, dec!(60));
    assert_eq!(reval.pct_change, Some(dec!(20)));

    let withdrawal = service.withdraw("alice", dec!(1200)).await.unwrap();
    assert_eq!(withdrawal.units_removed, dec!(20));
    assert_eq!(withdrawal.new_unit_price, dec!(60));

    let closed = service.withdraw_all("bob").await.unwrap();
    assert_eq!(closed.units_removed, dec!(50));
    assert_eq!(closed.cash_paid, dec!(3000));

    let summary = service.get_fund_summary().unwrap();
    assert_eq!(summary.total_value, dec!(4800));
    assert_eq!(summary.total_units, dec!(80));
    assert_eq!(summary.unit_price, Some(dec!(60)));
    assert_eq!(summary.member_count, 1);
    assert_eq!(summary.transaction_count, 6);
    assert_eq!(summary.base_currency, "USD");

    let bob_history = service.get_transactions(Some("bob")).unwrap();
    assert_eq!(bob_history.len(), 2);
    assert_eq!(bob_history[1].transaction_type, TransactionType::Withdrawal);
    assert_eq!(bob_history[1].cash_amount, Some(dec!(-3000)));

    let stored = repo.load().unwrap();
    assert_eq!(stored.positions.len(), 2);
    service.reconcile().unwrap();
}

#[tokio::test]
async fn test_recorded_transaction_keeps_timestamp_and_notes() {
    let (_repo, service) = new_service();
    service.seed_price(dec!(10)).await.unwrap();
    let at = Utc.with_ymd_and_hms(2021, 11, 30, 18, 0, 0).unwrap();

    let tx = service
        .record(NewTransaction {
            operation: UnitOperation::UnitAdjustment {
                member_id: "treasurer".to_string(),
                units_delta: dec!(12.5),
            },
            timestamp: Some(at),
            notes: Some("Founding allocation".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(tx.cash_amount, Some(dec!(125)));
    let stored = service.get_transactions(None).unwrap();
    assert_eq!(stored.last().unwrap().timestamp, at);
    assert_eq!(
        stored.last().unwrap().notes.as_deref(),
        Some("Founding allocation")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mixed_operations_keep_invariants() {
    let (repo, service) = new_service();
    let service = Arc::new(service);
    service.seed_price(dec!(25)).await.unwrap();
    for member in ["alice", "bob", "carol"] {
        service.deposit(member, dec!(10000)).await.unwrap();
    }

    let mut handles = Vec::new();
    for i in 0..30 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let member = ["alice", "bob", "carol"][i % 3];
            if i % 2 == 0 {
                service.deposit(member, dec!(250)).await.map(|_| ())
            } else {
                service.withdraw(member, dec!(100)).await.map(|_| ())
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // 15 deposits of 250 and 15 withdrawals of 100 at a constant price of 25
    let snapshot = repo.load().unwrap();
    assert_eq!(snapshot.fund.total_value, dec!(32250));
    assert_eq!(snapshot.fund.total_units, dec!(1290));
    let units_sum: Decimal = snapshot.positions.iter().map(|p| p.units_owned).sum();
    assert_eq!(units_sum, snapshot.fund.total_units);
    assert_eq!(service.get_transactions(None).unwrap().len(), 34);
}

#[tokio::test]
async fn test_out_of_band_write_is_detected() {
    // Raw rows from a bulk upsert that skipped the engine.
    let repo = Arc::new(InMemoryFundRepository::with_snapshot(FundSnapshot {
        fund: FundState {
            total_value: dec!(913810.31),
            total_units: dec!(18175.61),
            reference_price: None,
        },
        positions: vec![
            MemberPosition {
                member_id: "alice".to_string(),
                units_owned: dec!(10000),
                total_contributed: dec!(400000),
            },
            MemberPosition {
                member_id: "bob".to_string(),
                units_owned: dec!(8000),
                total_contributed: dec!(350000),
            },
        ],
    }));
    let service = FundService::new(repo.clone(), FundSettings::default());

    let err = service.reconcile().unwrap_err();
    assert!(matches!(
        err.as_unit_error(),
        Some(UnitError::InvariantViolation(_))
    ));
    let err = service.withdraw("alice", dec!(10)).await.unwrap_err();
    assert!(matches!(
        err.as_unit_error(),
        Some(UnitError::InvariantViolation(_))
    ));
    assert!(service.get_transactions(None).unwrap().is_empty());
}

#[tokio::test]
async fn test_ledger_import_replays_history() {
    let (_repo, service) = new_service();
    let at = |m| Utc.with_ymd_and_hms(2020, m, 1, 0, 0, 0).unwrap();
    let row = |m, entry_type, member: Option<&str>, amount| LedgerEntry {
        timestamp: at(m),
        entry_type,
        member_id: member.map(str::to_string),
        amount,
        units: None,
        notes: None,
    };
    let entries = vec![
        row(1, TransactionType::SeedPrice, None, Some(dec!(20))),
        row(1, TransactionType::Deposit, Some("alice"), Some(dec!(2000))),
        row(2, TransactionType::Deposit, Some("bob"), Some(dec!(2000))),
        row(3, TransactionType::Revaluation, None, Some(dec!(3000))),
        row(4, TransactionType::Withdrawal, Some("bob"), None),
    ];

    let summary = service.import_ledger(entries).await.unwrap();

    assert_eq!(summary.entries_applied, 5);
    assert_eq!(summary.unit_price, Some(dec!(15)));
    assert_eq!(summary.total_value, dec!(1500));
    assert_eq!(summary.total_units, dec!(100));
    let bob = service.get_member_summary("bob").unwrap();
    assert_eq!(bob.units_owned, Decimal::ZERO);
    assert_eq!(bob.unrealized_gain, dec!(-500));
    assert_eq!(service.get_transactions(None).unwrap()[3].timestamp, at(3));
}

#[tokio::test]
async fn test_replayed_commit_is_refused() {
    let repo = InMemoryFundRepository::new();
    let mut engine = UnitAccountingEngine::default();
    engine.seed_price(dec!(25)).unwrap();
    engine.deposit("alice", dec!(1000)).unwrap();
    let commit = engine.drain_commit();

    repo.commit(commit.clone()).await.unwrap();
    let stored = repo.load().unwrap();

    let mut replay = commit;
    replay.fund.total_value = dec!(2000);
    let err = repo.commit(replay).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Database(DatabaseError::TransactionFailed(_))
    ));
    assert_eq!(repo.load().unwrap(), stored);
    assert_eq!(repo.list_transactions(None).unwrap().len(), 2);
}
