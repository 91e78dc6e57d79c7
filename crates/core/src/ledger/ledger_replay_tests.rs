#[cfg(test)]
mod tests {
    use crate::errors::{Error, ValidationError};
    use crate::ledger::{replay_ledger, LedgerEntry};
    use crate::units::{TransactionType, UnitAccountingEngine, UnitError, UnitOperation};
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, d, 0, 0, 0).unwrap()
    }

    fn entry(
        d: u32,
        entry_type: TransactionType,
        member_id: Option<&str>,
        amount: Option<Decimal>,
    ) -> LedgerEntry {
        LedgerEntry {
            timestamp: day(d),
            entry_type,
            member_id: member_id.map(str::to_string),
            amount,
            units: None,
            notes: None,
        }
    }

    fn club_ledger() -> Vec<LedgerEntry> {
        vec![
            entry(1, TransactionType::SeedPrice, None, Some(dec!(10))),
            entry(2, TransactionType::Deposit, Some("alice"), Some(dec!(1000))),
            entry(3, TransactionType::Deposit, Some("bob"), Some(dec!(3000))),
            entry(10, TransactionType::Revaluation, None, Some(dec!(4400))),
            entry(11, TransactionType::Withdrawal, Some("bob"), Some(dec!(1100))),
            LedgerEntry {
                units: Some(dec!(5)),
                ..entry(12, TransactionType::UnitAdjustment, Some("carol"), None)
            },
        ]
    }

    #[test]
    fn test_replay_builds_consistent_fund() {
        let mut engine = UnitAccountingEngine::default();

        let summary = replay_ledger(&mut engine, &club_ledger()).unwrap();

        assert_eq!(summary.entries_applied, 6);
        assert_eq!(summary.deposits, 2);
        assert_eq!(summary.withdrawals, 1);
        assert_eq!(summary.revaluations, 1);
        assert_eq!(summary.adjustments, 1);
        // 400 units at 11.00 after the revaluation; bob redeems 100, carol gets 5
        assert_eq!(summary.unit_price, Some(dec!(11)));
        assert_eq!(summary.total_units, dec!(305));
        assert_eq!(summary.total_value, dec!(3355));
        assert_eq!(engine.position("bob").unwrap().units_owned, dec!(200));
        assert_eq!(engine.position("carol").unwrap().units_owned, dec!(5));
        assert_eq!(engine.transactions().len(), 6);
        assert_eq!(engine.transactions()[1].timestamp, day(2));
        engine.reconcile().unwrap();
    }

    #[test]
    fn test_failing_row_aborts_whole_import() {
        let mut engine = UnitAccountingEngine::default();
        let mut ledger = club_ledger();
        ledger.push(entry(
            20,
            TransactionType::Withdrawal,
            Some("alice"),
            Some(dec!(999999)),
        ));

        let err = replay_ledger(&mut engine, &ledger).unwrap_err();

        match &err {
            Error::Import { index, source } => {
                assert_eq!(*index, 6);
                assert!(matches!(
                    source.as_unit_error(),
                    Some(UnitError::InsufficientFundValue { .. })
                ));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(engine.transactions().is_empty());
        assert_eq!(engine.current_unit_price(), None);
    }

    #[test]
    fn test_out_of_order_rows_rejected() {
        let mut engine = UnitAccountingEngine::default();
        let ledger = vec![
            entry(5, TransactionType::SeedPrice, None, Some(dec!(10))),
            entry(4, TransactionType::Deposit, Some("alice"), Some(dec!(100))),
        ];

        let err = replay_ledger(&mut engine, &ledger).unwrap_err();
        assert!(matches!(err, Error::Import { index: 1, .. }));
    }

    #[test]
    fn test_missing_member_reported_as_validation_error() {
        let row = entry(1, TransactionType::Deposit, Some("  "), Some(dec!(10)));
        let err = row.to_new_transaction().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField(ref f)) if f == "memberId"
        ));
    }

    #[test]
    fn test_withdrawal_without_amount_closes_position() {
        let row = entry(1, TransactionType::Withdrawal, Some("alice"), None);
        let request = row.to_new_transaction().unwrap();
        assert_eq!(
            request.operation,
            UnitOperation::WithdrawAll {
                member_id: "alice".to_string()
            }
        );
        assert_eq!(request.timestamp, Some(day(1)));
    }

    #[test]
    fn test_ledger_entry_deserializes_from_json() {
        let json = r#"{
            "timestamp": "2023-01-02T00:00:00Z",
            "entryType": "DEPOSIT",
            "memberId": "alice",
            "amount": 250.5,
            "units": null,
            "notes": "January dues"
        }"#;
        let row: LedgerEntry = serde_json::from_str(json).unwrap();
        assert_eq!(row.entry_type, TransactionType::Deposit);
        assert_eq!(row.amount, Some(dec!(250.5)));
        assert_eq!(row.timestamp, day(2));
    }
}
