//! Property-based tests for the stock ledger.
//!
//! Run with: cargo test -p stockroom-inventory --test ledger_properties

use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use stockroom_auth::{Actor, Role};
use stockroom_core::DomainError;
use stockroom_inventory::{
    Destination, StockInRequest, StockLedger, StockOutRequest, StockPosition, UsageRequest,
    initial_unit_cost, merge_lot,
};

// ============================================================================
// Helpers
// ============================================================================

fn admin() -> Actor {
    Actor::new("Admin", Role::Admin)
}

fn stock_in(name: &str, quantity: i64, total_cost: Decimal, min: i64) -> StockInRequest {
    StockInRequest {
        name: name.to_string(),
        size: "1kg".to_string(),
        quantity,
        supplier: "Wholesale Ltd".to_string(),
        total_cost,
        min_stock_level: min,
        occurred_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
    }
}

fn stock_out(item: &stockroom_inventory::Item, quantity: i64) -> StockOutRequest {
    StockOutRequest {
        item_id: item.id_typed(),
        quantity,
        taker: "Line Cook".to_string(),
        destination: Destination::Kitchen,
        occurred_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

fn arb_lot() -> impl Strategy<Value = (i64, Decimal)> {
    (1i64..500, 0i64..500_000).prop_map(|(q, cents)| (q, Decimal::new(cents, 2)))
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

// ============================================================================
// Concrete scenarios
// ============================================================================

#[test]
fn flour_scenario() {
    let ledger = StockLedger::new();
    let item = ledger.stock_in(&admin(), stock_in("Flour", 10, dec!(20.00), 5)).unwrap();
    assert_eq!(item.quantity(), 10);
    assert_eq!(item.unit_cost(), dec!(2.00));

    let item = ledger.stock_in(&admin(), stock_in("Flour", 5, dec!(12.50), 5)).unwrap();
    assert_eq!(item.quantity(), 15);
    assert_eq!(item.unit_cost(), dec!(2.17));

    let err = ledger.stock_out(&admin(), stock_out(&item, 20)).unwrap_err();
    assert!(matches!(err, DomainError::InsufficientStock { .. }));
    assert_eq!(ledger.find_by_id(item.id_typed()).unwrap().quantity(), 15);
}

#[test]
fn usage_scenario() {
    let ledger = StockLedger::new();
    let item = ledger.stock_in(&admin(), stock_in("Milk", 10, dec!(12.00), 2)).unwrap();
    let chef = Actor::new("Chef", Role::Chef);

    let record = ledger
        .log_usage(
            &chef,
            UsageRequest {
                item_id: item.id_typed(),
                quantity_taken: 10,
                quantity_used: 3,
                claimed_remaining: Some(7),
                occurred_at: Utc::now(),
            },
        )
        .unwrap();
    assert_eq!(record.quantity_remaining, 7);

    let err = ledger
        .log_usage(
            &chef,
            UsageRequest {
                item_id: item.id_typed(),
                quantity_taken: 10,
                quantity_used: 12,
                claimed_remaining: None,
                occurred_at: Utc::now(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidUsage(_)));
    assert_eq!(ledger.usage_records().len(), 1);
}

#[test]
fn concurrent_mutations_do_not_lose_updates() {
    let ledger = Arc::new(StockLedger::new());
    let item = ledger.stock_in(&admin(), stock_in("Rice", 1000, dec!(1000.00), 0)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ledger = Arc::clone(&ledger);
            let item = item.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    if i % 2 == 0 {
                        ledger.stock_out(&admin(), stock_out(&item, 2)).unwrap();
                    } else {
                        ledger.stock_in(&admin(), stock_in("Rice", 1, dec!(1.00), 0)).unwrap();
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // 4 threads × 50 × -2, 4 threads × 50 × +1
    let final_item = ledger.find_by_id(item.id_typed()).unwrap();
    assert_eq!(final_item.quantity(), 1000 - 400 + 200);
    assert_eq!(ledger.stock_out_records().len(), 200);
    assert_eq!(ledger.stock_in_records().len(), 201);
    assert_eq!(ledger.revision(), 401);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Repeated stock-ins fold left to right, rounding at every step.
    #[test]
    fn stock_in_sequence_matches_left_fold(lots in prop::collection::vec(arb_lot(), 1..12)) {
        let ledger = StockLedger::new();
        let mut last = None;
        for (q, cost) in &lots {
            last = Some(ledger.stock_in(&admin(), stock_in("Flour", *q, *cost, 0)).unwrap());
        }
        let item = last.unwrap();

        let (q0, c0) = lots[0];
        let mut expected = StockPosition { quantity: q0, unit_cost: initial_unit_cost(q0, c0) };
        for (q, cost) in &lots[1..] {
            expected = StockPosition {
                quantity: expected.quantity + q,
                unit_cost: merge_lot(expected, *q, *cost),
            };
        }

        prop_assert_eq!(item.quantity(), lots.iter().map(|(q, _)| q).sum::<i64>());
        prop_assert_eq!(item.unit_cost(), expected.unit_cost);
        prop_assert!(item.unit_cost() >= Decimal::ZERO);
    }

    /// Oversized stock-outs always fail and change nothing.
    #[test]
    fn stock_out_never_goes_negative(on_hand in 1i64..1000, extra in 1i64..1000) {
        let ledger = StockLedger::new();
        let item = ledger.stock_in(&admin(), stock_in("Oil", on_hand, dec!(10.00), 0)).unwrap();

        let err = ledger.stock_out(&admin(), stock_out(&item, on_hand + extra)).unwrap_err();
        let is_insufficient = matches!(err, DomainError::InsufficientStock { .. });
        prop_assert!(is_insufficient);
        prop_assert_eq!(ledger.find_by_id(item.id_typed()).unwrap(), item.clone());

        let outcome = ledger.stock_out(&admin(), stock_out(&item, on_hand)).unwrap();
        prop_assert_eq!(outcome.item.quantity(), 0);
    }

    /// Low-stock alerts are exactly the items at or below their minimum.
    #[test]
    fn low_stock_alerts_are_exact(
        catalog in prop::collection::vec((1i64..50, 0i64..50, 0i64..50), 1..20)
    ) {
        let ledger = StockLedger::new();
        for (idx, (quantity, min, withdraw)) in catalog.iter().enumerate() {
            let item = ledger
                .stock_in(&admin(), stock_in(&format!("Item {idx:02}"), *quantity, dec!(5.00), *min))
                .unwrap();
            let take = (*withdraw).min(*quantity);
            if take > 0 {
                ledger.stock_out(&admin(), stock_out(&item, take)).unwrap();
            }
        }

        let alerts = ledger.low_stock_alerts();
        let mut expected: Vec<_> = ledger.list().into_iter().filter(|i| i.quantity() <= i.min_stock_level()).collect();
        prop_assert_eq!(alerts.len(), expected.len());
        for alert in &alerts {
            prop_assert!(alert.quantity() <= alert.min_stock_level());
        }
        for pair in alerts.windows(2) {
            prop_assert!(pair[0].headroom() <= pair[1].headroom());
        }
        expected.sort_by_key(|i| i.id_typed());
        let mut got = alerts.clone();
        got.sort_by_key(|i| i.id_typed());
        prop_assert_eq!(got, expected);
    }

    /// Kitchen roles are always refused stock movements; everyone may log usage.
    #[test]
    fn role_enforcement(role in arb_role(), quantity in 1i64..100) {
        let ledger = StockLedger::new();
        let item = ledger.stock_in(&admin(), stock_in("Beans", 100, dec!(100.00), 0)).unwrap();
        let actor = Actor::new("someone", role);
        let may_move = matches!(role, Role::Admin | Role::StockKeeper);

        let result = ledger.stock_in(&actor, stock_in("Beans", quantity, dec!(1.00), 0));
        prop_assert_eq!(result.is_ok(), may_move);
        if let Err(err) = result {
            let is_authz = matches!(err, DomainError::Authorization { .. });
            prop_assert!(is_authz);
        }

        let result = ledger.stock_out(&actor, stock_out(&item, quantity));
        prop_assert_eq!(result.is_ok(), may_move);

        let usage = ledger.log_usage(&actor, UsageRequest {
            item_id: item.id_typed(),
            quantity_taken: quantity,
            quantity_used: 1,
            claimed_remaining: None,
            occurred_at: Utc::now(),
        });
        prop_assert!(usage.is_ok());
    }

    /// Snapshot → JSON → restore reproduces the same state.
    #[test]
    fn snapshot_json_round_trip(lots in prop::collection::vec(arb_lot(), 1..6), take in 0i64..5) {
        let ledger = StockLedger::new();
        let mut item = None;
        for (q, cost) in &lots {
            item = Some(ledger.stock_in(&admin(), stock_in("Tea", *q, *cost, 3)).unwrap());
        }
        let item = item.unwrap();
        if take > 0 && take <= item.quantity() {
            ledger.stock_out(&admin(), stock_out(&item, take)).unwrap();
        }

        let snapshot = ledger.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored = StockLedger::restore(
            serde_json::from_str(&json).unwrap(),
            ledger.policy(),
        ).unwrap();
        prop_assert_eq!(restored.snapshot(), snapshot);
    }
}
