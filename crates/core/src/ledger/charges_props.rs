//! Property-based tests for ReservationLedger.
//!
//! - Total consistency: after any attach/detach/update sequence the total
//!   equals base plus the sum of unit price x quantity of the remaining lines.
//! - Attach never produces two lines for the same service.

use chrono::{NaiveDate, Utc};
use innkeep_shared::types::{
    CustomerId, Money, ReservationId, RoomId, ServiceItemId, UserId,
};
use proptest::prelude::*;

use super::charges::ReservationLedger;
use crate::error::HotelError;
use crate::model::{DateRange, Reservation, ReservationStatus, ServiceItem, ServiceLine};

#[derive(Debug, Clone)]
enum Op {
    Attach { item: usize, quantity: i64 },
    Detach { item: usize },
    Update { item: usize, quantity: i64 },
    Reprice { item: usize, cents: i64 },
}

/// Strategy for unit prices (0.01 to 999,999.99).
fn unit_price() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for quantities, including invalid ones.
fn quantity() -> impl Strategy<Value = i64> {
    prop_oneof![4 => 1i64..50, 1 => -5i64..1, 1 => 9_990i64..10_010]
}

fn op(catalog_size: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..catalog_size, quantity()).prop_map(|(item, quantity)| Op::Attach { item, quantity }),
        (0..catalog_size).prop_map(|item| Op::Detach { item }),
        (0..catalog_size, quantity()).prop_map(|(item, quantity)| Op::Update { item, quantity }),
        (0..catalog_size, unit_price()).prop_map(|(item, cents)| Op::Reprice { item, cents }),
    ]
}

fn reservation(base: i64) -> Reservation {
    let now = Utc::now();
    Reservation {
        id: ReservationId::new(),
        room_id: RoomId::new(),
        customer_id: CustomerId::new(),
        created_by: UserId::new(),
        dates: DateRange::new(
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 3).unwrap(),
        )
        .unwrap(),
        status: ReservationStatus::Confirmed,
        base_amount: Money::from_minor(base),
        stored_total: Money::from_minor(base),
        created_at: now,
        updated_at: now,
    }
}

fn catalog(prices: &[i64]) -> Vec<ServiceItem> {
    let now = Utc::now();
    prices
        .iter()
        .enumerate()
        .map(|(i, cents)| ServiceItem {
            id: ServiceItemId::new(),
            name: format!("Service {i}"),
            unit_price: Money::from_minor(*cents),
            created_at: now,
            updated_at: now,
        })
        .collect()
}

fn line_for(lines: &[ServiceLine], item: ServiceItemId) -> Option<usize> {
    lines.iter().position(|l| l.service_item_id == item)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: total always equals base + sum(frozen price x quantity).
    #[test]
    fn prop_total_consistent_after_any_sequence(
        base in 1i64..10_000_000_000i64,
        prices in prop::collection::vec(unit_price(), 1..6),
        ops in prop::collection::vec(op(6), 0..40),
    ) {
        let res = reservation(base);
        let mut items = catalog(&prices);
        let mut lines: Vec<ServiceLine> = Vec::new();
        // Expected model: item index -> (frozen price, quantity)
        let mut expected: Vec<Option<(i64, i64)>> = vec![None; items.len()];

        for op in ops {
            match op {
                Op::Attach { item, quantity } if item < items.len() => {
                    match ReservationLedger::attach(&res, &lines, &items[item], quantity, Utc::now()) {
                        Ok(line) => {
                            prop_assert!(expected[item].is_none());
                            expected[item] = Some((items[item].unit_price.minor_units(), quantity));
                            lines.push(line);
                        }
                        Err(HotelError::AlreadyAttached { .. }) => prop_assert!(expected[item].is_some()),
                        Err(HotelError::InvalidQuantity(_)) => {
                            prop_assert!(!(1..=9_999).contains(&quantity));
                        }
                        Err(other) => prop_assert!(false, "unexpected error {other:?}"),
                    }
                }
                Op::Detach { item } if item < items.len() => {
                    let target = line_for(&lines, items[item].id);
                    if let Some(pos) = target {
                        let line_id = lines[pos].id;
                        prop_assert!(ReservationLedger::detach(res.id, &lines, line_id).is_ok());
                        lines.remove(pos);
                        expected[item] = None;
                    }
                }
                Op::Update { item, quantity } if item < items.len() => {
                    if let Some(pos) = line_for(&lines, items[item].id) {
                        let line_id = lines[pos].id;
                        match ReservationLedger::update_quantity(res.id, &lines, line_id, quantity) {
                            Ok(updated) => {
                                lines[pos] = updated;
                                if let Some(entry) = expected[item].as_mut() {
                                    entry.1 = quantity;
                                }
                            }
                            Err(e) => prop_assert!(matches!(e, HotelError::InvalidQuantity(_))),
                        }
                    }
                }
                Op::Reprice { item, cents } if item < items.len() => {
                    items[item].unit_price = Money::from_minor(cents);
                }
                _ => {}
            }

            let expected_total: i64 = base
                + expected
                    .iter()
                    .flatten()
                    .map(|(price, qty)| price * qty)
                    .sum::<i64>();
            let total = ReservationLedger::total(res.base_amount, &lines).unwrap();
            prop_assert_eq!(total.minor_units(), expected_total);
            prop_assert!(total >= res.base_amount);
        }
    }

    /// Property: a service is never attached twice.
    #[test]
    fn prop_attach_is_unique_per_service(
        prices in prop::collection::vec(unit_price(), 1..4),
        picks in prop::collection::vec(0usize..4, 1..20),
    ) {
        let res = reservation(10_000);
        let items = catalog(&prices);
        let mut lines = Vec::new();
        for pick in picks {
            if let Some(item) = items.get(pick) {
                if let Ok(line) = ReservationLedger::attach(&res, &lines, item, 1, Utc::now()) {
                    lines.push(line);
                }
            }
        }
        for item in &items {
            let count = lines.iter().filter(|l| l.service_item_id == item.id).count();
            prop_assert!(count <= 1);
        }
    }
}
