//! Keyed query behaviour under interleaved fetches
//!
//! Simulates a UI where the parent key changes while earlier fetches are
//! still in flight and their responses arrive out of order.

use core_kernel::{KeyedQuery, QueryState};
use proptest::prelude::*;

#[test]
fn test_out_of_order_responses_keep_latest() {
    let mut customers: KeyedQuery<&str, Vec<&str>> = KeyedQuery::new();

    customers.set_key(Some("D1"));
    let t1 = customers.begin().unwrap();
    customers.set_key(Some("D2"));
    let t2 = customers.begin().unwrap();
    customers.set_key(Some("D3"));
    let t3 = customers.begin().unwrap();

    assert!(customers.complete(t3, Ok(vec!["C3"])));
    assert!(!customers.complete(t1, Ok(vec!["C1"])));
    assert!(!customers.complete(t2, Err("late failure".to_string())));

    assert_eq!(customers.data(), Some(&vec!["C3"]));
}

#[test]
fn test_clearing_key_returns_to_idle() {
    let mut vehicles: KeyedQuery<u8, Vec<u8>> = KeyedQuery::new();
    vehicles.set_key(Some(1));
    let ticket = vehicles.begin().unwrap();
    vehicles.complete(ticket, Ok(vec![1]));

    vehicles.set_key(None);
    assert_eq!(vehicles.state(), &QueryState::Idle);
    assert!(!vehicles.needs_fetch());
}

proptest! {
    /// Only a ticket issued after the final re-key can land
    #[test]
    fn only_latest_ticket_lands(keys in proptest::collection::vec(0u8..4, 1..12)) {
        let mut query: KeyedQuery<u8, u8> = KeyedQuery::new();
        let mut tickets = Vec::new();
        for key in &keys {
            query.set_key(Some(*key));
            if let Some(ticket) = query.begin() {
                tickets.push(ticket);
            }
        }

        let latest_generation = tickets.last().map(|t| t.generation());
        for ticket in tickets.into_iter().rev() {
            let generation = ticket.generation();
            let key = *ticket.key();
            let landed = query.complete(ticket, Ok(key));
            prop_assert_eq!(landed, Some(generation) == latest_generation);
        }
        prop_assert_eq!(query.data().copied(), keys.last().copied());
    }
}
