//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_policy::{IssueKind, PolicyForm, SubmissionOutcome};
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that the dealer's downstream selections are empty
pub fn assert_downstream_cleared(form: &PolicyForm) {
    let draft = form.draft();
    assert!(
        draft.customer_id().is_none(),
        "Expected customer to be cleared, found {:?}",
        draft.customer_id()
    );
    assert!(
        draft.vehicle_id().is_none(),
        "Expected vehicle to be cleared, found {:?}",
        draft.vehicle_id()
    );
}

/// Asserts that a successful submission carried a notice of the given kind
pub fn assert_has_notice(outcome: &SubmissionOutcome, kind: IssueKind) {
    assert!(
        outcome.notices.iter().any(|n| n.kind == kind),
        "Expected a {:?} notice, got {:?}",
        kind,
        outcome.notices
    );
}
