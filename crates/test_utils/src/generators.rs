//! Property-Based Test Generators
//!
//! Provides proptest strategies for item statuses and escalation inputs.

use chrono::{Duration, NaiveDate};
use domain_claims::{EscalationInput, ItemStatus, PlannedWindow};
use proptest::prelude::*;

/// Strategy for any item status
pub fn item_status_strategy() -> impl Strategy<Value = ItemStatus> {
    prop::sample::select(ItemStatus::ALL.to_vec())
}

/// Strategy for item status multisets of up to `max_len` entries
pub fn item_statuses_strategy(max_len: usize) -> impl Strategy<Value = Vec<ItemStatus>> {
    prop::collection::vec(item_status_strategy(), 0..=max_len)
}

/// Strategy for a planned visit between a week ago and a month ahead
pub fn planned_window_strategy() -> impl Strategy<Value = PlannedWindow> {
    (-7i64..=30i64).prop_map(|days_until| PlannedWindow {
        date: reference_date() + Duration::days(days_until),
        days_until,
    })
}

/// Strategy for an optional claim-type flag, sometimes the suppression flag
pub fn claim_type_flag_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => Just(None),
        1 => Just(Some("Overdue".to_string())),
        1 => Just(Some("Warranty".to_string())),
    ]
}

/// Strategy for consistent escalation inputs (debt items never exceed items)
pub fn escalation_input_strategy() -> impl Strategy<Value = EscalationInput> {
    (
        prop::option::of(planned_window_strategy()),
        -2i64..60i64,
        0usize..20usize,
        claim_type_flag_strategy(),
    )
        .prop_flat_map(|(planned, days_in_state, item_count, claim_type_flag)| {
            (0..=item_count).prop_map(move |debt_item_count| EscalationInput {
                planned,
                days_in_state,
                item_count,
                debt_item_count,
                claim_type_flag: claim_type_flag.clone(),
            })
        })
}

fn reference_date() -> NaiveDate {
    crate::fixtures::TemporalFixtures::today()
}
