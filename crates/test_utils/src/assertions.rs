//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use domain_claims::{Claim, ColorClass, CompanyUrgencyMetadata, Escalation};

/// Asserts that a claim's cached status matches its items
pub fn assert_claim_status_consistent(claim: &Claim) {
    let statuses: Vec<_> = claim.item_statuses().collect();
    assert!(
        claim.is_status_consistent(),
        "Claim {} caches {} but items {:?} derive {}",
        claim.id,
        claim.status,
        statuses,
        claim.derived_status()
    );
}

/// Asserts an escalation's color and that its rank belongs to that color
pub fn assert_escalation(escalation: &Escalation, expected: ColorClass) {
    assert_eq!(
        escalation.color, expected,
        "Expected {} escalation, got {}",
        expected, escalation.color
    );
    assert_eq!(
        escalation.severity_rank,
        expected.severity_rank(),
        "Severity rank {} does not match color {}",
        escalation.severity_rank,
        expected
    );
}

/// Asserts that metadata is ordered most urgent first
pub fn assert_ranked(ranked: &[CompanyUrgencyMetadata]) {
    for pair in ranked.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let key_a = (a.severity_rank, -a.days_in_state, -(a.item_count as i64));
        let key_b = (b.severity_rank, -b.days_in_state, -(b.item_count as i64));
        assert!(
            key_a <= key_b,
            "Company {} (rank {}, {} days, {} items) ordered before {} (rank {}, {} days, {} items)",
            a.company_id,
            a.severity_rank,
            a.days_in_state,
            a.item_count,
            b.company_id,
            b.severity_rank,
            b.days_in_state,
            b.item_count
        );
    }
}
