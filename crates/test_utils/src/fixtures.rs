//! Pre-built Test Fixtures
//!
//! Fixed reference points so that day counts in tests are predictable.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use core_kernel::DistrictId;
use once_cell::sync::Lazy;

/// Shared district for scenarios that only need one
pub static NORTH_DISTRICT: Lazy<DistrictId> = Lazy::new(DistrictId::new_v7);

/// Second district for filtering tests
pub static SOUTH_DISTRICT: Lazy<DistrictId> = Lazy::new(DistrictId::new_v7);

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The "current" instant used by scenarios (Sep 20, 2024, noon UTC)
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 20, 12, 0, 0).unwrap()
    }

    /// Calendar date of [`Self::now`] in UTC
    pub fn today() -> NaiveDate {
        Self::now().date_naive()
    }

    /// `days` whole days before [`Self::now`]
    pub fn days_ago(days: i64) -> DateTime<Utc> {
        Self::now() - Duration::days(days)
    }

    /// `hours` before [`Self::now`]
    pub fn hours_ago(hours: i64) -> DateTime<Utc> {
        Self::now() - Duration::hours(hours)
    }

    /// Date `days` after [`Self::today`]
    pub fn date_in(days: i64) -> NaiveDate {
        Self::today() + Duration::days(days)
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    pub fn claim_number() -> &'static str {
        "CLM-2024-000123"
    }

    pub fn company_name() -> &'static str {
        "Northside Body Repair"
    }

    pub fn suppression_flag() -> &'static str {
        "Overdue"
    }
}
