//! Item and claim status vocabularies
//!
//! Both vocabularies are closed: the aggregation and escalation rules match
//! on them exhaustively, and anything arriving as text is parsed (and
//! rejected) at the boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

/// Resolution state of a single line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    /// Part delivered / accepted
    Yes,
    /// Part missing from the shipment
    Missing,
    /// Part owed by the company
    Debt,
    /// Still being processed
    InProgress,
    ScrapRejected,
    CutRejected,
    GlassRejected,
    /// Part refused
    No,
    RegionRejected,
    NotRequested,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 10] = [
        ItemStatus::Yes,
        ItemStatus::Missing,
        ItemStatus::Debt,
        ItemStatus::InProgress,
        ItemStatus::ScrapRejected,
        ItemStatus::CutRejected,
        ItemStatus::GlassRejected,
        ItemStatus::No,
        ItemStatus::RegionRejected,
        ItemStatus::NotRequested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Yes => "YES",
            ItemStatus::Missing => "MISSING",
            ItemStatus::Debt => "DEBT",
            ItemStatus::InProgress => "IN_PROGRESS",
            ItemStatus::ScrapRejected => "SCRAP_REJECTED",
            ItemStatus::CutRejected => "CUT_REJECTED",
            ItemStatus::GlassRejected => "GLASS_REJECTED",
            ItemStatus::No => "NO",
            ItemStatus::RegionRejected => "REGION_REJECTED",
            ItemStatus::NotRequested => "NOT_REQUESTED",
        }
    }

    /// Claim status a claim takes when every one of its items is in this status,
    /// for the statuses that have a uniform mapping
    pub fn uniform_claim_status(&self) -> Option<ClaimStatus> {
        match self {
            ItemStatus::InProgress => Some(ClaimStatus::NotProcessed),
            ItemStatus::ScrapRejected => Some(ClaimStatus::ScrapRejected),
            ItemStatus::CutRejected => Some(ClaimStatus::CutRejected),
            ItemStatus::GlassRejected => Some(ClaimStatus::GlassRejected),
            ItemStatus::Missing => Some(ClaimStatus::NoParts),
            ItemStatus::NotRequested => Some(ClaimStatus::NotRequested),
            ItemStatus::RegionRejected => Some(ClaimStatus::RegionRejected),
            ItemStatus::Yes | ItemStatus::Debt | ItemStatus::No => None,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ClaimError::UnknownStatus(s.to_string()))
    }
}

/// Aggregate resolution state of a claim, derived from its items
///
/// The vocabulary holds exactly the statuses [`aggregate`](crate::aggregation::aggregate)
/// can produce. Labels no item set derives to are left out, so every stored
/// claim status is reproducible from the claim's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Yes,
    YesExceptMissingAndGlass,
    YesExceptGlass,
    YesExceptMissing,
    YesExceptNotRequested,
    Partial,
    No,
    Debt,
    /// Nothing resolved yet (all items in progress, or no items at all)
    NotProcessed,
    ScrapRejected,
    CutRejected,
    GlassRejected,
    /// Every item missing
    NoParts,
    NotRequested,
    RegionRejected,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 15] = [
        ClaimStatus::Yes,
        ClaimStatus::YesExceptMissingAndGlass,
        ClaimStatus::YesExceptGlass,
        ClaimStatus::YesExceptMissing,
        ClaimStatus::YesExceptNotRequested,
        ClaimStatus::Partial,
        ClaimStatus::No,
        ClaimStatus::Debt,
        ClaimStatus::NotProcessed,
        ClaimStatus::ScrapRejected,
        ClaimStatus::CutRejected,
        ClaimStatus::GlassRejected,
        ClaimStatus::NoParts,
        ClaimStatus::NotRequested,
        ClaimStatus::RegionRejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Yes => "YES",
            ClaimStatus::YesExceptMissingAndGlass => "YES_EXCEPT_MISSING_AND_GLASS",
            ClaimStatus::YesExceptGlass => "YES_EXCEPT_GLASS",
            ClaimStatus::YesExceptMissing => "YES_EXCEPT_MISSING",
            ClaimStatus::YesExceptNotRequested => "YES_EXCEPT_NOT_REQUESTED",
            ClaimStatus::Partial => "PARTIAL",
            ClaimStatus::No => "NO",
            ClaimStatus::Debt => "DEBT",
            ClaimStatus::NotProcessed => "NOT_PROCESSED",
            ClaimStatus::ScrapRejected => "SCRAP_REJECTED",
            ClaimStatus::CutRejected => "CUT_REJECTED",
            ClaimStatus::GlassRejected => "GLASS_REJECTED",
            ClaimStatus::NoParts => "NO_PARTS",
            ClaimStatus::NotRequested => "NOT_REQUESTED",
            ClaimStatus::RegionRejected => "REGION_REJECTED",
        }
    }
}

impl Default for ClaimStatus {
    fn default() -> Self {
        ClaimStatus::NotProcessed
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ClaimError::UnknownStatus(s.to_string()))
    }
}
