//! Claim status aggregation
//!
//! Collapses the statuses of a claim's line items into one [`ClaimStatus`].
//! The rules form a priority-ordered decision list: the first matching rule
//! wins. Only membership matters (plus "all items share one status"), so
//! the result never depends on item order.
//!
//! ```text
//! YES present      -> YES / YES_EXCEPT_* / PARTIAL
//! NO present       -> NO, or PARTIAL alongside DEBT
//! DEBT present     -> DEBT
//! one shared status -> its uniform claim status
//! no items         -> NOT_PROCESSED
//! anything else    -> PARTIAL
//! ```

use std::collections::BTreeSet;

use crate::status::{ClaimStatus, ItemStatus};

/// Distinct statuses present in an item multiset
#[derive(Debug, Clone, Default)]
struct StatusSet(BTreeSet<ItemStatus>);

impl StatusSet {
    fn has(&self, status: ItemStatus) -> bool {
        self.0.contains(&status)
    }

    fn has_any(&self, statuses: &[ItemStatus]) -> bool {
        statuses.iter().any(|s| self.has(*s))
    }

    fn has_none(&self, statuses: &[ItemStatus]) -> bool {
        !self.has_any(statuses)
    }

    /// The status shared by every item, if there is exactly one
    fn single(&self) -> Option<ItemStatus> {
        if self.0.len() == 1 {
            self.0.iter().next().copied()
        } else {
            None
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ItemStatus> for StatusSet {
    fn from_iter<I: IntoIterator<Item = ItemStatus>>(iter: I) -> Self {
        StatusSet(iter.into_iter().collect())
    }
}

/// Derives a claim status from the statuses of its line items
///
/// Total over every input, including the empty multiset.
pub fn aggregate<I>(statuses: I) -> ClaimStatus
where
    I: IntoIterator<Item = ItemStatus>,
{
    use ItemStatus::*;

    let set: StatusSet = statuses.into_iter().collect();

    if set.has(Yes) {
        return aggregate_with_yes(&set);
    }

    if set.has(No) {
        return if set.has(Debt) { ClaimStatus::Partial } else { ClaimStatus::No };
    }

    if set.has(Debt) {
        // YES is handled above, so the PARTIAL arm never fires today.
        return if set.has(Yes) { ClaimStatus::Partial } else { ClaimStatus::Debt };
    }

    if let Some(uniform) = set.single().and_then(|s| s.uniform_claim_status()) {
        return uniform;
    }

    if set.is_empty() {
        return ClaimStatus::NotProcessed;
    }

    ClaimStatus::Partial
}

fn aggregate_with_yes(set: &StatusSet) -> ClaimStatus {
    use ItemStatus::*;

    if set.has(GlassRejected) && set.has(Missing) && set.has_none(&[No, Debt]) {
        ClaimStatus::YesExceptMissingAndGlass
    } else if set.has(GlassRejected) && set.has_none(&[No, Missing]) {
        ClaimStatus::YesExceptGlass
    } else if set.has(Missing) && set.has_none(&[No, Debt]) {
        ClaimStatus::YesExceptMissing
    } else if set.has(NotRequested) && set.has_none(&[InProgress, No, Debt]) {
        ClaimStatus::YesExceptNotRequested
    } else if set.has_none(&[No, Debt, Missing, GlassRejected, NotRequested]) {
        ClaimStatus::Yes
    } else {
        // Every remaining combination holds one of NO, DEBT, MISSING or IN_PROGRESS.
        debug_assert!(set.has_any(&[No, Debt, Missing, InProgress]));
        ClaimStatus::Partial
    }
}

/// Stateless handle over [`aggregate`] for callers that inject components
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemStatusAggregator;

impl ItemStatusAggregator {
    pub fn aggregate<I>(&self, statuses: I) -> ClaimStatus
    where
        I: IntoIterator<Item = ItemStatus>,
    {
        aggregate(statuses)
    }
}
