//! Collaborator ports of the escalation engine
//!
//! The engine reads and writes claims, companies, planned visits and the
//! change log exclusively through these traits. Components hold them as
//! `Arc<dyn Port>` so one adapter instance can back several components.
//!
//! ```rust,ignore
//! let store = Arc::new(InMemoryClaimStore::new());
//! let log = Arc::new(InMemoryChangeLog::new());
//!
//! let service = LineItemService::new(store.clone(), log.clone());
//! service.update_item_status(item_id, ItemStatus::Debt)?;
//! ```

use chrono::{DateTime, Utc};

use core_kernel::{ClaimId, CompanyId, DistrictId, DomainPort, LineItemId, PortError};

use crate::change_log::{ChangeEvent, TrackedField};
use crate::claim::{Claim, LineItem};
use crate::company::{Company, PlannedVisitDate};
use crate::recalculation::{ItemMutation, StatusRecalculation};
use crate::status::{ClaimStatus, ItemStatus};

/// Derives a claim status from the claim's current item statuses
pub type StatusDerivation = dyn Fn(&[ItemStatus]) -> ClaimStatus;

/// Read side of the append-only change log
pub trait ChangeLogReader: DomainPort {
    /// Returns the recorded transitions of `field` for the given items,
    /// ordered ascending by timestamp
    ///
    /// Items without any recorded transition simply contribute no events.
    fn events_for(
        &self,
        item_ids: &[LineItemId],
        field: TrackedField,
    ) -> Result<Vec<ChangeEvent>, PortError>;
}

/// Write side of the change log; entries are never updated or removed
pub trait ChangeLogWriter: DomainPort {
    fn append(&self, event: ChangeEvent) -> Result<(), PortError>;
}

/// Read/write access to claims and their line items
pub trait ClaimRepository: DomainPort {
    fn get_claim(&self, claim_id: ClaimId) -> Result<Claim, PortError>;

    /// All claims owned by any of the given companies
    fn claims_for_companies(&self, company_ids: &[CompanyId]) -> Result<Vec<Claim>, PortError>;

    fn insert_claim(&self, claim: Claim) -> Result<(), PortError>;

    /// Looks up a line item regardless of the claim it belongs to
    fn find_item(&self, item_id: LineItemId) -> Result<LineItem, PortError>;

    /// Attaches a new item to the claim named by `item.claim_id`
    ///
    /// Every item write below re-derives the claim status with `derive` and
    /// stores it before the claim is visible to any reader again: the item
    /// change and the status refresh form one critical section scoped to the
    /// claim. A duplicate item id is a `Conflict`.
    fn insert_item(&self, item: LineItem, derive: &StatusDerivation) -> Result<ItemMutation, PortError>;

    /// Sets an item's status
    ///
    /// Setting the status the item already has changes nothing and yields no
    /// recalculation.
    fn update_item_status(
        &self,
        item_id: LineItemId,
        status: ItemStatus,
        at: DateTime<Utc>,
        derive: &StatusDerivation,
    ) -> Result<ItemMutation, PortError>;

    /// Removes an item from its claim
    fn delete_item(
        &self,
        item_id: LineItemId,
        at: DateTime<Utc>,
        derive: &StatusDerivation,
    ) -> Result<ItemMutation, PortError>;

    /// Reads the claim's current item statuses, derives the claim status with
    /// `derive` and stores it, as one atomic step scoped to the claim
    ///
    /// Implementations must serialize concurrent calls for the same claim
    /// (row lock, per-claim mutex or optimistic retry).
    fn recompute_status(
        &self,
        claim_id: ClaimId,
        derive: &StatusDerivation,
    ) -> Result<StatusRecalculation, PortError>;
}

/// Company lookup by administrative district
pub trait CompanyRepository: DomainPort {
    fn companies_in_districts(&self, district_ids: &[DistrictId]) -> Result<Vec<Company>, PortError>;
}

/// Source of planned visit dates
pub trait PlannedVisitDateProvider: DomainPort {
    /// The company's latest planned visit: greatest date, ties broken by the
    /// most recently recorded entry
    fn latest_planned_date(&self, company_id: CompanyId) -> Result<Option<PlannedVisitDate>, PortError>;
}
