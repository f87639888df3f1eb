//! In-memory adapters
//!
//! Back the engine's ports with process-local collections. Used by the test
//! suites and by the triage binary, which loads a snapshot into them.
//!
//! `InMemoryClaimStore` keeps one mutex per claim. An item write and the
//! recompute-and-store that follows it run under a single acquisition of
//! that lock, so readers (which clone the claim under the same lock) never
//! see a changed item set next to the old cached status. Writers to one
//! claim are serialized; different claims proceed independently.
//!
//! Lock order: claim mutex, item index, claims map.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use core_kernel::{
    ClaimId, CompanyId, DistrictId, DomainPort, HealthCheckResult, HealthCheckable, LineItemId,
    PortError,
};

use crate::change_log::{ChangeEvent, TrackedField};
use crate::claim::{Claim, LineItem};
use crate::company::{Company, PlannedVisitDate};
use crate::ports::{
    ChangeLogReader, ChangeLogWriter, ClaimRepository, CompanyRepository, PlannedVisitDateProvider,
    StatusDerivation,
};
use crate::recalculation::{ItemMutation, StatusRecalculation};
use crate::status::ItemStatus;

type ClaimCell = Arc<Mutex<Claim>>;

/// Claims and line items held in memory
#[derive(Debug, Default)]
pub struct InMemoryClaimStore {
    claims: RwLock<HashMap<ClaimId, ClaimCell>>,
    item_index: RwLock<HashMap<LineItemId, ClaimId>>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store; cached statuses are kept as given
    ///
    /// # Errors
    ///
    /// `Conflict` if a claim id or a line-item id occurs twice.
    pub fn with_claims(claims: impl IntoIterator<Item = Claim>) -> Result<Self, PortError> {
        let store = Self::new();
        for claim in claims {
            store.insert_claim(claim)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.claims.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.read().is_empty()
    }

    /// Claims whose cached status disagrees with their items
    pub fn stale_claims(&self) -> Vec<ClaimId> {
        let cells: Vec<ClaimCell> = self.claims.read().values().cloned().collect();
        let mut stale: Vec<ClaimId> = cells
            .iter()
            .filter_map(|cell| {
                let claim = cell.lock();
                (!claim.is_status_consistent()).then_some(claim.id)
            })
            .collect();
        stale.sort();
        stale
    }

    fn cell(&self, claim_id: ClaimId) -> Result<ClaimCell, PortError> {
        self.claims
            .read()
            .get(&claim_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Claim", claim_id))
    }

    fn owner_of(&self, item_id: LineItemId) -> Result<ClaimId, PortError> {
        self.item_index
            .read()
            .get(&item_id)
            .copied()
            .ok_or_else(|| PortError::not_found("LineItem", item_id))
    }
}

impl DomainPort for InMemoryClaimStore {}

impl HealthCheckable for InMemoryClaimStore {
    fn health_check(&self) -> HealthCheckResult {
        let stale = self.stale_claims();
        if stale.is_empty() {
            HealthCheckResult::healthy("in-memory-claim-store")
        } else {
            HealthCheckResult::degraded(
                "in-memory-claim-store",
                format!("{} claim(s) with a stale cached status", stale.len()),
            )
        }
    }
}

impl ClaimRepository for InMemoryClaimStore {
    fn get_claim(&self, claim_id: ClaimId) -> Result<Claim, PortError> {
        let cell = self.cell(claim_id)?;
        let claim = cell.lock().clone();
        Ok(claim)
    }

    fn claims_for_companies(&self, company_ids: &[CompanyId]) -> Result<Vec<Claim>, PortError> {
        let cells: Vec<ClaimCell> = self.claims.read().values().cloned().collect();
        let mut claims: Vec<Claim> = cells
            .iter()
            .map(|cell| cell.lock().clone())
            .filter(|claim| company_ids.contains(&claim.company_id))
            .collect();
        claims.sort_by_key(|claim| claim.id);
        Ok(claims)
    }

    fn insert_claim(&self, claim: Claim) -> Result<(), PortError> {
        let mut index = self.item_index.write();
        let mut claims = self.claims.write();
        if claims.contains_key(&claim.id) {
            return Err(PortError::conflict(format!("claim {} already exists", claim.id)));
        }

        let mut seen: HashMap<LineItemId, ClaimId> = HashMap::new();
        for item in &claim.items {
            if let Some(owner) = index.get(&item.id).or_else(|| seen.get(&item.id)) {
                return Err(PortError::conflict(format!(
                    "line item {} of claim {} already belongs to claim {}",
                    item.id, claim.id, owner
                )));
            }
            seen.insert(item.id, claim.id);
        }

        index.extend(seen);
        claims.insert(claim.id, Arc::new(Mutex::new(claim)));
        Ok(())
    }

    fn find_item(&self, item_id: LineItemId) -> Result<LineItem, PortError> {
        let cell = self.cell(self.owner_of(item_id)?)?;
        let claim = cell.lock();
        claim
            .item(item_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("LineItem", item_id))
    }

    fn insert_item(&self, item: LineItem, derive: &StatusDerivation) -> Result<ItemMutation, PortError> {
        let cell = self.cell(item.claim_id)?;
        let mut claim = cell.lock();
        {
            let mut index = self.item_index.write();
            if index.contains_key(&item.id) {
                return Err(PortError::conflict(format!("line item {} already exists", item.id)));
            }
            index.insert(item.id, claim.id);
        }
        claim.add_item(item.clone());
        let recalculation = store_derived(&mut claim, derive);

        Ok(ItemMutation {
            item,
            previous_status: None,
            recalculation: Some(recalculation),
        })
    }

    fn update_item_status(
        &self,
        item_id: LineItemId,
        status: ItemStatus,
        at: DateTime<Utc>,
        derive: &StatusDerivation,
    ) -> Result<ItemMutation, PortError> {
        let cell = self.cell(self.owner_of(item_id)?)?;
        let mut claim = cell.lock();
        let previous = claim
            .set_item_status(item_id, status, at)
            .ok_or_else(|| PortError::not_found("LineItem", item_id))?;
        let recalculation = (previous != status).then(|| store_derived(&mut claim, derive));
        let item = claim
            .item(item_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("LineItem", item_id))?;

        Ok(ItemMutation {
            item,
            previous_status: Some(previous),
            recalculation,
        })
    }

    fn delete_item(
        &self,
        item_id: LineItemId,
        at: DateTime<Utc>,
        derive: &StatusDerivation,
    ) -> Result<ItemMutation, PortError> {
        let cell = self.cell(self.owner_of(item_id)?)?;
        let mut claim = cell.lock();
        let item = claim
            .remove_item(item_id, at)
            .ok_or_else(|| PortError::not_found("LineItem", item_id))?;
        self.item_index.write().remove(&item_id);
        let recalculation = store_derived(&mut claim, derive);

        Ok(ItemMutation {
            previous_status: Some(item.status),
            item,
            recalculation: Some(recalculation),
        })
    }

    fn recompute_status(
        &self,
        claim_id: ClaimId,
        derive: &StatusDerivation,
    ) -> Result<StatusRecalculation, PortError> {
        let cell = self.cell(claim_id)?;
        let mut claim = cell.lock();
        Ok(store_derived(&mut claim, derive))
    }
}

/// Derives and stores the status of a claim whose lock the caller holds
fn store_derived(claim: &mut Claim, derive: &StatusDerivation) -> StatusRecalculation {
    let statuses: Vec<ItemStatus> = claim.item_statuses().collect();
    let current = derive(&statuses);
    let previous = claim.store_status(current);
    StatusRecalculation {
        claim_id: claim.id,
        previous,
        current,
    }
}

/// Append-only change log held in memory
#[derive(Debug, Default)]
pub struct InMemoryChangeLog {
    events: RwLock<Vec<ChangeEvent>>,
}

impl InMemoryChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: impl IntoIterator<Item = ChangeEvent>) -> Self {
        Self {
            events: RwLock::new(events.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Every recorded event in insertion order
    pub fn all(&self) -> Vec<ChangeEvent> {
        self.events.read().clone()
    }
}

impl DomainPort for InMemoryChangeLog {}

impl HealthCheckable for InMemoryChangeLog {
    fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("in-memory-change-log")
    }
}

impl ChangeLogReader for InMemoryChangeLog {
    fn events_for(
        &self,
        item_ids: &[LineItemId],
        field: TrackedField,
    ) -> Result<Vec<ChangeEvent>, PortError> {
        let mut events: Vec<ChangeEvent> = self
            .events
            .read()
            .iter()
            .filter(|event| event.field == field && item_ids.contains(&event.item_id))
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        events.sort_by_key(|event| event.at);
        Ok(events)
    }
}

impl ChangeLogWriter for InMemoryChangeLog {
    fn append(&self, event: ChangeEvent) -> Result<(), PortError> {
        self.events.write().push(event);
        Ok(())
    }
}

/// Companies and their planned visits held in memory
#[derive(Debug, Default)]
pub struct InMemoryCompanyDirectory {
    companies: RwLock<HashMap<CompanyId, Company>>,
    planned_visits: RwLock<Vec<PlannedVisitDate>>,
}

impl InMemoryCompanyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_company(&self, company: Company) {
        self.companies.write().insert(company.id, company);
    }

    pub fn add_planned_visit(&self, visit: PlannedVisitDate) {
        self.planned_visits.write().push(visit);
    }
}

impl DomainPort for InMemoryCompanyDirectory {}

impl HealthCheckable for InMemoryCompanyDirectory {
    fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("in-memory-company-directory")
    }
}

impl CompanyRepository for InMemoryCompanyDirectory {
    fn companies_in_districts(&self, district_ids: &[DistrictId]) -> Result<Vec<Company>, PortError> {
        let mut companies: Vec<Company> = self
            .companies
            .read()
            .values()
            .filter(|company| district_ids.contains(&company.district_id))
            .cloned()
            .collect();
        companies.sort_by_key(|company| company.id);
        Ok(companies)
    }
}

impl PlannedVisitDateProvider for InMemoryCompanyDirectory {
    fn latest_planned_date(&self, company_id: CompanyId) -> Result<Option<PlannedVisitDate>, PortError> {
        Ok(self
            .planned_visits
            .read()
            .iter()
            .filter(|visit| visit.company_id == company_id)
            .max_by_key(|visit| visit.recency_key())
            .cloned())
    }
}
