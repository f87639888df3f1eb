//! Keeping the cached claim status in step with its line items
//!
//! [`LineItemService`] is the line-item write path. Every create, status
//! change or delete goes through it. The repository applies the item change
//! and stores the re-derived claim status in one critical section scoped to
//! the claim, so no reader ever sees the new item set next to the old
//! status. The status transition is appended to the change log afterwards,
//! outside that section.
//!
//! [`RecalculationTrigger`] recomputes a claim on its own, for claims whose
//! cached status came from elsewhere (a snapshot, a bulk import).

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use core_kernel::{ClaimId, LineItemId, PortError};

use crate::aggregation::aggregate;
use crate::change_log::ChangeEvent;
use crate::claim::LineItem;
use crate::error::ClaimError;
use crate::ports::{ChangeLogWriter, ClaimRepository};
use crate::status::{ClaimStatus, ItemStatus};

/// The derivation every repository write runs under the claim's lock
pub fn derive_claim_status(statuses: &[ItemStatus]) -> ClaimStatus {
    aggregate(statuses.iter().copied())
}

/// Result of recomputing one claim's cached status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecalculation {
    pub claim_id: ClaimId,
    pub previous: ClaimStatus,
    pub current: ClaimStatus,
}

impl StatusRecalculation {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }

    fn trace(&self) {
        if self.changed() {
            info!(
                claim = %self.claim_id,
                previous = %self.previous,
                current = %self.current,
                "Claim status changed"
            );
        } else {
            debug!(claim = %self.claim_id, status = %self.current, "Claim status unchanged");
        }
    }
}

/// Recomputes and stores a claim's cached status
#[derive(Clone)]
pub struct RecalculationTrigger {
    claims: Arc<dyn ClaimRepository>,
}

impl RecalculationTrigger {
    pub fn new(claims: Arc<dyn ClaimRepository>) -> Self {
        Self { claims }
    }

    /// Derives the claim status from the claim's current items and stores it
    ///
    /// The read-derive-write step runs atomically inside the repository,
    /// scoped to this claim.
    ///
    /// # Errors
    ///
    /// `ClaimNotFound` if the claim does not exist; other repository
    /// failures are propagated unchanged.
    #[instrument(skip_all, fields(claim = %claim_id))]
    pub fn recalculate(&self, claim_id: ClaimId) -> Result<StatusRecalculation, ClaimError> {
        let outcome = self
            .claims
            .recompute_status(claim_id, &derive_claim_status)
            .map_err(|err| claim_error(err, claim_id))?;
        outcome.trace();
        Ok(outcome)
    }
}

/// Outcome of a line-item write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMutation {
    /// The item as created, updated or removed
    pub item: LineItem,
    /// Item status before the write; `None` for a created item
    pub previous_status: Option<ItemStatus>,
    /// `None` when the write did not change any status
    pub recalculation: Option<StatusRecalculation>,
}

/// Line-item write path
#[derive(Clone)]
pub struct LineItemService {
    claims: Arc<dyn ClaimRepository>,
    change_log: Arc<dyn ChangeLogWriter>,
}

impl LineItemService {
    pub fn new(claims: Arc<dyn ClaimRepository>, change_log: Arc<dyn ChangeLogWriter>) -> Self {
        Self { claims, change_log }
    }

    /// Adds a new item in `status` to a claim
    #[instrument(skip_all, fields(claim = %claim_id, status = %status))]
    pub fn create_item(&self, claim_id: ClaimId, status: ItemStatus) -> Result<ItemMutation, ClaimError> {
        let mutation = self
            .claims
            .insert_item(LineItem::new(claim_id, status), &derive_claim_status)
            .map_err(|err| claim_error(err, claim_id))?;
        self.record(&mutation)?;
        Ok(mutation)
    }

    /// Moves an item to `status`
    ///
    /// Setting the status an item already has is a no-op: nothing is logged
    /// and the claim is not recalculated.
    #[instrument(skip_all, fields(item = %item_id, status = %status))]
    pub fn update_item_status(
        &self,
        item_id: LineItemId,
        status: ItemStatus,
    ) -> Result<ItemMutation, ClaimError> {
        let mutation = self
            .claims
            .update_item_status(item_id, status, Utc::now(), &derive_claim_status)
            .map_err(|err| item_error(err, item_id))?;
        if mutation.recalculation.is_none() {
            debug!("Status unchanged, skipping recalculation");
            return Ok(mutation);
        }
        self.record(&mutation)?;
        Ok(mutation)
    }

    /// Removes an item from its claim
    ///
    /// Deletions are not status transitions and are not logged.
    #[instrument(skip_all, fields(item = %item_id))]
    pub fn delete_item(&self, item_id: LineItemId) -> Result<ItemMutation, ClaimError> {
        let mutation = self
            .claims
            .delete_item(item_id, Utc::now(), &derive_claim_status)
            .map_err(|err| item_error(err, item_id))?;
        if let Some(recalculation) = &mutation.recalculation {
            recalculation.trace();
        }
        Ok(mutation)
    }

    fn record(&self, mutation: &ItemMutation) -> Result<(), ClaimError> {
        if let Some(recalculation) = &mutation.recalculation {
            recalculation.trace();
        }
        let item = &mutation.item;
        self.change_log.append(ChangeEvent::status_change(
            item.id,
            mutation.previous_status,
            item.status,
            item.updated_at,
        ))?;
        Ok(())
    }
}

fn claim_error(err: PortError, claim_id: ClaimId) -> ClaimError {
    if err.is_not_found() {
        ClaimError::ClaimNotFound(claim_id)
    } else {
        ClaimError::Port(err)
    }
}

fn item_error(err: PortError, item_id: LineItemId) -> ClaimError {
    if err.is_not_found() {
        ClaimError::ItemNotFound(item_id)
    } else {
        ClaimError::Port(err)
    }
}
