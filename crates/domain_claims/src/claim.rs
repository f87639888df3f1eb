//! Claim aggregate and its line items
//!
//! A claim's `status` is a cached value derived from its items. The item
//! mutation methods here leave it untouched; repositories call
//! [`Claim::store_status`] in the same critical section as the item change,
//! and [`RecalculationTrigger`](crate::recalculation::RecalculationTrigger)
//! repairs claims loaded with a stale cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, CompanyId, LineItemId};

use crate::aggregation::aggregate;
use crate::status::{ClaimStatus, ItemStatus};

/// A single part tracked within a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub claim_id: ClaimId,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    /// Last modification of any field of the item
    pub updated_at: DateTime<Utc>,
}

impl LineItem {
    pub fn new(claim_id: ClaimId, status: ItemStatus) -> Self {
        Self::created_at(claim_id, status, Utc::now())
    }

    /// Creates an item with an explicit creation time
    pub fn created_at(claim_id: ClaimId, status: ItemStatus, at: DateTime<Utc>) -> Self {
        Self {
            id: LineItemId::new_v7(),
            claim_id,
            status,
            created_at: at,
            updated_at: at,
        }
    }
}

/// A claim: one company's repair case grouping line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub company_id: CompanyId,
    /// Human-facing claim number
    pub claim_number: String,
    /// Cached aggregate of the item statuses
    #[serde(default)]
    pub status: ClaimStatus,
    /// Claim type marker independent of item statuses (e.g. "Overdue")
    pub claim_type_flag: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Opens an empty claim for a company
    pub fn open(company_id: CompanyId, claim_number: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ClaimId::new_v7(),
            company_id,
            claim_number: claim_number.into(),
            status: aggregate(Vec::<ItemStatus>::new()),
            claim_type_flag: None,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_claim_type_flag(mut self, flag: impl Into<String>) -> Self {
        self.claim_type_flag = Some(flag.into());
        self
    }

    pub fn item_statuses(&self) -> impl Iterator<Item = ItemStatus> + '_ {
        self.items.iter().map(|item| item.status)
    }

    /// Status the claim should have for its current items
    pub fn derived_status(&self) -> ClaimStatus {
        aggregate(self.item_statuses())
    }

    /// True when the cached status matches the items
    pub fn is_status_consistent(&self) -> bool {
        self.status == self.derived_status()
    }

    pub fn item(&self, item_id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.claim_type_flag.as_deref() == Some(flag)
    }

    /// Attaches an item to the claim
    pub fn add_item(&mut self, mut item: LineItem) {
        item.claim_id = self.id;
        self.updated_at = item.updated_at.max(self.updated_at);
        self.items.push(item);
    }

    /// Sets an item's status, returning the previous one
    ///
    /// Returns `None` if the item is not part of this claim.
    pub fn set_item_status(
        &mut self,
        item_id: LineItemId,
        status: ItemStatus,
        at: DateTime<Utc>,
    ) -> Option<ItemStatus> {
        let item = self.items.iter_mut().find(|item| item.id == item_id)?;
        let previous = item.status;
        if previous != status {
            item.status = status;
            item.updated_at = at;
            self.updated_at = at;
        }
        Some(previous)
    }

    /// Detaches an item from the claim
    pub fn remove_item(&mut self, item_id: LineItemId, at: DateTime<Utc>) -> Option<LineItem> {
        let position = self.items.iter().position(|item| item.id == item_id)?;
        self.updated_at = at;
        Some(self.items.remove(position))
    }

    /// Stores a freshly derived status, returning the previous one
    ///
    /// Repositories call this inside their per-claim critical section.
    pub fn store_status(&mut self, status: ClaimStatus) -> ClaimStatus {
        std::mem::replace(&mut self.status, status)
    }
}
