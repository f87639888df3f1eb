//! Change-event log entries
//!
//! The log is append-only: entries are written by the line-item write path
//! and only ever read back when reconstructing how long items have been in
//! a given state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ChangeEventId, LineItemId};

use crate::status::ItemStatus;

/// Fields whose transitions are recorded in the change log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    Status,
}

/// One recorded transition of a line item field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub id: ChangeEventId,
    pub item_id: LineItemId,
    pub field: TrackedField,
    /// `None` when the item was created with `new_value`
    pub old_value: Option<ItemStatus>,
    pub new_value: ItemStatus,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Records a status transition of `item_id` at `at`
    pub fn status_change(
        item_id: LineItemId,
        old_value: Option<ItemStatus>,
        new_value: ItemStatus,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ChangeEventId::new_v7(),
            item_id,
            field: TrackedField::Status,
            old_value,
            new_value,
            at,
        }
    }

    pub fn entered(&self, status: ItemStatus) -> bool {
        self.field == TrackedField::Status && self.new_value == status
    }
}
