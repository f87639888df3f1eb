//! Time-in-state reconstruction from the change log
//!
//! Items do not store when they entered their current status. Instead the
//! change log is replayed: for each item currently in the target status,
//! the earliest transition into that status marks its entry. Items with no
//! such transition (status set at creation, or logged before the log
//! existed) fall back to their creation time.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use core_kernel::{elapsed_whole_days, LineItemId};

use crate::change_log::TrackedField;
use crate::claim::LineItem;
use crate::error::ClaimError;
use crate::ports::ChangeLogReader;
use crate::status::ItemStatus;

/// Computes how long a group of items has been in a status
#[derive(Clone)]
pub struct TimeInStateReconstructor {
    change_log: Arc<dyn ChangeLogReader>,
}

impl TimeInStateReconstructor {
    pub fn new(change_log: Arc<dyn ChangeLogReader>) -> Self {
        Self { change_log }
    }

    /// Whole days since the first of `items` entered `target`
    ///
    /// Only items currently in `target` are considered; if there are none
    /// the result is 0. Reads the change log once for the whole group.
    ///
    /// # Errors
    ///
    /// Only a change-log read failure, propagated as [`ClaimError::Port`].
    #[instrument(skip_all, fields(target = %target))]
    pub fn days_in_state<'a, I>(
        &self,
        items: I,
        target: ItemStatus,
        now: DateTime<Utc>,
    ) -> Result<i64, ClaimError>
    where
        I: IntoIterator<Item = &'a LineItem>,
    {
        let in_target: Vec<&LineItem> = items
            .into_iter()
            .filter(|item| item.status == target)
            .collect();
        if in_target.is_empty() {
            return Ok(0);
        }

        let ids: Vec<LineItemId> = in_target.iter().map(|item| item.id).collect();
        let events = self.change_log.events_for(&ids, TrackedField::Status)?;

        let mut entered_at: HashMap<LineItemId, DateTime<Utc>> = HashMap::new();
        for event in events.iter().filter(|event| event.entered(target)) {
            entered_at
                .entry(event.item_id)
                .and_modify(|at| *at = (*at).min(event.at))
                .or_insert(event.at);
        }

        let earliest = in_target
            .iter()
            .map(|item| match entered_at.get(&item.id) {
                Some(at) => *at,
                None => {
                    debug!(item = %item.id, "No transition logged, using creation time");
                    item.created_at
                }
            })
            .min();

        Ok(earliest.map_or(0, |since| elapsed_whole_days(since, now)))
    }
}
