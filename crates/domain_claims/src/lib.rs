//! Claim Status Derivation & Escalation
//!
//! This crate keeps each claim's status in step with its line items and
//! rates companies by how urgently their parts need collecting.
//!
//! # Components
//!
//! - [`aggregation`]: folds item statuses into one claim status
//! - [`recalculation`]: refreshes the cached claim status on every item write
//! - [`time_in_state`]: replays the change log to find how long items have waited
//! - [`escalation`]: maps urgency signals to a color and severity rank
//! - [`batch`]: computes per-company urgency metadata across districts
//!
//! # Data Flow
//!
//! ```text
//! item write -> LineItemService -> ClaimRepository (item change + aggregate -> claim.status)
//! repair     -> RecalculationTrigger -> ClaimRepository::recompute_status
//!
//! BatchMetadataPipeline -> TimeInStateReconstructor + EscalationClassifier
//!                       -> CompanyUrgencyMetadata (per request, never stored)
//! ```

pub mod adapters;
pub mod aggregation;
pub mod batch;
pub mod change_log;
pub mod claim;
pub mod company;
pub mod error;
pub mod escalation;
pub mod ports;
pub mod recalculation;
pub mod status;
pub mod time_in_state;

pub use aggregation::{aggregate, ItemStatusAggregator};
pub use batch::{rank, BatchMetadataPipeline, CompanyUrgencyMetadata};
pub use change_log::{ChangeEvent, TrackedField};
pub use claim::{Claim, LineItem};
pub use company::{Company, PlannedVisitDate};
pub use error::ClaimError;
pub use escalation::{
    ColorClass, Escalation, EscalationClassifier, EscalationInput, EscalationThresholds, PlannedWindow,
};
pub use ports::{
    ChangeLogReader, ChangeLogWriter, ClaimRepository, CompanyRepository, PlannedVisitDateProvider,
    StatusDerivation,
};
pub use recalculation::{
    derive_claim_status, ItemMutation, LineItemService, RecalculationTrigger, StatusRecalculation,
};
pub use status::{ClaimStatus, ItemStatus};
pub use time_in_state::TimeInStateReconstructor;
