//! Core Kernel - Foundational types for the claims escalation engine
//!
//! This crate provides the building blocks shared by the domain and outer crates:
//! - Strongly-typed identifiers for claims, line items, companies and districts
//! - Business-day arithmetic in a configurable timezone
//! - Port error and marker traits for collaborator adapters

pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use temporal::{Timezone, TemporalError, elapsed_whole_days, days_until};
pub use identifiers::{
    ClaimId, LineItemId, CompanyId, DistrictId, ChangeEventId, PlannedVisitId,
};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
