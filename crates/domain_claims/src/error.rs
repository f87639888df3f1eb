//! Claims domain errors
//!
//! The derivation rules themselves are total and never fail. Errors only
//! come from collaborators (propagated as [`PortError`]) or from values
//! rejected at the boundary.

use thiserror::Error;

use core_kernel::{ClaimId, LineItemId, PortError};

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error("Line item not found: {0}")]
    ItemNotFound(LineItemId),

    #[error("Unknown status value: {0}")]
    UnknownStatus(String),

    #[error("Invalid escalation thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Collaborator failure: {0}")]
    Port(#[from] PortError),
}

impl ClaimError {
    /// Returns true if the underlying collaborator failure may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, ClaimError::Port(err) if err.is_transient())
    }
}
