//! Triage error handling

use std::path::PathBuf;

use core_kernel::CoreError;
use domain_claims::ClaimError;
use thiserror::Error;

/// Errors raised while configuring or running a triage
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Cannot read snapshot {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed snapshot: {0}")]
    SnapshotFormat(#[from] serde_json::Error),

    #[error("Snapshot is inconsistent: {0}")]
    SnapshotConflict(String),

    #[error(transparent)]
    Kernel(#[from] CoreError),

    #[error(transparent)]
    Claim(#[from] ClaimError),
}

impl From<validator::ValidationErrors> for TriageError {
    fn from(err: validator::ValidationErrors) -> Self {
        TriageError::Invalid(err.to_string())
    }
}
