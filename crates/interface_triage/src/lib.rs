//! Collection Triage
//!
//! Outer shell around the escalation engine: loads a snapshot of companies,
//! claims and change history, runs the batch metadata pipeline over the
//! configured districts and statuses, and produces a ranked report.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = TriageConfig::from_env()?;
//! let classifier = EscalationClassifier::new(thresholds_from_env()?)?;
//! let report = interface_triage::run(&config, classifier, Utc::now())?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod snapshot;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use core_kernel::AdapterHealth;

use domain_claims::EscalationClassifier;

use crate::config::TriageConfig;
use crate::error::TriageError;
use crate::report::TriageReport;
use crate::snapshot::Snapshot;

pub use config::{load_thresholds, thresholds_from_env};

/// Reads the configured snapshot and triages it
pub fn run(
    config: &TriageConfig,
    classifier: EscalationClassifier,
    now: DateTime<Utc>,
) -> Result<TriageReport, TriageError> {
    let snapshot = Snapshot::from_path(&config.snapshot_path())?;
    triage(snapshot, config, classifier, now)
}

/// Triages an already parsed snapshot
#[instrument(skip_all)]
pub fn triage(
    snapshot: Snapshot,
    config: &TriageConfig,
    classifier: EscalationClassifier,
    now: DateTime<Utc>,
) -> Result<TriageReport, TriageError> {
    let statuses = config.item_statuses()?;
    let timezone = config.timezone()?;
    let loaded = snapshot.load()?;
    for check in loaded.health() {
        match check.status {
            AdapterHealth::Healthy => debug!(adapter = %check.adapter_id, "Adapter healthy"),
            AdapterHealth::Degraded => warn!(
                adapter = %check.adapter_id,
                message = check.message.as_deref().unwrap_or_default(),
                "Adapter degraded"
            ),
        }
    }

    let mut districts = config.district_ids()?;
    if districts.is_empty() {
        districts = loaded.districts.clone();
    }

    let metadata = loaded
        .pipeline(classifier)
        .with_timezone(timezone)
        .compute_metadata(&districts, &statuses, now)?;

    let report = TriageReport::build(&loaded, metadata, &districts, &statuses, timezone, now);
    info!(
        companies = report.companies.len(),
        districts = districts.len(),
        "Triage complete"
    );
    Ok(report)
}
