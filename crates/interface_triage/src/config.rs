//! Triage configuration
//!
//! Everything is read from the environment (optionally seeded from a `.env`
//! file by the binary):
//!
//! * `TRIAGE_SNAPSHOT_PATH` - JSON snapshot to triage (required)
//! * `TRIAGE_DISTRICTS` - comma-separated district ids; empty means every district in the snapshot
//! * `TRIAGE_STATUSES` - comma-separated item statuses to select (default: `IN_PROGRESS,DEBT`)
//! * `TRIAGE_TIMEZONE` - IANA zone in which "today" is taken (default: `UTC`)
//! * `TRIAGE_LOG_LEVEL` - default log filter when `RUST_LOG` is unset (default: `info`)
//! * `TRIAGE_LOG_JSON` - emit logs as JSON lines (default: `false`)
//!
//! Escalation thresholds use the `ESCALATION_` prefix, e.g.
//! `ESCALATION_ELAPSED_RED_AFTER_DAYS=7`.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use validator::Validate;

use core_kernel::{CoreError, DistrictId, Timezone};
use domain_claims::{EscalationThresholds, ItemStatus};

use crate::error::TriageError;

/// Triage run configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TriageConfig {
    #[validate(length(min = 1))]
    pub snapshot_path: String,
    pub districts: String,
    #[validate(length(min = 1))]
    pub statuses: String,
    pub timezone: String,
    pub log_level: String,
    pub log_json: bool,
}

impl TriageConfig {
    /// Loads configuration from `TRIAGE_*` environment variables
    pub fn from_env() -> Result<Self, TriageError> {
        Self::load(config::Environment::with_prefix("TRIAGE"))
    }

    /// Loads configuration from an explicit environment source
    pub fn load(environment: config::Environment) -> Result<Self, TriageError> {
        let config: TriageConfig = config::Config::builder()
            .set_default("districts", "")?
            .set_default("statuses", "IN_PROGRESS,DEBT")?
            .set_default("timezone", "UTC")?
            .set_default("log_level", "info")?
            .set_default("log_json", false)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        PathBuf::from(&self.snapshot_path)
    }

    /// Requested districts; empty when every district should be triaged
    pub fn district_ids(&self) -> Result<BTreeSet<DistrictId>, TriageError> {
        split_list(&self.districts)
            .map(|raw| {
                DistrictId::from_str(raw).map_err(|err| {
                    TriageError::from(CoreError::validation(format!("district '{}': {}", raw, err)))
                })
            })
            .collect()
    }

    pub fn item_statuses(&self) -> Result<BTreeSet<ItemStatus>, TriageError> {
        let statuses = split_list(&self.statuses)
            .map(|raw| ItemStatus::from_str(raw).map_err(TriageError::from))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if statuses.is_empty() {
            return Err(TriageError::Invalid("no item statuses selected".to_string()));
        }
        Ok(statuses)
    }

    pub fn timezone(&self) -> Result<Timezone, TriageError> {
        Timezone::parse(&self.timezone).map_err(|err| TriageError::from(CoreError::from(err)))
    }
}

/// Loads escalation thresholds from `ESCALATION_*` environment variables
///
/// Unset variables keep their defaults; the result is validated.
pub fn thresholds_from_env() -> Result<EscalationThresholds, TriageError> {
    load_thresholds(config::Environment::with_prefix("ESCALATION"))
}

pub fn load_thresholds(environment: config::Environment) -> Result<EscalationThresholds, TriageError> {
    let thresholds: EscalationThresholds = config::Config::builder()
        .add_source(environment.try_parsing(true))
        .build()?
        .try_deserialize()?;
    Ok(thresholds.validated()?)
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|part| !part.is_empty())
}
