//! Snapshot loading
//!
//! A snapshot is one JSON document holding everything a triage needs:
//!
//! ```json
//! {
//!   "companies": [{ "id": "...", "name": "...", "district_id": "..." }],
//!   "claims": [{ "id": "...", "company_id": "...", "claim_number": "...", "items": [...] }],
//!   "change_events": [...],
//!   "planned_visits": [...]
//! }
//! ```
//!
//! Cached claim statuses in the snapshot are not trusted: every claim is
//! recalculated once it is loaded.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use core_kernel::{CompanyId, DistrictId, HealthCheckResult, HealthCheckable};
use domain_claims::adapters::{InMemoryChangeLog, InMemoryClaimStore, InMemoryCompanyDirectory};
use domain_claims::{
    BatchMetadataPipeline, ChangeEvent, Claim, ClaimRepository, Company, EscalationClassifier,
    PlannedVisitDate, RecalculationTrigger, TimeInStateReconstructor,
};

use crate::error::TriageError;

/// Serialized state of companies, claims and their history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub companies: Vec<Company>,
    pub claims: Vec<Claim>,
    pub change_events: Vec<ChangeEvent>,
    pub planned_visits: Vec<PlannedVisitDate>,
}

impl Snapshot {
    pub fn from_path(path: &Path) -> Result<Self, TriageError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TriageError::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, TriageError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Loads the snapshot into in-memory adapters and reconciles claim statuses
    pub fn load(self) -> Result<LoadedSnapshot, TriageError> {
        for claim in &self.claims {
            if let Some(item) = claim.items.iter().find(|item| item.claim_id != claim.id) {
                return Err(TriageError::SnapshotConflict(format!(
                    "item {} of claim {} names claim {}",
                    item.id, claim.id, item.claim_id
                )));
            }
        }

        let directory = Arc::new(InMemoryCompanyDirectory::new());
        let mut company_names = HashMap::new();
        let mut districts = BTreeSet::new();
        for company in self.companies {
            company_names.insert(company.id, company.name.clone());
            districts.insert(company.district_id);
            directory.add_company(company);
        }
        for visit in self.planned_visits {
            directory.add_planned_visit(visit);
        }

        let store = Arc::new(InMemoryClaimStore::new());
        let claim_ids: Vec<_> = self.claims.iter().map(|claim| claim.id).collect();
        for claim in self.claims {
            store
                .insert_claim(claim)
                .map_err(|err| TriageError::SnapshotConflict(err.to_string()))?;
        }

        let trigger = RecalculationTrigger::new(store.clone());
        let mut corrected = 0usize;
        for claim_id in claim_ids {
            let outcome = trigger.recalculate(claim_id)?;
            if outcome.changed() {
                warn!(
                    claim = %claim_id,
                    cached = %outcome.previous,
                    derived = %outcome.current,
                    "Snapshot claim status was stale"
                );
                corrected += 1;
            }
        }

        let change_log = Arc::new(InMemoryChangeLog::with_events(self.change_events));
        info!(
            companies = company_names.len(),
            claims = store.len(),
            events = change_log.len(),
            corrected,
            "Snapshot loaded"
        );

        Ok(LoadedSnapshot {
            store,
            change_log,
            directory,
            company_names,
            districts,
            corrected,
        })
    }
}

/// A snapshot held in in-memory adapters
pub struct LoadedSnapshot {
    pub store: Arc<InMemoryClaimStore>,
    pub change_log: Arc<InMemoryChangeLog>,
    pub directory: Arc<InMemoryCompanyDirectory>,
    pub company_names: HashMap<CompanyId, String>,
    /// Every district that has at least one company
    pub districts: BTreeSet<DistrictId>,
    /// Claims whose cached status had to be recalculated on load
    pub corrected: usize,
}

impl LoadedSnapshot {
    pub fn pipeline(&self, classifier: EscalationClassifier) -> BatchMetadataPipeline {
        BatchMetadataPipeline::new(
            self.directory.clone(),
            self.store.clone(),
            self.directory.clone(),
            TimeInStateReconstructor::new(self.change_log.clone()),
            classifier,
        )
    }

    /// Health of the adapters backing this snapshot
    pub fn health(&self) -> Vec<HealthCheckResult> {
        vec![
            self.store.health_check(),
            self.change_log.health_check(),
            self.directory.health_check(),
        ]
    }

    pub fn company_name(&self, company_id: CompanyId) -> Option<&str> {
        self.company_names.get(&company_id).map(String::as_str)
    }
}
