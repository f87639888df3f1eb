//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! [`TriageHarness`] wires the in-memory adapters into the services the way
//! the triage binary does.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{ClaimId, CompanyId, DistrictId};
use domain_claims::adapters::{InMemoryChangeLog, InMemoryClaimStore, InMemoryCompanyDirectory};
use domain_claims::{
    BatchMetadataPipeline, ChangeEvent, ChangeLogWriter, Claim, ClaimRepository, Company,
    EscalationClassifier, ItemStatus, LineItem, LineItemService, PlannedVisitDate,
    RecalculationTrigger, TimeInStateReconstructor,
};

use crate::fixtures::{StringFixtures, TemporalFixtures, NORTH_DISTRICT};

/// Builder for claims with items of given ages
pub struct ClaimBuilder {
    company_id: CompanyId,
    claim_number: String,
    claim_type_flag: Option<String>,
    items: Vec<(ItemStatus, DateTime<Utc>)>,
    stale: bool,
}

impl ClaimBuilder {
    /// Creates a new builder for a claim of `company_id`
    pub fn new(company_id: CompanyId) -> Self {
        Self {
            company_id,
            claim_number: StringFixtures::claim_number().to_string(),
            claim_type_flag: None,
            items: Vec::new(),
            stale: false,
        }
    }

    pub fn with_claim_number(mut self, number: impl Into<String>) -> Self {
        self.claim_number = number.into();
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.claim_type_flag = Some(flag.into());
        self
    }

    /// Adds an item created `age_days` before the fixture "now"
    pub fn with_item(mut self, status: ItemStatus, age_days: i64) -> Self {
        self.items.push((status, TemporalFixtures::days_ago(age_days)));
        self
    }

    /// Adds several items of the same age
    pub fn with_items(mut self, statuses: &[ItemStatus], age_days: i64) -> Self {
        for status in statuses {
            self = self.with_item(*status, age_days);
        }
        self
    }

    /// Leaves the cached status as opened instead of deriving it
    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }

    pub fn build(self) -> Claim {
        let mut claim = Claim::open(self.company_id, self.claim_number);
        if let Some(flag) = self.claim_type_flag {
            claim = claim.with_claim_type_flag(flag);
        }
        for (status, at) in self.items {
            claim.add_item(LineItem::created_at(claim.id, status, at));
        }
        if !self.stale {
            let derived = claim.derived_status();
            claim.store_status(derived);
        }
        claim
    }
}

/// In-memory adapters plus the services built on them
pub struct TriageHarness {
    pub store: Arc<InMemoryClaimStore>,
    pub change_log: Arc<InMemoryChangeLog>,
    pub directory: Arc<InMemoryCompanyDirectory>,
    pub classifier: EscalationClassifier,
}

impl Default for TriageHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageHarness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryClaimStore::new()),
            change_log: Arc::new(InMemoryChangeLog::new()),
            directory: Arc::new(InMemoryCompanyDirectory::new()),
            classifier: EscalationClassifier::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: EscalationClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Registers a company in the default district
    pub fn company(&self, name: &str) -> CompanyId {
        self.company_in(name, *NORTH_DISTRICT)
    }

    pub fn company_in(&self, name: &str, district_id: DistrictId) -> CompanyId {
        let company = Company::new(name, district_id);
        let id = company.id;
        self.directory.add_company(company);
        id
    }

    pub fn claim(&self, claim: Claim) -> ClaimId {
        let id = claim.id;
        self.store
            .insert_claim(claim)
            .unwrap_or_else(|err| panic!("failed to insert claim {}: {}", id, err));
        id
    }

    pub fn planned_visit(&self, company_id: CompanyId, date: NaiveDate) {
        self.directory
            .add_planned_visit(PlannedVisitDate::new(company_id, date, ""));
    }

    pub fn log(&self, event: ChangeEvent) {
        self.change_log
            .append(event)
            .unwrap_or_else(|err| panic!("failed to append change event: {}", err));
    }

    pub fn trigger(&self) -> RecalculationTrigger {
        RecalculationTrigger::new(self.store.clone())
    }

    pub fn service(&self) -> LineItemService {
        LineItemService::new(self.store.clone(), self.change_log.clone())
    }

    pub fn pipeline(&self) -> BatchMetadataPipeline {
        BatchMetadataPipeline::new(
            self.directory.clone(),
            self.store.clone(),
            self.directory.clone(),
            TimeInStateReconstructor::new(self.change_log.clone()),
            self.classifier.clone(),
        )
    }
}
