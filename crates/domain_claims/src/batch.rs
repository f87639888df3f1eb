//! Per-company urgency metadata for collection triage
//!
//! [`BatchMetadataPipeline`] is read-only. It selects the line items in the
//! requested statuses across all claims of the companies in the requested
//! districts, groups them by company and classifies each group. The result
//! is rebuilt on every request and never persisted.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use core_kernel::{days_until, CompanyId, DistrictId, Timezone};

use crate::claim::{Claim, LineItem};
use crate::error::ClaimError;
use crate::escalation::{ColorClass, EscalationClassifier, EscalationInput, PlannedWindow};
use crate::ports::{ClaimRepository, CompanyRepository, PlannedVisitDateProvider};
use crate::status::ItemStatus;
use crate::time_in_state::TimeInStateReconstructor;

/// Urgency summary of one company's matched items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyUrgencyMetadata {
    pub company_id: CompanyId,
    pub item_count: usize,
    pub debt_item_count: usize,
    /// Latest modification among the matched items
    pub last_updated_at: DateTime<Utc>,
    /// Whole days since the first matched item entered IN_PROGRESS
    pub days_in_state: i64,
    pub planned_date: Option<NaiveDate>,
    pub planned_note: Option<String>,
    pub days_until_planned: Option<i64>,
    pub color_class: ColorClass,
    pub severity_rank: u8,
}

impl CompanyUrgencyMetadata {
    /// Share of matched items in debt, as a percentage with two decimals
    pub fn debt_share(&self) -> Decimal {
        if self.item_count == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(self.debt_item_count as u64) * dec!(100) / Decimal::from(self.item_count as u64))
            .round_dp(2)
    }
}

/// Orders metadata most urgent first
///
/// Severity ascending, then longest waiting, then most items; company id
/// breaks remaining ties so the order is stable.
pub fn rank(metadata: impl IntoIterator<Item = CompanyUrgencyMetadata>) -> Vec<CompanyUrgencyMetadata> {
    let mut ranked: Vec<_> = metadata.into_iter().collect();
    ranked.sort_by(|a, b| {
        a.severity_rank
            .cmp(&b.severity_rank)
            .then_with(|| b.days_in_state.cmp(&a.days_in_state))
            .then_with(|| b.item_count.cmp(&a.item_count))
            .then_with(|| a.company_id.cmp(&b.company_id))
    });
    ranked
}

/// Matched items of one company and the claims they came from
struct CompanyGroup<'a> {
    items: Vec<&'a LineItem>,
    claims: Vec<&'a Claim>,
}

/// Computes urgency metadata across districts
#[derive(Clone)]
pub struct BatchMetadataPipeline {
    companies: Arc<dyn CompanyRepository>,
    claims: Arc<dyn ClaimRepository>,
    planned_visits: Arc<dyn PlannedVisitDateProvider>,
    reconstructor: TimeInStateReconstructor,
    classifier: EscalationClassifier,
    timezone: Timezone,
}

impl BatchMetadataPipeline {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        claims: Arc<dyn ClaimRepository>,
        planned_visits: Arc<dyn PlannedVisitDateProvider>,
        reconstructor: TimeInStateReconstructor,
        classifier: EscalationClassifier,
    ) -> Self {
        Self {
            companies,
            claims,
            planned_visits,
            reconstructor,
            classifier,
            timezone: Timezone::default(),
        }
    }

    /// Timezone in which "today" is taken for planned-visit distances
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Metadata for every company in `district_ids` with at least one item
    /// in `selected_statuses`
    ///
    /// Companies without a matching item are absent from the result.
    ///
    /// # Errors
    ///
    /// Any port failure, propagated as [`ClaimError::Port`].
    #[instrument(skip_all, fields(districts = district_ids.len(), statuses = selected_statuses.len()))]
    pub fn compute_metadata(
        &self,
        district_ids: &BTreeSet<DistrictId>,
        selected_statuses: &BTreeSet<ItemStatus>,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<CompanyId, CompanyUrgencyMetadata>, ClaimError> {
        if district_ids.is_empty() || selected_statuses.is_empty() {
            return Ok(BTreeMap::new());
        }

        let districts: Vec<DistrictId> = district_ids.iter().copied().collect();
        let company_ids: Vec<CompanyId> = self
            .companies
            .companies_in_districts(&districts)?
            .into_iter()
            .map(|company| company.id)
            .collect();
        let claims = self.claims.claims_for_companies(&company_ids)?;

        let mut groups: BTreeMap<CompanyId, CompanyGroup<'_>> = BTreeMap::new();
        for claim in &claims {
            let matched: Vec<&LineItem> = claim
                .items
                .iter()
                .filter(|item| selected_statuses.contains(&item.status))
                .collect();
            if matched.is_empty() {
                continue;
            }
            let group = groups.entry(claim.company_id).or_insert_with(|| CompanyGroup {
                items: Vec::new(),
                claims: Vec::new(),
            });
            group.items.extend(matched);
            group.claims.push(claim);
        }

        let today = self.timezone.today(now);
        let mut result = BTreeMap::new();
        for (company_id, group) in groups {
            let metadata = self.company_metadata(company_id, &group, today, now)?;
            result.insert(company_id, metadata);
        }

        debug!(companies = result.len(), "Computed urgency metadata");
        Ok(result)
    }

    fn company_metadata(
        &self,
        company_id: CompanyId,
        group: &CompanyGroup<'_>,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<CompanyUrgencyMetadata, ClaimError> {
        let item_count = group.items.len();
        let debt_item_count = group
            .items
            .iter()
            .filter(|item| item.status == ItemStatus::Debt)
            .count();
        let last_updated_at = group
            .items
            .iter()
            .map(|item| item.updated_at)
            .max()
            .unwrap_or(now);

        let days_in_state = self.reconstructor.days_in_state(
            group.items.iter().copied(),
            ItemStatus::InProgress,
            now,
        )?;

        let planned = self.planned_visits.latest_planned_date(company_id)?;
        let window = planned.as_ref().map(|visit| PlannedWindow {
            date: visit.date,
            days_until: days_until(visit.date, today),
        });

        let escalation = self.classifier.classify(&EscalationInput {
            planned: window,
            days_in_state,
            item_count,
            debt_item_count,
            claim_type_flag: self.claim_type_flag(&group.claims),
        });

        Ok(CompanyUrgencyMetadata {
            company_id,
            item_count,
            debt_item_count,
            last_updated_at,
            days_in_state,
            planned_date: window.map(|w| w.date),
            planned_note: planned.map(|visit| visit.note).filter(|note| !note.is_empty()),
            days_until_planned: window.map(|w| w.days_until),
            color_class: escalation.color,
            severity_rank: escalation.severity_rank,
        })
    }

    /// The suppression flag if any matched claim carries it, otherwise the
    /// first flag found
    fn claim_type_flag(&self, claims: &[&Claim]) -> Option<String> {
        let suppression = self.classifier.thresholds().suppression_flag.as_str();
        if claims.iter().any(|claim| claim.has_flag(suppression)) {
            return Some(suppression.to_string());
        }
        claims.iter().find_map(|claim| claim.claim_type_flag.clone())
    }
}
