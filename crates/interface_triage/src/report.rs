//! Ranked triage report

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CompanyId, DistrictId, Timezone};
use domain_claims::{rank, ColorClass, CompanyUrgencyMetadata, ItemStatus};

use crate::snapshot::LoadedSnapshot;

/// One company in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub company_id: CompanyId,
    pub company_name: Option<String>,
    pub color_class: ColorClass,
    pub css_class: String,
    pub severity_rank: u8,
    pub item_count: usize,
    pub debt_item_count: usize,
    /// Percentage of matched items in debt
    pub debt_share: Decimal,
    pub days_in_state: i64,
    pub planned_date: Option<NaiveDate>,
    pub planned_note: Option<String>,
    pub days_until_planned: Option<i64>,
    pub last_updated_at: DateTime<Utc>,
}

impl ReportRow {
    fn new(metadata: CompanyUrgencyMetadata, company_name: Option<String>) -> Self {
        Self {
            company_id: metadata.company_id,
            company_name,
            color_class: metadata.color_class,
            css_class: metadata.color_class.css_class().to_string(),
            severity_rank: metadata.severity_rank,
            item_count: metadata.item_count,
            debt_item_count: metadata.debt_item_count,
            debt_share: metadata.debt_share(),
            days_in_state: metadata.days_in_state,
            planned_date: metadata.planned_date,
            planned_note: metadata.planned_note,
            days_until_planned: metadata.days_until_planned,
            last_updated_at: metadata.last_updated_at,
        }
    }
}

/// Companies ordered most urgent first, with the parameters of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageReport {
    pub generated_at: DateTime<Utc>,
    pub timezone: Timezone,
    pub districts: Vec<DistrictId>,
    pub statuses: Vec<ItemStatus>,
    /// Claims whose cached status was stale in the snapshot
    pub corrected_claims: usize,
    pub color_counts: BTreeMap<ColorClass, usize>,
    pub companies: Vec<ReportRow>,
}

impl TriageReport {
    pub fn build(
        snapshot: &LoadedSnapshot,
        metadata: BTreeMap<CompanyId, CompanyUrgencyMetadata>,
        districts: &BTreeSet<DistrictId>,
        statuses: &BTreeSet<ItemStatus>,
        timezone: Timezone,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let companies: Vec<ReportRow> = rank(metadata.into_values())
            .into_iter()
            .map(|entry| {
                let name = snapshot.company_name(entry.company_id).map(str::to_string);
                ReportRow::new(entry, name)
            })
            .collect();

        let mut color_counts = BTreeMap::new();
        for row in &companies {
            *color_counts.entry(row.color_class).or_insert(0) += 1;
        }

        Self {
            generated_at,
            timezone,
            districts: districts.iter().copied().collect(),
            statuses: statuses.iter().copied().collect(),
            corrected_claims: snapshot.corrected,
            color_counts,
            companies,
        }
    }

    /// Rows with the given color, in report order
    pub fn with_color(&self, color: ColorClass) -> impl Iterator<Item = &ReportRow> {
        self.companies.iter().filter(move |row| row.color_class == color)
    }
}
