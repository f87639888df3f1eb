//! Companies and their planned visits

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CompanyId, DistrictId, PlannedVisitId};

/// A company whose claims are collected and triaged together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub district_id: DistrictId,
}

impl Company {
    pub fn new(name: impl Into<String>, district_id: DistrictId) -> Self {
        Self {
            id: CompanyId::new_v7(),
            name: name.into(),
            district_id,
        }
    }
}

/// A visit to a company planned for a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedVisitDate {
    pub id: PlannedVisitId,
    pub company_id: CompanyId,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl PlannedVisitDate {
    pub fn new(company_id: CompanyId, date: NaiveDate, note: impl Into<String>) -> Self {
        Self {
            id: PlannedVisitId::new_v7(),
            company_id,
            date,
            note: note.into(),
            created_at: Utc::now(),
        }
    }

    /// Ordering key for "latest": the later date wins, then the later entry
    pub fn recency_key(&self) -> (NaiveDate, DateTime<Utc>) {
        (self.date, self.created_at)
    }
}
