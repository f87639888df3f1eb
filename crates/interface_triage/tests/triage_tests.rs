//! End-to-end tests for the triage shell

use core_kernel::{AdapterHealth, DistrictId};
use domain_claims::{ChangeEvent, ClaimStatus, ColorClass, Company, ItemStatus, PlannedVisitDate};
use domain_claims::EscalationClassifier;
use interface_triage::config::TriageConfig;
use interface_triage::error::TriageError;
use interface_triage::snapshot::Snapshot;
use interface_triage::triage;
use rust_decimal_macros::dec;
use test_utils::{ClaimBuilder, StringFixtures, TemporalFixtures};

fn config(districts: &str, statuses: &str) -> TriageConfig {
    TriageConfig {
        snapshot_path: "unused.json".to_string(),
        districts: districts.to_string(),
        statuses: statuses.to_string(),
        timezone: "UTC".to_string(),
        log_level: "info".to_string(),
        log_json: false,
    }
}

// ============================================================================
// Snapshot Fixture
// ============================================================================

struct World {
    snapshot: Snapshot,
    north: DistrictId,
    red: Company,
    graphite: Company,
    quiet: Company,
    elsewhere: Company,
}

fn world() -> World {
    let north = DistrictId::new_v7();
    let south = DistrictId::new_v7();
    let red = Company::new("Red Panel Works", north);
    let graphite = Company::new("Graphite Motors", north);
    let quiet = Company::new(StringFixtures::company_name(), north);
    let elsewhere = Company::new("Southern Glass", south);

    let waiting = ClaimBuilder::new(red.id)
        .with_claim_number("CLM-2024-000777")
        .with_item(ItemStatus::InProgress, 20)
        .with_item(ItemStatus::Yes, 20)
        .build();
    let entered = waiting.items[0].id;

    let snapshot = Snapshot {
        companies: vec![red.clone(), graphite.clone(), quiet.clone(), elsewhere.clone()],
        claims: vec![
            waiting,
            ClaimBuilder::new(graphite.id)
                .with_items(&[ItemStatus::Debt, ItemStatus::Debt], 2)
                .build(),
            ClaimBuilder::new(quiet.id).with_item(ItemStatus::Yes, 1).build(),
            ClaimBuilder::new(elsewhere.id)
                .with_item(ItemStatus::InProgress, 3)
                .build(),
        ],
        change_events: vec![ChangeEvent::status_change(
            entered,
            Some(ItemStatus::Missing),
            ItemStatus::InProgress,
            TemporalFixtures::days_ago(8),
        )],
        planned_visits: vec![PlannedVisitDate::new(
            elsewhere.id,
            TemporalFixtures::date_in(5),
            "",
        )],
    };

    World {
        snapshot,
        north,
        red,
        graphite,
        quiet,
        elsewhere,
    }
}

// ============================================================================
// Triage Tests
// ============================================================================

mod triage_tests {
    use super::*;

    #[test]
    fn test_ranks_companies_of_all_districts() {
        let world = world();

        let report = triage(
            world.snapshot,
            &config("", "IN_PROGRESS,DEBT"),
            EscalationClassifier::default(),
            TemporalFixtures::now(),
        )
        .unwrap();

        let order: Vec<_> = report.companies.iter().map(|row| row.company_id).collect();
        assert_eq!(order, vec![world.red.id, world.elsewhere.id, world.graphite.id]);
        assert!(report.companies.iter().all(|row| row.company_id != world.quiet.id));
    }

    #[test]
    fn test_rows_carry_reconstructed_metadata() {
        let world = world();

        let report = triage(
            world.snapshot,
            &config("", "IN_PROGRESS,DEBT"),
            EscalationClassifier::default(),
            TemporalFixtures::now(),
        )
        .unwrap();

        let red = &report.companies[0];
        assert_eq!(red.company_name.as_deref(), Some("Red Panel Works"));
        assert_eq!(red.days_in_state, 8);
        assert_eq!(red.color_class, ColorClass::Red);
        assert_eq!(red.css_class, "red");

        let planned = report.with_color(ColorClass::Green).next().unwrap();
        assert_eq!(planned.company_id, world.elsewhere.id);
        assert_eq!(planned.days_until_planned, Some(5));

        let graphite = report.with_color(ColorClass::Graphite).next().unwrap();
        assert_eq!(graphite.debt_share, dec!(100));
        assert_eq!(report.color_counts.get(&ColorClass::Red), Some(&1));
    }

    #[test]
    fn test_district_filter_applies() {
        let world = world();
        let districts = world.north.to_string();

        let report = triage(
            world.snapshot,
            &config(&districts, "IN_PROGRESS"),
            EscalationClassifier::default(),
            TemporalFixtures::now(),
        )
        .unwrap();

        assert_eq!(report.districts, vec![world.north]);
        assert_eq!(report.companies.len(), 1);
        assert_eq!(report.companies[0].company_id, world.red.id);
    }

    #[test]
    fn test_stale_cached_status_is_corrected_on_load() {
        let mut world = world();
        world.snapshot.claims.push(
            ClaimBuilder::new(world.quiet.id)
                .with_item(ItemStatus::No, 1)
                .stale()
                .build(),
        );
        assert_eq!(world.snapshot.claims[4].status, ClaimStatus::NotProcessed);

        let report = triage(
            world.snapshot,
            &config("", "DEBT"),
            EscalationClassifier::default(),
            TemporalFixtures::now(),
        )
        .unwrap();

        assert_eq!(report.corrected_claims, 1);
    }

    #[test]
    fn test_adapters_healthy_after_stale_claims_are_corrected() {
        let mut world = world();
        world.snapshot.claims.push(
            ClaimBuilder::new(world.quiet.id)
                .with_item(ItemStatus::Debt, 1)
                .stale()
                .build(),
        );

        let loaded = world.snapshot.load().unwrap();

        assert_eq!(loaded.corrected, 1);
        assert!(loaded.store.stale_claims().is_empty());
        assert!(loaded.health().iter().all(|check| check.status == AdapterHealth::Healthy));
    }

    #[test]
    fn test_loaded_adapters_report_healthy() {
        let loaded = world().snapshot.load().unwrap();

        let health = loaded.health();
        assert_eq!(health.len(), 3);
        assert!(health.iter().all(|check| check.status == AdapterHealth::Healthy));
        assert_eq!(loaded.districts.len(), 2);
        assert_eq!(loaded.corrected, 0);
    }

    #[test]
    fn test_snapshot_survives_json() {
        let world = world();
        let json = serde_json::to_string(&world.snapshot).unwrap();

        let parsed = Snapshot::from_json(&json).unwrap();
        assert_eq!(parsed.claims[0].claim_number, "CLM-2024-000777");
        let report = triage(
            parsed,
            &config("", "IN_PROGRESS,DEBT"),
            EscalationClassifier::default(),
            TemporalFixtures::now(),
        )
        .unwrap();

        assert_eq!(report.companies.len(), 3);
        assert!(serde_json::to_string(&report).is_ok());
    }
}

// ============================================================================
// Failure Tests
// ============================================================================

mod failure_tests {
    use super::*;

    #[test]
    fn test_item_naming_another_claim_is_rejected() {
        let mut world = world();
        let foreign = world.snapshot.claims[1].id;
        world.snapshot.claims[0].items[0].claim_id = foreign;

        let result = triage(
            world.snapshot,
            &config("", "IN_PROGRESS"),
            EscalationClassifier::default(),
            TemporalFixtures::now(),
        );

        assert!(matches!(result, Err(TriageError::SnapshotConflict(_))));
    }

    #[test]
    fn test_item_shared_between_claims_is_rejected() {
        let mut world = world();
        let mut shared = world.snapshot.claims[0].items[0].clone();
        shared.claim_id = world.snapshot.claims[2].id;
        world.snapshot.claims[2].items.push(shared);

        let result = world.snapshot.load();

        match result {
            Err(TriageError::SnapshotConflict(message)) => assert!(message.contains("line item")),
            Err(other) => panic!("expected a conflict, got {}", other),
            Ok(_) => panic!("snapshot with a shared line item was accepted"),
        }
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            Snapshot::from_json("{\"claims\": 7}"),
            Err(TriageError::SnapshotFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = interface_triage::run(
            &TriageConfig {
                snapshot_path: "/nonexistent/snapshot.json".to_string(),
                ..config("", "DEBT")
            },
            EscalationClassifier::default(),
            TemporalFixtures::now(),
        );

        assert!(matches!(result, Err(TriageError::SnapshotRead { .. })));
    }

    #[test]
    fn test_empty_snapshot_yields_empty_report() {
        let report = triage(
            Snapshot::default(),
            &config("", "DEBT"),
            EscalationClassifier::default(),
            TemporalFixtures::now(),
        )
        .unwrap();

        assert!(report.companies.is_empty());
    }
}
