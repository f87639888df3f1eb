//! Tests for the escalation classifier

use domain_claims::{
    ColorClass, EscalationClassifier, EscalationInput, EscalationThresholds, PlannedWindow,
};
use proptest::prelude::*;
use test_utils::{assert_escalation, escalation_input_strategy, StringFixtures, TemporalFixtures};

fn planned(days_until: i64) -> Option<PlannedWindow> {
    Some(PlannedWindow {
        date: TemporalFixtures::date_in(days_until),
        days_until,
    })
}

// ============================================================================
// Override Ordering
// ============================================================================

mod override_tests {
    use super::*;

    #[test]
    fn test_suppression_wins_over_saturation() {
        let escalation = EscalationClassifier::default().classify(&EscalationInput {
            planned: planned(0),
            days_in_state: 0,
            item_count: 3,
            debt_item_count: 3,
            claim_type_flag: Some(StringFixtures::suppression_flag().to_string()),
        });

        assert_escalation(&escalation, ColorClass::White);
    }

    #[test]
    fn test_saturation_overrides_elapsed_red() {
        let escalation = EscalationClassifier::default().classify(&EscalationInput {
            planned: None,
            days_in_state: 6,
            item_count: 2,
            debt_item_count: 2,
            claim_type_flag: None,
        });

        assert_escalation(&escalation, ColorClass::Graphite);
    }

    #[test]
    fn test_partial_debt_does_not_saturate() {
        let escalation = EscalationClassifier::default().classify(&EscalationInput {
            days_in_state: 6,
            item_count: 3,
            debt_item_count: 2,
            ..Default::default()
        });

        assert_escalation(&escalation, ColorClass::Red);
    }

    #[test]
    fn test_custom_suppression_flag() {
        let classifier = EscalationClassifier::new(EscalationThresholds {
            suppression_flag: "Litigation".to_string(),
            ..Default::default()
        })
        .unwrap();

        let input = |flag: &str| EscalationInput {
            planned: planned(1),
            item_count: 1,
            claim_type_flag: Some(flag.to_string()),
            ..Default::default()
        };

        assert_escalation(&classifier.classify(&input("Litigation")), ColorClass::White);
        assert_escalation(&classifier.classify(&input("Overdue")), ColorClass::Red);
    }

    #[test]
    fn test_custom_elapsed_bounds() {
        let classifier = EscalationClassifier::new(EscalationThresholds {
            elapsed_green_min_days: 2,
            elapsed_yellow_min_days: 4,
            elapsed_red_after_days: 10,
            ..Default::default()
        })
        .unwrap();

        let classify = |days| {
            classifier
                .classify(&EscalationInput {
                    days_in_state: days,
                    item_count: 1,
                    ..Default::default()
                })
                .color
        };

        assert_eq!(classify(1), ColorClass::White);
        assert_eq!(classify(2), ColorClass::Green);
        assert_eq!(classify(4), ColorClass::Yellow);
        assert_eq!(classify(10), ColorClass::Yellow);
        assert_eq!(classify(11), ColorClass::Red);
    }
}

// ============================================================================
// Properties
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_rank_matches_color(input in escalation_input_strategy()) {
            let escalation = EscalationClassifier::default().classify(&input);
            prop_assert_eq!(escalation.severity_rank, escalation.color.severity_rank());
            prop_assert!((1..=5).contains(&escalation.severity_rank));
        }

        #[test]
        fn prop_suppression_always_white(mut input in escalation_input_strategy()) {
            input.claim_type_flag = Some("Overdue".to_string());
            let escalation = EscalationClassifier::default().classify(&input);
            prop_assert_eq!(escalation.color, ColorClass::White);
        }

        #[test]
        fn prop_saturation_without_suppression_is_graphite(
            mut input in escalation_input_strategy(),
            count in 1usize..20,
        ) {
            input.item_count = count;
            input.debt_item_count = count;
            input.claim_type_flag = None;
            let escalation = EscalationClassifier::default().classify(&input);
            prop_assert_eq!(escalation.color, ColorClass::Graphite);
        }

        #[test]
        fn prop_planned_date_ignores_elapsed_time(
            mut input in escalation_input_strategy(),
            window in test_utils::planned_window_strategy(),
            other_days in -2i64..60,
        ) {
            input.planned = Some(window);
            let classifier = EscalationClassifier::default();
            let first = classifier.classify(&input);
            input.days_in_state = other_days;
            prop_assert_eq!(classifier.classify(&input), first);
        }

        #[test]
        fn prop_no_signal_is_white(days in -30i64..=0, items in 0usize..5) {
            let escalation = EscalationClassifier::default().classify(&EscalationInput {
                days_in_state: days,
                item_count: items,
                ..Default::default()
            });
            prop_assert_eq!(escalation.color, ColorClass::White);
        }
    }
}
