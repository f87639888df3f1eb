//! Property tests for claim status aggregation

use domain_claims::{aggregate, ClaimStatus, ItemStatus};
use proptest::prelude::*;
use test_utils::{item_status_strategy, item_statuses_strategy};

use ItemStatus::*;

// ============================================================================
// Documented Examples
// ============================================================================

mod example_tests {
    use super::*;

    #[test]
    fn test_documented_examples() {
        let cases: &[(&[ItemStatus], ClaimStatus)] = &[
            (&[], ClaimStatus::NotProcessed),
            (&[Yes, Yes], ClaimStatus::Yes),
            (&[Yes, GlassRejected], ClaimStatus::YesExceptGlass),
            (&[Yes, Missing, GlassRejected], ClaimStatus::YesExceptMissingAndGlass),
            (&[Yes, Debt], ClaimStatus::Partial),
            (&[No, Debt], ClaimStatus::Partial),
            (&[No], ClaimStatus::No),
            (&[InProgress, InProgress], ClaimStatus::NotProcessed),
        ];

        for (statuses, expected) in cases {
            assert_eq!(
                aggregate(statuses.iter().copied()),
                *expected,
                "aggregate({:?})",
                statuses
            );
        }
    }

    #[test]
    fn test_missing_glass_with_not_requested_keeps_exception() {
        assert_eq!(
            aggregate([Yes, Missing, GlassRejected, NotRequested]),
            ClaimStatus::YesExceptMissingAndGlass
        );
    }

    #[test]
    fn test_missing_glass_with_no_is_partial() {
        assert_eq!(aggregate([Yes, Missing, GlassRejected, No]), ClaimStatus::Partial);
    }

    #[test]
    fn test_yes_except_missing_tolerates_in_progress() {
        assert_eq!(aggregate([Yes, Missing, InProgress]), ClaimStatus::YesExceptMissing);
    }

    #[test]
    fn test_rejections_without_yes() {
        assert_eq!(aggregate([RegionRejected]), ClaimStatus::RegionRejected);
        assert_eq!(aggregate([ScrapRejected, CutRejected]), ClaimStatus::Partial);
        assert_eq!(aggregate([Missing, Missing, Missing]), ClaimStatus::NoParts);
    }

    #[test]
    fn test_every_claim_status_is_derivable() {
        let derived: std::collections::BTreeSet<ClaimStatus> = (0u32..1 << ItemStatus::ALL.len())
            .map(|mask| {
                aggregate(
                    ItemStatus::ALL
                        .into_iter()
                        .enumerate()
                        .filter(|(bit, _)| mask & (1 << bit) != 0)
                        .map(|(_, status)| status),
                )
            })
            .collect();

        let vocabulary: std::collections::BTreeSet<ClaimStatus> = ClaimStatus::ALL.into_iter().collect();
        assert_eq!(derived, vocabulary);
    }
}

// ============================================================================
// Properties
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_order_independent(
            (original, shuffled) in item_statuses_strategy(12)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            prop_assert_eq!(
                aggregate(original.iter().copied()),
                aggregate(shuffled.iter().copied())
            );
        }

        #[test]
        fn prop_depends_only_on_membership(statuses in item_statuses_strategy(12)) {
            let doubled: Vec<_> = statuses.iter().chain(statuses.iter()).copied().collect();
            prop_assert_eq!(aggregate(statuses), aggregate(doubled));
        }

        #[test]
        fn prop_uniform_item_sets(status in item_status_strategy(), count in 1usize..8) {
            let statuses = vec![status; count];
            let expected = match status {
                Yes => ClaimStatus::Yes,
                No => ClaimStatus::No,
                Debt => ClaimStatus::Debt,
                other => other.uniform_claim_status().unwrap(),
            };
            prop_assert_eq!(aggregate(statuses), expected);
        }

        #[test]
        fn prop_yes_variants_require_yes(statuses in item_statuses_strategy(12)) {
            let result = aggregate(statuses.iter().copied());
            let yes_family = matches!(
                result,
                ClaimStatus::Yes
                    | ClaimStatus::YesExceptGlass
                    | ClaimStatus::YesExceptMissing
                    | ClaimStatus::YesExceptMissingAndGlass
                    | ClaimStatus::YesExceptNotRequested
            );
            if yes_family {
                prop_assert!(statuses.contains(&Yes));
            }
        }

        #[test]
        fn prop_plain_yes_excludes_exceptions(statuses in item_statuses_strategy(12)) {
            if aggregate(statuses.iter().copied()) == ClaimStatus::Yes {
                for excluded in [No, Debt, Missing, GlassRejected, NotRequested] {
                    prop_assert!(!statuses.contains(&excluded));
                }
            }
        }

        #[test]
        fn prop_no_without_yes(
            mut statuses in prop::collection::vec(
                item_status_strategy().prop_filter("without YES", |status| *status != Yes),
                0..10,
            )
        ) {
            statuses.push(No);
            let expected = if statuses.contains(&Debt) {
                ClaimStatus::Partial
            } else {
                ClaimStatus::No
            };
            prop_assert_eq!(aggregate(statuses), expected);
        }
    }
}
