//! Property tests: retention planning is a stable, covering partition.

use proptest::prelude::*;
use stagekeep_lifecycle::{RetentionPlanner, RetentionPolicy};
use stagekeep_types::{DeployedVersion, StageRecord, VersionComparator};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Deployed versions in discovery order. Each stage name is unique so that
/// records with equal tokens can still be told apart.
fn arb_deployed() -> impl Strategy<Value = Vec<DeployedVersion>> {
    prop::collection::vec(
        prop_oneof![
            8 => (0u64..4, 0u64..4).prop_map(|(major, minor)| format!("v{major}-{minor}")),
            1 => Just("unreadable".to_string()),
        ],
        0..20,
    )
    .prop_map(|tags| {
        let cmp = VersionComparator::default();
        tags.into_iter()
            .enumerate()
            .map(|(i, tag)| {
                DeployedVersion::from_record(StageRecord::new(format!("stage-{i}"), tag), &cmp)
            })
            .collect()
    })
}

fn names(list: &[DeployedVersion]) -> Vec<String> {
    list.iter().filter_map(|v| v.identifier.clone()).collect()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn keep_length_is_bounded_by_window(versions in arb_deployed(), count in 1usize..8) {
        let total = versions.len();
        let planner = RetentionPlanner::new(RetentionPolicy::new(count).unwrap());
        let decision = planner.plan(RetentionPlanner::order(versions));

        prop_assert_eq!(decision.keep.len(), count.min(total));
        prop_assert_eq!(decision.total(), total);
    }

    #[test]
    fn keep_and_retire_partition_the_input(versions in arb_deployed(), count in 1usize..8) {
        let mut expected = names(&versions);
        let planner = RetentionPlanner::new(RetentionPolicy::new(count).unwrap());
        let decision = planner.plan(RetentionPlanner::order(versions));

        let mut seen = names(&decision.retire);
        seen.extend(names(&decision.keep));
        expected.sort();
        seen.sort();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn kept_versions_are_never_older_than_retired(versions in arb_deployed(), count in 1usize..8) {
        let planner = RetentionPlanner::new(RetentionPolicy::new(count).unwrap());
        let decision = planner.plan(RetentionPlanner::order(versions));

        for kept in &decision.keep {
            for retired in &decision.retire {
                prop_assert!(kept.token >= retired.token);
            }
        }
    }

    #[test]
    fn ordering_is_stable_for_equal_versions(versions in arb_deployed()) {
        let position = |v: &DeployedVersion| -> usize {
            v.identifier.as_deref().unwrap()["stage-".len()..].parse().unwrap()
        };
        let ordered = RetentionPlanner::order(versions);

        for pair in ordered.windows(2) {
            prop_assert!(pair[0].token <= pair[1].token);
            if pair[0].token == pair[1].token {
                prop_assert!(position(&pair[0]) < position(&pair[1]));
            }
        }
    }

    #[test]
    fn planning_is_deterministic(versions in arb_deployed(), count in 1usize..8) {
        let planner = RetentionPlanner::new(RetentionPolicy::new(count).unwrap());
        let first = planner.plan(RetentionPlanner::order(versions.clone()));
        let second = planner.plan(RetentionPlanner::order(versions));
        prop_assert_eq!(first, second);
    }
}
