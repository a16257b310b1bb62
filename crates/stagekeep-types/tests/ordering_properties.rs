//! Property tests: version comparison is a total order consistent with parsing.

use proptest::prelude::*;
use stagekeep_types::{VersionComparator, VersionToken};
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Small components so that equal and zero-padded tokens show up often.
fn arb_token() -> impl Strategy<Value = VersionToken> {
    prop::collection::vec(0u64..4, 1..5).prop_map(VersionToken::new)
}

fn render(components: &[u64]) -> String {
    let body: Vec<String> = components.iter().map(|c| c.to_string()).collect();
    format!("v{}", body.join("-"))
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn compare_is_antisymmetric(a in arb_token(), b in arb_token()) {
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn compare_is_transitive(a in arb_token(), b in arb_token(), c in arb_token()) {
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
    }

    #[test]
    fn is_greater_matches_compare(a in arb_token(), b in arb_token()) {
        let cmp = VersionComparator::default();
        prop_assert_eq!(cmp.is_greater(&a, &b), cmp.compare(&a, &b) == Ordering::Greater);
    }

    #[test]
    fn trailing_zeros_do_not_change_order(
        components in prop::collection::vec(0u64..1000, 1..5),
        zeros in 0usize..3,
    ) {
        let mut padded = components.clone();
        padded.extend(std::iter::repeat(0).take(zeros));
        prop_assert_eq!(VersionToken::new(components), VersionToken::new(padded));
    }

    #[test]
    fn rendered_candidates_parse_back(components in prop::collection::vec(0u64..100_000, 1..5)) {
        let raw = render(&components);
        let token = VersionToken::parse_candidate(&raw).unwrap();
        prop_assert_eq!(token.components(), components.as_slice());
        prop_assert_eq!(VersionToken::parse_tag(&raw).unwrap(), token);
    }
}
