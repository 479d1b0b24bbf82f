//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::{Domain, FieldValueFilter};
use proptest::prelude::*;

// ============================================================================
// Domain Property Tests
// ============================================================================

mod domain_tests {
    use super::*;

    fn label() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{1,12}"
    }

    fn suffix() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("com"),
            Just("io"),
            Just("co.uk"),
            Just("com.au"),
            Just("de"),
        ]
    }

    fn url_like() -> impl Strategy<Value = String> {
        (
            prop_oneof![Just(""), Just("http://"), Just("https://"), Just("HTTPS://")],
            proptest::collection::vec(label(), 0..3),
            label(),
            suffix(),
            prop_oneof![
                Just(""),
                Just("/"),
                Just("/about?x=1"),
                Just("#top"),
                Just("/redirect?u=https://other.io/path"),
            ],
        )
            .prop_map(|(scheme, subdomains, name, suffix, tail)| {
                let mut host = subdomains.join(".");
                if !host.is_empty() {
                    host.push('.');
                }
                format!("{scheme}{host}{name}.{suffix}{tail}")
            })
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent_for_urls(raw in url_like()) {
            let once = Domain::parse(&raw).unwrap();
            let twice = Domain::parse(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn normalization_is_idempotent_for_arbitrary_input(raw in "\\PC{0,40}") {
            if let Ok(once) = Domain::parse(&raw) {
                let twice = Domain::parse(once.as_str()).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        #[test]
        fn normalized_domain_drops_subdomains(
            subdomains in proptest::collection::vec(label(), 1..4),
            name in label(),
            suffix in suffix(),
        ) {
            let raw = format!("{}.{name}.{suffix}", subdomains.join("."));
            let domain = Domain::parse(&raw).unwrap();
            prop_assert_eq!(domain.as_str(), format!("{name}.{suffix}"));
        }

        #[test]
        fn query_embedding_a_url_keeps_the_outer_host(
            scheme in prop_oneof![Just(""), Just("https://")],
            name in label(),
            suffix in suffix(),
            other in label(),
        ) {
            let raw = format!("{scheme}www.{name}.{suffix}/go?next=http://{other}.org/x");
            let domain = Domain::parse(&raw).unwrap();
            prop_assert_eq!(domain.as_str(), format!("{name}.{suffix}"));
        }

        #[test]
        fn normalized_domain_is_lowercase(raw in url_like()) {
            let domain = Domain::parse(&raw).unwrap();
            prop_assert_eq!(domain.as_str(), domain.as_str().to_lowercase());
        }
    }
}

// ============================================================================
// FieldValueFilter Property Tests
// ============================================================================

mod field_value_filter_tests {
    use super::*;

    proptest! {
        #[test]
        fn exactly_one_key_is_accepted(
            keys in proptest::array::uniform4(proptest::option::of(any::<i64>()))
        ) {
            let set = keys.iter().filter(|k| k.is_some()).count();
            let result = FieldValueFilter::from_keys(keys[0], keys[1], keys[2], keys[3]);
            prop_assert_eq!(result.is_ok(), set == 1);
        }
    }
}
