use std::collections::BTreeSet;

use proptest::prelude::*;

use referable_map::{
    MappingState, auto_map, derive_extra_fields, is_blank_header, matches, normalize, synonyms,
};
use referable_model::LogicalField;

/// Header pool mixing synonyms, near-misses, blanks and noise.
fn header_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Client Name".to_string()),
        Just("name".to_string()),
        Just("E-Mail".to_string()),
        Just("email".to_string()),
        Just("Phone".to_string()),
        Just("Mobile".to_string()),
        Just("Service Date".to_string()),
        Just("date".to_string()),
        Just("Status".to_string()),
        Just("Amount".to_string()),
        Just("Total".to_string()),
        Just("".to_string()),
        Just("   ".to_string()),
        "[A-Za-z _\\-]{0,12}",
    ]
}

fn field_strategy() -> impl Strategy<Value = LogicalField> {
    prop::sample::select(LogicalField::ALL.to_vec())
}

proptest! {
    #[test]
    fn normalize_is_idempotent(header in ".{0,24}") {
        let once = normalize(&header);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn auto_map_never_shares_a_header(headers in prop::collection::vec(header_strategy(), 0..10)) {
        let result = auto_map(&headers);
        let mapped: Vec<&str> = result.mapping.headers().collect();
        let unique: BTreeSet<&str> = mapped.iter().copied().collect();
        prop_assert_eq!(mapped.len(), unique.len());
    }

    #[test]
    fn extras_are_headers_minus_blanks_and_mapped(headers in prop::collection::vec(header_strategy(), 0..10)) {
        let result = auto_map(&headers);
        let expected: BTreeSet<&str> = headers
            .iter()
            .map(String::as_str)
            .filter(|header| !is_blank_header(header) && !result.mapping.contains_header(header))
            .collect();
        let actual: BTreeSet<&str> = result.extra_fields.iter().map(String::as_str).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(result.extra_fields, derive_extra_fields(&headers, &result.mapping));
    }

    #[test]
    fn edits_keep_extras_in_sync(
        headers in prop::collection::vec(header_strategy(), 1..8),
        edits in prop::collection::vec((field_strategy(), prop::option::of(0usize..8)), 0..16),
    ) {
        let mut state = MappingState::new(headers.clone());
        for (field, pick) in edits {
            let header = pick.map(|idx| headers[idx % headers.len()].as_str());
            let _ = state.set_mapping(field, header);

            let fresh = derive_extra_fields(state.headers(), state.mapping());
            prop_assert_eq!(state.extra_fields(), fresh.as_slice());

            let mapped: Vec<&str> = state.mapping().headers().collect();
            let unique: BTreeSet<&str> = mapped.iter().copied().collect();
            prop_assert_eq!(mapped.len(), unique.len());
        }
    }
}

#[test]
fn every_synonym_matches_its_field() {
    for field in LogicalField::ALL {
        for synonym in synonyms(field) {
            assert!(matches(synonym, synonyms(field)));
            assert!(matches(&synonym.to_uppercase(), synonyms(field)));
        }
    }
}
