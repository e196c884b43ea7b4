//! Property tests for value set salvage and qualified names

use pconf_model::{QualifiedName, ValueSet};
use proptest::prelude::*;

fn numeric() -> impl Strategy<Value = String> {
    (-1000i32..1000).prop_map(|n| n.to_string())
}

fn value_set() -> impl Strategy<Value = ValueSet> {
    prop_oneof![
        Just(ValueSet::Unrestricted),
        prop::collection::vec(prop_oneof![numeric(), "[a-z]{1,4}"], 0..6)
            .prop_map(ValueSet::enumeration),
        (
            prop::option::of(numeric()),
            prop::option::of(numeric())
        )
            .prop_map(|(lower, upper)| ValueSet::Range {
                lower,
                upper,
                step: None
            }),
    ]
}

proptest! {
    #[test]
    fn fitted_set_is_compatible(stored in value_set(), declared in value_set()) {
        if let Some(fitted) = stored.fit_to(&declared) {
            prop_assert!(fitted.is_compatible_with(&declared));
        }
    }

    #[test]
    fn compatible_set_fits_unchanged(stored in value_set(), declared in value_set()) {
        if stored.is_compatible_with(&declared) {
            prop_assert_eq!(stored.fit_to(&declared), Some(stored.clone()));
        }
    }

    #[test]
    fn salvaged_enum_values_come_from_declaration(
        lower in -100i32..100,
        width in 0i32..100,
        values in prop::collection::vec(-200i32..200, 1..8),
    ) {
        let declared = ValueSet::enumeration(values.iter().map(ToString::to_string));
        let stored = ValueSet::range(lower.to_string(), (lower + width).to_string());

        match stored.fit_to(&declared) {
            Some(ValueSet::Enum { values: kept }) => {
                for value in &kept {
                    let v: i32 = value.parse().unwrap();
                    prop_assert!(values.contains(&v));
                    prop_assert!(v >= lower && v <= lower + width);
                }
            }
            Some(other) => prop_assert!(false, "unexpected salvage {other}"),
            None => prop_assert!(values.iter().all(|v| *v < lower || *v > lower + width)),
        }
    }

    #[test]
    fn salvaged_range_stays_inside_declaration(
        lower in -100i32..100,
        width in 0i32..100,
        values in prop::collection::vec(-200i32..200, 1..8),
    ) {
        let declared = ValueSet::range(lower.to_string(), (lower + width).to_string());
        let stored = ValueSet::enumeration(values.iter().map(ToString::to_string));

        match stored.fit_to(&declared) {
            Some(ValueSet::Range { lower: Some(from), upper: Some(to), .. }) => {
                let from: i32 = from.parse().unwrap();
                let to: i32 = to.parse().unwrap();
                prop_assert!(lower <= from && from <= to && to <= lower + width);
            }
            Some(other) => prop_assert!(false, "unexpected salvage {other}"),
            None => {
                let min = *values.iter().min().unwrap();
                let max = *values.iter().max().unwrap();
                prop_assert!(max < lower || min > lower + width);
            }
        }
    }

    #[test]
    fn qualified_name_package_is_prefix(segments in prop::collection::vec("[a-z][a-z0-9]{0,5}", 1..5)) {
        let text = segments.join(".");
        let name: QualifiedName = text.parse().unwrap();
        prop_assert_eq!(name.to_string(), text.clone());
        if let Some(package) = name.package() {
            prop_assert!(name.is_within(&package));
            prop_assert!(text.starts_with(&package.to_string()));
        } else {
            prop_assert_eq!(segments.len(), 1);
        }
    }
}
