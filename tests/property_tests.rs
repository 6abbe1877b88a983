//! Property-based tests for the signature codec.

mod common;

use cmi_payment::domain::field_map::FieldMap;
use cmi_payment::domain::signature::{self, OUTBOUND_FIELDS};
use proptest::prelude::*;

/// Strings mixing the delimiter, the escape character, ASCII and non-ASCII text.
fn field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,24}",
        "[a-z|\\\\]{0,12}",
        "\\PC{0,16}",
    ]
}

fn outbound_map() -> impl Strategy<Value = FieldMap> {
    prop::collection::vec(field_value(), OUTBOUND_FIELDS.len()).prop_map(|values| {
        OUTBOUND_FIELDS
            .iter()
            .zip(values)
            .map(|(k, v)| (*k, v))
            .collect()
    })
}

/// Counts `|` characters not preceded by an odd number of backslashes.
fn unescaped_delimiters(text: &str) -> usize {
    let mut count = 0;
    let mut backslashes = 0;
    for c in text.chars() {
        match c {
            '\\' => backslashes += 1,
            '|' => {
                if backslashes % 2 == 0 {
                    count += 1;
                }
                backslashes = 0;
            }
            _ => backslashes = 0,
        }
    }
    count
}

proptest! {
    #[test]
    fn outbound_is_deterministic(fields in outbound_map(), secret in field_value()) {
        prop_assert_eq!(
            signature::sign_outbound(&fields, &secret),
            signature::sign_outbound(&fields, &secret)
        );
    }

    #[test]
    fn changing_a_signed_field_changes_signature(
        fields in outbound_map(),
        index in 0..OUTBOUND_FIELDS.len(),
        replacement in field_value(),
    ) {
        let key = OUTBOUND_FIELDS[index];
        prop_assume!(fields.get(key) != Some(replacement.as_str()));

        let mut changed = fields.clone();
        changed.insert(key, replacement);

        prop_assert_ne!(
            signature::sign_outbound(&fields, "secret"),
            signature::sign_outbound(&changed, "secret")
        );
    }

    #[test]
    fn changing_the_secret_changes_signature(
        fields in outbound_map(),
        first in field_value(),
        second in field_value(),
    ) {
        prop_assume!(first != second);
        prop_assert_ne!(
            signature::sign_outbound(&fields, &first),
            signature::sign_outbound(&fields, &second)
        );
    }

    #[test]
    fn escaped_values_never_contain_bare_delimiters(value in field_value()) {
        prop_assert_eq!(unescaped_delimiters(&signature::escape(&value)), 0);
    }

    #[test]
    fn canonical_form_has_one_bare_delimiter_per_field(fields in outbound_map(), secret in field_value()) {
        let canonical = signature::canonicalize(&fields, OUTBOUND_FIELDS, &secret);
        prop_assert_eq!(unescaped_delimiters(&canonical), OUTBOUND_FIELDS.len());
    }

    #[test]
    fn moving_a_delimiter_between_fields_changes_canonical_form(
        left in "[a-z]{1,8}",
        middle in "[a-z]{1,8}",
        right in "[a-z]{1,8}",
    ) {
        let first: FieldMap = [("a", format!("{left}|{middle}")), ("b", right.clone())]
            .into_iter()
            .collect();
        let second: FieldMap = [("a", left), ("b", format!("{middle}|{right}"))]
            .into_iter()
            .collect();
        prop_assert_ne!(
            signature::canonicalize(&first, ["a", "b"], "s"),
            signature::canonicalize(&second, ["a", "b"], "s")
        );
    }

    #[test]
    fn inbound_ignores_key_case(
        entries in prop::collection::btree_map("[a-z]{1,10}", field_value(), 1..12),
        mask in prop::collection::vec(any::<bool>(), 12),
    ) {
        // Reserved names are matched exactly, so recasing them would change the signed set.
        prop_assume!(!entries.contains_key("hash") && !entries.contains_key("encoding"));

        let original: FieldMap = entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let recased: FieldMap = entries
            .iter()
            .zip(mask.iter().cycle())
            .map(|((k, v), upper)| {
                let key = if *upper { k.to_uppercase() } else { k.clone() };
                (key, v.clone())
            })
            .collect();

        prop_assert_eq!(
            signature::sign_inbound(&original, common::SECRET),
            signature::sign_inbound(&recased, common::SECRET)
        );
    }
}
