use std::collections::{BTreeMap, HashSet};

use crate::value::Value;

use super::{get_real_type, get_type, TypeLabel};

pub fn get_types_of_items(items: &[Value]) -> Vec<TypeLabel> {
    items.iter().map(get_type).collect()
}

pub fn get_real_types_of_items(items: &[Value]) -> Vec<TypeLabel> {
    items.iter().map(get_real_type).collect()
}

/// Exactly one distinct shallow tag. Empty input has zero tags, so it is `false`.
pub fn all_items_have_the_same_type(items: &[Value]) -> bool {
    let tags: HashSet<TypeLabel> = items.iter().map(get_type).collect();
    tags.len() == 1
}

/// No two items share a real type. Empty input is `true`.
pub fn every_item_has_a_unique_real_type(items: &[Value]) -> bool {
    let tags: HashSet<TypeLabel> = items.iter().map(get_real_type).collect();
    tags.len() == items.len()
}

/// Tally of real types, ascending by label text.
pub fn count_real_types(items: &[Value]) -> Vec<(TypeLabel, usize)> {
    let mut counts = BTreeMap::<TypeLabel, usize>::new();
    for item in items {
        *counts.entry(get_real_type(item)).or_default() += 1;
    }
    counts.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn per_item_labels_keep_order_and_length() {
        let items = vec![Value::Bool(true), Value::Null, Value::from("x"), Value::Number(f64::NAN)];
        assert_eq!(
            get_types_of_items(&items),
            vec![TypeLabel::Boolean, TypeLabel::Object, TypeLabel::String, TypeLabel::Number]
        );
        assert_eq!(
            get_real_types_of_items(&items),
            vec![TypeLabel::Boolean, TypeLabel::Null, TypeLabel::String, TypeLabel::NaN]
        );
        assert_eq!(get_types_of_items(&[]).len(), 0);
    }

    #[test]
    fn same_type_boundary_on_empty_input() {
        assert!(!all_items_have_the_same_type(&[]));
        assert!(all_items_have_the_same_type(&[Value::Null, Value::empty_object(), Value::Array(vec![])]));
        assert!(!all_items_have_the_same_type(&[Value::from(1), Value::from("1")]));
    }

    #[test]
    fn unique_real_types() {
        assert!(every_item_has_a_unique_real_type(&[]));
        assert!(every_item_has_a_unique_real_type(&[Value::Bool(true), Value::from(123), Value::from("123")]));
        assert!(!every_item_has_a_unique_real_type(&[Value::Bool(true), Value::from(123), Value::Bool(false)]));
        // Same shallow tag, different real types.
        assert!(every_item_has_a_unique_real_type(&[Value::Null, Value::empty_object(), Value::Set(vec![])]));
    }

    #[test]
    fn counts_are_sorted_by_label() {
        let items = vec![
            Value::Bool(true),
            Value::Null,
            Value::Bool(!Value::Null.is_truthy()),
            Value::Bool(Value::Null.is_truthy()),
            Value::empty_object(),
        ];
        assert_eq!(
            count_real_types(&items),
            vec![(TypeLabel::Boolean, 3), (TypeLabel::Null, 1), (TypeLabel::Object, 1)]
        );

        let mixed = vec![Value::from("s"), Value::Number(f64::INFINITY), Value::Number(f64::NAN), Value::from(1)];
        let labels: Vec<&str> = count_real_types(&mixed).iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Infinity", "NaN", "number", "string"]);
    }
}
