//! Run-time type classification.
//!
//! Two granularities:
//! - [`get_type`]: the shallow tag (`null`, arrays and every object kind
//!   report `object`).
//! - [`get_real_type`]: refines the shallow tag, pulling `NaN`, `null`,
//!   `Infinity`, dates, regexps, sets and maps out of the generic buckets.
//!
//! Everything here is a pure function of its input.
pub mod items;
pub mod label;

use crate::value::Value;

pub use items::{
    all_items_have_the_same_type, count_real_types, every_item_has_a_unique_real_type,
    get_real_types_of_items, get_types_of_items,
};
pub use label::TypeLabel;

// ------------------------------ Shallow ---------------------------------- //

pub fn get_type(value: &Value) -> TypeLabel {
    match value {
        Value::Undefined => TypeLabel::Undefined,
        Value::Bool(_) => TypeLabel::Boolean,
        Value::Number(_) => TypeLabel::Number,
        Value::BigInt(_) => TypeLabel::BigInt,
        Value::String(_) => TypeLabel::String,
        Value::Symbol(_) => TypeLabel::Symbol,
        Value::Function(_) => TypeLabel::Function,
        Value::Null
        | Value::Array(_)
        | Value::Object(_)
        | Value::Date(_)
        | Value::RegExp(_)
        | Value::Set(_)
        | Value::Map(_) => TypeLabel::Object,
    }
}

// ------------------------------ Refined ---------------------------------- //

/// True only for a numeric NaN.
///
/// Non-numbers never count, so the string `"NaN"` or `undefined` is not NaN
/// even though coercing either to a number would produce one.
pub fn is_nan(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_nan())
}

/// True for positive and negative infinity.
pub fn is_infinity(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_infinite())
}

/// First match wins: NaN, null, ±Infinity, any non-object shallow tag,
/// then the built-in object kinds, then `object`.
pub fn get_real_type(value: &Value) -> TypeLabel {
    if is_nan(value) {
        return TypeLabel::NaN;
    }
    if matches!(value, Value::Null) {
        return TypeLabel::Null;
    }
    if is_infinity(value) {
        return TypeLabel::Infinity;
    }
    let shallow = get_type(value);
    if shallow != TypeLabel::Object {
        return shallow;
    }
    match value {
        Value::Date(_) => TypeLabel::Date,
        Value::RegExp(_) => TypeLabel::RegExp,
        Value::Set(_) => TypeLabel::Set,
        Value::Map(_) => TypeLabel::Map,
        _ => TypeLabel::Object,
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::RegExpValue;
    use num_bigint::BigInt;

    fn primitives() -> Vec<Value> {
        vec![
            Value::Undefined,
            Value::Bool(true),
            Value::Number(0.0),
            Value::Number(-12.5),
            Value::BigInt(BigInt::from(7)),
            Value::from("NaN"),
            Value::Symbol(None),
            Value::Function("f".into()),
        ]
    }

    #[test]
    fn shallow_tags() {
        assert_eq!(get_type(&Value::Null), TypeLabel::Object);
        assert_eq!(get_type(&Value::Undefined), TypeLabel::Undefined);
        assert_eq!(get_type(&Value::Array(vec![])), TypeLabel::Object);
        assert_eq!(get_type(&Value::Date(None)), TypeLabel::Object);
        assert_eq!(get_type(&Value::Number(f64::NAN)), TypeLabel::Number);
        assert_eq!(get_type(&Value::Function(String::new())), TypeLabel::Function);
    }

    #[test]
    fn refined_tags() {
        assert_eq!(get_real_type(&Value::Null), TypeLabel::Null);
        assert_eq!(get_real_type(&Value::Number(f64::NAN)), TypeLabel::NaN);
        assert_eq!(get_real_type(&Value::Number(f64::INFINITY)), TypeLabel::Infinity);
        assert_eq!(get_real_type(&Value::Number(f64::NEG_INFINITY)), TypeLabel::Infinity);
        assert_eq!(get_real_type(&Value::Date(None)), TypeLabel::Date);
        let re = RegExpValue::new("a+", "g").unwrap();
        assert_eq!(get_real_type(&Value::RegExp(re)), TypeLabel::RegExp);
        assert_eq!(get_real_type(&Value::Set(vec![])), TypeLabel::Set);
        assert_eq!(get_real_type(&Value::Map(vec![])), TypeLabel::Map);
        assert_eq!(get_real_type(&Value::Array(vec![])), TypeLabel::Object);
        assert_eq!(get_real_type(&Value::empty_object()), TypeLabel::Object);
    }

    #[test]
    fn primitives_agree_between_shallow_and_refined() {
        for v in primitives() {
            assert_eq!(get_type(&v), get_real_type(&v), "{v}");
        }
    }

    #[test]
    fn nan_check_ignores_non_numbers() {
        assert!(!is_nan(&Value::from("NaN")));
        assert!(!is_nan(&Value::Undefined));
        assert!(!is_nan(&Value::empty_object()));
        assert_eq!(get_real_type(&Value::from("abc")), TypeLabel::String);
    }
}
