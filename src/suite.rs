//! Checks for the classifier, run through [`Harness`].
//!
//! [`run_builtin`] is the fixed scenario set; [`cases`] loads more from JSON
//! case files.
pub mod cases;

use std::io::Write;

use num_bigint::BigInt;
use tracing::warn;

use crate::classify::{
    all_items_have_the_same_type, count_real_types, every_item_has_a_unique_real_type,
    get_real_type, get_real_types_of_items, get_type, get_types_of_items, TypeLabel,
};
use crate::harness::Harness;
use crate::value::{RegExpValue, Value};

pub fn run_builtin<W: Write>(h: &mut Harness<W>) {
    let date = Value::Date(chrono::DateTime::from_timestamp_millis(0));
    // On a build failure the regexp checks below report `[FAIL]`.
    let regexp = match RegExpValue::new("a+", "g") {
        Ok(re) => Value::RegExp(re),
        Err(error) => {
            warn!(%error, "built-in regexp does not compile");
            Value::Undefined
        }
    };
    let set = Value::Set(vec![Value::from(1)]);
    let map = Value::Map(vec![(Value::from("k"), Value::from(1))]);

    h.test_block("getType");
    h.test("boolean", get_type(&Value::Bool(true)), "boolean");
    h.test("number", get_type(&Value::from(123)), "number");
    h.test("string", get_type(&Value::from("123")), "string");
    h.test("bigint", get_type(&Value::BigInt(BigInt::from(10))), "bigint");
    h.test("symbol", get_type(&Value::Symbol(Some("id".into()))), "symbol");
    h.test("undefined", get_type(&Value::Undefined), "undefined");
    h.test("null is an object", get_type(&Value::Null), "object");
    h.test("array is an object", get_type(&Value::from(vec![1, 2])), "object");
    h.test("function", get_type(&Value::Function("f".into())), "function");
    h.test("NaN is a number", get_type(&Value::Number(f64::NAN)), "number");

    h.test_block("getTypesOfItems");
    let items = vec![Value::Bool(true), Value::from(123), Value::from("123"), Value::Null, Value::empty_object()];
    h.test(
        "one label per item",
        get_types_of_items(&items),
        vec!["boolean", "number", "string", "object", "object"],
    );
    h.test("empty input", get_types_of_items(&[]), Vec::<Value>::new());

    h.test_block("allItemsHaveTheSameType");
    h.test("all numbers", all_items_have_the_same_type(&[Value::from(1), Value::from(2), Value::from(3)]), true);
    h.test("number and string", all_items_have_the_same_type(&[Value::from(1), Value::from("2")]), false);
    h.test("null and object share a tag", all_items_have_the_same_type(&[Value::Null, Value::empty_object()]), true);
    h.test("empty input", all_items_have_the_same_type(&[]), false);

    h.test_block("getRealType");
    h.test("null", get_real_type(&Value::Null), "null");
    h.test("NaN", get_real_type(&Value::Number(f64::NAN)), "NaN");
    h.test("Infinity", get_real_type(&Value::Number(f64::INFINITY)), "Infinity");
    h.test("-Infinity", get_real_type(&Value::Number(f64::NEG_INFINITY)), "Infinity");
    h.test("date", get_real_type(&date), "date");
    h.test("regexp", get_real_type(&regexp), "regexp");
    h.test("set", get_real_type(&set), "set");
    h.test("map", get_real_type(&map), "map");
    h.test("plain object", get_real_type(&Value::empty_object()), "object");
    h.test("string \"NaN\" stays a string", get_real_type(&Value::from("NaN")), "string");

    h.test_block("getRealTypesOfItems");
    let items = vec![Value::Number(f64::NAN), Value::Null, Value::Number(f64::INFINITY), date, regexp, set, map];
    h.test(
        "one refined label per item",
        get_real_types_of_items(&items),
        vec![
            TypeLabel::NaN,
            TypeLabel::Null,
            TypeLabel::Infinity,
            TypeLabel::Date,
            TypeLabel::RegExp,
            TypeLabel::Set,
            TypeLabel::Map,
        ],
    );

    h.test_block("everyItemHasAUniqueRealType");
    h.test(
        "boolean, number, string",
        every_item_has_a_unique_real_type(&[Value::Bool(true), Value::from(123), Value::from("123")]),
        true,
    );
    h.test(
        "two booleans",
        every_item_has_a_unique_real_type(&[Value::Bool(true), Value::from(123), Value::Bool(false)]),
        false,
    );
    h.test("empty input", every_item_has_a_unique_real_type(&[]), true);

    h.test_block("countRealTypes");
    let items = vec![
        Value::Bool(true),
        Value::Null,
        Value::Bool(!Value::Null.is_truthy()),
        Value::Bool(!!Value::Null.is_truthy()),
        Value::empty_object(),
    ];
    h.test(
        "booleans, null and object",
        count_real_types(&items),
        vec![("boolean", 3), ("null", 1), ("object", 1)],
    );
    h.test("empty input", count_real_types(&[]), Vec::<Value>::new());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_checks_all_pass() {
        let mut h = Harness::new(Vec::new());
        run_builtin(&mut h);
        let summary = h.summary();
        let out = String::from_utf8(h.into_inner()).unwrap();
        assert_eq!(summary.failed, 0, "{out}");
        assert!(summary.passed > 30);
        assert!(!out.contains("[FAIL]"));
        assert!(out.contains("countRealTypes\n  [OK] booleans, null and object\n"));
    }
}
