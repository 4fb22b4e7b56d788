//! Lift `serde_json::Value` into [`Value`].
//!
//! Plain JSON maps one-to-one. Kinds JSON cannot spell are written as a
//! single-key object whose key is a `$` tag:
//!
//! | tag          | payload                                        |
//! |--------------|------------------------------------------------|
//! | `$undefined` | anything (ignored)                             |
//! | `$number`    | `"NaN"`, `"Infinity"`, `"-Infinity"` or number |
//! | `$bigint`    | decimal string or integer                      |
//! | `$symbol`    | description string or `null`                   |
//! | `$function`  | name string                                    |
//! | `$date`      | RFC 3339 string or epoch milliseconds          |
//! | `$regexp`    | `"/source/flags"` or bare source               |
//! | `$set`       | array of members                               |
//! | `$map`       | array of `[key, value]` pairs                  |
//!
//! Any other object, including one with an unknown `$` key, stays an object.
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use once_cell::sync::Lazy;
use ordered_float::OrderedFloat;
use regex::Regex;
use serde_json::Value as Json;
use thiserror::Error;

use crate::value::{RegExpValue, Value, REGEXP_FLAGS};

static REGEXP_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^/(.*)/([a-z]*)$").expect("regexp literal pattern is valid")
});

// ------------------------------- Errors ---------------------------------- //

#[derive(Debug, Error)]
#[error("at {path}: {kind}")]
pub struct LiftError {
    /// JSON Pointer to the offending node (`/` for the root).
    pub path: String,
    pub kind: LiftErrorKind,
}

#[derive(Debug, Error)]
pub enum LiftErrorKind {
    #[error("`{tag}` expects {expected}, found {found}")]
    Payload { tag: &'static str, expected: &'static str, found: &'static str },
    #[error("unknown number literal `{0}`")]
    Number(String),
    #[error("invalid bigint literal `{0}`")]
    BigInt(String),
    #[error("invalid regexp literal `{0}`")]
    RegExpLiteral(String),
    #[error("unsupported or repeated regexp flags `{0}`")]
    RegExpFlags(String),
    #[error("regexp `{pattern}` does not compile: {error}")]
    RegExp { pattern: String, error: regex::Error },
}

// -------------------------------- Lift ----------------------------------- //

pub fn lift(json: &Json) -> Result<Value, LiftError> {
    lift_at(json, "")
}

fn lift_at(json: &Json, path: &str) -> Result<Value, LiftError> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => Ok(Value::Number(n.as_f64().unwrap_or(f64::NAN))),
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(xs) => lift_items(xs, path).map(Value::Array),
        Json::Object(map) => {
            if map.len() == 1 {
                if let Some((tag, payload)) = map.iter().next() {
                    if let Some(value) = lift_tagged(tag, payload, path)? {
                        return Ok(value);
                    }
                }
            }
            let mut out = IndexMap::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), lift_at(v, &child(path, k))?);
            }
            Ok(Value::Object(out))
        }
    }
}

fn lift_items(xs: &[Json], path: &str) -> Result<Vec<Value>, LiftError> {
    xs.iter()
        .enumerate()
        .map(|(i, x)| lift_at(x, &child(path, &i.to_string())))
        .collect()
}

/// `Ok(None)` when `tag` is not an extension tag.
fn lift_tagged(tag: &str, payload: &Json, path: &str) -> Result<Option<Value>, LiftError> {
    let here = child(path, tag);
    let fail = |kind| LiftError { path: display_path(&here), kind };
    let wrong = |tag: &'static str, expected: &'static str| {
        fail(LiftErrorKind::Payload { tag, expected, found: json_kind(payload) })
    };

    let value = match tag {
        "$undefined" => Value::Undefined,
        "$number" => match payload {
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::Number(parse_number_literal(s).ok_or_else(|| fail(LiftErrorKind::Number(s.clone())))?),
            _ => return Err(wrong("$number", "a number or numeric literal string")),
        },
        "$bigint" => match payload {
            Json::String(s) => Value::BigInt(s.trim().parse::<BigInt>().map_err(|_| fail(LiftErrorKind::BigInt(s.clone())))?),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::BigInt(BigInt::from(i))
                } else if let Some(u) = n.as_u64() {
                    Value::BigInt(BigInt::from(u))
                } else {
                    return Err(fail(LiftErrorKind::BigInt(n.to_string())));
                }
            }
            _ => return Err(wrong("$bigint", "a decimal string or integer")),
        },
        "$symbol" => match payload {
            Json::Null => Value::Symbol(None),
            Json::String(s) => Value::Symbol(Some(s.clone())),
            _ => return Err(wrong("$symbol", "a description string or null")),
        },
        "$function" => match payload {
            Json::String(s) => Value::Function(s.clone()),
            _ => return Err(wrong("$function", "a name string")),
        },
        "$date" => match payload {
            Json::String(s) => Value::Date(parse_date(s)),
            Json::Number(n) => Value::Date(n.as_f64().and_then(date_from_millis)),
            _ => return Err(wrong("$date", "an RFC 3339 string or epoch milliseconds")),
        },
        "$regexp" => match payload {
            Json::String(s) => Value::RegExp(parse_regexp(s).map_err(fail)?),
            _ => return Err(wrong("$regexp", "a regexp literal string")),
        },
        "$set" => match payload {
            Json::Array(xs) => Value::Set(dedup_members(lift_items(xs, &here)?)),
            _ => return Err(wrong("$set", "an array of members")),
        },
        "$map" => match payload {
            Json::Array(xs) => Value::Map(lift_entries(xs, &here)?),
            _ => return Err(wrong("$map", "an array of [key, value] pairs")),
        },
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn lift_entries(xs: &[Json], path: &str) -> Result<Vec<(Value, Value)>, LiftError> {
    let mut entries = Vec::with_capacity(xs.len());
    let mut index = HashMap::<SameValueZero, usize>::new();
    for (i, x) in xs.iter().enumerate() {
        let at = child(path, &i.to_string());
        let (k, v) = match x.as_array().map(Vec::as_slice) {
            Some([k, v]) => (positive_zero(lift_at(k, &child(&at, "0"))?), lift_at(v, &child(&at, "1"))?),
            _ => {
                return Err(LiftError {
                    path: display_path(&at),
                    kind: LiftErrorKind::Payload { tag: "$map", expected: "a [key, value] pair", found: json_kind(x) },
                });
            }
        };
        // A repeated key overwrites the earlier entry in place.
        if let Some(key) = SameValueZero::of(&k) {
            if let Some(&slot) = index.get(&key) {
                entries[slot] = (k, v);
                continue;
            }
            index.insert(key, entries.len());
        }
        entries.push((k, v));
    }
    Ok(entries)
}

fn dedup_members(members: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::<SameValueZero>::new();
    members
        .into_iter()
        .map(positive_zero)
        .filter(|m| match SameValueZero::of(m) {
            Some(key) => seen.insert(key),
            None => true,
        })
        .collect()
}

// ------------------------------- Helpers --------------------------------- //

/// Key under SameValueZero: NaN equals NaN and `+0` equals `-0`.
/// Only primitives have one; every composite literal is a distinct value.
#[derive(Debug, PartialEq, Eq, Hash)]
enum SameValueZero {
    Undefined,
    Null,
    Bool(bool),
    Number(OrderedFloat<f64>),
    BigInt(BigInt),
    String(String),
}

impl SameValueZero {
    fn of(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Undefined => Self::Undefined,
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(OrderedFloat(*n)),
            Value::BigInt(n) => Self::BigInt(n.clone()),
            Value::String(s) => Self::String(s.clone()),
            _ => return None,
        })
    }
}

/// Set members and map keys store `-0` as `+0`.
fn positive_zero(value: Value) -> Value {
    match value {
        Value::Number(n) if n == 0.0 => Value::Number(0.0),
        other => other,
    }
}

fn parse_number_literal(s: &str) -> Option<f64> {
    match s.trim() {
        "NaN" => Some(f64::NAN),
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        other => other.parse::<f64>().ok().filter(|n| n.is_finite()),
    }
}

/// Unparsable text yields an invalid date rather than an error.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

fn date_from_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64)
}

fn parse_regexp(literal: &str) -> Result<RegExpValue, LiftErrorKind> {
    let (source, flags) = if literal.starts_with('/') {
        let caps = REGEXP_LITERAL
            .captures(literal)
            .ok_or_else(|| LiftErrorKind::RegExpLiteral(literal.to_owned()))?;
        (caps[1].to_owned(), caps[2].to_owned())
    } else {
        (literal.to_owned(), String::new())
    };

    let mut seen = HashSet::new();
    if !flags.chars().all(|c| REGEXP_FLAGS.contains(c) && seen.insert(c)) {
        return Err(LiftErrorKind::RegExpFlags(flags));
    }

    RegExpValue::new(source.clone(), flags).map_err(|error| LiftErrorKind::RegExp { pattern: source, error })
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

fn child(path: &str, segment: &str) -> String {
    format!("{path}/{}", segment.replace('~', "~0").replace('/', "~1"))
}

fn display_path(path: &str) -> String {
    if path.is_empty() { "/".to_owned() } else { path.to_owned() }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{get_real_type, TypeLabel};
    use serde_json::json;

    fn real(json: Json) -> TypeLabel {
        get_real_type(&lift(&json).unwrap())
    }

    #[test]
    fn plain_json_maps_directly() {
        assert_eq!(real(json!(null)), TypeLabel::Null);
        assert_eq!(real(json!(true)), TypeLabel::Boolean);
        assert_eq!(real(json!(1.5)), TypeLabel::Number);
        assert_eq!(real(json!("x")), TypeLabel::String);
        assert_eq!(real(json!([1, 2])), TypeLabel::Object);
        assert_eq!(real(json!({"a": 1, "b": 2})), TypeLabel::Object);
    }

    #[test]
    fn object_key_order_is_preserved() {
        let v = lift(&json!({"z": 1, "a": 2, "m": 3})).unwrap();
        let Value::Object(map) = v else { panic!("expected object") };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn extension_tags() {
        assert_eq!(real(json!({"$undefined": null})), TypeLabel::Undefined);
        assert_eq!(real(json!({"$number": "NaN"})), TypeLabel::NaN);
        assert_eq!(real(json!({"$number": "-Infinity"})), TypeLabel::Infinity);
        assert_eq!(real(json!({"$number": "2.5"})), TypeLabel::Number);
        assert_eq!(real(json!({"$bigint": "123456789012345678901234567890"})), TypeLabel::BigInt);
        assert_eq!(real(json!({"$symbol": null})), TypeLabel::Symbol);
        assert_eq!(real(json!({"$function": "main"})), TypeLabel::Function);
        assert_eq!(real(json!({"$date": "2024-02-29T12:00:00Z"})), TypeLabel::Date);
        assert_eq!(real(json!({"$date": 0})), TypeLabel::Date);
        assert_eq!(real(json!({"$regexp": "/a+b/gi"})), TypeLabel::RegExp);
        assert_eq!(real(json!({"$set": [1, 2]})), TypeLabel::Set);
        assert_eq!(real(json!({"$map": [["k", 1]]})), TypeLabel::Map);
    }

    #[test]
    fn unknown_or_multi_key_tags_stay_objects() {
        assert_eq!(real(json!({"$nope": 1})), TypeLabel::Object);
        assert_eq!(real(json!({"$date": "2024-01-01T00:00:00Z", "other": 1})), TypeLabel::Object);
    }

    #[test]
    fn unparsable_date_is_an_invalid_date() {
        let v = lift(&json!({"$date": "not a date"})).unwrap();
        assert!(matches!(v, Value::Date(None)));
        assert_eq!(get_real_type(&v), TypeLabel::Date);
    }

    #[test]
    fn regexp_literal_keeps_source_and_flags() {
        let v = lift(&json!({"$regexp": "/^a\\/b$/i"})).unwrap();
        let Value::RegExp(re) = v else { panic!("expected regexp") };
        assert_eq!(re.source, "^a\\/b$");
        assert_eq!(re.flags, "i");
        assert!(re.is_match("A/B"));
    }

    #[test]
    fn set_members_dedup_with_same_value_zero() {
        let v = lift(&json!({"$set": [1, {"$number": "NaN"}, 1, {"$number": "NaN"}, 0, {"$number": "-0"}, {}, {}]})).unwrap();
        let Value::Set(members) = v else { panic!("expected set") };
        // 1, NaN, 0 and both empty objects survive.
        assert_eq!(members.len(), 5);
    }

    #[test]
    fn negative_zero_is_stored_as_positive_zero() {
        let set = lift(&json!({"$set": [{"$number": "-0"}, 0]})).unwrap();
        assert_eq!(set.to_string(), "Set(1) { 0 }");

        let map = lift(&json!({"$map": [[{"$number": "-0"}, 1]]})).unwrap();
        assert_eq!(map.to_string(), "Map(1) { 0 => 1 }");

        // Plain numbers elsewhere keep their sign.
        assert_eq!(lift(&json!({"$number": "-0"})).unwrap().to_string(), "-0");
    }

    #[test]
    fn map_repeated_keys_overwrite_in_place() {
        let v = lift(&json!({"$map": [["a", 1], ["b", 2], ["a", 3]]})).unwrap();
        assert_eq!(v.to_string(), "Map(2) { 'a' => 3, 'b' => 2 }");
    }

    #[test]
    fn errors_carry_json_pointer() {
        let err = lift(&json!({"rows": [1, {"$bigint": "12x"}]})).unwrap_err();
        assert_eq!(err.path, "/rows/1/$bigint");
        assert!(matches!(err.kind, LiftErrorKind::BigInt(_)));

        let err = lift(&json!({"$map": [["a", 1], ["b"]]})).unwrap_err();
        assert_eq!(err.path, "/$map/1");

        let err = lift(&json!({"$regexp": "/(/"})).unwrap_err();
        assert!(matches!(err.kind, LiftErrorKind::RegExp { .. }));

        let err = lift(&json!({"$regexp": "/a/gg"})).unwrap_err();
        assert!(matches!(err.kind, LiftErrorKind::RegExpFlags(_)));

        let err = lift(&json!({"$symbol": 3})).unwrap_err();
        assert_eq!(err.to_string(), "at /$symbol: `$symbol` expects a description string or null, found a number");
    }
}
