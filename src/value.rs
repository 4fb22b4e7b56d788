//! Run-time value model.
//!
//! A closed set of value kinds, decided once at the boundary where untyped
//! input enters (see [`crate::lift`]). Everything downstream inspects values
//! with a `match`; there is no reflection.
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use regex::Regex;

// ------------------------------- Types ----------------------------------- //

#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    String(String),
    /// Symbol with its optional description.
    Symbol(Option<String>),
    /// Function, by name (empty when anonymous).
    Function(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    /// `None` is an invalid date, which is still a date.
    Date(Option<DateTime<Utc>>),
    RegExp(RegExpValue),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

/// A regular expression literal: `/source/flags`.
#[derive(Clone, Debug)]
pub struct RegExpValue {
    pub source: String,
    pub flags: String,
    compiled: Regex,
}

/// Flags a literal may carry. Only `i`, `m` and `s` change matching here.
pub const REGEXP_FLAGS: &str = "dgimsuvy";

impl RegExpValue {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let flags = flags.into();
        let inline: String = flags.chars().filter(|c| matches!(c, 'i' | 'm' | 's')).collect();
        let compiled = if inline.is_empty() {
            Regex::new(&source)?
        } else {
            Regex::new(&format!("(?{inline}){source}"))?
        };
        Ok(Self { source, flags, compiled })
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.compiled.is_match(haystack)
    }
}

// ----------------------------- Inspection -------------------------------- //

impl Value {
    pub fn empty_object() -> Self {
        Value::Object(IndexMap::new())
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(xs) => Some(xs),
            _ => None,
        }
    }

    /// JavaScript truthiness: `undefined`, `null`, `false`, `0`, `-0`, `NaN`,
    /// `0n` and `""` are falsy; everything else (all objects) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !n.is_nan() && *n != 0.0,
            Value::BigInt(n) => *n != BigInt::from(0),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }
}

// ------------------------------ Conversions ------------------------------ //

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(n)
    }
}

impl From<RegExpValue> for Value {
    fn from(re: RegExpValue) -> Self {
        Value::RegExp(re)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(xs: Vec<T>) -> Self {
        Value::Array(xs.into_iter().map(Into::into).collect())
    }
}

/// Pairs become two-element arrays, the way `[label, count]` tallies read.
impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::Array(vec![a.into(), b.into()])
    }
}

// -------------------------------- Display -------------------------------- //

/// Console-style rendering, close to what a REPL prints when inspecting a value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write_number(f, *n),
            Value::BigInt(n) => write!(f, "{n}n"),
            Value::String(s) => write_quoted(f, s),
            Value::Symbol(None) => f.write_str("Symbol()"),
            Value::Symbol(Some(desc)) => write!(f, "Symbol({desc})"),
            Value::Function(name) if name.is_empty() => f.write_str("[Function (anonymous)]"),
            Value::Function(name) => write!(f, "[Function: {name}]"),
            Value::Array(xs) => {
                if xs.is_empty() {
                    return f.write_str("[]");
                }
                f.write_str("[ ")?;
                write_separated(f, xs.iter(), |f, x| write!(f, "{x}"))?;
                f.write_str(" ]")
            }
            Value::Object(map) => {
                if map.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                write_separated(f, map.iter(), |f, (k, v)| {
                    if is_identifier(k) {
                        f.write_str(k)?;
                    } else {
                        write_quoted(f, k)?;
                    }
                    write!(f, ": {v}")
                })?;
                f.write_str(" }")
            }
            Value::Date(None) => f.write_str("Invalid Date"),
            Value::Date(Some(at)) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::RegExp(re) => write!(f, "/{}/{}", re.source, re.flags),
            Value::Set(xs) => {
                write!(f, "Set({}) {{", xs.len())?;
                if !xs.is_empty() {
                    f.write_str(" ")?;
                    write_separated(f, xs.iter(), |f, x| write!(f, "{x}"))?;
                    f.write_str(" ")?;
                }
                f.write_str("}")
            }
            Value::Map(entries) => {
                write!(f, "Map({}) {{", entries.len())?;
                if !entries.is_empty() {
                    f.write_str(" ")?;
                    write_separated(f, entries.iter(), |f, (k, v)| write!(f, "{k} => {v}"))?;
                    f.write_str(" ")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n != 0.0 && !(1e-6..1e21).contains(&n.abs()) {
        // Exponent form, with an explicit sign on positive exponents.
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
            _ => f.write_str(&text),
        }
    } else {
        write!(f, "{n}")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}

fn write_separated<I, T>(
    f: &mut fmt::Formatter<'_>,
    items: I,
    mut write_one: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result
where
    I: Iterator<Item = T>,
{
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_one(f, item)?;
    }
    Ok(())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ------------------------------- Tests ------------------------------------ //
