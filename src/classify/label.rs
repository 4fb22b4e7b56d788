use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Type tag produced by the classifier.
///
/// The first eight are shallow tags; the rest only come out of the
/// real-type refinement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeLabel {
    Boolean,
    Number,
    String,
    BigInt,
    Symbol,
    Undefined,
    Object,
    Function,
    #[serde(rename = "NaN")]
    NaN,
    Null,
    #[serde(rename = "Infinity")]
    Infinity,
    Date,
    RegExp,
    Set,
    Map,
}

impl TypeLabel {
    pub const ALL: [TypeLabel; 15] = [
        TypeLabel::Boolean,
        TypeLabel::Number,
        TypeLabel::String,
        TypeLabel::BigInt,
        TypeLabel::Symbol,
        TypeLabel::Undefined,
        TypeLabel::Object,
        TypeLabel::Function,
        TypeLabel::NaN,
        TypeLabel::Null,
        TypeLabel::Infinity,
        TypeLabel::Date,
        TypeLabel::RegExp,
        TypeLabel::Set,
        TypeLabel::Map,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TypeLabel::Boolean => "boolean",
            TypeLabel::Number => "number",
            TypeLabel::String => "string",
            TypeLabel::BigInt => "bigint",
            TypeLabel::Symbol => "symbol",
            TypeLabel::Undefined => "undefined",
            TypeLabel::Object => "object",
            TypeLabel::Function => "function",
            TypeLabel::NaN => "NaN",
            TypeLabel::Null => "null",
            TypeLabel::Infinity => "Infinity",
            TypeLabel::Date => "date",
            TypeLabel::RegExp => "regexp",
            TypeLabel::Set => "set",
            TypeLabel::Map => "map",
        }
    }
}

// Ordered by label text, so uppercase tags sort first.
impl Ord for TypeLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for TypeLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TypeLabel> for Value {
    fn from(label: TypeLabel) -> Self {
        Value::String(label.as_str().to_owned())
    }
}
