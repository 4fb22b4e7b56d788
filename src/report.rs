//! Per-document classification report, as printed by `realtype classify`.
use serde::Serialize;

use crate::classify::{self, TypeLabel};
use crate::value::Value;

#[derive(Debug, Serialize)]
pub struct Report {
    pub source: String,
    #[serde(rename = "type")]
    pub type_: TypeLabel,
    pub real_type: TypeLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsReport>,
}

#[derive(Debug, Serialize)]
pub struct ItemsReport {
    pub types: Vec<TypeLabel>,
    pub real_types: Vec<TypeLabel>,
    pub same_type: bool,
    pub unique_real_types: bool,
    pub real_type_counts: Vec<(TypeLabel, usize)>,
}

impl Report {
    /// `items` only applies to arrays; for anything else it is left out.
    pub fn of(source: impl Into<String>, value: &Value, items: bool) -> Self {
        let items = match value.as_array() {
            Some(xs) if items => Some(ItemsReport::of(xs)),
            _ => None,
        };
        Self {
            source: source.into(),
            type_: classify::get_type(value),
            real_type: classify::get_real_type(value),
            items,
        }
    }
}

impl ItemsReport {
    pub fn of(xs: &[Value]) -> Self {
        Self {
            types: classify::get_types_of_items(xs),
            real_types: classify::get_real_types_of_items(xs),
            same_type: classify::all_items_have_the_same_type(xs),
            unique_real_types: classify::every_item_has_a_unique_real_type(xs),
            real_type_counts: classify::count_real_types(xs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lift::lift;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn array_report_with_items() {
        let v = lift(&json!([true, null, {"$number": "Infinity"}, true])).unwrap();
        let report = serde_json::to_value(Report::of("doc.json", &v, true)).unwrap();
        assert_eq!(
            report,
            json!({
                "source": "doc.json",
                "type": "object",
                "real_type": "object",
                "items": {
                    "types": ["boolean", "object", "number", "boolean"],
                    "real_types": ["boolean", "null", "Infinity", "boolean"],
                    "same_type": false,
                    "unique_real_types": false,
                    "real_type_counts": [["Infinity", 1], ["boolean", 2], ["null", 1]]
                }
            })
        );
    }

    #[test]
    fn scalar_report_omits_items() {
        let report = serde_json::to_value(Report::of("x", &Value::Null, true)).unwrap();
        assert_eq!(report, json!({"source": "x", "type": "object", "real_type": "null"}));
    }
}
