//! JSON case files.
//!
//! ```json
//! { "blocks": [ { "name": "getRealType", "cases": [
//!     { "label": "null", "op": "get_real_type", "input": null, "expected": "null" }
//! ] } ] }
//! ```
//!
//! `input` and `expected` go through [`crate::lift`], so `$`-tagged kinds work
//! in both. A file is validated completely before any check runs.
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::classify;
use crate::error::{Error, Result};
use crate::harness::Harness;
use crate::lift::lift;
use crate::value::Value;

// ------------------------------- Format ---------------------------------- //

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseFile {
    pub blocks: Vec<CaseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseBlock {
    pub name: String,
    pub cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Case {
    pub label: String,
    pub op: Op,
    pub input: serde_json::Value,
    pub expected: serde_json::Value,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    GetType,
    GetRealType,
    GetTypesOfItems,
    GetRealTypesOfItems,
    AllItemsHaveTheSameType,
    EveryItemHasAUniqueRealType,
    CountRealTypes,
}

impl Op {
    pub fn takes_items(self) -> bool {
        !matches!(self, Op::GetType | Op::GetRealType)
    }

    /// `None` when an items operation is given something other than an array.
    pub fn apply(self, input: &Value) -> Option<Value> {
        let result: Value = match self {
            Op::GetType => classify::get_type(input).into(),
            Op::GetRealType => classify::get_real_type(input).into(),
            Op::GetTypesOfItems => classify::get_types_of_items(input.as_array()?).into(),
            Op::GetRealTypesOfItems => classify::get_real_types_of_items(input.as_array()?).into(),
            Op::AllItemsHaveTheSameType => classify::all_items_have_the_same_type(input.as_array()?).into(),
            Op::EveryItemHasAUniqueRealType => {
                classify::every_item_has_a_unique_real_type(input.as_array()?).into()
            }
            Op::CountRealTypes => classify::count_real_types(input.as_array()?).into(),
        };
        Some(result)
    }
}

// ------------------------------ Prepared --------------------------------- //

/// A validated block; only [`CaseFile::prepare`] builds one.
#[derive(Debug)]
pub struct PreparedBlock {
    name: String,
    cases: Vec<PreparedCase>,
}

/// Items operations here always hold an array input.
#[derive(Debug)]
pub struct PreparedCase {
    label: String,
    op: Op,
    input: Value,
    expected: Value,
}

impl CaseFile {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::Read { path: path.to_owned(), source })?;
        let file: CaseFile = crate::path_de::from_slice_with_path(&bytes)?;
        debug!(path = %path.display(), blocks = file.blocks.len(), "loaded case file");
        Ok(file)
    }

    /// Lift every input and expected value; fail on the first bad case.
    pub fn prepare(self) -> Result<Vec<PreparedBlock>> {
        self.blocks
            .into_iter()
            .map(|block| {
                let cases = block
                    .cases
                    .into_iter()
                    .map(|case| case.prepare())
                    .collect::<Result<Vec<_>>>()?;
                Ok(PreparedBlock { name: block.name, cases })
            })
            .collect()
    }
}

impl Case {
    fn prepare(self) -> Result<PreparedCase> {
        let label = self.label;
        let lifted = |json: &serde_json::Value| {
            lift(json).map_err(|source| Error::Case { label: label.clone(), source })
        };
        let input = lifted(&self.input)?;
        let expected = lifted(&self.expected)?;
        if self.op.takes_items() && !input.is_array() {
            return Err(Error::NotAnArray { label, op: self.op });
        }
        Ok(PreparedCase { label, op: self.op, input, expected })
    }
}

pub fn run_blocks<W: Write>(h: &mut Harness<W>, blocks: &[PreparedBlock]) {
    for block in blocks {
        h.test_block(&block.name);
        for case in &block.cases {
            let actual = case.op.apply(&case.input).unwrap_or(Value::Undefined);
            h.test(&case.label, actual, case.expected.clone());
        }
    }
    info!(blocks = blocks.len(), "ran case blocks");
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn write_case_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_prepares_and_runs() {
        let file = write_case_file(r#"{
            "blocks": [
                { "name": "countRealTypes", "cases": [
                    { "label": "tally", "op": "count_real_types",
                      "input": [true, null, true, false, {}],
                      "expected": [["boolean", 3], ["null", 1], ["object", 1]] }
                ] },
                { "name": "getRealType", "cases": [
                    { "label": "nan", "op": "get_real_type", "input": {"$number": "NaN"}, "expected": "NaN" },
                    { "label": "wrong on purpose", "op": "get_type", "input": null, "expected": "null" }
                ] }
            ]
        }"#);
        let blocks = CaseFile::load(file.path()).unwrap().prepare().unwrap();
        let mut h = Harness::new(Vec::new());
        run_blocks(&mut h, &blocks);
        let summary = h.summary();
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        let out = String::from_utf8(h.into_inner()).unwrap();
        assert!(out.contains("  [FAIL] wrong on purpose\n      expected: 'null'\n      actual:   'object'\n"));
    }

    #[test]
    fn unknown_op_reports_json_path() {
        let file = write_case_file(r#"{"blocks": [{"name": "x", "cases": [
            {"label": "a", "op": "get_kind", "input": 1, "expected": "number"}
        ]}]}"#);
        let err = CaseFile::load(file.path()).unwrap_err();
        let Error::Deserialize { path, .. } = &err else { panic!("unexpected error: {err}") };
        assert_eq!(path, "blocks[0].cases[0].op");
    }

    #[test]
    fn items_op_rejects_non_array_input() {
        let file: CaseFile = serde_json::from_str(r#"{"blocks": [{"name": "x", "cases": [
            {"label": "scalar", "op": "count_real_types", "input": 1, "expected": []}
        ]}]}"#).unwrap();
        let err = file.prepare().unwrap_err();
        assert!(matches!(err, Error::NotAnArray { op: Op::CountRealTypes, .. }));
    }

    #[test]
    fn bad_extension_value_names_the_case() {
        let file: CaseFile = serde_json::from_str(r#"{"blocks": [{"name": "x", "cases": [
            {"label": "bad bigint", "op": "get_real_type", "input": {"$bigint": "1.5"}, "expected": "bigint"}
        ]}]}"#).unwrap();
        let err = file.prepare().unwrap_err();
        assert_eq!(err.to_string(), "case `bad bigint`: at /$bigint: invalid bigint literal `1.5`");
    }
}
