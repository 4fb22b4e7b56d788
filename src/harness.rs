//! Inline assertion harness.
//!
//! Prints one `[OK] <label>` or `[FAIL] <label>` line per check, with the
//! expected and actual values dumped on failure. A failing check never stops
//! the run and never changes the process exit status; the tally is only
//! something a caller may read afterwards.
use std::io::Write;

use colored::Colorize;
use tracing::span::EnteredSpan;
use tracing::{debug, info_span, warn};

use crate::value::Value;

// ------------------------------ Equality --------------------------------- //

/// Strict equality first, then element-wise comparison of equal-length arrays.
///
/// Anything else (arrays of different lengths, an array against a non-array,
/// two distinct objects) is unequal.
pub fn are_equal(a: &Value, b: &Value) -> bool {
    if strict_equals(a, b) {
        return true;
    }
    match (a, b) {
        (Value::Array(xs), Value::Array(ys)) if xs.len() == ys.len() => {
            xs.iter().zip(ys).all(|(x, y)| are_equal(x, y))
        }
        _ => false,
    }
}

/// Primitives compare by value (`NaN` is never equal, `+0 == -0`);
/// everything else only equals itself.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        _ => std::ptr::eq(a, b),
    }
}

// ------------------------------- Harness --------------------------------- //

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

pub struct Harness<W: Write> {
    out: W,
    color: bool,
    block: Option<EnteredSpan>,
    summary: Summary,
}

impl<W: Write> Harness<W> {
    pub fn new(out: W) -> Self {
        Self { out, color: false, block: None, summary: Summary::default() }
    }

    /// Colored markers; `colored`'s own overrides (`NO_COLOR`, `--color`) still apply.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Compare and report. Always returns normally.
    pub fn test(&mut self, label: &str, actual: impl Into<Value>, expected: impl Into<Value>) {
        let actual = actual.into();
        let expected = expected.into();
        if are_equal(&actual, &expected) {
            self.summary.passed += 1;
            debug!(label, "check passed");
            let marker = self.marker("[OK]", true);
            self.line(&format!("{marker} {label}"));
        } else {
            self.summary.failed += 1;
            debug!(label, %expected, %actual, "check failed");
            let marker = self.marker("[FAIL]", false);
            self.line(&format!("{marker} {label}"));
            self.line(&format!("    expected: {expected}"));
            self.line(&format!("    actual:   {actual}"));
        }
    }

    /// Close the current group and open a new one named `name`.
    pub fn test_block(&mut self, name: &str) {
        self.block.take();
        let header = if self.color { name.bold().to_string() } else { name.to_owned() };
        self.write_raw(&header);
        self.block = Some(info_span!("test_block", name).entered());
    }

    /// Close the last group and print the tally line.
    pub fn finish(mut self) -> Summary {
        self.block.take();
        let Summary { passed, failed } = self.summary;
        let line = format!("{passed} passed, {failed} failed");
        self.write_raw(&line);
        if let Err(error) = self.out.flush() {
            warn!(%error, "failed to flush test report");
        }
        self.summary
    }

    pub fn into_inner(mut self) -> W {
        self.block.take();
        self.out
    }

    fn marker(&self, text: &str, ok: bool) -> String {
        match (self.color, ok) {
            (false, _) => text.to_owned(),
            (true, true) => text.green().to_string(),
            (true, false) => text.red().bold().to_string(),
        }
    }

    fn line(&mut self, text: &str) {
        let indent = if self.block.is_some() { "  " } else { "" };
        let text = format!("{indent}{text}");
        self.write_raw(&text);
    }

    fn write_raw(&mut self, text: &str) {
        if let Err(error) = writeln!(self.out, "{text}") {
            warn!(%error, "failed to write test report line");
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
