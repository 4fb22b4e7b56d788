//! Run-time type classification of dynamic values.
//!
//! - [`classify`]: shallow (`get_type`) and refined (`get_real_type`) tags,
//!   plus the per-item helpers built on them.
//! - [`harness`]: an inline `[OK]`/`[FAIL]` checker that never aborts.
//! - [`lift`]: the boundary from `serde_json::Value` into [`value::Value`].
pub mod classify;
pub mod cli;
pub mod error;
pub mod harness;
pub mod jq_exec;
pub mod lift;
pub mod logging;
pub mod path_de;
pub mod report;
pub mod suite;
pub mod value;

pub use classify::TypeLabel;
pub use error::{Error, Result};
pub use value::Value;
