use std::path::PathBuf;

use thiserror::Error;

use crate::lift::LiftError;
use crate::suite::cases::Op;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("at JSON path {path} → {message}")]
    Deserialize { path: String, message: String },

    #[error("case `{label}`: {source}")]
    Case { label: String, source: LiftError },

    #[error("case `{label}`: `{op:?}` expects an array input")]
    NotAnArray { label: String, op: Op },
}

pub type Result<T> = std::result::Result<T, Error>;
