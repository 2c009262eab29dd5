//! Error types for the afq-csv codec.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed CSV: {0}")]
  Csv(#[from] csv::Error),

  #[error("CSV has no header row")]
  MissingHeader,

  #[error("reading {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
