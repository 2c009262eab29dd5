//! Error types for `afq-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing column {column:?}")]
  MissingColumn { column: String },

  #[error("column {column:?} is null in a row that requires a value")]
  NullIdentifier { column: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
