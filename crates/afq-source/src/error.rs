//! Error type for `afq-source`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("GET {url} returned {status}: {body}")]
  Status { url: String, status: u16, body: String },

  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("decoding CSV: {0}")]
  Csv(#[from] afq_csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
