//! Error type for `afq-vault`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The vault answered with a non-success status.
  #[error("{method} {url} returned {status}: {body}")]
  Status {
    method: &'static str,
    url:    String,
    status: u16,
    body:   String,
  },

  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("malformed vault response: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("invalid header value: {0}")]
  InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
